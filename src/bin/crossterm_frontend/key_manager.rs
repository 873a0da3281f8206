use super::key_latch::KeyLatch;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use fake_chip_8::emulator::input::Keypad;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long a key counts as held after the terminal reports it.
const HOLD: Duration = Duration::from_millis(250);
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A struct for managing keypresses that will automatically
/// start a thread that grabs keypresses.
pub struct KeyManager {
    stop: Arc<AtomicBool>,
    quit: Arc<AtomicBool>,
    key_latch: Arc<KeyLatch>,
    event_listener: Option<JoinHandle<()>>,
}

impl KeyManager {
    // Start event listener thread
    pub fn new() -> KeyManager {
        let stop = Arc::new(AtomicBool::new(false));
        let quit = Arc::new(AtomicBool::new(false));
        let key_latch = Arc::new(KeyLatch::new(HOLD));
        let event_listener = event_listener(stop.clone(), quit.clone(), key_latch.clone());
        KeyManager {
            stop,
            quit,
            key_latch,
            event_listener: Some(event_listener),
        }
    }

    /// The currently held keys
    pub fn keypad(&self) -> Keypad {
        self.key_latch.snapshot()
    }

    /// Whether escape or ctrl-c has been pressed
    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Relaxed)
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        // Tell the event listener to stop, it notices within one poll interval
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.event_listener.take() {
            if handle.join().is_err() {
                log::error!("Key event listener panicked");
            }
        }
    }
}

/// Starts a thread that listens for key events and records them in the key latch.
fn event_listener(stop: Arc<AtomicBool>, quit: Arc<AtomicBool>, key_latch: Arc<KeyLatch>) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            let event = match next_event() {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    log::error!("Could not read terminal events: {}", e);
                    quit.store(true, Ordering::Relaxed);
                    break;
                }
            };
            log::debug!("Got event {:?}", event);

            // Investigate the event
            if let Event::Key(key_event) = event {
                if is_quit(key_event) {
                    quit.store(true, Ordering::Relaxed);
                } else if let Some(key) = key_to_u8(key_event.code) {
                    key_latch.press(key);
                }
            }
        }
    })
}

/// Wait one poll interval for an event.
fn next_event() -> crossterm::Result<Option<Event>> {
    if event::poll(POLL_INTERVAL)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

fn is_quit(key_event: KeyEvent) -> bool {
    match key_event.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => key_event.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// The usual layout, four rows of four keys starting at `1`.
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// q w e r  ->  4 5 6 D
/// a s d f      7 8 9 E
/// z x c v      A 0 B F
/// ```
fn key_to_u8(key: KeyCode) -> Option<u8> {
    let key = match key {
        KeyCode::Char(c) => c.to_ascii_lowercase(),
        _ => return None,
    };
    let value = match key {
        '1' => 0x1, '2' => 0x2, '3' => 0x3, '4' => 0xC,
        'q' => 0x4, 'w' => 0x5, 'e' => 0x6, 'r' => 0xD,
        'a' => 0x7, 's' => 0x8, 'd' => 0x9, 'f' => 0xE,
        'z' => 0xA, 'x' => 0x0, 'c' => 0xB, 'v' => 0xF,
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn layout_covers_every_key_once() {
        let mut seen = Keypad::empty();
        for c in "1234qwerasdfzxcv".chars() {
            let key = key_to_u8(KeyCode::Char(c)).unwrap();
            assert!(!seen.is_pressed(key), "{} mapped twice", key);
            seen.press(key);
        }
        assert_eq!(seen.bits(), 0xFFFF);
    }

    #[test]
    fn other_keys_are_unmapped() {
        assert_eq!(key_to_u8(KeyCode::Char('p')), None);
        assert_eq!(key_to_u8(KeyCode::Enter), None);
        assert_eq!(key_to_u8(KeyCode::Char('Q')), Some(0x4));
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        assert!(is_quit(KeyEvent { code: KeyCode::Esc, modifiers: KeyModifiers::NONE }));
        assert!(is_quit(KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }));
        assert!(!is_quit(KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::NONE }));
    }
}
