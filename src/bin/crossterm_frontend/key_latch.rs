use fake_chip_8::emulator::input::{Keypad, NUM_KEYS};
use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

/// A thread-safe record of recent key presses.
///
/// Terminals only report presses, never releases, so a key counts as held
/// for `hold` after its last press. Wrap it in an `std::sync::Arc` to share
/// it between the event thread and the emulator.
pub struct KeyLatch {
    hold: Duration,
    pressed_at: Mutex<[Option<Instant>; NUM_KEYS as usize]>,
}

impl KeyLatch {

    /// Create a new `KeyLatch` where presses expire after `hold`.
    pub fn new(hold: Duration) -> KeyLatch {
        KeyLatch {
            hold,
            pressed_at: Mutex::new([None; NUM_KEYS as usize]),
        }
    }

    /// Record a press of `key`. Keys outside the pad are ignored.
    pub fn press(&self, key: u8) {
        if let Some(slot) = self.lock().get_mut(key as usize) {
            *slot = Some(Instant::now());
        }
    }

    /// The keys pressed within the hold time.
    pub fn snapshot(&self) -> Keypad {
        let pressed_at = self.lock();
        let mut keypad = Keypad::empty();
        for (key, timestamp) in pressed_at.iter().enumerate() {
            if timestamp.map_or(false, |ts| ts.elapsed() < self.hold) {
                keypad.press(key as u8);
            }
        }
        keypad
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, [Option<Instant>; NUM_KEYS as usize]> {
        // A panicking writer cannot leave the timestamps half updated
        self.pressed_at.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::{sync::Arc, thread};

    #[test]
    fn press_from_another_thread() {
        let latch = Arc::new(KeyLatch::new(Duration::from_secs(10)));

        let producer_latch = latch.clone();
        let producer = thread::spawn(move || {
            producer_latch.press(0xA);
            producer_latch.press(0x3);
        });
        producer.join().unwrap(); // Ensure the presses have been made

        let keypad = latch.snapshot();
        assert!(keypad.is_pressed(0xA));
        assert!(keypad.is_pressed(0x3));
        assert_eq!(keypad.lowest_pressed(), Some(0x3));
    }

    #[test]
    fn presses_expire() {
        let latch = KeyLatch::new(Duration::from_millis(10));
        latch.press(5);
        thread::sleep(Duration::from_millis(30));
        assert!(latch.snapshot().is_empty());
    }

    #[test]
    fn keys_outside_the_pad_are_ignored() {
        let latch = KeyLatch::new(Duration::from_secs(10));
        latch.press(16);
        assert!(latch.snapshot().is_empty());
    }
}
