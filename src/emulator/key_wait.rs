//! The suspended state entered by `FX0A`.
//!
//! Waiting never blocks: every step polls once and either stays suspended
//! or hands back the key that ended the wait.

use super::input::Keypad;
use super::instruction::Reg;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyWait {
    Idle,
    WaitingForKey(Reg),
}

/// Outcome of polling the key-wait state with a fresh keypad snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPoll {
    /// Not waiting, execute normally.
    Idle,
    /// Still waiting, skip this step.
    Waiting,
    /// The wait ended this step. `key` belongs in `target`.
    Resolved { target: Reg, key: u8 },
}

impl KeyWait {
    pub fn begin(&mut self, target: Reg) {
        *self = KeyWait::WaitingForKey(target);
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, KeyWait::WaitingForKey(_))
    }

    pub fn poll(&mut self, keys: Keypad) -> KeyPoll {
        match *self {
            KeyWait::Idle => KeyPoll::Idle,
            KeyWait::WaitingForKey(target) => match keys.lowest_pressed() {
                Some(key) => {
                    *self = KeyWait::Idle;
                    KeyPoll::Resolved { target, key }
                }
                None => KeyPoll::Waiting,
            },
        }
    }
}

impl Default for KeyWait {
    fn default() -> Self {
        KeyWait::Idle
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn idle_stays_idle() {
        let mut wait = KeyWait::default();
        assert_eq!(wait.poll(Keypad::with_key(3)), KeyPoll::Idle);
        assert!(!wait.is_waiting());
    }

    #[test]
    fn waits_until_a_key_is_held() {
        let target = Reg::new(4).unwrap();
        let mut wait = KeyWait::Idle;
        wait.begin(target);

        assert_eq!(wait.poll(Keypad::empty()), KeyPoll::Waiting);
        assert_eq!(wait.poll(Keypad::empty()), KeyPoll::Waiting);
        assert!(wait.is_waiting());

        assert_eq!(wait.poll(Keypad::from_bits(0b1100)), KeyPoll::Resolved { target, key: 2 });
        assert_eq!(wait, KeyWait::Idle);
        assert_eq!(wait.poll(Keypad::from_bits(0b1100)), KeyPoll::Idle);
    }
}
