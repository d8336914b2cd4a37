//! Keyboard byte routing.
//!
//! Every keystroke is lowered to the raw bytes a terminal would send and
//! classified by [`InputRouter`]: either the byte belongs to the focused
//! session, or it is part of the Ctrl+A focus-toggle sequence.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The reserved focus-toggle byte (Ctrl+A).
pub const TOGGLE_BYTE: u8 = 0x01;

/// Routing decision for one keyboard byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Deliver the byte to the focused session's PTY.
    Forward(u8),
    /// Switch keyboard focus to the other session.
    ToggleFocus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouterState {
    Normal,
    /// A toggle byte arrived; the next byte (or the end of the poll cycle)
    /// decides whether this is a focus switch or a literal keystroke.
    AwaitingSecond,
}

/// Classifies keyboard bytes as session input or focus-toggle commands.
///
/// A lone Ctrl+A switches focus. Ctrl+A twice in quick succession switches
/// exactly once, and the first byte after a switch is always forwarded
/// verbatim, so pressing Ctrl+A three times delivers a literal 0x01 to the
/// newly focused session.
#[derive(Debug)]
pub struct InputRouter {
    state: RouterState,
    /// Set when a toggle fires; the next byte is forwarded untouched.
    suppress_next: bool,
}

impl InputRouter {
    pub fn new() -> Self {
        Self {
            state: RouterState::Normal,
            suppress_next: false,
        }
    }

    /// Classify one keyboard byte.
    ///
    /// Returns `None` when the byte is held back as a potential toggle
    /// prefix; call [`end_of_cycle`](Self::end_of_cycle) once the current
    /// poll cycle has no more input to resolve it.
    pub fn feed(&mut self, byte: u8) -> Option<Routed> {
        match self.state {
            RouterState::Normal => {
                if self.suppress_next {
                    self.suppress_next = false;
                    Some(Routed::Forward(byte))
                } else if byte == TOGGLE_BYTE {
                    self.state = RouterState::AwaitingSecond;
                    None
                } else {
                    Some(Routed::Forward(byte))
                }
            }
            RouterState::AwaitingSecond => {
                self.state = RouterState::Normal;
                if byte == TOGGLE_BYTE {
                    self.suppress_next = true;
                    Some(Routed::ToggleFocus)
                } else {
                    // The lone toggle byte is swallowed; only the follow
                    // byte goes to the still-focused session.
                    Some(Routed::Forward(byte))
                }
            }
        }
    }

    /// Resolve a pending toggle prefix at the end of a poll cycle.
    ///
    /// A toggle byte with no follow-up within one cycle is a focus switch.
    pub fn end_of_cycle(&mut self) -> Option<Routed> {
        if self.state == RouterState::AwaitingSecond {
            self.state = RouterState::Normal;
            self.suppress_next = true;
            Some(Routed::ToggleFocus)
        } else {
            None
        }
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower a key event to the bytes a terminal would send for it.
pub fn key_to_bytes(key: KeyEvent) -> Vec<u8> {
    match (key.code, key.modifiers) {
        (KeyCode::Char(c), KeyModifiers::NONE) => vec![c as u8],
        (KeyCode::Char(c), KeyModifiers::SHIFT) => vec![c.to_ascii_uppercase() as u8],
        (KeyCode::Char(c), KeyModifiers::CONTROL) => {
            // Control characters: Ctrl+A = 0x01, Ctrl+B = 0x02, etc.
            let ctrl = (c.to_ascii_lowercase() as u8)
                .wrapping_sub(b'a')
                .wrapping_add(1);
            vec![ctrl]
        }
        (KeyCode::Enter, _) => vec![b'\r'],
        (KeyCode::Backspace, _) => vec![0x7f],
        (KeyCode::Tab, _) => vec![b'\t'],
        (KeyCode::BackTab, _) => vec![0x1b, b'[', b'Z'],
        (KeyCode::Esc, _) => vec![0x1b],
        (KeyCode::Up, _) => vec![0x1b, b'[', b'A'],
        (KeyCode::Down, _) => vec![0x1b, b'[', b'B'],
        (KeyCode::Right, _) => vec![0x1b, b'[', b'C'],
        (KeyCode::Left, _) => vec![0x1b, b'[', b'D'],
        (KeyCode::Home, _) => vec![0x1b, b'[', b'H'],
        (KeyCode::End, _) => vec![0x1b, b'[', b'F'],
        (KeyCode::PageUp, _) => vec![0x1b, b'[', b'5', b'~'],
        (KeyCode::PageDown, _) => vec![0x1b, b'[', b'6', b'~'],
        (KeyCode::Delete, _) => vec![0x1b, b'[', b'3', b'~'],
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_bytes_forwarded() {
        let mut router = InputRouter::new();
        assert_eq!(router.feed(b'l'), Some(Routed::Forward(b'l')));
        assert_eq!(router.feed(b's'), Some(Routed::Forward(b's')));
        assert_eq!(router.end_of_cycle(), None);
    }

    #[test]
    fn test_lone_toggle_switches_once() {
        let mut router = InputRouter::new();
        assert_eq!(router.feed(TOGGLE_BYTE), None);
        assert_eq!(router.end_of_cycle(), Some(Routed::ToggleFocus));
        // The cycle is resolved; nothing further is pending.
        assert_eq!(router.end_of_cycle(), None);
    }

    #[test]
    fn test_double_tap_switches_exactly_once() {
        let mut router = InputRouter::new();
        assert_eq!(router.feed(TOGGLE_BYTE), None);
        assert_eq!(router.feed(TOGGLE_BYTE), Some(Routed::ToggleFocus));
        assert_eq!(router.end_of_cycle(), None);
    }

    #[test]
    fn test_triple_tap_sends_literal_toggle_byte() {
        let mut router = InputRouter::new();
        assert_eq!(router.feed(TOGGLE_BYTE), None);
        assert_eq!(router.feed(TOGGLE_BYTE), Some(Routed::ToggleFocus));
        // Suppression forwards the third tap verbatim to the new session.
        assert_eq!(router.feed(TOGGLE_BYTE), Some(Routed::Forward(TOGGLE_BYTE)));
        assert_eq!(router.end_of_cycle(), None);
    }

    #[test]
    fn test_toggle_then_other_byte_forwards_only_follow_byte() {
        let mut router = InputRouter::new();
        assert_eq!(router.feed(TOGGLE_BYTE), None);
        assert_eq!(router.feed(b'x'), Some(Routed::Forward(b'x')));
        // No switch happened, so no suppression either.
        assert_eq!(router.end_of_cycle(), None);
        assert_eq!(router.feed(TOGGLE_BYTE), None);
        assert_eq!(router.end_of_cycle(), Some(Routed::ToggleFocus));
    }

    #[test]
    fn test_suppression_consumed_by_next_byte() {
        let mut router = InputRouter::new();
        router.feed(TOGGLE_BYTE);
        assert_eq!(router.end_of_cycle(), Some(Routed::ToggleFocus));
        // First byte after the switch is ordinary input.
        assert_eq!(router.feed(b'p'), Some(Routed::Forward(b'p')));
        // Suppression is one-shot: a toggle byte now starts a new sequence.
        assert_eq!(router.feed(TOGGLE_BYTE), None);
        assert_eq!(router.end_of_cycle(), Some(Routed::ToggleFocus));
    }

    #[test]
    fn test_key_to_bytes_basics() {
        let key = |code, mods| KeyEvent::new(code, mods);

        assert_eq!(
            key_to_bytes(key(KeyCode::Char('a'), KeyModifiers::CONTROL)),
            vec![TOGGLE_BYTE]
        );
        assert_eq!(key_to_bytes(key(KeyCode::Char('l'), KeyModifiers::NONE)), vec![b'l']);
        assert_eq!(key_to_bytes(key(KeyCode::Enter, KeyModifiers::NONE)), vec![b'\r']);
        assert_eq!(
            key_to_bytes(key(KeyCode::Up, KeyModifiers::NONE)),
            vec![0x1b, b'[', b'A']
        );
        assert!(key_to_bytes(key(KeyCode::F(5), KeyModifiers::NONE)).is_empty());
    }
}
