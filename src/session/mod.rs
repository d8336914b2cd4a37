//! Session management for the two shell panes.
//!
//! This module provides:
//! - `SessionManager` - Owns both PTY sessions and tracks keyboard focus
//! - `PtySession` - A single shell process with terminal emulation
//! - Screen state types for rendering

pub mod manager;
pub mod types;

pub use manager::{PtySession, SessionManager, SESSION_COUNT};
pub use types::{screen_state_from_vt100, CellAttrs, ScreenState, TermColor};
