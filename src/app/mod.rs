//! Application state threaded through the event loop.

use anyhow::{Context, Result};
use crossterm::event::KeyEvent;

use crate::config::Config;
use crate::input::{key_to_bytes, InputRouter, Routed};
use crate::keylog::KeystrokeLog;
use crate::layout::{split_stacked, Viewport};
use crate::session::{SessionManager, SESSION_COUNT};

/// The single owned context for one run of the multiplexer.
///
/// Everything the event loop mutates lives here: the session table, the
/// keyboard router, the keystroke log, and the shutdown flag. There are no
/// ambient globals; the loop borrows this value for its whole lifetime.
pub struct App {
    pub config: Config,
    /// Both PTY sessions plus the focus index.
    pub session_manager: SessionManager,
    /// Classifies keyboard bytes into session input and focus toggles.
    pub input_router: InputRouter,
    /// Verbatim record of every raw keyboard byte.
    pub keystroke_log: KeystrokeLog,
    /// Current stacked split of the physical screen.
    pub viewports: [Viewport; SESSION_COUNT],
    /// Set when any child exits; the loop's sole exit condition.
    pub should_quit: bool,
}

impl App {
    /// Spawn both sessions sized to the physical terminal and open the
    /// keystroke log. Failures here are fatal for the whole program.
    pub fn new(config: Config, term_cols: u16, term_rows: u16) -> Result<Self> {
        let viewports = split_stacked(term_rows, term_cols);
        let session_manager = SessionManager::spawn(config.shell.as_deref(), &viewports)
            .context("Failed to start shell sessions")?;
        let keystroke_log = KeystrokeLog::create(&config.keystroke_log)?;

        Ok(Self {
            config,
            session_manager,
            input_router: InputRouter::new(),
            keystroke_log,
            viewports,
            should_quit: false,
        })
    }

    /// Route one key event: log each raw byte, then forward or toggle.
    pub fn handle_key(&mut self, key: KeyEvent) {
        for byte in key_to_bytes(key) {
            if let Err(err) = self.keystroke_log.record(byte) {
                log::warn!("keystroke log write failed: {err:#}");
            }
            if let Some(routed) = self.input_router.feed(byte) {
                self.dispatch(routed);
            }
        }
    }

    /// Resolve a pending focus toggle once this iteration's input is
    /// drained, and push logged bytes to disk.
    pub fn finish_input_cycle(&mut self) {
        if let Some(routed) = self.input_router.end_of_cycle() {
            self.dispatch(routed);
        }
        if let Err(err) = self.keystroke_log.flush() {
            log::warn!("keystroke log flush failed: {err:#}");
        }
    }

    fn dispatch(&mut self, routed: Routed) {
        match routed {
            Routed::Forward(byte) => {
                let session = self.session_manager.active_session();
                if let Err(err) = session.write(&[byte]) {
                    log::warn!("session {}: input write failed: {err:#}", session.id());
                }
            }
            Routed::ToggleFocus => self.session_manager.toggle_active(),
        }
    }

    /// Recompute the stacked split for a new physical size and reapply it
    /// to both sessions.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewports = split_stacked(rows, cols);
        self.session_manager.resize_all(&self.viewports);
    }

    /// Drain PTY output and pick up child-exit notifications.
    ///
    /// Losing either child shuts the whole engine down; sessions are never
    /// restarted.
    pub fn update(&mut self) {
        self.session_manager.process_all_output();
        if !self.should_quit && self.session_manager.any_exited() {
            log::info!("a shell exited; shutting down");
            self.should_quit = true;
        }
    }
}
