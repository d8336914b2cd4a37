//! PTY session lifecycle and the fixed two-slot session table.
//!
//! Each session owns a shell child process, the master side of its PTY, and
//! a vt100 parser sized to the session's viewport. A dedicated reader thread
//! performs the blocking PTY reads and hands byte buffers to the event loop
//! over a channel, so the loop side never blocks.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use crate::layout::Viewport;
use crate::session::types::{screen_state_from_vt100, ScreenState};

/// Number of sessions the engine manages.
pub const SESSION_COUNT: usize = 2;

/// Resolve the shell to spawn: explicit override, then `$SHELL`, then `/bin/sh`.
fn resolve_shell(configured: Option<&str>) -> String {
    match configured {
        Some(shell) => shell.to_string(),
        None => std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string()),
    }
}

/// A managed PTY session: one shell child, its PTY, and its emulated screen.
pub struct PtySession {
    /// Stable identifier, assigned at creation and never reused.
    id: usize,
    /// Master side of the PTY; also carries the window size. The slave side
    /// is dropped after spawn so the reader sees EOF when the child exits.
    master: Box<dyn MasterPty + Send>,
    /// Child process handle, used for kill/reap on teardown.
    child: Box<dyn Child + Send + Sync>,
    /// Writer to send input to the PTY.
    writer: Box<dyn Write + Send>,
    /// Receiver for PTY output.
    output_rx: Receiver<Vec<u8>>,
    /// Reader thread handle.
    _reader_thread: thread::JoinHandle<()>,
    /// Cleared by the reader thread when the PTY hits EOF (child exited).
    alive: Arc<AtomicBool>,
    /// vt100 parser for terminal emulation.
    parser: vt100::Parser,
    /// The screen region this session renders into.
    viewport: Viewport,
    /// Whether this session has keyboard focus.
    active: bool,
    /// Bell events already surfaced to the host terminal.
    bells_seen: usize,
    terminated: bool,
}

impl PtySession {
    /// Spawn a shell on a fresh PTY sized to the given viewport.
    pub fn spawn(id: usize, shell: Option<&str>, viewport: Viewport) -> Result<Self> {
        let pty_system = native_pty_system();

        let pair = pty_system
            .openpty(PtySize {
                rows: viewport.rows,
                cols: viewport.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to open PTY")?;

        let shell = resolve_shell(shell);
        let mut cmd = CommandBuilder::new(&shell);
        cmd.env("TERM", "xterm-256color");
        cmd.env("COLORTERM", "truecolor");

        let child = pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn shell {shell}"))?;

        let writer = pair.master.take_writer()?;
        let mut reader = pair.master.try_clone_reader()?;

        // Spawn a thread to read PTY output
        let (output_tx, output_rx): (Sender<Vec<u8>>, Receiver<Vec<u8>>) = mpsc::channel();
        let alive = Arc::new(AtomicBool::new(true));
        let alive_flag = Arc::clone(&alive);

        let reader_thread = thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break, // EOF
                    Ok(n) => {
                        if output_tx.send(buf[..n].to_vec()).is_err() {
                            break; // Channel closed
                        }
                    }
                    Err(_) => break,
                }
            }
            // Mark as not alive when the reader thread exits
            alive_flag.store(false, Ordering::SeqCst);
        });

        Ok(Self {
            id,
            master: pair.master,
            child,
            writer,
            output_rx,
            _reader_thread: reader_thread,
            alive,
            parser: vt100::Parser::new(viewport.rows, viewport.cols, 0),
            viewport,
            active: false,
            bells_seen: 0,
            terminated: false,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Check if the shell child is still running.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Drain pending PTY output into the vt100 parser.
    /// Returns true if any output was processed.
    pub fn process_output(&mut self) -> bool {
        let mut had_output = false;
        while let Ok(data) = self.output_rx.try_recv() {
            self.parser.process(&data);
            had_output = true;
        }
        had_output
    }

    /// Write keyboard input to the PTY.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Resize both the PTY and the emulated screen to a new viewport.
    ///
    /// The child observes the PTY size change as a window-change signal.
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        self.master
            .resize(PtySize {
                rows: viewport.rows,
                cols: viewport.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to resize PTY")?;

        self.parser.set_size(viewport.rows, viewport.cols);
        self.viewport = viewport;
        Ok(())
    }

    /// Snapshot the emulated screen for rendering.
    pub fn screen_state(&self) -> ScreenState {
        screen_state_from_vt100(&self.parser)
    }

    /// True when the session rang its bell since the last check.
    pub fn take_bell(&mut self) -> bool {
        let count = self.parser.screen().audible_bell_count();
        let rang = count > self.bells_seen;
        self.bells_seen = count;
        rang
    }

    /// Kill and reap the shell child. Idempotent.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        if !matches!(self.child.try_wait(), Ok(Some(_))) {
            if let Err(err) = self.child.kill() {
                log::warn!("session {}: failed to kill child: {err}", self.id);
            }
        }
        if let Err(err) = self.child.wait() {
            log::warn!("session {}: failed to reap child: {err}", self.id);
        }
    }
}

/// Owns both PTY sessions and tracks which one has keyboard focus.
pub struct SessionManager {
    /// Ordered session list; index is the session id.
    sessions: Vec<PtySession>,
    /// Index of the focused session.
    active: usize,
}

impl SessionManager {
    /// Spawn one session per viewport. The first session starts focused.
    pub fn spawn(shell: Option<&str>, viewports: &[Viewport]) -> Result<Self> {
        let mut sessions = Vec::with_capacity(viewports.len());
        for (id, viewport) in viewports.iter().enumerate() {
            let mut session = PtySession::spawn(id, shell, *viewport)
                .with_context(|| format!("Failed to start session {id}"))?;
            session.set_active(id == 0);
            sessions.push(session);
        }
        Ok(Self {
            sessions,
            active: 0,
        })
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The session that currently receives keyboard input.
    pub fn active_session(&mut self) -> &mut PtySession {
        &mut self.sessions[self.active]
    }

    /// Move keyboard focus to the next session.
    pub fn toggle_active(&mut self) {
        self.sessions[self.active].set_active(false);
        self.active = (self.active + 1) % self.sessions.len();
        self.sessions[self.active].set_active(true);
    }

    pub fn sessions(&self) -> &[PtySession] {
        &self.sessions
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut PtySession> {
        self.sessions.get_mut(id)
    }

    /// Drain PTY output for all sessions.
    pub fn process_all_output(&mut self) -> bool {
        let mut had_output = false;
        for session in &mut self.sessions {
            had_output |= session.process_output();
        }
        had_output
    }

    /// True if any session's child has exited.
    pub fn any_exited(&self) -> bool {
        self.sessions.iter().any(|s| !s.is_alive())
    }

    /// True when any session rang its bell since the last check.
    pub fn take_bells(&mut self) -> bool {
        let mut rang = false;
        for session in &mut self.sessions {
            rang |= session.take_bell();
        }
        rang
    }

    /// Reapply the viewport split to every session.
    ///
    /// Resize failures (for instance on an already-closed PTY) are reported
    /// and otherwise ignored; they must not take the loop down.
    pub fn resize_all(&mut self, viewports: &[Viewport]) {
        for (session, viewport) in self.sessions.iter_mut().zip(viewports) {
            if let Err(err) = session.resize(*viewport) {
                log::warn!("session {}: resize failed: {err:#}", session.id());
            }
        }
    }

    /// Terminate every session. Idempotent.
    pub fn shutdown(&mut self) {
        for session in &mut self.sessions {
            session.terminate();
        }
    }
}
