//! The central dispatcher: keyboard in, PTY output through the emulators,
//! frames out.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use crate::app::App;
use crate::ui::TerminalPane;

/// Run the multiplexer until a child exits.
///
/// Each iteration handles keyboard input first, then drains both PTYs, so a
/// focus toggle always lands before the same iteration's output. The two
/// PTYs are drained independently; only each PTY's own byte order is
/// preserved.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick = Duration::from_millis(app.config.poll_interval_ms);

    while !app.should_quit {
        // Block up to one tick for the first event, then drain whatever
        // else is already queued. The tick also bounds CPU usage.
        if poll(tick)? {
            loop {
                match read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                    Event::Resize(cols, rows) => {
                        app.resize(cols, rows);
                        // Damage tracking is not valid across a geometry
                        // change; repaint everything.
                        terminal.clear()?;
                    }
                    _ => {}
                }
                if !poll(Duration::ZERO)? {
                    break;
                }
            }
        }
        // A toggle byte with no follow-up this cycle is a focus switch.
        app.finish_input_cycle();

        app.update();

        if app.session_manager.take_bells() {
            terminal.backend_mut().write_all(b"\x07")?;
            terminal.backend_mut().flush()?;
        }

        terminal.draw(|f| draw_ui(f, app))?;
    }

    app.session_manager.shutdown();
    Ok(())
}

fn draw_ui(f: &mut Frame, app: &App) {
    for session in app.session_manager.sessions() {
        let area = session.viewport().to_rect().intersection(f.area());
        if area.width == 0 || area.height == 0 {
            continue;
        }
        let screen = session.screen_state();
        f.render_widget(TerminalPane::new(&screen, session.is_active()), area);
    }
}
