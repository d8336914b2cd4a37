use std::fs::File;
use std::io;
use std::io::IsTerminal;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use simplelog::{LevelFilter, WriteLogger};

use twinterm::app::App;
use twinterm::config::Config;
use twinterm::event_loop::run_app;

fn main() -> Result<()> {
    // Check if we're in a proper terminal
    if !io::stdin().is_terminal() {
        anyhow::bail!("twinterm must be run in an interactive terminal");
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    config.validate();

    if let Some(ref path) = config.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        WriteLogger::init(LevelFilter::Info, simplelog::Config::default(), file)
            .context("Failed to initialize logger")?;
    }

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode - are you in a terminal?")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Spawn both shells sized to the physical terminal
    let result = terminal
        .size()
        .context("Failed to query terminal size")
        .and_then(|size| App::new(config, size.width, size.height))
        .and_then(|mut app| run_app(&mut terminal, &mut app));

    // Restore terminal (always try to restore even on error)
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}
