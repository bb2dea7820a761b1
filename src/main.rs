use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use taskboard::board::TaskBoard;
use taskboard::{cli, storage, ui};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let matches = cli::build().get_matches();
    let path = match matches.get_one::<String>("file") {
        Some(file) => PathBuf::from(file),
        None => storage::data_file(),
    };

    if matches.subcommand().is_none() {
        // The TUI owns the terminal; installing a stderr subscriber would
        // corrupt the raw-mode screen.
        return run_tui(&path);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    cli::run(&matches, &path)
}

fn run_tui(path: &Path) -> Result<()> {
    let mut board = TaskBoard::load_from(path)?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut board, path);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Save tasks
    board.save_to(path)?;

    result?;
    Ok(())
}
