mod app;
mod config;
mod event;
mod ui;

use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::App;
use config::Config;
use event::{Event, EventHandler};

type Term = Terminal<CrosstermBackend<Stdout>>;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    config.validate()?;

    if let Some(path) = &config.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    // Setup terminal
    enable_raw_mode()?;
    let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    let mut terminal = match Terminal::new(CrosstermBackend::new(io::stdout())) {
        Ok(terminal) => terminal,
        Err(err) => {
            if let Err(restore) = disable_raw_mode() {
                warn!(error = %restore, "failed to leave raw mode");
            }
            return Err(err.into());
        }
    };
    info!(enhanced, "terminal ready");

    let result = enter_screen(&mut terminal, enhanced).and_then(|()| run(&mut terminal, &config));
    let restored = restore_terminal(&mut terminal, enhanced);

    if let Err(err) = &result {
        warn!(error = %err, "exited with error");
    }
    result?;
    restored.context("restoring the terminal")?;
    Ok(())
}

fn enter_screen(terminal: &mut Term, enhanced: bool) -> anyhow::Result<()> {
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    if enhanced {
        execute!(
            terminal.backend_mut(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    terminal.clear()?;
    Ok(())
}

/// Runs every restore step even when an earlier one fails.
fn restore_terminal(terminal: &mut Term, enhanced: bool) -> io::Result<()> {
    let pop = if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
    } else {
        Ok(())
    };
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    first_error([pop, raw, screen, cursor])
}

/// The first failure among already-completed steps, in order.
fn first_error<const N: usize>(results: [io::Result<()>; N]) -> io::Result<()> {
    results.into_iter().collect()
}

fn run(terminal: &mut Term, config: &Config) -> anyhow::Result<()> {
    let mut app = App::new(config);
    let events = EventHandler::new(config.frame_interval());

    loop {
        let snapshot = app.snapshot();
        terminal.draw(|frame| ui::render(frame, &snapshot))?;

        match events.next()? {
            Event::Frame => app.on_frame(),
            Event::Key(key) => app.on_key(key),
        }

        if app.should_quit {
            info!("quit requested");
            return Ok(());
        }
    }
}
