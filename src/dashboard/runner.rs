use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

use super::controller::{Controller, RefreshTimer};
use super::events::{handle_key_event, Action};
use super::ui;
use crate::cli::DashboardArgs;
use crate::sources::HttpSource;

/// Redraw rate while numbers are counting up
const FRAME: Duration = Duration::from_millis(16);
/// Longest we block on input when nothing is moving
const IDLE_POLL: Duration = Duration::from_millis(250);

pub async fn run_dashboard(args: DashboardArgs) -> Result<()> {
    let source = HttpSource::new(args.source.to_config())?;
    let controller = Controller::new(Arc::new(source), args.view, args.animation());
    info!(
        "Starting dashboard: view={}, refresh={}s",
        args.view, args.refresh
    );

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, controller, args.refresh_interval()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("Dashboard exited with error: {:?}", err);
    }
    res
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut controller: Controller,
    refresh_interval: Duration,
) -> Result<()> {
    // Initial load
    controller.refresh();
    let mut timer = RefreshTimer::new(refresh_interval, Instant::now());

    loop {
        let now = Instant::now();
        controller.drain(now);
        terminal.draw(|f| ui::draw(f, &controller, timer.remaining(now), now))?;

        let timeout = if controller.is_animating(now) {
            FRAME
        } else {
            IDLE_POLL.min(timer.remaining(now))
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key_event(key, &mut controller) == Action::Quit
                {
                    info!("Quit requested");
                    return Ok(());
                }
            }
        }

        if timer.poll(Instant::now()) {
            info!("Timer refresh ({})", controller.mode());
            controller.refresh();
        }

        // event::poll blocks this worker; give spawned fetches a turn
        tokio::task::yield_now().await;
    }
}
