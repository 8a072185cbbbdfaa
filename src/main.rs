use orbat_rs::{actions, app, config, event, svg, ui};

use anyhow::{Context, Result};
use app::AppState;
use clap::Parser;
use config::{load_config, CliArgs};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Quiet period after the last edit before an auto-save.
const AUTO_SAVE_DELAY: Duration = Duration::from_secs(2);

fn init_logging(args: &CliArgs) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orbat_rs=info"));

    if let Some(ref path) = args.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.is_headless() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    // Without a log file the TUI owns the terminal, so nothing is installed.
    Ok(())
}

fn run_headless(args: &CliArgs, app: &mut AppState) -> Result<()> {
    if let Some(ref path) = args.export_json {
        app.save_to(path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    if let Some(ref path) = args.export_svg {
        let markup = svg::export_svg(&app.doc, &app.config.layout, app.color_preset);
        fs::write(path, markup).with_context(|| format!("cannot write {}", path.display()))?;
        info!(path = %path.display(), "exported svg");
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();
    init_logging(&args)?;

    // Load configuration
    let config = load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    // Create application state
    let mut app = AppState::new(config);

    // Load file if provided; a missing file starts a new document under that name
    if let Some(ref filename) = args.filename {
        if filename.exists() {
            app.load_file(filename)
                .with_context(|| format!("cannot open {}", filename.display()))?;
        } else {
            info!(path = %filename.display(), "starting a new document");
            app.filename = Some(filename.clone());
        }
    }

    if args.is_headless() {
        return run_headless(&args, &mut app);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Clear the terminal
    terminal.clear()?;

    // Run the main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Handle any errors from the main loop
    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    while app.running {
        // Draw the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if let Some(action) = event::handle_events(app)? {
            app.clear_message();
            actions::execute_action(action, app)?;
        }

        // Auto-save if enabled
        if app.config.auto_save && app.filename.is_some() && app.is_dirty {
            let should_save = app
                .last_modify_time
                .is_some_and(|last_modify| last_modify.elapsed() >= AUTO_SAVE_DELAY);

            if should_save {
                match app.save() {
                    Ok(path) => info!(path = %path.display(), "auto-saved"),
                    Err(e) => {
                        warn!(error = %e, "auto-save failed");
                        app.set_message(format!("Auto-save failed: {}", e));
                        // Back off before retrying.
                        app.last_modify_time = Some(Instant::now() + AUTO_SAVE_DELAY * 5);
                    }
                }
            }
        }
    }

    Ok(())
}
