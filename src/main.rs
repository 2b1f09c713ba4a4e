use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use visitwatch::ui::{self, Theme};
use visitwatch::{date, events, load, AnalyticsSource, App, FixtureSource, HttpSource, Settings};

#[derive(Parser, Debug)]
#[command(name = "visitwatch")]
#[command(about = "Terminal dashboard for website visit analytics")]
struct Args {
    /// Config file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Origin of the analytics proxy (overrides config)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Read payloads from a directory of captured responses instead of HTTP
    #[arg(short, long, conflicts_with = "base_url")]
    fixtures: Option<PathBuf>,

    /// Report date (YYYY-MM-DD); defaults to yesterday
    #[arg(short, long, value_parser = parse_date)]
    date: Option<String>,

    /// Fetch once, export the merged state to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Log file (overrides config)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_date(s: &str) -> Result<String, String> {
    date::parse_report_date(s)
        .map(date::format_report_date)
        .ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }

    init_logging(&settings)?;

    let source: Arc<dyn AnalyticsSource> = match args.fixtures {
        Some(ref dir) => Arc::new(FixtureSource::new(dir)),
        None => Arc::new(
            HttpSource::builder()
                .base_url(settings.base_url.clone())
                .timeout(settings.timeout())
                .navigation_policy(settings.navigation_policy())
                .build()?,
        ),
    };

    tracing::info!(source = source.description(), "Starting visitwatch");

    // The runtime drives the background fetches while the UI owns the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        let report_date = args.date.unwrap_or_else(date::yesterday_local);
        return rt.block_on(export_to_file(
            source,
            &settings.proxy_prefix,
            &report_date,
            &export_path,
        ));
    }

    let mut app = App::new(source, &settings.proxy_prefix).with_theme(Theme::auto_detect());
    if let Some(report_date) = args.date {
        app = app.with_report_date(report_date);
    }

    run_tui(app)
}

/// Send tracing output to a file; the terminal belongs to the UI.
fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("opening log file {}", settings.log_file.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Run the TUI for the given app
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    visitwatch::terminal::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal if the UI thread panics; fetch tasks are contained
    visitwatch::terminal::install_panic_hook(|| {
        let _ = visitwatch::terminal::restore();
    });

    app.mount();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    app.unmount();

    // Restore terminal
    visitwatch::terminal::restore()?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        app.poll_session();
    }

    Ok(())
}

/// Fetch once and write the merged dashboard state to a JSON file
async fn export_to_file(
    source: Arc<dyn AnalyticsSource>,
    prefix: &str,
    report_date: &str,
    export_path: &Path,
) -> Result<()> {
    let data = load(source, prefix, report_date).await.into_data(report_date);

    std::fs::write(export_path, data.to_json()?)
        .with_context(|| format!("writing {}", export_path.display()))?;

    match data.load_error {
        Some(ref err) => println!(
            "Export of {} failed ({}); wrote defaults to {}",
            report_date,
            err,
            export_path.display()
        ),
        None => println!(
            "Exported {} ({} failed requests) to {}",
            report_date,
            data.failures.len(),
            export_path.display()
        ),
    }
    Ok(())
}
