use autoname::cli::{AppConfig, Args};
use autoname::config::Settings;
use autoname::domain::Session;
use autoname::logging;
use autoname::prewarm::CacheWarmer;
use autoname::tui::{self, App, TerminalPrompt};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tracing::{info, warn};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Convert to config
    let config: AppConfig = args.into();

    let settings = match Settings::load(config.config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Logging is best effort; the terminal belongs to the UI
    let log_path = logging::init(config.verbose);
    info!(
        scan_dir = %settings.scan_dir.display(),
        output_dir = %settings.output_dir.display(),
        log = ?log_path,
        "Starting autoname"
    );

    // Run the app
    run_app_with_config(&config, settings)
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig, settings: Settings) -> io::Result<()> {
    let warmer = match CacheWarmer::start(&settings.output_dir) {
        Ok(warmer) => Some(warmer),
        Err(e) => {
            warn!(error = %e, "Could not start output directory listing");
            None
        }
    };

    let session = Session::open(&settings.scan_dir, config.discovery_options())?;
    let mut app = App::new(session, settings);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(warmer) = warmer {
        warmer.abandon();
    }
    info!(
        completed = app.session().completed(),
        remaining = app.session().remaining(),
        "Exiting"
    );

    result
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        let screen = app.snapshot();
        terminal.draw(|frame| tui::render(frame, &screen))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let mut prompt = TerminalPrompt::new(terminal, screen);
                if app.handle_key(key, &mut prompt) {
                    break;
                }
            }
        }
    }

    Ok(())
}
