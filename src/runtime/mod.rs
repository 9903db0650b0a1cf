use std::env;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioPlayer, RodioOutput};
use crate::catalog::{CatalogClient, CatalogLoader, CatalogQuery};
use crate::config;

mod event_loop;
mod logging;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = startup::Args::parse(env::args().skip(1));
    if args.print_config {
        print!("{}", config::Settings::default().to_toml()?);
        return Ok(());
    }

    let settings = settings::load_settings(args.base_url.as_deref());

    let log_path = logging::init(&settings.logging);
    tracing::info!(
        base_url = %settings.catalog.base_url,
        log = ?log_path,
        config = ?config::resolve_config_path(),
        "starting cadenza"
    );

    let client = CatalogClient::new(&settings.catalog)?;
    let output = RodioOutput::open(startup::audio_http(&settings)?)?;
    let mut player = AudioPlayer::new(
        output,
        client.base_url(),
        Duration::from_millis(settings.playback.progress_interval_ms),
    );
    let mut loader = CatalogLoader::new(client);

    let mut app = App::new(Vec::new());
    app.follow_playback = settings.ui.follow_playback;
    app.set_route(args.route);

    loader.request(CatalogQuery::All);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut app, &mut player, &mut loader);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!(error = %e, "event loop failed");
    }
    run_result
}
