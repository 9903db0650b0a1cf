use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Route};
use crate::audio::{AudioOutput, AudioPlayer};
use crate::catalog::{CatalogLoader, CatalogQuery, Facet, LoadOutcome};
use crate::config;
use crate::ui;

/// Main terminal event loop: applies catalog results, pumps the player,
/// draws, and handles input. Returns `Ok(())` when shutdown is requested.
pub fn run<O: AudioOutput>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut AudioPlayer<O>,
    loader: &mut CatalogLoader,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Some(outcome) = loader.poll() {
            apply_outcome(app, player, outcome);
        }

        player.pump(Instant::now());
        if player.current_track().is_some() {
            app.follow(player.current_index());
        }

        let loading = loader.is_loading();
        terminal.draw(|f| {
            ui::draw(f, app, player, loading, &settings.ui, &settings.controls)
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, loader) {
                    break;
                }
            }
        }
    }

    player.stop();
    Ok(())
}

/// Apply a catalog result. A successful snapshot replaces the list in both
/// the view and the player; a failure keeps everything as it was.
pub(super) fn apply_outcome<O: AudioOutput>(
    app: &mut App,
    player: &mut AudioPlayer<O>,
    outcome: LoadOutcome,
) {
    match outcome.result {
        Ok(tracks) => {
            tracing::info!(count = tracks.len(), query = ?outcome.query, "catalog loaded");
            app.replace_tracks(tracks.clone());
            if outcome.query.is_scoped() {
                app.close_panels();
            }
            app.scope = outcome.query;
            player.load_tracks(tracks);
        }
        Err(e) => {
            tracing::warn!(error = %e, query = ?outcome.query, "catalog request failed");
        }
    }
}

/// Returns `true` when the user asked to quit.
pub(super) fn handle_key_event<O: AudioOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut AudioPlayer<O>,
    loader: &mut CatalogLoader,
) -> bool {
    if app.filter_mode {
        handle_filter_key(key, app, player);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('1') => app.set_route(Route::Tracks),
        KeyCode::Char('2') => app.set_route(Route::Genres),
        KeyCode::Char('/') => {
            app.set_route(Route::Tracks);
            app.close_panels();
            app.enter_filter_mode();
        }
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Enter => match app.active_facet() {
            Some(facet) => open_facet(app, loader, facet),
            None => play_selected(app, player),
        },
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            app.follow_playback_on();
            player.play_pause(Instant::now());
        }
        KeyCode::Char('l') => {
            app.follow_playback_on();
            player.next();
        }
        KeyCode::Char('h') => {
            app.follow_playback_on();
            player.prev();
        }
        KeyCode::Char('L') => {
            player.seek_by(settings.controls.seek_step_percent);
        }
        KeyCode::Char('H') => {
            player.seek_by(-settings.controls.seek_step_percent);
        }
        KeyCode::Char('a') => toggle_panel(app, Facet::Artist),
        KeyCode::Char('b') => toggle_panel(app, Facet::Album),
        KeyCode::Char('n') => toggle_panel(app, Facet::Genre),
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::Char('R') => {
            loader.request(CatalogQuery::All);
        }
        _ => {}
    }

    false
}

fn handle_filter_key<O: AudioOutput>(key: KeyEvent, app: &mut App, player: &mut AudioPlayer<O>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Down => app.next(),
        KeyCode::Up => app.prev(),
        KeyCode::Char('j') | KeyCode::Char('n') if ctrl => app.next(),
        KeyCode::Char('k') | KeyCode::Char('p') if ctrl => app.prev(),
        KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
        KeyCode::Enter => {
            if app.display_indices().is_empty() {
                return;
            }
            app.exit_filter_mode();
            play_selected(app, player);
        }
        _ => {}
    }
}

/// Play the highlighted row. `selected` is an index into the unfiltered
/// list, so it addresses the player's copy directly.
fn play_selected<O: AudioOutput>(app: &mut App, player: &mut AudioPlayer<O>) {
    if !app.has_tracks() {
        return;
    }
    if player.is_playing() && player.current_index() == app.selected {
        return;
    }
    app.follow_playback_on();
    player.play_index(app.selected);
}

fn open_facet(app: &mut App, loader: &mut CatalogLoader, facet: Facet) {
    let Some(query) = app
        .selected_facet_value(facet)
        .map(|value| CatalogQuery::for_facet(facet, value))
    else {
        return;
    };
    loader.request(query);
    app.set_route(Route::Tracks);
}

fn toggle_panel(app: &mut App, facet: Facet) {
    app.set_route(Route::Tracks);
    app.toggle_panel(facet);
}
