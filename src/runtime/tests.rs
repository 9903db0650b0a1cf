use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event_loop::{apply_outcome, handle_key_event};
use crate::app::{App, Route};
use crate::audio::testing::FakeOutput;
use crate::audio::{AudioPlayer, PlayerState};
use crate::catalog::{CatalogClient, CatalogLoader, CatalogQuery, Facet, FetchError, LoadOutcome, Track};
use crate::config::Settings;

// Nothing listens here; requests fail fast and are never awaited.
const BASE: &str = "http://127.0.0.1:9";

struct Harness {
    settings: Settings,
    app: App,
    player: AudioPlayer<FakeOutput>,
    out: FakeOutput,
    loader: CatalogLoader,
}

impl Harness {
    fn new() -> Self {
        let out = FakeOutput::default();
        let client = CatalogClient::with_http(reqwest::blocking::Client::new(), BASE);
        Self {
            settings: Settings::default(),
            app: App::new(Vec::new()),
            player: AudioPlayer::new(out.clone(), BASE, Duration::from_secs(1)),
            out,
            loader: CatalogLoader::new(client),
        }
    }

    fn deliver(&mut self, query: CatalogQuery, tracks: Vec<Track>) {
        let outcome = LoadOutcome {
            token: 1,
            query,
            result: Ok(tracks),
        };
        apply_outcome(&mut self.app, &mut self.player, outcome);
    }

    fn press(&mut self, code: KeyCode) -> bool {
        self.press_with(code, KeyModifiers::NONE)
    }

    fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        handle_key_event(
            KeyEvent::new(code, modifiers),
            &self.settings,
            &mut self.app,
            &mut self.player,
            &mut self.loader,
        )
    }

    fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    fn last_load(&self) -> Option<String> {
        self.out.0.borrow().loads.last().cloned()
    }
}

fn track(title: &str, artist: &str, genre: &str) -> Track {
    Track {
        title: title.into(),
        artist: artist.into(),
        album: format!("{artist} album"),
        genre: genre.into(),
        src: format!("audio/{}.mp3", title.to_lowercase().replace(' ', "_")),
    }
}

fn catalog() -> Vec<Track> {
    vec![
        track("Bohemian Rhapsody", "Queen", "Rock"),
        track("So What", "Miles Davis", "Jazz"),
        track("Clair de Lune", "Debussy", "Classical"),
    ]
}

#[test]
fn snapshot_replaces_list_and_starts_first_track() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());

    assert_eq!(h.app.tracks.len(), 3);
    assert_eq!(h.player.state(), PlayerState::Loading);
    assert_eq!(h.player.current_index(), 0);
    assert_eq!(
        h.last_load().as_deref(),
        Some("http://127.0.0.1:9/audio/bohemian_rhapsody.mp3")
    );
}

#[test]
fn scoped_snapshot_closes_all_panels() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());
    h.press(KeyCode::Char('a'));
    h.press(KeyCode::Char('n'));
    assert!(h.app.panels.any());

    h.deliver(CatalogQuery::Genre("Jazz".into()), vec![track("So What", "Miles Davis", "Jazz")]);
    assert!(!h.app.panels.any());
    assert_eq!(h.app.focus, None);
    assert_eq!(h.app.tracks.len(), 1);
    assert_eq!(h.app.scope, CatalogQuery::Genre("Jazz".into()));
}

#[test]
fn failed_request_keeps_previous_list() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());
    let loads = h.out.0.borrow().loads.len();

    let outcome = LoadOutcome {
        token: 2,
        query: CatalogQuery::Artist("Queen".into()),
        result: Err(FetchError::Status {
            status: 500,
            url: format!("{BASE}/artists/Queen"),
        }),
    };
    apply_outcome(&mut h.app, &mut h.player, outcome);

    assert_eq!(h.app.tracks.len(), 3);
    assert_eq!(h.app.scope, CatalogQuery::All);
    assert_eq!(h.out.0.borrow().loads.len(), loads);
}

#[test]
fn search_enter_plays_unfiltered_index() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());

    h.press(KeyCode::Char('/'));
    assert!(h.app.filter_mode);
    h.type_str("debussy");
    assert_eq!(h.app.display_indices(), vec![2]);

    h.press(KeyCode::Enter);
    assert!(!h.app.filter_mode);
    assert_eq!(h.player.current_index(), 2);
    assert_eq!(
        h.last_load().as_deref(),
        Some("http://127.0.0.1:9/audio/clair_de_lune.mp3")
    );
}

#[test]
fn search_keys_do_not_trigger_transport() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());
    let loads = h.out.0.borrow().loads.len();

    h.press(KeyCode::Char('/'));
    h.type_str("q lh");
    assert_eq!(h.app.filter_query, "q lh");
    assert_eq!(h.out.0.borrow().loads.len(), loads);

    h.press(KeyCode::Backspace);
    assert_eq!(h.app.filter_query, "q l");
    h.press(KeyCode::Esc);
    assert!(h.app.filter_query.is_empty());
    assert!(!h.app.filter_mode);
}

#[test]
fn search_enter_with_empty_view_stays_in_search() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());
    h.press(KeyCode::Char('/'));
    h.type_str("zzz");

    h.press(KeyCode::Enter);
    assert!(h.app.filter_mode);
    assert_eq!(h.player.current_index(), 0);
}

#[test]
fn ctrl_keys_move_cursor_while_searching() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());
    h.press(KeyCode::Char('/'));

    h.press_with(KeyCode::Char('j'), KeyModifiers::CONTROL);
    assert_eq!(h.app.selected, 1);
    assert!(h.app.filter_query.is_empty());
    h.press_with(KeyCode::Char('k'), KeyModifiers::CONTROL);
    assert_eq!(h.app.selected, 0);
}

#[test]
fn transport_keys_drive_player() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());
    h.out.start(Duration::from_secs(200));
    h.player.pump(Instant::now());
    assert_eq!(h.player.state(), PlayerState::Playing);

    h.press(KeyCode::Char(' '));
    assert_eq!(h.player.state(), PlayerState::Paused);
    h.press(KeyCode::Char('p'));
    assert_eq!(h.player.state(), PlayerState::Playing);

    h.press(KeyCode::Char('L'));
    assert_eq!(h.out.0.borrow().seeks.last(), Some(&Duration::from_secs(10)));

    h.press(KeyCode::Char('l'));
    assert_eq!(h.player.current_index(), 1);
    h.press(KeyCode::Char('h'));
    h.press(KeyCode::Char('h'));
    assert_eq!(h.player.current_index(), 2);
}

#[test]
fn enter_on_playing_row_does_not_restart() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());
    h.out.start(Duration::from_secs(200));
    h.player.pump(Instant::now());
    let loads = h.out.0.borrow().loads.len();

    h.press(KeyCode::Enter);
    assert_eq!(h.out.0.borrow().loads.len(), loads);

    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Enter);
    assert_eq!(h.player.current_index(), 1);
}

#[test]
fn transport_keys_are_noops_without_tracks() {
    let mut h = Harness::new();
    for code in [KeyCode::Char(' '), KeyCode::Char('l'), KeyCode::Char('h'), KeyCode::Enter] {
        h.press(code);
    }
    assert!(h.out.0.borrow().loads.is_empty());
    assert_eq!(h.player.state(), PlayerState::Idle);
}

#[test]
fn enter_on_genre_requests_scoped_catalog() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());
    h.press(KeyCode::Char('2'));
    assert_eq!(h.app.route, Route::Genres);
    assert_eq!(h.app.active_facet(), Some(Facet::Genre));

    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Enter);

    assert!(h.loader.is_loading());
    assert_eq!(h.app.route, Route::Tracks);
}

#[test]
fn panel_keys_open_tracks_route_panels() {
    let mut h = Harness::new();
    h.deliver(CatalogQuery::All, catalog());
    h.press(KeyCode::Char('2'));

    h.press(KeyCode::Char('b'));
    assert_eq!(h.app.route, Route::Tracks);
    assert_eq!(h.app.active_facet(), Some(Facet::Album));

    h.press(KeyCode::Char('a'));
    h.press(KeyCode::Tab);
    assert_eq!(h.app.focus, Some(Facet::Album));
}

#[test]
fn reload_requests_all_tracks() {
    let mut h = Harness::new();
    assert!(!h.loader.is_loading());
    h.press(KeyCode::Char('R'));
    assert!(h.loader.is_loading());
}

#[test]
fn q_quits() {
    let mut h = Harness::new();
    assert!(!h.press(KeyCode::Char('x')));
    assert!(h.press(KeyCode::Char('q')));
}

#[tokio::test(flavor = "multi_thread")]
async fn audio_client_gives_up_on_stalled_download() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut settings = Settings::default();
    settings.playback.download_timeout_secs = 1;
    let uri = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let http = super::startup::audio_http(&settings).unwrap();
        http.get(format!("{uri}/stall.mp3")).send()
    })
    .await
    .unwrap();

    assert!(result.unwrap_err().is_timeout());
}
