//! Application model types: `App`, `Route` and `Panels`.
//!
//! `App` holds the current catalog snapshot, the cursor into it, the search
//! filter and the facet browser state. Track positions handed to the player
//! are always indices into the unfiltered `tracks`.

use crate::catalog::{CatalogQuery, Facet, Track};

use super::facets::Facets;

/// Top-level views reachable from the sidebar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Tracks,
    Genres,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Tracks, Route::Genres];

    /// Resolve a route path. `/` is an alias for `/tracks`.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" | "/tracks" => Some(Route::Tracks),
            "/genres" => Some(Route::Genres),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Tracks => "/tracks",
            Route::Genres => "/genres",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Tracks => "Tracks",
            Route::Genres => "Genres",
        }
    }
}

/// Visibility of the three facet panels. Any combination may be open.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Panels {
    pub artists: bool,
    pub albums: bool,
    pub genres: bool,
}

impl Panels {
    pub fn is_open(&self, facet: Facet) -> bool {
        match facet {
            Facet::Artist => self.artists,
            Facet::Album => self.albums,
            Facet::Genre => self.genres,
        }
    }

    fn slot(&mut self, facet: Facet) -> &mut bool {
        match facet {
            Facet::Artist => &mut self.artists,
            Facet::Album => &mut self.albums,
            Facet::Genre => &mut self.genres,
        }
    }

    pub fn any(&self) -> bool {
        self.artists || self.albums || self.genres
    }

    /// Open panels in display order.
    pub fn open(&self) -> Vec<Facet> {
        Facet::ALL
            .into_iter()
            .filter(|f| self.is_open(*f))
            .collect()
    }
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,

    // Lower-cased (title, artist) per track, rebuilt with each snapshot.
    lower_keys: Vec<(String, String)>,

    pub follow_playback: bool,

    pub filter_mode: bool,
    pub filter_query: String,

    pub facets: Facets,
    pub panels: Panels,
    facet_cursors: [usize; 3],
    pub focus: Option<Facet>,

    pub route: Route,
    /// The query the current snapshot answers.
    pub scope: CatalogQuery,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        let mut app = Self {
            tracks: Vec::new(),
            selected: 0,
            lower_keys: Vec::new(),
            follow_playback: true,
            filter_mode: false,
            filter_query: String::new(),
            facets: Facets::default(),
            panels: Panels::default(),
            facet_cursors: [0; 3],
            focus: None,
            route: Route::Tracks,
            scope: CatalogQuery::All,
        };
        app.replace_tracks(tracks);
        app
    }

    /// Swap in a new catalog snapshot. The search query is kept; the cursor
    /// and facet cursors start over.
    pub fn replace_tracks(&mut self, tracks: Vec<Track>) {
        self.lower_keys = tracks
            .iter()
            .map(|t| (t.title.to_lowercase(), t.artist.to_lowercase()))
            .collect();
        self.facets = Facets::from_tracks(&tracks);
        self.tracks = tracks;
        self.facet_cursors = [0; 3];
        self.selected = 0;
        self.ensure_selected_visible();
    }

    /// Heading for the track list, naming the facet value it is scoped to.
    pub fn scope_label(&self) -> String {
        match &self.scope {
            CatalogQuery::All => "song list".to_string(),
            CatalogQuery::Artist(v) => format!("tracks by {v}"),
            CatalogQuery::Album(v) => format!("tracks from {v}"),
            CatalogQuery::Genre(v) => format!("{v} tracks"),
        }
    }

    /// Return true if the snapshot contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Unfiltered indices of the tracks visible under the current query, in
    /// list order. A track is visible when the query is a case-insensitive
    /// substring of its title or its artist.
    pub fn display_indices(&self) -> Vec<usize> {
        if self.filter_query.is_empty() {
            return (0..self.tracks.len()).collect();
        }
        let q = self.filter_query.to_lowercase();
        self.lower_keys
            .iter()
            .enumerate()
            .filter(|(_, (title, artist))| title.contains(&q) || artist.contains(&q))
            .map(|(i, _)| i)
            .collect()
    }

    /// Return the next visible index in the current display order after `current`.
    /// Wraps around to the first element.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index in the current display order before `current`.
    /// Wraps around to the last element.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(0) => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
            None => Some(display[display.len() - 1]),
        }
    }

    /// Set the selected track index and ensure it is visible in the display.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    /// Move the cursor onto the playing track when following playback.
    pub fn follow(&mut self, playing: usize) {
        if !self.follow_playback || self.filter_mode || self.selected == playing {
            return;
        }
        if self.display_indices().contains(&playing) {
            self.set_selected(playing);
        }
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Disable follow-playback.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Enter filter mode: enable filtering and adjust cursor behavior.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.follow_playback_off();
        self.ensure_selected_visible();
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    /// Append a character to the filter query and refresh view.
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    /// Remove the last character from the filter query and refresh view.
    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Ensure that `selected` is part of the current filtered view,
    /// otherwise move selection to the first visible track.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    /// Move selection to the next visible track.
    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    /// Move selection to the previous visible track.
    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    /// Open or close one facet panel. Opening focuses it.
    pub fn toggle_panel(&mut self, facet: Facet) {
        let slot = self.panels.slot(facet);
        *slot = !*slot;

        if self.panels.is_open(facet) {
            self.focus = Some(facet);
        } else if self.focus == Some(facet) {
            self.focus = self.panels.open().first().copied();
        }
    }

    pub fn close_panels(&mut self) {
        self.panels = Panels::default();
        self.focus = None;
    }

    /// Move focus to the next open panel, wrapping.
    pub fn cycle_focus(&mut self) {
        let open = self.panels.open();
        if open.is_empty() {
            self.focus = None;
            return;
        }
        let pos = self
            .focus
            .and_then(|f| open.iter().position(|&o| o == f));
        self.focus = Some(match pos {
            Some(p) => open[(p + 1) % open.len()],
            None => open[0],
        });
    }

    pub fn set_route(&mut self, route: Route) {
        self.route = route;
    }

    /// The facet list the cursor keys drive, if any. `None` means the track
    /// table has the cursor.
    pub fn active_facet(&self) -> Option<Facet> {
        match self.route {
            Route::Genres => Some(Facet::Genre),
            Route::Tracks if self.panels.any() => self.focus,
            Route::Tracks => None,
        }
    }

    pub fn facet_cursor(&self, facet: Facet) -> usize {
        self.facet_cursors[facet_slot(facet)]
    }

    pub fn selected_facet_value(&self, facet: Facet) -> Option<&str> {
        self.facets
            .values(facet)
            .get(self.facet_cursor(facet))
            .map(String::as_str)
    }

    /// Move a facet cursor by `delta`, wrapping within its values.
    pub fn move_facet_cursor(&mut self, facet: Facet, delta: isize) {
        let len = self.facets.values(facet).len();
        if len == 0 {
            return;
        }
        let cur = self.facet_cursor(facet) as isize;
        let next = (cur + delta).rem_euclid(len as isize) as usize;
        self.facet_cursors[facet_slot(facet)] = next;
    }

    /// Cursor down in whichever list is active.
    pub fn cursor_down(&mut self) {
        match self.active_facet() {
            Some(facet) => self.move_facet_cursor(facet, 1),
            None => {
                self.follow_playback_off();
                self.next();
            }
        }
    }

    /// Cursor up in whichever list is active.
    pub fn cursor_up(&mut self) {
        match self.active_facet() {
            Some(facet) => self.move_facet_cursor(facet, -1),
            None => {
                self.follow_playback_off();
                self.prev();
            }
        }
    }
}

fn facet_slot(facet: Facet) -> usize {
    match facet {
        Facet::Artist => 0,
        Facet::Album => 1,
        Facet::Genre => 2,
    }
}
