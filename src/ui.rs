//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`: a
//! sidebar with the routes, the active route's view, and the always-visible
//! playback panel.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Row, Table, TableState, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Route};
use crate::audio::{AudioOutput, AudioPlayer, format_clock, format_duration_label};
use crate::catalog::Facet;
use crate::config::{ControlsSettings, UiSettings};

pub const LOADING_PLACEHOLDER: &str = "Loading tracks...";
const SEARCH_PLACEHOLDER: &str = "Search by title or artist...";

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("1/2".to_string(), "tracks/genres".to_string());
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "play / open".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L is filled dynamically from config.
    map.insert("/".to_string(), "search".to_string());
    map.insert("a/b/n".to_string(), "artists/albums/genres".to_string());
    map.insert("tab".to_string(), "next panel".to_string());
    map.insert("R".to_string(), "all tracks".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_step_percent: f64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "1/2", "j/k", "enter", "space/p", "h/l", "H/L", "/", "a/b/n", "tab", "R", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}%", seek_step_percent))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Window of `total` rows that fits `height` and keeps `sel_pos` centered
/// when possible. Returns `(start, end, selected position within window)`.
fn visible_window(total: usize, height: usize, sel_pos: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, sel_pos);
    }
    let half = height / 2;
    let mut start = sel_pos.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, sel_pos - start)
}

fn padded_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame`.
pub fn draw<O: AudioOutput>(
    frame: &mut Frame,
    app: &App,
    player: &AudioPlayer<O>,
    catalog_loading: bool,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let mut header_text = ui_settings.header_text.clone();
    if catalog_loading {
        header_text.push_str(" • fetching catalog");
    }
    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, rows[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(18),
            Constraint::Min(20),
            Constraint::Percentage(30),
        ])
        .split(rows[1]);

    draw_sidebar(frame, app, body[0]);
    match app.route {
        Route::Tracks => draw_tracks_route(frame, app, player, body[1]),
        Route::Genres => {
            if app.has_tracks() {
                draw_facet_list(frame, app, Facet::Genre, true, body[1]);
            } else {
                draw_placeholder(frame, " genres ", body[1]);
            }
        }
    }
    draw_player(frame, player, body[2]);

    let footer = Paragraph::new(controls_text(controls_settings.seek_step_percent))
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, rows[2]);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = Route::ALL
        .iter()
        .map(|r| ListItem::new(format!("{} {}", r.label(), r.path())))
        .collect();
    let active = Route::ALL.iter().position(|&r| r == app.route);

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" menu "))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(active);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_placeholder(frame: &mut Frame, title: &str, area: Rect) {
    let p = Paragraph::new(LOADING_PLACEHOLDER)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(p, area);
}

fn draw_tracks_route<O: AudioOutput>(
    frame: &mut Frame,
    app: &App,
    player: &AudioPlayer<O>,
    area: Rect,
) {
    if !app.has_tracks() {
        draw_placeholder(frame, " tracks ", area);
        return;
    }

    if app.panels.any() {
        let open = app.panels.open();
        let constraints: Vec<Constraint> = open
            .iter()
            .map(|_| Constraint::Ratio(1, open.len() as u32))
            .collect();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);
        for (facet, col) in open.iter().zip(cols.iter()) {
            draw_facet_list(frame, app, *facet, app.focus == Some(*facet), *col);
        }
        return;
    }

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    // Search box
    let search = if app.filter_mode {
        Paragraph::new(format!("{}_", app.filter_query))
    } else if app.filter_query.is_empty() {
        Paragraph::new(SEARCH_PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(app.filter_query.as_str())
    };
    frame.render_widget(search.block(padded_block(" search ")), parts[0]);

    // Song list. Only build rows for the visible window.
    let display = app.display_indices();
    let list_height = parts[1].height.saturating_sub(3) as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end, selected_in_window) = visible_window(display.len(), list_height, sel_pos);
    let playing = player.current_track().map(|_| player.current_index());

    let rows: Vec<Row> = display[start..end]
        .iter()
        .map(|&i| {
            let track = &app.tracks[i];
            let row = Row::new(vec![track.title.clone(), track.artist.clone()]);
            if Some(i) == playing {
                row.style(Style::default().fg(Color::Cyan))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .header(
            Row::new(vec!["Title", "Artist"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    " {} ({}/{}) ",
                    app.scope_label(),
                    display.len(),
                    app.tracks.len()
                )),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = TableState::default();
    if !display.is_empty() {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(table, parts[1], &mut state);
}

fn draw_facet_list(frame: &mut Frame, app: &App, facet: Facet, focused: bool, area: Rect) {
    let values = app.facets.values(facet);
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, selected_in_window) =
        visible_window(values.len(), height, app.facet_cursor(facet));

    let items: Vec<ListItem> = values[start..end]
        .iter()
        .map(|v| ListItem::new(v.as_str()))
        .collect();

    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {} ", facet.label().to_lowercase())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !values.is_empty() {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_player<O: AudioOutput>(frame: &mut Frame, player: &AudioPlayer<O>, area: Rect) {
    let block = padded_block(" music player ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let Some(track) = player.current_track() else {
        frame.render_widget(Paragraph::new("Nothing playing"), parts[0]);
        return;
    };

    let info = Paragraph::new(vec![
        Line::styled(track.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Line::from(track.artist.clone()),
        Line::styled(
            player.state().label(),
            Style::default().fg(Color::DarkGray),
        ),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(info, parts[0]);

    let percent = player.progress_percent().clamp(0.0, 100.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(percent / 100.0)
        .label(format!("{percent:.0}%"));
    frame.render_widget(gauge, parts[1]);

    let time = format!(
        "{} / {}",
        format_clock(player.elapsed_seconds()),
        format_duration_label(player.duration_seconds())
    );
    frame.render_widget(Paragraph::new(time), parts[2]);
}
