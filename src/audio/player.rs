//! The playback engine.
//!
//! `AudioPlayer` owns the playback state and the one audio output. Views
//! read it through accessors and change it only through the command methods,
//! which enforce the state machine:
//!
//! ```text
//! Idle --play_index--> Loading --Started--> Playing <--pause/resume--> Paused
//!                         |                    |
//!                       Failed              Ended --next--> Loading
//!                         v
//!                       Idle
//! ```
//!
//! Track completion is detected twice: by the output's `Ended` event and by
//! the progress timer polling `ended()`. Whichever comes first advances; the
//! other finds the track already finished and does nothing.

use std::time::{Duration, Instant};

use crate::catalog::{Track, audio_url};

use super::output::AudioOutput;
use super::timer::ProgressTimer;
use super::types::{OutputEvent, PlayerState};

pub struct AudioPlayer<O: AudioOutput> {
    output: O,
    base_url: String,
    tracks: Vec<Track>,

    state: PlayerState,
    current_index: usize,
    progress_percent: f64,
    duration_seconds: f64,

    timer: Option<ProgressTimer>,
    tick_period: Duration,
    // Set once the current track has triggered its advance.
    advanced: bool,
}

impl<O: AudioOutput> AudioPlayer<O> {
    pub fn new(output: O, base_url: &str, tick_period: Duration) -> Self {
        Self {
            output,
            base_url: base_url.to_string(),
            tracks: Vec::new(),
            state: PlayerState::Idle,
            current_index: 0,
            progress_percent: 0.0,
            duration_seconds: 0.0,
            timer: None,
            tick_period,
            advanced: false,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    /// Length of the current track; 0 until the output reports it.
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn elapsed_seconds(&self) -> f64 {
        match self.state {
            PlayerState::Playing | PlayerState::Paused => self.output.position().as_secs_f64(),
            _ => 0.0,
        }
    }

    #[cfg(test)]
    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Replace the track list with a fresh snapshot and start its first track.
    pub fn load_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.current_index = 0;

        if self.tracks.is_empty() {
            tracing::info!("empty track list loaded; playback idle");
            self.stop();
            return;
        }

        tracing::info!(count = self.tracks.len(), "track list loaded");
        self.play_index(0);
    }

    /// Start loading the track at `index`. Returns false when no such track
    /// exists.
    pub fn play_index(&mut self, index: usize) -> bool {
        let Some(track) = self.tracks.get(index) else {
            tracing::warn!(index, count = self.tracks.len(), "no track at index");
            return false;
        };
        let url = audio_url(&self.base_url, track);
        tracing::info!(index, title = %track.title, %url, "loading track");

        self.clear_timer();
        self.current_index = index;
        self.progress_percent = 0.0;
        self.duration_seconds = 0.0;
        self.advanced = false;
        self.state = PlayerState::Loading;
        self.output.load(&url);
        true
    }

    /// Toggle between playing and paused. From idle this (re)starts the
    /// current track.
    pub fn play_pause(&mut self, now: Instant) {
        match self.state {
            PlayerState::Playing => self.pause(),
            PlayerState::Paused => self.resume(now),
            PlayerState::Idle | PlayerState::Ended => {
                if !self.tracks.is_empty() {
                    self.play_index(self.current_index);
                }
            }
            PlayerState::Loading => {
                tracing::debug!("play/pause ignored while loading");
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state != PlayerState::Playing {
            return;
        }
        self.output.pause();
        self.clear_timer();
        self.state = PlayerState::Paused;
    }

    pub fn resume(&mut self, now: Instant) {
        if self.state != PlayerState::Paused {
            return;
        }
        match self.output.play() {
            Ok(()) => {
                self.state = PlayerState::Playing;
                self.start_timer(now);
            }
            Err(e) => tracing::warn!(error = %e, "resume rejected by output"),
        }
    }

    /// Seek to `percent` of the current track. The reported progress jumps
    /// to the requested value without waiting for the next poll.
    pub fn seek_to(&mut self, percent: f64) -> bool {
        if !matches!(self.state, PlayerState::Playing | PlayerState::Paused) {
            tracing::debug!(state = ?self.state, "seek ignored without an active track");
            return false;
        }
        if self.duration_seconds <= 0.0 || !percent.is_finite() {
            tracing::debug!(percent, "seek ignored; duration unknown");
            return false;
        }

        let percent = percent.clamp(0.0, 100.0);
        let target = percent / 100.0 * self.duration_seconds;
        match self.output.seek(Duration::from_secs_f64(target)) {
            Ok(()) => {
                self.progress_percent = percent;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, target, "seek rejected by output");
                false
            }
        }
    }

    /// Seek relative to the current progress, in percent.
    pub fn seek_by(&mut self, delta_percent: f64) -> bool {
        self.seek_to(self.progress_percent + delta_percent)
    }

    pub fn next(&mut self) -> bool {
        let len = self.tracks.len();
        if len == 0 {
            tracing::debug!("next ignored; no tracks");
            return false;
        }
        self.play_index((self.current_index + 1) % len)
    }

    pub fn prev(&mut self) -> bool {
        let len = self.tracks.len();
        if len == 0 {
            tracing::debug!("prev ignored; no tracks");
            return false;
        }
        self.play_index((self.current_index + len - 1) % len)
    }

    pub fn stop(&mut self) {
        self.output.stop();
        self.clear_timer();
        self.state = PlayerState::Idle;
        self.progress_percent = 0.0;
        self.duration_seconds = 0.0;
    }

    /// Apply pending output events, then run the progress timer.
    pub fn pump(&mut self, now: Instant) {
        while let Some(event) = self.output.poll_event() {
            self.handle_event(event, now);
        }
        self.tick(now);
    }

    fn handle_event(&mut self, event: OutputEvent, now: Instant) {
        match event {
            OutputEvent::Started => {
                if self.state == PlayerState::Loading {
                    self.state = PlayerState::Playing;
                    self.start_timer(now);
                }
            }
            OutputEvent::Failed(e) => {
                if self.state == PlayerState::Loading {
                    tracing::warn!(error = %e, index = self.current_index, "playback failed");
                    self.clear_timer();
                    self.state = PlayerState::Idle;
                }
            }
            OutputEvent::Metadata(total) => {
                self.duration_seconds = total.as_secs_f64();
                if self.state == PlayerState::Playing {
                    self.start_timer(now);
                }
            }
            OutputEvent::Ended => self.finish_track("ended event"),
        }
    }

    fn tick(&mut self, now: Instant) {
        let Some(timer) = self.timer.as_mut() else {
            return;
        };
        if !timer.fire(now) {
            return;
        }

        if self.output.ended() {
            self.finish_track("progress poll");
            return;
        }

        if self.duration_seconds > 0.0 {
            let position = self.output.position().as_secs_f64();
            self.progress_percent = (position / self.duration_seconds * 100.0).clamp(0.0, 100.0);
        }
    }

    fn finish_track(&mut self, trigger: &str) {
        if self.advanced || self.state != PlayerState::Playing {
            tracing::debug!(trigger, "track already finished");
            return;
        }
        tracing::debug!(trigger, index = self.current_index, "track finished");
        self.advanced = true;
        self.clear_timer();
        self.state = PlayerState::Ended;
        self.next();
    }

    fn start_timer(&mut self, now: Instant) {
        self.clear_timer();
        self.timer = Some(ProgressTimer::start(now, self.tick_period));
    }

    fn clear_timer(&mut self) {
        self.timer = None;
    }
}
