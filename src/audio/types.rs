//! Audio-related small types.
//!
//! This module defines the engine state, the events an output reports back
//! and the playback error taxonomy.

use std::time::Duration;

use thiserror::Error;

/// Where the playback engine is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// Nothing loaded, or the last load was rejected.
    #[default]
    Idle,
    /// A source was requested and the output has not acknowledged it yet.
    Loading,
    Playing,
    Paused,
    /// The current track finished; transient until the next track loads.
    Ended,
}

impl PlayerState {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerState::Idle => "Stopped",
            PlayerState::Loading => "Loading",
            PlayerState::Playing => "Playing",
            PlayerState::Paused => "Paused",
            PlayerState::Ended => "Ended",
        }
    }
}

/// Asynchronous acknowledgments from an [`AudioOutput`](super::AudioOutput).
#[derive(Debug)]
pub enum OutputEvent {
    /// The requested source began producing audio.
    Started,
    /// The requested source could not be played.
    Failed(PlaybackError),
    /// The total length of the current source became known.
    Metadata(Duration),
    /// The current source played to its natural end.
    Ended,
}

/// Failure reported by the audio output.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// No usable output device.
    #[error("audio device unavailable: {0}")]
    Device(String),

    /// The source could not be downloaded.
    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// The server refused the source.
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The bytes are not a decodable audio stream.
    #[error("cannot decode {url}: {message}")]
    Decode { url: String, message: String },

    /// The output rejected a position change.
    #[error("seek failed: {0}")]
    Seek(String),

    /// A command needed a loaded source and there was none.
    #[error("no source loaded")]
    NoSource,
}
