use std::time::Duration;

use super::types::{OutputEvent, PlaybackError};

/// A single audio output the playback engine commands.
///
/// Loading is asynchronous: `load` only requests the source, and the outcome
/// arrives later through `poll_event`. Everything else takes effect
/// immediately on the current source.
pub trait AudioOutput {
    /// Replace the current source with `url` and start playing it once ready.
    fn load(&mut self, url: &str);

    /// Resume the current source.
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Pause the current source, keeping its position.
    fn pause(&mut self);

    /// Move the playback position of the current source.
    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError>;

    /// Drop the current source.
    fn stop(&mut self);

    /// Playback position within the current source.
    fn position(&self) -> Duration;

    /// True once the current source has played to its end.
    fn ended(&self) -> bool;

    /// Next pending acknowledgment, if any.
    fn poll_event(&mut self) -> Option<OutputEvent>;
}
