//! Playback: the engine state machine and the audio output it drives.

mod clock;
mod fetch;
mod output;
mod player;
mod sink;
mod timer;
mod types;

pub use clock::*;
pub use output::AudioOutput;
pub use player::AudioPlayer;
pub use sink::RodioOutput;
pub use types::*;

#[cfg(test)]
pub(crate) mod testing;
