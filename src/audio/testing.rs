//! In-memory `AudioOutput` for tests. Clones share state, so a test can keep
//! one handle while the player owns another.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use super::output::AudioOutput;
use super::types::{OutputEvent, PlaybackError};

#[derive(Default)]
pub(crate) struct FakeState {
    pub loads: Vec<String>,
    pub events: VecDeque<OutputEvent>,
    pub position: Duration,
    pub ended: bool,
    pub paused: bool,
    pub seeks: Vec<Duration>,
    pub reject_seek: bool,
    pub stops: usize,
}

#[derive(Clone, Default)]
pub(crate) struct FakeOutput(pub Rc<RefCell<FakeState>>);

impl FakeOutput {
    pub fn push(&self, event: OutputEvent) {
        self.0.borrow_mut().events.push_back(event);
    }

    /// Acknowledge the pending load with a known length.
    pub fn start(&self, total: Duration) {
        self.push(OutputEvent::Started);
        self.push(OutputEvent::Metadata(total));
    }
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, url: &str) {
        let mut s = self.0.borrow_mut();
        s.loads.push(url.to_string());
        s.position = Duration::ZERO;
        s.ended = false;
        s.paused = false;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.0.borrow_mut().paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.borrow_mut().paused = true;
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        let mut s = self.0.borrow_mut();
        if s.reject_seek {
            return Err(PlaybackError::Seek("not seekable".into()));
        }
        s.seeks.push(position);
        s.position = position;
        Ok(())
    }

    fn stop(&mut self) {
        self.0.borrow_mut().stops += 1;
    }

    fn position(&self) -> Duration {
        self.0.borrow().position
    }

    fn ended(&self) -> bool {
        self.0.borrow().ended
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        self.0.borrow_mut().events.pop_front()
    }
}
