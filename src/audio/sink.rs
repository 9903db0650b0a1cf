//! `rodio`-backed audio output for remote sources.
//!
//! Fetching and decoding happen in [`SourceFetcher`]; this type only owns
//! the output stream and the `Sink` of the current source.

use std::collections::VecDeque;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::fetch::{EndLatch, LoadedSource, SourceFetcher};
use super::output::AudioOutput;
use super::types::{OutputEvent, PlaybackError};

pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
    fetcher: SourceFetcher,
    pending: VecDeque<OutputEvent>,
    end: EndLatch,
}

impl RodioOutput {
    /// Open the default output device.
    pub fn open(http: reqwest::blocking::Client) -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which garbles the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            fetcher: SourceFetcher::new(http),
            pending: VecDeque::new(),
            end: EndLatch::default(),
        })
    }

    fn start_source(&mut self, loaded: LoadedSource) {
        tracing::debug!(url = %loaded.url, total = ?loaded.total, "source ready");
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(loaded.source);
        sink.play();
        self.sink = Some(sink);

        self.pending.push_back(OutputEvent::Started);
        if let Some(total) = loaded.total {
            self.pending.push_back(OutputEvent::Metadata(total));
        }
    }

    fn discard_source(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.pending.clear();
        self.end.reset();
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, url: &str) {
        self.discard_source();
        self.fetcher.fetch(url);
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let sink = self.sink.as_ref().ok_or(PlaybackError::NoSource)?;
        sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        let sink = self.sink.as_ref().ok_or(PlaybackError::NoSource)?;
        sink.try_seek(position)
            .map_err(|e| PlaybackError::Seek(e.to_string()))
    }

    fn stop(&mut self) {
        self.fetcher.cancel();
        self.discard_source();
    }

    fn position(&self) -> Duration {
        self.sink.as_ref().map_or(Duration::ZERO, |s| s.get_pos())
    }

    fn ended(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| s.empty())
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        for fetched in self.fetcher.poll_fetched() {
            match fetched {
                Ok(loaded) => self.start_source(loaded),
                Err(e) => self.pending.push_back(OutputEvent::Failed(e)),
            }
        }

        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let ended = self.ended();
        if self.end.observe(ended) {
            return Some(OutputEvent::Ended);
        }

        None
    }
}
