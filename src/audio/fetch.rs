//! Device-independent half of the rodio output. Sources are downloaded and
//! decoded on worker threads; each fetch carries the load generation it was
//! issued under so a superseded one is dropped on arrival.

use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, Source};

use super::types::PlaybackError;

pub(super) type DecodedSource = Decoder<Cursor<Vec<u8>>>;

/// A downloaded source, decoded and ready for a sink.
pub(super) struct LoadedSource {
    pub url: String,
    pub source: DecodedSource,
    pub total: Option<Duration>,
}

struct Fetched {
    generation: u64,
    url: String,
    result: Result<LoadedSource, PlaybackError>,
}

pub(super) struct SourceFetcher {
    http: reqwest::blocking::Client,
    generation: u64,
    tx: Sender<Fetched>,
    rx: Receiver<Fetched>,
}

impl SourceFetcher {
    pub fn new(http: reqwest::blocking::Client) -> Self {
        let (tx, rx) = mpsc::channel::<Fetched>();
        Self {
            http,
            generation: 0,
            tx,
            rx,
        }
    }

    /// Start fetching `url`, superseding whatever is in flight.
    pub fn fetch(&mut self, url: &str) {
        self.generation += 1;

        let generation = self.generation;
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = url.to_string();
        thread::spawn(move || {
            let result = download(&http, &url).and_then(|bytes| decode_source(&url, bytes));
            let _ = tx.send(Fetched {
                generation,
                url,
                result,
            });
        });
    }

    /// Forget any fetch still in flight.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    /// Completed fetches for the current generation, oldest first.
    pub fn poll_fetched(&mut self) -> Vec<Result<LoadedSource, PlaybackError>> {
        let mut current = Vec::new();
        while let Ok(fetched) = self.rx.try_recv() {
            if fetched.generation != self.generation {
                tracing::debug!(url = %fetched.url, "dropping superseded download");
                continue;
            }
            current.push(fetched.result);
        }
        current
    }
}

/// Latches the end of one source so it is reported once.
#[derive(Debug, Default)]
pub(super) struct EndLatch {
    reported: bool,
}

impl EndLatch {
    pub fn reset(&mut self) {
        self.reported = false;
    }

    /// True the first time `ended` is seen since the last reset.
    pub fn observe(&mut self, ended: bool) -> bool {
        if ended && !self.reported {
            self.reported = true;
            return true;
        }
        false
    }
}

pub(super) fn download(
    http: &reqwest::blocking::Client,
    url: &str,
) -> Result<Vec<u8>, PlaybackError> {
    let download_err = |e: reqwest::Error| PlaybackError::Download {
        url: url.to_string(),
        message: e.to_string(),
    };

    let response = http.get(url).send().map_err(download_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(PlaybackError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = response.bytes().map_err(download_err)?;
    tracing::debug!(url, len = bytes.len(), "downloaded source");
    Ok(bytes.to_vec())
}

/// Decode a fully downloaded source. The byte length is handed to the
/// decoder so containers without a length header still report a duration
/// and can seek backwards.
pub(super) fn decode_source(url: &str, bytes: Vec<u8>) -> Result<LoadedSource, PlaybackError> {
    let byte_len = bytes.len() as u64;
    let source = Decoder::builder()
        .with_data(Cursor::new(bytes))
        .with_byte_len(byte_len)
        .with_seekable(true)
        .build()
        .map_err(|e| PlaybackError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;
    let total = source.total_duration();

    Ok(LoadedSource {
        url: url.to_string(),
        source,
        total,
    })
}
