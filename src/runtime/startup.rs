use std::time::Duration;

use crate::app::Route;
use crate::config;

/// Command-line arguments. Anything unrecognized is reported and ignored.
#[derive(Debug, Default, PartialEq)]
pub struct Args {
    pub base_url: Option<String>,
    pub route: Route,
    pub print_config: bool,
}

impl Args {
    pub fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        for arg in args {
            if arg == "--print-config" {
                parsed.print_config = true;
            } else if arg.starts_with("http://") || arg.starts_with("https://") {
                parsed.base_url = Some(arg);
            } else if let Some(route) = Route::from_path(&arg) {
                parsed.route = route;
            } else {
                eprintln!("cadenza: ignoring unknown argument {arg:?}");
            }
        }
        parsed
    }
}

/// HTTP client for audio downloads. Connecting uses the catalog timeout; the
/// whole download, body included, gets the longer playback bound.
pub fn audio_http(settings: &config::Settings) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(settings.catalog.timeout_secs))
        .timeout(Duration::from_secs(settings.playback.download_timeout_secs))
        .build()
}
