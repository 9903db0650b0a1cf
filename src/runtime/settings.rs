use crate::config::Settings;

/// Load settings, apply the command-line base address, and validate the
/// result. Anything unusable falls back to defaults so the player still
/// starts; the problem is reported on stderr before the TUI takes over.
pub fn load_settings(base_url_override: Option<&str>) -> Settings {
    let mut settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("cadenza: failed to load config, using defaults: {e}");
        Settings::default()
    });

    if let Some(url) = base_url_override {
        settings.catalog.base_url = url.to_string();
    }

    match settings.validate() {
        Ok(()) => settings,
        Err(msg) => {
            eprintln!("cadenza: invalid config, using defaults: {msg}");
            let mut fallback = Settings::default();
            if let Some(url) = base_url_override {
                fallback.catalog.base_url = url.to_string();
            }
            if fallback.validate().is_err() {
                fallback.catalog.base_url = Settings::default().catalog.base_url;
            }
            fallback
        }
    }
}
