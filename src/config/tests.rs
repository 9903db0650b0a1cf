use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cadenza_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", "/tmp/cadenza-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/cadenza-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home_then_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state")
            .join("cadenza")
            .join("cadenza.log")
    );

    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("state")
            .join("cadenza")
            .join("cadenza.log")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
base_url = "http://music.local:8080"
timeout_secs = 3

[playback]
progress_interval_ms = 250

[controls]
seek_step_percent = 12.5

[ui]
follow_playback = false
header_text = "hello"

[logging]
level = "debug"
file = "/tmp/cadenza.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CADENZA__CATALOG__BASE_URL");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.base_url, "http://music.local:8080");
    assert_eq!(s.catalog.timeout_secs, 3);
    assert_eq!(s.playback.progress_interval_ms, 250);
    assert_eq!(s.controls.seek_step_percent, 12.5);
    assert!(!s.ui.follow_playback);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.logging.level, "debug");
    assert_eq!(s.logging.file.as_deref(), Some("/tmp/cadenza.log"));
    assert!(s.validate().is_ok());
}

#[test]
fn settings_missing_file_yields_defaults() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("absent.toml");
    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CADENZA__CATALOG__BASE_URL");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.base_url, "http://localhost:3000");
    assert_eq!(s.playback.progress_interval_ms, 1000);
    assert!(s.ui.follow_playback);
    assert!(s.logging.file.is_none());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
base_url = "http://from-file:3000"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CADENZA__CATALOG__BASE_URL", "http://from-env:4000");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.base_url, "http://from-env:4000");
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.catalog.base_url = "  ".into();
    assert!(s.validate().is_err());

    s.catalog.base_url = "ftp://example.com".into();
    assert!(s.validate().is_err());

    s = Settings::default();
    s.playback.progress_interval_ms = 0;
    assert!(s.validate().is_err());

    s = Settings::default();
    s.playback.download_timeout_secs = 0;
    assert!(s.validate().is_err());

    s = Settings::default();
    s.controls.seek_step_percent = 0.0;
    assert!(s.validate().is_err());
    s.controls.seek_step_percent = 150.0;
    assert!(s.validate().is_err());
}

#[test]
fn default_settings_render_as_toml() {
    let text = Settings::default().to_toml().unwrap();
    assert!(text.contains("[catalog]"));
    assert!(text.contains("base_url = \"http://localhost:3000\""));
    assert!(text.contains("progress_interval_ms = 1000"));
    assert!(text.contains("download_timeout_secs = 120"));

    let parsed: Settings = toml::from_str(&text).unwrap();
    assert_eq!(parsed.catalog.base_url, "http://localhost:3000");
}
