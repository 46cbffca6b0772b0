use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "TriajeIA";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version tag of the persisted state. A stored state with a different tag
/// is discarded on load.
pub const STATE_VERSION: &str = "v1";

/// Default model per provider.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Retired Gemini model that is upgraded on load.
pub const LEGACY_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Provider endpoints.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Network-layer timeout for provider calls, in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Get the application data directory.
/// `$TRIAJE_DATA_DIR` when set, otherwise ~/TriajeIA/.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("TRIAJE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// Path of the persisted application state.
pub fn state_file() -> PathBuf {
    app_data_dir().join(format!("triaje-ia-{STATE_VERSION}.json"))
}

/// HTTP timeout for provider calls (`$TRIAJE_HTTP_TIMEOUT_SECS` overrides).
pub fn http_timeout_secs() -> u64 {
    std::env::var("TRIAJE_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "triaje_lib=debug,triaje=debug,warn"
    } else {
        "triaje_lib=info,triaje=info,warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_file_is_versioned() {
        let path = state_file();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.contains(STATE_VERSION));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn app_name_is_triaje() {
        assert_eq!(APP_NAME, "TriajeIA");
    }

    #[test]
    fn default_log_filter_targets_crate() {
        assert!(default_log_filter().contains("triaje_lib"));
    }

    #[test]
    fn http_timeout_is_positive() {
        assert!(http_timeout_secs() > 0);
    }
}
