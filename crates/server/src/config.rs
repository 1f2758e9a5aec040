use shared_types::AppConfig;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Read `config.toml` and store it in the global `OnceLock`. Only the first
/// call has effect.
///
/// If the file is missing or unparseable every section falls back to its
/// defaults: memory store, no webhook, no summarizer, no telemetry.
pub fn load_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let config = parse_config(&contents);
            tracing::info!(features = ?config.features, app_id = %config.app.default_app_id, "Loaded {CONFIG_PATH}");
            config
        }
        Err(e) => {
            tracing::warn!(error = %e, "{CONFIG_PATH} not found, using defaults");
            AppConfig::default()
        }
    })
}

/// Parse config text, falling back to defaults on a syntax error.
pub fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to parse {CONFIG_PATH}, using defaults");
        AppConfig::default()
    })
}

/// The loaded config, or defaults if `load_config()` hasn't run yet.
pub fn app_config() -> &'static AppConfig {
    static DEFAULT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(AppConfig::default))
}

/// Read an env var, treating empty values as unset.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
