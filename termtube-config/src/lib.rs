//! Loader for termtube configuration with YAML + environment overlays.
//!
//! Precedence, lowest first: built-in defaults, YAML files in the order they
//! were attached, then `TERMTUBE__SECTION__KEY` environment variables
//! (e.g. `TERMTUBE__HTTP__TIMEOUT_SECS=30`). String values may reference
//! other environment variables as `${VAR}`; expansion is recursive up to a
//! fixed depth.
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use termtube_common::TermtubeError;
use termtube_common::observability::{LogConfig, LogFormat};

pub use config::ConfigError;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "termtube.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TermtubeConfig {
    pub provider: ProviderSettings,
    pub http: HttpSettings,
    pub player: PlayerSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

impl TermtubeConfig {
    /// Reject values that deserialize fine but cannot drive the app.
    pub fn validate(&self) -> termtube_common::Result<()> {
        if !self.provider.origin.starts_with("http://")
            && !self.provider.origin.starts_with("https://")
        {
            return Err(TermtubeError::Config(format!(
                "provider.origin must be an http(s) URL, got {:?}",
                self.provider.origin
            )));
        }
        if self.player.command.trim().is_empty() {
            return Err(TermtubeError::Config("player.command is empty".into()));
        }
        if self.ui.page_size == 0 {
            return Err(TermtubeError::Config("ui.page_size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Where listing and watch pages live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub origin: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            origin: "https://www.youtube.com".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub retries: usize,
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            retries: 2,
            user_agent: None,
        }
    }
}

/// External media player launched on a watch URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            command: "mpv".into(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub page_size: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub dir: Option<PathBuf>,
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: None,
            filter: "info".into(),
            format: LogFormat::Text,
        }
    }
}

impl LogSettings {
    /// Translate into the observability bootstrap settings.
    pub fn to_log_config(&self, emit_stderr: bool) -> LogConfig {
        LogConfig {
            log_dir: self.dir.clone(),
            emit_stderr,
            format: self.format,
            default_filter: self.filter.clone(),
            ..LogConfig::default()
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct TermtubeConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for TermtubeConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TermtubeConfigLoader {
    /// Start from defaults; `TERMTUBE__` env overrides are applied last.
    ///
    /// ```
    /// use termtube_config::TermtubeConfigLoader;
    ///
    /// let config = TermtubeConfigLoader::new()
    ///     .with_yaml_str("ui:\n  page_size: 5")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.ui.page_size, 5);
    /// assert_eq!(config.player.command, "mpv");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "TERMTUBE".into(),
        }
    }

    /// Use a different environment prefix (tests isolate themselves this way).
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Attach a YAML/TOML/JSON file that must exist; format inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is merged only if present.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use termtube_config::TermtubeConfigLoader;
    ///
    /// let config = TermtubeConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// player:
    ///   command: "${HOME}/bin/mpv"
    ///   args: ["--no-terminal"]
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert!(!config.player.command.contains("${HOME}"));
    /// assert_eq!(config.player.args, vec!["--no-terminal".to_string()]);
    /// ```
    pub fn load(self) -> Result<TermtubeConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Convert to serde_json::Value first
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: TermtubeConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("TT_FOO", Some("bar"), || {
            let mut v = json!("prefix-${TT_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars(
            [("TT_PLAYER", Some("mpv")), ("TT_FLAG", Some("--fs"))],
            || {
                let mut v = json!({ "command": "${TT_PLAYER}", "args": ["$TT_FLAG", 3, null] });
                expand_env_in_value(&mut v);
                assert_eq!(v, json!({ "command": "mpv", "args": ["--fs", 3, null] }));
            },
        );
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("TT_BAZ", Some("qux")),
                ("TT_BAR", Some("mid-${TT_BAZ}")),
                ("TT_TOP", Some("start-${TT_BAR}-end")),
            ],
            || {
                let mut v = json!("X=${TT_TOP}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("TT_A", Some("${TT_B}")), ("TT_B", Some("${TT_A}"))], || {
            let mut v = json!("x=${TT_A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${TT_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${TT_DOES_NOT_EXIST}"));
    }

    #[test]
    fn empty_sources_yield_defaults() {
        let cfg = TermtubeConfigLoader::new()
            .with_env_prefix("TT_EMPTY_SOURCES")
            .load()
            .unwrap();
        assert_eq!(cfg.provider.origin, "https://www.youtube.com");
        assert_eq!(cfg.http.timeout_secs, 15);
        assert_eq!(cfg.http.retries, 2);
        assert_eq!(cfg.ui.page_size, 10);
        assert_eq!(cfg.log.format, LogFormat::Text);
    }

    #[test]
    fn defaults_validate() {
        assert!(TermtubeConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_unusable_values() {
        let mut cfg = TermtubeConfig::default();
        cfg.ui.page_size = 0;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, TermtubeError::Config(ref m) if m.contains("page_size")));

        let mut cfg = TermtubeConfig::default();
        cfg.provider.origin = "www.youtube.com".into();
        assert!(cfg.validate().is_err());

        let mut cfg = TermtubeConfig::default();
        cfg.player.command = "  ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn log_settings_map_onto_log_config() {
        let cfg = TermtubeConfigLoader::new()
            .with_env_prefix("TT_LOG_SETTINGS")
            .with_yaml_str("log:\n  dir: /tmp/tt\n  filter: debug\n  format: json")
            .load()
            .unwrap();
        let log = cfg.log.to_log_config(true);
        assert_eq!(log.log_dir, Some(PathBuf::from("/tmp/tt")));
        assert_eq!(log.default_filter, "debug");
        assert_eq!(log.format, LogFormat::Json);
        assert!(log.emit_stderr);
    }
}
