//! Loader for `timeline.yaml` with environment overlays.
//!
//! Sources are merged in order (YAML file, inline YAML, `TIMELINE__*`
//! environment variables) and `${VAR}` placeholders are expanded afterwards,
//! so secrets such as the bearer token can stay out of the file.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// File name of the persisted snapshot inside the project directory.
pub const SNAPSHOT_FILE_NAME: &str = "tweets_df.json";

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineConfig {
    /// Directory name created under `cache_dir` for snapshots and reports.
    #[serde(default = "default_project_name")]
    pub project_name: String,
    /// Screen name of the account to analyse.
    pub account: String,
    #[serde(default)]
    pub debug: bool,
    /// Root for the project directory. Defaults to the home directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    pub twitter: TwitterConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwitterConfig {
    pub bearer_token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_project_name() -> String {
    "tw_analysis".into()
}
fn default_api_base() -> String {
    "https://api.twitter.com".into()
}
fn default_page_size() -> u32 {
    100
}
fn default_history_limit() -> usize {
    3200
}

impl TimelineConfig {
    /// `<cache_dir>/<project_name>`, with a leading `~/` expanded.
    pub fn project_dir(&self) -> PathBuf {
        let root = match &self.cache_dir {
            Some(dir) => expand_tilde(dir),
            None => dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        };
        root.join(&self.project_name)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.project_dir().join(SNAPSHOT_FILE_NAME)
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
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

/// Builder over the `config` crate wiring.
pub struct TimelineConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: &'static str,
}

impl Default for TimelineConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineConfigLoader {
    /// Start with no file sources; `TIMELINE__*` variables are layered on at [`load`](Self::load).
    ///
    /// ```
    /// use timeline_config::TimelineConfigLoader;
    ///
    /// let config = TimelineConfigLoader::new()
    ///     .with_yaml_str("account: someone\ntwitter:\n  bearer_token: abc")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.account, "someone");
    /// assert_eq!(config.project_name, "tw_analysis");
    /// assert_eq!(config.twitter.page_size, 100);
    /// assert_eq!(config.twitter.history_limit, 3200);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "TIMELINE",
        }
    }

    /// Use a different environment prefix (tests use this to stay isolated).
    pub fn with_env_prefix(mut self, prefix: &'static str) -> Self {
        self.env_prefix = prefix;
        self
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders and deserialize.
    ///
    /// ```
    /// use timeline_config::TimelineConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_BEARER", "from-env"); }
    ///
    /// let config = TimelineConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// account: "someone"
    /// cache_dir: "/tmp/timeline-doc"
    /// twitter:
    ///   bearer_token: "${DOC_BEARER}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.twitter.bearer_token, "from-env");
    /// assert_eq!(
    ///     config.snapshot_path(),
    ///     std::path::PathBuf::from("/tmp/timeline-doc/tw_analysis/tweets_df.json")
    /// );
    ///
    /// unsafe { std::env::remove_var("DOC_BEARER"); }
    /// ```
    pub fn load(self) -> Result<TimelineConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
