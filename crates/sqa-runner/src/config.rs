use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqa_artifacts::DEFAULT_REPORT_PATH;
use sqa_core::StageError;
use sqa_llm::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use sqa_tracker::DEFAULT_ISSUE_TYPE;

pub const ENV_JIRA_EMAIL: &str = "JIRA_EMAIL";
pub const ENV_JIRA_API_KEY: &str = "JIRA_API_KEY";
pub const ENV_JIRA_BASE_URL: &str = "JIRA_BASE_URL";
pub const ENV_JIRA_PROJECT_KEY: &str = "JIRA_PROJECT_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "storyqa.toml";

/// String that never shows up in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<unset>)")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

/// Everything a run needs, built once at startup and passed by reference.
///
/// Credentials and the tracker endpoint come from the environment; the rest
/// may come from a TOML file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub model: ModelConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    #[serde(skip)]
    pub email: String,
    #[serde(skip)]
    pub api_token: Secret,
    #[serde(skip)]
    pub base_url: String,
    #[serde(skip)]
    pub project_key: String,
    pub issue_type: String,
    pub paginate: bool,
    pub max_pages: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            api_token: Secret::default(),
            base_url: String::new(),
            project_key: String::new(),
            issue_type: DEFAULT_ISSUE_TYPE.to_string(),
            paginate: false,
            max_pages: 10,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    #[serde(skip)]
    pub api_key: Secret,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: Secret::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_path: String,
    pub artifacts_dir: Option<String>,
    pub emit_artifacts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: DEFAULT_REPORT_PATH.to_string(),
            artifacts_dir: None,
            emit_artifacts: false,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, StageError> {
        toml::from_str(s).map_err(|e| StageError::Config(format!("parse config: {e}")))
    }

    pub fn load_from(path: &Path) -> Result<Self, StageError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| StageError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_toml_str(&s)
    }

    /// File settings (if any) overlaid with the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, StageError> {
        let mut cfg = match path {
            Some(p) => Self::load_from(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load_from(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    /// Fills the five environment-only settings from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).unwrap_or_default();
        self.tracker.email = get(ENV_JIRA_EMAIL);
        self.tracker.api_token = Secret::new(get(ENV_JIRA_API_KEY));
        self.tracker.base_url = get(ENV_JIRA_BASE_URL);
        self.tracker.project_key = get(ENV_JIRA_PROJECT_KEY);
        self.model.api_key = Secret::new(get(ENV_OPENAI_API_KEY));
    }

    /// Tracker settings that are unset or blank.
    pub fn missing_tracker_settings(&self) -> Vec<&'static str> {
        let checks = [
            (ENV_JIRA_EMAIL, self.tracker.email.is_empty()),
            (ENV_JIRA_API_KEY, self.tracker.api_token.is_empty()),
            (ENV_JIRA_BASE_URL, self.tracker.base_url.is_empty()),
            (ENV_JIRA_PROJECT_KEY, self.tracker.project_key.is_empty()),
        ];
        checks.iter().filter(|(_, missing)| *missing).map(|(name, _)| *name).collect()
    }

    /// Names of required environment settings that are unset or blank.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = self.missing_tracker_settings();
        if self.model.api_key.is_empty() {
            missing.push(ENV_OPENAI_API_KEY);
        }
        missing
    }

    pub fn require_tracker_settings(&self) -> Result<(), StageError> {
        require(self.missing_tracker_settings())
    }

    pub fn require_settings(&self) -> Result<(), StageError> {
        require(self.missing_settings())
    }

    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output.report_path).to_string())
    }

    pub fn artifacts_dir(&self) -> Option<PathBuf> {
        self.output
            .artifacts_dir
            .as_deref()
            .map(|d| PathBuf::from(shellexpand::tilde(d).to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

fn require(missing: Vec<&'static str>) -> Result<(), StageError> {
    if missing.is_empty() {
        return Ok(());
    }
    Err(StageError::Config(format!("missing required settings: {}", missing.join(", "))))
}
