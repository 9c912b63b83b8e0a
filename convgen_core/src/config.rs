use crate::error::{ConvgenError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, trace, warn};

pub const CONFIG_FILE_NAME: &str = "convgen.toml";

pub const DEFAULT_ANNOTATION: &str =
    "com.kotlindiscord.kord.extensions.modules.annotations.converters.Converter";

/// Matches `${VAR_NAME}` or `${VAR_NAME:-default}`.
static ENV_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}")
        .expect("Invalid regex for environment variable substitution")
});

/// General configuration for a generation run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Qualified name of the annotation marking converter classes
    #[serde(default = "default_annotation")]
    pub annotation: String,

    /// Process declarations on the rayon thread pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            annotation: default_annotation(),
            parallel: true,
        }
    }
}

/// Where the symbol index is read from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScanConfig {
    /// A `*.symbols.toml` / `*.symbols.json` file, or a directory of them
    #[serde(default = "default_index_path")]
    pub index_path: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Root directory generated sources are written under
    #[serde(default = "default_output_path")]
    pub output_path: String,

    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            file_extension: default_file_extension(),
        }
    }
}

/// Target framework surface the generated builders are written against
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileConfig {
    /// Extension receiver of every builder function
    #[serde(default = "default_receiver")]
    pub receiver: String,

    /// Annotation classes listed in the file-level `@file:OptIn(...)`
    #[serde(default = "default_opt_ins")]
    pub opt_ins: Vec<String>,

    /// Imports every generated file needs
    #[serde(default = "default_runtime_imports")]
    pub runtime_imports: Vec<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            receiver: default_receiver(),
            opt_ins: default_opt_ins(),
            runtime_imports: default_runtime_imports(),
        }
    }
}

fn default_annotation() -> String {
    DEFAULT_ANNOTATION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_index_path() -> String {
    "./build/convgen/".to_string()
}

fn default_output_path() -> String {
    "./build/generated/convgen/".to_string()
}

fn default_file_extension() -> String {
    "kt".to_string()
}

fn default_receiver() -> String {
    "Arguments".to_string()
}

fn default_opt_ins() -> Vec<String> {
    ["KordPreview", "ConverterToDefaulting", "ConverterToMulti", "ConverterToOptional"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_runtime_imports() -> Vec<String> {
    [
        "com.kotlindiscord.kord.extensions.commands.converters.*",
        "com.kotlindiscord.kord.extensions.commands.parser.Arguments",
        "dev.kord.common.annotation.KordPreview",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Root configuration, read from `convgen.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ConvgenConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Directory relative paths are resolved against; the config file's
    /// directory when loaded from disk.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl ConvgenConfig {
    /// Load configuration by searching for convgen.toml from
    /// `CARGO_MANIFEST_DIR` (if set) or the current directory upward.
    pub fn new() -> Result<ConvgenConfig> {
        info!("Loading convgen configuration");
        dotenv::dotenv().ok();
        debug!("Environment variables loaded from .env if present");

        let start_dir = match env::var("CARGO_MANIFEST_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => env::current_dir()?,
        };
        let config_path = Self::find_config_file(&start_dir)?;
        info!("Found configuration file at: {:?}", config_path);

        Self::from_toml_path(&config_path)
    }

    /// Loads configuration from a specific convgen.toml file.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<ConvgenConfig> {
        let path = path.as_ref();
        dotenv::dotenv().ok();

        let contents = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read configuration file {:?}: {}", path, e);
            ConvgenError::from(e)
        })?;
        debug!("Configuration file size: {} bytes", contents.len());

        Self::parse_toml(&contents, path)
    }

    /// Searches for convgen.toml starting from `start_dir` and walking up to
    /// the filesystem root.
    pub fn find_config_file(start_dir: &Path) -> Result<PathBuf> {
        debug!("Starting config file search from: {:?}", start_dir);

        for path in start_dir.ancestors() {
            let config_path = path.join(CONFIG_FILE_NAME);
            trace!("Checking for config at: {:?}", config_path);
            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        error!("Configuration file '{}' not found in any parent directory.", CONFIG_FILE_NAME);
        Err(ConvgenError::ConfigNotFound {
            search_start: start_dir.to_path_buf(),
        })
    }

    /// Parses TOML content, substitutes environment variables in path
    /// settings and anchors relative paths at the file's directory.
    pub fn parse_toml(content: &str, path: &Path) -> Result<ConvgenConfig> {
        let mut config: ConvgenConfig = toml::from_str(content).map_err(|e| {
            error!("Failed to parse TOML configuration: {}", e);
            ConvgenError::config(format!("{}: {}", path.display(), e))
        })?;
        debug!("Successfully parsed TOML configuration");

        config.scan.index_path = Self::substitute_env_vars(&config.scan.index_path)?;
        config.output.output_path = Self::substitute_env_vars(&config.output.output_path)?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!(
            "Annotation: {}, parallel: {}, receiver: {}",
            config.general.annotation, config.general.parallel, config.profile.receiver
        );

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.general.annotation.trim().is_empty() {
            return Err(ConvgenError::config("general.annotation must not be empty"));
        }
        if self.profile.receiver.trim().is_empty() {
            return Err(ConvgenError::config("profile.receiver must not be empty"));
        }
        if self.output.file_extension.is_empty() || self.output.file_extension.contains('.') {
            return Err(ConvgenError::config(format!(
                "output.file_extension must be a bare extension, got {:?}",
                self.output.file_extension
            )));
        }
        Ok(())
    }

    /// Substitute environment variables in config strings.
    /// Supports `${VAR_NAME}` and `${VAR_NAME:-default}`.
    pub fn substitute_env_vars(value: &str) -> Result<String> {
        trace!("Substituting environment variables in: {}", value);
        let mut result = value.to_string();

        for cap in ENV_VAR_RE.captures_iter(value) {
            let var_name = &cap[1];
            let default_value = cap.get(2).map(|m| m.as_str());

            let replacement = match env::var(var_name) {
                Ok(val) => {
                    debug!("Resolved environment variable: {}", var_name);
                    val
                }
                Err(_) => match default_value {
                    Some(default) => {
                        warn!(
                            "Environment variable {} not set, using default: {}",
                            var_name, default
                        );
                        default.to_string()
                    }
                    None => {
                        error!(
                            "Environment variable {} not set and no default provided",
                            var_name
                        );
                        return Err(ConvgenError::EnvVarNotSet(var_name.to_string()));
                    }
                },
            };

            result = result.replace(&cap[0], &replacement);
        }

        Ok(result)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.resolve(&self.scan.index_path)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output.output_path)
    }

    /// Renders this configuration as `convgen.toml` content.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Creates a builder for programmatic configuration.
    pub fn builder() -> ConvgenConfigBuilder {
        ConvgenConfigBuilder::new()
    }
}

/// Builder for creating ConvgenConfig programmatically.
#[derive(Debug, Clone, Default)]
pub struct ConvgenConfigBuilder {
    config: ConvgenConfig,
}

impl ConvgenConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ConvgenConfig::default(),
        }
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.config.general.annotation = annotation.into();
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.general.parallel = parallel;
        self
    }

    pub fn index_path(mut self, path: impl Into<String>) -> Self {
        self.config.scan.index_path = path.into();
        self
    }

    pub fn output_path(mut self, path: impl Into<String>) -> Self {
        self.config.output.output_path = path.into();
        self
    }

    pub fn file_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.output.file_extension = extension.into();
        self
    }

    pub fn receiver(mut self, receiver: impl Into<String>) -> Self {
        self.config.profile.receiver = receiver.into();
        self
    }

    /// Adds one class to the `@file:OptIn(...)` list.
    pub fn opt_in(mut self, opt_in: impl Into<String>) -> Self {
        self.config.profile.opt_ins.push(opt_in.into());
        self
    }

    pub fn opt_ins(mut self, opt_ins: Vec<String>) -> Self {
        self.config.profile.opt_ins = opt_ins;
        self
    }

    pub fn runtime_imports(mut self, imports: Vec<String>) -> Self {
        self.config.profile.runtime_imports = imports;
        self
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> ConvgenConfig {
        self.config
    }
}
