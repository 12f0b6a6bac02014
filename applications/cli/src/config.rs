/// Application configuration
use crate::error::{AppError, Result};
use musiclib_importer::FingerprintStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder replaced by the source file path in encoder commands
pub const INPUT_PLACEHOLDER: &str = "$INPUT";
/// Placeholder replaced by the encoded file path in encoder commands
pub const OUTPUT_PLACEHOLDER: &str = "$OUTPUT";

const DEFAULT_CONFIG_FILE: &str = "musiclib.yaml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Root of the music library
    #[serde(default)]
    pub music_dir: PathBuf,

    #[serde(default = "default_encoded_dir")]
    pub encoded_dir: PathBuf,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub fingerprint: FingerprintStrategy,

    /// Moved songs take freshly extracted tags instead of keeping their metadata
    #[serde(default)]
    pub reextract_moved: bool,

    #[serde(default)]
    pub parallel: bool,

    /// Worker pool size; number of CPUs when unset
    #[serde(default)]
    pub workers: Option<usize>,

    #[serde(default)]
    pub encoders: Vec<EncoderConfig>,

    #[serde(default = "default_server")]
    pub server: ServerSettings,
}

/// One external encoder run for every lossless source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EncoderConfig {
    /// Extension of the produced file, including the dot
    pub extension: String,
    /// Program and arguments; must contain `$INPUT` and `$OUTPUT`
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from a YAML file and `MUSICLIB_*` environment variables.
    ///
    /// An explicit `path` must exist; otherwise `musiclib.yaml` in the working
    /// directory is used when present. Nested keys use `__` in variable names
    /// (`MUSICLIB_SERVER__PORT`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file '{}' does not exist",
                        path.display()
                    )));
                }
                settings = settings
                    .add_source(config::File::from(path).format(config::FileFormat::Yaml));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(
                        config::File::from(default_path).format(config::FileFormat::Yaml),
                    );
                }
            }
        }

        // Override with environment variables (prefixed with MUSICLIB_)
        settings = settings.add_source(
            config::Environment::with_prefix("MUSICLIB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.music_dir.as_os_str().is_empty() {
            return Err(AppError::Config(
                "No music directory configured (set music_dir or MUSICLIB_MUSIC_DIR)".to_string(),
            ));
        }

        if !self.music_dir.is_dir() {
            return Err(AppError::Config(format!(
                "Music directory {:?} does not exist",
                self.music_dir
            )));
        }

        for encoder in &self.encoders {
            encoder.validate()?;
        }

        Ok(())
    }
}

impl EncoderConfig {
    pub fn validate(&self) -> Result<()> {
        let has = |placeholder: &str| self.commands.iter().any(|arg| arg == placeholder);
        if self.commands.is_empty() || !has(INPUT_PLACEHOLDER) || !has(OUTPUT_PLACEHOLDER) {
            return Err(AppError::Config(format!(
                "Encoder for '{}' must name {} and {}",
                self.extension, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER
            )));
        }
        Ok(())
    }
}

// Default values
fn default_encoded_dir() -> PathBuf {
    PathBuf::from("./encoded")
}

fn default_database_url() -> String {
    "sqlite://./musiclib.db".to_string()
}

fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9904
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::new(),
            encoded_dir: default_encoded_dir(),
            database_url: default_database_url(),
            fingerprint: FingerprintStrategy::default(),
            reextract_moved: false,
            parallel: false,
            workers: None,
            encoders: Vec::new(),
            server: default_server(),
        }
    }
}
