/// Encoder service - produces the encoded mirror of the library
use crate::{
    config::{AppConfig, EncoderConfig, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER},
    error::{AppError, Result},
};
use musiclib_core::{CatalogStore, Song};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Counts from one encode pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub candidates: usize,
    /// Songs whose encoded copies were already current
    pub current: usize,
    pub copied: usize,
    pub encoded: usize,
    /// Lossless songs left alone because no encoder is configured
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct EncoderService {
    music_dir: PathBuf,
    encoded_dir: PathBuf,
    encoders: Vec<EncoderConfig>,
}

impl EncoderService {
    pub fn new(music_dir: PathBuf, encoded_dir: PathBuf, encoders: Vec<EncoderConfig>) -> Self {
        Self {
            music_dir,
            encoded_dir,
            encoders,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.music_dir.clone(),
            config.encoded_dir.clone(),
            config.encoders.clone(),
        )
    }

    /// Bring the encoded mirror up to date for every persisted song.
    ///
    /// Songs whose `encoded_source` matches their fingerprint are skipped.
    /// Lossy sources are copied; lossless sources run every configured encoder
    /// and stay pending when there is none.
    pub async fn encode_all(&self, store: &dyn CatalogStore) -> Result<EncodeStats> {
        for encoder in &self.encoders {
            encoder.validate()?;
        }

        let catalog = store.load_catalog().await?;
        let mut stats = EncodeStats {
            candidates: catalog.song_count(),
            ..Default::default()
        };
        tracing::info!("{} songs are candidates for encoding", stats.candidates);

        for (_, _, song) in catalog.songs() {
            if song.is_encoding_current() {
                stats.current += 1;
                continue;
            }

            let Some(id) = song.id else {
                continue;
            };

            if song.is_encoded {
                self.copy_song(song).await?;
                stats.copied += 1;
            } else if self.encoders.is_empty() {
                tracing::debug!("No encoder configured for {}", song.relative_path);
                stats.skipped += 1;
                continue;
            } else {
                self.encode_song(song).await?;
                stats.encoded += 1;
            }

            store.set_encoded_source(id, &song.fingerprint).await?;
        }

        if stats.skipped > 0 {
            tracing::warn!("{} lossless songs left unencoded: no encoders configured", stats.skipped);
        }
        tracing::info!(
            "Encode complete: {} copied, {} encoded, {} already current",
            stats.copied,
            stats.encoded,
            stats.current
        );
        Ok(stats)
    }

    /// Copy an already-lossy source to `encoded_dir/basePath+encodedExtension`.
    pub async fn copy_song(&self, song: &Song) -> Result<PathBuf> {
        let source = self.music_dir.join(&song.relative_path);
        let dest = self
            .encoded_dir
            .join(format!("{}{}", song.base_path, song.encoded_extension));

        tracing::info!("Copying {}...", song.relative_path);
        create_parent(&dest).await?;
        tokio::fs::copy(&source, &dest).await?;
        Ok(dest)
    }

    /// Run every encoder on a lossless source, one output per encoder extension.
    pub async fn encode_song(&self, song: &Song) -> Result<Vec<PathBuf>> {
        let input = self.music_dir.join(&song.relative_path);
        let mut outputs = Vec::with_capacity(self.encoders.len());

        tracing::info!("Encoding {}...", song.relative_path);
        for encoder in &self.encoders {
            let output = self
                .encoded_dir
                .join(format!("{}{}", song.base_path, encoder.extension));
            create_parent(&output).await?;
            run_encoder(encoder, &input, &output).await?;
            outputs.push(output);
        }

        Ok(outputs)
    }
}

/// Encoder argv with the placeholders replaced.
pub fn build_command(encoder: &EncoderConfig, input: &Path, output: &Path) -> Vec<OsString> {
    encoder
        .commands
        .iter()
        .map(|arg| match arg.as_str() {
            INPUT_PLACEHOLDER => input.as_os_str().to_os_string(),
            OUTPUT_PLACEHOLDER => output.as_os_str().to_os_string(),
            other => OsString::from(other),
        })
        .collect()
}

async fn run_encoder(encoder: &EncoderConfig, input: &Path, output: &Path) -> Result<()> {
    let argv = build_command(encoder, input, output);
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| AppError::Config("Encoder command is empty".to_string()))?;

    let result = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| AppError::Encoder(format!("Failed to start {:?}: {}", program, e)))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(AppError::Encoder(format!(
            "{:?} failed on {}: {}",
            program,
            input.display(),
            stderr.trim()
        )));
    }

    Ok(())
}

async fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}
