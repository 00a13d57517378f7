//! Capture/playback boundary
//!
//! The platform layer that owns the camera, microphone, and speaker sits
//! behind this trait; the orchestrator depends only on these four
//! operations, not on how a platform implements them.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::audio;
use crate::{Error, Result};

/// External collaborator supplying captured media and consuming output
#[async_trait]
pub trait MediaBoundary: Send {
    /// Produce the current photo as JPEG bytes
    async fn capture_image(&mut self) -> Result<Vec<u8>>;

    /// Produce a recorded question as WAV bytes (mono, 16 kHz, 16-bit PCM)
    async fn record_audio(&mut self) -> Result<Vec<u8>>;

    /// Play synthesized speech
    async fn play_audio(&mut self, audio: &[u8]) -> Result<()>;

    /// Show the current transcript to the user
    fn render_transcript(&mut self, transcript: &str);
}

/// File-backed boundary for headless use
///
/// Reads the photo and question recordings from paths, validates each
/// recording against the transcription WAV contract, and writes synthesized
/// replies to numbered files instead of a speaker.
pub struct FileBoundary {
    image_path: PathBuf,
    recordings: Vec<PathBuf>,
    next_recording: usize,
    out_dir: PathBuf,
    replies_written: usize,
}

impl FileBoundary {
    /// Create a boundary over a photo, a queue of recordings, and an output
    /// directory for replies
    #[must_use]
    pub fn new(image_path: PathBuf, recordings: Vec<PathBuf>, out_dir: PathBuf) -> Self {
        Self {
            image_path,
            recordings,
            next_recording: 0,
            out_dir,
            replies_written: 0,
        }
    }

    /// Number of replies written so far
    #[must_use]
    pub const fn replies_written(&self) -> usize {
        self.replies_written
    }
}

#[async_trait]
impl MediaBoundary for FileBoundary {
    async fn capture_image(&mut self) -> Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.image_path).await?;
        tracing::debug!(path = %self.image_path.display(), bytes = bytes.len(), "photo loaded");
        Ok(bytes)
    }

    async fn record_audio(&mut self) -> Result<Vec<u8>> {
        let path = self.recordings.get(self.next_recording).ok_or_else(|| {
            Error::Audio("no recording left in the question queue".to_string())
        })?;

        let bytes = tokio::fs::read(path).await?;
        audio::validate_wav(&bytes)?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "recording loaded");
        self.next_recording += 1;
        Ok(bytes)
    }

    async fn play_audio(&mut self, audio: &[u8]) -> Result<()> {
        self.replies_written += 1;
        let path = self.out_dir.join(format!("reply-{:02}.wav", self.replies_written));

        tokio::fs::write(&path, audio).await?;
        tracing::info!(path = %path.display(), bytes = audio.len(), "reply written");
        Ok(())
    }

    fn render_transcript(&mut self, transcript: &str) {
        println!("{transcript}");
    }
}
