//! Turn orchestration
//!
//! Sequences the capture boundary and the backend client through the two
//! user flows: describe a newly captured photo, and answer a spoken
//! question about the held photo. The transcript is the only shared state
//! and has exactly one writer; both flows take `&mut self`, so a new photo
//! cannot race an in-flight question.

use crate::boundary::MediaBoundary;
use crate::client::BackendClient;
use crate::transcript::Transcript;
use crate::{Error, Result};

/// Placeholder answer recorded when the backend returns empty text
pub const NOT_ANSWERED: &str = "<Not Answered>";

/// Session phase
///
/// `Idle` until a photo has been described; `AwaitingTranscription` while a
/// question round-trip is in flight; back to `HasImage` after every
/// completed question cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No described photo held; questions are rejected
    Idle,
    /// A described photo is held and questions may be asked
    HasImage,
    /// A question recording is being transcribed
    AwaitingTranscription,
}

/// Output of one completed turn
#[derive(Debug)]
pub struct Turn {
    /// Text of the turn (image description or answer)
    pub text: String,
    /// Synthesized speech for the text, when synthesis succeeded
    pub speech: Option<Vec<u8>>,
}

/// One visual Q&A conversation
///
/// Owns the transcript, the held photo, and the backend client; lives for
/// one app session and is never persisted.
pub struct Session {
    client: BackendClient,
    transcript: Transcript,
    image: Option<Vec<u8>>,
    phase: Phase,
}

impl Session {
    /// Create an idle session
    #[must_use]
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            transcript: Transcript::new(),
            image: None,
            phase: Phase::Idle,
        }
    }

    /// Current session phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Rendered transcript so far
    #[must_use]
    pub fn transcript(&self) -> &str {
        self.transcript.as_str()
    }

    /// Drop the held photo and all recorded turns
    pub fn reset(&mut self) {
        self.transcript.reset();
        self.image = None;
        self.phase = Phase::Idle;
        tracing::debug!("session reset");
    }

    /// Describe a newly captured photo, discarding any prior conversation
    ///
    /// On success the photo is held for follow-up questions and the turn
    /// carries the description plus its synthesized speech.
    ///
    /// # Errors
    ///
    /// Returns the multimodal query failure; the session is left idle with
    /// an empty transcript
    pub async fn describe(&mut self, image: Vec<u8>) -> Result<Turn> {
        self.reset();

        let description = self.client.query_multimodal(&image, "").await?;

        self.transcript.set_context(&description);
        self.image = Some(image);
        self.phase = Phase::HasImage;
        tracing::info!(chars = description.len(), "photo described");

        let speech = self.synthesize_or_log(&description).await;
        Ok(Turn {
            text: description,
            speech,
        })
    }

    /// Answer a spoken question about the held photo
    ///
    /// The full transcript is sent as the prompt, carrying the conversation
    /// context the backend does not keep server-side. An empty answer from
    /// the backend is recorded as the [`NOT_ANSWERED`] placeholder and not
    /// synthesized.
    ///
    /// # Errors
    ///
    /// Returns a sequence error if no described photo is held (no request
    /// is issued), or the first failing remote call. A failure after the
    /// question was recorded closes the open answer slot with a visible
    /// `<Error: …>` entry so the transcript never ends mid-turn.
    pub async fn ask(&mut self, audio: &[u8]) -> Result<Turn> {
        if self.phase != Phase::HasImage {
            return Err(Error::Sequence(
                "question asked with no described photo held".to_string(),
            ));
        }
        let Some(image) = self.image.clone() else {
            self.phase = Phase::Idle;
            return Err(Error::Sequence("session holds no photo".to_string()));
        };

        self.phase = Phase::AwaitingTranscription;
        let question = match self.client.transcribe(audio).await {
            Ok(question) => question,
            Err(e) => {
                // No slot was opened; the caller renders the failure
                self.phase = Phase::HasImage;
                return Err(e);
            }
        };

        if let Err(e) = self.transcript.push_question(&question) {
            self.phase = Phase::HasImage;
            return Err(e);
        }

        let answer = match self
            .client
            .query_multimodal(&image, self.transcript.as_str())
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                self.close_slot_with_error(&e);
                self.phase = Phase::HasImage;
                return Err(e);
            }
        };

        self.phase = Phase::HasImage;

        if answer.is_empty() {
            self.transcript.push_answer(NOT_ANSWERED)?;
            tracing::info!("backend declined to answer");
            return Ok(Turn {
                text: NOT_ANSWERED.to_string(),
                speech: None,
            });
        }

        self.transcript.push_answer(&answer)?;
        tracing::info!(chars = answer.len(), "question answered");

        let speech = self.synthesize_or_log(&answer).await;
        Ok(Turn {
            text: answer,
            speech,
        })
    }

    /// Drive the capture flow end to end against a boundary
    ///
    /// Captures a photo, runs [`Session::describe`], renders the transcript,
    /// and plays the spoken description.
    ///
    /// # Errors
    ///
    /// Returns capture, flow, or playback failures
    pub async fn run_describe(&mut self, boundary: &mut dyn MediaBoundary) -> Result<()> {
        let image = boundary.capture_image().await?;
        let turn = self.describe(image).await?;

        boundary.render_transcript(self.transcript.as_str());
        if let Some(speech) = turn.speech {
            boundary.play_audio(&speech).await?;
        }
        Ok(())
    }

    /// Drive the question flow end to end against a boundary
    ///
    /// Records a question, runs [`Session::ask`], renders the transcript
    /// (also on failure, so error entries reach the user), and plays the
    /// spoken answer.
    ///
    /// # Errors
    ///
    /// Returns recording, flow, or playback failures
    pub async fn run_ask(&mut self, boundary: &mut dyn MediaBoundary) -> Result<()> {
        let recording = boundary.record_audio().await?;

        let turn = match self.ask(&recording).await {
            Ok(turn) => turn,
            Err(e) => {
                boundary.render_transcript(self.transcript.as_str());
                return Err(e);
            }
        };

        boundary.render_transcript(self.transcript.as_str());
        if let Some(speech) = turn.speech {
            boundary.play_audio(&speech).await?;
        }
        Ok(())
    }

    /// Record a failed turn in the transcript if an answer slot is open
    fn close_slot_with_error(&mut self, error: &Error) {
        if !self.transcript.awaiting_answer() {
            return;
        }

        let entry = format!("<Error: {error}>");
        if let Err(e) = self.transcript.push_answer(&entry) {
            tracing::error!(error = %e, "failed to record error entry");
        }
    }

    /// Synthesize speech for a completed turn
    ///
    /// A synthesis failure keeps the turn's text; the failure is logged and
    /// the turn carries no audio.
    async fn synthesize_or_log(&self, text: &str) -> Option<Vec<u8>> {
        match self.client.synthesize(text).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed");
                None
            }
        }
    }
}
