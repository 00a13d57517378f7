//! Conversation transcript state
//!
//! The backend keeps no server-side session memory; the growing transcript
//! is re-sent verbatim as the prompt on every question, so its exact format
//! is part of the wire contract.

use crate::{Error, Result};

/// Running conversation log for one session
///
/// Append-only between resets. A pushed question opens an answer slot that
/// must be closed before the next question; out-of-order mutations are
/// rejected rather than corrupting the format the backend parses.
#[derive(Debug, Default)]
pub struct Transcript {
    text: String,
    awaiting_answer: bool,
}

impl Transcript {
    /// Create an empty transcript
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Full transcript text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True if nothing has been recorded since the last reset
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True if a question is waiting for its answer
    #[must_use]
    pub const fn awaiting_answer(&self) -> bool {
        self.awaiting_answer
    }

    /// Discard all recorded turns
    pub fn reset(&mut self) {
        self.text.clear();
        self.awaiting_answer = false;
    }

    /// Replace the transcript with the image description context
    ///
    /// Always the first entry of a conversation; any prior turns are
    /// discarded along with the photo they belonged to.
    pub fn set_context(&mut self, description: &str) {
        self.text = format!("Context: {description}\n");
        self.awaiting_answer = false;
    }

    /// Record a question, leaving its answer slot open
    ///
    /// # Errors
    ///
    /// Returns a sequence error if the previous answer is still pending
    pub fn push_question(&mut self, question: &str) -> Result<()> {
        if self.awaiting_answer {
            return Err(Error::Sequence(
                "question recorded while the previous answer is pending".to_string(),
            ));
        }

        self.text.push_str(&format!("Question: {question}\nAnswer: "));
        self.awaiting_answer = true;
        Ok(())
    }

    /// Close the open answer slot
    ///
    /// # Errors
    ///
    /// Returns a sequence error if no question is pending
    pub fn push_answer(&mut self, answer: &str) -> Result<()> {
        if !self.awaiting_answer {
            return Err(Error::Sequence(
                "answer recorded with no pending question".to_string(),
            ));
        }

        self.text.push_str(&format!("{answer}\n"));
        self.awaiting_answer = false;
        Ok(())
    }
}
