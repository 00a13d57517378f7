//! Iris - voice-driven visual Q&A client
//!
//! This library provides the conversation core for a client that captures
//! a photo and a spoken question, sends them to a remote multimodal
//! inference backend, and plays back a synthesized spoken answer:
//! - Backend client (multimodal query, transcription, synthesis)
//! - Conversation transcript round-tripped as prompt context
//! - Turn orchestration with an explicit session state machine
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Capture/playback boundary               │
//! │    camera  │  microphone  │  speaker  │  display    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Session (turns)                      │
//! │   describe photo  │  ask question  │  transcript    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │               Backend client (HTTP)                  │
//! │   /multimodal  │  /asr  │  /tts/{text}  │  /hello   │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod audio;
pub mod boundary;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod transcript;

pub use boundary::{FileBoundary, MediaBoundary};
pub use client::BackendClient;
pub use config::Config;
pub use error::{Error, Result};
pub use session::{NOT_ANSWERED, Phase, Session, Turn};
pub use transcript::Transcript;
