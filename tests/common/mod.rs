//! Shared test utilities
//!
//! An in-process stub speaking the backend's wire protocol, with canned
//! per-call responses and request recording. Tests run the real client
//! against it over loopback; no inference backend is required.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};

use iris_client::audio::{SAMPLE_RATE, samples_to_wav};

/// Canned audio payload served by the stub's synthesis route
pub const STUB_TTS_AUDIO: &[u8] = b"RIFF-stub-synthesized-audio";

/// Requests the stub observed
#[derive(Debug, Default)]
pub struct Observed {
    /// `prompt` field of each multimodal call, in order
    pub prompts: Vec<String>,
    /// Size of the `file` part of each multimodal call
    pub image_sizes: Vec<usize>,
    /// Number of transcription calls
    pub asr_calls: usize,
    /// Decoded path segment of each synthesis call, in order
    pub tts_texts: Vec<String>,
}

/// One canned endpoint response: status plus raw body
type Canned = (StatusCode, String);

#[derive(Clone)]
struct StubState {
    multimodal: Arc<Mutex<Vec<Canned>>>,
    asr: Arc<Mutex<Vec<Canned>>>,
    tts: Arc<Mutex<(StatusCode, Vec<u8>)>>,
    observed: Arc<Mutex<Observed>>,
}

/// Running stub backend
pub struct StubBackend {
    /// Base URL of the stub (`http://127.0.0.1:<port>`)
    pub url: String,
    observed: Arc<Mutex<Observed>>,
}

impl StubBackend {
    /// Snapshot of everything the stub observed so far
    pub fn observed(&self) -> Observed {
        let observed = self.observed.lock().unwrap();
        Observed {
            prompts: observed.prompts.clone(),
            image_sizes: observed.image_sizes.clone(),
            asr_calls: observed.asr_calls,
            tts_texts: observed.tts_texts.clone(),
        }
    }
}

/// Builder for a stub backend
///
/// Multimodal and transcription responses are queues consumed one per call;
/// the last entry repeats once the queue is exhausted.
pub struct StubBuilder {
    multimodal: Vec<Canned>,
    asr: Vec<Canned>,
    tts: (StatusCode, Vec<u8>),
}

impl Default for StubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StubBuilder {
    pub fn new() -> Self {
        Self {
            multimodal: Vec::new(),
            asr: Vec::new(),
            tts: (StatusCode::OK, STUB_TTS_AUDIO.to_vec()),
        }
    }

    /// Queue a successful multimodal response body
    #[must_use]
    pub fn multimodal(mut self, body: &str) -> Self {
        self.multimodal.push((StatusCode::OK, body.to_string()));
        self
    }

    /// Queue a multimodal response with an explicit status
    #[must_use]
    pub fn multimodal_status(mut self, status: StatusCode, body: &str) -> Self {
        self.multimodal.push((status, body.to_string()));
        self
    }

    /// Queue a successful transcription response body
    #[must_use]
    pub fn asr(mut self, body: &str) -> Self {
        self.asr.push((StatusCode::OK, body.to_string()));
        self
    }

    /// Queue a transcription response with an explicit status
    #[must_use]
    pub fn asr_status(mut self, status: StatusCode, body: &str) -> Self {
        self.asr.push((status, body.to_string()));
        self
    }

    /// Replace the synthesis payload
    #[must_use]
    pub fn tts(mut self, audio: &[u8]) -> Self {
        self.tts = (StatusCode::OK, audio.to_vec());
        self
    }

    /// Make the synthesis route fail
    #[must_use]
    pub fn tts_status(mut self, status: StatusCode) -> Self {
        self.tts = (status, Vec::new());
        self
    }

    /// Bind the stub to an ephemeral loopback port and serve it
    pub async fn spawn(self) -> StubBackend {
        let observed = Arc::new(Mutex::new(Observed::default()));
        let state = StubState {
            multimodal: Arc::new(Mutex::new(self.multimodal)),
            asr: Arc::new(Mutex::new(self.asr)),
            tts: Arc::new(Mutex::new(self.tts)),
            observed: Arc::clone(&observed),
        };

        let app = Router::new()
            .route("/multimodal", post(multimodal))
            .route("/asr", post(asr))
            .route("/tts/{text}", get(tts))
            .route("/hello", get(hello))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub backend");
        let addr = listener.local_addr().expect("failed to read stub address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub backend died");
        });

        StubBackend {
            url: format!("http://{addr}"),
            observed,
        }
    }
}

/// Pop the next canned response, repeating the last entry when exhausted
fn next_canned(queue: &Mutex<Vec<Canned>>) -> Canned {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.remove(0)
    } else {
        queue
            .first()
            .cloned()
            .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "unconfigured".to_string()))
    }
}

async fn multimodal(State(state): State<StubState>, mut multipart: Multipart) -> impl IntoResponse {
    let mut prompt = String::new();
    let mut image_size = 0;

    while let Some(field) = multipart.next_field().await.expect("bad multipart field") {
        match field.name() {
            Some("prompt") => prompt = field.text().await.expect("bad prompt field"),
            Some("file") => image_size = field.bytes().await.expect("bad file field").len(),
            _ => {}
        }
    }

    {
        let mut observed = state.observed.lock().unwrap();
        observed.prompts.push(prompt);
        observed.image_sizes.push(image_size);
    }

    next_canned(&state.multimodal)
}

async fn asr(State(state): State<StubState>, mut multipart: Multipart) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.expect("bad multipart field") {
        let _ = field.bytes().await.expect("bad file field");
    }

    state.observed.lock().unwrap().asr_calls += 1;
    next_canned(&state.asr)
}

async fn tts(State(state): State<StubState>, Path(text): Path<String>) -> impl IntoResponse {
    state.observed.lock().unwrap().tts_texts.push(text);
    state.tts.lock().unwrap().clone()
}

async fn hello() -> &'static str {
    "Hello World!"
}

/// A short silent recording in the contracted WAV format
pub fn question_wav() -> Vec<u8> {
    samples_to_wav(&vec![0.0; SAMPLE_RATE as usize / 10], SAMPLE_RATE)
        .expect("failed to encode test WAV")
}

/// Fake JPEG payload (the stub never decodes it)
pub fn photo_jpeg() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend_from_slice(&[0x42; 64]);
    bytes
}
