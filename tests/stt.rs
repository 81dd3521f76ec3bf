//! Transcription chain fallback tests
//!
//! Uses mock backends so no speech model or network is involved.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use voxfolio::audio::{self, NormalizedAudio};
use voxfolio::stt::{SttBackend, TranscriptionChain};
use voxfolio::{Error, Result};

/// A scripted backend that counts how often it is invoked
struct MockBackend {
    name: &'static str,
    outcome: Outcome,
    calls: Arc<AtomicUsize>,
}

enum Outcome {
    Text(&'static str),
    Unrecognized,
    Unavailable,
    RemoteFailure,
}

impl MockBackend {
    fn new(name: &'static str, outcome: Outcome) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                outcome,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl SttBackend for MockBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn transcribe(&self, _clip: &NormalizedAudio) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Text(text) => Ok((*text).to_string()),
            Outcome::Unrecognized => Err(Error::UnrecognizedSpeech),
            Outcome::Unavailable => Err(Error::BackendUnavailable("model missing".to_string())),
            Outcome::RemoteFailure => Err(Error::Transcription("503 unavailable".to_string())),
        }
    }
}

fn clip() -> NormalizedAudio {
    audio::from_samples(vec![0.1; 1600])
}

#[tokio::test]
async fn first_backend_success_short_circuits() {
    let (local, local_calls) = MockBackend::new("local", Outcome::Text("hello there"));
    let (remote, remote_calls) = MockBackend::new("remote", Outcome::Text("should not run"));

    let chain = TranscriptionChain::new(vec![Box::new(local), Box::new(remote)]);
    let text = chain.transcribe(&clip()).await.unwrap();

    assert_eq!(text, "hello there");
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
    assert_eq!(remote_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unavailable_local_falls_back_to_remote() {
    let (local, local_calls) = MockBackend::new("local", Outcome::Unavailable);
    let (remote, remote_calls) = MockBackend::new("remote", Outcome::Text("fallback text"));

    let chain = TranscriptionChain::new(vec![Box::new(local), Box::new(remote)]);
    let text = chain.transcribe(&clip()).await.unwrap();

    assert_eq!(text, "fallback text");
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unrecognized_speech_falls_back_to_remote() {
    let (local, _) = MockBackend::new("local", Outcome::Unrecognized);
    let (remote, _) = MockBackend::new("remote", Outcome::Text("what are your hobbies"));

    let chain = TranscriptionChain::new(vec![Box::new(local), Box::new(remote)]);
    let text = chain.transcribe(&clip()).await.unwrap();

    assert_eq!(text, "what are your hobbies");
}

#[tokio::test]
async fn all_backends_failing_surfaces_last_error() {
    let (local, local_calls) = MockBackend::new("local", Outcome::Unavailable);
    let (remote, remote_calls) = MockBackend::new("remote", Outcome::RemoteFailure);

    let chain = TranscriptionChain::new(vec![Box::new(local), Box::new(remote)]);
    let result = chain.transcribe(&clip()).await;

    // No fabricated text; the caller sees the remote failure
    assert!(matches!(result, Err(Error::Transcription(_))));

    // Each backend tried at most once
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_transcript_counts_as_unrecognized() {
    let (local, _) = MockBackend::new("local", Outcome::Text("   "));
    let (remote, remote_calls) = MockBackend::new("remote", Outcome::Text("real text"));

    let chain = TranscriptionChain::new(vec![Box::new(local), Box::new(remote)]);
    let text = chain.transcribe(&clip()).await.unwrap();

    assert_eq!(text, "real text");
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn whitespace_around_transcript_is_trimmed() {
    let (local, _) = MockBackend::new("local", Outcome::Text("  hello  "));
    let chain = TranscriptionChain::new(vec![Box::new(local)]);

    assert_eq!(chain.transcribe(&clip()).await.unwrap(), "hello");
}

#[tokio::test]
async fn empty_chain_reports_unavailable() {
    let chain = TranscriptionChain::new(Vec::new());
    let result = chain.transcribe(&clip()).await;
    assert!(matches!(result, Err(Error::BackendUnavailable(_))));
}
