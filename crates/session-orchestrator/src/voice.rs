//! Push-to-talk voice input.
//!
//! One utterance per listening session. The recognizer's terminal event
//! returns the controller to idle and a non-empty transcript is submitted
//! as a chat message.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::orchestrator::SessionOrchestrator;
use crate::ports::{RecognitionEvent, SpeechRecognizer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoiceSessionState {
    pub supported: bool,
    pub listening: bool,
}

pub struct VoiceInputController {
    recognizer: Arc<dyn SpeechRecognizer>,
    session: Arc<SessionOrchestrator>,
    state: watch::Sender<VoiceSessionState>,
}

impl VoiceInputController {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, session: Arc<SessionOrchestrator>) -> Self {
        let supported = recognizer.is_supported();
        if !supported {
            log::info!("Speech recognition not available; voice input disabled");
        }
        let (state, _) = watch::channel(VoiceSessionState {
            supported,
            listening: false,
        });
        Self {
            recognizer,
            session,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<VoiceSessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> VoiceSessionState {
        *self.state.borrow()
    }

    pub fn is_listening(&self) -> bool {
        self.state.borrow().listening
    }

    /// Start listening when idle, stop when listening. A recognizer that
    /// fails to start leaves the controller idle.
    ///
    /// The recognizer is called without the state lock held, so it may read
    /// the controller's state from inside `start` or `stop`.
    pub fn toggle(&self) {
        let current = self.state();
        if !current.supported {
            return;
        }

        if current.listening {
            self.recognizer.stop();
            self.set_listening(false);
            return;
        }

        match self.recognizer.start() {
            Ok(()) => self.set_listening(true),
            Err(e) => log::warn!("{}", e),
        }
    }

    fn set_listening(&self, listening: bool) {
        self.state.send_if_modified(|s| {
            if s.listening == listening {
                return false;
            }
            s.listening = listening;
            true
        });
    }

    /// Deliver a recognizer event. Events arriving while idle are dropped.
    pub async fn on_event(&self, event: RecognitionEvent) {
        let was_listening = self.state.send_if_modified(|s| {
            let was = s.listening;
            s.listening = false;
            was
        });
        if !was_listening {
            log::debug!("Dropping recognition event while idle: {:?}", event);
            return;
        }

        match event {
            RecognitionEvent::Result(transcript) => {
                if !transcript.trim().is_empty() {
                    self.session.send_message(&transcript).await;
                }
            }
            RecognitionEvent::Error(reason) => log::warn!("Speech recognition error: {}", reason),
            RecognitionEvent::End => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationAcquirer, LocationFallbackController};
    use crate::ports::{SpeechError, UnsupportedLocationProvider, UnsupportedSpeechRecognizer};
    use advisory_llm::{AdvisoryBackend, AdvisoryClient, Result};
    use crisis_core::{ChatMessage, ChatRole, EffectiveLocation};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct EchoBackend {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl AdvisoryBackend for EchoBackend {
        async fn generate_protocol(
            &self,
            _disaster: &str,
            _location: &EffectiveLocation,
            _severity: &str,
        ) -> Result<String> {
            Ok("protocol".to_string())
        }

        async fn find_resources(&self, _location: &EffectiveLocation) -> Result<String> {
            Ok("[]".to_string())
        }

        async fn continue_chat(&self, _history: &[ChatMessage], message: &str) -> Result<String> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(format!("heard: {message}"))
        }
    }

    #[derive(Default)]
    struct FakeRecognizer {
        fail_start: bool,
        starts: AtomicUsize,
        stops: AtomicUsize,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn is_supported(&self) -> bool {
            true
        }

        fn start(&self) -> std::result::Result<(), SpeechError> {
            if self.fail_start {
                return Err(SpeechError::StartFailed("microphone busy".to_string()));
            }
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn session() -> (Arc<EchoBackend>, Arc<SessionOrchestrator>) {
        let backend = Arc::new(EchoBackend {
            messages: Mutex::new(Vec::new()),
        });
        let session = SessionOrchestrator::new(
            AdvisoryClient::new(backend.clone()),
            LocationFallbackController::new(LocationAcquirer::new(
                Arc::new(UnsupportedLocationProvider),
                Duration::from_secs(10),
            )),
        );
        (backend, Arc::new(session))
    }

    #[tokio::test]
    async fn transcript_is_sent_as_chat_message() {
        let (backend, session) = session();
        let recognizer = Arc::new(FakeRecognizer::default());
        let voice = VoiceInputController::new(recognizer.clone(), session.clone());

        voice.toggle();
        assert!(voice.is_listening());
        assert_eq!(recognizer.starts.load(Ordering::SeqCst), 1);

        voice
            .on_event(RecognitionEvent::Result("water is rising".to_string()))
            .await;

        assert!(!voice.is_listening());
        assert_eq!(*backend.messages.lock().unwrap(), vec!["water is rising".to_string()]);
        let history = session.snapshot().chat_history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[1].text, "heard: water is rising");
    }

    #[tokio::test]
    async fn toggle_while_listening_stops() {
        let (_, session) = session();
        let recognizer = Arc::new(FakeRecognizer::default());
        let voice = VoiceInputController::new(recognizer.clone(), session);

        voice.toggle();
        voice.toggle();

        assert!(!voice.is_listening());
        assert_eq!(recognizer.stops.load(Ordering::SeqCst), 1);
    }

    /// Recognizer that inspects the controller's published state while starting.
    #[derive(Default)]
    struct ObservingRecognizer {
        voice_state: std::sync::OnceLock<watch::Receiver<VoiceSessionState>>,
        seen: Mutex<Vec<bool>>,
    }

    impl SpeechRecognizer for ObservingRecognizer {
        fn is_supported(&self) -> bool {
            true
        }

        fn start(&self) -> std::result::Result<(), SpeechError> {
            if let Some(rx) = self.voice_state.get() {
                self.seen.lock().unwrap().push(rx.borrow().listening);
            }
            Ok(())
        }

        fn stop(&self) {
            if let Some(rx) = self.voice_state.get() {
                self.seen.lock().unwrap().push(rx.borrow().listening);
            }
        }
    }

    #[tokio::test]
    async fn recognizer_can_read_state_during_toggle() {
        let (_, session) = session();
        let recognizer = Arc::new(ObservingRecognizer::default());
        let voice = VoiceInputController::new(recognizer.clone(), session);
        assert!(recognizer.voice_state.set(voice.subscribe()).is_ok());

        voice.toggle();
        assert!(voice.is_listening());
        voice.toggle();
        assert!(!voice.is_listening());

        assert_eq!(*recognizer.seen.lock().unwrap(), vec![false, true]);
    }

    #[tokio::test]
    async fn start_failure_stays_idle() {
        let (_, session) = session();
        let recognizer = Arc::new(FakeRecognizer {
            fail_start: true,
            ..FakeRecognizer::default()
        });
        let voice = VoiceInputController::new(recognizer, session);

        voice.toggle();
        assert!(!voice.is_listening());
    }

    #[tokio::test]
    async fn error_and_end_return_to_idle_without_message() {
        let (backend, session) = session();
        let voice = VoiceInputController::new(Arc::new(FakeRecognizer::default()), session.clone());

        voice.toggle();
        voice
            .on_event(RecognitionEvent::Error("no-speech".to_string()))
            .await;
        assert!(!voice.is_listening());

        voice.toggle();
        voice.on_event(RecognitionEvent::End).await;
        assert!(!voice.is_listening());

        voice.toggle();
        voice.on_event(RecognitionEvent::Result("   ".to_string())).await;

        assert!(backend.messages.lock().unwrap().is_empty());
        assert!(session.snapshot().chat_history.is_empty());
    }

    #[tokio::test]
    async fn events_while_idle_are_dropped() {
        let (backend, session) = session();
        let voice = VoiceInputController::new(Arc::new(FakeRecognizer::default()), session);

        voice
            .on_event(RecognitionEvent::Result("stray".to_string()))
            .await;

        assert!(backend.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unsupported_recognizer_never_listens() {
        let (_, session) = session();
        let voice = VoiceInputController::new(Arc::new(UnsupportedSpeechRecognizer), session);

        assert!(!voice.state().supported);
        voice.toggle();
        assert!(!voice.is_listening());
    }
}
