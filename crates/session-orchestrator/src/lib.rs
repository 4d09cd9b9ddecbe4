//! session-orchestrator - Coordinates an emergency-assistance session
//!
//! Wires device ports (location, speech) and the advisory client into a
//! session: location acquisition with manual fallback, the view-state
//! machine, the joined protocol/resources fetch and the running chat.

pub mod location;
pub mod orchestrator;
pub mod ports;
pub mod voice;

pub use location::{LocationAcquirer, LocationFallbackController};
pub use orchestrator::{SessionOrchestrator, SessionState, DEFAULT_SEVERITY};
pub use ports::{
    LocationError, LocationProvider, RecognitionEvent, SpeechError, SpeechRecognizer,
    StaticLocationProvider, UnsupportedLocationProvider, UnsupportedSpeechRecognizer,
};
pub use voice::{VoiceInputController, VoiceSessionState};
