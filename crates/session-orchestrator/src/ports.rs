//! Device capability ports.
//!
//! Geolocation and speech recognition are host capabilities; the session
//! only talks to them through these traits.

use async_trait::async_trait;
use crisis_core::Coordinates;
use thiserror::Error;

/// Categorised location failure. The message is shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("User denied the request for Geolocation.")]
    PermissionDenied,

    #[error("Location information is unavailable.")]
    Unavailable,

    #[error("The request to get user location timed out.")]
    Timeout,

    #[error("Geolocation is not supported on this device.")]
    Unsupported,
}

/// Single-shot device position lookup.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Provider for hosts without geolocation.
pub struct UnsupportedLocationProvider;

#[async_trait]
impl LocationProvider for UnsupportedLocationProvider {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Provider answering with a fixed position, e.g. one passed on the command line.
pub struct StaticLocationProvider {
    coordinates: Coordinates,
}

impl StaticLocationProvider {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech recognition is not supported")]
    Unsupported,

    #[error("Speech recognition failed to start: {0}")]
    StartFailed(String),
}

/// Terminal outcome of a single-utterance recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Result(String),
    Error(String),
    End,
}

/// Device speech recognizer. Events are delivered by the host through
/// [`crate::VoiceInputController::on_event`].
pub trait SpeechRecognizer: Send + Sync {
    fn is_supported(&self) -> bool;
    fn start(&self) -> Result<(), SpeechError>;
    fn stop(&self);
}

pub struct UnsupportedSpeechRecognizer;

impl SpeechRecognizer for UnsupportedSpeechRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&self) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn stop(&self) {}
}
