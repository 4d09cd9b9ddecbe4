//! Session orchestrator - view flow, joined advisory fetch and chat.
//!
//! All session data lives in one [`SessionState`] published through a watch
//! channel. Each operation mutates it in a single update, so observers never
//! see a half-applied transition. Results of asynchronous requests carry the
//! epoch they were issued under and are dropped once it has moved on.
//! Protocol results follow the session epoch (reset or new assessment);
//! chat replies follow the chat epoch, which only a reset advances because
//! the history survives a new assessment.

use std::sync::Arc;

use advisory_llm::{AdvisoryBackend, AdvisoryClient};
use crisis_core::{ChatMessage, Config, EffectiveLocation, EmergencyResource, LocationState};
use serde::Serialize;
use session_state::{SessionEvent, StateMachine, StateTransition, TransitionError, ViewState};
use tokio::sync::watch;

use crate::location::{LocationAcquirer, LocationFallbackController};
use crate::ports::LocationProvider;

/// Sent when the user submits the severity form without describing anything.
pub const DEFAULT_SEVERITY: &str = "Situation Unknown. Need General Protocol.";

/// Observable session record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub view: ViewState,
    pub disaster: String,
    pub protocol: String,
    pub resources: Vec<EmergencyResource>,
    pub chat_history: Vec<ChatMessage>,
    pub is_generating: bool,
    pub is_loading_resources: bool,
    pub is_chatting: bool,
    #[serde(skip)]
    pending_chats: usize,
    #[serde(skip)]
    epoch: u64,
    #[serde(skip)]
    chat_epoch: u64,
    #[serde(skip)]
    machine: StateMachine,
}

impl SessionState {
    pub fn transitions(&self) -> &[StateTransition] {
        self.machine.history()
    }

    fn apply(&mut self, event: SessionEvent) -> Result<StateTransition, TransitionError> {
        let transition = self.machine.handle_event(event)?;
        self.view = transition.to;
        Ok(transition)
    }
}

pub struct SessionOrchestrator {
    advisory: AdvisoryClient,
    location: LocationFallbackController,
    state: watch::Sender<SessionState>,
}

impl SessionOrchestrator {
    pub fn new(advisory: AdvisoryClient, location: LocationFallbackController) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            advisory,
            location,
            state,
        }
    }

    /// Wire the orchestrator from raw ports and the loaded configuration.
    pub fn from_ports(
        backend: Arc<dyn AdvisoryBackend>,
        provider: Arc<dyn LocationProvider>,
        config: &Config,
    ) -> Self {
        Self::new(
            AdvisoryClient::new(backend),
            LocationFallbackController::new(LocationAcquirer::new(
                provider,
                config.location_timeout(),
            )),
        )
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn subscribe_location(&self) -> watch::Receiver<LocationState> {
        self.location.subscribe()
    }

    /// Latest committed session state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn location(&self) -> &LocationFallbackController {
        &self.location
    }

    /// Select a disaster, enter assessment and acquire the location.
    ///
    /// The view changes before the location lookup is awaited; hosts that
    /// must not wait for the lookup spawn this future.
    pub async fn start_assessment(&self, disaster: &str) {
        let disaster = disaster.trim().to_string();
        let started = self.state.send_if_modified(|s| {
            match s.apply(SessionEvent::Start {
                disaster: disaster.clone(),
            }) {
                Ok(_) => {
                    s.disaster = disaster.clone();
                    s.protocol.clear();
                    s.resources.clear();
                    s.epoch += 1;
                    true
                }
                Err(e) => {
                    log::warn!("Ignoring start_assessment: {}", e);
                    false
                }
            }
        });

        if started {
            log::info!("Assessment started for {}", disaster);
            self.location.begin_acquisition().await;
        }
    }

    /// Move to the protocol view and fetch the protocol and nearby resources
    /// concurrently. Both settle before anything is committed.
    pub async fn generate_protocol(&self, severity: &str) {
        let severity = normalize_severity(severity);
        let location = self.location.effective_location();

        let mut issued = None;
        self.state.send_if_modified(|s| match s.apply(SessionEvent::Confirm) {
            Ok(_) => {
                s.resources.clear();
                s.is_generating = true;
                s.is_loading_resources = true;
                issued = Some((s.epoch, s.disaster.clone()));
                true
            }
            Err(e) => {
                log::warn!("Ignoring generate_protocol: {}", e);
                false
            }
        });
        let Some((epoch, disaster)) = issued else {
            return;
        };

        log::info!("Requesting protocol for {} at {}", disaster, location);
        let (protocol, resources) = futures::future::join(
            self.advisory.request_protocol(&disaster, &location, &severity),
            self.advisory.request_resources(&location),
        )
        .await;

        let summary = alert_summary(&disaster, &location, &severity);
        let resource_count = resources.len();
        let committed = self.state.send_if_modified(|s| {
            if s.epoch != epoch {
                return false;
            }
            s.chat_history.push(ChatMessage::user(summary));
            s.chat_history.push(ChatMessage::model(protocol.clone()));
            s.protocol = protocol;
            s.resources = resources;
            s.is_generating = false;
            s.is_loading_resources = false;
            true
        });

        if committed {
            log::info!("Protocol ready with {} nearby resources", resource_count);
        } else {
            log::info!("Discarding protocol results from a superseded session");
        }
    }

    /// Append a user turn, ask the specialist and append the reply.
    /// Blank messages are ignored.
    pub async fn send_message(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        let mut epoch = 0;
        let mut prior = Vec::new();
        self.state.send_modify(|s| {
            epoch = s.chat_epoch;
            prior = s.chat_history.clone();
            s.chat_history.push(ChatMessage::user(text));
            s.pending_chats += 1;
            s.is_chatting = true;
        });

        let reply = self.advisory.continue_chat(&prior, text).await;

        let committed = self.state.send_if_modified(|s| {
            if s.chat_epoch != epoch {
                return false;
            }
            s.chat_history.push(ChatMessage::model(reply));
            s.pending_chats = s.pending_chats.saturating_sub(1);
            s.is_chatting = s.pending_chats > 0;
            true
        });
        if !committed {
            log::debug!("Discarding chat reply from a superseded session");
        }
    }

    /// Protocol → Chat.
    pub fn proceed_to_chat(&self) {
        self.transition(SessionEvent::Proceed);
    }

    /// Assessing/Protocol → Chat without waiting for the protocol.
    pub fn skip_to_chat(&self) {
        self.transition(SessionEvent::Skip);
    }

    /// Back to Home with every piece of session data cleared in one update.
    pub fn reset_session(&self) {
        self.state.send_modify(|s| {
            if let Err(e) = s.apply(SessionEvent::Reset) {
                log::warn!("Reset transition rejected: {}", e);
            }
            let machine = std::mem::take(&mut s.machine);
            *s = SessionState {
                epoch: s.epoch + 1,
                chat_epoch: s.chat_epoch + 1,
                machine,
                ..SessionState::default()
            };
        });
        self.location.reset();
        log::info!("Session reset");
    }

    pub fn enable_manual_entry(&self, reason: Option<String>) {
        self.location.enable_manual_entry(reason);
    }

    pub fn update_manual_address(&self, text: impl Into<String>) {
        self.location.update_manual_address(text);
    }

    pub async fn retry_location(&self) {
        self.location.retry().await;
    }

    fn transition(&self, event: SessionEvent) {
        self.state.send_if_modified(|s| match s.apply(event) {
            Ok(transition) => transition.changed,
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        });
    }
}

fn normalize_severity(severity: &str) -> String {
    if severity.trim().is_empty() {
        DEFAULT_SEVERITY.to_string()
    } else {
        severity.to_string()
    }
}

fn alert_summary(disaster: &str, location: &EffectiveLocation, severity: &str) -> String {
    format!("EMERGENCY ALERT: {disaster}. Location: {location}. Info: {severity}")
}
