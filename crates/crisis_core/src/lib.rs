//! crisis_core - Core domain types for the emergency-assistance session
//!
//! This crate provides the foundational types used across the session crates:
//! - `location` - Coordinates, LocationState and the effective-location rule
//! - `resource` - EmergencyResource and its category set
//! - `message` - Chat messages exchanged with the advisory backend
//! - `disaster` - The fixed disaster catalog
//! - `config` - Runtime configuration

pub mod config;
pub mod disaster;
pub mod location;
pub mod message;
pub mod resource;

// Re-export commonly used types
pub use config::Config;
pub use disaster::{DisasterKind, DISASTER_CATALOG};
pub use location::{Coordinates, EffectiveLocation, LocationState, UNKNOWN_LOCATION};
pub use message::{ChatMessage, ChatRole};
pub use resource::{EmergencyResource, ResourceCategory, DEFAULT_EMERGENCY_PHONE};
