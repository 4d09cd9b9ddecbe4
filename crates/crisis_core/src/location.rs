//! Location types - coordinates, the location-state record and the
//! effective-location resolution rule.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Displayed when neither coordinates nor a manual address are known.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// Validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Returns `None` for non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Location acquisition state as seen by the UI.
///
/// Mutated only by the location fallback controller. Coordinates take
/// precedence over the manual address whenever both are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationState {
    pub coordinates: Option<Coordinates>,
    pub manual_address: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
    pub is_fallback_mode: bool,
}

impl LocationState {
    /// State published when a fresh acquisition starts.
    pub fn acquiring() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Resolve the location that downstream requests should use.
    pub fn effective_location(&self) -> EffectiveLocation {
        if let Some(coordinates) = self.coordinates {
            return EffectiveLocation::Coordinates(coordinates);
        }
        match self.manual_address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => EffectiveLocation::Address(address.to_string()),
            _ => EffectiveLocation::Unknown,
        }
    }

    /// Google Maps search link for the current location, if any is known.
    pub fn map_query_url(&self) -> Option<String> {
        let query = match self.effective_location() {
            EffectiveLocation::Coordinates(c) => format!("{},{}", c.latitude, c.longitude),
            EffectiveLocation::Address(address) => address,
            EffectiveLocation::Unknown => return None,
        };
        let mut url = url::Url::parse(MAPS_SEARCH_URL).ok()?;
        url.query_pairs_mut()
            .append_pair("api", "1")
            .append_pair("query", &query);
        Some(url.into())
    }
}

/// The resolved location passed to the advisory backend. Never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EffectiveLocation {
    Coordinates(Coordinates),
    Address(String),
    Unknown,
}

impl EffectiveLocation {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for EffectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates(c) => c.fmt(f),
            Self::Address(address) => f.write_str(address),
            Self::Unknown => f.write_str(UNKNOWN_LOCATION),
        }
    }
}
