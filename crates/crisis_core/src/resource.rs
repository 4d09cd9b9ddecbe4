//! Emergency resources returned by the nearby-resources lookup.

use serde::{Deserialize, Serialize};

/// Phone number used when the backend does not know one.
pub const DEFAULT_EMERGENCY_PHONE: &str = "911";

/// Facility category. Anything the backend invents maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceCategory {
    Hospital,
    Police,
    Fire,
    Shelter,
    #[serde(other)]
    Other,
}

impl Default for ResourceCategory {
    fn default() -> Self {
        ResourceCategory::Other
    }
}

/// A nearby facility: `{name, type, address, phone}` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyResource {
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: ResourceCategory,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_phone")]
    pub phone: String,
}

fn default_phone() -> String {
    DEFAULT_EMERGENCY_PHONE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_shape() {
        let resource: EmergencyResource = serde_json::from_str(
            r#"{"name":"General Hospital","type":"Hospital","address":"1 Care Way","phone":"555-0100"}"#,
        )
        .unwrap();
        assert_eq!(resource.category, ResourceCategory::Hospital);
        assert_eq!(resource.phone, "555-0100");
    }

    #[test]
    fn unknown_category_and_missing_phone_use_defaults() {
        let resource: EmergencyResource =
            serde_json::from_str(r#"{"name":"Red Cross Tent","type":"Aid Station","address":"Park"}"#)
                .unwrap();
        assert_eq!(resource.category, ResourceCategory::Other);
        assert_eq!(resource.phone, DEFAULT_EMERGENCY_PHONE);
    }
}
