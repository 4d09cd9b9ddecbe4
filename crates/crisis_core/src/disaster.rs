//! The fixed catalog of disaster kinds offered on the home screen.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisasterKind {
    pub name: &'static str,
    pub icon: &'static str,
}

pub const DISASTER_CATALOG: &[DisasterKind] = &[
    DisasterKind { name: "Earthquake", icon: "🏚️" },
    DisasterKind { name: "Flood", icon: "🌊" },
    DisasterKind { name: "Fire", icon: "🔥" },
    DisasterKind { name: "Medical", icon: "🚑" },
    DisasterKind { name: "Accident", icon: "💥" },
    DisasterKind { name: "Violence", icon: "🛡️" },
    DisasterKind { name: "Animal", icon: "🐍" },
    DisasterKind { name: "Storm", icon: "🌪️" },
    DisasterKind { name: "Chemical", icon: "☣️" },
    DisasterKind { name: "Cyber", icon: "💻" },
];

impl DisasterKind {
    /// Case-insensitive lookup by label.
    pub fn find(label: &str) -> Option<&'static DisasterKind> {
        let label = label.trim();
        DISASTER_CATALOG
            .iter()
            .find(|kind| kind.name.eq_ignore_ascii_case(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_ignores_case_and_whitespace() {
        assert_eq!(DisasterKind::find(" flood ").map(|k| k.name), Some("Flood"));
        assert!(DisasterKind::find("Volcano").is_none());
    }
}
