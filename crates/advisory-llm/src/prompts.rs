//! Prompt text sent to the advisory backend.

use crisis_core::EffectiveLocation;

pub const PROTOCOL_SYSTEM_INSTRUCTION: &str = "You are CrisisGuard AI. Priority: SAVING LIVES. \
Be authoritative, calm and precise. Use short sentences.";

pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are a professional Crisis Response Specialist \
talking to a victim or a helper in a potential crisis. Be empathetic but focused on solutions \
and safety. Provide verified information where possible.";

pub fn protocol_prompt(disaster: &str, location: &EffectiveLocation, severity: &str) -> String {
    format!(
        "CRITICAL EMERGENCY ALERT.\n\
         Type: {disaster}\n\
         Location: {location}\n\
         Severity/Context: {severity}\n\n\
         Act as a global crisis response center.\n\
         1. Analyze the situation immediately.\n\
         2. Provide a step-by-step survival protocol.\n\
         3. If coordinates are known, mention one or two nearby landmarks as reference points.\n\
         4. Use clear headings, bullet points and bold text.\n\
         5. Keep it concise. Time is critical."
    )
}

pub fn resources_prompt(location: &EffectiveLocation) -> String {
    format!(
        "Find the nearest real emergency resources to this location: \"{location}\".\n\n\
         Look for hospitals or medical centers, police stations, fire stations and emergency shelters.\n\n\
         Return a raw JSON array of objects with exactly these keys:\n\
         - \"name\": name of the facility\n\
         - \"type\": one of [\"Hospital\", \"Police\", \"Fire\", \"Shelter\"]\n\
         - \"address\": the physical address\n\
         - \"phone\": the phone number, or \"911\" if unknown\n\n\
         Return the 4 or 5 closest results. Do not wrap the array in markdown."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_prompt_embeds_inputs() {
        let prompt = protocol_prompt(
            "Flood",
            &EffectiveLocation::Address("123 Main St".to_string()),
            "water rising fast",
        );
        assert!(prompt.contains("Type: Flood"));
        assert!(prompt.contains("Location: 123 Main St"));
        assert!(prompt.contains("Severity/Context: water rising fast"));
    }

    #[test]
    fn resources_prompt_names_unknown_location() {
        assert!(resources_prompt(&EffectiveLocation::Unknown).contains("\"Unknown Location\""));
    }
}
