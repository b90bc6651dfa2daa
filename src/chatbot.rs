//! Advisory chatbot responder
//!
//! Pure keyword containment over the lowercased message. Stateless; the
//! route that exposes it applies the usual authentication gate.

const SLOPE_REPLY: &str = "Slope refers to the steepness or incline of the ground surface, usually measured in degrees or as a percentage.";
const RAINFALL_REPLY: &str =
    "Rainfall affects soil stability by increasing water content and reducing cohesion.";
const PITFALL_REPLY: &str =
    "A pitfall refers to a hazard or issue that could cause slope failure or instability.";
const FALLBACK_REPLY: &str = "I'm not sure about that yet, but I'll learn soon!";

/// Answer an advisory question by keyword match.
pub fn reply(message: &str) -> &'static str {
    let message = message.to_lowercase();
    if message.contains("slope") {
        SLOPE_REPLY
    } else if message.contains("rainfall") {
        RAINFALL_REPLY
    } else if message.contains("pitfall") {
        PITFALL_REPLY
    } else {
        FALLBACK_REPLY
    }
}
