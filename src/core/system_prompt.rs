// src/core/system_prompt.rs - Persona instruction prepended to every generation request

use crate::infra::config::PersonaConfig;

/// Built-in persona for a named assistant.
pub fn default_persona(name: &str) -> String {
    format!(
        "You are {name}, a kid-friendly, educational assistant. \
         Please answer in a way that is safe, friendly, and easy for children to understand. \
         Your responses should be educational and fun!"
    )
}

/// The configured override, or the built-in persona.
pub fn build_system_prompt(persona: &PersonaConfig) -> String {
    match persona.system_prompt.as_deref().map(str::trim) {
        Some(custom) if !custom.is_empty() => custom.to_string(),
        _ => default_persona(&persona.name),
    }
}

/// User text sent for `/quiz`.
pub fn quiz_request(topic: Option<&str>) -> String {
    match topic.map(str::trim).filter(|t| !t.is_empty()) {
        Some(topic) => format!(
            "Let's play a quiz! Ask me one fun multiple-choice question about {topic}."
        ),
        None => "Let's play a quiz! Ask me one fun multiple-choice question about science or nature."
            .to_string(),
    }
}
