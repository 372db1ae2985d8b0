// src/core/hazard.rs - Llama Guard hazard taxonomy and response scanning

use serde::{Deserialize, Serialize};

/// One hazard category reported by the moderation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardRecord {
    pub code: &'static str,
    pub category: &'static str,
}

/// Llama Guard 3 categories, in declaration order. Scanning follows this order.
pub const HAZARDS: &[HazardRecord] = &[
    HazardRecord { code: "S1", category: "Violent Crimes" },
    HazardRecord { code: "S2", category: "Non-Violent Crimes" },
    HazardRecord { code: "S3", category: "Sex-Related Crimes" },
    HazardRecord { code: "S4", category: "Child Sexual Exploitation" },
    HazardRecord { code: "S5", category: "Defamation" },
    HazardRecord { code: "S6", category: "Specialized Advice" },
    HazardRecord { code: "S7", category: "Privacy" },
    HazardRecord { code: "S8", category: "Intellectual Property" },
    HazardRecord { code: "S9", category: "Indiscriminate Weapons" },
    HazardRecord { code: "S10", category: "Hate" },
    HazardRecord { code: "S11", category: "Suicide & Self-Harm" },
    HazardRecord { code: "S12", category: "Sexual Content" },
    HazardRecord { code: "S13", category: "Elections" },
    HazardRecord { code: "S14", category: "Code Interpreter Abuse" },
];

/// How hazard codes are located in the moderation model's reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardMatch {
    /// First code (in table order) appearing anywhere in the lower-cased reply.
    /// `"s10"` contains `"s1"`, so S10..S14 are reported as S1.
    #[default]
    Substring,
    /// First alphanumeric token of the reply that equals a code exactly.
    Token,
}

/// Case-insensitive lookup by code.
pub fn lookup(code: &str) -> Option<&'static HazardRecord> {
    HAZARDS.iter().find(|h| h.code.eq_ignore_ascii_case(code))
}

/// Find the hazard reported in a moderation reply, if any.
pub fn scan(response: &str, policy: HazardMatch) -> Option<&'static HazardRecord> {
    let lowered = response.to_lowercase();
    match policy {
        HazardMatch::Substring => HAZARDS
            .iter()
            .find(|h| lowered.contains(&h.code.to_lowercase())),
        HazardMatch::Token => lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .find_map(lookup),
    }
}

/// The assistant message shown in place of flagged content.
pub fn warning_message(hazard: &HazardRecord) -> String {
    format!(
        "Warning: Unsafe content detected. Hazard: {} - {}",
        hazard.code, hazard.category
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_has_fourteen_codes() {
        assert_eq!(HAZARDS.len(), 14);
        assert_eq!(HAZARDS[0].code, "S1");
        assert_eq!(HAZARDS[13].code, "S14");
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(lookup("s11").unwrap().category, "Suicide & Self-Harm");
        assert_eq!(lookup("S4").unwrap().category, "Child Sexual Exploitation");
        assert!(lookup("S15").is_none());
    }

    #[test]
    fn test_scan_substring_lowercase_reply() {
        let hit = scan("unsafe\ns4", HazardMatch::Substring).unwrap();
        assert_eq!(hit.code, "S4");
    }

    #[test]
    fn test_scan_substring_mixed_case_reply() {
        let hit = scan("UnSaFe -> S4 detected", HazardMatch::Substring).unwrap();
        assert_eq!(hit.code, "S4");
    }

    #[test]
    fn test_scan_safe_reply() {
        assert!(scan("safe", HazardMatch::Substring).is_none());
        assert!(scan("safe", HazardMatch::Token).is_none());
        assert!(scan("", HazardMatch::Substring).is_none());
    }

    #[test]
    fn test_scan_substring_reports_s10_as_s1() {
        let hit = scan("unsafe\nS10", HazardMatch::Substring).unwrap();
        assert_eq!(hit.code, "S1");
    }

    #[test]
    fn test_scan_token_distinguishes_s10() {
        let hit = scan("unsafe\nS10", HazardMatch::Token).unwrap();
        assert_eq!(hit.code, "S10");
        assert_eq!(hit.category, "Hate");
    }

    #[test]
    fn test_scan_token_comma_separated() {
        let hit = scan("unsafe\nS12,S1", HazardMatch::Token).unwrap();
        assert_eq!(hit.code, "S12");
    }

    #[test]
    fn test_scan_token_ignores_embedded_codes() {
        assert!(scan("the model is1s7x", HazardMatch::Token).is_none());
        assert!(scan("the model is1s7x", HazardMatch::Substring).is_some());
    }

    #[test]
    fn test_warning_message_format() {
        let msg = warning_message(lookup("S9").unwrap());
        assert_eq!(
            msg,
            "Warning: Unsafe content detected. Hazard: S9 - Indiscriminate Weapons"
        );
    }
}
