//! Persona templates: named instruction blocks prefixed to a dump

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{DumpError, Result};

/// Names accepted as "no persona"
const NO_PERSONA: &[&str] = &["", "none"];

/// Built-in personas, looked up by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Persona {
    #[strum(to_string = "neutral")]
    Neutral,

    #[strum(to_string = "rooreview")]
    RooReview,

    #[strum(to_string = "rooreview_auditor")]
    RooReviewAuditor,

    #[strum(to_string = "codebase_auditor")]
    CodebaseAuditor,

    #[strum(to_string = "documentation_auditor")]
    DocumentationAuditor,

    #[strum(to_string = "feature_architect")]
    FeatureArchitect,

    #[strum(to_string = "change_review")]
    ChangeReview,
}

impl Persona {
    /// Resolve a caller-supplied persona name.
    ///
    /// `None`, `""` and `"none"` mean no wrapping.
    pub fn lookup(name: Option<&str>) -> Result<Option<Self>> {
        let Some(name) = name.map(str::trim) else {
            return Ok(None);
        };
        if NO_PERSONA.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            return Ok(None);
        }
        Self::from_str(name)
            .map(Some)
            .map_err(|_| DumpError::UnknownPersona(name.to_string()))
    }

    /// Instruction text written verbatim at the top of the document
    pub fn preamble(&self) -> &'static str {
        match self {
            Self::Neutral => include_str!("prompts/neutral.md"),
            Self::RooReview => include_str!("prompts/rooreview.md"),
            Self::RooReviewAuditor => include_str!("prompts/rooreview_auditor.md"),
            Self::CodebaseAuditor => include_str!("prompts/codebase_auditor.md"),
            Self::DocumentationAuditor => include_str!("prompts/documentation_auditor.md"),
            Self::FeatureArchitect => include_str!("prompts/feature_architect.md"),
            Self::ChangeReview => include_str!("prompts/change_review.md"),
        }
    }

    /// Comma-separated list of every accepted name
    pub fn known_names() -> String {
        Self::iter()
            .map(|p| p.to_string())
            .chain(std::iter::once("none".to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_names() {
        assert_eq!(
            Persona::lookup(Some("rooreview")).unwrap(),
            Some(Persona::RooReview)
        );
        assert_eq!(
            Persona::lookup(Some("Feature_Architect")).unwrap(),
            Some(Persona::FeatureArchitect)
        );
        for persona in Persona::iter() {
            let name = persona.to_string();
            assert_eq!(Persona::lookup(Some(&name)).unwrap(), Some(persona));
        }
    }

    #[test]
    fn lookup_none_means_no_wrapping() {
        assert_eq!(Persona::lookup(None).unwrap(), None);
        assert_eq!(Persona::lookup(Some("none")).unwrap(), None);
        assert_eq!(Persona::lookup(Some("NONE")).unwrap(), None);
        assert_eq!(Persona::lookup(Some("")).unwrap(), None);
    }

    #[test]
    fn lookup_unknown_name_fails() {
        match Persona::lookup(Some("pirate")) {
            Err(DumpError::UnknownPersona(name)) => assert_eq!(name, "pirate"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn every_preamble_is_a_terminated_block() {
        for persona in Persona::iter() {
            let text = persona.preamble();
            assert!(!text.trim().is_empty(), "{} is empty", persona);
            assert!(text.ends_with("---\n"), "{} lacks separator", persona);
        }
    }

    #[test]
    fn rooreview_preamble_opens_with_role() {
        assert!(Persona::RooReview
            .preamble()
            .starts_with("# 🧠 You are *RooReview*, an elite AI code reviewer."));
    }
}
