//! Persona configuration and management
//!
//! A persona is the fixed system-role identity the chat model answers as.
//! Personas are compiled into the binary; a directory override exists for
//! development.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A persona defines the identity the assistant answers as
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Short descriptive phrase
    pub tagline: Option<String>,

    /// Fixed system prompt sent before every user question
    pub system_prompt: String,
}

/// Persona data compiled into the binary
///
/// Two variants exist because the upstream prompt had personality-flavored
/// and resume-flavored editions; "personality" is the default.
const EMBEDDED_PERSONAS: &[(&str, &str)] = &[
    ("personality", include_str!("../personas/personality.json")),
    ("resume", include_str!("../personas/resume.json")),
];

/// Default persona id used when none is configured
pub const DEFAULT_PERSONA_ID: &str = "personality";

impl Persona {
    /// Load a persona with priority: `VOXFOLIO_PERSONAS_DIR` override, then
    /// embedded data
    ///
    /// # Errors
    ///
    /// Returns error if the persona id is not found in any source
    pub fn load(persona_id: &str) -> Result<Self> {
        if let Ok(dir) = std::env::var("VOXFOLIO_PERSONAS_DIR") {
            let path = PathBuf::from(&dir);
            if path.exists() {
                match Self::load_from_dir(&path, persona_id) {
                    Ok(persona) => {
                        tracing::info!(
                            persona_id,
                            path = %path.display(),
                            "loaded persona from VOXFOLIO_PERSONAS_DIR"
                        );
                        return Ok(persona);
                    }
                    Err(e) => {
                        tracing::warn!(
                            persona_id,
                            error = %e,
                            "VOXFOLIO_PERSONAS_DIR set but persona not found, trying embedded"
                        );
                    }
                }
            } else {
                tracing::warn!(
                    path = %dir,
                    "VOXFOLIO_PERSONAS_DIR set but directory does not exist"
                );
            }
        }

        Self::load_embedded(persona_id)
    }

    /// Load a persona JSON file from a directory
    fn load_from_dir(personas_dir: &std::path::Path, persona_id: &str) -> Result<Self> {
        let json_path = personas_dir.join(format!("{persona_id}.json"));
        if !json_path.exists() {
            return Err(Error::PersonaNotFound(persona_id.to_string()));
        }

        let content = std::fs::read_to_string(&json_path)?;
        let persona: Self = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {persona_id}.json: {e}")))?;
        tracing::debug!(path = %json_path.display(), "loaded persona from JSON");
        Ok(persona)
    }

    /// Load a persona compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns error if the persona id is not found in embedded data
    pub fn load_embedded(persona_id: &str) -> Result<Self> {
        EMBEDDED_PERSONAS
            .iter()
            .find(|(id, _)| *id == persona_id)
            .and_then(|(_, json)| serde_json::from_str::<Self>(json).ok())
            .ok_or_else(|| Error::PersonaNotFound(persona_id.to_string()))
    }

    /// Return the embedded persona array for enumeration
    #[must_use]
    pub const fn embedded() -> &'static [(&'static str, &'static str)] {
        EMBEDDED_PERSONAS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_personas_parse() {
        for (id, _) in Persona::embedded() {
            let persona = Persona::load_embedded(id).unwrap();
            assert_eq!(&persona.id, id);
            assert!(!persona.system_prompt.is_empty());
        }
    }

    #[test]
    fn default_persona_exists() {
        assert!(Persona::load_embedded(DEFAULT_PERSONA_ID).is_ok());
    }

    #[test]
    fn unknown_persona_is_an_error() {
        assert!(matches!(
            Persona::load_embedded("nope"),
            Err(Error::PersonaNotFound(_))
        ));
    }
}
