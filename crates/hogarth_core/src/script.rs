//! Structured webtoon script types.
//!
//! A [`WebtoonScript`] is only constructed from generator output after the
//! schema-repair pass has filled every required field, so deserialization
//! into these types is expected to succeed; a failure there indicates a
//! repair/schema mismatch rather than a runtime condition.

use serde::{Deserialize, Serialize};

/// Classification attribute for a character.
///
/// Inferred heuristically from descriptive text when the generator omits it;
/// [`Gender::Unknown`] is the neutral default, not an error.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Female-presenting
    Female,
    /// Male-presenting
    Male,
    /// No classification could be made
    #[default]
    Unknown,
}

/// A character definition with the full descriptive attribute surface.
///
/// Every field is present after repair, placeholder text included, so
/// downstream art generation sees a uniform record regardless of how much
/// the generator actually supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSheet {
    /// Character name; `"Unknown Character"` when the generator omitted it
    pub name: String,
    /// Gender classification
    #[serde(default)]
    pub gender: Gender,
    /// Age description (e.g. "adult", "20s")
    pub age: String,
    /// Facial features
    pub face: String,
    /// Hair style and color
    pub hair: String,
    /// Body type
    pub body: String,
    /// Clothing
    pub outfit: String,
    /// Default demeanor
    pub mood: String,
    /// Complete visual description assembled from the attribute slots
    pub visual_description: String,
}

/// One line of dialogue inside a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_new::new)]
pub struct DialogueLine {
    /// Name of the speaking character
    #[new(into)]
    pub character: String,
    /// What they say
    #[new(into)]
    pub text: String,
}

/// A single webtoon panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// 1-based position in the panel sequence
    pub panel_number: u32,
    /// Camera framing (e.g. "Medium Shot", "Close-Up")
    pub shot_type: String,
    /// Names of characters appearing in this panel
    #[serde(default)]
    pub active_character_names: Vec<String>,
    /// Image-generation prompt for this panel; never empty after repair
    pub visual_prompt: String,
    /// Dialogue lines, if the panel has any
    #[serde(default)]
    pub dialogue: Option<Vec<DialogueLine>>,
}

impl Panel {
    /// Whether this panel carries at least one dialogue line.
    pub fn has_dialogue(&self) -> bool {
        self.dialogue.as_ref().is_some_and(|lines| !lines.is_empty())
    }
}

/// A complete webtoon script: character roster plus panel sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebtoonScript {
    /// Character definitions referenced by the panels
    pub characters: Vec<CharacterSheet>,
    /// Ordered panel sequence
    pub panels: Vec<Panel>,
}

impl WebtoonScript {
    /// Look up a character sheet by name.
    pub fn character(&self, name: &str) -> Option<&CharacterSheet> {
        self.characters.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_serializes_lowercase() {
        let json = serde_json::to_string(&Gender::Female).unwrap();
        assert_eq!(json, r#""female""#);
        let back: Gender = serde_json::from_str(r#""unknown""#).unwrap();
        assert_eq!(back, Gender::Unknown);
    }

    #[test]
    fn panel_dialogue_presence() {
        let mut panel = Panel {
            panel_number: 1,
            shot_type: "Wide Shot".into(),
            active_character_names: vec![],
            visual_prompt: "Wide Shot scene".into(),
            dialogue: None,
        };
        assert!(!panel.has_dialogue());
        panel.dialogue = Some(vec![]);
        assert!(!panel.has_dialogue());
        panel.dialogue = Some(vec![DialogueLine::new("Mina", "It's you.")]);
        assert!(panel.has_dialogue());
    }
}
