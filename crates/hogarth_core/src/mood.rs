//! Mood and genre selectors for prompt styling.

use serde::{Deserialize, Serialize};

/// Narrative mood for story generation.
///
/// Each mood selects a narrative modifier that is spliced into the story
/// writer prompt. Unknown strings fail to parse; callers fall back to
/// [`StoryMood::ModernRomance`].
///
/// # Examples
///
/// ```
/// use hogarth_core::StoryMood;
/// use std::str::FromStr;
///
/// let mood = StoryMood::from_str("slice_of_life").unwrap();
/// assert_eq!(mood.to_string(), "slice_of_life");
/// assert!(StoryMood::from_str("noir").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StoryMood {
    /// Romance fantasy / isekai
    Rofan,
    /// Contemporary K-drama style romance
    ModernRomance,
    /// Warm everyday-life vignettes
    SliceOfLife,
    /// Payback and vindication arcs
    Revenge,
    /// Coming-of-age school drama
    HighTeen,
}

impl Default for StoryMood {
    fn default() -> Self {
        Self::ModernRomance
    }
}

/// Visual genre for webtoon script generation.
///
/// Selects the art-style modifier passed to the script writer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScriptGenre {
    /// Glossy contemporary romance manhwa
    ModernRomanceDramaManhwa,
    /// High-fantasy romance manhwa
    FantasyRomanceManhwa,
    /// Historical sageuk romance
    HistorySageukRomance,
    /// Academy / school-life setting
    AcademySchoolLife,
    /// Isekai otome fantasy
    IsekaiOtomeFantasy,
}

impl Default for ScriptGenre {
    fn default() -> Self {
        Self::ModernRomanceDramaManhwa
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn mood_round_trips_through_strings() {
        for mood in [
            StoryMood::Rofan,
            StoryMood::ModernRomance,
            StoryMood::SliceOfLife,
            StoryMood::Revenge,
            StoryMood::HighTeen,
        ] {
            let parsed = StoryMood::from_str(&mood.to_string()).unwrap();
            assert_eq!(parsed, mood);
        }
    }

    #[test]
    fn genre_parses_snake_case() {
        let genre = ScriptGenre::from_str("modern_romance_drama_manhwa").unwrap();
        assert_eq!(genre, ScriptGenre::ModernRomanceDramaManhwa);
    }
}
