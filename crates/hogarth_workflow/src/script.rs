//! Structured webtoon script pipeline: writer, rubric evaluator, rewriter.
//!
//! The writer and rewriter are generative and their JSON replies pass
//! through extraction and schema repair before anything else sees them.
//! The evaluator is a deterministic rubric, faster and more reproducible
//! than asking a model to judge a structure it just emitted.

use crate::engine::RevisionSteps;
use crate::generate::{call_driver, step_request};
use crate::{WorkflowSettings, extraction, prompts, repair};
use async_trait::async_trait;
use hogarth_core::{Evaluation, ScriptGenre, WebtoonScript};
use hogarth_error::{HogarthResult, ScriptError, ScriptErrorKind};
use hogarth_interface::Driver;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Submission payload for a script run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScriptInput {
    /// Source story prose to convert
    pub story: String,
    /// Visual genre selection
    pub genre: ScriptGenre,
}

/// Step set for the structured script pipeline.
pub struct ScriptSteps {
    driver: Arc<dyn Driver>,
    settings: WorkflowSettings,
}

impl ScriptSteps {
    /// Create the script step set.
    pub fn new(driver: Arc<dyn Driver>, settings: WorkflowSettings) -> Self {
        Self { driver, settings }
    }

    /// Run a generative reply through extraction, repair and typing.
    fn script_from_reply(&self, reply: &str) -> HogarthResult<WebtoonScript> {
        let payload = extraction::extract_json(reply)?;
        let raw = extraction::parse_value(&payload)?;
        let (repaired, report) = repair::repair_script(raw)?;
        if !report.is_empty() {
            tracing::info!(
                repairs = report.len(),
                lossy = report.lossy_count(),
                "Generator script needed repair"
            );
        }
        // Repair guarantees the required-field contract, so a failure here
        // is a schema drift defect, not generator flakiness.
        serde_json::from_value(repaired).map_err(|e| {
            ScriptError::new(ScriptErrorKind::SchemaMismatch(format!(
                "repaired script failed typing: {e}"
            )))
            .into()
        })
    }
}

#[async_trait]
impl RevisionSteps for ScriptSteps {
    type Input = ScriptInput;
    type Artifact = WebtoonScript;

    #[tracing::instrument(skip(self, input), fields(genre = %input.genre, story_chars = input.story.len()))]
    async fn write(&self, input: &Self::Input) -> HogarthResult<WebtoonScript> {
        let prompt = prompts::script_writer_prompt(&input.story, input.genre);
        let reply = call_driver(
            &self.driver,
            &step_request(prompt, &self.settings),
            self.settings.step_timeout(),
        )
        .await?;
        let script = self.script_from_reply(&reply)?;
        tracing::info!(
            characters = script.characters.len(),
            panels = script.panels.len(),
            "Webtoon script written"
        );
        Ok(script)
    }

    #[tracing::instrument(skip(self, artifact), fields(panels = artifact.panels.len()))]
    async fn evaluate(&self, artifact: &WebtoonScript) -> HogarthResult<Evaluation> {
        Ok(rubric_evaluate(artifact, &self.settings))
    }

    #[tracing::instrument(skip(self, input, artifact, evaluation))]
    async fn rewrite(
        &self,
        input: &Self::Input,
        artifact: &WebtoonScript,
        evaluation: &Evaluation,
    ) -> HogarthResult<WebtoonScript> {
        let script_json = serde_json::to_string_pretty(artifact).map_err(|e| {
            hogarth_error::JsonError::new(format!("failed to serialize script for rewrite: {e}"))
        })?;
        let prompt =
            prompts::script_rewriter_prompt(&script_json, &evaluation.feedback, &input.story);
        let reply = call_driver(
            &self.driver,
            &step_request(prompt, &self.settings),
            self.settings.step_timeout(),
        )
        .await?;
        let script = self.script_from_reply(&reply)?;
        tracing::info!(panels = script.panels.len(), "Webtoon script rewritten");
        Ok(script)
    }
}

/// Score a script against the deterministic quality rubric.
///
/// Criteria and weights: scene count 30%, dialogue coverage 25%, visual
/// prompt completeness 20%, character consistency 15%, shot variety 10%.
/// The feedback string is written for the rewriter: imperative, specific,
/// panel numbers named.
pub fn rubric_evaluate(script: &WebtoonScript, settings: &WorkflowSettings) -> Evaluation {
    let panels = &script.panels;
    let num_panels = panels.len();
    let min_scenes = *settings.min_scenes() as usize;
    let max_scenes = *settings.max_scenes() as usize;

    let mut issues = Vec::new();
    let mut feedback_parts = Vec::new();
    let mut subscores = BTreeMap::new();

    // Scene count (30%)
    let scene_score = if num_panels < min_scenes {
        issues.push(format!(
            "Only {num_panels} scenes. Need {min_scenes}-{max_scenes}."
        ));
        feedback_parts.push(format!(
            "ADD {} MORE SCENES. Current: {num_panels}, required: {min_scenes}-{max_scenes}. \
             Add development and resolution beats.",
            min_scenes - num_panels
        ));
        (num_panels as f32 / min_scenes as f32) * 10.0
    } else if num_panels > max_scenes {
        issues.push(format!("Too many scenes: {num_panels}. Max is {max_scenes}."));
        feedback_parts.push(format!(
            "REDUCE scenes to {max_scenes}. Combine similar beats."
        ));
        (10.0 - ((num_panels - max_scenes) as f32 * 2.0)).max(0.0)
    } else {
        10.0
    };
    subscores.insert("scene_count".to_string(), scene_score);

    // Dialogue coverage (25%)
    let with_dialogue = panels.iter().filter(|p| p.has_dialogue()).count();
    let dialogue_ratio = if num_panels > 0 {
        with_dialogue as f32 / num_panels as f32
    } else {
        0.0
    };
    let required_coverage = *settings.dialogue_coverage();
    let dialogue_score = if dialogue_ratio < required_coverage {
        issues.push(format!(
            "Only {with_dialogue}/{num_panels} scenes have dialogue \
             ({:.0}%). Need {:.0}%+.",
            dialogue_ratio * 100.0,
            required_coverage * 100.0
        ));
        let silent: Vec<u32> = panels
            .iter()
            .filter(|p| !p.has_dialogue())
            .map(|p| p.panel_number)
            .take(5)
            .collect();
        feedback_parts.push(format!(
            "ADD DIALOGUE to panels: {silent:?}. Every scene should have character interaction."
        ));
        (dialogue_ratio / required_coverage) * 10.0
    } else {
        10.0
    };
    subscores.insert("dialogue_coverage".to_string(), dialogue_score);

    // Visual prompt completeness (20%)
    let min_prompt_chars = *settings.min_prompt_chars();
    let short_prompts: Vec<u32> = panels
        .iter()
        .filter(|p| p.visual_prompt.len() < min_prompt_chars)
        .map(|p| p.panel_number)
        .collect();
    let prompt_score = if short_prompts.is_empty() {
        10.0
    } else {
        issues.push(format!(
            "{} panels have incomplete visual prompts.",
            short_prompts.len()
        ));
        feedback_parts.push(format!(
            "EXPAND visual_prompt for panels {:?}. Each prompt should be \
             {min_prompt_chars}-250 characters covering shot framing, environment, \
             character placement, lighting and atmosphere.",
            short_prompts.iter().take(3).collect::<Vec<_>>()
        ));
        ((num_panels - short_prompts.len()) as f32 / num_panels as f32) * 10.0
    };
    subscores.insert("visual_prompt".to_string(), prompt_score);

    // Character consistency (15%)
    let roster: std::collections::HashSet<&str> =
        script.characters.iter().map(|c| c.name.as_str()).collect();
    let mut unknown: Vec<&str> = panels
        .iter()
        .flat_map(|p| p.active_character_names.iter())
        .map(String::as_str)
        .filter(|name| !roster.contains(name))
        .collect();
    unknown.sort_unstable();
    unknown.dedup();
    let consistency_score = if unknown.is_empty() {
        10.0
    } else {
        issues.push(format!(
            "Characters in scenes not defined: {:?}",
            unknown.iter().take(3).collect::<Vec<_>>()
        ));
        feedback_parts.push(format!(
            "ADD character definitions for: {unknown:?}. Or use existing \
             character names consistently."
        ));
        (10.0 - unknown.len() as f32 * 2.0).max(0.0)
    };
    subscores.insert("character_consistency".to_string(), consistency_score);

    // Shot variety as a story-structure proxy (10%)
    let structure_score = if num_panels >= 8 {
        let mut shots: Vec<&str> = panels
            .iter()
            .map(|p| p.shot_type.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        shots.sort_unstable();
        shots.dedup();
        if shots.len() < 3 {
            issues.push("Limited shot variety. Use more diverse shot types.".to_string());
            feedback_parts.push(
                "ADD SHOT VARIETY: mix wide shots, medium shots, close-ups and \
                 extreme close-ups across the story."
                    .to_string(),
            );
            5.0
        } else {
            10.0
        }
    } else {
        (num_panels as f32 / 8.0) * 10.0
    };
    subscores.insert("story_structure".to_string(), structure_score);

    let final_score = scene_score * 0.30
        + dialogue_score * 0.25
        + prompt_score * 0.20
        + consistency_score * 0.15
        + structure_score * 0.10;
    let final_score = (final_score * 100.0).round() / 100.0;

    let feedback = if feedback_parts.is_empty() {
        "Script meets all quality criteria.".to_string()
    } else {
        let mut text = "ISSUES TO FIX:".to_string();
        for part in &feedback_parts {
            text.push_str("\n- ");
            text.push_str(part);
        }
        text
    };

    tracing::info!(
        score = final_score,
        panels = num_panels,
        dialogue_ratio,
        issues = issues.len(),
        "Script rubric evaluation complete"
    );

    Evaluation::new(final_score, feedback)
        .with_issues(issues)
        .with_subscores(subscores)
}
