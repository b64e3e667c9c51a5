//! Schema repair for structured script output.
//!
//! Generators omit fields and truncate values under token pressure.
//! Rejecting the whole generation over a few missing leaves would waste a
//! full regenerate, so this layer fills the gaps with deterministic,
//! computed or heuristic defaults instead, never by calling the generator
//! again. It absorbs missing-field gaps only: input that is not an object
//! tree at all is a different failure class and propagates.
//!
//! The pass is pure apart from logging and idempotent: generator-supplied
//! values are never overwritten, and repairing an already-complete script
//! returns it unchanged.

use hogarth_core::Gender;
use hogarth_error::{HogarthResult, ScriptError, ScriptErrorKind};
use serde_json::{Map, Value, json};

/// Default camera framing for panels that arrive without one.
const DEFAULT_SHOT_TYPE: &str = "Medium Shot";

/// Placeholder name for characters that arrive without one.
const UNKNOWN_CHARACTER: &str = "Unknown Character";

/// Slot-specific placeholders, distinct per attribute so repaired output
/// stays human-scannable.
const ATTRIBUTE_PLACEHOLDERS: [(&str, &str); 6] = [
    ("age", "adult"),
    ("face", "distinctive features"),
    ("hair", "styled hair"),
    ("body", "average build"),
    ("outfit", "casual attire"),
    ("mood", "neutral demeanor"),
];

/// One field filled in during repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairedField {
    /// Which record was repaired (e.g. `panel 3`, `character "Mina"`)
    pub target: String,
    /// The field that was filled
    pub field: &'static str,
    /// Whether the fill invented content (warn-level) rather than a purely
    /// structural default (debug-level)
    pub lossy: bool,
}

/// Everything the repair pass filled in, for operators watching generator
/// output quality degrade over time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    repairs: Vec<RepairedField>,
}

impl RepairReport {
    /// All recorded repairs.
    pub fn repairs(&self) -> &[RepairedField] {
        &self.repairs
    }

    /// Number of repairs performed.
    pub fn len(&self) -> usize {
        self.repairs.len()
    }

    /// Whether the input needed no repair at all.
    pub fn is_empty(&self) -> bool {
        self.repairs.is_empty()
    }

    /// Number of content-inventing (warn-level) repairs.
    pub fn lossy_count(&self) -> usize {
        self.repairs.iter().filter(|r| r.lossy).count()
    }

    fn record(&mut self, target: impl Into<String>, field: &'static str, lossy: bool) {
        let target = target.into();
        if lossy {
            tracing::warn!(subject = %target, field, "Repaired missing script field");
        } else {
            tracing::debug!(subject = %target, field, "Defaulted missing script field");
        }
        self.repairs.push(RepairedField {
            target,
            field,
            lossy,
        });
    }
}

/// Repair a raw script object so it satisfies every required field of the
/// script schema.
///
/// Characters are repaired first so the panel pass can synthesize visual
/// prompts from the repaired descriptions. The repaired value always passes
/// the final required-field validation; a violation there means the repair
/// logic and the schema have drifted apart, which surfaces as a
/// schema-mismatch error rather than being handled gracefully.
///
/// # Errors
///
/// Returns a malformed-structure [`ScriptError`] when `raw` is not an
/// object, or `characters`/`panels` are present but not arrays of objects.
/// Missing-field cases never error; absorbing those is this layer's job.
///
/// # Examples
///
/// ```
/// use hogarth_workflow::repair_script;
/// use serde_json::json;
///
/// let raw = json!({
///     "characters": [{"name": "Mina", "visual_description": "short woman in red"}],
///     "panels": [{"active_character_names": ["Mina"]}],
/// });
/// let (repaired, report) = repair_script(raw).unwrap();
/// assert_eq!(repaired["panels"][0]["panel_number"], 1);
/// assert!(!repaired["panels"][0]["visual_prompt"].as_str().unwrap().is_empty());
/// assert!(!report.is_empty());
/// ```
pub fn repair_script(raw: Value) -> HogarthResult<(Value, RepairReport)> {
    let mut root = match raw {
        Value::Object(map) => map,
        other => {
            return Err(malformed(format!(
                "top-level value is {}, expected an object",
                type_name(&other)
            ))
            .into());
        }
    };
    let mut report = RepairReport::default();

    let mut characters = take_entry_array(&mut root, "characters", &mut report)?;
    let mut panels = take_entry_array(&mut root, "panels", &mut report)?;

    for character in &mut characters {
        repair_character(character, &mut report)?;
    }

    // Name → visual description lookup over the just-repaired roster.
    let descriptions: Vec<(String, String)> = characters
        .iter()
        .filter_map(|c| c.as_object())
        .filter_map(|c| {
            Some((
                c.get("name")?.as_str()?.to_string(),
                c.get("visual_description")?.as_str()?.to_string(),
            ))
        })
        .collect();

    for (index, panel) in panels.iter_mut().enumerate() {
        repair_panel(panel, index, &descriptions, &mut report)?;
    }

    root.insert("characters".to_string(), Value::Array(characters));
    root.insert("panels".to_string(), Value::Array(panels));

    validate_script(&root)?;

    if !report.is_empty() {
        tracing::info!(
            repairs = report.len(),
            lossy = report.lossy_count(),
            "Script repaired before validation"
        );
    }

    Ok((Value::Object(root), report))
}

/// Infer a gender classification from descriptive text.
///
/// Case-insensitive, word-boundary keyword scan; female markers take
/// priority over male ones (so "female" can never satisfy the male branch).
/// No marker means [`Gender::Unknown`], not an error.
///
/// # Examples
///
/// ```
/// use hogarth_workflow::infer_gender;
/// use hogarth_core::Gender;
///
/// assert_eq!(infer_gender("a tall woman with kind eyes"), Gender::Female);
/// assert_eq!(infer_gender("he slouches"), Gender::Male);
/// assert_eq!(infer_gender("a weathered sailor"), Gender::Unknown);
/// ```
pub fn infer_gender(text: &str) -> Gender {
    const FEMALE_MARKERS: [&str; 5] = ["she", "her", "woman", "female", "girl"];
    const MALE_MARKERS: [&str; 5] = ["he", "him", "man", "male", "boy"];

    let mut saw_male = false;
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let token = token.to_lowercase();
        if FEMALE_MARKERS.contains(&token.as_str()) {
            return Gender::Female;
        }
        if MALE_MARKERS.contains(&token.as_str()) {
            saw_male = true;
        }
    }
    if saw_male { Gender::Male } else { Gender::Unknown }
}

fn repair_character(character: &mut Value, report: &mut RepairReport) -> HogarthResult<()> {
    let Some(map) = character.as_object_mut() else {
        return Err(malformed("characters entry is not an object".to_string()).into());
    };

    if str_field(map, "name").is_none() {
        map.insert("name".into(), json!(UNKNOWN_CHARACTER));
        report.record(format!("character \"{UNKNOWN_CHARACTER}\""), "name", true);
    }
    let target = format!(
        "character \"{}\"",
        str_field(map, "name").unwrap_or(UNKNOWN_CHARACTER)
    );

    for (field, placeholder) in ATTRIBUTE_PLACEHOLDERS {
        if str_field(map, field).is_none() {
            map.insert(field.into(), json!(placeholder));
            report.record(&target, field, true);
        }
    }

    if str_field(map, "gender").is_none() {
        let descriptive = descriptive_text(map);
        let inferred = infer_gender(&descriptive);
        map.insert("gender".into(), json!(inferred.to_string()));
        report.record(&target, "gender", true);
    }

    if str_field(map, "visual_description").is_none() {
        let description = build_visual_description(map);
        map.insert("visual_description".into(), json!(description));
        report.record(&target, "visual_description", true);
    }

    Ok(())
}

fn repair_panel(
    panel: &mut Value,
    index: usize,
    descriptions: &[(String, String)],
    report: &mut RepairReport,
) -> HogarthResult<()> {
    let Some(map) = panel.as_object_mut() else {
        return Err(malformed("panels entry is not an object".to_string()).into());
    };
    let target = format!("panel {}", index + 1);

    let has_position = map
        .get("panel_number")
        .and_then(Value::as_u64)
        .is_some_and(|n| n > 0);
    if !has_position {
        map.insert("panel_number".into(), json!(index as u64 + 1));
        report.record(&target, "panel_number", false);
    }

    if str_field(map, "shot_type").is_none() {
        map.insert("shot_type".into(), json!(DEFAULT_SHOT_TYPE));
        report.record(&target, "shot_type", false);
    }

    if !map
        .get("active_character_names")
        .is_some_and(Value::is_array)
    {
        map.insert("active_character_names".into(), json!([]));
        report.record(&target, "active_character_names", false);
    }

    if str_field(map, "visual_prompt").is_none() {
        let prompt = synthesize_visual_prompt(map, descriptions);
        map.insert("visual_prompt".into(), json!(prompt));
        report.record(&target, "visual_prompt", true);
    }

    if !map.contains_key("dialogue") {
        map.insert("dialogue".into(), Value::Null);
        report.record(&target, "dialogue", false);
    }

    Ok(())
}

/// Build a visual prompt for a panel from its shot type and the repaired
/// descriptions of its participants.
fn synthesize_visual_prompt(map: &Map<String, Value>, descriptions: &[(String, String)]) -> String {
    let shot = map
        .get("shot_type")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_SHOT_TYPE);

    let participants: Vec<String> = map
        .get("active_character_names")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|name| {
                    descriptions
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(n, d)| format!("{d} ({n})"))
                })
                .collect()
        })
        .unwrap_or_default();

    if participants.is_empty() {
        format!("{shot} scene")
    } else {
        format!("{shot} of {}", participants.join(", "))
    }
}

/// Assemble a character's visual description from its attribute slots in
/// natural order.
fn build_visual_description(map: &Map<String, Value>) -> String {
    let mut parts = Vec::new();

    if let Some(gender) = str_field(map, "gender")
        && gender != "unknown"
    {
        parts.push(gender.to_string());
    }
    if let Some(age) = str_field(map, "age") {
        parts.push(age.to_string());
    }
    for field in ["face", "hair", "body"] {
        if let Some(value) = str_field(map, field) {
            parts.push(value.to_string());
        }
    }
    if let Some(outfit) = str_field(map, "outfit") {
        parts.push(format!("wearing {outfit}"));
    }
    if let Some(mood) = str_field(map, "mood") {
        if mood.ends_with("demeanor") {
            parts.push(mood.to_string());
        } else {
            parts.push(format!("{mood} demeanor"));
        }
    }

    if parts.is_empty() {
        "A character in the story".to_string()
    } else {
        parts.join(", ")
    }
}

/// Verify the required-field contract the repair pass just established.
///
/// # Errors
///
/// Returns a schema-mismatch [`ScriptError`] naming the first violation.
/// This passing is an invariant of [`repair_script`], so a failure here is
/// a defect, not a runtime condition.
fn validate_script(root: &Map<String, Value>) -> HogarthResult<()> {
    let characters = root
        .get("characters")
        .and_then(Value::as_array)
        .ok_or_else(|| mismatch("characters array missing"))?;
    for (i, character) in characters.iter().enumerate() {
        let map = character
            .as_object()
            .ok_or_else(|| mismatch(format!("character {i} is not an object")))?;
        for field in [
            "name",
            "gender",
            "age",
            "face",
            "hair",
            "body",
            "outfit",
            "mood",
            "visual_description",
        ] {
            if str_field(map, field).is_none() {
                return Err(mismatch(format!("character {i} missing {field}")).into());
            }
        }
    }

    let panels = root
        .get("panels")
        .and_then(Value::as_array)
        .ok_or_else(|| mismatch("panels array missing"))?;
    for (i, panel) in panels.iter().enumerate() {
        let map = panel
            .as_object()
            .ok_or_else(|| mismatch(format!("panel {i} is not an object")))?;
        let positioned = map
            .get("panel_number")
            .and_then(Value::as_u64)
            .is_some_and(|n| n > 0);
        if !positioned {
            return Err(mismatch(format!("panel {i} missing positive panel_number")).into());
        }
        if str_field(map, "shot_type").is_none() || str_field(map, "visual_prompt").is_none() {
            return Err(mismatch(format!("panel {i} missing shot_type or visual_prompt")).into());
        }
        if !map
            .get("active_character_names")
            .is_some_and(Value::is_array)
        {
            return Err(mismatch(format!("panel {i} missing active_character_names")).into());
        }
        if !map.contains_key("dialogue") {
            return Err(mismatch(format!("panel {i} missing dialogue key")).into());
        }
    }

    Ok(())
}

/// Pull `key` out of the root as an owned array, defaulting to empty when
/// absent.
fn take_entry_array(
    root: &mut Map<String, Value>,
    key: &'static str,
    report: &mut RepairReport,
) -> HogarthResult<Vec<Value>> {
    match root.remove(key) {
        Some(Value::Array(entries)) => Ok(entries),
        Some(other) => {
            Err(malformed(format!("{key} is {}, expected an array", type_name(&other))).into())
        }
        None => {
            report.record("script", key, false);
            Ok(Vec::new())
        }
    }
}

/// A non-empty string field, `None` when absent, non-string, or blank.
fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Concatenated descriptive text used for gender inference.
fn descriptive_text(map: &Map<String, Value>) -> String {
    ["face", "hair", "body", "outfit", "mood", "visual_description"]
        .iter()
        .filter_map(|field| str_field(map, field))
        .collect::<Vec<_>>()
        .join(" ")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn malformed(message: String) -> ScriptError {
    ScriptError::new(ScriptErrorKind::MalformedStructure(message))
}

fn mismatch(message: impl Into<String>) -> ScriptError {
    ScriptError::new(ScriptErrorKind::SchemaMismatch(message.into()))
}
