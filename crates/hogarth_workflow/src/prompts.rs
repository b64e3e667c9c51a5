//! Prompt templates and assembly for both pipelines.
//!
//! Templates are plain string constants with `{slot}` placeholders filled
//! in code. Mood and genre modifiers are spliced into the writer prompts to
//! steer narrative tone and art style.

use hogarth_core::{ScriptGenre, SourcePost, StoryMood};

const STORY_WRITER_TEMPLATE: &str = "\
**ROLE:** You are a web novel author who turns forum posts into bingeable \
short stories. Expand and twist the seed post below into a vivid, \
easy-to-read narrative of roughly 1000-2000 words with rich descriptions of \
characters, settings and emotions, natural dialogue, and a clear arc from \
hook to landing.

{mood_modifier}

**OUTPUT FORMAT:** A title on the first line, then the story as flowing \
prose. No scene labels, notes or explanations.

**SEED POST:**
Title: {title}
Content: {content}
";

const STORY_EVALUATOR_TEMPLATE: &str = "\
Evaluate this story on a scale of 1-10 for:
1. Coherence (logical flow, does it make sense?)
2. Engagement (is it interesting and emotionally compelling?)
3. Length (appropriate for a 5-10 minute read?)

Story:
{story}

Reply in EXACTLY this format, one value per line:
Score: [number 1-10]
Coherence: [number 1-10]
Engagement: [number 1-10]
Length Appropriate: [yes or no]
Feedback: [specific suggestions for improvement]
";

const STORY_REWRITER_TEMPLATE: &str = "\
**ROLE:** You are a story editor. Rewrite the story below so it addresses \
every point of the evaluator feedback while keeping its plot, characters \
(four at most) and emotional arc intact.

**ORIGINAL STORY:**
{story}

**EVALUATOR FEEDBACK:**
{feedback}

**OUTPUT FORMAT:** The complete rewritten story, title included, as flowing \
prose. Nothing else.
";

const SCRIPT_WRITER_TEMPLATE: &str = "\
**ROLE:** You are a webtoon director converting a story into a structured \
panel script for an image-generation pipeline.

**STORY:**
{story}

**ART STYLE:**
{genre_style}

**REQUIREMENTS:**
- 8 to 12 panels following a setup / development / resolution arc.
- At most 4 characters; reuse the same name for the same person everywhere.
- Almost every panel carries dialogue (2-5 lines) that advances the plot.
- Every panel has a visual_prompt of 150-250 characters covering shot \
framing, environment, character placement, lighting and atmosphere.
- Vary shot types: wide, medium, close-up, extreme close-up.

**OUTPUT:** ONLY a valid JSON object, no markdown fences, matching:
{
  \"characters\": [
    {\"name\": \"...\", \"gender\": \"female|male|unknown\", \"age\": \"...\",
      \"face\": \"...\", \"hair\": \"...\", \"body\": \"...\", \"outfit\": \"...\",
      \"mood\": \"...\", \"visual_description\": \"...\"}
  ],
  \"panels\": [
    {\"panel_number\": 1, \"shot_type\": \"...\",
      \"active_character_names\": [\"...\"], \"visual_prompt\": \"...\",
      \"dialogue\": [{\"character\": \"...\", \"text\": \"...\"}]}
  ]
}
";

const SCRIPT_REWRITER_TEMPLATE: &str = "\
**ROLE:** You are a webtoon script editor. Revise the panel script below so \
it fixes every listed issue, without changing the underlying story.

**CURRENT SCRIPT (JSON):**
{script}

**ISSUES TO FIX:**
{feedback}

**ORIGINAL STORY (for reference):**
{story}

**OUTPUT:** ONLY the complete revised JSON object, same shape as the \
current script, no markdown fences.
";

/// Assemble the story writer prompt.
///
/// A title-only post is valid input: the title stands in for the missing
/// body, mirroring how the ingestion side treats link posts.
pub(crate) fn story_writer_prompt(post: &SourcePost, mood: StoryMood) -> String {
    let content = if post.body.trim().is_empty() {
        post.title.as_str()
    } else {
        post.body.as_str()
    };
    STORY_WRITER_TEMPLATE
        .replace("{mood_modifier}", mood_modifier(mood))
        .replace("{title}", &post.title)
        .replace("{content}", content)
}

/// Assemble the story evaluation prompt.
pub(crate) fn story_evaluator_prompt(story: &str) -> String {
    STORY_EVALUATOR_TEMPLATE.replace("{story}", story)
}

/// Assemble the story rewriter prompt.
pub(crate) fn story_rewriter_prompt(story: &str, feedback: &str) -> String {
    STORY_REWRITER_TEMPLATE
        .replace("{story}", story)
        .replace("{feedback}", feedback)
}

/// Assemble the script writer prompt.
pub(crate) fn script_writer_prompt(story: &str, genre: ScriptGenre) -> String {
    SCRIPT_WRITER_TEMPLATE
        .replace("{story}", story)
        .replace("{genre_style}", genre_style(genre))
}

/// Assemble the script rewriter prompt.
pub(crate) fn script_rewriter_prompt(script_json: &str, feedback: &str, story: &str) -> String {
    SCRIPT_REWRITER_TEMPLATE
        .replace("{script}", script_json)
        .replace("{feedback}", feedback)
        .replace("{story}", story)
}

/// Narrative modifier spliced into the story writer prompt.
fn mood_modifier(mood: StoryMood) -> &'static str {
    match mood {
        StoryMood::Rofan => {
            "**[MOOD: ROMANCE FANTASY]** Recast the seed as a sweeping \
             romance-fantasy: reincarnation or transmigration framing, \
             aristocratic intrigue, a cold powerful love interest who slowly \
             thaws, and fate-driven reversals. Tone: dramatic, poetic, \
             swoon-worthy."
        }
        StoryMood::ModernRomance => {
            "**[MOOD: MODERN ROMANCE]** Recast the seed as a glossy \
             contemporary romance: slow-burn tension, charged coincidences, \
             misunderstandings and reconciliation, K-drama pacing. Tone: \
             heart-fluttering, emotionally charged."
        }
        StoryMood::SliceOfLife => {
            "**[MOOD: SLICE OF LIFE]** Keep the seed grounded and warm: \
             small everyday moments, gentle humor, quiet observations that \
             land emotionally. Tone: cozy, sincere, lightly bittersweet."
        }
        StoryMood::Revenge => {
            "**[MOOD: REVENGE]** Sharpen the seed into a payback arc: a \
             clear wrong, patient planning, and a satisfying, proportionate \
             comeuppance. Tone: tense, vindicating, ultimately cathartic."
        }
        StoryMood::HighTeen => {
            "**[MOOD: HIGH TEEN]** Recast the seed as coming-of-age school \
             drama: friendships, rivalries, first love, growing pains. Tone: \
             energetic, earnest, hopeful."
        }
    }
}

/// Art-style modifier spliced into the script writer prompt.
fn genre_style(genre: ScriptGenre) -> &'static str {
    match genre {
        ScriptGenre::ModernRomanceDramaManhwa => {
            "Modern romance drama manhwa: clean digital lineart, soft \
             cinematic lighting, contemporary Seoul backdrops, fashionable \
             casual wear, expressive faces."
        }
        ScriptGenre::FantasyRomanceManhwa => {
            "Fantasy romance manhwa: ornate costumes, castle and garden \
             settings, luminous painterly palettes, ethereal lighting."
        }
        ScriptGenre::HistorySageukRomance => {
            "Historical sageuk romance: Joseon-era hanbok and palace \
             architecture, muted earthy palette, lantern-lit night scenes."
        }
        ScriptGenre::AcademySchoolLife => {
            "Academy school-life: uniforms, classrooms and rooftops, bright \
             daylight palette, playful panel energy."
        }
        ScriptGenre::IsekaiOtomeFantasy => {
            "Isekai otome fantasy: opulent ballgowns, rose-filled palace \
             grounds, sparkling highlight effects, dramatic chiaroscuro."
        }
    }
}
