//! Recovering JSON payloads from LLM replies.
//!
//! Generators wrap structured output in markdown fences or surround it with
//! prose, and occasionally truncate it under token pressure. This module
//! digs the JSON payload out; actual schema gaps are the repair layer's
//! problem, not this one's.

use hogarth_error::{HogarthResult, ScriptError, ScriptErrorKind};
use serde_json::Value;

/// Extract a JSON payload from a generator reply.
///
/// Strategies, in order:
/// 1. a ` ```json ` fenced block (or a bare ` ``` ` fence);
/// 2. the first balanced `{...}` or `[...]` span, whichever opens first.
///
/// A fenced block with no closing fence is treated as a truncated reply and
/// returned as-is from the fence onward; the JSON parser downstream decides
/// whether it is salvageable.
///
/// # Errors
///
/// Returns a no-payload [`ScriptError`] when the reply contains neither a
/// fence nor a balanced JSON span.
///
/// # Examples
///
/// ```
/// use hogarth_workflow::extract_json;
///
/// let reply = "Here you go:\n```json\n{\"panels\": []}\n```\nEnjoy!";
/// assert_eq!(extract_json(reply).unwrap(), "{\"panels\": []}");
/// ```
pub fn extract_json(reply: &str) -> HogarthResult<String> {
    if let Some(block) = fenced_block(reply) {
        return Ok(block.trim().to_string());
    }
    if let Some(span) = balanced_span(reply) {
        return Ok(span.to_string());
    }

    tracing::error!(reply_chars = reply.len(), "No JSON payload in generator reply");
    Err(ScriptError::new(ScriptErrorKind::NoJsonPayload(reply.len())).into())
}

/// Parse an extracted payload into a generic JSON value.
///
/// # Errors
///
/// Returns a syntax-kind [`ScriptError`] for unparseable input. This is the
/// hard-failure class the repair layer refuses to absorb.
pub fn parse_value(json: &str) -> HogarthResult<Value> {
    serde_json::from_str(json).map_err(|e| {
        let preview: String = json.chars().take(80).collect();
        tracing::error!(error = %e, preview = %preview, "Generator payload is not valid JSON");
        ScriptError::new(ScriptErrorKind::JsonSyntax(e.to_string())).into()
    })
}

/// Find the contents of the first markdown code fence.
///
/// Prefers a `json`-tagged fence; falls back to the first fence of any
/// language, skipping the language line.
fn fenced_block(reply: &str) -> Option<&str> {
    let (open, tagged) = match reply.find("```json") {
        Some(pos) => (pos + "```json".len(), true),
        None => (reply.find("```")? + 3, false),
    };

    let body = &reply[open..];
    let body = if tagged {
        body
    } else {
        // Drop a possible language tag on the opening line.
        match body.find('\n') {
            Some(newline) => &body[newline + 1..],
            None => body,
        }
    };

    match body.find("```") {
        Some(close) => Some(&body[..close]),
        // Truncated reply: no closing fence, take everything.
        None => Some(body),
    }
}

/// Slice out the first balanced `{...}` or `[...]` span.
///
/// Tracks string literals and escapes so braces inside dialogue text do not
/// confuse the depth count.
fn balanced_span(reply: &str) -> Option<&str> {
    let start = reply.find(['{', '['])?;
    let open = reply.as_bytes()[start] as char;
    let close = if open == '{' { '}' } else { ']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in reply[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&reply[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
