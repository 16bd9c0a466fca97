//! Parser turning a free-text AI answer into prescription suggestions.
//!
//! Decision-support answers mix prose with a JSON payload. The payload may
//! sit inside a markdown code block, follow a preamble, or be the whole
//! answer. Two shapes are accepted:
//!
//! ```text
//! [{"type": "ADDITION", "product_id": "123456789012", "guideline": {...}}, ...]
//! {"suggestions": [...]}
//! ```
//!
//! Suggestions are returned in answer order.

use serde::Deserialize;

use crate::domain::foundation::ProductId;
use crate::domain::prescription::{GuidelineRecord, Suggestion, TakingGuideline};
use crate::ports::AIError;

/// One suggestion as it appears on the wire, before validation.
#[derive(Debug, Deserialize)]
struct SuggestionRecord {
    #[serde(rename = "type")]
    kind: String,
    product_id: Option<String>,
    guideline: Option<GuidelineRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuggestionPayload {
    List(Vec<SuggestionRecord>),
    Wrapped { suggestions: Vec<SuggestionRecord> },
}

impl SuggestionPayload {
    fn into_records(self) -> Vec<SuggestionRecord> {
        match self {
            SuggestionPayload::List(records) => records,
            SuggestionPayload::Wrapped { suggestions } => suggestions,
        }
    }
}

/// Parses an AI answer into an ordered list of suggestions.
///
/// # Errors
///
/// - `MalformedResponse` if no JSON payload is found, the payload does not
///   decode, or a suggestion carries an unknown type, an invalid product
///   identifier or an invalid guideline
/// - `MissingValue` if a suggestion lacks its product identifier, or an
///   addition/modification lacks its guideline
pub fn parse_suggestions(answer: &str) -> Result<Vec<Suggestion>, AIError> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return Err(AIError::malformed("answer is empty"));
    }

    let json = extract_json(trimmed);
    let payload: SuggestionPayload =
        serde_json::from_str(&json).map_err(|e| AIError::malformed(e.to_string()))?;

    payload
        .into_records()
        .into_iter()
        .enumerate()
        .map(|(index, record)| to_suggestion(index, record))
        .collect()
}

fn to_suggestion(index: usize, record: SuggestionRecord) -> Result<Suggestion, AIError> {
    let raw_id = record
        .product_id
        .ok_or_else(|| AIError::missing_value(format!("suggestion {}: product_id", index)))?;
    let product_id = ProductId::new(raw_id)
        .map_err(|e| AIError::malformed(format!("suggestion {}: {}", index, e)))?;

    match record.kind.as_str() {
        "ADDITION" => Ok(Suggestion::Addition {
            product_id,
            guideline: guideline_of(index, record.guideline)?,
        }),
        "MODIFICATION" => Ok(Suggestion::Modification {
            product_id,
            guideline: guideline_of(index, record.guideline)?,
        }),
        "ELIMINATION" => Ok(Suggestion::Elimination { product_id }),
        other => Err(AIError::malformed(format!(
            "suggestion {}: unknown type '{}'",
            index, other
        ))),
    }
}

fn guideline_of(index: usize, record: Option<GuidelineRecord>) -> Result<TakingGuideline, AIError> {
    let record =
        record.ok_or_else(|| AIError::missing_value(format!("suggestion {}: guideline", index)))?;
    TakingGuideline::try_from(record)
        .map_err(|e| AIError::malformed(format!("suggestion {}: {}", index, e)))
}

/// Locates the JSON payload inside an answer.
///
/// Falls back to the whole answer and lets the JSON parser report the error.
fn extract_json(answer: &str) -> String {
    if let Some(json) = extract_from_code_block(answer) {
        return json;
    }

    let obj_start = answer.find('{');
    let arr_start = answer.find('[');
    let (start, open, close) = match (obj_start, arr_start) {
        (Some(o), Some(a)) if a < o => (a, '[', ']'),
        (Some(o), _) => (o, '{', '}'),
        (None, Some(a)) => (a, '[', ']'),
        (None, None) => return answer.to_string(),
    };

    extract_balanced(answer, start, open, close).unwrap_or_else(|| answer.to_string())
}

fn extract_from_code_block(s: &str) -> Option<String> {
    let patterns = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

    for pattern in patterns {
        if let Some(start) = s.find(pattern) {
            let body = start + pattern.len();
            if let Some(end) = s[body..].find("```") {
                return Some(s[body..body + end].trim().to_string());
            }
        }
    }
    None
}

fn extract_balanced(s: &str, start: usize, open: char, close: char) -> Option<String> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(s[start..start + offset + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}
