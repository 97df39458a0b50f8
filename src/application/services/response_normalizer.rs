use serde_json::Value;

use crate::domain::ClauseType;

const TITLE_TRUNCATION_CHARS: usize = 80;

/// A clause accepted by validation but not yet tied to a job row.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedClause {
    pub clause_type: ClauseType,
    pub title: String,
    pub content: String,
    pub order: u32,
    pub extra_data: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("malformed model output: {0}")]
    MalformedModelOutput(String),
    #[error("model returned no usable clauses for a non-empty document")]
    EmptyExtractionResult,
}

/// Parses a raw model completion into an ordered clause list.
///
/// Strict JSON-array parsing is attempted first; if that fails, a repair
/// pass re-parses the substring between the first `[` and the last `]`,
/// tolerating prose the model may have wrapped around the array. Elements
/// with an unknown `clause_type` are coerced to `other`, a missing `title`
/// defaults to a truncation of the content, and elements without content
/// are dropped individually. `source_is_empty` tells the normalizer whether
/// an empty final list is legitimate (empty source document) or a failure.
pub fn normalize_response(
    raw_text: &str,
    source_is_empty: bool,
) -> Result<Vec<NormalizedClause>, NormalizeError> {
    let elements = parse_json_array(raw_text)?;

    let mut clauses = Vec::with_capacity(elements.len());
    for element in elements {
        let Value::Object(fields) = element else {
            tracing::warn!("Dropping non-object element in model response");
            continue;
        };

        let content = match fields.get("content").and_then(Value::as_str) {
            Some(c) if !c.trim().is_empty() => c.to_string(),
            _ => {
                tracing::warn!("Dropping clause element without content");
                continue;
            }
        };

        let clause_type = fields
            .get("clause_type")
            .and_then(Value::as_str)
            .map(ClauseType::coerce)
            .unwrap_or(ClauseType::Other);

        let title = match fields.get("title").and_then(Value::as_str) {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => truncate_title(&content),
        };

        let summary = fields
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default();

        clauses.push(NormalizedClause {
            clause_type,
            title,
            content,
            order: clauses.len() as u32,
            extra_data: serde_json::json!({ "summary": summary }),
        });
    }

    if clauses.is_empty() && !source_is_empty {
        return Err(NormalizeError::EmptyExtractionResult);
    }

    Ok(clauses)
}

/// Two-stage parser: strict first, then bracket extraction.
fn parse_json_array(raw_text: &str) -> Result<Vec<Value>, NormalizeError> {
    if let Ok(Value::Array(elements)) = serde_json::from_str::<Value>(raw_text.trim()) {
        return Ok(elements);
    }

    let start = raw_text.find('[');
    let end = raw_text.rfind(']');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(NormalizeError::MalformedModelOutput(
            "no JSON array found in response".to_string(),
        ));
    };
    if end < start {
        return Err(NormalizeError::MalformedModelOutput(
            "mismatched brackets in response".to_string(),
        ));
    }

    match serde_json::from_str::<Value>(&raw_text[start..=end]) {
        Ok(Value::Array(elements)) => Ok(elements),
        Ok(_) => Err(NormalizeError::MalformedModelOutput(
            "repaired response is not a JSON array".to_string(),
        )),
        Err(e) => Err(NormalizeError::MalformedModelOutput(e.to_string())),
    }
}

fn truncate_title(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= TITLE_TRUNCATION_CHARS {
        trimmed.to_string()
    } else {
        trimmed.chars().take(TITLE_TRUNCATION_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_strict_json_array() {
        let raw = r#"[{"clause_type":"payment_terms","title":"Payment","content":"Pay net 30.","summary":"Payment schedule."}]"#;
        let clauses = normalize_response(raw, false).unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].clause_type, ClauseType::PaymentTerms);
        assert_eq!(clauses[0].title, "Payment");
        assert_eq!(clauses[0].order, 0);
        assert_eq!(clauses[0].extra_data["summary"], "Payment schedule.");
    }

    #[test]
    fn repairs_an_array_wrapped_in_prose() {
        let raw = "Sure, here are the clauses: [{\"clause_type\":\"payment_terms\",\"content\":\"Pay net 30.\"}] Hope this helps!";
        let clauses = normalize_response(raw, false).unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].title, "Pay net 30.");
    }

    #[test]
    fn fails_when_no_array_can_be_recovered() {
        let result = normalize_response("I could not find any clauses, sorry.", false);
        assert!(matches!(result, Err(NormalizeError::MalformedModelOutput(_))));
    }

    #[test]
    fn coerces_unknown_clause_types_to_other() {
        let raw = r#"[{"clause_type":"warranties","title":"W","content":"As-is."}]"#;
        let clauses = normalize_response(raw, false).unwrap();
        assert_eq!(clauses[0].clause_type, ClauseType::Other);
    }

    #[test]
    fn drops_elements_without_content_but_keeps_the_rest() {
        let raw = r#"[
            {"clause_type":"termination","title":"T"},
            {"clause_type":"liability","title":"L","content":"Limited to fees paid."}
        ]"#;
        let clauses = normalize_response(raw, false).unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].clause_type, ClauseType::Liability);
        assert_eq!(clauses[0].order, 0);
    }

    #[test]
    fn empty_array_for_non_empty_source_is_a_failure() {
        let result = normalize_response("[]", false);
        assert!(matches!(result, Err(NormalizeError::EmptyExtractionResult)));
    }

    #[test]
    fn empty_array_for_empty_source_yields_zero_clauses() {
        let clauses = normalize_response("[]", true).unwrap();
        assert!(clauses.is_empty());
    }

    #[test]
    fn all_elements_dropped_for_non_empty_source_is_a_failure() {
        let raw = r#"[{"clause_type":"termination"},{"clause_type":"liability","content":"  "}]"#;
        let result = normalize_response(raw, false);
        assert!(matches!(result, Err(NormalizeError::EmptyExtractionResult)));
    }

    #[test]
    fn order_is_contiguous_after_drops() {
        let raw = r#"[
            {"clause_type":"payment_terms","content":"A."},
            {"clause_type":"termination"},
            {"clause_type":"liability","content":"B."},
            {"clause_type":"governing_law","content":"C."}
        ]"#;
        let clauses = normalize_response(raw, false).unwrap();
        let orders: Vec<u32> = clauses.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn long_content_titles_are_truncated() {
        let content = "x".repeat(200);
        let raw = format!(r#"[{{"clause_type":"other","content":"{content}"}}]"#);
        let clauses = normalize_response(&raw, false).unwrap();
        assert_eq!(clauses[0].title.chars().count(), 80);
    }
}
