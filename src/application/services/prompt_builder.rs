use crate::domain::ClauseType;

/// Instruction payload for one extraction call: a fixed system instruction
/// carrying the clause taxonomy, and a user message carrying the document
/// text. Pure transformation; the same text always yields the same prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPrompt {
    pub system: String,
    pub user: String,
}

pub fn build_prompt(document_text: &str) -> ExtractionPrompt {
    let taxonomy = ClauseType::ALL
        .iter()
        .map(|t| format!("\"{}\"", t.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let system = format!(
        "You are an expert legal document analyzer specializing in contract clause extraction.\n\
         \n\
         Analyze the contract and extract every significant legal clause.\n\
         For each clause provide:\n\
         1. clause_type: one of [{taxonomy}]\n\
         2. title: a brief, descriptive title for the clause\n\
         3. content: the full text of the clause exactly as it appears in the document\n\
         4. summary: a 1-2 sentence summary of what the clause means\n\
         \n\
         Respond with a valid JSON array of objects with exactly the keys\n\
         clause_type, title, content, summary. Keep the original wording in\n\
         the content field. If the document contains no clauses, respond with\n\
         an empty JSON array. Return ONLY the JSON array, no additional text."
    );

    let user = format!(
        "Analyze the following legal contract and extract all significant clauses.\n\
         \n\
         Contract text:\n\
         {document_text}\n\
         \n\
         Return a JSON array of all extracted clauses following the schema in the system message."
    );

    ExtractionPrompt { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic_for_identical_text() {
        let a = build_prompt("Payment due in 30 days.");
        let b = build_prompt("Payment due in 30 days.");
        assert_eq!(a, b);
    }

    #[test]
    fn embeds_the_full_taxonomy_in_the_system_instruction() {
        let prompt = build_prompt("some contract");
        for clause_type in ClauseType::ALL {
            assert!(
                prompt.system.contains(clause_type.as_str()),
                "taxonomy entry {} missing from system prompt",
                clause_type
            );
        }
    }

    #[test]
    fn carries_the_document_text_in_the_user_message() {
        let prompt = build_prompt("Either party may terminate with notice.");
        assert!(prompt.user.contains("Either party may terminate with notice."));
    }

    #[test]
    fn empty_text_still_builds_a_valid_prompt() {
        let prompt = build_prompt("");
        assert!(!prompt.system.is_empty());
        assert!(prompt.user.contains("Contract text:"));
    }
}
