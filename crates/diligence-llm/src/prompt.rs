//! Prompt construction for compliance analysis

use crate::LlmError;
use serde_json::Value;

/// Reviewer persona and task, sent as the system message
pub const SYSTEM_PROMPT: &str = "\
You are an internal audit assistant responsible for evaluating JSON responses \
returned by the Portal da Transparência APIs. These responses describe whether \
a CNPJ or CPF appears in the public lists CEIS, CNEP, CEPIM and Acordos de \
Leniência. Analyze the JSON and return an opinion stating whether the company \
should or should not establish commercial relations with that registrant. Be \
critical about the content of the records when analyzing them.";

const USER_INSTRUCTION: &str = "Please analyze the following data and provide a detailed opinion:";

/// User message: the instruction followed by the pretty-printed payload.
pub fn build_user_prompt(payload: &Value) -> Result<String, LlmError> {
    let pretty = serde_json::to_string_pretty(payload).map_err(|e| LlmError::Prompt(e.to_string()))?;
    Ok(format!("{}\n{}", USER_INSTRUCTION, pretty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_prompt_embeds_pretty_payload() {
        let payload = json!([{"id": 1, "tipoSancao": "Suspensão"}]);
        let prompt = build_user_prompt(&payload).unwrap();

        assert!(prompt.starts_with(USER_INSTRUCTION));
        assert!(prompt.contains("\"tipoSancao\": \"Suspensão\""));
        assert!(prompt.contains('\n'));
    }

    #[test]
    fn test_system_prompt_names_all_lists() {
        for list in ["CEIS", "CNEP", "CEPIM", "Leniência"] {
            assert!(SYSTEM_PROMPT.contains(list), "missing {list}");
        }
    }
}
