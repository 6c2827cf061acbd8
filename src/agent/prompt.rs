//! System instructions for the reasoning service
//!
//! Publishes the tool schema and the reply protocol the decoder accepts.

use crate::agent::action::{FINAL_ANSWER, FUNCTION_CALL};
use crate::agent::loop_state::RESULT_PREFIX;
use crate::tools::ToolRegistry;

/// Build the system instructions for a registry
pub fn build_system_prompt(tools: &ToolRegistry, preamble: Option<&str>) -> String {
    let definitions = tools
        .describe_json()
        .unwrap_or_else(|_| String::from("[]"));

    let mut prompt = String::new();

    if let Some(preamble) = preamble.filter(|p| !p.trim().is_empty()) {
        prompt.push_str(preamble.trim());
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "You are an AI assistant that can help with text manipulation and presentation \
         by calling tools.\n\n",
    );
    prompt.push_str("Available tools:\n");
    prompt.push_str(&definitions);
    prompt.push_str("\n\nCall signatures (arguments are positional, in this order):\n");
    for tool in tools.descriptors() {
        prompt.push_str(&format!("- {}\n  {}\n", tool.usage(), tool.description()));
    }

    prompt.push_str(&format!(
        "\nRespond with EXACTLY ONE of these and nothing else:\n\
         {call} function_name|arg1|arg2|...\n\
         {answer} <your answer to the user>\n\n\
         Rules:\n\
         - Call one tool per reply. The next message will be an observation with its result.\n\
         - To pass the output of an earlier successful call, write {result}<n> \
           ({result}1 is the first call's output).\n\
         - Do not use '|' inside argument values.\n\
         - If a call fails, read the error and correct it.\n\
         - When the task is complete, or no tool is needed, reply with {answer}.",
        call = FUNCTION_CALL,
        answer = FINAL_ANSWER,
        result = RESULT_PREFIX,
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_tools_and_protocol() {
        let prompt = build_system_prompt(&ToolRegistry::new(), None);

        assert!(prompt.contains("\"name\": \"reverse_string\""));
        assert!(prompt.contains("FUNCTION_CALL: create_keynote_slide|<text: string>"));
        assert!(prompt.contains("FINAL_ANSWER: <your answer to the user>"));
        assert!(prompt.contains("RESULT_1"));
    }

    #[test]
    fn test_preamble_comes_first() {
        let prompt = build_system_prompt(&ToolRegistry::new(), Some("Be brief."));
        assert!(prompt.starts_with("Be brief.\n\n"));

        let blank = build_system_prompt(&ToolRegistry::new(), Some("  "));
        assert!(blank.starts_with("You are an AI assistant"));
    }
}
