use super::directive::{FINAL_ANSWER_PREFIX, FUNCTION_CALL_PREFIX};
use crate::config::PromptSettings;

/// Fixed preamble of every prompt in a run: persona, catalog, grammar.
#[derive(Debug, Clone)]
pub struct Instructions {
    preamble: String,
}

impl Instructions {
    pub fn compose(settings: &PromptSettings, catalog: &str) -> Self {
        let mut sections = vec![
            settings.persona.trim().to_string(),
            format!("Available tools:\n{catalog}"),
            format!(
                "You must respond with EXACTLY ONE line in one of these formats (no additional text):\n\
                 1. For function calls:\n   {FUNCTION_CALL_PREFIX} function_name|param1|param2|...\n\n\
                 2. For final answers:\n   {FINAL_ANSWER_PREFIX} [Your message here]"
            ),
        ];

        if !settings.objectives.is_empty() {
            sections.push(bullet_section("Important:", &settings.objectives));
        }
        if !settings.examples.is_empty() {
            sections.push(bullet_section("Examples:", &settings.examples));
        }

        sections.push(format!(
            "DO NOT include any explanations or additional text.\n\
             Your entire response should be a single line starting with either {FUNCTION_CALL_PREFIX} or {FINAL_ANSWER_PREFIX}"
        ));

        Self {
            preamble: sections.join("\n\n"),
        }
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn prompt(&self, query: &str, context: Option<&str>) -> String {
        match context {
            Some(context) => format!("{}\n\nQuery: {query}\n\n{context}", self.preamble),
            None => format!("{}\n\nQuery: {query}", self.preamble),
        }
    }
}

fn bullet_section(title: &str, lines: &[String]) -> String {
    let bullets = lines
        .iter()
        .map(|line| format!("- {}", line.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{title}\n{bullets}")
}
