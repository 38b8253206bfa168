use serde::Deserialize;

use crate::constants::{DEFAULT_HISTORY_WINDOW, DEFAULT_ITERATION_LIMIT};

const DEFAULT_PERSONA: &str =
    "You are a Keynote presentation assistant. You help create and edit Keynote presentations.";
const DEFAULT_TOPIC: &str = "Artificial Intelligence";
const DEFAULT_EDIT: &str = "Add a slide about Machine Learning applications";

/// Loop settings from the `[agent]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub iteration_limit: usize,
    pub history_window: usize,
    pub queries: Vec<String>,
    pub prompt: PromptSettings,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            history_window: DEFAULT_HISTORY_WINDOW,
            queries: PromptSettings::default_queries(),
            prompt: PromptSettings::default(),
        }
    }
}

/// Fixed text around the tool catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSettings {
    pub persona: String,
    pub objectives: Vec<String>,
    pub examples: Vec<String>,
}

impl PromptSettings {
    pub fn default_queries() -> Vec<String> {
        vec![
            format!("Create a Keynote presentation about {DEFAULT_TOPIC}"),
            format!("Now edit the presentation with this content: {DEFAULT_EDIT}"),
        ]
    }
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            objectives: vec![
                "In iteration 1: Create a new Keynote presentation with a title, content and save it to the desktop".to_string(),
                "Only give FINAL_ANSWER when you have completed all necessary operations".to_string(),
            ],
            examples: vec![
                "FUNCTION_CALL: create_keynote_with_text|Hello World|540|430".to_string(),
                "FINAL_ANSWER: [Presentation created and edited successfully]".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawAgent {
    pub iteration_limit: Option<usize>,
    pub history_window: Option<usize>,
    pub queries: Option<Vec<String>>,
    #[serde(default)]
    pub prompt: RawPrompt,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawPrompt {
    pub persona: Option<String>,
    pub objectives: Option<Vec<String>>,
    pub examples: Option<Vec<String>>,
}

impl From<RawPrompt> for PromptSettings {
    fn from(raw: RawPrompt) -> Self {
        let defaults = PromptSettings::default();
        Self {
            persona: raw.persona.unwrap_or(defaults.persona),
            objectives: raw.objectives.unwrap_or(defaults.objectives),
            examples: raw.examples.unwrap_or(defaults.examples),
        }
    }
}

impl From<RawAgent> for AgentSettings {
    fn from(raw: RawAgent) -> Self {
        let defaults = AgentSettings::default();
        Self {
            iteration_limit: raw.iteration_limit.unwrap_or(defaults.iteration_limit),
            history_window: raw.history_window.unwrap_or(defaults.history_window),
            queries: raw.queries.unwrap_or(defaults.queries),
            prompt: raw.prompt.into(),
        }
    }
}
