use sqa_core::Story;

pub const SYSTEM_PROMPT: &str = "You are a QA test case generator.";

pub const DEFAULT_MAX_TOKENS: u32 = 300;

/// Single-turn request sent for one story.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn for_story(story: &Story, max_tokens: u32) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user: story_prompt(&story.summary),
            max_tokens,
        }
    }
}

pub fn story_prompt(summary: &str) -> String {
    format!("Generate step-by-step test cases for the following user story: {summary}")
}
