use std::sync::Arc;

use async_trait::async_trait;
use sqa_core::{GenerationFailure, GenerationResult, Story, TestCase, TestCaseGenerator};
use tracing::{info, warn};

use crate::openai::ChatCompletion;
use crate::prompt::{ChatRequest, DEFAULT_MAX_TOKENS};

/// Asks the model for each story in turn. A failed story is recorded and the batch continues.
pub struct LlmTestCaseGenerator {
    client: Arc<dyn ChatCompletion>,
    max_tokens: u32,
}

impl LlmTestCaseGenerator {
    pub fn new(client: Arc<dyn ChatCompletion>) -> Self {
        Self {
            client,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl TestCaseGenerator for LlmTestCaseGenerator {
    async fn generate(&self, stories: &[Story]) -> Vec<GenerationResult> {
        info!("generating test cases for {} stories", stories.len());
        let mut results = Vec::with_capacity(stories.len());
        for story in stories {
            let request = ChatRequest::for_story(story, self.max_tokens);
            let result = match self.client.complete(&request).await {
                Ok(text) => Ok(TestCase::new(story.id.clone(), text.trim())),
                Err(e) => {
                    warn!("test case generation failed for {}: {e}", story.id);
                    Err(GenerationFailure {
                        story_id: story.id.clone(),
                        category: e.category(),
                        message: e.to_string(),
                    })
                }
            };
            results.push(result);
        }
        results
    }
}

/// Offline generator that never calls a model.
#[derive(Clone, Debug, Default)]
pub struct TemplateTestCaseGenerator;

pub fn mocked_test_case(summary: &str) -> String {
    format!("Test case for {summary} (mocked)")
}

#[async_trait]
impl TestCaseGenerator for TemplateTestCaseGenerator {
    async fn generate(&self, stories: &[Story]) -> Vec<GenerationResult> {
        stories
            .iter()
            .map(|s| Ok(TestCase::new(s.id.clone(), mocked_test_case(&s.summary))))
            .collect()
    }
}
