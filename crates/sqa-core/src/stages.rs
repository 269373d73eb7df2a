use async_trait::async_trait;

use crate::{Artifact, ArtifactKind, GenerationResult, StageError, Story, TestCase, ValidatedTestCase};

/// Produces the stories the rest of the pipeline works on.
#[async_trait]
pub trait StoryFetcher: Send + Sync {
    async fn fetch_stories(&self) -> Result<Vec<Story>, StageError>;
}

/// Drafts one test case per story. Returns exactly one result per input story, in input order.
#[async_trait]
pub trait TestCaseGenerator: Send + Sync {
    async fn generate(&self, stories: &[Story]) -> Vec<GenerationResult>;
}

/// Classifies drafts. Must be pure and total.
pub trait TestCaseValidator: Send + Sync {
    fn validate(&self, cases: &[TestCase]) -> Vec<ValidatedTestCase>;
}

/// Turns valid cases into placeholder artifacts of a single kind.
pub trait ArtifactEmitter: Send + Sync {
    fn kind(&self) -> ArtifactKind;
    fn emit(&self, validated: &[ValidatedTestCase]) -> Vec<Artifact>;
}

/// Fixed list of stories, used for offline runs.
#[derive(Clone, Debug, Default)]
pub struct StaticStoryFetcher {
    pub stories: Vec<Story>,
}

impl StaticStoryFetcher {
    pub fn new(stories: Vec<Story>) -> Self {
        Self { stories }
    }

    /// The two sample stories used by the demo mode.
    pub fn sample() -> Self {
        Self::new(vec![
            Story::new("STORY-1", "User can log in"),
            Story::new("STORY-2", "User can reset password"),
        ])
    }
}

#[async_trait]
impl StoryFetcher for StaticStoryFetcher {
    async fn fetch_stories(&self) -> Result<Vec<Story>, StageError> {
        Ok(self.stories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_fetcher_returns_two_stories_in_order() {
        let stories = StaticStoryFetcher::sample().fetch_stories().await.unwrap();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].id, "STORY-1");
        assert_eq!(stories[1].summary, "User can reset password");
    }
}
