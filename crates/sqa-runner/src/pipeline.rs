use std::sync::Arc;

use reqwest::Client;
use sqa_artifacts::default_emitters;
use sqa_core::{
    partition_results, ArtifactEmitter, PipelineOutput, PipelineState, StageError, StaticStoryFetcher,
    StoryFetcher, TestCaseGenerator, TestCaseValidator,
};
use sqa_llm::{LlmTestCaseGenerator, OpenAiClient, TemplateTestCaseGenerator};
use sqa_tracker::{story_query, JiraClient, JiraStoryFetcher};
use sqa_validate::RuleValidator;
use tracing::{info, warn};

use crate::Config;

/// fetch → generate → validate → (emit), each stage a pluggable implementation.
pub struct Pipeline {
    fetcher: Box<dyn StoryFetcher>,
    generator: Box<dyn TestCaseGenerator>,
    validator: Box<dyn TestCaseValidator>,
    emitters: Vec<Box<dyn ArtifactEmitter>>,
}

impl Pipeline {
    pub fn new(
        fetcher: Box<dyn StoryFetcher>,
        generator: Box<dyn TestCaseGenerator>,
        validator: Box<dyn TestCaseValidator>,
    ) -> Self {
        Self {
            fetcher,
            generator,
            validator,
            emitters: vec![],
        }
    }

    pub fn with_emitters(mut self, emitters: Vec<Box<dyn ArtifactEmitter>>) -> Self {
        self.emitters = emitters;
        self
    }

    /// Jira fetcher, OpenAI generator, non-empty validator; emitters when enabled in `cfg`.
    pub fn from_config(cfg: &Config, http: Client) -> Self {
        let fetcher = tracker_fetcher(cfg, http.clone());
        let model = OpenAiClient::new(
            http,
            cfg.model.base_url.clone(),
            cfg.model.api_key.expose(),
            cfg.model.model.clone(),
        );
        let generator = LlmTestCaseGenerator::new(Arc::new(model)).with_max_tokens(cfg.model.max_tokens);

        let pipeline = Self::new(Box::new(fetcher), Box::new(generator), Box::new(RuleValidator::default()));
        if cfg.output.emit_artifacts {
            pipeline.with_emitters(default_emitters())
        } else {
            pipeline
        }
    }

    /// Offline pipeline: two sample stories and template test cases.
    pub fn demo(emit: bool) -> Self {
        let pipeline = Self::new(
            Box::new(StaticStoryFetcher::sample()),
            Box::new(TemplateTestCaseGenerator),
            Box::new(RuleValidator::default()),
        );
        if emit {
            pipeline.with_emitters(default_emitters())
        } else {
            pipeline
        }
    }

    pub fn emits(&self) -> bool {
        !self.emitters.is_empty()
    }

    /// Fetch, generate, validate and emit, leaving `state` at the last stage entered.
    /// A fatal error moves `state` to `Failed`.
    pub async fn run_stages(&self, state: &mut PipelineState) -> Result<PipelineOutput, StageError> {
        let emit = self.emits();
        *state = PipelineState::Fetching;
        info!(state = ?*state, "fetching user stories");
        let stories = match self.fetcher.fetch_stories().await {
            Ok(s) => s,
            Err(e) => {
                *state = state.fail();
                warn!(state = ?*state, "fetch failed");
                return Err(e);
            }
        };

        *state = state.advance(emit);
        info!(state = ?*state, "generating test cases");
        let results = self.generator.generate(&stories).await;
        let (test_cases, generation_failures) = partition_results(results);
        if !generation_failures.is_empty() {
            warn!("{} of {} stories produced no test case", generation_failures.len(), stories.len());
        }

        *state = state.advance(emit);
        info!(state = ?*state, "validating test cases");
        let validated_cases = self.validator.validate(&test_cases);

        let mut output = PipelineOutput {
            user_stories: stories,
            test_cases,
            validated_cases,
            playwright_scripts: None,
            github_actions: None,
            generation_failures,
        };

        if emit {
            *state = state.advance(emit);
            info!(state = ?*state, "emitting artifacts");
            for emitter in &self.emitters {
                let artifacts = emitter.emit(&output.validated_cases);
                output.set_artifacts(emitter.kind(), artifacts);
            }
        }
        Ok(output)
    }

    /// All stages without persisting anything.
    pub async fn run(&self) -> Result<PipelineOutput, StageError> {
        let mut state = PipelineState::Fetching;
        let output = self.run_stages(&mut state).await?;
        state = state.advance(self.emits());
        info!(?state, "pipeline complete");
        Ok(output)
    }
}

/// The configured Jira fetcher on its own, for fetch-only use.
pub fn tracker_fetcher(cfg: &Config, http: Client) -> JiraStoryFetcher {
    let jira = JiraClient::new(
        http,
        cfg.tracker.base_url.clone(),
        cfg.tracker.email.clone(),
        cfg.tracker.api_token.expose(),
    );
    let fetcher = JiraStoryFetcher::new(jira, story_query(&cfg.tracker.project_key, &cfg.tracker.issue_type));
    if cfg.tracker.paginate {
        fetcher.with_pagination(cfg.tracker.max_pages)
    } else {
        fetcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_pipeline_without_emit_has_base_shape() {
        let out = Pipeline::demo(false).run().await.unwrap();
        assert_eq!(out.user_stories.len(), 2);
        assert_eq!(out.test_cases.len(), 2);
        assert!(out.validated_cases.iter().all(|v| v.is_valid));
        assert!(out.playwright_scripts.is_none());
        assert!(out.github_actions.is_none());
    }

    #[tokio::test]
    async fn demo_pipeline_with_emit_fills_both_lists() {
        let out = Pipeline::demo(true).run().await.unwrap();
        assert_eq!(out.playwright_scripts.as_ref().map(Vec::len), Some(2));
        assert_eq!(out.github_actions.as_ref().map(Vec::len), Some(2));
        assert_eq!(out.github_actions.unwrap()[1].story_id, "STORY-2");
    }

    struct Unreachable;

    #[async_trait::async_trait]
    impl StoryFetcher for Unreachable {
        async fn fetch_stories(&self) -> Result<Vec<sqa_core::Story>, StageError> {
            Err(StageError::Transport {
                service: sqa_core::Service::Tracker,
                message: "connection refused".into(),
            })
        }
    }

    #[tokio::test]
    async fn fetch_error_leaves_state_failed() {
        let pipeline = Pipeline::new(
            Box::new(Unreachable),
            Box::new(TemplateTestCaseGenerator),
            Box::new(RuleValidator::default()),
        );
        let mut state = PipelineState::Fetching;
        assert!(pipeline.run_stages(&mut state).await.is_err());
        assert_eq!(state, PipelineState::Failed);
    }

    #[tokio::test]
    async fn run_stages_stops_at_last_stage_entered() {
        let mut state = PipelineState::Fetching;
        Pipeline::demo(false).run_stages(&mut state).await.unwrap();
        assert_eq!(state, PipelineState::Validating);
        Pipeline::demo(true).run_stages(&mut state).await.unwrap();
        assert_eq!(state, PipelineState::Emitting);
    }

    #[test]
    fn from_config_enables_emitters_on_request() {
        let mut cfg = Config::default();
        assert!(!Pipeline::from_config(&cfg, Client::new()).emits());
        cfg.output.emit_artifacts = true;
        assert!(Pipeline::from_config(&cfg, Client::new()).emits());
    }
}
