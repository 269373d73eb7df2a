use serde::{Deserialize, Serialize};

use crate::error::ErrorCategory;

/// A user story as returned by the issue tracker.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Story {
    /// Tracker key, e.g. `PROJ-42`.
    pub id: String,
    pub summary: String,
}

impl Story {
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
        }
    }
}

/// Draft test case produced by the model for one story.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestCase {
    pub story_id: String,
    pub test_case: String,
}

impl TestCase {
    pub fn new(story_id: impl Into<String>, test_case: impl Into<String>) -> Self {
        Self {
            story_id: story_id.into(),
            test_case: test_case.into(),
        }
    }
}

/// A test case with its validation verdict. Serialized flat.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidatedTestCase {
    #[serde(flatten)]
    pub case: TestCase,
    pub is_valid: bool,
    pub validation_notes: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    PlaywrightScript,
    CiWorkflow,
}

impl ArtifactKind {
    /// Directory name used when artifacts are persisted.
    pub fn dir_name(self) -> &'static str {
        match self {
            ArtifactKind::PlaywrightScript => "playwright",
            ArtifactKind::CiWorkflow => "workflows",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            ArtifactKind::PlaywrightScript => "spec.ts",
            ArtifactKind::CiWorkflow => "yml",
        }
    }
}

/// Templated placeholder derived from a valid test case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artifact {
    pub story_id: String,
    pub content: String,
}

/// Why a single story produced no test case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationFailure {
    pub story_id: String,
    pub category: ErrorCategory,
    pub message: String,
}

/// Per-story outcome of the generate stage.
pub type GenerationResult = Result<TestCase, GenerationFailure>;

/// Splits per-story results into successes and failures, keeping input order in both.
pub fn partition_results(results: Vec<GenerationResult>) -> (Vec<TestCase>, Vec<GenerationFailure>) {
    let mut cases = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for r in results {
        match r {
            Ok(c) => cases.push(c),
            Err(f) => failures.push(f),
        }
    }
    (cases, failures)
}

/// Everything a run produced, in the shape printed to stdout.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineOutput {
    pub user_stories: Vec<Story>,
    pub test_cases: Vec<TestCase>,
    pub validated_cases: Vec<ValidatedTestCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playwright_scripts: Option<Vec<Artifact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_actions: Option<Vec<Artifact>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generation_failures: Vec<GenerationFailure>,
}

impl PipelineOutput {
    pub fn artifacts(&self, kind: ArtifactKind) -> Option<&[Artifact]> {
        match kind {
            ArtifactKind::PlaywrightScript => self.playwright_scripts.as_deref(),
            ArtifactKind::CiWorkflow => self.github_actions.as_deref(),
        }
    }

    pub fn set_artifacts(&mut self, kind: ArtifactKind, artifacts: Vec<Artifact>) {
        match kind {
            ArtifactKind::PlaywrightScript => self.playwright_scripts = Some(artifacts),
            ArtifactKind::CiWorkflow => self.github_actions = Some(artifacts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_case_serializes_flat() {
        let v = ValidatedTestCase {
            case: TestCase::new("STORY-1", "steps"),
            is_valid: true,
            validation_notes: "Valid".into(),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "story_id": "STORY-1",
                "test_case": "steps",
                "is_valid": true,
                "validation_notes": "Valid"
            })
        );
    }

    #[test]
    fn base_output_has_only_three_lists() {
        let out = PipelineOutput::default();
        let json = serde_json::to_value(&out).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        assert!(json.get("user_stories").is_some());
        assert!(json.get("test_cases").is_some());
        assert!(json.get("validated_cases").is_some());
    }

    #[test]
    fn partition_keeps_order() {
        let results = vec![
            Ok(TestCase::new("A", "a")),
            Err(GenerationFailure {
                story_id: "B".into(),
                category: ErrorCategory::Model,
                message: "429".into(),
            }),
            Ok(TestCase::new("C", "c")),
        ];
        let (cases, failures) = partition_results(results);
        assert_eq!(cases.iter().map(|c| c.story_id.as_str()).collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].story_id, "B");
    }
}
