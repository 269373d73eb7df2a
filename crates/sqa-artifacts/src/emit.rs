use sqa_core::{Artifact, ArtifactEmitter, ArtifactKind, ValidatedTestCase};

/// Mocked Playwright script per valid case.
pub struct PlaywrightEmitter;

/// Mocked GitHub Actions workflow per valid case.
pub struct WorkflowEmitter;

pub fn playwright_script(story_id: &str) -> String {
    format!("// Playwright script for {story_id}\n// ... (mocked)")
}

pub fn github_workflow(story_id: &str) -> String {
    format!("# GitHub Actions workflow for {story_id}\n# ... (mocked)")
}

fn emit_valid(validated: &[ValidatedTestCase], render: fn(&str) -> String) -> Vec<Artifact> {
    validated
        .iter()
        .filter(|v| v.is_valid)
        .map(|v| Artifact {
            story_id: v.case.story_id.clone(),
            content: render(&v.case.story_id),
        })
        .collect()
}

impl ArtifactEmitter for PlaywrightEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::PlaywrightScript
    }

    fn emit(&self, validated: &[ValidatedTestCase]) -> Vec<Artifact> {
        emit_valid(validated, playwright_script)
    }
}

impl ArtifactEmitter for WorkflowEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::CiWorkflow
    }

    fn emit(&self, validated: &[ValidatedTestCase]) -> Vec<Artifact> {
        emit_valid(validated, github_workflow)
    }
}

/// Both emitters, in output order.
pub fn default_emitters() -> Vec<Box<dyn ArtifactEmitter>> {
    vec![Box::new(PlaywrightEmitter), Box::new(WorkflowEmitter)]
}
