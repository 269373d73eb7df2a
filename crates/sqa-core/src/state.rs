use serde::{Deserialize, Serialize};

/// Where a run currently is. `Failed` is reachable from every non-terminal state.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Fetching,
    Generating,
    Validating,
    Emitting,
    Done,
    Failed,
}

impl PipelineState {
    /// Successor on success. Emitting is skipped when `emit` is false.
    pub fn advance(self, emit: bool) -> PipelineState {
        match self {
            PipelineState::Fetching => PipelineState::Generating,
            PipelineState::Generating => PipelineState::Validating,
            PipelineState::Validating if emit => PipelineState::Emitting,
            PipelineState::Validating => PipelineState::Done,
            PipelineState::Emitting => PipelineState::Done,
            PipelineState::Done => PipelineState::Done,
            PipelineState::Failed => PipelineState::Failed,
        }
    }

    /// Any non-terminal state moves to `Failed`; terminal states stay put.
    pub fn fail(self) -> PipelineState {
        if self.is_terminal() {
            self
        } else {
            PipelineState::Failed
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}
