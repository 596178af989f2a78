use std::path::PathBuf;

use thiserror::Error;

/// Fatal stage validation failures. Each maps to a stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("shader has no vertex section")]
    MissingVertexStage,

    #[error("vertex stage declares no inputs")]
    VertexStageWithoutInputs,

    #[error("shader has no fragment section")]
    MissingFragmentStage,

    #[error("fragment stage declares no outputs")]
    FragmentStageWithoutOutputs,
}

impl StageError {
    pub fn code(self) -> u32 {
        match self {
            StageError::MissingVertexStage => 1,
            StageError::VertexStageWithoutInputs => 2,
            StageError::MissingFragmentStage => 3,
            StageError::FragmentStageWithoutOutputs => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read shader source {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("stage validation failed with code {code}: {0}", code = .0.code())]
    Stage(#[from] StageError),
}

impl BuildError {
    /// Stage validation code, `None` for I/O failures.
    pub fn code(&self) -> Option<u32> {
        match self {
            BuildError::Read { .. } | BuildError::Io(_) => None,
            BuildError::Stage(err) => Some(err.code()),
        }
    }
}
