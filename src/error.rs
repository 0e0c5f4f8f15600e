use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 引擎、对局与远程接口共用的错误类型。
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum EngineError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("illegal move at cell {index}: {reason}")]
    IllegalMove { index: usize, reason: String },

    #[error("illegal state: {reason}")]
    IllegalState { reason: String },

    #[error("it is not the player's turn")]
    NotPlayerTurn,

    #[error("the match is already finished")]
    MatchFinished,

    #[error("the configured AI mode delegates moves to the remote service")]
    RemoteMoveSource,

    #[error("remote result '{remote}' disagrees with local result '{local}'")]
    ResultMismatch { local: char, remote: char },

    #[error("remote service error: {message}")]
    Remote { message: String },

    #[error("invalid remote response: {reason}")]
    InvalidResponse { reason: String },
}

impl EngineError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn illegal_move(index: usize, reason: impl Into<String>) -> Self {
        EngineError::IllegalMove {
            index,
            reason: reason.into(),
        }
    }

    pub(crate) fn illegal_state(reason: impl Into<String>) -> Self {
        EngineError::IllegalState {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_response(reason: impl Into<String>) -> Self {
        EngineError::InvalidResponse {
            reason: reason.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
