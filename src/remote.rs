//! 远程井字棋服务的接口边界：请求地址与响应解析。网络请求本身由宿主页面完成。

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::config::RemoteConfig;
use crate::error::{EngineError, EngineResult};
use crate::game::{Board, MatchResult, CELL_COUNT};

/// 携带鉴权令牌的请求头名称。
pub const AUTH_HEADER: &str = "auth";

const STATUS_SUCCESS: &str = "success";

impl RemoteConfig {
    pub fn next_move_url(&self, board: &Board) -> String {
        self.endpoint(&self.next_move_path, board)
    }

    pub fn check_victory_url(&self, board: &Board) -> String {
        self.endpoint(&self.check_victory_path, board)
    }

    fn endpoint(&self, path: &str, board: &Board) -> String {
        format!("{}{}?field={}", self.base_url, path, board.serialize())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct NextMovePayload {
    #[serde(rename = "nextMove")]
    next_move: i64,
}

#[derive(Debug, Deserialize)]
struct VictoryPayload {
    result: String,
}

fn parse_envelope<T: DeserializeOwned>(json: &str) -> EngineResult<T> {
    let envelope: Envelope<T> = serde_json::from_str(json).map_err(|err| {
        warn!(error = %err, "rejected remote payload");
        EngineError::invalid_response(err.to_string())
    })?;

    if envelope.status != STATUS_SUCCESS {
        let message = envelope
            .message
            .unwrap_or_else(|| format!("status '{}'", envelope.status));
        return Err(EngineError::Remote { message });
    }

    envelope
        .data
        .ok_or_else(|| EngineError::invalid_response("missing 'data' field"))
}

/// 解析 `{status, data: {nextMove}}`。
pub fn parse_next_move(json: &str) -> EngineResult<usize> {
    let payload: NextMovePayload = parse_envelope(json)?;
    usize::try_from(payload.next_move)
        .ok()
        .filter(|&index| index < CELL_COUNT)
        .ok_or_else(|| {
            warn!(next_move = payload.next_move, "remote move out of range");
            EngineError::invalid_response(format!(
                "next move {} is outside 0..{CELL_COUNT}",
                payload.next_move
            ))
        })
}

/// 解析 `{status, data: {result}}`，result 为 '_'、'0'、'1' 或平局标记 'x'。
pub fn parse_victory(json: &str) -> EngineResult<MatchResult> {
    let payload: VictoryPayload = parse_envelope(json)?;
    MatchResult::from_code(&payload.result).ok_or_else(|| {
        EngineError::invalid_response(format!("unknown result code '{}'", payload.result))
    })
}
