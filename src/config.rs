use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// AI 走法来源：远程服务，或不同搜索深度的本地 minimax。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    Api,
    MinimaxEasy,
    MinimaxMedium,
    #[default]
    MinimaxHard,
}

impl AiMode {
    pub fn search_depth(self) -> Option<u8> {
        match self {
            AiMode::Api => None,
            AiMode::MinimaxEasy => Some(1),
            AiMode::MinimaxMedium => Some(5),
            AiMode::MinimaxHard => Some(9),
        }
    }

    pub fn is_remote(self) -> bool {
        self.search_depth().is_none()
    }
}

impl FromStr for AiMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "api" | "remote" => Ok(AiMode::Api),
            "easy" | "minimax_easy" => Ok(AiMode::MinimaxEasy),
            "medium" | "normal" | "minimax_medium" => Ok(AiMode::MinimaxMedium),
            "hard" | "expert" | "minimax_hard" => Ok(AiMode::MinimaxHard),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FirstMove {
    #[default]
    Player,
    Ai,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    VersusAi,
    HotSeat,
}

/// 远程井字棋服务的地址配置。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default = "default_next_move_path")]
    pub next_move_path: String,
    #[serde(default = "default_check_victory_path")]
    pub check_victory_path: String,
    /// 请求超过该秒数后，前端提示“请求较慢”。
    #[serde(default = "default_long_request_secs")]
    pub long_request_secs: f32,
}

fn default_next_move_path() -> String {
    "nextmove.php".to_string()
}

fn default_check_victory_path() -> String {
    "result.php".to_string()
}

fn default_long_request_secs() -> f32 {
    1.0
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_token: String::new(),
            next_move_path: default_next_move_path(),
            check_victory_path: default_check_victory_path(),
            long_request_secs: default_long_request_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MatchConfig {
    #[serde(default)]
    pub mode: MatchMode,
    #[serde(default)]
    pub ai_mode: AiMode,
    #[serde(default)]
    pub first_move: FirstMove,
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl MatchConfig {
    pub fn versus_ai(ai_mode: AiMode) -> Self {
        Self {
            ai_mode,
            ..Self::default()
        }
    }

    pub fn hot_seat() -> Self {
        Self {
            mode: MatchMode::HotSeat,
            ..Self::default()
        }
    }

    pub fn with_first_move(mut self, first_move: FirstMove) -> Self {
        self.first_move = first_move;
        self
    }

    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        self.remote = remote;
        self
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| EngineError::invalid_input(format!("match config: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_mode_depths_follow_difficulty() {
        assert_eq!(AiMode::Api.search_depth(), None);
        assert_eq!(AiMode::MinimaxEasy.search_depth(), Some(1));
        assert_eq!(AiMode::MinimaxMedium.search_depth(), Some(5));
        assert_eq!(AiMode::MinimaxHard.search_depth(), Some(9));
        assert!(AiMode::Api.is_remote());
    }

    #[test]
    fn ai_mode_parses_aliases() {
        assert_eq!(AiMode::from_str("Remote"), Ok(AiMode::Api));
        assert_eq!(AiMode::from_str("easy"), Ok(AiMode::MinimaxEasy));
        assert_eq!(AiMode::from_str("NORMAL"), Ok(AiMode::MinimaxMedium));
        assert_eq!(AiMode::from_str("expert"), Ok(AiMode::MinimaxHard));
        assert!(AiMode::from_str("impossible").is_err());
    }

    #[test]
    fn config_fills_defaults_from_partial_json() {
        let config = MatchConfig::from_json(
            r#"{"ai_mode":"api","remote":{"base_url":"https://example.test/api/"}}"#,
        )
        .expect("config should parse");
        assert_eq!(config.mode, MatchMode::VersusAi);
        assert_eq!(config.ai_mode, AiMode::Api);
        assert_eq!(config.first_move, FirstMove::Player);
        assert_eq!(config.remote.base_url, "https://example.test/api/");
        assert_eq!(config.remote.next_move_path, "nextmove.php");
        assert_eq!(config.remote.check_victory_path, "result.php");
        assert_eq!(config.remote.long_request_secs, 1.0);
    }

    #[test]
    fn long_request_threshold_can_be_overridden() {
        let config = MatchConfig::from_json(r#"{"remote":{"long_request_secs":2.5}}"#)
            .expect("config should parse");
        assert_eq!(config.remote.long_request_secs, 2.5);
        assert_eq!(config.remote.next_move_path, "nextmove.php");
    }

    #[test]
    fn invalid_config_json_is_rejected() {
        let err = MatchConfig::from_json(r#"{"ai_mode":"grandmaster"}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn empty_json_is_default_config() {
        let config = MatchConfig::from_json("{}").expect("config should parse");
        assert_eq!(config, MatchConfig::default());
        assert_eq!(config.ai_mode, AiMode::MinimaxHard);
    }
}
