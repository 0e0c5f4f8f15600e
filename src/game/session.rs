use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::board::{Board, Cell};
use super::rules::{self, MatchResult};
use crate::ai::{AiAgent, AiDecision};
use crate::config::{FirstMove, MatchConfig, MatchMode};
use crate::error::{EngineError, EngineResult};

/// 人机对战中人类执 FirstPlayer，AI 执 SecondPlayer。
pub const HUMAN_SYMBOL: Cell = Cell::FirstPlayer;
pub const AI_SYMBOL: Cell = Cell::SecondPlayer;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum MatchEvent {
    MarkPlaced {
        index: usize,
        symbol: Cell,
        by_ai: bool,
    },
    MatchEnded {
        result: MatchResult,
    },
}

/// 一次落子的结果，返回给前端刷新界面。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnResolution {
    pub board: Board,
    pub events: Vec<MatchEvent>,
    pub result: MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_move: Option<Cell>,
}

/// AI 走法的来源。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum MoveRequest {
    Local { depth: u8 },
    Remote { url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    config: MatchConfig,
    board: Board,
    to_move: Cell,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_placed: Option<Cell>,
    result: MatchResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    event_log: Vec<MatchEvent>,
}

impl Match {
    pub fn new(config: MatchConfig) -> Self {
        let to_move = match (config.mode, config.first_move) {
            (MatchMode::VersusAi, FirstMove::Player) => HUMAN_SYMBOL,
            (MatchMode::VersusAi, FirstMove::Ai) => AI_SYMBOL,
            // 双人模式第一手总是 SecondPlayer。
            (MatchMode::HotSeat, _) => Cell::SecondPlayer,
        };
        Self {
            config,
            board: Board::empty(),
            to_move,
            last_placed: None,
            result: MatchResult::Ongoing,
            event_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn result(&self) -> MatchResult {
        self.result
    }

    pub fn to_move(&self) -> Option<Cell> {
        if self.result.is_finished() {
            None
        } else {
            Some(self.to_move)
        }
    }

    pub fn last_placed(&self) -> Option<Cell> {
        self.last_placed
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.event_log
    }

    pub fn is_ai_turn(&self) -> bool {
        self.config.mode == MatchMode::VersusAi && self.to_move() == Some(AI_SYMBOL)
    }

    pub fn restart(&mut self) {
        *self = Match::new(self.config.clone());
    }

    pub fn player_place(&mut self, index: usize) -> EngineResult<TurnResolution> {
        self.ensure_ongoing()?;
        if self.config.mode == MatchMode::VersusAi && self.to_move != HUMAN_SYMBOL {
            return Err(EngineError::NotPlayerTurn);
        }
        self.place(index, false)
    }

    pub fn ai_move_request(&self) -> EngineResult<MoveRequest> {
        self.ensure_ai_turn()?;
        let request = match self.config.ai_mode.search_depth() {
            Some(depth) => MoveRequest::Local { depth },
            None => MoveRequest::Remote {
                url: self.config.remote.next_move_url(&self.board),
            },
        };
        Ok(request)
    }

    /// 用本地引擎计算并落下 AI 的一手。
    pub fn play_ai_move(&mut self) -> EngineResult<(AiDecision, TurnResolution)> {
        self.ensure_ai_turn()?;
        let agent = AiAgent::from_mode(self.config.ai_mode)?;
        let decision = agent.decide(&self.board)?;
        let resolution = self.place(decision.next_move, true)?;
        Ok((decision, resolution))
    }

    /// 落下由远程服务给出的 AI 走法。
    pub fn apply_ai_move(&mut self, index: usize) -> EngineResult<TurnResolution> {
        self.ensure_ai_turn()?;
        self.place(index, true)
    }

    /// 校验远程服务返回的胜负判定与本地判定一致。
    pub fn verify_remote_result(&self, remote: MatchResult) -> EngineResult<MatchResult> {
        if remote != self.result {
            warn!(
                position = %self.board,
                local = %self.result.code(),
                remote = %remote.code(),
                "remote result disagrees with local evaluation"
            );
            return Err(EngineError::ResultMismatch {
                local: self.result.code(),
                remote: remote.code(),
            });
        }
        Ok(self.result)
    }

    fn ensure_ongoing(&self) -> EngineResult<()> {
        if self.result.is_finished() {
            return Err(EngineError::MatchFinished);
        }
        Ok(())
    }

    fn ensure_ai_turn(&self) -> EngineResult<()> {
        self.ensure_ongoing()?;
        if self.config.mode == MatchMode::HotSeat {
            return Err(EngineError::illegal_state("hot-seat matches have no AI player"));
        }
        if self.to_move != AI_SYMBOL {
            return Err(EngineError::illegal_state("it is not the AI's turn"));
        }
        Ok(())
    }

    fn place(&mut self, index: usize, by_ai: bool) -> EngineResult<TurnResolution> {
        let symbol = self.to_move;
        self.board = self.board.place(index, symbol)?;
        self.last_placed = Some(symbol);

        let mut events = vec![MatchEvent::MarkPlaced {
            index,
            symbol,
            by_ai,
        }];

        self.result = rules::outcome(&self.board);
        if self.result.is_finished() {
            debug!(position = %self.board, result = %self.result.code(), "match ended");
            events.push(MatchEvent::MatchEnded {
                result: self.result,
            });
        } else {
            self.to_move = symbol.opponent();
        }

        self.event_log.extend(events.iter().cloned());
        Ok(TurnResolution {
            board: self.board,
            events,
            result: self.result,
            to_move: self.to_move(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AiMode, RemoteConfig};

    fn versus(ai_mode: AiMode) -> Match {
        Match::new(MatchConfig::versus_ai(ai_mode))
    }

    #[test]
    fn player_moves_first_by_default() {
        let mut game = versus(AiMode::MinimaxHard);
        assert_eq!(game.to_move(), Some(HUMAN_SYMBOL));
        assert!(!game.is_ai_turn());

        let resolution = game.player_place(4).expect("centre is free");
        assert_eq!(resolution.board.serialize(), "____0____");
        assert_eq!(resolution.to_move, Some(AI_SYMBOL));
        assert_eq!(
            resolution.events,
            vec![MatchEvent::MarkPlaced {
                index: 4,
                symbol: HUMAN_SYMBOL,
                by_ai: false
            }]
        );
        assert!(game.is_ai_turn());
        assert_eq!(game.last_placed(), Some(HUMAN_SYMBOL));
    }

    #[test]
    fn player_cannot_move_on_ai_turn() {
        let mut game = versus(AiMode::MinimaxHard);
        game.player_place(0).expect("free cell");
        assert_eq!(game.player_place(1), Err(EngineError::NotPlayerTurn));
    }

    #[test]
    fn ai_can_open_the_match() {
        let mut game = Match::new(
            MatchConfig::versus_ai(AiMode::MinimaxEasy).with_first_move(FirstMove::Ai),
        );
        assert!(game.is_ai_turn());
        let (decision, resolution) = game.play_ai_move().expect("AI opens");
        assert_eq!(decision.next_move, 1);
        assert_eq!(resolution.board.serialize(), "_1_______");
        assert_eq!(game.to_move(), Some(HUMAN_SYMBOL));
    }

    #[test]
    fn ai_turn_is_rejected_when_player_to_move() {
        let mut game = versus(AiMode::MinimaxHard);
        assert!(matches!(
            game.play_ai_move(),
            Err(EngineError::IllegalState { .. })
        ));
        assert!(matches!(
            game.apply_ai_move(0),
            Err(EngineError::IllegalState { .. })
        ));
    }

    #[test]
    fn full_match_against_hard_ai_never_ends_in_player_win() {
        let mut game = versus(AiMode::MinimaxHard);
        // 人类总是下第一个空格。
        while game.result() == MatchResult::Ongoing {
            if game.is_ai_turn() {
                game.play_ai_move().expect("AI move");
            } else {
                let index = game.board().empty_cells().next().expect("ongoing match");
                game.player_place(index).expect("free cell");
            }
        }
        assert_ne!(game.result(), MatchResult::FirstPlayerWon);
        assert!(matches!(
            game.events().last(),
            Some(MatchEvent::MatchEnded { .. })
        ));
        assert_eq!(game.to_move(), None);
        assert_eq!(game.player_place(0), Err(EngineError::MatchFinished));
    }

    #[test]
    fn winning_move_ends_match() {
        let mut game = versus(AiMode::MinimaxHard);
        game.player_place(0).expect("free");
        game.apply_ai_move(3).expect("free");
        game.player_place(1).expect("free");
        game.apply_ai_move(4).expect("free");
        let resolution = game.player_place(2).expect("free");

        assert_eq!(resolution.result, MatchResult::FirstPlayerWon);
        assert_eq!(resolution.to_move, None);
        assert_eq!(
            resolution.events.last(),
            Some(&MatchEvent::MatchEnded {
                result: MatchResult::FirstPlayerWon
            })
        );
        assert_eq!(game.ai_move_request(), Err(EngineError::MatchFinished));
    }

    #[test]
    fn hot_seat_alternates_starting_with_second_player() {
        let mut game = Match::new(MatchConfig::hot_seat());
        assert_eq!(game.to_move(), Some(Cell::SecondPlayer));

        game.player_place(0).expect("free");
        game.player_place(4).expect("free");
        game.player_place(8).expect("free");
        assert_eq!(game.board().serialize(), "1___0___1");
        assert_eq!(game.to_move(), Some(Cell::FirstPlayer));
        assert!(!game.is_ai_turn());
        assert!(matches!(
            game.play_ai_move(),
            Err(EngineError::IllegalState { .. })
        ));
    }

    #[test]
    fn occupied_cell_is_illegal_and_keeps_turn() {
        let mut game = Match::new(MatchConfig::hot_seat());
        game.player_place(0).expect("free");
        assert!(matches!(
            game.player_place(0),
            Err(EngineError::IllegalMove { index: 0, .. })
        ));
        assert_eq!(game.to_move(), Some(Cell::FirstPlayer));
    }

    #[test]
    fn api_mode_requests_remote_move() {
        let remote = RemoteConfig {
            base_url: "https://example.test/".to_string(),
            ..RemoteConfig::default()
        };
        let mut game = Match::new(MatchConfig::versus_ai(AiMode::Api).with_remote(remote));
        game.player_place(4).expect("free");

        assert_eq!(
            game.ai_move_request(),
            Ok(MoveRequest::Remote {
                url: "https://example.test/nextmove.php?field=____0____".to_string()
            })
        );
        assert_eq!(game.play_ai_move().unwrap_err(), EngineError::RemoteMoveSource);

        let resolution = game.apply_ai_move(0).expect("remote move is legal");
        assert_eq!(resolution.board.serialize(), "1___0____");
    }

    #[test]
    fn local_mode_requests_engine_depth() {
        let mut game = versus(AiMode::MinimaxMedium);
        game.player_place(0).expect("free");
        assert_eq!(game.ai_move_request(), Ok(MoveRequest::Local { depth: 5 }));
    }

    #[test]
    fn remote_result_must_match_local_evaluation() {
        let mut game = versus(AiMode::Api);
        game.player_place(0).expect("free");
        assert_eq!(
            game.verify_remote_result(MatchResult::Ongoing),
            Ok(MatchResult::Ongoing)
        );
        assert_eq!(
            game.verify_remote_result(MatchResult::Draw),
            Err(EngineError::ResultMismatch {
                local: '_',
                remote: 'x'
            })
        );
    }

    #[test]
    fn restart_keeps_config_and_clears_board() {
        let mut game = Match::new(
            MatchConfig::versus_ai(AiMode::MinimaxEasy).with_first_move(FirstMove::Ai),
        );
        game.play_ai_move().expect("AI opens");
        game.restart();
        assert_eq!(game.board(), &Board::empty());
        assert!(game.events().is_empty());
        assert!(game.is_ai_turn());
        assert_eq!(game.config().ai_mode, AiMode::MinimaxEasy);
    }

    #[test]
    fn state_serializes_for_frontend() {
        let mut game = versus(AiMode::MinimaxHard);
        game.player_place(4).expect("free");
        let json = serde_json::to_value(&game).expect("serialize");
        assert_eq!(json["board"], "____0____");
        assert_eq!(json["to_move"], "SecondPlayer");
        assert_eq!(json["result"], "ongoing");
        assert_eq!(json["event_log"][0]["type"], "MarkPlaced");
    }
}
