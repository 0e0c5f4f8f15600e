//! 游戏核心逻辑模块（棋盘、胜负判定、对局流程）。

pub mod board;
pub mod rules;
pub mod session;

pub use board::{Board, Cell, CELL_COUNT};
pub use rules::{is_full, is_terminal, outcome, winner, MatchResult, WINNING_LINES};
pub use session::{Match, MatchEvent, MoveRequest, TurnResolution, AI_SYMBOL, HUMAN_SYMBOL};
