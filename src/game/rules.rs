use serde::{Deserialize, Serialize};

use super::board::{Board, Cell};

/// 8 条获胜线：3 行、3 列、主对角线、副对角线。顺序固定。
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Ongoing,
    FirstPlayerWon,
    SecondPlayerWon,
    Draw,
}

impl MatchResult {
    /// 远程服务使用的结果编码。
    pub fn code(self) -> char {
        match self {
            MatchResult::Ongoing => '_',
            MatchResult::FirstPlayerWon => '0',
            MatchResult::SecondPlayerWon => '1',
            MatchResult::Draw => 'x',
        }
    }

    pub fn from_code(code: &str) -> Option<MatchResult> {
        match code {
            "_" => Some(MatchResult::Ongoing),
            "0" => Some(MatchResult::FirstPlayerWon),
            "1" => Some(MatchResult::SecondPlayerWon),
            "x" | "X" => Some(MatchResult::Draw),
            _ => None,
        }
    }

    pub fn is_finished(self) -> bool {
        self != MatchResult::Ongoing
    }

    pub fn winner(self) -> Option<Cell> {
        match self {
            MatchResult::FirstPlayerWon => Some(Cell::FirstPlayer),
            MatchResult::SecondPlayerWon => Some(Cell::SecondPlayer),
            MatchResult::Ongoing | MatchResult::Draw => None,
        }
    }
}

pub fn has_won(board: &Board, symbol: Cell) -> bool {
    let cells = board.cells();
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&index| cells[index] == symbol))
}

/// 先检查 FirstPlayer，再检查 SecondPlayer。
pub fn winner(board: &Board) -> Option<Cell> {
    [Cell::FirstPlayer, Cell::SecondPlayer]
        .into_iter()
        .find(|&symbol| has_won(board, symbol))
}

pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|cell| !cell.is_empty())
}

pub fn is_terminal(board: &Board) -> bool {
    winner(board).is_some() || is_full(board)
}

pub fn outcome(board: &Board) -> MatchResult {
    match winner(board) {
        Some(Cell::FirstPlayer) => MatchResult::FirstPlayerWon,
        Some(Cell::SecondPlayer) => MatchResult::SecondPlayerWon,
        _ if is_full(board) => MatchResult::Draw,
        _ => MatchResult::Ongoing,
    }
}
