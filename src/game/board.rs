use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub const CELL_COUNT: usize = 9;

/// 棋盘格子的三种状态。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// 先手方 "O"，人类玩家，极小方。
    FirstPlayer,
    /// 后手方 "X"，AI，极大方。
    SecondPlayer,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '_',
            Cell::FirstPlayer => '0',
            Cell::SecondPlayer => '1',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '_' => Some(Cell::Empty),
            '0' => Some(Cell::FirstPlayer),
            '1' => Some(Cell::SecondPlayer),
            _ => None,
        }
    }

    /// Empty 没有对手，原样返回。
    pub fn opponent(self) -> Cell {
        match self {
            Cell::Empty => Cell::Empty,
            Cell::FirstPlayer => Cell::SecondPlayer,
            Cell::SecondPlayer => Cell::FirstPlayer,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// 3x3 局面，按行优先存储（index = row * 3 + col）。创建后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn deserialize(text: &str) -> EngineResult<Self> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() != CELL_COUNT {
            return Err(EngineError::invalid_input(format!(
                "expected {CELL_COUNT} cells, got {} in '{text}'",
                chars.len()
            )));
        }

        let mut cells = [Cell::Empty; CELL_COUNT];
        for (position, (slot, c)) in cells.iter_mut().zip(chars).enumerate() {
            *slot = Cell::from_char(c).ok_or_else(|| {
                EngineError::invalid_input(format!(
                    "unknown character '{c}' at position {position} in '{text}'"
                ))
            })?;
        }
        Ok(Self { cells })
    }

    pub fn serialize(&self) -> String {
        self.cells.iter().map(|cell| cell.to_char()).collect()
    }

    /// 返回落子后的新局面，原局面保持不变。
    pub fn place(&self, index: usize, symbol: Cell) -> EngineResult<Board> {
        if symbol.is_empty() {
            return Err(EngineError::illegal_move(index, "cannot place an empty symbol"));
        }
        let Some(current) = self.cells.get(index) else {
            return Err(EngineError::illegal_move(
                index,
                format!("index out of range 0..{CELL_COUNT}"),
            ));
        };
        if !current.is_empty() {
            return Err(EngineError::illegal_move(index, "cell is already occupied"));
        }

        let mut next = *self;
        next.cells[index] = symbol;
        Ok(next)
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// 行优先顺序的空格下标，决定了搜索时子节点的生成顺序。
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(index, _)| index)
    }

    pub fn count(&self, symbol: Cell) -> usize {
        self.cells.iter().filter(|&&cell| cell == symbol).count()
    }

    pub fn swapped(&self) -> Board {
        let mut cells = self.cells;
        for cell in &mut cells {
            *cell = cell.opponent();
        }
        Board { cells }
    }
}

impl FromStr for Board {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::deserialize(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl TryFrom<String> for Board {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Board::deserialize(&value)
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.serialize()
    }
}
