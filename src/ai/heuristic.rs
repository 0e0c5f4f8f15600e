use crate::game::{Board, Cell, WINNING_LINES};

fn open_lines(board: &Board, blocker: Cell) -> i32 {
    let cells = board.cells();
    WINNING_LINES
        .iter()
        .filter(|line| line.iter().all(|&index| cells[index] != blocker))
        .count() as i32
}

/// 非终局局面的静态估值：不含 X 的线数减去不含 O 的线数，正值对极大方有利。
pub fn evaluate(board: &Board) -> i32 {
    open_lines(board, Cell::SecondPlayer) - open_lines(board, Cell::FirstPlayer)
}
