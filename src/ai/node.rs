//! 搜索树节点。子节点由父节点独占，整棵树随根节点一起释放，不保留回指父节点的引用。

use crate::game::{Board, Cell};

#[derive(Debug, Clone)]
pub struct SearchNode {
    board: Board,
    depth: u8,
    producing_move: Option<usize>,
    maximizing: bool,
    value: i32,
    children: Vec<SearchNode>,
}

impl SearchNode {
    /// 根节点总是轮到极大方（SecondPlayer）走棋。
    pub fn root(board: Board) -> Self {
        Self {
            board,
            depth: 0,
            producing_move: None,
            maximizing: true,
            value: i32::MIN,
            children: Vec::new(),
        }
    }

    fn child(&self, board: Board, index: usize, placed: Cell) -> Self {
        let maximizing = placed == Cell::FirstPlayer;
        Self {
            board,
            depth: self.depth + 1,
            producing_move: Some(index),
            maximizing,
            value: if maximizing { i32::MIN } else { i32::MAX },
            children: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn producing_move(&self) -> Option<usize> {
        self.producing_move
    }

    pub fn is_maximizing(&self) -> bool {
        self.maximizing
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: i32) {
        self.value = value;
    }

    pub fn children(&self) -> &[SearchNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [SearchNode] {
        &mut self.children
    }

    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// 走棋方的棋子。
    pub fn side_to_move(&self) -> Cell {
        if self.maximizing {
            Cell::SecondPlayer
        } else {
            Cell::FirstPlayer
        }
    }

    /// 按行优先顺序为每个空格生成一个子节点，返回生成的数量。
    pub(crate) fn expand(&mut self) -> usize {
        let symbol = self.side_to_move();
        let board = self.board;
        let mut children = Vec::with_capacity(board.count(Cell::Empty));
        for index in board.empty_cells() {
            let mut cells = *board.cells();
            cells[index] = symbol;
            children.push(self.child(Board::from_cells(cells), index, symbol));
        }
        self.children = children;
        self.children.len()
    }

    /// 子树中的节点总数（包含自身）。
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(SearchNode::subtree_size)
            .sum::<usize>()
    }
}
