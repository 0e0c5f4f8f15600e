use serde::{Deserialize, Serialize};
use tracing::debug;

use super::heuristic;
use super::node::SearchNode;
use crate::config::AiMode;
use crate::error::{EngineError, EngineResult};
use crate::game::{rules, Board, Cell, CELL_COUNT};

/// 最大搜索深度。9 层即可搜到终局。
pub const MAX_DEPTH: u8 = CELL_COUNT as u8;

const WIN_SCORE: i32 = 15;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiDecision {
    pub next_move: usize,
    pub evaluation: i32,
    pub depth: u8,
    pub nodes: u64,
}

struct SearchStats {
    nodes: u64,
}

impl SearchStats {
    fn new() -> Self {
        Self { nodes: 0 }
    }
}

/// 带 alpha-beta 剪枝的深度受限 minimax。AI 固定为 SecondPlayer（极大方）。
#[derive(Debug, Clone, Copy)]
pub struct AiAgent {
    max_depth: u8,
}

impl AiAgent {
    pub fn new(max_depth: u8) -> EngineResult<Self> {
        if !(1..=MAX_DEPTH).contains(&max_depth) {
            return Err(EngineError::invalid_input(format!(
                "search depth must be within 1..={MAX_DEPTH}, got {max_depth}"
            )));
        }
        Ok(Self { max_depth })
    }

    pub fn from_mode(mode: AiMode) -> EngineResult<Self> {
        let depth = mode.search_depth().ok_or(EngineError::RemoteMoveSource)?;
        Self::new(depth)
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    pub fn decide(&self, board: &Board) -> EngineResult<AiDecision> {
        let mut stats = SearchStats::new();
        let root = self.search_tree(board, &mut stats)?;

        let (next_move, evaluation) = select_move(&root).ok_or_else(|| {
            EngineError::illegal_state(format!("no legal move in position '{board}'"))
        })?;

        debug!(
            position = %board,
            depth = self.max_depth,
            nodes = stats.nodes,
            next_move,
            evaluation,
            "alpha-beta search finished"
        );

        Ok(AiDecision {
            next_move,
            evaluation,
            depth: self.max_depth,
            nodes: stats.nodes,
        })
    }

    fn search_tree(&self, board: &Board, stats: &mut SearchStats) -> EngineResult<SearchNode> {
        if rules::is_terminal(board) {
            return Err(EngineError::illegal_state(format!(
                "position '{board}' is already finished"
            )));
        }

        let mut root = SearchNode::root(*board);
        alpha_beta(&mut root, self.max_depth, i32::MIN, i32::MAX, stats);
        Ok(root)
    }
}

/// 解析局面并返回 AI 的落子位置。
pub fn next_move(serialized: &str, max_depth: u8) -> EngineResult<usize> {
    let board = Board::deserialize(serialized)?;
    let agent = AiAgent::new(max_depth)?;
    agent.decide(&board).map(|decision| decision.next_move)
}

fn alpha_beta(
    node: &mut SearchNode,
    depth_remaining: u8,
    mut alpha: i32,
    mut beta: i32,
    stats: &mut SearchStats,
) -> i32 {
    stats.nodes += 1;

    if depth_remaining == 0 || rules::is_terminal(node.board()) {
        let value = leaf_value(node);
        node.set_value(value);
        return value;
    }

    node.expand();
    let maximizing = node.is_maximizing();
    let mut value = if maximizing { i32::MIN } else { i32::MAX };

    for child in node.children_mut() {
        let score = alpha_beta(child, depth_remaining - 1, alpha, beta, stats);
        if maximizing {
            value = value.max(score);
            if value > beta {
                break;
            }
            alpha = alpha.max(value);
        } else {
            value = value.min(score);
            if value < alpha {
                break;
            }
            beta = beta.min(value);
        }
    }

    node.set_value(value);
    value
}

/// 越早获胜分数越高，越晚失败分数越高。
fn leaf_value(node: &SearchNode) -> i32 {
    let depth = i32::from(node.depth());
    match rules::winner(node.board()) {
        Some(Cell::SecondPlayer) => WIN_SCORE - depth,
        Some(Cell::FirstPlayer) => depth - WIN_SCORE,
        _ if rules::is_full(node.board()) => 0,
        _ => heuristic::evaluate(node.board()),
    }
}

/// 同分时保留生成顺序中的第一个。
fn select_move(root: &SearchNode) -> Option<(usize, i32)> {
    let mut best: Option<(usize, i32)> = None;
    for child in root.children() {
        let Some(index) = child.producing_move() else {
            continue;
        };
        match best {
            Some((_, best_value)) if child.value() <= best_value => {}
            _ => best = Some((index, child.value())),
        }
    }
    best
}
