//! AI 算法模块：alpha-beta 剪枝的 minimax 搜索与静态估值。

pub mod heuristic;
pub mod minimax;
pub mod node;

pub use minimax::{next_move, AiAgent, AiDecision, MAX_DEPTH};
pub use node::SearchNode;
