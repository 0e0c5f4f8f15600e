pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod remote;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{next_move, AiAgent, AiDecision, SearchNode, MAX_DEPTH};
pub use config::{AiMode, FirstMove, MatchConfig, MatchMode, RemoteConfig};
pub use error::{EngineError, EngineResult};
pub use game::{
    Board, Cell, Match, MatchEvent, MatchResult, MoveRequest, TurnResolution, CELL_COUNT,
};

#[cfg(all(feature = "wee_alloc", target_arch = "wasm32"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

fn to_js_error(error: EngineError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn console_log(message: &str) {
    web_sys::console::log_1(&message.into());
}

fn parse_mode(mode: Option<&str>) -> AiMode {
    mode.and_then(|value| AiMode::from_str(value).ok())
        .unwrap_or_default()
}

/// JS 数字按 i32 传入，超出 u8 范围时直接拒绝，避免截断。
fn depth_from_js(max_depth: i32) -> EngineResult<u8> {
    u8::try_from(max_depth).map_err(|_| {
        EngineError::invalid_input(format!("search depth {max_depth} is out of range"))
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(serde_to_js_error)
}

#[derive(Serialize)]
struct AiMoveResponse {
    decision: AiDecision,
    applied: TurnResolution,
}

/// 前端持有的对局句柄，取代全局单例。
#[wasm_bindgen]
pub struct GameSession {
    game: Match,
}

#[wasm_bindgen]
impl GameSession {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<GameSession, JsValue> {
        let config = match config_json {
            Some(json) => MatchConfig::from_json(&json).map_err(to_js_error)?,
            None => MatchConfig::default(),
        };
        Ok(GameSession {
            game: Match::new(config),
        })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(&self.game)
    }

    pub fn board(&self) -> String {
        self.game.board().serialize()
    }

    pub fn result(&self) -> String {
        self.game.result().code().to_string()
    }

    pub fn is_ai_turn(&self) -> bool {
        self.game.is_ai_turn()
    }

    pub fn place_mark(&mut self, index: usize) -> Result<String, JsValue> {
        let resolution = self.game.player_place(index).map_err(to_js_error)?;
        to_json(&resolution)
    }

    pub fn ai_move_request(&self) -> Result<JsValue, JsValue> {
        let request = self.game.ai_move_request().map_err(to_js_error)?;
        to_value(&request).map_err(JsValue::from)
    }

    pub fn play_ai_move(&mut self) -> Result<String, JsValue> {
        let (decision, applied) = self.game.play_ai_move().map_err(to_js_error)?;
        console_log(&format!(
            "AI 落子 {}（评估 {}，搜索节点 {}）",
            decision.next_move, decision.evaluation, decision.nodes
        ));
        to_json(&AiMoveResponse { decision, applied })
    }

    pub fn apply_ai_move(&mut self, index: usize) -> Result<String, JsValue> {
        let resolution = self.game.apply_ai_move(index).map_err(to_js_error)?;
        to_json(&resolution)
    }

    /// 传入远程 nextmove 接口的原始响应。
    pub fn apply_remote_move(&mut self, response_json: &str) -> Result<String, JsValue> {
        let index = remote::parse_next_move(response_json).map_err(to_js_error)?;
        self.apply_ai_move(index)
    }

    /// 传入远程 result 接口的原始响应，返回结果编码。
    pub fn verify_remote_result(&self, response_json: &str) -> Result<String, JsValue> {
        let remote_result = remote::parse_victory(response_json).map_err(to_js_error)?;
        let result = self
            .game
            .verify_remote_result(remote_result)
            .map_err(to_js_error)?;
        Ok(result.code().to_string())
    }

    pub fn check_victory_url(&self) -> String {
        self.game.config().remote.check_victory_url(self.game.board())
    }

    pub fn auth_token(&self) -> String {
        self.game.config().remote.auth_token.clone()
    }

    /// 远程请求超过该秒数时，前端显示等待提示。
    pub fn long_request_secs(&self) -> f32 {
        self.game.config().remote.long_request_secs
    }

    pub fn restart(&mut self) {
        self.game.restart();
    }

    /// 延迟后在当前局面上搜索，只返回决策，不落子。
    pub fn think_ai(&self, delay_ms: Option<u32>) -> Promise {
        let board = *self.game.board();
        let mode = self.game.config().ai_mode;
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let agent = AiAgent::from_mode(mode).map_err(to_js_error)?;
            let decision = agent.decide(&board).map_err(to_js_error)?;
            let json = to_json(&decision)?;
            Ok(JsValue::from_str(&json))
        })
    }
}

#[wasm_bindgen(js_name = "getNextMove")]
pub fn get_next_move(field: &str, max_depth: i32) -> Result<usize, JsValue> {
    let depth = depth_from_js(max_depth).map_err(to_js_error)?;
    next_move(field, depth).map_err(to_js_error)
}

/// 返回结果编码：'_' 未结束，'0' / '1' 对应获胜方，'x' 平局。
#[wasm_bindgen(js_name = "checkVictory")]
pub fn check_victory(field: &str) -> Result<String, JsValue> {
    let board = Board::deserialize(field).map_err(to_js_error)?;
    Ok(game::outcome(&board).code().to_string())
}

#[wasm_bindgen(js_name = "evaluatePosition")]
pub fn evaluate_position(field: &str) -> Result<i32, JsValue> {
    let board = Board::deserialize(field).map_err(to_js_error)?;
    Ok(ai::heuristic::evaluate(&board))
}

#[wasm_bindgen(js_name = "computeAiMove")]
pub fn compute_ai_move(field: &str, mode: Option<String>) -> Result<JsValue, JsValue> {
    let board = Board::deserialize(field).map_err(to_js_error)?;
    let agent = AiAgent::from_mode(parse_mode(mode.as_deref())).map_err(to_js_error)?;
    let decision = agent.decide(&board).map_err(to_js_error)?;
    to_value(&decision).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "authHeader")]
pub fn auth_header() -> String {
    remote::AUTH_HEADER.to_string()
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
