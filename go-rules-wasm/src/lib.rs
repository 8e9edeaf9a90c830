use std::collections::HashSet;

use go_rules::estimate::{classify_dead_stones, estimate_ownership};
use go_rules::ko::play_with_ko;
use go_rules::ownership::{area_map, floating_stones};
use go_rules::score::{format_result, score_with_dead, toggle_dead_chain};
use go_rules::{Board, EstimatorConfig, Position, Stone, Vertex};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Standard handicap points as JSON `[[x, y], ...]`.
#[wasm_bindgen]
pub fn handicap_points(size: u8, count: usize) -> String {
    serialize_vertices(go_rules::handicap::standard_points(size, count))
}

#[wasm_bindgen]
pub struct WasmPosition {
    inner: Position,
    previous: Option<Position>,
    turn: Stone,
}

#[derive(Serialize)]
struct ScoreReport {
    #[serde(flatten)]
    score: go_rules::Score,
    ownership: Vec<i8>,
    area_result: String,
    territory_result: String,
}

#[wasm_bindgen]
impl WasmPosition {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            inner: Position::with_dimensions(width, height),
            previous: None,
            turn: Stone::Black,
        }
    }

    /// Load an ASCII diagram. Returns `None` on a malformed layout.
    pub fn from_layout(layout: &str) -> Option<WasmPosition> {
        let inner = Position::from_layout(layout).ok()?;
        Some(Self {
            inner,
            previous: None,
            turn: Stone::Black,
        })
    }

    pub fn set_handicap(&mut self, count: usize) -> usize {
        let placed = go_rules::handicap::place_handicap(&mut self.inner, count);
        if !placed.is_empty() {
            self.turn = Stone::White;
        }
        placed.len()
    }

    // -- Moves --

    pub fn try_play(&mut self, x: u8, y: u8) -> bool {
        match play_with_ko(self.previous.as_ref(), &self.inner, self.turn, (x, y)) {
            Ok((next, _)) => {
                self.previous = Some(std::mem::replace(&mut self.inner, next));
                self.turn = self.turn.opp();
                true
            }
            Err(_) => false,
        }
    }

    pub fn pass(&mut self) {
        self.previous = Some(self.inner.clone());
        self.turn = self.turn.opp();
    }

    pub fn is_legal(&self, x: u8, y: u8) -> bool {
        play_with_ko(self.previous.as_ref(), &self.inner, self.turn, (x, y)).is_ok()
    }

    // -- Accessors --

    pub fn board(&self) -> js_sys::Int8Array {
        js_sys::Int8Array::from(self.inner.board())
    }

    pub fn width(&self) -> u8 {
        self.inner.width()
    }

    pub fn height(&self) -> u8 {
        self.inner.height()
    }

    pub fn current_turn_stone(&self) -> i8 {
        self.turn.sign()
    }

    pub fn captures_black(&self) -> u32 {
        self.inner.captures().black
    }

    pub fn captures_white(&self) -> u32 {
        self.inner.captures().white
    }

    /// Decimal string; a `u64` does not fit a JS number.
    pub fn content_hash(&self) -> String {
        self.inner.content_hash().to_string()
    }

    // -- Analysis --

    pub fn area_map(&self) -> js_sys::Int8Array {
        js_sys::Int8Array::from(area_map(&self.inner).as_slice())
    }

    pub fn floating_stones(&self) -> String {
        serialize_vertices(floating_stones(&self.inner))
    }

    /// Row-major Black-ownership probabilities.
    /// `config_json` holds [`EstimatorConfig`] fields; missing ones use defaults.
    pub fn estimate_ownership(&self, config_json: &str) -> js_sys::Float64Array {
        let config = parse_config(config_json);
        let map = estimate_ownership(&self.inner, &config);
        js_sys::Float64Array::from(map.values())
    }

    pub fn classify_dead_stones(&self, config_json: &str) -> String {
        let config = parse_config(config_json);
        serialize_vertices(classify_dead_stones(&self.inner, &config))
    }

    /// Toggle the chain at (x, y) in or out of the dead set.
    /// Takes and returns JSON arrays of `[x, y]` pairs.
    pub fn toggle_dead_chain(&self, x: u8, y: u8, dead_json: &str) -> String {
        let mut dead = parse_vertices(dead_json);
        toggle_dead_chain(&self.inner, &mut dead, (x, y));
        serialize_vertices(dead)
    }

    /// Score with the given dead stones removed, as JSON.
    pub fn score(&self, dead_json: &str, komi: f64, handicap: u32) -> String {
        let dead = parse_vertices(dead_json);
        let (ownership, score) = score_with_dead(&self.inner, &dead);
        let report = ScoreReport {
            score,
            ownership,
            area_result: format_result(score.area_result(komi, handicap)),
            territory_result: format_result(score.territory_result(komi)),
        };
        serde_json::to_string(&report).unwrap_or_else(|_| "{}".into())
    }
}

// The thread rng is not available in the browser, so every run gets a seed.
fn parse_config(json: &str) -> EstimatorConfig {
    let mut config: EstimatorConfig = serde_json::from_str(json).unwrap_or_default();
    if config.seed.is_none() {
        config.seed = Some((js_sys::Math::random() * u64::MAX as f64) as u64);
    }
    config
}

fn parse_vertices(json: &str) -> HashSet<Vertex> {
    serde_json::from_str::<Vec<[u8; 2]>>(json)
        .unwrap_or_default()
        .into_iter()
        .map(|[x, y]| (x, y))
        .collect()
}

fn serialize_vertices(vertices: impl IntoIterator<Item = Vertex>) -> String {
    let mut pts: Vec<[u8; 2]> = vertices.into_iter().map(|(x, y)| [x, y]).collect();
    pts.sort_unstable();
    serde_json::to_string(&pts).unwrap_or_else(|_| "[]".into())
}
