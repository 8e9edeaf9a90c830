//! Deterministic ownership classification of a settled position.

use crate::Vertex;
use crate::chains::{chain_from, neighbors, region};
use crate::position::Board;
use crate::sign::{Stone, sign_of};

/// Unexplained vertices a territory hypothesis may leave before it is
/// rejected by [`floating_stones`]. Empirically tuned.
pub const FLOATING_HOLE_TOLERANCE: usize = 1;

/// Per-vertex owner in row-major order: `1` Black, `-1` White, `0` neutral.
///
/// Stones own their own vertex. An empty region belongs to the single color
/// bordering it, and is neutral when both colors (or none) border it.
pub fn area_map<B: Board>(board: &B) -> Vec<i8> {
    let mut ownership = vec![0i8; board.area()];
    let mut visited = vec![false; board.area()];

    for v in board.vertices() {
        let vi = board.index(v);
        if let Some(stone) = board.get(v) {
            ownership[vi] = stone.sign();
            continue;
        }
        if visited[vi] {
            continue;
        }

        let region = chain_from(board, v, &mut visited);

        let mut border: u8 = 0; // bit 0 = Black seen, bit 1 = White seen
        for &p in &region {
            for n in neighbors(board, p) {
                match board.get(n) {
                    Some(Stone::Black) => border |= 1,
                    Some(Stone::White) => border |= 2,
                    None => {}
                }
            }
        }

        let owner = match border {
            1 => 1,
            2 => -1,
            _ => 0,
        };
        for &p in &region {
            ownership[board.index(p)] = owner;
        }
    }

    ownership
}

/// Stones that look dead because they float inside the opponent's area.
///
/// Uses [`FLOATING_HOLE_TOLERANCE`]; see [`floating_stones_with`].
pub fn floating_stones<B: Board>(board: &B) -> Vec<Vertex> {
    floating_stones_with(board, FLOATING_HOLE_TOLERANCE)
}

/// For every empty region two hypotheses are compared: the area Black would
/// own if the White stones in it were dead, and vice versa. A hypothesis is
/// accepted when at most `tolerance` of its vertices, other than the stones
/// it kills, lie outside the other hypothesis, and it does not kill more
/// stones than the other. If exactly one is
/// accepted, the stones it kills are reported. Sorted, without duplicates.
pub fn floating_stones_with<B: Board>(board: &B, tolerance: usize) -> Vec<Vertex> {
    let area = board.area();
    let mut done = vec![false; area];
    let mut floating = vec![false; area];

    for v in board.vertices() {
        if board.get(v).is_some() || done[board.index(v)] {
            continue;
        }

        let pos_area = region(board, v, |c| c != Some(Stone::Black));
        let neg_area = region(board, v, |c| c != Some(Stone::White));

        let pos_dead = stones_of(board, &pos_area, Stone::White);
        let neg_dead = stones_of(board, &neg_area, Stone::Black);
        let pos_diff = unexplained(board, &pos_area, &neg_area, Stone::White);
        let neg_diff = unexplained(board, &neg_area, &pos_area, Stone::Black);

        let black_owns = pos_diff <= tolerance && pos_dead.len() <= neg_dead.len();
        let white_owns = neg_diff <= tolerance && neg_dead.len() <= pos_dead.len();

        let (settled, dead) = match (black_owns, white_owns) {
            (true, false) => (pos_area, pos_dead),
            (false, true) => (neg_area, neg_dead),
            _ => {
                let mut visited = vec![false; area];
                (chain_from(board, v, &mut visited), Vec::new())
            }
        };

        for p in settled {
            done[board.index(p)] = true;
        }
        for p in dead {
            floating[board.index(p)] = true;
        }
    }

    let mut result: Vec<Vertex> = board
        .vertices()
        .filter(|&v| floating[board.index(v)])
        .collect();
    result.sort_unstable();
    result
}

fn stones_of<B: Board>(board: &B, area: &[Vertex], stone: Stone) -> Vec<Vertex> {
    area.iter()
        .copied()
        .filter(|&p| board.get(p) == Some(stone))
        .collect()
}

/// Vertices of `area` that `other` does not contain, not counting the
/// `dead` stones the hypothesis already accounts for.
fn unexplained<B: Board>(board: &B, area: &[Vertex], other: &[Vertex], dead: Stone) -> usize {
    let mut in_other = vec![false; board.area()];
    for &p in other {
        in_other[board.index(p)] = true;
    }
    area.iter()
        .filter(|&&p| !in_other[board.index(p)] && board.get(p) != Some(dead))
        .count()
}

/// Sign of the owner recorded for `v` in a row-major map.
pub fn owner_at<B: Board>(board: &B, ownership: &[i8], v: Vertex) -> Option<Stone> {
    if !board.has(v) {
        return None;
    }
    Stone::from_sign(ownership[board.index(v)])
}

/// Convenience for displaying a map in the same diagram style as positions.
pub fn render_map<B: Board>(board: &B, ownership: &[i8]) -> String {
    let mut out = String::with_capacity(board.area() + board.height() as usize);
    for v in board.vertices() {
        if v.0 == 0 && v.1 > 0 {
            out.push('\n');
        }
        let owner = Stone::from_sign(ownership[board.index(v)]);
        out.push(match (owner, sign_of(board.get(v))) {
            (Some(Stone::Black), 0) => 'x',
            (Some(Stone::White), 0) => 'o',
            (Some(stone), _) => stone.letter(),
            (None, _) => '.',
        });
    }
    out
}
