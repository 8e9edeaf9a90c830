//! Connected components and liberties.
//!
//! Every traversal is an explicit work-list over a visited bitmap indexed by
//! [`Board::index`], so board size never affects stack depth.

use arrayvec::ArrayVec;

use crate::Vertex;
use crate::position::Board;
use crate::sign::Stone;

/// The up to four on-board orthogonal neighbors of `v`.
pub fn neighbors<B: Board>(board: &B, (x, y): Vertex) -> ArrayVec<Vertex, 4> {
    let mut result = ArrayVec::new();
    if !board.has((x, y)) {
        return result;
    }
    if x > 0 {
        result.push((x - 1, y));
    }
    if x + 1 < board.width() {
        result.push((x + 1, y));
    }
    if y > 0 {
        result.push((x, y - 1));
    }
    if y + 1 < board.height() {
        result.push((x, y + 1));
    }
    result
}

/// Flood fill over vertices with the same content as `v`.
///
/// For an empty `v` this is the maximal empty region around it.
pub fn chain<B: Board>(board: &B, v: Vertex) -> Vec<Vertex> {
    if !board.has(v) {
        return Vec::new();
    }
    let mut visited = vec![false; board.area()];
    chain_from(board, v, &mut visited)
}

/// Like [`chain`], sharing a visited bitmap across calls. Returns nothing if
/// `v` was already visited.
pub fn chain_from<B: Board>(board: &B, v: Vertex, visited: &mut [bool]) -> Vec<Vertex> {
    let content = board.get(v);
    region_from(board, v, visited, |c| c == content)
}

/// Flood fill from `v` through every vertex whose content satisfies `permeable`.
/// The seed itself is always included.
pub fn region<B, F>(board: &B, v: Vertex, permeable: F) -> Vec<Vertex>
where
    B: Board,
    F: Fn(Option<Stone>) -> bool,
{
    if !board.has(v) {
        return Vec::new();
    }
    let mut visited = vec![false; board.area()];
    region_from(board, v, &mut visited, permeable)
}

fn region_from<B, F>(board: &B, v: Vertex, visited: &mut [bool], permeable: F) -> Vec<Vertex>
where
    B: Board,
    F: Fn(Option<Stone>) -> bool,
{
    debug_assert_eq!(visited.len(), board.area());

    let mut result = Vec::new();
    let mut stack = vec![v];

    while let Some(p) = stack.pop() {
        let pi = board.index(p);
        if visited[pi] {
            continue;
        }
        visited[pi] = true;
        result.push(p);
        for n in neighbors(board, p) {
            if !visited[board.index(n)] && permeable(board.get(n)) {
                stack.push(n);
            }
        }
    }

    result
}

/// Distinct empty neighbors of a precomputed chain.
pub fn chain_liberties<B: Board>(board: &B, chain: &[Vertex]) -> Vec<Vertex> {
    let mut seen = vec![false; board.area()];
    let mut libs = Vec::new();
    for &p in chain {
        for n in neighbors(board, p) {
            let ni = board.index(n);
            if !seen[ni] && board.get(n).is_none() {
                seen[ni] = true;
                libs.push(n);
            }
        }
    }
    libs
}

/// Liberties of the chain containing `v`.
pub fn liberties<B: Board>(board: &B, v: Vertex) -> Vec<Vertex> {
    if board.get(v).is_none() {
        return Vec::new();
    }
    chain_liberties(board, &chain(board, v))
}

/// Whether the chain containing the stone at `v` has at least `n` liberties.
///
/// Stops as soon as the `n`-th distinct liberty is found, without walking the
/// rest of the chain. Empty or off-board `v` has no liberties.
pub fn has_at_least_n_liberties<B: Board>(board: &B, v: Vertex, n: usize) -> bool {
    if n == 0 {
        return true;
    }
    let Some(stone) = board.get(v) else {
        return false;
    };

    let mut visited = vec![false; board.area()];
    let mut found = 0;
    let mut stack = vec![v];
    visited[board.index(v)] = true;

    while let Some(p) = stack.pop() {
        for nb in neighbors(board, p) {
            let ni = board.index(nb);
            if visited[ni] {
                continue;
            }
            match board.get(nb) {
                None => {
                    visited[ni] = true;
                    found += 1;
                    if found >= n {
                        return true;
                    }
                }
                Some(s) if s == stone => {
                    visited[ni] = true;
                    stack.push(nb);
                }
                Some(_) => {}
            }
        }
    }

    false
}

/// Distinct chains of `stone` adjacent to `v`.
pub fn neighbor_chains<B: Board>(board: &B, v: Vertex, stone: Stone) -> Vec<Vec<Vertex>> {
    let mut chains = Vec::new();
    let mut visited = vec![false; board.area()];

    for n in neighbors(board, v) {
        if board.get(n) != Some(stone) || visited[board.index(n)] {
            continue;
        }
        chains.push(chain_from(board, n, &mut visited));
    }

    chains
}

/// Every chain of stones on the board, each listed once.
pub fn all_chains<B: Board>(board: &B) -> Vec<Vec<Vertex>> {
    let mut visited = vec![false; board.area()];
    let mut chains = Vec::new();

    for v in board.vertices() {
        if visited[board.index(v)] || board.get(v).is_none() {
            continue;
        }
        chains.push(chain_from(board, v, &mut visited));
    }

    chains
}
