use crate::Vertex;
use crate::chains::{chain_from, has_at_least_n_liberties, neighbors};
use crate::error::GoError;
use crate::position::Board;
use crate::sign::Stone;

/// Play `stone` at `v`, resolving captures before checking for suicide.
///
/// Returns the captured vertices on success. An off-board `v` is a pass and
/// changes nothing. On `Err` the board is left exactly as it was.
pub fn apply_move<B: Board>(board: &mut B, stone: Stone, v: Vertex) -> Result<Vec<Vertex>, GoError> {
    if !board.has(v) {
        return Ok(Vec::new());
    }

    if board.get(v).is_some() {
        return Err(GoError::Overwrite);
    }

    board.set(v, Some(stone));

    let opponent = stone.opp();
    let mut captured = Vec::new();
    let mut visited = vec![false; board.area()];
    for n in neighbors(board, v) {
        if board.get(n) != Some(opponent) || visited[board.index(n)] {
            continue;
        }
        if has_at_least_n_liberties(board, n, 1) {
            continue;
        }
        captured.extend(chain_from(board, n, &mut visited));
    }

    if captured.is_empty() && !has_at_least_n_liberties(board, v, 1) {
        board.set(v, None);
        return Err(GoError::Suicide);
    }

    for &p in &captured {
        board.set(p, None);
    }
    board.add_captures(stone, captured.len() as u32);

    Ok(captured)
}

/// Whether `stone` may play at `v`, checked on a scratch copy.
pub fn is_legal<B: Board>(board: &B, stone: Stone, v: Vertex) -> bool {
    let mut scratch = board.clone();
    apply_move(&mut scratch, stone, v).is_ok()
}
