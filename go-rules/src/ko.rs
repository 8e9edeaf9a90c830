//! Single-step repetition check. Only the immediately preceding position is
//! compared, which is enough to forbid a simple ko retake.

use crate::Vertex;
use crate::error::GoError;
use crate::position::{Board, Position};
use crate::rules::apply_move;
use crate::sign::Stone;

/// Whether `candidate` has the same stones as `previous`.
pub fn is_immediate_repeat(previous: &Position, candidate: &Position) -> bool {
    previous.content_hash() == candidate.content_hash()
        && previous.width() == candidate.width()
        && previous.board() == candidate.board()
}

/// Play `stone` at `v` on a copy of `board`.
///
/// The move is refused with [`GoError::KoViolation`] when the result would
/// recreate `previous`, the position before the opponent's last move.
pub fn play_with_ko(
    previous: Option<&Position>,
    board: &Position,
    stone: Stone,
    v: Vertex,
) -> Result<(Position, Vec<Vertex>), GoError> {
    let mut next = board.clone();
    let captured = apply_move(&mut next, stone, v)?;

    if let Some(previous) = previous {
        if !captured.is_empty() && is_immediate_repeat(previous, &next) {
            return Err(GoError::KoViolation);
        }
    }

    Ok((next, captured))
}
