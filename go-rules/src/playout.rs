//! Random playouts to quiescence.

use rand::{Rng, RngExt};

use crate::Vertex;
use crate::chains::{has_at_least_n_liberties, neighbors};
use crate::position::Board;
use crate::rules::apply_move;
use crate::sign::Stone;

/// Alternations a playout gets unless the caller says otherwise.
pub fn default_iterations<B: Board>(board: &B) -> usize {
    board.area()
}

/// Play random moves on a copy of `board`, alternating colors from
/// `starting`, until neither color can move, no candidate is left, or
/// `max_iterations` alternations have been played. Single-point holes are
/// filled afterwards (see [`fix_holes`]).
///
/// Every stone is placed through [`apply_move`]; the random source only
/// decides the order in which candidates are tried.
pub fn play_to_quiescence<B, R>(board: &B, starting: Stone, max_iterations: usize, rng: &mut R) -> B
where
    B: Board,
    R: Rng + ?Sized,
{
    let mut board = board.clone();
    let mut work: Vec<Vertex> = board.vertices().filter(|&v| board.get(v).is_none()).collect();
    let mut set_aside: Vec<Vertex> = Vec::new();
    let mut finished = [false; 2];
    let mut stone = starting;
    let mut iterations = 0;

    while iterations < max_iterations && !work.is_empty() && !(finished[0] && finished[1]) {
        let mut moved = false;

        while !work.is_empty() {
            let v = work.swap_remove(rng.random_range(0..work.len()));
            if board.get(v).is_some() {
                continue;
            }
            match playout_move(&mut board, stone, v) {
                Some(captured) => {
                    work.extend(captured);
                    moved = true;
                    break;
                }
                None => set_aside.push(v),
            }
        }

        work.append(&mut set_aside);
        finished[stone.index()] = !moved;
        stone = stone.opp();
        iterations += 1;
    }

    tracing::trace!(
        iterations,
        remaining = work.len(),
        "playout reached quiescence"
    );

    fix_holes(&mut board);
    board
}

/// A legal move that random play is also willing to make.
///
/// Refuses to fill a vertex surrounded only by the mover's own stones, and
/// refuses to retake a single stone with a lone stone dropped into the
/// opponent's shape, so playouts cannot cycle through a ko.
fn playout_move<B: Board>(board: &mut B, stone: Stone, v: Vertex) -> Option<Vec<Vertex>> {
    let adjacent = neighbors(board, v);

    if adjacent.iter().all(|&n| board.get(n) == Some(stone)) {
        return None;
    }

    let opponent = stone.opp();
    if adjacent.iter().all(|&n| board.get(n) == Some(opponent)) {
        // every adjacent chain has `v` as a liberty, so fewer than two means atari
        let mut in_atari = adjacent
            .iter()
            .copied()
            .filter(|&n| !has_at_least_n_liberties(board, n, 2));
        if let (Some(n), None) = (in_atari.next(), in_atari.next()) {
            let lone = neighbors(board, n)
                .iter()
                .all(|&m| board.get(m) != Some(opponent));
            if lone {
                return None;
            }
        }
    }

    apply_move(board, stone, v).ok()
}

/// Fill every empty vertex whose on-board neighbors all hold the same color.
pub fn fix_holes<B: Board>(board: &mut B) {
    for i in 0..board.area() {
        let v = board.vertex(i);
        if board.get(v).is_some() {
            continue;
        }
        let adjacent = neighbors(board, v);
        let Some(owner) = adjacent.first().and_then(|&n| board.get(n)) else {
            continue;
        };
        if adjacent.iter().all(|&n| board.get(n) == Some(owner)) {
            board.set(v, Some(owner));
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::position::Position;

    fn layout(text: &str) -> Position {
        Position::from_layout(text).unwrap()
    }

    #[test]
    fn refuses_to_fill_own_eye() {
        let mut position = layout(
            "
            .X.
            XX.
            ...
            ",
        );
        assert_eq!(playout_move(&mut position, Stone::Black, (0, 0)), None);
        assert_eq!(position.get((0, 0)), None);
        // the opponent may not play there either: it is suicide
        assert_eq!(playout_move(&mut position, Stone::White, (0, 0)), None);
    }

    #[test]
    fn refuses_ko_retake() {
        let mut position = layout(
            "
            .XO.
            XO.O
            .XO.
            ",
        );
        // Black at (2,1) takes the white stone at (1,1): a ko shape
        assert_eq!(playout_move(&mut position, Stone::Black, (2, 1)), None);
        assert_eq!(position.get((1, 1)), Some(Stone::White));
        assert_eq!(position.captures().black, 0);
    }

    #[test]
    fn allows_ordinary_capture() {
        let mut position = layout(
            "
            XO..
            ....
            ",
        );
        let captured = playout_move(&mut position, Stone::White, (0, 1)).unwrap();
        assert_eq!(captured, vec![(0, 0)]);
    }

    #[test]
    fn fix_holes_fills_single_point_eyes_only() {
        let mut position = layout(
            "
            .X..O
            XX.OO
            ",
        );
        fix_holes(&mut position);
        assert_eq!(position.get((0, 0)), Some(Stone::Black));
        assert_eq!(position.get((2, 0)), None);
        assert_eq!(position.get((3, 0)), None);
        assert_eq!(position.get((2, 1)), None);
    }

    #[test]
    fn never_mutates_input() {
        let position = layout(
            "
            ..X..
            .XOX.
            ..X..
            ",
        );
        let before = position.clone();
        let mut rng = StdRng::seed_from_u64(7);
        let _ = play_to_quiescence(&position, Stone::White, 100, &mut rng);
        assert_eq!(position, before);
    }

    #[test]
    fn zero_iterations_only_fixes_holes() {
        let position = layout(
            "
            .X...
            X....
            ",
        );
        let mut rng = StdRng::seed_from_u64(1);
        let result = play_to_quiescence(&position, Stone::Black, 0, &mut rng);
        assert_eq!(result.stone_count(), 3);
        assert_eq!(result.get((0, 0)), Some(Stone::Black));
    }

    #[test]
    fn fills_an_empty_board() {
        let position = Position::with_dimensions(7, 7);
        let mut rng = StdRng::seed_from_u64(42);
        let result = play_to_quiescence(&position, Stone::Black, 10_000, &mut rng);
        assert!(result.stone_count() > 30, "only {} stones placed", result.stone_count());
    }

    #[test]
    fn same_seed_same_playout() {
        let position = Position::with_dimensions(6, 6);
        let a = play_to_quiescence(&position, Stone::Black, 36, &mut StdRng::seed_from_u64(3));
        let b = play_to_quiescence(&position, Stone::Black, 36, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn preserves_two_eyed_group() {
        let position = layout(
            "
            .X.X....
            XXXX....
            ........
            ",
        );
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = play_to_quiescence(&position, Stone::White, 1_000, &mut rng);
            for v in [(0, 1), (1, 1), (2, 1), (3, 1), (1, 0), (3, 0)] {
                assert_eq!(result.get(v), Some(Stone::Black), "seed {seed}: {v:?} lost");
            }
        }
    }
}
