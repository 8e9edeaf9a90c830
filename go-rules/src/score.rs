use std::collections::HashSet;

use serde::Serialize;

use crate::Vertex;
use crate::chains::chain;
use crate::ownership::area_map;
use crate::position::Board;
use crate::sign::Stone;

/// Raw counts for both colors. Komi and handicap are left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Score {
    pub area_black: u32,
    pub area_white: u32,
    pub territory_black: u32,
    pub territory_white: u32,
    pub captures_black: u32,
    pub captures_white: u32,
}

impl Score {
    /// Black's lead under area counting; White receives komi plus one point
    /// per handicap stone.
    pub fn area_result(&self, komi: f64, handicap: u32) -> f64 {
        self.area_black as f64 - self.area_white as f64 - komi - handicap as f64
    }

    /// Black's lead under territory counting: territory plus prisoners.
    pub fn territory_result(&self, komi: f64) -> f64 {
        let black = self.territory_black + self.captures_black;
        let white = self.territory_white + self.captures_white;
        black as f64 - white as f64 - komi
    }
}

/// Count area and territory from an ownership map.
///
/// Every labelled vertex is area for its owner; labelled empty vertices are
/// also territory.
pub fn score<B: Board>(board: &B, ownership: &[i8]) -> Score {
    debug_assert_eq!(ownership.len(), board.area());

    let captures = board.captures();
    let mut score = Score {
        captures_black: captures.black,
        captures_white: captures.white,
        ..Score::default()
    };

    for v in board.vertices() {
        let empty = board.get(v).is_none();
        match Stone::from_sign(ownership[board.index(v)]) {
            Some(Stone::Black) => {
                score.area_black += 1;
                score.territory_black += empty as u32;
            }
            Some(Stone::White) => {
                score.area_white += 1;
                score.territory_white += empty as u32;
            }
            None => {}
        }
    }

    score
}

/// A copy of `board` without the dead stones, each credited as a capture to
/// the opposite color.
pub fn remove_dead_stones<B: Board>(board: &B, dead: &HashSet<Vertex>) -> B {
    let mut result = board.clone();
    for &v in dead {
        if let Some(stone) = board.get(v) {
            result.set(v, None);
            result.add_captures(stone.opp(), 1);
        }
    }
    result
}

/// Score after removing `dead`, with ownership from [`area_map`].
pub fn score_with_dead<B: Board>(board: &B, dead: &HashSet<Vertex>) -> (Vec<i8>, Score) {
    let settled = remove_dead_stones(board, dead);
    let ownership = area_map(&settled);
    let score = score(&settled, &ownership);
    (ownership, score)
}

/// Toggle every stone of the chain at `v` in or out of `dead`.
///
/// If any stone of the chain is currently dead the whole chain comes back to
/// life, otherwise the whole chain is marked dead. No-op on an empty vertex.
pub fn toggle_dead_chain<B: Board>(board: &B, dead: &mut HashSet<Vertex>, v: Vertex) {
    if board.get(v).is_none() {
        return;
    }

    let stones = chain(board, v);
    if stones.iter().any(|p| dead.contains(p)) {
        for p in &stones {
            dead.remove(p);
        }
    } else {
        dead.extend(stones);
    }
}

/// "B+{diff}", "W+{diff}" or "Draw" for Black's lead `diff`.
pub fn format_result(diff: f64) -> String {
    if diff > 0.0 {
        format!("B+{diff}")
    } else if diff < 0.0 {
        format!("W+{}", -diff)
    } else {
        "Draw".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn layout(text: &str) -> Position {
        Position::from_layout(text).unwrap()
    }

    #[test]
    fn counts_area_and_territory() {
        let position = layout(
            "
            .X.O.
            .X.O.
            ",
        );
        let score = score(&position, &area_map(&position));
        assert_eq!(score.area_black, 4);
        assert_eq!(score.territory_black, 2);
        assert_eq!(score.area_white, 4);
        assert_eq!(score.territory_white, 2);
    }

    #[test]
    fn labels_partition_the_board() {
        let position = layout(
            "
            .XO..
            XXOO.
            ..XO.
            ",
        );
        let ownership = area_map(&position);
        let neutral = ownership.iter().filter(|&&o| o == 0).count() as u32;
        let score = score(&position, &ownership);
        assert_eq!(score.area_black + score.area_white + neutral, 15);
    }

    #[test]
    fn copies_capture_counters() {
        let mut position = layout("X.O");
        position.add_captures(Stone::Black, 2);
        position.add_captures(Stone::White, 5);
        let score = score(&position, &area_map(&position));
        assert_eq!(score.captures_black, 2);
        assert_eq!(score.captures_white, 5);
    }

    #[test]
    fn dead_stones_become_prisoners_and_territory() {
        let position = layout(
            "
            XXX
            XOX
            XXX
            ",
        );
        let dead = HashSet::from([(1, 1)]);
        let (ownership, score) = score_with_dead(&position, &dead);
        assert_eq!(ownership[4], 1);
        assert_eq!(score.territory_black, 1);
        assert_eq!(score.captures_black, 1);
        assert_eq!(score.area_black, 9);
        assert_eq!(score.area_white, 0);
    }

    #[test]
    fn live_stone_is_not_territory() {
        let position = layout(
            "
            XXX
            XOX
            XXX
            ",
        );
        let (ownership, score) = score_with_dead(&position, &HashSet::new());
        assert_eq!(ownership[4], -1);
        assert_eq!(score.territory_black, 0);
        assert_eq!(score.area_white, 1);
    }

    #[test]
    fn results_apply_komi_and_handicap() {
        let score = Score {
            area_black: 45,
            area_white: 36,
            territory_black: 20,
            territory_white: 15,
            captures_black: 3,
            captures_white: 1,
        };
        assert_eq!(score.area_result(6.5, 0), 2.5);
        assert_eq!(score.area_result(0.5, 2), 6.5);
        assert_eq!(score.territory_result(6.5), 0.5);
        assert_eq!(format_result(score.territory_result(7.5)), "W+0.5");
    }

    #[test]
    fn format_result_variants() {
        assert_eq!(format_result(3.5), "B+3.5");
        assert_eq!(format_result(-12.0), "W+12");
        assert_eq!(format_result(0.0), "Draw");
    }

    #[test]
    fn toggle_marks_whole_chain() {
        let position = layout(
            "
            .OO.
            ..O.
            ",
        );
        let mut dead = HashSet::new();
        toggle_dead_chain(&position, &mut dead, (2, 1));
        assert_eq!(dead, HashSet::from([(1, 0), (2, 0), (2, 1)]));

        toggle_dead_chain(&position, &mut dead, (1, 0));
        assert!(dead.is_empty());
    }

    #[test]
    fn toggle_revives_partially_marked_chain() {
        let position = layout("XX.");
        let mut dead = HashSet::from([(0, 0)]);
        toggle_dead_chain(&position, &mut dead, (1, 0));
        assert!(dead.is_empty());
    }

    #[test]
    fn toggle_on_empty_is_noop() {
        let position = layout("X..");
        let mut dead = HashSet::new();
        toggle_dead_chain(&position, &mut dead, (2, 0));
        assert!(dead.is_empty());
    }
}
