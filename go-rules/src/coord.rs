//! GTP-style vertex names such as `D4`, with rows counted from the bottom.

use crate::error::GoError;
use crate::{PASS, Vertex};

// 'I' is skipped because it reads too much like "1".
const COLUMN_LETTERS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

fn column_name(x: u8) -> String {
    let n = COLUMN_LETTERS.len();
    let x = x as usize;
    if x < n {
        (COLUMN_LETTERS[x] as char).to_string()
    } else {
        let hi = COLUMN_LETTERS[x / n - 1] as char;
        let lo = COLUMN_LETTERS[x % n] as char;
        format!("{hi}{lo}")
    }
}

fn column_index(name: &[u8]) -> Option<usize> {
    let letter = |c: u8| {
        COLUMN_LETTERS
            .iter()
            .position(|&cand| cand == c.to_ascii_uppercase())
    };
    match *name {
        [c] => letter(c),
        [c1, c0] => Some((1 + letter(c1)?) * COLUMN_LETTERS.len() + letter(c0)?),
        _ => None,
    }
}

/// Name of `v` on a board with `height` rows; off-board vertices are `"pass"`.
pub fn to_gtp(v: Vertex, height: u8) -> String {
    if v == PASS || v.1 >= height {
        return "pass".to_string();
    }
    format!("{}{}", column_name(v.0), height - v.1)
}

/// Parse a name produced by [`to_gtp`]. Case-insensitive.
pub fn from_gtp(s: &str, width: u8, height: u8) -> Result<Vertex, GoError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("pass") {
        return Ok(PASS);
    }

    let invalid = || GoError::InvalidCoordinate(s.to_string());

    let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
    let (letters, digits) = s.split_at(split);

    let x = column_index(letters.as_bytes()).ok_or_else(invalid)?;
    let row: usize = digits.parse().map_err(|_| invalid())?;

    if x >= width as usize || row == 0 || row > height as usize {
        return Err(invalid());
    }

    Ok((x as u8, (height as usize - row) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_of_nineteen() {
        assert_eq!(to_gtp((0, 0), 19), "A19");
        assert_eq!(to_gtp((0, 18), 19), "A1");
        assert_eq!(to_gtp((18, 18), 19), "T1");
        assert_eq!(to_gtp((8, 0), 19), "J19");
    }

    #[test]
    fn skips_letter_i() {
        assert_eq!(from_gtp("H5", 9, 9), Ok((7, 4)));
        assert_eq!(from_gtp("J5", 9, 9), Ok((8, 4)));
        assert!(from_gtp("I5", 9, 9).is_err());
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(from_gtp(" d4 ", 19, 19), Ok((3, 15)));
        assert_eq!(from_gtp("PASS", 19, 19), Ok(PASS));
        assert_eq!(to_gtp(PASS, 19), "pass");
    }

    #[test]
    fn rejects_out_of_range() {
        for s in ["K1", "A0", "A10", "", "4", "A", "A-1", "ZZZ1"] {
            assert_eq!(
                from_gtp(s, 9, 9),
                Err(GoError::InvalidCoordinate(s.to_string())),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn wide_boards_use_two_letters() {
        assert_eq!(to_gtp((25, 0), 30), "AA30");
        assert_eq!(from_gtp("AA30", 30, 30), Ok((25, 0)));
        assert_eq!(from_gtp("AB1", 30, 30), Ok((26, 29)));
    }

    #[test]
    fn every_vertex_names_back_to_itself() {
        for y in 0..13 {
            for x in 0..13 {
                let name = to_gtp((x, y), 13);
                assert_eq!(from_gtp(&name, 13, 13), Ok((x, y)), "{name}");
            }
        }
    }
}
