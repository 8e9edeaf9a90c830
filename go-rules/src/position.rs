use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::Vertex;
use crate::error::GoError;
use crate::sign::{Stone, sign_of};

/// Stones captured by each color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, by: Stone) -> u32 {
        match by {
            Stone::Black => self.black,
            Stone::White => self.white,
        }
    }

    fn add(&mut self, by: Stone, count: u32) {
        match by {
            Stone::Black => self.black += count,
            Stone::White => self.white += count,
        }
    }
}

/// The capability every rules algorithm works against.
///
/// Implementors are plain values: mutation happens on the instance handed in,
/// callers that need the original clone first.
pub trait Board: Clone {
    fn width(&self) -> u8;

    fn height(&self) -> u8;

    /// Content of `v`. Off-board vertices read as empty.
    fn get(&self, v: Vertex) -> Option<Stone>;

    fn set(&mut self, v: Vertex, content: Option<Stone>);

    /// Credit `count` captured stones to the color `by`.
    fn add_captures(&mut self, by: Stone, count: u32);

    fn captures(&self) -> Captures;

    fn has(&self, (x, y): Vertex) -> bool {
        x < self.width() && y < self.height()
    }

    fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Row-major index of an on-board vertex.
    #[inline]
    fn index(&self, v: Vertex) -> usize {
        debug_assert!(self.has(v), "vertex {v:?} is off the board");
        v.1 as usize * self.width() as usize + v.0 as usize
    }

    #[inline]
    fn vertex(&self, index: usize) -> Vertex {
        let width = self.width() as usize;
        ((index % width) as u8, (index / width) as u8)
    }

    /// All vertices in row-major order.
    fn vertices(&self) -> impl Iterator<Item = Vertex> {
        let (width, height) = (self.width(), self.height());
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }
}

/// A rectangular Go position stored as a flat array of signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    board: Vec<i8>,
    width: u8,
    height: u8,
    captures: Captures,
}

#[derive(Deserialize)]
struct RawPosition {
    board: Vec<i8>,
    width: u8,
    height: u8,
    #[serde(default)]
    captures: Captures,
}

impl TryFrom<RawPosition> for Position {
    type Error = GoError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        if raw.board.len() != raw.width as usize * raw.height as usize {
            return Err(GoError::InvalidLayout(format!(
                "{} signs for a {}x{} board",
                raw.board.len(),
                raw.width,
                raw.height
            )));
        }
        Ok(Position {
            board: raw.board.into_iter().map(i8::signum).collect(),
            width: raw.width,
            height: raw.height,
            captures: raw.captures,
        })
    }
}

impl Position {
    /// Create a position from a matrix of signs, one inner vec per row.
    pub fn new(rows: Vec<Vec<i8>>) -> Self {
        let height = rows.len() as u8;
        let width = rows.first().map_or(0, |row| row.len()) as u8;

        assert!(
            rows.iter().all(|row| row.len() == width as usize),
            "malformed board matrix"
        );

        Position {
            board: rows.into_iter().flatten().map(i8::signum).collect(),
            width,
            height,
            captures: Captures::new(),
        }
    }

    pub fn with_dimensions(width: u8, height: u8) -> Self {
        Position {
            board: vec![0; width as usize * height as usize],
            width,
            height,
            captures: Captures::new(),
        }
    }

    /// Parse an ASCII diagram: `X`/`B` Black, `O`/`W` White, `.`/`+` empty.
    /// Spaces inside a row and blank lines are ignored.
    pub fn from_layout(layout: &str) -> Result<Self, GoError> {
        let mut rows: Vec<Vec<i8>> = Vec::new();

        for (line_no, line) in layout.lines().enumerate() {
            let row = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| match c {
                    'X' | 'x' | 'B' | 'b' => Ok(Stone::Black.sign()),
                    'O' | 'o' | 'W' | 'w' => Ok(Stone::White.sign()),
                    '.' | '+' => Ok(0),
                    other => Err(GoError::InvalidLayout(format!(
                        "unexpected {other:?} on line {}",
                        line_no + 1
                    ))),
                })
                .collect::<Result<Vec<i8>, GoError>>()?;
            if !row.is_empty() {
                rows.push(row);
            }
        }

        let width = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(GoError::InvalidLayout(format!(
                "row {} has {} columns, expected {width}",
                bad + 1,
                rows[bad].len()
            )));
        }
        if width > u8::MAX as usize || rows.len() > u8::MAX as usize {
            return Err(GoError::InvalidLayout(format!(
                "{width}x{} exceeds the largest supported board",
                rows.len()
            )));
        }

        Ok(Position::new(rows))
    }

    pub fn board(&self) -> &[i8] {
        &self.board
    }

    pub fn is_empty(&self) -> bool {
        self.board.iter().all(|&s| s == 0)
    }

    pub fn stone_count(&self) -> usize {
        self.board.iter().filter(|&&s| s != 0).count()
    }

    /// Hash of the stone arrangement, used for single-step repetition checks.
    /// Capture counters do not contribute.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.width.hash(&mut hasher);
        self.height.hash(&mut hasher);
        self.board.hash(&mut hasher);
        hasher.finish()
    }
}

impl Board for Position {
    fn width(&self) -> u8 {
        self.width
    }

    fn height(&self) -> u8 {
        self.height
    }

    fn get(&self, v: Vertex) -> Option<Stone> {
        if self.has(v) {
            Stone::from_sign(self.board[self.index(v)])
        } else {
            None
        }
    }

    fn set(&mut self, v: Vertex, content: Option<Stone>) {
        if self.has(v) {
            let i = self.index(v);
            self.board[i] = sign_of(content);
        }
    }

    fn add_captures(&mut self, by: Stone, count: u32) {
        self.captures.add(by, count);
    }

    fn captures(&self) -> Captures {
        self.captures
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.board.chunks(self.width.max(1) as usize).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for &s in row {
                let c = Stone::from_sign(s).map_or('.', Stone::letter);
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
