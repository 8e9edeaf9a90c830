use crate::Vertex;
use crate::position::Board;
use crate::sign::Stone;

/// Number of points [`standard_points`] defines for a board size.
pub fn max_handicap(size: u8) -> usize {
    if size < 6 {
        0
    } else if size.is_multiple_of(2) {
        4
    } else {
        9
    }
}

/// Star-point handicap placement for a square board of `size`.
///
/// Corners come first, diagonal pairs before the other diagonal. Odd boards
/// add the side points and the center; the center is only used with 5, 7
/// or 9 stones. Asking for more than [`max_handicap`] returns every defined
/// point.
pub fn standard_points(size: u8, count: usize) -> Vec<Vertex> {
    if size < 6 || count < 2 {
        return Vec::new();
    }

    // Hoshi offset from the edge: 3 for boards >= 13, 2 for smaller
    let near = if size >= 13 { 3 } else { 2 };
    let far = size - near - 1;
    let mid = size / 2;

    let mut points = vec![(near, near), (far, far), (near, far), (far, near)];

    if !size.is_multiple_of(2) {
        if count == 5 {
            points.push((mid, mid));
        }
        points.extend([(near, mid), (far, mid)]);
        if count == 7 {
            points.push((mid, mid));
        }
        points.extend([(mid, near), (mid, far), (mid, mid)]);
    }

    points.truncate(count);
    points
}

/// Put Black stones on the standard points of a square `board`.
///
/// Returns the points placed; non-square boards get none.
pub fn place_handicap<B: Board>(board: &mut B, count: usize) -> Vec<Vertex> {
    if board.width() != board.height() {
        return Vec::new();
    }

    let points = standard_points(board.width(), count);
    for &v in &points {
        board.set(v, Some(Stone::Black));
    }
    points
}
