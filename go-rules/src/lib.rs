pub mod chains;
pub mod coord;
pub mod error;
pub mod estimate;
pub mod handicap;
pub mod ko;
pub mod ownership;
pub mod playout;
pub mod position;
pub mod rules;
pub mod score;
pub mod sign;

/// A board coordinate `(x, y)`; `(0, 0)` is the top-left corner.
pub type Vertex = (u8, u8);

/// Off-board sentinel used for passes. No representable board contains it.
pub const PASS: Vertex = (u8::MAX, u8::MAX);

pub use error::GoError;
pub use estimate::{Estimator, EstimatorConfig, ProbabilityMap};
pub use position::{Board, Captures, Position};
pub use rules::apply_move;
pub use score::Score;
pub use sign::Stone;
