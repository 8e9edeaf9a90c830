//! Monte-Carlo ownership estimation and dead-stone classification.
//!
//! Every trial plays the position out at random on its own copy with its own
//! random source, then labels the settled result with [`area_map`]. Trials
//! only meet when their counters are added together, so they may run in any
//! order or in parallel.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::Vertex;
use crate::chains::all_chains;
use crate::ownership::{area_map, floating_stones};
use crate::playout::{default_iterations, play_to_quiescence};
use crate::position::Board;
use crate::sign::Stone;

/// Parameters for an estimation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Number of random playouts.
    pub iterations: usize,
    /// Also report stones [`floating_stones`] finds when classifying.
    pub scoring_mode: bool,
    /// Fixed seed for reproducible runs; drawn from the thread rng when unset.
    pub seed: Option<u64>,
    /// Alternations per playout; the board area when unset.
    pub playout_iterations: Option<usize>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            scoring_mode: false,
            seed: None,
            playout_iterations: None,
        }
    }
}

impl EstimatorConfig {
    fn rng(&self) -> StdRng {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        StdRng::seed_from_u64(seed)
    }
}

/// Probability per vertex, row-major, that the vertex ends up Black's.
/// `0.5` where no trial produced evidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityMap {
    width: u8,
    height: u8,
    values: Vec<f64>,
}

impl ProbabilityMap {
    /// The prior: every vertex at `0.5`.
    pub fn neutral(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            values: vec![0.5; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, (x, y): Vertex) -> f64 {
        assert!(x < self.width && y < self.height, "vertex off the map");
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// The color favoured at `v`, if any.
    pub fn owner(&self, v: Vertex) -> Option<Stone> {
        let p = self.get(v);
        if p > 0.5 {
            Some(Stone::Black)
        } else if p < 0.5 {
            Some(Stone::White)
        } else {
            None
        }
    }

    /// Mean probability over a set of vertices, `0.5` for an empty set.
    pub fn mean(&self, vertices: &[Vertex]) -> f64 {
        if vertices.is_empty() {
            return 0.5;
        }
        vertices.iter().map(|&v| self.get(v)).sum::<f64>() / vertices.len() as f64
    }
}

/// Per-vertex win counters accumulated over trials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipTally {
    black: Vec<u32>,
    white: Vec<u32>,
    trials: usize,
}

impl OwnershipTally {
    pub fn new(area: usize) -> Self {
        Self {
            black: vec![0; area],
            white: vec![0; area],
            trials: 0,
        }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Count one trial's ownership map. Neutral vertices count for nobody.
    pub fn record(&mut self, ownership: &[i8]) {
        debug_assert_eq!(ownership.len(), self.black.len());
        for (i, &o) in ownership.iter().enumerate() {
            match o.signum() {
                1 => self.black[i] += 1,
                -1 => self.white[i] += 1,
                _ => {}
            }
        }
        self.trials += 1;
    }

    /// Add another tally's counters to this one.
    pub fn add(&mut self, other: &OwnershipTally) {
        debug_assert_eq!(self.black.len(), other.black.len());
        for (a, b) in self.black.iter_mut().zip(&other.black) {
            *a += b;
        }
        for (a, b) in self.white.iter_mut().zip(&other.white) {
            *a += b;
        }
        self.trials += other.trials;
    }

    pub fn merge(mut self, other: OwnershipTally) -> Self {
        self.add(&other);
        self
    }

    pub fn probabilities(&self, width: u8, height: u8) -> ProbabilityMap {
        let values = self
            .black
            .iter()
            .zip(&self.white)
            .map(|(&b, &w)| match b + w {
                0 => 0.5,
                total => b as f64 / total as f64,
            })
            .collect();
        ProbabilityMap {
            width,
            height,
            values,
        }
    }
}

/// One playout from a random starting color, labelled with [`area_map`].
fn run_trial<B, R>(board: &B, playout_iterations: usize, rng: &mut R) -> Vec<i8>
where
    B: Board,
    R: Rng + ?Sized,
{
    let starting = if rng.random_bool(0.5) {
        Stone::Black
    } else {
        Stone::White
    };
    let settled = play_to_quiescence(board, starting, playout_iterations, rng);
    area_map(&settled)
}

/// An interruptible estimation run.
///
/// Trials can be added in any number of batches; [`Estimator::probability_map`]
/// is valid after each one.
pub struct Estimator<B: Board> {
    board: B,
    playout_iterations: usize,
    rng: StdRng,
    tally: OwnershipTally,
}

impl<B: Board + Send + Sync> Estimator<B> {
    pub fn new(board: &B, config: &EstimatorConfig) -> Self {
        Self {
            board: board.clone(),
            playout_iterations: config
                .playout_iterations
                .unwrap_or_else(|| default_iterations(board)),
            rng: config.rng(),
            tally: OwnershipTally::new(board.area()),
        }
    }

    pub fn trials(&self) -> usize {
        self.tally.trials()
    }

    /// Run `trials` more playouts.
    pub fn run(&mut self, trials: usize) {
        // seeds are drawn up front so the result does not depend on scheduling
        let seeds: Vec<u64> = (0..trials).map(|_| self.rng.random()).collect();
        let batch = self.tally_trials(&seeds);
        self.tally.add(&batch);
    }

    /// Keep running small batches until `budget` has elapsed. Returns the
    /// number of trials added.
    pub fn run_for(&mut self, budget: Duration) -> usize {
        let start = Instant::now();
        let before = self.trials();
        let batch = batch_size();
        while start.elapsed() < budget {
            self.run(batch);
        }
        self.trials() - before
    }

    pub fn probability_map(&self) -> ProbabilityMap {
        let (width, height) = (self.board.width(), self.board.height());
        if self.tally.trials() == 0 {
            return ProbabilityMap::neutral(width, height);
        }
        self.tally.probabilities(width, height)
    }

    fn tally_sequential(&self, seeds: &[u64]) -> OwnershipTally {
        let mut tally = OwnershipTally::new(self.board.area());
        for &seed in seeds {
            let mut rng = StdRng::seed_from_u64(seed);
            tally.record(&run_trial(&self.board, self.playout_iterations, &mut rng));
        }
        tally
    }

    #[cfg(feature = "parallel")]
    fn tally_parallel(&self, seeds: &[u64]) -> OwnershipTally {
        use rayon::prelude::*;

        if seeds.len() < 2 {
            return self.tally_sequential(seeds);
        }
        let area = self.board.area();
        seeds
            .par_iter()
            .fold(
                || OwnershipTally::new(area),
                |mut tally, &seed| {
                    let mut rng = StdRng::seed_from_u64(seed);
                    tally.record(&run_trial(&self.board, self.playout_iterations, &mut rng));
                    tally
                },
            )
            .reduce(|| OwnershipTally::new(area), OwnershipTally::merge)
    }

    #[cfg(feature = "parallel")]
    fn tally_trials(&self, seeds: &[u64]) -> OwnershipTally {
        self.tally_parallel(seeds)
    }

    #[cfg(not(feature = "parallel"))]
    fn tally_trials(&self, seeds: &[u64]) -> OwnershipTally {
        self.tally_sequential(seeds)
    }
}

#[cfg(feature = "parallel")]
fn batch_size() -> usize {
    rayon::current_num_threads().max(1)
}

#[cfg(not(feature = "parallel"))]
fn batch_size() -> usize {
    1
}

/// Probability that each vertex ends up Black's, from `config.iterations`
/// random playouts.
pub fn estimate_ownership<B: Board + Send + Sync>(board: &B, config: &EstimatorConfig) -> ProbabilityMap {
    let mut estimator = Estimator::new(board, config);
    estimator.run(config.iterations);
    tracing::debug!(
        width = board.width(),
        height = board.height(),
        trials = estimator.trials(),
        "estimated ownership"
    );
    estimator.probability_map()
}

/// Chains whose mean probability favours the other color.
pub fn dead_stones_from_map<B: Board>(board: &B, map: &ProbabilityMap) -> HashSet<Vertex> {
    let mut dead = HashSet::new();
    for chain in all_chains(board) {
        let Some(stone) = board.get(chain[0]) else {
            continue;
        };
        let mean = map.mean(&chain);
        let controlled_by = if mean < 0.5 {
            Stone::White
        } else if mean > 0.5 {
            Stone::Black
        } else {
            continue;
        };
        if controlled_by != stone {
            dead.extend(chain);
        }
    }
    dead
}

/// Stones judged dead by Monte-Carlo estimation; in scoring mode also the
/// structurally dead stones random play tends to miss.
pub fn classify_dead_stones<B: Board + Send + Sync>(board: &B, config: &EstimatorConfig) -> HashSet<Vertex> {
    let map = estimate_ownership(board, config);
    let mut dead = dead_stones_from_map(board, &map);
    if config.scoring_mode {
        dead.extend(floating_stones(board));
    }
    tracing::debug!(
        dead = dead.len(),
        scoring_mode = config.scoring_mode,
        "classified dead stones"
    );
    dead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    const DEAD_WHITE_STONE: &str = "
        .X.X.XO.O
        XXXXXXOOO
        X...X.OO.
        X.O.XXOOO
        X...XO.O.
        XXXXXOOOO
        .X.XXO.O.
        XXX.XOOOO
        ..X.XO.O.
    ";

    const DEAD_WHITE_PAIR: &str = "
        .X.X.XO.O
        XXXXXXOOO
        X...X.OO.
        X.OOXXOOO
        X...XO.O.
        XXXXXOOOO
        .X.XXO.O.
        XXX.XOOOO
        ..X.XO.O.
    ";

    fn seeded(iterations: usize, seed: u64) -> EstimatorConfig {
        EstimatorConfig {
            iterations,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn zero_trials_keep_the_prior() {
        let position = Position::from_layout(DEAD_WHITE_STONE).unwrap();
        let map = estimate_ownership(&position, &seeded(0, 1));
        assert_eq!(map.values().len(), 81);
        assert!(map.values().iter().all(|&p| p == 0.5));
        assert_eq!(map, ProbabilityMap::neutral(9, 9));
    }

    #[test]
    fn probabilities_stay_in_bounds() {
        let position = Position::from_layout(
            "
            ..X..O.
            .XOX.O.
            ..X.OX.
            .......
            ",
        )
        .unwrap();
        let map = estimate_ownership(&position, &seeded(30, 5));
        assert!(map.values().iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn same_seed_same_map() {
        let position = Position::from_layout(DEAD_WHITE_STONE).unwrap();
        let a = estimate_ownership(&position, &seeded(20, 11));
        let b = estimate_ownership(&position, &seeded(20, 11));
        assert_eq!(a, b);
    }

    #[test]
    fn batches_add_up() {
        let position = Position::from_layout(DEAD_WHITE_STONE).unwrap();
        let mut estimator = Estimator::new(&position, &seeded(0, 3));
        estimator.run(4);
        estimator.run(6);
        assert_eq!(estimator.trials(), 10);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let position = Position::from_layout(DEAD_WHITE_STONE).unwrap();
        let estimator = Estimator::new(&position, &seeded(0, 9));
        let seeds: Vec<u64> = (0..16).collect();
        assert_eq!(
            estimator.tally_sequential(&seeds),
            estimator.tally_parallel(&seeds)
        );
    }

    #[test]
    fn run_for_is_time_boxed() {
        let position = Position::from_layout(DEAD_WHITE_STONE).unwrap();
        let mut estimator = Estimator::new(&position, &seeded(0, 4));
        let added = estimator.run_for(Duration::from_millis(30));
        assert_eq!(added, estimator.trials());
        assert!(added > 0);
        assert!(estimator.probability_map().values().iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn tally_merge_is_commutative() {
        let mut a = OwnershipTally::new(3);
        a.record(&[1, 0, -1]);
        let mut b = OwnershipTally::new(3);
        b.record(&[1, 1, 0]);
        b.record(&[-1, 1, 0]);
        assert_eq!(a.clone().merge(b.clone()), b.merge(a));
    }

    #[test]
    fn tally_probabilities() {
        let mut tally = OwnershipTally::new(3);
        tally.record(&[1, 0, -1]);
        tally.record(&[1, 0, 1]);
        tally.record(&[-1, 0, 1]);
        let map = tally.probabilities(3, 1);
        assert!((map.get((0, 0)) - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(map.get((1, 0)), 0.5);
        assert!((map.get((2, 0)) - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(map.owner((0, 0)), Some(Stone::Black));
        assert_eq!(map.owner((1, 0)), None);
    }

    #[test]
    fn finds_dead_stone_in_territory() {
        let position = Position::from_layout(DEAD_WHITE_STONE).unwrap();
        let dead = classify_dead_stones(&position, &seeded(100, 21));
        assert_eq!(dead, HashSet::from([(2, 3)]));
    }

    #[test]
    fn scoring_mode_adds_floating_stones() {
        let position = Position::from_layout(DEAD_WHITE_STONE).unwrap();
        // without playouts only the structural heuristic has an opinion
        let config = EstimatorConfig {
            scoring_mode: true,
            ..seeded(0, 1)
        };
        assert_eq!(classify_dead_stones(&position, &config), HashSet::from([(2, 3)]));
        assert!(classify_dead_stones(&position, &seeded(0, 1)).is_empty());
    }

    #[test]
    fn scoring_mode_adds_dead_chains() {
        let position = Position::from_layout(DEAD_WHITE_PAIR).unwrap();
        let config = EstimatorConfig {
            scoring_mode: true,
            ..seeded(0, 1)
        };
        assert_eq!(
            classify_dead_stones(&position, &config),
            HashSet::from([(2, 3), (3, 3)])
        );
    }

    #[test]
    fn dead_stones_from_explicit_map() {
        let position = Position::from_layout("XO").unwrap();
        let mut tally = OwnershipTally::new(2);
        tally.record(&[1, 1]);
        let dead = dead_stones_from_map(&position, &tally.probabilities(2, 1));
        assert_eq!(dead, HashSet::from([(1, 0)]));
    }

    #[test]
    fn config_reads_partial_json() {
        let config: EstimatorConfig =
            serde_json::from_str(r#"{"iterations": 20, "seed": 8}"#).unwrap();
        assert_eq!(config.iterations, 20);
        assert_eq!(config.seed, Some(8));
        assert!(!config.scoring_mode);
        assert_eq!(config.playout_iterations, None);
    }
}
