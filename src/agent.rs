use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Result of the declared-but-unimplemented evolutionary operations. No
/// evolutionary semantics exist in this repository; callers get this
/// placeholder until the operators are actually designed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evolution {
    Unsupported,
}

/// A jump controller. Queried once per tick per alive bird with the
/// distances to the nearest upcoming gap.
pub trait Agent {
    /// `horizontal_gap_distance`: pipe left edge minus bird x (positive).
    /// `vertical_gap_offset`: gap midpoint minus bird y (positive when the
    /// gap is below the bird).
    fn decide(&mut self, horizontal_gap_distance: f32, vertical_gap_offset: f32) -> bool;

    /// Extension point, not implemented.
    fn mutate(&mut self) -> Evolution {
        Evolution::Unsupported
    }

    /// Extension point, not implemented.
    fn breed(&self, _other: &dyn Agent) -> Evolution {
        Evolution::Unsupported
    }
}

/// Flaps at random, one tick in eighteen, ignoring the distances.
pub struct RandomAgent {
    rng: SmallRng,
    odds: u32,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed), odds: 18 }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn decide(&mut self, _horizontal: f32, _vertical: f32) -> bool {
        self.rng.gen_range(1..=self.odds) == 1
    }
}

/// Flaps on a fixed cadence. Deterministic; used by the headless driver and
/// the scenario tests. A period of 0 never flaps.
pub struct CadenceAgent {
    period: u64,
    ticks: u64,
}

impl CadenceAgent {
    pub fn every(period: u64) -> Self {
        Self { period, ticks: 0 }
    }

    /// An agent that never jumps.
    pub fn never() -> Self {
        Self::every(0)
    }
}

impl Agent for CadenceAgent {
    fn decide(&mut self, _horizontal: f32, _vertical: f32) -> bool {
        if self.period == 0 {
            return false;
        }
        self.ticks += 1;
        self.ticks % self.period == 0
    }
}
