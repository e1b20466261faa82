use rand::Rng;
use rand::rngs::SmallRng;
use serde::Serialize;

use crate::config::SimConfig;
use crate::sprite::PIPE_WIDTH;

/// One upper/lower barrier pair. The upper barrier spans from the field top
/// down to `gap_top`, the lower from `gap_bottom` down to the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipePair {
    /// Monotonically increasing within a round, never reused. Lets birds
    /// score each pair exactly once.
    pub id: u64,
    /// Left edge. Strictly decreases each tick.
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
}

impl PipePair {
    pub fn gap_mid(&self) -> f32 {
        (self.gap_top + self.gap_bottom) / 2.0
    }

    pub fn mid_x(&self) -> f32 {
        self.x + PIPE_WIDTH as f32 / 2.0
    }
}

/// Capacity of the ring. The spawn policy keeps at most `max_pending` (3)
/// pairs alive, so one spare slot is plenty.
pub const MAX_PAIRS: usize = 4;

/// Ordered sequence of pipe pairs, leftmost first, in a fixed-size ring.
pub struct PipeField {
    slots: [PipePair; MAX_PAIRS],
    head: usize,
    len: usize,
    next_id: u64,
    rng: SmallRng,
}

impl PipeField {
    /// Three pairs pre-spawned at fixed offsets past the right edge.
    pub fn new(cfg: &SimConfig, rng: SmallRng) -> Self {
        let w = cfg.field_width;
        let empty = PipePair { id: 0, x: 0.0, gap_top: 0.0, gap_bottom: 0.0 };
        let mut field = Self {
            slots: [empty; MAX_PAIRS],
            head: 0,
            len: 0,
            next_id: 0,
            rng,
        };
        for x in [w / 2.0 + 200.0, w + 200.0, w + 200.0 + w / 2.0] {
            field.spawn_at(x, cfg);
        }
        field
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, i: usize) -> &PipePair {
        debug_assert!(i < self.len);
        &self.slots[(self.head + i) % MAX_PAIRS]
    }

    pub fn front(&self) -> Option<&PipePair> {
        (self.len > 0).then(|| self.get(0))
    }

    /// Pairs in order, oldest (leftmost) first.
    pub fn iter(&self) -> impl Iterator<Item = &PipePair> {
        (0..self.len).map(|i| self.get(i))
    }

    /// Shift every pair left by the scroll velocity.
    pub fn advance(&mut self, scroll_velocity: f32) {
        for i in 0..self.len {
            self.slots[(self.head + i) % MAX_PAIRS].x -= scroll_velocity;
        }
    }

    /// Remove the leftmost pair once its right edge has scrolled off the
    /// field. At most one removal per tick; the scroll step is far smaller
    /// than a pipe width, so pairs cannot skip past entirely.
    pub fn recycle(&mut self) {
        if let Some(front) = self.front() {
            if front.x + (PIPE_WIDTH as f32) < 0.0 {
                self.head = (self.head + 1) % MAX_PAIRS;
                self.len -= 1;
            }
        }
    }

    /// Append a pair once fewer than `max_pending` are pending and the
    /// leftmost pair has crossed the spawn threshold. The trigger is a
    /// one-sided bound rather than a narrow window so a coarse scroll step
    /// cannot skip it.
    pub fn spawn_if_needed(&mut self, cfg: &SimConfig) {
        if self.len >= cfg.max_pending.min(MAX_PAIRS) {
            return;
        }
        let leading_crossed = self
            .front()
            .map_or(true, |front| front.x < cfg.spawn_threshold);
        if leading_crossed {
            self.spawn_at(cfg.field_width + cfg.spawn_margin, cfg);
        }
    }

    /// The first pair, in order, whose left edge is still ahead of
    /// `entity_x`. The spawn policy keeps pairs ahead of the entity horizon,
    /// so `None` is a contract violation for in-round callers.
    pub fn nearest_gap_ahead(&self, entity_x: f32) -> Option<&PipePair> {
        self.iter().find(|pair| pair.x > entity_x)
    }

    fn spawn_at(&mut self, x: f32, cfg: &SimConfig) {
        debug_assert!(self.len < MAX_PAIRS);
        let (lo, hi) = cfg.gap_top_range();
        let gap_top = self.rng.gen_range(lo..hi);
        let pair = PipePair {
            id: self.next_id,
            x,
            gap_top,
            gap_bottom: gap_top + cfg.gap_size,
        };
        self.next_id += 1;
        self.slots[(self.head + self.len) % MAX_PAIRS] = pair;
        self.len += 1;
    }
}
