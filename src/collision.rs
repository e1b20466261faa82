use crate::bird::Bird;
use crate::config::SimConfig;
use crate::field::PipePair;
use crate::sprite::{BIRD_HEIGHT, BIRD_WIDTH, Mask, PIPE_HEIGHT, PIPE_WIDTH, SpriteSet};

/// Outcome of one crash check. Ground takes precedence over obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrashTest {
    pub crashed: bool,
    pub ground: bool,
}

impl CrashTest {
    const NONE: Self = Self { crashed: false, ground: false };
    const GROUND: Self = Self { crashed: true, ground: true };
    const PIPE: Self = Self { crashed: true, ground: false };
}

/// Axis-aligned box in whole pixels. Sprite surfaces live on an integer
/// grid, so fractional positions truncate before clipping.
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn at(x: f32, y: f32, w: u32, h: u32) -> Self {
        Self { x: x as i32, y: y as i32, w: w as i32, h: h as i32 }
    }

    /// Intersection with `other`; zero-sized when they do not overlap.
    pub fn clip(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let w = (self.x + self.w).min(other.x + other.w) - x;
        let h = (self.y + self.h).min(other.y + other.h) - y;
        Rect { x, y, w: w.max(0), h: h.max(0) }
    }
}

/// Coarse box rejection followed by a per-pixel opacity AND over the
/// clipped region. Any pair of opaque pixels at the same offset collides.
pub fn pixel_collision(a: Rect, b: Rect, mask_a: &Mask, mask_b: &Mask) -> bool {
    let clip = a.clip(&b);
    if clip.w == 0 || clip.h == 0 {
        return false;
    }
    let (ax, ay) = (clip.x - a.x, clip.y - a.y);
    let (bx, by) = (clip.x - b.x, clip.y - b.y);
    for dy in 0..clip.h {
        for dx in 0..clip.w {
            if mask_a.opaque((ax + dx) as u32, (ay + dy) as u32)
                && mask_b.opaque((bx + dx) as u32, (by + dy) as u32)
            {
                return true;
            }
        }
    }
    false
}

/// Crash determination for one bird against the ground and every pipe pair
/// on the field, in field order, stopping at the first collision. `frame`
/// selects the bird mask for the current flap animation frame.
pub fn check<'a>(
    bird: &Bird,
    bird_x: f32,
    frame: usize,
    pairs: impl IntoIterator<Item = &'a PipePair>,
    sprites: &SpriteSet,
    cfg: &SimConfig,
) -> CrashTest {
    // Ground short-circuits everything else.
    if bird.bottom() >= cfg.ground_y - 1.0 {
        return CrashTest::GROUND;
    }

    let bird_rect = Rect::at(bird_x, bird.y, BIRD_WIDTH, BIRD_HEIGHT);
    let bird_mask = &sprites.bird_masks[frame];

    for pair in pairs {
        let upper = Rect::at(pair.x, pair.gap_top - PIPE_HEIGHT as f32, PIPE_WIDTH, PIPE_HEIGHT);
        let lower = Rect::at(pair.x, pair.gap_bottom, PIPE_WIDTH, PIPE_HEIGHT);
        if pixel_collision(bird_rect, upper, bird_mask, &sprites.pipe_upper_mask)
            || pixel_collision(bird_rect, lower, bird_mask, &sprites.pipe_lower_mask)
        {
            return CrashTest::PIPE;
        }
    }
    CrashTest::NONE
}
