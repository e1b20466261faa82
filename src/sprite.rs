//! Procedurally generated sprites and their opacity masks.
//!
//! The collision oracle only cares about each sprite's alpha channel, so the
//! masks are derived once here and handed to the simulation at startup. The
//! RGBA data is consumed by the presentation layer alone.

pub const BIRD_WIDTH: u32 = 34;
pub const BIRD_HEIGHT: u32 = 24;
pub const PIPE_WIDTH: u32 = 52;
pub const PIPE_HEIGHT: u32 = 320;
/// How far the ground strip overhangs the field, for scroll wrapping.
pub const GROUND_OVERHANG: u32 = 48;

/// Bird flap animation: wing up, mid, down, mid.
pub const FLAP_CYCLE: [usize; 4] = [0, 1, 2, 1];
/// Ticks between flap-frame advances.
pub const FLAP_INTERVAL: u64 = 3;

#[derive(Clone)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl Sprite {
    fn blank(width: u32, height: u32) -> Self {
        Self { width, height, rgba: vec![0; (width * height * 4) as usize] }
    }

    fn put(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        self.rgba[idx..idx + 4].copy_from_slice(&color);
    }

    pub fn mask(&self) -> Mask {
        let bits = self
            .rgba
            .chunks_exact(4)
            .map(|px| px[3] > 0)
            .collect();
        Mask { width: self.width, height: self.height, bits }
    }
}

/// Per-pixel opacity of one sprite, indexed by local offset.
#[derive(Clone)]
pub struct Mask {
    pub width: u32,
    pub height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn opaque(&self, x: u32, y: u32) -> bool {
        debug_assert!(x < self.width && y < self.height);
        self.bits[(y * self.width + x) as usize]
    }

    #[cfg(test)]
    pub fn solid(width: u32, height: u32) -> Self {
        Self { width, height, bits: vec![true; (width * height) as usize] }
    }
}

/// Everything renderable plus the masks the collision oracle indexes by the
/// bird's current animation frame and the pipe orientation.
pub struct SpriteSet {
    pub bird: [Sprite; 3],
    pub bird_masks: [Mask; 3],
    /// Upper barrier, opening pointing down.
    pub pipe_upper: Sprite,
    /// Lower barrier, opening pointing up.
    pub pipe_lower: Sprite,
    pub pipe_upper_mask: Mask,
    pub pipe_lower_mask: Mask,
    pub ground: Sprite,
}

impl SpriteSet {
    pub fn generate(field_width: u32, field_height: u32, ground_y: u32) -> Self {
        let bird = [bird_sprite(0), bird_sprite(1), bird_sprite(2)];
        let bird_masks = [bird[0].mask(), bird[1].mask(), bird[2].mask()];
        let pipe_lower = pipe_sprite(false);
        let pipe_upper = pipe_sprite(true);
        let pipe_upper_mask = pipe_upper.mask();
        let pipe_lower_mask = pipe_lower.mask();
        let ground = ground_sprite(field_width + GROUND_OVERHANG, field_height - ground_y);
        Self {
            bird,
            bird_masks,
            pipe_upper,
            pipe_lower,
            pipe_upper_mask,
            pipe_lower_mask,
            ground,
        }
    }
}

const BODY: [u8; 4] = [230, 200, 60, 255];
const BODY_SHADE: [u8; 4] = [200, 160, 40, 255];
const WING: [u8; 4] = [240, 240, 230, 255];
const BEAK: [u8; 4] = [235, 120, 50, 255];
const EYE: [u8; 4] = [25, 25, 30, 255];

/// An ellipse-bodied bird. `frame` moves the wing: 0 = up, 1 = mid, 2 = down.
/// Corners stay transparent so the mask is genuinely non-rectangular.
fn bird_sprite(frame: usize) -> Sprite {
    let mut s = Sprite::blank(BIRD_WIDTH, BIRD_HEIGHT);
    let (cx, cy) = (BIRD_WIDTH as f32 / 2.0, BIRD_HEIGHT as f32 / 2.0);
    for y in 0..BIRD_HEIGHT {
        for x in 0..BIRD_WIDTH {
            let dx = (x as f32 + 0.5 - cx) / cx;
            let dy = (y as f32 + 0.5 - cy) / cy;
            if dx * dx + dy * dy <= 1.0 {
                let color = if dy > 0.4 { BODY_SHADE } else { BODY };
                s.put(x, y, color);
            }
        }
    }
    // Wing: a small slab whose row depends on the frame.
    let wing_y = match frame {
        0 => 6,
        1 => 10,
        _ => 14,
    };
    for y in wing_y..(wing_y + 5).min(BIRD_HEIGHT) {
        for x in 4..16 {
            let idx = ((y * BIRD_WIDTH + x) * 4) as usize;
            if s.rgba[idx + 3] > 0 {
                s.put(x, y, WING);
            }
        }
    }
    // Beak on the leading edge, eye above it.
    for y in 10..15 {
        for x in 28..BIRD_WIDTH {
            s.put(x, y, BEAK);
        }
    }
    s.put(25, 7, EYE);
    s.put(26, 7, EYE);
    s.put(25, 8, EYE);
    s.put(26, 8, EYE);
    s
}

const PIPE: [u8; 4] = [90, 190, 70, 255];
const PIPE_DARK: [u8; 4] = [50, 130, 45, 255];
const PIPE_LIP: [u8; 4] = [110, 210, 90, 255];

/// A solid pipe column with a lip at the gap-facing end. `flipped` produces
/// the upper barrier (lip at the bottom).
fn pipe_sprite(flipped: bool) -> Sprite {
    let mut s = Sprite::blank(PIPE_WIDTH, PIPE_HEIGHT);
    const LIP: u32 = 24;
    for y in 0..PIPE_HEIGHT {
        let from_gap = if flipped { PIPE_HEIGHT - 1 - y } else { y };
        for x in 0..PIPE_WIDTH {
            let color = if from_gap < LIP {
                PIPE_LIP
            } else if x < 6 || x >= PIPE_WIDTH - 6 {
                PIPE_DARK
            } else {
                PIPE
            };
            s.put(x, y, color);
        }
    }
    s
}

const DIRT: [u8; 4] = [210, 175, 110, 255];
const DIRT_DARK: [u8; 4] = [170, 135, 80, 255];
const TURF: [u8; 4] = [120, 200, 90, 255];

fn ground_sprite(width: u32, height: u32) -> Sprite {
    let mut s = Sprite::blank(width, height.max(1));
    for y in 0..s.height {
        for x in 0..width {
            let color = if y < 4 {
                TURF
            } else if (x / 12 + y / 12) % 2 == 0 {
                DIRT
            } else {
                DIRT_DARK
            };
            s.put(x, y, color);
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bird_corners_are_transparent() {
        for frame in 0..3 {
            let mask = bird_sprite(frame).mask();
            assert!(!mask.opaque(0, 0));
            assert!(!mask.opaque(BIRD_WIDTH - 1, 0));
            assert!(!mask.opaque(0, BIRD_HEIGHT - 1));
            assert!(mask.opaque(BIRD_WIDTH / 2, BIRD_HEIGHT / 2));
        }
    }

    #[test]
    fn pipe_is_fully_opaque() {
        for flipped in [false, true] {
            let mask = pipe_sprite(flipped).mask();
            for y in 0..PIPE_HEIGHT {
                for x in 0..PIPE_WIDTH {
                    assert!(mask.opaque(x, y));
                }
            }
        }
    }

    #[test]
    fn frames_differ() {
        let a = bird_sprite(0);
        let b = bird_sprite(2);
        assert_ne!(a.rgba, b.rgba);
    }
}
