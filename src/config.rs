use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// All tunables of the simulation in one place, decoupled from any
/// rendering handles. Units are pixels and pixels-per-tick; the loop is a
/// fixed timestep, so no wall-clock dt appears anywhere in the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub field_width: f32,
    pub field_height: f32,
    /// Y of the ground line. Everything at or below it is a ground crash.
    pub ground_y: f32,
    /// Vertical opening between the upper and lower pipe of a pair.
    pub gap_size: f32,
    /// How far the field scrolls left each tick.
    pub scroll_velocity: f32,
    pub gravity_accel: f32,
    /// Velocity assigned on a flap. Negative is up.
    pub flap_impulse: f32,
    pub max_descent_speed: f32,
    /// Degrees the bird noses down per tick while not flapping.
    pub rotation_rate: f32,
    /// Rotation snapped to on a flap.
    pub flap_rotation: f32,
    /// Most-nose-down rotation the bird can reach.
    pub min_rotation: f32,
    /// Rotation cap applied when drawing (cosmetic only).
    pub visible_rotation_max: f32,
    /// A new pair spawns once the leftmost pair's x drops below this.
    pub spawn_threshold: f32,
    /// New pairs appear this far past the right edge.
    pub spawn_margin: f32,
    /// Maximum pairs pending at once.
    pub max_pending: usize,
    /// Width of the midpoint-crossing window used for scoring.
    pub score_band: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        let field_width = 288.0;
        let field_height = 512.0;
        Self {
            field_width,
            field_height,
            ground_y: field_height * 0.79,
            gap_size: 100.0,
            scroll_velocity: 128.0 / 30.0,
            gravity_accel: 1.0,
            flap_impulse: -9.0,
            max_descent_speed: 10.0,
            rotation_rate: 3.0,
            flap_rotation: 45.0,
            min_rotation: -90.0,
            visible_rotation_max: 20.0,
            spawn_threshold: 5.0,
            spawn_margin: 10.0,
            max_pending: 3,
            score_band: 6.0,
        }
    }
}

impl SimConfig {
    /// Shared, fixed horizontal position of every bird.
    pub fn bird_x(&self) -> f32 {
        self.field_width * 0.2
    }

    /// Inclusive-exclusive range the top of a gap may be placed in. The gap
    /// always sits fully below the field top and above the ground.
    pub fn gap_top_range(&self) -> (f32, f32) {
        (0.2 * self.ground_y, 0.6 * self.ground_y - self.gap_size)
    }

    /// Load overrides from a JSON file if it exists, defaults otherwise.
    /// Missing fields fall back to their default values.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}
