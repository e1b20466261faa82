use serde::Serialize;

use crate::config::SimConfig;
use crate::sprite::BIRD_HEIGHT;

/// Per-agent entity state. Horizontal position is shared by all birds
/// (`SimConfig::bird_x`) and never changes; only the field scrolls.
#[derive(Debug, Clone, Serialize)]
pub struct Bird {
    pub y: f32,
    pub vel_y: f32,
    /// Degrees, positive is nose-up. Cosmetic, but reproduced exactly so
    /// terminal snapshots compare bit-for-bit.
    pub rotation: f32,
    /// Set on the tick the bird flapped; consumed by `update_rotation`.
    pub flapped: bool,
    pub alive: bool,
    pub score: u32,
    pub fitness: f32,
    /// Id of the most recently scored pipe pair. Ids are monotone and pairs
    /// are passed in order, so this is enough to fire scoring exactly once
    /// per pair.
    pub last_scored: Option<u64>,
}

impl Bird {
    /// Round-start state: field center, one flap already applied.
    pub fn spawn(cfg: &SimConfig) -> Self {
        Self {
            y: (cfg.field_height - BIRD_HEIGHT as f32) / 2.0,
            vel_y: cfg.flap_impulse,
            rotation: cfg.flap_rotation,
            flapped: false,
            alive: true,
            score: 0,
            fitness: 0.0,
            last_scored: None,
        }
    }

    /// Apply this tick's agent decision: a flap overrides the velocity with
    /// the impulse; otherwise gravity pulls until the descent cap.
    pub fn apply_decision(&mut self, jump: bool, cfg: &SimConfig) {
        if jump {
            self.vel_y = cfg.flap_impulse;
            self.flapped = true;
        } else if self.vel_y < cfg.max_descent_speed {
            self.vel_y += cfg.gravity_accel;
        }
    }

    /// Move vertically. Descent is clamped so the bird never renders below
    /// the ground line before the crash is detected, and ascent is clamped
    /// at the field top so a permanently-flapping bird stays on the field
    /// (and meets the next upper barrier) instead of escaping upward.
    pub fn integrate(&mut self, cfg: &SimConfig) {
        let room_below = cfg.ground_y - self.y - BIRD_HEIGHT as f32;
        self.y = (self.y + self.vel_y.min(room_below)).max(0.0);
    }

    /// Nose down a little each tick; a flap snaps the nose back up.
    pub fn update_rotation(&mut self, cfg: &SimConfig) {
        if self.flapped {
            self.rotation = cfg.flap_rotation;
            self.flapped = false;
        } else if self.rotation > cfg.min_rotation {
            self.rotation -= cfg.rotation_rate;
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + BIRD_HEIGHT as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_never_exceeds_descent_cap() {
        let cfg = SimConfig::default();
        let mut bird = Bird::spawn(&cfg);
        for _ in 0..200 {
            bird.apply_decision(false, &cfg);
            bird.integrate(&cfg);
            assert!(bird.vel_y <= cfg.max_descent_speed);
        }
        assert_eq!(bird.vel_y, cfg.max_descent_speed);
    }

    #[test]
    fn flap_overrides_velocity_and_rotation() {
        let cfg = SimConfig::default();
        let mut bird = Bird::spawn(&cfg);
        for _ in 0..30 {
            bird.apply_decision(false, &cfg);
            bird.update_rotation(&cfg);
        }
        assert!(bird.rotation < cfg.flap_rotation);
        bird.apply_decision(true, &cfg);
        assert_eq!(bird.vel_y, cfg.flap_impulse);
        bird.update_rotation(&cfg);
        assert_eq!(bird.rotation, cfg.flap_rotation);
        assert!(!bird.flapped);
    }

    #[test]
    fn rotation_clamps_at_most_nose_down() {
        let cfg = SimConfig::default();
        let mut bird = Bird::spawn(&cfg);
        for _ in 0..100 {
            bird.update_rotation(&cfg);
        }
        assert!(bird.rotation >= cfg.min_rotation);
        assert!(bird.rotation < cfg.min_rotation + cfg.rotation_rate);
    }

    #[test]
    fn descent_stops_at_the_ground_line() {
        let cfg = SimConfig::default();
        let mut bird = Bird::spawn(&cfg);
        for _ in 0..500 {
            bird.apply_decision(false, &cfg);
            bird.integrate(&cfg);
        }
        assert!(bird.bottom() <= cfg.ground_y);
    }

    #[test]
    fn ascent_stops_at_the_field_top() {
        let cfg = SimConfig::default();
        let mut bird = Bird::spawn(&cfg);
        for _ in 0..500 {
            bird.apply_decision(true, &cfg);
            bird.integrate(&cfg);
        }
        assert_eq!(bird.y, 0.0);
    }
}
