//! Software-framebuffer presentation layer. Consumes per-tick snapshots of
//! the round (positions, rotations, alive flags, scores) and never touches
//! simulation state.

use crate::round::Round;
use crate::sprite::{PIPE_HEIGHT, Sprite, SpriteSet};

/// RGBA framebuffer with blending and text primitives.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(frame.len(), (width * height * 4) as usize);
        Self { frame, width, height }
    }

    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        for px in self.frame.chunks_exact_mut(4) {
            px[0] = r;
            px[1] = g;
            px[2] = b;
            px[3] = 255;
        }
    }

    pub fn blend_pixel(&mut self, x: i32, y: i32, color: (u8, u8, u8, u8)) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        let (r, g, b, a) = color;
        let a = a as u16;
        let ia = 255 - a;
        self.frame[idx] = ((r as u16 * a + self.frame[idx] as u16 * ia) / 255) as u8;
        self.frame[idx + 1] = ((g as u16 * a + self.frame[idx + 1] as u16 * ia) / 255) as u8;
        self.frame[idx + 2] = ((b as u16 * a + self.frame[idx + 2] as u16 * ia) / 255) as u8;
        self.frame[idx + 3] = 255;
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: (u8, u8, u8, u8)) {
        for py in y..y + h as i32 {
            for px in x..x + w as i32 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: (u8, u8, u8, u8)) {
        if w == 0 || h == 0 {
            return;
        }
        let (x2, y2) = (x + w as i32 - 1, y + h as i32 - 1);
        for px in x..=x2 {
            self.blend_pixel(px, y, color);
            self.blend_pixel(px, y2, color);
        }
        for py in y..=y2 {
            self.blend_pixel(x, py, color);
            self.blend_pixel(x2, py, color);
        }
    }

    /// Alpha-blended sprite blit; positions truncate to the pixel grid and
    /// may be off-screen.
    pub fn blit(&mut self, sprite: &Sprite, x: f32, y: f32) {
        self.blit_offset(sprite, x as i32, y as i32, 255);
    }

    fn blit_offset(&mut self, sprite: &Sprite, ox: i32, oy: i32, alpha: u8) {
        for sy in 0..sprite.height {
            for sx in 0..sprite.width {
                let idx = ((sy * sprite.width + sx) * 4) as usize;
                let a = sprite.rgba[idx + 3] as u16 * alpha as u16 / 255;
                if a == 0 {
                    continue;
                }
                self.blend_pixel(
                    ox + sx as i32,
                    oy + sy as i32,
                    (sprite.rgba[idx], sprite.rgba[idx + 1], sprite.rgba[idx + 2], a as u8),
                );
            }
        }
    }

    /// Blit rotated `degrees` counter-clockwise around the sprite center,
    /// nearest-neighbour sampled.
    pub fn blit_rotated(&mut self, sprite: &Sprite, x: f32, y: f32, degrees: f32, alpha: u8) {
        if degrees == 0.0 {
            self.blit_offset(sprite, x as i32, y as i32, alpha);
            return;
        }
        let rad = degrees.to_radians();
        let (sin, cos) = (rad.sin(), rad.cos());
        let (cx, cy) = (sprite.width as f32 / 2.0, sprite.height as f32 / 2.0);
        // Half-extent of the rotated bounding box.
        let hw = (cx * cos.abs() + cy * sin.abs()).ceil() as i32;
        let hh = (cx * sin.abs() + cy * cos.abs()).ceil() as i32;
        let (center_x, center_y) = ((x + cx) as i32, (y + cy) as i32);
        for dy in -hh..=hh {
            for dx in -hw..=hw {
                // Inverse rotation back into sprite space. Screen y grows
                // downward, so a positive angle tilts the nose up.
                let sx = cx + dx as f32 * cos - dy as f32 * sin;
                let sy = cy + dx as f32 * sin + dy as f32 * cos;
                if sx < 0.0 || sy < 0.0 || sx >= sprite.width as f32 || sy >= sprite.height as f32
                {
                    continue;
                }
                let idx = ((sy as u32 * sprite.width + sx as u32) * 4) as usize;
                let a = sprite.rgba[idx + 3] as u16 * alpha as u16 / 255;
                if a == 0 {
                    continue;
                }
                self.blend_pixel(
                    center_x + dx,
                    center_y + dy,
                    (sprite.rgba[idx], sprite.rgba[idx + 1], sprite.rgba[idx + 2], a as u8),
                );
            }
        }
    }

    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: u32, color: (u8, u8, u8, u8)) {
        let mut cx = x;
        for ch in text.chars() {
            cx += self.draw_char(ch, cx, y, scale, color);
        }
    }

    fn draw_char(&mut self, ch: char, x: i32, y: i32, scale: u32, color: (u8, u8, u8, u8)) -> i32 {
        if let Some(rows) = glyph_5x7(ch) {
            for (ry, row) in rows.iter().enumerate() {
                for rx in 0..5u32 {
                    if (row >> (4 - rx)) & 1 == 1 {
                        self.fill_rect(
                            x + (rx * scale) as i32,
                            y + (ry as u32 * scale) as i32,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
        (5 * scale + scale) as i32
    }

    /// Bar chart of recent values, newest on the right.
    pub fn draw_chart(&mut self, x: i32, y: i32, w: u32, h: u32, data: &[u32]) {
        self.stroke_rect(x, y, w, h, (200, 200, 200, 120));
        let max_val = data.iter().copied().max().unwrap_or(0);
        if data.is_empty() || max_val == 0 {
            return;
        }
        let bars = data.len().min(w as usize / 6);
        let bar_w = (w / bars as u32).max(2);
        for (i, &v) in data[data.len() - bars..].iter().enumerate() {
            let bh = v * (h - 2) / max_val;
            let bx = x + 1 + i as i32 * bar_w as i32;
            let by = y + h as i32 - 1 - bh as i32;
            self.fill_rect(bx, by, bar_w - 1, bh, (120, 180, 255, 160));
        }
    }

    pub fn draw_button(&mut self, x: i32, y: i32, w: u32, h: u32, label: &str) {
        self.fill_rect(x, y, w, h, (40, 40, 60, 160));
        self.stroke_rect(x, y, w, h, (200, 200, 220, 120));
        self.draw_text(label, x + 6, y + (h as i32 / 2 - 4), 1, (230, 240, 255, 255));
    }
}

pub fn point_in_rect(px: u32, py: u32, x: i32, y: i32, w: u32, h: u32) -> bool {
    let (px, py) = (px as i32, py as i32);
    px >= x && py >= y && px < x + w as i32 && py < y + h as i32
}

const SKY: (u8, u8, u8) = (112, 197, 206);

/// Draw the whole field from the round's per-tick snapshot: sky, pipes,
/// scrolling ground, then every alive bird. With more than one bird each is
/// semi-transparent so overlaps stay readable.
pub fn render_scene(canvas: &mut Canvas, round: &Round, sprites: &SpriteSet) {
    canvas.clear(SKY.0, SKY.1, SKY.2);

    for pair in round.field.iter() {
        canvas.blit(&sprites.pipe_upper, pair.x, pair.gap_top - PIPE_HEIGHT as f32);
        canvas.blit(&sprites.pipe_lower, pair.x, pair.gap_bottom);
    }

    canvas.blit(&sprites.ground, round.base_x, round.cfg.ground_y);

    let alpha = if round.birds.len() > 1 { 150 } else { 255 };
    let frame = round.frame_index();
    let bird_x = round.cfg.bird_x();
    for bird in round.birds.iter().filter(|b| b.alive) {
        let visible_rot = bird.rotation.min(round.cfg.visible_rotation_max);
        canvas.blit_rotated(&sprites.bird[frame], bird_x, bird.y, visible_rot, alpha);
    }

    // Best score across the flock, centered near the top.
    let text = round.max_score().to_string();
    let text_w = text.len() as i32 * 12;
    canvas.draw_text(
        &text,
        (canvas.width as i32 - text_w) / 2,
        (round.cfg.field_height * 0.1) as i32,
        2,
        (255, 255, 255, 255),
    );
}

fn glyph_5x7(ch: char) -> Option<[u8; 7]> {
    let c = ch.to_ascii_uppercase();
    Some(match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001, 0b10001],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000],
        '/' => [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        ' ' => [0b00000; 7],
        _ => return None,
    })
}
