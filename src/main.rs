use std::time::{Duration, Instant};

use anyhow::Context;
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;
use winit_input_helper::WinitInputHelper;

use flappy_flock::agent::{Agent, RandomAgent};
use flappy_flock::config::SimConfig;
use flappy_flock::draw::{Canvas, point_in_rect, render_scene};
use flappy_flock::round::{Phase, Round};
use flappy_flock::sprite::SpriteSet;

const CONFIG_FILE: &str = "flock.json";
const NUM_AGENTS: usize = 10;
const TICK_MS: u64 = 33; // ~30 simulation ticks per second at 1x
/// Ticks the terminal layout stays on screen before the next round.
const GAME_OVER_HOLD: u64 = 60;

fn fresh_round(cfg: &SimConfig) -> Round {
    let agents: Vec<Box<dyn Agent>> = (0..NUM_AGENTS)
        .map(|_| Box::new(RandomAgent::new()) as Box<dyn Agent>)
        .collect();
    Round::new(cfg.clone(), agents, rand::random())
}

fn main() -> anyhow::Result<()> {
    let cfg = SimConfig::load(CONFIG_FILE)?;
    let (width, height) = (cfg.field_width as u32, cfg.field_height as u32);
    let sprites = SpriteSet::generate(width, height, cfg.ground_y as u32);

    let event_loop = EventLoop::new();
    let mut input = WinitInputHelper::new();

    let window = WindowBuilder::new()
        .with_title("Flappy Flock")
        .with_inner_size(LogicalSize::new((width * 2) as f64, (height * 2) as f64))
        .with_resizable(false)
        .build(&event_loop)
        .context("creating window")?;

    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(width, height, surface_texture).context("creating framebuffer")?
    };

    let mut round = fresh_round(&cfg);
    let mut paused = false;
    let mut ticks_per_frame: u32 = 1;
    let mut rounds_played: u32 = 0;
    let mut round_best: Vec<u32> = Vec::new(); // best score per finished round
    let mut hold_left: u64 = 0;
    let mut last_update = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if let Event::RedrawRequested(_) = event {
            let mut canvas = Canvas::new(pixels.frame_mut(), width, height);
            render_scene(&mut canvas, &round, &sprites);

            // ── HUD panel ──
            let (px, py): (i32, i32) = (4, 4);
            let (pw, ph): (u32, u32) = (140, 164);
            canvas.fill_rect(px, py, pw, ph, (0, 0, 0, 140));
            canvas.stroke_rect(px, py, pw, ph, (255, 255, 255, 60));
            canvas.draw_text("FLOCK", px + 6, py + 6, 1, (180, 220, 255, 255));
            canvas.draw_text(
                &format!("ROUND: {}", rounds_played + 1),
                px + 6,
                py + 18,
                1,
                (230, 230, 230, 255),
            );
            canvas.draw_text(
                &format!("ALIVE: {}/{}", round.alive_count(), round.birds.len()),
                px + 6,
                py + 30,
                1,
                (230, 230, 230, 255),
            );
            canvas.draw_text(
                &format!("TICKS: {}", round.ticks),
                px + 6,
                py + 42,
                1,
                (200, 200, 200, 255),
            );
            canvas.draw_text(
                &format!("SPEED: {}", ticks_per_frame),
                px + 6,
                py + 54,
                1,
                (200, 220, 255, 255),
            );
            canvas.draw_chart(px + 6, py + 68, pw - 12, 36, &round_best);

            let btn_y = py + 110;
            let label = if paused { "RESUME  P" } else { "PAUSE   P" };
            canvas.draw_button(px + 6, btn_y, pw - 12, 14, label);
            canvas.draw_button(px + 6, btn_y + 18, pw - 12, 14, "SPEED   +/-");
            canvas.draw_button(px + 6, btn_y + 36, pw - 12, 14, "RESTART R");

            if round.phase == Phase::Ended {
                canvas.draw_text("ROUND OVER", 84, 200, 2, (255, 100, 100, 255));
                if let Some(result) = round.result() {
                    canvas.draw_text(
                        &format!("SCORE: {}", result.score),
                        96,
                        224,
                        2,
                        (255, 255, 255, 255),
                    );
                }
            } else if paused {
                canvas.draw_text("PAUSED", 108, 200, 2, (255, 255, 100, 255));
            }

            if pixels.render().is_err() {
                *control_flow = ControlFlow::Exit;
            }
        }

        if input.update(&event) {
            if input.key_pressed(VirtualKeyCode::Escape)
                || input.close_requested()
                || input.destroyed()
            {
                *control_flow = ControlFlow::Exit;
                return;
            }

            if input.key_pressed(VirtualKeyCode::P) {
                paused = !paused;
            }
            if input.key_pressed(VirtualKeyCode::R) {
                if round.phase == Phase::Ended {
                    rounds_played += 1;
                }
                round = fresh_round(&cfg);
                hold_left = 0;
            }
            if input.key_pressed(VirtualKeyCode::NumpadAdd)
                || input.key_pressed(VirtualKeyCode::Equals)
            {
                ticks_per_frame = ticks_per_frame.saturating_mul(2).min(64);
            }
            if input.key_pressed(VirtualKeyCode::NumpadSubtract)
                || input.key_pressed(VirtualKeyCode::Minus)
            {
                ticks_per_frame = (ticks_per_frame / 2).max(1);
            }

            // Mouse clicks on the HUD buttons (framebuffer coordinates).
            if let Some((mx, my)) = input.mouse() {
                if input.mouse_pressed(0) {
                    if let Ok((fx, fy)) = pixels.window_pos_to_pixel((mx, my)) {
                        let (fx, fy) = (fx as u32, fy as u32);
                        let btn_y = 4 + 110;
                        if point_in_rect(fx, fy, 10, btn_y, 128, 14) {
                            paused = !paused;
                        } else if point_in_rect(fx, fy, 10, btn_y + 18, 128, 14) {
                            ticks_per_frame = ticks_per_frame.saturating_mul(2).min(64);
                        } else if point_in_rect(fx, fy, 10, btn_y + 36, 128, 14) {
                            if round.phase == Phase::Ended {
                                rounds_played += 1;
                            }
                            round = fresh_round(&cfg);
                            hold_left = 0;
                        }
                    }
                }
            }

            if last_update.elapsed() >= tick_duration {
                last_update = Instant::now();
                if !paused {
                    match round.phase {
                        Phase::Running => {
                            for _ in 0..ticks_per_frame {
                                round.step(&sprites);
                                if round.phase == Phase::Ended {
                                    round_best.push(round.max_score());
                                    hold_left = GAME_OVER_HOLD;
                                    break;
                                }
                            }
                        }
                        Phase::Ended => {
                            // Keep the terminal layout visible, then roll on.
                            hold_left = hold_left.saturating_sub(1);
                            if hold_left == 0 {
                                rounds_played += 1;
                                round = fresh_round(&cfg);
                            }
                        }
                    }
                }
            }

            window.request_redraw();
        }
    });
}
