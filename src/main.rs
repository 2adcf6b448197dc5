// What you SEE:
// • Window 1: a wrapped gift. Click it; it wobbles, opens, and fireworks start.
//   Rockets launch on their own every ~1.3 s; hold Left Mouse to fire rapidly
//   at the cursor.
// • Window 2: the gift picture rebuilt from thousands of rising colored dots.
// • ESC (or closing either window) quits.
//
// Optional: pass a JSON config file as the first argument (see config.rs).

mod canvas;
mod config;
mod draw;
mod error;
mod firework;
mod flow;
mod particle;
mod random;
mod reveal;
mod show;
mod types;

use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use canvas::{Canvas, Rgba};
use config::Config;
use draw::{draw_text_5x7, Drawer, FrameClock};
use error::Error;
use flow::{Flow, Grid, DETAIL, FLOW_SIZE};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use reveal::{Reveal, RevealEvent};
use show::Show;

/// The picture the flow effect is built from.
const GIFT_IMAGE: &[u8] = include_bytes!("../assets/gift.png");

/// Decode + sample the flow image (embedded unless the config names a file).
fn load_grid(cfg: &Config) -> Result<Grid, Error> {
    match &cfg.image {
        Some(path) => {
            let bytes = std::fs::read(Path::new(path))
                .map_err(|e| Error::ImageDecode(format!("Read {path}: {e}")))?;
            Grid::from_bytes(&bytes, FLOW_SIZE, DETAIL)
        }
        None => Grid::from_bytes(GIFT_IMAGE, FLOW_SIZE, DETAIL),
    }
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = Config::from_args()?;
    let seed = cfg.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("Seed: {seed}");

    /* --- Windows + surfaces ---
       Visual: two windows open, both black. */
    let mut fw_window = Drawer::new("Gift — Fireworks", cfg.width, cfg.height, cfg.fps)?;
    let mut fw_canvas = Canvas::new(cfg.width, cfg.height);
    let size = FLOW_SIZE as usize;
    let mut flow_window = Drawer::new("Gift — Image Flow", size, size, cfg.fps)?;
    let mut flow_canvas = Canvas::new(size, size);

    /* --- Image flow: sample once, then it runs by itself ---
       Visual: dots begin rising from the bottom of window 2. */
    let grid = load_grid(&cfg)?;
    let mut flow = Flow::new(grid, &mut flow_canvas, cfg.flow_particles, Pcg32::seed_from_u64(seed.wrapping_add(1)));

    /* --- Fireworks, gated by the gift reveal --- */
    let mut show = Show::new(cfg.width, cfg.height, Pcg32::seed_from_u64(seed));
    let mut reveal = Reveal::new();
    if cfg.skip_reveal {
        reveal.click();
        for event in reveal.update(Duration::from_secs(60)) {
            if event == RevealEvent::Start {
                show.start();
            }
        }
    }

    /* --- HUD / FPS --- */
    let mut clock = FrameClock::new(cfg.fps);
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while fw_window.is_open()
        && flow_window.is_open()
        && !fw_window.esc_pressed()
        && !flow_window.esc_pressed()
    {
        let dt = clock.wait();

        /* 1) Reveal: the first click opens the gift; timers do the rest. */
        if fw_window.clicked_once() {
            reveal.click();
        }
        for event in reveal.update(dt) {
            match event {
                RevealEvent::Start => show.start(),
                RevealEvent::Video => log::info!("Video cue: gift opened"),
                RevealEvent::Stage(_) => {}
            }
        }

        /* 2) Fireworks frame (fades itself once running; hard clear before that). */
        if !show.is_running() {
            fw_canvas.clear();
        }
        show.tick(&mut fw_canvas, fw_window.pointer());
        reveal.draw(&mut fw_canvas);
        if cfg.show_fps {
            draw_text_5x7(&mut fw_canvas.fb, 8, 8, &hud_fps_text, Rgba::WHITE.to_u32());
        }
        fw_window.present(&fw_canvas.fb)?;

        /* 3) Image flow frame. */
        flow.tick(&mut flow_canvas);
        flow_window.present(&flow_canvas.fb)?;

        /* 4) FPS counter (debug log + HUD once per second) */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::debug!(
                "FPS: {fps:.1} | rockets: {} | sparks: {}",
                show.fireworks().len(),
                show.particles().len()
            );
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    log::info!("Window closed, bye");
    Ok(())
}
