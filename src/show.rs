// Fireworks frame loop: owns every live rocket and spark plus the launch timers.
// Visual outcomes per tick:
// - Old frames fade under instead of being cleared, leaving soft trails.
// - Rockets and sparks are drawn additively, so crowded bursts glow brighter.
// - A rocket launches from bottom-center on its own every so often, or rapidly
//   toward the pointer while it is held down.

use rand::Rng;

use crate::canvas::{Canvas, Composite, Rgba};
use crate::firework::{Firework, Flight};
use crate::particle::{Fade, Particle};
use crate::random::random;
use crate::types::{Point, PointerState};

/// Sparks per burst.
pub const BURST_PARTICLES: usize = 30;
/// Ticks between automatic launches.
pub const AUTO_LAUNCH_TICKS: u32 = 80;
/// Ticks between launches while the pointer is held.
pub const POINTER_LAUNCH_TICKS: u32 = 5;
const HUE_STEP: f32 = 0.5;
const FADE_ALPHA: f32 = 0.5;

/// The whole mutable fireworks state, replacing page-level globals.
pub struct Show<R: Rng> {
    width: f32,
    height: f32,
    fireworks: Vec<Firework>,
    particles: Vec<Particle>,
    hue: f32,
    auto_tick: u32,
    pointer_tick: u32,
    running: bool,
    rng: R,
}

impl<R: Rng> Show<R> {
    pub fn new(width: usize, height: usize, rng: R) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            fireworks: Vec::new(),
            particles: Vec::new(),
            hue: 120.0,
            auto_tick: 0,
            pointer_tick: 0,
            running: false,
            rng,
        }
    }

    /// Begin ticking. Calling it again changes nothing.
    pub fn start(&mut self) {
        if !self.running {
            log::info!("Fireworks loop started ({}x{})", self.width, self.height);
            self.running = true;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// Launch one rocket from bottom-center toward `target`.
    pub fn launch(&mut self, target: Point) {
        let origin = Point::new(self.width / 2.0, self.height);
        self.fireworks.push(Firework::new(origin, target, &mut self.rng));
    }

    /// Append one burst of sparks at (x,y) using the current hue.
    pub fn create_particles(&mut self, at: Point) {
        let hue = self.hue;
        let rng = &mut self.rng;
        self.particles
            .extend((0..BURST_PARTICLES).map(|_| Particle::new(at, hue, rng)));
    }

    /// One animation frame. Does nothing until `start` has been called.
    pub fn tick(&mut self, canvas: &mut Canvas, pointer: PointerState) {
        if !self.running {
            return;
        }

        self.hue += HUE_STEP;

        /* Fade the previous frame under (not a hard clear): this is the long trail. */
        canvas.set_composite(Composite::DestinationOut);
        canvas.fill_all(Rgba::BLACK.with_alpha(FADE_ALPHA));
        canvas.set_composite(Composite::Lighter);

        /* Rockets: reverse walk; swap_remove only pulls in already-visited entries. */
        for i in (0..self.fireworks.len()).rev() {
            self.fireworks[i].draw(canvas, self.hue);
            if let Flight::Arrived(at) = self.fireworks[i].update() {
                self.create_particles(at);
                self.fireworks.swap_remove(i);
            }
        }

        /* Sparks, same walk (fresh bursts from above included). */
        for i in (0..self.particles.len()).rev() {
            self.particles[i].draw(canvas);
            if self.particles[i].update() == Fade::Expired {
                self.particles.swap_remove(i);
            }
        }

        /* Automatic launches, only while the pointer is up. Counters stop at their threshold. */
        if self.auto_tick < AUTO_LAUNCH_TICKS {
            self.auto_tick += 1;
        }
        if self.auto_tick >= AUTO_LAUNCH_TICKS && !pointer.down {
            let target = Point::new(
                random(&mut self.rng, 0.0, self.width),
                random(&mut self.rng, 0.0, self.height / 2.0),
            );
            self.launch(target);
            self.auto_tick = 0;
        }

        /* Pointer launches, only while the pointer is held. */
        if self.pointer_tick < POINTER_LAUNCH_TICKS {
            self.pointer_tick += 1;
        }
        if self.pointer_tick >= POINTER_LAUNCH_TICKS && pointer.down {
            self.launch(Point::new(pointer.x, pointer.y));
            self.pointer_tick = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const W: usize = 320;
    const H: usize = 240;

    fn show() -> (Show<Pcg32>, Canvas) {
        let mut s = Show::new(W, H, Pcg32::seed_from_u64(42));
        s.start();
        (s, Canvas::new(W, H))
    }

    /// Runs `ticks` frames and records the tick numbers (1-based) where a rocket appeared.
    fn launch_ticks(s: &mut Show<Pcg32>, cv: &mut Canvas, pointer: PointerState, ticks: u32) -> Vec<u32> {
        let mut out = Vec::new();
        for t in 1..=ticks {
            let before = s.fireworks().len();
            s.tick(cv, pointer);
            if s.fireworks().len() > before {
                out.push(t);
            }
        }
        out
    }

    #[test]
    fn test_idle_until_started() {
        let mut s = Show::new(W, H, Pcg32::seed_from_u64(1));
        let mut cv = Canvas::new(W, H);
        for _ in 0..200 {
            s.tick(&mut cv, PointerState::default());
        }
        assert!(s.fireworks().is_empty());
        assert_eq!(s.hue(), 120.0);
    }

    #[test]
    fn test_hue_advances_every_tick() {
        let (mut s, mut cv) = show();
        for _ in 0..10 {
            s.tick(&mut cv, PointerState::default());
        }
        assert_eq!(s.hue(), 125.0);
    }

    #[test]
    fn test_auto_launch_every_80_ticks() {
        let (mut s, mut cv) = show();
        let mut launches = Vec::new();
        for t in 1..=400u32 {
            s.tick(&mut cv, PointerState::default());
            // The auto counter only returns to zero when it launches
            if s.auto_tick == 0 {
                launches.push(t);
            }
        }
        assert_eq!(launches, vec![80, 160, 240, 320, 400]);
    }

    #[test]
    fn test_pointer_held_suppresses_auto_launch() {
        let (mut s, mut cv) = show();
        let held = PointerState { down: true, x: 100.0, y: 50.0 };
        for _ in 0..200 {
            s.tick(&mut cv, held);
        }
        assert_eq!(s.auto_tick, AUTO_LAUNCH_TICKS);
        // Releasing lets the overdue auto launch fire at once
        s.tick(&mut cv, PointerState::default());
        assert_eq!(s.auto_tick, 0);
    }

    #[test]
    fn test_counters_stay_at_threshold() {
        let (mut s, mut cv) = show();
        let held = PointerState { down: true, x: 100.0, y: 50.0 };
        for _ in 0..1000 {
            s.tick(&mut cv, held);
            assert!(s.auto_tick <= AUTO_LAUNCH_TICKS);
        }
        for _ in 0..1000 {
            s.tick(&mut cv, PointerState::default());
            assert!(s.pointer_tick <= POINTER_LAUNCH_TICKS);
        }
        assert_eq!(s.pointer_tick, POINTER_LAUNCH_TICKS);
        // Pressing again fires on the very first held tick
        s.tick(&mut cv, held);
        assert_eq!(s.pointer_tick, 0);
    }

    #[test]
    fn test_auto_launch_adds_one_firework() {
        let (mut s, mut cv) = show();
        for _ in 0..79 {
            s.tick(&mut cv, PointerState::default());
        }
        assert!(s.fireworks().is_empty());
        s.tick(&mut cv, PointerState::default());
        assert_eq!(s.fireworks().len(), 1);
        let fw = &s.fireworks()[0];
        assert!(fw.target().y < H as f32 / 2.0);
        assert!(fw.target().x >= 0.0 && fw.target().x < W as f32);
    }

    #[test]
    fn test_pointer_held_launches_every_5_ticks() {
        let (mut s, mut cv) = show();
        let held = PointerState { down: true, x: 100.0, y: 50.0 };
        let ticks = launch_ticks(&mut s, &mut cv, held, 30);
        assert_eq!(ticks, vec![5, 10, 15, 20, 25, 30]);
        // No automatic rockets sneak in while held
        assert!(s.fireworks().iter().all(|f| f.target() == Point::new(100.0, 50.0)));
    }

    #[test]
    fn test_arrival_bursts_30_and_removes() {
        let (mut s, mut cv) = show();
        // Target right next to the origin: arrives on the first update
        s.launch(Point::new(W as f32 / 2.0, H as f32 - 1.0));
        s.tick(&mut cv, PointerState::default());
        assert!(s.fireworks().is_empty());
        assert_eq!(s.particles().len(), BURST_PARTICLES);
        // Sparks were spawned at the target and have had one update since
        for p in s.particles() {
            assert_eq!(p.trail().newest(), Point::new(W as f32 / 2.0, H as f32 - 1.0));
        }
    }

    #[test]
    fn test_removal_never_skips_neighbours() {
        let (mut s, mut cv) = show();
        let origin_y = H as f32;
        // Two rockets that arrive at once, one that keeps climbing, interleaved
        s.launch(Point::new(W as f32 / 2.0, origin_y - 1.0));
        s.launch(Point::new(10.0, 10.0));
        s.launch(Point::new(W as f32 / 2.0 + 1.0, origin_y - 1.0));
        s.tick(&mut cv, PointerState::default());
        assert_eq!(s.fireworks().len(), 1);
        assert_eq!(s.fireworks()[0].target(), Point::new(10.0, 10.0));
        assert_eq!(s.particles().len(), 2 * BURST_PARTICLES);
    }

    #[test]
    fn test_particles_drain() {
        let (mut s, mut cv) = show();
        s.create_particles(Point::new(50.0, 50.0));
        assert_eq!(s.particles().len(), BURST_PARTICLES);
        // Longest spark life is under 70 ticks; the first auto launch is at 80
        for _ in 0..70 {
            s.tick(&mut cv, PointerState::default());
        }
        assert!(s.particles().is_empty());
    }
}
