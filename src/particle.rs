// One spark of a firework burst.
// Visual: flies out from the burst point, slows down, droops and fades.

use std::f32::consts::TAU;

use rand::Rng;

use crate::canvas::{Canvas, Rgba};
use crate::random::random;
use crate::types::{Point, Trail};

pub const PARTICLE_TRAIL: usize = 5;
const FRICTION: f32 = 0.95;
const GRAVITY: f32 = 1.0;
const HUE_JITTER: f32 = 20.0;

/// What happened during one `Particle::update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    Visible,
    Expired,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Point,
    trail: Trail<PARTICLE_TRAIL>,
    angle: f32,
    speed: f32,
    friction: f32,
    gravity: f32,
    hue: f32,
    brightness: f32,
    alpha: f32,
    decay: f32,
}

impl Particle {
    /// Spawn at `pos` with a hue near the current shared `hue`.
    pub fn new<R: Rng + ?Sized>(pos: Point, hue: f32, rng: &mut R) -> Self {
        Self {
            pos,
            trail: Trail::filled(pos),
            angle: random(rng, 0.0, TAU),
            speed: random(rng, 1.0, 10.0),
            friction: FRICTION,
            gravity: GRAVITY,
            hue: random(rng, hue - HUE_JITTER, hue + HUE_JITTER),
            brightness: random(rng, 50.0, 80.0),
            alpha: 1.0,
            decay: random(rng, 0.015, 0.03),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn trail(&self) -> &Trail<PARTICLE_TRAIL> {
        &self.trail
    }

    /// Advance one tick. `Expired` once another decrement would leave nothing visible.
    pub fn update(&mut self) -> Fade {
        self.trail.push(self.pos);
        self.speed *= self.friction;
        self.pos.x += self.angle.cos() * self.speed;
        // Gravity is a flat pull added every tick, independent of speed
        self.pos.y += self.angle.sin() * self.speed + self.gravity;
        self.alpha -= self.decay;

        if self.alpha <= self.decay {
            Fade::Expired
        } else {
            Fade::Visible
        }
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        let color = Rgba::hsla(self.hue, 100.0, self.brightness, self.alpha);
        canvas.stroke_line(self.trail.oldest(), self.pos, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_particle_ranges() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let p = Particle::new(Point::new(5.0, 5.0), 100.0, &mut rng);
            assert!((80.0..120.0).contains(&p.hue()));
            assert!((1.0..10.0).contains(&p.speed()));
            assert!((0.015..0.03).contains(&p.decay()));
            assert_eq!(p.alpha(), 1.0);
            assert_eq!(p.trail().oldest(), Point::new(5.0, 5.0));
        }
    }

    #[test]
    fn test_alpha_decays_until_removal() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut p = Particle::new(Point::new(0.0, 0.0), 0.0, &mut rng);
        let decay = p.decay();
        let mut ticks = 0;
        loop {
            let before = p.alpha();
            let fade = p.update();
            ticks += 1;
            assert!((before - p.alpha() - decay).abs() < 1e-6);
            assert_eq!(p.trail().len(), PARTICLE_TRAIL);
            if fade == Fade::Expired {
                assert!(p.alpha() <= decay);
                break;
            }
            assert!(p.alpha() > decay);
        }
        // 1/0.03 .. 1/0.015 ticks of life, minus the early cut-off
        assert!((30..=67).contains(&ticks), "{ticks}");
    }

    #[test]
    fn test_speed_decays_and_gravity_pulls() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut p = Particle::new(Point::new(0.0, 0.0), 0.0, &mut rng);
        let mut speed = p.speed();
        let mut y_step = f32::MIN;
        for _ in 0..60 {
            let y0 = p.pos.y;
            p.update();
            assert!(p.speed() < speed);
            speed = p.speed();
            y_step = p.pos.y - y0;
        }
        // Once the spark has slowed, the flat pull dominates and it drifts down
        assert!(y_step > 0.0);
    }
}
