// Rocket that climbs from a launch point to a target, then bursts.
// Visual: a short bright streak racing toward a pulsing ring.

use rand::Rng;

use crate::canvas::{Canvas, Rgba};
use crate::random::{distance, random};
use crate::types::{Point, Trail};

pub const FIREWORK_TRAIL: usize = 3;
const START_SPEED: f32 = 2.0;
const ACCELERATION: f32 = 1.05;
const RING_MIN: f32 = 1.0;
const RING_MAX: f32 = 8.0;
const RING_STEP: f32 = 0.3;

/// What happened during one `Firework::update`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flight {
    Climbing,
    /// The next step would reach the target; the caller bursts it at this point.
    Arrived(Point),
}

#[derive(Debug, Clone)]
pub struct Firework {
    pub pos: Point,
    origin: Point,
    target: Point,
    distance_to_target: f32,
    distance_traveled: f32,
    trail: Trail<FIREWORK_TRAIL>,
    angle: f32,
    speed: f32,
    acceleration: f32,
    brightness: f32,
    target_radius: f32,
}

impl Firework {
    pub fn new<R: Rng + ?Sized>(origin: Point, target: Point, rng: &mut R) -> Self {
        Self {
            pos: origin,
            origin,
            target,
            distance_to_target: distance(origin.x, origin.y, target.x, target.y),
            distance_traveled: 0.0,
            trail: Trail::filled(origin),
            angle: (target.y - origin.y).atan2(target.x - origin.x),
            speed: START_SPEED,
            acceleration: ACCELERATION,
            brightness: random(rng, 50.0, 70.0),
            target_radius: RING_MIN,
        }
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn distance_to_target(&self) -> f32 {
        self.distance_to_target
    }

    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    pub fn trail(&self) -> &Trail<FIREWORK_TRAIL> {
        &self.trail
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn target_radius(&self) -> f32 {
        self.target_radius
    }

    /// Advance one tick.
    pub fn update(&mut self) -> Flight {
        self.trail.push(self.pos);

        if self.target_radius < RING_MAX {
            self.target_radius += RING_STEP;
        } else {
            self.target_radius = RING_MIN;
        }

        self.speed *= self.acceleration;
        let vx = self.angle.cos() * self.speed;
        let vy = self.angle.sin() * self.speed;

        // Measured from the origin each tick, not accumulated
        self.distance_traveled =
            distance(self.origin.x, self.origin.y, self.pos.x + vx, self.pos.y + vy);

        if self.distance_traveled >= self.distance_to_target {
            Flight::Arrived(self.target)
        } else {
            self.pos.x += vx;
            self.pos.y += vy;
            Flight::Climbing
        }
    }

    /// Streak from the oldest trail point plus the target ring, colored by the shared `hue`.
    pub fn draw(&self, canvas: &mut Canvas, hue: f32) {
        let color = Rgba::hsl(hue, 100.0, self.brightness);
        canvas.stroke_line(self.trail.oldest(), self.pos, color);
        canvas.stroke_circle(self.target, self.target_radius, color);
    }
}
