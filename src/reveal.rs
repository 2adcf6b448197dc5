// The gift box that opens before the show.
// Visual sequence on the fireworks window:
// 1) A wrapped box waits with a "CLICK THE GIFT" hint.
// 2) After the click it wobbles,
// 3) the lid lifts off,
// 4) the box bursts open and the fireworks begin,
// then the box is gone for good.

use std::time::Duration;

use crate::canvas::{Canvas, Composite, Rgba};
use crate::draw::draw_text_5x7;

/// How long each stage lasts once the sequence is armed, in milliseconds.
pub const STAGE_DELAYS_MS: [u64; 4] = [2000, 2000, 1000, 1000];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Stage 1: waiting for the click.
    Wrapped,
    /// Stage 2.
    Shaking,
    /// Stage 3.
    Opening,
    /// Stage 4: the show starts on entry.
    Open,
    /// Sequence finished, nothing left to draw.
    Done,
}

impl Stage {
    fn next(self) -> Stage {
        match self {
            Stage::Wrapped => Stage::Shaking,
            Stage::Shaking => Stage::Opening,
            Stage::Opening => Stage::Open,
            Stage::Open | Stage::Done => Stage::Done,
        }
    }

    fn delay(self) -> Option<Duration> {
        let idx = match self {
            Stage::Wrapped => 0,
            Stage::Shaking => 1,
            Stage::Opening => 2,
            Stage::Open => 3,
            Stage::Done => return None,
        };
        Some(Duration::from_millis(STAGE_DELAYS_MS[idx]))
    }
}

/// Side effects the caller performs when the sequence moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    Stage(Stage),
    /// Start the fireworks loop. Emitted once.
    Start,
    /// Cue the embedded video. Emitted once, right after `Start`.
    Video,
}

pub struct Reveal {
    stage: Stage,
    armed: bool,
    in_stage: Duration,
    started: bool,
}

impl Default for Reveal {
    fn default() -> Self {
        Self::new()
    }
}

impl Reveal {
    pub fn new() -> Self {
        Self { stage: Stage::Wrapped, armed: false, in_stage: Duration::ZERO, started: false }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The click only counts while the box is still wrapped.
    pub fn click(&mut self) {
        if self.stage == Stage::Wrapped && !self.armed {
            log::info!("Gift clicked");
            self.armed = true;
            self.in_stage = Duration::ZERO;
        }
    }

    /// Advance the timers by `dt`. A long `dt` can cross several stages at once.
    pub fn update(&mut self, dt: Duration) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        if !self.armed {
            return events;
        }

        self.in_stage += dt;
        while let Some(delay) = self.stage.delay() {
            if self.in_stage < delay {
                break;
            }
            self.in_stage -= delay;
            self.stage = self.stage.next();
            log::info!("Reveal stage -> {:?}", self.stage);
            events.push(RevealEvent::Stage(self.stage));

            if self.stage == Stage::Open && !self.started {
                self.started = true;
                events.push(RevealEvent::Start);
                events.push(RevealEvent::Video);
            }
        }
        events
    }

    /// Draw the box for the current stage, centered near the bottom of `canvas`.
    pub fn draw(&self, canvas: &mut Canvas) {
        if self.stage == Stage::Done {
            return;
        }
        canvas.set_composite(Composite::SourceOver);

        let w = canvas.width() as i32;
        let h = canvas.height() as i32;
        let bw = (w / 4).max(40);
        let bh = bw * 3 / 4;
        let lid_h = bh / 5;
        let mut x = (w - bw) / 2;
        let y = h - bh - h / 6;

        let t = self.in_stage.as_secs_f32();
        let lid_lift = match self.stage {
            Stage::Shaking => {
                // Wobble a few pixels left/right
                x += ((t * 30.0).sin() * 4.0) as i32;
                0
            }
            Stage::Opening => (t * 60.0) as i32,
            Stage::Open => bh,
            _ => 0,
        };

        let body = Rgba::rgb(200, 30, 60);
        let lid = Rgba::rgb(230, 50, 80);
        let ribbon = Rgba::rgb(250, 215, 90);

        canvas.fill_rect(x, y, bw, bh, body);
        canvas.fill_rect(x + bw / 2 - bw / 12, y, bw / 6, bh, ribbon);
        canvas.fill_rect(x, y + bh / 2 - bh / 12, bw, bh / 6, ribbon);

        if self.stage != Stage::Open {
            let ly = y - lid_h - lid_lift;
            canvas.fill_rect(x - bw / 16, ly, bw + bw / 8, lid_h, lid);
            canvas.fill_rect(x + bw / 2 - bw / 12, ly, bw / 6, lid_h, ribbon);
        }

        if self.stage == Stage::Wrapped && !self.armed {
            let text = "CLICK THE GIFT";
            let tx = (w - text.len() as i32 * 6) / 2;
            draw_text_5x7(&mut canvas.fb, tx, y + bh + 12, text, Rgba::WHITE.to_u32());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_waits_for_click() {
        let mut r = Reveal::new();
        assert!(r.update(ms(60_000)).is_empty());
        assert_eq!(r.stage(), Stage::Wrapped);
    }

    #[test]
    fn test_stage_timing() {
        let mut r = Reveal::new();
        r.click();
        assert!(r.update(ms(1999)).is_empty());
        assert_eq!(r.update(ms(1)), vec![RevealEvent::Stage(Stage::Shaking)]);
        assert!(r.update(ms(1999)).is_empty());
        assert_eq!(r.update(ms(1)), vec![RevealEvent::Stage(Stage::Opening)]);
        assert_eq!(
            r.update(ms(1000)),
            vec![RevealEvent::Stage(Stage::Open), RevealEvent::Start, RevealEvent::Video]
        );
        assert!(r.update(ms(999)).is_empty());
        assert_eq!(r.update(ms(1)), vec![RevealEvent::Stage(Stage::Done)]);
        assert!(r.update(ms(10_000)).is_empty());
    }

    #[test]
    fn test_start_fires_once_even_with_big_step() {
        let mut r = Reveal::new();
        r.click();
        let events = r.update(ms(100_000));
        assert_eq!(events.iter().filter(|e| **e == RevealEvent::Start).count(), 1);
        assert_eq!(r.stage(), Stage::Done);
        r.click();
        assert!(r.update(ms(100_000)).is_empty());
    }

    #[test]
    fn test_later_clicks_ignored() {
        let mut r = Reveal::new();
        r.click();
        r.update(ms(2500));
        assert_eq!(r.stage(), Stage::Shaking);
        r.click();
        assert!(r.update(ms(1499)).is_empty());
        assert_eq!(r.update(ms(1)), vec![RevealEvent::Stage(Stage::Opening)]);
    }

    #[test]
    fn test_draws_until_done() {
        let mut cv = Canvas::new(320, 240);
        let mut r = Reveal::new();
        r.draw(&mut cv);
        assert!(cv.fb.pixels.iter().any(|&p| p != 0));

        r.click();
        r.update(ms(6000));
        let mut cv = Canvas::new(320, 240);
        r.draw(&mut cv);
        assert!(cv.fb.pixels.iter().all(|&p| p == 0));
    }
}
