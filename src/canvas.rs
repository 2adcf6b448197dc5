// Software 2D drawing surface with compositing modes.
// Visual effects provided here:
// 1) Thin stroked lines and circles (firework streaks, target rings).
// 2) Filled discs and rectangles (flow dots, full-surface fades).
// 3) Three ways new pixels mix with old ones: paint over, erase under, add light.
//
// The surface is always opaque and sits on a black page, so "erase" means
// scaling the existing color toward black.

use crate::types::{FrameBuffer, Point};

/// How newly drawn pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    /// Normal painting: `src*a + dst*(1-a)`.
    #[default]
    SourceOver,
    /// Erase under: `dst*(1-a)`, the source color is ignored.
    /// Visual: old frames fade toward black, which leaves motion trails.
    DestinationOut,
    /// Additive: `dst + src*a`, saturating at 255.
    /// Visual: overlapping sparks stack up toward white.
    Lighter,
}

/// Color with straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// `hsl(h, s%, l%)` with `h` in degrees (any value, wrapped) and `s`,`l` in percent.
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = (s / 100.0).clamp(0.0, 1.0);
        let l = (l / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = to_u8(l);
            return Self::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::rgb(
            to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_u8(hue_to_rgb(p, q, h)),
            to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }

    /// `hsla(h, s%, l%, a)`.
    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self::hsl(h, s, l).with_alpha(a)
    }

    /// Packed 0x00RRGGBB, alpha dropped.
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 { t += 1.0; }
    if t > 1.0 { t -= 1.0; }
    if t < 1.0 / 6.0 { return p + (q - p) * 6.0 * t; }
    if t < 1.0 / 2.0 { return q; }
    if t < 2.0 / 3.0 { return p + (q - p) * (2.0 / 3.0 - t) * 6.0; }
    p
}

/// Split 0x00RRGGBB into channels.
#[inline]
pub fn unpack(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

/// Put a pixel on the framebuffer if (x,y) is inside bounds, ignoring compositing.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/// A framebuffer plus the current compositing mode, like a 2D context.
pub struct Canvas {
    pub fb: FrameBuffer,
    composite: Composite,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self { fb: FrameBuffer::new(width, height), composite: Composite::SourceOver }
    }

    pub fn width(&self) -> usize {
        self.fb.width
    }

    pub fn height(&self) -> usize {
        self.fb.height
    }

    pub fn set_composite(&mut self, mode: Composite) {
        self.composite = mode;
    }

    /// Hard clear (no fade).
    pub fn clear(&mut self) {
        self.fb.clear();
    }

    /// Read one pixel back as 0x00RRGGBB.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x as usize >= self.fb.width || y as usize >= self.fb.height {
            return None;
        }
        Some(self.fb.pixels[y as usize * self.fb.width + x as usize])
    }

    /// Composite one color onto (x,y) with the current mode.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, c: Rgba) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.fb.width || y >= self.fb.height {
            return;
        }
        let idx = y * self.fb.width + x;
        self.fb.pixels[idx] = blend(self.composite, self.fb.pixels[idx], c);
    }

    /// Fill an axis-aligned rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.fb.width as i32);
        let y1 = (y + h).min(self.fb.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, c);
            }
        }
    }

    /// Fill the whole surface. Visual: with a translucent color this is the per-frame fade.
    pub fn fill_all(&mut self, c: Rgba) {
        let mode = self.composite;
        for px in self.fb.pixels.iter_mut() {
            *px = blend(mode, *px, c);
        }
    }

    /// 1-pixel line from `a` to `b` using Bresenham.
    /// Visual: a straight streak, every pixel touched exactly once.
    pub fn stroke_line(&mut self, a: Point, b: Point, c: Rgba) {
        let (mut x0, mut y0) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend_pixel(x0, y0, c);
            if x0 == x1 && y0 == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x0 += sx; }
            if e2 <= dx { err += dx; y0 += sy; }
        }
    }

    /// Circle outline of `radius` around `center`.
    /// Visual: the pulsing ring where a firework will burst.
    pub fn stroke_circle(&mut self, center: Point, radius: f32, c: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let steps = ((std::f32::consts::TAU * radius).ceil() as usize).max(8);
        let mut last = None;
        for i in 0..steps {
            let t = i as f32 / steps as f32 * std::f32::consts::TAU;
            let px = (center.x + radius * t.cos()).round() as i32;
            let py = (center.y + radius * t.sin()).round() as i32;
            // Neighbouring steps often land on the same pixel; plot it once
            if last == Some((px, py)) {
                continue;
            }
            self.blend_pixel(px, py, c);
            last = Some((px, py));
        }
    }

    /// Filled disc. Pixels whose centers fall inside the radius are painted;
    /// a disc too small to cover any center still paints the pixel under it.
    pub fn fill_circle(&mut self, center: Point, radius: f32, c: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let x0 = (center.x - radius).floor() as i32;
        let x1 = (center.x + radius).ceil() as i32;
        let y0 = (center.y - radius).floor() as i32;
        let y1 = (center.y + radius).ceil() as i32;

        let mut painted = false;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy > r2 { continue; } // outside the circle
                self.blend_pixel(x, y, c);
                painted = true;
            }
        }
        if !painted {
            self.blend_pixel(center.x.floor() as i32, center.y.floor() as i32, c);
        }
    }
}

/// Mix `src` into packed `dst` under `mode`.
#[inline]
fn blend(mode: Composite, dst: u32, src: Rgba) -> u32 {
    let (dr, dg, db) = unpack(dst);
    let a = src.a.clamp(0.0, 1.0);
    let mix = |d: u8, s: u8| -> u32 {
        let d = d as f32;
        let s = s as f32;
        let v = match mode {
            Composite::SourceOver => s * a + d * (1.0 - a),
            Composite::DestinationOut => d * (1.0 - a),
            Composite::Lighter => d + s * a,
        };
        v.round().clamp(0.0, 255.0) as u32
    };
    (mix(dr, src.r) << 16) | (mix(dg, src.g) << 8) | mix(db, src.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Rgba::hsl(0.0, 100.0, 50.0), Rgba::rgb(255, 0, 0));
        assert_eq!(Rgba::hsl(120.0, 100.0, 50.0), Rgba::rgb(0, 255, 0));
        assert_eq!(Rgba::hsl(240.0, 100.0, 50.0), Rgba::rgb(0, 0, 255));
        assert_eq!(Rgba::hsl(0.0, 0.0, 100.0), Rgba::WHITE);
    }

    #[test]
    fn test_hsl_hue_wraps() {
        assert_eq!(Rgba::hsl(480.0, 100.0, 50.0), Rgba::hsl(120.0, 100.0, 50.0));
        assert_eq!(Rgba::hsl(-120.0, 100.0, 50.0), Rgba::hsl(240.0, 100.0, 50.0));
    }

    #[test]
    fn test_destination_out_fades_toward_black() {
        let mut cv = Canvas::new(2, 1);
        cv.fb.pixels = vec![0x00C8_6432, 0x0000_0000];
        cv.set_composite(Composite::DestinationOut);
        cv.fill_all(Rgba::BLACK.with_alpha(0.5));
        assert_eq!(unpack(cv.fb.pixels[0]), (100, 50, 25));
        assert_eq!(cv.fb.pixels[1], 0);
    }

    #[test]
    fn test_lighter_saturates() {
        let mut cv = Canvas::new(1, 1);
        cv.set_composite(Composite::Lighter);
        cv.blend_pixel(0, 0, Rgba::rgb(200, 10, 0));
        cv.blend_pixel(0, 0, Rgba::rgb(200, 10, 0));
        assert_eq!(unpack(cv.fb.pixels[0]), (255, 20, 0));
    }

    #[test]
    fn test_source_over_alpha() {
        let mut cv = Canvas::new(1, 1);
        cv.fill_all(Rgba::WHITE);
        cv.blend_pixel(0, 0, Rgba::BLACK.with_alpha(0.25));
        assert_eq!(unpack(cv.fb.pixels[0]), (191, 191, 191));
    }

    #[test]
    fn test_out_of_bounds_drawing_is_ignored() {
        let mut cv = Canvas::new(4, 4);
        cv.stroke_line(Point::new(-10.0, -10.0), Point::new(-2.0, 20.0), Rgba::WHITE);
        cv.fill_circle(Point::new(100.0, 100.0), 5.0, Rgba::WHITE);
        assert!(cv.fb.pixels.iter().all(|&p| p == 0));
        assert_eq!(cv.get_pixel(-1, 0), None);
        assert_eq!(cv.get_pixel(4, 0), None);
    }

    #[test]
    fn test_stroke_line_endpoints() {
        let mut cv = Canvas::new(10, 10);
        cv.stroke_line(Point::new(1.0, 1.0), Point::new(8.0, 5.0), Rgba::WHITE);
        assert_eq!(cv.get_pixel(1, 1), Some(0x00FF_FFFF));
        assert_eq!(cv.get_pixel(8, 5), Some(0x00FF_FFFF));
    }

    #[test]
    fn test_tiny_disc_still_paints() {
        let mut cv = Canvas::new(4, 4);
        cv.fill_circle(Point::new(2.0, 2.0), 0.1, Rgba::WHITE);
        assert_eq!(cv.get_pixel(2, 2), Some(0x00FF_FFFF));
    }

    #[test]
    fn test_stroke_circle_leaves_center_empty() {
        let mut cv = Canvas::new(20, 20);
        cv.stroke_circle(Point::new(10.0, 10.0), 5.0, Rgba::WHITE);
        assert_eq!(cv.get_pixel(10, 10), Some(0));
        assert_eq!(cv.get_pixel(15, 10), Some(0x00FF_FFFF));
    }
}
