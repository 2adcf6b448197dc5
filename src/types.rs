// Core types shared by both effects.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the surface is on screen (pixels)
    pub height: usize,     // how tall the surface is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A black surface of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Hard clear back to black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }
}

/// A point on a surface, in pixels (fractional; rasterized at draw time).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Fixed-length position history. Visual: the short streak behind a moving entity.
/// Index 0 is the newest sample, the last index the oldest.
#[derive(Debug, Clone)]
pub struct Trail<const N: usize> {
    points: [Point; N],
}

impl<const N: usize> Trail<N> {
    /// Every slot starts at the spawn point, so the first streak has zero length.
    pub fn filled(p: Point) -> Self {
        Self { points: [p; N] }
    }

    /// Drop the oldest sample and push `p` as the newest.
    pub fn push(&mut self, p: Point) {
        self.points.rotate_right(1);
        self.points[0] = p;
    }

    pub fn oldest(&self) -> Point {
        self.points[N - 1]
    }

    pub fn newest(&self) -> Point {
        self.points[0]
    }

    pub fn len(&self) -> usize {
        N
    }
}

/// Pointer snapshot read by the fireworks loop once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    pub down: bool,
    pub x: f32,
    pub y: f32,
}
