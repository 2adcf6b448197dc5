// Image flow: a picture turned into a rising "waterfall" of dots.
// Visual outcomes:
// - Dots stream up from the bottom edge and wrap around when they leave the top.
// - Over bright parts of the picture they move faster and glow stronger.
// - Each dot takes the color of the picture underneath it, so the image emerges.

use image::DynamicImage;
use image::imageops::FilterType;
use rand::Rng;

use crate::canvas::{Canvas, Composite, Rgba};
use crate::error::Error;
use crate::random::random;
use crate::types::Point;

/// Side of the square surface the image is scaled to before sampling.
pub const FLOW_SIZE: u32 = 459;
/// Sampling stride in pixels, both axes.
pub const DETAIL: u32 = 5;
/// Default dot count.
pub const FLOW_PARTICLES: usize = 3000;
const FADE_ALPHA: f32 = 0.05;
const BASE_DRIFT: f32 = 6.0;
const WOBBLE: f32 = 2.0;
const START_SPEED: f32 = 0.7;
const MAX_VELOCITY: f32 = 0.4;
const MIN_SIZE: f32 = 0.5;
const MAX_SIZE: f32 = 2.5;
/// Opacity per unit of speed.
const ALPHA_PER_SPEED: f32 = 0.3;
/// Dots closer to the bottom edge than `size * BOTTOM_BAND` are not drawn.
const BOTTOM_BAND: f32 = 6.0;

/// Perceived brightness of an RGB pixel, scaled so white is 2.55.
pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt() / 100.0
}

/// One sampled cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub color: Rgba,
    pub brightness: f32,
}

/// Coarse color/brightness lookup built once from the source image.
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    detail: u32,
}

impl Grid {
    /// Scale `img` to `size`×`size` and sample every `detail`-th pixel.
    pub fn sample(img: &DynamicImage, size: u32, detail: u32) -> Self {
        let scaled = if img.width() == size && img.height() == size {
            img.to_rgb8()
        } else {
            img.resize_exact(size, size, FilterType::Triangle).to_rgb8()
        };

        let rows: Vec<Vec<Cell>> = (0..size)
            .step_by(detail as usize)
            .map(|y| {
                (0..size)
                    .step_by(detail as usize)
                    .map(|x| {
                        let [r, g, b] = scaled.get_pixel(x, y).0;
                        Cell { color: Rgba::rgb(r, g, b), brightness: brightness(r, g, b) }
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Self { rows, detail }
    }

    /// Decode encoded image bytes (PNG, etc.) and sample them.
    pub fn from_bytes(bytes: &[u8], size: u32, detail: u32) -> Result<Self, Error> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| Error::ImageDecode(format!("Decode flow image: {e}")))?;
        Ok(Self::sample(&img, size, detail))
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Cell under a surface position; `None` off the grid.
    pub fn cell_at(&self, pos: Point) -> Option<&Cell> {
        let (row, col) = self.index_of(pos);
        self.cell(row, col)
    }

    pub fn cell(&self, row: i64, col: i64) -> Option<&Cell> {
        self.row(row)?.get(usize::try_from(col).ok()?)
    }

    fn row(&self, row: i64) -> Option<&[Cell]> {
        self.rows.get(usize::try_from(row).ok()?).map(Vec::as_slice)
    }

    /// Paint color for (row, col): the cell's color, black when only the column
    /// is off the grid, white when the row is.
    pub fn color_at(&self, row: i64, col: i64) -> Rgba {
        match self.row(row) {
            Some(cells) => usize::try_from(col)
                .ok()
                .and_then(|c| cells.get(c))
                .map_or(Rgba::BLACK, |cell| cell.color),
            None => Rgba::WHITE,
        }
    }

    /// (row, col) for a surface position, floored.
    pub fn index_of(&self, pos: Point) -> (i64, i64) {
        let d = self.detail as f32;
        ((pos.y / d).floor() as i64, (pos.x / d).floor() as i64)
    }
}

/// One rising dot.
#[derive(Debug, Clone)]
pub struct GridParticle {
    pub pos: Point,
    speed: f32,
    velocity: f32,
    size: f32,
    angle: f32,
    cell: (i64, i64),
}

impl GridParticle {
    fn new<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Self {
        Self {
            pos: Point::new(random(rng, 0.0, width), height),
            speed: START_SPEED,
            velocity: random(rng, 0.0, MAX_VELOCITY),
            size: random(rng, MIN_SIZE, MAX_SIZE),
            angle: 0.0,
            cell: (0, 0),
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn cell(&self) -> (i64, i64) {
        self.cell
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Draw opacity; zero inside the bottom band.
    pub fn alpha(&self, height: f32) -> f32 {
        if self.pos.y > height - self.size * BOTTOM_BAND {
            0.0
        } else {
            (self.speed * ALPHA_PER_SPEED).clamp(0.0, 1.0)
        }
    }

    fn update<R: Rng + ?Sized>(&mut self, grid: &Grid, width: f32, height: f32, rng: &mut R) {
        self.cell = grid.index_of(self.pos);
        if let Some(cell) = grid.cell(self.cell.0, self.cell.1) {
            self.speed = cell.brightness;
        }

        self.angle += self.speed / 10.0;
        let movement = BASE_DRIFT - self.speed + self.velocity;
        self.pos.y -= movement + self.angle.cos() * WOBBLE;
        self.pos.x += self.angle.cos() * WOBBLE;

        if self.pos.y <= 0.0 {
            self.pos.y = height;
            self.pos.x = random(rng, 0.0, width);
        }
    }

    fn draw(&self, grid: &Grid, canvas: &mut Canvas) {
        let alpha = self.alpha(canvas.height() as f32);
        if alpha <= 0.0 {
            return;
        }
        let color = grid.color_at(self.cell.0, self.cell.1);
        canvas.fill_circle(self.pos, self.size, color.with_alpha(alpha));
    }
}

/// The whole image-flow effect: sampled grid plus its dots.
pub struct Flow<R: Rng> {
    grid: Grid,
    particles: Vec<GridParticle>,
    width: f32,
    height: f32,
    rng: R,
}

impl<R: Rng> Flow<R> {
    /// Build from an already sampled grid; clears `canvas` and spawns `count` dots.
    pub fn new(grid: Grid, canvas: &mut Canvas, count: usize, mut rng: R) -> Self {
        let width = canvas.width() as f32;
        let height = canvas.height() as f32;
        canvas.clear();
        let particles: Vec<GridParticle> = (0..count)
            .map(|_| GridParticle::new(width, height, &mut rng))
            .collect();
        log::info!(
            "Image flow ready: {}x{} grid, {count} particles",
            grid.rows(),
            grid.cols()
        );
        Self { grid, particles, width, height, rng }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn particles(&self) -> &[GridParticle] {
        &self.particles
    }

    /// One animation frame: fade, then move and draw every dot.
    pub fn tick(&mut self, canvas: &mut Canvas) {
        canvas.set_composite(Composite::SourceOver);
        canvas.fill_all(Rgba::BLACK.with_alpha(FADE_ALPHA));

        for p in self.particles.iter_mut() {
            p.update(&self.grid, self.width, self.height, &mut self.rng);
            p.draw(&self.grid, canvas);
        }
    }
}
