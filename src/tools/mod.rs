//! Helpers shared by the `quadtool` binary: environment defaults, point and
//! quad parsing, and the diagnostic overlay renderer.

use crate::models::{Point, Quad};
use crate::space::RectSpace;
use crate::utils::geometry::EstimatorOptions;
use image::{Rgb, RgbImage};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Error type for tool helpers
pub type ToolError = Box<dyn std::error::Error + Send + Sync>;
/// Result alias for tool helpers
pub type ToolResult<T> = Result<T, ToolError>;

fn parse_env_f64(name: &str) -> Option<f64> {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

static RECT_WIDTH: OnceLock<f64> = OnceLock::new();

/// Rect width from `QUAD_RECT_W` (default 1.0)
pub fn rect_width_from_env() -> f64 {
    *RECT_WIDTH.get_or_init(|| {
        parse_env_f64("QUAD_RECT_W")
            .filter(|v| *v != 0.0)
            .unwrap_or(1.0)
    })
}

static RECT_HEIGHT: OnceLock<f64> = OnceLock::new();

/// Rect height from `QUAD_RECT_H` (default 1.0)
pub fn rect_height_from_env() -> f64 {
    *RECT_HEIGHT.get_or_init(|| {
        parse_env_f64("QUAD_RECT_H")
            .filter(|v| *v != 0.0)
            .unwrap_or(1.0)
    })
}

static MIN_CORNER_SINE: OnceLock<Option<f64>> = OnceLock::new();

/// Conditioning guard from `QUAD_MIN_CORNER_SINE` (unset = no guard)
pub fn min_corner_sine_from_env() -> Option<f64> {
    *MIN_CORNER_SINE.get_or_init(|| {
        parse_env_f64("QUAD_MIN_CORNER_SINE").map(|v| v.clamp(0.0, 1.0))
    })
}

/// Estimator options with environment defaults, overridden by `min_corner_sine`
pub fn estimator_options(min_corner_sine: Option<f64>) -> EstimatorOptions {
    EstimatorOptions {
        min_corner_sine: min_corner_sine.or_else(min_corner_sine_from_env),
    }
}

/// Parse `"x,y"`
pub fn parse_point(s: &str) -> ToolResult<Point> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'x,y', got '{}'", s))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in '{}': {}", s, e))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in '{}': {}", s, e))?;
    Ok(Point::new(x, y))
}

/// Parse `"x,y;x,y;x,y;x,y"`
pub fn parse_quad(s: &str) -> ToolResult<Quad> {
    let points = s
        .split(';')
        .filter(|part| !part.trim().is_empty())
        .map(parse_point)
        .collect::<ToolResult<Vec<_>>>()?;
    Ok(Quad::try_from(points.as_slice())?)
}

/// Quad from inline text or, if `arg` names an existing file, from its JSON
pub fn load_quad(arg: &str) -> ToolResult<Quad> {
    let path = Path::new(arg);
    if path.is_file() {
        let text = fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&text)?);
    }
    parse_quad(arg)
}

/// Load an image as 8-bit RGB
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage, image::ImageError> {
    Ok(image::open(path)?.to_rgb8())
}

/// Colours used by [`draw_overlay`]
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle {
    /// Quad outline
    pub outline: Rgb<u8>,
    /// Interior rect-space grid lines
    pub grid: Rgb<u8>,
    /// Corner and edge handles
    pub handle: Rgb<u8>,
    /// Handle square side, in pixels
    pub handle_size: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            outline: Rgb([0, 255, 0]),
            grid: Rgb([255, 255, 255]),
            handle: Rgb([255, 255, 255]),
            handle_size: 10,
        }
    }
}

/// Draw the rect-space grid, quad outline and handles of `space` onto `img`.
///
/// `cols` and `rows` count grid vertices (borders included). Nothing is
/// resampled; only line and handle pixels are written.
pub fn draw_overlay(
    img: &mut RgbImage,
    space: &RectSpace,
    cols: usize,
    rows: usize,
    style: &OverlayStyle,
) -> crate::Result<()> {
    let mesh = space.mesh(cols, rows)?;
    let at = |i: usize, j: usize| mesh[j * cols + i];

    for j in 1..rows - 1 {
        for i in 0..cols - 1 {
            draw_line(img, at(i, j), at(i + 1, j), style.grid);
        }
    }
    for i in 1..cols - 1 {
        for j in 0..rows - 1 {
            draw_line(img, at(i, j), at(i, j + 1), style.grid);
        }
    }

    let quad = space.quad();
    for k in 0..4 {
        draw_line(img, quad[k], quad[(k + 1) % 4], style.outline);
    }
    for p in quad.corners().iter().chain(quad.edge_midpoints().iter()) {
        draw_square(img, *p, style.handle_size, style.handle);
    }
    Ok(())
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u64) < img.width() as u64 && (y as u64) < img.height() as u64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_line(img: &mut RgbImage, a: Point, b: Point, color: Rgb<u8>) {
    if !a.is_finite() || !b.is_finite() {
        return;
    }
    let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().min(1e5) as usize;
    if steps == 0 {
        put(img, a.x.round() as i64, a.y.round() as i64, color);
        return;
    }
    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let x = a.x + (b.x - a.x) * t;
        let y = a.y + (b.y - a.y) * t;
        put(img, x.round() as i64, y.round() as i64, color);
    }
}

fn draw_square(img: &mut RgbImage, center: Point, size: u32, color: Rgb<u8>) {
    if !center.is_finite() {
        return;
    }
    let half = (size / 2) as i64;
    let (cx, cy) = (center.x.round() as i64, center.y.round() as i64);
    for y in (cy - half)..=(cy + half) {
        for x in (cx - half)..=(cx + half) {
            put(img, x, y, color);
        }
    }
}
