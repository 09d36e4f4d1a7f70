//! SVG drawings of the target point grid.
//!
//! Drawings are 1000 px wide with the aspect ratio of the drawn extent;
//! +y points up.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use refrax_math::DVec2;
use refrax_types::{RefraxError, RefraxResult};

const SVG_WIDTH: f64 = 1000.0;

/// Maps points of `[0, width] × [0, height]` to pixel coordinates.
struct Canvas {
    width: f64,
    height: f64,
    px_height: f64,
}

impl Canvas {
    fn new(width: f64, height: f64) -> RefraxResult<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RefraxError::InvalidConfig(format!(
                "SVG extent must be positive, got {width}×{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            px_height: SVG_WIDTH * height / width,
        })
    }

    fn px(&self, p: DVec2) -> (f64, f64) {
        (
            p.x / self.width * SVG_WIDTH,
            (1.0 - p.y / self.height) * self.px_height,
        )
    }

    fn header<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h:.3}" viewBox="0 0 {w} {h:.3}">"#,
            w = SVG_WIDTH,
            h = self.px_height
        )?;
        writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)
    }
}

/// Draws the rows and columns of a `res_x × res_y` point grid.
///
/// Point `i + j·res_x` is column `i` of row `j`.
pub fn write_grid_svg<W: Write>(
    points: &[DVec2],
    res_x: usize,
    res_y: usize,
    width: f64,
    height: f64,
    out: &mut W,
) -> RefraxResult<()> {
    if points.len() != res_x * res_y {
        return Err(RefraxError::InvalidMesh(format!(
            "Grid of {res_x}×{res_y} needs {} points, got {}",
            res_x * res_y,
            points.len()
        )));
    }
    let canvas = Canvas::new(width, height)?;
    canvas.header(out)?;

    for j in 0..res_y {
        polyline(out, &canvas, points, (0..res_x).map(|i| i + j * res_x))?;
    }
    for i in 0..res_x {
        polyline(out, &canvas, points, (0..res_y).map(|j| i + j * res_x))?;
    }

    writeln!(out, "</svg>")?;
    Ok(())
}

fn polyline<W: Write>(
    out: &mut W,
    canvas: &Canvas,
    points: &[DVec2],
    indices: impl Iterator<Item = usize>,
) -> std::io::Result<()> {
    write!(out, r#"<polyline fill="none" stroke="black" stroke-width="0.5" points=""#)?;
    for i in indices {
        let (x, y) = canvas.px(points[i]);
        write!(out, "{x:.3},{y:.3} ")?;
    }
    writeln!(out, r#""/>"#)
}

/// Draws every triangle outline.
pub fn write_triangles_svg<W: Write>(
    points: &[DVec2],
    triangles: &[[u32; 3]],
    width: f64,
    height: f64,
    out: &mut W,
) -> RefraxResult<()> {
    let canvas = Canvas::new(width, height)?;
    canvas.header(out)?;

    for (t, tri) in triangles.iter().enumerate() {
        if tri.iter().any(|&v| v as usize >= points.len()) {
            return Err(RefraxError::InvalidMesh(format!(
                "Triangle {t} references a missing point"
            )));
        }
        let [a, b, c] = tri.map(|v| canvas.px(points[v as usize]));
        writeln!(
            out,
            r#"<polygon fill="none" stroke="black" stroke-width="0.5" points="{:.3},{:.3} {:.3},{:.3} {:.3},{:.3}"/>"#,
            a.0, a.1, b.0, b.1, c.0, c.1
        )?;
    }

    writeln!(out, "</svg>")?;
    Ok(())
}

/// Writes [`write_grid_svg`] output to `path`.
pub fn export_grid_svg(
    points: &[DVec2],
    res_x: usize,
    res_y: usize,
    width: f64,
    height: f64,
    path: &Path,
) -> RefraxResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_grid_svg(points, res_x, res_y, width, height, &mut out)?;
    out.flush()?;
    tracing::info!(path = %path.display(), "wrote grid SVG");
    Ok(())
}

/// Writes [`write_triangles_svg`] output to `path`.
pub fn export_triangles_svg(
    points: &[DVec2],
    triangles: &[[u32; 3]],
    width: f64,
    height: f64,
    path: &Path,
) -> RefraxResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_triangles_svg(points, triangles, width, height, &mut out)?;
    out.flush()?;
    tracing::info!(path = %path.display(), "wrote triangle SVG");
    Ok(())
}
