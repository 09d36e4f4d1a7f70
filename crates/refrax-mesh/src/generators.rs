//! Procedural generators for the rectangular sampling grid.
//!
//! The lens surface is sampled on a regular grid of `res_x × res_y`
//! vertices spanning `[0, width] × [0, height]` at z = 0, with vertex
//! `i + j * res_x` at column `i`, row `j`.

use refrax_types::{RefraxError, RefraxResult};

use crate::mesh::TriangleMesh;

/// Generates a flat rectangular grid in the XY plane.
///
/// # Arguments
/// - `res_x` — Number of vertices along X (at least 2).
/// - `res_y` — Number of vertices along Y (at least 2).
/// - `width` — Extent along X.
/// - `height` — Extent along Y.
///
/// Triangles are wound counter-clockwise seen from +Z.
///
/// # Example
/// ```
/// use refrax_mesh::generators::surface_grid;
/// let mesh = surface_grid(3, 3, 1.0, 1.0).unwrap();
/// assert_eq!(mesh.vertex_count(), 9);
/// assert_eq!(mesh.triangle_count(), 8);
/// ```
pub fn surface_grid(
    res_x: usize,
    res_y: usize,
    width: f64,
    height: f64,
) -> RefraxResult<TriangleMesh> {
    if res_x < 2 || res_y < 2 {
        return Err(RefraxError::InvalidConfig(format!(
            "Grid resolution must be at least 2×2, got {res_x}×{res_y}"
        )));
    }
    if !(width > 0.0 && height > 0.0) {
        return Err(RefraxError::InvalidConfig(format!(
            "Grid extent must be positive, got {width}×{height}"
        )));
    }

    let cols = res_x - 1;
    let rows = res_y - 1;
    let mut mesh = TriangleMesh::with_capacity(res_x * res_y, cols * rows * 2);

    for j in 0..res_y {
        for i in 0..res_x {
            let u = i as f64 / cols as f64;
            let v = j as f64 / rows as f64;
            mesh.pos_x.push(u * width);
            mesh.pos_y.push(v * height);
            mesh.pos_z.push(0.0);
        }
    }

    // Two triangles per quad
    for j in 0..rows {
        for i in 0..cols {
            let low_left = (j * res_x + i) as u32;
            let low_right = low_left + 1;
            let up_left = low_left + res_x as u32;
            let up_right = up_left + 1;

            mesh.indices.extend_from_slice(&[low_left, low_right, up_left]);
            mesh.indices.extend_from_slice(&[low_right, up_right, up_left]);
        }
    }

    Ok(mesh)
}

/// Shrinks the grid's footprint by `margin` on every side.
///
/// x is scaled by `(width - 2·margin) / width` and shifted by `margin`
/// (likewise for y), so samples stay strictly inside the image domain.
pub fn inset(mesh: &mut TriangleMesh, width: f64, height: f64, margin: f64) -> RefraxResult<()> {
    if margin < 0.0 || 2.0 * margin >= width.min(height) {
        return Err(RefraxError::InvalidConfig(format!(
            "Margin {margin} does not fit a {width}×{height} grid"
        )));
    }

    let scale_x = (width - 2.0 * margin) / width;
    let scale_y = (height - 2.0 * margin) / height;

    for x in &mut mesh.pos_x {
        *x = *x * scale_x + margin;
    }
    for y in &mut mesh.pos_y {
        *y = *y * scale_y + margin;
    }
    Ok(())
}
