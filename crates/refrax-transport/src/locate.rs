//! Point location in planar triangle meshes.
//!
//! Partitions the mesh bounding box into a uniform grid of bins and records
//! every triangle in each bin its bounding box overlaps. A query tests the
//! triangles of the bin containing the point; points outside the mesh fall
//! back to the closest candidate with clamped barycentric coordinates.

use refrax_math::DVec2;

/// Tolerance on barycentric coordinates for "inside" tests.
const INSIDE_TOLERANCE: f64 = 1e-12;

/// Result of a point-location query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Index of the triangle the point was assigned to.
    pub triangle: usize,
    /// Barycentric weights of the triangle's three corners (sum to 1).
    pub weights: [f64; 3],
    /// Whether the point lies inside the triangle (no clamping needed).
    pub inside: bool,
}

/// Uniform-grid acceleration structure over a triangle mesh.
#[derive(Debug, Clone)]
pub struct TriangleLocator {
    /// Lower corner of the binned region.
    min: DVec2,
    /// Inverse bin size per axis.
    inv_cell: DVec2,
    bins_x: usize,
    bins_y: usize,
    /// Triangle indices per bin, row-major.
    bins: Vec<Vec<u32>>,
}

impl TriangleLocator {
    /// Bins `triangles` over `nodes` into a `bins_per_side²` grid.
    pub fn build(nodes: &[DVec2], triangles: &[[u32; 3]], bins_per_side: usize) -> Self {
        let bins_per_side = bins_per_side.max(1);

        let (mut min, mut max) = (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY));
        for p in nodes {
            min = min.min(*p);
            max = max.max(*p);
        }
        if nodes.is_empty() {
            min = DVec2::ZERO;
            max = DVec2::ONE;
        }

        let extent = (max - min).max(DVec2::splat(1e-12));
        let inv_cell = DVec2::splat(bins_per_side as f64) / extent;

        let mut locator = Self {
            min,
            inv_cell,
            bins_x: bins_per_side,
            bins_y: bins_per_side,
            bins: vec![Vec::new(); bins_per_side * bins_per_side],
        };

        for (t, tri) in triangles.iter().enumerate() {
            let [a, b, c] = tri.map(|v| nodes[v as usize]);
            let (lo_x, lo_y) = locator.bin_of(a.min(b).min(c));
            let (hi_x, hi_y) = locator.bin_of(a.max(b).max(c));
            for by in lo_y..=hi_y {
                for bx in lo_x..=hi_x {
                    locator.bins[by * locator.bins_x + bx].push(t as u32);
                }
            }
        }

        locator
    }

    /// Bin coordinates containing `p` (clamped to the grid).
    fn bin_of(&self, p: DVec2) -> (usize, usize) {
        let rel = (p - self.min) * self.inv_cell;
        let bx = (rel.x.floor().max(0.0) as usize).min(self.bins_x - 1);
        let by = (rel.y.floor().max(0.0) as usize).min(self.bins_y - 1);
        (bx, by)
    }

    /// Locates `p` in the mesh.
    ///
    /// Returns `None` only for a mesh without any non-degenerate triangle.
    pub fn locate(&self, nodes: &[DVec2], triangles: &[[u32; 3]], p: DVec2) -> Option<Location> {
        let (bx, by) = self.bin_of(p);

        // Search growing rings of bins until some candidate is found.
        let max_ring = self.bins_x.max(self.bins_y);
        let mut best: Option<(f64, Location)> = None;
        for ring in 0..=max_ring {
            let mut visited_any = false;
            for (cx, cy) in ring_cells(bx, by, ring, self.bins_x, self.bins_y) {
                for &t in &self.bins[cy * self.bins_x + cx] {
                    visited_any = true;
                    let tri = triangles[t as usize];
                    let [a, b, c] = tri.map(|v| nodes[v as usize]);
                    let Some(weights) = barycentric(a, b, c, p) else {
                        continue;
                    };
                    let worst = weights[0].min(weights[1]).min(weights[2]);
                    if worst >= -INSIDE_TOLERANCE {
                        return Some(Location {
                            triangle: t as usize,
                            weights,
                            inside: true,
                        });
                    }
                    if best.as_ref().map_or(true, |(score, _)| worst > *score) {
                        best = Some((
                            worst,
                            Location {
                                triangle: t as usize,
                                weights: clamp_weights(weights),
                                inside: false,
                            },
                        ));
                    }
                }
            }
            // The first ring holding a candidate decides the fallback; one
            // extra ring covers triangles straddling the bin border.
            if visited_any && best.is_some() && ring >= 1 {
                break;
            }
        }

        best.map(|(_, location)| location)
    }
}

/// Cells on the square ring at Chebyshev distance `ring` around `(bx, by)`.
fn ring_cells(
    bx: usize,
    by: usize,
    ring: usize,
    bins_x: usize,
    bins_y: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let (bx, by, ring) = (bx as isize, by as isize, ring as isize);
    (by - ring..=by + ring)
        .flat_map(move |y| (bx - ring..=bx + ring).map(move |x| (x, y)))
        .filter(move |&(x, y)| (x - bx).abs() == ring || (y - by).abs() == ring)
        .filter(move |&(x, y)| x >= 0 && y >= 0 && (x as usize) < bins_x && (y as usize) < bins_y)
        .map(|(x, y)| (x as usize, y as usize))
}

/// Barycentric coordinates of `p` in triangle `(a, b, c)`; `None` if degenerate.
pub fn barycentric(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> Option<[f64; 3]> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let den = v0.perp_dot(v1);
    if den.abs() < 1e-300 {
        return None;
    }
    let l1 = v2.perp_dot(v1) / den;
    let l2 = v0.perp_dot(v2) / den;
    Some([1.0 - l1 - l2, l1, l2])
}

/// Clamps negative weights to zero and renormalizes.
fn clamp_weights(weights: [f64; 3]) -> [f64; 3] {
    let clamped = weights.map(|w| w.max(0.0));
    let sum: f64 = clamped.iter().sum();
    if sum > 0.0 {
        clamped.map(|w| w / sum)
    } else {
        [1.0 / 3.0; 3]
    }
}
