//! Transport solver trait and the grid-based rearrangement solver.

use serde::{Deserialize, Serialize};
use refrax_math::DVec2;
use refrax_types::constants::DEFAULT_DENSITY_FLOOR;
use refrax_types::{RefraxError, RefraxResult};

use crate::density::Density;
use crate::map::{unit_grid_nodes, TransportMap};

/// Options passed to [`TransportSolver::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Lower bound on every pixel, as a fraction of the density maximum.
    pub density_floor: f64,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            density_floor: DEFAULT_DENSITY_FLOOR,
        }
    }
}

/// Computes a transport map from a density.
///
/// ```text
/// solver.init(resolution)?;
/// let map = solver.solve(&density, &options)?;
/// ```
pub trait TransportSolver: Send {
    /// Prepares the solver for maps of `resolution` cells per side.
    fn init(&mut self, resolution: usize) -> RefraxResult<()>;

    /// Solves for the map carrying the uniform square onto `density`.
    fn solve(&mut self, density: &Density, options: &TransportOptions) -> RefraxResult<TransportMap>;

    /// Returns the solver's name.
    fn name(&self) -> &str;
}

/// Triangular (Knothe–Rosenblatt) rearrangement on a regular node grid.
///
/// The x coordinate follows the column marginal of the density, and y
/// follows the conditional distribution within the column at that x,
/// blended linearly between neighbouring pixel-column centres. The result
/// is monotone along both axes, so the node grid never folds.
#[derive(Debug, Default)]
pub struct GridTransportSolver {
    resolution: Option<usize>,
}

impl GridTransportSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransportSolver for GridTransportSolver {
    fn init(&mut self, resolution: usize) -> RefraxResult<()> {
        if resolution == 0 {
            return Err(RefraxError::InvalidConfig(
                "Transport resolution must be at least 1".into(),
            ));
        }
        self.resolution = Some(resolution);
        Ok(())
    }

    fn solve(&mut self, density: &Density, options: &TransportOptions) -> RefraxResult<TransportMap> {
        let resolution = self
            .resolution
            .ok_or_else(|| RefraxError::Solver("GridTransportSolver used before init".into()))?;

        if !(options.density_floor >= 0.0 && options.density_floor.is_finite()) {
            return Err(RefraxError::InvalidConfig(format!(
                "density_floor must be finite and non-negative, got {}",
                options.density_floor
            )));
        }

        let density = density.clone().normalized();
        let max = density.max();
        if max <= 0.0 {
            return Err(RefraxError::Solver(
                "Density is zero everywhere; nothing to transport".into(),
            ));
        }

        let (rows, cols) = (density.rows(), density.cols());
        let floor = options.density_floor * max;
        let pixel = |r: usize, c: usize| density.get(r, c).max(floor);

        // Column marginal and per-column conditional CDFs over pixel edges.
        let mut column_mass = vec![0.0; cols];
        let mut conditional = vec![vec![0.0; rows + 1]; cols];
        for (c, cdf) in conditional.iter_mut().enumerate() {
            for r in 0..rows {
                cdf[r + 1] = cdf[r] + pixel(r, c);
            }
            column_mass[c] = cdf[rows];
            if column_mass[c] > 0.0 {
                for v in cdf.iter_mut() {
                    *v /= column_mass[c];
                }
            }
        }
        let marginal = cumulative(&column_mass);

        tracing::debug!(rows, cols, resolution, "Solving grid transport");

        let forward = unit_grid_nodes(resolution);
        let origin = forward
            .iter()
            .map(|q| {
                let x = invert_cdf(&marginal, q.x) / cols as f64;

                let s = x * cols as f64 - 0.5;
                let c0 = (s.floor().max(0.0) as usize).min(cols - 1);
                let c1 = (c0 + 1).min(cols - 1);
                let t = (s - c0 as f64).clamp(0.0, 1.0);
                let y0 = invert_cdf(&conditional[c0], q.y);
                let y1 = invert_cdf(&conditional[c1], q.y);
                let y = ((1.0 - t) * y0 + t * y1) / rows as f64;

                DVec2::new(x, y)
            })
            .collect();

        TransportMap::new(resolution, origin, forward)
    }

    fn name(&self) -> &str {
        "Grid (Knothe–Rosenblatt)"
    }
}

/// Normalized cumulative sum with a leading zero.
fn cumulative(mass: &[f64]) -> Vec<f64> {
    let mut cdf = Vec::with_capacity(mass.len() + 1);
    cdf.push(0.0);
    let mut acc = 0.0;
    for m in mass {
        acc += m;
        cdf.push(acc);
    }
    if acc > 0.0 {
        for v in &mut cdf {
            *v /= acc;
        }
    }
    cdf
}

/// Fractional index at which the piecewise-linear `cdf` reaches `q`.
///
/// `cdf` must be non-decreasing, starting at 0 and ending at 1. The result
/// lies in `[0, cdf.len() - 1]`.
pub fn invert_cdf(cdf: &[f64], q: f64) -> f64 {
    let last = cdf.len().saturating_sub(1);
    let k = cdf.partition_point(|&c| c <= q);
    if k == 0 {
        return 0.0;
    }
    if k > last {
        return last as f64;
    }
    let lo = k - 1;
    let width = cdf[k] - cdf[lo];
    if width <= 0.0 {
        return lo as f64;
    }
    lo as f64 + ((q - cdf[lo]) / width).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_linear_cdf() {
        let cdf = [0.0, 0.25, 0.5, 0.75, 1.0];
        assert!((invert_cdf(&cdf, 0.5) - 2.0).abs() < 1e-12);
        assert!((invert_cdf(&cdf, 0.375) - 1.5).abs() < 1e-12);
        assert_eq!(invert_cdf(&cdf, 1.0), 4.0);
        assert_eq!(invert_cdf(&cdf, -0.1), 0.0);
    }

    #[test]
    fn invert_skewed_cdf() {
        // All mass in the second of two bins.
        let cdf = [0.0, 0.0, 1.0];
        assert!((invert_cdf(&cdf, 0.5) - 1.5).abs() < 1e-12);
    }
}
