//! Density matrices.
//!
//! A density is a row-major `rows × cols` matrix of non-negative values.
//! Pixel `(r, c)` covers `[c/cols, (c+1)/cols] × [r/rows, (r+1)/rows]` of
//! the unit square, so image rows grow along +y.

use std::path::Path;

use refrax_types::{RefraxError, RefraxResult};

/// A non-negative scalar field sampled on a pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Density {
    /// Creates a density from row-major values.
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> RefraxResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(RefraxError::InvalidConfig(format!(
                "Density must have at least one pixel, got {rows}×{cols}"
            )));
        }
        if values.len() != rows * cols {
            return Err(RefraxError::InvalidConfig(format!(
                "Density has {} values, expected {}×{} = {}",
                values.len(),
                rows,
                cols,
                rows * cols
            )));
        }
        if let Some(bad) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(RefraxError::InvalidConfig(format!(
                "Density value {} at index {bad} is negative or not finite",
                values[bad]
            )));
        }
        Ok(Self { rows, cols, values })
    }

    /// Creates a constant density.
    pub fn uniform(rows: usize, cols: usize, value: f64) -> RefraxResult<Self> {
        Self::new(rows, cols, vec![value; rows * cols])
    }

    /// Creates a density by evaluating `f(row, col)` for every pixel.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        f: impl Fn(usize, usize) -> f64,
    ) -> RefraxResult<Self> {
        let values = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| f(r, c))
            .collect();
        Self::new(rows, cols, values)
    }

    /// Loads a grayscale density from an image file.
    ///
    /// Any format the `image` crate decodes is accepted; pixels are
    /// converted to 16-bit luma and scaled to `[0, 1]`.
    pub fn load(path: &Path) -> RefraxResult<Self> {
        let image_err = |reason: String| RefraxError::ImageLoad {
            path: path.to_path_buf(),
            reason,
        };

        let img = image::ImageReader::open(path)
            .map_err(|e| image_err(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| image_err(e.to_string()))?
            .decode()
            .map_err(|e| image_err(e.to_string()))?;

        let gray = img.to_luma16();
        let (cols, rows) = gray.dimensions();
        if cols == 0 || rows == 0 {
            return Err(image_err("image has zero dimensions".into()));
        }

        let values = gray.pixels().map(|p| p.0[0] as f64 / 65535.0).collect();
        tracing::debug!(path = %path.display(), rows, cols, "loaded density image");
        Self::new(rows as usize, cols as usize, values)
    }

    /// Number of pixel rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of pixel columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major pixel values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of pixel `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// Largest pixel value.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Sum of all pixel values.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Divides by the maximum when it exceeds 1; otherwise returns `self` unchanged.
    pub fn normalized(mut self) -> Self {
        let max = self.max();
        if max > 1.0 {
            for v in &mut self.values {
                *v /= max;
            }
        }
        self
    }
}
