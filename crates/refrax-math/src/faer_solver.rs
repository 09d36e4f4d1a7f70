//! [`SparseSolver`] backed by faer's sparse Cholesky.
//!
//! The normal-integration matrix depends only on mesh connectivity, so a
//! single factorization is reused by every refinement round.

use faer::linalg::solvers::Solve;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use faer::sparse::{SparseColMat, Triplet};
use faer::{Mat, Side};

use crate::sparse::{CsrMatrix, SparseSolver};

/// Sparse LLᵀ solver holding the most recent factorization.
#[derive(Default)]
pub struct FaerSolver {
    llt: Option<Llt<usize, f64>>,
    dimension: usize,
}

impl FaerSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Side length of the factorized matrix, 0 before `factorize`.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn check_len(&self, what: &str, len: usize) -> Result<(), String> {
        if len == self.dimension {
            Ok(())
        } else {
            Err(format!(
                "{what} has {len} entries, system is {n}×{n}",
                n = self.dimension
            ))
        }
    }
}

fn to_csc(matrix: &CsrMatrix) -> Result<SparseColMat<usize, f64>, String> {
    let triplets: Vec<Triplet<usize, usize, f64>> = (0..matrix.rows)
        .flat_map(|row| {
            (matrix.row_ptr[row]..matrix.row_ptr[row + 1]).map(move |k| Triplet {
                row,
                col: matrix.col_idx[k],
                val: matrix.values[k],
            })
        })
        .collect();

    SparseColMat::try_new_from_triplets(matrix.rows, matrix.cols, &triplets)
        .map_err(|e| format!("CSC conversion failed: {e:?}"))
}

impl SparseSolver for FaerSolver {
    fn factorize(&mut self, matrix: &CsrMatrix) -> Result<(), String> {
        if matrix.rows == 0 || matrix.rows != matrix.cols {
            return Err(format!(
                "Expected a non-empty square matrix, got {}×{}",
                matrix.rows, matrix.cols
            ));
        }

        let csc = to_csc(matrix)?;
        let symbolic = SymbolicLlt::try_new(csc.symbolic().as_ref(), Side::Upper)
            .map_err(|e| format!("Symbolic Cholesky failed: {e:?}"))?;
        let llt = Llt::try_new_with_symbolic(symbolic, csc.as_ref(), Side::Upper)
            .map_err(|e| format!("Matrix is not positive definite: {e:?}"))?;

        self.llt = Some(llt);
        self.dimension = matrix.rows;
        Ok(())
    }

    fn solve(&self, rhs: &[f64], solution: &mut [f64]) -> Result<(), String> {
        let Some(llt) = &self.llt else {
            return Err("solve() called before factorize()".into());
        };
        self.check_len("Right-hand side", rhs.len())?;
        self.check_len("Solution buffer", solution.len())?;

        let b = Mat::from_fn(self.dimension, 1, |i, _| rhs[i]);
        let x = llt.solve(&b);
        for (i, out) in solution.iter_mut().enumerate() {
            *out = x[(i, 0)];
        }

        if solution.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err("Cholesky solve produced non-finite values".into())
        }
    }

    fn is_factorized(&self) -> bool {
        self.llt.is_some()
    }
}
