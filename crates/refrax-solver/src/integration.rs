//! Normal integration — reconstructs heights whose normals match a field.
//!
//! The refinement loop only sees the [`NormalIntegrator`] trait:
//!
//! ```text
//! integrator.initialize(mesh, topology)?;
//! loop {
//!     integrator.integrate(mesh, normals)?;
//! }
//! ```
//!
//! [`PoissonIntegrator`] fits heights to per-edge differences predicted by
//! the normals:
//!
//! ```text
//! g_i  = (−nx/nz, −ny/nz)                        surface gradient at i
//! d_ab = ½(g_a + g_b) · (p_b − p_a)              predicted z_b − z_a
//! min Σ_e w_e (z_b − z_a − d_ab)² + λ Σ_i (z_i − z_i⁰)²
//! ```
//!
//! The normal equations `(L + λI) z = Bᵀ W d + λ z⁰` depend on the mesh only
//! through `L`, so the matrix is factorized once in `initialize`.

use refrax_math::faer_solver::FaerSolver;
use refrax_math::sparse::SparseSolver;
use refrax_math::DVec3;
use refrax_mesh::laplacian::{assemble_laplacian, edge_weights, EdgeWeighting};
use refrax_mesh::{Topology, TriangleMesh};
use refrax_types::constants::{DEFAULT_ANCHOR_WEIGHT, DEFAULT_NORM_EPSILON};
use refrax_types::{RefraxError, RefraxResult};

use crate::config::RefinementConfig;

/// Trait for normal-to-height integrators.
pub trait NormalIntegrator: Send {
    /// One-time setup for a mesh topology.
    fn initialize(&mut self, mesh: &TriangleMesh, topology: &Topology) -> RefraxResult<()>;

    /// Replaces the mesh's heights with the best fit to `normals`.
    ///
    /// Only `pos_z` changes.
    fn integrate(&mut self, mesh: &mut TriangleMesh, normals: &[DVec3]) -> RefraxResult<()>;

    /// Returns the integrator's name.
    fn name(&self) -> &str;
}

/// Sparse least-squares normal integrator backed by a faer Cholesky factor.
pub struct PoissonIntegrator {
    solver: FaerSolver,
    weighting: EdgeWeighting,
    /// Pull of each height toward its current value; keeps the system SPD.
    anchor_weight: f64,
    /// Normals with |nz| below this cannot be written as a height gradient.
    epsilon: f64,
    edges: Vec<[u32; 2]>,
    weights: Vec<f64>,
    n: usize,
    initialized: bool,
}

impl PoissonIntegrator {
    pub fn new() -> Self {
        Self {
            solver: FaerSolver::new(),
            weighting: EdgeWeighting::Uniform,
            anchor_weight: DEFAULT_ANCHOR_WEIGHT,
            epsilon: DEFAULT_NORM_EPSILON,
            edges: Vec::new(),
            weights: Vec::new(),
            n: 0,
            initialized: false,
        }
    }

    /// An integrator using the weighting, anchor weight and normal guard
    /// of `config`.
    pub fn from_config(config: &RefinementConfig) -> Self {
        Self::new()
            .with_weighting(config.weighting)
            .with_anchor_weight(config.anchor_weight)
            .with_epsilon(config.norm_epsilon)
    }

    /// Selects the edge weighting used by the next `initialize`.
    pub fn with_weighting(mut self, weighting: EdgeWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Sets the anchoring weight λ used by the next `initialize`.
    pub fn with_anchor_weight(mut self, anchor_weight: f64) -> Self {
        self.anchor_weight = anchor_weight;
        self
    }

    /// Sets the minimum |nz| accepted by `integrate`.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Height gradient encoded by each normal.
    fn gradients(&self, normals: &[DVec3]) -> RefraxResult<Vec<(f64, f64)>> {
        normals
            .iter()
            .enumerate()
            .map(|(i, n)| {
                if !(n.z.abs() >= self.epsilon) {
                    return Err(RefraxError::DegenerateGeometry {
                        index: i,
                        context: format!(
                            "normal ({:.3}, {:.3}, {:.3e}) lies in the surface plane",
                            n.x, n.y, n.z
                        ),
                    });
                }
                Ok((-n.x / n.z, -n.y / n.z))
            })
            .collect()
    }
}

impl Default for PoissonIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalIntegrator for PoissonIntegrator {
    fn initialize(&mut self, mesh: &TriangleMesh, topology: &Topology) -> RefraxResult<()> {
        if !(self.anchor_weight > 0.0) {
            return Err(RefraxError::InvalidConfig(format!(
                "Anchor weight must be positive, got {}",
                self.anchor_weight
            )));
        }

        self.n = mesh.vertex_count();
        self.edges = topology.edges.clone();
        self.weights = edge_weights(mesh, topology, self.weighting);

        let system = assemble_laplacian(self.n, &self.edges, &self.weights, self.anchor_weight);
        self.solver
            .factorize(&system)
            .map_err(|e| RefraxError::Solver(format!("Normal integration factorization failed: {e}")))?;

        tracing::debug!(
            vertices = self.n,
            edges = self.edges.len(),
            weighting = ?self.weighting,
            "normal integrator initialized"
        );

        self.initialized = true;
        Ok(())
    }

    fn integrate(&mut self, mesh: &mut TriangleMesh, normals: &[DVec3]) -> RefraxResult<()> {
        if !self.initialized {
            return Err(RefraxError::Solver(
                "Normal integrator used before initialize".into(),
            ));
        }
        if mesh.vertex_count() != self.n || normals.len() != self.n {
            return Err(RefraxError::InvalidMesh(format!(
                "Integrator set up for {} vertices, got mesh with {} and {} normals",
                self.n,
                mesh.vertex_count(),
                normals.len()
            )));
        }

        let gradients = self.gradients(normals)?;

        let mut rhs: Vec<f64> = mesh.pos_z.iter().map(|z| self.anchor_weight * z).collect();
        for (&[a, b], &w) in self.edges.iter().zip(&self.weights) {
            let (a, b) = (a as usize, b as usize);
            let gx = 0.5 * (gradients[a].0 + gradients[b].0);
            let gy = 0.5 * (gradients[a].1 + gradients[b].1);
            let d = gx * (mesh.pos_x[b] - mesh.pos_x[a]) + gy * (mesh.pos_y[b] - mesh.pos_y[a]);
            rhs[a] -= w * d;
            rhs[b] += w * d;
        }

        let mut heights = vec![0.0; self.n];
        self.solver
            .solve(&rhs, &mut heights)
            .map_err(|e| RefraxError::Solver(format!("Normal integration solve failed: {e}")))?;

        mesh.set_heights(&heights)
    }

    fn name(&self) -> &str {
        "Poisson (sparse LLᵀ)"
    }
}
