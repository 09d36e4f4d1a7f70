//! Integration tests for refrax-solver.

use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use refrax_math::{DVec2, DVec3};
use refrax_mesh::generators::surface_grid;
use refrax_mesh::laplacian::EdgeWeighting;
use refrax_mesh::normals::compute_vertex_normals;
use refrax_mesh::{Topology, TriangleMesh};
use refrax_solver::fresnel::{fresnel_normal, surface_normal, PARALLEL_INCIDENT};
use refrax_solver::refinement::reanchor_heights;
use refrax_solver::{
    compose_correspondence, normal_field, trace_residual, FrameTransform, LightModel,
    NormalIntegrator, Pipeline, PipelineConfig, PoissonIntegrator, Refinement, RefinementConfig,
    RefinementState, SurfaceModel,
};
use refrax_telemetry::{EventBus, EventKind, VecSink};
use refrax_transport::{
    Density, GridTransportSolver, TransportMap, TransportOptions, TransportSolver,
};
use refrax_types::{RefraxError, RefraxResult};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("refrax_solver_{}_{name}", std::process::id()))
}

fn write_gray_png(name: &str, width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> PathBuf {
    let path = temp_path(name);
    image::GrayImage::from_fn(width, height, |x, y| image::Luma([f(x, y)]))
        .save(&path)
        .unwrap();
    path
}

/// Surface on the unit square with targets pulled toward the centre in x.
fn converging_setup(res: usize) -> (TriangleMesh, Topology, Vec<DVec3>) {
    let mesh = surface_grid(res, res, 1.0, 1.0).unwrap();
    let topology = Topology::build(&mesh);
    let targets = (0..mesh.vertex_count())
        .map(|i| {
            let p = mesh.position_dvec3(i);
            DVec3::new(0.5 + 0.6 * (p.x - 0.5), p.y, -1.0)
        })
        .collect();
    (mesh, topology, targets)
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn config_defaults() {
    let cfg = RefinementConfig::default();
    assert_eq!(cfg.max_rounds, 10);
    assert_eq!(cfg.tolerance, 0.0);
    assert_eq!(cfg.refractive_index, 1.55);
    assert_eq!(cfg.light, LightModel::Parallel);
    assert_eq!(cfg.surface, SurfaceModel::Refractive);
    assert_eq!(cfg.weighting, EdgeWeighting::Uniform);
    assert!(cfg.anchor_weight > 0.0);
    assert!(!cfg.early_stop());
    assert!(cfg.validate().is_ok());
}

#[test]
fn config_presets() {
    let debug = RefinementConfig::debug();
    let hq = RefinementConfig::high_quality();
    assert!(debug.max_rounds < hq.max_rounds);
    assert!(debug.tolerance > hq.tolerance);
    assert!(debug.early_stop());
}

#[test]
fn config_validation_rejects_bad_values() {
    let zero_rounds = RefinementConfig {
        max_rounds: 0,
        ..Default::default()
    };
    assert!(zero_rounds.validate().is_err());

    let negative_tolerance = RefinementConfig {
        tolerance: -1.0,
        ..Default::default()
    };
    assert!(negative_tolerance.validate().is_err());

    let bad_index = RefinementConfig {
        refractive_index: 0.0,
        ..Default::default()
    };
    assert!(bad_index.validate().is_err());
}

#[test]
fn config_from_toml() {
    let cfg: RefinementConfig = toml::from_str(
        r#"
        max_rounds = 4
        surface = "reflective"
        light = { kind = "point_source", position = [0.0, 0.0, 2.0] }
        "#,
    )
    .unwrap();
    assert_eq!(cfg.max_rounds, 4);
    assert_eq!(cfg.surface, SurfaceModel::Reflective);
    assert_eq!(
        cfg.light,
        LightModel::PointSource {
            position: [0.0, 0.0, 2.0]
        }
    );
    assert_eq!(cfg.refractive_index, 1.55);
}

// ─── Frame Transform Tests ────────────────────────────────────

#[test]
fn zero_rotation_and_translation_is_identity() {
    let frame = FrameTransform::default();
    for p in [
        DVec3::new(0.3, -0.2, 0.0),
        DVec3::new(1.0, 2.0, 3.0),
        DVec3::ZERO,
    ] {
        assert_eq!(frame.rigid(p), p);
    }
}

#[test]
fn rotation_about_z_by_90_degrees() {
    let frame = FrameTransform {
        rotation_deg: [0.0, 0.0, 90.0],
        ..Default::default()
    };
    let r = frame.rigid(DVec3::X);
    assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(r.y, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(r.z, 0.0, epsilon = 1e-9);
}

#[test]
fn rotations_apply_x_then_y_then_z() {
    // x by 90° sends y to z; y by 90° then sends z to x.
    let frame = FrameTransform {
        rotation_deg: [90.0, 90.0, 0.0],
        ..Default::default()
    };
    let r = frame.rigid(DVec3::Y);
    assert_abs_diff_eq!(r.x, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(r.y, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(r.z, 0.0, epsilon = 1e-9);
}

#[test]
fn placement_moves_plane_down_by_focal_length() {
    let frame = FrameTransform {
        translation: [0.1, 0.0, 0.0],
        focal_length: 2.5,
        ..Default::default()
    };
    let placed = frame.place(&[DVec2::new(0.5, 0.25)]);
    assert_abs_diff_eq!(placed[0].x, 0.6, epsilon = 1e-12);
    assert_abs_diff_eq!(placed[0].y, 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(placed[0].z, -2.5, epsilon = 1e-12);
}

// ─── Fresnel Normal Tests ─────────────────────────────────────

#[test]
fn matching_index_and_coinciding_rays_give_axial_normal() {
    let n = surface_normal(
        PARALLEL_INCIDENT,
        PARALLEL_INCIDENT,
        SurfaceModel::Refractive,
        1.0,
        1e-12,
        0,
    )
    .unwrap();
    assert_abs_diff_eq!(n.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(n.y, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(n.z.abs(), 1.0, epsilon = 1e-12);
}

#[test]
fn straight_through_refraction_gives_axial_normal() {
    let config = RefinementConfig::default();
    let n = fresnel_normal(DVec3::new(0.5, 0.5, 0.0), DVec3::new(0.5, 0.5, -1.0), &config, 0)
        .unwrap();
    assert_abs_diff_eq!(n.z.abs(), 1.0, epsilon = 1e-12);
}

#[test]
fn refractive_normal_satisfies_snell() {
    let config = RefinementConfig::default();
    let surface = DVec3::new(0.2, 0.4, 0.0);
    let target = DVec3::new(0.5, 0.3, -1.0);
    let n = fresnel_normal(surface, target, &config, 0).unwrap();

    let t = (target - surface).normalize();
    let refracted = refrax_solver::trace::refract(PARALLEL_INCIDENT, n, config.refractive_index)
        .unwrap();
    assert_abs_diff_eq!((refracted - t).length(), 0.0, epsilon = 1e-9);
}

#[test]
fn normal_field_is_unit_for_point_light() {
    let (mesh, _, targets) = converging_setup(6);
    let config = RefinementConfig {
        light: LightModel::default_point_source(),
        ..Default::default()
    };
    // The default light sits above the surface.
    let normals = normal_field(&mesh.points(), &targets, &config).unwrap();
    assert_eq!(normals.len(), mesh.vertex_count());
    for n in normals {
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn normal_field_reports_lowest_degenerate_sample() {
    let surface = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::ONE];
    let mut targets: Vec<DVec3> = surface.iter().map(|p| *p - DVec3::Z).collect();
    targets[1] = surface[1];
    targets[3] = surface[3];

    let err = normal_field(&surface, &targets, &RefinementConfig::default()).unwrap_err();
    assert!(matches!(err, RefraxError::DegenerateGeometry { index: 1, .. }));
}

#[test]
fn normal_field_rejects_length_mismatch() {
    let err = normal_field(&[DVec3::ZERO], &[], &RefinementConfig::default()).unwrap_err();
    assert!(matches!(err, RefraxError::InvalidConfig(_)));
}

// ─── Correspondence Tests ─────────────────────────────────────

#[test]
fn identity_maps_leave_points_unchanged() {
    let source = TransportMap::identity(4).unwrap();
    let target = TransportMap::identity(4).unwrap();
    let points: Vec<DVec2> = (0..25)
        .map(|k| DVec2::new(0.05 + 0.036 * k as f64, 0.93 - 0.035 * k as f64))
        .collect();

    let mapped = compose_correspondence(&source, &target, points.clone()).unwrap();
    for (a, b) in points.iter().zip(&mapped) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-12);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-12);
    }
}

#[test]
fn composition_follows_target_density() {
    let mut solver = GridTransportSolver::new();
    solver.init(4).unwrap();
    let uniform = solver
        .solve(&Density::uniform(4, 4, 1.0).unwrap(), &TransportOptions::default())
        .unwrap();
    // All target mass in the right half.
    let right = Density::from_fn(4, 4, |_, c| if c >= 2 { 1.0 } else { 0.0 }).unwrap();
    let target = solver
        .solve(&right, &TransportOptions { density_floor: 0.0 })
        .unwrap();

    let points = uniform.forward_nodes().to_vec();
    let mapped = compose_correspondence(&uniform, &target, points).unwrap();
    for p in mapped {
        assert!(p.x >= 0.5 - 1e-9, "point {p:?} outside the lit half");
    }
}

#[test]
fn mismatched_resolutions_are_config_errors() {
    let a = TransportMap::identity(4).unwrap();
    let b = TransportMap::identity(5).unwrap();
    let err = compose_correspondence(&a, &b, vec![DVec2::ZERO; 25]).unwrap_err();
    assert!(matches!(err, RefraxError::InvalidConfig(_)));

    let err = compose_correspondence(&a, &a, vec![DVec2::ZERO; 3]).unwrap_err();
    assert!(matches!(err, RefraxError::InvalidConfig(_)));
}

// ─── Normal Integration Tests ─────────────────────────────────

#[test]
fn integrator_recovers_tilted_plane() {
    let mut mesh = surface_grid(6, 6, 1.0, 1.0).unwrap();
    let topology = Topology::build(&mesh);
    let mut integrator = PoissonIntegrator::new();
    integrator.initialize(&mesh, &topology).unwrap();

    let normal = DVec3::new(-0.2, -0.1, 1.0).normalize();
    let normals = vec![normal; mesh.vertex_count()];
    integrator.integrate(&mut mesh, &normals).unwrap();

    // z = 0.2x + 0.1y up to a constant.
    let offset = mesh.pos_z[0];
    for i in 0..mesh.vertex_count() {
        let expected = 0.2 * mesh.pos_x[i] + 0.1 * mesh.pos_y[i];
        assert_abs_diff_eq!(mesh.pos_z[i] - offset, expected, epsilon = 1e-3);
    }
}

#[test]
fn integrator_keeps_flat_surface_flat() {
    let mut mesh = surface_grid(5, 5, 1.0, 1.0).unwrap();
    let topology = Topology::build(&mesh);
    let mut integrator = PoissonIntegrator::new();
    integrator.initialize(&mesh, &topology).unwrap();

    let normals = vec![DVec3::new(0.0, 0.0, -1.0); mesh.vertex_count()];
    integrator.integrate(&mut mesh, &normals).unwrap();
    for z in &mesh.pos_z {
        assert_abs_diff_eq!(*z, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn integrator_rejects_in_plane_normal() {
    let mut mesh = surface_grid(3, 3, 1.0, 1.0).unwrap();
    let topology = Topology::build(&mesh);
    let mut integrator = PoissonIntegrator::new();
    integrator.initialize(&mesh, &topology).unwrap();

    let mut normals = vec![DVec3::Z; 9];
    normals[4] = DVec3::X;
    let err = integrator.integrate(&mut mesh, &normals).unwrap_err();
    assert!(matches!(err, RefraxError::DegenerateGeometry { index: 4, .. }));
}

#[test]
fn integrator_requires_initialize() {
    let mut mesh = surface_grid(3, 3, 1.0, 1.0).unwrap();
    let mut integrator = PoissonIntegrator::default();
    assert!(!integrator.is_initialized());
    let err = integrator.integrate(&mut mesh, &[DVec3::Z; 9]).unwrap_err();
    assert!(matches!(err, RefraxError::Solver(_)));
}

// ─── Refinement Loop Tests ────────────────────────────────────

#[test]
fn reanchoring_is_idempotent() {
    let mut mesh = surface_grid(3, 3, 1.0, 1.0).unwrap();
    for (i, z) in mesh.pos_z.iter_mut().enumerate() {
        *z = 0.1 * i as f64 - 0.3;
    }
    reanchor_heights(&mut mesh);
    assert_eq!(mesh.max_height(), 0.0);
    let once = mesh.pos_z.clone();

    reanchor_heights(&mut mesh);
    assert_eq!(mesh.pos_z, once);
}

#[test]
fn refinement_runs_all_rounds_without_tolerance() {
    let (mesh, topology, targets) = converging_setup(8);
    let sink = VecSink::new();
    let mut bus = EventBus::new();
    bus.add_sink(Box::new(sink.clone()));

    let config = RefinementConfig {
        max_rounds: 5,
        ..Default::default()
    };
    let mut refinement = Refinement::new(mesh, targets, config).unwrap();
    assert_eq!(refinement.state(), RefinementState::Initializing);

    let mut integrator = PoissonIntegrator::new();
    let report = refinement.run(&topology, &mut integrator, &mut bus).unwrap();

    assert_eq!(report.rounds, 5);
    assert_eq!(report.state, RefinementState::Terminated);
    assert_eq!(report.height_changes.len(), 5);
    assert!(refinement.state().is_finished());
    assert_eq!(refinement.mesh().max_height(), 0.0);
    assert!(refinement.mesh().pos_z.iter().all(|z| z.is_finite()));

    let events = sink.events();
    let unit_errors: Vec<f64> = events
        .iter()
        .filter_map(|e| match e.kind {
            EventKind::NormalField { max_unit_error } => Some(max_unit_error),
            _ => None,
        })
        .collect();
    assert_eq!(unit_errors.len(), 5);
    assert!(unit_errors.iter().all(|&e| e < 1e-9));
    assert!(events
        .iter()
        .any(|e| matches!(e.kind, EventKind::Terminated { rounds: 5 })));
}

#[test]
fn refinement_reduces_trace_residual() {
    let (mesh, topology, targets) = converging_setup(8);
    let config = RefinementConfig::default();
    let flat = trace_residual(&mesh, &targets, &config).unwrap();
    assert!(flat.mean > 0.05);

    let mut refinement = Refinement::new(mesh, targets, config).unwrap();
    let mut integrator = PoissonIntegrator::new();
    let report = refinement
        .run(&topology, &mut integrator, &mut EventBus::new())
        .unwrap();

    assert!(refinement.mesh().min_height() < -1e-3);
    assert_eq!(report.trace.traced, 64);
    assert_eq!(report.trace.missed, 0);
    assert!(
        report.trace.mean < 0.25 * flat.mean,
        "mean miss {} not reduced from {}",
        report.trace.mean,
        flat.mean
    );
    assert!(report.trace.max < flat.max);
}

#[test]
fn refined_normals_match_desired_normals() {
    let res = 12;
    let (mesh, topology, targets) = converging_setup(res);
    let mut refinement = Refinement::new(mesh, targets, RefinementConfig::default()).unwrap();
    refinement
        .run(&topology, &mut PoissonIntegrator::new(), &mut EventBus::new())
        .unwrap();

    let mesh = refinement.mesh();
    let desired = normal_field(&mesh.points(), refinement.targets(), refinement.config()).unwrap();
    let actual = compute_vertex_normals(mesh);

    // Boundary fans are one-sided, so only interior vertices are compared.
    for j in 1..res - 1 {
        for i in 1..res - 1 {
            let v = i + j * res;
            let alignment = desired[v].dot(actual[v]).abs();
            assert!(
                1.0 - alignment < 1e-3,
                "vertex {v}: desired {:?}, actual {:?}",
                desired[v],
                actual[v]
            );
        }
    }
}

fn assert_loop_stays_well_formed(config: RefinementConfig) {
    let (mesh, topology, targets) = converging_setup(8);
    let sink = VecSink::new();
    let mut bus = EventBus::new();
    bus.add_sink(Box::new(sink.clone()));

    let mut refinement = Refinement::new(mesh, targets, config).unwrap();
    let report = refinement
        .run(&topology, &mut PoissonIntegrator::new(), &mut bus)
        .unwrap();

    assert_eq!(report.state, RefinementState::Terminated);
    assert_eq!(report.rounds, 4);
    assert!(report.height_changes.iter().all(|c| c.is_finite()));
    assert!(refinement.mesh().pos_z.iter().all(|z| z.is_finite()));

    let unit_errors: Vec<f64> = sink
        .events()
        .iter()
        .filter_map(|e| match e.kind {
            EventKind::NormalField { max_unit_error } => Some(max_unit_error),
            _ => None,
        })
        .collect();
    assert_eq!(unit_errors.len(), 4);
    assert!(unit_errors.iter().all(|&e| e < 1e-9));
}

#[test]
fn point_source_refinement_stays_well_formed() {
    assert_loop_stays_well_formed(RefinementConfig {
        max_rounds: 4,
        light: LightModel::default_point_source(),
        ..Default::default()
    });
}

#[test]
fn reflective_refinement_stays_well_formed() {
    assert_loop_stays_well_formed(RefinementConfig {
        max_rounds: 4,
        surface: SurfaceModel::Reflective,
        ..Default::default()
    });
}

#[test]
fn cotangent_refinement_matches_uniform() {
    let (mesh, topology, targets) = converging_setup(8);
    let config = RefinementConfig {
        weighting: EdgeWeighting::Cotangent,
        ..Default::default()
    };
    let mut integrator = PoissonIntegrator::from_config(&config);
    let mut cotangent = Refinement::new(mesh.clone(), targets.clone(), config).unwrap();
    cotangent
        .run(&topology, &mut integrator, &mut EventBus::new())
        .unwrap();

    let mut uniform = Refinement::new(mesh, targets, RefinementConfig::default()).unwrap();
    uniform
        .run(&topology, &mut PoissonIntegrator::new(), &mut EventBus::new())
        .unwrap();

    for (a, b) in cotangent.mesh().pos_z.iter().zip(&uniform.mesh().pos_z) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-3);
    }
}

#[test]
fn finished_refinement_cannot_run_again() {
    let (mesh, topology, targets) = converging_setup(4);
    let config = RefinementConfig {
        max_rounds: 2,
        ..Default::default()
    };
    let mut refinement = Refinement::new(mesh, targets, config).unwrap();
    let mut integrator = PoissonIntegrator::new();
    refinement
        .run(&topology, &mut integrator, &mut EventBus::new())
        .unwrap();
    let heights = refinement.mesh().pos_z.clone();

    let sink = VecSink::new();
    let mut bus = EventBus::new();
    bus.add_sink(Box::new(sink.clone()));
    let err = refinement.run(&topology, &mut integrator, &mut bus).unwrap_err();

    assert!(matches!(err, RefraxError::Solver(_)));
    assert_eq!(refinement.state(), RefinementState::Terminated);
    assert_eq!(refinement.mesh().pos_z, heights);
    bus.flush();
    assert!(sink.is_empty());
}

#[test]
fn refinement_stops_early_below_tolerance() {
    let (mesh, topology, targets) = converging_setup(6);
    let config = RefinementConfig {
        max_rounds: 20,
        tolerance: 10.0,
        ..Default::default()
    };
    let mut refinement = Refinement::new(mesh, targets, config).unwrap();
    let report = refinement
        .run(&topology, &mut PoissonIntegrator::new(), &mut EventBus::new())
        .unwrap();

    assert_eq!(report.state, RefinementState::Converged);
    assert_eq!(report.rounds, 1);
}

#[test]
fn refinement_rejects_target_count_mismatch() {
    let mesh = surface_grid(3, 3, 1.0, 1.0).unwrap();
    let err = Refinement::new(mesh, vec![DVec3::ZERO; 4], RefinementConfig::default());
    assert!(matches!(err, Err(RefraxError::InvalidConfig(_))));
}

#[test]
fn refinement_step_requires_initialize() {
    let (mesh, _, targets) = converging_setup(4);
    let mut refinement = Refinement::new(mesh, targets, RefinementConfig::default()).unwrap();
    let err = refinement
        .step(&mut PoissonIntegrator::new(), &EventBus::new())
        .unwrap_err();
    assert!(matches!(err, RefraxError::Solver(_)));
}

// ─── Trace Tests ──────────────────────────────────────────────

#[test]
fn flat_surface_traces_straight_down() {
    let mesh = surface_grid(4, 4, 1.0, 1.0).unwrap();
    let targets: Vec<DVec3> = mesh.points().iter().map(|p| *p - DVec3::Z).collect();
    let report = trace_residual(&mesh, &targets, &RefinementConfig::default()).unwrap();
    assert_eq!(report.traced, 16);
    assert_eq!(report.missed, 0);
    assert_abs_diff_eq!(report.max, 0.0, epsilon = 1e-12);
}

// ─── Pipeline Tests ───────────────────────────────────────────

#[test]
fn uniform_densities_give_flat_surface() {
    let source = write_gray_png("flat_source.png", 16, 16, |_, _| 128);
    let target = write_gray_png("flat_target.png", 16, 16, |_, _| 128);

    let mut config = PipelineConfig::new(&source, &target);
    config.resolution = 10;
    config.refinement.max_rounds = 10;
    let pipeline = Pipeline::new(config).unwrap();

    let output = pipeline
        .run(
            &mut GridTransportSolver::new(),
            &mut PoissonIntegrator::new(),
            &mut EventBus::new(),
        )
        .unwrap();

    assert_eq!(output.mesh.vertex_count(), 100);
    assert_eq!(output.targets.len(), 100);
    assert_eq!(output.report.rounds, 10);
    assert_eq!(output.report.state, RefinementState::Terminated);
    for z in &output.mesh.pos_z {
        assert_abs_diff_eq!(*z, 0.0, epsilon = 1e-6);
    }
    // Samples stay inside the margin.
    assert!(output.mesh.pos_x.iter().all(|&x| (0.1 - 1e-12..=0.9 + 1e-12).contains(&x)));

    let _ = std::fs::remove_file(source);
    let _ = std::fs::remove_file(target);
}

/// Transport solver that only counts how often it is called.
#[derive(Default)]
struct CountingSolver {
    calls: usize,
}

impl TransportSolver for CountingSolver {
    fn init(&mut self, _resolution: usize) -> RefraxResult<()> {
        self.calls += 1;
        Ok(())
    }

    fn solve(&mut self, _: &Density, _: &TransportOptions) -> RefraxResult<TransportMap> {
        self.calls += 1;
        TransportMap::identity(4)
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[test]
fn unreadable_density_fails_before_any_solve() {
    let target = write_gray_png("io_target.png", 4, 4, |_, _| 200);
    let missing = temp_path("does_not_exist.png");
    let _ = std::fs::remove_file(&missing);

    for (source, target) in [(&missing, &target), (&target, &missing)] {
        let mut config = PipelineConfig::new(source, target);
        config.resolution = 5;
        let pipeline = Pipeline::new(config).unwrap();

        let mut solver = CountingSolver::default();
        let err = pipeline
            .run(&mut solver, &mut PoissonIntegrator::new(), &mut EventBus::new())
            .unwrap_err();
        assert!(err.is_io(), "expected an I/O error, got {err}");
        assert_eq!(solver.calls, 0);
    }

    let _ = std::fs::remove_file(target);
}

#[test]
fn pipeline_rejects_missing_inputs() {
    let config = PipelineConfig::new("", "target.png");
    assert!(matches!(Pipeline::new(config), Err(RefraxError::InvalidConfig(_))));

    let mut config = PipelineConfig::new("a.png", "b.png");
    config.resolution = 2;
    assert!(Pipeline::new(config).is_err());
}
