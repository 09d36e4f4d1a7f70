//! CLI command implementations.

use std::path::{Path, PathBuf};

use clap::Args;
use refrax_io::svg::{export_grid_svg, export_triangles_svg};
use refrax_io::{export_solid_obj, validate_config, DesignConfig};
use refrax_math::DVec2;
use refrax_mesh::laplacian::EdgeWeighting;
use refrax_solver::{
    DesignOutput, LightModel, Pipeline, PoissonIntegrator, SurfaceModel,
};
use refrax_telemetry::{EventBus, TracingSink};
use refrax_transport::GridTransportSolver;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Design inputs; flags override values from `--config`.
#[derive(Args, Debug, Default)]
pub struct DesignArgs {
    /// Density image of the incoming light.
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Density image of the desired caustic.
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Design config (TOML).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Surface samples per side.
    #[arg(short, long)]
    pub resolution: Option<usize>,

    /// Distance from the lens to the target plane.
    #[arg(long)]
    pub focal_length: Option<f64>,

    /// Maximum refinement rounds.
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Stop once the largest height change per round falls below this.
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Design a mirror instead of a refractive lens.
    #[arg(long)]
    pub reflective: bool,

    /// Use a point light at `x,y,z` instead of parallel light.
    #[arg(long, value_parser = parse_point)]
    pub point_light: Option<[f64; 3]>,

    /// Output OBJ path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also draw the target grid to this SVG.
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Also draw the refined surface triangulation to this SVG.
    #[arg(long)]
    pub mesh_svg: Option<PathBuf>,

    /// Integrate normals with cotangent edge weights.
    #[arg(long)]
    pub cotangent: bool,
}

fn parse_point(s: &str) -> Result<[f64; 3], String> {
    let coords: Vec<f64> = s
        .split(',')
        .map(|c| c.trim().parse::<f64>().map_err(|e| format!("'{c}': {e}")))
        .collect::<Result<_, _>>()?;
    match coords.as_slice() {
        &[x, y, z] => Ok([x, y, z]),
        _ => Err(format!("expected x,y,z, got {} values", coords.len())),
    }
}

impl DesignArgs {
    /// Loads `--config` (if any) and applies the flag overrides.
    pub fn resolve(&self) -> Result<DesignConfig, Box<dyn std::error::Error>> {
        let mut cfg = match &self.config {
            Some(path) => DesignConfig::load(path)?,
            None => DesignConfig::with_inputs(PathBuf::new(), PathBuf::new()),
        };

        if let Some(source) = &self.source {
            cfg.input.source = source.clone();
        }
        if let Some(target) = &self.target {
            cfg.input.target = target.clone();
        }
        if let Some(resolution) = self.resolution {
            cfg.surface.resolution = resolution;
        }
        if let Some(focal_length) = self.focal_length {
            cfg.optics.frame.focal_length = focal_length;
        }
        let refinement = &mut cfg.optics.refinement;
        if let Some(rounds) = self.rounds {
            refinement.max_rounds = rounds;
        }
        if let Some(tolerance) = self.tolerance {
            refinement.tolerance = tolerance;
        }
        if self.cotangent {
            refinement.weighting = EdgeWeighting::Cotangent;
        }
        if self.reflective {
            refinement.surface = SurfaceModel::Reflective;
        }
        if let Some(position) = self.point_light {
            refinement.light = LightModel::PointSource { position };
        }
        if let Some(output) = &self.output {
            cfg.output.obj = output.clone();
        }
        if let Some(svg) = &self.svg {
            cfg.output.svg = Some(svg.clone());
        }
        if let Some(mesh_svg) = &self.mesh_svg {
            cfg.output.mesh_svg = Some(mesh_svg.clone());
        }

        validate_config(&cfg)?;
        tracing::debug!(?cfg, "resolved design config");
        Ok(cfg)
    }
}

/// Runs the pipeline with the built-in solvers and a tracing event sink.
fn run_design(cfg: &DesignConfig) -> Result<DesignOutput, Box<dyn std::error::Error>> {
    let pipeline = Pipeline::new(cfg.pipeline_config())?;

    let mut bus = EventBus::new();
    bus.add_sink(Box::new(TracingSink::new()));

    let mut transport = GridTransportSolver::new();
    let mut integrator = PoissonIntegrator::from_config(&cfg.optics.refinement);
    let output = pipeline.run(&mut transport, &mut integrator, &mut bus)?;
    bus.finish();
    Ok(output)
}

fn print_header(title: &str, cfg: &DesignConfig) {
    println!("{title}");
    println!("{}", "─".repeat(title.chars().count()));
    println!("Source:     {}", cfg.input.source.display());
    println!("Target:     {}", cfg.input.target.display());
    println!(
        "Surface:    {0}×{0} samples, {1}×{2}",
        cfg.surface.resolution, cfg.surface.width, cfg.surface.height
    );
    println!(
        "Optics:     {:?} surface, {:?} light, n = {}, focal length {}",
        cfg.optics.refinement.surface,
        cfg.optics.refinement.light,
        cfg.optics.refinement.refractive_index,
        cfg.optics.frame.focal_length
    );
    println!();
}

fn print_report(output: &DesignOutput) {
    let report = &output.report;
    println!("Rounds:     {} ({:?})", report.rounds, report.state);
    if let Some(change) = report.final_height_change() {
        println!("Δz (last):  {change:.3e}");
    }
    println!(
        "Relief:     {:.6}",
        output.mesh.max_height() - output.mesh.min_height()
    );
}

/// Design a lens and write the solid OBJ (and optional SVG).
pub fn design(args: &DesignArgs) -> CommandResult {
    let cfg = args.resolve()?;
    print_header("Refrax Design", &cfg);

    let output = run_design(&cfg)?;
    print_report(&output);

    export_solid_obj(
        &output.mesh,
        &output.topology,
        cfg.output.thickness,
        &cfg.output.obj,
    )?;
    println!("OBJ:        {}", cfg.output.obj.display());

    if let Some(svg) = &cfg.output.svg {
        write_target_svg(&output, &cfg, svg)?;
        println!("SVG:        {}", svg.display());
    }
    if let Some(mesh_svg) = &cfg.output.mesh_svg {
        write_mesh_svg(&output, &cfg, mesh_svg)?;
        println!("Mesh SVG:   {}", mesh_svg.display());
    }
    Ok(())
}

fn write_target_svg(output: &DesignOutput, cfg: &DesignConfig, path: &Path) -> CommandResult {
    let points: Vec<DVec2> = output.targets.iter().map(|t| t.truncate()).collect();
    let res = cfg.surface.resolution;
    export_grid_svg(
        &points,
        res,
        res,
        cfg.surface.width,
        cfg.surface.height,
        path,
    )?;
    Ok(())
}

fn write_mesh_svg(output: &DesignOutput, cfg: &DesignConfig, path: &Path) -> CommandResult {
    let mesh = &output.mesh;
    let points: Vec<DVec2> = mesh
        .pos_x
        .iter()
        .zip(&mesh.pos_y)
        .map(|(&x, &y)| DVec2::new(x, y))
        .collect();
    let triangles: Vec<[u32; 3]> = (0..mesh.triangle_count()).map(|t| mesh.triangle(t)).collect();
    export_triangles_svg(
        &points,
        &triangles,
        cfg.surface.width,
        cfg.surface.height,
        path,
    )?;
    Ok(())
}

/// Validate a design config file.
pub fn validate(path: &str) -> CommandResult {
    println!("Validating: {path}");
    let cfg = DesignConfig::load(Path::new(path))?;
    validate_config(&cfg)?;
    println!("✓ Design config is valid");
    println!(
        "  {}×{} samples, {} rounds max",
        cfg.surface.resolution, cfg.surface.resolution, cfg.optics.refinement.max_rounds
    );
    Ok(())
}

/// Design a lens and print the ray-trace residual of the result.
pub fn trace(args: &DesignArgs) -> CommandResult {
    let cfg = args.resolve()?;
    print_header("Refrax Trace", &cfg);

    let output = run_design(&cfg)?;
    print_report(&output);

    let report = &output.report;
    println!();
    println!("{:<8} {:>12}", "Round", "max |Δz|");
    for (round, change) in report.height_changes.iter().enumerate() {
        println!("{:<8} {:>12.3e}", round, change);
    }

    let trace = report.trace;
    println!();
    println!("Traced:     {} rays ({} missed)", trace.traced, trace.missed);
    println!("Mean miss:  {:.6}", trace.mean);
    println!("Max miss:   {:.6}", trace.max);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_point_light() {
        assert_eq!(parse_point("0.5, 1,-2").unwrap(), [0.5, 1.0, -2.0]);
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("a,b,c").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = DesignArgs {
            source: Some("s.png".into()),
            target: Some("t.png".into()),
            resolution: Some(32),
            rounds: Some(4),
            reflective: true,
            point_light: Some([0.0, 0.0, 5.0]),
            cotangent: true,
            mesh_svg: Some("mesh.svg".into()),
            ..Default::default()
        };
        let cfg = args.resolve().unwrap();
        assert_eq!(cfg.surface.resolution, 32);
        assert_eq!(cfg.optics.refinement.max_rounds, 4);
        assert_eq!(cfg.optics.refinement.surface, SurfaceModel::Reflective);
        assert_eq!(cfg.optics.refinement.weighting, EdgeWeighting::Cotangent);
        assert_eq!(cfg.output.mesh_svg, Some(PathBuf::from("mesh.svg")));
        assert_eq!(
            cfg.optics.refinement.light,
            LightModel::PointSource {
                position: [0.0, 0.0, 5.0]
            }
        );
    }

    #[test]
    fn missing_inputs_fail_before_solving() {
        let args = DesignArgs {
            target: Some("t.png".into()),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }
}
