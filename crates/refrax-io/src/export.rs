//! Solid OBJ export.
//!
//! The refined surface becomes the top of a closed solid: a flat base sits
//! `thickness` below the lowest surface point, and vertical walls join the
//! two along every boundary edge. Faces are wound outward.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use refrax_mesh::{Topology, TriangleMesh};
use refrax_types::{RefraxError, RefraxResult};

/// Writes the solid lens to `path`.
pub fn export_solid_obj(
    mesh: &TriangleMesh,
    topology: &Topology,
    thickness: f64,
    path: &Path,
) -> RefraxResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_solid_obj(mesh, topology, thickness, &mut out)?;
    out.flush()?;
    tracing::info!(
        path = %path.display(),
        vertices = 2 * mesh.vertex_count(),
        "wrote solid OBJ"
    );
    Ok(())
}

/// Writes the solid lens as OBJ text.
pub fn write_solid_obj<W: Write>(
    mesh: &TriangleMesh,
    topology: &Topology,
    thickness: f64,
    out: &mut W,
) -> RefraxResult<()> {
    if !(thickness > 0.0) {
        return Err(RefraxError::InvalidConfig(format!(
            "Solid thickness must be positive, got {thickness}"
        )));
    }
    if topology.vertex_triangles.len() != mesh.vertex_count() {
        return Err(RefraxError::InvalidMesh(
            "Topology was built for a different mesh".into(),
        ));
    }

    let n = mesh.vertex_count();
    let base = mesh.min_height() - thickness;

    writeln!(out, "# refrax solid lens")?;
    writeln!(out, "# {n} surface vertices, base at z = {base}")?;

    for i in 0..n {
        let [x, y, z] = mesh.position(i);
        writeln!(out, "v {x} {y} {z}")?;
    }
    for i in 0..n {
        writeln!(out, "v {} {} {base}", mesh.pos_x[i], mesh.pos_y[i])?;
    }

    // OBJ indices are 1-based; the base copy of vertex v is v + n.
    let top = |v: u32| v as usize + 1;
    let bottom = |v: u32| v as usize + n + 1;

    writeln!(out, "g surface")?;
    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t);
        writeln!(out, "f {} {} {}", top(a), top(b), top(c))?;
    }

    writeln!(out, "g base")?;
    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t);
        writeln!(out, "f {} {} {}", bottom(a), bottom(c), bottom(b))?;
    }

    writeln!(out, "g walls")?;
    for (edge, tris) in topology.edges.iter().zip(&topology.edge_triangles) {
        let [t] = tris.as_slice() else {
            continue;
        };
        let (a, b) = directed_edge(mesh.triangle(*t as usize), *edge);
        writeln!(out, "f {} {} {}", bottom(a), bottom(b), top(b))?;
        writeln!(out, "f {} {} {}", bottom(a), top(b), top(a))?;
    }

    Ok(())
}

/// The edge as it runs in the triangle's winding order.
fn directed_edge(tri: [u32; 3], [u, v]: [u32; 2]) -> (u32, u32) {
    for k in 0..3 {
        let (a, b) = (tri[k], tri[(k + 1) % 3]);
        if (a, b) == (u, v) || (a, b) == (v, u) {
            return (a, b);
        }
    }
    (u, v)
}
