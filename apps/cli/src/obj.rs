// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ output of world-space meshes.

use buildgen_geometry::Mesh;
use std::io::{self, Write};

/// Write meshes as OBJ objects, one per mesh, tagged with their material.
///
/// OBJ indices are 1-based and global across the file.
pub fn write_obj<W: Write>(out: &mut W, meshes: &[(String, Mesh)]) -> io::Result<()> {
    writeln!(out, "# Generated by buildgen")?;
    writeln!(out, "# Coordinate system: Y-up")?;

    let mut vertex_offset: u32 = 1;
    for (i, (material, mesh)) in meshes.iter().enumerate() {
        if mesh.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "o mesh_{i}")?;
        writeln!(out, "usemtl {material}")?;

        for p in mesh.positions.chunks_exact(3) {
            writeln!(out, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?;
        }
        for n in mesh.normals.chunks_exact(3) {
            writeln!(out, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
        }
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| v + vertex_offset);
            writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }

        vertex_offset += mesh.vertex_count() as u32;
    }
    Ok(())
}
