//! Geometry flattening (triangle gather)
//!
//! Produces the world-space triangle soup the ray tracer consumes. The pass
//! must run after transform propagation: it reads the model and normal
//! matrices that propagation wrote for the current frame.

use crate::foundation::math::{Point3, Vec3};
use crate::render::material::MaterialIndex;
use crate::render::mesh::{Mesh, MeshRegistry};
use crate::render::triangle::{TriangleBuffer, TriangleStd140};
use crate::scene::node::{NodeId, SceneNode};
use crate::scene::tree::SceneTree;

/// Rebuild `out` with one world-space triangle per index triple of every
/// attached geometry-bearing node
///
/// The buffer is cleared first; the pass is a full rebuild, never an
/// incremental update, so tree-shape changes take effect the same frame.
/// Nodes whose mesh handle does not resolve contribute nothing. Lights and
/// 2D geometry contribute no triangles but their subtrees are still visited.
pub fn gather_triangles(tree: &SceneTree, meshes: &MeshRegistry, out: &mut TriangleBuffer) {
    out.clear();
    gather_node(tree, tree.root(), meshes, out);
}

fn gather_node(tree: &SceneTree, id: NodeId, meshes: &MeshRegistry, out: &mut TriangleBuffer) {
    let node = tree.node(id);

    if let Some(geometry) = node.surface_geometry() {
        if let Some(mesh) = geometry.mesh.and_then(|handle| meshes.get(handle)) {
            emit_mesh(node, mesh, geometry.material, out);
        }
    }

    for &child in node.children() {
        gather_node(tree, child, meshes, out);
    }
}

fn emit_mesh(node: &SceneNode, mesh: &Mesh, material: MaterialIndex, out: &mut TriangleBuffer) {
    if mesh.indices.len() % 3 != 0 {
        log::warn!(
            "mesh on node {:?} has {} indices; dropping the trailing partial triangle",
            node.id(),
            mesh.indices.len()
        );
    }

    for triple in mesh.indices.chunks_exact(3) {
        let (i0, i1, i2) = (triple[0] as usize, triple[1] as usize, triple[2] as usize);

        let positions = [
            world_position(node, &mesh.positions[i0]),
            world_position(node, &mesh.positions[i1]),
            world_position(node, &mesh.positions[i2]),
        ];

        // Meshes without normals emit all-zero normals; consumers treat
        // those as "flat shading fallback" rather than risking NaNs.
        let normals = if mesh.normals.is_empty() {
            [Vec3::zeros(); 3]
        } else {
            [
                world_normal(node, &mesh.normals[i0]),
                world_normal(node, &mesh.normals[i1]),
                world_normal(node, &mesh.normals[i2]),
            ]
        };

        out.push(TriangleStd140::new(positions, normals, material));
    }
}

fn world_position(node: &SceneNode, local: &Vec3) -> Vec3 {
    node.model_matrix.transform_point(&Point3::from(*local)).coords
}

fn world_normal(node: &SceneNode, local: &Vec3) -> Vec3 {
    (node.normal_matrix * local)
        .try_normalize(1e-12)
        .unwrap_or_else(Vec3::zeros)
}
