//! Per-frame transform propagation
//!
//! Walks the tree depth-first, pre-order, composing each node's local
//! transform onto the accumulated parent transform. A node's matrices are
//! finalized before its children are visited, and point lights are collected
//! in the same order, so light indices are stable for a fixed tree shape.

use crate::foundation::math::{Mat3, Mat4, Mat4Ext, Vec3};
use crate::render::lighting::{FrameLights, LightSourceData};
use crate::scene::node::{NodeId, NodeKind, SceneNode};
use crate::scene::tree::SceneTree;

/// Recompute every node's model, normal, and MVP matrix and rebuild the
/// frame's light list
///
/// `view_projection` is passed through unchanged to every depth. The light
/// list is cleared first; after the call it holds one entry per attached
/// `PointLight` node, in traversal order, positioned at the world-space
/// origin of the node's local frame.
pub fn propagate_transforms(tree: &mut SceneTree, view_projection: &Mat4, lights: &mut FrameLights) {
    lights.clear();
    let root = tree.root();
    propagate_node(tree, root, &Mat4::identity(), view_projection, lights);
}

fn propagate_node(
    tree: &mut SceneTree,
    id: NodeId,
    parent_model: &Mat4,
    view_projection: &Mat4,
    lights: &mut FrameLights,
) {
    let node = tree.node_mut(id);
    let model = parent_model * local_transform(node);

    node.model_matrix = model;
    node.normal_matrix = normal_matrix(&model);
    node.mvp_matrix = view_projection * model;

    if let NodeKind::PointLight { color } = node.kind {
        // World-space position of the node's local origin: model * (0,0,0,1)
        let position: Vec3 = model.column(3).xyz();
        lights.push(LightSourceData { position, color });
    }

    for i in 0..tree.node(id).children().len() {
        let child = tree.node(id).children()[i];
        propagate_node(tree, child, &model, view_projection, lights);
    }
}

/// Local transform of a node
///
/// Rotation and scale are applied about the reference point, and rotation
/// composes in Y, X, Z order. Reordering any factor changes what renders;
/// this order is load-bearing.
fn local_transform(node: &SceneNode) -> Mat4 {
    Mat4::new_translation(&node.position)
        * Mat4::new_translation(&node.reference_point)
        * Mat4::rotation_y(node.rotation.y)
        * Mat4::rotation_x(node.rotation.x)
        * Mat4::rotation_z(node.rotation.z)
        * Mat4::new_nonuniform_scaling(&node.scale)
        * Mat4::new_translation(&-node.reference_point)
}

/// Inverse-transpose of the model matrix's upper-left 3x3 block
///
/// Falls back to the raw block when the inverse does not exist (degenerate
/// scale). That renders wrong normals for the affected node but must never
/// panic mid-frame.
fn normal_matrix(model: &Mat4) -> Mat3 {
    let linear: Mat3 = model.fixed_view::<3, 3>(0, 0).into_owned();
    linear.try_inverse().map_or(linear, |inverse| inverse.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::GeometryPayload;
    use approx::assert_relative_eq;

    fn geometry_node(tree: &mut SceneTree) -> NodeId {
        tree.create_node(NodeKind::Geometry(GeometryPayload::empty()))
    }

    #[test]
    fn test_world_matrix_is_parent_times_local() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let parent = geometry_node(&mut tree);
        let child = geometry_node(&mut tree);
        tree.add_child(root, parent);
        tree.add_child(parent, child);

        tree[parent].position = Vec3::new(1.0, 2.0, 3.0);
        tree[parent].rotation = Vec3::new(0.3, 0.8, -0.2);
        tree[parent].scale = Vec3::new(2.0, 1.0, 0.5);
        tree[child].position = Vec3::new(-4.0, 0.5, 0.0);
        tree[child].rotation = Vec3::new(0.0, 1.1, 0.0);

        let mut lights = FrameLights::new();
        propagate_transforms(&mut tree, &Mat4::identity(), &mut lights);

        let expected = tree[parent].model_matrix * local_transform(&tree[child]);
        assert_relative_eq!(tree[child].model_matrix, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_order_is_y_then_x_then_z() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let node = geometry_node(&mut tree);
        tree.add_child(root, node);
        tree[node].rotation = Vec3::new(0.4, 1.2, -0.7);

        let mut lights = FrameLights::new();
        propagate_transforms(&mut tree, &Mat4::identity(), &mut lights);

        let expected = Mat4::rotation_y(1.2) * Mat4::rotation_x(0.4) * Mat4::rotation_z(-0.7);
        assert_relative_eq!(tree[node].model_matrix, expected, epsilon = 1e-6);

        // The reversed composition differs; the order is not commutative
        let reversed = Mat4::rotation_z(-0.7) * Mat4::rotation_x(0.4) * Mat4::rotation_y(1.2);
        assert!((tree[node].model_matrix - reversed).abs().max() > 1e-3);
    }

    #[test]
    fn test_reference_point_is_fixed_under_rotation_and_scale() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let node = geometry_node(&mut tree);
        tree.add_child(root, node);

        let pivot = Vec3::new(2.0, -1.0, 3.0);
        tree[node].reference_point = pivot;
        tree[node].rotation = Vec3::new(0.9, -0.4, 1.6);
        tree[node].scale = Vec3::new(3.0, 0.5, 2.0);

        let mut lights = FrameLights::new();
        propagate_transforms(&mut tree, &Mat4::identity(), &mut lights);

        // With zero position, the pivot maps to itself
        let image = tree[node]
            .model_matrix
            .transform_point(&crate::foundation::math::Point3::from(pivot));
        assert_relative_eq!(image.coords, pivot, epsilon = 1e-4);
    }

    #[test]
    fn test_propagation_is_idempotent() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = geometry_node(&mut tree);
        let b = geometry_node(&mut tree);
        tree.add_child(root, a);
        tree.add_child(a, b);
        tree[a].position = Vec3::new(0.5, 1.5, -2.0);
        tree[a].rotation = Vec3::new(0.1, 0.2, 0.3);
        tree[b].scale = Vec3::new(2.0, 2.0, 2.0);

        let vp = Mat4::perspective(1.2, 1.5, 0.1, 100.0);
        let mut lights = FrameLights::new();
        propagate_transforms(&mut tree, &vp, &mut lights);
        let first = (tree[b].model_matrix, tree[b].normal_matrix, tree[b].mvp_matrix);

        propagate_transforms(&mut tree, &vp, &mut lights);
        let second = (tree[b].model_matrix, tree[b].normal_matrix, tree[b].mvp_matrix);

        // Bit-identical, not merely approximately equal
        assert_eq!(first, second);
    }

    #[test]
    fn test_point_lights_collected_in_traversal_order() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let holder = geometry_node(&mut tree);
        let first = tree.create_node(NodeKind::PointLight {
            color: Vec3::new(1.0, 0.0, 0.0),
        });
        let second = tree.create_node(NodeKind::PointLight {
            color: Vec3::new(0.0, 1.0, 0.0),
        });
        let inert = tree.create_node(NodeKind::SpotLight {
            color: Vec3::new(0.0, 0.0, 1.0),
        });

        tree.add_child(root, first);
        tree.add_child(root, holder);
        tree.add_child(holder, second);
        tree.add_child(root, inert);

        tree[holder].position = Vec3::new(10.0, 0.0, 0.0);
        tree[second].position = Vec3::new(0.0, 5.0, 0.0);

        let mut lights = FrameLights::new();
        propagate_transforms(&mut tree, &Mat4::identity(), &mut lights);

        // Spot lights are inert: exactly the two point lights, pre-order
        assert_eq!(lights.len(), 2);
        assert_relative_eq!(lights.as_slice()[0].color, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(
            lights.as_slice()[1].position,
            Vec3::new(10.0, 5.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_light_list_is_rebuilt_not_appended() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let light = tree.create_node(NodeKind::PointLight {
            color: Vec3::new(1.0, 1.0, 1.0),
        });
        tree.add_child(root, light);

        let mut lights = FrameLights::new();
        propagate_transforms(&mut tree, &Mat4::identity(), &mut lights);
        propagate_transforms(&mut tree, &Mat4::identity(), &mut lights);

        assert_eq!(lights.len(), 1);
    }

    #[test]
    fn test_degenerate_scale_does_not_panic() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let node = geometry_node(&mut tree);
        tree.add_child(root, node);
        tree[node].scale = Vec3::new(0.0, 1.0, 1.0);

        let mut lights = FrameLights::new();
        propagate_transforms(&mut tree, &Mat4::identity(), &mut lights);

        // Falls back to the (singular) linear block instead of panicking
        let expected: Mat3 = tree[node].model_matrix.fixed_view::<3, 3>(0, 0).into_owned();
        assert_relative_eq!(tree[node].normal_matrix, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_non_uniform_scale_uses_inverse_transpose() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let node = geometry_node(&mut tree);
        tree.add_child(root, node);
        tree[node].scale = Vec3::new(2.0, 1.0, 1.0);

        let mut lights = FrameLights::new();
        propagate_transforms(&mut tree, &Mat4::identity(), &mut lights);

        // A normal orthogonal to the scaled axis keeps its direction
        let n = tree[node].normal_matrix * Vec3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(n.normalize(), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }
}
