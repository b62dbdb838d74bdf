//! Scene construction for the Rebound arena

use rebound_engine::prelude::*;

use crate::config::GameConfig;

/// Interior size of the play box
pub fn box_dimensions() -> Vec3 {
    Vec3::new(180.0, 90.0, 90.0)
}

/// Size of the paddle
pub fn pad_dimensions() -> Vec3 {
    Vec3::new(30.0, 3.0, 40.0)
}

/// World position of the box center
pub fn box_position() -> Vec3 {
    Vec3::new(0.0, -10.0, -80.0)
}

/// Texture handles issued by the window layer's texture loader
#[derive(Debug, Clone, Copy)]
pub struct SceneTextures {
    /// Brick diffuse map for the box walls
    pub brick_diffuse: TextureHandle,

    /// Brick normal map
    pub brick_normal: TextureHandle,

    /// Brick roughness map
    pub brick_roughness: TextureHandle,

    /// Glyph atlas for HUD text
    pub charmap: TextureHandle,
}

/// Node ids the game logic needs to reach every frame
#[derive(Debug, Clone, Copy)]
pub struct SceneHandles {
    /// The play box (normal-mapped interior walls)
    pub box_node: NodeId,

    /// The paddle
    pub pad_node: NodeId,

    /// The ball
    pub ball_node: NodeId,

    /// Toggleable trophy model, if one was loaded
    pub trophy_node: Option<NodeId>,

    /// HUD text overlay
    pub text_node: NodeId,
}

/// Everything `build_scene` produces
#[derive(Debug)]
pub struct BuiltScene {
    /// The populated scene tree
    pub tree: SceneTree,

    /// Registry holding every mesh the scene references
    pub meshes: MeshRegistry,

    /// Global material table
    pub materials: MaterialTable,

    /// Ids of the nodes the game mutates
    pub handles: SceneHandles,
}

/// Construct the full game scene
///
/// `trophy_mesh` comes from the OBJ loader; when it is absent the trophy
/// node is simply not created and the toggle becomes a no-op.
pub fn build_scene(
    config: &GameConfig,
    textures: &SceneTextures,
    trophy_mesh: Option<Mesh>,
) -> BuiltScene {
    let mut meshes = MeshRegistry::new();

    let pad_mesh = Mesh::cuboid(pad_dimensions(), Vec2::new(30.0, 40.0), true, false);
    let mut box_mesh = Mesh::cuboid(box_dimensions(), Vec2::new(90.0, 90.0), true, true);
    // the box walls are normal mapped, so they need a tangent basis
    box_mesh.compute_tangents();
    let sphere_mesh = Mesh::uv_sphere(1.0, 40, 40);
    let text_mesh = Mesh::text_quads("Hello, World!", 39.0 / 29.0, 200.0);

    let pad_count = pad_mesh.index_count();
    let box_count = box_mesh.index_count();
    let sphere_count = sphere_mesh.index_count();
    let text_count = text_mesh.index_count();

    let pad_handle = meshes.insert(pad_mesh);
    let box_handle = meshes.insert(box_mesh);
    let sphere_handle = meshes.insert(sphere_mesh);
    let text_handle = meshes.insert(text_mesh);

    let materials = MaterialTable::new();

    let mut tree = SceneTree::new();
    let root = tree.root();

    let box_node = tree.create_node(NodeKind::NormalMappedGeometry {
        geometry: GeometryPayload::with_mesh(box_handle, box_count),
        maps: TextureSet {
            diffuse: textures.brick_diffuse,
            normal: textures.brick_normal,
            roughness: textures.brick_roughness,
        },
    });
    let pad_node = tree.create_node(NodeKind::Geometry(GeometryPayload::with_mesh(
        pad_handle, pad_count,
    )));
    let ball_node = tree.create_node(NodeKind::Geometry(GeometryPayload::with_mesh(
        sphere_handle,
        sphere_count,
    )));

    // point lights: two placed in the room, one riding the paddle
    let scene_light = tree.create_node(NodeKind::PointLight {
        color: Vec3::new(1.0, 0.5, 0.5),
    });
    let corner_light = tree.create_node(NodeKind::PointLight {
        color: Vec3::new(0.5, 1.0, 0.5),
    });
    let pad_light = tree.create_node(NodeKind::PointLight {
        color: Vec3::new(1.0, 1.0, 1.0),
    });

    tree[scene_light].position = Vec3::new(5.0, -40.0, -90.0);
    tree[corner_light].position = Vec3::new(-55.0, -50.0, -90.0);
    tree[pad_light].position = Vec3::new(0.0, 20.0, 0.0);

    tree.add_child(root, scene_light);
    tree.add_child(root, corner_light);

    tree.add_child(root, box_node);
    tree.add_child(root, pad_node);
    tree.add_child(root, ball_node);
    tree.add_child(pad_node, pad_light);

    let trophy_node = trophy_mesh.map(|mesh| {
        let index_count = mesh.index_count();
        let handle = meshes.insert(mesh);
        let node = tree.create_node(NodeKind::Geometry(GeometryPayload::with_mesh(
            handle,
            index_count,
        )));
        tree[node].position = Vec3::new(-40.0, -50.0, -90.0);
        tree[node].scale = Vec3::new(0.35, 0.35, 0.35);
        tree.add_child(root, node);
        node
    });

    let text_node = tree.create_node(NodeKind::Geometry2D {
        geometry: GeometryPayload::with_mesh(text_handle, text_count),
        texture: textures.charmap,
    });
    tree[text_node].position = Vec3::new(
        config.window.width as f32 / 2.0,
        config.window.height as f32 / 2.0,
        0.0,
    );
    tree.add_child(root, text_node);

    log::info!(
        "Initialized scene with {} nodes",
        tree.descendant_count(root)
    );

    BuiltScene {
        tree,
        meshes,
        materials,
        handles: SceneHandles {
            box_node,
            pad_node,
            ball_node,
            trophy_node,
            text_node,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder_textures() -> SceneTextures {
        SceneTextures {
            brick_diffuse: TextureHandle(1),
            brick_normal: TextureHandle(2),
            brick_roughness: TextureHandle(3),
            charmap: TextureHandle(4),
        }
    }

    #[test]
    fn test_scene_has_expected_shape() {
        let config = GameConfig::default();
        let built = build_scene(&config, &placeholder_textures(), None);

        // box, pad, ball, 2 room lights, pad light, text
        assert_eq!(built.tree.descendant_count(built.tree.root()), 7);
        assert!(built.handles.trophy_node.is_none());
        assert_eq!(built.meshes.len(), 4);
    }

    #[test]
    fn test_trophy_node_is_attached_when_mesh_present() {
        let config = GameConfig::default();
        let trophy = Mesh::uv_sphere(1.0, 6, 4);
        let built = build_scene(&config, &placeholder_textures(), Some(trophy));

        let trophy_node = built.handles.trophy_node.expect("trophy attached");
        assert!(built.tree.has_child(built.tree.root(), trophy_node));
    }
}
