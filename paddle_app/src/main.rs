//! Rebound: ball-and-paddle arcade game
//!
//! Runs the full frame pipeline headlessly: game logic, transform
//! propagation, triangle gather, and backend staging every frame. The
//! window layer (GLFW + GL context, texture decoding, real input callbacks)
//! plugs in around this loop and consumes the staged frame state; the demo
//! below synthesizes its inputs instead.

mod beat;
mod config;
mod game;
mod scene;

use rebound_engine::prelude::*;

use crate::config::GameConfig;
use crate::game::PaddleGame;
use crate::scene::{build_scene, SceneTextures};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    rebound_engine::foundation::logging::init();

    let config_path = std::env::args().nth(1);
    let config = GameConfig::load_or_default(config_path.as_deref());
    log::info!(
        "Starting Rebound at {}x{}, ray tracing {}",
        config.window.width,
        config.window.height,
        if config.rendering.ray_tracing_enabled { "enabled" } else { "disabled" }
    );

    // handles the window layer's texture loader would issue
    let textures = SceneTextures {
        brick_diffuse: TextureHandle(1),
        brick_normal: TextureHandle(2),
        brick_roughness: TextureHandle(3),
        charmap: TextureHandle(4),
    };

    let trophy_mesh = match ObjLoader::load_obj("paddle_app/res/models/trophy_simple.obj")
        .or_else(|_| ObjLoader::load_obj("res/models/trophy_simple.obj"))
    {
        Ok(mesh) => {
            log::info!("Loaded trophy model ({} triangles)", mesh.index_count() / 3);
            Some(mesh)
        }
        Err(err) => {
            log::warn!("Trophy model unavailable ({err}); continuing without it");
            None
        }
    };

    let built = build_scene(&config, &textures, trophy_mesh);
    let mut tree = built.tree;
    let meshes = built.meshes;
    let materials = built.materials;

    let mut game = PaddleGame::new(&config, built.handles);
    let mut pipeline = FramePipeline::new();

    let mut raster = RasterBackend::new(config.window.width, config.window.height)?;
    let mut ray_tracer = RayTraceBackend::new(config.window.width, config.window.height)?;
    let mut ray_tracing_enabled = config.rendering.ray_tracing_enabled;

    let mut clock = FrameClock::new();
    let dt = 1.0 / 60.0;
    let demo_frames = config.gameplay.demo_frames;

    log::info!("Ready. Click to start!");

    for frame in 0..demo_frames {
        clock.tick();

        // synthesized input: click to start, then keep the paddle centered;
        // after a loss, click again to restart
        let left_down = frame < 5 || (game.has_lost() && frame % 2 == 0);
        let input = InputState {
            pad_x: 0.5,
            pad_z: 0.5,
            left_down,
            right_down: false,
        };

        // 'R' toggles the active backend at runtime
        if frame == demo_frames / 2 {
            ray_tracing_enabled = !ray_tracing_enabled;
            log::info!(
                "Ray tracing {}",
                if ray_tracing_enabled { "ENABLED" } else { "DISABLED" }
            );
        }

        // 'T' toggles the trophy; exercise it once mid-run
        if frame == demo_frames / 3 {
            game.toggle_trophy(&mut tree);
        }

        let backend: &mut dyn RenderBackend = if ray_tracing_enabled {
            &mut ray_tracer
        } else {
            &mut raster
        };

        pipeline.run_frame(&mut game, &input, dt, &mut tree, &meshes, &materials, backend)?;

        if frame % 60 == 0 {
            log::info!(
                "frame {frame}: {} triangles, {} lights, {:.0} fps",
                pipeline.triangles().len(),
                pipeline.lights().len(),
                clock.average_fps()
            );
        }
    }

    let dispatch = ray_tracer.dispatch_size();
    log::info!(
        "Demo finished after {} frames: {} triangles staged, {} bytes of triangle data, {}x{} compute dispatch",
        clock.frames(),
        pipeline.triangles().len(),
        ray_tracer.triangle_bytes().len(),
        dispatch.groups_x,
        dispatch.groups_y
    );

    Ok(())
}
