//! Ball, paddle, and camera logic
//!
//! Ports the arcade rules: the ball bounces around the box in X/Z at
//! constant speed while its height rides the beat table, and the player
//! (or autoplay) keeps the paddle under it. Missing the ball on a
//! bottom-to-top beat loses the game.

use rebound_engine::input::ButtonEdge;
use rebound_engine::prelude::*;

use crate::beat::{BeatTable, KeyFrameAction};
use crate::config::GameConfig;
use crate::scene::{box_dimensions, box_position, pad_dimensions, SceneHandles};

/// Extra clearance on the near wall so the ball never fills the camera
const CAMERA_WALL_OFFSET: f32 = 30.0;

/// Fixed camera position in world space
fn initial_camera_position() -> Vec3 {
    Vec3::new(0.0, 2.0, -20.0)
}

/// The running game state, updated once per frame
pub struct PaddleGame {
    handles: SceneHandles,
    beat: BeatTable,

    aspect: f32,
    ball_radius: f32,
    ball_speed: f32,
    autoplay: bool,

    ball_position: Vec3,
    ball_direction: Vec3,

    has_started: bool,
    has_lost: bool,
    is_paused: bool,
    current_key_frame: usize,
    previous_key_frame: usize,
    total_elapsed: f64,
    game_elapsed: f64,

    left_button: ButtonEdge,
    right_button: ButtonEdge,

    /// View matrix supplied by the free camera, when active
    pub free_camera_view: Option<Mat4>,
}

impl PaddleGame {
    /// Create a fresh game over the given scene
    pub fn new(config: &GameConfig, handles: SceneHandles) -> Self {
        let ball_radius = config.gameplay.ball_radius;
        Self {
            handles,
            beat: BeatTable::demo_song(),
            aspect: config.window.width as f32 / config.window.height as f32,
            ball_radius,
            ball_speed: config.gameplay.ball_speed,
            autoplay: config.gameplay.autoplay,
            ball_position: Vec3::new(
                0.0,
                ball_radius + pad_dimensions().y,
                box_dimensions().z / 2.0,
            ),
            ball_direction: Vec3::new(1.0, 1.0, 0.2),
            has_started: false,
            has_lost: false,
            is_paused: false,
            current_key_frame: 0,
            previous_key_frame: 0,
            total_elapsed: 0.0,
            game_elapsed: 0.0,
            left_button: ButtonEdge::new(),
            right_button: ButtonEdge::new(),
            free_camera_view: None,
        }
    }

    /// Whether the player has lost and is waiting to restart
    pub fn has_lost(&self) -> bool {
        self.has_lost
    }

    /// Whether a round is currently running
    pub fn has_started(&self) -> bool {
        self.has_started
    }

    /// Attach or detach the trophy model ('T' key)
    pub fn toggle_trophy(&mut self, tree: &mut SceneTree) {
        let Some(trophy) = self.handles.trophy_node else {
            return;
        };
        let root = tree.root();
        if tree.detach_child(root, trophy) {
            log::info!("Trophy removed");
        } else {
            tree.add_child(root, trophy);
            log::info!("Trophy added");
        }
    }
}

impl GameUpdate for PaddleGame {
    fn update(&mut self, tree: &mut SceneTree, input: &InputState, dt: f32) -> CameraMatrices {
        let box_dims = box_dimensions();
        let pad_dims = pad_dimensions();
        let box_pos = box_position();
        let r = self.ball_radius;

        let ball_bottom_y = box_pos.y - box_dims.y / 2.0 + r + pad_dims.y;
        let ball_top_y = box_pos.y + box_dims.y / 2.0 - r;
        let vertical_travel = ball_top_y - ball_bottom_y;

        let ball_min_x = box_pos.x - box_dims.x / 2.0 + r;
        let ball_max_x = box_pos.x + box_dims.x / 2.0 - r;
        let ball_min_z = box_pos.z - box_dims.z / 2.0 + r;
        let ball_max_z = box_pos.z + box_dims.z / 2.0 - r - CAMERA_WALL_OFFSET;

        let mut pad_x = input.pad_x.clamp(0.0, 1.0);
        let mut pad_z = input.pad_z.clamp(0.0, 1.0);

        let left_released = self.left_button.released(input.left_down);
        let right_released = self.right_button.released(input.right_down);

        if self.has_started {
            self.total_elapsed += f64::from(dt);
            if self.has_lost {
                if left_released {
                    self.has_lost = false;
                    self.has_started = false;
                    self.current_key_frame = 0;
                    self.previous_key_frame = 0;
                }
            } else if self.is_paused {
                if right_released {
                    self.is_paused = false;
                }
            } else {
                self.game_elapsed += f64::from(dt);
                if right_released {
                    self.is_paused = true;
                }

                self.current_key_frame = self.beat.advance(self.current_key_frame, self.game_elapsed);
                let jumped_to_next_frame = self.current_key_frame != self.previous_key_frame;
                self.previous_key_frame = self.current_key_frame;

                let fraction = self.beat.fraction_complete(self.current_key_frame, self.game_elapsed) as f32;
                let origin = self.beat.direction(self.current_key_frame);
                let destination = self.beat.direction(self.current_key_frame + 1);

                // the beat pins the ball's height; X/Z keep bouncing freely
                let ball_y = match (origin, destination) {
                    (KeyFrameAction::Bottom, KeyFrameAction::Bottom) => ball_bottom_y,
                    (KeyFrameAction::Top, KeyFrameAction::Top) => ball_bottom_y + vertical_travel,
                    (_, KeyFrameAction::Bottom) => ball_bottom_y + vertical_travel * (1.0 - fraction),
                    (_, KeyFrameAction::Top) => ball_bottom_y + vertical_travel * fraction,
                };

                self.ball_position.x += dt * self.ball_speed * self.ball_direction.x;
                self.ball_position.y = ball_y;
                self.ball_position.z += dt * self.ball_speed * self.ball_direction.z;

                if self.ball_position.x < ball_min_x {
                    self.ball_position.x = ball_min_x;
                    self.ball_direction.x *= -1.0;
                } else if self.ball_position.x > ball_max_x {
                    self.ball_position.x = ball_max_x;
                    self.ball_direction.x *= -1.0;
                }
                if self.ball_position.z < ball_min_z {
                    self.ball_position.z = ball_min_z;
                    self.ball_direction.z *= -1.0;
                } else if self.ball_position.z > ball_max_z {
                    self.ball_position.z = ball_max_z;
                    self.ball_direction.z *= -1.0;
                }

                if self.autoplay {
                    pad_x = 1.0 - (self.ball_position.x - ball_min_x) / (ball_max_x - ball_min_x);
                    pad_z = 1.0
                        - (self.ball_position.z - ball_min_z)
                            / ((ball_max_z + CAMERA_WALL_OFFSET) - ball_min_z);
                }

                // the ball just landed and is about to rise again: it must
                // be over the paddle or the round is lost
                if jumped_to_next_frame
                    && origin == KeyFrameAction::Bottom
                    && destination == KeyFrameAction::Top
                {
                    let pad_left_x =
                        box_pos.x - box_dims.x / 2.0 + (1.0 - pad_x) * (box_dims.x - pad_dims.x);
                    let pad_right_x = pad_left_x + pad_dims.x;
                    let pad_front_z =
                        box_pos.z - box_dims.z / 2.0 + (1.0 - pad_z) * (box_dims.z - pad_dims.z);
                    let pad_back_z = pad_front_z + pad_dims.z;

                    if self.ball_position.x < pad_left_x
                        || self.ball_position.x > pad_right_x
                        || self.ball_position.z < pad_front_z
                        || self.ball_position.z > pad_back_z
                    {
                        self.has_lost = true;
                        log::info!("Ball missed the paddle; game lost");
                    }
                }
            }
        } else {
            if input.left_down {
                self.total_elapsed = 0.0;
                self.game_elapsed = 0.0;
                self.has_started = true;
            }

            // until the round starts the ball sits on the paddle
            self.ball_position.x = ball_min_x + (1.0 - pad_x) * (ball_max_x - ball_min_x);
            self.ball_position.y = ball_bottom_y;
            self.ball_position.z =
                ball_min_z + (1.0 - pad_z) * ((ball_max_z + CAMERA_WALL_OFFSET) - ball_min_z);
        }

        tree[self.handles.box_node].position = box_pos;

        tree[self.handles.ball_node].position = self.ball_position;
        tree[self.handles.ball_node].scale = Vec3::new(r, r, r);
        tree[self.handles.ball_node].rotation = Vec3::new(0.0, self.total_elapsed as f32 * 2.0, 0.0);

        tree[self.handles.pad_node].position = Vec3::new(
            box_pos.x - box_dims.x / 2.0
                + pad_dims.x / 2.0
                + (1.0 - pad_x) * (box_dims.x - pad_dims.x),
            box_pos.y - box_dims.y / 2.0 + pad_dims.y / 2.0,
            box_pos.z - box_dims.z / 2.0
                + pad_dims.z / 2.0
                + (1.0 - pad_z) * (box_dims.z - pad_dims.z),
        );

        let view = self.free_camera_view.unwrap_or_else(|| {
            // fixed camera: yaw follows the paddle through a sigmoid, pitch
            // dips as the paddle moves towards the near wall
            let look_rotation = -0.6 / (1.0 + (-5.0 * (pad_x - 0.5)).exp()) + 0.3;
            Mat4::rotation_x(0.3 + 0.2 * -(pad_z * pad_z))
                * Mat4::rotation_y(look_rotation)
                * Mat4::new_translation(&-initial_camera_position())
        });

        CameraMatrices {
            view,
            projection: Mat4::perspective(
                rebound_engine::foundation::math::deg_to_rad(80.0),
                self.aspect,
                0.1,
                350.0,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{build_scene, SceneTextures};

    fn built_game(autoplay: bool) -> (PaddleGame, SceneTree) {
        let mut config = GameConfig::default();
        config.gameplay.autoplay = autoplay;
        let textures = SceneTextures {
            brick_diffuse: TextureHandle(1),
            brick_normal: TextureHandle(2),
            brick_roughness: TextureHandle(3),
            charmap: TextureHandle(4),
        };
        let built = build_scene(&config, &textures, None);
        let game = PaddleGame::new(&config, built.handles);
        (game, built.tree)
    }

    fn step(game: &mut PaddleGame, tree: &mut SceneTree, input: &InputState, dt: f32) {
        let _ = game.update(tree, input, dt);
    }

    #[test]
    fn test_round_starts_on_left_press() {
        let (mut game, mut tree) = built_game(false);
        let idle = InputState {
            pad_x: 0.5,
            pad_z: 0.5,
            ..InputState::default()
        };

        step(&mut game, &mut tree, &idle, 0.016);
        assert!(!game.has_started());

        let press = InputState {
            left_down: true,
            ..idle
        };
        step(&mut game, &mut tree, &press, 0.016);
        assert!(game.has_started());
    }

    #[test]
    fn test_ball_stays_inside_the_box() {
        let (mut game, mut tree) = built_game(true);
        let press = InputState {
            pad_x: 0.5,
            pad_z: 0.5,
            left_down: true,
            ..InputState::default()
        };
        step(&mut game, &mut tree, &press, 0.016);

        let run = InputState {
            pad_x: 0.5,
            pad_z: 0.5,
            ..InputState::default()
        };
        for _ in 0..2000 {
            step(&mut game, &mut tree, &run, 0.016);
        }

        assert!(!game.has_lost());
        let box_dims = box_dimensions();
        let box_pos = box_position();
        let ball = tree[game.handles.ball_node].position;
        assert!(ball.x >= box_pos.x - box_dims.x / 2.0);
        assert!(ball.x <= box_pos.x + box_dims.x / 2.0);
        assert!(ball.z >= box_pos.z - box_dims.z / 2.0);
        assert!(ball.z <= box_pos.z + box_dims.z / 2.0);
    }

    #[test]
    fn test_missing_the_paddle_loses_the_round() {
        let (mut game, mut tree) = built_game(false);
        let press = InputState {
            pad_x: 0.5,
            pad_z: 0.5,
            left_down: true,
            ..InputState::default()
        };
        step(&mut game, &mut tree, &press, 0.016);

        // park the paddle in the far corner and wait for the first
        // bottom-to-top beat
        let corner = InputState {
            pad_x: 1.0,
            pad_z: 1.0,
            ..InputState::default()
        };
        for _ in 0..120 {
            step(&mut game, &mut tree, &corner, 0.016);
        }

        assert!(game.has_lost());
    }

    #[test]
    fn test_left_release_restarts_after_loss() {
        let (mut game, mut tree) = built_game(false);
        let press = InputState {
            pad_x: 0.5,
            pad_z: 0.5,
            left_down: true,
            ..InputState::default()
        };
        step(&mut game, &mut tree, &press, 0.016);

        let corner = InputState {
            pad_x: 1.0,
            pad_z: 1.0,
            ..InputState::default()
        };
        for _ in 0..120 {
            step(&mut game, &mut tree, &corner, 0.016);
        }
        assert!(game.has_lost());

        let click = InputState {
            left_down: true,
            ..corner
        };
        step(&mut game, &mut tree, &click, 0.016);
        step(&mut game, &mut tree, &corner, 0.016); // release edge
        assert!(!game.has_lost());
        assert!(!game.has_started());
    }

    #[test]
    fn test_trophy_toggle_detaches_and_reattaches() {
        let mut config = GameConfig::default();
        config.gameplay.autoplay = false;
        let textures = SceneTextures {
            brick_diffuse: TextureHandle(1),
            brick_normal: TextureHandle(2),
            brick_roughness: TextureHandle(3),
            charmap: TextureHandle(4),
        };
        let built = build_scene(&config, &textures, Some(Mesh::uv_sphere(1.0, 6, 4)));
        let mut tree = built.tree;
        let mut game = PaddleGame::new(&config, built.handles);

        let trophy = built.handles.trophy_node.expect("trophy attached");
        let root = tree.root();

        game.toggle_trophy(&mut tree);
        assert!(!tree.has_child(root, trophy));
        game.toggle_trophy(&mut tree);
        assert!(tree.has_child(root, trophy));
    }
}
