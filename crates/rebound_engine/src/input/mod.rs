//! Input state sampled once per frame
//!
//! The OS window layer owns the actual event callbacks; it fills an
//! [`InputState`] before each frame and hands it to the frame pipeline.
//! The engine never talks to the windowing system directly.

/// Snapshot of the player input for one frame
///
/// Paddle coordinates are normalized to [0, 1] across each box axis; the
/// window layer accumulates mouse deltas into them and clamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Normalized paddle position along the box X axis
    pub pad_x: f32,

    /// Normalized paddle position along the box Z axis
    pub pad_z: f32,

    /// Left mouse button is currently held
    pub left_down: bool,

    /// Right mouse button is currently held
    pub right_down: bool,
}

/// Edge detector for a single button
///
/// Mirrors the pressed/released bookkeeping the game logic needs: a
/// "release" fires on the frame the button transitions from held to up.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonEdge {
    held: bool,
}

impl ButtonEdge {
    /// Create a new edge detector with the button up
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current button state; returns true if the button was
    /// released this frame
    pub fn released(&mut self, down: bool) -> bool {
        let released = self.held && !down;
        self.held = down;
        released
    }

    /// Whether the button was held as of the last sample
    pub fn is_held(&self) -> bool {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_fires_on_falling_edge_only() {
        let mut edge = ButtonEdge::new();

        assert!(!edge.released(false));
        assert!(!edge.released(true));
        assert!(!edge.released(true));
        assert!(edge.released(false));
        assert!(!edge.released(false));
    }
}
