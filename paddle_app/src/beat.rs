//! Beat table driving the ball's vertical motion
//!
//! The ball rides the music: each keyframe pins it to the box floor or
//! ceiling at a timestamp, and between keyframes its height interpolates
//! linearly. Audio playback itself lives outside the game; only the timing
//! table is needed here.

/// Where the ball is pinned at a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFrameAction {
    /// Resting on the paddle plane
    Bottom,

    /// Touching the box ceiling
    Top,
}

/// Ordered keyframe timestamps with their ball positions
#[derive(Debug, Clone)]
pub struct BeatTable {
    timestamps: Vec<f64>,
    directions: Vec<KeyFrameAction>,
}

/// Timing of the bundled demo track, seconds from game start
const DEMO_SONG: &[(f64, KeyFrameAction)] = &[
    (0.0, KeyFrameAction::Bottom),
    (0.73, KeyFrameAction::Top),
    (1.46, KeyFrameAction::Bottom),
    (2.19, KeyFrameAction::Top),
    (2.92, KeyFrameAction::Bottom),
    (3.65, KeyFrameAction::Bottom),
    (4.38, KeyFrameAction::Top),
    (5.11, KeyFrameAction::Bottom),
    (5.84, KeyFrameAction::Top),
    (6.57, KeyFrameAction::Bottom),
    (7.3, KeyFrameAction::Top),
    (8.03, KeyFrameAction::Top),
    (8.76, KeyFrameAction::Bottom),
    (9.49, KeyFrameAction::Top),
    (10.22, KeyFrameAction::Bottom),
    (10.95, KeyFrameAction::Top),
    (11.68, KeyFrameAction::Bottom),
    (12.41, KeyFrameAction::Bottom),
    (13.14, KeyFrameAction::Top),
    (13.87, KeyFrameAction::Bottom),
    (14.6, KeyFrameAction::Top),
    (15.33, KeyFrameAction::Bottom),
    (16.06, KeyFrameAction::Top),
    (16.79, KeyFrameAction::Bottom),
];

impl BeatTable {
    /// The beat table of the bundled demo track
    pub fn demo_song() -> Self {
        Self {
            timestamps: DEMO_SONG.iter().map(|&(t, _)| t).collect(),
            directions: DEMO_SONG.iter().map(|&(_, d)| d).collect(),
        }
    }

    /// Number of keyframes
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the table holds no keyframes
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamp of keyframe `index`; past the end, the last keyframe is
    /// treated as lasting forever
    pub fn timestamp(&self, index: usize) -> f64 {
        self.timestamps.get(index).copied().unwrap_or(f64::INFINITY)
    }

    /// Direction of keyframe `index`, clamped to the final keyframe
    pub fn direction(&self, index: usize) -> KeyFrameAction {
        self.directions
            .get(index)
            .or_else(|| self.directions.last())
            .copied()
            .unwrap_or(KeyFrameAction::Bottom)
    }

    /// Latest keyframe whose timestamp has passed, scanning forward from
    /// `current` (keyframes never rewind mid-game)
    pub fn advance(&self, current: usize, elapsed: f64) -> usize {
        let mut frame = current;
        for index in current..self.timestamps.len() {
            if elapsed >= self.timestamps[index] {
                frame = index;
            }
        }
        frame
    }

    /// Fraction of keyframe `index` completed at `elapsed`, in [0, 1]
    pub fn fraction_complete(&self, index: usize, elapsed: f64) -> f64 {
        let start = self.timestamp(index);
        let end = self.timestamp(index + 1);
        if !end.is_finite() {
            return 0.0;
        }
        ((elapsed - start) / (end - start)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_finds_latest_passed_keyframe() {
        let table = BeatTable::demo_song();
        assert_eq!(table.advance(0, 0.0), 0);
        assert_eq!(table.advance(0, 0.8), 1);
        assert_eq!(table.advance(1, 3.0), 4);
        // scanning starts at the current frame, never rewinds
        assert_eq!(table.advance(4, 3.0), 4);
    }

    #[test]
    fn test_last_keyframe_lasts_forever() {
        let table = BeatTable::demo_song();
        let last = table.len() - 1;
        assert_eq!(table.advance(0, 1e9), last);
        assert_eq!(table.timestamp(table.len()), f64::INFINITY);
        assert_eq!(table.fraction_complete(last, 1e9), 0.0);
    }

    #[test]
    fn test_fraction_complete_hits_endpoints() {
        let table = BeatTable::demo_song();
        assert_eq!(table.fraction_complete(0, 0.0), 0.0);
        assert!((table.fraction_complete(0, 0.73) - 1.0).abs() < 1e-12);
        assert!((table.fraction_complete(0, 0.365) - 0.5).abs() < 1e-12);
    }
}
