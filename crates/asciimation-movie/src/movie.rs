//! The immutable frame sequence shared by every player.

use crate::frame::Frame;
use std::time::Duration;

/// Ordered frames of one movie, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Movie {
    frames: Vec<Frame>,
}

impl Movie {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Frames from `start` to the end. Empty when `start` is out of range.
    pub fn frames_from(&self, start: usize) -> &[Frame] {
        self.frames.get(start..).unwrap_or(&[])
    }

    /// Resolve a client-supplied start offset.
    ///
    /// Anything that is not an integer in `0..len` starts from the
    /// beginning.
    pub fn start_index(&self, requested: Option<&str>) -> usize {
        requested
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&n| n < self.frames.len())
            .unwrap_or(0)
    }

    /// Running time of the whole movie.
    pub fn total_duration(&self) -> Duration {
        self.frames.iter().map(Frame::delay).sum()
    }
}

impl From<Vec<Frame>> for Movie {
    fn from(frames: Vec<Frame>) -> Self {
        Self::new(frames)
    }
}
