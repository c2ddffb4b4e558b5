//! Sprite frame cycling driven by physics ticks

/// Cycles a frame index every `cadence` ticks.
///
/// Animation state only changes when [`FrameAnimator::advance`] is called,
/// so playback speed follows the physics tick rate, never the draw rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAnimator {
    num_frames: usize,
    cadence: u32,
    current_frame: usize,
    frame_counter: u32,
}

impl FrameAnimator {
    /// `num_frames` and `cadence` are checked by the caller; both must be non-zero.
    pub(crate) fn new(num_frames: usize, cadence: u32) -> Self {
        debug_assert!(num_frames > 0 && cadence > 0);
        Self {
            num_frames,
            cadence,
            current_frame: 0,
            frame_counter: 0,
        }
    }

    /// Count one tick. Returns the new frame index when the frame advanced.
    pub fn advance(&mut self) -> Option<usize> {
        self.frame_counter += 1;
        if self.frame_counter < self.cadence {
            return None;
        }
        self.frame_counter = 0;
        self.current_frame = (self.current_frame + 1) % self.num_frames;
        Some(self.current_frame)
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn cadence(&self) -> u32 {
        self.cadence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_on_cadence() {
        let mut anim = FrameAnimator::new(4, 10);
        for _ in 0..9 {
            assert_eq!(anim.advance(), None);
        }
        assert_eq!(anim.frame_counter(), 9);
        assert_eq!(anim.advance(), Some(1));
        assert_eq!(anim.frame_counter(), 0);
    }

    #[test]
    fn test_wraps_around() {
        let mut anim = FrameAnimator::new(3, 1);
        let frames: Vec<_> = (0..7).filter_map(|_| anim.advance()).collect();
        assert_eq!(frames, vec![1, 2, 0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_single_frame_stays_zero() {
        let mut anim = FrameAnimator::new(1, 2);
        for _ in 0..100 {
            anim.advance();
            assert_eq!(anim.current_frame(), 0);
        }
    }
}
