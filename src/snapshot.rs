// Last captured camera frame, shared with debug pixel lookups.
// The loop swaps in a new version every tick; readers never block it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;

use crate::types::{Color, FrameBuffer};

/// One captured camera frame, tagged with the tick that produced it.
#[derive(Debug)]
pub struct Snapshot {
    pub version: u64,
    pub frame: FrameBuffer,
}

impl Snapshot {
    pub fn pixel_at(&self, x: usize, y: usize) -> Option<Color> {
        self.frame.color_at(x, y)
    }
}

/// Lock-free holder for the most recently captured frame.
///
/// The frame loop publishes once per tick; readers (the click handler, or any
/// other thread sharing the `Arc`) load an immutable snapshot that may be one
/// frame behind. Only the latest frame is retained.
#[derive(Debug, Default)]
pub struct FrameSnapshot {
    current: ArcSwapOption<Snapshot>,
    next_version: AtomicU64,
}

impl FrameSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored frame and returns the version assigned to it.
    pub fn publish(&self, frame: FrameBuffer) -> u64 {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed) + 1;
        self.current.store(Some(Arc::new(Snapshot { version, frame })));
        version
    }

    /// The latest snapshot, if any frame has been published.
    pub fn load(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    /// RGB of the last captured frame at (x,y), with the frame's version.
    pub fn pixel_at(&self, x: usize, y: usize) -> Option<(u64, Color)> {
        let snap = self.load()?;
        snap.pixel_at(x, y).map(|c| (snap.version, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_first_publish() {
        let slot = FrameSnapshot::new();
        assert!(slot.load().is_none());
        assert_eq!(slot.pixel_at(0, 0), None);
    }

    #[test]
    fn lookup_returns_exact_rgb_of_latest_frame() {
        let slot = FrameSnapshot::new();
        let mut fb = FrameBuffer::filled(4, 3, Color::new(1, 1, 1));
        fb.pixels[2 * 4 + 3] = Color::new(200, 100, 50).pack();

        assert_eq!(slot.publish(fb.clone()), 1);
        assert_eq!(slot.pixel_at(3, 2), Some((1, Color::new(200, 100, 50))));
        assert_eq!(slot.pixel_at(4, 0), None);

        fb.pixels[2 * 4 + 3] = Color::new(0, 0, 0).pack();
        assert_eq!(slot.publish(fb), 2);
        assert_eq!(slot.pixel_at(3, 2), Some((2, Color::new(0, 0, 0))));
    }

    #[test]
    fn held_snapshot_survives_newer_publish() {
        let slot = FrameSnapshot::new();
        slot.publish(FrameBuffer::filled(1, 1, Color::new(5, 6, 7)));
        let old = slot.load().unwrap();
        slot.publish(FrameBuffer::filled(1, 1, Color::new(8, 9, 10)));

        assert_eq!(old.version, 1);
        assert_eq!(old.pixel_at(0, 0), Some(Color::new(5, 6, 7)));
        assert_eq!(slot.load().unwrap().version, 2);
    }

    #[test]
    fn readable_from_another_thread() {
        let slot = Arc::new(FrameSnapshot::new());
        slot.publish(FrameBuffer::filled(2, 2, Color::new(42, 43, 44)));
        let reader = Arc::clone(&slot);
        let got = std::thread::spawn(move || reader.pixel_at(1, 1)).join().unwrap();
        assert_eq!(got, Some((1, Color::new(42, 43, 44))));
    }
}
