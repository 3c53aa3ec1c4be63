use anyhow::{Result, ensure};

use crate::core::RenderBackend;

use super::FrameSlot;

/// Outcome of a frame-buffer operation.
///
/// Once any operation has returned `Error` the buffer is poisoned: every
/// further `begin`/`end`/`draw_latest` also returns `Error` and the object
/// should be destroyed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    Ok,
    Error,
}

/// Fixed set of frame slots mediating between one update producer and one
/// draw consumer.
///
/// Invariants:
/// - at most one slot is in progress at a time;
/// - the write slot is always distinct from the latest-complete slot, so a
///   draw never observes in-progress writes;
/// - the latest-complete designation changes only inside [`end`](Self::end).
pub struct FrameBuffer {
    slots: Vec<FrameSlot>,
    write_index: usize,
    latest_complete: Option<usize>,
    in_progress: bool,
    poisoned: bool,
}

impl FrameBuffer {
    /// Triple buffering tolerates a consumer slower than the producer
    /// without ever exposing a slot mid-write.
    pub const DEFAULT_CAPACITY: usize = 3;

    /// Allocates `capacity` slots. Fewer than two cannot separate the write
    /// slot from the published one and is a construction failure.
    pub fn new(capacity: usize) -> Result<Self> {
        ensure!(capacity >= 2, "frame buffer needs at least 2 slots, got {capacity}");
        let mut slots = Vec::new();
        slots.resize_with(capacity, FrameSlot::new);
        Ok(Self {
            slots,
            write_index: 0,
            latest_complete: None,
            in_progress: false,
            poisoned: false,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn status(&self) -> FrameStatus {
        if self.poisoned { FrameStatus::Error } else { FrameStatus::Ok }
    }

    /// Opens a frame: selects the next writable slot, resets it to the
    /// clean baseline and marks it in progress.
    ///
    /// Calling `begin` again without an intervening [`end`](Self::end) is a
    /// contract violation and poisons the buffer.
    pub fn begin(&mut self) -> FrameStatus {
        if self.poisoned || self.in_progress {
            self.poisoned = true;
            return FrameStatus::Error;
        }

        let mut next = (self.write_index + 1) % self.slots.len();
        if Some(next) == self.latest_complete {
            next = (next + 1) % self.slots.len();
        }

        self.slots[next].reset();
        self.write_index = next;
        self.in_progress = true;
        FrameStatus::Ok
    }

    /// The slot opened by the last [`begin`](Self::begin), for recording.
    ///
    /// `None` outside a begin/end pair or after the buffer is poisoned.
    pub fn frame_mut(&mut self) -> Option<&mut FrameSlot> {
        if self.poisoned || !self.in_progress {
            return None;
        }
        self.slots.get_mut(self.write_index)
    }

    /// Closes the frame opened by [`begin`](Self::begin) and publishes it as
    /// the new latest-complete slot.
    ///
    /// The publish is a single assignment; a consumer moved to another
    /// thread would see either the old or the new index, never a mix.
    pub fn end(&mut self) -> FrameStatus {
        if self.poisoned || !self.in_progress {
            self.poisoned = true;
            return FrameStatus::Error;
        }
        self.in_progress = false;
        self.latest_complete = Some(self.write_index);
        FrameStatus::Ok
    }

    /// Submits the latest-complete slot to the render backend.
    ///
    /// Redrawing the same slot with no new `end` in between is allowed;
    /// that is how the draw cadence decouples from the tick cadence. Before
    /// the first `end` there is nothing to show and the call is a no-op.
    pub fn draw_latest(&mut self, backend: &mut impl RenderBackend) -> FrameStatus {
        if self.poisoned {
            return FrameStatus::Error;
        }
        let Some(index) = self.latest_complete else {
            return FrameStatus::Ok;
        };
        if let Err(err) = backend.submit(&self.slots[index]) {
            log::error!("frame submission failed: {err:#}");
            self.poisoned = true;
            return FrameStatus::Error;
        }
        FrameStatus::Ok
    }

    /// Releases the buffer. Reports `false` when torn down mid-write (the
    /// open frame is discarded rather than published).
    pub fn destroy(self) -> bool {
        !self.in_progress
    }
}
