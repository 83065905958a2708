//! Removal scheduler
//!
//! Holds cells that have been replaced but are still animating out. The host
//! ticks the scheduler once per frame; tasks whose time is up are returned so
//! the host can detach them from its render tree. Nothing runs on a timer
//! thread, so dropping the scheduler drops every pending removal with it.

use slotmap::{new_key_type, SlotMap};
use std::time::Duration;

/// How long a retiring cell animates before it is detached
pub const DEFAULT_REMOVAL_DURATION: Duration = Duration::from_millis(200);

new_key_type! {
    /// Handle to a pending removal
    pub struct RemovalId;
}

/// Vertical direction a retiring cell slides in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrubDirection {
    Up,
    Down,
}

/// Slide applied to a retiring cell, as a fraction of its own height
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scrub {
    pub direction: ScrubDirection,
    pub height_fraction: f32,
}

impl Scrub {
    pub fn up(height_fraction: f32) -> Self {
        Self {
            direction: ScrubDirection::Up,
            height_fraction,
        }
    }

    pub fn down(height_fraction: f32) -> Self {
        Self {
            direction: ScrubDirection::Down,
            height_fraction,
        }
    }

    /// Signed vertical offset (y grows downward) at `progress` for a cell of `height`
    pub fn offset(&self, height: f32, progress: f32) -> f32 {
        let distance = height * self.height_fraction * progress;
        match self.direction {
            ScrubDirection::Up => -distance,
            ScrubDirection::Down => distance,
        }
    }
}

/// Animation state of one retiring cell at the current tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrubFrame {
    /// Eased progress, 0 at schedule time and 1 when detached
    pub progress: f32,
    /// Opacity, fading from 1 to 0
    pub opacity: f32,
    pub scrub: Scrub,
}

impl ScrubFrame {
    /// Vertical offset for a cell of `height`
    pub fn offset(&self, height: f32) -> f32 {
        self.scrub.offset(height, self.progress)
    }
}

/// Smoothstep ease-in-out over `[0, 1]`
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

struct Removal<T> {
    payload: T,
    scrub: Scrub,
    elapsed: Duration,
}

/// Pending removals, keyed by [`RemovalId`]
pub struct RemovalScheduler<T> {
    tasks: SlotMap<RemovalId, Removal<T>>,
    duration: Duration,
}

impl<T> Default for RemovalScheduler<T> {
    fn default() -> Self {
        Self::new(DEFAULT_REMOVAL_DURATION)
    }
}

impl<T> RemovalScheduler<T> {
    pub fn new(duration: Duration) -> Self {
        Self {
            tasks: SlotMap::with_key(),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Start animating `payload` out
    pub fn schedule(&mut self, payload: T, scrub: Scrub) -> RemovalId {
        self.tasks.insert(Removal {
            payload,
            scrub,
            elapsed: Duration::ZERO,
        })
    }

    /// Cancel a pending removal, returning its payload
    pub fn cancel(&mut self, id: RemovalId) -> Option<T> {
        self.tasks.remove(id).map(|removal| removal.payload)
    }

    /// Cancel the first pending removal whose payload matches
    pub fn cancel_where<F>(&mut self, mut predicate: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let id = self
            .tasks
            .iter()
            .find(|(_, removal)| predicate(&removal.payload))
            .map(|(id, _)| id)?;
        tracing::trace!("Pending removal cancelled for reuse");
        self.cancel(id)
    }

    /// Cancel everything, returning payloads that still need detaching
    pub fn cancel_all(&mut self) -> Vec<T> {
        self.tasks.drain().map(|(_, removal)| removal.payload).collect()
    }

    /// Advance every pending removal by `dt`; returns the payloads whose
    /// animation finished.
    pub fn tick(&mut self, dt: Duration) -> Vec<T> {
        let duration = self.duration;
        let mut expired = Vec::new();

        for removal in self.tasks.values_mut() {
            removal.elapsed += dt;
        }

        let done: Vec<RemovalId> = self
            .tasks
            .iter()
            .filter(|(_, removal)| removal.elapsed >= duration)
            .map(|(id, _)| id)
            .collect();

        for id in done {
            if let Some(removal) = self.tasks.remove(id) {
                expired.push(removal.payload);
            }
        }

        expired
    }

    /// Current frame for a pending removal
    pub fn frame(&self, id: RemovalId) -> Option<ScrubFrame> {
        self.tasks.get(id).map(|removal| self.frame_of(removal))
    }

    /// Pending payloads with their current frame
    pub fn iter(&self) -> impl Iterator<Item = (RemovalId, &T, ScrubFrame)> + '_ {
        self.tasks
            .iter()
            .map(|(id, removal)| (id, &removal.payload, self.frame_of(removal)))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn frame_of(&self, removal: &Removal<T>) -> ScrubFrame {
        let linear = if self.duration.is_zero() {
            1.0
        } else {
            (removal.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        let progress = ease_in_out(linear);
        ScrubFrame {
            progress,
            opacity: 1.0 - progress,
            scrub: removal.scrub,
        }
    }
}
