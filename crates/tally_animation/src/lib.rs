//! Tally Animation System
//!
//! Frame-ticked removal of display cells that were superseded by a reconcile.
//!
//! # Features
//!
//! - **Deferred removal**: a retiring cell stays attached for the animation
//!   duration, then is handed back for detaching
//! - **Cancellable**: a pending removal can be cancelled, e.g. when the same
//!   cell is needed again before its timer fires
//! - **Scrub-out frames**: eased offset and opacity for the renderer

pub mod removal;

pub use removal::{
    ease_in_out, RemovalId, RemovalScheduler, Scrub, ScrubDirection, ScrubFrame,
    DEFAULT_REMOVAL_DURATION,
};
