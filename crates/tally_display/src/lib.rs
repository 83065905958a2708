//! Tally Display
//!
//! Turns a formatted display string into positioned per-character cells and
//! keeps them stable across renders, so only characters that actually changed
//! are replaced (and animated out).
//!
//! # Architecture
//!
//! ```text
//! display + raw ──► plan_cells ──► PlannedCell[] ──┐
//!                                                  ├─► reconcile ──► CellTable + removed
//! display parts ──► fit_fonts ──► CellFonts ───────┘
//! ```
//!
//! [`NumberDisplayer`] implementations wrap this pipeline with layout and
//! removal scheduling for a renderer.

pub mod cell;
pub mod displayer;
pub mod flat;
pub mod reconcile;

pub use cell::{Cell, CellId, CellKind, CellTable};
pub use displayer::{
    CellFrame, FloatingDecimalDisplayer, NumberDisplayer, PlacedCell, RenderFrame, RetiringCell,
};
pub use flat::FlatDisplayer;
pub use reconcile::{
    fit_fonts, plan_cells, reconcile, split_decimal, CellFonts, CellReconciler, DecimalParts,
    PlannedCell, Reconciliation, INTEGER_WEIGHT, MANTISSA_WEIGHT,
};

use thiserror::Error;

/// Display pipeline errors
///
/// These indicate a formatter or host contract violation, never bad user input.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("display string {display:?} is not a valid decimal ({parts} parts)")]
    InvalidDecimal { display: String, parts: usize },

    #[error(transparent)]
    Text(#[from] tally_text::TextError),
}

pub type Result<T> = std::result::Result<T, DisplayError>;
