//! Display cells
//!
//! A cell is one rendered character. Digits (integer and mantissa) share one
//! ordered list, grouping separators live in another; a cell's position in
//! its list is its slot, and slots are what reconciliation matches on.

use tally_animation::Scrub;

use crate::reconcile::{INTEGER_WEIGHT, MANTISSA_WEIGHT};

/// Stable identity of a cell across renders
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u64);

/// What a cell displays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    IntegerDigit,
    MantissaDigit,
    GroupingSeparator,
    /// Only produced by displayers that draw the decimal separator inline
    DecimalSeparator,
}

impl CellKind {
    /// Font size factor relative to the fitted size
    pub fn weight(self) -> f32 {
        match self {
            CellKind::MantissaDigit => MANTISSA_WEIGHT,
            _ => INTEGER_WEIGHT,
        }
    }

    /// Whether the cell lives in the separator list rather than the digit list
    pub fn is_separator(self) -> bool {
        matches!(self, CellKind::GroupingSeparator | CellKind::DecimalSeparator)
    }

    /// How a retiring cell of this kind slides out: digits up by half their
    /// height, separators down by a quarter.
    pub fn scrub(self) -> Scrub {
        if self.is_separator() {
            Scrub::down(0.25)
        } else {
            Scrub::up(0.5)
        }
    }
}

/// One displayed character
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub value: char,
    pub kind: CellKind,
    /// Index within the digit or separator list
    pub slot: usize,
    /// Position in the display string (decimal separator excluded); orders cells
    pub display_index: usize,
    /// Formatter padding rather than typed input; drawn muted
    pub is_default: bool,
    pub font_size: f32,
}

/// The cells of one render, split into digit and separator lists
#[derive(Clone, Debug, Default)]
pub struct CellTable {
    pub(crate) digits: Vec<Cell>,
    pub(crate) separators: Vec<Cell>,
    pub(crate) next_id: u64,
}

impl CellTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digit cells by slot
    pub fn digits(&self) -> &[Cell] {
        &self.digits
    }

    /// Grouping separator cells by slot
    pub fn separators(&self) -> &[Cell] {
        &self.separators
    }

    pub fn len(&self) -> usize {
        self.digits.len() + self.separators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty() && self.separators.is_empty()
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.iter().find(|cell| cell.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.digits
            .iter_mut()
            .chain(self.separators.iter_mut())
            .find(|cell| cell.id == id)
    }

    /// All cells, digits first
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.digits.iter().chain(self.separators.iter())
    }

    /// All cells ordered left to right by display index
    pub fn in_display_order(&self) -> Vec<&Cell> {
        let mut merged = Vec::with_capacity(self.len());
        let mut digits = self.digits.iter().peekable();
        let mut separators = self.separators.iter().peekable();

        loop {
            let next = match (digits.peek(), separators.peek()) {
                (Some(d), Some(s)) if d.display_index < s.display_index => digits.next(),
                (Some(_), Some(_)) => separators.next(),
                (Some(_), None) => digits.next(),
                (None, Some(_)) => separators.next(),
                (None, None) => break,
            };
            merged.extend(next);
        }

        merged
    }

    /// Hand out a fresh id
    pub(crate) fn allocate_id(&mut self) -> CellId {
        let id = CellId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Empty the table, returning every cell. Ids keep counting up.
    pub fn take_all(&mut self) -> Vec<Cell> {
        let mut cells = std::mem::take(&mut self.digits);
        cells.append(&mut self.separators);
        cells
    }
}
