//! Cell reconciliation
//!
//! Diffs a new display string against the previous render's cells:
//!
//! - **Plan**: classify every display character into a digit or separator
//!   slot and decide whether it was typed or is formatter padding
//! - **Fonts**: fit the integer and mantissa parts into the target area
//! - **Reconcile**: keep cells whose slot content is unchanged, replace the
//!   rest, and report everything that must be removed
//!
//! Nothing here animates or lays out; the result is purely logical.

use smallvec::SmallVec;
use tally_core::{first_divergence, FormatterConfig};
use tally_text::{FontFitter, Size, TextMeasurer, WeightedText};

use crate::cell::{Cell, CellId, CellKind, CellTable};
use crate::{DisplayError, Result};

/// Font weight of integer characters (digits and grouping separators)
pub const INTEGER_WEIGHT: f32 = 1.0;
/// Font weight of mantissa digits
pub const MANTISSA_WEIGHT: f32 = 0.6;

/// Integer part plus mantissa
const MAX_DECIMAL_PARTS: usize = 2;

/// A display string split at its decimal separator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecimalParts<'a> {
    pub integer: &'a str,
    pub mantissa: Option<&'a str>,
}

/// Split `display` at its single decimal separator.
///
/// More than one separator means the formatter broke its contract.
pub fn split_decimal<'a>(display: &'a str, decimal_separator: &str) -> Result<DecimalParts<'a>> {
    let parts: SmallVec<[&str; 3]> = if decimal_separator.is_empty() {
        SmallVec::from_slice(&[display])
    } else {
        display.split(decimal_separator).collect()
    };

    if parts.len() > MAX_DECIMAL_PARTS {
        let text = display;
        tracing::warn!(
            display = text,
            parts = parts.len(),
            "Display string is not a valid decimal"
        );
        return Err(DisplayError::InvalidDecimal {
            display: display.to_string(),
            parts: parts.len(),
        });
    }

    Ok(DecimalParts {
        integer: parts[0],
        mantissa: parts.get(1).copied(),
    })
}

/// Walk the integer part, marking which characters belong to a grouping
/// separator. A run starts wherever the remaining text begins with the
/// separator and covers exactly its length.
pub(crate) fn grouping_runs(integer: &str, grouping_separator: &str) -> Vec<(char, bool)> {
    let chars: Vec<char> = integer.chars().collect();
    let separator: Vec<char> = grouping_separator.chars().collect();
    let mut remaining_run = 0;

    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if remaining_run == 0 && !separator.is_empty() && chars[i..].starts_with(&separator) {
                remaining_run = separator.len();
            }
            let in_run = remaining_run > 0;
            if in_run {
                remaining_run -= 1;
            }
            (c, in_run)
        })
        .collect()
}

/// A classified display character, before identity is assigned
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannedCell {
    pub value: char,
    pub kind: CellKind,
    pub slot: usize,
    pub display_index: usize,
    pub is_default: bool,
}

/// Classify every character of `display` into digit/separator slots.
pub fn plan_cells(display: &str, raw: &str, config: &FormatterConfig) -> Result<Vec<PlannedCell>> {
    let decimal = config.decimal_separator.as_str();
    let parts = split_decimal(display, decimal)?;

    let stripped_display = strip(display, decimal);
    let divergence = first_divergence(
        &stripped_display,
        &strip(raw, decimal),
        &[config.grouping_separator.as_str()],
    )
    .unwrap_or_else(|| stripped_display.chars().count());

    let mut planned = Vec::with_capacity(stripped_display.len());
    let mut position = 0;
    let mut digit_count = 0;
    let mut separator_count = 0;

    for (value, is_separator) in grouping_runs(parts.integer, &config.grouping_separator) {
        let (kind, slot) = if is_separator {
            separator_count += 1;
            (CellKind::GroupingSeparator, separator_count - 1)
        } else {
            digit_count += 1;
            (CellKind::IntegerDigit, digit_count - 1)
        };
        planned.push(PlannedCell {
            value,
            kind,
            slot,
            display_index: position,
            is_default: position >= divergence,
        });
        position += 1;
    }

    for value in parts.mantissa.unwrap_or_default().chars() {
        planned.push(PlannedCell {
            value,
            kind: CellKind::MantissaDigit,
            slot: digit_count,
            display_index: position,
            is_default: position >= divergence,
        });
        digit_count += 1;
        position += 1;
    }

    Ok(planned)
}

fn strip(text: &str, separator: &str) -> String {
    if separator.is_empty() {
        text.to_string()
    } else {
        text.replace(separator, "")
    }
}

/// Font sizes for one render
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellFonts {
    pub integer: f32,
    pub mantissa: f32,
}

impl CellFonts {
    /// Same size for every kind
    pub fn uniform(size: f32) -> Self {
        Self {
            integer: size,
            mantissa: size,
        }
    }

    pub fn for_kind(&self, kind: CellKind) -> f32 {
        match kind {
            CellKind::MantissaDigit => self.mantissa,
            _ => self.integer,
        }
    }
}

/// Fit the display into `area`: integer characters at weight 1.0, mantissa
/// characters at 0.6, each character measured on its own.
pub fn fit_fonts(
    parts: &DecimalParts<'_>,
    measurer: &dyn TextMeasurer,
    area: Size,
    fitter: &FontFitter,
) -> Result<CellFonts> {
    let mut weighted: SmallVec<[WeightedText<'_>; 24]> = SmallVec::new();
    weighted.extend(per_char(parts.integer, INTEGER_WEIGHT));
    if let Some(mantissa) = parts.mantissa {
        weighted.extend(per_char(mantissa, MANTISSA_WEIGHT));
    }

    let size = fitter.fit(&weighted, measurer, area)?;
    Ok(CellFonts {
        integer: size * INTEGER_WEIGHT,
        mantissa: size * MANTISSA_WEIGHT,
    })
}

fn per_char(text: &str, weight: f32) -> impl Iterator<Item = WeightedText<'_>> {
    text.char_indices()
        .map(move |(i, c)| WeightedText::new(&text[i..i + c.len_utf8()], weight))
}

/// Outcome of diffing a plan against the previous cells
#[derive(Clone, Debug, Default)]
pub struct Reconciliation {
    /// The cells to show now
    pub table: CellTable,
    /// Cells allocated in this pass
    pub created: Vec<CellId>,
    /// Cells carried over with only font and display index refreshed
    pub updated: Vec<CellId>,
    /// Previous cells that must leave the render tree
    pub removed: Vec<Cell>,
}

/// Diff `planned` against `previous`, slot by slot.
///
/// A previous cell is reused when character, kind and default flag all match;
/// otherwise it is removed and a new cell takes its slot. Slots beyond the new
/// counts are removed as well.
pub fn reconcile(
    planned: &[PlannedCell],
    fonts: CellFonts,
    previous: &CellTable,
) -> Reconciliation {
    let mut old_digits: Vec<Option<Cell>> = previous.digits.iter().cloned().map(Some).collect();
    let mut old_separators: Vec<Option<Cell>> =
        previous.separators.iter().cloned().map(Some).collect();

    let mut result = Reconciliation {
        table: CellTable {
            digits: Vec::with_capacity(old_digits.len()),
            separators: Vec::with_capacity(old_separators.len()),
            next_id: previous.next_id,
        },
        ..Default::default()
    };

    for plan in planned {
        let old_slot = if plan.kind.is_separator() {
            old_separators.get_mut(plan.slot)
        } else {
            old_digits.get_mut(plan.slot)
        };
        let font_size = fonts.for_kind(plan.kind);

        let cell = match old_slot.and_then(Option::take) {
            Some(mut old)
                if old.value == plan.value
                    && old.kind == plan.kind
                    && old.is_default == plan.is_default =>
            {
                old.font_size = font_size;
                old.display_index = plan.display_index;
                result.updated.push(old.id);
                old
            }
            replaced => {
                result.removed.extend(replaced);
                let id = result.table.allocate_id();
                result.created.push(id);
                Cell {
                    id,
                    value: plan.value,
                    kind: plan.kind,
                    slot: plan.slot,
                    display_index: plan.display_index,
                    is_default: plan.is_default,
                    font_size,
                }
            }
        };

        if plan.kind.is_separator() {
            result.table.separators.push(cell);
        } else {
            result.table.digits.push(cell);
        }
    }

    // Slots past the new counts
    result
        .removed
        .extend(old_digits.into_iter().chain(old_separators).flatten());

    result
}

/// Runs the whole pipeline for one render
#[derive(Clone, Copy, Debug, Default)]
pub struct CellReconciler {
    pub fitter: FontFitter,
}

impl CellReconciler {
    pub fn new(fitter: FontFitter) -> Self {
        Self { fitter }
    }

    /// Plan, fit and reconcile `display` against `previous`.
    pub fn run(
        &self,
        display: &str,
        raw: &str,
        config: &FormatterConfig,
        measurer: &dyn TextMeasurer,
        area: Size,
        previous: &CellTable,
    ) -> Result<Reconciliation> {
        let parts = split_decimal(display, &config.decimal_separator)?;
        let planned = plan_cells(display, raw, config)?;
        let fonts = fit_fonts(&parts, measurer, area, &self.fitter)?;
        Ok(reconcile(&planned, fonts, previous))
    }
}
