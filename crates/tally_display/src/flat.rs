//! Flat displayer
//!
//! Shows the display string as one fitted run of text: every character,
//! decimal separator included, at the same font size. Cells are rebuilt on
//! every render and nothing animates.

use tally_core::{first_divergence, FormatterConfig};
use tally_text::{FontFitter, Size, TextMeasurer, WeightedText};

use crate::cell::{Cell, CellId, CellKind, CellTable};
use crate::displayer::{CellFrame, NumberDisplayer, PlacedCell, RenderFrame};
use crate::reconcile::{grouping_runs, split_decimal};
use crate::Result;

pub struct FlatDisplayer {
    measurer: Box<dyn TextMeasurer>,
    fitter: FontFitter,
    table: CellTable,
}

impl FlatDisplayer {
    pub fn new(measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            measurer: Box::new(measurer),
            fitter: FontFitter::default(),
            table: CellTable::new(),
        }
    }

    pub fn with_fitter(mut self, fitter: FontFitter) -> Self {
        self.fitter = fitter;
        self
    }

    pub fn cells(&self) -> &CellTable {
        &self.table
    }

    /// Classify each display character. Display indices here include the
    /// decimal separator, since it is drawn.
    fn build(
        &mut self,
        display: &str,
        raw: &str,
        config: &FormatterConfig,
        font_size: f32,
    ) -> Result<()> {
        let parts = split_decimal(display, &config.decimal_separator)?;
        let divergence = first_divergence(display, raw, &[config.grouping_separator.as_str()])
            .unwrap_or_else(|| display.chars().count());

        let runs = grouping_runs(parts.integer, &config.grouping_separator);
        let mut kinds: Vec<(char, CellKind)> = runs
            .into_iter()
            .map(|(c, is_separator)| {
                let kind = if is_separator {
                    CellKind::GroupingSeparator
                } else {
                    CellKind::IntegerDigit
                };
                (c, kind)
            })
            .collect();
        if let Some(mantissa) = parts.mantissa {
            let separator = config.decimal_separator.chars();
            kinds.extend(separator.map(|c| (c, CellKind::DecimalSeparator)));
            kinds.extend(mantissa.chars().map(|c| (c, CellKind::MantissaDigit)));
        }

        for (display_index, (value, kind)) in kinds.into_iter().enumerate() {
            let id = self.table.allocate_id();
            let list = if kind.is_separator() {
                &mut self.table.separators
            } else {
                &mut self.table.digits
            };
            list.push(Cell {
                id,
                value,
                kind,
                slot: list.len(),
                display_index,
                is_default: display_index >= divergence,
                font_size,
            });
        }
        Ok(())
    }
}

impl NumberDisplayer for FlatDisplayer {
    fn render(
        &mut self,
        display: &str,
        raw: &str,
        config: &FormatterConfig,
        area: Size,
    ) -> Result<RenderFrame> {
        // Validate before dropping the current cells
        split_decimal(display, &config.decimal_separator)?;
        let font_size = self
            .fitter
            .fit(&[WeightedText::new(display, 1.0)], &*self.measurer, area)?;

        let detached = self.detach_all();
        self.build(display, raw, config, font_size)?;

        let width = self.measurer.measure(display, font_size).width;
        let mut x = area.width - width;
        let mut buf = [0u8; 4];
        let mut cells = Vec::with_capacity(self.table.len());
        for cell in self.table.in_display_order() {
            let advance = self.measurer.measure(cell.value.encode_utf8(&mut buf), font_size).width;
            cells.push(PlacedCell {
                cell: cell.clone(),
                frame: CellFrame {
                    x,
                    y: 0.0,
                    width: advance,
                    height: area.height,
                },
            });
            x += advance;
        }

        let created: Vec<CellId> = cells.iter().map(|placed| placed.cell.id).collect();
        Ok(RenderFrame {
            cells,
            created,
            detached,
            ..Default::default()
        })
    }

    fn detach_all(&mut self) -> Vec<CellId> {
        self.table.take_all().iter().map(|cell| cell.id).collect()
    }
}
