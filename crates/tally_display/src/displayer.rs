//! Number displayers
//!
//! A [`NumberDisplayer`] turns a display string into positioned cells for a
//! renderer. The floating-decimal displayer keeps cell identity across renders
//! and animates replaced cells out; see [`crate::flat`] for the simple variant.

use std::time::Duration;

use rustc_hash::FxHashMap;
use tally_animation::{RemovalScheduler, ScrubFrame, DEFAULT_REMOVAL_DURATION};
use tally_core::FormatterConfig;
use tally_text::{FontFitter, Size, TextMeasurer};

use crate::cell::{Cell, CellId, CellTable};
use crate::reconcile::CellReconciler;
use crate::Result;

/// Rectangle of a placed cell, relative to the display area's top-left corner
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A live cell with its layout
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedCell {
    pub cell: Cell,
    pub frame: CellFrame,
}

/// A cell animating out, with its last layout and the current scrub state
#[derive(Clone, Debug, PartialEq)]
pub struct RetiringCell {
    pub cell: Cell,
    pub frame: CellFrame,
    pub scrub: ScrubFrame,
}

impl RetiringCell {
    /// Frame shifted by the current scrub offset
    pub fn animated_frame(&self) -> CellFrame {
        CellFrame {
            y: self.frame.y + self.scrub.offset(self.frame.height),
            ..self.frame
        }
    }
}

/// Everything a renderer needs to apply one render
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderFrame {
    /// Live cells, left to right
    pub cells: Vec<PlacedCell>,
    /// Cells to attach
    pub created: Vec<CellId>,
    /// Retiring cells that were taken back; they stay attached
    pub revived: Vec<CellId>,
    /// Cells that start animating out
    pub retired: Vec<CellId>,
    /// Cells to detach right away
    pub detached: Vec<CellId>,
}

impl RenderFrame {
    /// The characters of the live cells, left to right
    pub fn text(&self) -> String {
        self.cells.iter().map(|placed| placed.cell.value).collect()
    }

    /// Only the characters typed by the user
    pub fn entered_text(&self) -> String {
        self.cells
            .iter()
            .filter(|placed| !placed.cell.is_default)
            .map(|placed| placed.cell.value)
            .collect()
    }
}

/// Renders display strings as cells.
///
/// Implementations own their cells; the host only applies the returned
/// [`RenderFrame`] and forwards frame ticks.
pub trait NumberDisplayer {
    /// Render `display` (derived from `raw`) into `area`.
    fn render(
        &mut self,
        display: &str,
        raw: &str,
        config: &FormatterConfig,
        area: Size,
    ) -> Result<RenderFrame>;

    /// Advance retiring cells; returns those to detach now.
    fn tick(&mut self, _dt: Duration) -> Vec<CellId> {
        Vec::new()
    }

    /// Cells currently animating out
    fn retiring(&self) -> Vec<RetiringCell> {
        Vec::new()
    }

    /// Drop every cell, live or retiring; returns all ids to detach.
    fn detach_all(&mut self) -> Vec<CellId>;
}

#[derive(Clone, Debug)]
struct Retired {
    cell: Cell,
    frame: CellFrame,
}

/// Fitted displayer with a smaller mantissa
///
/// Integer digits and grouping separators are drawn at the fitted size,
/// mantissa digits at 0.6 of it, with no visible decimal separator. Cells are
/// placed right to left and top-aligned, so the mantissa floats at the top.
pub struct FloatingDecimalDisplayer {
    measurer: Box<dyn TextMeasurer>,
    reconciler: CellReconciler,
    table: CellTable,
    frames: FxHashMap<CellId, CellFrame>,
    removals: RemovalScheduler<Retired>,
    animated: bool,
}

impl FloatingDecimalDisplayer {
    pub fn new(measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            measurer: Box::new(measurer),
            reconciler: CellReconciler::default(),
            table: CellTable::new(),
            frames: FxHashMap::default(),
            removals: RemovalScheduler::new(DEFAULT_REMOVAL_DURATION),
            animated: true,
        }
    }

    /// Animate replaced cells out instead of detaching them at once
    pub fn with_animation(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn with_removal_duration(mut self, duration: Duration) -> Self {
        self.removals = RemovalScheduler::new(duration);
        self
    }

    pub fn with_fitter(mut self, fitter: FontFitter) -> Self {
        self.reconciler = CellReconciler::new(fitter);
        self
    }

    pub fn cells(&self) -> &CellTable {
        &self.table
    }

    pub fn frame_of(&self, id: CellId) -> Option<CellFrame> {
        self.frames.get(&id).copied()
    }

    /// Lay out the table right to left; width from the measurer, height
    /// from the area and the cell's weight.
    fn layout(&self, area: Size) -> Vec<PlacedCell> {
        let mut buf = [0u8; 4];
        let mut x = area.width;
        let mut placed: Vec<PlacedCell> = self
            .table
            .in_display_order()
            .into_iter()
            .rev()
            .map(|cell| {
                let text = cell.value.encode_utf8(&mut buf);
                let width = self.measurer.measure(text, cell.font_size).width;
                x -= width;
                PlacedCell {
                    cell: cell.clone(),
                    frame: CellFrame {
                        x,
                        y: 0.0,
                        width,
                        height: area.height * cell.kind.weight(),
                    },
                }
            })
            .collect();
        placed.reverse();
        placed
    }
}

impl NumberDisplayer for FloatingDecimalDisplayer {
    fn render(
        &mut self,
        display: &str,
        raw: &str,
        config: &FormatterConfig,
        area: Size,
    ) -> Result<RenderFrame> {
        let mut result = self.reconciler.run(
            display,
            raw,
            config,
            &*self.measurer,
            area,
            &self.table,
        )?;
        let mut frame = RenderFrame::default();

        for id in result.created {
            let Some(cell) = result.table.get_mut(id) else {
                continue;
            };
            let revived = self.removals.cancel_where(|retired| {
                retired.cell.slot == cell.slot
                    && retired.cell.kind == cell.kind
                    && retired.cell.value == cell.value
                    && retired.cell.is_default == cell.is_default
            });
            match revived {
                Some(retired) => {
                    cell.id = retired.cell.id;
                    frame.revived.push(retired.cell.id);
                }
                None => frame.created.push(id),
            }
        }

        for cell in result.removed {
            let id = cell.id;
            if self.animated {
                let scrub = cell.kind.scrub();
                let cell_frame = self.frames.get(&id).copied().unwrap_or_default();
                self.removals.schedule(
                    Retired {
                        cell,
                        frame: cell_frame,
                    },
                    scrub,
                );
                frame.retired.push(id);
            } else {
                frame.detached.push(id);
            }
        }

        self.table = result.table;
        frame.cells = self.layout(area);
        self.frames = frame
            .cells
            .iter()
            .map(|placed| (placed.cell.id, placed.frame))
            .collect();

        let text = display;
        tracing::trace!(
            display = text,
            created = frame.created.len(),
            revived = frame.revived.len(),
            retired = frame.retired.len(),
            "Rendered floating decimal"
        );

        Ok(frame)
    }

    fn tick(&mut self, dt: Duration) -> Vec<CellId> {
        self.removals
            .tick(dt)
            .into_iter()
            .map(|retired| retired.cell.id)
            .collect()
    }

    fn retiring(&self) -> Vec<RetiringCell> {
        self.removals
            .iter()
            .map(|(_, retired, scrub)| RetiringCell {
                cell: retired.cell.clone(),
                frame: retired.frame,
                scrub,
            })
            .collect()
    }

    fn detach_all(&mut self) -> Vec<CellId> {
        let mut ids: Vec<CellId> = self.table.take_all().iter().map(|cell| cell.id).collect();
        ids.extend(
            self.removals
                .cancel_all()
                .into_iter()
                .map(|retired| retired.cell.id),
        );
        self.frames.clear();
        ids
    }
}

impl std::fmt::Debug for FloatingDecimalDisplayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingDecimalDisplayer")
            .field("cells", &self.table.len())
            .field("retiring", &self.removals.len())
            .field("animated", &self.animated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellKind;
    use tally_animation::ScrubDirection;
    use tally_text::FixedAdvanceMeasurer;

    const AREA: Size = Size {
        width: 300.0,
        height: 60.0,
    };

    fn displayer() -> FloatingDecimalDisplayer {
        FloatingDecimalDisplayer::new(FixedAdvanceMeasurer::default())
    }

    fn render(d: &mut FloatingDecimalDisplayer, display: &str, raw: &str) -> RenderFrame {
        d.render(display, raw, &FormatterConfig::decimal(), AREA).unwrap()
    }

    #[test]
    fn test_first_render_creates_everything() {
        let mut d = displayer();
        let frame = render(&mut d, "1,234", "1234");

        assert_eq!(frame.text(), "1,234");
        assert_eq!(frame.entered_text(), "1,234");
        assert_eq!(frame.created.len(), 5);
        assert!(frame.retired.is_empty() && frame.detached.is_empty());
    }

    #[test]
    fn test_cells_placed_right_to_left() {
        let mut d = displayer();
        let frame = render(&mut d, "12.5", "12.5");

        let last = frame.cells.last().unwrap();
        assert!((last.frame.x + last.frame.width - AREA.width).abs() < 1e-3);
        for pair in frame.cells.windows(2) {
            assert!((pair[0].frame.x + pair[0].frame.width - pair[1].frame.x).abs() < 1e-3);
        }

        assert_eq!(frame.cells[0].frame.height, AREA.height);
        assert_eq!(last.cell.kind, CellKind::MantissaDigit);
        assert!((last.frame.height - AREA.height * 0.6).abs() < 1e-3);
        assert!(frame.cells.iter().all(|c| c.frame.y == 0.0));
    }

    #[test]
    fn test_replaced_cells_retire_and_expire() {
        let mut d = displayer();
        render(&mut d, "1,234", "1234");
        let frame = render(&mut d, "123", "123");

        assert_eq!(frame.retired.len(), 2);
        assert_eq!(d.retiring().len(), 2);

        assert!(d.tick(Duration::from_millis(100)).is_empty());
        let mut expired = d.tick(Duration::from_millis(100));
        expired.sort();
        let mut retired = frame.retired.clone();
        retired.sort();
        assert_eq!(expired, retired);
        assert!(d.retiring().is_empty());
    }

    #[test]
    fn test_retiring_cells_scrub_by_kind() {
        let mut d = displayer();
        render(&mut d, "1,234", "1234");
        render(&mut d, "123", "123");
        d.tick(Duration::from_millis(100));

        for retiring in d.retiring() {
            let shifted = retiring.animated_frame();
            match retiring.cell.kind {
                CellKind::GroupingSeparator => {
                    assert_eq!(retiring.scrub.scrub.direction, ScrubDirection::Down);
                    assert!(shifted.y > retiring.frame.y);
                }
                _ => {
                    assert_eq!(retiring.scrub.scrub.direction, ScrubDirection::Up);
                    assert!(shifted.y < retiring.frame.y);
                }
            }
            assert!(retiring.scrub.opacity < 1.0);
        }
    }

    #[test]
    fn test_retyping_revives_retiring_cell() {
        let mut d = displayer();
        render(&mut d, "12", "12");
        let two = d.cells().digits()[1].id;

        let frame = render(&mut d, "1", "1");
        assert_eq!(frame.retired, vec![two]);

        let frame = render(&mut d, "12", "12");
        assert_eq!(frame.revived, vec![two]);
        assert!(frame.created.is_empty());
        assert_eq!(d.cells().digits()[1].id, two);
        assert!(d.retiring().is_empty());
        assert!(d.tick(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_without_animation_detaches_at_once() {
        let mut d = displayer().with_animation(false);
        render(&mut d, "99", "99");
        let frame = render(&mut d, "9", "9");

        assert_eq!(frame.detached.len(), 1);
        assert!(frame.retired.is_empty());
        assert!(d.retiring().is_empty());
    }

    #[test]
    fn test_detach_all_clears_live_and_retiring() {
        let mut d = displayer();
        render(&mut d, "1,234", "1234");
        render(&mut d, "12", "12");

        let ids = d.detach_all();
        assert_eq!(ids.len(), 5);
        assert!(d.cells().is_empty());
        assert!(d.retiring().is_empty());
        assert!(d.tick(Duration::from_secs(1)).is_empty());

        // Fresh ids after the reset
        let frame = render(&mut d, "1", "1");
        assert!(!ids.contains(&frame.created[0]));
    }

    #[test]
    fn test_placeholder_cells_are_default() {
        let mut d = displayer();
        let config = FormatterConfig::decimal().with_hide_decimals_if_integral(false);
        let frame = d.render("0.00", "", &config, AREA).unwrap();

        assert_eq!(frame.text(), "000");
        assert_eq!(frame.entered_text(), "");
    }

    #[test]
    fn test_malformed_display_is_an_error() {
        let mut d = displayer();
        let result = d.render("1.2.3", "123", &FormatterConfig::decimal(), AREA);
        assert!(result.is_err());
        assert!(d.cells().is_empty());
    }
}
