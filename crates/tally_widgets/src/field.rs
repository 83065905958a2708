//! Number entry field
//!
//! The control itself: owns the numeric input and a displayer, and re-renders
//! after every accepted change. Keystrokes that the input rejects are logged
//! at `debug` and otherwise ignored, so bad input never surfaces as an error.

use std::time::Duration;

use tally_animation::DEFAULT_REMOVAL_DURATION;
use tally_core::{DisplayFormatter, FormatterConfig, InputError, Keystroke, NumericInput};
use tally_display::{
    CellId, FloatingDecimalDisplayer, NumberDisplayer, RenderFrame, RetiringCell,
};
use tally_text::{Size, TextMeasurer};

use crate::error::Result;

/// Presentation settings of the field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntryFieldConfig {
    /// Animate replaced characters out
    pub animated: bool,
    /// How long a replaced character takes to leave
    pub removal_duration: Duration,
}

impl Default for EntryFieldConfig {
    fn default() -> Self {
        Self {
            animated: true,
            removal_duration: DEFAULT_REMOVAL_DURATION,
        }
    }
}

impl EntryFieldConfig {
    /// Detach replaced characters at once
    pub fn static_display() -> Self {
        Self {
            animated: false,
            ..Self::default()
        }
    }

    pub fn with_animation(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn with_removal_duration(mut self, duration: Duration) -> Self {
        self.removal_duration = duration;
        self
    }
}

/// Result of a focus request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusChange {
    Began,
    Ended,
    /// Already in the requested state
    Unchanged,
}

pub struct NumberEntryField {
    input: NumericInput,
    displayer: Box<dyn NumberDisplayer>,
    area: Size,
    editing: bool,
    display: String,
    frame: RenderFrame,
    changed: bool,
}

impl NumberEntryField {
    /// A field with the floating-decimal displayer
    pub fn new(config: FormatterConfig, measurer: impl TextMeasurer + 'static) -> Result<Self> {
        Self::with_field_config(config, EntryFieldConfig::default(), measurer)
    }

    pub fn with_field_config(
        config: FormatterConfig,
        field_config: EntryFieldConfig,
        measurer: impl TextMeasurer + 'static,
    ) -> Result<Self> {
        let displayer = FloatingDecimalDisplayer::new(measurer)
            .with_animation(field_config.animated)
            .with_removal_duration(field_config.removal_duration);
        Self::with_displayer(config, Box::new(displayer))
    }

    /// A field drawing through any displayer
    pub fn with_displayer(
        config: FormatterConfig,
        displayer: Box<dyn NumberDisplayer>,
    ) -> Result<Self> {
        let mut field = Self {
            input: NumericInput::new(config)?,
            displayer,
            area: Size::ZERO,
            editing: false,
            display: String::new(),
            frame: RenderFrame::default(),
            changed: false,
        };
        field.refresh()?;
        Ok(field)
    }

    /// Format the raw value and hand it to the displayer.
    fn refresh(&mut self) -> Result<()> {
        let display =
            DisplayFormatter::format(self.input.raw(), self.input.config(), self.input.cursor())?;
        self.frame = self.displayer.render(
            &display,
            self.input.raw(),
            self.input.config(),
            self.area,
        )?;
        self.display = display;
        Ok(())
    }

    fn accept(
        &mut self,
        outcome: std::result::Result<(), InputError>,
        input: &str,
    ) -> Result<bool> {
        match outcome {
            Ok(()) => {
                self.changed = true;
                self.refresh()?;
                Ok(true)
            }
            Err(reason) => {
                tracing::debug!(input, %reason, "Keystroke rejected");
                Ok(false)
            }
        }
    }

    /// Insert a digit or the decimal separator; returns whether it was accepted.
    pub fn insert_text(&mut self, text: &str) -> Result<bool> {
        let outcome = self.input.insert(text);
        self.accept(outcome, text)
    }

    pub fn handle_keystroke(&mut self, keystroke: Keystroke) -> Result<bool> {
        let outcome = self.input.apply(keystroke);
        self.accept(outcome, &format!("{keystroke:?}"))
    }

    pub fn delete_backward(&mut self) -> Result<bool> {
        let outcome = self.input.delete_backward();
        self.accept(outcome, "backspace")
    }

    /// Swap the formatter config and redraw everything.
    pub fn set_config(&mut self, config: FormatterConfig) -> Result<()> {
        self.input.set_config(config)?;
        self.changed = true;
        self.refresh()
    }

    /// Replace the displayer. All cells of the old one are dropped at once;
    /// their ids are returned for detaching.
    pub fn set_displayer(&mut self, displayer: Box<dyn NumberDisplayer>) -> Result<Vec<CellId>> {
        let detached = self.displayer.detach_all();
        self.displayer = displayer;
        tracing::trace!(detached = detached.len(), "Displayer swapped");
        self.refresh()?;
        Ok(detached)
    }

    pub fn set_maximum_value(&mut self, maximum: f64) -> Result<()> {
        let before = self.input.raw().to_string();
        self.input.set_maximum_value(maximum)?;
        self.changed |= before != self.input.raw();
        self.refresh()
    }

    pub fn set_hide_decimals_if_integral(&mut self, hide: bool) -> Result<()> {
        self.input.set_hide_decimals_if_integral(hide);
        self.refresh()
    }

    /// Resize the display area; text is refitted when it changes.
    pub fn set_frame(&mut self, area: Size) -> Result<()> {
        if area == self.area {
            return Ok(());
        }
        self.area = area;
        self.refresh()
    }

    pub fn frame_size(&self) -> Size {
        self.area
    }

    pub fn raw_value(&self) -> &str {
        self.input.raw()
    }

    pub fn double_value(&self) -> f64 {
        self.input.value()
    }

    pub fn displayed_string(&self) -> &str {
        &self.display
    }

    pub fn has_text(&self) -> bool {
        self.input.has_text()
    }

    pub fn config(&self) -> &FormatterConfig {
        self.input.config()
    }

    /// Cells from the latest render
    pub fn render_frame(&self) -> &RenderFrame {
        &self.frame
    }

    pub fn retiring(&self) -> Vec<RetiringCell> {
        self.displayer.retiring()
    }

    /// Advance removal animations; returns cells to detach.
    pub fn tick(&mut self, dt: Duration) -> Vec<CellId> {
        self.displayer.tick(dt)
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn begin_editing(&mut self) -> FocusChange {
        if self.editing {
            return FocusChange::Unchanged;
        }
        self.editing = true;
        FocusChange::Began
    }

    pub fn end_editing(&mut self) -> FocusChange {
        if !self.editing {
            return FocusChange::Unchanged;
        }
        self.editing = false;
        FocusChange::Ended
    }

    /// Whether the value changed since the last call
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

impl std::fmt::Debug for NumberEntryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberEntryField")
            .field("raw", &self.input.raw())
            .field("display", &self.display)
            .field("editing", &self.editing)
            .finish()
    }
}
