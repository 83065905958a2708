//! Numeric keyboard
//!
//! The keyboard types into whichever field is attached to it. Focus is passed
//! explicitly: attaching a field begins editing on it and ends editing on the
//! previously attached one. The keyboard only keeps a weak handle, so a
//! dropped field simply stops receiving keys.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tally_core::{FormatterConfig, Keystroke};

use crate::error::Result;
use crate::field::{FocusChange, NumberEntryField};

/// A field shared between its owner and the keyboard
pub type SharedField = Rc<RefCell<NumberEntryField>>;

pub fn shared(field: NumberEntryField) -> SharedField {
    Rc::new(RefCell::new(field))
}

/// Keys on the numeric pad
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    DecimalSeparator,
    Backspace,
    /// Ends editing and releases the field
    Done,
}

impl Key {
    /// Digit keys in pad order, top-left to bottom
    pub const DIGITS: [Key; 10] = [
        Key::Digit(1),
        Key::Digit(2),
        Key::Digit(3),
        Key::Digit(4),
        Key::Digit(5),
        Key::Digit(6),
        Key::Digit(7),
        Key::Digit(8),
        Key::Digit(9),
        Key::Digit(0),
    ];
}

#[derive(Debug, Default)]
pub struct NumericKeyboard {
    active: Option<Weak<RefCell<NumberEntryField>>>,
}

impl NumericKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `field` the active field.
    pub fn attach(&mut self, field: &SharedField) -> FocusChange {
        if let Some(current) = self.active_field() {
            if Rc::ptr_eq(&current, field) {
                return FocusChange::Unchanged;
            }
            current.borrow_mut().end_editing();
        }

        self.active = Some(Rc::downgrade(field));
        let change = field.borrow_mut().begin_editing();
        tracing::trace!(?change, "Keyboard attached to field");
        change
    }

    /// Release the active field, ending its editing session.
    pub fn detach(&mut self) -> Option<SharedField> {
        let field = self.active.take()?.upgrade()?;
        field.borrow_mut().end_editing();
        tracing::trace!("Keyboard detached from field");
        Some(field)
    }

    pub fn active_field(&self) -> Option<SharedField> {
        self.active.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_attached(&self) -> bool {
        self.active_field().is_some()
    }

    /// Forward a key to the active field. Returns whether the field accepted
    /// it; keys pressed with no field attached are dropped.
    pub fn press(&mut self, key: Key) -> Result<bool> {
        let Some(field) = self.active_field() else {
            tracing::debug!(?key, "Key pressed with no active field");
            return Ok(false);
        };

        let keystroke = match key {
            Key::Digit(digit) => Keystroke::Digit(digit),
            Key::DecimalSeparator => Keystroke::DecimalSeparator,
            Key::Backspace => Keystroke::DeleteBackward,
            Key::Done => {
                self.detach();
                return Ok(true);
            }
        };

        let accepted = field.borrow_mut().handle_keystroke(keystroke)?;
        Ok(accepted)
    }

    /// Label of the decimal key; empty when the active field takes whole
    /// numbers only.
    pub fn decimal_label(&self) -> String {
        match self.active_field() {
            Some(field) => Self::label_for(field.borrow().config()),
            None => Self::label_for(&FormatterConfig::default()),
        }
    }

    fn label_for(config: &FormatterConfig) -> String {
        if config.accepts_fraction() {
            config.decimal_separator.clone()
        } else {
            String::new()
        }
    }
}
