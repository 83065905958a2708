//! Entry Field Demo
//!
//! Types a few values into a number entry field through the numeric keyboard
//! and prints what a renderer would receive.
//!
//! Run with: RUST_LOG=debug cargo run -p tally_widgets --example entry_demo

use std::time::Duration;

use tally_core::FormatterConfig;
use tally_display::FlatDisplayer;
use tally_text::{FixedAdvanceMeasurer, Size};
use tally_widgets::{shared, EntryFieldConfig, Key, NumberEntryField, NumericKeyboard, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut field = NumberEntryField::with_field_config(
        FormatterConfig::decimal(),
        EntryFieldConfig::default().with_removal_duration(Duration::from_millis(150)),
        FixedAdvanceMeasurer::default(),
    )?;
    field.set_frame(Size::new(320.0, 64.0))?;
    let field = shared(field);

    let mut keyboard = NumericKeyboard::new();
    keyboard.attach(&field);
    println!("decimal key: {:?}", keyboard.decimal_label());

    let keys = [
        Key::Digit(1),
        Key::Digit(2),
        Key::Digit(3),
        Key::Digit(4),
        Key::DecimalSeparator,
        Key::Digit(5),
        Key::Digit(6),
        // Rejected: past the fraction digit limit
        Key::Digit(7),
        Key::Backspace,
    ];

    for key in keys {
        let accepted = keyboard.press(key)?;
        let field = field.borrow();
        let frame = field.render_frame();
        println!(
            "{key:?}: accepted={accepted} raw={:?} display={:?} entered={:?} retired={}",
            field.raw_value(),
            field.displayed_string(),
            frame.entered_text(),
            frame.retired.len(),
        );
        for placed in &frame.cells {
            println!(
                "    {:?} {:?} at x={:.1} size={:.1}{}",
                placed.cell.value,
                placed.cell.kind,
                placed.frame.x,
                placed.cell.font_size,
                if placed.cell.is_default { " (placeholder)" } else { "" },
            );
        }
    }

    let expired = field.borrow_mut().tick(Duration::from_millis(150));
    println!("detached after animation: {}", expired.len());

    field.borrow_mut().set_config(FormatterConfig::european())?;
    println!("european: {}", field.borrow().displayed_string());

    let detached = field
        .borrow_mut()
        .set_displayer(Box::new(FlatDisplayer::new(FixedAdvanceMeasurer::default())))?;
    println!(
        "flat: {} (detached {} cells)",
        field.borrow().render_frame().text(),
        detached.len()
    );

    keyboard.press(Key::Done)?;
    println!("editing: {}", field.borrow().is_editing());
    Ok(())
}
