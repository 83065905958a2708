use tally_core::{ConfigError, FormatError};
use tally_display::DisplayError;
use thiserror::Error;

/// Failures the field cannot recover from on its own
///
/// Rejected keystrokes are not errors at this level; the field logs and
/// ignores them.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Display(#[from] DisplayError),
}

pub type Result<T> = std::result::Result<T, FieldError>;
