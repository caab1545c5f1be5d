//! Client-side grid state: a local mirror of the rows, the per-row edit
//! state machine, and the name filter. Rendering is left to the front end.

use thiserror::Error;

use crate::client::ApiError;
use crate::models::vehicle::VehicleFormError;

pub mod employee;
pub mod vehicle;

pub use employee::{EmployeeField, EmployeeGrid};
pub use vehicle::{VehicleField, VehicleGrid};

/// Edit state of one row. `Viewing -> Editing -> Saving -> Viewing`, or
/// `Editing -> Viewing` on cancel.
#[derive(Debug, Clone, PartialEq)]
pub enum RowState<D> {
    Viewing,
    Editing { draft: D },
    Saving { draft: D },
}

impl<D> RowState<D> {
    pub fn is_viewing(&self) -> bool {
        matches!(self, RowState::Viewing)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, RowState::Editing { .. })
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            RowState::Viewing => None,
            RowState::Editing { draft } | RowState::Saving { draft } => Some(draft),
        }
    }
}

#[derive(Debug, Error)]
pub enum GridError<K: std::fmt::Display + std::fmt::Debug> {
    #[error("missing required fields: {}", .0.join(", "))]
    Validation(Vec<&'static str>),
    #[error(transparent)]
    VehicleForm(#[from] VehicleFormError),
    #[error("row {0} does not exist")]
    RowNotFound(K),
    #[error("row {0} is not being edited")]
    NotEditing(K),
    #[error("row {0} is being edited")]
    Editing(K),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Case-insensitive substring match. A blank needle matches everything.
pub fn matches_filter(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// `None` for blank filter text, which clears the filter.
pub(crate) fn normalize_filter(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
