//! Product catalog: items, paper grades, and colors.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Items offered on the order form, in display order.
///
/// The first entry is the default selection of a fresh draft.
pub const ITEMS: [&str; 3] = ["14 Inch Thali", "Paper Bowl (Dona)", "Partition Plate"];

/// Paper grades stocked at startup, in display order.
pub const GRADES: [&str; 3] = ["120 GSM", "200 GSM", "300 GSM"];

/// A paper weight specification, e.g. "120 GSM".
///
/// Grades are the primary key of the [`Inventory`](super::Inventory). The label
/// is kept exactly as written so it can be echoed into outbound messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(String);

impl Grade {
    /// Create a grade from its display label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the grade label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Grade {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Errors that can occur when parsing a [`Color`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown color: {0}")]
pub struct ColorError(pub String);

/// Plate finish color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Color {
    #[default]
    Green,
    Silver,
}

impl Color {
    /// Every color, in display order.
    pub const ALL: [Self; 2] = [Self::Green, Self::Silver];

    /// Display label used on the board and in outbound messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Silver => "Silver",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "silver" => Ok(Self::Silver),
            _ => Err(ColorError(s.to_owned())),
        }
    }
}
