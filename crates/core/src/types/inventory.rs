//! Inventory state: per-grade, per-color availability flags.

use serde::{Deserialize, Serialize};

use super::catalog::{Color, GRADES, Grade};

/// Errors raised by inventory mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The grade is not a key of the inventory.
    #[error("unknown grade: {0}")]
    UnknownGrade(String),
}

/// Availability of one grade, per color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub green: bool,
    pub silver: bool,
}

impl Stock {
    /// Stock with both colors set to the same flag.
    #[must_use]
    pub const fn uniform(available: bool) -> Self {
        Self {
            green: available,
            silver: available,
        }
    }

    /// Whether the given color is available.
    #[must_use]
    pub const fn is_available(self, color: Color) -> bool {
        match color {
            Color::Green => self.green,
            Color::Silver => self.silver,
        }
    }

    fn flag_mut(&mut self, color: Color) -> &mut bool {
        match color {
            Color::Green => &mut self.green,
            Color::Silver => &mut self.silver,
        }
    }
}

/// Mapping from grade to per-color availability.
///
/// Entries keep their insertion order so the board renders grades the way
/// they were listed. Entries are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    entries: Vec<(Grade, Stock)>,
}

impl Default for Inventory {
    /// The stock sheet the portal starts with.
    fn default() -> Self {
        let [g120, g200, g300] = GRADES;
        Self::new([
            (Grade::new(g120), Stock::uniform(true)),
            (
                Grade::new(g200),
                Stock {
                    green: true,
                    silver: false,
                },
            ),
            (Grade::new(g300), Stock::uniform(true)),
        ])
    }
}

impl Inventory {
    /// Build an inventory from `(grade, stock)` pairs.
    ///
    /// A grade listed twice keeps its first position and its last stock value.
    pub fn new(entries: impl IntoIterator<Item = (Grade, Stock)>) -> Self {
        let mut inventory = Self {
            entries: Vec::new(),
        };
        for (grade, stock) in entries {
            inventory.insert(grade, stock);
        }
        inventory
    }

    /// Insert or replace the stock for a grade.
    pub fn insert(&mut self, grade: Grade, stock: Stock) {
        match self.entries.iter_mut().find(|(g, _)| *g == grade) {
            Some((_, existing)) => *existing = stock,
            None => self.entries.push((grade, stock)),
        }
    }

    /// Iterate over `(grade, stock)` in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&Grade, Stock)> {
        self.entries.iter().map(|(grade, stock)| (grade, *stock))
    }

    /// Iterate over the grade keys in display order.
    pub fn grades(&self) -> impl Iterator<Item = &Grade> {
        self.entries.iter().map(|(grade, _)| grade)
    }

    /// Look up the stock for a grade.
    #[must_use]
    pub fn get(&self, grade: &Grade) -> Option<Stock> {
        self.entries
            .iter()
            .find(|(g, _)| g == grade)
            .map(|(_, stock)| *stock)
    }

    /// Whether the grade is a key of this inventory.
    #[must_use]
    pub fn contains(&self, grade: &Grade) -> bool {
        self.get(grade).is_some()
    }

    /// Whether `(grade, color)` is in stock. Unknown grades are never in stock.
    #[must_use]
    pub fn is_available(&self, grade: &Grade, color: Color) -> bool {
        self.get(grade).is_some_and(|stock| stock.is_available(color))
    }

    /// Flip exactly one availability flag and return its new value.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::UnknownGrade`] if the grade is not a key.
    pub fn toggle(&mut self, grade: &Grade, color: Color) -> Result<bool, InventoryError> {
        let (_, stock) = self
            .entries
            .iter_mut()
            .find(|(g, _)| g == grade)
            .ok_or_else(|| InventoryError::UnknownGrade(grade.to_string()))?;
        let flag = stock.flag_mut(color);
        *flag = !*flag;
        Ok(*flag)
    }

    /// Number of grades.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no grades.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
