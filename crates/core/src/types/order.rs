//! Order drafts and the outbound order message.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{Color, GRADES, Grade, ITEMS};
use super::inventory::Inventory;
use super::session::Session;

/// Bag count of a fresh draft.
pub const DEFAULT_BAGS: u32 = 10;

/// Pieces per bag of a fresh draft.
pub const DEFAULT_PIECES_PER_BAG: u32 = 20;

/// Host of the messaging deep link.
pub const MESSAGING_HOST: &str = "wa.me";

/// Deadline format produced by HTML date inputs.
const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised when a draft edit would break a draft invariant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// The grade does not reference an inventory entry.
    #[error("unknown grade: {0}")]
    UnknownGrade(String),
}

/// The in-progress, unsubmitted order specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub item: String,
    pub grade: Grade,
    pub color: Color,
    pub bags: u32,
    pub pieces_per_bag: u32,
    /// Kept exactly as entered; never reformatted.
    pub deadline: String,
    pub note: String,
}

impl OrderDraft {
    /// A draft with the default selections and `today` as the deadline.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        let [item, ..] = ITEMS;
        let [grade, ..] = GRADES;
        Self {
            item: item.to_owned(),
            grade: Grade::new(grade),
            color: Color::default(),
            bags: DEFAULT_BAGS,
            pieces_per_bag: DEFAULT_PIECES_PER_BAG,
            deadline: today.format(DEADLINE_FORMAT).to_string(),
            note: String::new(),
        }
    }

    /// Replace exactly one field.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownGrade`] if a grade edit names a grade the
    /// inventory does not carry; the draft is left untouched.
    pub fn apply(&mut self, edit: DraftEdit, inventory: &Inventory) -> Result<(), DraftError> {
        match edit {
            DraftEdit::Item(item) => self.item = item,
            DraftEdit::Grade(grade) => {
                if !inventory.contains(&grade) {
                    return Err(DraftError::UnknownGrade(grade.to_string()));
                }
                self.grade = grade;
            }
            DraftEdit::Color(color) => self.color = color,
            DraftEdit::Bags(bags) => self.bags = bags,
            DraftEdit::PiecesPerBag(pieces) => self.pieces_per_bag = pieces,
            DraftEdit::Deadline(deadline) => self.deadline = deadline,
            DraftEdit::Note(note) => self.note = note,
        }
        Ok(())
    }
}

/// A single-field edit to an [`OrderDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    Item(String),
    Grade(Grade),
    Color(Color),
    Bags(u32),
    PiecesPerBag(u32),
    Deadline(String),
    Note(String),
}

/// Coerce raw quantity input to a non-negative integer.
///
/// Reads the leading run of digits (an optional `+` is allowed); anything
/// non-numeric, or negative, collapses to zero. Values past `u32::MAX`
/// saturate.
#[must_use]
pub fn coerce_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    digits
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u32, |acc, digit| {
            acc.saturating_mul(10).saturating_add(digit)
        })
}

/// Build the outbound order message for a customer session.
#[must_use]
pub fn compose_message(session: &Session, draft: &OrderDraft) -> String {
    let note = if draft.note.is_empty() {
        "None"
    } else {
        draft.note.as_str()
    };

    [
        format!("*🏭 NEW ORDER - {}*", session.name().to_uppercase()),
        "-----------------------------".to_owned(),
        format!("*Customer:* {}", session.name()),
        format!("*Phone:* {}", session.phone()),
        "-----------------------------".to_owned(),
        format!("*Item:* {}", draft.item),
        format!("*Spec:* {} | {}", draft.grade, draft.color),
        format!(
            "*Qty:* {} Bags ({} pcs/pkt)",
            draft.bags, draft.pieces_per_bag
        ),
        format!("*Deadline:* {}", draft.deadline),
        format!("*Note:* {note}"),
    ]
    .join("\n")
}

/// Build the messaging deep link that pre-fills `message` for `recipient`.
#[must_use]
pub fn deep_link(recipient: &str, message: &str) -> String {
    format!(
        "https://{MESSAGING_HOST}/{recipient}?text={}",
        urlencoding::encode(message)
    )
}
