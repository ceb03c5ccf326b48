//! Core value types for the ordering portal.

pub mod catalog;
pub mod inventory;
pub mod order;
pub mod session;

pub use catalog::{Color, ColorError, GRADES, Grade, ITEMS};
pub use inventory::{Inventory, InventoryError, Stock};
pub use order::{
    DEFAULT_BAGS, DEFAULT_PIECES_PER_BAG, DraftEdit, DraftError, MESSAGING_HOST, OrderDraft,
    coerce_quantity, compose_message, deep_link,
};
pub use session::{
    ADMIN_DISPLAY_NAME, ADMIN_PLACEHOLDER_PHONE, Credentials, MIN_PHONE_LENGTH, Role, Session,
    ValidationError,
};
