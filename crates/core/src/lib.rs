//! RMP Portal Core - Domain types and state containers.
//!
//! This crate holds everything the ordering portal knows about its domain:
//! - [`types`] - Catalog values, inventory, sessions, and order drafts
//! - [`advisory`] - The product-advice prompt and its modal state machine
//! - [`portal`] - The per-browser state container the view router owns
//!
//! # Architecture
//!
//! The core crate contains only types and state transitions - no I/O, no
//! clock, no HTTP. Callers pass in "today" and "now" explicitly, which keeps
//! every rule here testable without a web server or a rendering environment.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod advisory;
pub mod portal;
pub mod types;

pub use advisory::{AdvisoryPanel, AdvisoryRequest, AdvisoryTicket, FALLBACK_MESSAGE};
pub use portal::{CustomerView, OutboundOrder, Portal, PortalError, ViewKind};
pub use types::*;
