//! The per-browser state container owned by the view router.
//!
//! A [`Portal`] holds the session, the inventory, and (while a customer is
//! signed in) the mounted [`CustomerView`]. Views never reach for globals;
//! handlers borrow the portal, call one of the operations below, and render
//! from what it exposes.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::advisory::{AdvisoryPanel, AdvisoryRequest, AdvisoryTicket, advisory_prompt};
use crate::types::{
    Color, Credentials, DraftEdit, DraftError, Grade, Inventory, InventoryError, OrderDraft, Role,
    Session, ValidationError, compose_message, deep_link,
};

/// Errors from portal operations other than login.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// Nobody is signed in.
    #[error("sign in required")]
    NotSignedIn,

    /// The signed-in actor has the wrong role for this operation.
    #[error("{required} access required")]
    Forbidden {
        /// Role the operation needs.
        required: Role,
    },

    /// Inventory mutation failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Draft edit failed.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// The chosen grade and color are not in stock.
    #[error("{grade} / {color} is currently out of stock")]
    OutOfStock { grade: Grade, color: Color },
}

/// Which top-level view the router shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Admin,
    Customer,
}

/// A submitted order, ready to hand off to the messaging app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundOrder {
    pub message: String,
    pub link: String,
}

/// State of the customer view while it is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerView {
    mount: u64,
    draft: OrderDraft,
    advisory: AdvisoryPanel,
}

impl CustomerView {
    fn new(mount: u64, today: NaiveDate) -> Self {
        Self {
            mount,
            draft: OrderDraft::new(today),
            advisory: AdvisoryPanel::default(),
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    #[must_use]
    pub const fn advisory(&self) -> &AdvisoryPanel {
        &self.advisory
    }
}

/// Session, inventory, and customer-view state for one browser.
#[derive(Debug, Clone, Default)]
pub struct Portal {
    session: Session,
    inventory: Inventory,
    customer: Option<CustomerView>,
    mounts: u64,
}

impl Portal {
    /// A guest portal with the default inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A guest portal with a custom starting inventory.
    #[must_use]
    pub fn with_inventory(inventory: Inventory) -> Self {
        Self {
            inventory,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The mounted customer view, if a customer is signed in.
    #[must_use]
    pub const fn customer(&self) -> Option<&CustomerView> {
        self.customer.as_ref()
    }

    /// Choose the top-level view from the session role.
    #[must_use]
    pub const fn view(&self) -> ViewKind {
        match self.session.role() {
            Role::Guest => ViewKind::Login,
            Role::Admin => ViewKind::Admin,
            Role::Customer => ViewKind::Customer,
        }
    }

    /// Sign in. A customer session mounts a fresh customer view with a default
    /// draft dated `today`.
    ///
    /// On failure the current session is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] to show on the login form.
    pub fn login(
        &mut self,
        credentials: &Credentials<'_>,
        admin_secret: &str,
        today: NaiveDate,
    ) -> Result<&Session, ValidationError> {
        let session = credentials.classify(admin_secret)?;

        self.customer = match session.role() {
            Role::Customer => {
                self.mounts += 1;
                Some(CustomerView::new(self.mounts, today))
            }
            Role::Guest | Role::Admin => None,
        };
        self.session = session;
        Ok(&self.session)
    }

    /// Sign out and tear down the customer view. Inventory is kept.
    pub fn logout(&mut self) {
        self.session = Session::guest();
        self.customer = None;
    }

    /// Flip one availability flag. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the actor is not an admin or the grade is unknown.
    pub fn toggle_stock(&mut self, grade: &Grade, color: Color) -> Result<bool, PortalError> {
        self.require(Role::Admin)?;
        Ok(self.inventory.toggle(grade, color)?)
    }

    /// Apply one field edit to the draft. Customer only.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the actor is not a customer or the edit is invalid.
    pub fn edit_draft(&mut self, edit: DraftEdit) -> Result<(), PortalError> {
        let session = &self.session;
        let view = self
            .customer
            .as_mut()
            .ok_or_else(|| role_error(session, Role::Customer))?;
        Ok(view.draft.apply(edit, &self.inventory)?)
    }

    /// Apply several edits as one change. Customer only.
    ///
    /// The draft is left untouched unless every edit is valid.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the actor is not a customer or any edit is invalid.
    pub fn edit_draft_all(
        &mut self,
        edits: impl IntoIterator<Item = DraftEdit>,
    ) -> Result<(), PortalError> {
        let session = &self.session;
        let view = self
            .customer
            .as_mut()
            .ok_or_else(|| role_error(session, Role::Customer))?;

        let mut draft = view.draft.clone();
        for edit in edits {
            draft.apply(edit, &self.inventory)?;
        }
        view.draft = draft;
        Ok(())
    }

    /// Whether the draft's grade and color are in stock right now.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.customer
            .as_ref()
            .is_some_and(|view| self.inventory.is_available(&view.draft.grade, view.draft.color))
    }

    /// Serialize the draft into an outbound message and deep link to
    /// `recipient`, then discard it for a fresh draft dated `today`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::OutOfStock`] when the gate is closed, or a role
    /// error if the actor is not a customer.
    pub fn submit_order(
        &mut self,
        recipient: &str,
        today: NaiveDate,
    ) -> Result<OutboundOrder, PortalError> {
        let available = self.can_submit();
        let session = &self.session;
        let view = self
            .customer
            .as_mut()
            .ok_or_else(|| role_error(session, Role::Customer))?;

        if !available {
            return Err(PortalError::OutOfStock {
                grade: view.draft.grade.clone(),
                color: view.draft.color,
            });
        }

        let message = compose_message(session, &view.draft);
        let link = deep_link(recipient, &message);
        view.draft = OrderDraft::new(today);
        Ok(OutboundOrder { message, link })
    }

    /// Start an advisory request for the current draft.
    ///
    /// Returns `Ok(None)` when a request is already outstanding.
    ///
    /// # Errors
    ///
    /// Returns a role error if the actor is not a customer.
    pub fn begin_advisory(
        &mut self,
        now: DateTime<Utc>,
        stale_after: TimeDelta,
    ) -> Result<Option<AdvisoryRequest>, PortalError> {
        let view = self.customer_mut()?;
        let Some(seq) = view.advisory.begin(now, stale_after) else {
            return Ok(None);
        };
        Ok(Some(AdvisoryRequest {
            ticket: AdvisoryTicket {
                mount: view.mount,
                seq,
            },
            prompt: advisory_prompt(&view.draft),
        }))
    }

    /// Land an advisory outcome. Dropped if the customer view that issued the
    /// request has since been torn down or remounted. Returns whether the
    /// outcome became visible.
    pub fn complete_advisory<E>(&mut self, ticket: AdvisoryTicket, outcome: Result<String, E>) -> bool {
        match self.customer.as_mut() {
            Some(view) if view.mount == ticket.mount => view.advisory.complete(ticket.seq, outcome),
            _ => false,
        }
    }

    /// Close the advice modal.
    ///
    /// # Errors
    ///
    /// Returns a role error if the actor is not a customer.
    pub fn dismiss_advisory(&mut self) -> Result<(), PortalError> {
        self.customer_mut()?.advisory.dismiss();
        Ok(())
    }

    fn require(&self, role: Role) -> Result<(), PortalError> {
        if self.session.role() == role {
            Ok(())
        } else {
            Err(role_error(&self.session, role))
        }
    }

    fn customer_mut(&mut self) -> Result<&mut CustomerView, PortalError> {
        let session = &self.session;
        self.customer
            .as_mut()
            .ok_or_else(|| role_error(session, Role::Customer))
    }
}

fn role_error(session: &Session, required: Role) -> PortalError {
    if session.is_authenticated() {
        PortalError::Forbidden { required }
    } else {
        PortalError::NotSignedIn
    }
}
