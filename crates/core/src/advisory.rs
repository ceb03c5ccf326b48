//! Product advice: the prompt sent to the text-generation service and the
//! state machine behind the advice modal.
//!
//! The modal moves through three visible states:
//!
//! ```text
//! closed --begin--> loading --complete--> showing response
//!    ^                 |                        |
//!    +-----dismiss-----+---------dismiss--------+
//! ```
//!
//! At most one request is in flight per panel. A completion only lands if it
//! belongs to the request the panel is waiting on and the modal is still
//! open; everything else is dropped without a visible effect.

use chrono::{DateTime, TimeDelta, Utc};

use crate::types::OrderDraft;

/// Shown in place of advice whenever the advisory call fails for any reason.
pub const FALLBACK_MESSAGE: &str = "Sorry, our AI expert is currently busy. Please call RMP support.";

/// Build the fixed advisory prompt for the draft's item, grade, and color.
#[must_use]
pub fn advisory_prompt(draft: &OrderDraft) -> String {
    format!(
        "You are an expert sales assistant for RMP Paper Products. A customer is looking at: \
         Item: {item}, GSM: {grade}, Color: {color}. \
         They want to know if this is a good choice or what else they should consider for \
         different types of meals (e.g., weddings, snacks, heavy meals). \
         Keep it professional, helpful, and concise (under 100 words).",
        item = draft.item,
        grade = draft.grade,
        color = draft.color,
    )
}

/// Identifies one advisory request across the await point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisoryTicket {
    /// Customer-view mount generation the request was issued from.
    pub mount: u64,
    /// Request sequence number within that mount.
    pub seq: u64,
}

/// An advisory request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryRequest {
    pub ticket: AdvisoryTicket,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    seq: u64,
    started_at: DateTime<Utc>,
}

/// State of the advice modal for one customer view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvisoryPanel {
    open: bool,
    in_flight: Option<InFlight>,
    response: Option<String>,
    next_seq: u64,
}

impl AdvisoryPanel {
    /// Whether the modal is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Text to show in the modal, once the request has finished.
    #[must_use]
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// Start a request: open the modal, clear the response, mark it loading.
    ///
    /// Returns `None` while another request is outstanding, unless that request
    /// started more than `stale_after` ago, in which case it is superseded and
    /// its eventual completion is dropped. A refused request still reopens the
    /// modal, so the outstanding request's outcome is shown when it lands.
    pub fn begin(&mut self, now: DateTime<Utc>, stale_after: TimeDelta) -> Option<u64> {
        let busy = self
            .in_flight
            .is_some_and(|f| now.signed_duration_since(f.started_at) < stale_after);
        self.open = true;
        self.response = None;
        if busy {
            return None;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight = Some(InFlight {
            seq,
            started_at: now,
        });
        Some(seq)
    }

    /// Land the outcome of request `seq`.
    ///
    /// Any failure shows [`FALLBACK_MESSAGE`]; so does a blank response. Returns
    /// whether the outcome became visible.
    pub fn complete<E>(&mut self, seq: u64, outcome: Result<String, E>) -> bool {
        if self.in_flight.map(|f| f.seq) != Some(seq) {
            return false;
        }
        self.in_flight = None;

        if !self.open {
            return false;
        }

        let text = match outcome {
            Ok(text) if !text.trim().is_empty() => text,
            _ => FALLBACK_MESSAGE.to_owned(),
        };
        self.response = Some(text);
        true
    }

    /// Close the modal. An outstanding request keeps running; its response
    /// will be dropped when it arrives.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.response = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::{Color, Grade};

    fn stale_after() -> TimeDelta {
        TimeDelta::seconds(30)
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_800_000_000, 0).unwrap()
    }

    #[test]
    fn test_prompt_mentions_selection() {
        let mut draft = OrderDraft::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        draft.item = "Partition Plate".to_owned();
        draft.grade = Grade::new("300 GSM");
        draft.color = Color::Silver;

        let prompt = advisory_prompt(&draft);
        assert!(prompt.contains("Item: Partition Plate"));
        assert!(prompt.contains("GSM: 300 GSM"));
        assert!(prompt.contains("Color: Silver"));
        assert!(prompt.contains("under 100 words"));
    }

    #[test]
    fn test_begin_enters_loading() {
        let mut panel = AdvisoryPanel::default();
        assert!(!panel.is_open());

        let seq = panel.begin(t0(), stale_after());
        assert!(seq.is_some());
        assert!(panel.is_open());
        assert!(panel.is_loading());
        assert_eq!(panel.response(), None);
    }

    #[test]
    fn test_success_shows_text_verbatim() {
        let mut panel = AdvisoryPanel::default();
        let seq = panel.begin(t0(), stale_after()).unwrap();

        let shown = panel.complete::<()>(seq, Ok("Use 300 GSM for weddings.".to_owned()));
        assert!(shown);
        assert!(!panel.is_loading());
        assert_eq!(panel.response(), Some("Use 300 GSM for weddings."));
    }

    #[test]
    fn test_failure_shows_fallback() {
        let mut panel = AdvisoryPanel::default();
        let seq = panel.begin(t0(), stale_after()).unwrap();

        assert!(panel.complete(seq, Err("connection refused")));
        assert!(!panel.is_loading());
        assert_eq!(panel.response(), Some(FALLBACK_MESSAGE));
    }

    #[test]
    fn test_blank_text_shows_fallback() {
        let mut panel = AdvisoryPanel::default();
        let seq = panel.begin(t0(), stale_after()).unwrap();
        panel.complete::<()>(seq, Ok("  \n".to_owned()));
        assert_eq!(panel.response(), Some(FALLBACK_MESSAGE));
    }

    #[test]
    fn test_busy_panel_refuses_second_request() {
        let mut panel = AdvisoryPanel::default();
        let first = panel.begin(t0(), stale_after()).unwrap();
        assert_eq!(panel.begin(t0() + TimeDelta::seconds(1), stale_after()), None);

        assert!(panel.complete::<()>(first, Ok("ok".to_owned())));
        assert!(panel.begin(t0() + TimeDelta::seconds(2), stale_after()).is_some());
    }

    #[test]
    fn test_stale_request_is_superseded() {
        let mut panel = AdvisoryPanel::default();
        let first = panel.begin(t0(), stale_after()).unwrap();
        let second = panel
            .begin(t0() + TimeDelta::seconds(31), stale_after())
            .unwrap();
        assert_ne!(first, second);

        assert!(!panel.complete::<()>(first, Ok("late".to_owned())));
        assert!(panel.is_loading());
        assert!(panel.complete::<()>(second, Ok("fresh".to_owned())));
        assert_eq!(panel.response(), Some("fresh"));
    }

    #[test]
    fn test_response_after_dismiss_is_dropped() {
        let mut panel = AdvisoryPanel::default();
        let seq = panel.begin(t0(), stale_after()).unwrap();
        panel.dismiss();

        assert!(!panel.complete::<()>(seq, Ok("advice".to_owned())));
        assert!(!panel.is_open());
        assert!(!panel.is_loading());
        assert_eq!(panel.response(), None);
    }

    #[test]
    fn test_dismiss_keeps_busy_guard_until_completion() {
        let mut panel = AdvisoryPanel::default();
        let seq = panel.begin(t0(), stale_after()).unwrap();
        panel.dismiss();
        assert_eq!(panel.begin(t0(), stale_after()), None);

        panel.complete::<()>(seq, Ok("advice".to_owned()));
        assert!(panel.begin(t0(), stale_after()).is_some());
    }

    #[test]
    fn test_reask_after_dismiss_shows_outstanding_outcome() {
        let mut panel = AdvisoryPanel::default();
        let seq = panel.begin(t0(), stale_after()).unwrap();
        panel.dismiss();

        assert_eq!(panel.begin(t0() + TimeDelta::seconds(1), stale_after()), None);
        assert!(panel.is_open());
        assert!(panel.is_loading());

        assert!(panel.complete::<()>(seq, Ok("Use 300 GSM for weddings.".to_owned())));
        assert_eq!(panel.response(), Some("Use 300 GSM for weddings."));
    }
}
