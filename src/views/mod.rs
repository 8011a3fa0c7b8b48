//! View models for the storefront pages.
//!
//! Each view owns its display state (`loading`, an inline message, the
//! fetched data) and fetches independently through a `CatalogApi`. Fetches
//! are split into `begin_*` (issue a ticket) and `apply_*` (adopt the
//! response) so that a response overtaken by a newer request is dropped.

pub mod admin;
pub mod home;
pub mod navbar;
pub mod product_detail;
pub mod products;

/// Image shown when a product or category has none.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x250?text=No+Image";

/// Identifies one fetch issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Issues monotonically increasing tickets and remembers the latest one.
#[derive(Debug, Default, Clone)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    /// Issues a ticket that supersedes every ticket issued before it.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Whether `ticket` is the most recently issued one.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}
