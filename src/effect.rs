//! Effects - side effects declared by the reducer

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Initial catalog fetch
    LoadCatalog { request_id: u64 },
    /// Fetch again to re-derive the view after a search/sort change
    RefreshCatalog { request_id: u64 },
    /// Fire `DeriveDue(ticket)` after `delay_ms`, replacing any pending timer
    ScheduleDerive { ticket: u64, delay_ms: u64 },
}
