use crate::events::EventKind;

/// Two pending timestamps, one per event stream. There is no queue: each
/// stream has exactly one outstanding event at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct EventScheduler {
    pub next_arrival_date: f64,
    pub next_restock_date: f64,
}

impl EventScheduler {
    pub fn new(first_arrival: f64, first_restock: f64) -> Self {
        EventScheduler { next_arrival_date: first_arrival, next_restock_date: first_restock }
    }

    /// Arrival iff the restock is strictly later. On a tie the restock
    /// goes first so the coincident arrival sees the new stock.
    pub fn next_event(&self) -> EventKind {
        if self.next_restock_date > self.next_arrival_date {
            EventKind::Arrival
        } else {
            EventKind::Restock
        }
    }

    /// Clock value after an event: the earlier of the two pending dates.
    pub fn clock(&self) -> f64 {
        self.next_arrival_date.min(self.next_restock_date)
    }
}
