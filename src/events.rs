use serde::Serialize;

use crate::types::CustomerId;

/// The two event streams a stand reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Arrival,
    Restock,
}

/// One processed event, recorded when tracing is enabled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandEvent {
    /// Timestamp of the event itself.
    pub time: f64,
    pub kind: StandEventDetail,
    /// Stock immediately after the event was applied.
    pub stock_after: u64,
    /// Clock after the scheduler advanced past this event.
    pub clock_after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StandEventDetail {
    CustomerArrived { customer_id: CustomerId, admitted: bool },
    Restocked { quantity: u32 },
}

impl StandEvent {
    pub fn event_kind(&self) -> EventKind {
        match self.kind {
            StandEventDetail::CustomerArrived { .. } => EventKind::Arrival,
            StandEventDetail::Restocked { .. } => EventKind::Restock,
        }
    }

    pub fn is_admission(&self) -> bool {
        matches!(self.kind, StandEventDetail::CustomerArrived { admitted: true, .. })
    }
}

pub type EventLog = Vec<StandEvent>;
