//! Request sequencing for the fetch cycles
//!
//! Every dispatched request gets a monotonically increasing ticket. When a
//! response lands, the sequencer decides whether it may mutate state: under
//! [`StalePolicy::DiscardStale`] only the response to the latest dispatched
//! request is applied, so a slow older response can never overwrite a newer
//! one. [`StalePolicy::AcceptAll`] applies everything in arrival order.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// What to do with a response that is not for the latest request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    #[default]
    DiscardStale,
    /// Apply every response in arrival order (last response wins)
    AcceptAll,
}

impl StalePolicy {
    pub fn from_discard_flag(discard_stale: bool) -> Self {
        if discard_stale {
            StalePolicy::DiscardStale
        } else {
            StalePolicy::AcceptAll
        }
    }
}

/// Handle of one dispatched request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Requesting,
    Reconciling,
}

/// Verdict on a landed response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Apply,
    Stale,
}

/// `Idle → Requesting → Reconciling → Idle` with sequence tickets
#[derive(Debug, Clone)]
pub struct RequestSequencer {
    name: &'static str,
    policy: StalePolicy,
    latest: u64,
    in_flight: usize,
    state: CycleState,
}

impl RequestSequencer {
    pub fn new(name: &'static str, policy: StalePolicy) -> Self {
        Self {
            name,
            policy,
            latest: 0,
            in_flight: 0,
            state: CycleState::Idle,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn latest(&self) -> Option<RequestTicket> {
        (self.latest > 0).then_some(RequestTicket(self.latest))
    }

    /// Issue a ticket for a new request
    pub fn dispatch(&mut self) -> RequestTicket {
        self.latest += 1;
        self.in_flight += 1;
        self.state = CycleState::Requesting;
        RequestTicket(self.latest)
    }

    /// A response arrived. On `Apply` the caller mutates state and then
    /// calls [`Self::finish`].
    pub fn admit(&mut self, ticket: RequestTicket) -> Admission {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.policy == StalePolicy::DiscardStale && ticket.0 < self.latest {
            debug!(
                cycle = self.name,
                seq = ticket.0,
                latest = self.latest,
                "discarding stale response"
            );
            self.settle();
            return Admission::Stale;
        }

        self.state = CycleState::Reconciling;
        Admission::Apply
    }

    /// Reconciliation of an admitted response is done
    pub fn finish(&mut self) {
        self.settle();
    }

    /// The request failed; nothing is mutated
    pub fn fail(&mut self, _ticket: RequestTicket) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.settle();
    }

    fn settle(&mut self) {
        self.state = if self.in_flight > 0 {
            CycleState::Requesting
        } else {
            CycleState::Idle
        };
    }
}
