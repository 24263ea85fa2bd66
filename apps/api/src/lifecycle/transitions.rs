//! The hiring pipeline policy: which status may follow which.
//!
//! `EDGES` is the only place the pipeline is encoded. Terminal states are
//! absent from it, so every lookup from them yields an empty set.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use crate::lifecycle::status::ApplicationStatus;

use ApplicationStatus::*;

const EDGES: &[(ApplicationStatus, &[ApplicationStatus])] = &[
    (Pending, &[InProgress, Rejected, Withdrawn]),
    (InProgress, &[Accepted, Rejected, AwaitingInterview]),
    (AwaitingInterview, &[InterviewPassed, InterviewFailed]),
    (InterviewPassed, &[OfferSent, Rejected]),
    (InterviewFailed, &[Rejected]),
    (OfferSent, &[OfferAccepted, OfferDeclined]),
    (OfferAccepted, &[Accepted]),
    (OfferDeclined, &[Rejected]),
];

/// Immutable from-state → reachable-states map.
#[derive(Debug)]
pub struct TransitionTable {
    edges: BTreeMap<ApplicationStatus, BTreeSet<ApplicationStatus>>,
}

impl TransitionTable {
    /// The process-wide pipeline table.
    pub fn standard() -> &'static TransitionTable {
        static TABLE: OnceLock<TransitionTable> = OnceLock::new();
        TABLE.get_or_init(|| TransitionTable::from_edges(EDGES))
    }

    fn from_edges(edges: &[(ApplicationStatus, &[ApplicationStatus])]) -> Self {
        let edges = edges
            .iter()
            .map(|(from, targets)| (*from, targets.iter().copied().collect()))
            .collect();
        Self { edges }
    }

    pub fn allows(&self, from: ApplicationStatus, to: ApplicationStatus) -> bool {
        self.edges
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    /// Statuses reachable from `from` in one step, in code order.
    pub fn targets(&self, from: ApplicationStatus) -> Vec<ApplicationStatus> {
        self.edges
            .get(&from)
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }
}
