//! Mutual-exclusion gate: at most one brew cycle may be in flight.
//!
//! The raw net would happily interleave cycles (a second coin while a cup is
//! still brewing), so fireability is enablement plus a policy check keyed on
//! the transition role. The gate is not encoded in the arcs; it is evaluated
//! fresh against the current marking on every query.
use crate::net::{Marking, Net, NetError, PlaceId, TransitionId, TransitionRole};

/// The designated in-process places and the gate predicate over them.
#[derive(Debug, Clone)]
pub struct CyclePolicy {
    processing: Vec<PlaceId>,
}

impl CyclePolicy {
    /// Resolves the in-process place keys against `net`. Fails on a key the
    /// net does not declare, at construction time rather than mid-query.
    pub fn from_keys(net: &Net, keys: &[&str]) -> Result<Self, NetError> {
        let mut processing = Vec::with_capacity(keys.len());
        for key in keys {
            let place = net
                .place_id(key)
                .ok_or_else(|| NetError::UndeclaredKey((*key).to_string()))?;
            processing.push(place);
        }
        Ok(Self { processing })
    }

    /// True iff any in-process place holds a token.
    pub fn is_machine_running(&self, marking: &Marking) -> bool {
        self.processing
            .iter()
            .any(|place| marking.tokens(*place) > 0)
    }

    /// Enablement plus the exclusivity gate. `CycleStart` transitions are
    /// blocked while the machine is running; `InFlight` transitions pass as
    /// soon as they are enabled so the running cycle can always complete.
    pub fn is_fireable(&self, net: &Net, transition: TransitionId, marking: &Marking) -> bool {
        let Some(t) = net.get_transition(transition) else {
            return false;
        };
        if !net.is_enabled(transition, marking) {
            return false;
        }
        match t.role {
            TransitionRole::InFlight => true,
            TransitionRole::CycleStart => !self.is_machine_running(marking),
        }
    }

    /// Fireable transitions in declaration order.
    pub fn fireable_transitions(&self, net: &Net, marking: &Marking) -> Vec<TransitionId> {
        let running = self.is_machine_running(marking);
        net.transitions()
            .iter_enumerated()
            .filter_map(|(id, t)| {
                if !net.is_enabled(id, marking) {
                    return None;
                }
                match t.role {
                    TransitionRole::InFlight => Some(id),
                    TransitionRole::CycleStart if !running => Some(id),
                    TransitionRole::CycleStart => None,
                }
            })
            .collect()
    }
}
