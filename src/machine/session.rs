//! Session controller: the single owner of all mutable simulation state.
//!
//! Everything below the session (net, matrices, policy) is pure; the session
//! holds the current marking, the step counter, the append-only execution
//! log and the RNG for random stepping. Embedders that share a session
//! across threads must guard whole operations, not just the inner reads,
//! since check-then-fire has to be atomic.
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::machine::model::CoffeeMachine;
use crate::machine::policy::CyclePolicy;
use crate::net::{FireError, Marking, Net, PlaceId, TransitionId, Weight};

const INIT_ACTION: &str = "Init";

/// One row of the execution log: the step counter, a human-readable action
/// label and the marking immediately after the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub step: usize,
    pub action: String,
    pub marking: Marking,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Fire(#[from] FireError),
    #[error("transition {0:?} cannot start a new cycle while the machine is running")]
    MachineBusy(TransitionId),
}

pub struct Session {
    net: Net,
    policy: CyclePolicy,
    initial: Marking,
    marking: Marking,
    step: usize,
    log: Vec<LogEntry>,
    rng: StdRng,
}

impl Session {
    pub fn new(machine: CoffeeMachine) -> Self {
        let (net, policy) = machine.into_parts();
        Self::from_parts(net, policy, StdRng::from_os_rng())
    }

    /// Seeded constructor for reproducible simulations.
    pub fn with_seed(machine: CoffeeMachine, seed: u64) -> Self {
        let (net, policy) = machine.into_parts();
        Self::from_parts(net, policy, StdRng::seed_from_u64(seed))
    }

    pub fn from_parts(net: Net, policy: CyclePolicy, rng: StdRng) -> Self {
        let initial = net.initial_marking();
        let marking = initial.clone();
        let log = vec![LogEntry {
            step: 0,
            action: INIT_ACTION.to_string(),
            marking: initial.clone(),
        }];
        Self {
            net,
            policy,
            initial,
            marking,
            step: 0,
            log,
            rng,
        }
    }

    pub fn net(&self) -> &Net {
        &self.net
    }

    /// Read-only view of the current marking.
    pub fn current_marking(&self) -> &Marking {
        &self.marking
    }

    /// Current marking keyed by place key, in declaration order.
    pub fn marking_snapshot(&self) -> IndexMap<&str, Weight> {
        self.net.marking_by_key(&self.marking)
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn is_machine_running(&self) -> bool {
        self.policy.is_machine_running(&self.marking)
    }

    /// Fireable transitions in declaration order: enabled and past the
    /// exclusivity gate.
    pub fn fireable_transitions(&self) -> Vec<TransitionId> {
        self.policy.fireable_transitions(&self.net, &self.marking)
    }

    pub fn incidence_value(&self, place: PlaceId, transition: TransitionId) -> i64 {
        self.net.incidence_value(place, transition)
    }

    /// Fires `transition`, advances the step counter and appends a log
    /// entry. Fails without touching any state when the transition is not
    /// currently fireable; there is no partially applied step.
    pub fn advance(&mut self, transition: TransitionId) -> Result<(), SessionError> {
        let label = self
            .net
            .get_transition(transition)
            .ok_or(FireError::OutOfBounds(transition))?
            .label
            .clone();
        if !self.net.is_enabled(transition, &self.marking) {
            return Err(FireError::NotEnabled(transition).into());
        }
        if !self.policy.is_fireable(&self.net, transition, &self.marking) {
            return Err(SessionError::MachineBusy(transition));
        }

        let next = self.net.fire_transition(&self.marking, transition)?;
        self.step += 1;
        self.marking = next;
        log::debug!("step {}: fired {}", self.step, label);
        self.log.push(LogEntry {
            step: self.step,
            action: format!("Fire {label}"),
            marking: self.marking.clone(),
        });
        Ok(())
    }

    /// Restores the initial marking, step 0 and a log holding only the init
    /// entry, regardless of prior history.
    pub fn reset(&mut self) {
        self.marking = self.initial.clone();
        self.step = 0;
        self.log.clear();
        self.log.push(LogEntry {
            step: 0,
            action: INIT_ACTION.to_string(),
            marking: self.initial.clone(),
        });
        log::info!("session reset");
    }

    /// Fires one uniformly chosen fireable transition. A no-op returning
    /// `None` when nothing is fireable.
    pub fn random_step(&mut self) -> Option<TransitionId> {
        let fireable = self.fireable_transitions();
        if fireable.is_empty() {
            return None;
        }
        let picked = fireable[self.rng.random_range(0..fireable.len())];
        self.advance(picked)
            .expect("transition drawn from the fireable set must fire");
        Some(picked)
    }
}
