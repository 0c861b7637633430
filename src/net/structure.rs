//! Static structural elements of a P/T net: places, transitions, arcs and
//! markings.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::net::ids::PlaceId;
use crate::net::index_vec::IndexVec;

pub type Weight = u64;

/// Display grouping of a place. `Flow` places model the progress of a brew
/// cycle, `Stock` places model consumable inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceGroup {
    Flow,
    Stock,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Place {
    pub key: String,
    pub label: String,
    /// Tokens held in the initial marking.
    pub tokens: Weight,
    pub group: PlaceGroup,
}

impl Place {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        tokens: Weight,
        group: PlaceGroup,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            tokens,
            group,
        }
    }
}

/// Role of a transition under the mutual-exclusion policy. `CycleStart`
/// transitions open a new brew cycle and are blocked while one is in
/// progress; `InFlight` transitions belong to the running cycle and must
/// always be allowed to complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionRole {
    CycleStart,
    InFlight,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Transition {
    pub key: String,
    pub label: String,
    pub role: TransitionRole,
}

impl Transition {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            role: TransitionRole::InFlight,
        }
    }

    pub fn new_with_role(
        key: impl Into<String>,
        label: impl Into<String>,
        role: TransitionRole,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            role,
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transition").field(&self.key).finish()
    }
}

/// Declarative arc: one endpoint must be a place key, the other a transition
/// key. The direction is recovered during net construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArcDef {
    pub source: String,
    pub target: String,
    pub weight: Weight,
}

impl ArcDef {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: Weight) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// Token counts for every place; the complete runtime state of the net.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Marking(pub(crate) IndexVec<PlaceId, Weight>);

impl Marking {
    pub fn new(initial: IndexVec<PlaceId, Weight>) -> Self {
        Self(initial)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlaceId, &Weight)> {
        self.0.iter_enumerated()
    }

    pub fn tokens(&self, place: PlaceId) -> Weight {
        self.0[place]
    }

    pub fn tokens_mut(&mut self, place: PlaceId) -> &mut Weight {
        &mut self.0[place]
    }

    /// Total number of tokens across all places.
    pub fn total(&self) -> Weight {
        self.0.iter().sum()
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (place, tokens) in self.iter() {
            map.entry(&place, tokens);
        }
        map.finish()
    }
}
