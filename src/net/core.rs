//! Runtime semantics: net construction, the enablement predicate and the
//! firing rule.
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::incidence::Incidence;
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::structure::{ArcDef, Marking, Place, Transition, Weight};

/// Construction-time validation failure. A net that fails to build must not
/// be used; there is no partially constructed state.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("arc endpoint {0:?} is not a declared place or transition")]
    UndeclaredKey(String),
    #[error("arc {src:?} -> {target:?} must connect a place and a transition")]
    MismatchedEndpoints { src: String, target: String },
    #[error("arc {src:?} -> {target:?} has zero weight")]
    ZeroWeight { src: String, target: String },
    #[error("key {0:?} is declared more than once")]
    DuplicateKey(String),
}

#[derive(Debug, Error)]
pub enum FireError {
    #[error("transition {0:?} is out of bounds")]
    OutOfBounds(TransitionId),
    #[error("transition {0:?} is not enabled under the supplied marking")]
    NotEnabled(TransitionId),
}

/// An immutable place/transition net. `pre` and `post` are derived from the
/// arc list exactly once, in [`Net::from_definition`]; every accessor after
/// that point is read-only.
#[derive(Clone, Serialize, Deserialize)]
pub struct Net {
    places: IndexVec<PlaceId, Place>,
    transitions: IndexVec<TransitionId, Transition>,
    pre: Incidence<Weight>,
    post: Incidence<Weight>,
    place_index: IndexMap<String, PlaceId>,
    transition_index: IndexMap<String, TransitionId>,
}

impl fmt::Debug for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Net")
            .field("places", &self.places)
            .field("transitions", &self.transitions)
            .field("pre", &self.pre)
            .field("post", &self.post)
            .finish()
    }
}

impl Net {
    /// Builds a net from its declarative tables. Parallel arcs between the
    /// same endpoints accumulate by summation. Fails on an arc that names an
    /// undeclared key, connects two places or two transitions, or carries a
    /// zero weight.
    pub fn from_definition(
        places: Vec<Place>,
        transitions: Vec<Transition>,
        arcs: &[ArcDef],
    ) -> Result<Self, NetError> {
        let places = IndexVec::from(places);
        let transitions = IndexVec::from(transitions);

        let mut place_index = IndexMap::new();
        for (id, place) in places.iter_enumerated() {
            if place_index.insert(place.key.clone(), id).is_some() {
                return Err(NetError::DuplicateKey(place.key.clone()));
            }
        }
        let mut transition_index = IndexMap::new();
        for (id, transition) in transitions.iter_enumerated() {
            if place_index.contains_key(&transition.key) {
                return Err(NetError::DuplicateKey(transition.key.clone()));
            }
            if transition_index.insert(transition.key.clone(), id).is_some() {
                return Err(NetError::DuplicateKey(transition.key.clone()));
            }
        }

        let mut pre = Incidence::new(places.len(), transitions.len(), 0u64);
        let mut post = Incidence::new(places.len(), transitions.len(), 0u64);

        for arc in arcs {
            if arc.weight == 0 {
                return Err(NetError::ZeroWeight {
                    src: arc.source.clone(),
                    target: arc.target.clone(),
                });
            }
            if let Some(&place) = place_index.get(&arc.source) {
                match transition_index.get(&arc.target) {
                    Some(&transition) => *pre.get_mut(place, transition) += arc.weight,
                    None if place_index.contains_key(&arc.target) => {
                        return Err(NetError::MismatchedEndpoints {
                            src: arc.source.clone(),
                            target: arc.target.clone(),
                        });
                    }
                    None => return Err(NetError::UndeclaredKey(arc.target.clone())),
                }
            } else if let Some(&transition) = transition_index.get(&arc.source) {
                match place_index.get(&arc.target) {
                    Some(&place) => *post.get_mut(place, transition) += arc.weight,
                    None if transition_index.contains_key(&arc.target) => {
                        return Err(NetError::MismatchedEndpoints {
                            src: arc.source.clone(),
                            target: arc.target.clone(),
                        });
                    }
                    None => return Err(NetError::UndeclaredKey(arc.target.clone())),
                }
            } else {
                return Err(NetError::UndeclaredKey(arc.source.clone()));
            }
        }

        Ok(Self {
            places,
            transitions,
            pre,
            post,
            place_index,
            transition_index,
        })
    }

    pub fn places(&self) -> &IndexVec<PlaceId, Place> {
        &self.places
    }

    pub fn transitions(&self) -> &IndexVec<TransitionId, Transition> {
        &self.transitions
    }

    pub fn places_len(&self) -> usize {
        self.places.len()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions.len()
    }

    pub fn get_place(&self, place: PlaceId) -> Option<&Place> {
        self.places.get(place)
    }

    pub fn get_transition(&self, transition: TransitionId) -> Option<&Transition> {
        self.transitions.get(transition)
    }

    pub fn place_id(&self, key: &str) -> Option<PlaceId> {
        self.place_index.get(key).copied()
    }

    pub fn transition_id(&self, key: &str) -> Option<TransitionId> {
        self.transition_index.get(key).copied()
    }

    /// The marking the net starts in, taken from the declared token counts.
    pub fn initial_marking(&self) -> Marking {
        Marking::new(IndexVec::from(
            self.places.iter().map(|p| p.tokens).collect::<Vec<_>>(),
        ))
    }

    pub fn incidence(&self) -> (&Incidence<Weight>, &Incidence<Weight>) {
        (&self.pre, &self.post)
    }

    /// Effect matrix `C = Post - Pre`.
    pub fn c_matrix(&self) -> Incidence<i64> {
        self.post.difference(&self.pre)
    }

    /// `Post[p, t] - Pre[p, t]`: the net effect of firing `t` on place `p`.
    pub fn incidence_value(&self, place: PlaceId, transition: TransitionId) -> i64 {
        *self.post.get(place, transition) as i64 - *self.pre.get(place, transition) as i64
    }

    /// Fixed change in the total token count caused by firing `transition`.
    pub fn token_delta(&self, transition: TransitionId) -> i64 {
        self.post.column_total(transition) as i64 - self.pre.column_total(transition) as i64
    }

    /// Standard enablement: every input place covers its `Pre` weight.
    /// Places with a zero `Pre` entry impose no constraint.
    pub fn is_enabled(&self, transition: TransitionId, marking: &Marking) -> bool {
        if transition.index() >= self.transitions_len() {
            return false;
        }
        for (place, row) in self.pre.rows().iter_enumerated() {
            if marking.tokens(place) < row[transition.index()] {
                return false;
            }
        }
        true
    }

    /// Enabled transitions in declaration order.
    pub fn enabled_transitions(&self, marking: &Marking) -> Vec<TransitionId> {
        self.transitions
            .iter_enumerated()
            .filter_map(|(transition, _)| {
                if self.is_enabled(transition, marking) {
                    Some(transition)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Fires `transition` under `marking` and returns the successor marking
    /// `M'[p] = M[p] - Pre[p, t] + Post[p, t]`. Pure: the input marking is
    /// untouched and identical inputs yield identical outputs.
    pub fn fire_transition(
        &self,
        marking: &Marking,
        transition: TransitionId,
    ) -> Result<Marking, FireError> {
        if transition.index() >= self.transitions_len() {
            return Err(FireError::OutOfBounds(transition));
        }
        if !self.is_enabled(transition, marking) {
            return Err(FireError::NotEnabled(transition));
        }

        let mut next = marking.clone();

        for (place, _) in self.places.iter_enumerated() {
            let weight = *self.pre.get(place, transition);
            if weight > 0 {
                let tokens = next.tokens_mut(place);
                *tokens = tokens
                    .checked_sub(weight)
                    .expect("enabled transition must have sufficient tokens");
            }
        }

        for (place, _) in self.places.iter_enumerated() {
            let weight = *self.post.get(place, transition);
            if weight > 0 {
                *next.tokens_mut(place) += weight;
            }
        }

        Ok(next)
    }

    /// Snapshot of `marking` keyed by place key, in declaration order.
    pub fn marking_by_key<'a>(&'a self, marking: &Marking) -> IndexMap<&'a str, Weight> {
        self.places
            .iter_enumerated()
            .map(|(id, place)| (place.key.as_str(), marking.tokens(id)))
            .collect()
    }
}
