//! # Place/Transition net core
//!
//! Let `P` be the set of places and `T` the set of transitions. The arc
//! table induces the input/output matrices `Pre, Post ∈ ℕ^{|P|×|T|}` and the
//! effect matrix `C = Post - Pre`. For a marking `M ∈ ℕ^{|P|}`:
//!
//! * transition `t ∈ T` is **enabled** iff `∀p ∈ P: M[p] ≥ Pre[p, t]`;
//! * firing an enabled `t` yields `M' = M + C[:, t]`.
//!
//! `Pre` and `Post` are derived from the declarative arc list exactly once,
//! at construction, and are read-only afterwards; parallel arcs between the
//! same endpoints accumulate by summation. Construction rejects arcs that
//! reference undeclared keys or connect two places or two transitions.
//!
//! ## Example
//!
//! ```rust
//! use coffee_pn::net::*;
//!
//! let net = Net::from_definition(
//!     vec![
//!         Place::new("p0", "Source", 1, PlaceGroup::Flow),
//!         Place::new("p1", "Sink", 0, PlaceGroup::Flow),
//!     ],
//!     vec![Transition::new("t0", "Move")],
//!     &[ArcDef::new("p0", "t0", 1), ArcDef::new("t0", "p1", 1)],
//! )
//! .unwrap();
//!
//! let marking = net.initial_marking();
//! let t0 = net.transition_id("t0").unwrap();
//! assert_eq!(net.enabled_transitions(&marking), vec![t0]);
//! let next = net.fire_transition(&marking, t0).unwrap();
//! assert_eq!(next.tokens(net.place_id("p0").unwrap()), 0);
//! assert_eq!(next.tokens(net.place_id("p1").unwrap()), 1);
//! ```

pub mod core;
pub mod ids;
pub mod incidence;
pub mod index_vec;
pub mod io;
pub mod structure;

pub use self::core::{FireError, Net, NetError};
pub use ids::{PlaceId, TransitionId};
pub use incidence::Incidence;
pub use index_vec::{Idx, IndexVec};
pub use structure::{ArcDef, Marking, Place, PlaceGroup, Transition, TransitionRole, Weight};
