//! Discrete-event simulation of a coffee-vending machine modelled as a
//! place/transition net.
//!
//! The [`net`] module is the generic engine: typed identifiers, the
//! `Pre`/`Post` incidence matrices derived once from a declarative arc
//! table, the enablement predicate and the firing rule. The [`machine`]
//! module layers the domain on top: the compiled-in coffee machine model,
//! the single-brew-cycle exclusivity policy and the [`machine::Session`]
//! controller that owns the marking, step counter and execution log.
//! Presentation is an external consumer of the session's read-only views.

pub mod config;
pub mod machine;
pub mod net;
pub mod options;

pub use config::SimConfig;
pub use machine::{CoffeeMachine, Session};
