//! Coffee-vending machine domain layered on the generic net: the compiled-in
//! model, the single-cycle exclusivity policy and the session controller.

pub mod model;
pub mod policy;
pub mod session;

pub use model::CoffeeMachine;
pub use policy::CyclePolicy;
pub use session::{LogEntry, Session, SessionError};
