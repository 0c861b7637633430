//! Compiled-in definition of the coffee-vending machine net.
//!
//! The structure (places, transitions, arcs) is fixed configuration data;
//! only the initial stock levels come from [`SimConfig`]. One customer flow
//! `p1..p11`, three resource pools `p12..p14`, fourteen transitions
//! including the insufficient-payment loop (`t3`), the stock-failure loop
//! (`t7`) and cancellation (`t14`).
use crate::config::SimConfig;
use crate::machine::policy::CyclePolicy;
use crate::net::{
    ArcDef, Net, NetError, Place, PlaceGroup, Transition, TransitionRole, Weight,
};

/// Places holding a token while a brew cycle is in progress. Drives the
/// exclusivity gate; these are the flow places between a successful stock
/// check and beverage collection.
pub const PROCESSING_PLACES: [&str; 5] = ["p6", "p7", "p8", "p9", "p10"];

/// `(source, target, weight)` arc table. The sole source of truth for the
/// `Pre`/`Post` matrices.
const ARCS: [(&str, &str, Weight); 32] = [
    // main flow
    ("p1", "t1", 1),
    ("t1", "p2", 1),
    ("p2", "t2", 1),
    ("t2", "p3", 1),
    ("p3", "t4", 1),
    ("t4", "p4", 1),
    ("p4", "t5", 1),
    ("t5", "p5", 1),
    ("p5", "t6", 1),
    ("t6", "p6", 1),
    ("p6", "t8", 1),
    ("t8", "p7", 1),
    ("p7", "t9", 1),
    ("t9", "p8", 1),
    ("p8", "t10", 1),
    ("t10", "p9", 1),
    ("p9", "t11", 1),
    ("t11", "p10", 1),
    ("p10", "t12", 1),
    ("t12", "p11", 1),
    ("p11", "t13", 1),
    ("t13", "p1", 1),
    // insufficient payment loops back to coin insertion
    ("p3", "t3", 1),
    ("t3", "p2", 1),
    // failed stock check loops back to beverage choice
    ("p5", "t7", 1),
    ("t7", "p4", 1),
    // a successful stock check consumes one unit of each resource
    ("p12", "t6", 1),
    ("p13", "t6", 1),
    ("p14", "t6", 1),
    // cancellation from coin insertion or beverage choice
    ("p2", "t14", 1),
    ("p4", "t14", 1),
    ("t14", "p11", 1),
];

fn places(stock: &SimConfig) -> Vec<Place> {
    vec![
        Place::new("p1", "AwaitingCustomer", 1, PlaceGroup::Flow),
        Place::new("p2", "CoinInserted", 0, PlaceGroup::Flow),
        Place::new("p3", "PaymentCheck", 0, PlaceGroup::Flow),
        Place::new("p4", "BeverageChoice", 0, PlaceGroup::Flow),
        Place::new("p5", "StockCheck", 0, PlaceGroup::Flow),
        Place::new("p6", "WaterHeating", 0, PlaceGroup::Flow),
        Place::new("p7", "WaterReady", 0, PlaceGroup::Flow),
        Place::new("p8", "BrewingCoffee", 0, PlaceGroup::Flow),
        Place::new("p9", "CoffeeReady", 0, PlaceGroup::Flow),
        Place::new("p10", "DispensingBeverage", 0, PlaceGroup::Flow),
        Place::new("p11", "ReturnToIdle", 0, PlaceGroup::Flow),
        Place::new("p12", "CupsAvailable", stock.cups, PlaceGroup::Stock),
        Place::new("p13", "CoffeeDosesAvailable", stock.coffee_doses, PlaceGroup::Stock),
        Place::new("p14", "WaterDosesAvailable", stock.water_doses, PlaceGroup::Stock),
    ]
}

fn transitions() -> Vec<Transition> {
    use TransitionRole::{CycleStart, InFlight};
    vec![
        Transition::new_with_role("t1", "InsertCoin", CycleStart),
        Transition::new_with_role("t2", "ValidatePayment", CycleStart),
        Transition::new_with_role("t3", "InsufficientPayment", InFlight),
        Transition::new_with_role("t4", "GrantBeverageMenu", CycleStart),
        Transition::new_with_role("t5", "ChooseBeverage", CycleStart),
        Transition::new_with_role("t6", "StockOk", InFlight),
        Transition::new_with_role("t7", "StockFailed", InFlight),
        Transition::new_with_role("t8", "StartHeating", InFlight),
        Transition::new_with_role("t9", "StartBrewing", InFlight),
        Transition::new_with_role("t10", "FinishBrewing", InFlight),
        Transition::new_with_role("t11", "Dispense", InFlight),
        Transition::new_with_role("t12", "TakeBeverage", InFlight),
        Transition::new_with_role("t13", "Reset", InFlight),
        Transition::new_with_role("t14", "Cancel", InFlight),
    ]
}

/// The validated net together with its exclusivity policy.
#[derive(Debug, Clone)]
pub struct CoffeeMachine {
    net: Net,
    policy: CyclePolicy,
}

impl CoffeeMachine {
    pub fn build(stock: &SimConfig) -> Result<Self, NetError> {
        let arcs = ARCS
            .iter()
            .map(|(source, target, weight)| ArcDef::new(*source, *target, *weight))
            .collect::<Vec<_>>();
        let net = Net::from_definition(places(stock), transitions(), &arcs)?;
        let policy = CyclePolicy::from_keys(&net, &PROCESSING_PLACES)?;
        Ok(Self { net, policy })
    }

    pub fn net(&self) -> &Net {
        &self.net
    }

    pub fn policy(&self) -> &CyclePolicy {
        &self.policy
    }

    pub fn into_parts(self) -> (Net, CyclePolicy) {
        (self.net, self.policy)
    }
}
