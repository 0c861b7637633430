//! End-to-end simulation tests against the compiled-in coffee machine model.

use coffee_pn::config::SimConfig;
use coffee_pn::machine::{CoffeeMachine, CyclePolicy, Session, SessionError};
use coffee_pn::net::{TransitionId, Weight};

const CYCLE_START_KEYS: [&str; 4] = ["t1", "t2", "t4", "t5"];
const HAPPY_PATH: [&str; 11] = [
    "t1", "t2", "t4", "t5", "t6", "t8", "t9", "t10", "t11", "t12", "t13",
];

fn session_with(stock: SimConfig) -> Session {
    Session::with_seed(CoffeeMachine::build(&stock).unwrap(), 0xC0FFEE)
}

fn session() -> Session {
    session_with(SimConfig::default())
}

fn tid(session: &Session, key: &str) -> TransitionId {
    session.net().transition_id(key).unwrap()
}

fn tokens(session: &Session, key: &str) -> Weight {
    session
        .current_marking()
        .tokens(session.net().place_id(key).unwrap())
}

fn drive(session: &mut Session, keys: &[&str]) {
    for key in keys {
        let transition = tid(session, key);
        session
            .advance(transition)
            .unwrap_or_else(|e| panic!("driving {key} failed: {e}"));
    }
}

fn fireable_keys(session: &Session) -> Vec<String> {
    session
        .fireable_transitions()
        .into_iter()
        .map(|t| session.net().get_transition(t).unwrap().key.clone())
        .collect()
}

#[test]
fn scenario_initial_marking_and_fireable_set() {
    let session = session();
    let snapshot = session.marking_snapshot();
    assert_eq!(snapshot["p1"], 1);
    assert_eq!(snapshot["p12"], 10);
    assert_eq!(snapshot["p13"], 50);
    assert_eq!(snapshot["p14"], 100);
    for key in [
        "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9", "p10", "p11",
    ] {
        assert_eq!(snapshot[key], 0, "{key} must start empty");
    }
    assert_eq!(fireable_keys(&session), vec!["t1"]);
}

#[test]
fn scenario_payment_flow_branches() {
    let mut session = session();
    drive(&mut session, &["t1"]);
    assert_eq!(tokens(&session, "p1"), 0);
    assert_eq!(tokens(&session, "p2"), 1);

    drive(&mut session, &["t2"]);
    assert_eq!(tokens(&session, "p2"), 0);
    assert_eq!(tokens(&session, "p3"), 1);

    let fireable = fireable_keys(&session);
    assert!(fireable.contains(&"t3".to_string()));
    assert!(fireable.contains(&"t4".to_string()));

    // insufficient payment loops back to coin insertion
    drive(&mut session, &["t3"]);
    assert_eq!(tokens(&session, "p3"), 0);
    assert_eq!(tokens(&session, "p2"), 1);
}

#[test]
fn scenario_stock_check_consumes_resources() {
    let mut session = session();
    drive(&mut session, &["t1", "t2", "t4", "t5"]);
    assert_eq!(tokens(&session, "p5"), 1);

    drive(&mut session, &["t6"]);
    assert_eq!(tokens(&session, "p5"), 0);
    assert_eq!(tokens(&session, "p6"), 1);
    assert_eq!(tokens(&session, "p12"), 9);
    assert_eq!(tokens(&session, "p13"), 49);
    assert_eq!(tokens(&session, "p14"), 99);
}

#[test]
fn scenario_stock_check_fails_when_a_resource_is_empty() {
    let mut session = session_with(SimConfig {
        cups: 0,
        ..SimConfig::default()
    });
    drive(&mut session, &["t1", "t2", "t4", "t5"]);
    assert_eq!(tokens(&session, "p5"), 1);

    let fireable = fireable_keys(&session);
    assert!(!fireable.contains(&"t6".to_string()));
    assert!(fireable.contains(&"t7".to_string()));

    // the failure branch loops back to the beverage choice
    drive(&mut session, &["t7"]);
    assert_eq!(tokens(&session, "p4"), 1);
}

#[test]
fn scenario_exclusivity_gate_blocks_new_cycles() {
    let mut session = session();
    drive(&mut session, &["t1", "t2", "t4", "t5", "t6"]);
    assert!(session.is_machine_running());

    // from the first in-process place to collection, no cycle-start
    // transition may appear in the fireable set
    for key in ["t8", "t9", "t10", "t11", "t12"] {
        let fireable = fireable_keys(&session);
        for start in CYCLE_START_KEYS {
            assert!(
                !fireable.contains(&start.to_string()),
                "{start} must be gated while running (before {key})"
            );
        }
        drive(&mut session, &[key]);
    }

    assert!(!session.is_machine_running());
    drive(&mut session, &["t13"]);
    assert_eq!(tokens(&session, "p1"), 1);
    assert!(fireable_keys(&session).contains(&"t1".to_string()));
}

#[test]
fn gate_blocks_enabled_cycle_start_even_with_an_idle_token() {
    // drive a cycle into the in-process region, then hand the idle place a
    // token directly: t1 is enabled but must not be fireable
    let machine = CoffeeMachine::build(&SimConfig::default()).unwrap();
    let (net, policy) = machine.into_parts();

    let mut marking = net.initial_marking();
    for key in ["t1", "t2", "t4", "t5", "t6"] {
        let t = net.transition_id(key).unwrap();
        marking = net.fire_transition(&marking, t).unwrap();
    }
    *marking.tokens_mut(net.place_id("p1").unwrap()) = 1;

    let t1 = net.transition_id("t1").unwrap();
    assert!(net.is_enabled(t1, &marking));
    assert!(!policy.is_fireable(&net, t1, &marking));
    assert!(!policy.fireable_transitions(&net, &marking).contains(&t1));
}

#[test]
fn advance_reports_machine_busy_for_a_gated_but_enabled_transition() {
    use coffee_pn::net::{ArcDef, Net, Place, PlaceGroup, Transition, TransitionRole};
    use rand::{SeedableRng, rngs::StdRng};

    // two idle tokens, so `start` stays enabled after the first cycle opens
    let net = Net::from_definition(
        vec![
            Place::new("idle", "Idle", 2, PlaceGroup::Flow),
            Place::new("busy", "Busy", 0, PlaceGroup::Flow),
        ],
        vec![
            Transition::new_with_role("start", "Start", TransitionRole::CycleStart),
            Transition::new_with_role("finish", "Finish", TransitionRole::InFlight),
        ],
        &[
            ArcDef::new("idle", "start", 1),
            ArcDef::new("start", "busy", 1),
            ArcDef::new("busy", "finish", 1),
            ArcDef::new("finish", "idle", 1),
        ],
    )
    .unwrap();
    let policy = CyclePolicy::from_keys(&net, &["busy"]).unwrap();
    let mut session = Session::from_parts(net, policy, StdRng::seed_from_u64(1));

    let start = session.net().transition_id("start").unwrap();
    session.advance(start).unwrap();
    match session.advance(start) {
        Err(SessionError::MachineBusy(t)) => assert_eq!(t, start),
        other => panic!("expected MachineBusy, got {other:?}"),
    }
    assert_eq!(session.step(), 1, "the rejected step must not be applied");
}

#[test]
fn cancel_requires_both_payment_and_choice_tokens() {
    // the arc table gives t14 a conjunctive precondition (Pre[p2][t14] = 1
    // and Pre[p4][t14] = 1), and a single customer never marks both places
    // at once, so cancellation stays disabled along the normal flow
    let mut session = session();
    let net_t14 = tid(&session, "t14");
    let net = session.net();
    let p2 = net.place_id("p2").unwrap();
    let p4 = net.place_id("p4").unwrap();
    assert_eq!(*net.incidence().0.get(p2, net_t14), 1);
    assert_eq!(*net.incidence().0.get(p4, net_t14), 1);

    drive(&mut session, &["t1"]);
    assert!(!fireable_keys(&session).contains(&"t14".to_string()));
    drive(&mut session, &["t2", "t4"]);
    assert!(!fireable_keys(&session).contains(&"t14".to_string()));
}

#[test]
fn conservation_per_transition_delta() {
    let mut session = session();
    for key in HAPPY_PATH {
        let transition = tid(&session, key);
        let before = session.current_marking().total() as i64;
        let delta = session.net().token_delta(transition);
        drive(&mut session, &[key]);
        let after = session.current_marking().total() as i64;
        assert_eq!(after - before, delta, "token delta mismatch for {key}");
    }
}

#[test]
fn full_cycle_consumes_exactly_one_unit_of_each_resource() {
    let mut session = session();
    drive(&mut session, &HAPPY_PATH);
    let snapshot = session.marking_snapshot();
    assert_eq!(snapshot["p1"], 1);
    assert_eq!(snapshot["p12"], 9);
    assert_eq!(snapshot["p13"], 49);
    assert_eq!(snapshot["p14"], 99);
    assert_eq!(session.step(), HAPPY_PATH.len());
    assert_eq!(session.log().len(), HAPPY_PATH.len() + 1);
}

#[test]
fn scenario_random_step_picks_only_fireable_choices() {
    // empty stock: after t1/t2/t4 the customer sits at the beverage choice
    // and loops between t5 and the failing stock check's t7 forever
    let mut session = session_with(SimConfig {
        cups: 0,
        coffee_doses: 0,
        water_doses: 0,
    });
    drive(&mut session, &["t1", "t2", "t4"]);

    for _ in 0..40 {
        let fireable = session.fireable_transitions();
        assert!(!fireable.is_empty(), "this net has no dead marking");
        let picked = session.random_step().expect("fireable set is non-empty");
        assert!(fireable.contains(&picked));
    }
}

#[test]
fn long_random_walk_keeps_the_log_consistent() {
    let mut session = session();
    for _ in 0..300 {
        if session.random_step().is_none() {
            break;
        }
    }
    let log = session.log();
    assert_eq!(log[0].action, "Init");
    for (index, entry) in log.iter().enumerate() {
        assert_eq!(entry.step, index, "steps must increase monotonically");
    }
    assert_eq!(log.last().unwrap().marking, *session.current_marking());
}

#[test]
fn reset_after_random_walk_restores_everything() {
    let mut session = session();
    for _ in 0..100 {
        session.random_step();
    }
    session.reset();
    assert_eq!(session.step(), 0);
    assert_eq!(session.log().len(), 1);
    assert_eq!(*session.current_marking(), session.net().initial_marking());
    assert_eq!(fireable_keys(&session), vec!["t1"]);
}

#[test]
fn incidence_values_expose_the_structural_matrix() {
    let session = session();
    let net = session.net();
    let p1 = net.place_id("p1").unwrap();
    let p2 = net.place_id("p2").unwrap();
    let t1 = net.transition_id("t1").unwrap();
    assert_eq!(session.incidence_value(p1, t1), -1);
    assert_eq!(session.incidence_value(p2, t1), 1);
    // a place untouched by the transition reads zero
    let p14 = net.place_id("p14").unwrap();
    assert_eq!(session.incidence_value(p14, t1), 0);
}
