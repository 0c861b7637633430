use anyhow::{Context, Result};
use itertools::Itertools;

use coffee_pn::config::SimConfig;
use coffee_pn::machine::{CoffeeMachine, Session};
use coffee_pn::net::{Net, io};
use coffee_pn::options::Options;

fn main() -> Result<()> {
    if std::env::var("COFFEE_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("COFFEE_LOG")
            .write_style("COFFEE_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    let options = Options::from_args();
    log::debug!("options: {:?}", options);

    let stock = match &options.config {
        Some(path) => SimConfig::load_from_file(path)?,
        None => SimConfig::default(),
    };
    let machine =
        CoffeeMachine::build(&stock).context("failed to build the coffee machine net")?;

    if options.matrix {
        print_incidence_matrix(machine.net());
        return Ok(());
    }

    let mut session = match options.seed {
        Some(seed) => Session::with_seed(machine, seed),
        None => Session::new(machine),
    };

    for _ in 0..options.steps {
        if session.random_step().is_none() {
            log::info!("no fireable transitions, stopping early");
            break;
        }
    }

    println!("After {} steps:", session.step());
    for (key, tokens) in session.marking_snapshot() {
        let label = session
            .net()
            .place_id(key)
            .and_then(|id| session.net().get_place(id))
            .map(|p| p.label.as_str())
            .unwrap_or(key);
        println!("  {key:<4} {label:<22} {tokens}");
    }
    println!("Machine running: {}", session.is_machine_running());

    println!("Log:");
    for entry in session.log() {
        println!("  {}. {}", entry.step, entry.action);
    }

    if let Some(path) = &options.output {
        io::write_json(path, &session.log().to_vec())
            .with_context(|| format!("failed to write execution log to {:?}", path))?;
        log::info!("execution log written to {:?}", path);
    }

    Ok(())
}

/// Text rendering of `C = Post - Pre`, places as rows and transitions as
/// columns.
fn print_incidence_matrix(net: &Net) {
    let c = net.c_matrix();
    let header = net
        .transitions()
        .iter()
        .map(|t| format!("{:>5}", t.key))
        .join("");
    println!("{:>5}{}", "", header);
    for (place, _) in net.places().iter_enumerated() {
        let row = net
            .transitions()
            .iter_enumerated()
            .map(|(transition, _)| format!("{:>5}", c.get(place, transition)))
            .join("");
        let key = &net.places()[place].key;
        println!("{key:>5}{row}");
    }
}
