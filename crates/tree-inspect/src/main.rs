//! Print the hierarchy stored in a JSON records file
//!
//! Usage:
//!   tree-inspect records.json
//!   tree-inspect records.json ancestors 4
//!
//! Set `RUST_LOG=debug` to see loading details and
//! `TREE_STORE_CYCLE_POLICY=reject` to refuse cyclic input.

use anyhow::Result;
use std::env;
use tree_inspect::{load_store, options_from_env, run, Invocation};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = Invocation::parse(&args)?;
    let options = options_from_env()?;

    let store = load_store(&invocation.path, options)?;
    println!("{}", run(&store, &invocation.command));

    Ok(())
}
