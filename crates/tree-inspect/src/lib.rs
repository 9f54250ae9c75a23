//! Command-line inspection of record files
//!
//! Loads a JSON array of records into a [`TreeStore`] and prints the forest
//! or the result of one structural query.

pub mod render;

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tree_store::prelude::*;
use tree_store::loader;

/// Environment variable selecting the cycle policy
pub const CYCLE_POLICY_VAR: &str = "TREE_STORE_CYCLE_POLICY";

pub const USAGE: &str = "Usage: tree-inspect <records.json> [tree | children ID | descendants ID | ancestors ID | path ID]";

/// What to print once the store is loaded
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The full outline plus a summary
    Tree,
    /// Direct children of a record
    Children(RecordId),
    /// Every record below a record
    Descendants(RecordId),
    /// A record and its parent chain
    Ancestors(RecordId),
    /// Label path from the top down to a record
    Path(RecordId),
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub path: PathBuf,
    pub command: Command,
}

impl Invocation {
    /// Parse the arguments following the program name
    pub fn parse(args: &[String]) -> Result<Self> {
        let (path, rest) = match args.split_first() {
            Some((path, rest)) => (PathBuf::from(path), rest),
            None => bail!("missing records file\n{}", USAGE),
        };

        let command = match rest {
            [] => Command::Tree,
            [name] if name == "tree" => Command::Tree,
            [name, id] => {
                let id: RecordId = id.parse()?;
                match name.as_str() {
                    "children" => Command::Children(id),
                    "descendants" => Command::Descendants(id),
                    "ancestors" => Command::Ancestors(id),
                    "path" => Command::Path(id),
                    other => bail!("unknown command `{}`\n{}", other, USAGE),
                }
            }
            _ => bail!("unexpected arguments\n{}", USAGE),
        };

        Ok(Self { path, command })
    }
}

/// Build store options from the value of [`CYCLE_POLICY_VAR`], if set
pub fn parse_options(cycle_policy: Option<&str>) -> Result<StoreOptions> {
    let policy = match cycle_policy {
        Some(value) => value
            .parse::<CyclePolicy>()
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("invalid {}", CYCLE_POLICY_VAR))?,
        None => CyclePolicy::default(),
    };
    Ok(StoreOptions::new().cycle_policy(policy))
}

/// Read store options from the environment
pub fn options_from_env() -> Result<StoreOptions> {
    let value = std::env::var(CYCLE_POLICY_VAR).ok();
    parse_options(value.as_deref())
}

/// Load a JSON records file into a store
pub fn load_store(path: &Path, options: StoreOptions) -> Result<TreeStore> {
    info!("Loading records from {}", path.display());
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let records = loader::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse records in {}", path.display()))?;
    debug!("Parsed {} records", records.len());

    let options = options.initial_capacity(records.len());
    let store = TreeStore::with_options(records, options)
        .with_context(|| format!("Invalid record set in {}", path.display()))?;
    info!("Indexed {} records", store.len());
    Ok(store)
}

/// Produce the text output for a command
pub fn run(store: &TreeStore, command: &Command) -> String {
    match command {
        Command::Tree => format!(
            "{}\n\n{}",
            render::render_tree(store),
            render::render_summary(store)
        ),
        Command::Children(id) => render::render_list(&store.children(id)),
        Command::Descendants(id) => render::render_list(&store.descendants(id)),
        Command::Ancestors(id) => render::render_list(&store.ancestors(id)),
        Command::Path(id) => store.data_path(id).join(" / "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_default_command() {
        let invocation = Invocation::parse(&args(&["records.json"])).unwrap();
        assert_eq!(invocation.path, PathBuf::from("records.json"));
        assert_eq!(invocation.command, Command::Tree);
    }

    #[test]
    fn test_parse_queries() {
        let invocation = Invocation::parse(&args(&["r.json", "ancestors", "4"])).unwrap();
        assert_eq!(invocation.command, Command::Ancestors(RecordId::Int(4)));

        let invocation = Invocation::parse(&args(&["r.json", "children", "docs"])).unwrap();
        assert_eq!(invocation.command, Command::Children(RecordId::from("docs")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Invocation::parse(&[]).is_err());
        assert!(Invocation::parse(&args(&["r.json", "siblings", "1"])).is_err());
        assert!(Invocation::parse(&args(&["r.json", "children"])).is_err());
    }

    #[test]
    fn test_parse_options() {
        assert_eq!(parse_options(None).unwrap().cycle_policy, CyclePolicy::Allow);
        assert_eq!(
            parse_options(Some("reject")).unwrap().cycle_policy,
            CyclePolicy::Reject
        );
        let err = parse_options(Some("maybe")).unwrap_err();
        assert!(format!("{:#}", err).contains(CYCLE_POLICY_VAR));
    }
}
