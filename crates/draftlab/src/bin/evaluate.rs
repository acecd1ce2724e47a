//! Prints the promotion history for one or every tier group in a model
//! registry directory: every artifact found, in trained order, each
//! tagged with the gate verdict that decided whether it became (or
//! kept) the live pointer (spec.md §4.6, §4.7).
use clap::Parser;
use draftlab::core::Config;
use draftlab::core::TierGroup;
use draftlab::registry::ModelRegistry;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of trained artifact files
    #[arg(long, required = true)]
    registry: PathBuf,
    /// Restrict to one tier group: low, mid, high (default: all three)
    #[arg(long)]
    tier_group: Option<String>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_env();
    let registry = ModelRegistry::new(&cli.registry);
    registry.reload(&config)?;

    let groups: Vec<TierGroup> = match &cli.tier_group {
        Some(s) => vec![s.parse()?],
        None => TierGroup::ALL.to_vec(),
    };

    for tier_group in groups {
        let snapshot = registry.snapshot(tier_group)?;
        println!("== {tier_group} ({} artifacts) ==", snapshot.cards.len());
        for card in &snapshot.cards {
            let current = snapshot.current_artifact_id == Some(card.trained_at_unix);
            println!("{}{}", if current { "* " } else { "  " }, card);
        }
        if snapshot.cards.is_empty() {
            println!("  (no artifacts found)");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", draftlab::diagnostic(&e));
            ExitCode::FAILURE
        }
    }
}
