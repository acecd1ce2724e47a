//! Rebuilds history, meta, and asset snapshots from a JSON match dump and
//! publishes them into a fresh inference engine in one atomic pass
//! (spec.md §4.11), then reports what changed.
use clap::Parser;
use draftlab::champions::AttributeMap;
use draftlab::champions::ChampIndex;
use draftlab::core::Config;
use draftlab::core::Patch;
use draftlab::core::TierGroup;
use draftlab::infer::InferenceEngine;
use draftlab::records::MatchRecord;
use draftlab::refresh::ContextRefresher;
use draftlab::refresh::RefreshTarget;
use draftlab::registry::ModelRegistry;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON array of match records
    #[arg(long, required = true)]
    matches: PathBuf,
    /// Path to the champion attribute map document
    #[arg(long, required = true)]
    attributes: PathBuf,
    /// Directory of trained artifact files
    #[arg(long, required = true)]
    registry: PathBuf,
    /// Patch to rebuild asset bundles for, e.g. "15.20"
    #[arg(long, required = true)]
    patch: String,
    /// Root directory asset bundles are written under
    #[arg(long, required = true)]
    assets_out: PathBuf,
    /// Path the rebuilt history index document is written to
    #[arg(long, required = true)]
    history_out: PathBuf,
    /// Path the rebuilt meta snapshot document is written to
    #[arg(long, required = true)]
    meta_out: PathBuf,
    /// Champion embedding width
    #[arg(long, default_value_t = 32)]
    embedding_dim: usize,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_env();

    let matches: Vec<MatchRecord> = serde_json::from_slice(&std::fs::read(&cli.matches)?)?;
    let attributes = Arc::new(AttributeMap::load(&cli.attributes)?);
    let champ_index = Arc::new(ChampIndex::from_ordered_ids(attributes.champion_ids().collect())?);
    let patch = Patch::parse(&cli.patch)?;

    let registry = Arc::new(ModelRegistry::new(&cli.registry));
    registry.reload(&config)?;
    let engine = Arc::new(InferenceEngine::new(registry, attributes, config.clone()));

    let refresher = ContextRefresher::new(
        engine,
        champ_index,
        &cli.assets_out,
        &cli.history_out,
        &cli.meta_out,
        cli.embedding_dim,
    );

    let targets: Vec<RefreshTarget> =
        TierGroup::ALL.into_iter().map(|tier_group| RefreshTarget { tier_group, patch }).collect();

    let report = refresher.refresh(&matches, &targets, &config)?;
    println!(
        "considered {} matches, rebuilt {} history tier groups, {} asset bundles, {} meta patches",
        report.matches_considered,
        report.history_tier_groups_rebuilt,
        report.asset_bundles_rebuilt,
        report.meta_patches_rebuilt,
    );
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
