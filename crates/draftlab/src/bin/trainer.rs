//! Fits one tier group's classifier and calibrator from a JSON match
//! dump and an attribute map, then writes the resulting artifact into
//! a registry directory (spec.md §4.5, §6.4).
use clap::Parser;
use draftlab::champions::AttributeMap;
use draftlab::core::Config;
use draftlab::core::Patch;
use draftlab::core::TierGroup;
use draftlab::features::FeatureMode;
use draftlab::history::HistoryStore;
use draftlab::records::MatchRecord;
use draftlab::trainer::classifier::ModelType;
use draftlab::trainer::train;
use draftlab::trainer::TrainRequest;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON array of match records
    #[arg(long, required = true)]
    matches: PathBuf,
    /// Path to the champion attribute map document
    #[arg(long, required = true)]
    attributes: PathBuf,
    /// Tier group to train a model for: low, mid, high
    #[arg(long, required = true)]
    tier_group: String,
    /// Classifier family: tree_ensemble, linear, mlp
    #[arg(long, default_value = "linear")]
    model_type: String,
    /// Feature layout: basic, rich
    #[arg(long, default_value = "basic")]
    feature_mode: String,
    /// Patch this training run is attributed to, e.g. "15.20"
    #[arg(long, required = true)]
    source_patch: String,
    /// Optional precomputed history index document (rich mode)
    #[arg(long)]
    history: Option<PathBuf>,
    /// Directory the trained artifact is written into
    #[arg(long, required = true)]
    out: PathBuf,
    /// Split/fold seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_env();

    let matches: Vec<MatchRecord> = serde_json::from_slice(&std::fs::read(&cli.matches)?)?;
    let attributes = AttributeMap::load(&cli.attributes)?;
    let tier_group: TierGroup = cli.tier_group.parse()?;
    let model_type: ModelType = cli.model_type.parse()?;
    let feature_mode: FeatureMode = cli.feature_mode.parse()?;
    let source_patch = Patch::parse(&cli.source_patch)?;
    let history = cli.history.as_ref().map(|p| HistoryStore::load(p)).transpose()?;
    let history_index = history.as_ref().and_then(|store| store.get(tier_group));

    let trained_at_unix = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?.as_secs();

    let request = TrainRequest {
        tier_group,
        model_type,
        feature_mode,
        matches: &matches,
        attributes: &attributes,
        history: history_index,
        assets: None,
        source_patch,
        trained_at_unix,
        seed: cli.seed,
    };

    let artifact = train(&request, &config)?;
    let path = artifact.save(&cli.out)?;
    println!("{}", artifact.card);
    println!("wrote {}", path.display());
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
