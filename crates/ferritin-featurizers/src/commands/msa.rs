use anyhow::Context;
use ferritin_io::read_a3m;
use ferritin_msa::{Alignment, FeaturizerConfig, MsaFeatures, ReferenceTables};

pub struct MsaArgs {
    pub input: String,
    pub output: String,
    pub config: Option<String>,
    pub tables: Option<String>,
    pub no_filter: bool,
    pub no_gaps: bool,
}

fn load_config(args: &MsaArgs) -> anyhow::Result<FeaturizerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            FeaturizerConfig::from_json(&json).with_context(|| format!("parsing {path}"))?
        }
        None => FeaturizerConfig::default(),
    };
    if args.no_filter {
        config.filter = false;
    }
    if args.no_gaps {
        config.include_gaps = false;
    }
    Ok(config)
}

fn load_tables(path: Option<&str>) -> anyhow::Result<ReferenceTables> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            ReferenceTables::from_json(&json).with_context(|| format!("parsing {path}"))
        }
        None => Ok(ReferenceTables::default()),
    }
}

pub fn execute(args: MsaArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let tables = load_tables(args.tables.as_deref())?;

    let records = read_a3m(&args.input)?;
    let alignment = Alignment::from_records(records)?;
    let features = alignment
        .featurize(&tables, &config)
        .with_context(|| format!("featurizing {}", args.input))?;
    features
        .save_to_safetensors(&args.output)
        .with_context(|| format!("writing {}", args.output))?;

    log::info!(
        "wrote {} columns x {} rows (effective depth {:.2}) to {}",
        features.length(),
        features.depth(),
        features.effective_depth(),
        args.output
    );
    Ok(())
}
