use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use presetmap::{
    apply_mapping, CachePolicy, ManifestHost, MapperConfig, MappingStatus, PresetMapper,
    RangeTable,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Ranges(args) => execute_ranges(args),
        Commands::Build(args) => execute_build(args),
        Commands::Apply(args) => execute_apply(args),
    }
}

#[derive(Parser)]
#[command(
    name = "presetmap",
    author,
    version,
    about = "Map Helm presets onto hosted plugin parameters"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parameter ranges extracted from a parameter-info dump.
    Ranges(RangesArgs),
    /// Build mapping documents for one or more presets.
    Build(BuildArgs),
    /// Replay a mapping document on a plugin manifest.
    Apply(ApplyArgs),
}

#[derive(Args)]
struct RangesArgs {
    /// Parameter-info dump to read.
    #[arg(long, value_name = "FILE")]
    parameter_info: PathBuf,
}

#[derive(Args)]
struct BuildArgs {
    /// Plugin manifest listing the parameter names and indices.
    #[arg(long, value_name = "MANIFEST")]
    plugin: PathBuf,
    /// JSON configuration file; defaults to the user config when present.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory receiving the mapping documents.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Parameter-info dump holding the parameter ranges.
    #[arg(long, value_name = "FILE")]
    parameter_info: Option<PathBuf>,
    /// Leading component of the mapping document names.
    #[arg(long)]
    prefix: Option<String>,
    /// When an existing mapping document is reused.
    #[arg(long, value_enum)]
    cache: Option<CacheArg>,
    /// Preset files to map.
    #[arg(required = true, value_name = "PRESET")]
    presets: Vec<PathBuf>,
}

#[derive(Args)]
struct ApplyArgs {
    /// Plugin manifest receiving the parameter values.
    #[arg(long, value_name = "MANIFEST")]
    plugin: PathBuf,
    /// Mapping document to replay.
    #[arg(long, value_name = "FILE")]
    mapping: PathBuf,
    /// Write the updated values back into the manifest.
    #[arg(long)]
    save: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CacheArg {
    Existence,
    Fingerprint,
}

impl From<CacheArg> for CachePolicy {
    fn from(cache: CacheArg) -> Self {
        match cache {
            CacheArg::Existence => CachePolicy::Existence,
            CacheArg::Fingerprint => CachePolicy::Fingerprint,
        }
    }
}

fn execute_ranges(args: RangesArgs) -> Result<()> {
    let table = RangeTable::load(&args.parameter_info).with_context(|| {
        format!(
            "failed to extract ranges from {}",
            args.parameter_info.display()
        )
    })?;
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

fn load_config(args: &BuildArgs) -> Result<MapperConfig> {
    let mut config = match &args.config {
        Some(path) => MapperConfig::open(path)
            .with_context(|| format!("{} is not a valid config file", path.display()))?,
        None => match MapperConfig::default_config_path().filter(|path| path.exists()) {
            Some(path) => MapperConfig::open(&path)
                .with_context(|| format!("{} is not a valid config file", path.display()))?,
            None => MapperConfig::default(),
        },
    };
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(info) = &args.parameter_info {
        config.parameter_info = info.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(cache) = args.cache {
        config.cache = cache.into();
    }
    Ok(config)
}

fn execute_build(args: BuildArgs) -> Result<()> {
    let config = load_config(&args)?;
    let host = ManifestHost::open(&args.plugin)
        .with_context(|| format!("failed to open plugin manifest {}", args.plugin.display()))?;
    let mapper = PresetMapper::new(config);

    for preset in &args.presets {
        let outcome = mapper
            .build(&host, preset)
            .with_context(|| format!("failed to map preset {}", preset.display()))?;
        match &outcome.status {
            MappingStatus::Cached => println!("cached {}", outcome.path.display()),
            MappingStatus::Built {
                entries,
                diagnostics,
            } => {
                println!("built {} ({entries} parameters)", outcome.path.display());
                for diagnostic in diagnostics {
                    eprintln!("  {diagnostic}");
                }
            }
        }
    }
    Ok(())
}

fn execute_apply(args: ApplyArgs) -> Result<()> {
    let mut host = ManifestHost::open(&args.plugin)
        .with_context(|| format!("failed to open plugin manifest {}", args.plugin.display()))?;
    let applied = apply_mapping(&mut host, &args.mapping)
        .with_context(|| format!("failed to apply {}", args.mapping.display()))?;

    for param in host.parameters() {
        println!("{} {} {}", param.index, param.name, param.value);
    }
    tracing::info!("applied {applied} parameters to {}", host.id());

    if args.save {
        host.save(&args.plugin)
            .with_context(|| format!("failed to save {}", args.plugin.display()))?;
    }
    Ok(())
}
