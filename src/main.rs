//! # SVG Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing` (su stderr)
//! - Caricamento della config e applicazione degli override da CLI
//! - Ricerca di svgo e avvio del batch optimizer
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (input, preset, switch, output, workers, etc.)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose, `RUST_LOG` vince)
//! 3. Carica `~/.svg-optimizer/config.json` (o `--config`) e applica gli override
//! 4. Senza input: legge stdin e scrive il risultato su stdout
//! 5. Con input: espande le directory e ottimizza tutti gli SVG trovati
//!
//! ## Esempio di utilizzo:
//! ```bash
//! svg-optimizer icons/ --preset aggressive --remove-dimensions --output dist/
//! cat logo.svg | svg-optimizer --disable convert-colors > logo.min.svg
//! ```

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use svg_optimizer::{
    file_manager::FileManager, BatchOptimizer, Config, OptimizeError, Preset, SvgoEngine, Switch,
};

#[derive(Parser)]
#[command(name = "svg-optimizer")]
#[command(about = "Optimize SVG files with presets, custom switches and safe fallbacks")]
struct Args {
    /// SVG files or directories (reads stdin and writes stdout when omitted)
    inputs: Vec<PathBuf>,

    /// Optimization preset (basic, aggressive, custom)
    #[arg(short, long)]
    preset: Option<Preset>,

    /// Enable a switch, e.g. remove-title (switches to the custom preset)
    #[arg(long, value_name = "SWITCH")]
    enable: Vec<Switch>,

    /// Disable a switch, e.g. convert-colors (switches to the custom preset)
    #[arg(long, value_name = "SWITCH")]
    disable: Vec<Switch>,

    /// Remove width/height attributes (independent of the preset)
    #[arg(long)]
    remove_dimensions: bool,

    /// Output directory for optimized files (default: next to each source)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (default: ~/.svg-optimizer/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save the effective configuration back to the config file
    #[arg(long)]
    save_config: bool,

    /// Path to the svgo binary
    #[arg(long)]
    svgo: Option<PathBuf>,

    /// Number of files optimized in parallel
    #[arg(short, long)]
    workers: Option<usize>,

    /// Timeout for a single svgo call, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Skip the pacing delay before each run
    #[arg(long)]
    no_delay: bool,

    /// Dry run - don't write any file
    #[arg(long)]
    dry_run: bool,

    /// Output progress and results as JSON lines
    #[arg(long)]
    json: bool,

    /// List presets and switches, then exit
    #[arg(long)]
    list: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for documents and JSON
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if args.list {
        print_catalogue();
        return Ok(());
    }

    let config_path = args.config.clone().or_else(Config::default_path);
    let mut config = match config_path {
        Some(ref path) => Config::from_file(path).await?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &args);

    // Validate and create output directory if specified
    if let Some(ref output_dir) = config.output_path {
        if !output_dir.exists() && !config.dry_run {
            std::fs::create_dir_all(output_dir)?;
            info!("Created output directory: {}", output_dir.display());
        }
    }
    config.validate()?;

    if args.save_config {
        match config_path {
            Some(ref path) => {
                config.save_to_file(path).await?;
                info!("Saved configuration to {}", path.display());
            }
            None => warn!("No home directory found, configuration not saved"),
        }
    }

    let engine = SvgoEngine::discover(config.svgo_path.clone())?;
    match engine.version().await {
        Ok(version) => debug!("Using svgo {} at {}", version, engine.binary().display()),
        Err(e) => warn!("svgo at {} did not report a version: {}", engine.binary().display(), e),
    }

    let optimizer = BatchOptimizer::new(Arc::new(engine), config)?;

    if args.inputs.is_empty() {
        let content = FileManager::read_stdin().await?;
        let result = match optimizer.optimize_document(content).await {
            Ok(result) => result,
            Err(OptimizeError::Validation(reason)) => {
                return Err(anyhow::anyhow!("stdin is not a valid SVG: {}", reason));
            }
            Err(e) => return Err(e.into()),
        };

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(result.accepted_output.as_bytes())?;
        stdout.flush()?;
        info!("{} tier: {}", result.tier_used, result.stats.format_summary());
        return Ok(());
    }

    let files = FileManager::collect_inputs(&args.inputs)?;
    optimizer.run(files).await?;

    Ok(())
}

/// CLI flags win over the config file
fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(preset) = args.preset {
        config.options = config.options.apply_preset(preset);
    }
    for switch in &args.enable {
        config.options = config.options.toggle_switch(*switch, true);
    }
    for switch in &args.disable {
        config.options = config.options.toggle_switch(*switch, false);
    }
    if args.remove_dimensions {
        config.options = config.options.toggle_switch(Switch::RemoveDimensions, true);
    }

    if args.svgo.is_some() {
        config.svgo_path = args.svgo.clone();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(timeout) = args.timeout {
        config.engine_timeout_secs = timeout;
    }
    if args.no_delay {
        config.pacing_delay_ms = 0;
    }
    if args.output.is_some() {
        config.output_path = args.output.clone();
    }
    config.dry_run |= args.dry_run;
    config.json_output |= args.json;
}

fn print_catalogue() {
    println!("Presets:");
    for preset in Preset::ALL {
        println!("  {:<12} {}", preset.name(), preset.description());
    }

    println!("\nSwitches:");
    for switch in Switch::ALL {
        let basic = match Preset::Basic.value_for(switch) {
            Some(true) => "on",
            Some(false) => "off",
            None => "independent",
        };
        println!("  {:<28} {:<34} basic: {}", switch.name(), switch.label(), basic);
    }
}
