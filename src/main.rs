use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use stitch::config::DEFAULT_CONFIG_FILE;
use stitch::{BundleError, BundlePlan, FileOrder, StitchConfig, plan_bundle, run};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFileOrder {
    Sorted,
    Listing,
}

impl From<CliFileOrder> for FileOrder {
    fn from(o: CliFileOrder) -> Self {
        match o {
            CliFileOrder::Sorted => FileOrder::Sorted,
            CliFileOrder::Listing => FileOrder::Listing,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Concatenate source files into a single bundle", long_about = None)]
struct Args {
    /// Config file (defaults to ./stitch.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lines stripped from the top of every non-core file
    #[arg(long)]
    header_len: Option<usize>,

    /// File copied first and in full
    #[arg(long)]
    core_file: Option<String>,

    /// Name of the generated bundle
    #[arg(long)]
    output_file: Option<String>,

    /// Directory to scan
    #[arg(long, alias = "folder-to-check")]
    source_dir: Option<PathBuf>,

    /// Directory the bundle is written to (must exist)
    #[arg(long, alias = "folder-to-output")]
    output_dir: Option<PathBuf>,

    /// Suffix a file needs to be bundled
    #[arg(long)]
    extension: Option<String>,

    /// Order of the files following the core file
    #[arg(long, value_enum)]
    order: Option<CliFileOrder>,

    /// Print the files that would be bundled, in order, and exit
    #[arg(long)]
    list: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<StitchConfig> {
    // An explicitly named config file has to exist
    let loaded = match &args.config {
        Some(path) => Some(
            StitchConfig::load_from_file(path)?
                .with_context(|| format!("Config file not found: {:?}", path))?,
        ),
        None => StitchConfig::load_from_file(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let mut config = loaded.unwrap_or_default();

    if let Some(n) = args.header_len {
        config.header_len = n;
    }
    if let Some(ref c) = args.core_file {
        config.core_file = c.clone();
    }
    if let Some(ref o) = args.output_file {
        config.output_file = o.clone();
    }
    if let Some(ref d) = args.source_dir {
        config.source_dir = d.clone();
    }
    if let Some(ref d) = args.output_dir {
        config.output_dir = d.clone();
    }
    if let Some(ref e) = args.extension {
        config.extension = e.clone();
    }
    if let Some(o) = args.order {
        config.order = o.into();
    }
    config.verbose = args.verbose;

    Ok(config)
}

/// One path per line: the core file, then the candidates in bundle order.
fn write_plan(plan: &BundlePlan, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", plan.core.display())?;
    for path in &plan.candidates {
        writeln!(out, "{}", path.display())?;
    }
    Ok(())
}

fn failure_context(err: &BundleError, config: &StitchConfig) -> String {
    if err.is_not_found() {
        format!("Nothing to bundle: set --core-file to a file inside {:?}", config.source_dir)
    } else {
        "Bundling failed".to_string()
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;

    if args.list {
        let plan = plan_bundle(&config).map_err(|e| {
            let context = failure_context(&e, &config);
            anyhow::Error::new(e).context(context)
        })?;
        write_plan(&plan, &mut io::stdout().lock())?;
        return Ok(());
    }

    let report = run(&config).map_err(|e| {
        let context = failure_context(&e, &config);
        anyhow::Error::new(e).context(context)
    })?;
    if config.verbose {
        for c in &report.contributions {
            println!(
                "  {} (+{} lines, {} header lines skipped)",
                c.path.display(),
                c.lines_kept,
                c.lines_skipped
            );
        }
    }
    println!(
        "Bundled {} files into {} ({} bytes)",
        report.file_count(),
        report.output.display(),
        report.total_bytes
    );

    Ok(())
}
