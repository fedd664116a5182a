use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use overlap_core::{
    config::{Command, ConfigSystem},
    orthogonalize_tagged, report, BasisSet,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The input file, either in the line based input format or as json (`.json`)
    input: PathBuf,

    /// Prefix of the output files. Defaults to the input path without its extension
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Log progress and warnings, unless RUST_LOG is set
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args: Args = Args::parse();

    if args.verbose && std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let config = load(&args.input)?;
    let prefix = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension(""));

    let mut basis_set = BasisSet::try_from(&config)
        .with_context(|| format!("invalid system in {}", args.input.display()))?;

    let start = Instant::now();
    basis_set.compute_overlap();
    log::info!(
        "computed overlap of {} basis functions in {:0.2?}, sparsity {:.2}%",
        basis_set.len(),
        start.elapsed(),
        basis_set.sparsity()
    );

    let mut output = create(&prefix, "out")?;
    report::write_system(&mut output, &basis_set, true)?;

    let mut orthog_output = if config
        .commands
        .iter()
        .any(|command| matches!(command, Command::Orthogonalize { .. }))
    {
        Some(create(&prefix, "orthog")?)
    } else {
        None
    };

    for command in &config.commands {
        match command {
            Command::PrintIntegrals => {
                log::info!("writing overlap integrals");
                let mut out = create(&prefix, "ints")?;
                report::write_integrals(&mut out, &basis_set)?;
                out.flush()?;
            }
            Command::SparseGraph { fineness } => {
                log::info!("writing sparse graph with fineness {fineness}");
                let densities = report::sparse_graph(&basis_set, *fineness)?;
                let mut out = create(&prefix, "sparse")?;
                report::write_sparse_graph(&mut out, &densities)?;
                out.flush()?;
            }
            Command::Orthogonalize { method, n } => {
                log::info!("orthogonalising the first {n} functions ({method})");
                let result = match orthogonalize_tagged(&basis_set, *n, method) {
                    Ok(result) => result,
                    Err(error) => {
                        log::error!("orthogonalisation failed: {error}");
                        writeln!(output, "\nErroneous command given: {error}")?;
                        output.flush()?;
                        return Err(error).context("orthogonalisation failed");
                    }
                };

                if let Some(out) = orthog_output.as_mut() {
                    report::write_orthogonalization(out, &basis_set, &result)?;
                    writeln!(out)?;
                }
            }
        }
    }

    if let Some(mut out) = orthog_output {
        out.flush()?;
    }

    writeln!(output, "\nProgram finished.")?;
    output.flush()?;

    Ok(())
}

fn load(path: &Path) -> Result<ConfigSystem> {
    let input =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let config: ConfigSystem = if path.extension().is_some_and(|extension| extension == "json") {
        serde_json::from_str(&input)?
    } else {
        input.parse()?
    };

    Ok(config)
}

fn create(prefix: &Path, extension: &str) -> Result<BufWriter<File>> {
    let mut path = prefix.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    let path = PathBuf::from(path);

    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
