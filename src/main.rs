mod analysis;
mod data;
mod density;
mod error;
mod integrate;
mod report;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use analysis::{Analysis, run_file};
use data::loader::LoadOptions;
use data::model::RadiusWindow;
use density::{NumberDensity, Solvent};
use integrate::{EvenPolicy, Method};
use report::{Format, write_report};

/// Coordination number from a tabulated radial distribution function.
///
/// Integrates g(r)·4πr² over [r_min, r_max] and scales by the bulk number
/// density of the solvent.
#[derive(Parser, Debug)]
#[command(name = "rdf-coordination", version)]
struct Args {
    /// Data file (.xlsx, .xls, .ods, .csv, .json or .parquet)
    input: PathBuf,

    /// Worksheet name (default: first sheet)
    #[arg(short, long)]
    sheet: Option<String>,

    /// Lower integration bound (Å)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    r_min: f64,

    /// Upper integration bound (Å)
    #[arg(long, default_value_t = 3.1, allow_negative_numbers = true)]
    r_max: f64,

    /// Rows after the header to discard before numeric data (unit rows)
    #[arg(long, default_value_t = 1)]
    skip_rows: usize,

    /// Zero-based column holding r
    #[arg(long, default_value_t = 0)]
    r_column: usize,

    /// Zero-based column holding g(r)
    #[arg(long, default_value_t = 1)]
    g_column: usize,

    /// Solvent preset for the bulk number density
    #[arg(long, value_enum, default_value_t = Solvent::Methanol)]
    solvent: Solvent,

    /// Mass density in g/cm³ (overrides the preset; needs --molar-mass)
    #[arg(long, requires = "molar_mass")]
    density: Option<f64>,

    /// Molar mass in g/mol (overrides the preset; needs --density)
    #[arg(long, requires = "density")]
    molar_mass: Option<f64>,

    /// Quadrature rule
    #[arg(long, value_enum, default_value_t = Method::Simpson)]
    method: Method,

    /// Simpson handling of an even number of points
    #[arg(long, value_enum, default_value_t = EvenPolicy::Simpson)]
    even: EvenPolicy,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Omit the banner in text output
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn number_density(&self) -> Result<NumberDensity> {
        match (self.density, self.molar_mass) {
            (Some(d), Some(m)) => Ok(NumberDensity::new(d, m)?),
            _ => Ok(NumberDensity::of(self.solvent)),
        }
    }
}

fn main() -> ExitCode {
    // Without RUST_LOG, env_logger still prints error-level records.
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let load = LoadOptions {
        sheet: args.sheet.clone(),
        skip_rows: args.skip_rows,
        r_column: args.r_column,
        g_column: args.g_column,
    };
    let analysis = Analysis {
        window: RadiusWindow::new(args.r_min, args.r_max),
        density: args.number_density()?,
        method: args.method,
        even: args.even,
    };

    let report = run_file(args.input.clone(), &load, &analysis)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_report(&mut BufWriter::new(file), &report, args.format, !args.quiet)?;
            log::info!("Wrote report to {}", path.display());
        }
        None => {
            write_report(&mut io::stdout().lock(), &report, args.format, !args.quiet)?;
        }
    }
    Ok(())
}
