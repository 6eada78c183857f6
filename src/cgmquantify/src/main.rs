#[macro_use]
extern crate log;

use std::path::PathBuf;

use anyhow::anyhow;
use cgmquantify::{
    Metric,
    algos::{GlucoseSummary, GlycemicReport, MageCalculator, MetricParams},
    codec::DexcomImporter,
    types::Series,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dotenv::dotenv;

#[derive(Parser)]
#[command(version, about = "Glucose variability metrics for CGM exports")]
pub struct CgmQuantifyCli {
    /// Dexcom CSV export
    #[arg(env = "CGM_INPUT", long, short)]
    pub input: Option<PathBuf>,
    /// Standard-deviation multiplier for the range bounds
    #[arg(env = "CGM_SD", long, default_value_t = 1.0)]
    pub sd: f64,
    /// Minutes between readings
    #[arg(env = "CGM_SAMPLE_RATE", long, default_value_t = 5)]
    pub sample_rate: u32,
    /// Turning-point comparison offset for MAGE
    #[arg(env = "CGM_MAGE_WINDOW", long, default_value_t = 1)]
    pub mage_window: usize,
    /// Compute MAGE as earlier cgmquantify releases did
    #[arg(env = "CGM_MAGE_COMPAT", long)]
    pub mage_compat: bool,
    /// Leading export rows to drop before the first reading
    #[arg(env = "CGM_SKIP_ROWS", long, default_value_t = DexcomImporter::WARMUP_ROWS)]
    pub skip_rows: usize,
    #[clap(subcommand)]
    pub subcommand: CgmQuantifyCommand,
}

#[derive(Subcommand)]
pub enum CgmQuantifyCommand {
    ///
    /// Print mean, median, extremes and quartiles
    ///
    Summary,
    ///
    /// Compute a single metric, e.g. `mage`, `modd`, `tir`
    ///
    Metric {
        metric: Metric,
        #[arg(long)]
        json: bool,
    },
    ///
    /// Compute every metric, reporting failures per metric
    ///
    Report {
        #[arg(long)]
        json: bool,
    },
    ///
    /// Generate shell completions
    ///
    Completions { shell: Shell },
}

impl CgmQuantifyCli {
    fn params(&self) -> MetricParams {
        let mage = if self.mage_compat {
            MageCalculator::compatible(self.mage_window)
        } else {
            MageCalculator::new(self.mage_window)
        };

        MetricParams {
            sd: self.sd,
            sample_rate_minutes: self.sample_rate,
            mage,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let dotenv_result = dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = dotenv_result {
        debug!("no .env loaded: {}", error);
    }

    let cli = CgmQuantifyCli::parse();
    let params = cli.params();

    match &cli.subcommand {
        CgmQuantifyCommand::Completions { shell } => {
            let mut command = CgmQuantifyCli::command();
            let name = command.get_name().to_owned();
            clap_complete::generate(*shell, &mut command, name, &mut std::io::stdout());
            Ok(())
        }
        CgmQuantifyCommand::Summary => {
            let series = load_series(&cli)?;
            let summary = GlucoseSummary::calculate(&series)?;
            println!("{}", summary);
            Ok(())
        }
        CgmQuantifyCommand::Metric { metric, json } => {
            let series = load_series(&cli)?;
            let output = metric.evaluate(&series, &params)?;
            if *json {
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("{}: {}", metric, output);
            }
            Ok(())
        }
        CgmQuantifyCommand::Report { json } => {
            let series = load_series(&cli)?;
            let report = GlycemicReport::compute(&series, &params);
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
            Ok(())
        }
    }
}

fn load_series(cli: &CgmQuantifyCli) -> anyhow::Result<Series> {
    let input = cli
        .input
        .as_ref()
        .ok_or_else(|| anyhow!("No input file, pass --input or set CGM_INPUT"))?;

    let series = DexcomImporter::new()
        .with_skip_rows(cli.skip_rows)
        .import_path(input)?;
    info!("loaded {} readings from {}", series.len(), input.display());
    Ok(series)
}
