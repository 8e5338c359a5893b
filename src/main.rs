extern crate solar_heat_pump;

use anyhow::bail;
use clap::{Args, Parser};
use solar_heat_pump::output::FileOutput;
use solar_heat_pump::scenarios::Scenario;
use solar_heat_pump::trajectory::{StopConditions, TrajectorySummary};
use solar_heat_pump::{run_project, run_scenarios};
use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct SimulationArgs {
    #[command(flatten)]
    source: ProjectSource,
    #[arg(long, help = "Maximum number of pump cycles to run")]
    max_cycles: Option<usize>,
    #[arg(long, help = "Stop once the storage reaches this temperature, in K")]
    max_temperature: Option<f64>,
    #[arg(
        long,
        short,
        help = "Directory to write results to; defaults to alongside the input file"
    )]
    output_dir: Option<PathBuf>,
    #[clap(long, default_value_t = false, help = "Whether to log out spans")]
    log_spans: bool,
    #[arg(long, short, action = clap::ArgAction::Count, help = "Increase logging verbosity")]
    verbose: u8,
}

#[derive(Args, Clone, Debug)]
#[group(required = true, multiple = false)]
struct ProjectSource {
    #[arg(help = "Path to project input in .json format")]
    input_file: Option<String>,
    #[arg(
        long,
        short,
        num_args = 1..,
        help = "Run one or more reference scenarios (smooth, rough, bad)"
    )]
    scenario: Option<Vec<Scenario>>,
}

impl SimulationArgs {
    fn stop_conditions(&self) -> Option<StopConditions> {
        if self.max_cycles.is_none() && self.max_temperature.is_none() {
            return None;
        }
        let defaults = StopConditions::default();
        Some(StopConditions {
            max_temperature: self.max_temperature.unwrap_or(defaults.max_temperature),
            max_cycles: self.max_cycles.unwrap_or(defaults.max_cycles),
        })
    }

    fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = SimulationArgs::parse();

    // set up basic tracing
    let tracing_subscriber = {
        let mut builder = tracing_subscriber::fmt::fmt().with_max_level(args.log_level());

        if args.log_spans {
            builder = builder.with_span_events(FmtSpan::CLOSE);
        }

        builder.finish()
    };
    tracing::subscriber::set_global_default(tracing_subscriber)?;

    let stop_conditions = args.stop_conditions();

    match (&args.source.input_file, &args.source.scenario) {
        (Some(input_file), _) => {
            let input_file_ext = Path::new(input_file).extension().and_then(OsStr::to_str);
            let input_file_stem = match input_file_ext {
                Some(ext) => &input_file[..(input_file.len() - ext.len() - 1)],
                None => input_file.as_str(),
            };
            let input_file_stem = PathBuf::from(input_file_stem);
            let input_file_name = input_file_stem
                .file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("project")
                .to_string();
            let output_path = args.output_dir.clone().unwrap_or_else(|| {
                PathBuf::from(format!("{}__results", input_file_stem.display()))
            });
            fs::create_dir_all(&output_path)?;

            let file_output = FileOutput::new(
                output_path,
                format!("{input_file_name}__{{}}.{{}}"),
            );

            let summary = run_project(
                BufReader::new(File::open(Path::new(input_file))?),
                &file_output,
                stop_conditions,
            )?;
            report(input_file_name.as_str(), &summary)?;
        }
        (None, Some(scenarios)) => {
            let output_path = args
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("scenario_results"));
            fs::create_dir_all(&output_path)?;

            let file_output = FileOutput::new(output_path, "{}.{}".to_string());

            let summaries = run_scenarios(
                scenarios,
                &file_output,
                stop_conditions.unwrap_or_default(),
            )?;
            for (name, summary) in &summaries {
                report(name, summary)?;
            }
        }
        (None, None) => bail!("Either an input file or a scenario is required"),
    }

    Ok(())
}

fn report(name: &str, summary: &TrajectorySummary) -> anyhow::Result<()> {
    info!(
        run = name,
        cycles_run = summary.cycles_run,
        net_energy_kj = summary.last.net_energy_kj,
        temperature = summary.last.storage_temperature,
        phase = %summary.last.phase,
        "run complete"
    );
    debug!("summary: {}", serde_json::to_string_pretty(summary)?);

    Ok(())
}
