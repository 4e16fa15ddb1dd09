use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, Level};

use variational::forms::FormKind;
use variational::io::{read_run_config, run_variation, write_summary, CsvPlotter, RunConfig};
use variational::variation::Plotter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YAML run file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trial form, overriding the run file
    #[arg(short, long, value_enum)]
    form: Option<FormKind>,

    /// Write the energy curve of a single-parameter run as CSV
    #[arg(short, long)]
    plot: Option<PathBuf>,

    /// Write the run summary as YAML
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: Args) -> variational::Result<()> {
    let mut config = match &args.config {
        Some(path) => read_run_config(path)?,
        None => RunConfig::default(),
    };
    if let Some(form) = args.form {
        config.form = form;
    }
    if args.plot.is_some() {
        config.plot = args.plot;
    }
    if args.output.is_some() {
        config.output = args.output;
    }

    let mut plotter = config.plot.clone().map(CsvPlotter::new);
    let summary = run_variation(&config, plotter.as_mut().map(|p| p as &mut dyn Plotter))?;

    println!("Variational Method Results");
    println!("----------------------------------------");
    println!("Trial form: {:?}", config.form);
    println!("Energy function: {}", summary.energy_function);
    for (name, value) in summary.parameters.iter().zip(summary.values.iter()) {
        println!("  {name} = {value:.6}");
    }
    if let Some(exact) = &summary.exact_value {
        println!("Exact optimum: {exact}");
    }
    if let Some(status) = &summary.status {
        println!("Converged: {} ({} iterations, {})", status.converged, status.iterations, status.message);
    }
    println!("Energy: {:.6} Ha = {:.6} eV", summary.energy, summary.energy_ev);

    if let Some(path) = &config.output {
        write_summary(&summary, path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
