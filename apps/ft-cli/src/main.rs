use clap::{Args, Parser, Subcommand, ValueEnum};
use ft_app::report;
use ft_app::{AppError, AppResult};
use ft_components::{FlowState, Process, ThermoRegime};
use ft_fluids::Gas;
use ft_solver::{ModelChoice, SolverConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flowtime")]
#[command(
    about = "flowtime - blowdown and filling times of a gas vessel through an orifice or capillary",
    long_about = None
)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Yaml,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProcessArg {
    Blowdown,
    Filling,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RegimeArg {
    Isothermal,
    Adiabatic,
}

/// SI state, either from a scenario file or from individual flags.
#[derive(Args)]
struct StateArgs {
    /// Scenario file (YAML or JSON) supplying the state; state flags are ignored
    #[arg(long)]
    scenario: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ProcessArg::Blowdown)]
    process: ProcessArg,

    /// Vessel volume [m³]
    #[arg(long)]
    volume: Option<f64>,

    /// Initial absolute pressure [Pa]
    #[arg(long)]
    p_initial: Option<f64>,

    /// Final pressure for blowdown [Pa]
    #[arg(long)]
    p_final: Option<f64>,

    /// Back pressure for blowdown [Pa], defaults to the final pressure
    #[arg(long)]
    p_back: Option<f64>,

    /// Supply pressure for filling [Pa]
    #[arg(long)]
    p_supply: Option<f64>,

    /// Target pressure for filling [Pa]
    #[arg(long)]
    p_target: Option<f64>,

    /// Gas temperature [K]
    #[arg(long, default_value_t = 293.15)]
    temperature: f64,

    /// Restriction length [m]
    #[arg(long)]
    length: Option<f64>,

    /// Preset gas key (air, N2, O2, He, Ar, H2, CO2, CH4)
    #[arg(long, default_value = "air")]
    gas: Gas,

    /// Discharge coefficient
    #[arg(long, default_value_t = 0.62)]
    cd: f64,

    /// Relative stop tolerance on the asymptotic pressure
    #[arg(long, default_value_t = 0.01)]
    epsilon: f64,

    #[arg(long, value_enum, default_value_t = RegimeArg::Isothermal)]
    regime: RegimeArg,

    /// auto, orifice or capillary (defaults to the scenario's model, else auto)
    #[arg(long)]
    model: Option<ModelChoice>,
}

#[derive(Subcommand)]
enum Commands {
    /// Time to blow down or fill through a restriction of the given diameter
    Forward {
        #[command(flatten)]
        state: StateArgs,
        /// Restriction diameter [m]
        #[arg(long)]
        diameter: f64,
    },
    /// Restriction diameter that gives the target time
    Solve {
        #[command(flatten)]
        state: StateArgs,
        /// Target time [s]
        #[arg(long)]
        target_time: f64,
        /// Retries with a widened bracket after a retryable failure
        #[arg(long)]
        max_retries: Option<u32>,
        /// Print the solver diagnostic on success too
        #[arg(long)]
        diagnostics: bool,
    },
    /// Model selection verdict and rationale
    Select {
        #[command(flatten)]
        state: StateArgs,
        /// Candidate diameter [m]
        #[arg(long)]
        diameter: Option<f64>,
    },
    /// Forward times over a log-spaced diameter range
    Sweep {
        #[command(flatten)]
        state: StateArgs,
        /// Smallest diameter [m]
        #[arg(long)]
        d_min: f64,
        /// Largest diameter [m]
        #[arg(long)]
        d_max: f64,
        #[arg(long, default_value_t = 25)]
        points: usize,
    },
    /// Run every analysis in a scenario file
    Run {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Print solver diagnostics on success too
        #[arg(long)]
        diagnostics: bool,
    },
    /// Validate scenario file syntax and values
    Validate {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
}

/// State plus the solver settings that go with it.
struct Resolved {
    state: FlowState,
    model: ModelChoice,
    config: SolverConfig,
    max_retries: u32,
}

impl StateArgs {
    fn resolve(&self) -> AppResult<Resolved> {
        if let Some(path) = &self.scenario {
            let scenario = ft_app::load_scenario(path)?;
            return Ok(Resolved {
                state: ft_app::scenario_state(&scenario)?,
                model: self
                    .model
                    .unwrap_or_else(|| ft_app::scenario_model(&scenario)),
                config: ft_app::scenario_solver_config(&scenario),
                max_retries: ft_app::scenario_max_retries(&scenario),
            });
        }

        let process = match self.process {
            ProcessArg::Blowdown => Process::Blowdown {
                p_final_pa: required(self.p_final, "--p-final")?,
                p_back_pa: self.p_back,
            },
            ProcessArg::Filling => Process::Filling {
                p_supply_pa: required(self.p_supply, "--p-supply")?,
                p_target_pa: required(self.p_target, "--p-target")?,
            },
        };
        let state = FlowState {
            volume_m3: required(self.volume, "--volume")?,
            p_initial_pa: required(self.p_initial, "--p-initial")?,
            process,
            temperature_k: self.temperature,
            length_m: required(self.length, "--length")?,
            gas: self.gas.properties(),
            cd: self.cd,
            epsilon: self.epsilon,
            regime: match self.regime {
                RegimeArg::Isothermal => ThermoRegime::Isothermal,
                RegimeArg::Adiabatic => ThermoRegime::Adiabatic,
            },
        };
        state.validate()?;
        Ok(Resolved {
            state,
            model: self.model.unwrap_or_default(),
            config: SolverConfig::default(),
            max_retries: 0,
        })
    }
}

fn required(value: Option<f64>, flag: &str) -> AppResult<f64> {
    value.ok_or_else(|| AppError::InvalidInput(format!("{flag} is required without --scenario")))
}

fn emit<T: Serialize>(format: Format, value: &T, text: impl FnOnce() -> String) -> AppResult<()> {
    match format {
        Format::Text => print!("{}", text()),
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Forward { state, diameter } => cmd_forward(cli.format, &state, diameter),
        Commands::Solve {
            state,
            target_time,
            max_retries,
            diagnostics,
        } => cmd_solve(cli.format, &state, target_time, max_retries, diagnostics),
        Commands::Select { state, diameter } => cmd_select(cli.format, &state, diameter),
        Commands::Sweep {
            state,
            d_min,
            d_max,
            points,
        } => cmd_sweep(cli.format, &state, d_min, d_max, points),
        Commands::Run {
            scenario_path,
            diagnostics,
        } => cmd_run(cli.format, &scenario_path, diagnostics),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
    }
}

fn cmd_forward(format: Format, args: &StateArgs, diameter: f64) -> AppResult<()> {
    let r = args.resolve()?;
    let eval = ft_app::forward(&r.state, diameter, r.model, &r.config)?;
    emit(format, &eval, || report::render_forward(&eval))
}

fn cmd_solve(
    format: Format,
    args: &StateArgs,
    target_time: f64,
    max_retries: Option<u32>,
    diagnostics: bool,
) -> AppResult<()> {
    let r = args.resolve()?;
    let retries = max_retries.unwrap_or(r.max_retries);
    match ft_app::solve(&r.state, target_time, r.model, &r.config, retries) {
        Ok(result) => emit(format, &result, || report::render_solve(&result, diagnostics)),
        Err(err) => {
            // Failure diagnostics are always shown
            if let Some(diag) = err.diagnostic() {
                match format {
                    Format::Text => eprint!("{}", report::render_diagnostic(diag)),
                    Format::Json => eprintln!("{}", serde_json::to_string_pretty(diag)?),
                    Format::Yaml => eprint!("{}", serde_yaml::to_string(diag)?),
                }
            }
            Err(err)
        }
    }
}

fn cmd_select(format: Format, args: &StateArgs, diameter: Option<f64>) -> AppResult<()> {
    let r = args.resolve()?;
    let selection = ft_app::select(&r.state, diameter, r.model)?;
    emit(format, &selection, || report::render_selection(&selection))
}

fn cmd_sweep(
    format: Format,
    args: &StateArgs,
    d_min: f64,
    d_max: f64,
    points: usize,
) -> AppResult<()> {
    let r = args.resolve()?;
    let rows = ft_app::sweep(&r.state, d_min, d_max, points, r.model, &r.config)?;
    emit(format, &rows, || report::render_sweep(&rows))
}

fn cmd_run(format: Format, scenario_path: &Path, diagnostics: bool) -> AppResult<()> {
    let scenario = ft_app::load_scenario(scenario_path)?;
    let result = ft_app::run_scenario(&scenario)?;
    emit(format, &result, || report::render_scenario(&result, diagnostics))?;

    let failures = result.failures();
    if failures > 0 {
        return Err(AppError::Project(format!(
            "{failures} of {} analyses failed",
            result.analyses.len()
        )));
    }
    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = ft_app::load_scenario(scenario_path)?;
    ft_app::scenario_state(&scenario)?;
    println!(
        "✓ Scenario '{}' is valid ({} analyses)",
        scenario.name,
        scenario.analyses.len()
    );
    Ok(())
}
