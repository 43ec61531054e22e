use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Command, FromArgMatches as _};
use log::{info, warn};

use crate::error::EpigridError;
use crate::grid::Grid;
use crate::log::{set_log_level, set_module_filters, LevelFilter};
use crate::parameters::Parameters;
use crate::report::{DailyReport, DailyReportRow};
use crate::statistics::{StabilityTracker, Statistics};

/// Default cli arguments for the epigrid runner
#[derive(Args, Debug)]
pub struct BaseArgs {
    /// Random seed; overrides the seed in the config file
    #[arg(short, long)]
    pub random_seed: Option<u64>,

    /// Optional path for a parameters JSON file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path of the daily CSV report
    #[arg(short, long, default_value = "statistics.csv")]
    pub output: PathBuf,

    /// Log level: a level (e.g. `info`), `module=level` pairs, or a comma-separated mix
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Stop after at most this many days; overrides the config file
    #[arg(short, long)]
    pub max_days: Option<u64>,
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of days simulated.
    pub days: u64,
    pub initial_statistics: Statistics,
    pub final_statistics: Statistics,
    /// False if the run was cut short by the day limit.
    pub stable: bool,
}

fn create_epigrid_cli() -> Command {
    let cli = Command::new("epigrid").about("Simulates a contagion on a toroidal grid");
    BaseArgs::augment_args(cli)
}

/// Parses a log level spec such as `"info"`, `"epigrid::grid=trace"` or
/// `"warn,epigrid::runner=info"` into a global level and module filters.
///
/// # Errors
///
/// Returns [`EpigridError::InvalidParameter`] if a level name is not recognized.
pub fn parse_log_levels(
    spec: &str,
) -> Result<(Option<LevelFilter>, Vec<(String, LevelFilter)>), EpigridError> {
    let parse_level = |level: &str| {
        LevelFilter::from_str(level.trim())
            .map_err(|_| EpigridError::InvalidParameter(format!("unknown log level `{level}`")))
    };

    let mut global = None;
    let mut modules = Vec::new();
    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.split_once('=') {
            Some((module, level)) => {
                modules.push((module.trim().to_string(), parse_level(level)?));
            }
            None => global = Some(parse_level(entry)?),
        }
    }
    Ok((global, modules))
}

fn apply_log_levels(spec: &str) -> Result<(), EpigridError> {
    let (global, modules) = parse_log_levels(spec)?;
    set_log_level(global.unwrap_or(LevelFilter::Error));
    set_module_filters(&modules);
    for (module, level) in &modules {
        info!("Logging enabled for {module} at level {level}");
    }
    Ok(())
}

/// Runs one simulation until the statistics have been unchanged for
/// `parameters.stable_days` consecutive days, writing one report row per day.
///
/// # Errors
///
/// Returns an `EpigridError` if the grid cannot be built or populated, or the report cannot be
/// written.
pub fn simulate(
    parameters: &Parameters,
    report: &mut DailyReport,
) -> Result<RunSummary, EpigridError> {
    let mut grid = Grid::new(parameters.grid, parameters.random_seed)?;
    parameters.population.apply(&mut grid)?;

    let initial_statistics = grid.snapshot();
    info!(
        "Initial infections: {}, deaths: {}, removed: {}",
        initial_statistics.infections, initial_statistics.deaths, initial_statistics.removed
    );

    let mut previous = initial_statistics;
    let mut tracker = StabilityTracker::new(parameters.stable_days);
    while !tracker.is_stable() {
        if let Some(max_days) = parameters.max_days {
            if grid.day() >= max_days {
                warn!("Stopping after {max_days} days without reaching a stable state");
                break;
            }
        }

        grid.advance();
        let statistics = grid.snapshot();
        let delta = statistics.delta_since(&previous);
        info!(
            "Day {}: infections {:+}, deaths {:+}, removed {:+}",
            grid.day(),
            delta.infections,
            delta.deaths,
            delta.removed
        );
        report.send(&DailyReportRow::new(grid.day(), &delta))?;
        tracker.observe(&delta);
        previous = statistics;
    }

    info!(
        "Final infections: {}, deaths: {}, removed: {} after {} days",
        previous.infections,
        previous.deaths,
        previous.removed,
        grid.day()
    );
    Ok(RunSummary {
        days: grid.day(),
        initial_statistics,
        final_statistics: previous,
        stable: tracker.is_stable(),
    })
}

/// Parses the command line and runs a simulation.
///
/// # Errors
/// Returns an error if argument parsing, parameter loading or the run itself fails
#[allow(clippy::missing_errors_doc)]
pub fn run_with_args() -> Result<RunSummary, Box<dyn std::error::Error>> {
    let matches = create_epigrid_cli().get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    Ok(run_with_args_internal(args)?)
}

fn run_with_args_internal(args: BaseArgs) -> Result<RunSummary, EpigridError> {
    apply_log_levels(&args.log_level)?;

    // Optionally load parameters from a file
    let mut parameters = match &args.config {
        Some(path) => {
            info!("Loading parameters from: {}", path.display());
            Parameters::from_json_file(path)?
        }
        None => Parameters::default(),
    };
    if let Some(seed) = args.random_seed {
        parameters.random_seed = seed;
    }
    if args.max_days.is_some() {
        parameters.max_days = args.max_days;
    }

    let mut report = DailyReport::create(&args.output)?;
    simulate(&parameters, &mut report)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{tempdir, NamedTempFile};

    use super::*;
    use crate::grid::GridConfig;
    use crate::parameters::PopulationStrategy;

    fn small_parameters() -> Parameters {
        Parameters {
            random_seed: 5,
            grid: GridConfig {
                width: 15,
                height: 15,
                contagion_radius: 2,
                ..GridConfig::default()
            },
            population: PopulationStrategy::UniformResistance {
                infection_fraction: 0.05,
            },
            ..Parameters::default()
        }
    }

    fn lock_logging() -> std::sync::MutexGuard<'static, ()> {
        crate::log::TEST_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn test_args(output: PathBuf) -> BaseArgs {
        BaseArgs {
            random_seed: None,
            config: None,
            output,
            log_level: "error".to_string(),
            max_days: None,
        }
    }

    #[test]
    fn parses_log_level_specs() {
        assert_eq!(parse_log_levels("info").unwrap(), (Some(LevelFilter::Info), vec![]));
        assert_eq!(
            parse_log_levels("Warn, epigrid::grid=TRACE").unwrap(),
            (
                Some(LevelFilter::Warn),
                vec![("epigrid::grid".to_string(), LevelFilter::Trace)]
            )
        );
        assert_eq!(parse_log_levels("").unwrap(), (None, vec![]));
        assert!(matches!(
            parse_log_levels("epigrid=loud"),
            Err(EpigridError::InvalidParameter(_))
        ));
    }

    #[test]
    fn immune_population_stops_after_three_quiet_days() {
        let parameters = Parameters {
            population: PopulationStrategy::Uniform {
                infection_fraction: 0.0,
                resistance: 1.0,
            },
            ..small_parameters()
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("statistics.csv");
        let mut report = DailyReport::create(&path).unwrap();

        let summary = simulate(&parameters, &mut report).unwrap();
        assert_eq!(summary.days, 3);
        assert!(summary.stable);
        assert_eq!(summary.final_statistics, summary.initial_statistics);
        assert_eq!(summary.final_statistics.removed, 225);

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            contents,
            "day,infections,deaths,removed\n1,0,0,0\n2,0,0,0\n3,0,0,0\n"
        );
    }

    #[test]
    fn report_rows_sum_to_the_final_change() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("statistics.csv");
        let mut report = DailyReport::create(&path).unwrap();
        let summary = simulate(&small_parameters(), &mut report).unwrap();
        assert!(summary.stable);

        let mut reader = csv::Reader::from_path(path).unwrap();
        let rows: Vec<DailyReportRow> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(rows.len() as u64, summary.days);
        let infections: i64 = rows.iter().map(|r| r.infections).sum();
        assert_eq!(
            infections,
            summary.final_statistics.infections as i64
                - summary.initial_statistics.infections as i64
        );
        for row in rows.iter().rev().take(3) {
            assert_eq!((row.infections, row.deaths, row.removed), (0, 0, 0));
        }
    }

    #[test]
    fn day_limit_cuts_runs_short() {
        let parameters = Parameters {
            max_days: Some(2),
            stable_days: 1000,
            ..small_parameters()
        };
        let dir = tempdir().unwrap();
        let mut report = DailyReport::create(&dir.path().join("statistics.csv")).unwrap();
        let summary = simulate(&parameters, &mut report).unwrap();
        assert_eq!(summary.days, 2);
        assert!(!summary.stable);
    }

    #[test]
    fn same_seed_gives_same_summary() {
        let dir = tempdir().unwrap();
        let mut first = DailyReport::create(&dir.path().join("a.csv")).unwrap();
        let mut second = DailyReport::create(&dir.path().join("b.csv")).unwrap();
        assert_eq!(
            simulate(&small_parameters(), &mut first).unwrap(),
            simulate(&small_parameters(), &mut second).unwrap()
        );
    }

    #[test]
    fn test_run_with_config_path() {
        let _guard = lock_logging();
        let dir = tempdir().unwrap();
        let mut config = NamedTempFile::new().unwrap();
        write!(
            config,
            r#"{{
                "grid": {{ "width": 9, "height": 9, "neighborhood": "von_neumann" }},
                "population": {{ "strategy": "uniform", "infection_fraction": 0.0, "resistance": 0.0 }}
            }}"#
        )
        .unwrap();

        let args = BaseArgs {
            config: Some(config.path().to_path_buf()),
            random_seed: Some(3),
            ..test_args(dir.path().join("out").join("statistics.csv"))
        };
        let summary = run_with_args_internal(args).unwrap();
        assert_eq!(summary.days, 3);
        assert_eq!(summary.final_statistics, Statistics::default());
        assert!(dir.path().join("out").join("statistics.csv").exists());
    }

    #[test]
    fn test_run_with_max_days() {
        let _guard = lock_logging();
        let dir = tempdir().unwrap();
        let args = BaseArgs {
            max_days: Some(1),
            ..test_args(dir.path().join("statistics.csv"))
        };
        let summary = run_with_args_internal(args).unwrap();
        assert_eq!(summary.days, 1);
    }

    #[test]
    fn test_run_rejects_non_csv_output() {
        let _guard = lock_logging();
        let dir = tempdir().unwrap();
        let args = test_args(dir.path().join("statistics.txt"));
        assert!(matches!(
            run_with_args_internal(args),
            Err(EpigridError::InvalidParameter(_))
        ));
    }
}
