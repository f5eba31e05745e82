//! Run one mechanism scenario from a JSON file and report how it went.
//!
//! ```text
//! actuator-sim <scenario.json> [--out data.json]
//! ```
//!
//! Log verbosity comes from `ACTUATOR_SIM_LOG` (`error` .. `trace`).

use std::error::Error;
use std::path::PathBuf;
use std::{env, fs, process};

use clap::Parser;
use control::ControllerConfig;
use log::{LevelFilter, SetLoggerError, error, info};
use mechanism::{DataPoint, MechanismParams, RunSummary};
use serde::{Deserialize, Serialize};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

const LOG_ENV: &str = "ACTUATOR_SIM_LOG";

#[derive(Debug, Clone, Deserialize)]
struct Scenario {
    mechanism: MechanismParams,
    #[serde(default)]
    controller: Option<ControllerConfig>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    config: serde_json::Value,
    summary: RunSummary,
    data: &'a [DataPoint],
}

/// Simulate one actuator scenario.
#[derive(Debug, Parser)]
#[command(name = "actuator-sim", version)]
struct Args {
    /// Scenario document (JSON)
    scenario: PathBuf,

    /// Write the configuration, summary and full data log here
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn log_level() -> LevelFilter {
    env::var(LOG_ENV)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(&args.scenario)?;
    let scenario: Scenario = serde_json::from_str(&text)?;

    let controller = scenario.controller.as_ref().map(ControllerConfig::build);
    let mut engine = scenario.mechanism.build(controller)?;
    engine.calc();

    let summary = engine.summary();
    info!("samples:          {}", summary.samples);
    info!("final time:       {:.3} s", summary.final_time);
    info!("final position:   {:.4}", summary.final_position);
    info!("final velocity:   {:.4}", summary.final_velocity);
    info!("peak current:     {:.1} A/motor", summary.peak_current);
    info!("min bus voltage:  {:.2} V", summary.min_branch_voltage);
    info!("energy:           {:.1} mAh", summary.total_energy);
    info!(
        "brownout: {}  slip: {}  current limited: {}",
        summary.brownout_occurred, summary.slip_occurred, summary.current_limited
    );
    if let Some(on_goal) = summary.on_goal {
        info!("on goal:          {on_goal}");
    }

    if let Some(out) = &args.out {
        let report = Report {
            config: engine.config_snapshot(),
            summary,
            data: engine.get_data_points(),
        };
        fs::write(out, serde_json::to_string_pretty(&report)?)?;
        info!("wrote {} samples to {}", summary.samples, out.display());
    }
    Ok(())
}

fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn main() {
    if let Err(err) = init_logging(log_level()) {
        eprintln!("actuator-sim: logging disabled ({err})");
    }

    let args = Args::parse();

    if let Err(err) = run(&args) {
        error!("{err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from(["actuator-sim", "arm.json", "--out", "log.json"]).unwrap();
        assert_eq!(args.scenario, PathBuf::from("arm.json"));
        assert_eq!(args.out, Some(PathBuf::from("log.json")));

        assert_eq!(Args::try_parse_from(["actuator-sim", "arm.json"]).unwrap().out, None);
        assert!(Args::try_parse_from(["actuator-sim"]).is_err());
        assert!(Args::try_parse_from(["actuator-sim", "arm.json", "--out"]).is_err());
        assert!(Args::try_parse_from(["actuator-sim", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_second_logger_init_reports_error() {
        let _ = init_logging(LevelFilter::Off);
        assert!(init_logging(LevelFilter::Info).is_err());
    }

    #[test]
    fn test_scenario_runs() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "mechanism": { "type": "elevator" },
                "controller": { "type": "pidf", "kp": 50.0, "ki": 0.1, "goal": 1.0, "deadband": 0.01 }
            }"#,
        )
        .unwrap();

        let controller = scenario.controller.as_ref().map(ControllerConfig::build);
        let mut engine = scenario.mechanism.build(controller).unwrap();
        engine.calc();
        assert!(engine.is_done());
    }

    #[test]
    fn test_scenario_without_controller() {
        let scenario: Scenario =
            serde_json::from_str(r#"{ "mechanism": { "type": "drivetrain", "simulation_time": 0.5 } }"#).unwrap();
        assert!(scenario.controller.is_none());

        let mut engine = scenario.mechanism.build(None).unwrap();
        engine.calc();
        let report = Report {
            config: engine.config_snapshot(),
            summary: engine.summary(),
            data: engine.get_data_points(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["config"]["mechanism"], "drivetrain");
        assert_eq!(json["data"].as_array().unwrap().len(), engine.get_data_points().len());
    }
}
