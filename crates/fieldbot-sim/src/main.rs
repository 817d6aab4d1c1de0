//! fieldbot-sim - run a scripted match against simulated collaborators
//!
//! Drives the competition robot through disabled, autonomous and teleop on a
//! fixed-period loop, with a scripted gamepad, a point-mass drivetrain and a
//! JSON-lines telemetry log. Prints a JSON run summary on stdout.

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod script;
mod sim;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fieldbot_driver::Alliance;
use fieldbot_faults::FaultRegistry;
use fieldbot_robot::{Robot, RobotConfig, RobotLoop, RobotParts, TelemetrySink};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::script::{MatchTimeline, ScriptedMatch};
use crate::sim::{LogTelemetry, SimDrivetrain, SimGamepad, SimHealthMonitor, SimSequencer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AllianceArg {
    Red,
    Blue,
}

impl From<AllianceArg> for Alliance {
    fn from(arg: AllianceArg) -> Self {
        match arg {
            AllianceArg::Red => Alliance::Red,
            AllianceArg::Blue => Alliance::Blue,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "fieldbot-sim")]
#[command(about = "Run a scripted match against simulated robot collaborators")]
#[command(version)]
struct Cli {
    /// Robot configuration file (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Alliance the robot plays on
    #[arg(long, value_enum, default_value_t = AllianceArg::Blue)]
    alliance: AllianceArg,

    /// Override the loop period from the configuration
    #[arg(long)]
    period_ms: Option<u64>,

    /// Disabled time before autonomous, in seconds
    #[arg(long, default_value = "0.5", value_parser = parse_secs)]
    pre_match_s: Duration,

    /// Autonomous length, in seconds
    #[arg(long, default_value = "3", value_parser = parse_secs)]
    auto_s: Duration,

    /// Disabled gap between autonomous and teleop, in seconds
    #[arg(long, default_value = "0.5", value_parser = parse_secs)]
    gap_s: Duration,

    /// Teleop length, in seconds
    #[arg(long, default_value = "10", value_parser = parse_secs)]
    teleop_s: Duration,

    /// Disabled time after teleop, in seconds
    #[arg(long, default_value = "0.5", value_parser = parse_secs)]
    post_match_s: Duration,

    /// Unplug the controller at this match time, in seconds
    #[arg(long, value_parser = parse_secs)]
    disconnect_at_s: Option<Duration>,

    /// How long the controller stays unplugged, in seconds
    #[arg(long, default_value = "1", value_parser = parse_secs)]
    disconnect_for_s: Duration,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write telemetry frames as JSON lines to this file
    #[arg(long)]
    telemetry: Option<PathBuf>,

    /// Health monitor heartbeat interval
    #[arg(long, default_value_t = 250)]
    health_interval_ms: u64,

    /// Log level for fieldbot crates when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_secs(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{s:?}: {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{s:?}: {e}"))
}

impl Cli {
    fn timeline(&self) -> MatchTimeline {
        MatchTimeline {
            pre_match: self.pre_match_s,
            autonomous: self.auto_s,
            gap: self.gap_s,
            teleop: self.teleop_s,
            post_match: self.post_match_s,
        }
    }

    fn disconnect_window(&self) -> Option<(Duration, Duration)> {
        self.disconnect_at_s
            .map(|at| (at, at.saturating_add(self.disconnect_for_s)))
    }

    fn load_config(&self) -> Result<RobotConfig> {
        let mut config = match &self.config {
            Some(path) => RobotConfig::load(path)
                .with_context(|| format!("loading robot config from {}", path.display()))?,
            None => RobotConfig::default(),
        };
        if let Some(ms) = self.period_ms {
            config.loop_config.period_ms = ms;
        }
        config.validate().context("invalid robot config")?;
        Ok(config)
    }

    fn telemetry_sink(&self) -> Result<Box<dyn TelemetrySink>> {
        Ok(match &self.telemetry {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("creating telemetry log {}", path.display()))?;
                Box::new(LogTelemetry::new(BufWriter::new(file)))
            }
            None => Box::new(LogTelemetry::new(std::io::sink())),
        })
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("fieldbot={level}"))),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = cli.load_config()?;
    let period = config.loop_config.period();
    let timeline = cli.timeline();
    info!(
        alliance = ?cli.alliance,
        period_ms = config.loop_config.period_ms,
        match_s = timeline.total().as_secs_f64(),
        "starting simulated match"
    );

    let health = SimHealthMonitor::start(Duration::from_millis(cli.health_interval_ms))
        .context("starting health monitor")?;
    let parts = RobotParts {
        input: Box::new(SimGamepad::new(period, cli.disconnect_window())),
        alliance: Box::new(Alliance::from(cli.alliance)),
        drivetrain: Box::new(SimDrivetrain::new()),
        sequencer: Box::new(SimSequencer::new(period)),
        telemetry: cli.telemetry_sink()?,
        health_monitor: Some(Box::new(health)),
    };

    let mut robot =
        Robot::new(config, parts, FaultRegistry::new()).context("building robot")?;
    let mut host = RobotLoop::new(&robot.config().loop_config).context("building loop")?;
    let mut source = ScriptedMatch::new(timeline);

    let summary = host
        .run(&mut robot, &mut source, cli.max_ticks)
        .context("match aborted")?;

    let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
    println!("{json}");
    Ok(())
}
