use std::sync::mpsc;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use log::info;
use log::warn;

use schedsim::api::Report;
use schedsim::config::DEFAULT_QUANTUM;
use schedsim::dsl::sample_workload;
use schedsim::trace::gantt;
use schedsim::{
    EngineHandle, Metrics, Outcome, Policy, ProcessRecord, ProcessSpec, Scenario,
    SimulationConfig, Snapshot,
};

/// Deterministic CPU-scheduling simulator.
///
/// Runs a workload under FIFO, SJF, Priority or RoundRobin dispatch on a
/// virtual clock and reports waiting, response and turnaround times.
/// Without --workload the built-in six-process traffic-management
/// workload is used.
#[derive(Debug, Parser)]
struct Opts {
    /// JSON scenario file with a "processes" list and optional
    /// "policy"/"quantum".
    #[clap(short = 'w', long)]
    workload: Option<std::path::PathBuf>,

    /// Dispatch policy: FIFO, SJF, Priority or RoundRobin. Overrides the
    /// scenario file.
    #[clap(short = 'p', long)]
    policy: Option<String>,

    /// RoundRobin quantum in ticks. Overrides the scenario file.
    #[clap(short = 'q', long)]
    quantum: Option<i64>,

    /// Run every policy over the same workload and print a comparison.
    #[clap(short = 'c', long, action = clap::ArgAction::SetTrue, conflicts_with = "json")]
    compare: bool,

    /// Print the final report as JSON instead of tables.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    json: bool,

    /// Enable verbose output. Specify multiple times to increase verbosity.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_workload(opts: &Opts) -> Result<(Vec<ProcessSpec>, String, i64)> {
    let (specs, policy, quantum) = match &opts.workload {
        Some(path) => {
            let scenario = Scenario::load(path)
                .with_context(|| format!("Failed to load workload {}", path.display()))?;
            (scenario.processes, Some(scenario.policy), scenario.quantum)
        }
        None => (sample_workload(), None, None),
    };

    let policy = opts
        .policy
        .clone()
        .or(policy)
        .unwrap_or_else(|| Policy::Fifo.name().to_string());
    let quantum = opts.quantum.or(quantum).unwrap_or(DEFAULT_QUANTUM as i64);
    Ok((specs, policy, quantum))
}

fn render_step(snap: &Snapshot) {
    let running = match &snap.running {
        Some(p) => p.id().to_string(),
        None => "-".to_string(),
    };
    let join = |ids: Vec<schedsim::ProcessId>| {
        ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(" ")
    };
    println!(
        "step {:>3} {:>6}  running={:<4} ready=[{}] done=[{}]",
        snap.step,
        snap.clock.to_string(),
        running,
        join(snap.ready_ids()),
        join(snap.terminated_ids()),
    );
}

fn render_processes(records: &[ProcessRecord]) {
    println!(
        "{:<4} {:<28} {:<19} {:>7} {:>5} {:>4} {:>7} {:<10} {:>5} {:>5} {:>6}",
        "ID", "Name", "Category", "Arrival", "Burst", "Prio", "MB", "State", "Left", "Wait",
        "Turn"
    );
    for p in records {
        let turnaround = p
            .turnaround_time()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<4} {:<28} {:<19} {:>7} {:>5} {:>4} {:>7.1} {:<10} {:>5} {:>5} {:>6}",
            p.id().to_string(),
            p.name(),
            p.category().to_string(),
            p.arrival_time().ticks(),
            p.burst_time(),
            p.priority(),
            p.data_size(),
            p.state().to_string(),
            p.remaining_time(),
            p.waiting_time(),
            turnaround,
        );
    }
}

fn compare(specs: &[ProcessSpec], quantum: i64) -> Result<()> {
    println!(
        "{:<12} {:>10} {:>12} {:>10} {:>8}",
        "Policy", "Avg wait", "Avg turnar.", "Avg resp.", "Elapsed"
    );
    for policy in Policy::ALL {
        let config = SimulationConfig::with_policy(policy, Some(quantum))?;
        let handle = EngineHandle::with_config(specs, config)?;
        let metrics = match handle.run(|_s: Snapshot| {})? {
            Outcome::Completed(m) => m,
            Outcome::Cancelled(_) => bail!("{} run was cancelled", policy),
            Outcome::Failed(e) => bail!("{} run failed: {}", policy, e),
        };
        println!(
            "{:<12} {:>10.2} {:>12.2} {:>10.2} {:>8}",
            config.to_string(),
            metrics.average_waiting,
            metrics.average_turnaround,
            metrics.average_response,
            metrics.elapsed
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let llv = match opts.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let (specs, policy, quantum) = load_workload(&opts)?;

    if opts.compare {
        return compare(&specs, quantum);
    }

    let handle = EngineHandle::configure(&specs, &policy, Some(quantum))
        .context("Invalid simulation configuration")?;

    let canceller = handle.clone();
    ctrlc::set_handler(move || {
        canceller.cancel();
    })
    .context("Error setting Ctrl-C handler")?;

    // The engine runs on a worker; this thread only renders.
    let (tx, rx) = mpsc::channel::<Snapshot>();
    let worker = handle.spawn(move |snap: Snapshot| {
        let _ = tx.send(snap);
    })?;
    for snap in rx {
        if !opts.json {
            render_step(&snap);
        }
    }
    let outcome = match worker.join() {
        Ok(outcome) => outcome,
        Err(_) => bail!("simulation worker panicked"),
    };

    let metrics: Metrics = match outcome {
        Outcome::Completed(m) => m,
        Outcome::Cancelled(m) => {
            warn!("simulation cancelled, showing partial results");
            m
        }
        Outcome::Failed(e) => bail!("simulation failed: {}", e),
    };

    let report = handle.inspect(Report::from_engine)?;
    if opts.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!();
    render_processes(&report.processes);
    println!();
    println!("{}", gantt(&report.timeline));
    println!();
    println!("{}", metrics);
    info!("trace hash {:016x}", report.trace_hash);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_rejects_json() {
        let err = Opts::try_parse_from(["schedsim", "--compare", "--json"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        assert!(Opts::try_parse_from(["schedsim", "--compare"]).is_ok());
        assert!(Opts::try_parse_from(["schedsim", "--json", "-vv"]).is_ok());
    }

    #[test]
    fn test_cli_overrides_scenario() {
        let opts = Opts::try_parse_from(["schedsim", "-p", "RoundRobin", "-q", "3"]).unwrap();
        let (specs, policy, quantum) = load_workload(&opts).unwrap();
        assert_eq!(specs.len(), 6);
        assert_eq!(policy, "RoundRobin");
        assert_eq!(quantum, 3);

        let opts = Opts::try_parse_from(["schedsim"]).unwrap();
        let (_, policy, quantum) = load_workload(&opts).unwrap();
        assert_eq!(policy, "FIFO");
        assert_eq!(quantum, DEFAULT_QUANTUM as i64);
    }
}
