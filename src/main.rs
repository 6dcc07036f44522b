use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use aeropendulum_sim::config::SimulationConfig;
use aeropendulum_sim::io;
use aeropendulum_sim::sim::{ResponseSummary, SimulationRecord};
use aeropendulum_sim::SimResult;

/// Usage: `aeropendulum-sim [config.json] [record.csv] [summary.json]`
fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber was already installed");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |i: usize| args.get(i).map(String::as_str);
    match run(arg(0), arg(1), arg(2)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<&str>, csv_path: Option<&str>, summary_path: Option<&str>) -> SimResult<()> {
    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------
    let config = match config_path {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let record = config.run()?;

    let summary = ResponseSummary::from_record(&record);

    if let Some(path) = csv_path {
        io::write_record_file(path, &record)?;
    }
    if let (Some(path), Some(summary)) = (summary_path, &summary) {
        io::write_summary_file(path, summary)?;
    }

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    print_report(&config, &record, summary.as_ref(), config_path, csv_path);
    if let Some(path) = summary_path {
        match summary {
            Some(_) => println!("  Summary written to {path}"),
            None => println!("  No summary written to {path}: empty record"),
        }
    }
    Ok(())
}

fn print_report(
    config: &SimulationConfig,
    record: &SimulationRecord,
    summary: Option<&ResponseSummary>,
    config_path: Option<&str>,
    csv_path: Option<&str>,
) {
    let p = &config.pendulum;
    let l = &config.limits;
    let s = &config.scenario;

    println!();
    println!("====================================================================");
    println!("  AEROPENDULUM SIMULATION: {}", record.controller());
    println!("====================================================================");
    println!();
    println!("  Pendulum Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.3} kg    Arm radius:   {:>8.3} m",
        p.mass, p.radius
    );
    println!(
        "  Gravity:       {:>8.3} m/s^2 Damping:      {:>8.3}",
        p.gravity, p.damping
    );
    println!(
        "  Thrust gain:   {:>8.3} N/V   Step dt:      {:>8.4} s",
        p.thrust_gain, p.dt
    );
    println!(
        "  Command range: [{:.1}, {:.1}] V   Max slew: {} V/step",
        l.u_min, l.u_max, l.u_delta_max
    );
    println!();

    println!("  Scenario");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mode: {:?}   Amplitude: {:.4} rad ({:.1} deg)   f: {} Hz   T: {} s",
        s.mode,
        s.amplitude,
        s.amplitude.to_degrees(),
        s.frequency_hz,
        s.duration
    );
    println!(
        "  Holding command at amplitude: {:.3} V",
        p.holding_command(s.amplitude)
    );
    println!(
        "  Config: {}",
        config_path.unwrap_or("built-in defaults")
    );
    println!();

    match summary {
        Some(summary) => {
            println!("  Response Summary");
            println!("  ──────────────────────────────────────────────────────────────────");
            println!(
                "  Peak angle:    {:>8.4} rad ({:.1} deg) at t={:.2} s",
                summary.peak_angle,
                summary.peak_angle.to_degrees(),
                summary.peak_time_s
            );
            match summary.overshoot_pct {
                Some(o) => println!("  Overshoot:     {:>8.2} %", o),
                None => println!("  Overshoot:          n/a"),
            }
            match summary.rise_time_s {
                Some(t) => println!("  Rise (90%):    {:>8.2} s", t),
                None => println!("  Rise (90%):     not reached"),
            }
            println!("  IAE:           {:>8.4} rad*s", summary.iae);
            println!("  Peak |u|:      {:>8.3} V", summary.max_abs_command);
            println!("  Final error:   {:>8.4} rad", summary.final_error);
            println!();
        }
        None => {
            println!("  Duration shorter than one step, nothing to report.");
            println!();
        }
    }

    // -----------------------------------------------------------------------
    // Response table (sampled)
    // -----------------------------------------------------------------------
    if !record.is_empty() {
        println!("  Response");
        println!("  ──────────────────────────────────────────────────────────────────");
        println!(
            "  {:>7}  {:>9}  {:>9}  {:>9}  {:>9}  {:>8}",
            "t (s)", "ref (rad)", "q (rad)", "w (rad/s)", "err (rad)", "u (V)"
        );
        println!("  {}", "─".repeat(62));

        let sample_interval = (record.len() / 30).max(1);
        for (i, st) in record.iter().enumerate() {
            if i % sample_interval != 0 && i != record.len() - 1 {
                continue;
            }
            println!(
                "  {:>7.2}  {:>9.4}  {:>9.4}  {:>9.4}  {:>9.4}  {:>8.4}",
                st.time,
                st.reference,
                st.angle,
                st.velocity,
                st.error(),
                st.command
            );
        }
        println!();
    }

    println!("  Simulation: {} steps, dt={} s", record.len(), p.dt);
    if let Some(path) = csv_path {
        println!("  Record written to {path}");
    }
    println!("====================================================================");
    println!();
}
