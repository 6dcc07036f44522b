use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info};

use super::record::{SimulationRecord, StepRecord};
use super::reference::Scenario;
use crate::control::Controller;
use crate::dynamics::Pendulum;
use crate::error::{SimError, SimResult};

/// Upper bound on the record's initial allocation; longer runs grow it.
const PREALLOCATED_STEPS: usize = 1 << 16;

// ---------------------------------------------------------------------------
// Closed-loop simulation
// ---------------------------------------------------------------------------

/// Run the closed loop for `scenario.duration` seconds.
///
/// Each step the pendulum is advanced with the *previous* command (zero on
/// the first step), the reference is evaluated at the new time, and only then
/// is the controller asked for the next command. That one-step delay is part
/// of the loop's dynamics.
pub fn simulate(
    pendulum: &mut Pendulum,
    controller: &mut dyn Controller,
    scenario: &Scenario,
) -> SimResult<SimulationRecord> {
    run(pendulum, controller, scenario, None)
}

/// Like [`simulate`], but checks `cancel` at every step boundary and stops
/// with [`SimError::Cancelled`] once it is set.
pub fn simulate_cancellable(
    pendulum: &mut Pendulum,
    controller: &mut dyn Controller,
    scenario: &Scenario,
    cancel: &AtomicBool,
) -> SimResult<SimulationRecord> {
    run(pendulum, controller, scenario, Some(cancel))
}

fn run(
    pendulum: &mut Pendulum,
    controller: &mut dyn Controller,
    scenario: &Scenario,
    cancel: Option<&AtomicBool>,
) -> SimResult<SimulationRecord> {
    scenario.validate()?;
    let steps = scenario.step_count(pendulum.params().dt)?;
    info!(
        controller = controller.name(),
        mode = ?scenario.mode,
        amplitude = scenario.amplitude,
        frequency_hz = scenario.frequency_hz,
        steps,
        "simulation started"
    );

    let result = run_steps(pendulum, controller, scenario, cancel, steps);
    match &result {
        Ok(record) => info!(steps = record.len(), final_time = pendulum.time(), "simulation finished"),
        Err(e) => error!(error = %e, time = pendulum.time(), "simulation aborted"),
    }
    result
}

fn run_steps(
    pendulum: &mut Pendulum,
    controller: &mut dyn Controller,
    scenario: &Scenario,
    cancel: Option<&AtomicBool>,
    steps: usize,
) -> SimResult<SimulationRecord> {
    let mut record = SimulationRecord::with_capacity(controller.name(), steps.min(PREALLOCATED_STEPS));
    let mut u = 0.0;

    for completed_steps in 0..steps {
        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            return Err(SimError::Cancelled { completed_steps });
        }

        // Actuate with the last command
        let state = pendulum.step(u)?;

        // Sense and decide
        let reference = scenario.reference(state.time);
        u = controller.control(reference, state.angle, state.time)?;
        if !u.is_finite() {
            return Err(SimError::NonFiniteState { quantity: "command", value: u, time: state.time });
        }

        record.push(StepRecord::new(&state, reference, u));
    }

    Ok(record)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    use crate::control::fuzzy::InputPolicy;
    use crate::control::{ActuatorLimits, FuzzyPd, FuzzyPid, Pid, PidGains};
    use crate::dynamics::PendulumParams;
    use crate::sim::ReferenceMode;

    fn bench_pid() -> Pid {
        Pid::new(
            PidGains { kp: 0.5, ti: 20.0, td: 0.0 },
            ActuatorLimits::new(-10.0, 10.0, 0.01).unwrap(),
        )
        .unwrap()
    }

    fn bench_pendulum() -> Pendulum {
        Pendulum::new(PendulumParams {
            mass: 0.5,
            radius: 1.0,
            gravity: 9.81,
            damping: 0.1,
            thrust_gain: 5.0,
            dt: 0.01,
        })
        .unwrap()
    }

    #[test]
    fn pid_step_response_rises_within_limits() {
        let mut pendulum = bench_pendulum();
        let mut pid = bench_pid();
        let scenario = Scenario::step(FRAC_PI_2, 5.0);

        let record = simulate(&mut pendulum, &mut pid, &scenario).unwrap();
        assert_eq!(record.len(), scenario.steps(0.01));
        assert!(record.len() >= 499, "5 s at 100 Hz, got {} steps", record.len());

        let steps = record.steps();
        for pair in steps[..50].windows(2) {
            assert!(
                pair[1].angle >= pair[0].angle,
                "angle fell from {} to {} at t={:.2}",
                pair[0].angle,
                pair[1].angle,
                pair[1].time
            );
        }

        let mut last = 0.0;
        for s in steps {
            assert!(s.command.abs() <= 10.0, "command {} out of range", s.command);
            assert!(
                (s.command - last).abs() <= 0.01 + 1e-12,
                "command slewed by {} at t={:.2}",
                (s.command - last).abs(),
                s.time
            );
            last = s.command;
        }
    }

    #[test]
    fn control_delay_first_step_is_unactuated() {
        let mut pendulum = bench_pendulum();
        let mut pid = bench_pid();
        let record = simulate(&mut pendulum, &mut pid, &Scenario::step(1.0, 0.02)).unwrap();
        let first = record.steps()[0];
        // The pendulum moved with u = 0, so it is still at rest.
        assert_eq!(first.angle, 0.0);
        assert_eq!(first.acceleration, 0.0);
        assert!(first.command > 0.0, "controller reacts after the first step");
    }

    #[test]
    fn times_advance_by_dt() {
        let mut pendulum = bench_pendulum();
        let mut pid = bench_pid();
        let record = simulate(&mut pendulum, &mut pid, &Scenario::step(1.0, 1.0)).unwrap();
        for (i, s) in record.iter().enumerate() {
            assert!((s.time - 0.01 * (i + 1) as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn pulse_reference_sign_matches_sine() {
        let mut pendulum = bench_pendulum();
        let mut pid = bench_pid();
        let scenario = Scenario { mode: ReferenceMode::Pulse, amplitude: 1.0, frequency_hz: 0.02, duration: 60.0 };
        let record = simulate(&mut pendulum, &mut pid, &scenario).unwrap();
        for s in &record {
            let expected = if (std::f64::consts::TAU * 0.02 * s.time).sin() >= 0.0 { 1.0 } else { -1.0 };
            assert_eq!(s.reference, expected, "wrong pulse level at t={}", s.time);
        }
        assert!(record.iter().any(|s| s.reference < 0.0), "second half-period should be negative");
    }

    #[test]
    fn fuzzy_pd_tracks_sine() {
        let mut pendulum = bench_pendulum();
        let mut c = FuzzyPd::new(0.5, ActuatorLimits::default()).unwrap().input_policy(InputPolicy::Clamp);
        let scenario = Scenario { mode: ReferenceMode::Sine, amplitude: 0.5, frequency_hz: 0.1, duration: 10.0 };
        let record = simulate(&mut pendulum, &mut c, &scenario).unwrap();
        assert_eq!(record.len(), scenario.steps(0.01));
        assert_eq!(record.controller(), "FuzzyPD+I");
        assert!(record.iter().all(|s| s.angle.is_finite() && s.command.abs() <= 10.0));
    }

    #[test]
    fn fuzzy_pid_runs_step() {
        let mut pendulum = bench_pendulum();
        let mut c = FuzzyPid::new(ActuatorLimits::default()).unwrap().input_policy(InputPolicy::Clamp);
        let record = simulate(&mut pendulum, &mut c, &Scenario::step(FRAC_PI_2, 3.0)).unwrap();
        assert!(record.last().unwrap().angle > 0.0, "pendulum should lift toward the setpoint");
    }

    #[test]
    fn runaway_gains_abort_with_non_finite_state() {
        let mut pendulum = Pendulum::new(PendulumParams { thrust_gain: 1.0e300, ..PendulumParams::default() }).unwrap();
        let mut pid = Pid::new(
            PidGains { kp: 1.0e300, ti: 1.0e-300, td: 0.0 },
            ActuatorLimits::new(-1.0e300, 1.0e300, 1.0e300).unwrap(),
        )
        .unwrap();
        let err = simulate(&mut pendulum, &mut pid, &Scenario::step(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, SimError::NonFiniteState { .. }), "got {err:?}");
    }

    #[test]
    fn cancellation_stops_at_step_boundary() {
        let mut pendulum = bench_pendulum();
        let mut pid = bench_pid();
        let cancel = AtomicBool::new(true);
        let err = simulate_cancellable(&mut pendulum, &mut pid, &Scenario::step(1.0, 1.0), &cancel).unwrap_err();
        assert!(matches!(err, SimError::Cancelled { completed_steps: 0 }));
        assert_eq!(pendulum.time(), 0.0);
    }

    #[test]
    fn negative_step_drives_pendulum_negative() {
        let mut pendulum = bench_pendulum();
        let mut pid = bench_pid();
        let record = simulate(&mut pendulum, &mut pid, &Scenario::step(-FRAC_PI_2, 1.0)).unwrap();
        assert_eq!(record.len(), 100);
        assert!(record.iter().all(|s| s.reference == -FRAC_PI_2));
        let last = record.last().unwrap();
        assert!(last.angle < 0.0, "angle should move toward -pi/2, got {}", last.angle);
        assert!(last.command < 0.0);
    }

    #[test]
    fn overlong_duration_rejected_before_stepping() {
        let mut pendulum = bench_pendulum();
        let mut pid = bench_pid();
        let err = simulate(&mut pendulum, &mut pid, &Scenario::step(1.0, 1.0e300)).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "duration", .. }), "got {err:?}");
        assert_eq!(pendulum.time(), 0.0);
    }

    #[test]
    fn zero_duration_gives_empty_record() {
        let mut pendulum = bench_pendulum();
        let mut pid = bench_pid();
        let record = simulate(&mut pendulum, &mut pid, &Scenario::step(1.0, 0.0)).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn independent_runs_in_parallel_agree() {
        let scenario = Scenario::step(FRAC_PI_2, 2.0);
        let (a, b) = std::thread::scope(|s| {
            let run = || {
                let mut pendulum = bench_pendulum();
                let mut pid = bench_pid();
                simulate(&mut pendulum, &mut pid, &scenario).unwrap()
            };
            let ha = s.spawn(run);
            let hb = s.spawn(run);
            (ha.join().unwrap(), hb.join().unwrap())
        });
        assert_eq!(a, b, "runs are pure functions of their configuration");
    }
}
