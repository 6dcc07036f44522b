use std::f64::consts::FRAC_PI_4;

use aeropendulum_sim::control::{ActuatorLimits, Controller};
use aeropendulum_sim::dynamics::{Pendulum, PendulumParams};
use aeropendulum_sim::sim::{simulate, ResponseSummary, Scenario};
use aeropendulum_sim::SimResult;

/// Gravity feedforward plus a proportional correction: command the voltage
/// that would hold the reference angle, then push on the remaining error.
struct FeedforwardP {
    params: PendulumParams,
    limits: ActuatorLimits,
    kp: f64,
    last: f64,
}

impl Controller for FeedforwardP {
    fn control(&mut self, reference: f64, measured: f64, _time: f64) -> SimResult<f64> {
        let raw = self.params.holding_command(reference) + self.kp * (reference - measured);
        self.last = self.limits.apply(raw, self.last);
        Ok(self.last)
    }

    fn reset(&mut self) {
        self.last = self.limits.initial_output();
    }

    fn name(&self) -> &str {
        "Feedforward+P"
    }
}

fn main() -> SimResult<()> {
    let params = PendulumParams::default();
    let limits = ActuatorLimits::new(-10.0, 10.0, 0.05)?;
    let scenario = Scenario::step(FRAC_PI_4, 10.0);

    let mut pendulum = Pendulum::new(params)?;
    let mut controller = FeedforwardP { params, limits, kp: 1.5, last: limits.initial_output() };

    println!("Simulating with {} controller...", controller.name());
    println!("Holding command at {:.3} rad: {:.3} V", scenario.amplitude, params.holding_command(scenario.amplitude));
    let record = simulate(&mut pendulum, &mut controller, &scenario)?;

    if let Some(summary) = ResponseSummary::from_record(&record) {
        println!("Peak angle: {:.3} rad at {:.2} s", summary.peak_angle, summary.peak_time_s);
        match summary.overshoot_pct {
            Some(pct) => println!("Overshoot: {pct:.1} %"),
            None => println!("Overshoot: n/a"),
        }
        println!("Final error: {:.4} rad", summary.final_error);
        println!("IAE: {:.3} rad·s", summary.iae);
    }
    println!("Steps: {}", record.len());
    Ok(())
}
