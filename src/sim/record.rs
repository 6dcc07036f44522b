use serde::{Deserialize, Serialize};

use crate::dynamics::PendulumState;

/// One closed-loop step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub time: f64,
    pub reference: f64,
    pub angle: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub command: f64,
}

impl StepRecord {
    pub fn new(state: &PendulumState, reference: f64, command: f64) -> Self {
        Self {
            time: state.time,
            reference,
            angle: state.angle,
            velocity: state.velocity,
            acceleration: state.acceleration,
            command,
        }
    }

    pub fn error(&self) -> f64 {
        self.reference - self.angle
    }
}

/// Append-only time series of a run, one entry per step in step order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    controller: String,
    steps: Vec<StepRecord>,
}

impl SimulationRecord {
    pub fn with_capacity(controller: impl Into<String>, capacity: usize) -> Self {
        Self { controller: controller.into(), steps: Vec::with_capacity(capacity) }
    }

    pub(crate) fn push(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.steps.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepRecord> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a SimulationRecord {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
