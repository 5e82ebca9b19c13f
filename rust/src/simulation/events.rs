//! Event log and run summary produced by the simulation driver.

use chrono::TimeDelta;
use pyo3::prelude::*;
use rustc_hash::FxHashMap;

use crate::models::{DenialReason, Snapshot};

/// Something that happened during a run, stamped with simulated time since start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimulationEvent {
    Granted {
        at: TimeDelta,
        round: u64,
        process: usize,
        resource: usize,
    },
    Denied {
        at: TimeDelta,
        round: u64,
        process: usize,
        resource: usize,
        reason: DenialReason,
    },
    Completed {
        at: TimeDelta,
        round: u64,
        process: usize,
    },
}

impl SimulationEvent {
    pub fn at(&self) -> TimeDelta {
        match self {
            SimulationEvent::Granted { at, .. }
            | SimulationEvent::Denied { at, .. }
            | SimulationEvent::Completed { at, .. } => *at,
        }
    }

    pub fn process(&self) -> usize {
        match self {
            SimulationEvent::Granted { process, .. }
            | SimulationEvent::Denied { process, .. }
            | SimulationEvent::Completed { process, .. } => *process,
        }
    }
}

impl std::fmt::Display for SimulationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationEvent::Granted {
                at,
                process,
                resource,
                ..
            } => write!(
                f,
                "[+{}s] Customer {} requested resource {} -GRANTED",
                at.num_seconds(),
                process,
                resource
            ),
            SimulationEvent::Denied {
                at,
                process,
                resource,
                reason,
                ..
            } => write!(
                f,
                "[+{}s] Customer {} requested resource {} -{}- -DENIED",
                at.num_seconds(),
                process,
                resource,
                reason
            ),
            SimulationEvent::Completed { at, process, .. } => write!(
                f,
                "[+{}s] Process {} has completed!",
                at.num_seconds(),
                process
            ),
        }
    }
}

/// Summary of a finished run.
#[pyclass]
#[derive(Clone, Debug)]
pub struct SimulationReport {
    /// Rounds in which at least one process took a turn
    #[pyo3(get)]
    pub rounds: u64,
    /// Simulated time from start to the last completion
    #[pyo3(get)]
    pub elapsed: TimeDelta,
    /// Processes in the order they finished
    #[pyo3(get)]
    pub completion_order: Vec<usize>,
    #[pyo3(get)]
    pub grants: u64,
    #[pyo3(get)]
    pub unavailable_denials: u64,
    #[pyo3(get)]
    pub unsafe_denials: u64,
    /// Denials per process (processes never denied are absent)
    #[pyo3(get)]
    pub denials_by_process: FxHashMap<usize, u32>,
    #[pyo3(get)]
    pub final_snapshot: Snapshot,
    pub events: Vec<SimulationEvent>,
}

impl SimulationReport {
    pub fn denials(&self) -> u64 {
        self.unavailable_denials + self.unsafe_denials
    }
}

#[pymethods]
impl SimulationReport {
    /// Events rendered one per line, as the console driver prints them.
    fn event_log(&self) -> Vec<String> {
        self.events.iter().map(|e| e.to_string()).collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "SimulationReport(rounds={}, elapsed={}s, grants={}, denials={}, order={:?})",
            self.rounds,
            self.elapsed.num_seconds(),
            self.grants,
            self.denials(),
            self.completion_order
        )
    }
}
