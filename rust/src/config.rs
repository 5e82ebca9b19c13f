//! Configuration types for the simulation driver.

use pyo3::prelude::*;

/// Driver policy: how often processes ask for resources and how long turns take.
#[pyclass]
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Chance (0-100) that a process asks for a resource it still needs on its turn
    #[pyo3(get, set)]
    pub request_percent: u32,
    /// Upper bound (exclusive) of the simulated pause before each turn, in seconds
    #[pyo3(get, set)]
    pub max_wait_secs: u32,
    /// Seed for the request generator; equal seeds replay equal runs
    #[pyo3(get, set)]
    pub seed: u64,
    /// Verbosity level: 0=silent, 1=decisions, 2=checks, 3=debug
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Give up after this many rounds (None = run until every process finishes)
    #[pyo3(get, set)]
    pub max_rounds: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            request_percent: 79,
            max_wait_secs: 2,
            seed: 0x5EED_BA4C,
            verbosity: 0,
            max_rounds: Some(10_000),
        }
    }
}

#[pymethods]
impl SimulationConfig {
    #[new]
    #[pyo3(signature = (
        request_percent=None,
        max_wait_secs=None,
        seed=None,
        verbosity=None,
        max_rounds=10_000
    ))]
    fn new(
        request_percent: Option<u32>,
        max_wait_secs: Option<u32>,
        seed: Option<u64>,
        verbosity: Option<u8>,
        max_rounds: Option<u64>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            request_percent: request_percent.unwrap_or(defaults.request_percent),
            max_wait_secs: max_wait_secs.unwrap_or(defaults.max_wait_secs),
            seed: seed.unwrap_or(defaults.seed),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            max_rounds,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SimulationConfig(request_percent={}, max_wait_secs={}, seed={}, max_rounds={:?})",
            self.request_percent, self.max_wait_secs, self.seed, self.max_rounds
        )
    }
}
