//! Banker's algorithm resource allocation simulator.
//!
//! The [`Allocator`] owns the resource matrices and decides, one unit at a time,
//! whether a request keeps the system in a safe state. The loader, report and
//! simulation modules are thin collaborators around it, and this module exposes
//! all of them to Python.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod allocator;
mod config;
pub mod loader;
pub mod logging;
mod models;
pub mod report;
pub mod simulation;

pub use allocator::{Allocator, AllocatorError, SharedAllocator};
pub use config::SimulationConfig;
pub use loader::{load_config, parse_config, LoaderError};
pub use models::{DenialReason, RequestOutcome, Snapshot, SystemConfig};
pub use report::render_snapshot;
pub use simulation::{Simulation, SimulationError, SimulationEvent, SimulationReport};

fn value_error(e: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

fn loader_error(e: LoaderError) -> PyErr {
    match e {
        LoaderError::Io { .. } => pyo3::exceptions::PyOSError::new_err(e.to_string()),
        other => value_error(other),
    }
}

fn build_allocator(
    config: &SystemConfig,
    allocation: Option<Vec<Vec<u32>>>,
) -> Result<Allocator, AllocatorError> {
    match allocation {
        Some(rows) => Allocator::with_allocation(config, &rows),
        None => Allocator::new(config),
    }
}

/// Outcome of a single-unit request (PyO3 wrapper).
#[pyclass(name = "RequestOutcome")]
#[derive(Clone, Debug)]
pub struct PyRequestOutcome {
    #[pyo3(get)]
    pub granted: bool,
    #[pyo3(get)]
    pub reason: Option<DenialReason>,
    /// Completion order found by the safety scan (empty when denied)
    #[pyo3(get)]
    pub safe_sequence: Vec<usize>,
}

impl From<RequestOutcome> for PyRequestOutcome {
    fn from(outcome: RequestOutcome) -> Self {
        match outcome {
            RequestOutcome::Granted { safe_sequence } => Self {
                granted: true,
                reason: None,
                safe_sequence,
            },
            RequestOutcome::Denied(reason) => Self {
                granted: false,
                reason: Some(reason),
                safe_sequence: Vec::new(),
            },
        }
    }
}

#[pymethods]
impl PyRequestOutcome {
    fn __bool__(&self) -> bool {
        self.granted
    }

    fn __repr__(&self) -> String {
        match self.reason {
            None => format!("RequestOutcome(granted, sequence={:?})", self.safe_sequence),
            Some(reason) => format!("RequestOutcome(denied: {})", reason),
        }
    }
}

/// Thread-safe allocator handle (PyO3 wrapper).
#[pyclass(name = "Allocator")]
pub struct PyAllocator {
    inner: SharedAllocator,
}

#[pymethods]
impl PyAllocator {
    /// Create an allocator.
    ///
    /// # Arguments
    /// * `config` - Resource pool and per-process maximum demands
    /// * `allocation` - Units each process already holds (defaults to none)
    /// * `verbosity` - Logging level for grant/deny decisions (0-3)
    ///
    /// # Raises
    /// * ValueError if the configuration or allocation is inconsistent
    #[new]
    #[pyo3(signature = (config, allocation=None, verbosity=0))]
    fn new(
        config: SystemConfig,
        allocation: Option<Vec<Vec<u32>>>,
        verbosity: u8,
    ) -> PyResult<Self> {
        let allocator = build_allocator(&config, allocation).map_err(value_error)?;
        Ok(Self {
            inner: SharedAllocator::new(allocator.with_verbosity(verbosity)),
        })
    }

    /// Request one unit of `resource` for `process`.
    ///
    /// # Raises
    /// * ValueError on out-of-range indices, a resource the process does not
    ///   need, or a process that has already finished
    fn try_safe_request(&self, process: usize, resource: usize) -> PyResult<PyRequestOutcome> {
        self.inner
            .try_safe_request(process, resource)
            .map(PyRequestOutcome::from)
            .map_err(value_error)
    }

    /// Mark `process` finished (and release its units) if it holds its full max.
    fn check_completion(&self, process: usize) -> PyResult<bool> {
        self.inner.check_completion(process).map_err(value_error)
    }

    fn snapshot(&self) -> Snapshot {
        self.inner.snapshot()
    }

    fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    /// A completion order for the current state, or None if unsafe.
    fn safe_sequence(&self) -> Option<Vec<usize>> {
        self.inner.safe_sequence()
    }

    fn __repr__(&self) -> String {
        let snapshot = self.inner.snapshot();
        format!(
            "Allocator(resources={}, processes={}, available={:?})",
            snapshot.resource_count(),
            snapshot.finish.len(),
            snapshot.available
        )
    }
}

/// Load a configuration file.
///
/// # Raises
/// * OSError if the file cannot be read
/// * ValueError if the contents are malformed
#[pyfunction]
#[pyo3(name = "load_config")]
fn py_load_config(path: std::path::PathBuf) -> PyResult<SystemConfig> {
    load_config(path).map_err(loader_error)
}

/// Parse configuration text.
#[pyfunction]
#[pyo3(name = "parse_config")]
fn py_parse_config(text: &str) -> PyResult<SystemConfig> {
    parse_config(text).map_err(loader_error)
}

/// Render a snapshot as console status tables.
#[pyfunction]
#[pyo3(name = "render_snapshot")]
fn py_render_snapshot(snapshot: Snapshot) -> String {
    render_snapshot(&snapshot)
}

/// Run a full simulation.
///
/// # Arguments
/// * `config` - Resource pool and per-process maximum demands
/// * `sim_config` - Driver policy (defaults to SimulationConfig())
/// * `allocation` - Units each process already holds (defaults to none)
///
/// # Returns
/// * SimulationReport with the event log and final state
///
/// # Raises
/// * ValueError if the configuration is invalid or the round limit is reached
#[pyfunction]
#[pyo3(signature = (config, sim_config=None, allocation=None))]
fn run_simulation(
    config: SystemConfig,
    sim_config: Option<SimulationConfig>,
    allocation: Option<Vec<Vec<u32>>>,
) -> PyResult<SimulationReport> {
    let allocator = build_allocator(&config, allocation).map_err(value_error)?;
    Simulation::new(allocator, sim_config.unwrap_or_default())
        .run()
        .map_err(value_error)
}

/// The banker.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<SystemConfig>()?;
    m.add_class::<Snapshot>()?;
    m.add_class::<DenialReason>()?;
    m.add_class::<PyRequestOutcome>()?;
    m.add_class::<PyAllocator>()?;
    m.add_class::<SimulationReport>()?;

    // Config types
    m.add_class::<SimulationConfig>()?;

    // Functions
    m.add_function(wrap_pyfunction!(py_load_config, m)?)?;
    m.add_function(wrap_pyfunction!(py_parse_config, m)?)?;
    m.add_function(wrap_pyfunction!(py_render_snapshot, m)?)?;
    m.add_function(wrap_pyfunction!(run_simulation, m)?)?;

    Ok(())
}
