//! Core data types shared by the allocator, loader, report and simulation driver.

use pyo3::prelude::*;

use crate::allocator::AllocatorError;

/// Initial system configuration: resource pool and declared maximum demands.
///
/// This is the already-parsed form of a configuration file. Dimensions are
/// carried explicitly so that a mismatch between the declared counts and the
/// supplied vectors can be reported instead of guessed.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemConfig {
    /// Number of resource types
    #[pyo3(get, set)]
    pub resource_count: usize,
    /// Number of processes
    #[pyo3(get, set)]
    pub process_count: usize,
    /// Unallocated instances of each resource type
    #[pyo3(get, set)]
    pub available: Vec<u32>,
    /// Declared maximum demand, one row per process
    #[pyo3(get, set)]
    pub max: Vec<Vec<u32>>,
}

impl SystemConfig {
    /// Build a configuration, inferring the counts from the supplied vectors.
    pub fn from_parts(available: Vec<u32>, max: Vec<Vec<u32>>) -> Self {
        Self {
            resource_count: available.len(),
            process_count: max.len(),
            available,
            max,
        }
    }

    /// Check counts and dimensions.
    pub fn validate(&self) -> Result<(), AllocatorError> {
        if self.resource_count == 0 {
            return Err(AllocatorError::InvalidConfig(
                "resource count must be positive".to_string(),
            ));
        }
        if self.process_count == 0 {
            return Err(AllocatorError::InvalidConfig(
                "process count must be positive".to_string(),
            ));
        }
        if self.available.len() != self.resource_count {
            return Err(AllocatorError::InvalidConfig(format!(
                "available has {} entries, expected {}",
                self.available.len(),
                self.resource_count
            )));
        }
        if self.max.len() != self.process_count {
            return Err(AllocatorError::InvalidConfig(format!(
                "max has {} rows, expected {}",
                self.max.len(),
                self.process_count
            )));
        }
        for (process, row) in self.max.iter().enumerate() {
            if row.len() != self.resource_count {
                return Err(AllocatorError::InvalidConfig(format!(
                    "max row for process {} has {} entries, expected {}",
                    process,
                    row.len(),
                    self.resource_count
                )));
            }
        }
        Ok(())
    }
}

#[pymethods]
impl SystemConfig {
    #[new]
    #[pyo3(signature = (available, max, resource_count=None, process_count=None))]
    fn new(
        available: Vec<u32>,
        max: Vec<Vec<u32>>,
        resource_count: Option<usize>,
        process_count: Option<usize>,
    ) -> Self {
        let inferred = Self::from_parts(available, max);
        Self {
            resource_count: resource_count.unwrap_or(inferred.resource_count),
            process_count: process_count.unwrap_or(inferred.process_count),
            ..inferred
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SystemConfig(resources={}, processes={}, available={:?})",
            self.resource_count, self.process_count, self.available
        )
    }
}

/// Read-only copy of the committed allocator state.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    #[pyo3(get)]
    pub available: Vec<u32>,
    #[pyo3(get)]
    pub allocation: Vec<Vec<u32>>,
    #[pyo3(get)]
    pub need: Vec<Vec<u32>>,
    #[pyo3(get)]
    pub max: Vec<Vec<u32>>,
    #[pyo3(get)]
    pub finish: Vec<bool>,
}

impl Snapshot {
    /// Number of resource types.
    pub fn resource_count(&self) -> usize {
        self.available.len()
    }

    /// Indices of processes that have not finished yet.
    pub fn running(&self) -> impl Iterator<Item = usize> + '_ {
        self.finish
            .iter()
            .enumerate()
            .filter(|&(_, &done)| !done)
            .map(|(p, _)| p)
    }
}

#[pymethods]
impl Snapshot {
    fn __repr__(&self) -> String {
        format!(
            "Snapshot(available={:?}, finished={}/{})",
            self.available,
            self.finish.iter().filter(|&&f| f).count(),
            self.finish.len()
        )
    }
}

/// Why a single-unit request was refused.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DenialReason {
    /// No unallocated instance of the resource exists right now.
    ResourceUnavailable,
    /// Granting would leave no order in which every process can finish.
    UnsafeState,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::ResourceUnavailable => write!(f, "unavailable resources"),
            DenialReason::UnsafeState => write!(f, "unsafe state"),
        }
    }
}

/// Outcome of a single-unit request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The unit was allocated. Carries the completion order the safety scan found.
    Granted { safe_sequence: Vec<usize> },
    /// The request was refused; state is unchanged.
    Denied(DenialReason),
}

impl RequestOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, RequestOutcome::Granted { .. })
    }

    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            RequestOutcome::Granted { .. } => None,
            RequestOutcome::Denied(reason) => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_infers_counts() {
        let config = SystemConfig::from_parts(vec![3, 3, 2], vec![vec![7, 5, 3], vec![3, 2, 2]]);
        assert_eq!(config.resource_count, 3);
        assert_eq!(config.process_count, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        let no_resources = SystemConfig::from_parts(vec![], vec![vec![]]);
        assert!(matches!(
            no_resources.validate(),
            Err(AllocatorError::InvalidConfig(_))
        ));

        let no_processes = SystemConfig::from_parts(vec![1], vec![]);
        assert!(matches!(
            no_processes.validate(),
            Err(AllocatorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_ragged_max() {
        let config = SystemConfig::from_parts(vec![1, 1], vec![vec![1, 1], vec![1]]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("process 1"));
    }

    #[test]
    fn test_validate_rejects_declared_count_mismatch() {
        let mut config = SystemConfig::from_parts(vec![1, 1], vec![vec![1, 1]]);
        config.resource_count = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_snapshot_running() {
        let snapshot = Snapshot {
            available: vec![1],
            allocation: vec![vec![0], vec![0], vec![0]],
            need: vec![vec![1], vec![0], vec![1]],
            max: vec![vec![1], vec![0], vec![1]],
            finish: vec![false, true, false],
        };
        assert_eq!(snapshot.running().collect::<Vec<_>>(), vec![0, 2]);
    }
}
