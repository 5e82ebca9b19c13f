//! Allocator state: the matrices, their invariants, and initialization.

use thiserror::Error;

use crate::logging::VERBOSITY_SILENT;
use crate::log_debug;
use crate::models::{Snapshot, SystemConfig};

use super::matrix::CountMatrix;

/// Errors raised by the allocator.
///
/// `InvalidConfig` is fatal at initialization. The remaining variants are caller
/// bugs: the driver asked for something the protocol does not allow. Request
/// denials are not errors; see [`crate::models::RequestOutcome`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocatorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Process {process} out of range (process count {process_count})")]
    ProcessOutOfRange {
        process: usize,
        process_count: usize,
    },
    #[error("Resource {resource} out of range (resource count {resource_count})")]
    ResourceOutOfRange {
        resource: usize,
        resource_count: usize,
    },
    #[error("Process {process} does not need resource {resource}")]
    ResourceNotNeeded { process: usize, resource: usize },
    #[error("Process {0} has already finished")]
    ProcessFinished(usize),
}

/// Owner of all simulation state and the safety algorithm.
///
/// Invariants at every observable state:
/// - `need[p][r] == max[p][r] - allocation[p][r]`
/// - `available[r] + sum(allocation[p][r] for unfinished p)` is constant
/// - `finish[p]` only ever goes from false to true
#[derive(Clone, Debug)]
pub struct Allocator {
    pub(super) resource_count: usize,
    pub(super) process_count: usize,
    pub(super) available: Vec<u32>,
    pub(super) allocation: CountMatrix,
    pub(super) max: CountMatrix,
    pub(super) need: CountMatrix,
    pub(super) finish: Vec<bool>,
    pub(super) verbosity: u8,
}

impl Allocator {
    /// Create an allocator with nothing allocated yet.
    pub fn new(config: &SystemConfig) -> Result<Self, AllocatorError> {
        config.validate()?;
        let allocation = CountMatrix::zeros(config.process_count, config.resource_count);
        Self::build(config, allocation)
    }

    /// Create an allocator whose processes already hold some units.
    ///
    /// `config.available` is the unallocated pool, not the system total.
    pub fn with_allocation(
        config: &SystemConfig,
        allocation: &[Vec<u32>],
    ) -> Result<Self, AllocatorError> {
        config.validate()?;
        if allocation.len() != config.process_count {
            return Err(AllocatorError::InvalidConfig(format!(
                "allocation has {} rows, expected {}",
                allocation.len(),
                config.process_count
            )));
        }
        for (process, (held, max)) in allocation.iter().zip(&config.max).enumerate() {
            if held.len() != config.resource_count {
                return Err(AllocatorError::InvalidConfig(format!(
                    "allocation row for process {} has {} entries, expected {}",
                    process,
                    held.len(),
                    config.resource_count
                )));
            }
            if let Some(resource) = held.iter().zip(max).position(|(h, m)| h > m) {
                return Err(AllocatorError::InvalidConfig(format!(
                    "process {} holds {} of resource {} but declared max {}",
                    process, held[resource], resource, max[resource]
                )));
            }
        }
        let allocation = CountMatrix::from_rows(allocation, config.resource_count);
        Self::build(config, allocation)
    }

    fn build(config: &SystemConfig, allocation: CountMatrix) -> Result<Self, AllocatorError> {
        // Totals must fit so that releases during the safety scan cannot overflow
        for resource in 0..config.resource_count {
            let mut total = config.available[resource];
            for process in 0..config.process_count {
                total = total
                    .checked_add(allocation.get(process, resource))
                    .ok_or_else(|| {
                        AllocatorError::InvalidConfig(format!(
                            "total instances of resource {} overflow",
                            resource
                        ))
                    })?;
            }
        }

        let max = CountMatrix::from_rows(&config.max, config.resource_count);
        let mut allocator = Self {
            resource_count: config.resource_count,
            process_count: config.process_count,
            available: config.available.clone(),
            need: CountMatrix::zeros(config.process_count, config.resource_count),
            allocation,
            max,
            finish: vec![false; config.process_count],
            verbosity: VERBOSITY_SILENT,
        };
        for process in 0..allocator.process_count {
            allocator.update_need(process);
        }
        Ok(allocator)
    }

    /// Set logging verbosity (see [`crate::logging`]).
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn set_verbosity(&mut self, verbosity: u8) {
        self.verbosity = verbosity;
    }

    /// Recompute `need` for one process from `max - allocation`.
    pub(super) fn update_need(&mut self, process: usize) {
        for resource in 0..self.resource_count {
            *self.need.get_mut(process, resource) =
                self.max.get(process, resource) - self.allocation.get(process, resource);
        }
        log_debug!(
            self.verbosity,
            "  Need[P{}] = {:?}",
            process,
            self.need.row(process)
        );
    }

    pub(super) fn check_process(&self, process: usize) -> Result<(), AllocatorError> {
        if process >= self.process_count {
            return Err(AllocatorError::ProcessOutOfRange {
                process,
                process_count: self.process_count,
            });
        }
        Ok(())
    }

    pub(super) fn check_resource(&self, resource: usize) -> Result<(), AllocatorError> {
        if resource >= self.resource_count {
            return Err(AllocatorError::ResourceOutOfRange {
                resource,
                resource_count: self.resource_count,
            });
        }
        Ok(())
    }

    pub fn resource_count(&self) -> usize {
        self.resource_count
    }

    pub fn process_count(&self) -> usize {
        self.process_count
    }

    pub fn available(&self) -> &[u32] {
        &self.available
    }

    pub fn allocation(&self, process: usize) -> &[u32] {
        self.allocation.row(process)
    }

    pub fn need(&self, process: usize) -> &[u32] {
        self.need.row(process)
    }

    pub fn max(&self, process: usize) -> &[u32] {
        self.max.row(process)
    }

    pub fn is_finished(&self, process: usize) -> bool {
        self.finish[process]
    }

    /// True once every process has finished.
    pub fn is_complete(&self) -> bool {
        self.finish.iter().all(|&f| f)
    }

    /// Units of each resource that are either free or held by a running process.
    ///
    /// Constant across every grant, denial and completion.
    pub fn total_instances(&self) -> Vec<u32> {
        let mut total = self.available.clone();
        for process in (0..self.process_count).filter(|&p| !self.finish[p]) {
            for (t, held) in total.iter_mut().zip(self.allocation.row(process)) {
                *t += held;
            }
        }
        total
    }

    /// Copy of the committed state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            available: self.available.clone(),
            allocation: self.allocation.to_rows(),
            need: self.need.to_rows(),
            max: self.max.to_rows(),
            finish: self.finish.clone(),
        }
    }
}
