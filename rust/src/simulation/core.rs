//! Round-based simulation driver.

use chrono::TimeDelta;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::allocator::{Allocator, AllocatorError};
use crate::config::SimulationConfig;
use crate::models::{DenialReason, RequestOutcome};
use crate::{log_checks, log_decisions};

use super::events::{SimulationEvent, SimulationReport};
use super::rng::XorShift64;

/// Errors that can occur while running a simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Allocator(#[from] AllocatorError),
    #[error("Round limit {rounds} reached with processes {unfinished:?} still running")]
    RoundLimitExceeded { rounds: u64, unfinished: Vec<usize> },
}

/// Drives an [`Allocator`] with random single-unit requests until every process finishes.
///
/// Each round visits the unfinished processes in index order. On its turn a
/// process pauses for a random simulated interval, asks (with the configured
/// probability) for one unit of each resource it still needs, and then checks
/// whether it has completed. Time is simulated on a clock; nothing sleeps.
pub struct Simulation {
    allocator: Allocator,
    config: SimulationConfig,
    rng: XorShift64,
    clock: TimeDelta,
    round: u64,
    events: Vec<SimulationEvent>,
    completion_order: Vec<usize>,
    grants: u64,
    unavailable_denials: u64,
    unsafe_denials: u64,
    denials_by_process: FxHashMap<usize, u32>,
}

impl Simulation {
    /// Create a driver. The allocator inherits the configured verbosity.
    pub fn new(mut allocator: Allocator, config: SimulationConfig) -> Self {
        allocator.set_verbosity(config.verbosity);
        let rng = XorShift64::new(config.seed);
        Self {
            allocator,
            config,
            rng,
            clock: TimeDelta::zero(),
            round: 0,
            events: Vec::new(),
            completion_order: Vec::new(),
            grants: 0,
            unavailable_denials: 0,
            unsafe_denials: 0,
            denials_by_process: FxHashMap::default(),
        }
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// Simulated time elapsed so far.
    pub fn elapsed(&self) -> TimeDelta {
        self.clock
    }

    pub fn events(&self) -> &[SimulationEvent] {
        &self.events
    }

    /// Run rounds until every process has finished.
    pub fn run(mut self) -> Result<SimulationReport, SimulationError> {
        let verbosity = self.config.verbosity;
        while !self.allocator.is_complete() {
            if let Some(max_rounds) = self.config.max_rounds {
                if self.round >= max_rounds {
                    let unfinished = self.allocator.snapshot().running().collect();
                    return Err(SimulationError::RoundLimitExceeded {
                        rounds: self.round,
                        unfinished,
                    });
                }
            }
            let running = self.run_round()?;
            log_checks!(
                verbosity,
                "Round {} complete, running: {} processes of {}",
                self.round,
                running,
                self.allocator.process_count()
            );
        }

        log_decisions!(verbosity, "All processes finished without deadlock.");
        Ok(self.into_report())
    }

    /// One turn for every unfinished process. Returns how many took a turn.
    pub fn run_round(&mut self) -> Result<usize, SimulationError> {
        self.round += 1;
        let mut running = 0;
        for process in 0..self.allocator.process_count() {
            if !self.allocator.is_finished(process) {
                running += 1;
                self.run_turn(process)?;
            }
        }
        Ok(running)
    }

    fn run_turn(&mut self, process: usize) -> Result<(), AllocatorError> {
        self.pause();

        for resource in 0..self.allocator.resource_count() {
            if self.allocator.need(process)[resource] == 0
                || !self.rng.chance(self.config.request_percent)
            {
                continue;
            }
            let outcome = self.allocator.try_safe_request(process, resource)?;
            self.record_request(process, resource, outcome);
        }

        if self.allocator.check_completion(process)? {
            self.completion_order.push(process);
            self.events.push(SimulationEvent::Completed {
                at: self.clock,
                round: self.round,
                process,
            });
            // Returning the resources takes time too
            self.pause();
        }
        Ok(())
    }

    fn record_request(&mut self, process: usize, resource: usize, outcome: RequestOutcome) {
        let event = match outcome {
            RequestOutcome::Granted { .. } => {
                self.grants += 1;
                SimulationEvent::Granted {
                    at: self.clock,
                    round: self.round,
                    process,
                    resource,
                }
            }
            RequestOutcome::Denied(reason) => {
                match reason {
                    DenialReason::ResourceUnavailable => self.unavailable_denials += 1,
                    DenialReason::UnsafeState => self.unsafe_denials += 1,
                }
                *self.denials_by_process.entry(process).or_insert(0) += 1;
                SimulationEvent::Denied {
                    at: self.clock,
                    round: self.round,
                    process,
                    resource,
                    reason,
                }
            }
        };
        self.events.push(event);
    }

    fn pause(&mut self) {
        let secs = self.rng.below(u64::from(self.config.max_wait_secs));
        self.clock = self.clock + TimeDelta::seconds(secs as i64);
    }

    fn into_report(self) -> SimulationReport {
        SimulationReport {
            rounds: self.round,
            elapsed: self.clock,
            completion_order: self.completion_order,
            grants: self.grants,
            unavailable_denials: self.unavailable_denials,
            unsafe_denials: self.unsafe_denials,
            denials_by_process: self.denials_by_process,
            final_snapshot: self.allocator.snapshot(),
            events: self.events,
        }
    }
}
