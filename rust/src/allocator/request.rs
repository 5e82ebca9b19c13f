//! Single-unit request protocol: provisional grant, safety check, keep or undo.

use crate::models::{DenialReason, RequestOutcome};
use crate::{log_checks, log_decisions};

use super::safety::{find_safe_sequence, format_sequence};
use super::state::{Allocator, AllocatorError};

/// Undo record for a provisional single-unit grant.
///
/// Applying moves one unit of `resource` from the free pool to `process`;
/// reverting applies the exact inverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ProvisionalGrant {
    process: usize,
    resource: usize,
}

impl ProvisionalGrant {
    fn apply(self, allocator: &mut Allocator) {
        allocator.available[self.resource] -= 1;
        *allocator.allocation.get_mut(self.process, self.resource) += 1;
        *allocator.need.get_mut(self.process, self.resource) -= 1;
    }

    fn revert(self, allocator: &mut Allocator) {
        allocator.available[self.resource] += 1;
        *allocator.allocation.get_mut(self.process, self.resource) -= 1;
        *allocator.need.get_mut(self.process, self.resource) += 1;
    }
}

impl Allocator {
    /// Request one unit of `resource` for `process`.
    ///
    /// Grants only if the resulting state is safe. A denial leaves the state
    /// exactly as it was. Asking for a resource the process does not need, or
    /// asking on behalf of a finished process, is a caller bug and returns `Err`.
    pub fn try_safe_request(
        &mut self,
        process: usize,
        resource: usize,
    ) -> Result<RequestOutcome, AllocatorError> {
        self.check_process(process)?;
        self.check_resource(resource)?;
        if self.finish[process] {
            return Err(AllocatorError::ProcessFinished(process));
        }
        if self.need.get(process, resource) == 0 {
            return Err(AllocatorError::ResourceNotNeeded { process, resource });
        }

        log_checks!(
            self.verbosity,
            "Process {} requested resource {}",
            process,
            resource
        );

        if self.available[resource] == 0 {
            log_decisions!(
                self.verbosity,
                "Process {} resource {} -DENIED (unavailable resources)",
                process,
                resource
            );
            return Ok(RequestOutcome::Denied(DenialReason::ResourceUnavailable));
        }

        let grant = ProvisionalGrant { process, resource };
        grant.apply(self);

        match find_safe_sequence(
            &self.available,
            &self.allocation,
            &self.need,
            &self.finish,
            self.verbosity,
        ) {
            Some(safe_sequence) => {
                log_decisions!(
                    self.verbosity,
                    "Process {} resource {} -GRANTED (sequence {})",
                    process,
                    resource,
                    format_sequence(&safe_sequence)
                );
                Ok(RequestOutcome::Granted { safe_sequence })
            }
            None => {
                grant.revert(self);
                log_decisions!(
                    self.verbosity,
                    "Process {} resource {} -DENIED (unsafe state)",
                    process,
                    resource
                );
                Ok(RequestOutcome::Denied(DenialReason::UnsafeState))
            }
        }
    }
}
