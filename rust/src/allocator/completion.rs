//! Completion detection and full release.

use crate::log_decisions;

use super::state::{Allocator, AllocatorError};

impl Allocator {
    /// Mark `process` finished if it holds its full declared maximum.
    ///
    /// On first detection every unit it holds goes back to the free pool. The
    /// allocation row is left in place as a record of what the process held.
    /// Calling again on a finished process returns `true` and releases nothing.
    pub fn check_completion(&mut self, process: usize) -> Result<bool, AllocatorError> {
        self.check_process(process)?;
        if self.finish[process] {
            return Ok(true);
        }

        let satisfied = self
            .allocation
            .row(process)
            .iter()
            .zip(self.max.row(process))
            .all(|(held, max)| held >= max);
        if !satisfied {
            return Ok(false);
        }

        for (free, held) in self.available.iter_mut().zip(self.allocation.row(process)) {
            *free += held;
        }
        self.finish[process] = true;

        log_decisions!(
            self.verbosity,
            "Process {} has completed! Available now {:?}",
            process,
            self.available
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::allocator::{Allocator, AllocatorError};
    use crate::models::SystemConfig;

    #[test]
    fn test_completion_releases_row() {
        let config = SystemConfig::from_parts(vec![1, 2], vec![vec![2, 1], vec![1, 1]]);
        let mut allocator = Allocator::with_allocation(&config, &[vec![2, 1], vec![0, 0]]).unwrap();

        assert!(allocator.check_completion(0).unwrap());
        assert_eq!(allocator.available(), &[3, 3]);
        assert!(allocator.is_finished(0));
        assert!(!allocator.is_complete());
        // Row is kept as history
        assert_eq!(allocator.allocation(0), &[2, 1]);
    }

    #[test]
    fn test_completion_is_idempotent() {
        let config = SystemConfig::from_parts(vec![0], vec![vec![3]]);
        let mut allocator = Allocator::with_allocation(&config, &[vec![3]]).unwrap();

        assert!(allocator.check_completion(0).unwrap());
        assert_eq!(allocator.available(), &[3]);
        assert!(allocator.check_completion(0).unwrap());
        assert_eq!(allocator.available(), &[3]);
        assert!(allocator.is_complete());
    }

    #[test]
    fn test_incomplete_process_untouched() {
        let config = SystemConfig::from_parts(vec![1, 1], vec![vec![1, 1]]);
        let mut allocator = Allocator::with_allocation(&config, &[vec![0, 1]]).unwrap();
        let before = allocator.snapshot();

        assert!(!allocator.check_completion(0).unwrap());
        assert_eq!(allocator.snapshot(), before);
    }

    #[test]
    fn test_zero_max_completes_immediately() {
        let config = SystemConfig::from_parts(vec![4], vec![vec![0]]);
        let mut allocator = Allocator::new(&config).unwrap();
        assert!(allocator.check_completion(0).unwrap());
        assert_eq!(allocator.available(), &[4]);
    }

    #[test]
    fn test_out_of_range() {
        let config = SystemConfig::from_parts(vec![1], vec![vec![1]]);
        let mut allocator = Allocator::new(&config).unwrap();
        assert!(matches!(
            allocator.check_completion(1),
            Err(AllocatorError::ProcessOutOfRange { .. })
        ));
    }
}
