//! Safety check: can every unfinished process still run to completion?
//!
//! The scan simulates hypothetical completions against a working copy of the
//! available pool. A process whose whole remaining need fits in the pool is
//! assumed to finish and hand back everything it holds; the scan then starts
//! over from process 0, since the released units may unblock a process that
//! was skipped earlier. The state is safe iff every process gets marked.

use crate::log_debug;

use super::matrix::CountMatrix;
use super::state::Allocator;

/// Whether `need` fits component-wise in `work`.
#[inline]
fn fits(need: &[u32], work: &[u32]) -> bool {
    need.iter().zip(work).all(|(n, w)| n <= w)
}

/// Find a completion order for every process not already in `finish`.
///
/// Returns `None` when some process can never be satisfied. The returned
/// sequence lists only processes that were unfinished at scan start, in the
/// order the scan marked them. Scan order is strictly ascending process index
/// with a restart after each discovery.
pub(super) fn find_safe_sequence(
    available: &[u32],
    allocation: &CountMatrix,
    need: &CountMatrix,
    finish: &[bool],
    verbosity: u8,
) -> Option<Vec<usize>> {
    let mut work = available.to_vec();
    let mut done = finish.to_vec();
    let mut sequence = Vec::with_capacity(done.iter().filter(|&&d| !d).count());

    let mut process = 0;
    while process < done.len() {
        if !done[process] && fits(need.row(process), &work) {
            done[process] = true;
            for (w, held) in work.iter_mut().zip(allocation.row(process)) {
                *w += held;
            }
            sequence.push(process);
            log_debug!(
                verbosity,
                "  P{} can finish, work now {:?}",
                process,
                work
            );
            process = 0;
            continue;
        }
        process += 1;
    }

    if done.iter().all(|&d| d) {
        log_debug!(verbosity, "  Safe sequence: {}", format_sequence(&sequence));
        Some(sequence)
    } else {
        log_debug!(
            verbosity,
            "  No safe sequence, stuck: {:?}",
            done.iter()
                .enumerate()
                .filter(|&(_, &d)| !d)
                .map(|(p, _)| p)
                .collect::<Vec<_>>()
        );
        None
    }
}

/// Render a sequence as `P1->P3->P4`.
pub fn format_sequence(sequence: &[usize]) -> String {
    sequence
        .iter()
        .map(|p| format!("P{}", p))
        .collect::<Vec<_>>()
        .join("->")
}

impl Allocator {
    /// A completion order for the committed state, if one exists.
    pub fn safe_sequence(&self) -> Option<Vec<usize>> {
        find_safe_sequence(
            &self.available,
            &self.allocation,
            &self.need,
            &self.finish,
            self.verbosity,
        )
    }

    /// Whether the committed state is safe.
    pub fn is_safe(&self) -> bool {
        self.safe_sequence().is_some()
    }
}
