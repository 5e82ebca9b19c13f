//! Console status tables for a snapshot.

use std::fmt::Write;

use crate::models::Snapshot;

/// Render the snapshot as tab-separated tables.
///
/// Available is shown for every resource type; Allocation, Max and Need list
/// only processes that are still running.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let header = resource_header(snapshot.resource_count());

    out.push_str("    == Current system resources ==\n");
    out.push_str("  === Available ===\n");
    out.push_str(&header);
    let _ = writeln!(out, "\t{}", join_row(&snapshot.available));

    for (title, matrix) in [
        ("Allocation", &snapshot.allocation),
        ("Max", &snapshot.max),
        ("Need", &snapshot.need),
    ] {
        let _ = writeln!(out, "  === {} ===", title);
        out.push_str(&header);
        for process in snapshot.running() {
            let _ = writeln!(out, "P{}\t{}", process, join_row(&matrix[process]));
        }
    }
    out
}

fn resource_header(resource_count: usize) -> String {
    let mut header = String::new();
    for resource in 0..resource_count {
        let _ = write!(header, "\tR{}", resource);
    }
    header.push('\n');
    header
}

fn join_row(row: &[u32]) -> String {
    row.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            available: vec![3, 1],
            allocation: vec![vec![1, 0], vec![2, 2]],
            need: vec![vec![0, 1], vec![0, 0]],
            max: vec![vec![1, 1], vec![2, 2]],
            finish: vec![false, true],
        }
    }

    #[test]
    fn test_render_tables() {
        let text = render_snapshot(&snapshot());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "  === Available ===");
        assert_eq!(lines[2], "\tR0\tR1");
        assert_eq!(lines[3], "\t3\t1");
        assert!(text.contains("  === Allocation ===\n\tR0\tR1\nP0\t1\t0\n"));
        assert!(text.contains("  === Need ===\n\tR0\tR1\nP0\t0\t1\n"));
    }

    #[test]
    fn test_finished_processes_hidden() {
        let text = render_snapshot(&snapshot());
        assert!(!text.contains("P1"));
    }
}
