//! Find/replace over the engine's circular find-next protocol.
//!
//! `find` yields the first match; `find_next` wraps past the end of the range
//! back to the first match. Iteration therefore terminates when the returned
//! cell's (row, column) equals the coordinates of the first match. Only the
//! coordinates are compared, matching the observed behavior of the host
//! protocol; the iteration cap exists solely to bound a misbehaving engine
//! that never re-signals the first cell.

use crate::engine::{EngineError, Range};
use crate::model::CellMatch;

pub const MAX_FIND_ITERATIONS: usize = 10_000;

/// Result of one full find cycle.
#[derive(Debug)]
pub struct FindScan {
    pub matches: Vec<CellMatch>,
    /// True when the iteration cap stopped the scan instead of the sentinel.
    pub cap_hit: bool,
}

/// Collect every match for `text` in one cycle of the find protocol.
pub fn scan_matches(range: &dyn Range, text: &str) -> Result<FindScan, EngineError> {
    scan_matches_capped(range, text, MAX_FIND_ITERATIONS)
}

pub fn scan_matches_capped(
    range: &dyn Range,
    text: &str,
    cap: usize,
) -> Result<FindScan, EngineError> {
    let mut matches = Vec::new();
    let Some(first) = range.find(text)? else {
        return Ok(FindScan {
            matches,
            cap_hit: false,
        });
    };

    let sentinel = (first.row, first.column);
    let mut current = first;
    let mut cap_hit = false;
    loop {
        matches.push(current.clone());
        if matches.len() >= cap {
            cap_hit = true;
            tracing::warn!(
                text,
                iterations = matches.len(),
                "find iteration cap reached, aborting scan"
            );
            break;
        }
        match range.find_next(text, &current)? {
            None => break,
            Some(next) => {
                if (next.row, next.column) == sentinel {
                    break;
                }
                current = next;
            }
        }
    }

    Ok(FindScan { matches, cap_hit })
}

/// Replace `search` with `replace` across the range, reporting how many cells
/// matched.
///
/// The count comes from a collection pass rather than the engine's own
/// replace result, and the bulk replace is only issued when something
/// actually matched.
pub fn replace_with_count(
    range: &dyn Range,
    search: &str,
    replace: &str,
) -> Result<usize, EngineError> {
    let scan = scan_matches(range, search)?;
    let count = scan.matches.len();
    if count > 0 {
        range.replace(search, replace)?;
    }
    Ok(count)
}
