//! Nearest-neighbour project matching and software score aggregation.
//!
//! Everything here is a pure function over in-memory data: no I/O, no
//! mutation, deterministic given identical input order. Callers load the
//! historical reference set from a [`crate::store::ProjectStore`], filter it
//! to `history` records, and hand the slice in.

use crate::errors::{DssError, DssResult};
use crate::project::ProjectRecord;
use crate::software::SOFTWARE_COUNT;

/// Default number of neighbours considered by the ranked recommendation.
pub const DEFAULT_NEIGHBOUR_THRESHOLD: usize = 5;

/// A historical project paired with its proximity to the query.
#[derive(Debug, Clone, Copy)]
pub struct Neighbour<'a> {
    pub record: &'a ProjectRecord,
    pub score: f64,
}

/// Similarity between two constraint vectors: `(1/N) * Σ (1 − |a_i − b_i|)`.
///
/// With components on the 0..=2 ordinal scale each term lies in
/// {−1, 0, 1}, so the result ranges over [−1, 1]; 1 means identical
/// vectors. Symmetric in its arguments.
///
/// Equal length is a contract precondition; mismatched or empty inputs are
/// rejected as `InvalidInput`, never silently truncated.
pub fn proximity(a: &[u8], b: &[u8]) -> DssResult<f64> {
    if a.len() != b.len() {
        return Err(DssError::invalid_input(
            "constraints",
            format!("vector lengths differ: {} vs {}", a.len(), b.len()),
        ));
    }
    if a.is_empty() {
        return Err(DssError::invalid_input(
            "constraints",
            "constraint vectors must be non-empty",
        ));
    }

    let n = a.len() as f64;
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| 1.0 - (f64::from(*x) - f64::from(*y)).abs())
        .sum();
    Ok(sum / n)
}

/// The `threshold` historical projects most similar to `query`, in
/// descending proximity order.
///
/// Ties keep the relative order of the input list (stable sort). A
/// threshold of zero, or one larger than the number of projects, clamps to
/// the available count; an empty history yields an empty list.
pub fn nearest_neighbours<'a>(
    query: &[u8],
    history: &'a [ProjectRecord],
    threshold: usize,
) -> DssResult<Vec<Neighbour<'a>>> {
    let mut scored = Vec::with_capacity(history.len());
    for record in history {
        let score = proximity(query, record.cm_restrictions.as_slice())?;
        scored.push(Neighbour { record, score });
    }

    // Scores come from integer components, so partial_cmp cannot see a NaN.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let limit = if threshold == 0 {
        scored.len()
    } else {
        threshold.min(scored.len())
    };
    scored.truncate(limit);
    Ok(scored)
}

/// Per-software support, accumulated over the top-`threshold` neighbours.
///
/// Each neighbour adds its proximity into the slot of the application it
/// used; slots of applications with no neighbour stay at zero. Scores are
/// not normalized, so magnitudes grow with the neighbour count.
pub fn software_scores(
    query: &[u8],
    history: &[ProjectRecord],
    threshold: usize,
) -> DssResult<[f64; SOFTWARE_COUNT]> {
    let mut scores = [0.0; SOFTWARE_COUNT];
    for neighbour in nearest_neighbours(query, history, threshold)? {
        scores[neighbour.record.application.as_index()] += neighbour.score;
    }
    Ok(scores)
}

/// Index and value of the largest element; the first occurrence wins on
/// ties. `None` for an empty slice.
pub fn max_score(scores: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, value) in scores.iter().enumerate() {
        match best {
            Some((_, current)) if *value <= current => {}
            _ => best = Some((index, *value)),
        }
    }
    best
}

/// Every historical project whose constraint vector equals `query`
/// element-wise, in original order. A record whose vector length differs
/// from the query simply does not match.
pub fn exact_constraint_match<'a>(
    query: &[u8],
    history: &'a [ProjectRecord],
) -> Vec<&'a ProjectRecord> {
    history
        .iter()
        .filter(|record| record.cm_restrictions.as_slice() == query)
        .collect()
}
