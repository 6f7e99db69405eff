use std::collections::HashSet;

use pano_core::{Descriptor, Match};
use rayon::prelude::*;
use crate::{DescribeError, DescribeResult};

/// Sum of absolute differences
pub fn l1_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// Greedy one-to-one matching of `a` against `b`.
///
/// Each descriptor in `a` keeps its single nearest neighbour in `b` (L1,
/// first index wins ties). Candidates are then taken in ascending distance
/// and a candidate is dropped when its `b` descriptor was already claimed.
/// Not a minimum-cost assignment: an `a` whose favourite is taken gets no
/// second choice.
pub fn match_descriptors(a: &[Descriptor], b: &[Descriptor]) -> DescribeResult<Vec<Match>> {
    if a.is_empty() || b.is_empty() {
        return Ok(Vec::new());
    }

    let len = b[0].features.len();
    if let Some(bad) = a.iter().chain(b).find(|d| d.features.len() != len) {
        return Err(DescribeError::FeatureLengthMismatch {
            left: len,
            right: bad.features.len(),
        });
    }

    let mut candidates: Vec<Match> = a
        .par_iter()
        .enumerate()
        .map(|(i, da)| {
            let mut best = 0;
            let mut best_distance = f32::INFINITY;
            for (j, db) in b.iter().enumerate() {
                let d = l1_distance(&da.features, &db.features);
                if d < best_distance {
                    best = j;
                    best_distance = d;
                }
            }
            Match {
                index_a: i,
                index_b: best,
                point_a: da.location,
                point_b: b[best].location,
                distance: best_distance,
            }
        })
        .collect();

    // Stable, so equal distances keep `a` order
    candidates.sort_by(|x, y| x.distance.total_cmp(&y.distance));

    let mut claimed = HashSet::with_capacity(candidates.len());
    let matches: Vec<Match> = candidates
        .into_iter()
        .filter(|m| claimed.insert(m.index_b))
        .collect();

    log::debug!("{} injective matches from {} x {} descriptors", matches.len(), a.len(), b.len());
    Ok(matches)
}
