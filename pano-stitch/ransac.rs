use pano_core::Match;
use rand::seq::SliceRandom;
use rand::Rng;
use crate::error::{StitchError, StitchResult};
use crate::homography::{compute_homography, Homography, MIN_CORRESPONDENCES};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RansacConfig {
    /// Reprojection distance below which a match is an inlier
    pub inlier_threshold: f32,
    /// Maximum number of minimal samples drawn
    pub iterations: usize,
    /// Stop once the best model has more inliers than this
    pub cutoff: usize,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            inlier_threshold: 2.0,
            iterations: 10_000,
            cutoff: 30,
        }
    }
}

impl RansacConfig {
    pub fn validate(&self) -> StitchResult<()> {
        if !self.inlier_threshold.is_finite() || self.inlier_threshold <= 0.0 {
            return Err(StitchError::InvalidThreshold(self.inlier_threshold));
        }
        Ok(())
    }
}

/// Best model found by [`ransac`]
#[derive(Debug, Clone)]
pub struct RansacFit {
    pub homography: Homography,
    pub inliers: usize,
    /// Input matches reordered so the `inliers` come first
    pub matches: Vec<Match>,
}

fn is_inlier(h: &Homography, m: &Match, thresh: f32) -> bool {
    h.project(m.point_a)
        .map_or(false, |p| p.distance(&m.point_b) < thresh)
}

/// Matches whose `point_a` lands within `thresh` of `point_b` under `h`
pub fn count_inliers(h: &Homography, matches: &[Match], thresh: f32) -> usize {
    matches.iter().filter(|m| is_inlier(h, m, thresh)).count()
}

/// Copy of `matches` with inliers first, both groups in input order, and
/// the inlier count.
pub fn partition_inliers(h: &Homography, matches: &[Match], thresh: f32) -> (Vec<Match>, usize) {
    let (mut inliers, outliers): (Vec<Match>, Vec<Match>) =
        matches.iter().partition(|m| is_inlier(h, m, thresh));
    let count = inliers.len();
    inliers.extend(outliers);
    (inliers, count)
}

/// Fisher-Yates shuffled copy of `matches`
pub fn shuffle_matches<R: Rng + ?Sized>(matches: &[Match], rng: &mut R) -> Vec<Match> {
    let mut shuffled = matches.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Least-squares fit on all of `inliers`, or `candidate` when that system
/// is degenerate
fn refit(candidate: Homography, inliers: &[Match]) -> Homography {
    compute_homography(inliers).unwrap_or(candidate)
}

/// Robust homography fit by random sampling.
///
/// Starts from `fallback` and replaces it only with a 4-point model that
/// has strictly more inliers (and at least 4). An accepted model is refit
/// on all of its inliers; if that refit is degenerate the 4-point model is
/// kept. Stops after `config.iterations` samples or once the best model has
/// more than `config.cutoff` inliers. The caller's slice is left untouched.
pub fn ransac<R: Rng + ?Sized>(
    matches: &[Match],
    config: &RansacConfig,
    fallback: Homography,
    rng: &mut R,
) -> StitchResult<RansacFit> {
    if matches.len() < MIN_CORRESPONDENCES {
        return Err(StitchError::TooFewMatches {
            needed: MIN_CORRESPONDENCES,
            got: matches.len(),
        });
    }
    config.validate()?;

    let thresh = config.inlier_threshold;
    let mut best = fallback;
    let mut best_inliers = count_inliers(&best, matches, thresh);
    let mut working = matches.to_vec();

    for iteration in 0..config.iterations {
        working = shuffle_matches(&working, rng);
        let candidate = match compute_homography(&working[..MIN_CORRESPONDENCES]) {
            Ok(h) => h,
            Err(_) => continue,
        };

        let (partitioned, inliers) = partition_inliers(&candidate, &working, thresh);
        if inliers <= best_inliers || inliers < MIN_CORRESPONDENCES {
            continue;
        }

        best = refit(candidate, &partitioned[..inliers]);
        best_inliers = count_inliers(&best, matches, thresh);
        log::debug!(
            "RANSAC iteration {}: {} inliers of {}",
            iteration,
            best_inliers,
            matches.len()
        );

        if best_inliers > config.cutoff {
            break;
        }
    }

    let (partitioned, inliers) = partition_inliers(&best, matches, thresh);
    Ok(RansacFit {
        homography: best,
        inliers,
        matches: partitioned,
    })
}
