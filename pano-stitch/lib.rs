//! Geometry half of the stitcher: DLT homography fitting, RANSAC over
//! descriptor matches and projective compositing of the image pair.

pub mod compose;
pub mod error;
pub mod homography;
pub mod ransac;

pub use compose::{combine_images, Composite, CompositeStatus, MAX_CANVAS};
pub use error::{HomographyError, HomographyResult, StitchError, StitchResult};
pub use homography::{compute_homography, Homography, MIN_CORRESPONDENCES};
pub use ransac::{count_inliers, partition_inliers, ransac, shuffle_matches, RansacConfig, RansacFit};
