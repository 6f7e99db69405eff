//! Harris corner detection.
//!
//! Pipeline: Sobel gradients → structure tensor smoothed by a separable
//! Gaussian → cornerness `det - 0.06·trace²` → windowed non-max
//! suppression → strict threshold.

pub mod builder;
pub mod detector;
pub mod error;
pub mod response;
pub mod structure;
pub mod types;

pub use builder::DetectorBuilder;
pub use detector::{collect_corners, HarrisDetector};
pub use error::{HarrisError, HarrisResult};
pub use response::{cornerness_response, is_local_max, nms_image, ALPHA};
pub use structure::{smooth_image, structure_matrix};
pub use types::Corner;
