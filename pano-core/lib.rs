pub mod error;
pub mod filter;
pub mod image;

pub use error::{CoreError, CoreResult};
pub use image::Image;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2-D location in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Appearance vector anchored at a corner location
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub location: Point,
    pub features: Vec<f32>,
}

/// Correspondence between descriptor `index_a` of the first set and
/// `index_b` of the second. `distance` is the feature-space distance at
/// match time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub index_a: usize,
    pub index_b: usize,
    pub point_a: Point,
    pub point_b: Point,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HarrisConfig {
    /// Gaussian scale used to smooth the structure tensor
    pub sigma: f32,
    /// Minimum cornerness (exclusive)
    pub threshold: f32,
    /// Half-width of the non-max suppression window
    pub nms: usize,
    /// Odd side length of the descriptor patch
    pub descriptor_window: usize,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            threshold: 5.0,
            nms: 3,
            descriptor_window: 5,
        }
    }
}

/// Build a dedicated Rayon pool with the specified number of threads
pub fn build_thread_pool(n_threads: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads.max(1))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn test_thread_pool_zero_threads_falls_back_to_one() {
        let pool = build_thread_pool(0).unwrap();
        assert_eq!(pool.current_num_threads(), 1);
    }
}
