pub mod matcher;

use pano_core::{Descriptor, Image, Point};
use pano_harris::Corner;
use rayon::prelude::*;

pub use matcher::{l1_distance, match_descriptors};

const DEFAULT_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum DescribeError {
    InvalidWindow(usize),
    FeatureLengthMismatch { left: usize, right: usize },
}

impl std::fmt::Display for DescribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescribeError::InvalidWindow(w) => {
                write!(f, "Invalid descriptor window: {} (must be odd)", w)
            }
            DescribeError::FeatureLengthMismatch { left, right } => {
                write!(f, "Descriptor length mismatch: {} vs {}", left, right)
            }
        }
    }
}

impl std::error::Error for DescribeError {}

pub type DescribeResult<T> = Result<T, DescribeError>;

/// Centre-subtracted square patch descriptors.
///
/// Every channel contributes `window²` values `centre - neighbour`, which
/// cancels uniform brightness offsets.
#[derive(Debug, Clone)]
pub struct DescriptorExtractor {
    window: usize,
}

impl Default for DescriptorExtractor {
    fn default() -> Self {
        Self { window: DEFAULT_WINDOW }
    }
}

impl DescriptorExtractor {
    pub fn new(window: usize) -> DescribeResult<Self> {
        if window % 2 == 0 {
            return Err(DescribeError::InvalidWindow(window));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Feature vector length for images with `channels` channels
    pub fn descriptor_len(&self, channels: usize) -> usize {
        self.window * self.window * channels
    }

    /// Describe the pixel at row-major `index`
    pub fn describe_index(&self, img: &Image, index: usize) -> Descriptor {
        let w = img.width();
        let (x, y) = ((index % w) as isize, (index / w) as isize);
        let lo = -((self.window / 2) as isize);
        let hi = ((self.window + 1) / 2) as isize;

        let mut features = Vec::with_capacity(self.descriptor_len(img.channels()));
        for c in 0..img.channels() {
            let centre = img.data[c * img.plane_len() + index];
            for dx in lo..hi {
                for dy in lo..hi {
                    features.push(centre - img.get_pixel(x + dx, y + dy, c));
                }
            }
        }

        Descriptor {
            location: Point::new(x as f32, y as f32),
            features,
        }
    }

    /// One descriptor per corner, in corner order
    pub fn describe_corners(&self, img: &Image, corners: &[Corner]) -> Vec<Descriptor> {
        corners
            .par_iter()
            .map(|corner| self.describe_index(img, corner.index))
            .collect()
    }
}
