use pano_core::{HarrisConfig, Image, Point};
use crate::error::{HarrisError, HarrisResult};
use crate::response::{cornerness_response, nms_image};
use crate::structure::structure_matrix;
use crate::types::Corner;

/// Harris corner detector over float images of any channel count
#[derive(Debug, Clone)]
pub struct HarrisDetector {
    cfg: HarrisConfig,
}

impl HarrisDetector {
    /// Creates a new detector with validation
    pub fn new(cfg: HarrisConfig) -> HarrisResult<Self> {
        if !cfg.sigma.is_finite() || cfg.sigma <= 0.0 {
            return Err(HarrisError::InvalidSigma(cfg.sigma));
        }

        if !cfg.threshold.is_finite() {
            return Err(HarrisError::InvalidThreshold(cfg.threshold));
        }

        // Descriptor patches are centred on the corner
        if cfg.descriptor_window % 2 == 0 {
            return Err(HarrisError::InvalidWindow(cfg.descriptor_window));
        }

        Ok(Self { cfg })
    }

    /// Cornerness map before suppression
    pub fn response_map(&self, img: &Image) -> HarrisResult<Image> {
        let tensor = structure_matrix(img, self.cfg.sigma)?;
        Ok(cornerness_response(&tensor))
    }

    /// Cornerness map after non-max suppression
    pub fn suppressed_response(&self, img: &Image) -> HarrisResult<Image> {
        let response = self.response_map(img)?;
        Ok(nms_image(&response, self.cfg.nms))
    }

    /// Detect corners: local maxima whose response exceeds the threshold
    pub fn detect(&self, img: &Image) -> HarrisResult<Vec<Corner>> {
        let suppressed = self.suppressed_response(img)?;
        let corners = collect_corners(&suppressed, self.cfg.threshold);
        log::debug!(
            "{} corners above {} in {}x{} image (sigma={}, nms={})",
            corners.len(),
            self.cfg.threshold,
            img.width(),
            img.height(),
            self.cfg.sigma,
            self.cfg.nms
        );
        Ok(corners)
    }

    /// Get detector configuration
    pub fn config(&self) -> &HarrisConfig {
        &self.cfg
    }
}

/// Pixels of a suppressed response map strictly above `threshold`.
///
/// Scans column by column (x outer, y inner); downstream index-based tie
/// breaks depend on this order.
pub fn collect_corners(suppressed: &Image, threshold: f32) -> Vec<Corner> {
    let (w, h) = suppressed.dimensions();
    let mut corners = Vec::new();
    for x in 0..w {
        for y in 0..h {
            let index = y * w + x;
            let response = suppressed.data[index];
            if response > threshold {
                corners.push(Corner {
                    point: Point::new(x as f32, y as f32),
                    index,
                    response,
                });
            }
        }
    }
    corners
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> HarrisConfig {
        HarrisConfig {
            sigma: 2.0,
            threshold: 0.5,
            nms: 3,
            descriptor_window: 5,
        }
    }

    fn create_square_image(size: usize, lo: isize, hi: isize) -> Image {
        let mut img = Image::new(size, size, 1);
        for y in lo..hi {
            for x in lo..hi {
                img.set_pixel(x, y, 0, 1.0);
            }
        }
        img
    }

    #[test]
    fn test_valid_constructor() {
        assert!(HarrisDetector::new(create_test_config()).is_ok());
    }

    #[test]
    fn test_invalid_sigma() {
        let mut cfg = create_test_config();
        cfg.sigma = 0.0;
        assert!(matches!(HarrisDetector::new(cfg.clone()), Err(HarrisError::InvalidSigma(_))));

        cfg.sigma = f32::NAN;
        assert!(matches!(HarrisDetector::new(cfg), Err(HarrisError::InvalidSigma(_))));
    }

    #[test]
    fn test_invalid_threshold_and_window() {
        let mut cfg = create_test_config();
        cfg.threshold = f32::INFINITY;
        assert!(matches!(HarrisDetector::new(cfg.clone()), Err(HarrisError::InvalidThreshold(_))));

        cfg.threshold = 1.0;
        cfg.descriptor_window = 4;
        assert!(matches!(HarrisDetector::new(cfg), Err(HarrisError::InvalidWindow(4))));
    }

    #[test]
    fn test_flat_image_has_no_corners() {
        let detector = HarrisDetector::new(create_test_config()).unwrap();
        let img = Image::from_raw(32, 32, 1, vec![0.5; 32 * 32]).unwrap();
        assert!(detector.detect(&img).unwrap().is_empty());
    }

    #[test]
    fn test_square_corners_detected() {
        let detector = HarrisDetector::new(create_test_config()).unwrap();
        let img = create_square_image(48, 16, 32);
        let corners = detector.detect(&img).unwrap();

        let expected = [(16.0, 16.0), (31.0, 16.0), (16.0, 31.0), (31.0, 31.0)];
        for &(ex, ey) in &expected {
            let target = Point::new(ex, ey);
            assert!(
                corners.iter().any(|c| c.point.distance(&target) <= 3.0),
                "no corner near ({}, {}): {:?}",
                ex,
                ey,
                corners
            );
        }
        for c in &corners {
            assert!(expected.iter().any(|&(ex, ey)| c.point.distance(&Point::new(ex, ey)) <= 3.0));
            assert!(c.response > 0.5);
            assert_eq!(c.index, c.point.y as usize * 48 + c.point.x as usize);
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut map = Image::new(3, 3, 1);
        map.set_pixel(1, 1, 0, 2.0);
        map.set_pixel(2, 2, 0, 2.5);
        let corners = collect_corners(&map, 2.0);
        assert_eq!(corners.len(), 1);
        assert_eq!(corners[0].point, Point::new(2.0, 2.0));
    }

    #[test]
    fn test_corners_are_column_major() {
        let mut map = Image::new(4, 4, 1);
        map.set_pixel(3, 0, 0, 1.0);
        map.set_pixel(0, 3, 0, 1.0);
        map.set_pixel(0, 1, 0, 1.0);
        let corners = collect_corners(&map, 0.0);
        let order: Vec<(f32, f32)> = corners.iter().map(|c| (c.point.x, c.point.y)).collect();
        assert_eq!(order, vec![(0.0, 1.0), (0.0, 3.0), (3.0, 0.0)]);
    }

    #[test]
    fn test_repeated_detection_is_identical() {
        let detector = HarrisDetector::new(create_test_config()).unwrap();
        let img = create_square_image(40, 10, 30);
        let first = detector.detect(&img).unwrap();
        for _ in 0..5 {
            assert_eq!(detector.detect(&img).unwrap(), first);
        }
    }
}
