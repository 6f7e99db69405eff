use pano_core::Point;

/// Pixel that survived non-max suppression and thresholding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub point: Point,
    /// Row-major pixel index (`y * width + x`)
    pub index: usize,
    pub response: f32,
}
