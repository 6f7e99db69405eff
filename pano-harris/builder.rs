use pano_core::HarrisConfig;
use crate::detector::HarrisDetector;
use crate::error::HarrisResult;

/// Builder for creating a `HarrisDetector`
#[derive(Debug, Clone, Default)]
pub struct DetectorBuilder {
    config: HarrisConfig,
}

impl DetectorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: HarrisConfig) -> Self {
        Self { config }
    }

    /// Set the Gaussian scale of the structure tensor
    pub fn sigma(mut self, sigma: f32) -> Self {
        self.config.sigma = sigma;
        self
    }

    /// Set the cornerness threshold
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set the non-max suppression half-width
    pub fn nms(mut self, nms: usize) -> Self {
        self.config.nms = nms;
        self
    }

    /// Set the descriptor patch size (odd)
    pub fn descriptor_window(mut self, window: usize) -> Self {
        self.config.descriptor_window = window;
        self
    }

    /// Small scale, dense corners
    pub fn preset_fine(mut self) -> Self {
        self.config.sigma = 1.0;
        self.config.threshold = 1.0;
        self.config.nms = 2;
        self
    }

    /// Large scale, sparse corners
    pub fn preset_coarse(mut self) -> Self {
        self.config.sigma = 3.0;
        self.config.threshold = 10.0;
        self.config.nms = 5;
        self
    }

    /// Build the detector, validating the configuration
    pub fn build(self) -> HarrisResult<HarrisDetector> {
        HarrisDetector::new(self.config)
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        format!(
            "DetectorBuilder: sigma={:.2}, threshold={:.2}, nms={}, window={}",
            self.config.sigma,
            self.config.threshold,
            self.config.nms,
            self.config.descriptor_window
        )
    }

    pub fn config(&self) -> &HarrisConfig {
        &self.config
    }
}
