use pano_core::HarrisConfig;
use pano_harris::HarrisDetector;
use pano_stitch::{RansacConfig, MAX_CANVAS};
use crate::{PanoError, PanoResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seed of the per-run random stream
pub const DEFAULT_SEED: u64 = 10;

/// Complete stitching configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanoramaConfig {
    /// Largest canvas side before compositing gives up
    pub max_canvas: usize,
    pub seed: u64,
    /// Worker threads for detection, description and matching
    pub n_threads: usize,
    /// Metadata
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    pub harris: HarrisConfig,
    pub ransac: RansacConfig,
}

impl Default for PanoramaConfig {
    fn default() -> Self {
        Self {
            max_canvas: MAX_CANVAS,
            seed: DEFAULT_SEED,
            n_threads: 1,
            name: None,
            description: None,
            harris: HarrisConfig::default(),
            ransac: RansacConfig::default(),
        }
    }
}

impl PanoramaConfig {
    /// Few iterations and sparse corners
    pub fn quick_preset() -> Self {
        Self {
            harris: HarrisConfig {
                sigma: 2.0,
                threshold: 10.0,
                nms: 5,
                descriptor_window: 5,
            },
            ransac: RansacConfig {
                inlier_threshold: 3.0,
                iterations: 1_000,
                cutoff: 20,
            },
            name: Some("Quick".to_string()),
            description: Some("Sparse corners and a short RANSAC budget".to_string()),
            n_threads: num_cpus::get(),
            ..Self::default()
        }
    }

    /// Dense corners and a long RANSAC budget
    pub fn thorough_preset() -> Self {
        Self {
            harris: HarrisConfig {
                sigma: 2.0,
                threshold: 1.0,
                nms: 3,
                descriptor_window: 7,
            },
            ransac: RansacConfig {
                inlier_threshold: 2.0,
                iterations: 50_000,
                cutoff: 100,
            },
            name: Some("Thorough".to_string()),
            description: Some("Dense corners, tight inliers and many RANSAC iterations".to_string()),
            n_threads: num_cpus::get(),
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self
    }

    pub fn summary(&self) -> String {
        format!(
            "PanoramaConfig: sigma={:.2}, threshold={:.2}, nms={}, window={}, inlier_threshold={:.2}, iterations={}, cutoff={}, seed={}, threads={}",
            self.harris.sigma,
            self.harris.threshold,
            self.harris.nms,
            self.harris.descriptor_window,
            self.ransac.inlier_threshold,
            self.ransac.iterations,
            self.ransac.cutoff,
            self.seed,
            self.n_threads
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> PanoResult<()> {
        HarrisDetector::new(self.harris.clone())?;
        self.ransac.validate()?;
        if self.max_canvas == 0 {
            return Err(PanoError::InvalidCanvasLimit(self.max_canvas));
        }
        Ok(())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Load by extension: `.json` is JSON, anything else TOML
    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let is_json = path
            .as_ref()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::load_json(path)
        } else {
            Self::load_toml(path)
        }
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
