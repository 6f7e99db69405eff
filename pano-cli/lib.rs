pub mod config;
pub mod convert;
pub mod draw;

use pano_core::{build_thread_pool, CoreError, Descriptor, Image, Match};
use pano_describe::{match_descriptors, DescribeError, DescriptorExtractor};
use pano_harris::{Corner, HarrisDetector, HarrisError};
use pano_stitch::{combine_images, ransac, Composite, Homography, RansacFit, StitchError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use config::PanoramaConfig;
pub use pano_core::{self, HarrisConfig};
pub use pano_stitch::{self, CompositeStatus, RansacConfig};

#[derive(Debug)]
pub enum PanoError {
    Harris(HarrisError),
    Describe(DescribeError),
    Stitch(StitchError),
    Image(CoreError),
    Codec(image::ImageError),
    ThreadPool(rayon::ThreadPoolBuildError),
    InvalidCanvasLimit(usize),
}

impl std::fmt::Display for PanoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanoError::Harris(e) => write!(f, "Corner detection error: {}", e),
            PanoError::Describe(e) => write!(f, "Descriptor error: {}", e),
            PanoError::Stitch(e) => write!(f, "Stitching error: {}", e),
            PanoError::Image(e) => write!(f, "Image error: {}", e),
            PanoError::Codec(e) => write!(f, "Image codec error: {}", e),
            PanoError::ThreadPool(e) => write!(f, "Thread pool error: {}", e),
            PanoError::InvalidCanvasLimit(n) => {
                write!(f, "Invalid canvas limit: {} (must be > 0)", n)
            }
        }
    }
}

impl std::error::Error for PanoError {}

impl From<HarrisError> for PanoError {
    fn from(err: HarrisError) -> Self {
        PanoError::Harris(err)
    }
}

impl From<DescribeError> for PanoError {
    fn from(err: DescribeError) -> Self {
        PanoError::Describe(err)
    }
}

impl From<StitchError> for PanoError {
    fn from(err: StitchError) -> Self {
        PanoError::Stitch(err)
    }
}

impl From<CoreError> for PanoError {
    fn from(err: CoreError) -> Self {
        PanoError::Image(err)
    }
}

impl From<image::ImageError> for PanoError {
    fn from(err: image::ImageError) -> Self {
        PanoError::Codec(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for PanoError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        PanoError::ThreadPool(err)
    }
}

pub type PanoResult<T> = Result<T, PanoError>;

/// High-level two-image stitcher: Harris corners, patch descriptors,
/// greedy matching, RANSAC homography and compositing.
pub struct Panorama {
    config: PanoramaConfig,
    detector: HarrisDetector,
    extractor: DescriptorExtractor,
    pool: rayon::ThreadPool,
}

impl Panorama {
    pub fn new(config: PanoramaConfig) -> PanoResult<Self> {
        config.validate()?;
        let detector = HarrisDetector::new(config.harris.clone())?;
        let extractor = DescriptorExtractor::new(config.harris.descriptor_window)?;
        let pool = build_thread_pool(config.n_threads)?;

        Ok(Self {
            config,
            detector,
            extractor,
            pool,
        })
    }

    /// Corners of `img` and one descriptor per corner
    pub fn detect_and_describe(&self, img: &Image) -> PanoResult<(Vec<Corner>, Vec<Descriptor>)> {
        self.pool.install(|| -> PanoResult<_> {
            let corners = self.detector.detect(img)?;
            let descriptors = self.extractor.describe_corners(img, &corners);
            Ok((corners, descriptors))
        })
    }

    pub fn find_matches(&self, a: &[Descriptor], b: &[Descriptor]) -> PanoResult<Vec<Match>> {
        Ok(self.pool.install(|| match_descriptors(a, b))?)
    }

    /// RANSAC fit of the `a` to `b` homography. The fallback model places
    /// `b` directly right of `a`.
    pub fn estimate_homography<R: Rng + ?Sized>(
        &self,
        a: &Image,
        matches: &[Match],
        rng: &mut R,
    ) -> PanoResult<RansacFit> {
        let fallback = Homography::translation(a.width() as f64, 0.0);
        Ok(ransac(matches, &self.config.ransac, fallback, rng)?)
    }

    /// Full pipeline with a generator seeded from the config, so repeated
    /// calls on the same inputs give identical output.
    pub fn stitch(&self, a: &Image, b: &Image) -> PanoResult<Composite> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let (corners_a, descriptors_a) = self.detect_and_describe(a)?;
        let (corners_b, descriptors_b) = self.detect_and_describe(b)?;
        let matches = self.find_matches(&descriptors_a, &descriptors_b)?;
        let fit = self.estimate_homography(a, &matches, &mut rng)?;

        log::info!(
            "{} + {} corners, {} matches, {} inliers",
            corners_a.len(),
            corners_b.len(),
            matches.len(),
            fit.inliers
        );

        Ok(combine_images(a, b, &fit.homography, self.config.max_canvas))
    }

    pub fn config(&self) -> &PanoramaConfig {
        &self.config
    }
}

/// Stitch `b` onto `a` with explicit detector and RANSAC settings.
///
/// Typical values: `sigma` 2, `thresh` 1-5, `nms` 3, `inlier_thresh` 2-5,
/// `iters` 1000-50000, `cutoff` 10-100.
#[allow(clippy::too_many_arguments)]
pub fn panorama_image(
    a: &Image,
    b: &Image,
    sigma: f32,
    thresh: f32,
    nms: usize,
    inlier_thresh: f32,
    iters: usize,
    cutoff: usize,
) -> PanoResult<Image> {
    let config = PanoramaConfig {
        harris: HarrisConfig {
            sigma,
            threshold: thresh,
            nms,
            ..HarrisConfig::default()
        },
        ransac: RansacConfig {
            inlier_threshold: inlier_thresh,
            iterations: iters,
            cutoff,
        },
        ..PanoramaConfig::default()
    };
    Ok(Panorama::new(config)?.stitch(a, b)?.image)
}
