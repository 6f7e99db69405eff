/// Why a homography could not be estimated
#[derive(Debug, Clone, PartialEq)]
pub enum HomographyError {
    TooFewCorrespondences { needed: usize, got: usize },
    /// Coefficient matrix rank below 8 (collinear or repeated points)
    Singular,
    NonFinite,
}

impl std::fmt::Display for HomographyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HomographyError::TooFewCorrespondences { needed, got } => {
                write!(f, "Too few correspondences: need {}, got {}", needed, got)
            }
            HomographyError::Singular => write!(f, "Singular homography system"),
            HomographyError::NonFinite => write!(f, "Homography has non-finite entries"),
        }
    }
}

impl std::error::Error for HomographyError {}

pub type HomographyResult<T> = Result<T, HomographyError>;

#[derive(Debug, Clone, PartialEq)]
pub enum StitchError {
    TooFewMatches { needed: usize, got: usize },
    InvalidThreshold(f32),
}

impl std::fmt::Display for StitchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StitchError::TooFewMatches { needed, got } => {
                write!(f, "RANSAC needs at least {} matches, got {}", needed, got)
            }
            StitchError::InvalidThreshold(t) => {
                write!(f, "Invalid inlier threshold: {} (must be finite and > 0)", t)
            }
        }
    }
}

impl std::error::Error for StitchError {}

pub type StitchResult<T> = Result<T, StitchError>;
