use pano_core::CoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum HarrisError {
    InvalidSigma(f32),
    InvalidThreshold(f32),
    InvalidWindow(usize),
    Image(CoreError),
}

impl std::fmt::Display for HarrisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarrisError::InvalidSigma(s) => {
                write!(f, "Invalid sigma: {} (must be finite and > 0)", s)
            }
            HarrisError::InvalidThreshold(t) => {
                write!(f, "Invalid threshold: {} (must be finite)", t)
            }
            HarrisError::InvalidWindow(w) => {
                write!(f, "Invalid descriptor window: {} (must be odd)", w)
            }
            HarrisError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for HarrisError {}

impl From<CoreError> for HarrisError {
    fn from(err: CoreError) -> Self {
        HarrisError::Image(err)
    }
}

pub type HarrisResult<T> = Result<T, HarrisError>;
