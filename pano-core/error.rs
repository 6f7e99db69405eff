#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    InvalidImageSize { width: usize, height: usize, channels: usize },
    InvalidImageData { expected_len: usize, actual_len: usize },
    ChannelMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::InvalidImageSize { width, height, channels } => {
                write!(f, "Invalid image dimensions: {}x{}x{} (must be > 0)", width, height, channels)
            }
            CoreError::InvalidImageData { expected_len, actual_len } => {
                write!(f, "Image data length mismatch: expected {}, got {}", expected_len, actual_len)
            }
            CoreError::ChannelMismatch { expected, actual } => {
                write!(f, "Channel count mismatch: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;
