use crate::error::{CoreError, CoreResult};

/// Planar floating-point image, `data[c * w * h + y * w + x]`
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    pub data: Vec<f32>,
}

impl Image {
    /// Zero-filled image.
    ///
    /// # Panics
    /// If any dimension is zero. Use [`Image::try_new`] for untrusted sizes.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        assert!(width > 0 && height > 0 && channels > 0);
        Self::zeroed(width, height, channels)
    }

    /// Zero-filled image, rejecting zero dimensions
    pub fn try_new(width: usize, height: usize, channels: usize) -> CoreResult<Self> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(CoreError::InvalidImageSize { width, height, channels });
        }
        Ok(Self::zeroed(width, height, channels))
    }

    /// Zero-filled image with this image's width and height and `channels`
    /// planes (at least one).
    pub fn zeros_like(&self, channels: usize) -> Self {
        Self::zeroed(self.width, self.height, channels.max(1))
    }

    /// Callers guarantee non-zero dimensions
    pub(crate) fn zeroed(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0.0; width * height * channels],
        }
    }

    /// Wrap an existing planar buffer
    pub fn from_raw(width: usize, height: usize, channels: usize, data: Vec<f32>) -> CoreResult<Self> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(CoreError::InvalidImageSize { width, height, channels });
        }
        let expected_len = width * height * channels;
        if data.len() != expected_len {
            return Err(CoreError::InvalidImageData {
                expected_len,
                actual_len: data.len(),
            });
        }
        Ok(Self { width, height, channels, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of pixels in one channel plane
    pub fn plane_len(&self) -> usize {
        self.width * self.height
    }

    /// Read with replicated-edge boundary: coordinates and channel are
    /// clamped to the nearest valid index.
    #[inline]
    pub fn get_pixel(&self, x: isize, y: isize, c: usize) -> f32 {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        let c = c.min(self.channels - 1);
        self.data[c * self.plane_len() + y * self.width + x]
    }

    /// Write a pixel; out-of-range writes are ignored
    #[inline]
    pub fn set_pixel(&mut self, x: isize, y: isize, c: usize, value: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height || c >= self.channels {
            return;
        }
        let idx = c * self.plane_len() + y as usize * self.width + x as usize;
        self.data[idx] = value;
    }

    /// Sample at fractional coordinates from the four nearest neighbours
    pub fn bilinear_interpolate(&self, x: f32, y: f32, c: usize) -> f32 {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (ix, iy) = (x0 as isize, y0 as isize);

        let p00 = self.get_pixel(ix, iy, c);
        let p10 = self.get_pixel(ix + 1, iy, c);
        let p01 = self.get_pixel(ix, iy + 1, c);
        let p11 = self.get_pixel(ix + 1, iy + 1, c);

        let top = p00 * (1.0 - fx) + p10 * fx;
        let bottom = p01 * (1.0 - fx) + p11 * fx;
        top * (1.0 - fy) + bottom * fy
    }

    /// Copy one channel out as a single-channel image
    pub fn channel(&self, c: usize) -> Image {
        let c = c.min(self.channels - 1);
        let plane = self.plane_len();
        Image {
            width: self.width,
            height: self.height,
            channels: 1,
            data: self.data[c * plane..(c + 1) * plane].to_vec(),
        }
    }

    /// Overwrite channel `c` with the single-channel `plane`
    pub fn insert_channel(&mut self, c: usize, plane: &Image) -> CoreResult<()> {
        if plane.channels != 1 {
            return Err(CoreError::ChannelMismatch { expected: 1, actual: plane.channels });
        }
        if c >= self.channels {
            return Err(CoreError::ChannelMismatch { expected: self.channels, actual: c + 1 });
        }
        if plane.dimensions() != self.dimensions() {
            return Err(CoreError::InvalidImageData {
                expected_len: self.plane_len(),
                actual_len: plane.plane_len(),
            });
        }
        let len = self.plane_len();
        self.data[c * len..(c + 1) * len].copy_from_slice(&plane.data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(width: usize, height: usize) -> Image {
        let data = (0..width * height).map(|i| (i % width) as f32).collect();
        Image::from_raw(width, height, 1, data).unwrap()
    }

    #[test]
    fn test_from_raw_validates_length() {
        let result = Image::from_raw(4, 4, 1, vec![0.0; 15]);
        assert!(matches!(result, Err(CoreError::InvalidImageData { expected_len: 16, actual_len: 15 })));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(Image::try_new(0, 4, 1), Err(CoreError::InvalidImageSize { .. })));
        assert!(matches!(Image::from_raw(4, 4, 0, vec![]), Err(CoreError::InvalidImageSize { .. })));
    }

    #[test]
    fn test_zeros_like_keeps_extent() {
        let img = ramp(5, 3);
        let blank = img.zeros_like(3);
        assert_eq!(blank.dimensions(), (5, 3));
        assert_eq!(blank.channels(), 3);
        assert!(blank.data.iter().all(|&v| v == 0.0));
        assert_eq!(img.zeros_like(0).channels(), 1);
    }

    #[test]
    fn test_get_pixel_clamps_out_of_bounds() {
        let img = ramp(5, 3);
        assert_eq!(img.get_pixel(-3, 1, 0), 0.0);
        assert_eq!(img.get_pixel(10, 1, 0), 4.0);
        assert_eq!(img.get_pixel(2, -1, 0), 2.0);
        assert_eq!(img.get_pixel(2, 99, 7), 2.0);
    }

    #[test]
    fn test_set_pixel_ignores_out_of_bounds() {
        let mut img = Image::new(3, 3, 2);
        img.set_pixel(-1, 0, 0, 5.0);
        img.set_pixel(3, 0, 0, 5.0);
        img.set_pixel(0, 0, 2, 5.0);
        assert!(img.data.iter().all(|&v| v == 0.0));

        img.set_pixel(1, 2, 1, 5.0);
        assert_eq!(img.get_pixel(1, 2, 1), 5.0);
        assert_eq!(img.data[9 + 2 * 3 + 1], 5.0);
    }

    #[test]
    fn test_bilinear_interpolation() {
        let img = ramp(5, 5);
        assert_relative_eq!(img.bilinear_interpolate(1.25, 2.0, 0), 1.25, epsilon = 1e-6);
        assert_relative_eq!(img.bilinear_interpolate(3.0, 3.7, 0), 3.0, epsilon = 1e-6);
        // Past the last column the clamped neighbour repeats the edge
        assert_relative_eq!(img.bilinear_interpolate(4.5, 0.0, 0), 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_channel_roundtrip() {
        let mut img = Image::new(2, 2, 3);
        let plane = Image::from_raw(2, 2, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        img.insert_channel(1, &plane).unwrap();
        assert_eq!(img.channel(1), plane);
        assert!(img.channel(0).data.iter().all(|&v| v == 0.0));
        assert!(img.insert_channel(3, &plane).is_err());
    }
}
