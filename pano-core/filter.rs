//! Convolution and kernel construction.
//!
//! Kernels are ordinary [`Image`]s. Convolution is a centred correlation
//! that reads through [`Image::get_pixel`], so borders replicate the edge.

use crate::error::{CoreError, CoreResult};
use crate::image::Image;
use rayon::prelude::*;

/// Horizontal Sobel kernel
pub fn make_gx_filter() -> Image {
    let mut k = Image::zeroed(3, 3, 1);
    k.data.copy_from_slice(&[-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0]);
    k
}

/// Vertical Sobel kernel
pub fn make_gy_filter() -> Image {
    let mut k = Image::zeroed(3, 3, 1);
    k.data.copy_from_slice(&[-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0]);
    k
}

/// Odd-length 1-D Gaussian row kernel spanning roughly ±3σ.
///
/// Weights are the sampled density `exp(-x²/2σ²) / (√(2π)·σ)` and are not
/// renormalised. Non-positive `sigma` yields the 1-tap identity kernel.
pub fn make_1d_gaussian(sigma: f32) -> Image {
    if !(sigma > 0.0) {
        let mut k = Image::zeroed(1, 1, 1);
        k.data[0] = 1.0;
        return k;
    }
    let mut size = (6.0 * sigma).ceil() as usize;
    if size % 2 == 0 {
        size += 1;
    }
    let half = (size / 2) as f32;
    let k = 1.0 / ((2.0 * std::f32::consts::PI).sqrt() * sigma);
    let mut kernel = Image::zeroed(size, 1, 1);
    for (i, v) in kernel.data.iter_mut().enumerate() {
        let x = i as f32 - half;
        *v = k * (-(x * x) / (2.0 * sigma * sigma)).exp();
    }
    kernel
}

/// Swap the x and y axes
pub fn transpose(im: &Image) -> Image {
    let (w, h) = im.dimensions();
    let mut out = Image::zeroed(h, w, im.channels());
    for c in 0..im.channels() {
        for y in 0..h {
            for x in 0..w {
                out.set_pixel(y as isize, x as isize, c, im.get_pixel(x as isize, y as isize, c));
            }
        }
    }
    out
}

/// Correlate `im` with `filter`.
///
/// `filter` must have one channel (applied to every image channel) or as
/// many channels as `im`. With `preserve` the output has the image's channel
/// count; otherwise the per-channel responses are summed into one channel.
pub fn convolve(im: &Image, filter: &Image, preserve: bool) -> CoreResult<Image> {
    if filter.channels() != 1 && filter.channels() != im.channels() {
        return Err(CoreError::ChannelMismatch {
            expected: im.channels(),
            actual: filter.channels(),
        });
    }

    let (w, h) = im.dimensions();
    let out_channels = if preserve { im.channels() } else { 1 };
    let mut out = im.zeros_like(out_channels);

    out.data
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(row, dst)| {
            let (oc, y) = (row / h, row % h);
            let channels: Vec<usize> = if preserve { vec![oc] } else { (0..im.channels()).collect() };
            for (x, value) in dst.iter_mut().enumerate() {
                *value = channels
                    .iter()
                    .map(|&c| correlate_at(im, filter, x as isize, y as isize, c))
                    .sum();
            }
        });

    Ok(out)
}

#[inline]
fn correlate_at(im: &Image, filter: &Image, x: isize, y: isize, c: usize) -> f32 {
    let (fw, fh) = filter.dimensions();
    let (hw, hh) = ((fw / 2) as isize, (fh / 2) as isize);
    let fc = if filter.channels() == 1 { 0 } else { c };
    let mut sum = 0.0f32;
    for fy in 0..fh as isize {
        for fx in 0..fw as isize {
            sum += filter.get_pixel(fx, fy, fc) * im.get_pixel(x + fx - hw, y + fy - hh, c);
        }
    }
    sum
}

/// Per-pixel product of two images with identical shape
pub fn multiply(a: &Image, b: &Image) -> CoreResult<Image> {
    if a.channels() != b.channels() {
        return Err(CoreError::ChannelMismatch { expected: a.channels(), actual: b.channels() });
    }
    if a.dimensions() != b.dimensions() {
        return Err(CoreError::InvalidImageData {
            expected_len: a.data.len(),
            actual_len: b.data.len(),
        });
    }
    let data = a.data.iter().zip(&b.data).map(|(x, y)| x * y).collect();
    Image::from_raw(a.width(), a.height(), a.channels(), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_kernel_shape() {
        let g = make_1d_gaussian(2.0);
        assert_eq!(g.dimensions(), (13, 1));
        // Peak in the middle, symmetric tails
        assert!(g.data[6] > g.data[5]);
        assert_relative_eq!(g.data[0], g.data[12], epsilon = 1e-9);
        let sum: f32 = g.data.iter().sum();
        assert!(sum > 0.99 && sum < 1.0, "sum = {}", sum);
    }

    #[test]
    fn test_gaussian_odd_size_bump() {
        // ceil(6 * 1.5) = 9 is already odd
        assert_eq!(make_1d_gaussian(1.5).width(), 9);
        // ceil(6 * 1.0) = 6 is bumped to 7
        assert_eq!(make_1d_gaussian(1.0).width(), 7);
    }

    #[test]
    fn test_transpose() {
        let im = Image::from_raw(3, 2, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let t = transpose(&im);
        assert_eq!(t.dimensions(), (2, 3));
        assert_eq!(t.data, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_gx_on_horizontal_ramp() {
        let data = (0..36).map(|i| (i % 6) as f32).collect();
        let im = Image::from_raw(6, 6, 1, data).unwrap();
        let gx = convolve(&im, &make_gx_filter(), false).unwrap();
        // Interior slope of 1 per pixel yields 2 * (1 + 2 + 1) = 8
        assert_relative_eq!(gx.get_pixel(2, 2, 0), 8.0);
        // Clamped border sees half the difference
        assert_relative_eq!(gx.get_pixel(0, 2, 0), 4.0);

        let gy = convolve(&im, &make_gy_filter(), false).unwrap();
        assert!(gy.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_convolve_sum_vs_preserve() {
        let mut im = Image::new(4, 4, 2);
        for v in im.data.iter_mut().take(16) {
            *v = 1.0;
        }
        for v in im.data.iter_mut().skip(16) {
            *v = 2.0;
        }
        let identity = Image::from_raw(1, 1, 1, vec![1.0]).unwrap();

        let summed = convolve(&im, &identity, false).unwrap();
        assert_eq!(summed.channels(), 1);
        assert!(summed.data.iter().all(|&v| v == 3.0));

        let kept = convolve(&im, &identity, true).unwrap();
        assert_eq!(kept, im);
    }

    #[test]
    fn test_convolve_rejects_bad_filter_channels() {
        let im = Image::new(4, 4, 3);
        let filter = Image::new(3, 3, 2);
        assert!(matches!(convolve(&im, &filter, true), Err(CoreError::ChannelMismatch { .. })));
    }

    #[test]
    fn test_multiply() {
        let a = Image::from_raw(2, 1, 1, vec![2.0, 3.0]).unwrap();
        let b = Image::from_raw(2, 1, 1, vec![4.0, -1.0]).unwrap();
        assert_eq!(multiply(&a, &b).unwrap().data, vec![8.0, -3.0]);
    }
}
