use pano_core::filter::{convolve, make_1d_gaussian, make_gx_filter, make_gy_filter, multiply, transpose};
use pano_core::Image;
use crate::error::HarrisResult;

/// Channel layout of the structure tensor field
pub const IXX: usize = 0;
pub const IYY: usize = 1;
pub const IXY: usize = 2;

/// Separable Gaussian blur: a row pass followed by a column pass with the
/// transposed kernel, channel by channel.
pub fn smooth_image(im: &Image, sigma: f32) -> HarrisResult<Image> {
    let row = make_1d_gaussian(sigma);
    let col = transpose(&row);
    let horizontal = convolve(im, &row, true)?;
    Ok(convolve(&horizontal, &col, true)?)
}

/// Smoothed gradient products (Ix², Iy², IxIy) packed into three channels.
///
/// Gradients of multi-channel images are summed across channels.
pub fn structure_matrix(im: &Image, sigma: f32) -> HarrisResult<Image> {
    let ix = convolve(im, &make_gx_filter(), false)?;
    let iy = convolve(im, &make_gy_filter(), false)?;

    let mut tensor = im.zeros_like(3);
    tensor.insert_channel(IXX, &multiply(&ix, &ix)?)?;
    tensor.insert_channel(IYY, &multiply(&iy, &iy)?)?;
    tensor.insert_channel(IXY, &multiply(&ix, &iy)?)?;

    smooth_image(&tensor, sigma)
}
