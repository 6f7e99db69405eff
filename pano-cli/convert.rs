//! Conversion between `image` crate buffers and planar float images.
//!
//! Float images hold intensities in `[0, 1]`.

use std::path::Path;

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use pano_core::Image;
use crate::PanoResult;

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Grayscale sources stay single-channel, everything else becomes RGB
pub fn from_dynamic(img: &DynamicImage) -> PanoResult<Image> {
    let (w, h) = (img.width() as usize, img.height() as usize);

    if !img.color().has_color() {
        let gray = img.to_luma32f();
        return Ok(Image::from_raw(w, h, 1, gray.into_raw())?);
    }

    let rgb = img.to_rgb32f();
    let mut data = vec![0.0f32; w * h * 3];
    let plane = w * h;
    for (i, px) in rgb.pixels().enumerate() {
        for c in 0..3 {
            data[c * plane + i] = px[c];
        }
    }
    Ok(Image::from_raw(w, h, 3, data)?)
}

/// RGB view of `img`; single-channel images are replicated to gray
pub fn to_rgb_image(img: &Image) -> RgbImage {
    RgbImage::from_fn(img.width() as u32, img.height() as u32, |x, y| {
        let (x, y) = (x as isize, y as isize);
        Rgb([
            to_u8(img.get_pixel(x, y, 0)),
            to_u8(img.get_pixel(x, y, 1)),
            to_u8(img.get_pixel(x, y, 2)),
        ])
    })
}

pub fn to_dynamic(img: &Image) -> DynamicImage {
    if img.channels() == 1 {
        let gray = GrayImage::from_fn(img.width() as u32, img.height() as u32, |x, y| {
            image::Luma([to_u8(img.get_pixel(x as isize, y as isize, 0))])
        });
        DynamicImage::ImageLuma8(gray)
    } else {
        DynamicImage::ImageRgb8(to_rgb_image(img))
    }
}

pub fn load_image<P: AsRef<Path>>(path: P) -> PanoResult<Image> {
    let img = image::open(path)?;
    from_dynamic(&img)
}

/// Save with the format implied by the file extension
pub fn save_image<P: AsRef<Path>>(img: &Image, path: P) -> PanoResult<()> {
    to_dynamic(img).save(path)?;
    Ok(())
}
