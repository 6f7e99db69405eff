//! Debug visualisation of corners and correspondences

use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use pano_core::{Descriptor, Image, Match};
use pano_stitch::{partition_inliers, Homography};
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::convert::to_rgb_image;
use crate::{Panorama, PanoResult};

const MARK_RADIUS: f32 = 9.0;
const MARK_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
const INLIER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const OUTLIER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Magenta cross over every descriptor location
pub fn mark_corners(img: &mut RgbImage, descriptors: &[Descriptor]) {
    for d in descriptors {
        let (x, y) = (d.location.x, d.location.y);
        draw_line_segment_mut(img, (x - MARK_RADIUS, y), (x + MARK_RADIUS, y), MARK_COLOR);
        draw_line_segment_mut(img, (x, y - MARK_RADIUS), (x, y + MARK_RADIUS), MARK_COLOR);
    }
}

/// `a` and `b` side by side on a black canvas
pub fn both_images(a: &RgbImage, b: &RgbImage) -> RgbImage {
    let mut both = RgbImage::new(a.width() + b.width(), a.height().max(b.height()));
    imageops::replace(&mut both, a, 0, 0);
    imageops::replace(&mut both, b, a.width() as i64, 0);
    both
}

/// Lines from each match's `a` point to its `b` point on the side-by-side
/// canvas. The first `inliers` matches are green, the rest red.
pub fn draw_matches(a: &RgbImage, b: &RgbImage, matches: &[Match], inliers: usize) -> RgbImage {
    let mut both = both_images(a, b);
    let shift = a.width() as f32;
    for (i, m) in matches.iter().enumerate() {
        let color = if i < inliers { INLIER_COLOR } else { OUTLIER_COLOR };
        draw_line_segment_mut(
            &mut both,
            (m.point_a.x, m.point_a.y),
            (m.point_b.x + shift, m.point_b.y),
            color,
        );
    }
    both
}

/// [`draw_matches`] with inliers of `h` at distance `thresh` in green
pub fn draw_inliers(a: &RgbImage, b: &RgbImage, h: &Homography, matches: &[Match], thresh: f32) -> RgbImage {
    let (ordered, inliers) = partition_inliers(h, matches, thresh);
    draw_matches(a, b, &ordered, inliers)
}

pub fn detect_and_draw_corners(panorama: &Panorama, img: &Image) -> PanoResult<RgbImage> {
    let (_, descriptors) = panorama.detect_and_describe(img)?;
    let mut out = to_rgb_image(img);
    mark_corners(&mut out, &descriptors);
    Ok(out)
}

/// Corners of both images plus every match, all drawn as outliers
pub fn find_and_draw_matches(panorama: &Panorama, a: &Image, b: &Image) -> PanoResult<RgbImage> {
    let (_, da) = panorama.detect_and_describe(a)?;
    let (_, db) = panorama.detect_and_describe(b)?;
    let matches = panorama.find_matches(&da, &db)?;

    let (mut ra, mut rb) = (to_rgb_image(a), to_rgb_image(b));
    mark_corners(&mut ra, &da);
    mark_corners(&mut rb, &db);
    Ok(draw_matches(&ra, &rb, &matches, 0))
}

/// Corners of both images plus matches coloured by the RANSAC model
pub fn find_and_draw_inliers(panorama: &Panorama, a: &Image, b: &Image) -> PanoResult<RgbImage> {
    let (_, da) = panorama.detect_and_describe(a)?;
    let (_, db) = panorama.detect_and_describe(b)?;
    let matches = panorama.find_matches(&da, &db)?;
    let mut rng = StdRng::seed_from_u64(panorama.config().seed);
    let fit = panorama.estimate_homography(a, &matches, &mut rng)?;

    let (mut ra, mut rb) = (to_rgb_image(a), to_rgb_image(b));
    mark_corners(&mut ra, &da);
    mark_corners(&mut rb, &db);
    Ok(draw_matches(&ra, &rb, &fit.matches, fit.inliers))
}
