use pano_core::{Image, Point};
use crate::homography::Homography;

/// Largest canvas side `combine_images` will allocate by default
pub const MAX_CANVAS: usize = 7000;

// Footprint bounds this close to an integer are treated as that integer
const SNAP_EPS: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeStatus {
    /// `a` was pasted at `(-offset_x, -offset_y)`
    Stitched { offset_x: i64, offset_y: i64 },
    CanvasTooLarge { width: usize, height: usize },
    /// Non-invertible homography or a footprint at infinity
    Degenerate,
}

#[derive(Debug, Clone)]
pub struct Composite {
    pub image: Image,
    pub status: CompositeStatus,
}

impl Composite {
    pub fn is_stitched(&self) -> bool {
        matches!(self.status, CompositeStatus::Stitched { .. })
    }
}

fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < SNAP_EPS {
        r
    } else {
        v
    }
}

fn unchanged(a: &Image, status: CompositeStatus) -> Composite {
    Composite {
        image: a.clone(),
        status,
    }
}

/// Merge `b` into the frame of `a`; `h` maps `a` coordinates to `b`.
///
/// The canvas covers `a` plus the inverse-projected footprint of `b`, with
/// `a`'s channel count and a zero background. `a` is pasted first and then
/// every canvas pixel inside `b`'s footprint box that lands inside `b` is
/// overwritten with a bilinear sample of `b`. A canvas side above
/// `max_canvas`, or a degenerate `h`, returns a copy of `a` instead.
pub fn combine_images(a: &Image, b: &Image, h: &Homography, max_canvas: usize) -> Composite {
    let Some(h_inv) = h.inverse() else {
        log::warn!("homography is not invertible, returning first image unchanged");
        return unchanged(a, CompositeStatus::Degenerate);
    };

    let (bw, bh) = ((b.width() - 1) as f32, (b.height() - 1) as f32);
    let footprint: Option<Vec<Point>> = [(0.0, 0.0), (bw, 0.0), (0.0, bh), (bw, bh)]
        .into_iter()
        .map(|(x, y)| h_inv.project(Point::new(x, y)))
        .collect();
    let Some(footprint) = footprint else {
        log::warn!("second image projects to infinity, returning first image unchanged");
        return unchanged(a, CompositeStatus::Degenerate);
    };

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in &footprint {
        min_x = min_x.min(p.x as f64);
        min_y = min_y.min(p.y as f64);
        max_x = max_x.max(p.x as f64);
        max_y = max_y.max(p.y as f64);
    }
    let (left, top) = (snap(min_x).floor(), snap(min_y).floor());
    let (right, bottom) = (snap(max_x).ceil(), snap(max_y).ceil());

    let dx = left.min(0.0);
    let dy = top.min(0.0);
    let width = right.max(a.width() as f64) - dx;
    let height = bottom.max(a.height() as f64) - dy;

    if width > max_canvas as f64 || height > max_canvas as f64 {
        log::warn!(
            "stitched canvas would be {}x{} (limit {}), returning first image unchanged",
            width,
            height,
            max_canvas
        );
        return unchanged(
            a,
            CompositeStatus::CanvasTooLarge {
                width: width as usize,
                height: height as usize,
            },
        );
    }

    let (dx, dy) = (dx as i64, dy as i64);
    let mut canvas = match Image::try_new(width as usize, height as usize, a.channels()) {
        Ok(canvas) => canvas,
        Err(e) => {
            log::warn!("{}, returning first image unchanged", e);
            return unchanged(a, CompositeStatus::Degenerate);
        }
    };

    for c in 0..a.channels() {
        for y in 0..a.height() as i64 {
            for x in 0..a.width() as i64 {
                let v = a.get_pixel(x as isize, y as isize, c);
                canvas.set_pixel((x - dx) as isize, (y - dy) as isize, c, v);
            }
        }
    }

    let (b_w, b_h) = (b.width() as f32, b.height() as f32);
    for y in top as i64..bottom as i64 {
        for x in left as i64..right as i64 {
            let Some(p) = h.project(Point::new(x as f32, y as f32)) else {
                continue;
            };
            if p.x < 0.0 || p.x >= b_w || p.y < 0.0 || p.y >= b_h {
                continue;
            }
            for c in 0..canvas.channels() {
                let v = b.bilinear_interpolate(p.x, p.y, c);
                canvas.set_pixel((x - dx) as isize, (y - dy) as isize, c, v);
            }
        }
    }

    log::debug!(
        "stitched {}x{} canvas, first image offset ({}, {})",
        canvas.width(),
        canvas.height(),
        -dx,
        -dy
    );
    Composite {
        image: canvas,
        status: CompositeStatus::Stitched {
            offset_x: dx,
            offset_y: dy,
        },
    }
}
