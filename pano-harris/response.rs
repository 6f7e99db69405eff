use pano_core::Image;
use rayon::prelude::*;
use crate::structure::{IXX, IXY, IYY};

/// Harris sensitivity constant in `det(S) - alpha * trace(S)^2`
pub const ALPHA: f32 = 0.06;

/// Cornerness `det(S) - alpha * trace(S)^2` for every pixel of a structure
/// tensor field.
pub fn cornerness_response(tensor: &Image) -> Image {
    let plane = tensor.plane_len();
    let mut response = tensor.zeros_like(1);

    response
        .data
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, r)| {
            let ixx = tensor.data[IXX * plane + i];
            let iyy = tensor.data[IYY * plane + i];
            let ixy = tensor.data[IXY * plane + i];
            let det = ixx * iyy - ixy * ixy;
            let trace = ixx + iyy;
            *r = det - ALPHA * trace * trace;
        });

    response
}

/// True when no sample in the window `[x - w, x + w) × [y - w, y + w)` is
/// strictly greater than the centre. Off-image samples read the clamped
/// edge value; equal values do not disqualify.
pub fn is_local_max(response: &Image, x: isize, y: isize, w: isize) -> bool {
    let centre = response.get_pixel(x, y, 0);
    !(y - w..y + w).any(|ny| (x - w..x + w).any(|nx| response.get_pixel(nx, ny, 0) > centre))
}

/// Non-max suppression: every pixel that is not a local maximum within
/// half-width `w` drops to negative infinity.
pub fn nms_image(response: &Image, w: usize) -> Image {
    let width = response.width();
    let mut out = response.channel(0);
    let w = w as isize;

    out.data
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, value) in row.iter_mut().enumerate() {
                if !is_local_max(response, x as isize, y as isize, w) {
                    *value = f32::NEG_INFINITY;
                }
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn peak_map(size: usize, peaks: &[(isize, isize, f32)]) -> Image {
        let mut im = Image::new(size, size, 1);
        for &(x, y, v) in peaks {
            im.set_pixel(x, y, 0, v);
        }
        im
    }

    #[test]
    fn test_cornerness_formula() {
        let mut tensor = Image::new(1, 1, 3);
        tensor.data.copy_from_slice(&[4.0, 3.0, 1.0]);
        let r = cornerness_response(&tensor);
        // det = 12 - 1, trace = 7
        assert_relative_eq!(r.data[0], 11.0 - ALPHA * 49.0, epsilon = 1e-5);
    }

    #[test]
    fn test_edge_response_is_negative() {
        let mut tensor = Image::new(1, 1, 3);
        tensor.data.copy_from_slice(&[10.0, 0.0, 0.0]);
        assert!(cornerness_response(&tensor).data[0] < 0.0);
    }

    #[test]
    fn test_nms_window_excludes_positive_edge() {
        // Larger response exactly +2 to the right lies outside [-2, 2)
        let map = peak_map(9, &[(4, 4, 5.0), (6, 4, 10.0)]);
        let out = nms_image(&map, 2);
        assert_eq!(out.get_pixel(4, 4, 0), 5.0);

        let map = peak_map(9, &[(4, 4, 5.0), (4, 6, 10.0)]);
        assert_eq!(nms_image(&map, 2).get_pixel(4, 4, 0), 5.0);
    }

    #[test]
    fn test_nms_window_includes_negative_edge() {
        let map = peak_map(9, &[(4, 4, 5.0), (2, 4, 10.0)]);
        let out = nms_image(&map, 2);
        assert_eq!(out.get_pixel(4, 4, 0), f32::NEG_INFINITY);
        assert_eq!(out.get_pixel(2, 4, 0), 10.0);

        let map = peak_map(9, &[(4, 4, 5.0), (4, 2, 10.0)]);
        assert_eq!(nms_image(&map, 2).get_pixel(4, 4, 0), f32::NEG_INFINITY);
    }

    #[test]
    fn test_nms_ties_survive() {
        let map = peak_map(9, &[(4, 4, 7.0), (5, 4, 7.0)]);
        let out = nms_image(&map, 2);
        assert_eq!(out.get_pixel(4, 4, 0), 7.0);
        assert_eq!(out.get_pixel(5, 4, 0), 7.0);
    }

    #[test]
    fn test_nms_windows_hanging_off_the_image() {
        // Windows of edge pixels extend to negative coordinates
        let map = peak_map(5, &[(0, 0, 9.0), (1, 0, 3.0)]);
        let out = nms_image(&map, 2);
        assert_eq!(out.get_pixel(1, 0, 0), f32::NEG_INFINITY);
        assert_eq!(out.get_pixel(0, 0, 0), 9.0);
    }

    proptest! {
        #[test]
        fn prop_nms_survivors_dominate_window(
            values in proptest::collection::vec(-10.0f32..10.0, 64),
            w in 1usize..4,
        ) {
            let map = Image::from_raw(8, 8, 1, values).unwrap();
            let out = nms_image(&map, w);
            let w = w as isize;
            for y in 0..8isize {
                for x in 0..8isize {
                    let v = out.get_pixel(x, y, 0);
                    if v == f32::NEG_INFINITY {
                        continue;
                    }
                    prop_assert_eq!(v, map.get_pixel(x, y, 0));
                    for ny in y - w..y + w {
                        for nx in x - w..x + w {
                            prop_assert!(map.get_pixel(nx, ny, 0) <= v);
                        }
                    }
                }
            }
        }
    }
}
