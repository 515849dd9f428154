// Bus detection: elongated 4+ sided contour at vehicle proportions

use image::RgbImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::{approximate_polygon_dp, arc_length};

use crate::constants::{
    BUS_APPROX_EPSILON_FRACTION, BUS_BLUR_SIGMA, BUS_MAX_ASPECT, BUS_MAX_CONTOUR_AREA,
    BUS_MIN_ASPECT, BUS_MIN_CONTOUR_AREA, BUS_MIN_VERTICES, CANNY_HIGH_THRESHOLD,
    CANNY_LOW_THRESHOLD,
};
use crate::scoring::raster::{bounding_rect, polygon_area};

/// Look for a contour with the footprint of a transit vehicle: mid-sized,
/// wider than tall, at least four polygon vertices.
pub fn is_bus(image: &RgbImage) -> bool {
    let gray = image::imageops::grayscale(image);
    let blurred = gaussian_blur_f32(&gray, BUS_BLUR_SIGMA);
    let edges = canny(&blurred, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD);

    for contour in find_contours::<u32>(&edges) {
        if contour.border_type != BorderType::Outer {
            continue;
        }

        let area = polygon_area(&contour.points);
        if area < BUS_MIN_CONTOUR_AREA || area > BUS_MAX_CONTOUR_AREA {
            continue;
        }

        let epsilon = BUS_APPROX_EPSILON_FRACTION * arc_length(&contour.points, true);
        let approx = approximate_polygon_dp(&contour.points, epsilon, true);

        let (_, _, w, h) = bounding_rect(&approx);
        if h == 0 {
            continue;
        }
        let aspect = f64::from(w) / f64::from(h);

        if approx.len() >= BUS_MIN_VERTICES && aspect > BUS_MIN_ASPECT && aspect < BUS_MAX_ASPECT {
            return true;
        }
    }

    false
}
