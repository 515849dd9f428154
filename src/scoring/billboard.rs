// Billboard detection: rectangular panel with significant interior texture

use image::{GrayImage, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::adaptive_threshold;
use imageproc::edges::canny;
use imageproc::geometry::{approximate_polygon_dp, arc_length};

use crate::constants::{
    ADAPTIVE_THRESHOLD_BLOCK_RADIUS, BILLBOARD_APPROX_EPSILON_FRACTION, BILLBOARD_MAX_ASPECT,
    BILLBOARD_MAX_AREA_FRACTION, BILLBOARD_MIN_ASPECT, BILLBOARD_MIN_CONTOUR_AREA,
    CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD, TEXTURE_SMALL_AREA_CUTOFF,
    TEXTURE_VARIANCE_LARGE, TEXTURE_VARIANCE_SMALL,
};
use crate::scoring::raster::{bounding_rect, laplacian_variance, polygon_area};

/// Look for a 4-sided contour of plausible panel proportions whose interior
/// carries real texture (printed creative rather than a blank face).
pub fn is_billboard(image: &RgbImage) -> bool {
    let gray = image::imageops::grayscale(image);

    // Adaptive thresholding holds up better than a global cut on photos
    // with uneven lighting.
    let thresh = adaptive_threshold(&gray, ADAPTIVE_THRESHOLD_BLOCK_RADIUS);
    let edges = canny(&thresh, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD);

    let image_area = f64::from(gray.width()) * f64::from(gray.height());

    for contour in find_contours::<u32>(&edges) {
        if contour.border_type != BorderType::Outer {
            continue;
        }

        let area = polygon_area(&contour.points);
        if area < BILLBOARD_MIN_CONTOUR_AREA || area > image_area * BILLBOARD_MAX_AREA_FRACTION {
            continue;
        }

        let epsilon = BILLBOARD_APPROX_EPSILON_FRACTION * arc_length(&contour.points, true);
        let approx = approximate_polygon_dp(&contour.points, epsilon, true);

        if approx.len() == 4 {
            let (x, y, w, h) = bounding_rect(&approx);
            if w == 0 || h == 0 {
                continue;
            }
            // Orientation-symmetric: a tall panel is as valid as a wide one.
            let aspect = f64::from(w.max(h)) / f64::from(w.min(h));

            if aspect > BILLBOARD_MIN_ASPECT && aspect < BILLBOARD_MAX_ASPECT {
                let region = image::imageops::crop_imm(&gray, x, y, w, h).to_image();
                if has_significant_texture(&region, area) {
                    return true;
                }
            }
        }
    }

    false
}

/// Texture check over the candidate panel region. Larger panels may carry
/// relatively sparser texture, so the floor drops with contour area.
fn has_significant_texture(region: &GrayImage, area: f64) -> bool {
    let floor = if area < TEXTURE_SMALL_AREA_CUTOFF {
        TEXTURE_VARIANCE_SMALL
    } else {
        TEXTURE_VARIANCE_LARGE
    };
    laplacian_variance(region) > floor
}
