// Urban scene detection: built structure lines under a flat sky band

use image::RgbImage;
use imageproc::edges::canny;
use imageproc::hough::{detect_lines, LineDetectionOptions};

use crate::constants::{
    CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD, HOUGH_SUPPRESSION_RADIUS, URBAN_HOUGH_VOTE_THRESHOLD,
    URBAN_MIN_LINES, URBAN_SKY_BAND_FRACTION, URBAN_SKY_VARIANCE_MAX,
};
use crate::scoring::raster::variance;

/// An outdoor unit photo usually shows strong vertical or horizontal
/// structure (poles, building edges) below a low-detail sky band.
pub fn is_urban_scene(image: &RgbImage) -> bool {
    let gray = image::imageops::grayscale(image);
    let edges = canny(&gray, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD);

    let lines = detect_lines(
        &edges,
        LineDetectionOptions {
            vote_threshold: URBAN_HOUGH_VOTE_THRESHOLD,
            suppression_radius: HOUGH_SUPPRESSION_RADIUS,
        },
    );

    // Angle 0 parameterizes a vertical line, 90 a horizontal one.
    let vertical = lines.iter().filter(|l| l.angle_in_degrees == 0).count();
    let horizontal = lines.iter().filter(|l| l.angle_in_degrees == 90).count();
    let has_structures = vertical >= URBAN_MIN_LINES || horizontal >= URBAN_MIN_LINES;
    if !has_structures {
        return false;
    }

    // Sky check: edge activity in the top band of the frame stays low when
    // the top of the photo is open sky.
    let band_height = (f64::from(edges.height()) * URBAN_SKY_BAND_FRACTION) as u32;
    if band_height == 0 {
        return false;
    }
    let band = image::imageops::crop_imm(&edges, 0, 0, edges.width(), band_height).to_image();
    let is_sky = variance(band.as_raw()) < URBAN_SKY_VARIANCE_MAX;

    is_sky && has_structures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_image_is_not_urban() {
        // No edges, so no structure lines.
        let flat = RgbImage::from_pixel(400, 400, image::Rgb([200, 220, 255]));
        assert!(!is_urban_scene(&flat));
    }

    #[test]
    fn test_smooth_gradient_is_not_urban() {
        let mut gradient = RgbImage::new(400, 400);
        for (x, _, p) in gradient.enumerate_pixels_mut() {
            let v = (x * 255 / 399) as u8;
            *p = image::Rgb([v, v, v]);
        }
        assert!(!is_urban_scene(&gradient));
    }

    #[test]
    fn test_degenerate_height_is_not_urban() {
        let sliver = RgbImage::from_pixel(400, 2, image::Rgb([0, 0, 0]));
        assert!(!is_urban_scene(&sliver));
    }
}
