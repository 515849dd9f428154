// Map detection: limited-palette rasters and road-grid map tiles
// Maps sneak into vendor PDFs as location aids and must never win selection.

use image::RgbImage;
use imageproc::edges::canny;
use imageproc::hough::{detect_lines, LineDetectionOptions};

use crate::constants::{
    CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD, GOOGLE_MAP_HOUGH_VOTE_THRESHOLD,
    GOOGLE_MAP_MIN_MASK_AREA, GOOGLE_MAP_MIN_SEGMENTS, HOUGH_SUPPRESSION_RADIUS, MAP_BLUE_HUE,
    MAP_BLUE_SAT_MIN, MAP_BLUE_VAL_MIN, MAP_GREEN_HUE, MAP_GREEN_SAT_MIN, MAP_GREEN_VAL_MIN,
    MAP_VARIANCE_MAX,
};
use crate::scoring::raster::{rgb_to_hsv, variance};

/// Maps tend to use a limited color palette, so overall pixel variance
/// stays low.
pub fn is_map(image: &RgbImage) -> bool {
    variance(image.as_raw()) < MAP_VARIANCE_MAX
}

/// Web map tiles show a dense road grid plus the service's signature
/// water-blue and park-green fills.
pub fn is_google_map(image: &RgbImage) -> bool {
    let gray = image::imageops::grayscale(image);
    let edges = canny(&gray, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD);

    let segments = detect_lines(
        &edges,
        LineDetectionOptions {
            vote_threshold: GOOGLE_MAP_HOUGH_VOTE_THRESHOLD,
            suppression_radius: HOUGH_SUPPRESSION_RADIUS,
        },
    )
    .len();

    if segments <= GOOGLE_MAP_MIN_SEGMENTS {
        return false;
    }

    let (blue_area, green_area) = map_color_areas(image);
    blue_area > GOOGLE_MAP_MIN_MASK_AREA && green_area > GOOGLE_MAP_MIN_MASK_AREA
}

/// Pixel counts inside the blue and green hue ranges.
pub(crate) fn map_color_areas(image: &RgbImage) -> (usize, usize) {
    let mut blue_area = 0;
    let mut green_area = 0;

    for pixel in image.pixels() {
        let [r, g, b] = pixel.0;
        let (h, s, v) = rgb_to_hsv(r, g, b);

        if (MAP_BLUE_HUE.0..=MAP_BLUE_HUE.1).contains(&h)
            && s >= MAP_BLUE_SAT_MIN
            && v >= MAP_BLUE_VAL_MIN
        {
            blue_area += 1;
        }
        if (MAP_GREEN_HUE.0..=MAP_GREEN_HUE.1).contains(&h)
            && s >= MAP_GREEN_SAT_MIN
            && v >= MAP_GREEN_VAL_MIN
        {
            green_area += 1;
        }
    }

    (blue_area, green_area)
}
