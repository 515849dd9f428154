// Shared raster math for the heuristic detectors

use image::GrayImage;
use imageproc::point::Point;

/// Population variance over raw channel values.
pub(crate) fn variance(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    values
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Variance of the Laplacian response, the texture measure used by the
/// billboard detector.
pub(crate) fn laplacian_variance(region: &GrayImage) -> f64 {
    let response = imageproc::filter::laplacian_filter(region);
    let values = response.as_raw();
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    values
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// RGB to HSV with hue on the 0-179 scale and saturation/value on 0-255,
/// matching the ranges the color-mask thresholds were tuned against.
pub(crate) fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let value = max;
    let saturation = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let hue_degrees = if delta == 0.0 {
        0.0
    } else if max == rf {
        let mut h = 60.0 * (gf - bf) / delta;
        if h < 0.0 {
            h += 360.0;
        }
        h
    } else if max == gf {
        60.0 * (bf - rf) / delta + 120.0
    } else {
        60.0 * (rf - gf) / delta + 240.0
    };

    (
        (hue_degrees / 2.0).round() as u8,
        saturation.round() as u8,
        value.round() as u8,
    )
}

/// Shoelace area of a traced contour boundary.
pub(crate) fn polygon_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut doubled = 0.0;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        doubled += f64::from(p.x) * f64::from(q.y) - f64::from(q.x) * f64::from(p.y);
    }
    doubled.abs() / 2.0
}

/// Axis-aligned bounding box of a point set as (x, y, width, height).
pub(crate) fn bounding_rect(points: &[Point<u32>]) -> (u32, u32, u32, u32) {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if points.is_empty() {
        return (0, 0, 0, 0);
    }
    (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}
