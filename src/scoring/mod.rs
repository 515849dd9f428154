// Image quality scoring
// Crude, explainable heuristics over a single decoded raster; not a model.

pub mod billboard;
pub mod bus;
pub mod map;
pub mod urban;

pub(crate) mod raster;


use image::RgbImage;

pub use billboard::is_billboard;
pub use bus::is_bus;
pub use map::{is_google_map, is_map};
pub use urban::is_urban_scene;

/// Generic outdoor-media score, range 0-4. Positive signals add a point;
/// map-like rasters lose the two negated points.
pub fn score_image(image: &RgbImage) -> u32 {
    let mut score = 0;
    if is_urban_scene(image) {
        score += 1;
    }
    if is_billboard(image) {
        score += 1;
    }
    if !is_map(image) {
        score += 1;
    }
    if !is_google_map(image) {
        score += 1;
    }
    score
}

/// Bus candidate score, range 0-2.
pub fn score_image_bus(image: &RgbImage) -> u32 {
    let mut score = 0;
    if is_bus(image) {
        score += 1;
    }
    if !is_google_map(image) {
        score += 1;
    }
    score
}
