// Per-group best-image reduction

use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{BUS_SCORE_FLOOR, MIN_IMAGE_DIMENSION};
use crate::dedup::suppress_duplicates;
use crate::pools::ImageGroups;
use crate::scoring::{score_image, score_image_bus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Images with width or height below this never qualify.
    pub min_dimension: u32,
    /// Bus candidates must score strictly above this baseline.
    pub bus_score_floor: u32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            min_dimension: MIN_IMAGE_DIMENSION,
            bus_score_floor: BUS_SCORE_FLOOR,
        }
    }
}

/// Reduce each page's image group to its best generic candidate.
///
/// Duplicates are suppressed pool-wide first, then each surviving blob is
/// decoded, dimension-filtered and scored. The output stays index-aligned
/// with the page pool: one slot per page, `None` when nothing qualifies.
pub fn select_page_media(groups: &ImageGroups, config: &SelectorConfig) -> Vec<Option<RgbImage>> {
    let deduped = suppress_duplicates(groups);

    deduped
        .par_iter()
        .map(|group| best_in_group(group, config, score_image, -1))
        .collect()
}

/// Reduce the pool to a flat set of acceptable bus images.
///
/// Acceptance requires the bus score strictly above the configured floor,
/// i.e. both heuristic signals agreeing at the default floor of 1. Pages
/// with no qualifying image are omitted, so the result is NOT index-aligned
/// with the page pool.
pub fn select_bus_media(groups: &ImageGroups, config: &SelectorConfig) -> Vec<RgbImage> {
    let deduped = suppress_duplicates(groups);

    deduped
        .par_iter()
        .filter_map(|group| {
            best_in_group(group, config, score_image_bus, i64::from(config.bus_score_floor))
        })
        .collect()
}

/// Score every decodable, large-enough blob in a group and keep the first
/// image scoring strictly above the running maximum, seeded with `floor`.
fn best_in_group(
    group: &[Option<Vec<u8>>],
    config: &SelectorConfig,
    score: fn(&RgbImage) -> u32,
    floor: i64,
) -> Option<RgbImage> {
    let mut best: Option<RgbImage> = None;
    let mut highest = floor;

    for (index, bytes) in group.iter().enumerate() {
        let Some(bytes) = bytes else {
            continue;
        };

        let image = match image::load_from_memory(bytes) {
            Ok(decoded) => decoded.to_rgb8(),
            Err(err) => {
                // A broken blob just means this slot has no candidate.
                log::debug!("Skipping undecodable image {}: {}", index, err);
                continue;
            }
        };

        let (w, h) = image.dimensions();
        if w < config.min_dimension || h < config.min_dimension {
            log::debug!("Skipping image {} below dimension threshold ({}x{})", index, w, h);
            continue;
        }

        let value = i64::from(score(&image));
        // Strictly greater keeps the first occurrence on ties.
        if value > highest {
            highest = value;
            best = Some(image);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(image: &RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(image.clone())
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn flat(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    fn gradient(width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for (x, _, p) in img.enumerate_pixels_mut() {
            let v = (x * 255 / (width - 1)) as u8;
            *p = Rgb([v, v, v]);
        }
        img
    }

    #[test]
    fn test_undersized_group_yields_null() {
        let group = vec![vec![
            Some(png_bytes(&flat(100, 100, 10))),
            Some(png_bytes(&flat(200, 299, 20))),
        ]];
        let result = select_page_media(&group, &SelectorConfig::default());
        assert_eq!(result.len(), 1);
        assert!(result[0].is_none());
    }

    #[test]
    fn test_highest_scoring_image_wins() {
        // Gradient scores 2 (not-map, not-google), flat scores 1.
        let group = vec![vec![
            Some(png_bytes(&flat(400, 400, 128))),
            Some(png_bytes(&gradient(400, 400))),
        ]];
        let result = select_page_media(&group, &SelectorConfig::default());
        let winner = result[0].as_ref().unwrap();
        assert_eq!(winner.get_pixel(0, 0).0, gradient(400, 400).get_pixel(0, 0).0);
        assert_eq!(winner.get_pixel(399, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_tie_keeps_first_occurrence() {
        // Two flat images, both scoring 1; different bytes so dedup keeps
        // them apart.
        let first = flat(400, 400, 100);
        let second = flat(400, 400, 200);
        let group = vec![vec![Some(png_bytes(&first)), Some(png_bytes(&second))]];
        let result = select_page_media(&group, &SelectorConfig::default());
        assert_eq!(result[0].as_ref().unwrap().get_pixel(0, 0).0, [100, 100, 100]);
    }

    #[test]
    fn test_output_stays_page_aligned() {
        let groups = vec![
            vec![],
            vec![Some(png_bytes(&flat(400, 400, 50)))],
            vec![None],
        ];
        let result = select_page_media(&groups, &SelectorConfig::default());
        assert_eq!(result.len(), 3);
        assert!(result[0].is_none());
        assert!(result[1].is_some());
        assert!(result[2].is_none());
    }

    #[test]
    fn test_duplicate_blobs_suppressed_before_selection() {
        let bytes = png_bytes(&flat(400, 400, 50));
        let groups = vec![vec![Some(bytes.clone())], vec![Some(bytes)]];
        let result = select_page_media(&groups, &SelectorConfig::default());
        assert!(result[0].is_none());
        assert!(result[1].is_none());
    }

    #[test]
    fn test_corrupt_blob_skipped() {
        let groups = vec![vec![
            Some(vec![0xde, 0xad, 0xbe, 0xef]),
            Some(png_bytes(&flat(400, 400, 50))),
        ]];
        let result = select_page_media(&groups, &SelectorConfig::default());
        assert!(result[0].is_some());
    }

    #[test]
    fn test_bus_pool_omits_unqualified_groups() {
        let bus = crate::scoring::tests::bus_block(400, 400);
        let groups = vec![
            vec![Some(png_bytes(&flat(400, 400, 128)))], // score 1, not above floor
            vec![Some(png_bytes(&bus))],                 // score 2, qualifies
            vec![],
        ];
        let result = select_bus_media(&groups, &SelectorConfig::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get_pixel(200, 180).0, [255, 255, 255]);
    }
}
