// End-to-end orchestration
// Runs the matching tiers in order, reduces the image pools, and resolves
// each row to at most one concrete image.

use image::RgbImage;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matcher::{
    match_bus_media, match_filenames, match_media_type, match_pages, MatcherConfig,
};
use crate::pools::MatchPools;
use crate::selector::{select_bus_media, select_page_media, SelectorConfig};
use crate::submission::{MatchResolution, SubmissionRow};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
}

/// One row's final outcome: the match state written back onto the row plus
/// the image it resolved to, if any.
pub struct RowOutcome {
    pub image: Option<RgbImage>,
}

/// Run the full engine over one batch.
///
/// Mutates the rows' match state in place and returns one outcome per row,
/// in row order. Rows flagged for the bus fallback draw a uniformly random
/// image from the bus pool via the caller's RNG, so reruns with the same
/// seed reproduce the same assignment.
pub fn run<R: Rng>(
    rows: &mut [SubmissionRow],
    pools: &MatchPools,
    config: &PipelineConfig,
    rng: &mut R,
) -> Result<Vec<RowOutcome>> {
    log::info!(
        "Matching {} rows against {} pages and {} image files",
        rows.len(),
        pools.page_texts.len(),
        pools.image_files.len()
    );

    match_pages(rows, &pools.page_texts, config.matcher.forced_unit.as_deref());
    match_filenames(rows, &pools.filenames(), &config.matcher);
    match_media_type(rows, &pools.page_texts)?;
    match_bus_media(rows)?;

    let page_media = select_page_media(&pools.page_images, &config.selector);
    let bus_media = select_bus_media(&pools.page_images, &config.selector);

    let matched = rows.iter().filter(|r| r.is_matched()).count();
    log::info!(
        "{}/{} rows matched, {} pages with usable media, {} bus candidates",
        matched,
        rows.len(),
        page_media.iter().filter(|m| m.is_some()).count(),
        bus_media.len()
    );

    let outcomes = rows
        .iter()
        .map(|row| RowOutcome {
            image: resolve_row(row, &page_media, pools, &bus_media, rng),
        })
        .collect();

    Ok(outcomes)
}

/// Map one row's match state to a concrete image.
///
/// A page match whose group produced no usable image resolves to nothing,
/// as does an out-of-range page index from single-unit mode.
fn resolve_row<R: Rng>(
    row: &SubmissionRow,
    page_media: &[Option<RgbImage>],
    pools: &MatchPools,
    bus_media: &[RgbImage],
    rng: &mut R,
) -> Option<RgbImage> {
    match row.resolution {
        MatchResolution::Unmatched => None,
        MatchResolution::PdfPage(index) => page_media.get(index).cloned().flatten(),
        MatchResolution::FileImage(index) => {
            pools.image_files.get(index).map(|f| f.image.clone())
        }
        MatchResolution::BusFallback => {
            if bus_media.is_empty() {
                None
            } else {
                Some(bus_media[rng.gen_range(0..bus_media.len())].clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::NamedImage;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn png_bytes(image: &RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(image.clone())
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn flat(value: u8) -> RgbImage {
        RgbImage::from_pixel(400, 400, Rgb([value, value, value]))
    }

    fn row(unit: &str, vendor: &str, media_type: &str) -> SubmissionRow {
        SubmissionRow {
            unit_number: unit.into(),
            vendor: vendor.into(),
            media_type: media_type.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_page_match_resolves_to_page_image() {
        let mut rows = vec![row("12", "V1", "Poster")];
        let pools = MatchPools {
            page_texts: vec!["unit 12 spec sheet".into()],
            page_images: vec![vec![Some(png_bytes(&flat(77)))]],
            image_files: vec![],
        };
        let mut rng = StdRng::seed_from_u64(0);

        let outcomes = run(&mut rows, &pools, &PipelineConfig::default(), &mut rng).unwrap();
        assert_eq!(rows[0].resolution, MatchResolution::PdfPage(0));
        let image = outcomes[0].image.as_ref().unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [77, 77, 77]);
    }

    #[test]
    fn test_file_match_resolves_to_loose_file() {
        let mut rows = vec![row("34", "V1", "Poster")];
        let pools = MatchPools {
            page_texts: vec![],
            page_images: vec![],
            image_files: vec![NamedImage {
                name: "unit_34.jpg".into(),
                image: flat(9),
            }],
        };
        let mut rng = StdRng::seed_from_u64(0);

        let outcomes = run(&mut rows, &pools, &PipelineConfig::default(), &mut rng).unwrap();
        assert_eq!(rows[0].resolution, MatchResolution::FileImage(0));
        assert_eq!(outcomes[0].image.as_ref().unwrap().get_pixel(0, 0).0, [9, 9, 9]);
    }

    #[test]
    fn test_unmatched_row_gets_no_image() {
        let mut rows = vec![row("nope", "V1", "Poster")];
        let pools = MatchPools {
            page_texts: vec!["unrelated".into()],
            page_images: vec![vec![Some(png_bytes(&flat(1)))]],
            image_files: vec![],
        };
        let mut rng = StdRng::seed_from_u64(0);

        let outcomes = run(&mut rows, &pools, &PipelineConfig::default(), &mut rng).unwrap();
        assert_eq!(rows[0].resolution, MatchResolution::Unmatched);
        assert!(outcomes[0].image.is_none());
    }

    #[test]
    fn test_page_match_with_empty_group_resolves_to_nothing() {
        let mut rows = vec![row("12", "V1", "Poster")];
        let pools = MatchPools {
            page_texts: vec!["unit 12".into()],
            page_images: vec![vec![]],
            image_files: vec![],
        };
        let mut rng = StdRng::seed_from_u64(0);

        let outcomes = run(&mut rows, &pools, &PipelineConfig::default(), &mut rng).unwrap();
        assert_eq!(rows[0].resolution, MatchResolution::PdfPage(0));
        assert!(outcomes[0].image.is_none());
    }

    #[test]
    fn test_forced_unit_out_of_range_page_is_tolerated() {
        // Single-unit mode points row 1 at page 1, but the pool only has
        // one page group.
        let mut rows = vec![row("A", "V1", "Poster"), row("B", "V1", "Poster")];
        let pools = MatchPools {
            page_texts: vec![],
            page_images: vec![vec![]],
            image_files: vec![],
        };
        let config = PipelineConfig {
            matcher: MatcherConfig {
                forced_unit: Some("B".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);

        let outcomes = run(&mut rows, &pools, &config, &mut rng).unwrap();
        assert_eq!(rows[1].resolution, MatchResolution::PdfPage(1));
        assert!(outcomes[1].image.is_none());
    }

    #[test]
    fn test_bus_fallback_draw_is_seed_deterministic() {
        let bus = crate::scoring::tests::bus_block(400, 400);
        let pools = MatchPools {
            page_texts: vec![],
            page_images: vec![vec![Some(png_bytes(&bus))]],
            image_files: vec![],
        };

        let make_rows = || vec![row("1", "V1", "Bus Shelter")];

        let mut first_rows = make_rows();
        let mut rng = StdRng::seed_from_u64(42);
        let first = run(&mut first_rows, &pools, &PipelineConfig::default(), &mut rng).unwrap();

        let mut second_rows = make_rows();
        let mut rng = StdRng::seed_from_u64(42);
        let second = run(&mut second_rows, &pools, &PipelineConfig::default(), &mut rng).unwrap();

        assert_eq!(first_rows[0].resolution, MatchResolution::BusFallback);
        let a = first[0].image.as_ref().unwrap();
        let b = second[0].image.as_ref().unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_bus_fallback_with_empty_pool_yields_nothing() {
        let mut rows = vec![row("1", "V1", "Bus Bench")];
        let pools = MatchPools::default();
        let mut rng = StdRng::seed_from_u64(0);

        let outcomes = run(&mut rows, &pools, &PipelineConfig::default(), &mut rng).unwrap();
        assert_eq!(rows[0].resolution, MatchResolution::BusFallback);
        assert!(outcomes[0].image.is_none());
    }
}
