// Layered submission matching
// Tiers run in a fixed order; each one only touches rows the earlier
// tiers left unresolved.

pub mod vendor;


use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::{BUS_MEDIA_MARKER, MEDIA_TYPE_SPLIT_CHARS};
use crate::error::Result;
use crate::submission::{MatchResolution, SubmissionRow};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Single-unit mode: only rows with exactly this unit number match,
    /// via the self-referential page shortcut.
    #[serde(default)]
    pub forced_unit: Option<String>,
    /// When set, a filename index is consumed by the first row that
    /// claims it. Off by default: historically several rows could share
    /// one file and downstream depends on that.
    #[serde(default)]
    pub unique_file_matches: bool,
}

/// Tiers 1 and 2: forced unit match, then multi-field content scoring
/// against the page text pool.
pub fn match_pages(rows: &mut [SubmissionRow], page_texts: &[String], forced_unit: Option<&str>) {
    if let Some(unit) = forced_unit {
        for (index, row) in rows.iter_mut().enumerate() {
            if !row.is_matched() && row.unit_number == unit {
                // Self-referential shortcut used only in single-unit mode.
                row.resolution = MatchResolution::PdfPage(index);
            }
        }
    }

    for row in rows.iter_mut() {
        if row.is_matched() {
            continue;
        }

        let mut best: Option<(usize, u32)> = None;
        for (page_index, content) in page_texts.iter().enumerate() {
            let score = evidence_score(row, content);
            // Strictly greater keeps the lowest page index on ties.
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((page_index, score));
            }
        }

        if let Some((page_index, score)) = best {
            log::debug!(
                "Unit '{}' matched page {} with score {}",
                row.unit_number,
                page_index,
                score
            );
            row.resolution = MatchResolution::PdfPage(page_index);
        }
    }
}

/// Tier 3: filenames correspond to unit numbers (or occasionally media
/// types), so a plain substring scan resolves rows the page text missed.
pub fn match_filenames(rows: &mut [SubmissionRow], filenames: &[&str], config: &MatcherConfig) {
    // Indexes already held by matched rows count as taken, so re-running
    // the tier cannot hand an assigned file to a second row.
    let mut consumed: HashSet<usize> = rows
        .iter()
        .filter_map(|row| row.resolution.file_index())
        .collect();

    for row in rows.iter_mut() {
        if row.is_matched() {
            continue;
        }

        let unit = row.unit_number.trim().to_lowercase();
        let media_type = row.media_type.trim().to_lowercase();

        for (index, filename) in filenames.iter().enumerate() {
            if config.unique_file_matches && consumed.contains(&index) {
                continue;
            }
            let cleaned = filename.trim().to_lowercase();
            let hit = (!unit.is_empty() && cleaned.contains(&unit))
                || (!media_type.is_empty() && cleaned.contains(&media_type));
            if hit {
                consumed.insert(index);
                row.resolution = MatchResolution::FileImage(index);
                break;
            }
        }
    }
}

/// Tier 4: vendor-level media-type fallback. Runs only for vendors whose
/// every row is still unmatched; a single "bus" media type anywhere in the
/// group aborts the fallback for that whole vendor.
pub fn match_media_type(rows: &mut [SubmissionRow], page_texts: &[String]) -> Result<()> {
    let gate = vendor::vendors_all_unmatched(rows)?;

    for (vendor_name, all_unmatched) in gate {
        if !all_unmatched {
            continue;
        }

        for index in vendor::vendor_rows(rows, &vendor_name) {
            let media_type = rows[index].media_type.to_lowercase();
            if media_type.contains(BUS_MEDIA_MARKER) {
                // Group-wide early exit: no further rows in this vendor.
                log::debug!("Vendor '{}' contains bus inventory, skipping media-type fallback", vendor_name);
                break;
            }

            'pages: for (page_index, content) in page_texts.iter().enumerate() {
                let content = content.to_lowercase();

                if token_in_content(media_type.trim(), &content) {
                    rows[index].resolution = MatchResolution::PdfPage(page_index);
                    break 'pages;
                }

                if media_type.contains(MEDIA_TYPE_SPLIT_CHARS) {
                    for part in media_type.split(MEDIA_TYPE_SPLIT_CHARS) {
                        if token_in_content(part.trim(), &content) {
                            rows[index].resolution = MatchResolution::PdfPage(page_index);
                            break 'pages;
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Tier 5: vendor-level bus fallback. A still-fully-unmatched vendor with
/// any "bus" media type gets the blanket flag on every row; the actual
/// image is picked from the bus pool at selection time.
pub fn match_bus_media(rows: &mut [SubmissionRow]) -> Result<()> {
    let gate = vendor::vendors_all_unmatched(rows)?;

    for (vendor_name, all_unmatched) in gate {
        if !all_unmatched {
            continue;
        }

        let indices = vendor::vendor_rows(rows, &vendor_name);
        let contains_bus = indices
            .iter()
            .any(|&i| rows[i].media_type.to_lowercase().contains(BUS_MEDIA_MARKER));

        if contains_bus {
            log::debug!("Vendor '{}' flagged for bus fallback", vendor_name);
            for index in indices {
                rows[index].resolution = MatchResolution::BusFallback;
            }
        }
    }

    Ok(())
}

/// Tier 2 evidence: how many of the row's key values occur literally in
/// the page text. Missing fields contribute nothing.
fn evidence_score(row: &SubmissionRow, page_content: &str) -> u32 {
    let unit = strip_bracketed(&row.unit_number);
    let values = [
        unit.as_str(),
        row.latitude.as_str(),
        row.longitude.as_str(),
        row.size.as_str(),
    ];

    values
        .iter()
        .filter(|v| !v.trim().is_empty() && page_content.contains(v.trim()))
        .count() as u32
}

/// Remove parenthetical annotations from a unit number before comparison,
/// e.g. "5 (North)" becomes "5".
fn strip_bracketed(text: &str) -> String {
    let re = regex::Regex::new(r"\(.*?\)").unwrap();
    re.replace_all(text, "").trim().to_string()
}

/// Substring test with plural tolerance: the token also matches with
/// trailing "s" or "es" stripped.
fn token_in_content(token: &str, content: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    if content.contains(token) {
        return true;
    }
    let singular = token.trim_end_matches('s');
    if !singular.is_empty() && content.contains(singular) {
        return true;
    }
    let bare = token.trim_end_matches(['e', 's']);
    !bare.is_empty() && content.contains(bare)
}
