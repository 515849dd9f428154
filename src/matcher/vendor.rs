// Vendor-group gating for the fallback tiers
// The fallback tiers are all-or-nothing per vendor: a single matched row
// disqualifies the whole group.

use std::collections::BTreeMap;

use crate::error::{AdMatchError, Result};
use crate::submission::SubmissionRow;

/// For each vendor, whether every row in the group is still unmatched.
///
/// Returns `MissingColumn` when no row carries a vendor value at all;
/// grouping has no meaning without the column and the caller has to fix
/// its input rather than fall through to a silent no-op.
pub fn vendors_all_unmatched(rows: &[SubmissionRow]) -> Result<BTreeMap<String, bool>> {
    if !rows.is_empty() && rows.iter().all(|r| r.vendor.trim().is_empty()) {
        return Err(AdMatchError::MissingColumn("vendor"));
    }

    let mut gate: BTreeMap<String, bool> = BTreeMap::new();
    for row in rows {
        let all_unmatched = gate.entry(row.vendor.clone()).or_insert(true);
        if row.is_matched() {
            *all_unmatched = false;
        }
    }

    for (vendor, all_unmatched) in &gate {
        if !all_unmatched {
            log::debug!("Vendor '{}' has matched rows, fallback skipped", vendor);
        }
    }

    Ok(gate)
}

/// Row indices belonging to one vendor, in submission order.
pub fn vendor_rows(rows: &[SubmissionRow], vendor: &str) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.vendor == vendor)
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::MatchResolution;

    fn row(vendor: &str) -> SubmissionRow {
        SubmissionRow {
            vendor: vendor.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_gate_reflects_match_state() {
        let mut rows = vec![row("V1"), row("V1"), row("V2")];
        rows[0].resolution = MatchResolution::PdfPage(0);

        let gate = vendors_all_unmatched(&rows).unwrap();
        assert_eq!(gate["V1"], false);
        assert_eq!(gate["V2"], true);
    }

    #[test]
    fn test_bus_fallback_counts_as_unmatched() {
        let mut rows = vec![row("V1")];
        rows[0].resolution = MatchResolution::BusFallback;

        let gate = vendors_all_unmatched(&rows).unwrap();
        assert_eq!(gate["V1"], true);
    }

    #[test]
    fn test_missing_vendor_column_is_an_error() {
        let rows = vec![row(""), row("  ")];
        assert!(matches!(
            vendors_all_unmatched(&rows),
            Err(AdMatchError::MissingColumn("vendor"))
        ));
    }

    #[test]
    fn test_empty_batch_is_fine() {
        assert!(vendors_all_unmatched(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_vendor_rows_preserve_order() {
        let rows = vec![row("V2"), row("V1"), row("V2")];
        assert_eq!(vendor_rows(&rows, "V2"), vec![0, 2]);
    }
}
