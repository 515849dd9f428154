// Submission rows and match state

use serde::{Deserialize, Serialize};

/// How a row was resolved to a media item, if at all.
///
/// Replaces the historical sentinel triple (`match_image_index`,
/// `match_image_file_index`, `bus_media`, each -1 when unset) with a single
/// tagged value. The wire format keeps the sentinel fields so downstream
/// report generation and storage upload are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "MatchStateWire", into = "MatchStateWire")]
pub enum MatchResolution {
    #[default]
    Unmatched,
    /// Index into the page pool; the row's image comes from that page's
    /// reduced image group.
    PdfPage(usize),
    /// Index into the loose image-file pool.
    FileImage(usize),
    /// Vendor-wide bus flag; the image is picked from the bus pool at
    /// selection time.
    BusFallback,
}

impl MatchResolution {
    /// True iff the row was resolved by a text-matching tier. The bus
    /// fallback deliberately does not count as matched: it is a blanket
    /// vendor flag, not a per-row assignment.
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResolution::PdfPage(_) | MatchResolution::FileImage(_))
    }

    pub fn page_index(&self) -> Option<usize> {
        match self {
            MatchResolution::PdfPage(idx) => Some(*idx),
            _ => None,
        }
    }

    pub fn file_index(&self) -> Option<usize> {
        match self {
            MatchResolution::FileImage(idx) => Some(*idx),
            _ => None,
        }
    }
}

/// Legacy sentinel encoding of match state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct MatchStateWire {
    #[serde(default)]
    image_matched: bool,
    #[serde(default = "unset_index")]
    match_image_index: i64,
    #[serde(default = "unset_index")]
    match_image_file_index: i64,
    #[serde(default = "unset_index")]
    bus_media: i64,
}

fn unset_index() -> i64 {
    -1
}

impl From<MatchStateWire> for MatchResolution {
    fn from(wire: MatchStateWire) -> Self {
        // Priority order when a legacy producer set more than one field.
        if wire.match_image_index >= 0 {
            MatchResolution::PdfPage(wire.match_image_index as usize)
        } else if wire.match_image_file_index >= 0 {
            MatchResolution::FileImage(wire.match_image_file_index as usize)
        } else if wire.bus_media == 1 {
            MatchResolution::BusFallback
        } else {
            MatchResolution::Unmatched
        }
    }
}

impl From<MatchResolution> for MatchStateWire {
    fn from(resolution: MatchResolution) -> Self {
        MatchStateWire {
            image_matched: resolution.is_matched(),
            match_image_index: resolution.page_index().map_or(-1, |i| i as i64),
            match_image_file_index: resolution.file_index().map_or(-1, |i| i as i64),
            bus_media: if resolution == MatchResolution::BusFallback { 1 } else { -1 },
        }
    }
}

/// One inventory unit from a vendor spreadsheet.
///
/// All comparison fields are strings; latitude/longitude are compared as
/// text, never parsed. Fields the matcher does not use ride along in
/// `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionRow {
    #[serde(default)]
    pub unit_number: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub size: String,

    #[serde(flatten)]
    pub resolution: MatchResolution,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SubmissionRow {
    pub fn is_matched(&self) -> bool {
        self.resolution.is_matched()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_defaults_to_unmatched() {
        let row: SubmissionRow =
            serde_json::from_str(r#"{"unit_number": "12", "vendor": "V1"}"#).unwrap();
        assert_eq!(row.resolution, MatchResolution::Unmatched);
        assert!(!row.is_matched());
    }

    #[test]
    fn test_wire_round_trip() {
        let mut row = SubmissionRow {
            unit_number: "12".into(),
            vendor: "V1".into(),
            ..Default::default()
        };
        row.resolution = MatchResolution::PdfPage(3);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["image_matched"], true);
        assert_eq!(json["match_image_index"], 3);
        assert_eq!(json["match_image_file_index"], -1);
        assert_eq!(json["bus_media"], -1);

        let back: SubmissionRow = serde_json::from_value(json).unwrap();
        assert_eq!(back.resolution, MatchResolution::PdfPage(3));
    }

    #[test]
    fn test_bus_fallback_is_not_image_matched() {
        let json = serde_json::to_value(MatchResolution::BusFallback).unwrap();
        assert_eq!(json["image_matched"], false);
        assert_eq!(json["bus_media"], 1);
    }

    #[test]
    fn test_wire_priority_order() {
        // A legacy producer that set both indexes resolves as a page match.
        let wire = r#"{"match_image_index": 2, "match_image_file_index": 4, "bus_media": 1}"#;
        let resolution: MatchResolution = serde_json::from_str(wire).unwrap();
        assert_eq!(resolution, MatchResolution::PdfPage(2));
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let row: SubmissionRow = serde_json::from_str(
            r#"{"unit_number": "7", "vendor": "V1", "market": "Boston"}"#,
        )
        .unwrap();
        assert_eq!(row.extra["market"], "Boston");
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["market"], "Boston");
    }
}
