// AdMatch constants
// Threshold values are load-bearing: downstream report quality was tuned
// against these exact numbers. Do not change without re-running the
// vendor regression set.

pub const ENGINE_VERSION: u32 = 1;

// ----- Submission matching -----

// Columns that feed the Tier 2 evidence vector, in order.
pub const EVIDENCE_COLUMNS: [&str; 4] = ["unit_number", "latitude", "longitude", "size"];

// Media-type tokens are split on these before page lookup.
pub const MEDIA_TYPE_SPLIT_CHARS: [char; 2] = ['&', '@'];

// Substring that marks a vendor group as bus inventory.
pub const BUS_MEDIA_MARKER: &str = "bus";

// ----- Media selection -----

// Images with width or height below this never qualify.
pub const MIN_IMAGE_DIMENSION: u32 = 300;

// Bus candidates must score strictly above this baseline, i.e. at least
// two detector signals must agree.
pub const BUS_SCORE_FLOOR: u32 = 1;

// ----- Billboard detector -----

pub const BILLBOARD_MIN_CONTOUR_AREA: f64 = 500.0;
pub const BILLBOARD_MAX_AREA_FRACTION: f64 = 0.5;
pub const BILLBOARD_MIN_ASPECT: f64 = 0.3;
pub const BILLBOARD_MAX_ASPECT: f64 = 5.0;
pub const BILLBOARD_APPROX_EPSILON_FRACTION: f64 = 0.02;

// Texture variance floors (Laplacian); large panels carry relatively
// sparser texture so the floor drops past the area cutoff.
pub const TEXTURE_SMALL_AREA_CUTOFF: f64 = 10_000.0;
pub const TEXTURE_VARIANCE_SMALL: f64 = 100.0;
pub const TEXTURE_VARIANCE_LARGE: f64 = 50.0;

// ----- Urban scene detector -----

pub const URBAN_HOUGH_VOTE_THRESHOLD: u32 = 200;
pub const URBAN_MIN_LINES: usize = 5;
pub const URBAN_SKY_BAND_FRACTION: f64 = 0.3;
pub const URBAN_SKY_VARIANCE_MAX: f64 = 300.0;

// ----- Map detectors -----

pub const MAP_VARIANCE_MAX: f64 = 1200.0;

pub const GOOGLE_MAP_HOUGH_VOTE_THRESHOLD: u32 = 100;
pub const GOOGLE_MAP_MIN_SEGMENTS: usize = 5;
pub const GOOGLE_MAP_MIN_MASK_AREA: usize = 500;

// HSV hue ranges for typical map colors, on the 0-179 hue scale.
pub const MAP_BLUE_HUE: (u8, u8) = (110, 130);
pub const MAP_BLUE_SAT_MIN: u8 = 50;
pub const MAP_BLUE_VAL_MIN: u8 = 50;
pub const MAP_GREEN_HUE: (u8, u8) = (50, 70);
pub const MAP_GREEN_SAT_MIN: u8 = 100;
pub const MAP_GREEN_VAL_MIN: u8 = 100;

// ----- Bus detector -----

pub const BUS_MIN_CONTOUR_AREA: f64 = 1_000.0;
pub const BUS_MAX_CONTOUR_AREA: f64 = 50_000.0;
pub const BUS_MIN_ASPECT: f64 = 1.5;
pub const BUS_MAX_ASPECT: f64 = 4.0;
pub const BUS_APPROX_EPSILON_FRACTION: f64 = 0.01;
pub const BUS_MIN_VERTICES: usize = 4;
pub const BUS_BLUR_SIGMA: f32 = 1.1;

// ----- Edge detection -----

pub const CANNY_LOW_THRESHOLD: f32 = 50.0;
pub const CANNY_HIGH_THRESHOLD: f32 = 150.0;
pub const ADAPTIVE_THRESHOLD_BLOCK_RADIUS: u32 = 5;

// Hough peak suppression radius shared by both line detectors.
pub const HOUGH_SUPPRESSION_RADIUS: u32 = 8;
