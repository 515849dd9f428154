// Evidence pools supplied by the extraction collaborators
// All pools are read-only inputs; the engine never persists them.

use image::RgbImage;

/// Raw image bytes for one candidate slot. `None` marks an absent blob or
/// one suppressed by deduplication.
pub type ImageBlob = Option<Vec<u8>>;

/// Per-page image groups, aligned 1:1 with the page text pool.
pub type ImageGroups = Vec<Vec<ImageBlob>>;

/// A loose image file, independently indexed from the page pools.
#[derive(Debug, Clone)]
pub struct NamedImage {
    pub name: String,
    pub image: RgbImage,
}

/// Everything the engine consumes: page texts, their aligned image groups,
/// and the loose image-file pool.
#[derive(Debug, Clone, Default)]
pub struct MatchPools {
    /// One text blob per source page, insertion order = page order.
    pub page_texts: Vec<String>,
    /// Zero or more raw image blobs per page, same outer length and order
    /// as `page_texts`.
    pub page_images: ImageGroups,
    /// Loose image files from local enumeration.
    pub image_files: Vec<NamedImage>,
}

impl MatchPools {
    pub fn filenames(&self) -> Vec<&str> {
        self.image_files.iter().map(|f| f.name.as_str()).collect()
    }
}
