//! Contents.json data model for an Xcode `AppIcon.appiconset`
//!
//! Only the subset of Apple's asset catalog schema that a macOS app icon set
//! uses is modelled here: one entry per PNG with its idiom, point size and scale.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Root structure of a Contents.json file
#[derive(Serialize, Debug, Clone)]
pub struct ContentsFile {
    /// Array of image entries, one per icon file
    pub images: Vec<ImageEntry>,

    /// Versioning and authorship information
    pub info: Info,
}

/// Individual image entry within an app icon set
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// The PNG file inside the icon set directory
    pub filename: String,

    /// The device type for the image ("mac" for desktop app icons)
    pub idiom: String,

    /// The scale factor for the image (e.g., "1x", "2x")
    pub scale: String,

    /// The size of the image in points (e.g., "16x16", "512x512")
    pub size: String,
}

/// Versioning and authorship information for the asset catalog
#[derive(Serialize, Debug, Clone)]
pub struct Info {
    /// The format version of the asset catalog (always 1)
    pub version: u8,

    /// The application or tool that authored the asset catalog
    pub author: String,
}

impl ContentsFile {
    /// Creates a new Contents.json structure with the specified author
    ///
    /// # Arguments
    /// * `author` - The author recorded in the `info` block
    pub fn new(author: String) -> Self {
        Self {
            images: Vec::new(),
            info: Info { version: 1, author },
        }
    }

    /// Adds an image entry to the contents file
    pub fn add_image(&mut self, image: ImageEntry) {
        self.images.push(image);
    }
}

impl ImageEntry {
    /// Creates a macOS app icon entry
    ///
    /// # Arguments
    /// * `filename` - The PNG filename inside the icon set
    /// * `points` - The edge length in points
    /// * `scale` - The pixel density multiplier (1 or 2)
    pub fn new_mac_icon(filename: &str, points: u32, scale: u32) -> Self {
        Self {
            filename: filename.to_string(),
            idiom: "mac".to_string(),
            scale: format!("{scale}x"),
            size: format!("{points}x{points}"),
        }
    }
}

/// Writes `contents` as pretty printed Contents.json into `dir`
///
/// The directory must already exist; the file is overwritten.
///
/// # Returns
/// The path of the written file
pub fn write_contents_json(dir: &Path, contents: &ContentsFile) -> Result<PathBuf> {
    let path = dir.join("Contents.json");
    let json = serde_json::to_string_pretty(contents).context("Failed to serialize Contents.json")?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
