use crate::contents_json::{write_contents_json, ContentsFile, ImageEntry};
use crate::face::{render_face, DESIGN_SIZE};
use anyhow::{anyhow, Context, Result};
use icns::{IconFamily, IconType};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    imageops::{self, FilterType},
    ColorType, ImageEncoder, Rgba, RgbaImage,
};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Settings for one generator run
#[derive(Debug)]
pub struct Options {
    pub root: PathBuf,
    pub color: String,
    pub contents_json: bool,
    pub icns: Option<PathBuf>,
}

/// One file of a macOS app icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconEntry {
    pub filename: &'static str,
    /// Edge length in pixels
    pub size: u32,
    /// Element type used when the set is bundled into an .icns file
    pub ostype: &'static str,
}

impl IconEntry {
    const fn new(filename: &'static str, size: u32, ostype: &'static str) -> Self {
        Self {
            filename,
            size,
            ostype,
        }
    }

    /// Pixel density, 2 for "@2x" files
    pub fn scale(&self) -> u32 {
        if self.filename.contains("@2x") {
            2
        } else {
            1
        }
    }

    /// Edge length in points
    pub fn points(&self) -> u32 {
        self.size / self.scale()
    }
}

/// The standard macOS AppIcon.appiconset, written identically into every output directory.
pub const ICON_SET: [IconEntry; 10] = [
    IconEntry::new("icon_16x16.png", 16, "is32"),
    IconEntry::new("icon_16x16@2x.png", 32, "ic11"),
    IconEntry::new("icon_32x32.png", 32, "il32"),
    IconEntry::new("icon_32x32@2x.png", 64, "ic12"),
    IconEntry::new("icon_128x128.png", 128, "ic07"),
    IconEntry::new("icon_128x128@2x.png", 256, "ic13"),
    IconEntry::new("icon_256x256.png", 256, "ic08"),
    IconEntry::new("icon_256x256@2x.png", 512, "ic14"),
    IconEntry::new("icon_512x512.png", 512, "ic09"),
    IconEntry::new("icon_512x512@2x.png", 1024, "ic10"),
];

/// Icon set directories of the app and its helper, relative to the output root.
pub const OUTPUT_DIRS: [&str; 2] = [
    "GoToShell/Assets.xcassets/AppIcon.appiconset",
    "GoToShellHelper/Assets.xcassets/AppIcon.appiconset",
];

pub fn generate_icons(options: Options) -> Result<()> {
    let color = parse_color(&options.color)?;

    println!("Rendering master icon ({DESIGN_SIZE}x{DESIGN_SIZE})...");
    let master = render_face(DESIGN_SIZE, color)?;

    let dirs: Vec<PathBuf> = OUTPUT_DIRS
        .iter()
        .map(|dir| options.root.join(dir))
        .collect();

    let written = write_icon_set(&master, &ICON_SET, &dirs)?;

    if options.contents_json {
        for dir in &dirs {
            let path = write_contents_json(dir, &build_contents_json(&ICON_SET))?;
            println!("Generated {}", path.display());
        }
    }

    if let Some(path) = &options.icns {
        generate_icns(&master, &ICON_SET, path)?;
    }

    println!("✓ Generated {written} icons");
    Ok(())
}

/// Parse a CSS color into an opaque RGBA pixel
///
/// Translucent colors are rejected; the face is always drawn opaque.
fn parse_color(color: &str) -> Result<Rgba<u8>> {
    let srgb = css_color::Srgb::from_str(color)
        .map_err(|_| anyhow!("Invalid face color: {color}"))?;
    if srgb.alpha < 1.0 {
        anyhow::bail!("Invalid face color: {color} is not opaque");
    }
    let channel = |value: f32| (value * 255.).round() as u8;
    Ok(Rgba([
        channel(srgb.red),
        channel(srgb.green),
        channel(srgb.blue),
        255,
    ]))
}

/// Resample `master` to every entry and write it into every directory.
///
/// Directories are not created: a missing one aborts the run. Existing files
/// are overwritten. Returns the number of files written.
pub fn write_icon_set<P: AsRef<Path>>(
    master: &RgbaImage,
    entries: &[IconEntry],
    dirs: &[P],
) -> Result<usize> {
    let premultiplied = premultiply(master);
    let mut written = 0;

    for dir in dirs {
        for entry in entries {
            let icon = resize_icon(&premultiplied, entry.size);
            let output_path = dir.as_ref().join(entry.filename);
            save_png(&icon, &output_path)?;
            println!(
                "Generated {} ({}x{})",
                output_path.display(),
                entry.size,
                entry.size
            );
            written += 1;
        }
    }

    Ok(written)
}

/// Describe `entries` as the Contents.json of a mac app icon set
fn build_contents_json(entries: &[IconEntry]) -> ContentsFile {
    let mut contents = ContentsFile::new("xcode".to_string());
    for entry in entries {
        contents.add_image(ImageEntry::new_mac_icon(
            entry.filename,
            entry.points(),
            entry.scale(),
        ));
    }
    contents
}

/// Bundle every entry of the icon set into a single .icns file
fn generate_icns(master: &RgbaImage, entries: &[IconEntry], path: &Path) -> Result<()> {
    println!("Generating {}...", path.display());
    let premultiplied = premultiply(master);
    let mut family = IconFamily::new();

    for entry in entries {
        let icon = resize_icon(&premultiplied, entry.size);

        let mut buf = Vec::new();
        write_png(icon.as_raw(), &mut buf, entry.size)?;
        let image = icns::Image::read_png(&buf[..])?;

        let ostype = entry
            .ostype
            .parse()
            .map_err(|_| anyhow!("Invalid OSType {}", entry.ostype))?;
        let icon_type = IconType::from_ostype(ostype)
            .with_context(|| format!("Unsupported icon type {}", entry.ostype))?;

        family
            .add_icon_with_type(&image, icon_type)
            .with_context(|| format!("Can't add {} to Icns Family", entry.filename))?;
    }

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    family.write(&mut out_file)?;
    out_file.flush()?;

    println!("✓ Generated {}", path.display());
    Ok(())
}

/// Lanczos3 downscale of a premultiplied master, returned with straight alpha.
///
/// Filtering premultiplied pixels keeps transparent black from bleeding into
/// the anti-aliased edges.
fn resize_icon(premultiplied: &RgbaImage, size: u32) -> RgbaImage {
    let mut icon = imageops::resize(premultiplied, size, size, FilterType::Lanczos3);
    demultiply(&mut icon);
    icon
}

fn premultiply(image: &RgbaImage) -> RgbaImage {
    let mut premultiplied = image.clone();
    for pixel in premultiplied.pixels_mut() {
        let alpha = u32::from(pixel[3]);
        for channel in &mut pixel.0[..3] {
            *channel = ((u32::from(*channel) * alpha + 127) / 255) as u8;
        }
    }
    premultiplied
}

fn demultiply(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let alpha = u32::from(pixel[3]);
        if alpha == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
            continue;
        }
        // Lanczos ringing can leave a channel above its alpha
        for channel in &mut pixel.0[..3] {
            *channel = ((u32::from(*channel) * 255 + alpha / 2) / alpha).min(255) as u8;
        }
    }
}

fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out_file = BufWriter::new(file);

    write_png(image.as_raw(), &mut out_file, image.width())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}

// Encode square RGBA data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, size: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, size, size, ColorType::Rgba8)?;
    Ok(())
}
