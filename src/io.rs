use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tga::TgaEncoder;
use image::{ColorType, ImageEncoder, ImageError, RgbImage};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canvas::{CanvasState, MAX_CANVAS_DIM};

// ============================================================================
// SAVE FORMATS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SaveFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
    Tga,
    /// Native project file
    Ppd,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Jpeg => "jpg",
            SaveFormat::Bmp => "bmp",
            SaveFormat::Tga => "tga",
            SaveFormat::Ppd => "ppd",
        }
    }

    /// Match a format name or file extension, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "png" => Some(SaveFormat::Png),
            "jpg" | "jpeg" => Some(SaveFormat::Jpeg),
            "bmp" => Some(SaveFormat::Bmp),
            "tga" => Some(SaveFormat::Tga),
            "ppd" => Some(SaveFormat::Ppd),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_name)
    }
}

/// File name offered for a download: empty names become `drawing.png`,
/// anything not already ending in `.png` gets the extension appended.
pub fn download_file_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "drawing.png".to_string()
    } else if name.ends_with(".png") {
        name.to_string()
    } else {
        format!("{}.png", name)
    }
}

/// Encode and write a raster image. `.ppd` goes through [`save_ppd`] instead.
pub fn encode_and_write(
    image: &RgbImage,
    path: &Path,
    format: SaveFormat,
    quality: u8,
) -> Result<(), ImageError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let (w, h) = image.dimensions();

    match format {
        SaveFormat::Png => {
            PngEncoder::new(&mut writer).write_image(image.as_raw(), w, h, ColorType::Rgb8)?;
        }
        SaveFormat::Jpeg => {
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
            encoder.encode(image.as_raw(), w, h, ColorType::Rgb8)?;
        }
        SaveFormat::Bmp => {
            let mut encoder = BmpEncoder::new(&mut writer);
            encoder.encode(image.as_raw(), w, h, ColorType::Rgb8)?;
        }
        SaveFormat::Tga => {
            TgaEncoder::new(&mut writer).encode(image.as_raw(), w, h, ColorType::Rgb8)?;
        }
        SaveFormat::Ppd => {
            return Err(ImageError::IoError(std::io::Error::other(
                "project files are written with save_ppd",
            )));
        }
    }

    Ok(())
}

// ============================================================================
// PPD PROJECT FILE FORMAT
// ============================================================================

const PPD_MAGIC_V1: &str = "PPD1";

#[derive(Serialize, Deserialize)]
struct ProjectFileV1 {
    magic: String,
    width: u32,
    height: u32,
    /// Row-major RGB8
    pixels: Vec<u8>,
}

#[derive(Debug)]
pub enum ProjectFileError {
    Io(std::io::Error),
    Serialize(String),
    InvalidFormat(String),
}

impl fmt::Display for ProjectFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectFileError::Io(e) => write!(f, "I/O error: {}", e),
            ProjectFileError::Serialize(e) => write!(f, "Serialization error: {}", e),
            ProjectFileError::InvalidFormat(e) => write!(f, "Invalid format: {}", e),
        }
    }
}

impl std::error::Error for ProjectFileError {}

impl From<std::io::Error> for ProjectFileError {
    fn from(e: std::io::Error) -> Self {
        ProjectFileError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for ProjectFileError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        ProjectFileError::Serialize(e.to_string())
    }
}

pub fn save_ppd(state: &CanvasState, path: &Path) -> Result<(), ProjectFileError> {
    let project = ProjectFileV1 {
        magic: PPD_MAGIC_V1.to_string(),
        width: state.width(),
        height: state.height(),
        pixels: state.pixels.as_raw().clone(),
    };
    let writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(writer, &project)?;
    Ok(())
}

pub fn load_ppd(path: &Path) -> Result<CanvasState, ProjectFileError> {
    let raw = std::fs::read(path)?;
    if raw.len() < 12 {
        return Err(ProjectFileError::InvalidFormat("File too small".into()));
    }

    // bincode writes a String as an 8-byte length prefix followed by UTF-8,
    // so the 4-char magic sits at bytes 8..12.
    let magic = std::str::from_utf8(&raw[8..12]).unwrap_or("");
    if magic != PPD_MAGIC_V1 {
        return Err(ProjectFileError::InvalidFormat(format!(
            "Unknown magic '{}'",
            magic
        )));
    }

    let project: ProjectFileV1 = bincode::deserialize(&raw)?;
    let (w, h) = (project.width, project.height);
    if w == 0 || h == 0 || w > MAX_CANVAS_DIM || h > MAX_CANVAS_DIM {
        return Err(ProjectFileError::InvalidFormat(format!(
            "Canvas size {}x{} out of range",
            w, h
        )));
    }
    let expected = w as usize * h as usize * 3;
    if project.pixels.len() != expected {
        return Err(ProjectFileError::InvalidFormat(format!(
            "Expected {} pixel bytes, found {}",
            expected,
            project.pixels.len()
        )));
    }

    RgbImage::from_raw(w, h, project.pixels)
        .map(CanvasState::from_rgb_image)
        .ok_or_else(|| ProjectFileError::InvalidFormat("Pixel buffer mismatch".into()))
}

// ============================================================================
// SYNCHRONOUS IMAGE LOADER
// ============================================================================

/// Load a `.ppd` project or any raster the `image` crate decodes.
/// Alpha, if present, is dropped.
pub fn load_image_sync(path: &Path) -> Result<CanvasState, String> {
    if SaveFormat::from_path(path) == Some(SaveFormat::Ppd) {
        return load_ppd(path).map_err(|e| e.to_string());
    }

    let img = image::open(path).map_err(|e| e.to_string())?.to_rgb8();
    let (w, h) = img.dimensions();
    if w > MAX_CANVAS_DIM || h > MAX_CANVAS_DIM {
        return Err(format!("image {}x{} exceeds the maximum canvas size", w, h));
    }
    Ok(CanvasState::from_rgb_image(img))
}

// ============================================================================
// CANVAS STORE — key-value persistence for the working canvas
// ============================================================================

/// Slot the editor autosaves into.
pub const AUTOSAVE_KEY: &str = "canvasContent";

#[derive(Debug)]
pub enum StoreError {
    InvalidKey(String),
    Io(std::io::Error),
    Image(ImageError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidKey(k) => write!(f, "invalid store key '{}'", k),
            StoreError::Io(e) => write!(f, "store I/O error: {}", e),
            StoreError::Image(e) => write!(f, "stored image error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<ImageError> for StoreError {
    fn from(e: ImageError) -> Self {
        StoreError::Image(e)
    }
}

/// Directory-backed key-value store; each key holds one PNG.
#[derive(Clone, Debug)]
pub struct CanvasStore {
    root: PathBuf,
}

impl CanvasStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<data dir>/Pixelpad/storage`
    pub fn default_location() -> Self {
        Self::new(crate::logger::data_dir().join("Pixelpad").join("storage"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.png", key)))
    }

    pub fn save(&self, key: &str, image: &RgbImage) -> Result<(), StoreError> {
        let path = self.entry_path(key)?;
        std::fs::create_dir_all(&self.root)?;
        encode_and_write(image, &path, SaveFormat::Png, 100)?;
        Ok(())
    }

    /// `Ok(None)` when nothing is stored under `key`.
    pub fn load(&self, key: &str) -> Result<Option<RgbImage>, StoreError> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(image::open(&path)?.to_rgb8()))
    }

    /// Removing a missing key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.entry_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PixelSurface;
    use image::Rgb;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pixelpad-io-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_canvas() -> CanvasState {
        let mut canvas = CanvasState::new(5, 3);
        canvas.set_pixel(4, 2, Rgb([10, 20, 30]));
        canvas.set_pixel(0, 1, Rgb([200, 0, 7]));
        canvas
    }

    #[test]
    fn download_names() {
        assert_eq!(download_file_name(""), "drawing.png");
        assert_eq!(download_file_name("   "), "drawing.png");
        assert_eq!(download_file_name("cat.png"), "cat.png");
        assert_eq!(download_file_name("cat"), "cat.png");
        assert_eq!(download_file_name("cat.jpg"), "cat.jpg.png");
    }

    #[test]
    fn formats_from_names_and_paths() {
        assert_eq!(SaveFormat::from_name("JPEG"), Some(SaveFormat::Jpeg));
        assert_eq!(SaveFormat::from_name("gif"), None);
        assert_eq!(
            SaveFormat::from_path(Path::new("a/b/c.PPD")),
            Some(SaveFormat::Ppd)
        );
        assert_eq!(SaveFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn project_file_keeps_pixels() {
        let dir = scratch_dir();
        let path = dir.join("doc.ppd");
        let canvas = sample_canvas();
        save_ppd(&canvas, &path).unwrap();
        let loaded = load_image_sync(&path).unwrap();
        assert_eq!(loaded.pixels, canvas.pixels);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn project_file_rejects_foreign_data() {
        let dir = scratch_dir();
        let path = dir.join("bogus.ppd");
        std::fs::write(&path, b"definitely not a project file").unwrap();
        assert!(matches!(
            load_ppd(&path),
            Err(ProjectFileError::InvalidFormat(_))
        ));
        std::fs::write(&path, b"short").unwrap();
        assert!(load_ppd(&path).is_err());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn png_export_is_lossless() {
        let dir = scratch_dir();
        let path = dir.join("out.png");
        let canvas = sample_canvas();
        encode_and_write(&canvas.pixels, &path, SaveFormat::Png, 90).unwrap();
        let loaded = load_image_sync(&path).unwrap();
        assert_eq!(loaded.pixels, canvas.pixels);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn store_save_load_remove() {
        let dir = scratch_dir();
        let store = CanvasStore::new(dir.join("storage"));
        assert!(store.load(AUTOSAVE_KEY).unwrap().is_none());

        let canvas = sample_canvas();
        store.save(AUTOSAVE_KEY, &canvas.pixels).unwrap();
        assert_eq!(store.load(AUTOSAVE_KEY).unwrap(), Some(canvas.pixels.clone()));

        store.remove(AUTOSAVE_KEY).unwrap();
        assert!(store.load(AUTOSAVE_KEY).unwrap().is_none());
        store.remove(AUTOSAVE_KEY).unwrap();
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn store_rejects_path_like_keys() {
        let store = CanvasStore::new(scratch_dir());
        assert!(matches!(
            store.load("../escape"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(store.remove("").is_err());
        let _ = std::fs::remove_dir_all(store.root());
    }
}
