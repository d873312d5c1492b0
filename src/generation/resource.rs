//! Materializing fetched resources into URLs the card can reference.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use super::service::FetchedResource;
use crate::error::{GenerationError, GenerationResult};

/// Turns downloaded bytes into a locally usable resource handle.
pub trait ResourceStore {
    /// Stores `resource` and returns a URL for it.
    fn store(&self, resource: FetchedResource) -> GenerationResult<String>;
}

/// Embeds resources as `data:` URLs.
///
/// Self-contained, but large: a video embedded this way will not fit in a
/// share link.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlStore;

impl ResourceStore for DataUrlStore {
    fn store(&self, resource: FetchedResource) -> GenerationResult<String> {
        Ok(data_url(&resource.mime_type, &resource.bytes))
    }
}

/// Writes resources into a directory and returns `file://` URLs.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ResourceStore for DirectoryStore {
    fn store(&self, resource: FetchedResource) -> GenerationResult<String> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| GenerationError::download(format!("Failed to save video: {}", e)))?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let ext = extension_for(&resource.mime_type);
        let (path, mut file) = create_unique(&self.dir, &format!("card-{}", millis), ext)
            .map_err(|e| GenerationError::download(format!("Failed to save video: {}", e)))?;

        file.write_all(&resource.bytes)
            .map_err(|e| GenerationError::download(format!("Failed to save video: {}", e)))?;
        debug!(path = %path.display(), bytes = resource.bytes.len(), "Stored resource");

        let absolute = std::fs::canonicalize(&path).unwrap_or(path);
        Ok(format!("file://{}", absolute.display()))
    }
}

/// Files stored within one millisecond get `-1`, `-2`, ... suffixes.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Creates `<stem>.<ext>` in `dir`, or the first free suffixed name.
fn create_unique(dir: &Path, stem: &str, ext: &str) -> io::Result<(PathBuf, File)> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = match attempt {
            0 => format!("{}.{}", stem, ext),
            n => format!("{}-{}.{}", stem, n, ext),
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for {} in {}", stem, dir.display()),
    ))
}

/// Builds a `data:<mime>;base64,<payload>` URL.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    let mime = match mime_type.trim() {
        "" => "application/octet-stream",
        m => m,
    };
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

fn extension_for(mime_type: &str) -> &'static str {
    // Strip parameters such as "; codecs=..."
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    match essence {
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "bin",
    }
}
