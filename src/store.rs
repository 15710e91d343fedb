use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::model::{CourseCollection, CourseRecord};

pub fn load(path: &Path) -> Result<CourseCollection> {
    let raw = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let collection: CourseCollection =
        serde_json::from_str(&raw).map_err(|e| CatalogError::json(path, e))?;
    debug!(path = ?path, courses = collection.courses.len(), "loaded collection");
    Ok(collection)
}

/// Write the whole collection through a temp file in the same directory, then
/// rename over the target so readers never see a half-written snapshot.
pub fn store(path: &Path, collection: &mut CourseCollection) -> Result<()> {
    if collection.total_courses.is_some() {
        collection.total_courses = Some(collection.courses.len());
    }
    let json = serde_json::to_string_pretty(collection).map_err(|e| CatalogError::json(path, e))?;
    write_atomic(path, json.as_bytes())?;
    info!(path = ?path, courses = collection.courses.len(), "stored collection");
    Ok(())
}

/// Side file holding whatever the assisted path accepted before a batch failed.
pub fn store_partial(path: &Path, courses: &[CourseRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(courses).map_err(|e| CatalogError::json(path, e))?;
    write_atomic(path, json.as_bytes())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| CatalogError::io(dir, e))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CatalogError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| CatalogError::io(tmp.path(), e))?;
    tmp.write_all(b"\n").map_err(|e| CatalogError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| CatalogError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| CatalogError::io(path, e.error))?;
    Ok(())
}
