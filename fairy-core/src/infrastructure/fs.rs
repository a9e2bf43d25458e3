// fairy-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes `content` to `path` through a temporary file in the same directory,
/// so readers see either the previous file or the complete new one. Missing
/// parent directories are created.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file.as_file().sync_all()?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Serializes `value` as pretty JSON with sorted keys plus a trailing newline
/// and writes it atomically.
pub fn write_json_sorted<P, T>(path: P, value: &T) -> Result<(), InfrastructureError>
where
    P: AsRef<Path>,
    T: serde::Serialize + ?Sized,
{
    let mut text = crate::domain::canonical::pretty_sorted_json(value)?;
    text.push('\n');
    atomic_write(path, text)
}
