use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write content to a file atomically using a temporary file.
///
/// The temporary file lives in the target's directory (created if needed) so
/// the final rename never crosses filesystems. Readers see either the old
/// content or the new one, never a partial write.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Replace the directory at `destination` with one built by `fill`.
///
/// `fill` writes into a staging directory next to `destination`. Only when it
/// succeeds is the old directory moved aside and the staging one renamed into
/// place. If `fill` fails the old directory is left untouched; if the final
/// rename fails the old directory is restored.
pub fn publish_directory<F>(destination: &Path, fill: F) -> Result<(), InfrastructureError>
where
    F: FnOnce(&Path) -> Result<(), InfrastructureError>,
{
    let parent = destination.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let staging = tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(parent)?;
    fill(staging.path())?;
    let staged = staging.keep();

    let backup = backup_path(destination);
    let had_previous = destination.exists();
    if had_previous {
        if backup.exists() {
            fs::remove_dir_all(&backup)?;
        }
        fs::rename(destination, &backup)?;
    }

    if let Err(e) = fs::rename(&staged, destination) {
        if had_previous {
            fs::rename(&backup, destination)?;
        }
        let _ = fs::remove_dir_all(&staged);
        return Err(InfrastructureError::Io(e));
    }

    if had_previous {
        fs::remove_dir_all(&backup)?;
    }
    Ok(())
}

fn backup_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());
    destination.with_file_name(format!(".{name}.previous"))
}
