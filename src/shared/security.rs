use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of any input file (graph snapshots, configuration files)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Reads a file after validating that it is a regular file within the size limit.
///
/// # Security
/// Uses `symlink_metadata()` so the check applies to the link itself, not its target.
///
/// # Arguments
/// * `path` - The file to read
/// * `file_description` - Description of the file for error messages (e.g., "graph snapshot")
///
/// # Errors
/// Returns an error if:
/// - The metadata cannot be read
/// - The path is a symbolic link or not a regular file
/// - The file is larger than [`MAX_FILE_SIZE`]
pub fn read_regular_file(path: &Path, file_description: &str) -> Result<String> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", file_description, e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > MAX_FILE_SIZE {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            MAX_FILE_SIZE
        );
    }

    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_description, e))
}
