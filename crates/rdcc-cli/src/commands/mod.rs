pub mod fmt;
pub mod init;
pub mod inspect;

use rdcc_schema::{parse_manifest_file, ComponentManifest};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_MANIFEST_NOT_FOUND: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn load_manifest(path: &Path) -> Result<ComponentManifest, String> {
    tracing::debug!("loading manifest from {}", path.display());
    let manifest = parse_manifest_file(path).map_err(|e| e.to_string())?;
    tracing::debug!(
        image = %manifest.full_image_reference(),
        kind = %manifest.kind(),
        "manifest validated"
    );
    Ok(manifest)
}

pub fn write_atomic(dest: &Path, content: &str) -> Result<(), String> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| format!("write temp file: {e}"))?;
    use std::io::Write;
    tmp.write_all(content.as_bytes())
        .map_err(|e| format!("write temp file: {e}"))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| format!("fsync temp file: {e}"))?;
    tmp.persist(dest)
        .map_err(|e| format!("persist {}: {}", dest.display(), e.error))?;
    tracing::info!("wrote {}", dest.display());
    Ok(())
}

pub fn colorize_kind(manifest: &ComponentManifest) -> String {
    use console::Style;
    let kind = manifest.kind().as_str();
    if manifest.is_base() {
        Style::new().green().apply_to(kind).to_string()
    } else if manifest.is_install_component() {
        Style::new().cyan().apply_to(kind).to_string()
    } else {
        Style::new().yellow().apply_to(kind).to_string()
    }
}

/// Map an error message from a command to its process exit code.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("failed to read manifest") {
        EXIT_MANIFEST_NOT_FOUND
    } else if msg.starts_with("manifest error:") || msg.starts_with("failed to parse manifest") {
        EXIT_MANIFEST_ERROR
    } else {
        EXIT_FAILURE
    }
}
