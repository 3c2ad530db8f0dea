use super::{json_pretty, load_manifest, write_atomic, EXIT_SUCCESS};
use std::fs;
use std::path::Path;

pub const DEFAULT_INDENT: usize = 2;

pub fn run(
    manifest_path: &Path,
    indent: usize,
    output: Option<&Path>,
    check: bool,
    json: bool,
) -> Result<u8, String> {
    let manifest = load_manifest(manifest_path)?;
    let mut canonical = manifest
        .to_json(indent)
        .map_err(|e| format!("JSON serialization failed: {e}"))?;
    canonical.push('\n');

    if check {
        let current = fs::read_to_string(manifest_path)
            .map_err(|e| format!("failed to read manifest file: {e}"))?;
        if current != canonical {
            return Err(format!(
                "{} is not in canonical form (run 'rdcc fmt')",
                manifest_path.display()
            ));
        }
        if json {
            let payload = serde_json::json!({
                "status": "canonical",
                "manifest": manifest_path,
            });
            println!("{}", json_pretty(&payload)?);
        }
        return Ok(EXIT_SUCCESS);
    }

    match output {
        Some(dest) => {
            write_atomic(dest, &canonical)?;
            if json {
                let payload = serde_json::json!({
                    "status": "written",
                    "manifest": manifest_path,
                    "output": dest,
                });
                println!("{}", json_pretty(&payload)?);
            } else {
                println!("wrote {}", dest.display());
            }
        }
        None => print!("{canonical}"),
    }
    Ok(EXIT_SUCCESS)
}
