use super::{colorize_kind, json_pretty, load_manifest, EXIT_SUCCESS};
use rdcc_schema::ComponentManifest;
use std::path::Path;

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn list_or_none(values: Option<&[String]>) -> String {
    match values {
        None => "(unspecified)".to_owned(),
        Some([]) => "(none)".to_owned(),
        Some(values) => values.join(", "),
    }
}

fn inspect_json(manifest: &ComponentManifest) -> serde_json::Value {
    serde_json::json!({
        "image": manifest.full_image_reference(),
        "type": manifest.kind(),
        "base": manifest.is_base(),
        "install_component": manifest.is_install_component(),
        "heavyweight": manifest.is_heavyweight(),
        "arch": manifest.arch(),
        "depends_on": manifest.depends_on(),
        "products": manifest.products().map(<[_]>::len),
    })
}

pub fn run(manifest_path: &Path, json: bool) -> Result<u8, String> {
    let manifest = load_manifest(manifest_path)?;
    if json {
        println!("{}", json_pretty(&inspect_json(&manifest))?);
    } else {
        println!("image:        {}", manifest.full_image_reference());
        println!("type:         {}", colorize_kind(&manifest));
        println!("arch:         {}", manifest.arch().join(", "));
        println!("depends_on:   {}", list_or_none(manifest.depends_on()));
        match manifest.products() {
            None => println!("products:     (unspecified)"),
            Some(products) => {
                println!("products:     {}", products.len());
                for product in products {
                    println!("  - {} ({})", product.id(), product.kind());
                }
            }
        }
        println!("heavyweight:  {}", yes_no(manifest.is_heavyweight()));
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdcc_schema::parse_manifest_str;

    #[test]
    fn json_view_reports_derived_flags() {
        let manifest = parse_manifest_str(
            r#"{"image_name": "registry.example/base", "type": "base",
                "image_version": "1.2.0", "arch": ["arm64", "amd64"], "products": []}"#,
        )
        .unwrap();
        let view = inspect_json(&manifest);
        assert_eq!(view["image"], "registry.example/base:1.2.0");
        assert_eq!(view["base"], true);
        assert_eq!(view["install_component"], false);
        assert_eq!(view["heavyweight"], false);
        assert_eq!(view["arch"], serde_json::json!(["arm64", "amd64"]));
        assert!(view["depends_on"].is_null());
        assert_eq!(view["products"], 0);
    }

    #[test]
    fn list_or_none_distinguishes_absent_and_empty() {
        assert_eq!(list_or_none(None), "(unspecified)");
        assert_eq!(list_or_none(Some(&[][..])), "(none)");
        let deps = vec!["a".to_owned(), "b".to_owned()];
        assert_eq!(list_or_none(Some(deps.as_slice())), "a, b");
    }
}
