use super::defaults::MAX_CONFIG_FILE_BYTES;

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Parse a JSON5 configuration string.
pub fn parse_config_json5(content: &str) -> Result<serde_json::Value> {
    let value: serde_json::Value = json5::from_str(content)?;
    Ok(value)
}

/// Read a configuration file as a JSON value.
///
/// Checks:
/// - File size guardrail (`MAX_CONFIG_FILE_BYTES`)
/// - Symlink refusal on the final path component
/// - Format dispatch by extension: JSON5 primary, YAML/TOML by extension
pub fn read_config_file(path: &Path) -> Result<serde_json::Value> {
    let metadata = std::fs::symlink_metadata(path)
        .with_context(|| format!("Cannot stat config file '{}'", path.display()))?;

    #[cfg(unix)]
    if metadata.file_type().is_symlink() {
        bail!(
            "Config file '{}' is a symlink — refusing to follow",
            path.display()
        );
    }

    if metadata.len() > MAX_CONFIG_FILE_BYTES {
        bail!(
            "Config file '{}' is {} bytes, exceeds limit of {} bytes",
            path.display(),
            metadata.len(),
            MAX_CONFIG_FILE_BYTES,
        );
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match ext {
        "yaml" | "yml" => {
            let value: serde_json::Value = serde_yaml::from_str(&content)?;
            Ok(value)
        }
        "toml" => {
            let value: serde_json::Value = toml::from_str(&content)?;
            Ok(value)
        }
        _ => parse_config_json5(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_json5_with_comments() {
        let value = parse_config_json5("{ gateway: { port: 9000 }, /* local */ }").unwrap();
        assert_eq!(value["gateway"]["port"], 9000);
    }

    #[test]
    fn reads_yaml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxgate.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "gateway:\n  port: 9001").unwrap();
        let value = read_config_file(&path).unwrap();
        assert_eq!(value["gateway"]["port"], 9001);
    }

    #[test]
    fn rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.json");
        let content = format!("{{\"pad\": \"{}\"}}", "x".repeat(2 * 1024 * 1024));
        std::fs::write(&path, content).unwrap();
        assert!(read_config_file(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_config_file(Path::new("/nonexistent/voxgate.json")).is_err());
    }
}
