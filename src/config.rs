use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub state: StateConfig,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PathsConfig {
    /// Searched recursively for previously exported `*.txt` files.
    pub storage_root: PathBuf,
    /// The clippings export, or a folder holding it.
    pub clippings: PathBuf,
    pub output_folder: PathBuf,
    pub log_file: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ExportConfig {
    #[serde(default)]
    pub highlight_prefix: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StateConfig {
    /// Timestamp of the latest clipping exported by any earlier run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exported: Option<NaiveDateTime>,
}

impl Config {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn storage_root(&self) -> PathBuf {
        self.resolve(&self.paths.storage_root)
    }

    pub fn clippings_path(&self) -> PathBuf {
        self.resolve(&self.paths.clippings)
    }

    pub fn output_folder(&self) -> PathBuf {
        self.resolve(&self.paths.output_folder)
    }

    pub fn log_file(&self) -> PathBuf {
        self.resolve(&self.paths.log_file)
    }

    pub fn watermark(&self) -> Option<NaiveDateTime> {
        self.state.last_exported
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.base_dir = base_dir_of(path);

    // Validate paths
    let paths = [
        ("paths.storage_root", &config.paths.storage_root),
        ("paths.clippings", &config.paths.clippings),
        ("paths.output_folder", &config.paths.output_folder),
        ("paths.log_file", &config.paths.log_file),
    ];
    for (key, value) in paths {
        if value.as_os_str().is_empty() {
            bail!("{} must not be empty", key);
        }
    }

    // Validate export
    if config.export.highlight_prefix.contains(['\n', '\r']) {
        bail!("export.highlight_prefix must not contain line breaks");
    }

    Ok(config)
}

/// Write `candidate` back to the config file if it is later than the stored
/// watermark. Returns whether the file was rewritten.
pub fn store_watermark(path: &Path, config: &mut Config, candidate: NaiveDateTime) -> Result<bool> {
    if config.state.last_exported.is_some_and(|stored| candidate <= stored) {
        return Ok(false);
    }

    let previous = config.state.last_exported.replace(candidate);
    let serialized = toml::to_string_pretty(&*config);
    let written = serialized
        .context("Failed to serialize config")
        .and_then(|text| {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write config file: {}", path.display()))
        });

    if let Err(e) = written {
        config.state.last_exported = previous;
        return Err(e);
    }

    info!(watermark = %candidate, "stored new watermark");
    Ok(true)
}

/// Write a commented starter config to `path`.
pub fn scaffold_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    println!("Created config: {}", path.display());
    println!();
    println!("Edit the [paths] section, then run:");
    println!();
    println!("  kclip --config {} show", path.display());

    Ok(())
}

fn base_dir_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

const CONFIG_TEMPLATE: &str = r#"# kclip configuration. Relative paths are resolved against this file's folder.
# kclip rewrites this file whenever it stores a new [state] watermark;
# comments are not preserved by that rewrite.

[paths]
# Searched recursively for previously exported <Title>.txt files
storage_root = "bookshelf"
# The device's "My Clippings.txt", or a folder containing it
clippings = "input"
# New <Title>.txt files are written here. Keep it inside storage_root so
# the next append run finds them.
output_folder = "bookshelf/output"
# One line per file created or appended
log_file = "kindle_clippings.log"

[export]
# Prepended to every highlight when writing, e.g. "* "
highlight_prefix = ""

[state]
# Managed by kclip: the latest clipping exported so far.
# last_exported = "2022-01-12T19:34:55"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, extra: &str) -> PathBuf {
        let path = dir.join("kclip.toml");
        fs::write(
            &path,
            format!(
                r#"[paths]
storage_root = "shelf"
clippings = "/abs/My Clippings.txt"
output_folder = "out"
log_file = "log.txt"
{}"#,
                extra
            ),
        )
        .unwrap();
        path
    }

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, 12)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "");
        let config = load_config(&path).unwrap();

        assert_eq!(config.storage_root(), tmp.path().join("shelf"));
        assert_eq!(config.output_folder(), tmp.path().join("out"));
        assert_eq!(config.clippings_path(), PathBuf::from("/abs/My Clippings.txt"));
        assert_eq!(config.watermark(), None);
        assert_eq!(config.export.highlight_prefix, "");
    }

    #[test]
    fn test_load_reads_watermark_and_prefix() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            "[export]\nhighlight_prefix = \"* \"\n[state]\nlast_exported = \"2022-01-12T19:00:00\"\n",
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.watermark(), Some(at(19)));
        assert_eq!(config.export.highlight_prefix, "* ");
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "[export]\nhighlight_prefix = \"a\\nb\"\n");
        assert!(load_config(&path).is_err());

        fs::write(&path, "[paths]\nstorage_root = \"\"\nclippings = \"c\"\noutput_folder = \"o\"\nlog_file = \"l\"\n").unwrap();
        assert!(load_config(&path).is_err());

        assert!(load_config(&tmp.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_store_watermark_only_moves_forward() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "");
        let mut config = load_config(&path).unwrap();

        assert!(store_watermark(&path, &mut config, at(10)).unwrap());
        assert!(!store_watermark(&path, &mut config, at(10)).unwrap());
        assert!(!store_watermark(&path, &mut config, at(9)).unwrap());

        let reloaded = load_config(&path).unwrap();
        assert_eq!(reloaded.watermark(), Some(at(10)));
        assert_eq!(reloaded.storage_root(), tmp.path().join("shelf"));
    }

    #[test]
    fn test_scaffold_config_is_loadable_and_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config/kclip.toml");
        scaffold_config(&path).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.storage_root(), tmp.path().join("config/bookshelf"));
        assert!(config.output_folder().starts_with(config.storage_root()));
        assert_eq!(config.watermark(), None);

        assert!(scaffold_config(&path).is_err());
    }

    #[test]
    fn test_scaffold_header_warns_about_rewrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kclip.toml");
        scaffold_config(&path).unwrap();
        let template = fs::read_to_string(&path).unwrap();
        assert!(template.starts_with("# kclip configuration."));
        assert!(template.contains("comments are not preserved"));

        // After the first write-back the file is plain TOML that still loads
        let mut config = load_config(&path).unwrap();
        assert!(store_watermark(&path, &mut config, at(8)).unwrap());
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(!rewritten.contains("comments are not preserved"));
        let reloaded = load_config(&path).unwrap();
        assert_eq!(reloaded.watermark(), Some(at(8)));
        assert_eq!(reloaded.output_folder(), tmp.path().join("bookshelf/output"));
    }
}
