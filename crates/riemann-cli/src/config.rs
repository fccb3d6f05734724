//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `$RIEMANN_CONFIG` environment variable
//! 2. `~/.config/riemann/config.toml`
//! 3. Platform config dir (`directories`)
//! 4. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use riemann_core::{SamplingRule, Settings};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub defaults: DefaultsConfig,
    pub view: ViewConfig,
}

/// Startup quadrature settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub task: i64,
    pub start: f64,
    pub end: f64,
    pub samples: usize,
    pub rule: SamplingRule,
}

/// Reference curve settings for the viewer.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Number of subintervals used to draw the smooth curve.
    pub curve_resolution: usize,
    pub curve_rule: SamplingRule,
}

// --- Defaults ---

impl Default for DefaultsConfig {
    fn default() -> Self {
        let s = Settings::default();
        Self {
            task: s.formula_id,
            start: s.start,
            end: s.end,
            samples: s.sample_count,
            rule: s.rule,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            curve_resolution: 1_000_000,
            curve_rule: SamplingRule::Random,
        }
    }
}

impl DefaultsConfig {
    pub fn settings(&self) -> Settings {
        Settings::new(self.task, self.start, self.end, self.samples, self.rule)
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(p) if p.exists() => load_config_from(&p),
        _ => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(p) = std::env::var("RIEMANN_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // 2. ~/.config/riemann/config.toml
    if let Some(home) = dirs_home() {
        let p = home.join(".config").join("riemann").join("config.toml");
        if p.exists() {
            return Some(p);
        }
    }

    // 3. Platform config dir
    directories::ProjectDirs::from("dev", "riemann", "riemann")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Show the active config path (for `riemann config`).
pub fn show_config_path() -> String {
    match config_path() {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.defaults.task, 2);
        assert_eq!(config.defaults.samples, 10);
        assert_eq!(config.defaults.rule, SamplingRule::Middle);
        assert_eq!(config.view.curve_resolution, 1_000_000);
        assert_eq!(config.view.curve_rule, SamplingRule::Random);
        assert_eq!(config.defaults.settings(), Settings::default());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[defaults]
samples = 40
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.defaults.samples, 40);
        // Other fields should be defaults
        assert_eq!(config.defaults.task, 2);
        assert_eq!(config.view.curve_resolution, 1_000_000);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[defaults]
task = 22
start = -1.0
end = 2.0
samples = 8
rule = "left"

[view]
curve_resolution = 2000
curve_rule = "middle"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let s = config.defaults.settings();
        assert_eq!(s, Settings::new(22, -1.0, 2.0, 8, SamplingRule::Left));
        assert_eq!(config.view.curve_resolution, 2000);
        assert_eq!(config.view.curve_rule, SamplingRule::Middle);
    }

    #[test]
    fn test_parse_bad_rule_fails() {
        let toml_str = r#"
[defaults]
rule = "sideways"
"#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[defaults]\ntask = 31\nrule = \"random\"").unwrap();
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.defaults.task, 31);
        assert_eq!(config.defaults.rule, SamplingRule::Random);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
