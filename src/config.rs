//! Project configuration
//!
//! A `lect.toml` file supplies defaults; command line flags override them.
//! [`Settings::resolve`] merges both and validates everything before any
//! file is read, so a bad option never costs a scan.

use crate::{Error, Result};
use crate::adapter::{default_registry, Language};
use crate::check::{Pipeline, SuffixCheck};
use crate::preprocess::{Direction, Lineup, Preprocessor, PreprocessorBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `lect.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LectConfig {
    pub text: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub language: Option<String>,
    pub output: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub gitignore: bool,
    pub checks: ChecksConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ChecksConfig {
    /// Required ending of every code annotation id
    pub code_suffix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub direction: Option<String>,
    pub lineup: Option<String>,
    pub truncate_code: bool,
}

impl LectConfig {
    /// Starter configuration written by `lect init`
    pub fn starter() -> Self {
        Self {
            text: Some(PathBuf::from("docs")),
            source: Some(PathBuf::from("src")),
            language: Some("c++".to_string()),
            output: Some(PathBuf::from("lect-out")),
            exclude: Vec::new(),
            gitignore: true,
            checks: ChecksConfig {
                code_suffix: Some("-src".to_string()),
            },
            render: RenderConfig {
                direction: Some(Direction::default().to_string()),
                lineup: Some(Lineup::default().to_string()),
                truncate_code: false,
            },
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("lect.toml")
}

/// Read the configuration file; a missing file is not an error
pub fn load_config(path: Option<&Path>) -> Result<Option<LectConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|source| Error::Read {
        path: path.clone(),
        source,
    })?;
    let config: LectConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &LectConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Command line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub text: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub language: Option<String>,
    pub output: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub gitignore: bool,
    pub code_suffix: Option<String>,
    pub direction: Option<String>,
    pub lineup: Option<String>,
    pub truncate_code: bool,
}

/// Fully validated options for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub text_path: PathBuf,
    pub source_path: PathBuf,
    pub output: Option<PathBuf>,
    pub language: Language,
    pub excludes: Vec<String>,
    pub gitignore: bool,
    pub code_suffix: Option<String>,
    pub direction: Option<Direction>,
    pub lineup: Option<Lineup>,
    pub truncate_code: bool,
}

impl Settings {
    /// Merge the overrides over an optional configuration file and validate
    pub fn resolve(config: Option<&LectConfig>, overrides: Overrides) -> Result<Self> {
        let config = config.cloned().unwrap_or_default();

        let text_path = required_path("text", overrides.text.or(config.text))?;
        let source_path = required_path("source", overrides.source.or(config.source))?;

        let name = overrides
            .language
            .or(config.language)
            .ok_or_else(|| Error::Config("No language given".to_string()))?;
        let registry = default_registry()?;
        let language = registry.find(&name).cloned().ok_or_else(|| {
            let known: Vec<_> = registry.languages().iter().map(|l| l.name()).collect();
            Error::Config(format!(
                "Unknown language `{}` (known: {})",
                name,
                known.join(", ")
            ))
        })?;

        let direction = overrides
            .direction
            .or(config.render.direction)
            .map(|d| d.parse::<Direction>())
            .transpose()?;
        let lineup = overrides
            .lineup
            .or(config.render.lineup)
            .map(|l| l.parse::<Lineup>())
            .transpose()?;

        let mut excludes = config.exclude;
        excludes.extend(overrides.exclude);

        Ok(Self {
            text_path,
            source_path,
            output: overrides.output.or(config.output),
            language,
            excludes,
            gitignore: overrides.gitignore || config.gitignore,
            code_suffix: overrides.code_suffix.or(config.checks.code_suffix),
            direction,
            lineup,
            truncate_code: overrides.truncate_code || config.render.truncate_code,
        })
    }

    /// Standard checks, plus the suffix check when a suffix is configured
    pub fn pipeline(&self) -> Pipeline {
        match &self.code_suffix {
            Some(suffix) => Pipeline::standard().with(SuffixCheck::new(suffix.clone())),
            None => Pipeline::standard(),
        }
    }

    pub fn preprocessor(&self) -> Preprocessor {
        let mut builder = PreprocessorBuilder::new();
        if let Some(direction) = self.direction {
            builder = builder.add_direction(direction);
        }
        if let Some(lineup) = self.lineup {
            builder = builder.add_lineup(lineup);
        }
        if self.truncate_code {
            builder = builder.truncate_code_content();
        }
        builder.build()
    }
}

fn required_path(what: &str, path: Option<PathBuf>) -> Result<PathBuf> {
    let path = path.ok_or_else(|| Error::Config(format!("No {} path given", what)))?;
    if !path.exists() {
        return Err(Error::Config(format!(
            "The {} path {} does not exist",
            what,
            path.display()
        )));
    }
    Ok(path)
}
