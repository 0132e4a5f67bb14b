//! Run configuration: TOML settings file merged with command-line flags.
//!
//! Flags win over the file, the file wins over built-in defaults. Paths have
//! no default; a run without a source or destination is rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use streams_engine::{
    encoding_for_label, EngineError, LineCopyOptions, LineEnding, StrategyKind, StrategySettings,
    DEFAULT_BLOCK_SIZE,
};

use crate::Args;

/// Settings file layout.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub source_file_path: Option<PathBuf>,
    pub destination_file_path: Option<PathBuf>,
    pub strategy: Option<String>,
    pub block_size: Option<usize>,
    pub verify: Option<bool>,
    pub line: LineConfig,
}

/// `[line]` table of the settings file.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LineConfig {
    pub source_encoding: Option<String>,
    pub destination_encoding: Option<String>,
    pub line_ending: Option<LineEnding>,
}

impl FileConfig {
    /// Read and parse a settings file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        Self::parse(&content).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Which strategies a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    One(StrategyKind),
    All,
}

impl Selection {
    pub fn kinds(&self) -> Vec<StrategyKind> {
        match self {
            Selection::One(kind) => vec![*kind],
            Selection::All => StrategyKind::ALL.to_vec(),
        }
    }
}

/// Fully resolved settings for one CLI run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub selection: Selection,
    pub settings: StrategySettings,
    pub verify: bool,
}

impl RunConfig {
    /// Merge `args` over `file` and validate the result.
    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self, String> {
        let source = args
            .src
            .clone()
            .or(file.source_file_path)
            .ok_or_else(|| missing("source"))?;
        let destination = args
            .dst
            .clone()
            .or(file.destination_file_path)
            .ok_or_else(|| missing("destination"))?;

        let strategy = args
            .strategy
            .clone()
            .or(file.strategy)
            .unwrap_or_else(|| "block".to_string());
        let selection = if strategy.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            match StrategyKind::from_name(&strategy) {
                Some(kind) => Selection::One(kind),
                None => {
                    return Err(format!(
                        "Invalid strategy '{}'. Must be 'byte', 'block', 'buffered', 'memory', \
                         'memory-byte', 'line', or 'all'",
                        strategy
                    ))
                }
            }
        };

        let block_size = args.block_size.or(file.block_size).unwrap_or(DEFAULT_BLOCK_SIZE);

        let line_ending = match &args.line_ending {
            Some(name) => LineEnding::from_name(name).ok_or_else(|| {
                format!("Invalid line ending '{}'. Must be 'lf' or 'crlf'", name)
            })?,
            None => file.line.line_ending.unwrap_or_default(),
        };
        let defaults = LineCopyOptions::default();
        let source_encoding = match args.source_encoding.as_ref().or(file.line.source_encoding.as_ref()) {
            Some(label) => encoding_for_label("source_encoding", label).map_err(|e| e.to_string())?,
            None => defaults.source_encoding,
        };
        let destination_encoding = match args
            .destination_encoding
            .as_ref()
            .or(file.line.destination_encoding.as_ref())
        {
            Some(label) => {
                encoding_for_label("destination_encoding", label).map_err(|e| e.to_string())?
            }
            None => defaults.destination_encoding,
        };

        Ok(RunConfig {
            source,
            destination,
            selection,
            settings: StrategySettings {
                block_size,
                line: LineCopyOptions {
                    source_encoding,
                    destination_encoding,
                    line_ending,
                },
            },
            verify: args.verify || file.verify.unwrap_or(false),
        })
    }
}

fn missing(name: &'static str) -> String {
    EngineError::InvalidArgument {
        name,
        reason: "no path given on the command line or in the config file".to_string(),
    }
    .to_string()
}
