//! Configuration types deserialized from `kiln.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The top-level run configuration parsed from `kiln.toml`.
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct KilnConfig {
    /// Architecture file and routing mode.
    #[serde(default)]
    pub arch: ArchSection,
    /// Grid sizing.
    #[serde(default)]
    pub grid: GridSection,
    /// Circuit size used for grid sizing.
    #[serde(default)]
    pub circuit: CircuitSection,
    /// Report output.
    #[serde(default)]
    pub report: ReportSection,
    /// Directory relative paths in the file are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// The `[arch]` section.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArchSection {
    /// Path to the architecture file.
    #[serde(default)]
    pub file: Option<String>,
    /// Routing mode the architecture is validated for.
    #[serde(default)]
    pub route_type: RouteType,
}

/// Routing mode as spelled in the configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    /// Global routing; Fc and switch-block settings are optional.
    #[default]
    Global,
    /// Detailed routing; Fc and switch-block settings are required.
    Detailed,
}

/// The `[grid]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GridSection {
    /// Columns divided by rows when sizing automatically.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
    /// Fixed number of logic columns; requires `height`.
    #[serde(default)]
    pub width: Option<u32>,
    /// Fixed number of logic rows; requires `width`.
    #[serde(default)]
    pub height: Option<u32>,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            aspect_ratio: default_aspect_ratio(),
            width: None,
            height: None,
        }
    }
}

fn default_aspect_ratio() -> f64 {
    1.0
}

/// The `[circuit]` section.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct CircuitSection {
    /// Logic blocks to place.
    #[serde(default)]
    pub blocks: u32,
    /// Primary inputs.
    #[serde(default)]
    pub inputs: u32,
    /// Primary outputs.
    #[serde(default)]
    pub outputs: u32,
}

/// The `[report]` section.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportSection {
    /// Where to write the architecture echo report.
    #[serde(default)]
    pub echo: Option<String>,
}
