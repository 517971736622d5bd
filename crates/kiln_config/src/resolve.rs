//! Merging command-line overrides over configuration-file values.

use crate::error::ConfigError;
use crate::types::{KilnConfig, RouteType};
use std::path::{Path, PathBuf};

/// Values given on the command line; `None` falls back to the file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    /// Architecture file.
    pub arch_file: Option<PathBuf>,
    /// Routing mode.
    pub route_type: Option<RouteType>,
    /// Aspect ratio for automatic sizing.
    pub aspect_ratio: Option<f64>,
    /// Fixed logic columns.
    pub width: Option<u32>,
    /// Fixed logic rows.
    pub height: Option<u32>,
    /// Logic blocks.
    pub blocks: Option<u32>,
    /// Primary inputs.
    pub inputs: Option<u32>,
    /// Primary outputs.
    pub outputs: Option<u32>,
    /// Echo report path.
    pub echo: Option<PathBuf>,
}

/// The settings a run actually uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    /// Architecture file to read.
    pub arch_file: PathBuf,
    /// Routing mode to validate for.
    pub route_type: RouteType,
    /// Aspect ratio for automatic sizing.
    pub aspect_ratio: f64,
    /// User-fixed `(width, height)`, if any.
    pub fixed_size: Option<(u32, u32)>,
    /// Logic blocks to place.
    pub blocks: u32,
    /// Primary inputs plus primary outputs.
    pub pads: u32,
    /// Where to write the echo report.
    pub echo: Option<PathBuf>,
}

/// Merges `overrides` over `config`; command-line values win.
///
/// Relative paths from the file are resolved against the file's directory;
/// paths from the command line are used as given.
pub fn resolve_settings(
    config: &KilnConfig,
    overrides: &Overrides,
) -> Result<ResolvedSettings, ConfigError> {
    let from_file = |p: &str| match &config.base_dir {
        Some(base) if Path::new(p).is_relative() => base.join(p),
        _ => PathBuf::from(p),
    };

    let arch_file = overrides
        .arch_file
        .clone()
        .or_else(|| config.arch.file.as_deref().map(from_file))
        .ok_or_else(|| ConfigError::MissingField("arch.file".to_string()))?;

    let aspect_ratio = overrides.aspect_ratio.unwrap_or(config.grid.aspect_ratio);
    if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "aspect ratio must be a finite number > 0, got {aspect_ratio}"
        )));
    }

    let width = overrides.width.or(config.grid.width);
    let height = overrides.height.or(config.grid.height);
    let fixed_size = match (width, height) {
        (None, None) => None,
        (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
        (Some(_), Some(_)) => {
            return Err(ConfigError::ValidationError(
                "width and height must be > 0".to_string(),
            ))
        }
        _ => {
            return Err(ConfigError::ValidationError(
                "width and height must be given together".to_string(),
            ))
        }
    };

    let inputs = overrides.inputs.unwrap_or(config.circuit.inputs);
    let outputs = overrides.outputs.unwrap_or(config.circuit.outputs);
    let pads = inputs.checked_add(outputs).ok_or_else(|| {
        ConfigError::ValidationError(format!("{inputs} inputs + {outputs} outputs overflows"))
    })?;

    Ok(ResolvedSettings {
        arch_file,
        route_type: overrides.route_type.unwrap_or(config.arch.route_type),
        aspect_ratio,
        fixed_size,
        blocks: overrides.blocks.unwrap_or(config.circuit.blocks),
        pads,
        echo: overrides
            .echo
            .clone()
            .or_else(|| config.report.echo.as_deref().map(from_file)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    const TOML: &str = r#"
[arch]
file = "k4.arch"
route_type = "detailed"

[grid]
aspect_ratio = 2.0

[circuit]
blocks = 40
inputs = 3
outputs = 2

[report]
echo = "out/arch.echo"
"#;

    #[test]
    fn file_values_without_overrides() {
        let config = load_config_from_str(TOML).unwrap();
        let s = resolve_settings(&config, &Overrides::default()).unwrap();
        assert_eq!(s.arch_file, PathBuf::from("k4.arch"));
        assert_eq!(s.route_type, RouteType::Detailed);
        assert_eq!(s.aspect_ratio, 2.0);
        assert_eq!(s.fixed_size, None);
        assert_eq!((s.blocks, s.pads), (40, 5));
        assert_eq!(s.echo, Some(PathBuf::from("out/arch.echo")));
    }

    #[test]
    fn overrides_win() {
        let config = load_config_from_str(TOML).unwrap();
        let overrides = Overrides {
            arch_file: Some(PathBuf::from("other.arch")),
            route_type: Some(RouteType::Global),
            width: Some(8),
            height: Some(6),
            outputs: Some(10),
            ..Overrides::default()
        };
        let s = resolve_settings(&config, &overrides).unwrap();
        assert_eq!(s.arch_file, PathBuf::from("other.arch"));
        assert_eq!(s.route_type, RouteType::Global);
        assert_eq!(s.fixed_size, Some((8, 6)));
        assert_eq!(s.pads, 13);
    }

    #[test]
    fn relative_paths_follow_config_dir() {
        let mut config = load_config_from_str(TOML).unwrap();
        config.base_dir = Some(PathBuf::from("/work/fabric"));
        let s = resolve_settings(&config, &Overrides::default()).unwrap();
        assert_eq!(s.arch_file, PathBuf::from("/work/fabric/k4.arch"));
        assert_eq!(s.echo, Some(PathBuf::from("/work/fabric/out/arch.echo")));
    }

    #[test]
    fn arch_file_required() {
        let config = KilnConfig::default();
        let err = resolve_settings(&config, &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "arch.file"));
    }

    #[test]
    fn unpaired_override_rejected() {
        let config = load_config_from_str(TOML).unwrap();
        let overrides = Overrides {
            width: Some(8),
            ..Overrides::default()
        };
        let err = resolve_settings(&config, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn bad_aspect_override_rejected() {
        let config = load_config_from_str(TOML).unwrap();
        let overrides = Overrides {
            aspect_ratio: Some(0.0),
            ..Overrides::default()
        };
        assert!(resolve_settings(&config, &overrides).is_err());
    }
}
