//! Architecture-file reader for island-style FPGA fabrics.
//!
//! An architecture file describes the logic block's pins and pin classes, the
//! channel-width profile of the routing fabric, and the parameters needed by
//! detailed routing. The number of pin classes is not declared up front, so
//! the file is read twice:
//!
//! 1. **Discover** ([`discovery`]) scans the pin statements and learns the
//!    class count and per-class pin counts.
//! 2. **Allocate** ([`tables`]) sizes the class and pin tables.
//! 3. **Load** ([`loader`]) rewinds the stream and reads every field.
//! 4. **Validate** ([`validate`]) checks presence and cross-field rules for
//!    the requested [`RouteMode`] and builds the [`ArchitectureDescription`].
//!
//! # Usage
//!
//! ```
//! use kiln_arch::{parse_architecture_str, RouteMode};
//!
//! let text = "\
//! io_rat 2
//! chan_width_x uniform 1
//! chan_width_y uniform 1
//! chan_width_io 1
//! outpin class: 0 top
//! inpin class: 1 bottom
//! subblocks_per_cluster 4
//! subblock_lut_size 4
//! ";
//! let arch = parse_architecture_str(text, RouteMode::Global).unwrap();
//! assert_eq!(arch.num_classes(), 2);
//! assert_eq!(arch.pins_per_block(), 2);
//! ```

#![warn(missing_docs)]

pub mod discovery;
pub mod error;
pub mod field;
pub mod ids;
pub mod lexer;
pub mod loader;
pub mod report;
pub mod scalar;
pub mod tables;
pub mod types;
pub mod validate;
pub mod writer;

pub use discovery::{discover_classes, ClassSchema};
pub use error::ArchError;
pub use field::{Field, FieldPresence};
pub use ids::{ClassId, PinId};
pub use lexer::TokenStream;
pub use report::{echo_to_string, write_echo};
pub use types::{
    ArchitectureDescription, ChannelDistribution, DetailedRoutingArch, DistributionKind, FcType,
    Keyword, PinClass, PinDirection, PinRecord, RouteMode, Side, SideSet, SwitchBlockType,
};
pub use writer::write_architecture;

use kiln_source::{FileId, SourceDb};
use std::path::Path;

/// Runs both passes and the validator over `text`.
pub fn parse_text(
    text: &str,
    file: FileId,
    mode: RouteMode,
) -> Result<ArchitectureDescription, ArchError> {
    let mut stream = TokenStream::new(text, file);
    let schema = discover_classes(&mut stream)?;
    let tables = tables::PinTables::allocate(&schema);
    stream.rewind();
    let ctx = loader::load_fields(&mut stream, tables)?;
    validate::validate(ctx, mode)
}

/// Parses a file already loaded into `db`.
pub fn parse_architecture(
    db: &SourceDb,
    file: FileId,
    mode: RouteMode,
) -> Result<ArchitectureDescription, ArchError> {
    parse_text(&db.get_file(file).content, file, mode)
}

/// Parses in-memory text with no backing file.
pub fn parse_architecture_str(
    text: &str,
    mode: RouteMode,
) -> Result<ArchitectureDescription, ArchError> {
    parse_text(text, FileId::DUMMY, mode)
}

/// Loads `path` into `db` and parses it.
///
/// The file stays in `db` so diagnostics can quote it.
pub fn load_architecture(
    path: &Path,
    mode: RouteMode,
    db: &mut SourceDb,
) -> Result<(FileId, ArchitectureDescription), ArchError> {
    let file = db.load_file(path).map_err(|e| ArchError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    log::debug!("loaded architecture file {}", path.display());
    let arch = parse_architecture(db, file, mode)?;
    Ok((file, arch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const K4: &str = "\
# 4-LUT, one BLE per cluster
io_rat 2
chan_width_x uniform 1
chan_width_y uniform 1
chan_width_io 1

inpin class: 0 bottom
inpin class: 0 left
inpin class: 0 top
inpin class: 0 right
outpin class: 1 top
inpin class: 2 top     # clock

subblocks_per_cluster 1
subblock_lut_size 4
";

    #[test]
    fn parses_typical_file() {
        let arch = parse_architecture_str(K4, RouteMode::Global).unwrap();
        assert_eq!(arch.num_classes(), 3);
        assert_eq!(arch.pins_per_block(), 6);
        assert_eq!(arch.pin_classes[0].members.len(), 4);
        assert_eq!(arch.pin_classes[1].direction, PinDirection::Driver);
        assert_eq!(arch.pins[5].class, ClassId::from_raw(2));
    }

    #[test]
    fn parse_from_source_db_carries_file_id() {
        let mut db = SourceDb::new();
        let file = db.add_source("bad.arch", "io_rat 0\n".to_string());
        let err = parse_architecture(&db, file, RouteMode::Global).unwrap_err();
        assert_eq!(err.span().file, file);
        assert_eq!(db.snippet(err.span()), "0");
    }

    #[test]
    fn load_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(K4.as_bytes()).unwrap();
        let mut db = SourceDb::new();
        let (file, arch) = load_architecture(tmp.path(), RouteMode::Global, &mut db).unwrap();
        assert_eq!(db.get_file(file).content, K4);
        assert_eq!(arch.io_rat, 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = SourceDb::new();
        let err =
            load_architecture(&dir.path().join("none.arch"), RouteMode::Global, &mut db).unwrap_err();
        assert!(matches!(err, ArchError::Io { .. }));
    }

    #[test]
    fn parsing_is_deterministic() {
        let a = parse_architecture_str(K4, RouteMode::Global).unwrap();
        let b = parse_architecture_str(K4, RouteMode::Global).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
