use miette::Diagnostic;
use thiserror::Error;
use uuid::Uuid;

use crate::grid::{MatrixExtent, TilePos};

/// Main error type for tilework operations.
///
/// Soft "not found" outcomes at the layer-tree level are expressed with
/// `Option`/`bool` return values; these errors are reserved for the strict
/// map-level contracts and checked accessors.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("no layer with UUID {0}")]
    #[diagnostic(code(tilework::layer_not_found))]
    LayerNotFound(Uuid),

    #[error("layer {uuid} is not a {expected} layer")]
    #[diagnostic(code(tilework::wrong_layer_type))]
    WrongLayerType { uuid: Uuid, expected: &'static str },

    #[error("position {pos} is outside the {extent} grid")]
    #[diagnostic(code(tilework::out_of_bounds))]
    PosOutOfBounds { pos: TilePos, extent: MatrixExtent },

    #[error("invalid map extent: {rows}x{cols}")]
    #[diagnostic(
        code(tilework::invalid_extent),
        help("maps must keep at least one row and one column")
    )]
    InvalidExtent { rows: usize, cols: usize },

    #[error("local index {index} is out of range (length {len})")]
    #[diagnostic(code(tilework::invalid_index))]
    InvalidLocalIndex { index: usize, len: usize },

    #[error("no tileset with UUID {0}")]
    #[diagnostic(code(tilework::tileset_not_found))]
    TilesetNotFound(Uuid),

    #[error("no object with UUID {0}")]
    #[diagnostic(code(tilework::object_not_found))]
    ObjectNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, MapError>;
