pub mod hierarchy;
pub mod squarify;

pub use hierarchy::{layout_hierarchy, CategoryLayout, CategoryWeights};
pub use squarify::{layout_treemap, LayoutOptions, Rect};

/// Validation failure for a layout call.
///
/// All variants are detected up front, before any geometry is computed, so a
/// call either returns a complete rectangle sequence or fails synchronously.
/// Layout is a pure function of its arguments; retrying never helps.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("container dimensions must be positive finite numbers, got {width}x{height}")]
    InvalidDimension { width: f64, height: f64 },

    #[error("weight at index {index} must be finite and nonnegative, got {value}")]
    InvalidWeight { index: usize, value: f64 },

    #[error("total value must be positive for a non-empty weight list, got {0}")]
    InvalidTotal(f64),
}
