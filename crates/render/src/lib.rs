//! rg-gauge-render: Rendering surfaces for rg-gauge.
//!
//! [`SvgSurface`] keeps the gauge as a retained SVG scene and is always
//! available. [`CairoSurface`] replays the same scene onto a Cairo context
//! and is enabled with the `cairo` feature.

pub mod arc;
#[cfg(feature = "cairo")]
pub mod cairo_surface;
pub mod elements;
pub mod svg_surface;

use thiserror::Error;

pub use arc::{endpoint_to_center, CenterArc};
#[cfg(feature = "cairo")]
pub use cairo_surface::CairoSurface;
pub use elements::{Element, ElementKind, ElementList};
pub use svg_surface::SvgSurface;

/// Errors writing a rendered gauge to disk
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "cairo")]
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[cfg(feature = "cairo")]
    #[error("PNG encoding failed: {0}")]
    Png(#[from] cairo::IoError),
}
