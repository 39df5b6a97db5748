//! rg-gauge-core: Geometry, paths, colors and animation for rg-gauge.
//!
//! This crate contains the rendering-independent parts of a radial gauge:
//! widget geometry, path building, value-to-color resolution, easing and the
//! ticker-driven animation engine, plus the [`RenderSurface`] trait the
//! gauge draws through.

pub mod animation;
pub mod color;
pub mod constants;
pub mod easing;
pub mod format;
pub mod geometry;
pub mod labels;
pub mod path;
pub mod surface;
pub mod ticker;

pub use animation::{Animation, AnimationCallbacks, AnimationEngine, AnimationHandle, EngineState};
pub use color::{resolve_color, ColorSource, Gradient};
pub use constants::{ANIMATION_FRAME_INTERVAL, ANIMATION_FRAME_MS};
pub use easing::ease;
pub use format::{group_thousands, human_friendly, TextRenderer, ValueFormatter};
pub use geometry::{compute_geometry, GeometryCache};
pub use labels::{LabelLayout, TextPlacement};
pub use path::{
    build_arc_path, build_pointer_path, build_target_line_path, value_angle, PathCommand,
    PathDescription, PointerDimensions,
};
pub use surface::{
    ElementHandle, InnerShadow, RenderSurface, Rotation, Style, SurfaceError, TextAnchor,
    TextStyle, DEFAULT_FONT_FAMILY,
};
pub use ticker::{ClockTicker, FrameCallback, ManualTicker, TickHandle, Ticker};

// Re-export types used in public signatures for convenience
pub use rg_gauge_types::{EasingKind, GaugeConfig, GaugeMode, Geometry, Rgb};
