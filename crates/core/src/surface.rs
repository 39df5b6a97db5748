//! Rendering surface trait
//!
//! The gauge never draws pixels itself. It creates and mutates retained
//! elements (paths and text) on a [`RenderSurface`], which may be an SVG
//! document, a Cairo context, or a UI toolkit scene.

use std::fmt;

use rg_gauge_types::Rgb;
use thiserror::Error;

use crate::path::PathDescription;

/// Identifies an element created on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(u64);

impl ElementHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors reported by surface operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("unknown element {0}")]
    UnknownElement(ElementHandle),
    #[error("element {handle} is not a {expected} element")]
    WrongKind {
        handle: ElementHandle,
        expected: &'static str,
    },
}

/// Paint attributes. `None` leaves the current value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Style {
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub stroke_width: Option<f64>,
}

impl Style {
    pub fn fill(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn stroke(color: Rgb, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: Some(width),
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, color: Rgb, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = Some(width);
        self
    }
}

/// Rotation by `degrees` (clockwise on screen) about `(cx, cy)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f64,
    pub cx: f64,
    pub cy: f64,
}

impl Rotation {
    pub fn new(degrees: f64, cx: f64, cy: f64) -> Self {
        Self { degrees, cx, cy }
    }
}

/// Horizontal text alignment relative to the anchor point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Default font for gauge text
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Text attributes fixed at creation
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: Rgb,
    pub anchor: TextAnchor,
    pub font_family: String,
    /// CSS weight: `normal`, `bold` or a number
    pub font_weight: String,
}

impl TextStyle {
    pub fn new(font_size: f64, color: Rgb) -> Self {
        Self {
            font_size,
            color,
            anchor: TextAnchor::Middle,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_weight: "normal".to_string(),
        }
    }

    pub fn bold(self) -> Self {
        self.weight("bold")
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.font_weight = weight.into();
        self
    }

    /// Whether a two-weight renderer should use the bold face
    pub fn is_bold(&self) -> bool {
        match self.font_weight.trim() {
            "bold" | "bolder" => true,
            numeric => numeric.parse::<u32>().map_or(false, |w| w >= 600),
        }
    }
}

/// Inner shadow drawn inside filled shapes: a black flood blurred by
/// `size` and shifted down by `vertical_offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InnerShadow {
    pub opacity: f64,
    pub size: f64,
    pub vertical_offset: f64,
}

impl InnerShadow {
    pub fn new(opacity: f64, size: f64, vertical_offset: f64) -> Self {
        Self {
            opacity,
            size,
            vertical_offset,
        }
    }
}

/// Retained-mode drawing target for gauges.
///
/// Elements are drawn in creation order. Setting the fill of a text element
/// changes its color.
pub trait RenderSurface {
    /// Resize the drawing area
    fn set_size(&mut self, width: f64, height: f64);

    fn create_path(&mut self, path: &PathDescription) -> ElementHandle;

    fn set_path(&mut self, handle: ElementHandle, path: &PathDescription)
        -> Result<(), SurfaceError>;

    fn create_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) -> ElementHandle;

    fn set_text(&mut self, handle: ElementHandle, text: &str) -> Result<(), SurfaceError>;

    fn set_style(&mut self, handle: ElementHandle, style: &Style) -> Result<(), SurfaceError>;

    /// Replace the element transform; `None` clears it
    fn set_transform(
        &mut self,
        handle: ElementHandle,
        rotation: Option<Rotation>,
    ) -> Result<(), SurfaceError>;

    /// Attach an inner shadow to a path; `None` removes it
    fn set_shadow(
        &mut self,
        handle: ElementHandle,
        shadow: Option<InnerShadow>,
    ) -> Result<(), SurfaceError>;

    fn remove(&mut self, handle: ElementHandle) -> Result<(), SurfaceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_builders() {
        let red = Rgb::new(255, 0, 0);
        let style = Style::fill(red).with_stroke(Rgb::BLACK, 2.0);
        assert_eq!(style.fill, Some(red));
        assert_eq!(style.stroke, Some(Rgb::BLACK));
        assert_eq!(style.stroke_width, Some(2.0));

        let stroke_only = Style::stroke(red, 1.5);
        assert_eq!(stroke_only.fill, None);
    }

    #[test]
    fn test_text_weights() {
        let style = TextStyle::new(12.0, Rgb::BLACK);
        assert_eq!(style.font_family, "Arial");
        assert!(!style.is_bold());
        assert!(style.clone().bold().is_bold());
        assert!(style.clone().weight("700").is_bold());
        assert!(!style.clone().weight("300").is_bold());
        assert_eq!(style.family("Verdana").font_family, "Verdana");
    }

    #[test]
    fn test_error_messages() {
        let handle = ElementHandle::new(7);
        assert_eq!(
            SurfaceError::UnknownElement(handle).to_string(),
            "unknown element #7"
        );
        assert_eq!(
            SurfaceError::WrongKind {
                handle,
                expected: "text"
            }
            .to_string(),
            "element #7 is not a text element"
        );
    }
}
