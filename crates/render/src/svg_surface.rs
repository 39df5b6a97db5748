//! In-memory SVG document surface

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use rg_gauge_core::{
    ElementHandle, InnerShadow, PathDescription, RenderSurface, Rotation, Style, SurfaceError,
    TextStyle,
};

use crate::elements::{Element, ElementKind, ElementList};
use crate::ExportError;

/// Retained SVG scene, serialized on demand
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    elements: ElementList,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: ElementList::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn elements(&self) -> &ElementList {
        &self.elements
    }

    pub fn element(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.get(handle)
    }

    /// SVG path data of a path element
    pub fn path_data(&self, handle: ElementHandle) -> Option<String> {
        match &self.elements.get(handle)?.kind {
            ElementKind::Path(path) => Some(path.to_string()),
            ElementKind::Text { .. } => None,
        }
    }

    /// Content of a text element
    pub fn text(&self, handle: ElementHandle) -> Option<&str> {
        match &self.elements.get(handle)?.kind {
            ElementKind::Text { text, .. } => Some(text.as_str()),
            ElementKind::Path(_) => None,
        }
    }

    /// Every text element's content, in paint order
    pub fn texts(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match &e.kind {
                ElementKind::Text { text, .. } => Some(text.as_str()),
                ElementKind::Path(_) => None,
            })
            .collect()
    }

    /// Standalone SVG document
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let shadows = self.elements.shadows();
        if !shadows.is_empty() {
            out.push_str("  <defs>\n");
            for (index, shadow) in shadows.iter().enumerate() {
                write_shadow_filter(&mut out, index, shadow);
            }
            out.push_str("  </defs>\n");
        }
        for element in self.elements.iter() {
            let filter = element
                .shadow
                .and_then(|shadow| shadows.iter().position(|s| *s == shadow));
            write_element(&mut out, element, filter);
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        fs::write(path, self.to_svg_string())?;
        log::debug!("Wrote SVG to {:?}", path);
        Ok(())
    }
}

fn shadow_id(index: usize) -> String {
    format!("inner-shadow-{}", index)
}

/// Offset, blur, invert, flood and composite: the shadow only shows inside the shape
fn write_shadow_filter(out: &mut String, index: usize, shadow: &InnerShadow) {
    let _ = writeln!(out, r#"    <filter id="{}">"#, shadow_id(index));
    let _ = writeln!(
        out,
        r#"      <feOffset dx="0" dy="{}"/>"#,
        shadow.vertical_offset
    );
    let _ = writeln!(
        out,
        r#"      <feGaussianBlur result="offset-blur" stdDeviation="{}"/>"#,
        shadow.size
    );
    out.push_str(
        r#"      <feComposite operator="out" in="SourceGraphic" in2="offset-blur" result="inverse"/>"#,
    );
    out.push('\n');
    let _ = writeln!(
        out,
        r#"      <feFlood flood-color="black" flood-opacity="{}" result="color"/>"#,
        shadow.opacity
    );
    out.push_str(
        r#"      <feComposite operator="in" in="color" in2="inverse" result="shadow"/>"#,
    );
    out.push('\n');
    out.push_str(r#"      <feComposite operator="over" in="shadow" in2="SourceGraphic"/>"#);
    out.push('\n');
    out.push_str("    </filter>\n");
}

fn write_element(out: &mut String, element: &Element, filter: Option<usize>) {
    let paint = paint_attributes(&element.style);
    let transform = element
        .transform
        .map(|r| format!(r#" transform="rotate({} {} {})""#, r.degrees, r.cx, r.cy))
        .unwrap_or_default();

    match &element.kind {
        ElementKind::Path(path) => {
            let filter = filter
                .map(|index| format!(r#" filter="url(#{})""#, shadow_id(index)))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                r#"  <path d="{}"{}{}{}/>"#,
                path, paint, transform, filter
            );
        }
        ElementKind::Text { x, y, text, style } => {
            let _ = writeln!(
                out,
                r#"  <text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" text-anchor="{}"{}{}>{}</text>"#,
                x,
                y,
                escape_xml(&style.font_family),
                style.font_size,
                escape_xml(&style.font_weight),
                style.anchor.as_str(),
                paint,
                transform,
                escape_xml(text)
            );
        }
    }
}

fn paint_attributes(style: &Style) -> String {
    let mut attrs = String::new();
    match style.fill {
        Some(fill) => {
            let _ = write!(attrs, r#" fill="{}""#, fill.to_hex());
        }
        None => attrs.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = style.stroke {
        let _ = write!(attrs, r#" stroke="{}""#, stroke.to_hex());
        if let Some(width) = style.stroke_width {
            let _ = write!(attrs, r#" stroke-width="{}""#, width);
        }
    }
    attrs
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl RenderSurface for SvgSurface {
    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn create_path(&mut self, path: &PathDescription) -> ElementHandle {
        self.elements.add_path(path)
    }

    fn set_path(
        &mut self,
        handle: ElementHandle,
        path: &PathDescription,
    ) -> Result<(), SurfaceError> {
        self.elements.set_path(handle, path)
    }

    fn create_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) -> ElementHandle {
        self.elements.add_text(x, y, text, style)
    }

    fn set_text(&mut self, handle: ElementHandle, text: &str) -> Result<(), SurfaceError> {
        self.elements.set_text(handle, text)
    }

    fn set_style(&mut self, handle: ElementHandle, style: &Style) -> Result<(), SurfaceError> {
        self.elements.set_style(handle, style)
    }

    fn set_transform(
        &mut self,
        handle: ElementHandle,
        rotation: Option<Rotation>,
    ) -> Result<(), SurfaceError> {
        self.elements.set_transform(handle, rotation)
    }

    fn set_shadow(
        &mut self,
        handle: ElementHandle,
        shadow: Option<InnerShadow>,
    ) -> Result<(), SurfaceError> {
        self.elements.set_shadow(handle, shadow)
    }

    fn remove(&mut self, handle: ElementHandle) -> Result<(), SurfaceError> {
        self.elements.remove(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rg_gauge_types::Rgb;

    #[test]
    fn test_document_header() {
        let surface = SvgSurface::new(400.0, 320.0);
        let svg = surface.to_svg_string();
        assert!(svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="320" viewBox="0 0 400 320">"#
        ));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_path_and_style_serialization() {
        let mut surface = SvgSurface::new(100.0, 100.0);
        let path = PathDescription::new()
            .move_to(1.0, 2.5)
            .line_to(3.0, 4.0)
            .close();
        let handle = surface.create_path(&path);
        surface
            .set_style(handle, &Style::fill(Rgb::new(0xa9, 0xd7, 0x0b)))
            .unwrap();
        surface
            .set_transform(handle, Some(Rotation::new(90.0, 50.0, 50.0)))
            .unwrap();

        let svg = surface.to_svg_string();
        assert!(svg.contains(
            r##"<path d="M1,2.5 L3,4 Z" fill="#a9d70b" transform="rotate(90 50 50)"/>"##
        ));
        assert_eq!(surface.path_data(handle).as_deref(), Some("M1,2.5 L3,4 Z"));
    }

    #[test]
    fn test_unstyled_path_is_unfilled() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.create_path(&PathDescription::new().move_to(0.0, 0.0).close());
        assert!(surface.to_svg_string().contains(r#"fill="none""#));
    }

    #[test]
    fn test_text_is_escaped_and_updated() {
        let mut surface = SvgSurface::new(100.0, 100.0);
        let handle = surface.create_text(
            50.0,
            60.0,
            "a<b",
            &TextStyle::new(16.0, Rgb::new(1, 1, 1)).bold(),
        );
        let svg = surface.to_svg_string();
        assert!(svg.contains("a&lt;b</text>"));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(r##"fill="#010101""##));

        surface.set_text(handle, "42%").unwrap();
        assert_eq!(surface.text(handle), Some("42%"));
        assert_eq!(surface.texts(), vec!["42%"]);
    }

    #[test]
    fn test_font_family_and_weight() {
        let mut surface = SvgSurface::new(100.0, 100.0);
        surface.create_text(
            0.0,
            0.0,
            "t",
            &TextStyle::new(10.0, Rgb::BLACK).family("Verdana").weight("600"),
        );
        let svg = surface.to_svg_string();
        assert!(svg.contains(r#"font-family="Verdana""#));
        assert!(svg.contains(r#"font-weight="600""#));
    }

    #[test]
    fn test_shadow_filter_is_defined_once_and_referenced() {
        let mut surface = SvgSurface::new(100.0, 100.0);
        let shape = PathDescription::new().move_to(0.0, 0.0).line_to(5.0, 5.0).close();
        let a = surface.create_path(&shape);
        let b = surface.create_path(&shape);
        let shadow = InnerShadow::new(0.2, 5.0, 3.0);
        surface.set_shadow(a, Some(shadow)).unwrap();
        surface.set_shadow(b, Some(shadow)).unwrap();

        let svg = surface.to_svg_string();
        assert_eq!(svg.matches("<filter ").count(), 1);
        assert!(svg.contains(r#"<feOffset dx="0" dy="3"/>"#));
        assert!(svg.contains(r#"stdDeviation="5""#));
        assert!(svg.contains(r#"flood-opacity="0.2""#));
        assert_eq!(svg.matches(r##"filter="url(#inner-shadow-0)""##).count(), 2);
    }

    #[test]
    fn test_no_defs_without_shadows() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.create_path(&PathDescription::new().move_to(0.0, 0.0).close());
        assert!(!surface.to_svg_string().contains("<defs>"));
    }

    #[test]
    fn test_removed_elements_are_not_serialized() {
        let mut surface = SvgSurface::new(100.0, 100.0);
        let keep = surface.create_text(0.0, 0.0, "keep", &TextStyle::new(10.0, Rgb::BLACK));
        let gone = surface.create_text(0.0, 0.0, "gone", &TextStyle::new(10.0, Rgb::BLACK));
        surface.remove(gone).unwrap();

        let svg = surface.to_svg_string();
        assert!(svg.contains("keep"));
        assert!(!svg.contains("gone"));
        assert!(surface.element(keep).is_some());
        assert_eq!(
            surface.remove(gone),
            Err(SurfaceError::UnknownElement(gone))
        );
    }

    #[test]
    fn test_write_to_file() {
        let mut surface = SvgSurface::new(20.0, 10.0);
        surface.create_text(10.0, 5.0, "ok", &TextStyle::new(4.0, Rgb::BLACK));

        let path = std::env::temp_dir().join(format!("rg-gauge-svg-{}.svg", std::process::id()));
        surface.write_to(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(written, surface.to_svg_string());
    }
}
