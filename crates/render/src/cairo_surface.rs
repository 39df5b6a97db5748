//! Cairo-backed surface

use std::fs::File;
use std::path::Path;

use rg_gauge_core::{
    ElementHandle, InnerShadow, PathCommand, PathDescription, RenderSurface, Rotation, Style,
    SurfaceError, TextAnchor, TextStyle,
};

use crate::arc::endpoint_to_center;
use crate::elements::{Element, ElementKind, ElementList};
use crate::ExportError;

/// Retained scene replayed onto a Cairo context
#[derive(Debug, Clone)]
pub struct CairoSurface {
    width: f64,
    height: f64,
    elements: ElementList,
}

impl CairoSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: ElementList::new(),
        }
    }

    pub fn elements(&self) -> &ElementList {
        &self.elements
    }

    /// Paint every element in creation order
    pub fn paint(&self, cr: &cairo::Context) -> Result<(), cairo::Error> {
        for element in self.elements.iter() {
            paint_element(cr, element)?;
        }
        Ok(())
    }

    /// Render into a transparent ARGB image and save it as PNG
    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let image = cairo::ImageSurface::create(
            cairo::Format::ARgb32,
            self.width.ceil().max(1.0) as i32,
            self.height.ceil().max(1.0) as i32,
        )?;
        {
            let cr = cairo::Context::new(&image)?;
            self.paint(&cr)?;
        }
        image.flush();

        let mut file = File::create(path)?;
        image.write_to_png(&mut file)?;
        log::debug!("Wrote PNG to {:?}", path);
        Ok(())
    }
}

fn paint_element(cr: &cairo::Context, element: &Element) -> Result<(), cairo::Error> {
    cr.save()?;
    if let Some(rotation) = element.transform {
        cr.translate(rotation.cx, rotation.cy);
        cr.rotate(rotation.degrees.to_radians());
        cr.translate(-rotation.cx, -rotation.cy);
    }

    match &element.kind {
        ElementKind::Path(path) => {
            trace_path(cr, path);
            let style = &element.style;
            if let Some(fill) = style.fill {
                let (r, g, b) = fill.to_unit_rgb();
                cr.set_source_rgb(r, g, b);
                if style.stroke.is_some() {
                    cr.fill_preserve()?;
                } else {
                    cr.fill()?;
                }
            }
            if let Some(stroke) = style.stroke {
                let (r, g, b) = stroke.to_unit_rgb();
                cr.set_source_rgb(r, g, b);
                cr.set_line_width(style.stroke_width.unwrap_or(1.0));
                cr.stroke()?;
            }
        }
        ElementKind::Text { x, y, text, style } => {
            let weight = if style.is_bold() {
                cairo::FontWeight::Bold
            } else {
                cairo::FontWeight::Normal
            };
            cr.select_font_face(&style.font_family, cairo::FontSlant::Normal, weight);
            cr.set_font_size(style.font_size);

            let extents = cr.text_extents(text)?;
            let shift = match style.anchor {
                TextAnchor::Start => 0.0,
                TextAnchor::Middle => -extents.width() / 2.0 - extents.x_bearing(),
                TextAnchor::End => -extents.width() - extents.x_bearing(),
            };

            let (r, g, b) = element.style.fill.unwrap_or(style.color).to_unit_rgb();
            cr.set_source_rgb(r, g, b);
            cr.move_to(x + shift, *y);
            cr.show_text(text)?;
        }
    }

    cr.restore()
}

fn trace_path(cr: &cairo::Context, path: &PathDescription) {
    let mut current = (0.0, 0.0);
    let mut subpath_start = (0.0, 0.0);

    cr.new_path();
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo { x, y } => {
                cr.move_to(x, y);
                current = (x, y);
                subpath_start = current;
            }
            PathCommand::LineTo { x, y } => {
                cr.line_to(x, y);
                current = (x, y);
            }
            PathCommand::Arc {
                rx,
                large_arc,
                sweep,
                x,
                y,
                ..
            } => {
                match endpoint_to_center(current, rx, large_arc, sweep, (x, y)) {
                    Some(arc) if arc.positive => {
                        cr.arc(arc.cx, arc.cy, arc.radius, arc.start_angle, arc.end_angle)
                    }
                    Some(arc) => {
                        cr.arc_negative(arc.cx, arc.cy, arc.radius, arc.start_angle, arc.end_angle)
                    }
                    None => cr.line_to(x, y),
                }
                current = (x, y);
            }
            PathCommand::Close => {
                cr.close_path();
                current = subpath_start;
            }
        }
    }
}

impl RenderSurface for CairoSurface {
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

    /// Kept on the element; Cairo output draws no blur
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
