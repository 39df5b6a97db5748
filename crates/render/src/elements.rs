//! Retained element store shared by the surfaces

use rg_gauge_core::{
    ElementHandle, InnerShadow, PathDescription, Rotation, Style, SurfaceError, TextStyle,
};

/// Geometry or text carried by an element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Path(PathDescription),
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
}

/// One drawable element with its paint state
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub handle: ElementHandle,
    pub kind: ElementKind,
    pub style: Style,
    pub transform: Option<Rotation>,
    pub shadow: Option<InnerShadow>,
}

impl Element {
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text { .. })
    }
}

/// Elements in paint order
#[derive(Debug, Clone, Default)]
pub struct ElementList {
    next_id: u64,
    elements: Vec<Element>,
}

impl ElementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn get(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.iter().find(|e| e.handle == handle)
    }

    fn get_mut(&mut self, handle: ElementHandle) -> Result<&mut Element, SurfaceError> {
        self.elements
            .iter_mut()
            .find(|e| e.handle == handle)
            .ok_or(SurfaceError::UnknownElement(handle))
    }

    fn push(&mut self, kind: ElementKind, style: Style) -> ElementHandle {
        let handle = ElementHandle::new(self.next_id);
        self.next_id += 1;
        self.elements.push(Element {
            handle,
            kind,
            style,
            transform: None,
            shadow: None,
        });
        handle
    }

    pub fn add_path(&mut self, path: &PathDescription) -> ElementHandle {
        self.push(ElementKind::Path(path.clone()), Style::default())
    }

    pub fn add_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) -> ElementHandle {
        self.push(
            ElementKind::Text {
                x,
                y,
                text: text.to_string(),
                style: style.clone(),
            },
            Style::fill(style.color),
        )
    }

    pub fn set_path(
        &mut self,
        handle: ElementHandle,
        path: &PathDescription,
    ) -> Result<(), SurfaceError> {
        let element = self.get_mut(handle)?;
        match &mut element.kind {
            ElementKind::Path(current) => {
                *current = path.clone();
                Ok(())
            }
            ElementKind::Text { .. } => Err(SurfaceError::WrongKind {
                handle,
                expected: "path",
            }),
        }
    }

    pub fn set_text(&mut self, handle: ElementHandle, new_text: &str) -> Result<(), SurfaceError> {
        let element = self.get_mut(handle)?;
        match &mut element.kind {
            ElementKind::Text { text, .. } => {
                if text.as_str() != new_text {
                    text.clear();
                    text.push_str(new_text);
                }
                Ok(())
            }
            ElementKind::Path(_) => Err(SurfaceError::WrongKind {
                handle,
                expected: "text",
            }),
        }
    }

    /// Merge `style` into the element; unset fields keep their value
    pub fn set_style(&mut self, handle: ElementHandle, style: &Style) -> Result<(), SurfaceError> {
        let element = self.get_mut(handle)?;
        if let Some(fill) = style.fill {
            element.style.fill = Some(fill);
        }
        if let Some(stroke) = style.stroke {
            element.style.stroke = Some(stroke);
        }
        if let Some(width) = style.stroke_width {
            element.style.stroke_width = Some(width);
        }
        Ok(())
    }

    pub fn set_transform(
        &mut self,
        handle: ElementHandle,
        rotation: Option<Rotation>,
    ) -> Result<(), SurfaceError> {
        self.get_mut(handle)?.transform = rotation;
        Ok(())
    }

    pub fn set_shadow(
        &mut self,
        handle: ElementHandle,
        shadow: Option<InnerShadow>,
    ) -> Result<(), SurfaceError> {
        let element = self.get_mut(handle)?;
        if element.is_text() {
            return Err(SurfaceError::WrongKind {
                handle,
                expected: "path",
            });
        }
        element.shadow = shadow;
        Ok(())
    }

    /// Distinct shadows in first-use order
    pub fn shadows(&self) -> Vec<InnerShadow> {
        let mut shadows: Vec<InnerShadow> = Vec::new();
        for shadow in self.elements.iter().filter_map(|e| e.shadow) {
            if !shadows.contains(&shadow) {
                shadows.push(shadow);
            }
        }
        shadows
    }

    pub fn remove(&mut self, handle: ElementHandle) -> Result<(), SurfaceError> {
        let index = self
            .elements
            .iter()
            .position(|e| e.handle == handle)
            .ok_or(SurfaceError::UnknownElement(handle))?;
        self.elements.remove(index);
        Ok(())
    }
}
