//! Radial gauge displayer - draws and animates a gauge on a render surface

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rg_gauge_core::{
    build_arc_path, build_pointer_path, build_target_line_path, Animation, AnimationCallbacks,
    AnimationEngine, ColorSource, ElementHandle, GeometryCache, InnerShadow, LabelLayout,
    PointerDimensions,
    RenderSurface, Rotation, Style, SurfaceError, TextPlacement, TextRenderer, TextStyle, Ticker,
    ValueFormatter,
};
use rg_gauge_types::display_configs::default_level_colors;
use rg_gauge_types::{ratio_of, ConfigError, GaugeConfig, GaugeMode, Geometry, Rgb};
use thiserror::Error;

/// Errors from gauge operations
#[derive(Debug, Error)]
pub enum GaugeError {
    #[error("invalid gauge configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("refresh requires a finite value, got {0}")]
    NonFiniteValue(f64),
    #[error("render surface: {0}")]
    Surface(#[from] SurfaceError),
    #[error("gauge scene is still borrowed")]
    SceneBusy,
}

/// Appearance changes accepted by [`GaugeDisplayer::update`].
///
/// Colors are hex strings (`#rrggbb` or `#rgb`); malformed colors are
/// ignored with a warning.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeUpdate {
    ValueFontColor(String),
    LabelFontColor(String),
    GaugeColor(String),
    LevelColors(Vec<String>),
    TargetLine(Option<f64>),
    TargetLineColor(String),
    TargetLineWidth(f64),
    Symbol(String),
    Decimals(usize),
}

type AnimationEndHook = Rc<dyn Fn(f64)>;

/// Handles of everything drawn on the surface
#[derive(Debug, Default)]
struct SceneElements {
    background: Option<ElementHandle>,
    level: Option<ElementHandle>,
    pointer: Option<ElementHandle>,
    target_line: Option<ElementHandle>,
    title: Option<ElementHandle>,
    value_text: Option<ElementHandle>,
    label: Option<ElementHandle>,
    min_text: Option<ElementHandle>,
    max_text: Option<ElementHandle>,
}

impl SceneElements {
    fn take_all(&mut self) -> Vec<ElementHandle> {
        [
            self.background.take(),
            self.level.take(),
            self.pointer.take(),
            self.target_line.take(),
            self.title.take(),
            self.value_text.take(),
            self.label.take(),
            self.min_text.take(),
            self.max_text.take(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Shared gauge state mutated by the public API and by animation callbacks
struct GaugeScene<S> {
    surface: S,
    config: GaugeConfig,
    geometry_cache: GeometryCache,
    geometry: Geometry,
    colors: ColorSource,
    formatter: ValueFormatter,
    /// Value the level arc currently shows
    drawn_value: f64,
    /// Last value handed in, unclamped; what the value text shows
    display_value: f64,
    /// Target line stays hidden until the running refresh completes
    target_line_deferred: bool,
    elements: SceneElements,
    on_animation_end: Option<AnimationEndHook>,
}

impl<S: RenderSurface> GaugeScene<S> {
    fn new(config: GaugeConfig, surface: S) -> Self {
        let colors = color_source(&config);
        let formatter = ValueFormatter::from_config(&config);
        Self {
            surface,
            drawn_value: config.min,
            display_value: config.value,
            target_line_deferred: false,
            config,
            geometry_cache: GeometryCache::new(),
            geometry: Geometry::default(),
            colors,
            formatter,
            elements: SceneElements::default(),
            on_animation_end: None,
        }
    }

    fn mode(&self) -> GaugeMode {
        self.config.mode()
    }

    fn refresh_geometry(&mut self) {
        self.geometry = self.geometry_cache.get(
            self.config.width,
            self.config.height,
            self.mode(),
            self.config.gauge_width_scale,
        );
    }

    /// Donut elements are turned so the fill starts at `donut_start_angle`
    fn donut_rotation(&self) -> Option<Rotation> {
        if !self.mode().is_donut() {
            return None;
        }
        let (cx, cy) = self.geometry.box_center();
        Some(Rotation::new(self.config.donut_start_angle, cx, cy))
    }

    fn inner_shadow(&self) -> Option<InnerShadow> {
        self.config.show_inner_shadow.then(|| {
            InnerShadow::new(
                self.config.shadow_opacity,
                self.config.shadow_size,
                self.config.shadow_vertical_offset,
            )
        })
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        for handle in self.elements.take_all() {
            self.surface.remove(handle)?;
        }
        Ok(())
    }

    /// Tear down and draw every element for the current configuration
    fn draw_all(&mut self) -> Result<(), SurfaceError> {
        self.clear()?;
        self.refresh_geometry();
        self.surface.set_size(self.config.width, self.config.height);

        let rotation = self.donut_rotation();
        let (min, max, mode) = (self.config.min, self.config.max, self.mode());

        let background = self
            .surface
            .create_path(&build_arc_path(max, min, max, &self.geometry, mode));
        self.surface
            .set_style(background, &Style::fill(self.config.gauge_color))?;
        self.surface.set_transform(background, rotation)?;
        self.surface.set_shadow(background, self.inner_shadow())?;
        self.elements.background = Some(background);

        self.draw_level(self.drawn_value)?;
        self.draw_labels()?;
        if self.config.pointer {
            self.draw_pointer(self.drawn_value)?;
        }
        self.draw_target_line()?;
        Ok(())
    }

    /// Value as placed on the arc; reversed gauges fill from the right
    fn arc_value(&self, value: f64) -> f64 {
        self.config.state().display_value(value)
    }

    fn draw_level(&mut self, value: f64) -> Result<(), SurfaceError> {
        let (min, max) = (self.config.min, self.config.max);
        let color = self.colors.resolve(value, ratio_of(value, min, max));
        let path = build_arc_path(self.arc_value(value), min, max, &self.geometry, self.mode());

        match self.elements.level {
            Some(level) => self.surface.set_path(level, &path)?,
            None => {
                let level = self.surface.create_path(&path);
                self.surface.set_transform(level, self.donut_rotation())?;
                self.surface.set_shadow(level, self.inner_shadow())?;
                self.elements.level = Some(level);
            }
        }
        if let Some(level) = self.elements.level {
            self.surface.set_style(level, &Style::fill(color))?;
        }
        Ok(())
    }

    fn draw_pointer(&mut self, value: f64) -> Result<(), SurfaceError> {
        let options = &self.config.pointer_options;
        let dims = PointerDimensions::resolve(options, &self.geometry);
        let path = build_pointer_path(
            self.arc_value(value),
            self.config.min,
            self.config.max,
            &self.geometry,
            self.mode(),
            &dims,
        );

        match self.elements.pointer {
            Some(pointer) => self.surface.set_path(pointer, &path)?,
            None => {
                let mut style = Style::fill(options.color);
                if let Some(stroke) = options.stroke {
                    style = style.with_stroke(stroke, options.stroke_width);
                }
                let pointer = self.surface.create_path(&path);
                self.surface.set_style(pointer, &style)?;
                self.surface.set_transform(pointer, self.donut_rotation())?;
                self.elements.pointer = Some(pointer);
            }
        }
        Ok(())
    }

    fn draw_target_line(&mut self) -> Result<(), SurfaceError> {
        self.remove_target_line()?;
        if self.target_line_deferred {
            return Ok(());
        }
        let Some(target) = self.config.target_line else {
            return Ok(());
        };

        let path = build_target_line_path(
            target,
            self.config.min,
            self.config.max,
            &self.geometry,
            self.mode(),
            self.config.reverse,
        );
        let line = self.surface.create_path(&path);
        self.surface.set_style(
            line,
            &Style::stroke(self.config.target_line_color, self.config.target_line_width),
        )?;
        self.surface.set_transform(line, self.donut_rotation())?;
        self.elements.target_line = Some(line);
        Ok(())
    }

    fn remove_target_line(&mut self) -> Result<(), SurfaceError> {
        if let Some(line) = self.elements.target_line.take() {
            self.surface.remove(line)?;
        }
        Ok(())
    }

    fn create_text(&mut self, at: TextPlacement, text: &str, style: TextStyle) -> ElementHandle {
        self.surface.create_text(at.x, at.y, text, &style)
    }

    fn draw_labels(&mut self) -> Result<(), SurfaceError> {
        let layout = LabelLayout::compute(&self.geometry, &self.config);

        if let Some(at) = layout.title {
            let style = TextStyle::new(at.font_size, self.config.title_font_color)
                .family(self.config.title_font_family.as_str())
                .weight(self.config.title_font_weight.as_str());
            let title = self.config.title.clone();
            self.elements.title = Some(self.create_text(at, &title, style));
        }

        if !self.config.hide_value {
            // Counters start from whatever the level shows
            let shown = if self.config.counter {
                self.drawn_value
            } else {
                self.display_value
            };
            let text = self.formatter.format(shown);
            let style = TextStyle::new(layout.value.font_size, self.config.value_font_color)
                .family(self.config.value_font_family.as_str())
                .weight(self.config.value_font_weight.as_str());
            self.elements.value_text = Some(self.create_text(layout.value, &text, style));
        }

        if let Some(at) = layout.label {
            let label = self.config.label.clone();
            let style = self.label_style(at.font_size);
            self.elements.label = Some(self.create_text(at, &label, style));
        }

        if let (Some(min_at), Some(max_at)) = (layout.min, layout.max) {
            let min_text = self
                .formatter
                .bound_text(self.config.min, self.config.min_txt.as_deref());
            let max_text = self
                .formatter
                .bound_text(self.config.max, self.config.max_txt.as_deref());
            self.elements.min_text = Some(self.create_text(
                min_at,
                &min_text,
                self.label_style(min_at.font_size),
            ));
            self.elements.max_text = Some(self.create_text(
                max_at,
                &max_text,
                self.label_style(max_at.font_size),
            ));
        }
        Ok(())
    }

    fn label_style(&self, font_size: f64) -> TextStyle {
        TextStyle::new(font_size, self.config.label_font_color)
            .family(self.config.label_font_family.as_str())
            .weight(self.config.label_font_weight.as_str())
    }

    fn update_bound_texts(&mut self) -> Result<(), SurfaceError> {
        if let Some(min_text) = self.elements.min_text {
            let text = self
                .formatter
                .bound_text(self.config.min, self.config.min_txt.as_deref());
            self.surface.set_text(min_text, &text)?;
        }
        if let Some(max_text) = self.elements.max_text {
            let text = self
                .formatter
                .bound_text(self.config.max, self.config.max_txt.as_deref());
            self.surface.set_text(max_text, &text)?;
        }
        Ok(())
    }

    /// Re-render the value text after a formatting change
    fn refresh_value_text(&mut self) -> Result<(), SurfaceError> {
        let value = if self.config.counter {
            self.drawn_value
        } else {
            self.display_value
        };
        self.set_value_text(value)
    }

    fn set_value_text(&mut self, value: f64) -> Result<(), SurfaceError> {
        if let Some(value_text) = self.elements.value_text {
            let text = self.formatter.format(value);
            self.surface.set_text(value_text, &text)?;
        }
        Ok(())
    }

    /// One animation frame: move the level (and pointer) to `value`
    fn show_level(&mut self, value: f64) -> Result<(), SurfaceError> {
        self.drawn_value = value;
        self.draw_level(value)?;
        if self.config.pointer {
            self.draw_pointer(value)?;
        }
        Ok(())
    }
}

fn color_source(config: &GaugeConfig) -> ColorSource {
    ColorSource::new(
        &config.level_colors,
        config.no_gradient,
        Some(&config.custom_sectors),
    )
}

fn parse_color(option: &str, value: &str) -> Option<Rgb> {
    if !Rgb::is_hex_color(value) {
        log::warn!("{} must be a valid hex color, got {:?}", option, value);
        return None;
    }
    value.parse().ok()
}

/// Animated radial gauge drawn onto a [`RenderSurface`]
pub struct GaugeDisplayer<S: RenderSurface + 'static> {
    scene: Rc<RefCell<GaugeScene<S>>>,
    engine: AnimationEngine,
}

impl<S: RenderSurface + 'static> GaugeDisplayer<S> {
    /// Validate `config`, draw the gauge at its minimum and start the
    /// initial animation towards `config.value`.
    pub fn new(config: GaugeConfig, surface: S, ticker: Rc<dyn Ticker>) -> Result<Self, GaugeError> {
        let config = config.validate()?;
        log::debug!(
            "Creating {:?} gauge {}x{} range [{}, {}]",
            config.mode(),
            config.width,
            config.height,
            config.min,
            config.max
        );

        let animation = Animation::new(
            config.min,
            config.value,
            config.start_animation_time,
            config.start_animation_type,
        );

        let mut scene = GaugeScene::new(config, surface);
        scene.draw_all()?;

        let displayer = Self {
            scene: Rc::new(RefCell::new(scene)),
            engine: AnimationEngine::new(ticker),
        };
        displayer.start_animation(animation);
        Ok(displayer)
    }

    /// Called with the final value whenever an animation finishes
    pub fn set_on_animation_end(&self, hook: impl Fn(f64) + 'static) {
        self.scene.borrow_mut().on_animation_end = Some(Rc::new(hook));
    }

    /// Custom value text; returning `None` uses the built-in formatting
    pub fn set_text_renderer(&self, renderer: Option<TextRenderer>) -> Result<(), GaugeError> {
        let mut scene = self.scene.borrow_mut();
        scene.formatter.set_renderer(renderer);
        scene.refresh_value_text()?;
        Ok(())
    }

    fn start_animation(&self, animation: Animation) {
        let counter = self.scene.borrow().config.counter;

        let weak = Rc::downgrade(&self.scene);
        let mut callbacks = AnimationCallbacks::new(move |value| {
            with_scene(&weak, |scene| scene.show_level(value));
        });

        if counter {
            let weak = Rc::downgrade(&self.scene);
            callbacks = callbacks.counter(move |value| {
                with_scene(&weak, |scene| scene.set_value_text(value));
            });
        }

        let weak = Rc::downgrade(&self.scene);
        let to = animation.to;
        callbacks = callbacks.on_complete(move || {
            let hook = with_scene(&weak, |scene| {
                if scene.target_line_deferred {
                    scene.target_line_deferred = false;
                    scene.draw_target_line()?;
                }
                Ok(scene.on_animation_end.clone())
            })
            .flatten();
            if let Some(hook) = hook {
                hook(to);
            }
        });

        self.engine.animate(animation, callbacks);
    }

    /// Set a new value (and optionally a new range and label), animating
    /// from the currently drawn value.
    ///
    /// The value text shows `value` as given; the arc is clamped to the range.
    pub fn refresh(
        &self,
        value: f64,
        max: Option<f64>,
        min: Option<f64>,
        label: Option<&str>,
    ) -> Result<(), GaugeError> {
        if !value.is_finite() {
            return Err(GaugeError::NonFiniteValue(value));
        }

        let animation = {
            let mut scene = self.scene.borrow_mut();

            let new_min = min.filter(|m| m.is_finite()).unwrap_or(scene.config.min);
            let new_max = max.filter(|m| m.is_finite()).unwrap_or(scene.config.max);
            if new_min >= new_max {
                return Err(ConfigError::InvalidRange {
                    min: new_min,
                    max: new_max,
                }
                .into());
            }
            // A label appearing for the first time needs a layout pass
            let mut needs_layout = false;
            if let Some(label) = label {
                scene.config.label = label.to_string();
                match scene.elements.label {
                    Some(handle) => scene.surface.set_text(handle, label)?,
                    None => needs_layout = !label.is_empty(),
                }
            }

            let range_changed = new_min != scene.config.min || new_max != scene.config.max;
            scene.config.min = new_min;
            scene.config.max = new_max;
            scene.formatter.set_max(new_max);

            let clamped = value.clamp(new_min, new_max);
            scene.config.value = clamped;
            scene.display_value = value;
            // Hidden until this animation completes, even across redraws
            scene.target_line_deferred = true;
            scene.remove_target_line()?;

            if range_changed || needs_layout {
                // Background, bounds and target line all depend on the range
                let drawn = scene.drawn_value.clamp(new_min, new_max);
                scene.drawn_value = drawn;
                scene.draw_all()?;
            } else {
                scene.update_bound_texts()?;
            }

            if !scene.config.counter {
                scene.set_value_text(value)?;
            }

            log::debug!("Refreshing gauge {} -> {}", scene.drawn_value, clamped);
            Animation::new(
                scene.drawn_value,
                clamped,
                scene.config.refresh_animation_time,
                scene.config.refresh_animation_type,
            )
        };

        self.start_animation(animation);
        Ok(())
    }

    /// Apply one appearance change
    pub fn update(&self, update: GaugeUpdate) -> Result<(), GaugeError> {
        let mut scene = self.scene.borrow_mut();
        match update {
            GaugeUpdate::ValueFontColor(color) => {
                if let Some(color) = parse_color("value_font_color", &color) {
                    scene.config.value_font_color = color;
                    if let Some(handle) = scene.elements.value_text {
                        scene.surface.set_style(handle, &Style::fill(color))?;
                    }
                }
            }
            GaugeUpdate::LabelFontColor(color) => {
                if let Some(color) = parse_color("label_font_color", &color) {
                    scene.config.label_font_color = color;
                    let handles = [
                        scene.elements.min_text,
                        scene.elements.max_text,
                        scene.elements.label,
                    ];
                    for handle in handles.into_iter().flatten() {
                        scene.surface.set_style(handle, &Style::fill(color))?;
                    }
                }
            }
            GaugeUpdate::GaugeColor(color) => {
                if let Some(color) = parse_color("gauge_color", &color) {
                    scene.config.gauge_color = color;
                    if let Some(handle) = scene.elements.background {
                        scene.surface.set_style(handle, &Style::fill(color))?;
                    }
                }
            }
            GaugeUpdate::LevelColors(colors) => {
                let parsed: Option<Vec<Rgb>> = colors
                    .iter()
                    .map(|c| parse_color("level_colors", c))
                    .collect();
                match parsed {
                    Some(colors) => {
                        scene.config.level_colors = if colors.is_empty() {
                            default_level_colors()
                        } else {
                            colors
                        };
                        scene.colors = color_source(&scene.config);
                        let value = scene.drawn_value;
                        scene.draw_level(value)?;
                    }
                    None => log::warn!("Ignoring level colors update"),
                }
            }
            GaugeUpdate::TargetLine(target) => {
                scene.config.target_line = target.filter(|t| t.is_finite());
                scene.draw_target_line()?;
            }
            GaugeUpdate::TargetLineColor(color) => {
                if let Some(color) = parse_color("target_line_color", &color) {
                    scene.config.target_line_color = color;
                    if let Some(handle) = scene.elements.target_line {
                        scene.surface.set_style(
                            handle,
                            &Style {
                                stroke: Some(color),
                                ..Style::default()
                            },
                        )?;
                    }
                }
            }
            GaugeUpdate::TargetLineWidth(width) => {
                scene.config.target_line_width = width;
                if let Some(handle) = scene.elements.target_line {
                    scene.surface.set_style(
                        handle,
                        &Style {
                            stroke_width: Some(width),
                            ..Style::default()
                        },
                    )?;
                }
            }
            GaugeUpdate::Symbol(symbol) => {
                scene.config.symbol = symbol.clone();
                scene.formatter.set_symbol(symbol);
                scene.refresh_value_text()?;
            }
            GaugeUpdate::Decimals(decimals) => {
                scene.config.decimals = decimals;
                scene.formatter.set_decimals(decimals);
                scene.refresh_value_text()?;
            }
        }
        Ok(())
    }

    /// Fit the gauge to a new container size
    pub fn resize(&self, width: f64, height: f64) -> Result<(), GaugeError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidSize { width, height }.into());
        }
        self.redraw_with(|config| {
            config.width = width;
            config.height = height;
        })
    }

    /// Switch between standard, donut and differential silhouettes
    pub fn set_mode(&self, mode: GaugeMode) -> Result<(), GaugeError> {
        self.redraw_with(|config| config.mode = Some(mode))
    }

    pub fn set_width_scale(&self, scale: f64) -> Result<(), GaugeError> {
        if !(scale > 0.0) {
            return Err(ConfigError::InvalidWidthScale(scale).into());
        }
        self.redraw_with(|config| config.gauge_width_scale = scale)
    }

    fn redraw_with(&self, change: impl FnOnce(&mut GaugeConfig)) -> Result<(), GaugeError> {
        let mut scene = self.scene.borrow_mut();
        change(&mut scene.config);
        scene.geometry_cache.invalidate();
        scene.draw_all()?;
        Ok(())
    }

    /// Target value (the value the gauge settles on)
    pub fn value(&self) -> f64 {
        self.scene.borrow().config.value
    }

    /// Value the level arc shows right now
    pub fn drawn_value(&self) -> f64 {
        self.scene.borrow().drawn_value
    }

    pub fn config(&self) -> GaugeConfig {
        self.scene.borrow().config.clone()
    }

    pub fn geometry(&self) -> Geometry {
        self.scene.borrow().geometry
    }

    pub fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }

    /// Inspect the surface, e.g. to serialize it
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.scene.borrow().surface)
    }

    /// Stop animating, remove every element and hand the surface back
    pub fn destroy(self) -> Result<S, GaugeError> {
        self.engine.cancel();
        self.scene.borrow_mut().clear()?;

        let Self { scene, engine } = self;
        drop(engine);
        // Animation callbacks only hold weak references
        Rc::try_unwrap(scene)
            .map(|cell| cell.into_inner().surface)
            .map_err(|_| GaugeError::SceneBusy)
    }
}

/// Run `f` on the scene if it is still alive and not already borrowed
fn with_scene<S, R>(
    weak: &Weak<RefCell<GaugeScene<S>>>,
    f: impl FnOnce(&mut GaugeScene<S>) -> Result<R, SurfaceError>,
) -> Option<R>
where
    S: RenderSurface,
{
    let scene = weak.upgrade()?;
    let Ok(mut scene) = scene.try_borrow_mut() else {
        log::debug!("Gauge scene busy, skipping animation frame");
        return None;
    };
    let result = f(&mut scene);
    match result {
        Ok(result) => Some(result),
        Err(e) => {
            log::warn!("Failed to update gauge: {}", e);
            None
        }
    }
}

impl<S: RenderSurface + 'static> std::fmt::Debug for GaugeDisplayer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scene = self.scene.borrow();
        f.debug_struct("GaugeDisplayer")
            .field("mode", &scene.mode())
            .field("value", &scene.config.value)
            .field("drawn_value", &scene.drawn_value)
            .field("engine", &self.engine)
            .finish()
    }
}
