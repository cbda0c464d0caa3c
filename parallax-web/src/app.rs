use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use parallax_core::{
    Animator, Clock, CoreError, GradientMap, Parameter, Renderer, SceneConfig, Variant, Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlCanvasElement, MouseEvent, Performance, Window};

use crate::fetch::fetch_bytes;
use crate::gl::{js_err, GlRenderer};

/// Seconds since start, read from `performance.now()`
struct PerformanceClock {
    performance: Performance,
    origin_ms: f64,
}

impl PerformanceClock {
    fn new(window: &Window) -> Result<Self> {
        let performance = window.performance().context("performance API unavailable")?;
        let origin_ms = performance.now();
        Ok(Self {
            performance,
            origin_ms,
        })
    }
}

impl Clock for PerformanceClock {
    fn elapsed_seconds(&self) -> f32 {
        ((self.performance.now() - self.origin_ms) / 1000.0) as f32
    }
}

fn window_viewport(window: &Window) -> Result<Viewport> {
    let width = window.inner_width().map_err(js_err)?.as_f64().unwrap_or(0.0);
    let height = window.inner_height().map_err(js_err)?.as_f64().unwrap_or(0.0);
    Ok(Viewport::new(
        width as f32,
        height as f32,
        window.device_pixel_ratio() as f32,
    ))
}

struct App {
    animator: Animator,
    renderer: GlRenderer,
    window: Window,
    clock: PerformanceClock,
}

impl App {
    fn resize(&mut self) -> Result<()> {
        let viewport = window_viewport(&self.window)?;
        if self
            .animator
            .on_resize(viewport.width, viewport.height, viewport.device_pixel_ratio)
        {
            self.renderer.resize(self.animator.viewport())?;
        }
        Ok(())
    }

    fn scroll(&mut self) {
        match self.window.scroll_y() {
            Ok(scroll_y) => {
                self.animator.on_scroll(scroll_y as f32);
            }
            Err(err) => log::warn!("scrollY unavailable: {:?}", err),
        }
    }

    fn frame(&mut self) {
        let elapsed = self.clock.elapsed_seconds();
        if let Err(err) = self.animator.frame(elapsed, &mut self.renderer) {
            log::error!("frame failed: {:#}", err);
        }
    }
}

fn to_js(err: CoreError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Handle to a running scene, exposing the inspector parameters to JavaScript
#[wasm_bindgen]
pub struct WebApp {
    inner: Rc<RefCell<App>>,
}

#[wasm_bindgen]
impl WebApp {
    /// Set an inspector parameter by name ("materialColor" or "particlesColor")
    pub fn set_parameter(&self, name: &str, value: &str) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .animator
            .set_parameter_str(name, value)
            .map_err(to_js)
    }

    pub fn set_material_color(&self, hex: &str) -> Result<(), JsValue> {
        self.set_parameter(Parameter::MaterialColor.name(), hex)
    }

    pub fn set_particles_color(&self, hex: &str) -> Result<(), JsValue> {
        self.set_parameter(Parameter::ParticlesColor.name(), hex)
    }

    pub fn material_color(&self) -> Option<String> {
        self.color_of(Parameter::MaterialColor)
    }

    /// `None` for the classic variant, which has no particles
    pub fn particles_color(&self) -> Option<String> {
        self.color_of(Parameter::ParticlesColor)
    }

    pub fn current_section(&self) -> Option<usize> {
        self.inner.borrow().animator.current_section()
    }

    fn color_of(&self, parameter: Parameter) -> Option<String> {
        self.inner
            .borrow()
            .animator
            .parameter(parameter)
            .map(|color| color.to_hex())
    }
}

/// Start the scene on the canvas `canvas_id`.
///
/// `variant` is "classic" or "sections" (the default); `config_json` is an
/// optional JSON scene config. Listeners and the animation loop live for the
/// rest of the page.
#[wasm_bindgen]
pub fn start(
    canvas_id: &str,
    variant: Option<String>,
    config_json: Option<String>,
) -> Result<WebApp, JsValue> {
    launch(canvas_id, variant.as_deref(), config_json.as_deref())
        .map_err(|err| JsValue::from_str(&format!("{:#}", err)))
}

fn launch(canvas_id: &str, variant: Option<&str>, config_json: Option<&str>) -> Result<WebApp> {
    let variant = variant
        .map(str::parse::<Variant>)
        .transpose()?
        .unwrap_or(Variant::Sections);
    let config = match config_json {
        Some(json) => SceneConfig::from_json(json).context("invalid scene config")?,
        None => SceneConfig::default(),
    };
    let gradient_url = config.gradient_url.clone();

    let window = web_sys::window().context("no window")?;
    let document = window.document().context("no document")?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .with_context(|| format!("no element #{}", canvas_id))?
        .dyn_into()
        .map_err(|_| anyhow!("#{} is not a canvas", canvas_id))?;

    let viewport = window_viewport(&window)?;
    let animator = Animator::new(config, variant, viewport, None);
    let mut renderer = GlRenderer::new(canvas, animator.scene())?;
    renderer.resize(animator.viewport())?;

    let clock = PerformanceClock::new(&window)?;
    let inner = Rc::new(RefCell::new(App {
        animator,
        renderer,
        window: window.clone(),
        clock,
    }));
    inner.borrow_mut().scroll();
    log::info!("started {} variant on #{}", variant, canvas_id);

    if let Some(url) = gradient_url {
        load_gradient(Rc::clone(&inner), url);
    }
    listen(&window, &inner)?;
    run_loop(window, Rc::clone(&inner))?;

    Ok(WebApp { inner })
}

/// Fetch and decode the gradient in the background; the untextured toon
/// shading stays in place if either step fails
fn load_gradient(app: Rc<RefCell<App>>, url: String) {
    spawn_local(async move {
        let gradient = fetch_bytes(&url)
            .await
            .and_then(|bytes| GradientMap::decode(&bytes).map_err(anyhow::Error::from));
        match gradient {
            Ok(map) => {
                log::info!("loaded {}-level gradient from {}", map.width(), url);
                app.borrow_mut().animator.set_gradient(Some(map));
            }
            Err(err) => log::warn!(
                "gradient {} unavailable ({:#}), using untextured toon shading",
                url,
                err
            ),
        }
    });
}

fn listen(window: &Window, app: &Rc<RefCell<App>>) -> Result<()> {
    let on_resize = {
        let app = Rc::clone(app);
        Closure::<dyn FnMut()>::new(move || {
            if let Err(err) = app.borrow_mut().resize() {
                log::error!("resize failed: {:#}", err);
            }
        })
    };
    window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_resize.forget();

    let on_scroll = {
        let app = Rc::clone(app);
        Closure::<dyn FnMut()>::new(move || app.borrow_mut().scroll())
    };
    window
        .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_scroll.forget();

    let on_mouse_move = {
        let app = Rc::clone(app);
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            app.borrow_mut()
                .animator
                .on_pointer_move(event.client_x() as f32, event.client_y() as f32);
        })
    };
    window
        .add_event_listener_with_callback("mousemove", on_mouse_move.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_mouse_move.forget();

    Ok(())
}

fn run_loop(window: Window, app: Rc<RefCell<App>>) -> Result<()> {
    // The callback re-schedules itself, so it is stored behind an Option that
    // is filled after the closure exists.
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&tick);
    let frame_window = window.clone();

    *tick.borrow_mut() = Some(Closure::new(move || {
        app.borrow_mut().frame();
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(err) = frame_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {:?}", err);
            }
        }
    }));

    let first = tick.borrow();
    let callback = first.as_ref().context("animation callback missing")?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(js_err)?;
    Ok(())
}
