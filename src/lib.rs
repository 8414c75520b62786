pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, Window};

#[cfg(target_arch = "wasm32")]
use config::{AppConfig, CanvasConfig};
#[cfg(target_arch = "wasm32")]
use controller::{input, FrameDriver, KeyBindings};
#[cfg(target_arch = "wasm32")]
use error::InitError;
#[cfg(target_arch = "wasm32")]
use model::objects;
#[cfg(target_arch = "wasm32")]
use view::{GpuContext, WgpuRenderer};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    logging::init();
    let config = AppConfig::default();

    match setup_app(&config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("initialization failed: {e}");
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&format!(
                    "Unable to initialize rendering. Your browser or machine may not support it.\n{e}"
                ));
            }
            Err(JsValue::from_str(&e.to_string()))
        }
    }
}

/// Main application setup for WASM
#[cfg(target_arch = "wasm32")]
async fn setup_app(config: &AppConfig) -> Result<(), InitError> {
    let (window, document, canvas) = init_canvas(&config.canvas)?;
    let (width, height) = canvas_size(&canvas, &config.canvas);
    canvas.set_width(width);
    canvas.set_height(height);

    let gpu = GpuContext::new(&canvas, width, height).await?;
    let scene = objects::build_scene()?;
    let mut renderer = WgpuRenderer::new(gpu, &config.view);

    let driver = Rc::new(RefCell::new(FrameDriver::new(scene, config)));
    {
        let mut driver = driver.borrow_mut();
        driver.register(&mut renderer);
        driver.resize(width, height);
    }

    setup_input_listeners(&document, driver.clone(), KeyBindings::from_config(&config.navigation))?;

    let canvas_config = config.canvas.clone();
    let frame = AnimationLoop::new(window, move |time| {
        let (width, height) = canvas_size(&canvas, &canvas_config);
        if (width, height) != renderer.size() {
            canvas.set_width(width);
            canvas.set_height(height);
            renderer.resize(width, height);
            driver.borrow_mut().resize(width, height);
        }
        driver.borrow_mut().tick(time, &mut renderer);
    });
    frame.start()?;

    tracing::info!(width, height, "frame loop started");
    Ok(())
}

/// Keyboard input goes straight into the driver's command queue.
#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(
    document: &Document,
    driver: Rc<RefCell<FrameDriver>>,
    bindings: KeyBindings,
) -> Result<(), InitError> {
    let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
        if let Some(command) = input::wasm::keyboard_event_to_command(&bindings, &e) {
            driver.borrow_mut().enqueue(command);
            e.prevent_default();
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);
    document
        .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
        .map_err(browser_error)?;
    keydown.forget();

    Ok(())
}

/// Use the page's canvas if it has one, otherwise append a new one to the body.
#[cfg(target_arch = "wasm32")]
fn init_canvas(config: &CanvasConfig) -> Result<(Window, Document, HtmlCanvasElement), InitError> {
    let window = web_sys::window().ok_or(InitError::NoWindow)?;
    let document = window.document().ok_or(InitError::NoDocument)?;

    if let Some(element) = document.get_element_by_id(&config.element_id) {
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| InitError::Canvas(format!("#{} is not a canvas", config.element_id)))?;
        return Ok((window, document, canvas));
    }

    let body = document
        .body()
        .ok_or_else(|| InitError::Canvas("no body on document".to_string()))?;
    let canvas = document
        .create_element("canvas")
        .map_err(browser_error)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| InitError::Canvas("failed to create canvas".to_string()))?;
    canvas.set_id(&config.element_id);
    canvas.set_width(config.width);
    canvas.set_height(config.height);
    body.append_child(&canvas).map_err(browser_error)?;
    Ok((window, document, canvas))
}

/// Displayed canvas size, falling back to the configured size before layout.
#[cfg(target_arch = "wasm32")]
fn canvas_size(canvas: &HtmlCanvasElement, config: &CanvasConfig) -> (u32, u32) {
    let width = canvas.client_width();
    let height = canvas.client_height();
    if width > 0 && height > 0 {
        (width as u32, height as u32)
    } else {
        (config.width, config.height)
    }
}

#[cfg(target_arch = "wasm32")]
fn browser_error(value: JsValue) -> InitError {
    InitError::Browser(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// Self-rescheduling `requestAnimationFrame` callback receiving the frame timestamp.
#[cfg(target_arch = "wasm32")]
struct AnimationLoop {
    inner: Rc<RefCell<Box<dyn FnMut(f64)>>>,
    window: Window,
}

#[cfg(target_arch = "wasm32")]
impl AnimationLoop {
    fn new(window: Window, f: impl FnMut(f64) + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(f))),
            window,
        }
    }

    fn start(self) -> Result<(), InitError> {
        let inner = self.inner.clone();
        let window = self.window.clone();

        let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut(f64)>>));
        let callback_clone = callback.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |time: f64| {
            inner.borrow_mut().as_mut()(time);

            // Schedule the next frame
            if let Some(cb) = callback_clone.borrow().as_ref() {
                let next: &js_sys::Function = cb.as_ref().unchecked_ref();
                if let Err(e) = window.request_animation_frame(next) {
                    tracing::error!("requestAnimationFrame failed: {e:?}");
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(cb) = callback.borrow().as_ref() {
            self.window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .map_err(browser_error)?;
        }

        // Leak the closure to keep it alive
        std::mem::forget(callback);
        Ok(())
    }
}
