use std::error::Error;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::Window,
};

use flythrough::config::AppConfig;
use flythrough::controller::{FrameDriver, KeyBindings};
use flythrough::logging;
use flythrough::model::objects;
use flythrough::view::{GpuContext, WgpuRenderer};

fn main() {
    logging::init();

    if let Err(e) = run(&AppConfig::default()) {
        tracing::error!("fatal: {e}");
        std::process::exit(1);
    }
}

#[allow(deprecated)]
fn run(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new()?;
    let window_attributes = Window::default_attributes()
        .with_title("flythrough")
        .with_inner_size(winit::dpi::LogicalSize::new(config.canvas.width, config.canvas.height));
    let window = Arc::new(event_loop.create_window(window_attributes)?);
    let size = window.inner_size();

    let gpu = pollster::block_on(GpuContext::new_native(window.clone(), size.width, size.height))?;
    let scene = objects::build_scene()?;
    let mut renderer = WgpuRenderer::new(gpu, &config.view);

    let mut driver = FrameDriver::new(scene, config);
    driver.register(&mut renderer);
    driver.resize(size.width, size.height);

    let bindings = KeyBindings::from_config(&config.navigation);
    let started = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(physical_size) => {
                renderer.resize(physical_size.width, physical_size.height);
                driver.resize(physical_size.width, physical_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        // winit key codes print as DOM `KeyboardEvent.code` names
                        if let Some(command) = bindings.command_for(&format!("{code:?}")) {
                            driver.enqueue(command);
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let now_ms = started.elapsed().as_secs_f64() * 1000.0;
                driver.tick(now_ms, &mut renderer);
            }
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;

    Ok(())
}
