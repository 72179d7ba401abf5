//====================================================================

use std::time::Duration;

use renderer::{Renderer, RendererError};
use scene::Scene;
use thiserror::Error;
use tools::{Input, KeyCode};
use window::{Window, WindowSettings};
use winit::{
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
};

pub mod scene;
pub mod tools;
pub mod window;

//====================================================================

const DEFAULT_FPS: f32 = 1. / 60.;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Unable to create window: {0}")]
    Os(#[from] winit::error::OsError),

    #[error(transparent)]
    Renderer(#[from] RendererError),

    #[error("Window is not on any monitor")]
    NoMonitor,
}

//====================================================================

pub struct State {
    inner: StateInner,
}

pub struct StateInner {
    pub fps: Duration,
    pub window: Window,
    pub renderer: Renderer,
    pub keys: Input<KeyCode>,
}

impl State {
    pub(crate) fn new(
        event_loop: &ActiveEventLoop,
        settings: &WindowSettings,
    ) -> Result<Self, EngineError> {
        log::info!("Creating window '{}' {}", settings.title, settings.size);

        let fps = Duration::from_secs_f32(DEFAULT_FPS);
        let window = Window::new(event_loop, settings)?;

        let mut renderer = Renderer::new(window.0.clone(), settings.size)?;
        renderer.set_clear_color(settings.background);

        Ok(Self {
            inner: StateInner {
                fps,
                window,
                renderer,
                keys: Input::default(),
            },
        })
    }

    pub(crate) fn window_event(
        &mut self,
        scene: &mut dyn Scene,
        event_loop: &ActiveEventLoop,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(physical_size) => {
                if physical_size.width == 0 || physical_size.height == 0 {
                    log::warn!(
                        "Window resized to invalid size ({}, {})",
                        physical_size.width,
                        physical_size.height
                    );
                    return;
                }
                let size = window::to_size(physical_size);
                self.inner.renderer.resize(size);
                scene.resize(&mut self.inner, size);
            }

            WindowEvent::CloseRequested => {
                log::info!("Close requested. Closing App");
                event_loop.exit();
            }

            WindowEvent::Destroyed => log::info!("Window was destroyed"),

            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key) = event.physical_key {
                    tools::process_inputs(&mut self.inner.keys, key, event.state.is_pressed())
                }
            }

            WindowEvent::RedrawRequested => {
                event_loop.set_control_flow(ControlFlow::wait_duration(self.inner.fps));

                self.tick(scene);
            }

            _ => {}
        }
    }

    #[inline]
    pub(crate) fn request_redraw(&self) {
        self.inner.window.request_redraw();
    }

    fn tick(&mut self, scene: &mut dyn Scene) {
        scene.update(&mut self.inner);

        if !scene.should_exit() {
            self.inner.renderer.tick(scene.world());
        }

        tools::reset_input(&mut self.inner.keys);
    }
}

//====================================================================
