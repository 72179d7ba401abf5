//====================================================================

use std::{sync::Arc, time::Duration};

use common::{Color, ImageHandle, Size, Transform};
use hecs::World;
use renderer::{Depth, Renderer, Sprite};
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Icon, WindowAttributes, WindowId},
};

use crate::{scene::Scene, EngineError, State};

//====================================================================

#[inline]
pub(crate) fn to_size(size: PhysicalSize<u32>) -> Size<u32> {
    Size::new(size.width, size.height)
}

//====================================================================

/// Everything needed to build the main window once the event loop runs.
#[derive(Clone, Debug)]
pub struct WindowSettings {
    pub title: String,
    pub size: Size<u32>,
    pub resizable: bool,
    pub visible: bool,
    pub decorations: bool,
    pub centered: bool,
    pub icon: Option<Icon>,
    pub background: Color,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Window".into(),
            size: Size::new(1080, 700),
            resizable: false,
            visible: false,
            decorations: true,
            centered: true,
            icon: None,
            background: Color::WHITE,
        }
    }
}

impl WindowSettings {
    pub fn attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.size.width, self.size.height))
            .with_resizable(self.resizable)
            .with_visible(self.visible)
            .with_decorations(self.decorations)
            .with_window_icon(self.icon.clone())
    }
}

//====================================================================

#[derive(Clone, Debug)]
pub struct Window(pub Arc<winit::window::Window>);

impl Window {
    pub(crate) fn new(
        event_loop: &ActiveEventLoop,
        settings: &WindowSettings,
    ) -> Result<Self, EngineError> {
        let window = Self(Arc::new(event_loop.create_window(settings.attributes())?));

        if settings.centered {
            if let Err(e) = window.centerize(Some(settings.size)) {
                log::warn!("Unable to centre window '{}': {}", settings.title, e);
            }
        }

        Ok(window)
    }

    #[inline]
    pub fn id(&self) -> WindowId {
        self.0.id()
    }

    /// Live inner size, which may differ from the requested one.
    #[inline]
    pub fn size(&self) -> Size<u32> {
        to_size(self.0.inner_size())
    }

    /// Centres the window on its current monitor. Uses the measured window
    /// size unless `size` is given, in which case the window is also resized.
    pub fn centerize(&self, size: Option<Size<u32>>) -> Result<(i32, i32), EngineError> {
        let monitor = self.0.current_monitor().ok_or(EngineError::NoMonitor)?;

        let window_size = match size {
            Some(size) => {
                // None means the resize is applied asynchronously
                let _ = self
                    .0
                    .request_inner_size(PhysicalSize::new(size.width, size.height));
                size
            }
            None => self.size(),
        };

        let (x, y) = common::centered_position(to_size(monitor.size()), window_size);
        let origin = monitor.position();
        let position = (origin.x + x, origin.y + y);

        log::trace!(
            "Centring {} window at {:?} on a {} monitor",
            window_size,
            position,
            to_size(monitor.size())
        );

        self.0
            .set_outer_position(PhysicalPosition::new(position.0, position.1));

        Ok(position)
    }

    #[inline]
    pub fn set_visible(&self, visible: bool) {
        self.0.set_visible(visible);
    }

    /// Shows the window and brings it to the foreground.
    #[inline]
    pub fn raise(&self) {
        self.0.set_visible(true);
        self.0.focus_window();
    }

    #[inline]
    pub fn request_redraw(&self) {
        self.0.request_redraw();
    }
}

//====================================================================

/// Borderless window shown on the same event loop before the main window.
#[derive(Clone, Debug)]
pub struct Splash {
    pub image: ImageHandle,
    pub size: Option<Size<u32>>,
    pub duration: Duration,
    pub background: Color,
}

impl Splash {
    /// Requested size, or the image's own size.
    #[inline]
    pub fn window_size(&self) -> Size<u32> {
        self.size.unwrap_or(self.image.size())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SplashTimer {
    deadline: Instant,
}

impl SplashTimer {
    #[inline]
    pub fn new(start: Instant, duration: Duration) -> Self {
        Self {
            deadline: start + duration,
        }
    }

    #[inline]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    #[inline]
    pub fn is_over(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

struct SplashView {
    window: Window,
    renderer: Renderer,
    world: World,
    timer: SplashTimer,
}

impl SplashView {
    fn new(event_loop: &ActiveEventLoop, splash: Splash) -> Result<Self, EngineError> {
        let size = splash.window_size();
        let timer = SplashTimer::new(Instant::now(), splash.duration);

        let window = Window::new(
            event_loop,
            &WindowSettings {
                title: "Splash".into(),
                size,
                resizable: false,
                visible: true,
                decorations: false,
                centered: true,
                icon: None,
                background: splash.background,
            },
        )?;

        let mut renderer = Renderer::new(window.0.clone(), size)?;
        renderer.set_clear_color(splash.background);

        let mut world = World::new();
        world.spawn((
            Transform::from_translation((size.width as f32 / 2., size.height as f32 / 2., 0.)),
            Sprite::image(splash.image),
            Depth(0),
        ));

        window.request_redraw();

        Ok(Self {
            window,
            renderer,
            world,
            timer,
        })
    }
}

//====================================================================

pub struct Runner<'a> {
    scene: &'a mut dyn Scene,
    settings: WindowSettings,
    splash: Option<Splash>,

    splash_view: Option<SplashView>,
    state: Option<State>,
    error: Option<EngineError>,
}

impl<'a> Runner<'a> {
    /// Blocks running the event loop until the scene asks to exit or the
    /// main window is closed.
    pub fn run(
        scene: &'a mut dyn Scene,
        settings: WindowSettings,
        splash: Option<Splash>,
    ) -> Result<(), EngineError> {
        let event_loop = EventLoop::new()?;

        let mut runner = Self {
            scene,
            settings,
            splash,
            splash_view: None,
            state: None,
            error: None,
        };

        event_loop.run_app(&mut runner)?;

        match runner.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn open_splash(&mut self, event_loop: &ActiveEventLoop, splash: Splash) -> bool {
        match SplashView::new(event_loop, splash) {
            Ok(view) => {
                log::info!("Showing splash screen");
                event_loop.set_control_flow(ControlFlow::WaitUntil(view.timer.deadline()));
                self.splash_view = Some(view);
                true
            }
            Err(e) => {
                log::error!("Unable to show splash screen: {}", e);
                false
            }
        }
    }

    fn close_splash(&mut self, event_loop: &ActiveEventLoop) {
        if self.splash_view.take().is_some() {
            log::debug!("Splash screen dismissed");
            event_loop.set_control_flow(ControlFlow::Wait);
            self.open_main(event_loop);
        }
    }

    fn open_main(&mut self, event_loop: &ActiveEventLoop) {
        match State::new(event_loop, &self.settings) {
            Ok(mut state) => {
                self.scene.resumed(&mut state.inner);
                state.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Unable to create main window: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn check_exit(&mut self, event_loop: &ActiveEventLoop) {
        if self.scene.should_exit() && !event_loop.exiting() {
            log::info!("Scene requested exit");
            // Dropping the state destroys the main window
            self.state = None;
            self.splash_view = None;
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for Runner<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        log::trace!("App Resumed - Creating windows.");

        if self.state.is_some() || self.splash_view.is_some() {
            log::warn!("State already exists.");
            return;
        }

        let splash_shown = match self.splash.take() {
            Some(splash) => self.open_splash(event_loop, splash),
            None => false,
        };

        if !splash_shown {
            self.open_main(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(view) = &mut self.splash_view {
            if view.window.id() == window_id {
                match event {
                    WindowEvent::RedrawRequested => view.renderer.tick(&view.world),
                    WindowEvent::CloseRequested => self.close_splash(event_loop),
                    _ => {}
                }
                return;
            }
        }

        if let Some(state) = &mut self.state {
            state.window_event(&mut *self.scene, event_loop, event);
        }

        self.check_exit(event_loop);
    }

    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            let splash_over = self
                .splash_view
                .as_ref()
                .is_some_and(|view| view.timer.is_over(Instant::now()));

            if splash_over {
                self.close_splash(event_loop);
            }

            if let Some(state) = &self.state {
                state.request_redraw();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.check_exit(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Event loop exiting");
        self.scene.exiting();
        self.state = None;
        self.splash_view = None;
    }
}

//====================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn splash(size: Option<Size<u32>>) -> Splash {
        Splash {
            image: ImageHandle::new(image::RgbaImage::new(320, 200)),
            size,
            duration: Duration::from_secs(3),
            background: Color::WHITE,
        }
    }

    #[test]
    fn test_splash_timer_deadline() {
        let start = Instant::now();
        let timer = SplashTimer::new(start, Duration::from_millis(1500));

        assert_eq!(timer.deadline(), start + Duration::from_millis(1500));
        assert!(!timer.is_over(start));
        assert!(!timer.is_over(start + Duration::from_millis(1499)));
        assert!(timer.is_over(start + Duration::from_millis(1500)));
        assert!(timer.is_over(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_splash_timer_zero_duration_is_over_at_once() {
        let start = Instant::now();
        assert!(SplashTimer::new(start, Duration::ZERO).is_over(start));
    }

    #[test]
    fn test_splash_window_size() {
        assert_eq!(splash(None).window_size(), Size::new(320, 200));
        assert_eq!(
            splash(Some(Size::new(640, 480))).window_size(),
            Size::new(640, 480)
        );
    }
}

//====================================================================
