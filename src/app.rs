use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowAttributes},
};

use crate::gfx::camera::ViewController;
use crate::gfx::rendering::RenderEngine;
use crate::scene::SceneComposer;

const WINDOW_WIDTH: u32 = 1000;
const WINDOW_HEIGHT: u32 = 800;
const WINDOW_TITLE: &str = "Nursery Tableau";

pub struct TableauApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    composer: SceneComposer,
    controller: ViewController,
}

impl TableauApp {
    /// Create a new application with the default scene and camera.
    pub fn new() -> Self {
        let _ = env_logger::try_init();
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                composer: SceneComposer::new(),
                controller: ViewController::new(),
            },
        }
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl Default for TableauApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let Ok(window) = event_loop.create_window(attributes) else {
            log::error!("failed to create the application window");
            event_loop.exit();
            return;
        };

        let window_handle = Arc::new(window);

        // Capture the mouse for free-look, like a first person viewer.
        if window_handle
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window_handle.set_cursor_grab(CursorGrabMode::Locked))
            .is_ok()
        {
            window_handle.set_cursor_visible(false);
        } else {
            log::warn!("cursor grab is unavailable, free-look stays active anyway");
        }

        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();
        let window_clone = window_handle.clone();
        let renderer = match pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height).await
        }) {
            Ok(renderer) => renderer,
            Err(error) => {
                log::error!("failed to initialize the render engine: {error:#}");
                event_loop.exit();
                return;
            }
        };

        self.composer.prepare();
        self.composer.textures.bind_all(
            renderer.device(),
            renderer.queue(),
            renderer.texture_layout(),
        );

        self.render_engine = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                self.controller.process_key_event(&event);
                if self.controller.quit_requested() {
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.controller
                    .process_mouse_move(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y_offset = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 120.0,
                };
                self.controller.process_scroll(y_offset);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let dt = self.controller.advance_time();
                self.controller.process_keyboard(dt);
                self.controller
                    .stage_frame_uniforms(&mut self.composer.stage, render_engine.aspect_ratio());

                let draws = self.composer.encode_frame();
                render_engine.render_frame(&self.composer.stage, &draws, &self.composer.textures);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Tear down GPU resources in a controlled order: scene textures
        // first, then the engine's meshes.
        self.composer.teardown();
        if let Some(render_engine) = self.render_engine.as_mut() {
            render_engine.release();
        }
        log::info!("released scene resources");
    }
}
