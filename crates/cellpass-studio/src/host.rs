use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use cellpass_engine::device::GpuInit;
use cellpass_engine::surface::WindowSurface;
use cellpass_engine::{CellQuad, RenderError};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub title: String,
    pub size: PhysicalSize<u32>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            title: "cellpass".to_string(),
            size: PhysicalSize::new(512, 512),
        }
    }
}

/// Opens one window and renders the cell quad into it once.
pub struct Host;

impl Host {
    pub fn run(config: HostConfig, gpu_init: GpuInit) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState::new(config, gpu_init);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => {
                let stage = err.stage();
                Err(anyhow::Error::new(err).context(format!("cell quad failed at the {stage} stage")))
            }
            None => Ok(()),
        }
    }
}

struct WindowEntry {
    window: Arc<Window>,
    surface: WindowSurface<Arc<Window>>,

    /// Kept alive with the window once the frame is submitted.
    quad: Option<CellQuad>,
}

struct HostState {
    config: HostConfig,
    gpu_init: GpuInit,

    entry: Option<WindowEntry>,
    rendered: bool,
    failure: Option<RenderError>,
}

impl HostState {
    fn new(config: HostConfig, gpu_init: GpuInit) -> Self {
        Self {
            config,
            gpu_init,
            entry: None,
            rendered: false,
            failure: None,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.size)
            .with_resizable(false)
            .with_transparent(true);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let surface = WindowSurface::new(window.clone(), size.width, size.height);
        window.request_redraw();

        self.entry = Some(WindowEntry {
            window,
            surface,
            quad: None,
        });
        Ok(())
    }

    /// Runs every stage against the window surface and submits one frame.
    fn render_first_frame(&mut self) -> std::result::Result<(), RenderError> {
        let Some(entry) = self.entry.as_mut() else {
            return Ok(());
        };

        let quad = pollster::block_on(CellQuad::build(&mut entry.surface, &self.gpu_init))?;

        entry.window.pre_present_notify();
        let report = quad.render(&mut entry.surface)?;
        log::info!(
            "submitted {} draw(s) into {}x{} {:?}",
            report.draws.len(),
            report.target_size.0,
            report.target_size.1,
            report.target_format
        );

        entry.quad = Some(quad);
        Ok(())
    }
}

impl ApplicationHandler for HostState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create window: {e:#}");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // No animation loop; only react to window events.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                // GPU objects go before the surface, the surface before the window.
                if let Some(WindowEntry {
                    window,
                    surface,
                    quad,
                }) = self.entry.take()
                {
                    drop(quad);
                    drop(surface);
                    drop(window);
                }
                event_loop.exit();
            }
            WindowEvent::RedrawRequested if !self.rendered => {
                self.rendered = true;
                if let Err(e) = self.render_first_frame() {
                    log::error!("{} stage failed: {e}", e.stage());
                    self.failure = Some(e);
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}
