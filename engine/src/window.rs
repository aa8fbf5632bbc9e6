//! Headful presenter: a fixed-size window whose pixel buffer is the grid.
//!
//! The pixel buffer persists between frames, so apps only repaint the cells they
//! changed. Closing the canvas ends the event loop.

use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::canvas::{Canvas, Rgba, SurfaceSize, paint_cell};

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub columns: usize,
    pub rows: usize,
    pub cell_size: u32,
    /// When set, `WindowApp::on_timer` fires at this cadence.
    pub tick_interval: Option<Duration>,
}

pub trait WindowApp {
    fn init(&mut self, canvas: &mut dyn Canvas);
    fn on_key(&mut self, key: VirtualKeyCode, canvas: &mut dyn Canvas);
    fn on_timer(&mut self, _canvas: &mut dyn Canvas) {}
}

struct PixelsCanvas<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
    cell_size: u32,
    closed: &'a mut bool,
}

impl Canvas for PixelsCanvas<'_> {
    fn draw_cell(&mut self, x: usize, y: usize, color: Rgba) {
        if *self.closed {
            return;
        }
        paint_cell(self.frame, self.size, self.cell_size, x, y, color);
    }

    fn close(&mut self) {
        *self.closed = true;
    }
}

pub fn run_window<A: WindowApp + 'static>(
    config: WindowConfig,
    mut app: A,
) -> Result<(), Box<dyn Error>> {
    let size = SurfaceSize::for_grid(config.columns, config.rows, config.cell_size);
    if size.is_empty() {
        return Err("cannot open a window for an empty grid".into());
    }

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(PhysicalSize::new(size.width, size.height))
        .with_resizable(false)
        .build(&event_loop)?;

    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
    let cell_size = config.cell_size;
    let mut closed = false;

    app.init(&mut PixelsCanvas {
        frame: pixels.frame_mut(),
        size,
        cell_size,
        closed: &mut closed,
    });
    window.request_redraw();

    let tick_interval = config.tick_interval;
    let mut next_tick = tick_interval.map(|dt| Instant::now() + dt);

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        tracing::error!("resize failed: {err}");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } if !closed => {
                    app.on_key(
                        key,
                        &mut PixelsCanvas {
                            frame: pixels.frame_mut(),
                            size,
                            cell_size,
                            closed: &mut closed,
                        },
                    );
                    window.request_redraw();
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                if let (Some(deadline), Some(dt)) = (next_tick, tick_interval) {
                    let now = Instant::now();
                    if now >= deadline && !closed {
                        app.on_timer(&mut PixelsCanvas {
                            frame: pixels.frame_mut(),
                            size,
                            cell_size,
                            closed: &mut closed,
                        });
                        next_tick = Some(now + dt);
                        window.request_redraw();
                    }
                }
            }
            Event::RedrawRequested(_) => {
                if let Err(err) = pixels.render() {
                    tracing::error!("render failed: {err}");
                    *control_flow = ControlFlow::Exit;
                    return;
                }
            }
            _ => {}
        }

        *control_flow = if closed {
            ControlFlow::Exit
        } else if let Some(deadline) = next_tick {
            ControlFlow::WaitUntil(deadline)
        } else {
            ControlFlow::Wait
        };
    })
}
