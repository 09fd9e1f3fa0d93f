use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use ab_glyph::FontVec;
use anyhow::{Result, anyhow};
use avtask_core::{Anchor, InputEvent, InputSource, Key, Surface};
use avtask_render::SkiaSurface;
use pixels::{Pixels, SurfaceTexture};
use tiny_skia::Pixmap;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Fullscreen, Window, WindowId},
};

/// How long one blocking wait hands control to the event loop.
const POLL_INTERVAL: Duration = Duration::from_millis(4);

/// Collects window events between pumps.
#[derive(Default)]
struct EventQueue {
    window: Option<Arc<Window>>,
    error: Option<anyhow::Error>,
    events: VecDeque<InputEvent>,
    resized: Option<PhysicalSize<u32>>,
    redraw: bool,
}

impl EventQueue {
    /// Forgets queued key presses but keeps quit requests.
    fn drop_keys(&mut self) {
        self.events.retain(|event| matches!(event, InputEvent::Quit));
    }
}

impl ApplicationHandler for EventQueue {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match create_window(event_loop) {
                Ok(window) => self.window = Some(window),
                Err(e) => {
                    eprintln!("Failed to create window: {e}");
                    self.error = Some(e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.events.push_back(InputEvent::Quit),
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() && !event.repeat => {
                self.events.push_back(map_key(event.physical_key));
            }
            WindowEvent::Resized(size) => self.resized = Some(size),
            WindowEvent::RedrawRequested => self.redraw = true,
            _ => {}
        }
    }
}

fn create_window(event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
    let primary_monitor = event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next())
        .ok_or_else(|| anyhow!("No monitor available"))?;
    let refresh_rate = primary_monitor
        .refresh_rate_millihertz()
        .map(|rate| rate as f64 / 1000.0);

    let window_attributes = Window::default_attributes()
        .with_title("Audio-Visual Matching")
        .with_fullscreen(Some(Fullscreen::Borderless(Some(primary_monitor))))
        .with_resizable(false);
    let window = Arc::new(event_loop.create_window(window_attributes)?);

    let physical_size = window.inner_size();
    println!("Display Configuration:");
    println!("  Physical size: {}×{}", physical_size.width, physical_size.height);
    println!("  Scale factor: {:.2}", window.scale_factor());
    if let Some(refresh_rate) = refresh_rate {
        println!("  Refresh rate: {:.1} Hz", refresh_rate);
    }

    window.set_cursor_visible(false);
    Ok(window)
}

/// Translates a physical key into the experiment's key vocabulary.
/// Escape is a quit request.
pub fn map_key(key: PhysicalKey) -> InputEvent {
    let PhysicalKey::Code(code) = key else {
        return InputEvent::Key(Key::Other);
    };
    let key = match code {
        KeyCode::Escape => return InputEvent::Quit,
        KeyCode::Space => Key::Space,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::Digit1 | KeyCode::Numpad1 => Key::Digit(1),
        KeyCode::Digit2 | KeyCode::Numpad2 => Key::Digit(2),
        KeyCode::Digit3 | KeyCode::Numpad3 => Key::Digit(3),
        KeyCode::Digit4 | KeyCode::Numpad4 => Key::Digit(4),
        _ => Key::Other,
    };
    InputEvent::Key(key)
}

/// Fullscreen window that owns the event loop, the pixel buffer and the
/// software canvas everything is drawn on.
pub struct WindowFrontend {
    event_loop: EventLoop<()>,
    queue: EventQueue,
    window: Arc<Window>,
    pixels: Pixels<'static>,
    canvas: SkiaSurface,
}

impl WindowFrontend {
    /// Opens the window and pumps the event loop until it exists.
    pub fn open(font: FontVec) -> Result<Self> {
        let mut event_loop = EventLoop::new()?;
        let mut queue = EventQueue::default();
        let window = loop {
            let status = event_loop.pump_app_events(Some(POLL_INTERVAL), &mut queue);
            if let Some(err) = queue.error.take() {
                return Err(err);
            }
            if let PumpStatus::Exit(code) = status {
                return Err(anyhow!("event loop exited with status {code} before the window opened"));
            }
            if let Some(window) = queue.window.clone() {
                break window;
            }
        };

        let size = window.inner_size();
        let texture = SurfaceTexture::new(size.width, size.height, window.clone());
        let pixels = Pixels::new(size.width, size.height, texture)?;
        let canvas = SkiaSurface::new(size.width, size.height)?.with_font(font);
        window.request_redraw();

        Ok(Self {
            event_loop,
            queue,
            window,
            pixels,
            canvas,
        })
    }

    /// Splits the frontend into the drawing half and the input half. Both
    /// share the one window.
    pub fn split(self) -> (WindowSurface, WindowInput) {
        let shared = Rc::new(RefCell::new(self));
        (WindowSurface(shared.clone()), WindowInput(shared))
    }

    fn pump(&mut self, timeout: Option<Duration>) -> Result<()> {
        let status = self.event_loop.pump_app_events(timeout, &mut self.queue);
        if let PumpStatus::Exit(_) = status {
            self.queue.events.push_back(InputEvent::Quit);
        }
        if let Some(size) = self.queue.resized.take() {
            self.handle_resize(size)?;
        }
        if std::mem::take(&mut self.queue.redraw) {
            self.blit()?;
        }
        Ok(())
    }

    // The canvas keeps its initial size; pixels scales it onto the new
    // surface so a resize never discards what is on screen.
    fn handle_resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(size.width, size.height)?;
        println!("Display resized to: {}×{}", size.width, size.height);
        self.window.request_redraw();
        Ok(())
    }

    fn blit(&mut self) -> Result<()> {
        self.pixels.frame_mut().copy_from_slice(self.canvas.frame());
        self.pixels.render()?;
        Ok(())
    }

    fn next_event(&mut self) -> Result<InputEvent> {
        loop {
            if let Some(event) = self.queue.events.pop_front() {
                return Ok(event);
            }
            self.pump(Some(POLL_INTERVAL))?;
        }
    }

    fn discard_pending(&mut self) {
        if let Err(e) = self.pump(Some(Duration::ZERO)) {
            eprintln!("Failed to pump window events: {e}");
        }
        self.queue.drop_keys();
    }
}

/// Drawing half of a [`WindowFrontend`].
pub struct WindowSurface(Rc<RefCell<WindowFrontend>>);

impl Surface for WindowSurface {
    type Image = Pixmap;

    fn size(&self) -> (u32, u32) {
        self.0.borrow().canvas.size()
    }

    fn load_image(&mut self, path: &Path, size: (u32, u32)) -> Result<Pixmap> {
        self.0.borrow_mut().canvas.load_image(path, size)
    }

    fn clear(&mut self) {
        self.0.borrow_mut().canvas.clear();
    }

    fn blit_image(&mut self, image: &Pixmap, pos: (f32, f32), anchor: Anchor) {
        self.0.borrow_mut().canvas.blit_image(image, pos, anchor);
    }

    fn blit_text(&mut self, text: &str, size_px: f32, color: [u8; 4], pos: (f32, f32), anchor: Anchor) {
        self.0
            .borrow_mut()
            .canvas
            .blit_text(text, size_px, color, pos, anchor);
    }

    fn present(&mut self) -> Result<()> {
        let mut frontend = self.0.borrow_mut();
        frontend.canvas.present()?;
        frontend.blit()?;
        frontend.pump(Some(Duration::ZERO))
    }
}

/// Input half of a [`WindowFrontend`].
pub struct WindowInput(Rc<RefCell<WindowFrontend>>);

impl InputSource for WindowInput {
    fn next_event(&mut self) -> Result<InputEvent> {
        self.0.borrow_mut().next_event()
    }

    fn discard_pending(&mut self) {
        self.0.borrow_mut().discard_pending();
    }
}

impl Drop for WindowFrontend {
    fn drop(&mut self) {
        self.window.set_cursor_visible(true);
        println!("Window resources cleaned up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn digits_map_from_both_rows() {
        for (main, pad, n) in [
            (KeyCode::Digit1, KeyCode::Numpad1, 1),
            (KeyCode::Digit4, KeyCode::Numpad4, 4),
        ] {
            assert_eq!(map_key(PhysicalKey::Code(main)), InputEvent::Key(Key::Digit(n)));
            assert_eq!(map_key(PhysicalKey::Code(pad)), InputEvent::Key(Key::Digit(n)));
        }
    }

    #[test]
    fn dropping_keys_keeps_quit_requests() {
        let mut queue = EventQueue::default();
        queue.events.extend([
            InputEvent::Key(Key::Digit(2)),
            InputEvent::Quit,
            InputEvent::Key(Key::Space),
        ]);
        queue.drop_keys();
        assert_eq!(queue.events, VecDeque::from([InputEvent::Quit]));

        queue.events.push_back(InputEvent::Key(Key::Left));
        queue.drop_keys();
        queue.drop_keys();
        assert_eq!(queue.events.len(), 1);
    }

    #[test]
    fn escape_quits() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)), InputEvent::Quit);
    }

    #[test]
    fn other_keys_are_not_dropped() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), InputEvent::Key(Key::Other));
        assert_eq!(
            map_key(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)),
            InputEvent::Key(Key::Other)
        );
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowUp)), InputEvent::Key(Key::Up));
    }
}
