/// Terminal frontend for the scroll-driven toon scene
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal,
};
use parallax_core::{
    Animator, CameraRig, Clock, Color, GradientMap, Parameter, Renderer, Scene, SceneConfig, Variant,
    Viewport,
};
use std::io::{self, stdout, Stdout, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;

/// Fraction of a page moved by one wheel notch or arrow key
const SCROLL_STEP: f32 = 0.125;

/// Colours cycled through by the inspector keys
const PALETTE: &[&str] = &["#ffeded", "#ff6b6b", "#ffd166", "#06d6a0", "#4cc9f0", "#b5179e"];

/// Decode a gradient file, falling back to the untextured material on error
pub fn load_gradient(path: &Path) -> Option<GradientMap> {
    match std::fs::read(path)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| GradientMap::decode(&bytes).map_err(anyhow::Error::from))
    {
        Ok(map) => {
            log::info!("loaded {}-level gradient from {}", map.width(), path.display());
            Some(map)
        }
        Err(err) => {
            log::warn!(
                "gradient {} unavailable ({}), using untextured toon shading",
                path.display(),
                err
            );
            None
        }
    }
}

/// In-memory log sink.
///
/// stderr shares the terminal with the alternate screen, so log records are
/// held here while the UI runs and written out with [`DeferredLog::take`]
/// once the screen is restored.
#[derive(Debug, Clone, Default)]
pub struct DeferredLog {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl DeferredLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything logged so far
    pub fn take(&self) -> Vec<u8> {
        self.buffer
            .lock()
            .map(|mut buffer| std::mem::take(&mut *buffer))
            .unwrap_or_default()
    }
}

impl Write for DeferredLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log buffer poisoned"))?;
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Viewport of a terminal of `cols x rows` cells
pub fn terminal_viewport(cols: u16, rows: u16) -> Viewport {
    Viewport::new(cols as f32, rows as f32 * CELL_ASPECT, 1.0)
}

/// Wall-clock seconds since the clock was created
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn elapsed_seconds(&self) -> f32 {
        self.origin.elapsed().as_secs_f32()
    }
}

/// Renderer drawing to the terminal's alternate screen
pub struct TerminalSurface {
    renderer: AsciiRenderer,
    out: Stdout,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            renderer: AsciiRenderer::new(cols as usize, rows as usize),
            out: stdout(),
        }
    }
}

impl Renderer for TerminalSurface {
    type Error = io::Error;

    fn resize(&mut self, viewport: &Viewport) -> io::Result<()> {
        let cols = viewport.width.round() as usize;
        let rows = (viewport.height / CELL_ASPECT).round() as usize;
        self.renderer.resize(cols, rows);
        queue!(self.out, terminal::Clear(terminal::ClearType::All))
    }

    fn render(&mut self, scene: &Scene, rig: &CameraRig, _viewport: &Viewport) -> io::Result<()> {
        self.renderer.render_scene(scene, rig);
        queue!(self.out, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut self.out)
    }
}

/// Main application struct for the terminal landing page
pub struct TerminalApp {
    animator: Animator,
    surface: TerminalSurface,
    variant: Variant,
    running: bool,
    clock: InstantClock,
    frame_budget: Duration,
    last_fps: Instant,
    frame_count: u32,
    fps: f32,
    palette_index: [usize; 2],
}

impl TerminalApp {
    pub fn new(
        config: SceneConfig,
        variant: Variant,
        gradient: Option<GradientMap>,
        fps: u32,
    ) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let animator = Animator::new(config, variant, terminal_viewport(cols, rows), gradient);

        Ok(Self {
            animator,
            surface: TerminalSurface::new(cols, rows),
            variant,
            running: true,
            clock: InstantClock::new(),
            frame_budget: Duration::from_millis(1000 / u64::from(fps.max(1))),
            last_fps: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            palette_index: [0, 0],
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.clock = InstantClock::new();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                self.handle_event(event)?;
            }

            let elapsed = self.clock.elapsed_seconds();
            if let Err(err) = self.animator.frame(elapsed, &mut self.surface) {
                log::error!("frame failed: {}", err);
            }
            self.draw_hud()?;

            self.frame_count += 1;
            let spent = frame_start.elapsed();
            if spent < self.frame_budget {
                std::thread::sleep(self.frame_budget - spent);
            }

            let now = Instant::now();
            if (now - self.last_fps).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps).as_secs_f32();
                self.frame_count = 0;
                self.last_fps = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => match kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    self.animator.on_pointer_move(
                        column as f32 + 0.5,
                        (row as f32 + 0.5) * CELL_ASPECT,
                    );
                }
                MouseEventKind::ScrollDown => self.scroll_by(SCROLL_STEP),
                MouseEventKind::ScrollUp => self.scroll_by(-SCROLL_STEP),
                _ => {}
            },
            Event::Resize(cols, rows) => {
                let viewport = terminal_viewport(cols, rows);
                if self
                    .animator
                    .on_resize(viewport.width, viewport.height, viewport.device_pixel_ratio)
                {
                    self.surface.resize(self.animator.viewport())?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(SCROLL_STEP),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-SCROLL_STEP),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(1.0),
            KeyCode::PageUp => self.scroll_by(-1.0),
            KeyCode::Home => self.scroll_to(0.0),
            KeyCode::End => self.scroll_to(self.max_scroll()),
            KeyCode::Char('m') => self.cycle_color(Parameter::MaterialColor),
            KeyCode::Char('p') => self.cycle_color(Parameter::ParticlesColor),
            _ => {}
        }
    }

    /// The page is one viewport tall per section
    fn max_scroll(&self) -> f32 {
        let sections = self.animator.scene().meshes.len().saturating_sub(1);
        sections as f32 * self.animator.viewport().height
    }

    fn scroll_by(&mut self, pages: f32) {
        let current = self.animator.input().scroll.scroll_y;
        self.scroll_to(current + pages * self.animator.viewport().height);
    }

    fn scroll_to(&mut self, scroll_y: f32) {
        let scroll_y = scroll_y.clamp(0.0, self.max_scroll());
        self.animator.on_scroll(scroll_y);
    }

    fn cycle_color(&mut self, parameter: Parameter) {
        let slot = match parameter {
            Parameter::MaterialColor => 0,
            Parameter::ParticlesColor => 1,
        };
        self.palette_index[slot] = (self.palette_index[slot] + 1) % PALETTE.len();
        if let Err(err) = self
            .animator
            .set_parameter_str(parameter.name(), PALETTE[self.palette_index[slot]])
        {
            log::warn!("inspector update rejected: {}", err);
        }
    }

    fn draw_hud(&mut self) -> io::Result<()> {
        let section = self
            .animator
            .current_section()
            .map_or_else(|| "-".to_string(), |s| (s + 1).to_string());
        let material = self
            .animator
            .parameter(Parameter::MaterialColor)
            .unwrap_or(Color::WHITE);

        let mut out = stdout();
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(TermColor::Yellow),
            Print(format!(
                "Parallax [{}] | section {} | material {} | FPS: {:.1} | Wheel/jk=Scroll M/P=Colour Q=Quit",
                self.variant, section, material, self.fps
            )),
            ResetColor
        )?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_viewport_accounts_for_cell_shape() {
        let viewport = terminal_viewport(80, 24);
        assert_eq!(viewport.width, 80.0);
        assert_eq!(viewport.height, 48.0);
        assert!((viewport.aspect().unwrap() - 80.0 / 48.0).abs() < 1e-6);
    }

    #[test]
    fn test_instant_clock_is_monotonic() {
        let clock = InstantClock::new();
        let first = clock.elapsed_seconds();
        assert!(first >= 0.0);
        assert!(clock.elapsed_seconds() >= first);
    }

    #[test]
    fn test_deferred_log_drains_once() {
        let log = DeferredLog::new();
        let mut sink = log.clone();
        writeln!(sink, "frame failed: broken pipe").unwrap();
        assert_eq!(log.take(), b"frame failed: broken pipe\n");
        assert!(log.take().is_empty());
    }

    #[test]
    fn test_gradient_file_is_loaded() {
        let mut ramp = image::GrayImage::new(4, 1);
        for (x, level) in [0u8, 80, 160, 255].into_iter().enumerate() {
            ramp.put_pixel(x as u32, 0, image::Luma([level]));
        }
        let path = std::env::temp_dir().join(format!("parallax-gradient-{}.png", std::process::id()));
        ramp.save(&path).unwrap();

        let map = load_gradient(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(map.unwrap().texels(), &[0, 80, 160, 255]);
    }

    #[test]
    fn test_missing_gradient_falls_back() {
        assert!(load_gradient(Path::new("/nonexistent/gradient.jpg")).is_none());
    }
}
