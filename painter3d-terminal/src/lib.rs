/// Terminal front end for the painter3d pipeline
///
/// Supplies what the core leaves external: frame timing, viewport size,
/// the event loop and a rasterization primitive.
use anyhow::Context as _;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::{info, warn};
use painter3d_core::{Mesh, Pipeline, PipelineConfig, Viewport};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    pipeline: Pipeline,
    renderer: AsciiRenderer,
    running: bool,
    paused: bool,
    last_update: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
    visible: usize,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: PipelineConfig) -> anyhow::Result<Self> {
        let (width, height) = terminal::size().context("failed to query terminal size")?;
        let pipeline = Pipeline::load(mesh, config, Viewport::new(width as u32, height as u32))
            .context("failed to initialise the render pipeline")?;

        let now = Instant::now();
        Ok(Self {
            pipeline,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            paused: false,
            last_update: now,
            last_fps_sample: now,
            frame_count: 0,
            fps: 0.0,
            visible: 0,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result.context("render loop failed")
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Drain input; the exit flag is only checked between frames.
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        info!("render loop stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('p') | KeyCode::Char(' ') => {
                    self.paused = !self.paused;
                }
                _ => {}
            },
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        match self.pipeline.resize(Viewport::new(width as u32, height as u32)) {
            Ok(()) => self.renderer = AsciiRenderer::new(width as usize, height as usize),
            Err(e) => warn!("ignoring resize to {width}x{height}: {e}"),
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_update).as_secs_f32();
        self.last_update = now;

        if !self.paused {
            self.pipeline.update(dt);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let draw_list = self.pipeline.draw();
        self.visible = draw_list.len();

        self.renderer.clear();
        self.renderer.render(&draw_list);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "painter3d | FPS: {:.1} | {} / {} triangles | angle {:.2}{} | P=Pause Q=Quit",
                self.fps,
                self.visible,
                self.pipeline.mesh().len(),
                self.pipeline.angle(),
                if self.paused { " (paused)" } else { "" },
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
