/// Terminal front end: pumps frames from the engine and turns keys into operations
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use polyview_core::{Engine, Frame, FrameDriver, FrameScheduler, KeyMap};
use std::io::{self, stdout, Write};
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::SceneRenderer;

/// Sleeps out the remainder of each frame period
pub struct FramePacer {
    period: Duration,
    last: Option<Instant>,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            last: None,
        }
    }
}

impl FrameScheduler for FramePacer {
    fn wait_for_frame(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.period {
                std::thread::sleep(self.period - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Browser-style name for a key, as used by key maps
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Insert => "Insert",
        KeyCode::Delete => "Delete",
        KeyCode::Enter => "Enter",
        KeyCode::Tab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::F(n) => return Some(format!("F{n}")),
        _ => return None,
    };
    Some(name.to_string())
}

/// Frames per second, measured over roughly one second
struct FpsCounter {
    since: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            since: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed.as_secs() >= 1 {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.since = Instant::now();
        }
    }
}

/// Main application struct for the terminal front end
pub struct TerminalApp {
    engine: Engine,
    keymap: KeyMap,
    renderer: SceneRenderer,
    fps: u32,
}

impl TerminalApp {
    /// `engine` should already be started.
    pub fn new(engine: Engine, keymap: KeyMap, fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            engine,
            keymap,
            renderer: SceneRenderer::new(width as usize, height as usize),
            fps,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let Self {
            engine,
            keymap,
            renderer,
            fps,
        } = self;
        let engine: &Engine = engine;
        let mut driver = FrameDriver::new(FramePacer::new(*fps));
        let mut counter = FpsCounter::new();

        driver.run(engine, |frame| -> io::Result<ControlFlow<()>> {
            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) => {
                        if handle_key(engine, keymap, key).is_break() {
                            return Ok(ControlFlow::Break(()));
                        }
                    }
                    Event::Resize(width, height) => {
                        renderer.resize(width as usize, height as usize);
                    }
                    _ => {}
                }
            }

            counter.tick();
            render(renderer, frame, counter.fps)?;
            Ok(ControlFlow::Continue(()))
        })
    }
}

fn handle_key(engine: &Engine, keymap: &KeyMap, key: KeyEvent) -> ControlFlow<()> {
    if key.kind == KeyEventKind::Release {
        return ControlFlow::Continue(());
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return ControlFlow::Break(()),
        code => {
            let Some(name) = key_name(code) else {
                return ControlFlow::Continue(());
            };
            log::debug!("key {name}");
            if let Some(op) = keymap.lookup(&name) {
                engine.submit_input(op);
            }
        }
    }
    ControlFlow::Continue(())
}

fn render(renderer: &mut SceneRenderer, frame: &Frame, fps: f32) -> io::Result<()> {
    renderer.render(frame);

    let mut stdout = stdout();
    renderer.draw(&mut stdout)?;

    // Draw UI overlay
    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Yellow),
        Print(format!(
            "polyview | FPS: {fps:.1} | Arrows/WASD/keypad=Rotate Q=Quit"
        )),
        ResetColor
    )?;

    stdout.flush()?;
    Ok(())
}
