use std::{
    error::Error,
    num::NonZeroU32,
    path::{Path, PathBuf},
    rc::Rc,
    time::{Duration, Instant},
};

use chip_core::{
    globals::{SCREEN_HEIGHT, SCREEN_WIDTH},
    ChipError, Cpu, QuirkStore, Scheduler,
};
use softbuffer::{Context, SoftBufferError, Surface};
use tracing_subscriber::EnvFilter;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

mod config;
mod keypad;

use config::Config;

const FRAME: Duration = Duration::from_micros(16_667);
const IPS_STEP: u32 = 50;

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load();
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut app = App::new(&config)?;
    tracing::info!(rom = %config.rom.display(), quirks = ?app.cpu.quirks(), "CHIP-8");

    let event_loop = EventLoop::new()?;
    let window = Rc::new(
        WindowBuilder::new()
            .with_title("CHIP-8")
            .with_inner_size(LogicalSize::new(
                (SCREEN_WIDTH as u32 * config.scale) as f64,
                (SCREEN_HEIGHT as u32 * config.scale) as f64,
            ))
            .build(&event_loop)?,
    );
    let context = Context::new(window.clone())?;
    let mut surface = Surface::new(&context, window.clone())?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, repeat, .. },
                ..
            } => {
                if app.handle_key(code, state == ElementState::Pressed, repeat) {
                    window.request_redraw();
                }
            },
            WindowEvent::Resized(_) => window.request_redraw(),
            WindowEvent::RedrawRequested => {
                if let Err(err) = draw_frame(&mut surface, &window, app.cpu.get_display_buffer()) {
                    tracing::error!(%err, "failed to present frame");
                }
            },
            _ => (),
        },
        Event::AboutToWait => {
            app.update();
            if app.cpu.take_redraw() {
                window.request_redraw();
            }
            elwt.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME));
        },
        _ => (),
    })?;
    Ok(())
}

struct App {
    cpu: Cpu,
    scheduler: Scheduler,
    store: QuirkStore,
    rom: PathBuf,
    seed: Option<u64>,
    halted: bool,
    last_update: Instant,
}
impl App {
    fn new(config: &Config) -> Result<Self, ChipError> {
        let store = QuirkStore::new(&config.quirk_store);
        let cpu = boot(&config.rom, &store, config.seed)?;
        Ok(App {
            cpu,
            scheduler: Scheduler::new(config.instructions_per_second),
            store,
            rom: config.rom.clone(),
            seed: config.seed,
            halted: false,
            last_update: Instant::now(),
        })
    }
    fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now - self.last_update;
        self.last_update = now;
        if self.halted { return }
        if let Err(err) = self.scheduler.advance(&mut self.cpu, elapsed) {
            tracing::error!(%err, "program halted, press F4 to restart");
            self.halted = true;
        }
    }
    /// A failed reload keeps the current program running.
    fn restart(&mut self) {
        match boot(&self.rom, &self.store, self.seed) {
            Ok(cpu) => {
                self.cpu = cpu;
                self.halted = false;
                self.last_update = Instant::now();
                tracing::info!(rom = %self.rom.display(), "restarted");
            },
            Err(err) => tracing::error!(%err, "restart failed"),
        }
    }
    /// Returns true if the display needs repainting.
    fn handle_key(&mut self, code: KeyCode, pressed: bool, repeat: bool) -> bool {
        if let Some(key) = keypad::chip_key(code) {
            self.cpu.set_key(key, pressed);
            return false;
        }
        if !pressed || repeat { return false }
        match code {
            KeyCode::F1 => {
                let quirks = self.cpu.quirks_mut();
                quirks.modern_shift = !quirks.modern_shift;
                tracing::info!(quirks = ?self.cpu.quirks(), "toggled modern shift");
            },
            KeyCode::F2 => {
                let quirks = self.cpu.quirks_mut();
                quirks.modern_load_store = !quirks.modern_load_store;
                tracing::info!(quirks = ?self.cpu.quirks(), "toggled modern load/store");
            },
            KeyCode::F3 => {
                let quirks = self.cpu.quirks_mut();
                quirks.super_chip_jump = !quirks.super_chip_jump;
                tracing::info!(quirks = ?self.cpu.quirks(), "toggled super-chip jump");
            },
            KeyCode::F4 => {
                self.restart();
                return true;
            },
            KeyCode::F5 => match self.store.save(&self.rom, self.cpu.quirks()) {
                Ok(()) => tracing::info!(path = %self.store.path().display(), "quirks saved"),
                Err(err) => tracing::error!(%err, "failed to save quirks"),
            },
            KeyCode::F12 => log_debug_snapshot(&self.cpu),
            KeyCode::PageUp | KeyCode::PageDown => {
                let rate = self.scheduler.instructions_per_second();
                let rate = if code == KeyCode::PageUp {
                    rate.saturating_add(IPS_STEP)
                } else {
                    rate.saturating_sub(IPS_STEP)
                };
                self.scheduler.set_instructions_per_second(rate);
                tracing::info!(ips = self.scheduler.instructions_per_second(), "instruction rate");
            },
            _ => (),
        }
        false
    }
}

fn boot(rom: &Path, store: &QuirkStore, seed: Option<u64>) -> Result<Cpu, ChipError> {
    let mut cpu = match seed {
        Some(seed) => Cpu::with_seed(seed),
        None => Cpu::new(),
    };
    cpu.load_program(rom, store)?;
    Ok(cpu)
}

fn log_debug_snapshot(cpu: &Cpu) {
    let registers = cpu
        .registers()
        .iter()
        .enumerate()
        .map(|(i, v)| format!("V{i:X}={v:02X}"))
        .collect::<Vec<_>>()
        .join(" ");
    let pressed = cpu
        .keypad()
        .iter()
        .enumerate()
        .filter(|(_, down)| **down)
        .map(|(i, _)| format!("{i:X}"))
        .collect::<Vec<_>>()
        .join(",");
    tracing::info!(
        pc = %format!("{:#06X}", cpu.pc()),
        opcode = %format!("{:#06X}", cpu.instruction()),
        index = %format!("{:#06X}", cpu.index()),
        delay_timer = cpu.delay_timer(),
        sound_timer = cpu.sound_timer(),
        sound_active = cpu.sound_timer() > 0,
        %registers,
        keys = %pressed,
        "debug snapshot"
    );
}

/// Nearest neighbour scale of the display buffer to the window.
fn draw_frame(
    surface: &mut Surface<Rc<Window>, Rc<Window>>,
    window: &Window,
    pixels: &[u32],
) -> Result<(), SoftBufferError> {
    let size = window.inner_size();
    let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
    else {
        return Ok(());
    };
    surface.resize(width, height)?;
    let (w, h) = (size.width as usize, size.height as usize);
    let mut buffer = surface.buffer_mut()?;
    for dy in 0..h {
        let sy = dy * SCREEN_HEIGHT / h;
        for dx in 0..w {
            let sx = dx * SCREEN_WIDTH / w;
            // softbuffer wants 0RGB
            buffer[dy * w + dx] = pixels[sy * SCREEN_WIDTH + sx] & 0x00FF_FFFF;
        }
    }
    buffer.present()
}
