//! Headless demo: a 300 Hz tick counter drawn through the frame buffer.
//!
//! Stands in for a windowed client: the screen stub reports a fixed 60 Hz
//! refresh rate and turns ctrl-c into the quit signal, and the backend
//! "draws" by logging a summary of the submitted frame once a second.

use std::f32::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use cadence_engine::coords::Vec2;
use cadence_engine::core::{App, RenderBackend, Screen};
use cadence_engine::frames::FrameSlot;
use cadence_engine::logging::{LoggingConfig, init_logging};
use cadence_engine::paint::Color;
use cadence_engine::runner::{self, LoopConfig};
use cadence_engine::scene::DrawCmd;
use cadence_engine::time::{Clock, ClockSample, NANOS_PER_SEC, SystemClock};

const TICK_RATE: u64 = 300;
const REFRESH_HZ: u32 = 60;

const BODY_TEXT: &str = "\
Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor
incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis
nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";

/// Quit flag raised from the ctrl-c handler.
#[derive(Clone)]
struct QuitFlag(Arc<AtomicBool>);

impl QuitFlag {
    fn install() -> Result<Self> {
        let flag = Arc::new(AtomicBool::new(false));
        let handler = Arc::clone(&flag);
        ctrlc::set_handler(move || handler.store(true, Ordering::Relaxed))?;
        Ok(Self(flag))
    }

    fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Display stub with a fixed refresh rate.
struct ConsoleScreen {
    quit: QuitFlag,
    refresh_hz: u32,
}

impl Screen for ConsoleScreen {
    fn poll_quit(&mut self) -> bool {
        self.quit.is_raised()
    }

    fn refresh_rate(&mut self) -> Result<u32> {
        Ok(self.refresh_hz)
    }
}

/// Render stub: logs one submitted frame per refresh-rate's worth of draws.
#[derive(Default)]
struct ConsoleBackend {
    submits: u64,
}

impl RenderBackend for ConsoleBackend {
    fn submit(&mut self, frame: &FrameSlot) -> Result<()> {
        self.submits += 1;
        if self.submits % u64::from(REFRESH_HZ) != 1 {
            return Ok(());
        }

        let headline = frame.commands.items().iter().find_map(|cmd| match cmd {
            DrawCmd::Text(text) => text.text.lines().next(),
            _ => None,
        });
        log::info!(
            "draw #{}: clear {:.2}, {}",
            self.submits,
            frame.clear_color.r,
            headline.unwrap_or("<empty frame>"),
        );
        Ok(())
    }
}

/// The simulated game: counts ticks and keeps a rolling tick-rate average.
struct TickCounter {
    clock: SystemClock,
    ticks: u64,
    last_tick: ClockSample,
    reset_average: bool,
    average_ticks: u64,
    average_duration: u64,
}

impl TickCounter {
    fn new() -> Self {
        let mut clock = SystemClock::new();
        let last_tick = clock.now();
        Self {
            clock,
            ticks: 0,
            last_tick,
            // Discard the warm-up interval from the average.
            reset_average: true,
            average_ticks: 0,
            average_duration: 0,
        }
    }

    /// Clear level pulses through one sine arc per second of ticks.
    fn clear_level(&self) -> u8 {
        let phase = (self.ticks % TICK_RATE) as f32 / TICK_RATE as f32;
        (((PI * phase).sin() * 0.25 + 0.25) * 255.0) as u8
    }
}

impl App for TickCounter {
    fn tick_rate(&self) -> u64 {
        TICK_RATE
    }

    fn on_init(&mut self, frame: &mut FrameSlot) -> Result<()> {
        frame
            .commands
            .push_text("Loading...", 16.0, Color::WHITE, Vec2::new(8.0, 8.0));
        Ok(())
    }

    fn on_update(&mut self, frame: &mut FrameSlot) -> Result<()> {
        let now = self.clock.now();
        let dt = now.duration_since(self.last_tick).unwrap_or(0);
        let current_rate = if dt > 0 {
            NANOS_PER_SEC as f64 / dt as f64
        } else {
            0.0
        };

        if !self.reset_average {
            self.average_ticks += 1;
            self.average_duration += dt;
        }
        self.last_tick = now;
        self.ticks += 1;

        frame.clear_color = Color::gray(self.clear_level());

        let average = if self.average_duration > 0 {
            format!(
                "{:.9}",
                self.average_ticks as f64 / (self.average_duration as f64 / NANOS_PER_SEC as f64)
            )
        } else {
            "N/A".to_string()
        };
        frame.commands.push_text(
            format!(
                "Ticks: {}\n\nCurrent tick rate: {current_rate:.9}\n\n\
                 Average tick rate: {average}\n\nTest text:\n{BODY_TEXT}",
                self.ticks
            ),
            16.0,
            Color::WHITE,
            Vec2::new(8.0, 8.0),
        );

        if self.reset_average {
            self.reset_average = false;
            self.average_ticks = 0;
            self.average_duration = 0;
        }
        Ok(())
    }

    fn on_shutdown(&mut self, frame: &mut FrameSlot) -> Result<()> {
        frame
            .commands
            .push_text("Goodbye", 16.0, Color::WHITE, Vec2::new(8.0, 8.0));
        log::info!("counted {} ticks", self.ticks);
        Ok(())
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut clock = SystemClock::new();
    let mut screen = ConsoleScreen {
        quit: QuitFlag::install()?,
        refresh_hz: REFRESH_HZ,
    };
    let mut backend = ConsoleBackend::default();
    let mut app = TickCounter::new();

    log::info!("cadence demo: {TICK_RATE} Hz ticks against a {REFRESH_HZ} Hz screen, ctrl-c to quit");
    runner::run(&mut clock, &mut screen, &mut backend, &mut app, LoopConfig::default())
}
