//! The control loop sequencing input, simulation, frame handoff and draws.
//!
//! Per iteration: poll the quit signal, wrap one app update in a frame
//! buffer begin/end pair, draw the latest completed frame if a refresh
//! period has elapsed, then let the stepper sleep out the rest of the tick.
//! The draw cadence follows the display's refresh rate, not the tick rate;
//! the two are independent.

use anyhow::{Context, Result, anyhow, bail};

use crate::core::{App, RenderBackend, Screen};
use crate::frames::{FrameBuffer, FrameSlot, FrameStatus};
use crate::time::{Clock, FixedStepper, NANOS_PER_SEC};

/// Loop policy knobs.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Refresh rate substituted when the display reports 0 (unknown).
    pub fallback_refresh_hz: u32,
    /// Frame buffer slot count.
    pub frame_capacity: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fallback_refresh_hz: 60,
            frame_capacity: FrameBuffer::DEFAULT_CAPACITY,
        }
    }
}

/// Runs the loop until the screen reports a quit or a fatal error occurs.
///
/// Teardown always runs: if the frame buffer is still usable, one final
/// begin/end pair gives the app a teardown frame, and the buffer is
/// destroyed afterwards. Teardown failures are logged and do not change the
/// already-decided outcome.
pub fn run(
    clock: &mut impl Clock,
    screen: &mut impl Screen,
    backend: &mut impl RenderBackend,
    app: &mut impl App,
    config: LoopConfig,
) -> Result<()> {
    let mut buffer =
        FrameBuffer::new(config.frame_capacity).context("failed to create frame buffer")?;

    let outcome = drive(clock, screen, backend, app, &config, &mut buffer);

    if buffer.status() == FrameStatus::Ok {
        if let Err(err) = paired(&mut buffer, |frame| app.on_shutdown(frame)) {
            log::error!("error deinitializing the app: {err:#}");
        }
    }
    if !buffer.destroy() {
        log::error!("error destroying the frame buffer");
    }

    outcome
}

fn drive(
    clock: &mut impl Clock,
    screen: &mut impl Screen,
    backend: &mut impl RenderBackend,
    app: &mut impl App,
    config: &LoopConfig,
    buffer: &mut FrameBuffer,
) -> Result<()> {
    // Setup frame: init-time drawing goes through the same begin/end
    // protocol as steady-state frames.
    paired(buffer, |frame| app.on_init(frame)).context("app initialization failed")?;

    let mut stepper =
        FixedStepper::from_rate(app.tick_rate(), clock).context("invalid tick rate")?;
    let mut last_draw = clock.now();
    let mut skips: u64 = 0;

    while !screen.poll_quit() {
        paired(buffer, |frame| app.on_update(frame))?;

        let reported = screen.refresh_rate().context("refresh rate query failed")?;
        let refresh_hz = if reported == 0 { config.fallback_refresh_hz } else { reported };
        let draw_period = NANOS_PER_SEC / u64::from(refresh_hz.max(1));

        let now = clock.now();
        if now >= last_draw.saturating_add_nanos(draw_period) {
            if buffer.draw_latest(backend) == FrameStatus::Error {
                bail!("frame submission failed");
            }
            // Advance by a full period from now rather than resetting to
            // now, so draw cost does not drift the cadence.
            last_draw = now.saturating_add_nanos(draw_period);
        }

        if !stepper.step(clock) {
            skips += 1;
            log::warn!("skips == {skips}");
        }
    }

    Ok(())
}

/// Wraps `record` in a begin/end pair.
///
/// The pair always completes, even when recording fails, so the buffer
/// stays usable for the teardown frame.
fn paired(
    buffer: &mut FrameBuffer,
    record: impl FnOnce(&mut FrameSlot) -> Result<()>,
) -> Result<()> {
    if buffer.begin() == FrameStatus::Error {
        bail!("frame buffer rejected begin");
    }
    let recorded = match buffer.frame_mut() {
        Some(frame) => record(frame),
        None => Err(anyhow!("no writable slot after begin")),
    };
    let ended = buffer.end();
    match (recorded, ended) {
        (Err(err), _) => Err(err),
        (Ok(()), FrameStatus::Error) => Err(anyhow!("frame buffer rejected end")),
        (Ok(()), FrameStatus::Ok) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::ensure;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::time::ManualClock;

    const TICK_RATE: u64 = 300;
    const TICK_PERIOD: u64 = NANOS_PER_SEC / TICK_RATE;

    struct ScriptedScreen {
        refresh_hz: u32,
        fail_refresh: bool,
        quit_after: u64,
        polls: u64,
    }

    impl ScriptedScreen {
        fn quitting_after(iterations: u64) -> Self {
            Self {
                refresh_hz: 60,
                fail_refresh: false,
                quit_after: iterations,
                polls: 0,
            }
        }
    }

    impl Screen for ScriptedScreen {
        fn poll_quit(&mut self) -> bool {
            self.polls += 1;
            self.polls > self.quit_after
        }

        fn refresh_rate(&mut self) -> Result<u32> {
            ensure!(!self.fail_refresh, "display mode query failed");
            Ok(self.refresh_hz)
        }
    }

    #[derive(Default)]
    struct CountingBackend {
        submits: u64,
    }

    impl RenderBackend for CountingBackend {
        fn submit(&mut self, _frame: &FrameSlot) -> Result<()> {
            self.submits += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct ProbeApp {
        inits: u32,
        updates: u64,
        shutdowns: u32,
        fail_init: bool,
        fail_update_at: Option<u64>,
    }

    impl App for ProbeApp {
        fn tick_rate(&self) -> u64 {
            TICK_RATE
        }

        fn on_init(&mut self, _frame: &mut FrameSlot) -> Result<()> {
            self.inits += 1;
            ensure!(!self.fail_init, "init refused");
            Ok(())
        }

        fn on_update(&mut self, frame: &mut FrameSlot) -> Result<()> {
            self.updates += 1;
            if self.fail_update_at == Some(self.updates) {
                bail!("update {} refused", self.updates);
            }
            frame
                .commands
                .push_text(format!("tick {}", self.updates), 14.0, Color::WHITE, Vec2::ZERO);
            Ok(())
        }

        fn on_shutdown(&mut self, _frame: &mut FrameSlot) -> Result<()> {
            self.shutdowns += 1;
            Ok(())
        }
    }

    fn harness(quit_after: u64) -> (ManualClock, ScriptedScreen, CountingBackend, ProbeApp) {
        (
            ManualClock::new(),
            ScriptedScreen::quitting_after(quit_after),
            CountingBackend::default(),
            ProbeApp::default(),
        )
    }

    // ── clean runs ────────────────────────────────────────────────────────

    #[test]
    fn quit_signal_stops_the_loop_cleanly() {
        let (mut clock, mut screen, mut backend, mut app) = harness(10);

        let result = run(&mut clock, &mut screen, &mut backend, &mut app, LoopConfig::default());

        assert!(result.is_ok());
        assert_eq!(app.inits, 1);
        assert_eq!(app.updates, 10);
        assert_eq!(app.shutdowns, 1);
    }

    #[test]
    fn draw_cadence_follows_refresh_not_tick_rate() {
        // One simulated second: 300 ticks at 300 Hz against a 60 Hz screen.
        let (mut clock, mut screen, mut backend, mut app) = harness(300);

        let result = run(&mut clock, &mut screen, &mut backend, &mut app, LoopConfig::default());

        assert!(result.is_ok());
        assert_eq!(app.updates, 300);
        // Draws are throttled to the refresh period; with the last-draw
        // timestamp advanced a full period past "now", consecutive draws end
        // up at least two refresh periods apart.
        assert!(backend.submits >= 20, "submits == {}", backend.submits);
        assert!(backend.submits <= 31, "submits == {}", backend.submits);
    }

    #[test]
    fn unknown_refresh_rate_uses_the_fallback() {
        let (mut clock, mut screen, mut backend, mut app) = harness(300);
        screen.refresh_hz = 0;

        let result = run(&mut clock, &mut screen, &mut backend, &mut app, LoopConfig::default());

        assert!(result.is_ok());
        // Same cadence as an explicit 60 Hz screen: the fallback substitutes
        // the unknown rate instead of crashing or spinning.
        assert!(backend.submits >= 20, "submits == {}", backend.submits);
        assert!(backend.submits <= 31, "submits == {}", backend.submits);
    }

    #[test]
    fn skipped_ticks_are_not_fatal() {
        let (mut clock, mut screen, mut backend, mut app) = harness(20);
        // Every sleep wakes two periods late, forcing steady skips.
        clock.set_sleep_overshoot(TICK_PERIOD * 2);

        let result = run(&mut clock, &mut screen, &mut backend, &mut app, LoopConfig::default());

        assert!(result.is_ok());
        assert_eq!(app.updates, 20);
        assert_eq!(app.shutdowns, 1);
    }

    // ── fatal paths ───────────────────────────────────────────────────────

    #[test]
    fn init_failure_stops_before_any_update() {
        let (mut clock, mut screen, mut backend, mut app) = harness(100);
        app.fail_init = true;

        let result = run(&mut clock, &mut screen, &mut backend, &mut app, LoopConfig::default());

        assert!(result.is_err());
        assert_eq!(app.updates, 0);
        // The setup pair completed, so the buffer was still usable for the
        // teardown frame.
        assert_eq!(app.shutdowns, 1);
    }

    #[test]
    fn update_failure_runs_exactly_one_deinit_pair() {
        let (mut clock, mut screen, mut backend, mut app) = harness(u64::MAX);
        app.fail_update_at = Some(5);

        let result = run(&mut clock, &mut screen, &mut backend, &mut app, LoopConfig::default());

        assert!(result.is_err());
        assert_eq!(app.updates, 5);
        assert_eq!(app.shutdowns, 1);
    }

    #[test]
    fn refresh_query_failure_is_fatal() {
        let (mut clock, mut screen, mut backend, mut app) = harness(100);
        screen.fail_refresh = true;

        let result = run(&mut clock, &mut screen, &mut backend, &mut app, LoopConfig::default());

        assert!(result.is_err());
        assert_eq!(app.updates, 1);
        assert_eq!(app.shutdowns, 1);
    }

    #[test]
    fn zero_tick_rate_is_a_setup_error() {
        struct ZeroRate;
        impl App for ZeroRate {
            fn tick_rate(&self) -> u64 {
                0
            }
            fn on_update(&mut self, _frame: &mut FrameSlot) -> Result<()> {
                Ok(())
            }
        }

        let mut clock = ManualClock::new();
        let mut screen = ScriptedScreen::quitting_after(100);
        let mut backend = CountingBackend::default();
        let mut app = ZeroRate;

        let result = run(&mut clock, &mut screen, &mut backend, &mut app, LoopConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn backend_failure_is_fatal_and_skips_teardown_frame() {
        struct RefusingBackend;
        impl RenderBackend for RefusingBackend {
            fn submit(&mut self, _frame: &FrameSlot) -> Result<()> {
                bail!("device lost");
            }
        }

        let mut clock = ManualClock::new();
        let mut screen = ScriptedScreen::quitting_after(300);
        let mut backend = RefusingBackend;
        let mut app = ProbeApp::default();

        let result = run(&mut clock, &mut screen, &mut backend, &mut app, LoopConfig::default());

        assert!(result.is_err());
        // The buffer is poisoned by the failed submission, so no teardown
        // frame is attempted on it.
        assert_eq!(app.shutdowns, 0);
    }
}
