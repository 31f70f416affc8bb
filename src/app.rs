//! Poll loop - one input read and one engine step per iteration.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::POLL_INTERVAL_MS;
use crate::system::SystemActions;
use crate::ui::buttons::InputSource;
use crate::ui::display::Renderer;
use crate::ui::engine::{EngineConfig, Io, NavigationEngine, Tick};
use crate::ui::{Button, ButtonEvent};

/// The running appliance: buttons in, engine in the middle, host and
/// panel out.
pub struct App<I, S, R, D> {
    input: I,
    io: Io<S, R, D>,
    engine: NavigationEngine,
    /// SELECT was handled and has not been released since.
    select_latched: bool,
}

impl<I, S, R, D> App<I, S, R, D>
where
    I: InputSource,
    S: SystemActions,
    R: Renderer,
    D: DelayNs,
{
    pub fn new(input: I, io: Io<S, R, D>, config: EngineConfig) -> Self {
        Self {
            input,
            io,
            engine: NavigationEngine::new(config),
            select_latched: false,
        }
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    pub fn io(&self) -> &Io<S, R, D> {
        &self.io
    }

    /// Draw the initial menu.
    pub fn start(&mut self) {
        self.engine.start(&mut self.io);
    }

    /// Poll the buttons once and feed the result to the engine.
    ///
    /// Handled presses already waited out the settle delay inside the
    /// engine; otherwise sleep for one poll interval. SELECT fires once
    /// per press: it must be released before it is seen again.
    pub fn step(&mut self) -> Tick {
        let mut event = self.input.poll();
        if self.select_latched {
            if event == ButtonEvent::Select {
                event = ButtonEvent::None;
            } else if !self.input.is_pressed(Button::Select) {
                self.select_latched = false;
            }
        }

        let tick = self.engine.handle(event, &mut self.io);
        if tick == Tick::Selected {
            self.select_latched = true;
        }
        if matches!(tick, Tick::Idle | Tick::Ignored) {
            self.io.delay.delay_ms(POLL_INTERVAL_MS);
        }
        tick
    }

    /// Start, then step until `stop` is raised.
    pub fn run(&mut self, stop: &AtomicBool) {
        self.start();
        while !stop.load(Ordering::Relaxed) {
            self.step();
        }
        info!("UI: stop requested at {:?}", self.engine.state());
    }
}
