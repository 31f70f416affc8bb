//! Navigation engine - the menu state machine.
//!
//! One [`NavigationEngine::handle`] call per poll. The engine owns the
//! [`SelectionState`] and the menu catalog; everything it touches outside
//! itself goes through an [`Io`] bundle, so host effects, drawing and
//! delays can be substituted in tests.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::{CONFIRMATION_HOLD_MS, SETTLE_DELAY_MS};
use crate::error::{EffectError, RenderError};
use crate::system::SystemActions;
use crate::ui::dispatch::{Action, DispatchTable, Effect};
use crate::ui::display::{MenuFrame, Renderer};
use crate::ui::input_logic::{clamp_selection, select_next, select_prev};
use crate::ui::menu::MenuCatalog;
use crate::ui::{ButtonEvent, MenuId};

pub const TEMPLATE_APPLIED: &str = "Web Selected";
pub const TEMPLATE_FAILED: &str = "Template failed";
pub const RESTARTING: &str = "Restarting...";
pub const SHUTTING_DOWN: &str = "Shutting down...";

/// Delays applied by the engine, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Pause after every handled press. Presses during it are not seen.
    pub settle_ms: u32,
    /// How long a web template confirmation stays on screen.
    pub confirmation_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_ms: SETTLE_DELAY_MS,
            confirmation_ms: CONFIRMATION_HOLD_MS,
        }
    }
}

/// Current menu and highlighted row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionState {
    pub menu: MenuId,
    pub index: usize,
}

impl SelectionState {
    pub const fn initial() -> Self {
        Self {
            menu: MenuId::Main,
            index: 0,
        }
    }
}

/// Collaborators the engine drives.
pub struct Io<S, R, D> {
    pub system: S,
    pub renderer: R,
    pub delay: D,
}

/// What one call to [`NavigationEngine::handle`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// No button was pressed.
    Idle,
    /// A press that has no meaning in the current menu.
    Ignored,
    /// The highlight moved.
    Moved,
    /// SELECT was handled.
    Selected,
}

pub struct NavigationEngine {
    state: SelectionState,
    catalog: MenuCatalog,
    table: DispatchTable,
    config: EngineConfig,
    header_ip: Option<String>,
}

impl NavigationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: SelectionState::initial(),
            catalog: MenuCatalog::new(),
            table: DispatchTable::default(),
            config,
            header_ip: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn header_ip(&self) -> Option<&str> {
        self.header_ip.as_deref()
    }

    /// Rows in the current menu.
    pub fn item_count(&self) -> usize {
        self.catalog.item_count(self.state.menu)
    }

    /// Draw the main menu with the first row highlighted.
    pub fn start<S, R, D>(&mut self, io: &mut Io<S, R, D>)
    where
        S: SystemActions,
        R: Renderer,
        D: DelayNs,
    {
        info!("UI: starting at {}", MenuId::Main);
        self.enter(MenuId::Main, 0, io);
    }

    /// Re-enter `state.menu`, clamping `state.index` into the rebuilt list.
    pub fn resume<S, R, D>(&mut self, state: SelectionState, io: &mut Io<S, R, D>)
    where
        S: SystemActions,
        R: Renderer,
        D: DelayNs,
    {
        self.enter(state.menu, state.index, io);
    }

    pub fn handle<S, R, D>(&mut self, event: ButtonEvent, io: &mut Io<S, R, D>) -> Tick
    where
        S: SystemActions,
        R: Renderer,
        D: DelayNs,
    {
        match event {
            ButtonEvent::None => Tick::Idle,
            ButtonEvent::Up | ButtonEvent::Down if self.state.menu == MenuId::NetworkInfo => {
                Tick::Ignored
            }
            ButtonEvent::Up | ButtonEvent::Down => {
                let n = self.item_count();
                self.state.index = if event == ButtonEvent::Up {
                    select_prev(self.state.index, n)
                } else {
                    select_next(self.state.index, n)
                };
                debug!("UI: {} row {}/{}", self.state.menu, self.state.index, n);
                self.redraw(io);
                io.delay.delay_ms(self.config.settle_ms);
                Tick::Moved
            }
            ButtonEvent::Select => {
                self.select(io);
                io.delay.delay_ms(self.config.settle_ms);
                Tick::Selected
            }
        }
    }

    fn select<S, R, D>(&mut self, io: &mut Io<S, R, D>)
    where
        S: SystemActions,
        R: Renderer,
        D: DelayNs,
    {
        let SelectionState { menu, index } = self.state;
        let Some(action) = self.table.lookup(menu, index, self.item_count()) else {
            warn!("UI: no action for {menu} row {index}");
            return;
        };
        debug!("UI: {menu} row {index} -> {action:?}");

        match action {
            Action::Navigate(target) => self.navigate(target, io),
            Action::Invoke(effect) => {
                if self.run_effect(effect, io).is_err() {
                    self.redraw(io);
                }
            }
            Action::InvokeThenNavigate(effect, target) => {
                // Navigation happens either way; the error is already logged.
                let _ = self.run_effect(effect, io);
                self.navigate(target, io);
            }
        }
    }

    fn navigate<S, R, D>(&mut self, target: MenuId, io: &mut Io<S, R, D>)
    where
        S: SystemActions,
        R: Renderer,
        D: DelayNs,
    {
        if target == self.state.menu {
            self.redraw(io);
        } else {
            self.enter(target, 0, io);
        }
    }

    fn enter<S, R, D>(&mut self, menu: MenuId, index: usize, io: &mut Io<S, R, D>)
    where
        S: SystemActions,
        R: Renderer,
        D: DelayNs,
    {
        if MenuCatalog::is_dynamic(menu) {
            let volumes = io.system.list_removable_volumes();
            debug!("UI: {} removable volume(s)", volumes.len());
            self.catalog.refresh_devices(volumes);
        }
        if menu != MenuId::NetworkInfo {
            self.header_ip = io.system.local_ip();
        }

        let n = self.catalog.item_count(menu);
        self.state = SelectionState {
            menu,
            index: clamp_selection(index, n),
        };
        info!("UI: entered {menu}");
        self.redraw(io);
    }

    fn redraw<S, R, D>(&mut self, io: &mut Io<S, R, D>)
    where
        S: SystemActions,
        R: Renderer,
    {
        let result = match self.state.menu {
            MenuId::NetworkInfo => {
                let info = io.system.network_info();
                io.renderer.draw_network_info(&info)
            }
            menu => {
                let items = self.catalog.labels(menu);
                io.renderer.draw_menu(&MenuFrame {
                    menu,
                    items: &items,
                    selected: self.state.index,
                    server_ip: self.header_ip.as_deref(),
                })
            }
        };
        log_render(result);
    }

    fn run_effect<S, R, D>(&mut self, effect: Effect, io: &mut Io<S, R, D>) -> Result<(), EffectError>
    where
        S: SystemActions,
        R: Renderer,
        D: DelayNs,
    {
        info!("UI: running {effect}");
        let result = match effect {
            Effect::ToggleMount(i) => io.system.toggle_mount(i),
            Effect::ApplyTemplate(template) => {
                let result = io.system.apply_web_template(template);
                let text = if result.is_ok() {
                    TEMPLATE_APPLIED
                } else {
                    TEMPLATE_FAILED
                };
                log_render(io.renderer.draw_confirmation(text));
                io.delay.delay_ms(self.config.confirmation_ms);
                result
            }
            Effect::Reboot => {
                log_render(io.renderer.draw_confirmation(RESTARTING));
                io.system.reboot()
            }
            Effect::Shutdown => {
                log_render(io.renderer.draw_confirmation(SHUTTING_DOWN));
                io.system.shutdown()
            }
        };
        if let Err(e) = &result {
            warn!("UI: {effect} failed: {e}");
        }
        result
    }
}

fn log_render(result: Result<(), RenderError>) {
    if let Err(e) = result {
        warn!("Display: {e}");
    }
}
