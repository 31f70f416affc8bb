//! Dispatch table - what SELECT does for each (menu, row).
//!
//! Every transition of the UI is listed here as data. The static menus
//! use fixed tables; the `Devices` rows are derived from the live row
//! count (one toggle per volume, then "Back").

use core::fmt;

use crate::system::WebTemplate;
use crate::ui::MenuId;

/// A named, fallible host operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Mount or unmount the USB volume at this index.
    ToggleMount(usize),
    ApplyTemplate(WebTemplate),
    Reboot,
    Shutdown,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::ToggleMount(i) => write!(f, "toggle_mount({i})"),
            Effect::ApplyTemplate(t) => write!(f, "apply_template({})", t.file_stem()),
            Effect::Reboot => f.write_str("reboot"),
            Effect::Shutdown => f.write_str("shutdown"),
        }
    }
}

/// Outcome of selecting a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Navigate(MenuId),
    Invoke(Effect),
    /// Run the effect, then navigate whether or not it succeeded.
    InvokeThenNavigate(Effect, MenuId),
}

impl Action {
    pub fn effect(&self) -> Option<Effect> {
        match *self {
            Action::Navigate(_) => None,
            Action::Invoke(e) | Action::InvokeThenNavigate(e, _) => Some(e),
        }
    }

    pub fn target(&self) -> Option<MenuId> {
        match *self {
            Action::Navigate(m) | Action::InvokeThenNavigate(_, m) => Some(m),
            Action::Invoke(_) => None,
        }
    }
}

pub const MAIN_ACTIONS: [Action; 5] = [
    Action::Navigate(MenuId::Devices),
    Action::Navigate(MenuId::WebTemplates),
    Action::Navigate(MenuId::NetworkInfo),
    Action::Invoke(Effect::Reboot),
    Action::Invoke(Effect::Shutdown),
];

pub const WEB_ACTIONS: [Action; 3] = [
    Action::InvokeThenNavigate(
        Effect::ApplyTemplate(WebTemplate::Retro),
        MenuId::WebTemplates,
    ),
    Action::InvokeThenNavigate(
        Effect::ApplyTemplate(WebTemplate::Cyberpunk),
        MenuId::WebTemplates,
    ),
    Action::Navigate(MenuId::Main),
];

/// (menu, index) → [`Action`].
#[derive(Clone, Copy, Debug)]
pub struct DispatchTable {
    main: &'static [Action],
    web_templates: &'static [Action],
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self {
            main: &MAIN_ACTIONS,
            web_templates: &WEB_ACTIONS,
        }
    }
}

impl DispatchTable {
    /// Fixed table for a static menu, `None` for `Devices`/`NetworkInfo`.
    pub fn static_actions(&self, menu: MenuId) -> Option<&'static [Action]> {
        match menu {
            MenuId::Main => Some(self.main),
            MenuId::WebTemplates => Some(self.web_templates),
            MenuId::Devices | MenuId::NetworkInfo => None,
        }
    }

    /// Action for row `index` of `menu` showing `item_count` rows.
    ///
    /// Returns `None` for an index outside the menu. `NetworkInfo` has no
    /// rows to select between: any SELECT returns to `Main`.
    pub fn lookup(&self, menu: MenuId, index: usize, item_count: usize) -> Option<Action> {
        if menu == MenuId::NetworkInfo {
            return Some(Action::Navigate(MenuId::Main));
        }
        if index >= item_count {
            return None;
        }
        match self.static_actions(menu) {
            Some(table) => table.get(index).copied(),
            // Devices: one row per volume, then "Back".
            None if index + 1 == item_count => Some(Action::Navigate(MenuId::Main)),
            None => Some(Action::InvokeThenNavigate(
                Effect::ToggleMount(index),
                MenuId::Main,
            )),
        }
    }
}
