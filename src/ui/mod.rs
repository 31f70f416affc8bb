//! User interface subsystem - ST7789 display + physical buttons.
//!
//! The navigation engine maintains a state machine that reacts to button
//! presses, dispatches menu actions to the host, and renders the current
//! menu on the panel.
//!
//! ## Components
//!
//! - **Buttons**: 3 tactile switches, active-low (UP, DOWN, SELECT)
//! - **Menu catalog**: labels and item counts per menu
//! - **Dispatch table**: (menu, index) → [`dispatch::Action`]
//! - **Engine**: selection state and transitions
//! - **Display**: `embedded-graphics` renderer over a frame buffer

pub mod buttons;
pub mod dispatch;
pub mod display;
pub mod engine;
pub mod input_logic;
pub mod menu;


use core::fmt;

/// Menus (views) the UI can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuId {
    /// Home - USB, web templates, network, power.
    Main,
    /// Web template picker.
    WebTemplates,
    /// Removable USB volumes plus "Back".
    Devices,
    /// Access point credentials and QR code. Any SELECT goes back.
    NetworkInfo,
}

impl MenuId {
    pub const ALL: [MenuId; 4] = [
        MenuId::Main,
        MenuId::WebTemplates,
        MenuId::Devices,
        MenuId::NetworkInfo,
    ];
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MenuId::Main => "main",
            MenuId::WebTemplates => "web",
            MenuId::Devices => "devices",
            MenuId::NetworkInfo => "network",
        };
        f.write_str(name)
    }
}

/// The three physical buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Select,
}

/// Logical input for one poll cycle.
///
///   - UP/DOWN: move the highlighted row (wraps around)
///   - SELECT: run the highlighted row's action
///   - None: nothing pressed this poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    Up,
    Down,
    Select,
    None,
}
