//! Menu catalog - item labels and item counts per menu.
//!
//! `Main` and `WebTemplates` are fixed lists. `Devices` is rebuilt from the
//! removable volumes each time the menu is entered; its last row is always
//! "Back".

use crate::config::LABEL_CAPACITY;
use crate::system::Volume;
use crate::ui::MenuId;

/// One menu row, truncated to the panel width.
pub type Label = heapless::String<LABEL_CAPACITY>;

pub const MAIN_MENU_ITEMS: [&str; 5] = [
    "Mount/Unmount USB",
    "Web Templates",
    "Network Information",
    "Restart Server",
    "Shutdown Server",
];

pub const WEB_MENU_ITEMS: [&str; 3] = ["Terminal", "CyberPunk", "Back"];

pub const BACK_ITEM: &str = "Back";

/// Build a label, dropping whole characters that do not fit.
pub fn label(text: &str) -> Label {
    let mut l = Label::new();
    for c in text.chars() {
        if l.push(c).is_err() {
            break;
        }
    }
    l
}

/// Row text for a USB volume, e.g. `USB-sda1 14.9G Mounted`.
pub fn volume_label(volume: &Volume) -> Label {
    let mut text = format!("USB-{} {}", volume.name, volume.size_label);
    if volume.is_mounted() {
        text.push_str(" Mounted");
    }
    label(&text)
}

/// Per-menu item lists. Only the `Devices` list changes at runtime.
#[derive(Debug, Default)]
pub struct MenuCatalog {
    volumes: Vec<Volume>,
}

impl MenuCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` for menus whose item list must be rebuilt on entry.
    pub fn is_dynamic(menu: MenuId) -> bool {
        menu == MenuId::Devices
    }

    /// Replace the volume snapshot backing the `Devices` menu.
    pub fn refresh_devices(&mut self, volumes: Vec<Volume>) {
        self.volumes = volumes;
    }

    pub fn item_count(&self, menu: MenuId) -> usize {
        match menu {
            MenuId::Main => MAIN_MENU_ITEMS.len(),
            MenuId::WebTemplates => WEB_MENU_ITEMS.len(),
            MenuId::Devices => self.volumes.len() + 1,
            MenuId::NetworkInfo => 1,
        }
    }

    pub fn labels(&self, menu: MenuId) -> Vec<Label> {
        match menu {
            MenuId::Main => MAIN_MENU_ITEMS.iter().map(|s| label(s)).collect(),
            MenuId::WebTemplates => WEB_MENU_ITEMS.iter().map(|s| label(s)).collect(),
            MenuId::Devices => self
                .volumes
                .iter()
                .map(volume_label)
                .chain(core::iter::once(label(BACK_ITEM)))
                .collect(),
            MenuId::NetworkInfo => vec![label(BACK_ITEM)],
        }
    }
}
