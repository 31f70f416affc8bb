//! JellyBox panel controller.
//!
//! Drives the appliance's 170x320 ST7789 panel and three push buttons: a
//! small menu tree for mounting USB volumes, publishing a web template,
//! showing the access point credentials and powering the host off.
//!
//! Everything except [`hardware`] builds and tests on any host:
//!
//! - `cargo test` runs the engine, dispatch and host-command tests
//! - `cargo build --release --features hardware` builds the `jellybox`
//!   binary for the Raspberry Pi

pub mod app;
pub mod config;
pub mod error;
#[cfg(feature = "hardware")]
pub mod hardware;
pub mod system;
pub mod ui;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::system::WebTemplate;
    use crate::ui::dispatch::{Action, DispatchTable, Effect};
    use crate::ui::input_logic::{clamp_selection, select_next, select_prev};
    use crate::ui::menu::{label, MenuCatalog, MAIN_MENU_ITEMS};
    use crate::ui::MenuId;

    // ════════════════════════════════════════════════════════════════════════
    // Selection Arithmetic
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn select_next_wraps_to_first() {
        assert_eq!(select_next(0, 5), 1);
        assert_eq!(select_next(4, 5), 0);
    }

    #[test]
    fn select_prev_wraps_to_last() {
        assert_eq!(select_prev(1, 5), 0);
        assert_eq!(select_prev(0, 5), 4);
    }

    #[test]
    fn single_item_menu_stays_put() {
        assert_eq!(select_next(0, 1), 0);
        assert_eq!(select_prev(0, 1), 0);
    }

    #[test]
    fn empty_list_selects_zero() {
        assert_eq!(select_next(3, 0), 0);
        assert_eq!(select_prev(3, 0), 0);
    }

    #[test]
    fn clamp_pulls_index_into_shrunk_list() {
        assert_eq!(clamp_selection(2, 2), 1);
        assert_eq!(clamp_selection(1, 3), 1);
        assert_eq!(clamp_selection(7, 0), 0);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Menu Catalog
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn static_menu_sizes() {
        let catalog = MenuCatalog::new();
        assert_eq!(catalog.item_count(MenuId::Main), 5);
        assert_eq!(catalog.item_count(MenuId::WebTemplates), 3);
        assert_eq!(catalog.item_count(MenuId::NetworkInfo), 1);
    }

    #[test]
    fn empty_devices_menu_has_only_back() {
        let catalog = MenuCatalog::new();
        assert_eq!(catalog.item_count(MenuId::Devices), 1);
        assert_eq!(catalog.labels(MenuId::Devices), [label("Back")]);
    }

    #[test]
    fn main_labels_match_rows() {
        let labels = MenuCatalog::new().labels(MenuId::Main);
        let texts: Vec<&str> = labels.iter().map(|l| l.as_str()).collect();
        assert_eq!(texts, MAIN_MENU_ITEMS);
    }

    #[test]
    fn only_devices_is_rebuilt() {
        let dynamic: Vec<MenuId> = MenuId::ALL
            .into_iter()
            .filter(|&m| MenuCatalog::is_dynamic(m))
            .collect();
        assert_eq!(dynamic, [MenuId::Devices]);
    }

    #[test]
    fn overlong_label_is_truncated() {
        let l = label("USB-mmcblk0p1 1.8T Mounted and then some");
        assert_eq!(l.len(), 32);
        assert!(l.starts_with("USB-mmcblk0p1"));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Dispatch Table
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn main_rows_dispatch_in_order() {
        let table = DispatchTable::default();
        let actions: Vec<Action> = (0..5)
            .filter_map(|i| table.lookup(MenuId::Main, i, 5))
            .collect();
        assert_eq!(
            actions,
            [
                Action::Navigate(MenuId::Devices),
                Action::Navigate(MenuId::WebTemplates),
                Action::Navigate(MenuId::NetworkInfo),
                Action::Invoke(Effect::Reboot),
                Action::Invoke(Effect::Shutdown),
            ]
        );
    }

    #[test]
    fn static_tables_cover_every_row() {
        let table = DispatchTable::default();
        let catalog = MenuCatalog::new();
        for menu in [MenuId::Main, MenuId::WebTemplates] {
            let actions = table.static_actions(menu).unwrap();
            assert_eq!(actions.len(), catalog.item_count(menu), "{menu}");
        }
        assert!(table.static_actions(MenuId::Devices).is_none());
    }

    #[test]
    fn template_rows_return_to_template_menu() {
        let table = DispatchTable::default();
        assert_eq!(
            table.lookup(MenuId::WebTemplates, 1, 3),
            Some(Action::InvokeThenNavigate(
                Effect::ApplyTemplate(WebTemplate::Cyberpunk),
                MenuId::WebTemplates
            ))
        );
        assert_eq!(
            table.lookup(MenuId::WebTemplates, 2, 3),
            Some(Action::Navigate(MenuId::Main))
        );
    }

    #[test]
    fn device_rows_toggle_then_back() {
        let table = DispatchTable::default();
        let toggle = table.lookup(MenuId::Devices, 0, 2).unwrap();
        assert_eq!(toggle.effect(), Some(Effect::ToggleMount(0)));
        assert_eq!(toggle.target(), Some(MenuId::Main));
        assert_eq!(
            table.lookup(MenuId::Devices, 1, 2),
            Some(Action::Navigate(MenuId::Main))
        );
    }

    #[test]
    fn out_of_range_row_has_no_action() {
        let table = DispatchTable::default();
        assert_eq!(table.lookup(MenuId::Devices, 99, 2), None);
        assert_eq!(table.lookup(MenuId::Main, 5, 5), None);
    }

    #[test]
    fn network_screen_always_goes_back() {
        let table = DispatchTable::default();
        for index in [0, 3, 99] {
            assert_eq!(
                table.lookup(MenuId::NetworkInfo, index, 1),
                Some(Action::Navigate(MenuId::Main))
            );
        }
    }

    #[test]
    fn effect_names_for_logs() {
        assert_eq!(Effect::ToggleMount(2).to_string(), "toggle_mount(2)");
        assert_eq!(
            Effect::ApplyTemplate(WebTemplate::Retro).to_string(),
            "apply_template(index_retro)"
        );
        assert_eq!(Action::Navigate(MenuId::Main).effect(), None);
    }
}
