//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and host paths
//! live here so they can be tuned in one place. There is no runtime
//! configuration file; runtime structs take their defaults from these
//! constants.

// GPIO pin assignments (BCM line offsets on /dev/gpiochip0)
//
//   Button UP      → GPIO 5
//   Button DOWN    → GPIO 6
//   Button SELECT  → GPIO 13
//   Display DC     → GPIO 24
//   Display RST    → GPIO 25
//   Backlight      → GPIO 18
//
// The buttons are active-low. Pull-ups are enabled in the board's
// config.txt (`gpio=5,6,13=ip,pu`) since the v1 cdev ABI cannot set bias.

/// GPIO character device that owns the button and display lines.
pub const GPIO_CHIP: &str = "/dev/gpiochip0";

pub const BUTTON_UP_LINE: u32 = 5;
pub const BUTTON_DOWN_LINE: u32 = 6;
pub const BUTTON_SELECT_LINE: u32 = 13;

pub const DISPLAY_DC_LINE: u32 = 24;
pub const DISPLAY_RST_LINE: u32 = 25;
pub const BACKLIGHT_LINE: u32 = 18;

/// Consumer label reported to the kernel for requested lines.
pub const GPIO_CONSUMER: &str = "jellybox";

// Display (ST7789, 170×320, SPI)

pub const SPI_DEVICE: &str = "/dev/spidev0.0";
/// SPI clock (Hz).
pub const SPI_SPEED_HZ: u32 = 32_000_000;

pub const DISPLAY_WIDTH: u16 = 170;
pub const DISPLAY_HEIGHT: u16 = 320;
/// Column offset of the 170-pixel window inside the controller's 240 columns.
pub const DISPLAY_OFFSET_X: u16 = 35;
pub const DISPLAY_OFFSET_Y: u16 = 0;

// Timing

/// Pause after a navigation or selection event before input is read again (ms).
pub const SETTLE_DELAY_MS: u32 = 200;

/// How long a confirmation screen stays up before the menu is redrawn (ms).
pub const CONFIRMATION_HOLD_MS: u32 = 2_000;

/// Idle sleep between two polls of the buttons (ms).
pub const POLL_INTERVAL_MS: u32 = 10;

// Host paths & interfaces

/// Wireless interface serving the access point.
pub const WIFI_INTERFACE: &str = "wlan0";

/// Directory holding the selectable `*.html` web templates.
pub const TEMPLATES_DIR: &str = "/opt/jellybox/web_templates";

/// Page served by the web server.
pub const WEB_ROOT_INDEX: &str = "/var/www/html/index.html";

/// Placeholder in a template replaced by the access point IP.
pub const TEMPLATE_IP_PLACEHOLDER: &str = "{{IP_LOCAL}}";

pub const FSTAB_PATH: &str = "/etc/fstab";

/// USB volume N is mounted at `{MOUNT_ROOT}/usb{N}`.
pub const MOUNT_ROOT: &str = "/mnt";

pub const NM_CONNECTIONS_DIR: &str = "/etc/NetworkManager/system-connections";

/// Log file; stderr is used when it cannot be opened.
pub const LOG_PATH: &str = "/var/log/jellybox.log";

// Volume discovery

/// Filesystems offered in the USB menu.
pub const SUPPORTED_FILESYSTEMS: &[&str] = &["vfat", "fat32", "exfat"];

/// Label capacity for a single menu row (bytes).
pub const LABEL_CAPACITY: usize = 32;
