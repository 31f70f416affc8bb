//! Raspberry Pi bring-up: GPIO lines, SPI bus and the ST7789 panel.

use display_interface_spi::SPIInterface;
use embedded_hal::digital::OutputPin;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use log::info;
use mipidsi::models::ST7789;
use mipidsi::options::{ColorInversion, Orientation, Rotation};
use mipidsi::Builder;

use crate::config::*;
use crate::error::InitError;
use crate::ui::buttons::GpioButtons;

pub type Panel = mipidsi::Display<SPIInterface<SpidevDevice, CdevPin>, ST7789, CdevPin>;

/// Peripherals owned by the running appliance.
pub struct Hardware {
    pub buttons: GpioButtons<CdevPin>,
    pub panel: Panel,
    /// Held for the process lifetime; releasing the line turns the light off.
    pub backlight: CdevPin,
    pub delay: Delay,
}

fn request_line(
    chip: &mut Chip,
    line: u32,
    flags: LineRequestFlags,
    default: u8,
) -> Result<CdevPin, InitError> {
    let gpio = |e: &dyn core::fmt::Debug| InitError::Gpio {
        line,
        reason: format!("{e:?}"),
    };
    let handle = chip
        .get_line(line)
        .and_then(|l| l.request(flags, default, GPIO_CONSUMER))
        .map_err(|e| gpio(&e))?;
    CdevPin::new(handle).map_err(|e| gpio(&e))
}

fn input(chip: &mut Chip, line: u32) -> Result<CdevPin, InitError> {
    request_line(chip, line, LineRequestFlags::INPUT, 0)
}

fn output(chip: &mut Chip, line: u32, level: u8) -> Result<CdevPin, InitError> {
    request_line(chip, line, LineRequestFlags::OUTPUT, level)
}

fn open_spi() -> Result<SpidevDevice, InitError> {
    let mut spi =
        SpidevDevice::open(SPI_DEVICE).map_err(|e| InitError::Spi(format!("{SPI_DEVICE}: {e:?}")))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(SPI_SPEED_HZ)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.0
        .configure(&options)
        .map_err(|e| InitError::Spi(format!("configure: {e}")))?;
    Ok(spi)
}

/// Claim every line and initialise the panel.
pub fn init() -> Result<Hardware, InitError> {
    let mut chip = Chip::new(GPIO_CHIP).map_err(|e| InitError::Gpio {
        line: 0,
        reason: format!("{GPIO_CHIP}: {e:?}"),
    })?;

    let buttons = GpioButtons::new(
        input(&mut chip, BUTTON_UP_LINE)?,
        input(&mut chip, BUTTON_DOWN_LINE)?,
        input(&mut chip, BUTTON_SELECT_LINE)?,
    );
    info!(
        "GPIO: buttons on lines {}/{}/{}",
        BUTTON_UP_LINE, BUTTON_DOWN_LINE, BUTTON_SELECT_LINE
    );

    let dc = output(&mut chip, DISPLAY_DC_LINE, 0)?;
    let rst = output(&mut chip, DISPLAY_RST_LINE, 1)?;
    let mut backlight = output(&mut chip, BACKLIGHT_LINE, 0)?;

    let spi = open_spi()?;
    let mut delay = Delay;
    let panel = Builder::new(ST7789, SPIInterface::new(spi, dc))
        .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .display_offset(DISPLAY_OFFSET_X, DISPLAY_OFFSET_Y)
        .orientation(Orientation::new().rotate(Rotation::Deg180))
        .invert_colors(ColorInversion::Inverted)
        .reset_pin(rst)
        .init(&mut delay)
        .map_err(|e| InitError::Display(format!("{e:?}")))?;

    backlight.set_high().map_err(|e| InitError::Gpio {
        line: BACKLIGHT_LINE,
        reason: format!("{e:?}"),
    })?;
    info!(
        "Display: ST7789 {}x{} on {}",
        DISPLAY_WIDTH, DISPLAY_HEIGHT, SPI_DEVICE
    );

    Ok(Hardware {
        buttons,
        panel,
        backlight,
        delay,
    })
}
