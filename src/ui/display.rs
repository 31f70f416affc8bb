//! Menu rendering for the ST7789 panel.
//!
//! Screens are composed in a RAM [`FrameBuffer`] and pushed to the panel
//! in one contiguous transfer, so the operator never sees a half-drawn
//! menu.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use qrcodegen::{QrCode, QrCodeEcc};

use crate::error::RenderError;
use crate::system::NetworkInfo;
use crate::ui::menu::Label;
use crate::ui::MenuId;

pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
pub const BORDER: Rgb565 = Rgb565::GREEN;
pub const TEXT: Rgb565 = Rgb565::WHITE;
pub const SELECTED_TEXT: Rgb565 = Rgb565::GREEN;
/// Dark grey (50, 50, 50) behind the highlighted row.
pub const SELECTED_BACKGROUND: Rgb565 = Rgb565::new(6, 12, 6);

/// First row top edge, row pitch and row height (pixels).
const ROW_TOP: i32 = 50;
const ROW_PITCH: i32 = 30;
const ROW_HEIGHT: u32 = 25;
const ROW_MARGIN: i32 = 10;

const QR_ORIGIN: Point = Point::new(10, 80);
const QR_SIZE: u32 = 150;
/// Light modules around the symbol required by readers.
const QR_QUIET_ZONE: i32 = 4;

const NOT_AVAILABLE: &str = "Not available";

/// Everything needed to draw one menu screen.
#[derive(Clone, Copy, Debug)]
pub struct MenuFrame<'a> {
    pub menu: MenuId,
    pub items: &'a [Label],
    pub selected: usize,
    /// Access point IP for the header, if known.
    pub server_ip: Option<&'a str>,
}

/// Render boundary used by the navigation engine.
pub trait Renderer {
    fn draw_menu(&mut self, frame: &MenuFrame<'_>) -> Result<(), RenderError>;

    /// Full-screen message (e.g. after applying a web template).
    fn draw_confirmation(&mut self, text: &str) -> Result<(), RenderError>;

    fn draw_network_info(&mut self, info: &NetworkInfo) -> Result<(), RenderError>;
}

/// RGB565 frame held in RAM.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb565>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BACKGROUND; (width * height) as usize],
        }
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point).map(|i| self.pixels[i])
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(point.x).ok()?, u32::try_from(point.y).ok()?);
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

fn text_style(color: Rgb565) -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyle::new(&FONT_6X10, color)
}

/// Rows that fit below the header.
fn visible_rows(height: u32) -> usize {
    let usable = (height as i32 - ROW_TOP).max(ROW_PITCH);
    (usable / ROW_PITCH) as usize
}

/// [`Renderer`] drawing with `embedded-graphics` onto any RGB565 panel.
pub struct PanelRenderer<P> {
    panel: P,
    frame: FrameBuffer,
}

impl<P> PanelRenderer<P>
where
    P: DrawTarget<Color = Rgb565>,
{
    pub fn new(panel: P) -> Self {
        let size = panel.bounding_box().size;
        Self {
            panel,
            frame: FrameBuffer::new(size.width, size.height),
        }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    fn begin(&mut self) {
        let _ = self.frame.clear(BACKGROUND);
        let size = self.frame.size();
        let _ = Rectangle::with_corners(
            Point::new(2, 2),
            Point::new(size.width as i32 - 3, size.height as i32 - 3),
        )
        .into_styled(PrimitiveStyle::with_stroke(BORDER, 1))
        .draw(&mut self.frame);
    }

    fn draw_header(&mut self, server_ip: Option<&str>) {
        let ip_line = format!("Server IP: {}", server_ip.unwrap_or(NOT_AVAILABLE));
        self.text("JellyBox", Point::new(61, 8), TEXT);
        self.text(&ip_line, Point::new(10, 22), TEXT);
    }

    fn draw_row(&mut self, slot: usize, label: &str, highlighted: bool) {
        let width = self.frame.size().width;
        let y = ROW_TOP + slot as i32 * ROW_PITCH;
        let background = if highlighted {
            SELECTED_BACKGROUND
        } else {
            BACKGROUND
        };
        let _ = Rectangle::new(
            Point::new(ROW_MARGIN, y),
            Size::new(width.saturating_sub(2 * ROW_MARGIN as u32), ROW_HEIGHT),
        )
        .into_styled(PrimitiveStyle::with_fill(background))
        .draw(&mut self.frame);

        let color = if highlighted { SELECTED_TEXT } else { TEXT };
        self.text(label, Point::new(15, y + 8), color);
    }

    fn draw_qr(&mut self, payload: &str) -> Result<(), RenderError> {
        let qr = QrCode::encode_text(payload, QrCodeEcc::Medium).map_err(|_| RenderError::Qr)?;
        let modules = qr.size() + 2 * QR_QUIET_ZONE;
        let scale = (QR_SIZE as i32 / modules).max(1);
        let margin = (QR_SIZE as i32 - modules * scale) / 2 + QR_QUIET_ZONE * scale;

        let _ = Rectangle::new(QR_ORIGIN, Size::new(QR_SIZE, QR_SIZE))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
            .draw(&mut self.frame);

        let dark = PrimitiveStyle::with_fill(Rgb565::BLACK);
        for y in 0..qr.size() {
            for x in 0..qr.size() {
                if qr.get_module(x, y) {
                    let corner = QR_ORIGIN + Point::new(margin + x * scale, margin + y * scale);
                    let _ = Rectangle::new(corner, Size::new(scale as u32, scale as u32))
                        .into_styled(dark)
                        .draw(&mut self.frame);
                }
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str, position: Point, color: Rgb565) {
        let _ = Text::with_baseline(text, position, text_style(color), Baseline::Top)
            .draw(&mut self.frame);
    }

    /// Push the composed frame to the panel.
    fn flush(&mut self) -> Result<(), RenderError> {
        let area = Rectangle::new(Point::zero(), self.frame.size());
        self.panel
            .fill_contiguous(&area, self.frame.pixels.iter().copied())
            .map_err(|_| RenderError::Panel)
    }
}

impl<P> Renderer for PanelRenderer<P>
where
    P: DrawTarget<Color = Rgb565>,
{
    fn draw_menu(&mut self, frame: &MenuFrame<'_>) -> Result<(), RenderError> {
        self.begin();
        self.draw_header(frame.server_ip);

        // Scroll so the highlighted row stays on screen.
        let rows = visible_rows(self.frame.size().height);
        let first = frame.selected.saturating_sub(rows.saturating_sub(1));
        for (slot, (index, label)) in frame
            .items
            .iter()
            .enumerate()
            .skip(first)
            .take(rows)
            .enumerate()
        {
            self.draw_row(slot, label, index == frame.selected);
        }

        self.flush()
    }

    fn draw_confirmation(&mut self, text: &str) -> Result<(), RenderError> {
        self.begin();
        self.text(text, Point::new(40, 20), TEXT);
        self.flush()
    }

    fn draw_network_info(&mut self, info: &NetworkInfo) -> Result<(), RenderError> {
        self.begin();

        let ssid = format!("SSID: {}", info.ssid.as_deref().unwrap_or(NOT_AVAILABLE));
        let password = format!(
            "Password: {}",
            info.password.as_deref().unwrap_or(NOT_AVAILABLE)
        );
        self.text("Access Point Info", Point::new(10, 20), TEXT);
        self.text(&ssid, Point::new(10, 40), TEXT);
        self.text(&password, Point::new(10, 60), TEXT);

        let qr_result = match info.wifi_qr_payload() {
            Some(payload) => self.draw_qr(&payload),
            None => {
                self.text("QR not available", QR_ORIGIN + Point::new(0, 10), TEXT);
                Ok(())
            }
        };

        // Back button, always highlighted.
        let width = self.frame.size().width;
        let _ = Rectangle::new(
            Point::new(ROW_MARGIN, 250),
            Size::new(width.saturating_sub(2 * ROW_MARGIN as u32), 30),
        )
        .into_styled(PrimitiveStyle::with_fill(SELECTED_BACKGROUND))
        .draw(&mut self.frame);
        self.text("Back", Point::new(15, 260), SELECTED_TEXT);

        // A payload too long for a QR symbol still leaves a usable screen.
        self.flush()?;
        qr_result
    }
}
