//! GPIO button input.
//!
//! Three physical buttons (active-low with pull-up):
//!   - UP     - move selection up
//!   - DOWN   - move selection down
//!   - SELECT - run the highlighted entry
//!
//! Buttons are sampled level-triggered once per poll. Holding UP or DOWN
//! repeats its event after every settle delay; the poll loop waits for
//! SELECT to be released before acting on it again.

use crate::ui::{Button, ButtonEvent};
use embedded_hal::digital::InputPin;
use log::warn;

/// Live button state as seen by the navigation engine.
pub trait InputSource {
    /// `true` while `button` is held down. A failed read reports `false`.
    fn is_pressed(&mut self, button: Button) -> bool;

    /// Reduce the three buttons to one event, UP first, SELECT last.
    fn poll(&mut self) -> ButtonEvent {
        if self.is_pressed(Button::Up) {
            ButtonEvent::Up
        } else if self.is_pressed(Button::Down) {
            ButtonEvent::Down
        } else if self.is_pressed(Button::Select) {
            ButtonEvent::Select
        } else {
            ButtonEvent::None
        }
    }
}

/// Three buttons wired to GPIO inputs.
pub struct GpioButtons<P> {
    up: P,
    down: P,
    select: P,
}

impl<P: InputPin> GpioButtons<P> {
    pub fn new(up: P, down: P, select: P) -> Self {
        Self { up, down, select }
    }
}

impl<P: InputPin> InputSource for GpioButtons<P> {
    fn is_pressed(&mut self, button: Button) -> bool {
        let pin = match button {
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Select => &mut self.select,
        };

        // Grounded pin = pressed.
        match pin.is_low() {
            Ok(pressed) => pressed,
            Err(e) => {
                warn!("Button {:?}: read failed ({:?}), treating as released", button, e);
                false
            }
        }
    }
}
