//! Button and joystick input sources.

use embedded_hal::digital::InputPin;

use pointdash_core::input::{InputEvent, InputProvider};

pub mod joystick;

#[derive(Debug, Clone, Copy)]
pub struct ButtonConfig {
    active_low: bool,
    debounce_polls: u8,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            active_low: true,
            debounce_polls: 3,
        }
    }
}

impl ButtonConfig {
    pub const fn with_active_low(mut self, active_low: bool) -> Self {
        self.active_low = active_low;
        self
    }

    pub const fn with_debounce_polls(mut self, debounce_polls: u8) -> Self {
        self.debounce_polls = debounce_polls;
        self
    }
}

#[derive(Debug)]
pub enum ButtonError<UpErr, DownErr, ConfirmErr> {
    Up(UpErr),
    Down(DownErr),
    Confirm(ConfirmErr),
}

type ButtonResult<UpErr, DownErr, ConfirmErr, T> = Result<T, ButtonError<UpErr, DownErr, ConfirmErr>>;

/// Per-button debounce state. A sample must repeat `debounce_polls` times
/// before it is accepted as the new stable level.
#[derive(Debug, Clone, Copy)]
struct DebouncedButton {
    raw: bool,
    stable: bool,
    stable_count: u8,
}

impl DebouncedButton {
    const fn new(pressed: bool) -> Self {
        Self {
            raw: pressed,
            stable: pressed,
            stable_count: 0,
        }
    }

    /// Feed one sample; returns true exactly once per debounced press.
    fn update(&mut self, pressed: bool, debounce_polls: u8) -> bool {
        if pressed == self.raw {
            self.stable_count = self.stable_count.saturating_add(1);
        } else {
            self.raw = pressed;
            self.stable_count = 0;
        }

        if self.stable_count >= debounce_polls.max(1) && self.stable != self.raw {
            self.stable = self.raw;
            return self.stable;
        }
        false
    }
}

/// The three session buttons, sampled once per loop iteration without
/// blocking. Presses detected in the same poll are queued so none is lost.
#[derive(Debug)]
pub struct ButtonTrio<UP, DOWN, CONFIRM> {
    up: UP,
    down: DOWN,
    confirm: CONFIRM,
    config: ButtonConfig,
    up_state: DebouncedButton,
    down_state: DebouncedButton,
    confirm_state: DebouncedButton,
    pending: [Option<InputEvent>; 2],
}

impl<UP, DOWN, CONFIRM> ButtonTrio<UP, DOWN, CONFIRM>
where
    UP: InputPin,
    DOWN: InputPin,
    CONFIRM: InputPin,
{
    pub fn new(
        mut up: UP,
        mut down: DOWN,
        mut confirm: CONFIRM,
        config: ButtonConfig,
    ) -> ButtonResult<UP::Error, DOWN::Error, CONFIRM::Error, Self> {
        let up_pressed = pressed_from_level(up.is_high().map_err(ButtonError::Up)?, &config);
        let down_pressed = pressed_from_level(down.is_high().map_err(ButtonError::Down)?, &config);
        let confirm_pressed =
            pressed_from_level(confirm.is_high().map_err(ButtonError::Confirm)?, &config);

        Ok(Self {
            up,
            down,
            confirm,
            config,
            up_state: DebouncedButton::new(up_pressed),
            down_state: DebouncedButton::new(down_pressed),
            confirm_state: DebouncedButton::new(confirm_pressed),
            pending: [None, None],
        })
    }
}

impl<UP, DOWN, CONFIRM> InputProvider for ButtonTrio<UP, DOWN, CONFIRM>
where
    UP: InputPin,
    DOWN: InputPin,
    CONFIRM: InputPin,
{
    type Error = ButtonError<UP::Error, DOWN::Error, CONFIRM::Error>;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        for slot in self.pending.iter_mut() {
            if let Some(event) = slot.take() {
                return Ok(Some(event));
            }
        }

        let up_high = self.up.is_high().map_err(ButtonError::Up)?;
        let down_high = self.down.is_high().map_err(ButtonError::Down)?;
        let confirm_high = self.confirm.is_high().map_err(ButtonError::Confirm)?;

        let polls = self.config.debounce_polls;
        let samples = [
            (
                self.up_state
                    .update(pressed_from_level(up_high, &self.config), polls),
                InputEvent::Up,
            ),
            (
                self.down_state
                    .update(pressed_from_level(down_high, &self.config), polls),
                InputEvent::Down,
            ),
            (
                self.confirm_state
                    .update(pressed_from_level(confirm_high, &self.config), polls),
                InputEvent::Confirm,
            ),
        ];

        let mut first = None;
        let mut queued = 0usize;
        for (fired, event) in samples {
            if !fired {
                continue;
            }
            if first.is_none() {
                first = Some(event);
            } else {
                self.pending[queued] = Some(event);
                queued += 1;
            }
        }
        Ok(first)
    }
}

fn pressed_from_level(is_high: bool, config: &ButtonConfig) -> bool {
    if config.active_low { !is_high } else { is_high }
}
