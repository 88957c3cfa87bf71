//! Two-axis potentiometer joystick on ADC1.

use esp_hal::{
    Blocking,
    analog::adc::{Adc, AdcChannel, AdcConfig, AdcPin, Attenuation},
    gpio::AnalogPin,
    peripherals::ADC1,
};

use pointdash_core::{input::PositionSource, session::Point};

/// Full-scale 12-bit reading at 11 dB attenuation.
const ADC_FULL_SCALE: u32 = 4_095;
/// Rightmost display column a full deflection maps to.
const DISPLAY_MAX_X: u32 = 127;
/// Bottom display row a full deflection maps to.
const DISPLAY_MAX_Y: u32 = 63;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct JoystickError;

/// Blocking oneshot reads of both axes, scaled to display coordinates.
pub struct Joystick<'d, X, Y> {
    adc: Adc<'d, ADC1<'d>, Blocking>,
    x_pin: AdcPin<X, ADC1<'d>>,
    y_pin: AdcPin<Y, ADC1<'d>>,
}

impl<'d, X, Y> Joystick<'d, X, Y>
where
    X: AdcChannel + AnalogPin,
    Y: AdcChannel + AnalogPin,
{
    pub fn new(adc: ADC1<'d>, x: X, y: Y) -> Self {
        let mut config = AdcConfig::new();
        let x_pin = config.enable_pin(x, Attenuation::_11dB);
        let y_pin = config.enable_pin(y, Attenuation::_11dB);
        Self {
            adc: Adc::new(adc, config),
            x_pin,
            y_pin,
        }
    }
}

impl<X, Y> PositionSource for Joystick<'_, X, Y>
where
    X: AdcChannel + AnalogPin,
    Y: AdcChannel + AnalogPin,
{
    type Error = JoystickError;

    fn read_position(&mut self) -> Result<Point, JoystickError> {
        let raw_x = nb::block!(self.adc.read_oneshot(&mut self.x_pin)).map_err(|_| JoystickError)?;
        let raw_y = nb::block!(self.adc.read_oneshot(&mut self.y_pin)).map_err(|_| JoystickError)?;
        Ok(Point::new(
            scale(raw_x, DISPLAY_MAX_X),
            scale(raw_y, DISPLAY_MAX_Y),
        ))
    }
}

fn scale(raw: u16, display_max: u32) -> i32 {
    ((raw as u32).min(ADC_FULL_SCALE) * display_max / ADC_FULL_SCALE) as i32
}
