//! WS2812 status pixel driven over one RMT TX channel.

use esp_hal::{
    Blocking,
    gpio::Level,
    rmt::{Channel, PulseCode, Tx},
};

use pointdash_core::render::LedColor;

// 40 MHz RMT clock with divider 1: one tick is 25 ns. Timings follow the
// WS2812B datasheet.
const T0H_TICKS: u16 = 16; // 0.40 us
const T0L_TICKS: u16 = 34; // 0.85 us
const T1H_TICKS: u16 = 32; // 0.80 us
const T1L_TICKS: u16 = 18; // 0.45 us

const ARMED_RGB: (u8, u8, u8) = (120, 0, 120);
const ACTIVE_RGB: (u8, u8, u8) = (0, 120, 0);

// 24 data pulses plus the end marker.
const PULSE_COUNT: usize = 25;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LedError;

/// Single status NeoPixel.
///
/// The RMT channel moves through each transaction, so it is parked in an
/// `Option` between transmissions; a failed transmit poisons the LED rather
/// than the session.
pub struct StatusLed<'d> {
    channel: Option<Channel<'d, Blocking, Tx>>,
}

impl<'d> StatusLed<'d> {
    pub fn new(channel: Channel<'d, Blocking, Tx>) -> Self {
        Self {
            channel: Some(channel),
        }
    }

    pub fn set(&mut self, color: LedColor) -> Result<(), LedError> {
        let (r, g, b) = match color {
            LedColor::Armed => ARMED_RGB,
            LedColor::Active => ACTIVE_RGB,
        };
        let pulses = encode_grb(r, g, b);

        let channel = self.channel.take().ok_or(LedError)?;
        let transaction = channel.transmit(&pulses).map_err(|_| LedError)?;
        match transaction.wait() {
            Ok(channel) => {
                self.channel = Some(channel);
                Ok(())
            }
            Err((_, channel)) => {
                self.channel = Some(channel);
                Err(LedError)
            }
        }
    }
}

fn encode_grb(r: u8, g: u8, b: u8) -> [u32; PULSE_COUNT] {
    let grb = ((g as u32) << 16) | ((r as u32) << 8) | b as u32;
    let mut pulses = [PulseCode::empty(); PULSE_COUNT];
    for bit in 0..24 {
        pulses[bit] = if grb & (1 << (23 - bit)) != 0 {
            PulseCode::new(Level::High, T1H_TICKS, Level::Low, T1L_TICKS)
        } else {
            PulseCode::new(Level::High, T0H_TICKS, Level::Low, T0L_TICKS)
        };
    }
    pulses
}
