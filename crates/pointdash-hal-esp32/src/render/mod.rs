//! Screen rendering on the 128x64 I2C OLED.

use core::fmt::Write as _;

use embedded_graphics::{
    Pixel,
    mono_font::{MonoTextStyle, MonoTextStyleBuilder, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    text::Text,
};
use heapless::String;
use ssd1306::{I2CDisplayInterface, Ssd1306, mode::BufferedGraphicsMode, prelude::*};

use pointdash_core::render::Screen;

const MENU_ROW_BYTES: usize = 32;
const MENU_FIRST_ROW_Y: i32 = 24;
const MENU_ROW_HEIGHT: i32 = 12;

/// Concrete buffered OLED driver, generic over the board's I2C bus.
pub type Oled<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Initialize the SSD1306 and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    let _ = display.init();
    display.clear_buffer();
    let _ = display.flush();
    display
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// Draw one full frame for `screen`: clear, draw, flush.
pub fn render<I2C>(display: &mut Oled<I2C>, screen: &Screen<'_>)
where
    I2C: embedded_hal::i2c::I2c,
{
    display.clear_buffer();
    match screen {
        Screen::Idle => {
            let _ = Text::new("READY", Point::new(45, 28), text_style()).draw(display);
            let _ = Text::new("Click !", Point::new(5, 53), text_style()).draw(display);
        }
        Screen::NoPlayers => {
            let _ = Text::new("NO PLAYERS", Point::new(20, 33), text_style()).draw(display);
        }
        Screen::Menu { rows } => {
            let _ = Text::new("SELECT PLAYER", Point::new(0, 8), text_style()).draw(display);
            for (index, row) in rows.iter().enumerate() {
                let mut line: String<MENU_ROW_BYTES> = String::new();
                let _ = line.push(if row.selected { '>' } else { ' ' });
                let _ = line.push_str(row.name);
                let y = MENU_FIRST_ROW_Y + index as i32 * MENU_ROW_HEIGHT;
                let _ = Text::new(line.as_str(), Point::new(0, y), text_style()).draw(display);
            }
        }
        Screen::Play {
            elapsed_ms,
            player,
            target,
        } => {
            let mut line: String<16> = String::new();
            let _ = write!(line, "{:.2}s", *elapsed_ms as f32 / 1_000.0);
            let _ = Text::new(line.as_str(), Point::new(0, 8), text_style()).draw(display);
            if let Some(target) = target {
                let _ = Pixel(Point::new(target.x, target.y), BinaryColor::On).draw(display);
            }
            let _ = Pixel(Point::new(player.x, player.y), BinaryColor::On).draw(display);
        }
        Screen::EndChoice { elapsed_ms } => {
            let _ = Text::new("Bravo !", Point::new(30, 8), text_style()).draw(display);
            let mut line: String<24> = String::new();
            let _ = write!(line, "Temps: {:.2}s", *elapsed_ms as f32 / 1_000.0);
            let _ = Text::new(line.as_str(), Point::new(0, 28), text_style()).draw(display);
            let _ = Text::new("OK = Replay", Point::new(0, 48), text_style()).draw(display);
            let _ = Text::new("Down = Player", Point::new(0, 60), text_style()).draw(display);
        }
    }
    let _ = display.flush();
}
