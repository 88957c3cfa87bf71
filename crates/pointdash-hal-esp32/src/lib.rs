#![no_std]

//! ESP32 board glue for the Pointdash handheld: buttons, joystick, status
//! LED, OLED rendering, and the HTTP backend client.

pub mod input;
pub mod led;
pub mod network;
pub mod render;
