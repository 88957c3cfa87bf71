#![cfg_attr(not(test), no_std)]

//! Hardware-independent game logic for the Pointdash handheld.
//!
//! Everything in this crate is polled synchronously from the board loop and
//! is testable on the host: the session state machine, the scrollable player
//! menu, and the backend wire protocol. Hardware and transport live in the
//! companion HAL crate.

pub mod app;
pub mod input;
pub mod menu;
pub mod protocol;
pub mod render;
pub mod session;
