#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;
mod error;

pub mod config;
pub mod device;
pub mod diagnostics;
pub mod events;
pub mod interface;
pub mod interrupt;
pub mod measurement;
pub mod params;
pub mod registers;
pub mod shared;

pub use crate::device::D7s;
pub use crate::error::{Error, Result};
pub use crate::interrupt::{Handler, InterruptEvent, InterruptPlatform};
pub use crate::shared::SharedD7s;
