#![doc = include_str!("../Readme.md")]

pub mod actions;
pub mod commands;
pub mod decoding;
pub mod encoding;
pub mod macros;
pub mod optneg;

mod error;

pub use error::{InvalidData, NotEnoughData, ProtocolError};
