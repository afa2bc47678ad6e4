#![doc = include_str!("../Readme.md")]

pub use async_trait::async_trait;
pub use smfi_common as common;
pub use smfi_server as server;
