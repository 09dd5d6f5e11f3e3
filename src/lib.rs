#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod descriptor;
mod deserialize;
mod error;
mod instance;
pub mod leaf;
mod macros;
mod path;
mod serialize;
mod typed;

pub use descriptor::*;
pub use deserialize::{Advisory, Deserializer, convert, from_str, from_value};
pub use error::*;
pub use instance::*;
pub use leaf::Datetime;
pub use path::*;
pub use serialize::{emit, to_string, to_string_pretty, to_value};
pub use typed::Datalize;
