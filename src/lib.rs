#![doc = include_str!("../README.md")]
#![warn(missing_docs, unreachable_pub)]

#[macro_use]
mod macros;

mod bigstring;
mod error;
mod iobuf;
pub mod marker;
mod raw;

pub mod bin_prot;
#[cfg(unix)]
pub mod sys;

pub use bigstring::Bigstring;
pub use error::{Error, Result};
pub use iobuf::blit;
pub use iobuf::prim::Primitive;
pub use iobuf::{Expert, HiBound, Iobuf, LoBound, Region};
pub use marker::{NoSeek, ReadOnly, ReadWrite, Seek};
