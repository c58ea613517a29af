#![allow(dead_code)]

mod catalog;
mod fixture;

pub use catalog::*;
pub use fixture::*;
