#![forbid(unsafe_code)]

pub mod dex;
