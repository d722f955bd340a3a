#![forbid(unsafe_code)]

pub mod config;
pub mod dex_utils;
pub mod errors;
pub mod pokeapi;
