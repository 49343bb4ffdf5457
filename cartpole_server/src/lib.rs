extern crate cartpole_codec;
extern crate futures;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate slog;

pub mod agent;
pub mod config;
pub mod domain;
pub mod experiment;
pub mod game_logic;
pub mod logging;
pub mod render;
