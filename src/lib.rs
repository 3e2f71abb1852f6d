#![forbid(unsafe_code)]

pub mod app;
pub mod bootstrap;
pub mod camera;
pub mod config;
pub mod gamestate;
pub mod player;
