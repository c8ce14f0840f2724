//! kartbox - a small interactive rigid body sandbox
//!
//! The interesting machinery lives in [`kartbox_physics`] (the concurrent
//! world) and [`kartbox_core`] (the game facade). This crate adds the
//! layered configuration and the interactive command parser used by the
//! `kartbox` binary.

pub mod config;
pub mod repl;
