//! macOS developer machine setup and dotfiles backup engine.
//!
//! Installs command-line tooling through Homebrew and moves a fixed
//! inventory of configuration files between the live system and a
//! versioned configuration set (`<root>/config`).
//!
//! [`config`] says what is managed and where it lives. [`resources`] hold
//! the check-then-apply primitives, [`tasks`] string them into the ordered
//! setup steps, and [`commands`] drive each subcommand end to end.
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;
