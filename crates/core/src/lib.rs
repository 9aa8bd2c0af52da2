//! Lemonade Core Library
//!
//! This crate decides what a `lemonade` invocation asked for and with which
//! settings. It does not talk to the network or the clipboard; the resolved
//! [`options::Configuration`] is handed to an [`dispatch::OperationHandler`]
//! that does.
//!
//! # Key Features
//!
//! - **Invocation Classification**: Operation from an alias name (`pbcopy`,
//!   `pbpaste`, `xdg-open`) or a subcommand token (`open`, `paste`, `copy`, `server`)
//! - **Config File**: `~/.config/lemonade.toml`, created with commented-out
//!   examples on first run
//! - **Option Layering**: Built-in defaults, then config file, then flags
//! - **Payload Resolution**: Last positional argument, or standard input
//!
//! # Examples
//!
//! ```no_run
//! use lemonade_core::invocation::classify;
//! use lemonade_core::options::OptionResolver;
//!
//! let invocation = classify(std::env::args().collect());
//! let config = OptionResolver::default().resolve(invocation, std::io::stdin())?;
//! println!("{} -> {}:{}", config.operation(), config.host(), config.port());
//! # Ok::<(), lemonade_core::error::Error>(())
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod flags;
pub mod invocation;
pub mod operation;
pub mod options;
