//! Lemonade CLI Library
//!
//! Front end for the `lemonade` binary: it classifies the invocation, resolves
//! options through [`lemonade_core`] and dispatches to an operation handler.
//!
//! # Examples
//!
//! ```bash
//! # Explicit subcommands
//! lemonade copy "some text"
//! echo "some text" | lemonade -host=desktop.lan copy
//! lemonade open https://example.com
//! lemonade server -allow=192.168.0.0/16
//!
//! # Installed under the name of a platform tool
//! ln -s "$(which lemonade)" ~/bin/pbcopy
//! echo "some text" | pbcopy
//! ```
//!
//! - [`handlers`]: operation handler that reports the resolved action
//! - [`usage`]: usage text

pub mod handlers;
pub mod usage;
