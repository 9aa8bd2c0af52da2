//! Hand-off from a resolved [`Configuration`] to the backend for its operation.

use crate::error::Result;
use crate::operation::Operation;
use crate::options::Configuration;

/// The backends that carry out a resolved operation.
pub trait OperationHandler {
    /// # Errors
    ///
    /// Returns an error if the URL or file cannot be opened.
    fn open(&mut self, config: &Configuration) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be fetched.
    fn paste(&mut self, config: &Configuration) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the payload cannot be stored.
    fn copy(&mut self, config: &Configuration) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the server cannot be started.
    fn server(&mut self, config: &Configuration) -> Result<()>;
}

/// What [`dispatch`] did with a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// The matching handler ran to completion.
    Ran(Operation),
    /// Help was requested, no handler was called.
    Help,
    /// No operation was recognised, no handler was called.
    Usage,
}

/// Hands `config` to the handler for its operation.
///
/// Help takes precedence over everything else.
///
/// # Errors
///
/// Propagates the handler's error.
pub fn dispatch<H: OperationHandler>(config: &Configuration, handler: &mut H) -> Result<Dispatched> {
    if config.show_help() {
        return Ok(Dispatched::Help);
    }

    let operation = config.operation();
    match operation {
        Operation::Open => handler.open(config)?,
        Operation::Paste => handler.paste(config)?,
        Operation::Copy => handler.copy(config)?,
        Operation::Server => handler.server(config)?,
        Operation::Unknown => return Ok(Dispatched::Usage),
    }

    Ok(Dispatched::Ran(operation))
}
