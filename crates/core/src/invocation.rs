//! Classification of the raw argument vector.
//!
//! The operation is taken from the name the binary was invoked as when that
//! name is one of the known aliases. Otherwise the first subcommand token in
//! the arguments names it, and that token is removed from the arguments handed
//! on to option resolution.

use log::debug;

use crate::operation::{InvocationStyle, Operation};

/// Result of classifying an argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub operation: Operation,
    pub style: InvocationStyle,
    /// The argument vector with the subcommand token (if any) removed.
    /// Element 0 is still the invocation path.
    pub args: Vec<String>,
}

/// Returns the final path segment of `path`, without the platform executable
/// suffix.
fn basename(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    name.strip_suffix(std::env::consts::EXE_SUFFIX)
        .filter(|stripped| !stripped.is_empty())
        .unwrap_or(name)
}

/// Determines the requested operation from `args` (element 0 being the
/// invocation path) and rewrites the arguments accordingly.
///
/// An alias match on element 0 takes precedence: in that case every later
/// token, including literal subcommand names, is left in place.
///
/// # Examples
///
/// ```
/// use lemonade_core::invocation::classify;
/// use lemonade_core::operation::{InvocationStyle, Operation};
///
/// let args = vec!["lemonade".to_string(), "-port=3000".to_string(), "copy".to_string()];
/// let invocation = classify(args);
/// assert_eq!(invocation.operation, Operation::Copy);
/// assert_eq!(invocation.style, InvocationStyle::SubcommandInvocation);
/// assert_eq!(invocation.args, vec!["lemonade", "-port=3000"]);
/// ```
#[must_use]
pub fn classify(args: Vec<String>) -> Invocation {
    let Some(invoked_as) = args.first() else {
        return Invocation {
            operation: Operation::Unknown,
            style: InvocationStyle::NoCommand,
            args,
        };
    };

    if let Some(operation) = Operation::from_alias(basename(invoked_as)) {
        debug!("Invoked as alias `{invoked_as}`: {operation}");
        return Invocation {
            operation,
            style: InvocationStyle::AliasInvocation,
            args,
        };
    }

    let found = args
        .iter()
        .enumerate()
        .skip(1)
        .find_map(|(index, token)| Operation::from_subcommand(token).map(|op| (index, op)));

    match found {
        Some((index, operation)) => {
            debug!("Subcommand `{operation}` found at argument {index}");
            let args = args
                .into_iter()
                .enumerate()
                .filter_map(|(i, token)| (i != index).then_some(token))
                .collect();
            Invocation {
                operation,
                style: InvocationStyle::SubcommandInvocation,
                args,
            }
        }
        None => {
            debug!("No alias or subcommand recognised");
            Invocation {
                operation: Operation::Unknown,
                style: InvocationStyle::NoCommand,
                args,
            }
        }
    }
}
