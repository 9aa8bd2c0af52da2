//! The operations lemonade can perform and the ways they can be requested.

use std::fmt::{Display, Formatter};

/// Which operation handler receives control once options are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    Open,
    Paste,
    Copy,
    Server,
    /// No alias or subcommand was recognised; the dispatcher decides what to do.
    #[default]
    Unknown,
}

impl Operation {
    /// Subcommand tokens, matched exactly and case-sensitively.
    pub const SUBCOMMANDS: [(&'static str, Self); 4] = [
        ("open", Self::Open),
        ("paste", Self::Paste),
        ("copy", Self::Copy),
        ("server", Self::Server),
    ];

    /// Basenames of the platform tools lemonade can stand in for.
    pub const ALIASES: [(&'static str, Self); 3] = [
        ("xdg-open", Self::Open),
        ("pbpaste", Self::Paste),
        ("pbcopy", Self::Copy),
    ];

    #[must_use]
    pub fn from_subcommand(token: &str) -> Option<Self> {
        Self::SUBCOMMANDS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, operation)| *operation)
    }

    #[must_use]
    pub fn from_alias(basename: &str) -> Option<Self> {
        Self::ALIASES
            .iter()
            .find(|(name, _)| *name == basename)
            .map(|(_, operation)| *operation)
    }
}

impl Display for Operation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Paste => "paste",
            Self::Copy => "copy",
            Self::Server => "server",
            Self::Unknown => "unknown",
        };
        formatter.write_str(name)
    }
}

/// How the operation was expressed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStyle {
    /// The binary was run under a recognised alias name.
    AliasInvocation,
    /// The operation was named by a subcommand token.
    SubcommandInvocation,
    NoCommand,
}
