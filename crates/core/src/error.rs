use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not determine the home directory to expand `{}`", .0)]
    NoHome(String),

    #[error("Invalid flag: {}", .0)]
    Flag(#[from] clap::Error),

    #[error("Error reading data from standard input: {}", .0)]
    Stdin(std::io::Error),

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Error parsing config file at `{}`: {}", .path, .original)]
    Toml {
        path: String,
        original: toml::de::Error,
    },

    #[error("Unsupported value for config key `{}`: only strings, numbers, booleans and arrays of those are allowed", .0)]
    ConfigValue(String),

    #[error("{}", .0)]
    Handler(String),
}

impl Error {
    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn toml_error(path: String, original: toml::de::Error) -> Self {
        Self::Toml { path, original }
    }

    pub fn handler(val: impl std::fmt::Display) -> Self {
        Self::Handler(val.to_string())
    }
}
