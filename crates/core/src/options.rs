//! Resolution of the final [`Configuration`].
//!
//! Values are layered lowest to highest: built-in defaults, then the config
//! file, then explicit command-line flags. The payload is then taken from the
//! last positional argument or, failing that, from the input stream.

use std::fmt::{Display, Formatter};
use std::fs;
use std::io::Read;
use std::str::FromStr;

use log::{debug, warn};

use crate::config::ConfigResolver;
use crate::error::{Error, Result};
use crate::flags::Flags;
use crate::invocation::Invocation;
use crate::operation::Operation;

pub const DEFAULT_PORT: u16 = 2489;
pub const DEFAULT_ALLOW: &str = "0.0.0.0/0,::/0";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_LOG_LEVEL: i32 = 1;

/// Line ending conversion applied to transferred text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Leave line endings untouched.
    #[default]
    None,
    Cr,
    Crlf,
    Lf,
}

impl LineEnding {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Cr => "cr",
            Self::Crlf => "crlf",
            Self::Lf => "lf",
        }
    }

    const fn separator(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Cr => Some("\r"),
            Self::Crlf => Some("\r\n"),
            Self::Lf => Some("\n"),
        }
    }

    /// Rewrites every `\r\n`, `\r` and `\n` in `text` to this line ending.
    ///
    /// # Examples
    ///
    /// ```
    /// use lemonade_core::options::LineEnding;
    ///
    /// assert_eq!(LineEnding::Crlf.convert("a\nb\r\nc"), "a\r\nb\r\nc");
    /// assert_eq!(LineEnding::None.convert("a\rb"), "a\rb");
    /// ```
    #[must_use]
    pub fn convert(self, text: &str) -> String {
        let Some(separator) = self.separator() else {
            return text.to_string();
        };

        let mut converted = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    chars.next_if_eq(&'\n');
                    converted.push_str(separator);
                }
                '\n' => converted.push_str(separator),
                c => converted.push(c),
            }
        }
        converted
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" => Ok(Self::None),
            "cr" => Ok(Self::Cr),
            "crlf" => Ok(Self::Crlf),
            "lf" => Ok(Self::Lf),
            _ => Err(format!("unknown line ending `{s}`, expected one of cr, crlf or lf")),
        }
    }
}

impl Display for LineEnding {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// The resolved option set handed to the operation handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    operation: Operation,
    port: u16,
    allow_range: String,
    host: String,
    show_help: bool,
    translate_loopback: bool,
    translate_local_file: bool,
    line_ending: LineEnding,
    suppress_fallback_messages: bool,
    log_level: i32,
    data_source: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            operation: Operation::Unknown,
            port: DEFAULT_PORT,
            allow_range: DEFAULT_ALLOW.to_string(),
            host: DEFAULT_HOST.to_string(),
            show_help: false,
            translate_loopback: true,
            translate_local_file: true,
            line_ending: LineEnding::None,
            suppress_fallback_messages: false,
            log_level: DEFAULT_LOG_LEVEL,
            data_source: String::new(),
        }
    }
}

impl Configuration {
    /// Overrides every field that `flags` explicitly sets.
    fn apply(&mut self, flags: &Flags) {
        if let Some(port) = flags.port {
            self.port = port;
        }
        if let Some(allow) = &flags.allow {
            self.allow_range.clone_from(allow);
        }
        if let Some(host) = &flags.host {
            self.host.clone_from(host);
        }
        if let Some(help) = flags.help {
            self.show_help = help;
        }
        if let Some(translate) = flags.trans_loopback {
            self.translate_loopback = translate;
        }
        if let Some(translate) = flags.trans_localfile {
            self.translate_local_file = translate;
        }
        if let Some(line_ending) = flags.line_ending {
            self.line_ending = line_ending;
        }
        if let Some(suppress) = flags.no_fallback_messages {
            self.suppress_fallback_messages = suppress;
        }
        if let Some(log_level) = flags.log_level {
            self.log_level = log_level;
        }
    }

    pub const fn operation(&self) -> Operation {
        self.operation
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub fn allow_range(&self) -> &str {
        &self.allow_range
    }

    /// The individual entries of the allow range.
    pub fn allow_ranges(&self) -> impl Iterator<Item = &str> {
        self.allow_range
            .split(',')
            .map(str::trim)
            .filter(|range| !range.is_empty())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub const fn show_help(&self) -> bool {
        self.show_help
    }

    pub const fn translate_loopback(&self) -> bool {
        self.translate_loopback
    }

    pub const fn translate_local_file(&self) -> bool {
        self.translate_local_file
    }

    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub const fn suppress_fallback_messages(&self) -> bool {
        self.suppress_fallback_messages
    }

    pub const fn log_level(&self) -> i32 {
        self.log_level
    }

    /// Maps the numeric log level onto a [`log::LevelFilter`]:
    /// 0 and 1 error, 2 warn, 3 info, 4 and above debug, negative off.
    pub const fn log_filter(&self) -> log::LevelFilter {
        match self.log_level {
            i32::MIN..=-1 => log::LevelFilter::Off,
            0 | 1 => log::LevelFilter::Error,
            2 => log::LevelFilter::Warn,
            3 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }
}

/// Builds a [`Configuration`] from a classified invocation.
#[derive(Debug, Clone, Default)]
pub struct OptionResolver {
    config: ConfigResolver,
    skip_config_file: bool,
}

impl OptionResolver {
    pub fn new(config: ConfigResolver) -> Self {
        Self {
            config,
            skip_config_file: false,
        }
    }

    /// Skips locating and reading the config file entirely.
    #[must_use]
    pub fn skip_config_file(mut self, skip: bool) -> Self {
        self.skip_config_file = skip;
        self
    }

    /// Reads the config file into flags.
    ///
    /// Returns `None` when the file is missing, unreadable or does not parse.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHome`] if the config path cannot be expanded.
    pub fn load_baseline(&self) -> Result<Option<Flags>> {
        let path = self.config.locate()?;

        let read = fs::read_to_string(&path)
            .map_err(|e| Error::io_error("config".to_string(), path.display().to_string(), e))
            .and_then(|contents| {
                toml::from_str::<toml::Table>(&contents)
                    .map_err(|e| Error::toml_error(path.display().to_string(), e))
            })
            .and_then(|table| Flags::from_table(&table));

        match read {
            Ok(flags) => Ok(Some(flags)),
            Err(e) => {
                warn!("Ignoring config file: {e}");
                Ok(None)
            }
        }
    }

    /// Resolves the final configuration for `invocation`.
    ///
    /// `input` is read to the end unless the operation is `Paste` or `Server`,
    /// help was requested, or a positional payload was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined, if an
    /// explicit flag is malformed, or if reading `input` fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use lemonade_core::invocation::classify;
    /// use lemonade_core::options::OptionResolver;
    ///
    /// let invocation = classify(vec!["lemonade".into(), "copy".into(), "-port=4000".into(), "hello".into()]);
    /// let config = OptionResolver::default()
    ///     .skip_config_file(true)
    ///     .resolve(invocation, std::io::empty())?;
    /// assert_eq!(config.port(), 4000);
    /// assert_eq!(config.data_source(), "hello");
    /// # Ok::<(), lemonade_core::error::Error>(())
    /// ```
    pub fn resolve<R: Read>(&self, invocation: Invocation, mut input: R) -> Result<Configuration> {
        let mut configuration = Configuration {
            operation: invocation.operation,
            ..Configuration::default()
        };

        if self.skip_config_file {
            debug!("Skipping config file");
        } else if let Some(baseline) = self.load_baseline()? {
            configuration.apply(&baseline);
        }

        let flags = Flags::parse_tokens(invocation.args.into_iter().skip(1))?;
        configuration.apply(&flags);

        if matches!(configuration.operation, Operation::Paste | Operation::Server) {
            return Ok(configuration);
        }

        let positional_count = flags.positional.len();
        let payload = flags.positional.into_iter().last();
        if positional_count > 1 {
            debug!("Discarding {} earlier positional arguments", positional_count - 1);
        }

        if configuration.show_help {
            return Ok(configuration);
        }

        if let Some(payload) = payload {
            configuration.data_source = payload;
        } else {
            let mut buffer = Vec::new();
            input.read_to_end(&mut buffer).map_err(Error::Stdin)?;
            configuration.data_source = String::from_utf8_lossy(&buffer).into_owned();
        }

        Ok(configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::classify;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }
    }

    struct UnreadableInput;

    impl Read for UnreadableInput {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            panic!("input must not be read");
        }
    }

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    fn resolver_with_config(contents: Option<&str>) -> (TempDir, OptionResolver) {
        let home = TempDir::new().unwrap();
        if let Some(contents) = contents {
            fs::write(home.path().join("lemonade.toml"), contents).unwrap();
        }
        let resolver = OptionResolver::new(ConfigResolver::with_home("~/lemonade.toml", home.path()));
        (home, resolver)
    }

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.operation(), Operation::Unknown);
        assert_eq!(config.port(), 2489);
        assert_eq!(config.allow_range(), "0.0.0.0/0,::/0");
        assert_eq!(config.host(), "localhost");
        assert!(!config.show_help());
        assert!(config.translate_loopback());
        assert!(config.translate_local_file());
        assert_eq!(config.line_ending(), LineEnding::None);
        assert!(!config.suppress_fallback_messages());
        assert_eq!(config.log_level(), 1);
        assert_eq!(config.data_source(), "");
    }

    #[test]
    fn test_flag_overrides_config_file() {
        let (_home, resolver) = resolver_with_config(Some("port=3000\nhost=\"remote\""));
        let invocation = classify(args(&["lemonade", "paste", "-port", "4000"]));

        let config = resolver.resolve(invocation, UnreadableInput).unwrap();

        assert_eq!(config.port(), 4000);
        assert_eq!(config.host(), "remote");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let (_home, resolver) = resolver_with_config(Some("port=3000\ntrans-loopback=false"));
        let config = resolver
            .resolve(classify(args(&["lemonade", "server"])), UnreadableInput)
            .unwrap();

        assert_eq!(config.port(), 3000);
        assert!(!config.translate_loopback());
    }

    #[test]
    fn test_corrupt_config_file_falls_back_to_defaults() {
        let (_home, resolver) = resolver_with_config(Some("port=3000\nthis is [ not toml"));
        let config = resolver
            .resolve(classify(args(&["lemonade", "server"])), UnreadableInput)
            .unwrap();
        assert_eq!(config.port(), 2489);
    }

    #[test]
    fn test_invalid_config_value_falls_back_to_defaults() {
        let (_home, resolver) = resolver_with_config(Some("port=3000\nline-ending=\"unix\""));
        let config = resolver
            .resolve(classify(args(&["lemonade", "server"])), UnreadableInput)
            .unwrap();
        assert_eq!(config.port(), 2489);
        assert_eq!(config.line_ending(), LineEnding::None);
    }

    #[test]
    fn test_missing_config_file_is_created_and_defaults_stand() {
        let (home, resolver) = resolver_with_config(None);
        let config = resolver
            .resolve(classify(args(&["lemonade", "server"])), UnreadableInput)
            .unwrap();

        assert_eq!(config.port(), 2489);
        assert!(home.path().join("lemonade.toml").exists());
    }

    #[test]
    fn test_skip_config_file() {
        let (home, resolver) = resolver_with_config(None);
        let config = resolver
            .skip_config_file(true)
            .resolve(classify(args(&["lemonade", "server"])), UnreadableInput)
            .unwrap();

        assert_eq!(config.port(), 2489);
        assert!(!home.path().join("lemonade.toml").exists());
    }

    #[test]
    fn test_malformed_flag_is_fatal() {
        let (_home, resolver) = resolver_with_config(None);
        let result = resolver.resolve(classify(args(&["lemonade", "copy", "-port=nope"])), UnreadableInput);
        assert!(matches!(result, Err(Error::Flag(_))));
    }

    #[test]
    fn test_positional_wins_over_input() {
        let (_home, resolver) = resolver_with_config(None);
        let config = resolver
            .resolve(classify(args(&["lemonade", "copy", "hello"])), Cursor::new("world"))
            .unwrap();
        assert_eq!(config.operation(), Operation::Copy);
        assert_eq!(config.data_source(), "hello");
    }

    #[test]
    fn test_input_used_without_positional() {
        let (_home, resolver) = resolver_with_config(None);
        let config = resolver
            .resolve(classify(args(&["pbcopy"])), Cursor::new("world"))
            .unwrap();
        assert_eq!(config.operation(), Operation::Copy);
        assert_eq!(config.data_source(), "world");
    }

    #[test]
    fn test_last_positional_wins() {
        let (_home, resolver) = resolver_with_config(None);
        let config = resolver
            .resolve(
                classify(args(&["lemonade", "open", "first", "-port=5", "second"])),
                UnreadableInput,
            )
            .unwrap();
        assert_eq!(config.port(), 5);
        assert_eq!(config.data_source(), "second");
    }

    #[test]
    fn test_duplicate_subcommand_becomes_payload() {
        let (_home, resolver) = resolver_with_config(None);
        let config = resolver
            .resolve(classify(args(&["lemonade", "copy", "copy"])), UnreadableInput)
            .unwrap();
        assert_eq!(config.data_source(), "copy");
    }

    #[test]
    fn test_paste_and_server_never_read_input() {
        let (_home, resolver) = resolver_with_config(None);
        for argv in [
            args(&["lemonade", "paste"]),
            args(&["lemonade", "server", "ignored"]),
            args(&["/usr/bin/pbpaste"]),
        ] {
            let config = resolver.resolve(classify(argv), UnreadableInput).unwrap();
            assert_eq!(config.data_source(), "");
        }
    }

    #[test]
    fn test_help_skips_payload() {
        let (_home, resolver) = resolver_with_config(None);
        let config = resolver
            .resolve(classify(args(&["lemonade", "copy", "-help", "text"])), UnreadableInput)
            .unwrap();
        assert!(config.show_help());
        assert_eq!(config.data_source(), "");
    }

    #[test]
    fn test_unknown_operation_reads_input() {
        let (_home, resolver) = resolver_with_config(None);
        let config = resolver
            .resolve(classify(args(&["lemonade", "-port=7"])), Cursor::new("world"))
            .unwrap();
        assert_eq!(config.operation(), Operation::Unknown);
        assert_eq!(config.port(), 7);
        assert_eq!(config.data_source(), "world");

        let config = resolver
            .resolve(classify(args(&["lemonade", "payload"])), UnreadableInput)
            .unwrap();
        assert_eq!(config.data_source(), "payload");
    }

    #[test]
    fn test_paste_and_server_validate_flags_after_positional() {
        let (_home, resolver) = resolver_with_config(None);
        let config = resolver
            .resolve(classify(args(&["lemonade", "server", "foo", "-port=9"])), UnreadableInput)
            .unwrap();
        assert_eq!(config.port(), 9);
        assert_eq!(config.data_source(), "");

        let result = resolver.resolve(
            classify(args(&["lemonade", "server", "foo", "-port=bad"])),
            UnreadableInput,
        );
        assert!(matches!(result, Err(Error::Flag(_))));

        let result = resolver.resolve(classify(args(&["pbpaste", "foo", "-host="])), UnreadableInput);
        assert!(matches!(result, Err(Error::Flag(_))));
    }

    #[test]
    fn test_input_read_failure_is_fatal() {
        let (_home, resolver) = resolver_with_config(None);
        let result = resolver.resolve(classify(args(&["lemonade", "copy"])), FailingReader);
        assert!(matches!(result, Err(Error::Stdin(_))));
    }

    #[test]
    fn test_input_decoded_lossily() {
        let (_home, resolver) = resolver_with_config(None);
        let config = resolver
            .resolve(classify(args(&["lemonade", "copy"])), Cursor::new(vec![b'o', b'k', 0xff]))
            .unwrap();
        assert!(config.data_source().starts_with("ok"));
    }

    #[test]
    fn test_allow_ranges() {
        let (_home, resolver) = resolver_with_config(None);
        let config = resolver
            .resolve(
                classify(args(&["lemonade", "server", "-allow", "10.0.0.0/8, ::1,"])),
                UnreadableInput,
            )
            .unwrap();
        assert_eq!(config.allow_ranges().collect::<Vec<_>>(), ["10.0.0.0/8", "::1"]);
    }

    #[test]
    fn test_log_filter() {
        let mut config = Configuration::default();
        assert_eq!(config.log_filter(), log::LevelFilter::Error);
        config.log_level = 3;
        assert_eq!(config.log_filter(), log::LevelFilter::Info);
        config.log_level = 9;
        assert_eq!(config.log_filter(), log::LevelFilter::Debug);
        config.log_level = -1;
        assert_eq!(config.log_filter(), log::LevelFilter::Off);
    }

    #[test]
    fn test_line_ending_parse() {
        assert_eq!("".parse::<LineEnding>(), Ok(LineEnding::None));
        assert_eq!("CRLF".parse::<LineEnding>(), Ok(LineEnding::Crlf));
        assert_eq!("lf".parse::<LineEnding>(), Ok(LineEnding::Lf));
        assert!("unix".parse::<LineEnding>().is_err());
    }

    #[test]
    fn test_line_ending_convert() {
        assert_eq!(LineEnding::Lf.convert("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(LineEnding::Cr.convert("a\r\nb\n"), "a\rb\r");
        assert_eq!(LineEnding::Crlf.convert("a\n\nb"), "a\r\n\r\nb");
    }
}
