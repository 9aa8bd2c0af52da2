use clap::CommandFactory;
use lemonade_core::flags::Flags;

const HEADER: &str = "Usage: lemonade [options]... SUB_COMMAND [arg]
Sub Commands:
  open [URL]                  Open URL by browser
  copy [text]                 Copy text.
  paste                       Paste text.
  server                      Start lemonade server.

Aliases:
  xdg-open, pbcopy, pbpaste   Run as open, copy or paste when invoked under that name.

Options:";

/// Usage text listing subcommands and every flag with its help line.
#[must_use]
pub fn usage() -> String {
    let command = Flags::command();
    let mut text = HEADER.to_string();

    for arg in command.get_arguments() {
        let Some(long) = arg.get_long() else {
            continue;
        };
        let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
        text.push_str(&format!("\n  -{long:<26}{help}"));
    }
    text.push('\n');

    text
}
