//! Shell completions command implementation.
//!
//! Generate shell completions for bash, zsh, fish, and powershell.

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};

use crate::cli::{Cli, Shell};

impl From<&Shell> for ClapShell {
    fn from(shell: &Shell) -> Self {
        match shell {
            Shell::Bash => ClapShell::Bash,
            Shell::Zsh => ClapShell::Zsh,
            Shell::Fish => ClapShell::Fish,
            Shell::Powershell => ClapShell::PowerShell,
        }
    }
}

/// Writes completions for `shell` to `out`.
pub fn write_completions(shell: &Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(ClapShell::from(shell), &mut cmd, "sv", out);
}

/// Generate shell completions for the given shell and write to stdout.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn execute(shell: &Shell) -> io::Result<()> {
    let mut stdout = io::stdout();
    write_completions(shell, &mut stdout);
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_mapping() {
        assert!(matches!(ClapShell::from(&Shell::Bash), ClapShell::Bash));
        assert!(matches!(ClapShell::from(&Shell::Zsh), ClapShell::Zsh));
        assert!(matches!(ClapShell::from(&Shell::Fish), ClapShell::Fish));
        assert!(matches!(
            ClapShell::from(&Shell::Powershell),
            ClapShell::PowerShell
        ));
    }

    #[test]
    fn test_completions_mention_subcommands() {
        let mut buf = Vec::new();
        write_completions(&Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("sv"));
        assert!(script.contains("compile"));
    }
}
