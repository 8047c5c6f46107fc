//! `airtree completions` - shell completion scripts and install notes.

use std::io;

use clap::Command;
use clap_complete::generate;
use colored::Colorize;
use serde::Serialize;

pub use clap_complete::Shell;

use crate::output::{Output, OutputConfig, OutputFormat, TableDisplay};

const BIN_NAME: &str = "airtree";

/// Where to put the generated script for one shell.
#[derive(Debug, Serialize)]
pub struct CompletionInstructions {
    pub shell: String,
    pub instructions: Vec<String>,
}

impl TableDisplay for CompletionInstructions {
    fn to_table(&self, _config: &OutputConfig) -> String {
        let mut output = format!(
            "{} completions for {}\n\n{}\n",
            BIN_NAME.cyan().bold(),
            self.shell.yellow(),
            "Installation:".cyan().bold()
        );
        for line in &self.instructions {
            output.push_str(&format!("  {}\n", line));
        }
        output
    }
}

fn get_instructions(shell: Shell) -> Vec<String> {
    let generate = format!("{} completions {}", BIN_NAME, shell);
    match shell {
        Shell::Bash => vec![
            "# ~/.bashrc".to_string(),
            format!("eval \"$({})\"", generate),
        ],
        Shell::Zsh => vec![
            "# a directory on $fpath, before compinit runs".to_string(),
            format!("{} > ~/.zfunc/_{}", generate, BIN_NAME),
        ],
        Shell::Fish => vec![format!(
            "{} > ~/.config/fish/completions/{}.fish",
            generate, BIN_NAME
        )],
        Shell::PowerShell => vec![
            "# $PROFILE".to_string(),
            format!("Invoke-Expression (& {} | Out-String)", generate),
        ],
        Shell::Elvish => vec![
            "# ~/.config/elvish/rc.elv".to_string(),
            format!("eval ({} | slurp)", generate),
        ],
        _ => vec![format!("{} > <completion dir>", generate)],
    }
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn io::Write) {
    generate(shell, cmd, BIN_NAME, out);
}

pub fn run(
    shell: Shell,
    show_instructions: bool,
    cmd: &mut Command,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if !show_instructions {
        write_completions(shell, cmd, &mut io::stdout());
        return Ok(());
    }

    let instructions = CompletionInstructions {
        shell: shell.to_string(),
        instructions: get_instructions(shell),
    };
    Output::new(instructions, format).render()
}
