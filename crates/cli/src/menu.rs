//! Interactive step menu.
//!
//! The loop is generic over its input and output so tests can drive it
//! with scripted answers. Export is delegated to the caller, which owns
//! the output path and the column layout.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crossterm::{
    cursor::MoveTo,
    terminal::{Clear, ClearType},
    tty::IsTty,
    ExecutableCommand,
};
use platelunch_dedup::{Session, Step};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    RunAll,
    Only(Step),
    Export,
}

impl Choice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "" => Some(Self::RunAll),
            "1" => Some(Self::Only(Step::Links)),
            "2" => Some(Self::Only(Step::Dedup)),
            "3" => Some(Self::Only(Step::Phones)),
            "0" => Some(Self::Export),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuExit {
    /// Results were written to this path.
    Exported(PathBuf),
    /// Input ended before an export.
    Closed,
}

fn print_menu<W: Write>(out: &mut W, output: &Path) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "What would you like to do?")?;
    writeln!(out, "[Press Enter] Run all smart functions")?;
    writeln!(out, "[1] Generate Instagram links only")?;
    writeln!(out, "[2] Remove duplicates only")?;
    writeln!(out, "[3] Improve phone number formatting only")?;
    writeln!(
        out,
        "[0] Export results to {} (requires at least one action)",
        output.display()
    )?;
    write!(out, "> ")?;
    out.flush()
}

/// Run the menu until the user exports or input ends.
pub fn run<R, W, F>(
    session: &mut Session,
    mut input: R,
    out: &mut W,
    output: &Path,
    mut export: F,
) -> Result<MenuExit, CliError>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Session) -> Result<PathBuf, CliError>,
{
    let mut line = String::new();
    loop {
        print_menu(out, output)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            tracing::debug!("menu input closed");
            return Ok(MenuExit::Closed);
        }

        match Choice::parse(&line) {
            Some(Choice::RunAll) => {
                for report in session.run_all() {
                    writeln!(out, "{report}")?;
                }
            }
            Some(Choice::Only(step)) => {
                let report = session.apply(step);
                writeln!(out, "{report}")?;
            }
            Some(Choice::Export) if session.has_run() => {
                let path = export(session)?;
                writeln!(out, "✔ Output written to {}", path.display())?;
                return Ok(MenuExit::Exported(path));
            }
            Some(Choice::Export) => {
                writeln!(out, "⚠ You must perform at least one action before exporting.")?;
            }
            None => writeln!(out, "Invalid option. Try again.")?,
        }
    }
}

/// Clear the terminal before the first menu; no-op when stdout is redirected.
pub fn clear_screen() -> io::Result<()> {
    let mut stdout = io::stdout();
    if stdout.is_tty() {
        stdout.execute(Clear(ClearType::All))?.execute(MoveTo(0, 0))?;
    }
    Ok(())
}
