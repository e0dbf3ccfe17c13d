//! Handles all user-facing output for the CLI.
//!
//! Colour goes through `termcolor` so that the same writers serve terminals
//! and captured buffers in tests.

use std::io;

use difference::{Changeset, Difference};
use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::diagnostics::MacroDiagnostic;
use crate::macros::{ExpansionStep, MacroRegistry};

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints a macro expansion trace to the console with colored diffs.
pub fn print_trace(trace: &[ExpansionStep]) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    write_trace(&mut stdout, trace)
}

/// Writes each step as a line diff from invocation to replacement.
pub fn write_trace<W: WriteColor>(out: &mut W, trace: &[ExpansionStep]) -> io::Result<()> {
    for (i, step) in trace.iter().enumerate() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        writeln!(out, "--- Step {}: {} ({}) ---", i, step.macro_name, step.role)?;
        out.reset()?;
        let changeset = Changeset::new(&step.input, &step.output, "\n");
        write_diff(out, &changeset.diffs)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Lists registered macros, one per line.
pub fn write_macro_list<W: WriteColor>(out: &mut W, registry: &MacroRegistry) -> io::Result<()> {
    for (name, kind) in registry.entries() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(out, "{:<12}", name)?;
        out.reset()?;
        writeln!(out, " {:<10} {}", kind.role(), kind.description())?;
    }
    Ok(())
}

/// Renders every diagnostic to stderr through miette's graphical handler.
pub fn eprint_diagnostics(diagnostics: &[MacroDiagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{:?}", Report::new(diagnostic.clone()));
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn write_diff<W: WriteColor>(out: &mut W, diffs: &[Difference]) -> io::Result<()> {
    for diff in diffs {
        match diff {
            Difference::Same(x) => {
                out.reset()?;
                for line in x.lines() {
                    writeln!(out, " {}", line)?;
                }
            }
            Difference::Add(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                for line in x.lines() {
                    writeln!(out, "+{}", line)?;
                }
            }
            Difference::Rem(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                for line in x.lines() {
                    writeln!(out, "-{}", line)?;
                }
            }
        }
    }
    out.reset()
}

#[cfg(test)]
mod tests {
    use termcolor::Buffer;

    use super::*;
    use crate::macros::MacroRole;

    #[test]
    fn trace_shows_removed_and_added_lines() {
        let step = ExpansionStep {
            macro_name: "URL".into(),
            role: MacroRole::Expression,
            input: "#URL(\"https://a.b\")".into(),
            output: "URL(string: \"https://a.b\")!".into(),
        };
        let mut buffer = Buffer::no_color();
        write_trace(&mut buffer, &[step]).unwrap();
        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.starts_with("--- Step 0: URL (expression) ---\n"));
        assert!(text.contains("-#URL(\"https://a.b\")\n"));
        assert!(text.contains("+URL(string: \"https://a.b\")!\n"));
    }

    #[test]
    fn macro_list_has_every_name() {
        let mut buffer = Buffer::no_color();
        write_macro_list(&mut buffer, MacroRegistry::standard()).unwrap();
        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.lines().any(|l| l.starts_with("SlopeSubset") && l.contains("member")));
    }
}
