//! Embedded command extraction from documentation lines.
//!
//! A documentation line embeds a renderable example as a markdown image link
//! whose alt text carries the renderer's command line and whose target names
//! the generated artifact:
//!
//! ```text
//! ![dcc_tiler_cli --single --scale 4 3 1](img/Example_3_1.svg)
//! ```
//!
//! [`ScanPattern`] compiles the link template for a tool name and extracts
//! every `(options, filename)` pair from a line.

use std::sync::LazyLock;

use regex::Regex;

use crate::consts::{DEFAULT_TOOL_NAME, SINGLE_FLAG};

/// One embedded command recovered from a documentation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedCommand {
    /// Renderer options, verbatim from the link text (may contain spaces).
    pub options: String,
    /// Bare artifact name, without directory or extension.
    pub filename: String,
}

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(DEFAULT_TOOL_NAME));

/// Build the link-template regex for a tool name.
fn compile(tool: &str) -> Regex {
    let template = format!(
        r"!\[{} {SINGLE_FLAG} (.*?)\]\(img/(.*?)\.svg\)",
        regex::escape(tool)
    );
    // The tool name is escaped, so the template always compiles.
    Regex::new(&template).expect("link template with escaped tool name")
}

/// Compiled matcher for embedded command links.
///
/// The template is fixed, only the tool name varies:
/// `![<tool> --single <options>](img/<filename>.svg)`. Both captures are
/// non-greedy: `<options>` stops at the `]` closing the link text and
/// `<filename>` at the `.svg)` closing the link target.
#[derive(Debug, Clone)]
pub struct ScanPattern {
    regex: Regex,
}

impl Default for ScanPattern {
    /// Pattern for the default tool name (`dcc_tiler_cli`).
    fn default() -> Self {
        Self {
            regex: DEFAULT_PATTERN.clone(),
        }
    }
}

impl ScanPattern {
    /// Compile the link template for the given tool name.
    #[must_use]
    pub fn for_tool(tool: &str) -> Self {
        Self {
            regex: compile(tool),
        }
    }

    /// Extract every embedded command from a single line, left to right.
    ///
    /// Matches are non-overlapping, each starting after the previous match's
    /// end. A line without the pattern yields an empty iterator; the scan
    /// carries no state across lines.
    pub fn commands<'a>(&'a self, line: &'a str) -> impl Iterator<Item = EmbeddedCommand> + 'a {
        self.regex.captures_iter(line).map(|caps| EmbeddedCommand {
            options: caps[1].to_owned(),
            filename: caps[2].to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scan(line: &str) -> Vec<EmbeddedCommand> {
        ScanPattern::default().commands(line).collect()
    }

    #[test]
    fn test_extracts_options_and_filename() {
        let commands = scan("![dcc_tiler_cli --single --scale 4 3 1](img/Example_3_1.svg)");

        assert_eq!(
            commands,
            vec![EmbeddedCommand {
                options: "--scale 4 3 1".to_owned(),
                filename: "Example_3_1".to_owned(),
            }]
        );
    }

    #[test]
    fn test_match_embedded_in_prose() {
        let line = "A 3x1 L-tiling: ![dcc_tiler_cli --single --board LBoard 3 1](img/L_3_1.svg) as shown.";
        let commands = scan(line);

        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].options, "--board LBoard 3 1");
        assert_eq!(commands[0].filename, "L_3_1");
    }

    #[test]
    fn test_plain_prose_yields_nothing() {
        assert_eq!(scan("This paragraph has no embedded examples."), vec![]);
        assert_eq!(scan(""), vec![]);
    }

    #[test]
    fn test_ordinary_image_link_yields_nothing() {
        // An image link without the tool invocation in its alt text.
        assert_eq!(scan("![screenshot](img/screenshot.svg)"), vec![]);
    }

    #[test]
    fn test_wrong_tool_name_yields_nothing() {
        assert_eq!(scan("![other_cli --single --scale 2](img/x.svg)"), vec![]);
    }

    #[test]
    fn test_two_matches_on_one_line_in_order() {
        let line = "![dcc_tiler_cli --single --a 1](img/first.svg) and ![dcc_tiler_cli --single --b 2](img/second.svg)";
        let commands = scan(line);

        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].options, "--a 1");
        assert_eq!(commands[0].filename, "first");
        assert_eq!(commands[1].options, "--b 2");
        assert_eq!(commands[1].filename, "second");
    }

    #[test]
    fn test_captures_stop_at_link_delimiters() {
        let line = "![dcc_tiler_cli --single --scale 2](img/a.svg)](img/b.svg)";
        let commands = scan(line);

        // Non-greedy captures end at the first closing delimiters.
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].options, "--scale 2");
        assert_eq!(commands[0].filename, "a");
        assert!(!commands[0].options.contains(']'));
        assert!(!commands[0].filename.contains('/'));
    }

    #[test]
    fn test_custom_tool_name() {
        let pattern = ScanPattern::for_tool("toolname");
        let commands: Vec<_> = pattern
            .commands("![toolname --single --scale 4 3 1](img/Example_3_1.svg)")
            .collect();

        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].options, "--scale 4 3 1");
        assert_eq!(commands[0].filename, "Example_3_1");
    }

    #[test]
    fn test_tool_name_with_regex_metacharacters_is_literal() {
        let pattern = ScanPattern::for_tool("render.cli");
        assert_eq!(
            pattern
                .commands("![render.cli --single -x](img/a.svg)")
                .count(),
            1
        );
        // The dot must not match an arbitrary character.
        assert_eq!(
            pattern
                .commands("![renderXcli --single -x](img/a.svg)")
                .count(),
            0
        );
    }
}
