//! Rendering of match results into human-readable diagnostic strings.
//!
//! A [`Path`] is a chain of CBOR values from the matched root down to the
//! matched leaf. [`format_path`]/[`format_paths`] render one value per line,
//! indented by nesting depth; [`format_paths_with_captures`] additionally
//! renders the named captures collected alongside a match, sorted
//! lexicographically by name.

use std::collections::HashMap;

use dcbor::prelude::*;

use crate::Path;

/// How an individual CBOR value within a path is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathElementFormat {
    /// A single-line summary (`CBOR::diagnostic_flat`), optionally truncated
    /// to `max_length` bytes with a trailing `"…"`.
    Summary(Option<usize>),
    /// The full multi-line diagnostic-notation rendering
    /// (`CBOR::diagnostic`), optionally truncated to `max_length` bytes.
    Diagnostic(Option<usize>),
}

impl Default for PathElementFormat {
    fn default() -> Self { PathElementFormat::Summary(None) }
}

/// Options controlling [`format_path_opt`] / [`format_paths_opt`].
#[derive(Debug, Clone)]
pub struct FormatPathsOpts {
    indent: bool,
    element_format: PathElementFormat,
    last_element_only: bool,
}

impl Default for FormatPathsOpts {
    /// `indent: true`, `element_format: Summary(None)`,
    /// `last_element_only: false`.
    fn default() -> Self {
        Self {
            indent: true,
            element_format: PathElementFormat::default(),
            last_element_only: false,
        }
    }
}

impl FormatPathsOpts {
    pub fn new() -> Self { Self::default() }

    /// Indent each path element by `4 * depth` spaces. Default `true`.
    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    /// How each CBOR value is rendered. Default
    /// `PathElementFormat::Summary(None)`.
    pub fn element_format(mut self, format: PathElementFormat) -> Self {
        self.element_format = format;
        self
    }

    /// Render only the final value of each path, unindented. Default
    /// `false`.
    pub fn last_element_only(mut self, last_element_only: bool) -> Self {
        self.last_element_only = last_element_only;
        self
    }
}

impl AsRef<FormatPathsOpts> for FormatPathsOpts {
    fn as_ref(&self) -> &FormatPathsOpts { self }
}

fn truncate_with_ellipsis(s: &str, max_length: Option<usize>) -> String {
    match max_length {
        Some(max_len) if s.len() > max_len => {
            if max_len > 1 {
                // Find the largest prefix of complete characters whose byte
                // length still leaves room for the ellipsis.
                let cut = s
                    .char_indices()
                    .map(|(i, c)| i + c.len_utf8())
                    .take_while(|&end| end <= max_len - 1)
                    .last()
                    .unwrap_or(0);
                format!("{}…", &s[0..cut])
            } else {
                "…".to_string()
            }
        }
        _ => s.to_string(),
    }
}

fn render_element(cbor: &CBOR, format: PathElementFormat) -> String {
    match format {
        PathElementFormat::Summary(max_length) => {
            truncate_with_ellipsis(&cbor.diagnostic_flat(), max_length)
        }
        PathElementFormat::Diagnostic(max_length) => {
            truncate_with_ellipsis(&cbor.diagnostic(), max_length)
        }
    }
}

/// Render one path, one CBOR value per line, each successively indented by
/// 4 spaces (unless `opts.last_element_only()`, in which case only the final
/// value is rendered, unindented).
pub fn format_path_opt(
    path: &Path,
    opts: impl AsRef<FormatPathsOpts>,
) -> String {
    let opts = opts.as_ref();

    if opts.last_element_only {
        match path.last() {
            Some(element) => render_element(element, opts.element_format),
            None => String::new(),
        }
    } else {
        path.iter()
            .enumerate()
            .map(|(index, element)| {
                let indent = if opts.indent {
                    " ".repeat(index * 4)
                } else {
                    String::new()
                };
                format!("{}{}", indent, render_element(element, opts.element_format))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// [`format_path_opt`] with default options.
pub fn format_path(path: &Path) -> String {
    format_path_opt(path, FormatPathsOpts::default())
}

/// Render every path in `paths`, each separated by a blank line.
pub fn format_paths_opt(
    paths: &[Path],
    opts: impl AsRef<FormatPathsOpts>,
) -> String {
    let opts = opts.as_ref();
    paths
        .iter()
        .map(|path| format_path_opt(path, opts))
        .collect::<Vec<_>>()
        .join("\n")
}

/// [`format_paths_opt`] with default options.
pub fn format_paths(paths: &[Path]) -> String {
    format_paths_opt(paths, FormatPathsOpts::default())
}

/// Render captures (sorted lexicographically by name, each captured path
/// preceded by `@<name>` and indented four spaces) followed by the plain
/// match paths.
pub fn format_paths_with_captures(
    paths: &[Path],
    captures: &HashMap<String, Vec<Path>>,
    opts: impl AsRef<FormatPathsOpts>,
) -> String {
    let opts = opts.as_ref();
    let mut lines = Vec::new();

    let mut names: Vec<&String> = captures.keys().collect();
    names.sort();
    for name in names {
        lines.push(format!("@{}", name));
        for path in &captures[name] {
            let rendered = format_path_opt(path, opts);
            for line in rendered.lines() {
                lines.push(format!("    {}", line));
            }
        }
    }

    for path in paths {
        lines.push(format_path_opt(path, opts));
    }

    lines.join("\n")
}
