// Path: badger-core/src/install/launcher.rs
//! Desktop-launcher descriptor generation.

use std::path::Path;

use crate::probe::NO_SANDBOX_FLAG;

/// Characters stripped from display names used as filenames.
const UNSAFE_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const DEFAULT_FILENAME: &str = "Application";

/// Strips filesystem-unsafe characters; an empty result becomes `Application`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !UNSAFE_FILENAME_CHARS.contains(c))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Quotes one `Exec` argument: wrapped in double quotes with `"`, `` ` ``,
/// `$` and `\` backslash-escaped, and `%` doubled so it is not read as a
/// field code.
///
/// Value unescaping (`\\` to `\`) runs before Exec unquoting, so each
/// quoting backslash is itself written escaped: `$` becomes `\\$` and a
/// literal backslash becomes four.
pub fn quote_exec_arg(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        match c {
            '"' | '`' | '$' => {
                quoted.push_str("\\\\");
                quoted.push(c);
            }
            '\\' => quoted.push_str("\\\\\\\\"),
            '%' => quoted.push_str("%%"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Everything written into a launcher descriptor.
#[derive(Debug, Clone)]
pub struct LauncherEntry<'a> {
    pub name: &'a str,
    pub bundle_path: &'a Path,
    pub no_sandbox: bool,
    pub icon_name: &'a str,
    pub categories: &'a [String],
    pub comment: &'a str,
}

impl LauncherEntry<'_> {
    pub fn exec_line(&self) -> String {
        let mut exec = quote_exec_arg(&self.bundle_path.to_string_lossy());
        if self.no_sandbox {
            exec.push(' ');
            exec.push_str(NO_SANDBOX_FLAG);
        }
        exec
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            "[Desktop Entry]".to_string(),
            format!("Name={}", single_line(self.name)),
            format!("Exec={}", self.exec_line()),
            format!("Icon={}", single_line(self.icon_name)),
            "Type=Application".to_string(),
            "Terminal=false".to_string(),
        ];
        if !self.categories.is_empty() {
            lines.push(format!("Categories={};", self.categories.join(";")));
        }
        if !self.comment.is_empty() {
            lines.push(format!("Comment={}", single_line(self.comment)));
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
