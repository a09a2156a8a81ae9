//! Minimal line-based shader preprocessor
//!
//! Understands `#version`, `#define NAME`, `#ifdef`, `#ifndef`, `#else` and
//! `#endif`. Directive lines (and lines in inactive blocks) become empty lines so
//! compiler diagnostics keep pointing at the original line numbers.

use hashbrown::HashSet;

use super::error::PreprocessError;

/// Output of [`preprocess`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessedSource {
    /// Argument of the `#version` directive, if any
    pub version: Option<String>,
    pub source: String,
}

struct Conditional {
    /// This block's own condition
    taken: bool,
    /// Every enclosing block is active
    parent_active: bool,
    seen_else: bool,
    line: usize,
}

impl Conditional {
    fn active(&self) -> bool {
        self.parent_active && self.taken
    }
}

pub fn preprocess(text: &str) -> Result<PreprocessedSource, PreprocessError> {
    let mut defines: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Conditional> = Vec::new();
    let mut version = None;
    let mut source = String::with_capacity(text.len());

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let active = stack.last().is_none_or(Conditional::active);
        let trimmed = raw_line.trim_start();

        let Some(directive_text) = trimmed.strip_prefix('#') else {
            if active {
                source.push_str(raw_line);
            }
            source.push('\n');
            continue;
        };

        let mut parts = directive_text.split_whitespace();
        let directive = parts.next().unwrap_or("");
        let argument = parts.next();

        match directive {
            "ifdef" | "ifndef" => {
                let name = argument.ok_or(PreprocessError::MissingArgument {
                    directive: "ifdef/ifndef",
                    line: line_number,
                })?;
                let defined = defines.contains(name);
                stack.push(Conditional {
                    taken: if directive == "ifdef" { defined } else { !defined },
                    parent_active: active,
                    seen_else: false,
                    line: line_number,
                });
            }
            "else" => {
                let block = stack
                    .last_mut()
                    .ok_or(PreprocessError::UnmatchedDirective {
                        directive: "else",
                        line: line_number,
                    })?;
                if block.seen_else {
                    return Err(PreprocessError::UnmatchedDirective {
                        directive: "else",
                        line: line_number,
                    });
                }
                block.seen_else = true;
                block.taken = !block.taken;
            }
            "endif" => {
                stack.pop().ok_or(PreprocessError::UnmatchedDirective {
                    directive: "endif",
                    line: line_number,
                })?;
            }
            "define" if active => {
                let name = argument.ok_or(PreprocessError::MissingArgument {
                    directive: "define",
                    line: line_number,
                })?;
                defines.insert(name);
            }
            "version" if active => {
                version = argument.map(str::to_string);
            }
            "define" | "version" => {}
            _ => {
                return Err(PreprocessError::UnknownDirective {
                    directive: directive.to_string(),
                    line: line_number,
                });
            }
        }
        source.push('\n');
    }

    if let Some(open) = stack.last() {
        return Err(PreprocessError::UnterminatedConditional { line: open.line });
    }

    Ok(PreprocessedSource { version, source })
}
