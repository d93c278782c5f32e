//! Structural syntax scan for Python source.
//!
//! A lightweight static check standing in for a full parser: it tracks
//! bracket nesting, string termination (including triple-quoted strings),
//! and block headers that end in `:` without an indented body. Line numbers
//! are 1-based, matching how Python itself reports syntax errors.

use std::fmt;

/// A structural syntax problem found in a code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// 1-based line number where the problem was detected.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syntax error at line {}: {}", self.line, self.message)
    }
}

/// State carried across lines while inside a triple-quoted string.
struct OpenTriple {
    quote: char,
    start_line: usize,
}

/// Scan Python source for structural syntax problems.
///
/// Returns the first problem found, or `Ok(())` when the source passes.
/// This intentionally checks structure only (brackets, strings, indented
/// blocks); it does not attempt grammar-level validation.
pub fn check_syntax(code: &str) -> Result<(), SyntaxIssue> {
    let mut brackets: Vec<(char, usize)> = Vec::new();
    let mut triple: Option<OpenTriple> = None;
    // Set when a bracket-depth-zero logical line ends with ':'.
    let mut block_header: Option<(usize, usize)> = None; // (line, indent)

    for (idx, line) in code.lines().enumerate() {
        let line_no = idx + 1;
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;

        // Resume an open triple-quoted string.
        if let Some(open) = &triple {
            match find_triple_close(&chars, 0, open.quote) {
                Some(end) => {
                    i = end;
                    triple = None;
                }
                None => continue,
            }
        }

        let mut in_string: Option<char> = None;
        let mut last_code_char: Option<char> = None;

        while i < chars.len() {
            let c = chars[i];

            if let Some(quote) = in_string {
                if c == '\\' {
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                continue;
            }

            match c {
                '#' => break,
                '\'' | '"' => {
                    if i + 2 < chars.len() && chars[i + 1] == c && chars[i + 2] == c {
                        match find_triple_close(&chars, i + 3, c) {
                            Some(end) => {
                                i = end;
                                last_code_char = Some(c);
                                continue;
                            }
                            None => {
                                triple = Some(OpenTriple {
                                    quote: c,
                                    start_line: line_no,
                                });
                                break;
                            }
                        }
                    }
                    in_string = Some(c);
                }
                '(' | '[' | '{' => brackets.push((c, line_no)),
                ')' | ']' | '}' => {
                    let expected = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match brackets.pop() {
                        Some((open, _)) if open == expected => {}
                        _ => {
                            return Err(SyntaxIssue {
                                line: line_no,
                                message: format!("unmatched '{c}'"),
                            });
                        }
                    }
                }
                _ => {}
            }

            if !c.is_whitespace() {
                last_code_char = Some(c);
            }
            i += 1;
        }

        if in_string.is_some() {
            // A \ immediately before the newline continues the string.
            if chars.last() != Some(&'\\') {
                return Err(SyntaxIssue {
                    line: line_no,
                    message: "unterminated string literal".to_string(),
                });
            }
            continue;
        }

        let indent = indent_width(line);
        let is_blank = last_code_char.is_none() && triple.is_none();

        if !is_blank {
            if let Some((header_line, header_indent)) = block_header {
                if indent <= header_indent {
                    return Err(SyntaxIssue {
                        line: line_no,
                        message: format!("expected an indented block after line {header_line}"),
                    });
                }
                block_header = None;
            }
            if last_code_char == Some(':') && brackets.is_empty() && triple.is_none() {
                block_header = Some((line_no, indent));
            }
        }
    }

    if let Some(open) = triple {
        return Err(SyntaxIssue {
            line: open.start_line,
            message: "unterminated triple-quoted string literal".to_string(),
        });
    }
    if let Some((open, line)) = brackets.first() {
        return Err(SyntaxIssue {
            line: *line,
            message: format!("'{open}' was never closed"),
        });
    }
    if let Some((header_line, _)) = block_header {
        return Err(SyntaxIssue {
            line: header_line,
            message: format!("expected an indented block after line {header_line}"),
        });
    }

    Ok(())
}

/// Find the index just past a closing triple quote, starting at `from`.
fn find_triple_close(chars: &[char], from: usize, quote: char) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '\\' {
            i += 2;
            continue;
        }
        if chars[i] == quote
            && chars.get(i + 1) == Some(&quote)
            && chars.get(i + 2) == Some(&quote)
        {
            return Some(i + 3);
        }
        i += 1;
    }
    None
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}
