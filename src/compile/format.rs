// src/compile/format.rs

//! Reflow expanded CSS into the `compact` style: one rule per line, with the
//! declarations on the selector's line.
//!
//! Only whitespace is rewritten. Strings and comments are copied verbatim,
//! so the set of rules and declarations is unchanged.

use std::iter::Peekable;
use std::str::Chars;

/// Reflow `css` (as produced by the expanded style) into compact form.
pub fn compact(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut depth: usize = 0;
    let mut chars = css.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => copy_string(c, &mut chars, &mut out),
            '/' if chars.peek() == Some(&'*') => copy_comment(&mut chars, &mut out),
            '{' => {
                depth += 1;
                out.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                out.push(c);
            }
            c if c.is_whitespace() => {
                let mut saw_newline = c == '\n';
                while let Some(&next) = chars.peek() {
                    if !next.is_whitespace() {
                        break;
                    }
                    saw_newline |= next == '\n';
                    chars.next();
                }
                let at_end = chars.peek().is_none();
                push_separator(&mut out, depth, saw_newline, at_end);
            }
            _ => out.push(c),
        }
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Replace a whitespace run. Top-level line breaks separate rules and are
/// kept, except inside a selector list; everything else becomes one space.
fn push_separator(out: &mut String, depth: usize, saw_newline: bool, at_end: bool) {
    if out.is_empty() || at_end {
        return;
    }
    if depth == 0 && saw_newline && !out.ends_with(',') {
        out.push('\n');
    } else {
        out.push(' ');
    }
}

fn copy_string(quote: char, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    out.push(quote);
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else if c == quote {
            return;
        }
    }
}

fn copy_comment(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    out.push('/');
    let mut prev = '/';
    // The opening '*' must not also count as the closing one.
    if let Some(star) = chars.next() {
        out.push(star);
    }
    for c in chars.by_ref() {
        out.push(c);
        if prev == '*' && c == '/' {
            return;
        }
        prev = c;
    }
}
