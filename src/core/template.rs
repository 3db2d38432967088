//! Ordinal placeholder substitution for message templates
//!
//! Templates use `{}` placeholders filled from positional arguments in
//! order; `{{` and `}}` escape literal braces. Substitution only runs on the
//! enabled dispatch path, so a filtered-out call never pays for it.

use super::error::{LogError, Result};
use super::field::FieldValue;

/// Count the `{}` placeholders in a template, validating brace syntax.
fn placeholder_count(template: &str) -> Result<usize> {
    let mut count = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => match chars.peek() {
                Some('{') => {
                    chars.next();
                }
                Some('}') => {
                    chars.next();
                    count += 1;
                }
                _ => {
                    return Err(LogError::template(
                        template,
                        "unmatched '{' (use '{{' for a literal brace)",
                    ));
                }
            },
            '}' => match chars.peek() {
                Some('}') => {
                    chars.next();
                }
                _ => {
                    return Err(LogError::template(
                        template,
                        "unmatched '}' (use '}}' for a literal brace)",
                    ));
                }
            },
            _ => {}
        }
    }

    Ok(count)
}

/// Substitute positional arguments into `template`.
///
/// A count mismatch in either direction is an error that propagates to the
/// caller; it is never downgraded to a log line.
pub fn render(template: &str, args: &[FieldValue]) -> Result<String> {
    let expected = placeholder_count(template)?;
    if expected != args.len() {
        return Err(LogError::TemplateArity {
            template: template.to_string(),
            expected,
            given: args.len(),
        });
    }

    let mut out = String::with_capacity(template.len() + 16);
    let mut next_arg = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                } else {
                    // placeholder_count guarantees this is "{}"
                    chars.next();
                    if let Some(value) = next_arg.next() {
                        out.push_str(&value.to_string());
                    }
                }
            }
            '}' => {
                chars.next();
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
