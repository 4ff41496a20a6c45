use std::ffi::{OsStr, OsString};

use thiserror::Error;

/// Failures while splitting a remote-shell specification into words.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RemoteShellParseError {
    /// The specification contained no words.
    #[error("remote shell specification is empty")]
    Empty,
    /// A quote was opened but never closed.
    #[error("unterminated {0} quote in remote shell specification")]
    UnterminatedQuote(char),
    /// A trailing backslash escaped nothing.
    #[error("dangling backslash in remote shell specification")]
    DanglingEscape,
    /// The specification is not valid UTF-8.
    #[error("remote shell specification is not valid UTF-8")]
    NotUnicode,
}

/// Splits `spec` into words using POSIX shell quoting rules.
///
/// Single quotes preserve everything literally, double quotes honour
/// backslash escapes of `"`, `\`, `$` and `` ` ``, and an unquoted backslash
/// escapes the next character. Quoted empty strings survive as empty words.
pub fn parse_remote_shell(spec: &OsStr) -> Result<Vec<OsString>, RemoteShellParseError> {
    let text = spec.to_str().ok_or(RemoteShellParseError::NotUnicode)?;

    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(inner) => current.push(inner),
                        None => return Err(RemoteShellParseError::UnterminatedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\' | '$' | '`')) => current.push(escaped),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(RemoteShellParseError::UnterminatedQuote('"')),
                        },
                        Some(inner) => current.push(inner),
                        None => return Err(RemoteShellParseError::UnterminatedQuote('"')),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next().ok_or(RemoteShellParseError::DanglingEscape)?);
            }
            ch if ch.is_whitespace() => {
                if in_word {
                    words.push(OsString::from(std::mem::take(&mut current)));
                    in_word = false;
                }
            }
            ch => {
                in_word = true;
                current.push(ch);
            }
        }
    }

    if in_word {
        words.push(OsString::from(current));
    }
    if words.is_empty() {
        return Err(RemoteShellParseError::Empty);
    }
    Ok(words)
}
