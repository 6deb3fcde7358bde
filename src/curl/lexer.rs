use crate::error::DescriptorError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Splits a shell-style command line into words.
///
/// Single quotes are literal, double quotes honour `\"`, `\\`, `\$` and
/// `` \` ``, a bare backslash escapes the next character and a
/// backslash-newline pair joins lines.
///
/// # Errors
///
/// Returns an error on an unterminated quote or a trailing backslash.
pub fn split_words(input: &str) -> Result<Vec<String>, DescriptorError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote = Quote::None;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match quote {
            Quote::Single => {
                if ch == '\'' {
                    quote = Quote::None;
                } else {
                    current.push(ch);
                }
            }
            Quote::Double => match ch {
                '"' => quote = Quote::None,
                '\\' => match chars.next() {
                    Some(next @ ('"' | '\\' | '$' | '`')) => current.push(next),
                    Some('\n') => {}
                    Some(next) => {
                        current.push('\\');
                        current.push(next);
                    }
                    None => return Err(DescriptorError::UnterminatedQuote { quote: '"' }),
                },
                other => current.push(other),
            },
            Quote::None => match ch {
                '\'' => {
                    quote = Quote::Single;
                    in_word = true;
                }
                '"' => {
                    quote = Quote::Double;
                    in_word = true;
                }
                '\\' => match chars.next() {
                    Some('\n') => {}
                    Some('\r') if chars.peek() == Some(&'\n') => {
                        chars.next();
                    }
                    Some(next) => {
                        current.push(next);
                        in_word = true;
                    }
                    None => return Err(DescriptorError::TrailingEscape),
                },
                other if other.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                other => {
                    current.push(other);
                    in_word = true;
                }
            },
        }
    }

    match quote {
        Quote::Single => Err(DescriptorError::UnterminatedQuote { quote: '\'' }),
        Quote::Double => Err(DescriptorError::UnterminatedQuote { quote: '"' }),
        Quote::None => {
            if in_word {
                words.push(current);
            }
            Ok(words)
        }
    }
}
