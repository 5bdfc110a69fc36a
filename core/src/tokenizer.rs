//! UTF-8 word splitter with Latin/Cyrillic case folding.
//!
//! Letters are ASCII `A-Z`/`a-z` and the two-byte Cyrillic range (`А..=я`
//! plus `Ё`/`ё`); digits and `-` extend a token without being able to start
//! one on their own (the validity filter rejects letterless candidates).
//! Everything else separates. Positions are byte offsets into the source.

/// A lowercase surface form plus the byte offset of its first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub position: usize,
}

fn is_cyrillic(ch: char) -> bool {
    ('А'..='я').contains(&ch) || ch == 'Ё' || ch == 'ё'
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || is_cyrillic(ch)
}

fn fold_char(ch: char) -> char {
    match ch {
        'A'..='Z' => (ch as u8 + 0x20) as char,
        'А'..='Я' => char::from_u32(ch as u32 + 0x20).unwrap_or(ch),
        'Ё' => 'ё',
        _ => ch,
    }
}

/// Lowercase ASCII and Cyrillic, leave everything else alone. The mapping is
/// byte-length preserving, so offsets into the folded text line up with the
/// original.
pub fn fold_lower(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

/// A candidate becomes a token only with at least two characters and at
/// least one letter; any multibyte character counts as a letter here.
fn is_valid_token(token: &str) -> bool {
    let mut chars = 0usize;
    let mut has_letter = false;
    for ch in token.chars() {
        chars += 1;
        if ch.is_ascii_alphabetic() || !ch.is_ascii() {
            has_letter = true;
        }
    }
    chars >= 2 && has_letter
}

pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut start: Option<usize> = None;

    fn flush(buf: &mut String, start: usize, tokens: &mut Vec<Token>) {
        let folded = fold_lower(buf);
        if is_valid_token(&folded) {
            tokens.push(Token {
                text: folded,
                position: start,
            });
        }
        buf.clear();
    }

    for (pos, ch) in text.char_indices() {
        if is_word_char(ch) {
            if start.is_none() {
                start = Some(pos);
            }
            buf.push(ch);
        } else if let Some(s) = start.take() {
            flush(&mut buf, s, &mut tokens);
        }
    }
    if let Some(s) = start {
        flush(&mut buf, s, &mut tokens);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_folds() {
        let toks = tokenize("Русский ЯЗЫК и Rust");
        let words: Vec<&str> = toks.iter().map(|t| t.text.as_str()).collect();
        // "и" is a single character and is filtered out.
        assert_eq!(words, vec!["русский", "язык", "rust"]);
    }

    #[test]
    fn folds_yo() {
        let toks = tokenize("Ёлка");
        assert_eq!(toks[0].text, "ёлка");
    }
}
