//! Porter-style stemmer for Russian.
//!
//! Works on the raw UTF-8 bytes of an already-lowercased token. Words
//! shorter than four bytes pass through. Suffix removal is only allowed
//! strictly past RV, the region starting two bytes after the first vowel.
//! Tokens without Cyrillic vowels (Latin words, numbers) have RV equal to
//! the word length, so no suffix ever matches and they come back unchanged.

// Byte pairs of а е и о у ы э ю я ё.
fn is_vowel_at(bytes: &[u8], pos: usize) -> bool {
    if pos + 1 >= bytes.len() {
        return false;
    }
    match (bytes[pos], bytes[pos + 1]) {
        (0xD0, 0xB0) | (0xD0, 0xB5) | (0xD0, 0xB8) | (0xD0, 0xBE) => true,
        (0xD1, 0x83) | (0xD1, 0x8B) | (0xD1, 0x8D) | (0xD1, 0x8E) | (0xD1, 0x8F)
        | (0xD1, 0x91) => true,
        _ => false,
    }
}

fn rv_position(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i + 1 < bytes.len() {
        if is_vowel_at(bytes, i) {
            return i + 2;
        }
        i += 2;
    }
    bytes.len()
}

const PERFECTIVE_GERUND: &[&str] = &[
    "ившись", "ывшись", "вшись", "ивши", "ывши", "вши", "ив", "ыв", "в",
];

const REFLEXIVE: &[&str] = &["ся", "сь"];

const ADJECTIVAL: &[&str] = &[
    "ими", "ыми", "его", "ого", "ему", "ому", "ее", "ие", "ые", "ое", "ей", "ий", "ый", "ой",
    "ем", "им", "ым", "ом", "их", "ых", "ую", "юю", "ая", "яя", "ою", "ею",
];

const VERB: &[&str] = &[
    "ейте", "уйте", "ите", "йте", "ешь", "ете", "уют", "ют", "ат", "ят", "ны", "ен", "ть",
    "ишь", "ую", "ю", "ла", "на", "ли", "ло", "но", "ет", "й", "л", "н",
];

const NOUN: &[&str] = &[
    "иями", "ями", "ами", "ией", "иям", "ием", "иях", "ов", "ев", "ей", "ой", "ий", "ям",
    "ем", "ам", "ом", "ах", "ях", "ию", "ью", "ья", "ье", "ии", "и", "ы", "у", "о", "й",
    "а", "е", "я", "ь",
];

const SUPERLATIVE: &[&str] = &["ейше", "ейш"];

/// Remove the first listed suffix that fits strictly past RV. Tables are
/// ordered, longest match first within each semantic group.
fn strip_first(word: &mut String, rv: usize, suffixes: &[&str]) -> bool {
    for suffix in suffixes {
        if word.len() > rv + suffix.len() && word.ends_with(suffix) {
            word.truncate(word.len() - suffix.len());
            return true;
        }
    }
    false
}

fn step1(word: &mut String, rv: usize) {
    if strip_first(word, rv, PERFECTIVE_GERUND) {
        return;
    }
    strip_first(word, rv, REFLEXIVE);
    if strip_first(word, rv, ADJECTIVAL) {
        return;
    }
    if strip_first(word, rv, VERB) {
        return;
    }
    strip_first(word, rv, NOUN);
}

fn step2(word: &mut String, rv: usize) {
    strip_first(word, rv, &["и"]);
}

fn step3(word: &mut String, rv: usize) {
    strip_first(word, rv, &["ость", "ост"]);
}

// Double н loses one letter; a removed superlative retries that reduction.
fn step4(word: &mut String, rv: usize) {
    let nn = "нн";
    if word.len() > rv + nn.len() && word.ends_with(nn) {
        word.truncate(word.len() - 2);
        return;
    }
    if strip_first(word, rv, SUPERLATIVE) {
        if word.len() > rv + nn.len() && word.ends_with(nn) {
            word.truncate(word.len() - 2);
        }
        return;
    }
    strip_first(word, rv, &["ь"]);
}

pub fn stem(word: &str) -> String {
    if word.len() < 4 {
        return word.to_string();
    }
    let mut result = word.to_string();
    let rv = rv_position(result.as_bytes());
    step1(&mut result, rv);
    step2(&mut result, rv);
    step3(&mut result, rv);
    step4(&mut result, rv);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_words_pass_through() {
        assert_eq!(stem("я"), "я");
        assert_eq!(stem("он"), "он");
        assert_eq!(stem("cat"), "cat");
    }

    #[test]
    fn latin_words_unchanged() {
        assert_eq!(stem("running"), "running");
        assert_eq!(stem("search-engine"), "search-engine");
    }

    #[test]
    fn deterministic() {
        assert_eq!(stem("поэзия"), stem("поэзия"));
    }
}
