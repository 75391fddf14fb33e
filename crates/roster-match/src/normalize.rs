//! Text normalization shared by the matching rules.

/// Normalizes a name for comparison.
///
/// Lowercases, turns separators (`-`, `_`, `/`, `.`) into spaces, drops other
/// punctuation such as apostrophes, and collapses whitespace.
pub fn normalize_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            cleaned.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || matches!(ch, '-' | '_' | '/' | '.' | ',') {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A normalized name with the spaces removed.
pub fn compact(normalized: &str) -> String {
    normalized.chars().filter(|c| !c.is_whitespace()).collect()
}

/// First character of every token.
pub fn initials(normalized: &str) -> String {
    normalized
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .collect()
}

fn soundex_code(ch: char) -> Option<char> {
    match ch {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        'a' | 'e' | 'i' | 'o' | 'u' | 'y' => Some('0'),
        // h and w neither code nor separate
        _ => None,
    }
}

/// American Soundex code of one word, e.g. `robert` -> `R163`.
pub fn soundex(word: &str) -> String {
    let mut letters = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase());
    let Some(first) = letters.next() else {
        return String::new();
    };
    let mut out = String::with_capacity(4);
    out.push(first.to_ascii_uppercase());
    let mut last = soundex_code(first);
    for ch in letters {
        match soundex_code(ch) {
            None => {}
            Some('0') => last = Some('0'),
            Some(code) => {
                if last != Some(code) {
                    out.push(code);
                    if out.len() == 4 {
                        break;
                    }
                }
                last = Some(code);
            }
        }
    }
    while out.len() < 4 {
        out.push('0');
    }
    out
}

/// Soundex of every token of a normalized name, space separated.
pub fn phonetic_key(normalized: &str) -> String {
    normalized
        .split_whitespace()
        .map(soundex)
        .filter(|code| !code.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
