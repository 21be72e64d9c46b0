//! Slug generation
//!
//! `slugify` is pure; uniqueness is enforced by the `UNIQUE` index and
//! surfaces as [`super::TaxonomyError::DuplicateSlug`], never by suffixing.

/// Cyrillic letters allowed through the first filtering pass
fn is_permitted_cyrillic(c: char) -> bool {
    ('а'..='я').contains(&c) || matches!(c, 'ё' | 'є' | 'і' | 'ї' | 'ґ')
}

/// Latin replacement for a lower-case Cyrillic letter or apostrophe
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "h",
        'ґ' => "g",
        'д' => "d",
        'е' => "e",
        'є' => "ye",
        'ж' => "zh",
        'з' => "z",
        'и' => "y",
        'і' => "i",
        'ї' => "yi",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        // Russian-only letters
        'ё' => "yo",
        'ъ' => "",
        'ы' => "y",
        'э' => "e",
        '\'' | '’' | 'ʼ' => "",
        _ => return None,
    };
    Some(latin)
}

/// Filter, collapse separators and trim hyphens
///
/// Keeps ASCII letters and digits, plus permitted Cyrillic letters when
/// `allow_cyrillic` is set. Runs of whitespace, `_` and `-` become one `-`.
fn normalize(lower: &str, allow_cyrillic: bool) -> String {
    let mut out = String::with_capacity(lower.len());
    let mut pending_separator = false;

    for c in lower.chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
            continue;
        }
        let keep = c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || (allow_cyrillic && is_permitted_cyrillic(c));
        if !keep {
            // Stripped characters do not break a separator run
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push('-');
        }
        pending_separator = false;
        out.push(c);
    }

    out
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

/// Derive a URL-safe slug from a display name
///
/// The first pass keeps permitted Cyrillic letters; when anything outside
/// `[a-z0-9-]` survives it (or nothing survives at all) the lower-cased name
/// is transliterated letter by letter and filtered again, Latin only.
///
/// The result always matches `[a-z0-9-]*` and may be empty.
///
/// ```
/// use admin_server::taxonomy::slugify;
///
/// assert_eq!(slugify("Smart Phones"), "smart-phones");
/// assert_eq!(slugify("Електроніка"), "elektronika");
/// ```
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();

    let first = normalize(&lower, true);
    if !first.is_empty() && first.chars().all(is_slug_char) {
        return first;
    }

    let mut transliterated = String::with_capacity(lower.len() * 2);
    for c in lower.chars() {
        match transliterate(c) {
            Some(latin) => transliterated.push_str(latin),
            None => transliterated.push(c),
        }
    }

    normalize(&transliterated, false)
}
