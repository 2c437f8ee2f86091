//! Language derivation
//!
//! Sources either name the language (ISO 639-1, ISO 639-2 or a lexvo URI)
//! or say nothing, in which case the ISBN registration group gives the
//! language area. Unknown stays `None`.

use crate::isbn::Isbn13;

/// ISO 639-1 codes
const ISO639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az",
    "ba", "be", "bg", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch",
    "co", "cr", "cs", "cu", "cv", "cy", "da", "de", "dv", "dz", "ee", "el",
    "en", "eo", "es", "et", "eu", "fa", "ff", "fi", "fj", "fo", "fr", "fy",
    "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr", "ht",
    "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it",
    "iu", "ja", "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko",
    "kr", "ks", "ku", "kv", "kw", "ky", "la", "lb", "lg", "li", "ln", "lo",
    "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml", "mn", "mr", "ms", "mt",
    "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv", "ny",
    "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm",
    "rn", "ro", "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl",
    "sm", "sn", "so", "sq", "sr", "ss", "st", "su", "sv", "sw", "ta", "te",
    "tg", "th", "ti", "tk", "tl", "tn", "to", "tr", "ts", "tt", "tw", "ty",
    "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi", "yo",
    "za", "zh", "zu",
];

/// ISO 639-2 (bibliographic and terminology) → ISO 639-1
const ISO639_2: &[(&str, &str)] = &[
    ("ara", "ar"),
    ("baq", "eu"),
    ("bre", "br"),
    ("bul", "bg"),
    ("cat", "ca"),
    ("ces", "cs"),
    ("chi", "zh"),
    ("cze", "cs"),
    ("dan", "da"),
    ("deu", "de"),
    ("dut", "nl"),
    ("ell", "el"),
    ("eng", "en"),
    ("eus", "eu"),
    ("fin", "fi"),
    ("fra", "fr"),
    ("fre", "fr"),
    ("ger", "de"),
    ("gre", "el"),
    ("heb", "he"),
    ("hun", "hu"),
    ("ita", "it"),
    ("jpn", "ja"),
    ("kor", "ko"),
    ("lat", "la"),
    ("nld", "nl"),
    ("nor", "no"),
    ("oci", "oc"),
    ("pol", "pl"),
    ("por", "pt"),
    ("ron", "ro"),
    ("rum", "ro"),
    ("rus", "ru"),
    ("spa", "es"),
    ("swe", "sv"),
    ("tur", "tr"),
    ("ukr", "uk"),
    ("vie", "vi"),
    ("zho", "zh"),
];

/// ISBN registration groups (digits after the EAN prefix) → language area.
/// Longest prefix wins.
const REGISTRATION_GROUPS: &[(&str, &str)] = &[
    // 978
    ("9780", "en"),
    ("9781", "en"),
    ("9782", "fr"),
    ("9783", "de"),
    ("9784", "ja"),
    ("9785", "ru"),
    ("9787", "zh"),
    ("978600", "fa"),
    ("978601", "kk"),
    ("978602", "id"),
    ("978603", "ar"),
    ("978604", "vi"),
    ("978605", "tr"),
    ("978606", "ro"),
    ("978607", "es"),
    ("978608", "mk"),
    ("978609", "lt"),
    ("978612", "es"),
    ("978614", "ar"),
    ("978616", "th"),
    ("978617", "uk"),
    ("978618", "el"),
    ("978619", "bg"),
    ("978622", "fa"),
    ("978623", "id"),
    ("978625", "tr"),
    ("978626", "zh"),
    ("97865", "pt"),
    ("97880", "cs"),
    ("97882", "no"),
    ("97883", "pl"),
    ("97884", "es"),
    ("97885", "pt"),
    ("97887", "da"),
    ("97888", "it"),
    ("97889", "ko"),
    ("97890", "nl"),
    ("97891", "sv"),
    ("97894", "nl"),
    ("978950", "es"),
    ("978951", "fi"),
    ("978952", "fi"),
    ("978953", "hr"),
    ("978954", "bg"),
    ("978956", "es"),
    ("978958", "es"),
    ("978960", "el"),
    ("978961", "sl"),
    ("978963", "hu"),
    ("978965", "he"),
    ("978968", "es"),
    ("978970", "es"),
    ("978972", "pt"),
    ("978973", "ro"),
    ("978975", "tr"),
    ("978979", "id"),
    ("978980", "es"),
    ("978985", "be"),
    ("978987", "es"),
    // 979
    ("9798", "en"),
    ("97910", "fr"),
    ("97911", "ko"),
    ("97912", "it"),
];

/// Map an explicit language hint to a 2-letter code
///
/// Accepts `"fr"`, `"fr-CA"`, `"fre"`, `"FRA"` and lexvo URIs such as
/// `http://lexvo.org/id/iso639-3/fra`.
pub fn from_code(hint: &str) -> Option<String> {
    let hint = hint.trim();
    let code = hint
        .rsplit('/')
        .next()
        .unwrap_or(hint)
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if !code.chars().all(|c| c.is_ascii_lowercase()) {
        return None;
    }

    match code.len() {
        2 => ISO639_1.contains(&code.as_str()).then_some(code),
        3 => ISO639_2
            .iter()
            .find(|(three, _)| *three == code)
            .map(|(_, two)| two.to_string()),
        _ => None,
    }
}

/// Language area of the ISBN's registration group
pub fn from_isbn(isbn: &Isbn13) -> Option<String> {
    let digits = isbn.digits();
    REGISTRATION_GROUPS
        .iter()
        .filter(|(prefix, _)| digits.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, lang)| lang.to_string())
}

/// Explicit hint first, ISBN group second
pub fn derive(hint: Option<&str>, isbn: &Isbn13) -> Option<String> {
    hint.and_then(from_code).or_else(|| from_isbn(isbn))
}
