//! Field-level parsing shared by the source adapters
//!
//! Catalogues pack several facts into one string; these helpers pull
//! them apart the same way for every source.

/// Split an ISBD title statement `"Title / Author ; Translator"`
///
/// Returns `(title, author)`; author is empty when the statement has no
/// ` / ` part.
pub fn split_title_statement(statement: &str) -> (String, String) {
    let mut parts = statement.splitn(2, " / ");
    let title = parts.next().unwrap_or_default().trim().to_string();
    let author = parts
        .next()
        .map(|rest| rest.split(" ; ").next().unwrap_or_default().trim().to_string())
        .unwrap_or_default();
    (title, author)
}

/// Publisher name from an imprint `"City : Publisher , year"`
///
/// Takes the second ` : ` segment (the whole string if absent), cuts at the
/// first `,` and drops square brackets.
pub fn publisher_from_imprint(imprint: &str) -> String {
    let after_place = imprint.split(" : ").nth(1).unwrap_or(imprint);
    let name = after_place.split(',').next().unwrap_or_default();
    strip_brackets(name)
}

/// Publisher name from `"Publisher (City)"`
pub fn strip_trailing_place(value: &str) -> String {
    let trimmed = value.trim();
    let name = match (trimmed.ends_with(')'), trimmed.rfind(" (")) {
        (true, Some(pos)) => &trimmed[..pos],
        _ => trimmed,
    };
    strip_brackets(name)
}

/// Person name from a catalogue heading
///
/// `"Gliori, Debi (1959-....). Auteur du texte"` → `"Gliori, Debi"`
pub fn clean_creator(heading: &str) -> String {
    let heading = heading.trim();
    let name = heading
        .find(" (")
        .map(|pos| &heading[..pos])
        .or_else(|| heading.find(". ").map(|pos| &heading[..pos]))
        .unwrap_or(heading);
    name.trim().trim_end_matches('.').trim().to_string()
}

/// Upgrade `http://` links to `https://`
pub fn https_upgrade(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

fn strip_brackets(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '[' | ']'))
        .collect::<String>()
        .trim()
        .to_string()
}
