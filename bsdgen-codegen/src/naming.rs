//! Schema name to Rust identifier conversion.

/// Reserved words, strict and reserved for future use.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Local names used inside generated encode/decode bodies.
const RESERVED_LOCALS: &[&str] = &["stream", "size"];

/// Converts a schema name to snake_case.
///
/// Runs of capitals are treated as one word, so `ServerURI` becomes
/// `server_uri` and `HTTPServer` becomes `http_server`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }

        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if boundary && !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }

    while result.ends_with('_') {
        result.pop();
    }
    result
}

/// Converts a schema name to PascalCase.
///
/// Word separators are dropped and the letter after each is capitalized;
/// existing capitals are kept.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if !c.is_ascii_alphanumeric() {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Returns the identifier for a type or enum variant.
#[must_use]
pub fn type_ident(name: &str) -> String {
    let ident = to_pascal_case(name);
    if ident == "Self" {
        return format!("{ident}_");
    }
    escape_leading_digit(ident)
}

/// Returns the identifier for a field, local variable or module.
#[must_use]
pub fn field_ident(name: &str) -> String {
    let ident = to_snake_case(name);
    if KEYWORDS.contains(&ident.as_str()) || RESERVED_LOCALS.contains(&ident.as_str()) {
        return format!("{ident}_");
    }
    escape_leading_digit(ident)
}

fn escape_leading_digit(ident: String) -> String {
    match ident.chars().next() {
        None => "_unnamed".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{ident}"),
        Some(_) => ident,
    }
}
