//! Environment variable name derivation

/// Separator between levels of a hierarchical name
pub const PATH_SEPARATOR: char = '/';

/// Key for a value stored under a hierarchical `name`
///
/// Takes the segment after the last `/` (the whole name when there is none)
/// and upper-cases its ASCII letters.
///
/// ```
/// use awsenvsec_core::normalize::key_from_path;
///
/// assert_eq!(key_from_path("product/dev/DB_password"), "DB_PASSWORD");
/// assert_eq!(key_from_path("api_token"), "API_TOKEN");
/// ```
pub fn key_from_path(name: &str) -> String {
    let leaf = match name.rfind(PATH_SEPARATOR) {
        Some(idx) => &name[idx + PATH_SEPARATOR.len_utf8()..],
        None => name,
    };
    leaf.to_ascii_uppercase()
}

/// Key for a top-level field of a structured value
///
/// The field name is used on its own; the path of the secret holding it
/// plays no part.
pub fn key_from_field(field: &str) -> String {
    field.to_ascii_uppercase()
}
