use std::path::Path;

/// Returns the lower-cased, dotted extension of `path` (`".pdf"`), or an
/// empty string when there is none.
///
/// Dotfiles such as `.gitignore` have no extension.
pub fn extension_of(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_lowercase()),
        _ => String::new(),
    }
}

/// Normalises a user-supplied extension (`"PDF"`, `".pdf"`) to the stored
/// dotted, lower-cased form.
pub fn dotted(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.').to_lowercase();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(".{}", trimmed)
    }
}
