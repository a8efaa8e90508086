// Storage keys and content types for uploaded photos

use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 10;

/// Fresh storage key: a random UUID plus the photo's extension.
///
/// The extension comes from the original filename (text after the last `.`),
/// falling back to one known for the content type. With neither, the key is the
/// bare UUID with no trailing dot.
pub fn storage_key(file_name: Option<&str>, content_type: &str) -> String {
    let id = Uuid::new_v4();
    match file_name
        .and_then(file_extension)
        .or_else(|| extension_for_content_type(content_type))
    {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

/// Lowercased extension of `file_name`, if it has a usable one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn extension_for_content_type(content_type: &str) -> Option<String> {
    let parsed: mime::Mime = content_type.parse().ok()?;
    let common = match parsed.essence_str() {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    };
    common
        .or_else(|| {
            mime_guess::get_mime_extensions_str(parsed.essence_str())
                .and_then(|exts| exts.first().copied())
        })
        .map(str::to_string)
}

/// Content type to store the photo with: the declared one if it parses,
/// else a guess from the filename, else `application/octet-stream`.
pub fn resolve_content_type(declared: Option<&str>, file_name: Option<&str>) -> String {
    declared
        .map(str::trim)
        .filter(|ct| ct.parse::<mime::Mime>().is_ok())
        .map(str::to_string)
        .or_else(|| {
            file_name
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|m| m.essence_str().to_string())
        })
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string())
}
