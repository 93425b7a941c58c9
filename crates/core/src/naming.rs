//! Download filename convention for edited images.
//!
//! The edited image is always delivered as PNG, so the download keeps the
//! original base name and swaps the extension.

/// Extension of every edited image, without the dot.
pub const RESULT_EXTENSION: &str = "png";

/// Used when the source has no usable name at all.
pub const DEFAULT_DOWNLOAD_NAME: &str = "edited-product-image.png";

/// Derive the download filename for an edited image.
///
/// Convention: everything before the last `.` of the source name, plus
/// `.png`. A name without a dot keeps its full text as the base.
///
/// # Examples
///
/// ```
/// use prodshot_core::naming::download_filename;
///
/// assert_eq!(download_filename("widget.jpg"), "widget.png");
/// assert_eq!(download_filename("part"), "part.png");
/// assert_eq!(download_filename("brake.lever.webp"), "brake.lever.png");
/// ```
pub fn download_filename(source_name: &str) -> String {
    if source_name.is_empty() {
        return DEFAULT_DOWNLOAD_NAME.to_string();
    }

    let base = match source_name.rfind('.') {
        Some(dot) => &source_name[..dot],
        None => source_name,
    };

    format!("{base}.{RESULT_EXTENSION}")
}

/// Insert a numeric suffix before the extension: `part.png` + 2 → `part-2.png`.
///
/// Used to avoid overwriting an earlier download with the same name.
pub fn numbered_filename(filename: &str, n: u32) -> String {
    match filename.rfind('.') {
        Some(dot) if dot > 0 => format!("{}-{n}{}", &filename[..dot], &filename[dot..]),
        _ => format!("{filename}-{n}"),
    }
}
