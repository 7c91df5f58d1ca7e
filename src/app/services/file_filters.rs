/// Filter string for open/save dialogs.
///
/// FLTK format: "Description\tPattern\nDescription2\tPattern2".
/// Filters are advisory; "All Files" is always offered.
pub fn text_files_filter() -> String {
    [
        "Text Files\t*.txt",
        "Python Files\t*.py",
        "Rust Files\t*.rs",
        "Markdown Files\t*.{md,markdown}",
        "All Files\t*",
    ]
    .join("\n")
}

/// Extension added by Save As when the chosen name has none
pub const DEFAULT_EXTENSION: &str = "txt";

/// Append the default extension when the user typed a bare name.
pub fn with_default_extension(path: std::path::PathBuf) -> std::path::PathBuf {
    if path.extension().is_some() || path.file_name().is_none() {
        path
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}
