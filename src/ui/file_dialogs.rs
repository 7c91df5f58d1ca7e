use std::path::{Path, PathBuf};

use fltk::dialog::{FileDialogOptions, FileDialogType, NativeFileChooser};

use crate::app::services::file_filters::text_files_filter;

fn run_chooser(mut nfc: NativeFileChooser, title: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
    nfc.set_title(title);
    nfc.set_filter(&text_files_filter());
    if let Some(dir) = start_dir
        && let Err(e) = nfc.set_directory(&dir)
    {
        log::debug!("cannot start file dialog in {}: {:?}", dir.display(), e);
    }

    nfc.show();
    let path = nfc.filename();
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

pub fn native_open_dialog(start_dir: Option<&Path>) -> Option<PathBuf> {
    run_chooser(NativeFileChooser::new(FileDialogType::BrowseFile), "Open File", start_dir)
}

pub fn native_save_dialog(start_dir: Option<&Path>) -> Option<PathBuf> {
    let mut nfc = NativeFileChooser::new(FileDialogType::BrowseSaveFile);
    nfc.set_option(FileDialogOptions::SaveAsConfirm);
    run_chooser(nfc, "Save As", start_dir)
}
