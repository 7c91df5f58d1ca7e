use fltk::{
    enums::Color,
    frame::Frame,
    menu::MenuBar,
    prelude::*,
    text::TextEditor,
    window::Window,
};

use crate::app::domain::theme::{Rgb, ThemeState};

pub fn to_color(rgb: Rgb) -> Color {
    Color::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Map the theme palette onto every widget of the main window.
pub fn apply_theme(
    editor: &mut TextEditor,
    window: &mut Window,
    menu: &mut MenuBar,
    status: &mut Frame,
    theme: ThemeState,
) {
    let p = theme.palette();

    editor.set_color(to_color(p.background));
    editor.set_text_color(to_color(p.foreground));
    editor.set_cursor_color(to_color(p.cursor));
    editor.set_selection_color(to_color(p.selection));

    window.set_color(to_color(p.chrome));
    window.set_label_color(to_color(p.chrome_text));

    menu.set_color(to_color(p.chrome));
    menu.set_text_color(to_color(p.chrome_text));
    menu.set_selection_color(to_color(p.chrome_hover)); // Hover color

    status.set_color(to_color(p.chrome));
    status.set_label_color(to_color(p.chrome_text));

    editor.redraw();
    window.redraw();
    menu.redraw();
    status.redraw();
}

/// Set Windows title bar theme (Windows 10 build 1809+)
/// Must be called AFTER window.show() to have a valid HWND
#[cfg(target_os = "windows")]
pub fn set_windows_titlebar_theme(window: &Window, is_dark: bool) {
    use std::mem::size_of;
    use std::ptr::from_ref;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Dwm::{DwmSetWindowAttribute, DWMWINDOWATTRIBUTE};

    let on: i32 = if is_dark { 1 } else { 0 };

    // 20 on Windows 11 / Windows 10 2004+, 19 before that
    for attribute in [20, 19] {
        unsafe {
            let hwnd = HWND(window.raw_handle() as *mut std::ffi::c_void);
            let _ = DwmSetWindowAttribute(
                hwnd,
                DWMWINDOWATTRIBUTE(attribute),
                from_ref(&on).cast(),
                size_of::<i32>() as u32,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_color_keeps_channels() {
        assert_eq!(to_color(Rgb(0x2b, 0x2b, 0x2b)).to_rgb(), (0x2b, 0x2b, 0x2b));
        assert_eq!(to_color(Rgb::WHITE).to_rgb(), (255, 255, 255));
    }
}
