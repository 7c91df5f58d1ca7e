//! FLTK front end: widgets, dialogs and the `UiHost` implementation.

pub mod buffers;
pub mod dialogs;
pub mod file_dialogs;
pub mod host;
pub mod main_window;
pub mod menu;
pub mod tab_bar;
pub mod theme;
