//! QuillPad: a small tabbed notepad.
//!
//! The `app` module holds everything that can run without a display: documents,
//! tabs, commands and the voice/spell-check services. The `ui` module is the FLTK
//! front end that implements [`app::UiHost`] on top of real widgets.

pub mod app;
pub mod ui;
