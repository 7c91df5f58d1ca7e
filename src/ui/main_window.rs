use fltk::{
    app::Sender,
    enums::{Align, FrameType},
    frame::Frame,
    group::Flex,
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor, WrapMode},
    window::Window,
};

use crate::app::domain::messages::Message;
use crate::app::domain::settings::AppSettings;
use crate::app::domain::theme::Palette;
use super::tab_bar::{TabBar, TAB_BAR_HEIGHT};

pub const STATUS_BAR_HEIGHT: i32 = 24;

pub struct MainWidgets {
    pub wind: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub tab_bar: TabBar,
    pub text_editor: TextEditor,
    pub status_bar: Frame,
}

pub fn build_main_window(sender: &Sender<Message>, settings: &AppSettings, palette: Palette) -> MainWidgets {
    let mut wind = Window::new(100, 100, 800, 600, "Untitled - QuillPad");
    wind.set_xclass("QuillPad");

    let mut flex = Flex::new(0, 0, 800, 600, None);
    flex.set_type(fltk::group::FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, 30, "");
    flex.fixed(&menu, 30);

    let tab_bar = TabBar::new(0, 30, 800, *sender, palette);
    flex.fixed(&tab_bar.widget, TAB_BAR_HEIGHT);

    let mut text_editor = TextEditor::new(0, 0, 0, 0, "");
    text_editor.set_buffer(TextBuffer::default());
    text_editor.set_text_size(settings.font_size as i32);
    if settings.word_wrap_enabled {
        text_editor.wrap_mode(WrapMode::AtBounds, 0);
    }

    let mut status_bar = Frame::default();
    status_bar.set_frame(FrameType::FlatBox);
    status_bar.set_align(Align::Left | Align::Inside);
    status_bar.set_label_size(12);
    status_bar.set_label("Words: 0 | Characters: 0");
    flex.fixed(&status_bar, STATUS_BAR_HEIGHT);

    flex.end();
    wind.resizable(&flex);

    MainWidgets {
        wind,
        flex,
        menu,
        tab_bar,
        text_editor,
        status_bar,
    }
}
