use fltk::{
    app::Sender,
    button::Button,
    frame::Frame,
    prelude::*,
    window::Window,
};

use crate::app::domain::messages::Message;

/// Non-blocking "Listening..." window shown while voice capture runs.
///
/// Cancel and the close box both send `Message::VoiceCancel`; the window is
/// hidden by the host once the capture reports back.
pub struct ListeningDialog {
    window: Window,
}

impl ListeningDialog {
    pub fn new(sender: Sender<Message>) -> Self {
        let mut window = Window::default()
            .with_size(260, 100)
            .with_label("Voice to Text")
            .center_screen();

        Frame::default()
            .with_pos(20, 15)
            .with_size(220, 30)
            .with_label("Listening... speak now");
        let mut cancel_btn = Button::default()
            .with_pos(90, 55)
            .with_size(80, 30)
            .with_label("Cancel");

        window.end();
        window.make_resizable(false);

        cancel_btn.set_callback(move |_| sender.send(Message::VoiceCancel));
        window.set_callback(move |_| sender.send(Message::VoiceCancel));

        Self { window }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible && !self.window.shown() {
            self.window.show();
        } else if !visible && self.window.shown() {
            self.window.hide();
        }
    }
}
