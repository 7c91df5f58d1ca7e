use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    button::{Button, ReturnButton},
    enums::CallbackTrigger,
    frame::Frame,
    input::Input,
    prelude::*,
    window::Window,
};

use super::run_modal;

/// Ask for the find and replace strings. Returns `None` if the dialog is
/// cancelled or closed. An empty find string is returned as-is so the caller
/// can report it.
pub fn ask_find_replace() -> Option<(String, String)> {
    let mut dialog_win = Window::default()
        .with_size(400, 140)
        .with_label("Find & Replace")
        .center_screen();

    Frame::default().with_pos(20, 20).with_size(80, 30).with_label("Find what:");
    let mut find_input = Input::default().with_pos(110, 20).with_size(270, 30);

    Frame::default().with_pos(20, 60).with_size(80, 30).with_label("Replace:");
    let mut replace_input = Input::default().with_pos(110, 60).with_size(270, 30);

    let mut replace_all_btn = ReturnButton::default()
        .with_pos(180, 100).with_size(110, 30).with_label("Replace All");
    let mut cancel_btn = Button::default()
        .with_pos(300, 100).with_size(80, 30).with_label("Cancel");

    dialog_win.end();
    dialog_win.make_resizable(false);

    let answer: Rc<RefCell<Option<(String, String)>>> = Rc::new(RefCell::new(None));

    let result = answer.clone();
    let find_ok = find_input.clone();
    let replace_ok = replace_input.clone();
    let dialog_ok = dialog_win.clone();
    replace_all_btn.set_callback(move |_| {
        *result.borrow_mut() = Some((find_ok.value(), replace_ok.value()));
        dialog_ok.clone().hide();
    });

    // Enter in either field submits
    for input in [&mut find_input, &mut replace_input] {
        let mut submit = replace_all_btn.clone();
        input.set_trigger(CallbackTrigger::EnterKey);
        input.set_callback(move |_| submit.do_callback());
    }

    let dialog_close = dialog_win.clone();
    cancel_btn.set_callback(move |_| {
        dialog_close.clone().hide();
    });

    let dialog_x = dialog_win.clone();
    dialog_win.set_callback(move |_| {
        dialog_x.clone().hide();
    });

    run_modal(&mut dialog_win, &answer)
}
