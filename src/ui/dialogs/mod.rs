pub mod find_replace;
pub mod listening;

use std::cell::RefCell;
use std::rc::Rc;

use fltk::{app, prelude::*, window::Window};

/// Show `dialog` modally and pump events until it is hidden, then hand back
/// whatever its callbacks stored in `answer`.
///
/// The dialog is hidden early if the application starts quitting, so a
/// close of the main window never leaves a nested loop running.
pub fn run_modal<T>(dialog: &mut Window, answer: &Rc<RefCell<Option<T>>>) -> Option<T> {
    dialog.make_modal(true);
    dialog.show();

    while dialog.shown() {
        app::wait();
        if app::should_program_quit() {
            dialog.hide();
        }
    }

    answer.borrow_mut().take()
}
