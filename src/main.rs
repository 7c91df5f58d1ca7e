#![cfg_attr(all(target_os = "windows", not(debug_assertions)), windows_subsystem = "windows")]

use std::sync::Arc;

use fltk::{app, enums::Event, prelude::*};

use quill_pad::app::infrastructure::microphone::CpalMicrophone;
use quill_pad::app::services::speech::GoogleTranscriber;
use quill_pad::app::{AppSettings, CommandTable, EditorState, Message, VoiceService};
use quill_pad::ui::host::FltkHost;
use quill_pad::ui::main_window::build_main_window;
use quill_pad::ui::menu::build_menu;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = AppSettings::load();
    let app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let voice = VoiceService::new(
        Arc::new(CpalMicrophone::new(settings.speech.listen_policy())),
        Arc::new(GoogleTranscriber::from_settings(&settings.speech)),
    );
    let mut state = EditorState::new(settings, voice);

    let mut widgets = build_main_window(&sender, &state.settings, state.theme.palette());
    build_menu(&mut widgets.menu, &sender, state.theme.is_dark());

    widgets.wind.set_callback(move |_| {
        if app::event() == Event::Close {
            sender.send(Message::WindowClose);
        }
    });
    widgets.wind.end();
    widgets.wind.show();

    let mut host = FltkHost::new(widgets, sender);
    host.sync(&state);
    let commands = CommandTable::standard();

    log::info!("QuillPad {} started", env!("CARGO_PKG_VERSION"));

    while app.wait() {
        if let Some(msg) = receiver.recv() {
            state.handle_message(msg, &commands, &mut host);
            if state.is_quit_requested() {
                break;
            }
            host.sync(&state);
        }
    }
}
