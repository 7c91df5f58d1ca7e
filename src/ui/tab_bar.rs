use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    draw,
    enums::{Align, Color, Event, Font},
    prelude::*,
    widget::Widget,
};

use crate::app::commands::CommandId;
use crate::app::domain::document::{Document, DocumentId};
use crate::app::domain::messages::Message;
use crate::app::domain::theme::Palette;

use super::theme::to_color;

pub const TAB_BAR_HEIGHT: i32 = 30;

const MIN_TAB_WIDTH: i32 = 60;
const MAX_TAB_WIDTH: i32 = 200;
const CLOSE_BTN_SIZE: i32 = 14;
const CLOSE_BTN_MARGIN: i32 = 6;
const TAB_H_PADDING: i32 = 10;
const CORNER_RADIUS: i32 = 6;
const TAB_GAP: i32 = 1;
const PLUS_BTN_WIDTH: i32 = 28;
const PLUS_BTN_MARGIN: i32 = 4;

struct TabInfo {
    id: DocumentId,
    display_name: String,
    is_dirty: bool,
    is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TabSlot {
    x: i32,
    width: i32,
}

#[derive(Debug, PartialEq)]
struct Layout {
    tabs: Vec<TabSlot>,
    plus_x: i32,
}

#[derive(Debug, PartialEq)]
enum HitResult {
    Tab { index: usize, is_close: bool },
    PlusButton,
    None,
}

struct TabBarState {
    tabs: Vec<TabInfo>,
    layout: Layout,
    palette: Palette,
    hover_tab_index: Option<usize>,
    hover_close: bool,
    hover_plus: bool,
    sender: Sender<Message>,
}

/// Custom-drawn tab strip: one tab per document, a close button on each,
/// and a "+" button that opens a new tab.
pub struct TabBar {
    pub widget: Widget,
    state: Rc<RefCell<TabBarState>>,
}

impl TabBar {
    pub fn new(x: i32, y: i32, w: i32, sender: Sender<Message>, palette: Palette) -> Self {
        let state = Rc::new(RefCell::new(TabBarState {
            tabs: Vec::new(),
            layout: compute_layout(0, w),
            palette,
            hover_tab_index: None,
            hover_close: false,
            hover_plus: false,
            sender,
        }));

        let mut widget = Widget::new(x, y, w, TAB_BAR_HEIGHT, None);

        let draw_state = state.clone();
        widget.draw(move |wid| {
            let st = draw_state.borrow();
            draw_tab_bar(wid, &st);
        });

        let handle_state = state.clone();
        widget.handle(move |wid, event| handle_tab_bar(wid, event, &handle_state));

        Self { widget, state }
    }

    pub fn rebuild(&mut self, documents: &[Document], active_id: DocumentId, palette: Palette) {
        let mut st = self.state.borrow_mut();
        st.palette = palette;
        st.tabs = documents
            .iter()
            .map(|doc| TabInfo {
                id: doc.id,
                display_name: doc.display_name.clone(),
                is_dirty: doc.is_dirty(),
                is_active: doc.id == active_id,
            })
            .collect();
        st.hover_tab_index = None;
        st.hover_close = false;
        st.layout = compute_layout(st.tabs.len(), self.widget.w());
        drop(st);
        self.widget.redraw();
    }
}

// --- Layout ---

fn compute_layout(tab_count: usize, widget_w: i32) -> Layout {
    let count = tab_count as i32;
    if count == 0 {
        return Layout {
            tabs: Vec::new(),
            plus_x: PLUS_BTN_MARGIN,
        };
    }

    let fixed = PLUS_BTN_WIDTH + PLUS_BTN_MARGIN + TAB_GAP * (count - 1);
    let tab_width = ((widget_w - fixed) / count).clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH);

    let tabs: Vec<TabSlot> = (0..count)
        .map(|i| TabSlot {
            x: i * (tab_width + TAB_GAP),
            width: tab_width,
        })
        .collect();
    let plus_x = count * (tab_width + TAB_GAP) + PLUS_BTN_MARGIN;
    Layout { tabs, plus_x }
}

/// `mx` is relative to the widget; `my` and `wy` are window coordinates.
fn hit_test(layout: &Layout, wy: i32, mx: i32, my: i32) -> HitResult {
    if my < wy || my >= wy + TAB_BAR_HEIGHT {
        return HitResult::None;
    }

    for (index, slot) in layout.tabs.iter().enumerate() {
        if mx >= slot.x && mx < slot.x + slot.width {
            let close_x = slot.x + slot.width - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE;
            let close_y = wy + (TAB_BAR_HEIGHT - CLOSE_BTN_SIZE) / 2;
            let is_close = mx >= close_x
                && mx <= close_x + CLOSE_BTN_SIZE
                && my >= close_y
                && my <= close_y + CLOSE_BTN_SIZE;
            return HitResult::Tab { index, is_close };
        }
    }

    if mx >= layout.plus_x && mx < layout.plus_x + PLUS_BTN_WIDTH {
        return HitResult::PlusButton;
    }
    HitResult::None
}

// --- Drawing ---

fn truncate_to_fit(text: &str, max_width: i32) -> String {
    if max_width <= 0 {
        return String::new();
    }
    draw::set_font(Font::Helvetica, 12);
    let (tw, _) = draw::measure(text, true);
    if tw <= max_width {
        return text.to_string();
    }
    let ellipsis = "...";
    let chars: Vec<char> = text.chars().collect();
    for len in (1..chars.len()).rev() {
        let candidate: String = chars[..len].iter().collect();
        let full = format!("{candidate}{ellipsis}");
        let (fw, _) = draw::measure(&full, true);
        if fw <= max_width {
            return full;
        }
    }
    ellipsis.to_string()
}

fn draw_rounded_top_rect(x: i32, y: i32, w: i32, h: i32, r: i32, color: Color) {
    draw::set_draw_color(color);
    draw::draw_rectf(x, y + r, w, h - r);
    draw::draw_rectf(x + r, y, w - 2 * r, r);
    draw::draw_pie(x, y, 2 * r, 2 * r, 90.0, 180.0);
    draw::draw_pie(x + w - 2 * r, y, 2 * r, 2 * r, 0.0, 90.0);
}

fn draw_tab_bar(wid: &Widget, st: &TabBarState) {
    let wx = wid.x();
    let wy = wid.y();
    let wh = wid.h();
    let p = st.palette;

    let bar_bg = to_color(p.chrome);
    let active_bg = to_color(p.background);
    let inactive_bg = to_color(p.chrome_hover);
    let active_text = to_color(p.foreground);
    let inactive_text = to_color(p.chrome_text);

    draw::set_draw_color(bar_bg);
    draw::draw_rectf(wx, wy, wid.w(), wh);

    for (index, (tab, slot)) in st.tabs.iter().zip(&st.layout.tabs).enumerate() {
        let tx = wx + slot.x;
        if tab.is_active {
            draw_rounded_top_rect(tx, wy, slot.width, wh, CORNER_RADIUS, active_bg);
        } else {
            draw_rounded_top_rect(tx, wy + 2, slot.width, wh - 2, CORNER_RADIUS, inactive_bg);
        }

        let text_color = if tab.is_active { active_text } else { inactive_text };
        let label = if tab.is_dirty {
            format!("\u{25cf} {}", tab.display_name)
        } else {
            tab.display_name.clone()
        };
        let text_area = slot.width - TAB_H_PADDING - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE - TAB_H_PADDING;
        let display_text = truncate_to_fit(&label, text_area);
        draw::set_draw_color(text_color);
        draw::set_font(Font::Helvetica, 12);
        draw::draw_text(&display_text, tx + TAB_H_PADDING, wy + (wh + 12) / 2);

        let close_x = tx + slot.width - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE;
        let close_y = wy + (wh - CLOSE_BTN_SIZE) / 2;
        if st.hover_tab_index == Some(index) && st.hover_close {
            draw::set_draw_color(bar_bg);
            draw::draw_rectf(close_x - 2, close_y - 2, CLOSE_BTN_SIZE + 4, CLOSE_BTN_SIZE + 4);
        }
        draw::set_draw_color(text_color);
        draw::set_font(Font::HelveticaBold, 20);
        draw::draw_text2("\u{00d7}", close_x, close_y, CLOSE_BTN_SIZE, CLOSE_BTN_SIZE, Align::Center);
    }

    let px = wx + st.layout.plus_x;
    let plus_bg = if st.hover_plus { inactive_bg } else { bar_bg };
    draw_rounded_top_rect(px, wy + 2, PLUS_BTN_WIDTH, wh - 4, CORNER_RADIUS, plus_bg);
    draw::set_draw_color(if st.hover_plus { active_text } else { inactive_text });
    draw::set_font(Font::HelveticaBold, 16);
    draw::draw_text2("+", px, wy + 2, PLUS_BTN_WIDTH, wh - 4, Align::Center);
}

// --- Event handling ---

fn handle_tab_bar(wid: &mut Widget, event: Event, state: &Rc<RefCell<TabBarState>>) -> bool {
    match event {
        Event::Push => {
            let st = state.borrow();
            let mx = fltk::app::event_x() - wid.x();
            let my = fltk::app::event_y();
            let button = fltk::app::event_button();
            let sender = st.sender;

            let msg = match hit_test(&st.layout, wid.y(), mx, my) {
                HitResult::PlusButton if button == 1 => Some(Message::Command(CommandId::New)),
                HitResult::Tab { index, is_close } => {
                    let id = st.tabs[index].id;
                    // Middle click closes, like browsers
                    if is_close || button == 2 {
                        Some(Message::TabClose(id))
                    } else if button == 1 {
                        Some(Message::TabSwitch(id))
                    } else {
                        None
                    }
                }
                _ => None,
            };
            drop(st);

            match msg {
                Some(msg) => {
                    sender.send(msg);
                    true
                }
                None => false,
            }
        }
        Event::Move => {
            let mut st = state.borrow_mut();
            let mx = fltk::app::event_x() - wid.x();
            let my = fltk::app::event_y();

            let (hover, close, plus) = match hit_test(&st.layout, wid.y(), mx, my) {
                HitResult::Tab { index, is_close } => (Some(index), is_close, false),
                HitResult::PlusButton => (None, false, true),
                HitResult::None => (None, false, false),
            };

            if hover != st.hover_tab_index || close != st.hover_close || plus != st.hover_plus {
                st.hover_tab_index = hover;
                st.hover_close = close;
                st.hover_plus = plus;
                drop(st);
                wid.redraw();
            }
            true
        }
        Event::Leave => {
            let mut st = state.borrow_mut();
            if st.hover_tab_index.is_some() || st.hover_close || st.hover_plus {
                st.hover_tab_index = None;
                st.hover_close = false;
                st.hover_plus = false;
                drop(st);
                wid.redraw();
            }
            false
        }
        Event::Resize => {
            let mut st = state.borrow_mut();
            st.layout = compute_layout(st.tabs.len(), wid.w());
            false
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_clamps_tab_width() {
        let wide = compute_layout(2, 2000);
        assert_eq!(wide.tabs[0].width, MAX_TAB_WIDTH);

        let narrow = compute_layout(20, 300);
        assert_eq!(narrow.tabs[0].width, MIN_TAB_WIDTH);
    }

    #[test]
    fn test_layout_places_plus_after_tabs() {
        let layout = compute_layout(3, 2000);
        assert_eq!(layout.tabs[1].x, MAX_TAB_WIDTH + TAB_GAP);
        assert_eq!(layout.plus_x, 3 * (MAX_TAB_WIDTH + TAB_GAP) + PLUS_BTN_MARGIN);
    }

    #[test]
    fn test_empty_layout_has_plus_button() {
        let layout = compute_layout(0, 640);
        assert!(layout.tabs.is_empty());
        assert_eq!(hit_test(&layout, 0, PLUS_BTN_MARGIN + 1, 10), HitResult::PlusButton);
    }

    #[test]
    fn test_hit_test_tab_and_close() {
        let layout = compute_layout(2, 2000);
        let wy = 30;
        let mid_y = wy + TAB_BAR_HEIGHT / 2;

        assert_eq!(
            hit_test(&layout, wy, 10, mid_y),
            HitResult::Tab { index: 0, is_close: false }
        );

        let close_x = MAX_TAB_WIDTH - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE / 2;
        assert_eq!(
            hit_test(&layout, wy, close_x, mid_y),
            HitResult::Tab { index: 0, is_close: true }
        );

        assert_eq!(
            hit_test(&layout, wy, MAX_TAB_WIDTH + TAB_GAP + 5, mid_y),
            HitResult::Tab { index: 1, is_close: false }
        );
    }

    #[test]
    fn test_hit_test_outside_bar() {
        let layout = compute_layout(1, 640);
        assert_eq!(hit_test(&layout, 30, 10, 5), HitResult::None);
        assert_eq!(hit_test(&layout, 30, 10, 30 + TAB_BAR_HEIGHT), HitResult::None);
        assert_eq!(hit_test(&layout, 30, 1500, 40), HitResult::None);
    }
}
