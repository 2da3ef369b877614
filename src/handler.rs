use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Settled(outcome) => app.settle(outcome),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    let session = &mut app.session;
    match key.code {
        KeyCode::Esc => app.should_quit = true,

        // Shift+Enter never submits
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {}
        KeyCode::Enter => {
            // Enter is gated like the Send control, unlike a bare submit
            if session.can_send() {
                app.submit();
            }
        }

        // Composer editing
        KeyCode::Backspace => session.backspace(),
        KeyCode::Delete => session.delete(),
        KeyCode::Left => session.cursor_left(),
        KeyCode::Right => session.cursor_right(),
        KeyCode::Home => session.cursor_home(),
        KeyCode::End => session.cursor_end(),
        KeyCode::Char(c)
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            session.insert_char(c);
        }

        // Transcript scrolling
        KeyCode::Up => session.scroll_up(1),
        KeyCode::Down => session.scroll_down(1),
        KeyCode::PageUp => {
            let half = (session.viewport_height / 2).max(1);
            session.scroll_up(half);
        }
        KeyCode::PageDown => {
            let half = (session.viewport_height / 2).max(1);
            session.scroll_down(half);
        }

        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_chat = app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_send = app.send_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown if in_chat => app.session.scroll_down(3),
        MouseEventKind::ScrollUp if in_chat => app.session.scroll_up(3),
        MouseEventKind::Down(MouseButton::Left) if in_send => {
            // Clicking a disabled Send control does nothing
            if app.session.can_send() {
                app.submit();
            }
        }
        _ => {}
    }
}
