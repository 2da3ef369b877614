use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use crate::app::App;
use crate::chat::{ChatSession, Phase};
use crate::state::Role;
use crate::wrap::wrap_text_to_width;

const EMPTY_STATE: &str = "Say hi — spaCy will echo parsing info.";
const INPUT_PLACEHOLDER: &str = "Type a message and press Enter";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, body_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" phillygpt ", Style::default().fg(Color::Cyan).bold()),
        Span::styled("philly-slang assistant", Style::default().fg(Color::White)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(format!("  {}", app.backend_url), Style::default().fg(Color::Gray)),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.session.phase() {
        Phase::Idle => (" READY ", Style::default().bg(Color::Blue).fg(Color::White)),
        Phase::Awaiting => (" WAITING ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = Line::from(vec![
        Span::styled(mode_text, mode_style),
        Span::raw(" "),
        Span::styled(" Enter ", key_style),
        Span::styled(" send ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
        Span::styled(
            "  Made with love in Fishtown by Ash Andrien",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let support = Line::from(Span::styled(
        " Want to support me?  Buy my album on Bandcamp (it's $5): https://dripcastles.bandcamp.com",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(vec![hints, support]), area);
}

/// Transcript as styled lines, pre-wrapped to `width` cells so the row count
/// matches [`ChatSession::transcript_height`]. The "Thinking…" entry exists
/// only here.
pub fn transcript_text(session: &ChatSession, width: usize) -> Text<'static> {
    if session.messages().is_empty() && !session.is_loading() {
        let placeholder: Vec<Line> = wrap_text_to_width(EMPTY_STATE, width)
            .into_iter()
            .map(|row| Line::from(Span::styled(row, Style::default().fg(Color::DarkGray))))
            .collect();
        return Text::from(placeholder);
    }

    let mut lines: Vec<Line> = Vec::new();

    for msg in session.messages() {
        lines.push(role_line(msg.role));
        lines.extend(wrap_text_to_width(&msg.text, width).into_iter().map(Line::from));
        lines.push(Line::default());
    }

    if session.is_loading() {
        lines.push(role_line(Role::Assistant));
        lines.push(Line::from(Span::styled(
            "Thinking…",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    Text::from(lines)
}

fn role_line(role: Role) -> Line<'static> {
    let color = match role {
        Role::User => Color::Cyan,
        Role::Assistant => Color::Yellow,
    };
    Line::from(Span::styled(
        format!("{}:", role.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, composer_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);
    let [input_area, send_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(10),
    ])
    .areas(composer_area);

    // Store areas for mouse hit-testing
    app.chat_area = Some(chat_area);
    app.send_area = Some(send_area);

    // Inner size minus borders, for scroll calculations
    app.session.viewport_height = chat_area.height.saturating_sub(2);
    app.session.viewport_width = chat_area.width.saturating_sub(2);
    app.session.scroll = app.session.scroll.min(app.session.max_scroll());

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Chat ");

    let width = app.session.viewport_width.max(1) as usize;
    let chat = Paragraph::new(transcript_text(&app.session, width))
        .block(chat_block)
        .scroll((app.session.scroll, 0));
    frame.render_widget(chat, chat_area);

    render_composer(&app.session, frame, input_area);
    render_send(&app.session, frame, send_area);
}

fn render_composer(session: &ChatSession, frame: &mut Frame, area: Rect) {
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Message ");

    // Calculate visible portion of input with horizontal scrolling
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = session.cursor();

    // Scroll offset keeps the cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let input = if session.input().is_empty() {
        Paragraph::new(INPUT_PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        let visible_text: String = session
            .input()
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };

    frame.render_widget(input.block(input_block), area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

fn render_send(session: &ChatSession, frame: &mut Frame, area: Rect) {
    let style = if session.can_send() {
        Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let send = Paragraph::new("Send")
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(send, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{app_with, FakeBackend};
    use crate::slang::SlangError;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App) -> String {
        screen_sized(app, 60, 16)
    }

    fn screen_sized(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let symbols: Vec<&str> = buffer.content.iter().map(|cell| cell.symbol()).collect();
        symbols
            .chunks(width)
            .map(|row| row.concat())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn plain(text: &Text) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| &*s.content).collect::<String>())
            .collect()
    }

    #[test]
    fn empty_session_shows_placeholder() {
        let session = ChatSession::new();
        assert_eq!(plain(&transcript_text(&session, 58)), vec![EMPTY_STATE.to_string()]);
    }

    #[test]
    fn thinking_entry_is_view_only() {
        let mut session = ChatSession::new();
        session.set_input("hi");
        session.begin_submit();

        let lines = plain(&transcript_text(&session, 58));
        assert_eq!(lines, vec!["You:", "hi", "", "Assistant:", "Thinking…"]);
        assert_eq!(session.messages().len(), 1);

        session.settle(Err(SlangError::Status(500)));
        let lines = plain(&transcript_text(&session, 58));
        assert!(!lines.iter().any(|l| l.contains("Thinking")));
        assert_eq!(lines[3], "Assistant:");
        assert_eq!(lines[4], "Error contacting backend: HTTP 500");
    }

    #[tokio::test]
    async fn shell_frames_the_chat() {
        let (mut app, _rx) = app_with(FakeBackend::new(|_| Ok("ok".to_string())));
        let screen = screen(&mut app);

        assert!(screen.contains("phillygpt"));
        assert!(screen.contains("philly-slang assistant"));
        assert!(screen.contains("Say hi"));
        assert!(screen.contains(INPUT_PLACEHOLDER));
        assert!(screen.contains("Send"));
        assert!(app.send_area.is_some());
        assert_eq!(app.session.viewport_height, 16 - 1 - 2 - 3 - 2);
    }

    #[tokio::test]
    async fn loading_screen_shows_thinking() {
        let (mut app, _rx) = app_with(FakeBackend::new(|_| Ok("ok".to_string())));
        app.session.set_input("yo what's good");
        app.session.begin_submit();

        let screen = screen(&mut app);
        assert!(screen.contains("You:"));
        assert!(screen.contains("yo what's good"));
        assert!(screen.contains("Thinking…"));
        assert!(!screen.contains("Say hi"));
    }

    #[tokio::test]
    async fn autoscroll_reveals_last_wrapped_row() {
        let (mut app, _rx) = app_with(FakeBackend::new(|_| Ok("ok".to_string())));
        screen_sized(&mut app, 30, 12);

        app.session.set_input("hi");
        app.session.begin_submit();
        screen_sized(&mut app, 30, 12);
        app.session.settle(Ok([
            "aaaaaaaaaaaaaaa",
            "bbbbbbbbbbbbbbb",
            "ccccccccccccccc",
            "ddddddddddddddd",
            "eeeeeeeeeeeeeee",
            "fffffffffffffff",
        ]
        .join(" ")));

        let screen = screen_sized(&mut app, 30, 12);
        assert!(app.session.scroll > 0);
        assert_eq!(app.session.scroll, app.session.max_scroll());
        assert!(screen.contains("fffffffffffffff"), "{screen}");
    }

    #[tokio::test]
    async fn autoscroll_counts_wide_glyphs() {
        let (mut app, _rx) = app_with(FakeBackend::new(|_| Ok("ok".to_string())));
        screen_sized(&mut app, 30, 12);

        app.session.set_input("hi");
        app.session.begin_submit();
        app.session.settle(Ok(format!("{}終", "字".repeat(41))));

        let screen = screen_sized(&mut app, 30, 12);
        assert_eq!(app.session.scroll, app.session.max_scroll());
        assert!(screen.contains('終'), "{screen}");
    }

    #[test]
    fn replies_keep_leading_whitespace() {
        let mut session = ChatSession::new();
        session.set_input("hi");
        session.begin_submit();
        session.settle(Ok("  indented".to_string()));

        let lines = plain(&transcript_text(&session, 58));
        assert_eq!(lines[4], "  indented");
    }

    #[tokio::test]
    async fn footer_carries_support_note() {
        let (mut app, _rx) = app_with(FakeBackend::new(|_| Ok("ok".to_string())));
        let screen = screen_sized(&mut app, 100, 16);
        assert!(screen.contains("Buy my album on Bandcamp"));
    }
}
