use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use textwrap::{core::display_width, wrap, Options, WordSplitter};
use crate::app::App;
use crate::conversation::{Message, Role};
use crate::theme::Theme;

pub const INPUT_LABEL: &str = "Type a message...";

/// Bubbles never take more than this share of the transcript width
const BUBBLE_MAX_PERCENT: usize = 70;
/// Horizontal padding inside a bubble, per side
const BUBBLE_PADDING: usize = 1;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Chat ", Style::default().fg(Color::White).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    // Store viewport height for paging
    app.chat_height = inner.height;

    let waiting_frame = app.is_waiting().then_some(app.animation_frame);
    let lines = transcript_lines(
        app.conversation.messages(),
        inner.width as usize,
        &app.theme,
        waiting_frame,
    );

    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(inner.height);
    if app.follow_tail || app.scroll >= max_scroll {
        app.scroll = max_scroll;
        app.follow_tail = true;
    }

    let transcript = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.scroll, 0));

    frame.render_widget(transcript, area);
}

/// Lay out the whole transcript as styled lines for a viewport `width`
/// columns wide. `waiting_frame` animates an empty trailing placeholder.
pub fn transcript_lines(
    messages: &[Message],
    width: usize,
    theme: &Theme,
    waiting_frame: Option<u8>,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let last_idx = messages.len().saturating_sub(1);

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }

        let content = match waiting_frame {
            Some(frame) if idx == last_idx && msg.content.is_empty() => {
                ".".repeat(frame as usize + 1)
            }
            _ => msg.content.clone(),
        };

        lines.extend(bubble_lines(msg.role, &content, width, theme));
    }

    lines
}

fn bubble_lines(role: Role, content: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let (bg, alignment) = match role {
        Role::Assistant => (theme.assistant, Alignment::Left),
        Role::User => (theme.user, Alignment::Right),
    };
    let style = Style::default().fg(theme.text).bg(bg);

    let max_bubble = (width * BUBBLE_MAX_PERCENT / 100).max(BUBBLE_PADDING * 2 + 1);
    let text_width = max_bubble - BUBBLE_PADDING * 2;
    let wrapped = wrap_content(content, text_width);

    let inner_width = wrapped
        .iter()
        .map(|l| display_width(l))
        .max()
        .unwrap_or(0);
    let pad = " ".repeat(BUBBLE_PADDING);

    wrapped
        .into_iter()
        .map(|text| {
            let fill = " ".repeat(inner_width - display_width(&text));
            Line::from(Span::styled(format!("{pad}{text}{fill}{pad}"), style))
                .alignment(alignment)
        })
        .collect()
}

fn wrap_content(content: &str, width: usize) -> Vec<String> {
    let options = Options::new(width.max(1)).word_splitter(WordSplitter::NoHyphenation);

    // An empty message still occupies one bubble row
    let mut out: Vec<String> = content
        .lines()
        .flat_map(|line| {
            let wrapped: Vec<String> = wrap(line, &options)
                .into_iter()
                .map(|cow| cow.into_owned())
                .collect();
            if wrapped.is_empty() {
                vec![String::new()]
            } else {
                wrapped
            }
        })
        .collect();

    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.user))
        .title(format!(" {} ", INPUT_LABEL));

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app.draft
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text).block(input_block);
    frame.render_widget(input, area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut spans = Vec::new();

    if app.is_waiting() {
        let noun = if app.pending == 1 { "reply" } else { "replies" };
        spans.push(Span::styled(
            format!(" waiting for {} {} ", app.pending, noun),
            Style::default()
                .bg(Color::Black)
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    spans.extend([
        Span::styled(" Enter ", key_style),
        Span::styled(" Send  ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" Scroll  ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" Quit ", label_style),
    ]);

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}
