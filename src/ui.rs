use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use typeace::{
    caret::TextLayout,
    metrics::SessionResults,
    tracker::CharState,
    SessionState,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Styled glyphs of the passage, placed cell by cell from a `TextLayout`
struct PassageView<'a> {
    chars: &'a [char],
    states: &'a [CharState],
    layout: &'a TextLayout,
}

impl Widget for PassageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let correct = bold.fg(Color::Green);
        let incorrect = bold.fg(Color::Red).bg(Color::Rgb(60, 0, 0));
        let untyped = bold.add_modifier(Modifier::DIM);

        for ((glyph, &c), state) in self
            .layout
            .glyphs()
            .iter()
            .zip(self.chars)
            .zip(self.states)
        {
            if glyph.y >= area.height || glyph.right() > area.width {
                continue;
            }
            let (symbol, style) = match state {
                CharState::Correct => (c, correct),
                CharState::Incorrect if c == ' ' => ('·', incorrect),
                CharState::Incorrect => (c, incorrect),
                CharState::Untyped => (c, untyped),
            };
            buf.set_string(
                area.x + glyph.x,
                area.y + glyph.y,
                symbol.to_string(),
                style,
            );
        }
    }
}

fn header_line(app: &App) -> Line<'static> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let accent = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let backspace = if app.settings.backspace_disabled {
        "backspace off"
    } else {
        "backspace on"
    };
    Line::from(vec![
        Span::styled("typeace", accent),
        Span::styled(
            format!(
                "  {} words · {} · {}",
                app.settings.word_count,
                app.settings.language.to_string().to_lowercase(),
                backspace
            ),
            dim,
        ),
    ])
}

fn elapsed_line(app: &App) -> Line<'static> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let accent = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled("Time Elapsed: ", dim),
        Span::styled(format!("{}s", app.session.elapsed_secs().floor()), accent),
    ];
    if app.session.state() == SessionState::Paused {
        spans.push(Span::styled("  paused", dim.add_modifier(Modifier::ITALIC)));
    }
    Line::from(spans)
}

fn results_lines(results: &SessionResults) -> Vec<Line<'static>> {
    let label = Style::default().add_modifier(Modifier::DIM);
    let value = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let errors = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
    vec![
        Line::from(vec![
            Span::styled("WPM ", label),
            Span::styled(format!("{:.0}", results.wpm.round()), value),
            Span::styled("   CPM ", label),
            Span::styled(format!("{:.0}", results.cpm.round()), value),
            Span::styled("   ACCURACY ", label),
            Span::styled(format!("{:.0}%", results.accuracy_percent), value),
            Span::styled("   ERRORS ", label),
            Span::styled(results.error_count.to_string(), errors),
        ]),
        Line::from(Span::styled(
            "(→ / ctrl+r) try again   (←) retry same text",
            label.add_modifier(Modifier::ITALIC),
        )),
    ]
}

const FOOTER: &str = "ctrl+r new text · ← restart · ctrl+w words · ctrl+l language · ctrl+b backspace · esc quit";

/// Rectangle of `width` x `height` centered in `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_caps_lock_advisory(f: &mut Frame, area: Rect) {
    let popup = centered_rect(58, 5, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(
            " ⚠ Caps Lock is On ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    let body = Paragraph::new("Please turn off Caps Lock to continue the typing test.")
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, popup);
    f.render_widget(body, popup);
}

pub fn draw(app: &App, f: &mut Frame) {
    let session = &app.session;
    let area = f.area();
    let inner_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2 + 2);
    // one spare column keeps an end-of-line caret inside the box
    let layout_width = inner_width.saturating_sub(1).max(1);

    let chars = session.passage().map(|p| p.chars()).unwrap_or(&[]);
    let layout = TextLayout::new(chars, layout_width);
    let text_height = layout.line_count().max(1) + 2;
    let finished = session.state() == SessionState::Finished;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),           // header
            Constraint::Min(0),              // padding
            Constraint::Length(text_height), // passage
            Constraint::Length(if finished { 3 } else { 0 }),
            Constraint::Min(0),    // padding
            Constraint::Length(1), // footer
        ])
        .split(area);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(chunks[0]);
    f.render_widget(Paragraph::new(header_line(app)), header[0]);
    f.render_widget(
        Paragraph::new(elapsed_line(app)).alignment(Alignment::Right),
        header[1],
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::DIM));
    let text_area = block.inner(chunks[2]);
    f.render_widget(block, chunks[2]);

    if session.is_loading() {
        f.render_widget(
            Paragraph::new("Loading…")
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::DIM)),
            text_area,
        );
    } else {
        let states = session.char_states();
        f.render_widget(
            PassageView {
                chars,
                states: &states,
                layout: &layout,
            },
            text_area,
        );

        if !finished && !session.is_focused() {
            let overlay = centered_rect(34, 1, text_area);
            f.render_widget(Clear, overlay);
            f.render_widget(
                Paragraph::new("Focus the terminal to continue")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)),
                overlay,
            );
        } else if !finished && !session.shows_caps_lock_advisory() {
            let caret = session.caret(&layout);
            let x = (text_area.x + caret.x).min(text_area.right().saturating_sub(1));
            let y = (text_area.y + caret.y).min(text_area.bottom().saturating_sub(1));
            f.set_cursor_position((x, y));
        }
    }

    if let Some(results) = session.results() {
        f.render_widget(
            Paragraph::new(results_lines(&results)).alignment(Alignment::Center),
            chunks[3],
        );
    }

    f.render_widget(
        Paragraph::new(FOOTER)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)),
        chunks[5],
    );

    if session.shows_caps_lock_advisory() {
        render_caps_lock_advisory(f, area);
    }
}
