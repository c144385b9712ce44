use anyhow::{Result, anyhow};
use arboard::Clipboard;
use ratatui::{
    Frame,
    prelude::*,
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::form::{ClipboardSink, Dialog, DialogKind};
use crate::models::FormState;

pub const WINDOW_TITLE: &str = "Password Manager";

const COLOR_SAND: Color = Color::Rgb(0xEB, 0xDB, 0xB2);
const COLOR_OLIVE: Color = Color::Rgb(0x98, 0x97, 0x1A);
const COLOR_MOSS: Color = Color::Rgb(0x67, 0x67, 0x1C);

const LABEL_WIDTH: u16 = 18;
const SIDE_BUTTON_WIDTH: u16 = 22;

#[derive(Clone, Copy)]
struct OverlayTheme {
    border: Color,
    title: Color,
    text: Color,
    bg: Color,
}

fn themed_overlay(kind: OverlayKind) -> OverlayTheme {
    match kind {
        OverlayKind::Info => OverlayTheme {
            border: COLOR_OLIVE,
            title: COLOR_SAND,
            text: COLOR_SAND,
            bg: Color::Rgb(0x1D, 0x21, 0x10),
        },
        OverlayKind::Error => OverlayTheme {
            border: Color::Rgb(0xB3, 0x88, 0x45),
            title: Color::Rgb(0xF0, 0xD8, 0xA8),
            text: COLOR_SAND,
            bg: Color::Rgb(0x2A, 0x1C, 0x11),
        },
        OverlayKind::Quit => OverlayTheme {
            border: Color::Rgb(0xA7, 0xA2, 0x36),
            title: Color::Rgb(0xE6, 0xD8, 0xB2),
            text: COLOR_SAND,
            bg: Color::Rgb(0x25, 0x24, 0x13),
        },
    }
}

#[derive(Clone, Copy)]
enum OverlayKind {
    Info,
    Error,
    Quit,
}

fn centered_overlay_area(frame_size: Rect, lines: &[String], title: &str) -> Rect {
    let widest = lines
        .iter()
        .map(|s| s.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0) as u16;
    let maxw = widest + 4;
    let maxh = lines.len() as u16 + 2;
    Rect::new(
        (frame_size.width.saturating_sub(maxw)) / 2,
        (frame_size.height.saturating_sub(maxh)) / 2,
        maxw.min(frame_size.width),
        maxh.min(frame_size.height),
    )
}

fn render_overlay(f: &mut Frame<'_>, lines: &[String], title: &str, kind: OverlayKind) {
    let area = centered_overlay_area(f.size(), lines, title);
    let theme = themed_overlay(kind);
    let paragraph = Paragraph::new(
        lines
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect::<Vec<Line>>(),
    )
    .style(Style::default().fg(theme.text).bg(theme.bg))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme.title)
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(
                Style::default()
                    .fg(theme.border)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().bg(theme.bg)),
    );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

const LOGO: [&str; 7] = [
    "     ╔═════╗     ",
    "     ║     ║     ",
    "   ┌─┴─────┴─┐   ",
    "   │ ╔═════╗ │   ",
    "   │ ║  ●  ║ │   ",
    "   │ ║  ▼  ║ │   ",
    "   └─────────┘   ",
];

/// Everything the form can focus, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Website,
    Search,
    Email,
    Password,
    Generate,
    Add,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Website,
        Focus::Search,
        Focus::Email,
        Focus::Password,
        Focus::Generate,
        Focus::Add,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    /// The text field behind this focus, if it is one.
    pub fn field_mut(self, form: &mut FormState) -> Option<&mut String> {
        match self {
            Focus::Website => Some(&mut form.website),
            Focus::Email => Some(&mut form.email),
            Focus::Password => Some(&mut form.password),
            Focus::Search | Focus::Generate | Focus::Add => None,
        }
    }
}

pub struct ViewState<'a> {
    pub form: &'a FormState,
    pub focus: Focus,
    pub show_password: bool,
    pub dialog: Option<&'a Dialog>,
    pub quit_overlay: bool,
    pub status: &'a str,
}

pub fn draw(f: &mut Frame<'_>, state: &ViewState) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_MOSS))
        .title(Span::styled(
            WINDOW_TITLE,
            Style::default().fg(COLOR_SAND).add_modifier(Modifier::BOLD),
        ));
    let inner = outer.inner(f.size());
    f.render_widget(outer, f.size());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(LOGO.len() as u16 + 1), // logo
            Constraint::Length(3),                     // website + search
            Constraint::Length(3),                     // email
            Constraint::Length(3),                     // password + generate
            Constraint::Length(3),                     // add
            Constraint::Min(0),
            Constraint::Length(3), // footer
        ])
        .split(inner);

    let logo_lines: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(*l, Style::default().fg(COLOR_SAND))))
        .collect();
    f.render_widget(
        Paragraph::new(logo_lines).alignment(Alignment::Center),
        rows[0],
    );

    let password_display = if state.show_password {
        state.form.password.clone()
    } else {
        "*".repeat(state.form.password.chars().count())
    };

    let [label, input, side] = row_columns(rows[1]);
    render_label(f, label, "Website:");
    render_field(f, input, &state.form.website, state.focus == Focus::Website);
    render_button(f, side, "Search", state.focus == Focus::Search);

    let [label, input, side] = row_columns(rows[2]);
    render_label(f, label, "Email/Username:");
    render_field(
        f,
        input.union(side),
        &state.form.email,
        state.focus == Focus::Email,
    );

    let [label, input, side] = row_columns(rows[3]);
    render_label(f, label, "Password:");
    render_field(f, input, &password_display, state.focus == Focus::Password);
    render_button(f, side, "Generate Password", state.focus == Focus::Generate);

    let [_, input, side] = row_columns(rows[4]);
    render_button(f, input.union(side), "Add", state.focus == Focus::Add);

    let footer = Paragraph::new(state.status).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, rows[6]);

    if let Some(dialog) = state.dialog {
        let mut lines: Vec<String> = dialog.message.lines().map(str::to_string).collect();
        lines.push(String::new());
        lines.push("[Enter] OK".to_string());
        let kind = match dialog.kind {
            DialogKind::Info => OverlayKind::Info,
            DialogKind::Error => OverlayKind::Error,
        };
        render_overlay(f, &lines, &dialog.title, kind);
    }

    if state.quit_overlay {
        let lines = vec![
            "Quit?".to_string(),
            String::new(),
            "[y] Yes   [n] No".to_string(),
        ];
        render_overlay(f, &lines, "Confirm quit", OverlayKind::Quit);
    }
}

fn row_columns(row: Rect) -> [Rect; 3] {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(LABEL_WIDTH),
            Constraint::Min(10),
            Constraint::Length(SIDE_BUTTON_WIDTH),
        ])
        .split(row);
    [cols[0], cols[1], cols[2]]
}

fn render_label(f: &mut Frame<'_>, area: Rect, text: &str) {
    // labels sit on the middle line of the bordered inputs
    let line = Rect::new(area.x, area.y + 1, area.width, 1.min(area.height));
    let label = Paragraph::new(text)
        .alignment(Alignment::Right)
        .style(Style::default().fg(COLOR_SAND).add_modifier(Modifier::BOLD));
    f.render_widget(label, line);
}

fn render_field(f: &mut Frame<'_>, area: Rect, value: &str, focused: bool) {
    let (text, border) = if focused {
        (format!("{value}_"), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    } else {
        (value.to_string(), Style::default().fg(Color::DarkGray))
    };
    let field = Paragraph::new(text)
        .style(Style::default().fg(COLOR_SAND))
        .block(Block::default().borders(Borders::ALL).border_style(border));
    f.render_widget(field, area);
}

fn render_button(f: &mut Frame<'_>, area: Rect, text: &str, focused: bool) {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(COLOR_OLIVE)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_SAND)
    };
    let button = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(COLOR_MOSS)),
        );
    f.render_widget(button, area);
}

/// System clipboard, opened on first use and kept for the session so the
/// copied text outlives the call on X11/Wayland.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().map_err(|e| anyhow!("Clipboard unavailable: {e}"))?,
        };
        self.inner
            .insert(clipboard)
            .set_text(text.to_string())
            .map_err(|e| anyhow!("Failed to set clipboard: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(state: &ViewState) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(90, 32)).unwrap();
        terminal.draw(|f| draw(f, state)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    fn screen_contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|l| l.contains(needle))
    }

    fn sample_form() -> FormState {
        FormState {
            website: "github".into(),
            email: "me@x.com".into(),
            password: "hunter2".into(),
        }
    }

    #[test]
    fn focus_cycles_in_grid_order() {
        assert_eq!(Focus::Website.next(), Focus::Search);
        assert_eq!(Focus::Search.next(), Focus::Email);
        assert_eq!(Focus::Add.next(), Focus::Website);
        assert_eq!(Focus::Website.prev(), Focus::Add);
        let mut form = FormState::default();
        assert!(Focus::Generate.field_mut(&mut form).is_none());
        Focus::Email.field_mut(&mut form).unwrap().push('x');
        assert_eq!(form.email, "x");
    }

    #[test]
    fn form_renders_labels_buttons_and_masked_password() {
        let form = sample_form();
        let lines = render(&ViewState {
            form: &form,
            focus: Focus::Email,
            show_password: false,
            dialog: None,
            quit_overlay: false,
            status: "ready",
        });
        for needle in [
            WINDOW_TITLE,
            "Website:",
            "Email/Username:",
            "Password:",
            "Search",
            "Generate Password",
            "Add",
            "github",
            "me@x.com_",
            "*******",
            "ready",
        ] {
            assert!(screen_contains(&lines, needle), "missing {needle:?}");
        }
        assert!(!screen_contains(&lines, "hunter2"));
    }

    #[test]
    fn revealed_password_is_drawn() {
        let form = sample_form();
        let lines = render(&ViewState {
            form: &form,
            focus: Focus::Website,
            show_password: true,
            dialog: None,
            quit_overlay: false,
            status: "",
        });
        assert!(screen_contains(&lines, "hunter2"));
    }

    #[test]
    fn dialog_overlay_shows_title_and_body() {
        let form = FormState::default();
        let dialog = Dialog {
            kind: DialogKind::Info,
            title: "GitHub".into(),
            message: "Email: me@x.com\nPassword: abc123!!".into(),
        };
        let lines = render(&ViewState {
            form: &form,
            focus: Focus::Website,
            show_password: false,
            dialog: Some(&dialog),
            quit_overlay: false,
            status: "",
        });
        assert!(screen_contains(&lines, "GitHub"));
        assert!(screen_contains(&lines, "Email: me@x.com"));
        assert!(screen_contains(&lines, "Password: abc123!!"));
        assert!(screen_contains(&lines, "[Enter] OK"));
    }

    #[test]
    fn quit_overlay_is_drawn() {
        let form = FormState::default();
        let lines = render(&ViewState {
            form: &form,
            focus: Focus::Website,
            show_password: false,
            dialog: None,
            quit_overlay: true,
            status: "",
        });
        assert!(screen_contains(&lines, "Confirm quit"));
        assert!(screen_contains(&lines, "[y] Yes   [n] No"));
    }
}
