// TUI module for rendering the terminal interface
pub mod app;
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use app::App;
pub use colors::*;
pub use helpers::{calculate_progress, format_file_size, truncate};
pub use input::{
    handle_confirm_input, handle_key_event, handle_prompt_input, handle_scroll_input,
    ConfirmAction, Focus, KeyAction, LineEdit, LineInput, PromptAction, ScrollAction,
};

use crate::command::HELP;
use crate::domain::book::format_size_kb;
use crate::dupes::DuplicateReport;
use crate::interpreter::PromptSurface;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use tracing::warn;

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Main editing screen
    #[default]
    Browsing,
    /// Command reference overlay
    Help,
    /// Duplicate search results
    Duplicates {
        report: DuplicateReport,
        scroll: u16,
    },
}

/// One row of the candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub name: String,
    pub large: bool,
}

/// Everything the main screen shows, detached from the session so it can be
/// redrawn behind a modal prompt while a command holds the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenSnapshot {
    /// Current book's file name with the edited name
    pub file_name: Option<String>,
    /// `None` when the file could not be measured
    pub size_kb: Option<u64>,
    pub size_limit_kb: u64,
    pub completed: usize,
    pub remaining: usize,
    pub files: Vec<FileRow>,
    pub current_index: usize,
    pub file_cursor: usize,
    pub segments: Vec<String>,
    pub segment_cursor: usize,
    pub sort_label: &'static str,
    pub show_large: bool,
    pub focus: Focus,
    pub command_line: LineInput,
    pub status: String,
    pub view: ViewState,
}

/// Renders the main screen and any overlay held in `screen.view`
pub fn render(frame: &mut Frame, screen: &ScreenSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header with progress
            Constraint::Min(0),    // Lists
            Constraint::Length(3), // Command line
            Constraint::Length(3), // Status
        ])
        .split(frame.area());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_header(frame, chunks[0], screen);
    render_file_list(frame, panels[0], screen);
    render_segments(frame, panels[1], screen);
    render_command_line(frame, chunks[2], screen);
    render_status(frame, chunks[3], screen);

    match &screen.view {
        ViewState::Browsing => {}
        ViewState::Help => render_help_overlay(frame),
        ViewState::Duplicates { report, scroll } => {
            render_duplicates_overlay(frame, report, *scroll)
        }
    }
}

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { ACCENT_HIGHLIGHT } else { BORDER_COLOR };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

/// Book name, size and the done counter
fn render_header(frame: &mut Frame, area: Rect, screen: &ScreenSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let width = area.width.saturating_sub(20) as usize;
    let info = match &screen.file_name {
        Some(name) => {
            let (size_text, size_color) = match screen.size_kb {
                Some(kb) if kb > screen.size_limit_kb => (format_size_kb(kb), WARNING),
                Some(kb) => (format_size_kb(kb), TEXT_SECONDARY),
                None => ("missing".to_string(), WARNING),
            };
            vec![
                Span::styled(
                    format!(" {}", truncate(name, width)),
                    Style::default()
                        .fg(TEXT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(format!("({})", size_text), Style::default().fg(size_color)),
            ]
        }
        None => vec![Span::styled(
            " No books to rename",
            Style::default().fg(TEXT_SECONDARY),
        )],
    };

    let header = Paragraph::new(Line::from(info)).block(
        Block::default()
            .title(" autoname ")
            .title_style(
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );
    frame.render_widget(header, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(calculate_progress(screen.completed, screen.remaining))
        .label(format!("Done: {}/{}", screen.completed, screen.remaining));
    frame.render_widget(gauge, chunks[1]);
}

fn render_file_list(frame: &mut Frame, area: Rect, screen: &ScreenSnapshot) {
    let focused = screen.focus == Focus::Files;
    let large = if screen.show_large { "shown" } else { "hidden" };
    let title = format!(
        " Books ({}, large {}) ",
        screen.sort_label, large
    );

    let items: Vec<ListItem> = screen
        .files
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let marker = if index == screen.current_index { "● " } else { "  " };
            let mut style = Style::default().fg(if row.large { WARNING } else { TEXT_PRIMARY });
            if index == screen.current_index {
                style = style.add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(ACCENT_SECONDARY)),
                Span::styled(row.name.as_str(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(panel_block(&title, focused))
        .highlight_style(if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        });

    let cursor = if screen.files.is_empty() {
        None
    } else {
        Some(screen.file_cursor)
    };
    let mut state = ListState::default().with_selected(cursor);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_segments(frame: &mut Frame, area: Rect, screen: &ScreenSnapshot) {
    let focused = screen.focus == Focus::Segments;

    let items: Vec<ListItem> = screen
        .segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>2}  ", index + 1),
                    Style::default().fg(TEXT_SECONDARY),
                ),
                Span::styled(segment.as_str(), Style::default().fg(TEXT_PRIMARY)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(panel_block(" Segments ", focused))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let cursor = if focused && !screen.segments.is_empty() {
        Some(screen.segment_cursor)
    } else {
        None
    };
    let mut state = ListState::default().with_selected(cursor);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_command_line(frame: &mut Frame, area: Rect, screen: &ScreenSnapshot) {
    let focused = screen.focus == Focus::Command;
    let line = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled(screen.command_line.text(), Style::default().fg(TEXT_PRIMARY)),
    ]))
    .block(panel_block(" Command (h for help) ", focused));
    frame.render_widget(line, area);

    if focused && screen.view == ViewState::Browsing {
        let x = area.x + 3 + screen.command_line.cursor() as u16;
        frame.set_cursor_position(Position::new(
            x.min(area.right().saturating_sub(2)),
            area.y + 1,
        ));
    }
}

fn render_status(frame: &mut Frame, area: Rect, screen: &ScreenSnapshot) {
    let status = Paragraph::new(screen.status.as_str())
        .style(Style::default().fg(TEXT_SECONDARY))
        .block(panel_block(" Status ", false));
    frame.render_widget(status, area);
}

/// Renders the command reference
pub fn render_help_overlay(frame: &mut Frame) {
    let help_area = centered_rect(70, 90, frame.area());
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let mut lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(format!("  {:<10}", keys), Style::default().fg(ACCENT_HIGHLIGHT)),
                Span::styled(*description, Style::default().fg(TEXT_PRIMARY)),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab switches panels. Press any key to close.",
        Style::default().fg(TEXT_SECONDARY),
    )));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, help_area);
}

/// Renders the duplicate search results; long results scroll
pub fn render_duplicates_overlay(frame: &mut Frame, report: &DuplicateReport, scroll: u16) {
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);

    let hint = if report.is_long() {
        " ↑↓ scroll, Esc close "
    } else {
        " Esc close "
    };
    let block = Block::default()
        .title(" Possible duplicates ")
        .title_alignment(Alignment::Center)
        .title_bottom(Line::from(hint).centered())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let mut lines = vec![
        Line::from(Span::styled(
            report.summary(),
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
    ];
    lines.extend(
        report
            .matches
            .iter()
            .map(|name| Line::from(Span::styled(name.as_str(), Style::default().fg(TEXT_PRIMARY)))),
    );

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Renders the one-line text prompt
pub fn render_text_prompt_overlay(frame: &mut Frame, title: &str, input: &LineInput) {
    let area = frame.area();
    let width = area.width.saturating_sub(4).min(70);
    let prompt_area = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + area.height.saturating_sub(3) / 2,
        width,
        3.min(area.height),
    );
    frame.render_widget(Clear, prompt_area);

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_bottom(Line::from(" Enter accept, Esc cancel ").centered())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let paragraph = Paragraph::new(input.text())
        .block(block)
        .style(Style::default().fg(TEXT_PRIMARY));
    frame.render_widget(paragraph, prompt_area);

    let x = prompt_area.x + 1 + input.cursor() as u16;
    frame.set_cursor_position(Position::new(
        x.min(prompt_area.right().saturating_sub(2)),
        prompt_area.y + 1,
    ));
}

/// Renders a yes/no question
pub fn render_confirm_overlay(frame: &mut Frame, question: &str) {
    let confirm_area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, confirm_area);

    let block = Block::default()
        .title(" ⚠ Confirm ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_PRIMARY))
        .style(Style::default().bg(BG_DARK));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            question,
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("es  "),
            Span::styled("[Enter]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("     "),
            Span::styled("[N]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("o  "),
            Span::styled("[Esc]", Style::default().fg(ACCENT_PRIMARY)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, confirm_area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Blocks until a key is pressed
fn read_key() -> io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}

/// Asks questions with modal overlays drawn over a frozen copy of the
/// main screen. Terminal errors count as a cancelled prompt.
pub struct TerminalPrompt<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    screen: ScreenSnapshot,
}

impl<'a, B: Backend> TerminalPrompt<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, screen: ScreenSnapshot) -> Self {
        Self { terminal, screen }
    }
}

impl<B: Backend> PromptSurface for TerminalPrompt<'_, B> {
    fn ask_text(&mut self, title: &str, initial: &str) -> Option<String> {
        let screen = &self.screen;
        let mut input = LineInput::new(initial);
        loop {
            let drawn = self.terminal.draw(|frame| {
                render(frame, screen);
                render_text_prompt_overlay(frame, title, &input);
            });
            if let Err(e) = drawn {
                warn!(error = %e, "Failed to draw text prompt");
                return None;
            }

            let key = match read_key() {
                Ok(key) => key,
                Err(e) => {
                    warn!(error = %e, "Failed to read key");
                    return None;
                }
            };
            match handle_prompt_input(key) {
                PromptAction::Submit => return Some(input.take()),
                PromptAction::Cancel => return None,
                PromptAction::Edit(edit) => input.apply(edit),
                PromptAction::None => {}
            }
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        let screen = &self.screen;
        loop {
            let drawn = self.terminal.draw(|frame| {
                render(frame, screen);
                render_confirm_overlay(frame, question);
            });
            if let Err(e) = drawn {
                warn!(error = %e, "Failed to draw confirmation");
                return false;
            }

            match read_key() {
                Ok(key) => match handle_confirm_input(key) {
                    ConfirmAction::Yes => return true,
                    ConfirmAction::No => return false,
                    ConfirmAction::None => {}
                },
                Err(e) => {
                    warn!(error = %e, "Failed to read key");
                    return false;
                }
            }
        }
    }
}
