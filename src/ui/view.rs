use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::app::Mode;
use super::clock::Header;
use crate::domain::{
    engine::{Counts, DisplayGroups},
    task::{Task, TaskId},
};

pub struct View<'a> {
    pub header: Header,
    pub groups: DisplayGroups<'a>,
    pub counts: Counts,
    pub focused: Option<&'a TaskId>,
    pub removing: Option<&'a TaskId>,
    pub mode: &'a Mode,
    pub input: &'a str,
    pub status: Option<&'a str>,
}

const HINTS: &str = "n: new  space: toggle  enter/e: edit  del: delete  ↑↓: focus  shift+↑↓: move  q: quit";

pub fn draw(f: &mut Frame, view: &View) {
    let overdue_height = if view.groups.overdue.is_empty() { 0 } else { view.groups.overdue.len() as u16 + 2 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(overdue_height),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.size());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(view.header.greeting, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}  ·  {}", view.header.clock, view.header.date)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("daylist"));
    f.render_widget(header, chunks[0]);

    let (input_title, input_text) = match view.mode {
        Mode::Compose => ("new task (enter: add, esc: leave)", format!("{}_", view.input)),
        _ => ("new task (n)", view.input.to_owned()),
    };
    let input_style = if *view.mode == Mode::Compose { Style::default().fg(Color::Cyan) } else { Style::default() };
    f.render_widget(
        Paragraph::new(input_text).block(Block::default().borders(Borders::ALL).title(input_title).border_style(input_style)),
        chunks[1],
    );

    if !view.groups.overdue.is_empty() {
        render_group(f, chunks[2], "Overdue", &view.groups.overdue, view);
    }

    if view.groups.is_empty() {
        let empty = Paragraph::new("Nothing planned yet. Press n to add a task.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Today"));
        f.render_widget(empty, chunks[3]);
    } else {
        render_group(f, chunks[3], "Today", &view.groups.today, view);
    }

    let footer_text = match view.status {
        Some(status) => status.to_owned(),
        None => HINTS.to_owned(),
    };
    let footer = Paragraph::new(footer_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} active · {} done", view.counts.active, view.counts.completed)),
    );
    f.render_widget(footer, chunks[4]);
}

fn render_group(f: &mut Frame, area: Rect, title: &str, tasks: &[&Task], view: &View) {
    let items: Vec<ListItem> = tasks.iter().map(|task| ListItem::new(task_line(task, view))).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    state.select(view.focused.and_then(|id| tasks.iter().position(|task| &task.id == id)));
    f.render_stateful_widget(list, area, &mut state);
}

fn task_line<'a>(task: &'a Task, view: &View) -> Line<'a> {
    let mark = if task.done { "[x] " } else { "[ ] " };
    if let Mode::Editing { id, buffer } = view.mode {
        if *id == task.id {
            return Line::from(vec![
                Span::raw(mark),
                Span::styled(format!("{buffer}_"), Style::default().fg(Color::Yellow)),
            ]);
        }
    }

    let mut text_style = Style::default();
    if task.done {
        text_style = text_style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
    }
    if view.removing == Some(&task.id) {
        text_style = text_style.fg(Color::Red).add_modifier(Modifier::DIM | Modifier::CROSSED_OUT);
    }

    let mut spans = vec![Span::raw(mark), Span::styled(task.text.as_str(), text_style)];
    if task.overdue && !task.done {
        spans.push(Span::styled("  ⚠ Overdue", Style::default().fg(Color::Red)));
    }
    Line::from(spans)
}
