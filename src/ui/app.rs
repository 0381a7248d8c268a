use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use super::clock::{self, Header};
use super::shortcuts::{self, Intent};
use super::view::{self, View};
use crate::application::{board::TaskBoard, command::Command};
use crate::domain::{
    repository::TaskRepository,
    task::{DisplayOrder, TaskId},
};

pub const REMOVE_DELAY: Duration = Duration::from_millis(160);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Compose,
    Editing { id: TaskId, buffer: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    AnimateDelete(TaskId),
}

pub struct App<R: TaskRepository> {
    pub board: TaskBoard<R>,
    pub mode: Mode,
    pub input: String,
    pub removing: Option<TaskId>,
    pub status: Option<String>,
}

impl<R: TaskRepository> App<R> {
    pub fn new(board: TaskBoard<R>) -> Self {
        Self { board, mode: Mode::Browse, input: String::new(), removing: None, status: None }
    }

    pub async fn handle(&mut self, intent: Intent, now: &DateTime<Local>) -> Effect {
        self.status = None;
        match intent {
            Intent::Quit => return Effect::Quit,
            Intent::FocusInput => self.mode = Mode::Compose,
            Intent::LeaveInput => self.mode = Mode::Browse,
            Intent::Insert(c) => match &mut self.mode {
                Mode::Editing { buffer, .. } => buffer.push(c),
                _ => self.input.push(c),
            },
            Intent::Backspace => {
                match &mut self.mode {
                    Mode::Editing { buffer, .. } => buffer.pop(),
                    _ => self.input.pop(),
                };
            }
            Intent::Submit => {
                let command = Command::Add { text: self.input.clone() };
                if self.board.dispatch(command, now).await.is_applied() {
                    self.input.clear();
                }
            }
            Intent::StartEdit => {
                if let Some(task) = self.board.focused().and_then(|id| self.board.tasks().get(id)) {
                    self.mode = Mode::Editing { id: task.id.clone(), buffer: task.text.clone() };
                }
            }
            Intent::ConfirmEdit => {
                if let Mode::Editing { id, buffer } = std::mem::replace(&mut self.mode, Mode::Browse) {
                    // Blank text cancels the edit instead of clearing the task.
                    if !buffer.trim().is_empty() {
                        self.board.dispatch(Command::Edit { id, text: buffer }, now).await;
                    }
                }
            }
            Intent::CancelEdit => self.mode = Mode::Browse,
            Intent::ToggleFocused => {
                if let Some(id) = self.board.focused().cloned() {
                    self.board.dispatch(Command::Toggle { id }, now).await;
                }
            }
            Intent::DeleteFocused => {
                if let Some(id) = self.board.focused().cloned() {
                    self.removing = Some(id.clone());
                    return Effect::AnimateDelete(id);
                }
            }
            Intent::FocusPrev => self.move_focus(-1),
            Intent::FocusNext => self.move_focus(1),
            Intent::MoveUp => self.move_focused_task(-1, now).await,
            Intent::MoveDown => self.move_focused_task(1, now).await,
        }
        Effect::None
    }

    /// Second half of a delete, run after [`REMOVE_DELAY`].
    pub async fn finish_delete(&mut self, id: TaskId, now: &DateTime<Local>) {
        self.removing = None;
        self.board.dispatch(Command::Delete { id }, now).await;
    }

    fn move_focus(&mut self, step: isize) {
        let visible: Vec<TaskId> = self.board.groups().iter().map(|task| task.id.clone()).collect();
        if visible.is_empty() {
            return;
        }
        let last = visible.len() - 1;
        let current = self.board.focused().and_then(|id| visible.iter().position(|v| v == id));
        let next = match current {
            None if step < 0 => last,
            None => 0,
            Some(index) => index.saturating_add_signed(step).min(last),
        };
        self.board.focus(visible.get(next).cloned());
    }

    async fn move_focused_task(&mut self, step: isize, now: &DateTime<Local>) {
        if self.board.display_order() == DisplayOrder::Created {
            self.status = Some("Set DAYLIST_ORDER=manual to reorder tasks".to_owned());
            return;
        }
        let Some(command) = self.reorder_request(step) else { return };
        self.board.dispatch(command, now).await;
    }

    fn reorder_request(&self, step: isize) -> Option<Command> {
        let focused = self.board.focused()?;
        let group = self.board.tasks().get(focused)?.group();
        let groups = self.board.groups();
        let mut ids: Vec<TaskId> = groups.group(group).iter().map(|task| task.id.clone()).collect();
        let from = ids.iter().position(|id| id == focused)?;
        let to = from.checked_add_signed(step).filter(|to| *to < ids.len())?;
        ids.swap(from, to);
        Some(Command::Reorder { ids, group })
    }

    pub fn view(&self, now: &DateTime<Local>) -> View<'_> {
        let groups = self.board.groups();
        View {
            header: Header::at(now),
            counts: groups.counts(),
            groups,
            focused: self.board.focused(),
            removing: self.removing.as_ref(),
            mode: &self.mode,
            input: &self.input,
            status: self.status.as_deref(),
        }
    }
}

pub async fn run<B: Backend, R: TaskRepository>(terminal: &mut Terminal<B>, app: &mut App<R>) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    let mut last_refresh = Instant::now();

    loop {
        let now = Local::now();
        terminal.draw(|f| view::draw(f, &app.view(&now)))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press { continue; }
                let Some(intent) = shortcuts::resolve(&app.mode, key) else { continue };
                match app.handle(intent, &now).await {
                    Effect::Quit => break,
                    Effect::AnimateDelete(id) => {
                        terminal.draw(|f| view::draw(f, &app.view(&now)))?;
                        tokio::time::sleep(REMOVE_DELAY).await;
                        app.finish_delete(id, &Local::now()).await;
                    }
                    Effect::None => {}
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
        if last_refresh.elapsed() >= clock::REFRESH {
            last_refresh = Instant::now();
            let now = Local::now();
            if app.board.day_changed(&now) {
                tracing::info!("local date changed; rolling tasks over");
                app.board.dispatch(Command::Rollover, &now).await;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::infrastructure::{kv::KvTaskRepository, memory_store::MemoryStore};

    type TestApp = App<KvTaskRepository<MemoryStore>>;

    fn now() -> DateTime<Local> { Local.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap() }

    async fn app_with(order: DisplayOrder, texts: &[&str]) -> TestApp {
        let repo = KvTaskRepository::new(MemoryStore::default(), "qn_tasks");
        let mut board = TaskBoard::open(repo, order, &now()).await.unwrap();
        for (offset, text) in texts.iter().enumerate() {
            let at = now() + chrono::Duration::seconds(offset as i64);
            board.dispatch(Command::Add { text: (*text).to_owned() }, &at).await;
        }
        App::new(board)
    }

    async fn type_text(app: &mut TestApp, text: &str) {
        for c in text.chars() {
            app.handle(Intent::Insert(c), &now()).await;
        }
    }

    fn focused_text(app: &TestApp) -> Option<String> {
        app.board.focused().and_then(|id| app.board.tasks().get(id)).map(|t| t.text.clone())
    }

    #[tokio::test]
    async fn compose_and_submit_adds_task() {
        let mut app = app_with(DisplayOrder::Created, &[]).await;
        app.handle(Intent::FocusInput, &now()).await;
        type_text(&mut app, "  pay bills ").await;
        app.handle(Intent::Submit, &now()).await;

        assert_eq!(app.board.tasks()[0].text, "pay bills");
        assert!(app.input.is_empty());
        assert_eq!(app.mode, Mode::Compose);

        type_text(&mut app, "   ").await;
        app.handle(Intent::Submit, &now()).await;
        assert_eq!(app.board.tasks().len(), 1);
        assert_eq!(app.input, "   ");
    }

    #[tokio::test]
    async fn focus_walks_visible_order_and_clamps() {
        let mut app = app_with(DisplayOrder::Created, &["first", "second"]).await;
        app.handle(Intent::FocusNext, &now()).await;
        assert_eq!(focused_text(&app).as_deref(), Some("second"));
        app.handle(Intent::FocusNext, &now()).await;
        app.handle(Intent::FocusNext, &now()).await;
        assert_eq!(focused_text(&app).as_deref(), Some("first"));
        app.handle(Intent::FocusPrev, &now()).await;
        assert_eq!(focused_text(&app).as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn inline_edit_confirms_or_cancels() {
        let mut app = app_with(DisplayOrder::Created, &["draft"]).await;
        app.handle(Intent::FocusNext, &now()).await;
        app.handle(Intent::StartEdit, &now()).await;
        assert!(matches!(&app.mode, Mode::Editing { buffer, .. } if buffer == "draft"));

        type_text(&mut app, " v2").await;
        app.handle(Intent::ConfirmEdit, &now()).await;
        assert_eq!(app.board.tasks()[0].text, "draft v2");
        assert_eq!(app.mode, Mode::Browse);

        app.handle(Intent::StartEdit, &now()).await;
        for _ in 0.."draft v2".len() {
            app.handle(Intent::Backspace, &now()).await;
        }
        type_text(&mut app, "  ").await;
        app.handle(Intent::ConfirmEdit, &now()).await;
        assert_eq!(app.board.tasks()[0].text, "draft v2");
        assert_eq!(app.mode, Mode::Browse);
    }

    #[tokio::test]
    async fn compose_draft_survives_inline_edit() {
        let mut app = app_with(DisplayOrder::Created, &["walk dog"]).await;
        app.handle(Intent::FocusInput, &now()).await;
        type_text(&mut app, "half typed").await;
        app.handle(Intent::LeaveInput, &now()).await;

        app.handle(Intent::FocusNext, &now()).await;
        app.handle(Intent::StartEdit, &now()).await;
        type_text(&mut app, "!").await;
        app.handle(Intent::CancelEdit, &now()).await;
        assert_eq!(app.input, "half typed");
        assert_eq!(app.board.tasks()[0].text, "walk dog");

        app.handle(Intent::StartEdit, &now()).await;
        type_text(&mut app, " twice").await;
        app.handle(Intent::ConfirmEdit, &now()).await;
        assert_eq!(app.input, "half typed");
        assert_eq!(app.board.tasks()[0].text, "walk dog twice");

        app.handle(Intent::FocusInput, &now()).await;
        app.handle(Intent::Submit, &now()).await;
        assert_eq!(app.board.tasks()[0].text, "half typed");
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn toggle_and_delete_focused() {
        let mut app = app_with(DisplayOrder::Created, &["only"]).await;
        assert_eq!(app.handle(Intent::DeleteFocused, &now()).await, Effect::None);

        app.handle(Intent::FocusNext, &now()).await;
        app.handle(Intent::ToggleFocused, &now()).await;
        assert!(app.board.tasks()[0].done);

        let Effect::AnimateDelete(id) = app.handle(Intent::DeleteFocused, &now()).await else { panic!("expected delete") };
        assert_eq!(app.removing.as_ref(), Some(&id));
        app.finish_delete(id, &now()).await;
        assert!(app.board.tasks().is_empty());
        assert!(app.removing.is_none());
        assert!(app.board.focused().is_none());
    }

    #[tokio::test]
    async fn moving_tasks_needs_manual_order() {
        let mut created = app_with(DisplayOrder::Created, &["a", "b"]).await;
        created.handle(Intent::FocusNext, &now()).await;
        created.handle(Intent::MoveDown, &now()).await;
        assert!(created.status.is_some());

        let mut manual = app_with(DisplayOrder::Manual, &["a", "b"]).await;
        manual.handle(Intent::FocusNext, &now()).await;
        assert_eq!(focused_text(&manual).as_deref(), Some("b"));
        manual.handle(Intent::MoveDown, &now()).await;

        let order: Vec<&str> = manual.board.groups().today.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
        assert_eq!(focused_text(&manual).as_deref(), Some("b"));

        manual.handle(Intent::MoveDown, &now()).await;
        let order: Vec<&str> = manual.board.groups().today.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn quit_is_reported_to_the_loop() {
        let mut app = app_with(DisplayOrder::Created, &[]).await;
        assert_eq!(app.handle(Intent::Quit, &now()).await, Effect::Quit);
    }
}
