use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

use crate::drag::DragSession;
use crate::editor::LineEditor;
use crate::models::{PopupMode, Theme, TodoId};
use crate::storage::Storage;
use crate::store::TodoStore;
use crate::view::{self, View};

struct Palette {
    fg: Color,
    bg: Color,
    muted: Color,
    accent: Color,
    done: Color,
    highlight: Color,
    popup_bg: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                fg: Color::Black,
                bg: Color::White,
                muted: Color::DarkGray,
                accent: Color::Blue,
                done: Color::Green,
                highlight: Color::LightCyan,
                popup_bg: Color::Gray,
            },
            Theme::Dark => Palette {
                fg: Color::White,
                bg: Color::Black,
                muted: Color::Gray,
                accent: Color::Cyan,
                done: Color::LightGreen,
                highlight: Color::DarkGray,
                popup_bg: Color::DarkGray,
            },
        }
    }
}

pub struct App<S: Storage> {
    pub store: TodoStore<S>,
    pub list_state: ListState,
    pub drag: DragSession,
    pub popup_mode: PopupMode,
    pub editor: Option<LineEditor>,
    pub should_quit: bool,
}

impl<S: Storage> App<S> {
    pub fn new(store: TodoStore<S>) -> Self {
        let mut list_state = ListState::default();
        if !store.todos().is_empty() {
            list_state.select(Some(0));
        }
        App {
            store,
            list_state,
            drag: DragSession::default(),
            popup_mode: PopupMode::None,
            editor: None,
            should_quit: false,
        }
    }

    pub fn view(&self) -> View {
        view::project(&self.store, &self.drag)
    }

    pub fn selected_id(&self) -> Option<TodoId> {
        self.list_state
            .selected()
            .and_then(|i| self.store.todos().get(i))
            .map(|todo| todo.id)
    }

    fn select_id(&mut self, id: TodoId) {
        let index = self.store.todos().iter().position(|todo| todo.id == id);
        self.list_state.select(index);
    }

    fn clamp_selection(&mut self) {
        let len = self.store.todos().len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn next_item(&mut self) {
        let len = self.store.todos().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
        self.track_drag_over();
    }

    pub fn previous_item(&mut self) {
        let len = self.store.todos().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
        self.track_drag_over();
    }

    fn track_drag_over(&mut self) {
        if let Some(id) = self.selected_id() {
            self.drag.drag_over(id);
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.toggle(id);
        }
    }

    pub fn open_add(&mut self) {
        self.editor = Some(LineEditor::new("Add Todo".to_string(), String::new()));
        self.popup_mode = PopupMode::AddTodo;
    }

    pub fn open_edit(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let text = self.store.get(id).map(|todo| todo.text.clone()).unwrap_or_default();
        self.editor = Some(LineEditor::new("Edit Todo".to_string(), text));
        self.popup_mode = PopupMode::EditTodo(id);
    }

    /// Enter in the input popup. Blank edits keep the previous text.
    pub fn commit_editor(&mut self) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        match self.popup_mode {
            PopupMode::AddTodo => {
                if let Some(id) = self.store.add(editor.get_content()) {
                    self.select_id(id);
                }
            }
            PopupMode::EditTodo(id) => {
                if editor.is_dirty() {
                    self.store.edit(id, editor.get_content());
                }
            }
            _ => {}
        }
        self.popup_mode = PopupMode::None;
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
        self.popup_mode = PopupMode::None;
    }

    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.request_delete(id);
            self.popup_mode = PopupMode::ConfirmDelete;
        }
    }

    pub fn resolve_delete(&mut self, confirm: bool) {
        if confirm {
            let staged = self.store.pending_delete();
            if self.store.confirm_delete() && staged.is_some() && staged == self.drag.dragged {
                self.drag.drag_end();
            }
        } else {
            self.store.cancel_delete();
        }
        self.popup_mode = PopupMode::None;
        self.clamp_selection();
    }

    /// Grabs the selected item, or drops the grabbed one onto the selection.
    pub fn grab_or_drop(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if self.drag.is_active() {
            let dragged = self.drag.dragged;
            self.drag.drop(id, &mut self.store);
            if let Some(dragged) = dragged {
                self.select_id(dragged);
            }
        } else {
            self.drag.drag_start(id);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match self.popup_mode {
            PopupMode::AddTodo | PopupMode::EditTodo(_) => self.handle_editor_key(code),
            PopupMode::ConfirmDelete => match code {
                KeyCode::Enter | KeyCode::Char('y') => self.resolve_delete(true),
                KeyCode::Esc | KeyCode::Char('n') => self.resolve_delete(false),
                _ => {}
            },
            PopupMode::None => self.handle_list_key(code),
        }
    }

    fn handle_editor_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => return self.commit_editor(),
            KeyCode::Esc => return self.close_editor(),
            _ => {}
        }
        if let Some(editor) = &mut self.editor {
            match code {
                KeyCode::Char(c) => editor.insert_char(c),
                KeyCode::Backspace => editor.delete_char(),
                KeyCode::Delete => editor.delete_forward(),
                KeyCode::Left => editor.move_cursor_left(),
                KeyCode::Right => editor.move_cursor_right(),
                KeyCode::Home => editor.move_to_start_of_line(),
                KeyCode::End => editor.move_to_end_of_line(),
                _ => {}
            }
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.next_item(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_item(),
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('a') => self.open_add(),
            KeyCode::Char('e') => self.open_edit(),
            KeyCode::Enter => {
                if self.drag.is_active() {
                    self.grab_or_drop();
                } else {
                    self.open_edit();
                }
            }
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Char('m') => self.grab_or_drop(),
            KeyCode::Char('t') => {
                self.store.toggle_theme();
            }
            KeyCode::Esc => self.drag.drag_end(),
            _ => {}
        }
    }
}

pub fn run_tui<S: Storage>(store: TodoStore<S>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("TUI terminated: {err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: Storage>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui<S: Storage>(f: &mut Frame, app: &mut App<S>) {
    let view = app.view();
    let palette = Palette::for_theme(view.theme);
    let base = Style::default().fg(palette.fg).bg(palette.bg);

    f.render_widget(Block::default().style(base), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.area());

    let theme_icon = match view.theme {
        Theme::Dark => "☀ light",
        Theme::Light => "☾ dark",
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled("✅ ToDoList App", base.add_modifier(Modifier::BOLD)),
        Span::styled("  Stay organized and productive", Style::default().fg(palette.muted)),
        Span::styled(format!("   [t] {}", theme_icon), Style::default().fg(palette.accent)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Keeper"))
    .style(base);
    f.render_widget(header, chunks[0]);

    let stats = Paragraph::new(view::stats_line(&view.stats))
        .block(Block::default().borders(Borders::ALL).title("Stats"))
        .style(base.fg(palette.accent));
    f.render_widget(stats, chunks[1]);

    render_list(f, app, &view, &palette, chunks[2]);

    let help = if app.drag.is_active() {
        "↑/↓: Choose drop target • m/Enter: Drop • Esc: Cancel move"
    } else {
        "a: Add • e/Enter: Edit • Space: Toggle • d: Delete • m: Move • t: Theme • q: Quit"
    };
    let footer = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(palette.muted).bg(palette.bg));
    f.render_widget(footer, chunks[3]);

    if let Some(editor) = &app.editor {
        let area = centered_rect(60, 20, f.area());
        let (before, after) = editor.split_at_cursor();
        let mut after_chars = after.chars();
        let cursor_char = after_chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
        let rest: String = after_chars.collect();

        let input = Line::from(vec![
            Span::raw(before.to_string()),
            Span::styled(cursor_char, Style::default().bg(palette.accent).fg(palette.bg)),
            Span::raw(rest),
        ]);
        let content = Paragraph::new(vec![
            input,
            Line::from(""),
            Line::from(Span::styled(
                "Enter: Save • Esc: Cancel",
                Style::default().fg(palette.muted),
            )),
        ])
        .block(
            Block::default()
                .title(editor.title.as_str())
                .borders(Borders::ALL),
        )
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(palette.fg).bg(palette.popup_bg));

        f.render_widget(Clear, area);
        f.render_widget(content, area);
    }

    if let Some(modal) = &view.modal {
        let area = centered_rect(50, 20, f.area());
        let content = Paragraph::new(format!(
            "{}\n\ny / Enter: Delete\nn / Esc: Cancel",
            modal.message
        ))
        .block(Block::default().title(modal.title).borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(palette.fg).bg(palette.popup_bg));

        f.render_widget(Clear, area);
        f.render_widget(content, area);
    }
}

fn render_list<S: Storage>(
    f: &mut Frame,
    app: &mut App<S>,
    view: &View,
    palette: &Palette,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title("Todos");

    if view.is_empty() {
        let empty = Paragraph::new("📋\n\nNo todos yet\nAdd your first todo with 'a' to get started!")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted).bg(palette.bg));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = view
        .items
        .iter()
        .map(|item| {
            let checkbox = if item.completed { "[x] " } else { "[ ] " };
            let handle = if item.dragging { "⇕ " } else { "⋮⋮ " };
            let mut text_style = Style::default().fg(palette.fg);
            if item.completed {
                text_style = text_style.fg(palette.done).add_modifier(Modifier::CROSSED_OUT);
            }
            if item.dragging {
                text_style = text_style.add_modifier(Modifier::ITALIC);
            }

            let mut spans = vec![
                Span::styled(handle, Style::default().fg(palette.muted)),
                Span::styled(checkbox, Style::default().fg(palette.accent)),
                Span::styled(item.text.clone(), text_style),
            ];
            if item.drag_over && !item.dragging {
                spans.push(Span::styled("  ← drop here", Style::default().fg(palette.accent)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(palette.fg).bg(palette.bg))
        .highlight_style(
            Style::default()
                .bg(palette.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

// Helper function to create centered rectangles for popups
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
