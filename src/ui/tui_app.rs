use crate::config::config::Config;
use crate::data::display::RowDisplay;
use crate::logging::LogRingBuffer;
use crate::table_display::{header_label, summary_line, NO_RESULTS};
use crate::view::page_window::ScrollMetrics;
use crate::view::sorter::SortKey;
use crate::view::TableController;
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use tracing::{debug, info};
use tui_input::{backend::crossterm::EventHandler, Input};

/// Lines per college row in the table
const ROW_HEIGHT: u16 = 3;

const LOG_PANEL_HEIGHT: u16 = 8;

/// Until the first draw measures the table area
const INITIAL_VIEWPORT_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Browse,
}

pub struct TuiApp {
    controller: TableController,
    config: Config,
    input: Input,
    focus: Focus,
    table_state: TableState,
    /// College rows that fit in the table area at the last draw
    viewport_rows: usize,
    show_logs: bool,
    log_buffer: Option<LogRingBuffer>,
    status_message: String,
    should_quit: bool,
}

/// Scroll geometry of a viewport whose last line holds the cursor, in rows
pub fn cursor_metrics(selected: usize, viewport_rows: usize, content_rows: usize) -> ScrollMetrics {
    let viewport = viewport_rows as f64;
    ScrollMetrics::new(
        selected as f64 + 1.0 - viewport,
        viewport,
        content_rows as f64,
    )
}

impl TuiApp {
    pub fn new(controller: TableController, config: Config, log_buffer: Option<LogRingBuffer>) -> Self {
        let input = Input::default().with_value(controller.query().to_string());
        let mut table_state = TableState::default();
        if !controller.is_empty() {
            table_state.select(Some(0));
        }
        let status_message =
            "Type to search - Tab: browse - 1-6: sort - F5: logs - Esc: quit".to_string();

        Self {
            controller,
            config,
            input,
            focus: Focus::Search,
            table_state,
            viewport_rows: INITIAL_VIEWPORT_ROWS,
            show_logs: false,
            log_buffer,
            status_message,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &TableController {
        &self.controller
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.ui(f))?;

            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                _ => {}
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::F(5) {
            self.show_logs = !self.show_logs;
            return;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter | KeyCode::Tab | KeyCode::Down => self.focus = Focus::Browse,
            _ => {
                self.input.handle_event(&Event::Key(key));
                let query = self.input.value().to_string();
                if query != self.controller.query() {
                    self.controller.set_query(&query);
                    self.status_message = summary_line(&self.controller);
                    self.after_view_change();
                }
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                self.select_sort(SortKey::ALL[index]);
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(self.page_step()),
            KeyCode::PageUp => self.move_selection(-self.page_step()),
            KeyCode::Home | KeyCode::Char('g') => {
                if !self.controller.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::End | KeyCode::Char('G') => {
                let len = self.controller.visible_len();
                if len > 0 {
                    self.table_state.select(Some(len - 1));
                    self.check_scroll_bottom();
                }
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.move_selection(1),
            MouseEventKind::ScrollUp => self.move_selection(-1),
            _ => {}
        }
    }

    fn select_sort(&mut self, key: SortKey) {
        let state = self.controller.select_sort(key);
        self.status_message = format!("Sorted by {} ({})", key.label(), state.direction);
        self.after_view_change();
    }

    fn after_view_change(&mut self) {
        if self.controller.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
        *self.table_state.offset_mut() = 0;
    }

    fn page_step(&self) -> isize {
        self.viewport_rows.max(1) as isize
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.controller.visible_len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let target = current.saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(target));

        if delta > 0 {
            self.check_scroll_bottom();
        }
    }

    fn check_scroll_bottom(&mut self) {
        let Some(selected) = self.table_state.selected() else {
            return;
        };
        let before = self.controller.visible_len();
        let metrics = cursor_metrics(selected, self.viewport_rows, before);
        if self.controller.on_scroll(metrics) && self.controller.visible_len() > before {
            debug!(
                target: "tui",
                "Loaded rows {}..{}",
                before,
                self.controller.visible_len()
            );
            self.status_message = summary_line(&self.controller);
        }
    }

    pub fn ui(&mut self, f: &mut Frame) {
        let mut constraints = vec![
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ];
        if self.show_logs {
            constraints.push(Constraint::Length(LOG_PANEL_HEIGHT));
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(f.area());

        self.render_search(f, chunks[0]);
        self.render_sort_bar(f, chunks[1]);
        self.render_table(f, chunks[2]);
        self.render_status(f, chunks[3]);
        if self.show_logs {
            self.render_logs(f, chunks[4]);
        }
    }

    fn render_search(&self, f: &mut Frame, area: Rect) {
        let border_style = if self.focus == Focus::Search {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let width = area.width.saturating_sub(2) as usize;
        let scroll = self.input.visual_scroll(width);

        let search = Paragraph::new(self.input.value())
            .scroll((0, scroll as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(format!(
                        " {} Search by college name ",
                        self.config.display.icons.search
                    )),
            );
        f.render_widget(search, area);

        if self.focus == Focus::Search {
            let cursor = self.input.visual_cursor().saturating_sub(scroll) as u16;
            f.set_cursor_position((area.x + 1 + cursor, area.y + 1));
        }
    }

    fn render_sort_bar(&self, f: &mut Frame, area: Rect) {
        let active = self.controller.sort_indicator();
        let spans: Vec<Span> = SortKey::ALL
            .into_iter()
            .enumerate()
            .map(|(i, key)| {
                let label = format!(
                    " {}:{} ",
                    i + 1,
                    header_label(key, active, &self.config.display)
                );
                if active.is_some_and(|state| state.key == key) {
                    Span::styled(
                        label,
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(label, Style::default().fg(Color::Cyan))
                }
            })
            .collect();
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let display = &self.config.display;
        let active = self.controller.sort_indicator();

        // Borders and the header line
        let body_height = area.height.saturating_sub(3);
        self.viewport_rows = usize::from((body_height / ROW_HEIGHT).max(1));

        let mut header_cells = Vec::new();
        if display.show_row_numbers {
            header_cells.push("#".to_string());
        }
        header_cells.extend(
            [
                SortKey::CdRank,
                SortKey::Name,
                SortKey::Fees,
                SortKey::Placements,
                SortKey::UserReview,
                SortKey::Ranking,
            ]
            .into_iter()
            .map(|key| header_label(key, active, display)),
        );
        let header = Row::new(header_cells)
            .style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));

        let mut widths = Vec::new();
        if display.show_row_numbers {
            widths.push(Constraint::Length(4));
        }
        widths.extend([
            Constraint::Length(9),
            Constraint::Min(30),
            Constraint::Length(16),
            Constraint::Length(28),
            Constraint::Length(28),
            Constraint::Length(10),
        ]);

        let rows: Vec<Row> = if self.controller.is_empty() {
            // Sentinel goes in the college column, the only one wide enough
            let mut cells = vec![Cell::from(""); widths.len()];
            let college_column = usize::from(display.show_row_numbers) + 1;
            cells[college_column] = Cell::from(NO_RESULTS);
            vec![Row::new(cells).style(Style::default().fg(Color::Yellow))]
        } else {
            self.controller
                .visible_display(display)
                .iter()
                .enumerate()
                .map(|(position, row)| table_row(position, row, display.show_row_numbers, &display.icons.featured))
                .collect()
        };

        let title = format!(
            " Colleges ({}/{}) ",
            self.controller.visible_len(),
            self.controller.working_set_len()
        );
        let border_style = if self.focus == Focus::Browse {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            )
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let mode = match self.focus {
            Focus::Search => Span::styled(" SEARCH ", Style::default().fg(Color::Black).bg(Color::Green)),
            Focus::Browse => Span::styled(" BROWSE ", Style::default().fg(Color::Black).bg(Color::Blue)),
        };
        let line = Line::from(vec![
            mode,
            Span::raw(" "),
            Span::raw(self.status_message.as_str()),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_logs(&self, f: &mut Frame, area: Rect) {
        let capacity = usize::from(area.height.saturating_sub(2));
        let lines: Vec<Line> = self
            .log_buffer
            .as_ref()
            .map(|buffer| buffer.get_recent(capacity))
            .unwrap_or_default()
            .into_iter()
            .map(|entry| Line::from(entry.format_for_display()))
            .collect();

        let logs = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Logs (F5) "));
        f.render_widget(logs, area);
    }
}

fn table_row<'a>(position: usize, row: &RowDisplay, row_numbers: bool, featured_icon: &str) -> Row<'a> {
    let lines = |lines: [String; 3]| Cell::from(Text::from(lines.map(Line::from).to_vec()));

    let rank = if row.featured {
        format!("{} {}", row.rank, featured_icon)
    } else {
        row.rank.clone()
    };

    let mut cells = Vec::with_capacity(7);
    if row_numbers {
        cells.push(Cell::from((position + 1).to_string()));
    }
    cells.extend([
        Cell::from(rank),
        lines([
            row.name.clone(),
            row.subtitle.clone(),
            row.courses.join(", "),
        ]),
        lines([
            row.fee.clone(),
            row.fee_course.clone(),
            "1st Year Fees".to_string(),
        ]),
        lines([
            format!("{} Average Package", row.placement_average),
            format!("{} Highest Package", row.placement_highest),
            String::new(),
        ]),
        lines([
            row.rating.clone(),
            row.review_count.clone(),
            row.review_highlight.clone().unwrap_or_default(),
        ]),
        lines([row.ranking.clone(), row.ranking_year.clone(), String::new()]),
    ]);

    let style = if row.featured {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Row::new(cells).height(ROW_HEIGHT).style(style)
}

/// Set up the terminal, run the app and restore the terminal
pub fn run_tui(controller: TableController, config: Config, log_buffer: Option<LogRingBuffer>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(target: "tui", "Starting table view over {} colleges", controller.total_len());
    let mut app = TuiApp::new(controller, config, log_buffer);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loaders::load_bundled_dataset;
    use crate::view::controller::ViewSettings;
    use crate::view::sorter::SortDirection;
    use ratatui::backend::TestBackend;

    fn app() -> TuiApp {
        let controller =
            TableController::from_records(load_bundled_dataset().unwrap(), ViewSettings::default());
        TuiApp::new(controller, Config::default(), None)
    }

    fn press(app: &mut TuiApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut TuiApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn rendered_text(app: &mut TuiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| app.ui(f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_typing_filters() {
        let mut app = app();
        type_text(&mut app, "delhi");
        assert_eq!(app.controller().query(), "delhi");
        assert_eq!(app.controller().working_set_len(), 2);
        assert_eq!(app.selected(), Some(0));

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.controller().query(), "delh");
    }

    #[test]
    fn test_sort_keys_toggle_in_browse_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Browse);

        press(&mut app, KeyCode::Char('2'));
        let state = app.controller().sort_indicator().unwrap();
        assert_eq!(state.key, SortKey::Fees);
        assert_eq!(state.direction, SortDirection::Ascending);

        press(&mut app, KeyCode::Char('2'));
        let state = app.controller().sort_indicator().unwrap();
        assert_eq!(state.direction, SortDirection::Descending);
        assert!(app.status_message().starts_with("Sorted by Course Fees"));
    }

    #[test]
    fn test_scrolling_to_bottom_loads_more() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.controller().visible_len(), 10);

        for _ in 0..9 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.controller().visible_len(), 15);

        // Nothing beyond the dataset
        for _ in 0..30 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.selected(), Some(14));
        assert_eq!(app.controller().visible_len(), 15);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit(), "q is a search character");
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[test]
    fn test_render_shows_sentinel_for_no_results() {
        let mut app = app();
        type_text(&mut app, "zzzz");
        assert_eq!(app.selected(), None);
        assert!(rendered_text(&mut app).contains(NO_RESULTS));
    }

    #[test]
    fn test_sentinel_not_clipped_with_row_numbers() {
        let mut config = Config::default();
        config.display.show_row_numbers = true;
        let controller =
            TableController::from_records(load_bundled_dataset().unwrap(), ViewSettings::default());
        let mut app = TuiApp::new(controller, config, None);
        type_text(&mut app, "nothing like this");
        assert!(rendered_text(&mut app).contains(NO_RESULTS));
    }

    #[test]
    fn test_render_shows_course_and_labels() {
        let mut app = app();
        let text = rendered_text(&mut app);
        assert!(text.contains("BE/B.Tech - JEE Advanced"));
        assert!(text.contains("1st Year Fees"));
        assert!(text.contains("Average Package"));
        assert!(text.contains("Highest Package"));
    }

    #[test]
    fn test_render_shows_active_sort_indicator() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('5'));
        assert!(rendered_text(&mut app).contains("Ranking ▲"));
    }

    #[test]
    fn test_cursor_metrics_hit_bottom_near_last_row() {
        assert!(!cursor_metrics(5, 10, 10).is_at_bottom(1.0));
        assert!(cursor_metrics(8, 10, 10).is_at_bottom(1.0));
        assert!(cursor_metrics(9, 4, 10).is_at_bottom(1.0));
        assert!(!cursor_metrics(3, 4, 10).is_at_bottom(1.0));
    }
}
