use std::io;
use std::path::{Path, PathBuf};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, BarChart, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row,
        Table, Wrap,
    },
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::record::Summary;
use crate::report::table::BudgetTable;
use crate::report::{aggregate, parse};
use crate::ui::format;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Summary,
    YearlyTrend,
    CategoryBreakdown,
}

impl View {
    fn next(self) -> Self {
        match self {
            View::Summary => View::YearlyTrend,
            View::YearlyTrend => View::CategoryBreakdown,
            View::CategoryBreakdown => View::Summary,
        }
    }

    fn label(self) -> &'static str {
        match self {
            View::Summary => "Summary",
            View::YearlyTrend => "Yearly Trend",
            View::CategoryBreakdown => "Category Breakdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Dashboard,
    Input,
}

#[derive(Debug, Clone)]
enum Notice {
    Info(String),
    Error(String),
}

struct DashboardState {
    mode: Mode,
    view: View,
    show_table: bool,

    // Per-session data: the loaded file and nothing else.
    file_name: Option<String>,
    table: Option<BudgetTable>,

    notice: Option<Notice>,

    // Load-file modal
    input_buffer: String,
    input_error: Option<String>,
}

impl DashboardState {
    fn new() -> Self {
        Self {
            mode: Mode::Dashboard,
            view: View::Summary,
            show_table: false,
            file_name: None,
            table: None,
            notice: None,
            input_buffer: String::new(),
            input_error: None,
        }
    }

    fn load_path(&mut self, path: &Path) {
        match parse::load_file(path).and_then(parse::RawTable::validate) {
            Ok(table) => {
                self.notice = Some(Notice::Info(format!(
                    "Loaded {} rows from {}",
                    table.row_count(),
                    path.display()
                )));
                self.file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.to_string());
                self.table = Some(table);
            }
            Err(err) => {
                // A failed load replaces the session file, so no stale
                // charts render alongside the error.
                self.table = None;
                self.file_name = None;
                self.notice = Some(Notice::Error(err.to_string()));
            }
        }
    }

    fn start_input(&mut self) {
        self.input_buffer.clear();
        self.input_error = None;
        self.mode = Mode::Input;
    }

    fn cancel_input(&mut self) {
        self.input_error = None;
        self.mode = Mode::Dashboard;
    }

    fn commit_input(&mut self) {
        let raw = self.input_buffer.trim().to_string();
        if raw.is_empty() {
            self.cancel_input();
            return;
        }

        let path = PathBuf::from(&raw);
        if !has_allowed_extension(&path) {
            self.input_error = Some("Only .csv and .xlsx files are accepted".to_string());
            return;
        }

        self.mode = Mode::Dashboard;
        self.input_error = None;
        self.load_path(&path);
    }
}

fn has_allowed_extension(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref(),
        Some("csv") | Some("xlsx")
    )
}

/// The data behind one render pass. Exactly one aggregation is computed
/// per pass; the unselected views are never touched.
enum ViewData {
    NoFile,
    Failed(String),
    Summary(Summary),
    Trend(Vec<(i64, Decimal)>),
    Breakdown(Vec<(String, Decimal)>),
}

/// Pure pass from session state to displayable data.
fn build_view(state: &DashboardState) -> ViewData {
    let Some(table) = state.table.as_ref() else {
        return ViewData::NoFile;
    };

    let computed = match state.view {
        View::Summary => aggregate::summarize(table).map(ViewData::Summary),
        View::YearlyTrend => aggregate::yearly_trend(table).map(ViewData::Trend),
        View::CategoryBreakdown => aggregate::category_breakdown(table).map(ViewData::Breakdown),
    };

    match computed {
        Ok(view) => view,
        Err(err) => ViewData::Failed(err.to_string()),
    }
}

pub fn run_dashboard(initial: Option<PathBuf>) -> Result<(), String> {
    let mut state = DashboardState::new();
    if let Some(path) = initial {
        state.load_path(&path);
    }

    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| format!("Failed to initialize terminal: {}", e))?;

        loop {
            // Recomputed from scratch on every pass; nothing is cached
            // between interactions.
            let view = build_view(&state);

            terminal
                .draw(|frame| {
                    let size = frame.area();
                    let layout = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([
                            Constraint::Length(3),
                            Constraint::Length(1),
                            Constraint::Min(5),
                            Constraint::Length(3),
                        ])
                        .split(size);

                    render_header(frame, layout[0], &state);
                    render_notice(frame, layout[1], &state);
                    render_body(frame, layout[2], &state, &view);
                    render_footer(frame, layout[3], &state);

                    if state.mode == Mode::Input {
                        render_input_modal(frame, size, &state);
                    }
                })
                .map_err(|e| format!("Failed to draw terminal UI: {}", e))?;

            if event::poll(std::time::Duration::from_millis(200))
                .map_err(|e| format!("Failed to poll input: {}", e))?
            {
                match event::read().map_err(|e| format!("Failed to read input: {}", e))? {
                    Event::Key(key) => {
                        if handle_key(&mut state, key) {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;

    result
}

fn handle_key(state: &mut DashboardState, key: KeyEvent) -> bool {
    // Many terminals emit both a Press and a Release event. Only act on
    // Press/Repeat.
    if key.kind == KeyEventKind::Release {
        return false;
    }

    match state.mode {
        Mode::Dashboard => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('1') => state.view = View::Summary,
            KeyCode::Char('2') => state.view = View::YearlyTrend,
            KeyCode::Char('3') => state.view = View::CategoryBreakdown,
            KeyCode::Tab => state.view = state.view.next(),
            KeyCode::Char('d') => state.show_table = !state.show_table,
            KeyCode::Char('o') => state.start_input(),
            _ => {}
        },
        Mode::Input => {
            // Allow Ctrl+C / Ctrl+Q to cancel
            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            {
                state.cancel_input();
                return false;
            }

            match key.code {
                KeyCode::Esc => state.cancel_input(),
                KeyCode::Enter => state.commit_input(),
                KeyCode::Backspace => {
                    state.input_buffer.pop();
                }
                KeyCode::Char(ch) => state.input_buffer.push(ch),
                _ => {}
            }
        }
    }

    false
}

fn render_header(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    let file = state.file_name.as_deref().unwrap_or("(no file)");
    let rows = state
        .table
        .as_ref()
        .map(|t| t.row_count().to_string())
        .unwrap_or_else(|| "-".to_string());

    let line = Line::from(vec![
        Span::styled("Budget Dashboard", Style::default().fg(Color::Cyan).bold()),
        Span::raw("  "),
        Span::styled(
            format!("View: {}", state.view.label()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::raw(format!("File: {}", file)),
        Span::raw("  |  "),
        Span::raw(format!("Rows: {}", rows)),
    ]);

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Left),
        area,
    );
}

fn render_notice(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    let line = match &state.notice {
        Some(Notice::Info(msg)) => Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Green),
        )),
        Some(Notice::Error(msg)) => Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Red).bold(),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Left), area);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    let hint = match state.mode {
        Mode::Dashboard => {
            "1 summary  2 trend  3 breakdown  Tab cycle  d data table  o open file  q/Esc exit"
        }
        Mode::Input => "Type a path, Enter load, Esc cancel",
    };

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(hint)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_body(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState, view: &ViewData) {
    let view_area = if state.show_table && state.table.is_some() {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        if let Some(table) = state.table.as_ref() {
            render_data_table(frame, split[1], table);
        }
        split[0]
    } else {
        area
    };

    match view {
        ViewData::NoFile => render_placeholder(
            frame,
            view_area,
            "Press o to load a budget file (.csv or .xlsx)",
            Color::DarkGray,
        ),
        ViewData::Failed(msg) => render_placeholder(frame, view_area, msg, Color::Red),
        ViewData::Summary(summary) => render_summary(frame, view_area, summary),
        ViewData::Trend(rows) => render_trend(frame, view_area, rows),
        ViewData::Breakdown(rows) => render_breakdown(frame, view_area, rows),
    }
}

fn render_placeholder(frame: &mut ratatui::Frame, area: Rect, message: &str, color: Color) {
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_summary(frame: &mut ratatui::Frame, area: Rect, summary: &Summary) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    render_card(
        frame,
        cards[0],
        "Total Budget",
        &format::currency(summary.total),
        Color::Cyan,
    );
    render_card(
        frame,
        cards[1],
        "Total Years",
        &summary.year_count.to_string(),
        Color::Magenta,
    );
    render_card(
        frame,
        cards[2],
        "Categories",
        &summary.category_count.to_string(),
        Color::Yellow,
    );
}

fn render_card(frame: &mut ratatui::Frame, area: Rect, title: &str, value: &str, color: Color) {
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Vertically center the value inside the card.
    let pad = inner.height.saturating_sub(1) / 2;
    let mut lines = vec![Line::from(""); pad as usize];
    lines.push(Line::from(Span::styled(
        value.to_string(),
        Style::default().fg(color).bold(),
    )));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_trend(frame: &mut ratatui::Frame, area: Rect, rows: &[(i64, Decimal)]) {
    if rows.is_empty() {
        render_placeholder(frame, area, "No rows to chart", Color::DarkGray);
        return;
    }

    let points: Vec<(f64, f64)> = rows
        .iter()
        .map(|(year, amount)| (*year as f64, amount.to_f64().unwrap_or(0.0)))
        .collect();

    let x_min = points.first().map(|p| p.0).unwrap_or(0.0);
    let x_max = points.last().map(|p| p.0).unwrap_or(1.0);
    // A single year still needs a non-degenerate axis.
    let (x_min, x_max) = if x_min == x_max {
        (x_min - 1.0, x_max + 1.0)
    } else {
        (x_min, x_max)
    };

    let max_amount = rows
        .iter()
        .map(|(_, amount)| *amount)
        .max()
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ONE);
    let y_max = max_amount.to_f64().unwrap_or(1.0) * 1.1;

    let x_labels = vec![
        format!("{:.0}", x_min),
        format!("{:.0}", (x_min + x_max) / 2.0),
        format!("{:.0}", x_max),
    ];
    let y_labels = vec![
        format::currency(Decimal::ZERO),
        format::currency(max_amount / Decimal::TWO),
        format::currency(max_amount),
    ];

    let datasets = vec![
        Dataset::default()
            .name("Amount")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().title("Yearly Trend").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Amount")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn render_breakdown(frame: &mut ratatui::Frame, area: Rect, rows: &[(String, Decimal)]) {
    if rows.is_empty() {
        render_placeholder(frame, area, "No rows to chart", Color::DarkGray);
        return;
    }

    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let data: Vec<(&str, u64)> = rows
        .iter()
        .map(|(category, amount)| {
            let value = amount.to_f64().unwrap_or(0.0).max(0.0).round() as u64;
            (category.as_str(), value)
        })
        .collect();

    let inner_width = split[0].width.saturating_sub(2) as usize;
    let per_bar = inner_width / data.len().max(1);
    let bar_width = per_bar.saturating_sub(1).clamp(3, 12) as u16;

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Category Breakdown")
                .borders(Borders::ALL),
        )
        .data(&data)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Magenta))
        .value_style(Style::default().fg(Color::Black).bg(Color::Magenta));

    frame.render_widget(chart, split[0]);
    render_breakdown_totals(frame, split[1], rows);
}

fn render_breakdown_totals(frame: &mut ratatui::Frame, area: Rect, rows: &[(String, Decimal)]) {
    let block = Block::default().title("Totals").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("Category", Style::default().fg(Color::White).bold()),
        Span::raw("  "),
        Span::styled("Amount", Style::default().fg(Color::White).bold()),
    ]));

    for (category, amount) in rows {
        let mut name = category.clone();
        if name.len() > 14 {
            name.truncate(11);
            name.push_str("...");
        }
        lines.push(Line::from(vec![
            Span::raw(format!("{:14}", name)),
            Span::raw("  "),
            Span::styled(
                format!("{:>14}", format::currency(*amount)),
                Style::default().fg(Color::Magenta),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
}

fn render_data_table(frame: &mut ratatui::Frame, area: Rect, table: &BudgetTable) {
    let block = Block::default().title("Data").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if table.rows().is_empty() {
        frame.render_widget(
            Paragraph::new("No rows")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let header = Row::new(
        table
            .columns()
            .iter()
            .map(|c| Cell::from(c.as_str()).style(Style::default().bold())),
    )
    .style(Style::default().fg(Color::White));

    let rows = table
        .rows()
        .iter()
        .map(|row| Row::new(row.iter().map(|v| Cell::from(v.as_str()))));

    let column_count = table.columns().len().max(1) as u32;
    let widths = vec![Constraint::Ratio(1, column_count); column_count as usize];

    frame.render_widget(
        Table::new(rows, widths).header(header).column_spacing(1),
        inner,
    );
}

fn render_input_modal(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    let popup_area = centered_rect(80, 30, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(vec![Span::styled(
            "Load Budget File",
            Style::default().bold(),
        )]),
        Line::from("Enter a .csv or .xlsx path (empty cancels)"),
        Line::from(""),
        Line::from(vec![Span::styled(
            format!("> {}", state.input_buffer),
            Style::default().fg(Color::Yellow),
        )]),
    ];

    if let Some(ref err) = state.input_error {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )]));
    }

    let block = Block::default().borders(Borders::ALL).title("Open");
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

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
