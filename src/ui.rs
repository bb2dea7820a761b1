use crate::board::TaskBoard;
use crate::error::Result;
use crate::filter::{CategoryFilter, StatusFilter};
use crate::task::{Category, Task};
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Terminal,
};
use std::io;
use std::path::Path;

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    board: &mut TaskBoard,
    path: &Path,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Min(3), Constraint::Length(3)])
                .split(f.area());

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[0]);

            for (i, category) in Category::ALL.iter().enumerate() {
                let tasks = board.tasks_in_category(*category);
                let items: Vec<ListItem> = tasks
                    .iter()
                    .enumerate()
                    .map(|(j, t)| {
                        let cursor = board.selected_category == i && board.selected_task == j;
                        ListItem::new(task_line(t, cursor))
                    })
                    .collect();

                let list = List::new(items).block(
                    Block::default()
                        .title(category.label())
                        .borders(Borders::ALL)
                        .border_style(if board.selected_category == i {
                            Style::default().fg(Color::Cyan)
                        } else {
                            Style::default()
                        }),
                );

                f.render_widget(list, columns[i]);
            }

            let stats = board.stats();
            let status_bar = Paragraph::new(Line::from(vec![
                Span::raw(format!(
                    "Total: {}  Active: {}  Completed: {}",
                    stats.total, stats.active, stats.completed
                )),
                Span::raw("  |  "),
                Span::styled(
                    describe_filters(board),
                    Style::default().fg(Color::Yellow),
                ),
            ]))
            .block(Block::default().borders(Borders::ALL).title("Stats"));

            f.render_widget(status_bar, rows[1]);
        })?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()), // Quit
                KeyCode::Char('a') => {
                    // Add a new task
                    if let Some((text, deadline, category)) = prompt_new_task() {
                        if board.add_task(&text, deadline, category).is_ok() {
                            board.save_to(path)?;
                        }
                    }
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    // Toggle completion of the task under the cursor
                    if let Some(id) = board.selected_task_id() {
                        board.toggle_task(id);
                        board.save_to(path)?;
                    }
                }
                KeyCode::Char('d') => {
                    // Delete, gated by confirmation
                    if let Some(id) = board.selected_task_id() {
                        if confirm("Delete this task? [y/N]") {
                            board.delete_task(id);
                            board.save_to(path)?;
                            if board.selected_task > 0 {
                                board.selected_task -= 1;
                            }
                        }
                    }
                }
                KeyCode::Char('s') => {
                    let mut filters = board.filters;
                    filters.status = filters.status.cycle();
                    board.apply_filters(filters);
                }
                KeyCode::Char('c') => {
                    let mut filters = board.filters;
                    filters.category = filters.category.cycle();
                    board.apply_filters(filters);
                }
                KeyCode::Char('/') => {
                    let mut filters = board.filters;
                    filters.date = prompt("Filter by deadline (YYYY-MM-DD, empty to clear)")
                        .and_then(|input| input.parse::<NaiveDate>().ok());
                    board.apply_filters(filters);
                }
                KeyCode::Char('r') => {
                    board.reset_filters();
                }
                KeyCode::Left => {
                    if board.selected_category > 0 {
                        board.selected_category -= 1;
                        board.selected_task = 0;
                    }
                }
                KeyCode::Right => {
                    if board.selected_category < Category::ALL.len() - 1 {
                        board.selected_category += 1;
                        board.selected_task = 0;
                    }
                }
                KeyCode::Up => {
                    if board.selected_task > 0 {
                        board.selected_task -= 1;
                    }
                }
                KeyCode::Down => {
                    let max_tasks = board
                        .tasks_in_category(Category::ALL[board.selected_category])
                        .len();
                    if board.selected_task + 1 < max_tasks {
                        board.selected_task += 1;
                    }
                }
                _ => {}
            }
        }
    }
}

fn task_line(task: &Task, cursor: bool) -> Line<'_> {
    let marker = if task.completed { "[x]" } else { "[ ]" };
    let mut style = if task.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };
    if cursor {
        style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::raw(format!("{} #{} ", marker, task.id)),
        Span::styled(task.text.as_str(), style),
        Span::raw(format!(" (due {})", task.deadline.format("%d.%m.%Y"))),
    ])
}

fn describe_filters(board: &TaskBoard) -> String {
    if board.filters.is_default() {
        return "no filters".to_string();
    }
    let mut parts = Vec::new();
    if let CategoryFilter::Only(category) = board.filters.category {
        parts.push(format!("category: {category}"));
    }
    if let Some(date) = board.filters.date {
        parts.push(format!("date: {date}"));
    }
    if board.filters.status != StatusFilter::All {
        parts.push(format!("status: {}", board.filters.status));
    }
    parts.join("  ")
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        enable_raw_mode().ok();
        Some(input.trim().to_string())
    } else {
        enable_raw_mode().ok();
        None
    }
}

fn confirm(message: &str) -> bool {
    prompt(message)
        .map(|answer| answer.eq_ignore_ascii_case("y"))
        .unwrap_or(false)
}

fn prompt_new_task() -> Option<(String, NaiveDate, Category)> {
    let text = prompt("Task text")?;
    let deadline = match prompt("Deadline (YYYY-MM-DD, empty for today)") {
        Some(input) if !input.is_empty() => input.parse().ok()?,
        _ => Local::now().date_naive(),
    };
    let category = match prompt("Category (school/personal, empty for personal)") {
        Some(input) if !input.is_empty() => input.parse().ok()?,
        _ => Category::Personal,
    };
    Some((text, deadline, category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::filter::Filters;

    fn task(completed: bool) -> Task {
        Task {
            id: 1,
            text: "Math HW".to_string(),
            deadline: "2024-05-01".parse().unwrap(),
            category: Category::School,
            completed,
            created_at: Utc::now(),
        }
    }

    fn render_to_string(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn task_line_renders_localized_deadline() {
        let t = task(false);
        let line = task_line(&t, false);
        let rendered = render_to_string(&line);
        assert!(rendered.contains("#1"));
        assert!(rendered.contains("01.05.2024"));
        assert!(rendered.starts_with("[ ]"));
    }

    #[test]
    fn completed_task_line_is_marked() {
        let t = task(true);
        let line = task_line(&t, false);
        assert!(render_to_string(&line).starts_with("[x]"));
    }

    #[test]
    fn filter_bar_describes_active_filters() {
        let mut board = TaskBoard::new();
        assert_eq!(describe_filters(&board), "no filters");

        board.apply_filters(Filters {
            category: CategoryFilter::Only(Category::School),
            date: Some("2024-05-01".parse().unwrap()),
            status: StatusFilter::Active,
        });
        assert_eq!(
            describe_filters(&board),
            "category: school  date: 2024-05-01  status: active"
        );
    }
}
