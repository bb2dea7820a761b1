use crate::board::TaskBoard;
use crate::filter::Filters;
use crate::task::{Category, Task};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::{self, Write};
use std::path::Path;

pub fn build() -> Command {
    Command::new("taskboard")
        .version("0.1.0")
        .about("Sticky-note task board in the terminal")
        .arg(
            Arg::new("file")
                .long("file")
                .value_name("PATH")
                .global(true)
                .help("Path to the task snapshot file"),
        )
        .subcommand(
            Command::new("add")
                .about("Add a new task")
                .arg(Arg::new("text").required(true).help("Task text"))
                .arg(
                    Arg::new("due")
                        .long("due")
                        .value_name("YYYY-MM-DD")
                        .help("Deadline (defaults to today)"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .default_value("personal")
                        .help("Task category: school or personal"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List tasks")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .default_value("all")
                        .help("all, school or personal"),
                )
                .arg(
                    Arg::new("due")
                        .long("due")
                        .value_name("YYYY-MM-DD")
                        .help("Only tasks due exactly on this date"),
                )
                .arg(
                    Arg::new("status")
                        .long("status")
                        .default_value("all")
                        .help("all, active or completed"),
                ),
        )
        .subcommand(
            Command::new("done")
                .about("Toggle a task's completion")
                .arg(Arg::new("id").required(true).help("Task id")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a task")
                .arg(Arg::new("id").required(true).help("Task id"))
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .action(ArgAction::SetTrue)
                        .help("Skip the confirmation prompt"),
                ),
        )
        .subcommand(Command::new("stats").about("Show task statistics"))
}

pub fn run(matches: &ArgMatches, path: &Path) -> Result<()> {
    let mut board = TaskBoard::load_from(path)
        .with_context(|| format!("failed to load tasks from {}", path.display()))?;

    match matches.subcommand() {
        Some(("add", sub)) => {
            let text = sub.get_one::<String>("text").unwrap();
            let deadline = match sub.get_one::<String>("due") {
                Some(raw) => raw
                    .parse::<NaiveDate>()
                    .with_context(|| format!("invalid deadline '{raw}'"))?,
                None => Local::now().date_naive(),
            };
            let category = sub
                .get_one::<String>("category")
                .unwrap()
                .parse::<Category>()
                .map_err(anyhow::Error::msg)?;

            let task = board.add_task(text, deadline, category)?;
            board.save_to(path)?;
            println!("Added task #{}", task.id);
        }
        Some(("list", sub)) => {
            let filters = Filters {
                category: sub
                    .get_one::<String>("category")
                    .unwrap()
                    .parse()
                    .map_err(anyhow::Error::msg)?,
                date: match sub.get_one::<String>("due") {
                    Some(raw) => Some(
                        raw.parse::<NaiveDate>()
                            .with_context(|| format!("invalid date '{raw}'"))?,
                    ),
                    None => None,
                },
                status: sub
                    .get_one::<String>("status")
                    .unwrap()
                    .parse()
                    .map_err(anyhow::Error::msg)?,
            };
            board.apply_filters(filters);

            let tasks = board.filtered_tasks();
            if tasks.is_empty() {
                println!("No tasks found");
            }
            for task in tasks {
                println!("{}", format_task(task));
            }
        }
        Some(("done", sub)) => {
            let id = parse_id(sub)?;
            if board.toggle_task(id) {
                board.save_to(path)?;
                println!("Toggled task #{id}");
            } else {
                println!("No task with id {id}");
            }
        }
        Some(("rm", sub)) => {
            let id = parse_id(sub)?;
            if !sub.get_flag("yes") && !confirm("Delete this task? [y/N] ")? {
                return Ok(());
            }
            if board.delete_task(id) {
                board.save_to(path)?;
                println!("Deleted task #{id}");
            } else {
                println!("No task with id {id}");
            }
        }
        Some(("stats", _)) => {
            let stats = board.stats();
            println!("Total: {}", stats.total);
            println!("Active: {}", stats.active);
            println!("Completed: {}", stats.completed);
        }
        _ => {
            println!("Use --help for available commands.");
        }
    }
    Ok(())
}

fn format_task(task: &Task) -> String {
    let marker = if task.completed { "x" } else { " " };
    format!(
        "[{}] #{} {} ({}, due {})",
        marker,
        task.id,
        task.text,
        task.category.label(),
        task.deadline.format("%d.%m.%Y")
    )
}

fn parse_id(sub: &ArgMatches) -> Result<u64> {
    let raw = sub.get_one::<String>("id").unwrap();
    raw.parse::<u64>()
        .with_context(|| format!("invalid task id '{raw}'"))
}

fn confirm(message: &str) -> Result<bool> {
    print!("{message}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn command_parses_add_with_options() {
        let matches = build().get_matches_from([
            "taskboard", "add", "Math HW", "--due", "2024-05-01", "--category", "school",
        ]);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "add");
        assert_eq!(sub.get_one::<String>("text").unwrap(), "Math HW");
        assert_eq!(sub.get_one::<String>("due").unwrap(), "2024-05-01");
        assert_eq!(sub.get_one::<String>("category").unwrap(), "school");
    }

    #[test]
    fn list_filters_default_to_all() {
        let matches = build().get_matches_from(["taskboard", "list"]);
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>("category").unwrap(), "all");
        assert_eq!(sub.get_one::<String>("status").unwrap(), "all");
        assert!(sub.get_one::<String>("due").is_none());
    }

    #[test]
    fn file_flag_is_visible_from_subcommands() {
        let matches =
            build().get_matches_from(["taskboard", "stats", "--file", "/tmp/tasks.json"]);
        assert_eq!(
            matches.get_one::<String>("file").unwrap(),
            "/tmp/tasks.json"
        );
    }

    #[test]
    fn formats_completed_task_row() {
        let task = Task {
            id: 3,
            text: "Buy groceries".to_string(),
            deadline: "2024-05-02".parse().unwrap(),
            category: Category::Personal,
            completed: true,
            created_at: Utc::now(),
        };
        assert_eq!(
            format_task(&task),
            "[x] #3 Buy groceries (Personal, due 02.05.2024)"
        );
    }
}
