//! tasklink CLI - personal task tracking with linked tasks.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use tasklink::{Config, LocalDigest, Repository, SearchFilter, Status, Task, TaskUpdate, summarize_with};

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklink")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tasklink.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn format_status(status: &Status) -> ColoredString {
    match status {
        Status::Open => "open".green(),
        Status::InProgress => "in-progress".yellow(),
        Status::Done => "done".blue(),
        Status::Blocked => "blocked".red(),
    }
}

fn format_links(task: &Task) -> String {
    if task.links.is_empty() {
        "-".to_string()
    } else {
        task.links.iter().map(|id| format!("#{}", id)).collect::<Vec<_>>().join(", ")
    }
}

fn print_task_line(task: &Task) {
    let tags = if task.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", task.tags.join(", "))
    };
    let links = if task.links.is_empty() {
        String::new()
    } else {
        format!(" -> {}", format_links(task))
    };
    println!(
        "{} {} {}{}{}",
        format!("#{}", task.id).cyan(),
        format_status(&task.status),
        task.title,
        tags.dimmed(),
        links.dimmed()
    );
}

fn print_task_detail(task: &Task, linked: &[Task]) {
    println!("{}: {}", "ID".bold(), format!("#{}", task.id).cyan());
    println!("{}: {}", "Title".bold(), task.title);
    println!("{}: {}", "Status".bold(), format_status(&task.status));
    if !task.description.is_empty() {
        println!("{}: {}", "Description".bold(), task.description);
    }
    if !task.tags.is_empty() {
        println!("{}: {}", "Tags".bold(), task.tags.join(", "));
    }
    println!("{}: {}", "Created".bold(), task.created_at);
    println!("{}: {}", "Updated".bold(), task.updated_at);
    if linked.is_empty() {
        println!("{}: {}", "Linked".bold(), "-".dimmed());
    } else {
        println!("{}:", "Linked".bold());
        for other in linked {
            println!(
                "  {} {} {}",
                format!("#{}", other.id).cyan(),
                format_status(&other.status),
                other.title
            );
        }
    }
}

fn print_task_list(tasks: &[Task], empty: &str) {
    if tasks.is_empty() {
        println!("{}", empty.dimmed());
    } else {
        for task in tasks {
            print_task_line(task);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::discover(cli.config.as_deref()).context("Failed to load config")?;
    let store_path = config.resolve_store_path(cli.file);
    info!("Using task file {}", store_path.display());

    let mut repo = Repository::open(store_path);

    match cli.command {
        Command::Add {
            title,
            description,
            status,
            tags,
        } => {
            let tag_refs: Vec<&str> = tags.iter().map(|s| s.as_str()).collect();
            let task = repo
                .add(&title, &description, status, &tag_refs)
                .context("Failed to add task")?;

            println!("{} Added: {} {}", "✓".green(), format!("#{}", task.id).cyan(), task.title);
        }

        Command::List => {
            let tasks = repo.list().context("Failed to list tasks")?;
            print_task_list(&tasks, "No tasks");
        }

        Command::Show { id } => match repo.get(id).context("Failed to get task")? {
            Some(task) => {
                let linked = repo.linked(id).context("Failed to get linked tasks")?;
                print_task_detail(&task, &linked);
            }
            None => {
                eprintln!("{} Task not found: #{}", "✗".red(), id);
                std::process::exit(1);
            }
        },

        Command::Edit {
            id,
            title,
            description,
            status,
            tags,
            clear_tags,
        } => {
            let update = TaskUpdate {
                title,
                description,
                status,
                tags: if clear_tags { Some(Vec::new()) } else { tags },
            };
            if update.is_empty() {
                eyre::bail!("Nothing to edit: pass --title, --description, --status, --tags or --clear-tags");
            }

            let task = repo.edit(id, update).context("Failed to edit task")?;
            println!("{} Updated: {} {}", "✓".green(), format!("#{}", task.id).cyan(), task.title);
        }

        Command::Delete { id } => {
            if repo.delete(id).context("Failed to delete task")? {
                println!("{} Deleted: {}", "✓".green(), format!("#{}", id).cyan());
            } else {
                eprintln!("{} Task not found: #{}", "✗".red(), id);
                std::process::exit(1);
            }
        }

        Command::Link { a, b } => {
            repo.link(a, b).context("Failed to link tasks")?;
            println!(
                "{} Linked {} <-> {}",
                "✓".green(),
                format!("#{}", a).cyan(),
                format!("#{}", b).cyan()
            );
        }

        Command::Unlink { a, b } => {
            repo.unlink(a, b).context("Failed to unlink tasks")?;
            println!(
                "{} Unlinked {} <-> {}",
                "✓".green(),
                format!("#{}", a).cyan(),
                format!("#{}", b).cyan()
            );
        }

        Command::Search { text, tag, status } => {
            let filter = SearchFilter {
                text: if text.is_empty() { None } else { Some(text.join(" ")) },
                tag,
                status,
            };
            let tasks = repo.search(&filter).context("Failed to search tasks")?;
            print_task_list(&tasks, "No matching tasks");
            println!("{} {} match(es)", "→".blue(), tasks.len());
        }

        Command::Summary { json } => {
            let summary = repo.summary().context("Failed to summarize tasks")?;
            if json {
                let rendered = serde_json::to_string_pretty(&summary).context("Failed to render summary")?;
                println!("{}", rendered);
            } else {
                for status in Status::ALL {
                    let label = format!("{:>12}", status.as_str());
                    println!("{} {}", label, summary.count(status));
                }
                let label = format!("{:>12}", "total");
                println!("{} {}", label.bold(), summary.total);
            }
        }

        Command::Digest => {
            let tasks = repo.list().context("Failed to list tasks")?;
            let digest = LocalDigest::new(config.digest_top_tags);
            println!("{}", summarize_with(&digest, &tasks));
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
