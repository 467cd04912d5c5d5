//! Line-oriented front end: one command per stdin line, output on stdout.

use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::App;
use crate::model::{Axis, TextField};

#[derive(Debug, Clone, PartialEq)]
pub enum OffsetChange {
    Set(i64),
    Step(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Templates,
    Template(String),
    Set(TextField, String),
    Offset(Axis, OffsetChange),
    Scroll(Axis, f64),
    Count(u32),
    Preview,
    Print,
    Batch,
    Save,
    Add,
    QueueList,
    QueuePrint,
    QueueRemove(String),
    QueueClear,
    Search(String),
    Load(usize),
    Enqueue(usize),
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = split_word(line);

        match head.to_ascii_lowercase().as_str() {
            "templates" => Ok(Self::Templates),
            "template" => {
                if rest.is_empty() {
                    return Err("usage: template <name>".to_string());
                }
                Ok(Self::Template(rest.to_string()))
            }
            "set" => {
                let (field, value) = split_word(rest);
                if field.is_empty() {
                    return Err("usage: set <main|mid|sub> <text>".to_string());
                }
                Ok(Self::Set(field.parse()?, value.to_string()))
            }
            "offset" => {
                let (axis, value) = split_word(rest);
                let change = match value {
                    "+" => OffsetChange::Step(1),
                    "-" => OffsetChange::Step(-1),
                    other => OffsetChange::Set(
                        other
                            .parse()
                            .map_err(|_| "usage: offset <x|y> <n|+|->".to_string())?,
                    ),
                };
                Ok(Self::Offset(axis.parse()?, change))
            }
            "scroll" => {
                let (axis, direction) = split_word(rest);
                let delta_y = match direction {
                    "up" => -1.0,
                    "down" => 1.0,
                    _ => return Err("usage: scroll <x|y> <up|down>".to_string()),
                };
                Ok(Self::Scroll(axis.parse()?, delta_y))
            }
            "count" => rest
                .parse()
                .map(Self::Count)
                .map_err(|_| "usage: count <n>".to_string()),
            "preview" => Ok(Self::Preview),
            "print" => Ok(Self::Print),
            "batch" => Ok(Self::Batch),
            "save" => Ok(Self::Save),
            "add" => Ok(Self::Add),
            "queue" => {
                let (sub, arg) = split_word(rest);
                match sub {
                    "" | "list" => Ok(Self::QueueList),
                    "add" => Ok(Self::Add),
                    "print" => Ok(Self::QueuePrint),
                    "clear" => Ok(Self::QueueClear),
                    "remove" if !arg.is_empty() => Ok(Self::QueueRemove(arg.to_string())),
                    _ => Err("usage: queue [list|add|print|remove <id>|clear]".to_string()),
                }
            }
            "search" => Ok(Self::Search(rest.to_string())),
            "load" => parse_index(rest, "load").map(Self::Load),
            "enqueue" => parse_index(rest, "enqueue").map(Self::Enqueue),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command: {other} (try `help`)")),
        }
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

/// Search result numbers are 1-based on screen.
fn parse_index(value: &str, command: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("usage: {command} <result number>")),
    }
}

const HELP: &str = "\
commands:
  templates                     list templates (loads them if needed)
  template <name>               select a template
  set <main|mid|sub> <text>     edit a text field
  offset <x|y> <n|+|->          set or nudge an offset
  scroll <x|y> <up|down>        wheel over an offset
  count <n>                     set the print count
  preview                       render now
  print | batch | save          print one, print count copies, save
  add                           add the current label to the queue
  queue [list|print|remove <id>|clear]
  search <query>                search saved labels
  load <n> | enqueue <n>        send a search result to the editor or queue
  show                          show the editor form
  quit";

/// Read commands from stdin until EOF or `quit`.
pub async fn run_loop(app: &App) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("tagpress ready (session {}). Type `help`.", app.session_id);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => execute(app, command).await,
            Err(message) => println!("{message}"),
        }
    }
    Ok(())
}

pub async fn execute(app: &App, command: Command) {
    tracing::debug!(?command, "console command");
    match command {
        Command::Templates => {
            if app.editor.template_names().is_empty()
                && app.editor.load_templates().await.is_err()
            {
                return;
            }
            let selected = app.editor.form().template_name;
            for name in app.editor.template_names() {
                let marker = if selected.as_deref() == Some(name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {name}");
            }
        }
        Command::Template(name) => {
            app.editor.select_template(&name).await;
        }
        Command::Set(field, value) => app.editor.set_text(field, value),
        Command::Offset(axis, OffsetChange::Set(value)) => app.editor.set_offset(axis, value),
        Command::Offset(axis, OffsetChange::Step(direction)) => {
            let value = app.editor.adjust_offset(axis, direction);
            println!("{axis}: {value}");
        }
        Command::Scroll(axis, delta_y) => {
            let value = app.editor.scroll_offset(axis, delta_y);
            println!("{axis}: {value}");
        }
        Command::Count(count) => app.editor.set_print_count(count),
        Command::Preview => app.editor.update_preview().await,
        Command::Print => {
            app.editor.print_one().await;
        }
        Command::Batch => {
            app.editor.print_batch().await;
        }
        Command::Save => {
            app.editor.save_label().await;
        }
        Command::Add => {
            app.editor.add_to_queue();
        }
        Command::QueueList => {
            let items = app.queue.items();
            if items.is_empty() {
                println!("queue is empty");
            }
            for item in items {
                println!("{}  {}", item.id, item.label.summary());
            }
        }
        Command::QueuePrint => {
            app.queue.print_all().await;
        }
        Command::QueueRemove(id) => {
            if !app.queue.remove(&id) {
                println!("no queued label {id}");
            }
        }
        Command::QueueClear => app.queue.clear(),
        Command::Search(query) => {
            for (index, result) in app.search.perform_search(&query).await.iter().enumerate() {
                println!(
                    "{:>3}. {} [{}]",
                    index + 1,
                    result.editor_data().summary(),
                    result.date_created
                );
            }
        }
        Command::Load(index) => match app.search.result(index) {
            Some(result) => app.search.load_in_editor(&result),
            None => println!("no search result #{}", index + 1),
        },
        Command::Enqueue(index) => match app.search.result(index) {
            Some(result) => app.search.add_to_queue(&result),
            None => println!("no search result #{}", index + 1),
        },
        Command::Show => {
            let state = app.editor.snapshot();
            println!(
                "template: {}",
                state.form.template_name.as_deref().unwrap_or("-")
            );
            for field in TextField::all() {
                println!("{:>12}: {}", state.field_label(*field), state.form.text(*field));
            }
            println!(
                "      offset: x={} y={}   count: {}",
                state.form.x_offset, state.form.y_offset, state.print_count
            );
            if let Some(url) = state.preview_url {
                println!("     preview: {url}");
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}
