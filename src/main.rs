mod cli;
mod config;
mod database;
mod drag;
mod editor;
mod models;
mod storage;
mod store;
mod ui;
mod view;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use config::Config;
use database::Database;
use drag::DragSession;
use models::TodoId;
use std::io::{self, Write};
use store::{Lookup, TodoStore};
use ui::run_tui;

// Helper function to ask user for confirmation
fn ask_user_confirmation(prompt: &str) -> Result<bool> {
    print!("{} (y/n): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn resolve(store: &TodoStore<Database>, selector: &str) -> Result<Option<TodoId>> {
    match store.find(selector) {
        Lookup::Exact(id) => Ok(Some(id)),
        Lookup::Suggested(id) => {
            let text = store.get(id).map(|todo| todo.text.as_str()).unwrap_or_default();
            if ask_user_confirmation(&format!("'{}' not found. Did you mean '{}'?", selector, text))? {
                Ok(Some(id))
            } else {
                println!("Operation cancelled.");
                Ok(None)
            }
        }
        Lookup::NotFound => {
            println!("Todo '{}' not found.", selector);
            Ok(None)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    config::init_logging(&config)?;

    let db = Database::open(&config.db_path)?;
    let mut store = TodoStore::load(db);

    match cli.command {
        Some(Commands::List) => {
            print!("{}", view::render_plain(&view::project(&store, &DragSession::default())));
        }
        Some(Commands::Stats) => {
            println!("{}", view::stats_line(&store.stats()));
            if let Some(saved) = store.storage().updated_at(storage::TODOS_KEY)? {
                println!("Last saved: {}", saved);
            }
        }
        Some(Commands::Add { text }) => {
            let text = text.join(" ");
            match store.add(&text) {
                Some(id) => println!("Added todo {}", id),
                None => println!("Nothing to add: text is empty."),
            }
        }
        Some(Commands::Toggle { selector }) => {
            if let Some(id) = resolve(&store, &selector)? {
                store.toggle(id);
                if let Some(todo) = store.get(id) {
                    let state = if todo.completed { "completed" } else { "not completed" };
                    println!("'{}' marked {}", todo.text, state);
                }
            }
        }
        Some(Commands::Edit { selector, text }) => {
            if let Some(id) = resolve(&store, &selector)? {
                if store.edit(id, &text.join(" ")) {
                    println!("Todo {} updated", id);
                } else {
                    println!("Nothing changed.");
                }
            }
        }
        Some(Commands::Delete { selector, yes }) => {
            if let Some(id) = resolve(&store, &selector)? {
                store.request_delete(id);
                let text = store.get(id).map(|todo| todo.text.clone()).unwrap_or_default();
                let confirmed = yes
                    || ask_user_confirmation(&format!("{} '{}'", view::MODAL_MESSAGE, text))?;
                if confirmed && store.confirm_delete() {
                    println!("Deleted '{}'", text);
                } else {
                    store.cancel_delete();
                    println!("Delete cancelled.");
                }
            }
        }
        Some(Commands::Reorder { selector, target }) => {
            let Some(dragged) = resolve(&store, &selector)? else {
                return Ok(());
            };
            let Some(target) = resolve(&store, &target)? else {
                return Ok(());
            };
            let mut drag = DragSession::default();
            drag.drag_start(dragged);
            if drag.drop(target, &mut store) {
                print!("{}", view::render_plain(&view::project(&store, &drag)));
            } else {
                println!("Nothing changed.");
            }
        }
        Some(Commands::Theme { value }) => {
            let theme = match value {
                Some(theme) => {
                    store.set_theme(theme);
                    store.theme()
                }
                None => store.toggle_theme(),
            };
            println!("Theme: {}", theme);
        }
        Some(Commands::Reset) => {
            if ask_user_confirmation("Reset all todos and theme to defaults?")? {
                store.reset().context("Failed to reset stored data")?;
                println!("All data reset.");
            } else {
                println!("Operation cancelled.");
            }
        }
        Some(Commands::Tui) | None => {
            run_tui(store)?;
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "keeper", &mut io::stdout());
        }
    }

    Ok(())
}
