mod dataset;
mod render;
mod script;

use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use datatable_lib::config::TableConfig;
use datatable_lib::error::FetchError;
use datatable_lib::model::{Filter, HeaderSpec, TableAction};
use datatable_lib::query::Query;
use datatable_lib::{TableController, fetcher_fn, options_fn};
use serde_json::Value;
use simplelog::{Config, LevelFilter, WriteLogger};

use dataset::Directory;
use script::Command;

/// Waits until the latest fetch and any pending search debounce have settled.
async fn settle(table: &TableController<Value>) {
    let config = table.config();
    tokio::time::sleep(config.search_debounce + Duration::from_millis(10)).await;
    while table.state().loading.is_fetching {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn apply(table: &TableController<Value>, command: &Command) -> Result<(), String> {
    let result = match command {
        Command::Page(p) => table.set_page(*p).map(|_| ()),
        Command::Next => table.next_page().map(|_| ()),
        Command::Previous => table.previous_page().map(|_| ()),
        Command::Limit(l) => table.set_limit(*l),
        Command::Search(s) => table.set_search(s.as_str()),
        Command::OpenFilter(k) => table.open_filter(k),
        Command::Filter(k, option) => table.set_filter(k, *option),
        Command::Toggle(i) => table.toggle_selection(*i).map(|_| ()),
        Command::SelectAll => table.select_all().map(|_| ()),
        Command::Action(k, i) => table.run_action(k, *i).await,
        Command::Refresh => table.refresh(),
    };
    result.map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    let log_file = File::create("datatable-cli.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let commands: Vec<Command> = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            script::default_script()
        } else {
            match args
                .iter()
                .map(|a| script::parse(a))
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(commands) => commands,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(2);
                }
            }
        }
    };

    let directory = Arc::new(Directory::new(137, Duration::from_millis(120)));
    let server = Arc::clone(&directory);

    let table = match TableController::builder()
        .config(TableConfig::default().with_limit(10))
        .header("id", "ID")
        .header("name", "Name")
        .header("team", HeaderSpec::new("Team", "team.name"))
        .filter(Filter::new("team").with_fetch(options_fn(|| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, FetchError>(Directory::team_options())
        })))
        .action(
            TableAction::new("deactivate", |row: Value| async move {
                log::info!("Deactivating {}", row["id"]);
            })
            .with_sync_test(|row| row["active"].as_bool().unwrap_or(false)),
        )
        .selection("id")
        .search_fields(["name"])
        .on_select(|row, _| row["active"].as_bool().unwrap_or(false))
        .on_error(|e| log::error!("Table error: {e}"))
        .fetcher(fetcher_fn(move |page: u32, limit: u32, query: Query| {
            let server = Arc::clone(&server);
            async move { server.fetch(page, limit, query).await }
        }))
        .build()
    {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    table.subscribe(|snapshot| {
        log::debug!(
            "status {:?}, page {}/{}, loading {}",
            snapshot.status,
            snapshot.pagination.page,
            snapshot.pagination.pages,
            snapshot.loading.is_loading
        );
    });

    settle(&table).await;
    println!("{}", render::render(&table.state()));

    for command in &commands {
        println!("> {command}");
        if let Err(e) = apply(&table, command).await {
            println!("! {e}");
        }
        settle(&table).await;
        println!("{}", render::render(&table.state()));
    }

    table.shutdown();
}
