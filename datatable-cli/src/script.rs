//! Command script parsing.

use std::fmt;

/// One scripted user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Page(u32),
    Next,
    Previous,
    Limit(u32),
    Search(String),
    OpenFilter(String),
    Filter(String, Option<usize>),
    Toggle(usize),
    SelectAll,
    Action(String, usize),
    Refresh,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(p) => write!(f, "page {p}"),
            Self::Next => f.write_str("next"),
            Self::Previous => f.write_str("previous"),
            Self::Limit(l) => write!(f, "limit {l}"),
            Self::Search(s) => write!(f, "search {s:?}"),
            Self::OpenFilter(k) => write!(f, "open filter {k}"),
            Self::Filter(k, Some(i)) => write!(f, "filter {k} = option {i}"),
            Self::Filter(k, None) => write!(f, "clear filter {k}"),
            Self::Toggle(i) => write!(f, "toggle row {i}"),
            Self::SelectAll => f.write_str("select all"),
            Self::Action(k, i) => write!(f, "action {k} on row {i}"),
            Self::Refresh => f.write_str("refresh"),
        }
    }
}

/// Parses `name[:argument]` commands, e.g. `page:3`, `filter:team=1`, `filter:team=`.
pub fn parse(input: &str) -> Result<Command, String> {
    let (name, arg) = input.split_once(':').unwrap_or((input, ""));
    let number = |what: &str| {
        arg.parse::<u32>()
            .map_err(|_| format!("{what} expects a number, got '{arg}'"))
    };
    let index = |value: &str| {
        value
            .parse::<usize>()
            .map_err(|_| format!("expected a row or option index, got '{value}'"))
    };

    Ok(match name {
        "page" => Command::Page(number("page")?),
        "next" => Command::Next,
        "prev" | "previous" => Command::Previous,
        "limit" => Command::Limit(number("limit")?),
        "search" => Command::Search(arg.to_string()),
        "open" => Command::OpenFilter(arg.to_string()),
        "filter" => {
            let (key, option) = arg
                .split_once('=')
                .ok_or_else(|| format!("filter expects key=index, got '{arg}'"))?;
            let option = if option.is_empty() {
                None
            } else {
                Some(index(option)?)
            };
            Command::Filter(key.to_string(), option)
        }
        "toggle" => Command::Toggle(index(arg)?),
        "select-all" => Command::SelectAll,
        "action" => {
            let (key, row) = arg
                .split_once('@')
                .ok_or_else(|| format!("action expects key@row, got '{arg}'"))?;
            Command::Action(key.to_string(), index(row)?)
        }
        "refresh" => Command::Refresh,
        other => return Err(format!("unknown command '{other}'")),
    })
}

/// Script run when no commands are given.
pub fn default_script() -> Vec<Command> {
    [
        "page:3",
        "page:99",
        "limit:25",
        "open:team",
        "filter:team=1",
        "search:ada",
        "toggle:0",
        "select-all",
        "action:deactivate@0",
        "filter:team=",
        "search:fail",
        "refresh",
    ]
    .iter()
    .filter_map(|c| parse(c).ok())
    .collect()
}
