//! In-memory dataset standing in for a remote API.

use std::time::Duration;

use datatable_lib::TableResponse;
use datatable_lib::error::FetchError;
use datatable_lib::model::{FilterOption, Scalar};
use datatable_lib::query::{Query, SEARCH_KEY};
use serde_json::{Value, json};

const NAMES: [&str; 8] = [
    "Ada", "Grace", "Linus", "Barbara", "Ken", "Margaret", "Dennis", "Radia",
];
const TEAMS: [&str; 3] = ["core", "platform", "research"];

/// A fake people directory served page by page with simulated latency.
#[derive(Debug, Clone)]
pub struct Directory {
    people: Vec<Value>,
    latency: Duration,
}

impl Directory {
    pub fn new(size: usize, latency: Duration) -> Self {
        let people = (0..size)
            .map(|i| {
                json!({
                    "id": i as i64 + 1,
                    "name": format!("{} #{}", NAMES[i % NAMES.len()], i + 1),
                    "active": i % 3 != 0,
                    "team": { "name": TEAMS[i % TEAMS.len()] },
                })
            })
            .collect();
        Self { people, latency }
    }

    /// Team filter options, as a lookup endpoint would return them.
    pub fn team_options() -> Vec<FilterOption> {
        TEAMS
            .iter()
            .map(|t| FilterOption::new(*t, *t).with_column("team.name"))
            .collect()
    }

    fn matches(person: &Value, query: &Query) -> bool {
        query.iter().all(|(key, expected)| {
            if key == SEARCH_KEY {
                let needle = expected.to_string().to_lowercase();
                return person["name"]
                    .as_str()
                    .is_some_and(|n| n.to_lowercase().contains(&needle));
            }
            let value = key.split('.').try_fold(person, |v, k| v.get(k));
            match (value, expected) {
                (Some(Value::String(s)), Scalar::Text(t)) => s == t,
                (Some(Value::Bool(b)), Scalar::Int(i)) => i64::from(*b) == *i,
                (Some(Value::Number(n)), Scalar::Int(i)) => n.as_i64() == Some(*i),
                _ => false,
            }
        })
    }

    pub async fn fetch(
        &self,
        page: u32,
        limit: u32,
        query: Query,
    ) -> Result<TableResponse<Value>, FetchError> {
        tokio::time::sleep(self.latency).await;
        if query
            .get(SEARCH_KEY)
            .is_some_and(|s| s.to_string() == "fail")
        {
            return Err(FetchError::new("simulated server error"));
        }

        let matching: Vec<&Value> = self
            .people
            .iter()
            .filter(|p| Self::matches(p, &query))
            .collect();
        let limit = limit.max(1);
        let start = (page.max(1) as usize - 1) * limit as usize;
        let data = matching
            .iter()
            .skip(start)
            .take(limit as usize)
            .map(|v| (*v).clone())
            .collect();
        Ok(TableResponse::new(data, matching.len() as u64, page, limit))
    }
}
