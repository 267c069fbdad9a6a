use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::domain::{GuildId, RepoRetrieveError};

pub const MAX_PAGE_SIZE: usize = 50;

/// One recorded game, as kept in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub date: String,
    pub enemy: String,
    #[serde(deserialize_with = "coerce_score")]
    pub score: i32,
    #[serde(deserialize_with = "coerce_score")]
    pub enemy_score: i32,
}

impl GameResult {
    pub fn diff(&self) -> i64 {
        i64::from(self.score) - i64::from(self.enemy_score)
    }
}

// Scores are written to the store as text, older records as plain numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredScore {
    Number(i64),
    Text(String),
}

fn coerce_score<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match StoredScore::deserialize(deserializer)? {
        StoredScore::Number(n) => i32::try_from(n)
            .map_err(|_| serde::de::Error::custom(format!("score {} is out of range", n))),
        StoredScore::Text(s) => s
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid score '{}': {}", s, e))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedGameResult {
    #[serde(flatten)]
    pub result: GameResult,
    pub idx: usize,
    pub diff: i64,
}

impl AnnotatedGameResult {
    pub fn outcome(&self) -> Outcome {
        Outcome::of(self.diff)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    pub fn of(diff: i64) -> Self {
        match diff.signum() {
            1 => Outcome::Win,
            -1 => Outcome::Lose,
            _ => Outcome::Draw,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutcomeFilter {
    #[default]
    All,
    Win,
    Lose,
    Draw,
}

impl OutcomeFilter {
    pub fn matches(&self, diff: i64) -> bool {
        match self {
            OutcomeFilter::All => true,
            OutcomeFilter::Win => diff > 0,
            OutcomeFilter::Lose => diff < 0,
            OutcomeFilter::Draw => diff == 0,
        }
    }
}

impl FromStr for OutcomeFilter {
    type Err = ResultQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(OutcomeFilter::All),
            "win" => Ok(OutcomeFilter::Win),
            "lose" => Ok(OutcomeFilter::Lose),
            "draw" => Ok(OutcomeFilter::Draw),
            other => Err(ResultQueryError::InvalidArgument(format!(
                "unknown outcome filter '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultQueryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Filter and pagination window over a guild's results.
///
/// `page` selects the window `[page * page_size, page * page_size + page_size)`
/// of the filtered records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultQuery {
    name: Option<String>,
    outcome: OutcomeFilter,
    page: usize,
    page_size: usize,
}

impl Default for ResultQuery {
    fn default() -> Self {
        Self {
            name: None,
            outcome: OutcomeFilter::All,
            page: 0,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl ResultQuery {
    pub fn new(
        name: Option<String>,
        outcome: OutcomeFilter,
        skip: i64,
        page_size: i64,
    ) -> Result<Self, ResultQueryError> {
        if skip < 0 {
            return Err(ResultQueryError::InvalidArgument(format!(
                "skip must not be negative, got {}",
                skip
            )));
        }
        if page_size < 0 || page_size > MAX_PAGE_SIZE as i64 {
            return Err(ResultQueryError::InvalidArgument(format!(
                "pageSize must be between 0 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }
        let name = name
            .map(|n| n.to_lowercase())
            .filter(|n| !n.is_empty());
        Ok(Self {
            name,
            outcome,
            page: skip as usize,
            page_size: page_size as usize,
        })
    }

    fn matches(&self, result: &GameResult, diff: i64) -> bool {
        if !self.outcome.matches(diff) {
            return false;
        }
        match &self.name {
            Some(needle) => result.enemy.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPage {
    pub items: Vec<AnnotatedGameResult>,
    pub total: usize,
}

/// Filters `collection` in storage order and cuts out the requested page.
///
/// `idx` is the position in the unfiltered collection, so it survives
/// filtering unchanged. A window past the end yields an empty page.
pub fn query_results(collection: &[GameResult], query: &ResultQuery) -> ResultPage {
    let filtered: Vec<AnnotatedGameResult> = collection
        .iter()
        .enumerate()
        .filter_map(|(idx, result)| {
            let diff = result.diff();
            query.matches(result, diff).then(|| AnnotatedGameResult {
                result: result.clone(),
                idx,
                diff,
            })
        })
        .collect();

    let total = filtered.len();
    let start = query.page.saturating_mul(query.page_size);
    let items = filtered
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .collect();

    ResultPage { items, total }
}

pub fn annotate_all(collection: &[GameResult]) -> Vec<AnnotatedGameResult> {
    collection
        .iter()
        .enumerate()
        .map(|(idx, result)| AnnotatedGameResult {
            result: result.clone(),
            idx,
            diff: result.diff(),
        })
        .collect()
}

#[async_trait::async_trait]
pub trait ResultRepository {
    async fn get_results(&self, guild_id: GuildId) -> Result<Vec<GameResult>, RepoRetrieveError>;
}

#[cfg(test)]
#[derive(Default, Clone)]
pub struct MockResultRepository {
    pub results: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<GuildId, Vec<GameResult>>>>,
    pub broken: bool,
}

#[cfg(test)]
impl MockResultRepository {
    pub fn with(guild_id: GuildId, results: Vec<GameResult>) -> Self {
        let repo = Self::default();
        repo.results.lock().unwrap().insert(guild_id, results);
        repo
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl ResultRepository for MockResultRepository {
    async fn get_results(&self, guild_id: GuildId) -> Result<Vec<GameResult>, RepoRetrieveError> {
        if self.broken {
            return Err(RepoRetrieveError::StorageError("connection reset".to_string()));
        }
        self.results
            .lock()
            .unwrap()
            .get(&guild_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }
}

#[cfg(test)]
pub fn game(score: i32, enemy_score: i32, enemy: &str) -> GameResult {
    GameResult {
        date: "2023/01/01".to_string(),
        enemy: enemy.to_string(),
        score,
        enemy_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<GameResult> {
        vec![game(3, 1, "Foo"), game(1, 1, "Bar"), game(0, 2, "fooz")]
    }

    fn query(name: Option<&str>, outcome: OutcomeFilter, skip: i64, page_size: i64) -> ResultQuery {
        ResultQuery::new(name.map(|n| n.to_string()), outcome, skip, page_size)
            .expect("valid query")
    }

    fn idx_and_diff(page: &ResultPage) -> Vec<(usize, i64)> {
        page.items.iter().map(|r| (r.idx, r.diff)).collect()
    }

    #[test]
    fn test_outcome_filters() {
        let results = sample();

        let wins = query_results(&results, &query(None, OutcomeFilter::Win, 0, 50));
        assert_eq!(wins.total, 1);
        assert_eq!(idx_and_diff(&wins), vec![(0, 2)]);

        let draws = query_results(&results, &query(None, OutcomeFilter::Draw, 0, 50));
        assert_eq!(draws.total, 1);
        assert_eq!(idx_and_diff(&draws), vec![(1, 0)]);

        let losses = query_results(&results, &query(None, OutcomeFilter::Lose, 0, 50));
        assert_eq!(idx_and_diff(&losses), vec![(2, -2)]);

        let all = query_results(&results, &ResultQuery::default());
        assert_eq!(all.total, 3);
        assert_eq!(idx_and_diff(&all), vec![(0, 2), (1, 0), (2, -2)]);
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let results = sample();

        let page = query_results(&results, &query(Some("foo"), OutcomeFilter::All, 0, 50));
        assert_eq!(page.total, 2);
        assert_eq!(
            page.items.iter().map(|r| r.idx).collect::<Vec<_>>(),
            vec![0, 2]
        );

        let page = query_results(&results, &query(Some("FOOZ"), OutcomeFilter::All, 0, 50));
        assert_eq!(idx_and_diff(&page), vec![(2, -2)]);

        let page = query_results(&results, &query(Some("foo"), OutcomeFilter::Lose, 0, 50));
        assert_eq!(idx_and_diff(&page), vec![(2, -2)]);

        let page = query_results(&results, &query(Some(""), OutcomeFilter::All, 0, 50));
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_pagination_window() {
        let results: Vec<GameResult> = (0..7).map(|i| game(i, 3, "Enemy")).collect();

        let first = query_results(&results, &query(None, OutcomeFilter::All, 0, 3));
        assert_eq!(first.total, 7);
        assert_eq!(
            first.items.iter().map(|r| r.idx).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );

        let last = query_results(&results, &query(None, OutcomeFilter::All, 2, 3));
        assert_eq!(last.total, 7);
        assert_eq!(last.items.iter().map(|r| r.idx).collect::<Vec<_>>(), vec![6]);

        let past_end = query_results(&results, &query(None, OutcomeFilter::All, 3, 3));
        assert_eq!(past_end.total, 7);
        assert!(past_end.items.is_empty());

        let huge = query_results(&results, &query(None, OutcomeFilter::All, i64::MAX, 50));
        assert_eq!(huge.total, 7);
        assert!(huge.items.is_empty());
    }

    #[test]
    fn test_zero_page_size_keeps_total() {
        let page = query_results(&sample(), &query(None, OutcomeFilter::All, 0, 0));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_filtered_page_keeps_original_idx() {
        let results: Vec<GameResult> = (0..20)
            .map(|i| game(i % 3 + 1, 1, if i % 2 == 0 { "Even" } else { "Odd" }))
            .collect();

        let page = query_results(&results, &query(Some("even"), OutcomeFilter::Win, 0, 50));
        assert!(page.items.windows(2).all(|w| w[0].idx <= w[1].idx));
        for item in &page.items {
            assert_eq!(results[item.idx], item.result);
            assert_eq!(
                item.diff,
                i64::from(item.result.score) - i64::from(item.result.enemy_score)
            );
            assert!(item.diff > 0);
        }
        assert_eq!(page.total, page.items.len());

        let second = query_results(&results, &query(Some("even"), OutcomeFilter::Win, 1, 2));
        assert_eq!(second.total, page.total);
        assert_eq!(second.items, page.items[2..4].to_vec());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let results = sample();
        let q = query(Some("o"), OutcomeFilter::All, 0, 50);
        let once = query_results(&results, &q);
        let survivors: Vec<GameResult> = once.items.iter().map(|r| r.result.clone()).collect();
        let twice = query_results(&survivors, &q);

        assert_eq!(once.total, twice.total);
        assert_eq!(
            survivors,
            twice.items.into_iter().map(|r| r.result).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_empty_collection() {
        let page = query_results(&[], &ResultQuery::default());
        assert_eq!(page, ResultPage::default());
    }

    #[test]
    fn test_invalid_query_arguments() {
        assert!(matches!(
            ResultQuery::new(None, OutcomeFilter::All, -1, 10),
            Err(ResultQueryError::InvalidArgument(..))
        ));
        assert!(matches!(
            ResultQuery::new(None, OutcomeFilter::All, 0, 51),
            Err(ResultQueryError::InvalidArgument(..))
        ));
        assert!(matches!(
            ResultQuery::new(None, OutcomeFilter::All, 0, -5),
            Err(ResultQueryError::InvalidArgument(..))
        ));
        assert!(ResultQuery::new(None, OutcomeFilter::All, 0, 0).is_ok());
        assert!(ResultQuery::new(None, OutcomeFilter::All, 4, 50).is_ok());
    }

    #[test]
    fn test_parse_outcome_filter() {
        assert_eq!("win".parse::<OutcomeFilter>(), Ok(OutcomeFilter::Win));
        assert_eq!(" Lose ".parse::<OutcomeFilter>(), Ok(OutcomeFilter::Lose));
        assert_eq!("DRAW".parse::<OutcomeFilter>(), Ok(OutcomeFilter::Draw));
        assert_eq!("all".parse::<OutcomeFilter>(), Ok(OutcomeFilter::All));
        assert_eq!("".parse::<OutcomeFilter>(), Ok(OutcomeFilter::All));
        assert!("victory".parse::<OutcomeFilter>().is_err());
    }

    #[test]
    fn test_scores_are_coerced_from_text() {
        let json = r#"[
            {"date": "2023/05/02", "enemy": "Foo", "score": "12", "enemyScore": " 7 "},
            {"date": "2023/05/03", "enemy": "Bar", "score": 4, "enemyScore": "9"}
        ]"#;
        let results: Vec<GameResult> = serde_json::from_str(json).unwrap();
        assert_eq!(results[0].diff(), 5);
        assert_eq!(results[1].diff(), -5);

        let bad = r#"{"date": "x", "enemy": "Foo", "score": "twelve", "enemyScore": "1"}"#;
        assert!(serde_json::from_str::<GameResult>(bad).is_err());
    }

    #[test]
    fn test_diff_is_exact_at_score_limits() {
        assert_eq!(game(i32::MAX, i32::MIN, "x").diff(), 4_294_967_295);
        assert_eq!(game(i32::MIN, i32::MAX, "x").diff(), -4_294_967_295);

        let json = format!(
            r#"{{"date": "x", "enemy": "Foo", "score": "{}", "enemyScore": -1}}"#,
            i32::MAX
        );
        let result: GameResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result.diff(), i64::from(i32::MAX) + 1);

        for out_of_range in [
            r#"{"date": "x", "enemy": "Foo", "score": "9223372036854775807", "enemyScore": "-1"}"#,
            r#"{"date": "x", "enemy": "Foo", "score": 2147483648, "enemyScore": 0}"#,
            r#"{"date": "x", "enemy": "Foo", "score": 0, "enemyScore": -2147483649}"#,
        ] {
            assert!(serde_json::from_str::<GameResult>(out_of_range).is_err());
        }
    }

    #[test]
    fn test_annotated_result_serializes_flat() {
        let page = query_results(&sample(), &query(None, OutcomeFilter::Win, 0, 50));
        let value = serde_json::to_value(&page.items[0]).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "date": "2023/01/01",
                "enemy": "Foo",
                "score": 3,
                "enemyScore": 1,
                "idx": 0,
                "diff": 2,
            })
        );
    }

    #[test]
    fn test_outcome_of_diff() {
        let all = annotate_all(&sample());
        assert_eq!(
            all.iter().map(|r| r.outcome()).collect::<Vec<_>>(),
            vec![Outcome::Win, Outcome::Draw, Outcome::Lose]
        );
    }
}
