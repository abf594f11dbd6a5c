//! Unit tests for the filter service.

use super::*;
use crate::domain::TripType;
use crate::generate::Unconfigured;
use crate::merge::FilterDefaults;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2025, 3, 10)
}

/// Mock generator: replies with a fixed result and records every prompt.
struct Scripted {
    reply: Result<String, GenerateError>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Scripted {
    fn replying(reply: &str) -> Self {
        Self::new(Ok(reply.to_string()))
    }

    fn failing(err: GenerateError) -> Self {
        Self::new(Err(err))
    }

    fn new(reply: Result<String, GenerateError>) -> Self {
        Self {
            reply,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn prompt_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

impl TextGenerator for Scripted {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

/// Mock generator that never answers in time.
struct Stalled;

impl TextGenerator for Stalled {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(r#"{"from": "Too Late"}"#.to_string())
    }
}

const BOSTON_TO_SEATTLE: &str = "```json\n{\"from\":\"Boston\",\"to\":\"Seattle\",\"passengers\":2}\n```";

fn defaults() -> TravelFilterSet {
    FilterDefaults::default().filters_for(today())
}

#[tokio::test]
async fn raw_text_merges_generator_response() {
    init_tracing();
    let service = FilterService::new(
        Scripted::replying(BOSTON_TO_SEATTLE),
        FilterConfig::default(),
    );

    let filters = service
        .filters_from_raw_text(Some("Boston to Seattle for 2 people"), today())
        .await;

    assert_eq!(filters.from, "Boston");
    assert_eq!(filters.to, "Seattle");
    assert_eq!(filters.passengers, 2);
    assert_eq!(filters.from_date, date(2025, 3, 17));
    assert_eq!(filters.to_date, Some(date(2025, 3, 24)));
    assert_eq!(
        filters.search_context.as_deref(),
        Some("Boston to Seattle for 2 people")
    );
    assert!(filters.warnings.is_empty());
}

#[tokio::test]
async fn absent_input_skips_generator() {
    let generator = Scripted::replying(BOSTON_TO_SEATTLE);
    let prompts = generator.prompt_log();
    let service = FilterService::new(generator, FilterConfig::default());

    let filters = service.filters_from_raw_text(None, today()).await;

    assert_eq!(filters, defaults());
    assert!(prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn prompt_template_is_rendered() {
    let generator = Scripted::replying("{}");
    let prompts = generator.prompt_log();
    let config = FilterConfig::default()
        .with_prompt_template("Extract from: {searchInput} and analyze {searchInput}");
    let service = FilterService::new(generator, config);

    service
        .filters_from_raw_text(Some("special search query"), today())
        .await;

    assert_eq!(
        *prompts.lock().unwrap(),
        vec!["Extract from: special search query and analyze special search query"]
    );
}

#[tokio::test]
async fn generator_failure_falls_back_to_defaults() {
    init_tracing();
    let failures = [
        GenerateError::Upstream("AI service error".into()),
        GenerateError::RateLimited,
        GenerateError::NotConfigured("no key".into()),
    ];
    for err in failures {
        let service = FilterService::new(Scripted::failing(err), FilterConfig::default());
        let filters = service
            .filters_from_raw_text(Some("Boston to Seattle"), today())
            .await;

        let mut expected = defaults();
        expected.search_context = Some("Boston to Seattle".into());
        assert_eq!(filters, expected);
    }
}

#[tokio::test]
async fn unusable_response_falls_back_to_defaults() {
    let service = FilterService::new(
        Scripted::replying("Sorry, I can't help with <that>."),
        FilterConfig::default(),
    );
    let filters = service
        .filters_from_raw_text(Some("Invalid query"), today())
        .await;

    assert_eq!(filters.from, "New York");
    assert_eq!(filters.to, "Los Angeles");
    assert_eq!(filters.search_context.as_deref(), Some("Invalid query"));
}

#[tokio::test]
async fn unconfigured_generator_uses_defaults() {
    let service = FilterService::new(Unconfigured, FilterConfig::default());
    let filters = service
        .filters_from_raw_text(Some("Boston to Seattle"), today())
        .await;
    assert_eq!(filters.from, "New York");
    assert_eq!(filters.search_context.as_deref(), Some("Boston to Seattle"));
}

#[tokio::test(start_paused = true)]
async fn slow_generator_times_out() {
    init_tracing();
    let config = FilterConfig::default().with_generator_timeout(5);
    let service = FilterService::new(Stalled, config);

    let filters = service
        .filters_from_raw_text(Some("Boston to Seattle"), today())
        .await;

    assert_eq!(filters.from, "New York");
}

#[tokio::test]
async fn configured_defaults_are_used() {
    let config = FilterConfig::default().with_defaults(FilterDefaults {
        from: "Chicago".into(),
        trip: TripType::OneWay,
        ..Default::default()
    });
    let service = FilterService::new(Unconfigured, config);

    let filters = service.filters_from_raw_text(None, today()).await;
    assert_eq!(filters.from, "Chicago");
    assert_eq!(filters.trip, TripType::OneWay);
    assert_eq!(filters.to_date, None);
}

#[tokio::test]
async fn screened_text_rejects_attacks() {
    let generator = Scripted::replying(BOSTON_TO_SEATTLE);
    let prompts = generator.prompt_log();
    let service = FilterService::new(generator, FilterConfig::default());

    let err = service
        .filters_from_screened_text("SELECT * FROM users", today())
        .await
        .unwrap_err();

    let FilterError::InputRejected { errors } = err;
    assert!(errors.iter().any(|e| e.contains("SQL injection")));
    assert!(prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn screened_text_carries_warnings() {
    let service = FilterService::new(
        Scripted::replying(BOSTON_TO_SEATTLE),
        FilterConfig::default(),
    );

    let filters = service
        .filters_from_screened_text("Trip to Zürich for five days please", today())
        .await
        .unwrap();

    assert_eq!(filters.warnings, vec!["Input contains unusual characters"]);
    assert_eq!(filters.from, "Boston");
    let json = filters.to_json().unwrap();
    assert_eq!(
        json["warnings"],
        serde_json::json!(["Input contains unusual characters"])
    );
}

#[tokio::test]
async fn screened_clean_text_has_no_warnings_key() {
    let service = FilterService::new(
        Scripted::replying(BOSTON_TO_SEATTLE),
        FilterConfig::default(),
    );

    let filters = service
        .filters_from_screened_text("Flight from Boston to Seattle for two people", today())
        .await
        .unwrap();

    let json = filters.to_json().unwrap();
    let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        ["from", "fromDate", "passengers", "searchContext", "to", "toDate", "trip"]
    );
}

#[tokio::test]
async fn cache_avoids_repeat_calls() {
    let generator = Scripted::replying(BOSTON_TO_SEATTLE);
    let prompts = generator.prompt_log();
    let service = FilterService::new(generator, FilterConfig::default().with_cache(60));

    let first = service.filters_from_raw_text(Some("Boston"), today()).await;
    let second = service.filters_from_raw_text(Some("Boston"), today()).await;
    service.filters_from_raw_text(Some("Seattle"), today()).await;

    assert_eq!(first, second);
    assert_eq!(prompts.lock().unwrap().len(), 2);
    assert!(service.generator().is_caching());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_are_independent() {
    let service = Arc::new(FilterService::new(
        Scripted::replying(r#"{"to": "Oslo"}"#),
        FilterConfig::default(),
    ));

    let inputs: Vec<String> = (0..32).map(|i| format!("request number {i}")).collect();
    let requests = inputs.iter().map(|input| {
        let service = Arc::clone(&service);
        async move { service.filters_from_raw_text(Some(input.as_str()), today()).await }
    });
    let results = futures::future::join_all(requests).await;

    for (input, filters) in inputs.iter().zip(&results) {
        assert_eq!(filters.to, "Oslo");
        assert_eq!(filters.search_context.as_deref(), Some(input.as_str()));
    }
}

#[test]
fn rule_based_examples() {
    let service = FilterService::new(Unconfigured, FilterConfig::default());
    let reference = date(2024, 5, 21);

    let filters = service.rule_based(
        "Plan a 2 week vacation from New York to London in January 2025",
        reference,
    );
    assert_eq!(filters.from, "New York");
    assert!(filters.to.contains("London"));
    assert_eq!(filters.trip, TripType::RoundTrip);
    assert_eq!(filters.from_date, date(2025, 1, 1));
    assert_eq!(filters.to_date, Some(date(2025, 1, 15)));

    let filters = service.rule_based(
        "I need a one-way ticket to Tokyo for 2 people next month",
        reference,
    );
    assert_eq!(filters.passengers, 2);
    assert_eq!(filters.trip, TripType::OneWay);
    assert_eq!(filters.from_date, date(2024, 6, 1));
    assert_eq!(filters.to_json().unwrap()["toDate"], serde_json::Value::Null);
}
