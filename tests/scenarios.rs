// tests/scenarios.rs
//
// End-to-end screening scenarios over the public processor API: reprint
// detection, horizon pruning, alternate-listing tags, and recombination.

use chrono::{DateTime, Duration, TimeZone, Utc};
use stale_news_screener::processor::RunSummary;
use stale_news_screener::{RawStory, ScreenerConfig, SimilarityRecord, StreamProcessor};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2001, 10, 1, 9, 0, 0).unwrap()
}

fn raw(id: &str, hours: i64, companies: &[&str], text: &str) -> RawStory {
    RawStory {
        id: id.into(),
        timestamp: base() + Duration::hours(hours),
        companies: companies.iter().map(|s| s.to_string()).collect(),
        text: text.into(),
    }
}

fn screen(stories: Vec<RawStory>) -> Vec<SimilarityRecord> {
    let mut proc = StreamProcessor::new(ScreenerConfig::default());
    let mut summary = RunSummary::default();
    let mut out = Vec::new();
    for s in stories {
        out.extend(proc.process_story(s, &mut summary).unwrap());
    }
    out
}

// Ten distinct content tokens; none are stopwords and none share stems.
const TEN_TOKENS: &str =
    "acme merger regulator approval quarterly dividend outlook revenue margin forecast";

#[test]
fn scenario_a_identical_story_one_hour_later_is_a_reprint() {
    let records = screen(vec![
        raw("A", 0, &["X"], TEN_TOKENS),
        raw("B", 1, &["X"], TEN_TOKENS),
    ]);

    let second = &records[1];
    assert_eq!(second.closest_id.as_deref(), Some("A"));
    assert_eq!(second.closest_score, Some(1.0));
    assert_eq!(second.total_overlap, 1.0);
    assert!(second.is_old);
    assert!(second.is_reprint);
    assert!(!second.is_recomb);
}

#[test]
fn scenario_b_story_past_the_horizon_sees_an_empty_window() {
    let mut proc = StreamProcessor::new(ScreenerConfig::default());
    let mut summary = RunSummary::default();

    proc.process_story(raw("A", 0, &["X"], TEN_TOKENS), &mut summary)
        .unwrap();
    let records = proc
        .process_story(raw("B", 80, &["X"], TEN_TOKENS), &mut summary)
        .unwrap();

    let r = &records[0];
    assert_eq!(r.closest_id, None);
    assert_eq!(r.closest_score, None);
    assert_eq!(r.total_overlap, 0.0);
    assert!(!r.is_old);

    // The window was pruned to hold only the new story.
    assert_eq!(proc.registry().get("X").unwrap().len(), 1);
}

#[test]
fn scenario_c_alternate_listing_tag_is_skipped() {
    let records = screen(vec![raw("A", 0, &["ABC", "ABC.O"], TEN_TOKENS)]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].company, "ABC");
}

#[test]
fn scenario_d_union_overlap_without_a_close_neighbor_is_a_recombination() {
    // Each prior story shares 3 of the new story's 10 tokens (closest score
    // 0.3 < 0.8); together the five cover 8 of 10 (total overlap 0.8 >= 0.6).
    let priors = vec![
        raw("P1", 0, &["X"], "acme merger regulator lawsuit"),
        raw("P2", 1, &["X"], "approval quarterly dividend lawsuit"),
        raw("P3", 2, &["X"], "outlook revenue margin lawsuit"),
        raw("P4", 3, &["X"], "acme quarterly outlook lawsuit"),
        raw("P5", 4, &["X"], "merger dividend revenue lawsuit"),
    ];
    let mut stories = priors;
    stories.push(raw("N", 5, &["X"], TEN_TOKENS));

    let records = screen(stories);
    let last = records.last().unwrap();

    assert!(last.total_overlap >= 0.6, "union covers most of the story");
    assert!(last.closest_score.unwrap() < 0.8, "no single close neighbor");
    assert!(last.is_old);
    assert!(last.is_recomb);
    assert!(!last.is_reprint);
}

#[test]
fn reprint_and_recombination_are_mutually_exclusive_across_a_stream() {
    let stories = vec![
        raw("A", 0, &["X"], TEN_TOKENS),
        raw("B", 1, &["X"], TEN_TOKENS),
        raw("C", 2, &["X"], "acme merger regulator approval unrelated story content here"),
        raw("D", 80, &["X"], TEN_TOKENS),
    ];
    for r in screen(stories) {
        assert!(!(r.is_reprint && r.is_recomb));
        if !r.is_old {
            assert!(!r.is_reprint && !r.is_recomb);
        }
    }
}
