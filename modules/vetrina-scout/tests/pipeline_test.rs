//! End-to-end pipeline runs against in-memory fakes: classification over
//! a scripted directory, fallback resolution, scoring, and ledger
//! durability across re-runs.

use std::sync::Arc;
use std::time::Duration;

use vetrina_common::{BusinessRecord, BusinessStatus, ScoreRubric};
use vetrina_scout::ledger::Ledger;
use vetrina_scout::pipeline::Pipeline;
use vetrina_scout::testing::{FakeFetcher, FakeRenderer, ScriptedDirectory, StaticSearcher};
use vetrina_scout::traits::{Candidate, SearchHit};

const RICH_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Trattoria Rossi — Cucina Toscana a Firenze</title>
  <meta name="viewport" content="width=device-width">
  <meta name="description" content="Trattoria Rossi: cucina toscana tradizionale nel centro di Firenze, dal 1962. Prenota ora.">
</head>
<body>
  <header><img class="logo" src="/logo.png" alt="logo"></header>
  <h1>Trattoria Rossi</h1>
  <p>Tel 055 1234567 — info@trattoriarossi.it</p>
  <iframe src="https://www.google.com/maps/embed?pb=1"></iframe>
  <a href="https://facebook.com/trattoriarossi">fb</a>
  <footer>Privacy Policy</footer>
</body>
</html>"#;

fn directory() -> ScriptedDirectory {
    ScriptedDirectory::new(vec![vec![
        Candidate {
            name: "Acme Srl".to_string(),
            raw_site: Some("https://acme.it".to_string()),
        },
        Candidate {
            name: "Trattoria Rossi".to_string(),
            raw_site: None,
        },
        Candidate {
            name: "Pasticceria Bianchi".to_string(),
            raw_site: Some("https://facebook.com/pasticceriabianchi".to_string()),
        },
    ]])
}

fn searcher() -> StaticSearcher {
    StaticSearcher::new(vec![SearchHit {
        title: "Trattoria Rossi Firenze".to_string(),
        url: "https://trattoriarossi.it".to_string(),
    }])
}

fn fetcher() -> FakeFetcher {
    FakeFetcher::new().with_page(
        "https://trattoriarossi.it",
        "<body>Trattoria Rossi — cucina toscana. Partita IVA 01234</body>",
    )
}

async fn full_run(pipeline: &Pipeline) {
    pipeline.run_classification(&directory(), 5).await.unwrap();

    let searcher = searcher();
    let fetcher = fetcher();
    pipeline
        .run_resolution(&searcher, &fetcher, 3, Duration::ZERO)
        .await
        .unwrap();

    let renderer = FakeRenderer::new(RICH_PAGE)
        .with_load_time(Duration::from_millis(500))
        .with_all_layout_probes(true);
    pipeline
        .run_scoring(&renderer, ScoreRubric::default(), 2)
        .await
        .unwrap();
}

#[tokio::test]
async fn full_run_classifies_resolves_and_scores() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(Ledger::open(dir.path().join("ledger.json")).unwrap());
    let pipeline = Pipeline::new(ledger.clone());

    full_run(&pipeline).await;

    let snapshot = ledger.snapshot();
    assert_eq!(snapshot.len(), 3);

    // Listed site, scored straight away.
    let acme = by_name(&snapshot, "Acme Srl");
    assert_eq!(acme.status, BusinessStatus::Scored);
    assert_eq!(acme.site.as_deref(), Some("https://acme.it"));
    assert_eq!(acme.score, Some(100));

    // No listed site; fallback search verified one, then scored.
    let rossi = by_name(&snapshot, "Trattoria Rossi");
    assert_eq!(rossi.status, BusinessStatus::Scored);
    assert_eq!(rossi.site.as_deref(), Some("https://trattoriarossi.it"));

    // Facebook-only listing: classified NoSite, and the fallback hit
    // doesn't match the name, so it stays unverified without a site.
    let bianchi = by_name(&snapshot, "Pasticceria Bianchi");
    assert_eq!(bianchi.status, BusinessStatus::SiteUnverified);
    assert!(bianchi.site.is_none());
    assert!(bianchi.score.is_none());
}

#[tokio::test]
async fn rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(Ledger::open(dir.path().join("ledger.json")).unwrap());
    let pipeline = Pipeline::new(ledger.clone());

    full_run(&pipeline).await;
    let first = ledger.snapshot();

    full_run(&pipeline).await;
    let second = ledger.snapshot();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.status, b.status);
        assert_eq!(a.site, b.site);
        assert_eq!(a.score, b.score);
    }
}

#[tokio::test]
async fn progress_survives_reopen_and_degraded_rerun() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    {
        let ledger = Arc::new(Ledger::open(&path).unwrap());
        let pipeline = Pipeline::new(ledger.clone());
        full_run(&pipeline).await;
    }

    // New process. The directory now glitches Acme into a no-site listing
    // and the search provider is down — the scored entry must survive.
    let ledger = Arc::new(Ledger::open(&path).unwrap());
    let pipeline = Pipeline::new(ledger.clone());

    let glitched = ScriptedDirectory::new(vec![vec![Candidate {
        name: "Acme Srl".to_string(),
        raw_site: None,
    }]]);
    pipeline.run_classification(&glitched, 5).await.unwrap();

    let searcher = StaticSearcher::failing();
    let fetcher = FakeFetcher::new();
    pipeline
        .run_resolution(&searcher, &fetcher, 3, Duration::ZERO)
        .await
        .unwrap();

    let snapshot = ledger.snapshot();
    let acme = by_name(&snapshot, "Acme Srl");
    assert_eq!(acme.status, BusinessStatus::Scored);
    assert_eq!(acme.score, Some(100));
    assert_eq!(acme.site.as_deref(), Some("https://acme.it"));
}

#[tokio::test]
async fn navigation_failures_mark_score_failed_without_fake_zeroes() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(Ledger::open(dir.path().join("ledger.json")).unwrap());
    let pipeline = Pipeline::new(ledger.clone());

    pipeline.run_classification(&directory(), 5).await.unwrap();

    let renderer = FakeRenderer::failing_navigation();
    pipeline
        .run_scoring(&renderer, ScoreRubric::default(), 2)
        .await
        .unwrap();

    let snapshot = ledger.snapshot();
    let acme = by_name(&snapshot, "Acme Srl");
    assert_eq!(acme.status, BusinessStatus::ScoreFailed);
    assert!(acme.score.is_none());
}

#[tokio::test]
async fn score_failed_site_is_rescored_on_the_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(Ledger::open(dir.path().join("ledger.json")).unwrap());
    let pipeline = Pipeline::new(ledger.clone());

    // First run: the renderer is down for the day.
    pipeline.run_classification(&directory(), 5).await.unwrap();
    let dead = FakeRenderer::failing_navigation();
    pipeline
        .run_scoring(&dead, ScoreRubric::default(), 2)
        .await
        .unwrap();

    {
        let snapshot = ledger.snapshot();
        assert_eq!(by_name(&snapshot, "Acme Srl").status, BusinessStatus::ScoreFailed);
    }

    // Second run: the directory still lists the site and rendering works.
    pipeline.run_classification(&directory(), 5).await.unwrap();
    let renderer = FakeRenderer::new(RICH_PAGE)
        .with_load_time(Duration::from_millis(500))
        .with_all_layout_probes(true);
    pipeline
        .run_scoring(&renderer, ScoreRubric::default(), 2)
        .await
        .unwrap();

    let snapshot = ledger.snapshot();
    let acme = by_name(&snapshot, "Acme Srl");
    assert_eq!(acme.status, BusinessStatus::Scored);
    assert_eq!(acme.site.as_deref(), Some("https://acme.it"));
    assert_eq!(acme.score, Some(100));
}

#[tokio::test]
async fn unverified_business_is_requeried_on_the_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(Ledger::open(dir.path().join("ledger.json")).unwrap());
    let pipeline = Pipeline::new(ledger.clone());

    pipeline.run_classification(&directory(), 5).await.unwrap();

    // First run: search finds nothing usable for Trattoria Rossi.
    let empty = StaticSearcher::new(Vec::new());
    let no_pages = FakeFetcher::new();
    pipeline
        .run_resolution(&empty, &no_pages, 3, Duration::ZERO)
        .await
        .unwrap();

    {
        let snapshot = ledger.snapshot();
        let rossi = by_name(&snapshot, "Trattoria Rossi");
        assert_eq!(rossi.status, BusinessStatus::SiteUnverified);
    }

    // Second run: the site now ranks, and the unverified record is retried.
    let found = searcher();
    let pages = fetcher();
    pipeline
        .run_resolution(&found, &pages, 3, Duration::ZERO)
        .await
        .unwrap();

    let snapshot = ledger.snapshot();
    let rossi = by_name(&snapshot, "Trattoria Rossi");
    assert_eq!(rossi.status, BusinessStatus::SiteVerified);
    assert_eq!(rossi.site.as_deref(), Some("https://trattoriarossi.it"));
}

fn by_name<'a>(snapshot: &'a [BusinessRecord], name: &str) -> &'a BusinessRecord {
    snapshot
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("missing record for {name}"))
}
