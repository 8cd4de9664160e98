use std::fs;

use figment::Jail;
use tempfile::TempDir;

use faqdb_core::config::{Config, RetrievalConfig, Weights};
use faqdb_core::error::Error;
use faqdb_core::snapshot::{read_raw_faq, read_snapshot, write_snapshot};
use faqdb_core::types::{CorpusEntry, QueryContext};

fn entry(id: &str, keyword: Option<&str>, vector: Vec<f32>) -> CorpusEntry {
    CorpusEntry {
        id: id.to_string(),
        question: format!("question {id}"),
        answer: format!("answer {id}"),
        keyword: keyword.map(str::to_string),
        intent: None,
        vector,
    }
}

#[test]
fn snapshot_write_then_read_keeps_order() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested/embeddings.json");
    let entries = vec![entry("item_0", Some("hostel food"), vec![0.1, 0.2]), entry("item_1", None, vec![])];

    write_snapshot(&path, &entries).expect("write");
    let loaded = read_snapshot(&path).expect("read");

    assert_eq!(loaded, entries);
}

#[test]
fn snapshot_missing_vector_field_defaults_to_empty() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("embeddings.json");
    fs::write(&path, r#"[{"id":"a","question":"Where is the library?","answer":"Block B"}]"#).unwrap();

    let loaded = read_snapshot(&path).expect("read");
    assert_eq!(loaded.len(), 1);
    assert!(!loaded[0].has_vector());
    assert_eq!(loaded[0].lexical_text(), "Where is the library?");
}

#[test]
fn snapshot_errors_are_typed() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.json");
    assert!(matches!(read_snapshot(&missing), Err(Error::NotFound(_))));

    let broken = tmp.path().join("broken.json");
    fs::write(&broken, "{not json").unwrap();
    assert!(matches!(read_snapshot(&broken), Err(Error::Snapshot { .. })));
}

#[test]
fn raw_faq_accepts_optional_fields() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("faq.json");
    fs::write(&path, r#"[{"question":"Fees?","answer":"See office","intent":"fees"}]"#).unwrap();

    let raw = read_raw_faq(&path).expect("raw");
    assert_eq!(raw[0].intent.as_deref(), Some("fees"));
    assert!(raw[0].id.is_none());
}

#[test]
fn blank_keyword_falls_back_to_question() {
    let e = entry("x", Some("   "), vec![1.0]);
    assert_eq!(e.lexical_tokens(), vec!["question", "x"]);
}

#[test]
fn query_context_normalizes_for_cache_keys() {
    let ctx = QueryContext::new("  What are the FEES?? ");
    assert_eq!(ctx.normalized(), "what are the fees");
    assert!(ctx.with_vector(vec![]).vector.is_none());
}

#[test]
fn config_defaults_without_files() {
    Jail::expect_with(|_jail| {
        let config = Config::load().expect("load");
        assert_eq!(config.retrieval().expect("retrieval"), RetrievalConfig::default());
        assert_eq!(config.router().expect("router").max_edit_distance, 2);
        Ok(())
    });
}

#[test]
fn config_merges_toml_and_env() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [retrieval]
            min_score = 0.25
            short_weights = { semantic = 0.8, keyword = 0.2 }

            [data]
            snapshot_path = "rag/embeddings.json"
            "#,
        )?;
        jail.set_env("APP_RETRIEVAL__GAP", "0.06");

        let config = Config::load().expect("load");
        let retrieval = config.retrieval().expect("retrieval");
        assert!((retrieval.min_score - 0.25).abs() < 1e-6);
        assert!((retrieval.gap - 0.06).abs() < 1e-6);
        assert_eq!(retrieval.short_weights, Weights::new(0.8, 0.2));
        assert_eq!(retrieval.long_weights, Weights::new(0.65, 0.35));
        assert_eq!(config.data().expect("data").snapshot_path, "rag/embeddings.json");
        Ok(())
    });
}

#[test]
fn config_rejects_zero_top_k() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[retrieval]\ntop_k = 0\n")?;
        assert!(matches!(Config::load(), Err(Error::InvalidConfig(_))));
        Ok(())
    });
}

#[test]
fn weights_follow_query_length() {
    let cfg = RetrievalConfig::default();
    assert_eq!(cfg.weights_for(1), Weights::new(0.70, 0.30));
    assert_eq!(cfg.weights_for(2), Weights::new(0.70, 0.30));
    assert_eq!(cfg.weights_for(3), Weights::new(0.65, 0.35));
}
