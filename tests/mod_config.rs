use archive_core::{ArchiveConfig, ArchiveService};
use std::io::Write;

#[test]
fn config_file_layers_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("archive.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "transaction_retries = 9").unwrap();
    writeln!(f, "max_query_results = 2").unwrap();
    drop(f);

    let mut cfg = ArchiveConfig::from_toml_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    cfg.apply_env(|_| None).unwrap();
    assert_eq!(cfg.transaction_retries, 9);
    assert_eq!(cfg.max_query_results, 2);
    assert_eq!(cfg.default_sort_field, "title");
}

#[test]
fn missing_config_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ArchiveConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(cfg.transaction_retries, ArchiveConfig::default().transaction_retries);
}

#[test]
fn result_cap_applies_to_queries() {
    let cfg = ArchiveConfig { max_query_results: 2, ..ArchiveConfig::default() };
    let svc = ArchiveService::in_memory(cfg);
    let u = archive_core::User::new("u", "u", "u@x.org");
    for t in ["a", "b", "c"] {
        let form = archive_core::forms::ArticleUpdateForm {
            title: Some(t.into()),
            description: Some("d".into()),
            ..Default::default()
        };
        svc.create_article(Some(&u), &form).unwrap();
    }
    assert_eq!(svc.query_articles(&[]).unwrap().items.len(), 2);
}

#[test]
fn logging_setup_writes_into_the_given_directory() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    archive_core::logger::configure_logging(Some(&logs), Some("info"), Some(1)).unwrap();
    log::info!(target: "archive_core::audit", "{{\"op\":\"startup\"}}");
    assert!(logs.join("app.log").exists());
    assert!(logs.join("audit.log").exists());
}
