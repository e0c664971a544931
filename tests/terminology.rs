use std::fs;

use textkit::defaults;
use textkit::terminology::{self, BatchOptions, RuleSet, ToolType};

#[test]
fn configured_terms_change_what_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("textkit.json");
    fs::write(
        &config_path,
        r#"{"defaults":{"audit":{
            "extra_terms":{"base64-encode":[{"term":"atob","suggestion":"Use btoa"}]},
            "allowed_terms":{"base64-encode":["decoder"]}
        }}}"#,
    )
    .unwrap();

    let config = defaults::load_config_from_path(&config_path).unwrap();
    let rules = RuleSet::from_config(&config.defaults.audit).unwrap();

    let page = dir.path().join("base64-encode.html");
    fs::write(&page, "Decoder demo built on atob").unwrap();

    let audit = terminology::audit_file(&page, None, &rules).unwrap();
    assert_eq!(audit.tool, ToolType::Base64Encode);
    assert_eq!(audit.issue_count, 1);
    assert_eq!(audit.issues[0].term, "atob");
    assert_eq!(audit.issues[0].suggestion, "Use btoa");
}

#[test]
fn broken_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("textkit.json");
    fs::write(&config_path, "{ not json").unwrap();

    let err = defaults::load_config_from_path(&config_path).unwrap_err();
    assert_eq!(err.code.as_str(), "config.invalid_json");
}

#[test]
fn batch_report_serializes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let pages = dir.path().join("url-encode");
    fs::create_dir_all(&pages).unwrap();
    fs::write(pages.join("index.html"), "URL encoder, not base64").unwrap();
    fs::write(dir.path().join("readme.md"), "notes").unwrap();

    let options = BatchOptions::from(&defaults::AuditDefaults::default());
    let batch = terminology::audit_dir(dir.path(), &options, &RuleSet::builtin()).unwrap();

    let json = serde_json::to_value(&batch).unwrap();
    assert_eq!(json["summary"]["files_scanned"], 1);
    assert_eq!(json["summary"]["total_issues"], 1);
    assert_eq!(json["summary"]["issues_by_tool"]["url-encode"], 1);
    assert_eq!(json["files"][0]["path"], "url-encode/index.html");
    assert_eq!(json["files"][0]["tool"], "url-encode");
    assert_eq!(json["skipped"][0], "readme.md");
}
