use std::path::PathBuf;

use lexview::config::{ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens};
use lexview::document::LanguageOrdering;

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".lexviewrc");
    let content = r#"
# comment
--languages "German,Old English"

--theme light
   
--log-file=lexview.log --hide-unlisted
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert_eq!(
        flags.languages,
        Some(vec!["German".to_string(), "Old English".to_string()])
    );
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.log_file, Some(PathBuf::from("lexview.log")));
    assert_eq!(flags.show_unlisted, Some(false));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".lexviewrc");
    let content = "--languages French\n--theme light\n--timeout 20\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_flags = ConfigFlags {
        theme: Some(ThemeMode::Dark),
        show_unlisted: Some(false),
        ..ConfigFlags::default()
    };

    let effective = file_flags.union(&cli_flags);
    assert_eq!(effective.theme, Some(ThemeMode::Dark), "cli should override theme");
    assert_eq!(
        effective.ordering(),
        LanguageOrdering::new(vec!["French".to_string()], false),
        "file languages should be kept when CLI does not override"
    );
    assert_eq!(effective.timeout_secs, Some(20));
}

#[test]
fn test_local_file_overrides_global_file() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config");
    let local = dir.path().join(".lexviewrc");
    std::fs::write(&global, "--endpoint http://global\n--timeout 3\n").unwrap();
    std::fs::write(&local, "--endpoint=http://local\n").unwrap();

    let effective = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    let client = effective.client_config();
    assert_eq!(client.endpoint, "http://local");
    assert_eq!(client.timeout, std::time::Duration::from_secs(3));
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "lexview".to_string(),
        "--theme=dark".to_string(),
        "--languages=Latin,Greek".to_string(),
        "--endpoint=http://host/definition?lang=en".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.theme, Some(ThemeMode::Dark));
    assert_eq!(
        flags.languages,
        Some(vec!["Latin".to_string(), "Greek".to_string()])
    );
    assert_eq!(
        flags.endpoint.as_deref(),
        Some("http://host/definition?lang=en")
    );
}

#[test]
fn test_missing_config_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}
