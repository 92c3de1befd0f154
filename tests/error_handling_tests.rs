use std::fs;
use tempfile::TempDir;
use valcss::{build, init, BuildOptions, InitArgs, ValcssConfig, ValcssError};

#[test]
fn test_missing_config_points_at_init() {
    let temp_dir = TempDir::new().unwrap();

    let result = build(&BuildOptions::new(temp_dir.path()));
    let error_msg = format!("{}", result.unwrap_err());
    assert!(error_msg.contains("valcss.config.json"), "{}", error_msg);
    assert!(error_msg.contains("valcss init"), "{}", error_msg);
}

#[test]
fn test_malformed_config_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("valcss.config.json"), "{ \"files\": [").unwrap();

    let err = build(&BuildOptions::new(temp_dir.path())).unwrap_err();
    assert!(matches!(err, ValcssError::ConfigError { .. }));
    assert!(err.to_string().contains("Failed to parse JSON config"));
}

#[test]
fn test_empty_files_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("valcss.config.yml"), "files: []\n").unwrap();

    let err = build(&BuildOptions::new(temp_dir.path())).unwrap_err();
    assert!(err.to_string().contains("'files'"));
}

#[test]
fn test_explicit_config_path() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("conf")).unwrap();
    fs::write(temp_dir.path().join("conf/page.html"), r#"<p class="block"></p>"#).unwrap();
    fs::write(
        temp_dir.path().join("conf/custom.json"),
        r#"{ "files": ["page.html"] }"#,
    )
    .unwrap();

    let mut options = BuildOptions::new(temp_dir.path());
    options.config = Some("conf/custom.json".into());
    options.dry_run = true;
    let result = build(&options).unwrap();
    assert_eq!(result.css, ".block { display: block; }");

    options.config = Some("conf/absent.json".into());
    assert!(build(&options).is_err());
}

#[test]
fn test_invalid_breakpoints_are_warnings() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("index.html"), r#"<p class="md:block tablet:block"></p>"#).unwrap();
    fs::write(
        temp_dir.path().join("valcss.config.json"),
        r#"{ "files": ["index.html"], "breakpoints": { "md": "asd", "tablet": "bad" } }"#,
    )
    .unwrap();

    let mut options = BuildOptions::new(temp_dir.path());
    options.dry_run = true;
    let result = build(&options).unwrap();

    let messages: Vec<String> = result.warnings().map(|d| d.to_string()).collect();
    assert!(messages.contains(
        &"Invalid breakpoint value \"asd\", using default value 768px instead: \"md\"".to_string()
    ));
    assert!(messages.contains(&"Invalid breakpoint value \"bad\", breakpoint ignored: \"tablet\"".to_string()));
    assert!(result.css.contains("@media (min-width: 768px)"));
}

#[test]
fn test_non_integer_breakpoints_load_as_warnings() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("index.html"), r#"<p class="md:block lg:block"></p>"#).unwrap();
    fs::write(
        temp_dir.path().join("valcss.config.json"),
        r#"{ "files": ["index.html"], "breakpoints": { "lg": 990.5, "md": null } }"#,
    )
    .unwrap();

    let config = ValcssConfig::from_file(&temp_dir.path().join("valcss.config.json")).unwrap();
    assert_eq!(config.breakpoints.len(), 2);

    let mut options = BuildOptions::new(temp_dir.path());
    options.dry_run = true;
    let result = build(&options).unwrap();

    let messages: Vec<String> = result.warnings().map(|d| d.to_string()).collect();
    assert_eq!(
        messages,
        vec!["Invalid breakpoint value null, using default value 768px instead: \"md\"".to_string()]
    );
    assert!(result.css.contains("@media (min-width: 768px)"));
    assert!(result.css.contains("@media (min-width: 990px)"));
}

#[test]
fn test_unreadable_input_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("binary.html"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
    fs::write(temp_dir.path().join("valcss.config.json"), r#"{ "files": ["*.html"] }"#).unwrap();

    let mut options = BuildOptions::new(temp_dir.path());
    options.dry_run = true;
    let err = build(&options).unwrap_err();
    assert!(matches!(err, ValcssError::InputError { .. }));
    assert!(err.to_string().contains("binary.html"));
}

#[test]
fn test_init_writes_loadable_config_once() {
    let temp_dir = TempDir::new().unwrap();

    let path = init(temp_dir.path(), &InitArgs { yaml: false }).unwrap();
    assert!(path.ends_with("valcss.config.json"));
    let config = ValcssConfig::from_file(&path).unwrap();
    assert_eq!(config, ValcssConfig::default());

    let err = init(temp_dir.path(), &InitArgs { yaml: true }).unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn test_init_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let path = init(temp_dir.path(), &InitArgs { yaml: true }).unwrap();
    assert!(path.ends_with("valcss.config.yaml"));
    assert_eq!(ValcssConfig::from_file(&path).unwrap(), ValcssConfig::default());
}
