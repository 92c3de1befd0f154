use clap::Parser;
use std::io::Write;
use std::process::{Command, Stdio};
use valcss::{Cli, Commands};

#[test]
fn test_cli_parse_build_defaults() {
    let cli = Cli::parse_from(["valcss", "build"]);

    match cli.command {
        Commands::Build(args) => {
            assert!(args.config.is_none());
            assert!(args.output.is_none());
            assert!(!args.watch);
            assert!(!args.dry_run);
            assert!(!args.verbose);
            assert!(args.validate().is_ok());
        }
        _ => panic!("Expected Build command"),
    }
}

#[test]
fn test_cli_parse_build_with_flags() {
    let cli = Cli::parse_from([
        "valcss",
        "build",
        "--config", "conf/valcss.config.yaml",
        "--output", "dist/site.css",
        "-w",
        "-v",
    ]);

    match cli.command {
        Commands::Build(args) => {
            assert_eq!(args.config.unwrap().to_str().unwrap(), "conf/valcss.config.yaml");
            assert_eq!(args.output.as_deref(), Some("dist/site.css"));
            assert!(args.watch);
            assert!(args.verbose);
        }
        _ => panic!("Expected Build command"),
    }
}

#[test]
fn test_cli_rejects_watch_with_dry_run() {
    let cli = Cli::parse_from(["valcss", "build", "--watch", "--dry-run"]);
    match cli.command {
        Commands::Build(args) => assert!(args.validate().is_err()),
        _ => panic!("Expected Build command"),
    }
}

#[test]
fn test_cli_missing_output_value() {
    assert!(Cli::try_parse_from(["valcss", "build", "--output"]).is_err());
}

#[test]
fn test_cli_parse_init_and_pipe() {
    let cli = Cli::parse_from(["valcss", "init", "--yaml"]);
    assert!(matches!(cli.command, Commands::Init(args) if args.yaml));

    let cli = Cli::parse_from(["valcss", "pipe"]);
    assert!(matches!(cli.command, Commands::Pipe(args) if !args.keep_comments));
}

#[test]
fn test_cli_unknown_subcommand() {
    assert!(Cli::try_parse_from(["valcss", "extract"]).is_err());
}

fn run_pipe(input: &str, extra: &[&str]) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_valcss"))
        .arg("pipe")
        .args(extra)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn valcss");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .expect("Failed to write to stdin");

    child.wait_with_output().expect("Failed to read output")
}

#[test]
fn test_pipe_mode() {
    let output = run_pipe(
        r#"<div class="flex md:p-[4px] nope-[1px]"></div><!-- <p class="grid"></p> -->"#,
        &[],
    );
    assert!(
        output.status.success(),
        "Pipe command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let css = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        css,
        ".flex { display: flex; }\n@media (min-width: 768px) {\n  .md\\:p-\\[4px\\] { padding: 4px; }\n}\n"
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown class"));
}

#[test]
fn test_pipe_keep_comments() {
    let output = run_pipe(r#"<!-- <p class="grid"></p> -->"#, &["--keep-comments"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), ".grid { display: grid; }\n");
}

#[test]
fn test_pipe_empty_input() {
    let output = run_pipe("", &[]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
