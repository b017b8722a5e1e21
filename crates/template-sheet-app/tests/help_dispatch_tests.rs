//! Integration tests for command dispatch and help handling.

mod common;

use std::path::PathBuf;

use template_sheet_app::{Command, app_version, help_text, parse_command, run};
use template_sheet_core::{A_SERIES, Settings};

#[test]
fn help_dispatch_tests_no_arguments_shows_help() {
    assert_eq!(parse_command(&[]).expect("should parse"), Command::Help);
}

#[test]
fn help_dispatch_tests_unknown_command_shows_help() {
    let command = parse_command(&common::words(&["print", "label.png"])).expect("should parse");
    assert_eq!(command, Command::Help);
}

#[test]
fn help_dispatch_tests_help_flag_wins_in_any_position() {
    for args in [
        vec!["create", "-h"],
        vec!["create", "bogus", "-help"],
        vec!["replicate", "label.png", "-paper", "Z9", "--help"],
        vec!["-h"],
    ] {
        let command = parse_command(&common::words(&args)).expect("help should not fail");
        assert_eq!(command, Command::Help, "{args:?}");
    }
}

#[test]
fn help_dispatch_tests_parses_create_and_replicate() {
    let create = parse_command(&common::words(&["create", "50x20", "-px", "16"]))
        .expect("create should parse");
    assert_eq!(
        create,
        Command::Create {
            width_mm: 50,
            height_mm: 20,
            settings: Settings {
                pixels_per_mm: 16,
                ..Settings::default()
            },
        }
    );

    let replicate = parse_command(&common::words(&[
        "replicate", "label.jpg", "-margin", "20", "-paper", "a5",
    ]))
    .expect("replicate should parse");
    assert_eq!(
        replicate,
        Command::Replicate {
            template: PathBuf::from("label.jpg"),
            settings: Settings {
                paper: A_SERIES[5],
                margin_mm: 20,
                ..Settings::default()
            },
        }
    );
}

#[test]
fn help_dispatch_tests_list_has_short_alias() {
    assert_eq!(
        parse_command(&common::words(&["list"])).expect("list"),
        Command::List
    );
    assert_eq!(
        parse_command(&common::words(&["ls"])).expect("ls"),
        Command::List
    );
}

#[test]
fn help_dispatch_tests_missing_operand_is_configuration_error() {
    let error = parse_command(&common::words(&["create"])).expect_err("operand is missing");
    assert!(error.to_string().contains("create 50x20"));
    assert_eq!(error.exit_code(), 1);

    let error = parse_command(&common::words(&["replicate"])).expect_err("operand is missing");
    assert!(error.to_string().contains("replicate template.png"));
}

#[test]
fn help_dispatch_tests_help_text_names_version_and_executable() {
    let text = help_text("stamper");
    assert!(text.contains(&format!("v{}", app_version())));
    assert!(text.contains("stamper create <dimensions>"));
    assert!(text.contains("stamper replicate label.jpg -margin 20"));
    assert!(text.contains("-paper A4"));

    let mut output = Vec::new();
    run(Command::Help, std::path::Path::new("."), "stamper", &mut output)
        .expect("help should print");
    assert_eq!(String::from_utf8(output).expect("utf8"), text);
}
