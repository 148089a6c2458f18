use clap::{CommandFactory, Parser};
use treesync::tooling::cli::Cli;

#[test]
fn parse_valid_flag_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["treesync"],
        vec!["treesync", "--source", "/a", "--replica", "/b"],
        vec!["treesync", "--config", "treesync.toml", "--once"],
        vec!["treesync", "--interval", "1", "--log-path", "/var/log/treesync"],
        vec!["treesync", "--max-concurrent-ops", "8", "--log-format", "json"],
        vec!["treesync", "--log-level", "treesync=debug"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_values() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["treesync", "--interval", "0"],
        vec!["treesync", "--interval", "-5"],
        vec!["treesync", "--interval", "soon"],
        vec!["treesync", "--log-format", "yaml"],
        vec!["treesync", "--max-concurrent-ops", "many"],
        vec!["treesync", "scan"],
    ];

    for args in cases {
        assert!(
            Cli::try_parse_from(args.clone()).is_err(),
            "expected parse failure for args: {args:?}"
        );
    }
}

#[test]
fn help_lists_every_flag() {
    let help = Cli::command().render_long_help().to_string();
    for flag in [
        "--config",
        "--source",
        "--replica",
        "--interval",
        "--log-path",
        "--max-concurrent-ops",
        "--log-level",
        "--log-format",
        "--once",
    ] {
        assert!(help.contains(flag), "help is missing {flag}");
    }
}
