use clap::Parser;
use convgen::cli::{Cli, Commands, InfoFormat};
use std::path::PathBuf;

#[test]
fn test_generate_with_global_flags() {
    let cli = Cli::try_parse_from([
        "convgen",
        "generate",
        "--dry-run",
        "-vv",
        "--index",
        "build/symbols.toml",
        "-o",
        "out",
    ])
    .unwrap();

    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.output, Some(PathBuf::from("out")));
    assert_eq!(cli.default_log_filter(), "trace");
    match cli.command {
        Commands::Generate(args) => {
            assert!(args.dry_run);
            assert_eq!(args.index.index, Some(PathBuf::from("build/symbols.toml")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_info_format() {
    let cli = Cli::try_parse_from(["convgen", "info", "--format", "json"]).unwrap();
    match cli.command {
        Commands::Info(args) => assert_eq!(args.format, InfoFormat::Json),
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["convgen", "info"]).unwrap();
    match cli.command {
        Commands::Info(args) => assert_eq!(args.format, InfoFormat::Pretty),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_quiet_sets_error_filter() {
    let cli = Cli::try_parse_from(["convgen", "-q", "validate"]).unwrap();
    assert!(cli.quiet);
    assert_eq!(cli.default_log_filter(), "error");
}

#[test]
fn test_quiet_and_verbose_conflict() {
    assert!(Cli::try_parse_from(["convgen", "-q", "-v", "validate"]).is_err());
}

#[test]
fn test_config_flag_and_init_force() {
    let cli = Cli::try_parse_from(["convgen", "init", "--force", "-c", "custom.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    match cli.command {
        Commands::Init(args) => assert!(args.force),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_command_is_required() {
    assert!(Cli::try_parse_from(["convgen"]).is_err());
    assert!(Cli::try_parse_from(["convgen", "typesync"]).is_err());
}
