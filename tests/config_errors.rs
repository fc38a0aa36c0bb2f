// tests/config_errors.rs

mod common;
use crate::common::builders::{gcn_sweep, SweepConfigBuilder};

use std::collections::HashSet;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use gridrun::config::{load_and_validate, load_with_overrides, parse_and_validate, ConfigOverrides};
use gridrun::errors::GridrunError;
use gridrun::grid::PlaceholderTemplate;
use gridrun::types::LaunchMode;

type TestResult = Result<(), Box<dyn Error>>;

fn expect_config_error(result: gridrun::errors::Result<impl std::fmt::Debug>, needle: &str) {
    match result {
        Err(GridrunError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} does not mention {needle:?}");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(v) => panic!("Expected error, got Ok({:?})", v),
    }
}

#[test]
fn unbound_placeholder_is_rejected_before_any_job() {
    // `mem` appears in the command but no axis produces it.
    let result = SweepConfigBuilder::new("./gcn_sim -hash-table-size={buffer_size} -dram-name={mem}")
        .axis("buffer_size", [32, 64])
        .try_build();
    expect_config_error(result, "'mem'");
}

#[test]
fn varying_axis_missing_from_naming_key_is_rejected() {
    let result = gcn_sweep(&["g1"]).name_key(&["graph", "buffer_size"]).try_build();
    expect_config_error(result, "divider");
}

#[test]
fn single_value_referenced_axis_missing_from_key_is_rejected() {
    let result = SweepConfigBuilder::new("./sim -n={n} -mem={mem}")
        .axis("n", [1, 2])
        .axis("mem", ["DDR4"])
        .name_key(&["n"])
        .try_build();
    expect_config_error(result, "'mem' is used by the command template");
}

#[test]
fn unknown_naming_key_axis_is_rejected() {
    let result = SweepConfigBuilder::new("./sim {n}")
        .axis("n", [1, 2])
        .name_key(&["n", "nope"])
        .try_build();
    expect_config_error(result, "unknown axis 'nope'");
}

#[test]
fn zero_concurrency_is_rejected() {
    let result = gcn_sweep(&["g1"]).concurrency(0).try_build();
    expect_config_error(result, "concurrency");
}

#[test]
fn empty_axis_and_duplicate_values_are_rejected() {
    let empty: [i64; 0] = [];
    let result = SweepConfigBuilder::new("./sim {n}").axis("n", empty).try_build();
    expect_config_error(result, "at least one value");

    let result = SweepConfigBuilder::new("./sim {n}").axis("n", [1, 2, 1]).try_build();
    expect_config_error(result, "more than once");
}

#[test]
fn duplicate_axis_names_are_rejected() {
    let result = SweepConfigBuilder::new("./sim {n}")
        .axis("n", [1])
        .axis("n", [2])
        .try_build();
    expect_config_error(result, "declared more than once");
}

#[test]
fn ambiguous_dotted_names_are_rejected() -> TestResult {
    let result = SweepConfigBuilder::new("./sim {a} {b}")
        .axis("a", ["x.y", "x"])
        .axis("b", ["y.z", "z"])
        .try_build();
    expect_config_error(result, "ambiguous");

    // One dotted axis is fine, and its names stay distinct.
    let cfg = SweepConfigBuilder::new("./sim {a} {b}")
        .axis("a", ["x.y", "x", "x."])
        .axis("b", ["y", "z"])
        .try_build()?;
    let paths: HashSet<PathBuf> = cfg
        .grid()
        .expand()
        .map(|j| j.output_path().to_path_buf())
        .collect();
    assert_eq!(paths.len(), 6);
    assert!(paths.contains(&PathBuf::from("./y.x.y.sched.out")));
    Ok(())
}

#[test]
fn path_separators_in_named_values_are_rejected() {
    let result = SweepConfigBuilder::new("./sim {g}")
        .axis("g", ["graphs/g1"])
        .try_build();
    expect_config_error(result, "cannot be part of a file name");
}

#[test]
fn malformed_template_braces_are_rejected() {
    expect_config_error(PlaceholderTemplate::parse("echo ${HOME}/{a b}"), "invalid placeholder");
    expect_config_error(PlaceholderTemplate::parse("echo {}"), "invalid placeholder");
    expect_config_error(PlaceholderTemplate::parse("echo {x"), "unmatched '{'");
    expect_config_error(PlaceholderTemplate::parse("echo x}"), "unmatched '}'");
}

#[test]
fn load_and_validate_reads_toml() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[sweep]
cmd = "./gcn_sim -hash-table-size={{buffer_size}} -graph-name={{graph}} -short-large-divider={{divider}}"
concurrency = 3
launch_mode = "direct"

[[axis]]
name = "divider"
values = [1, 2, 4, 8, 16]

[[axis]]
name = "buffer_size"
values = [32, 64, 128, 256, 512]

[[axis]]
name = "graph"
values = ["g1", "g2"]
"#
    )?;

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.concurrency(), 3);
    assert_eq!(cfg.launch_mode(), LaunchMode::Direct);
    assert_eq!(cfg.output_dir(), PathBuf::from("."));
    assert_eq!(cfg.grid().len(), 50);
    assert_eq!(cfg.axes().len(), 3);
    assert_eq!(cfg.grid().naming_key(), ["graph", "buffer_size", "divider"]);

    let first = cfg.grid().expand().next().ok_or("no jobs")?;
    assert_eq!(
        first.command(),
        "./gcn_sim -hash-table-size=32 -graph-name=g1 -short-large-divider=1"
    );
    assert_eq!(first.output_path(), PathBuf::from("./g1.32.1.sched.out"));

    Ok(())
}

#[test]
fn overrides_take_precedence_over_file() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[sweep]
cmd = "echo {{n}}"
concurrency = 4
output_dir = "from-file"

[[axis]]
name = "n"
values = [1]
"#
    )?;

    let overrides = ConfigOverrides {
        concurrency: Some(2),
        output_dir: Some(PathBuf::from("from-cli")),
        launch_mode: Some(LaunchMode::Direct),
    };
    let cfg = load_with_overrides(file.path(), &overrides)?;
    assert_eq!(cfg.concurrency(), 2);
    assert_eq!(cfg.launch_mode(), LaunchMode::Direct);

    let job = cfg.grid().expand().next().ok_or("no jobs")?;
    assert_eq!(job.output_path(), PathBuf::from("from-cli/1.sched.out"));

    // An override can also make an otherwise valid file invalid.
    let zero = ConfigOverrides {
        concurrency: Some(0),
        ..Default::default()
    };
    expect_config_error(load_with_overrides(file.path(), &zero), "concurrency");

    Ok(())
}

#[test]
fn unknown_fields_and_bad_launch_mode_are_toml_errors() {
    let result = parse_and_validate(
        r#"
[sweep]
cmd = "echo"
concurency = 4
"#,
    );
    assert!(matches!(result, Err(GridrunError::TomlError(_))), "{result:?}");

    let result = parse_and_validate(
        r#"
[sweep]
cmd = "echo"
launch_mode = "ssh"
"#,
    );
    assert!(matches!(result, Err(GridrunError::TomlError(_))), "{result:?}");
}

#[test]
fn missing_file_is_io_error() {
    let result = load_and_validate("/definitely/not/here/Gridrun.toml");
    assert!(matches!(result, Err(GridrunError::IoError(_))), "{result:?}");
}

#[test]
fn cli_defaults_to_the_standard_sweep_file() -> TestResult {
    use clap::Parser;

    let args = gridrun::cli::CliArgs::try_parse_from(["gridrun"])?;
    assert_eq!(args.config, gridrun::config::DEFAULT_CONFIG_FILE);
    assert_eq!(args.concurrency, None);
    assert!(!args.dry_run);
    Ok(())
}
