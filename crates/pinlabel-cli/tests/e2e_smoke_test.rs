use std::{fs, path::PathBuf};

use tempfile::tempdir;

use pinlabel_cli::{Args, Prefer, run};

fn fixtures_path() -> PathBuf {
    // Fixtures are at workspace root, relative to workspace not the crate
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("fixtures")
}

/// The trimmed content of every `<text>` element, in document order.
fn text_contents(rendered: &str) -> Vec<&str> {
    rendered
        .split("</text>")
        .filter_map(|chunk| chunk.rsplit_once('>'))
        .map(|(_, text)| text.trim())
        .filter(|text| !text.is_empty())
        .collect()
}

fn feather_args(pinout: PathBuf, out_dir: &std::path::Path) -> Args {
    let feather = fixtures_path().join("feather");
    Args {
        board: feather.join("feather.fzp").to_string_lossy().to_string(),
        pin_definitions: feather.join("pins.c").to_string_lossy().to_string(),
        pinout: pinout.to_string_lossy().to_string(),
        substitute: Vec::new(),
        arduino_variant: None,
        output: out_dir.join("output.svg").to_string_lossy().to_string(),
        labels: out_dir.join("pinlabels.svg").to_string_lossy().to_string(),
        config: None,
        prefer: None,
        allow_unmatched: false,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_feather() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut args = feather_args(
        fixtures_path().join("feather").join("pinout.csv"),
        temp_dir.path(),
    );
    args.substitute = vec!["^IO([0-9])".to_string(), "D\\1".to_string()];
    args.arduino_variant = Some(
        fixtures_path()
            .join("feather")
            .join("variant")
            .to_string_lossy()
            .to_string(),
    );

    if let Err(e) = run(&args) {
        panic!("Feather fixture failed: {e}");
    }

    let labels = fs::read_to_string(&args.labels).expect("Labels not written");
    let texts = text_contents(&labels);
    assert_eq!(texts.len(), 8);
    assert!(texts.contains(&"D3"));
    assert!(!texts.contains(&"NEOPIXEL"), "Internal pins have no position");

    let overview = fs::read_to_string(&args.output).expect("Overview not written");
    assert!(overview.contains("connector0pin"), "Artwork should be embedded");
    assert!(text_contents(&overview).contains(&"NEOPIXEL"));
}

#[test]
fn e2e_smoke_test_none_pin_definitions() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut args = feather_args(
        fixtures_path().join("feather").join("pinout_names.csv"),
        temp_dir.path(),
    );
    args.pin_definitions = "None".to_string();

    run(&args).expect("Connector names should match the name-keyed pinout");
    let labels = fs::read_to_string(&args.labels).unwrap();
    assert!(text_contents(&labels).contains(&"IO3"));
}

#[test]
fn e2e_smoke_test_config_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut args = feather_args(
        fixtures_path().join("feather").join("pinout.csv"),
        temp_dir.path(),
    );
    args.config = Some(
        fixtures_path()
            .join("feather")
            .join("config.toml")
            .to_string_lossy()
            .to_string(),
    );
    args.prefer = Some(Prefer::Circuitpython);

    run(&args).expect("Configured run failed");
    let labels = fs::read_to_string(&args.labels).unwrap();
    assert!(text_contents(&labels).contains(&"D3"));
}

#[test]
fn e2e_smoke_test_error_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let errors = fixtures_path().join("errors");

    let mut csv_files: Vec<PathBuf> = fs::read_dir(&errors)
        .expect("No error fixtures directory")
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("csv"))
        .collect();
    csv_files.sort();
    assert!(!csv_files.is_empty(), "No error fixtures found in fixtures/errors/");

    for pinout in csv_files {
        let args = feather_args(pinout.clone(), temp_dir.path());
        match run(&args) {
            Ok(()) => panic!("{} succeeded unexpectedly", pinout.display()),
            Err(err) => assert_eq!(err.exit_code(), 5, "{}: {err}", pinout.display()),
        }
    }
}

#[test]
fn e2e_smoke_test_allow_unmatched() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut args = feather_args(
        fixtures_path().join("errors").join("pinout_unmatched.csv"),
        temp_dir.path(),
    );
    args.allow_unmatched = true;

    run(&args).expect("Unmatched rows should only warn");
    let labels = fs::read_to_string(&args.labels).unwrap();
    assert_eq!(text_contents(&labels).len(), 8);
}

#[test]
fn e2e_smoke_test_bad_rule_exit_code() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut args = feather_args(
        fixtures_path().join("feather").join("pinout.csv"),
        temp_dir.path(),
    );
    args.substitute = vec!["([".to_string(), "x".to_string()];

    let err = run(&args).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
