use std::{fs, process::Command};

use tempfile::tempdir;

fn cli(dir: &std::path::Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_goldfile-cli"));
    command
        .current_dir(dir)
        .env_remove("GOLDFILE_CONFIG_PATH")
        .env_remove("GOLDFILE_DIR")
        .env_remove("GOLDFILE_UPDATE")
        .env("RUST_LOG", "off");
    command
}

#[test]
fn path_prints_resolved_location() {
    let temp = tempdir().expect("tempdir should be creatable");
    let output = cli(temp.path())
        .args(["path", "sub/name.txt"])
        .output()
        .expect("cli should run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    assert_eq!(
        stdout.trim_end(),
        std::path::Path::new("testdata").join("sub/name.txt").display().to_string()
    );
}

#[test]
fn check_with_update_then_verify() {
    let temp = tempdir().expect("tempdir should be creatable");
    fs::create_dir_all(temp.path().join("testdata")).expect("gold dir should be creatable");
    let input = temp.path().join("actual.txt");
    fs::write(&input, "value").expect("input write should work");

    let updated = cli(temp.path())
        .args(["check", "out.txt", "--update", "--input"])
        .arg(&input)
        .status()
        .expect("cli should run");
    assert!(updated.success());
    assert_eq!(
        fs::read_to_string(temp.path().join("testdata/out.txt")).expect("gold should exist"),
        "value"
    );

    fs::write(&input, "changed").expect("input write should work");
    let output = cli(temp.path())
        .args(["check", "out.txt", "--input"])
        .arg(&input)
        .output()
        .expect("cli should run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"value\""));
    assert!(stderr.contains("\"changed\""));
}

#[test]
fn list_uses_dir_override() {
    let temp = tempdir().expect("tempdir should be creatable");
    let gold_dir = temp.path().join("fixtures");
    fs::create_dir_all(gold_dir.join("nested")).expect("gold dir should be creatable");
    fs::write(gold_dir.join("b.txt"), "b").expect("write should work");
    fs::write(gold_dir.join("nested/a.txt"), "a").expect("write should work");

    let output = cli(temp.path())
        .arg("list")
        .arg("--dir")
        .arg(&gold_dir)
        .output()
        .expect("cli should run");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).expect("stdout should be utf-8"),
        "b.txt\nnested/a.txt\n"
    );
}

#[test]
fn update_env_switches_check_into_update_mode() {
    let temp = tempdir().expect("tempdir should be creatable");
    fs::create_dir_all(temp.path().join("testdata")).expect("gold dir should be creatable");
    let input = temp.path().join("actual.txt");
    fs::write(&input, "from env").expect("input write should work");

    let status = cli(temp.path())
        .env("GOLDFILE_UPDATE", "1")
        .args(["check", "x.txt", "--input"])
        .arg(&input)
        .status()
        .expect("cli should run");
    assert!(status.success());
    assert_eq!(
        fs::read_to_string(temp.path().join("testdata/x.txt")).expect("gold should exist"),
        "from env"
    );
}

#[test]
fn dir_env_redirects_path() {
    let temp = tempdir().expect("tempdir should be creatable");
    let output = cli(temp.path())
        .env("GOLDFILE_DIR", "fixtures")
        .args(["path", "a.txt"])
        .output()
        .expect("cli should run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    assert_eq!(
        stdout.trim_end(),
        std::path::Path::new("fixtures").join("a.txt").display().to_string()
    );
}

#[test]
fn config_path_env_is_honoured() {
    let temp = tempdir().expect("tempdir should be creatable");
    fs::create_dir_all(temp.path().join("configured")).expect("gold dir should be creatable");
    let config = temp.path().join("custom.toml");
    fs::write(&config, "gold_dir = \"configured\"\nupdate = true\n")
        .expect("config write should work");
    let input = temp.path().join("actual.txt");
    fs::write(&input, "from config").expect("input write should work");

    let status = cli(temp.path())
        .env("GOLDFILE_CONFIG_PATH", &config)
        .args(["check", "c.txt", "--input"])
        .arg(&input)
        .status()
        .expect("cli should run");
    assert!(status.success());
    assert_eq!(
        fs::read_to_string(temp.path().join("configured/c.txt")).expect("gold should exist"),
        "from config"
    );
}

#[test]
fn config_file_in_working_directory_is_discovered() {
    let temp = tempdir().expect("tempdir should be creatable");
    fs::write(
        temp.path().join("goldfile.config.toml"),
        "gold_dir = \"discovered\"\n",
    )
    .expect("config write should work");

    let output = cli(temp.path())
        .args(["path", "d.txt"])
        .output()
        .expect("cli should run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    assert_eq!(
        stdout.trim_end(),
        std::path::Path::new("discovered").join("d.txt").display().to_string()
    );
}

#[test]
fn empty_update_env_keeps_config_value() {
    let temp = tempdir().expect("tempdir should be creatable");
    fs::create_dir_all(temp.path().join("testdata")).expect("gold dir should be creatable");
    fs::write(temp.path().join("goldfile.config.toml"), "update = true\n")
        .expect("config write should work");
    let input = temp.path().join("actual.txt");
    fs::write(&input, "kept").expect("input write should work");

    let status = cli(temp.path())
        .env("GOLDFILE_UPDATE", "")
        .args(["check", "e.txt", "--input"])
        .arg(&input)
        .status()
        .expect("cli should run");
    assert!(status.success());
    assert_eq!(
        fs::read_to_string(temp.path().join("testdata/e.txt")).expect("gold should exist"),
        "kept"
    );
}

#[test]
fn missing_config_path_file_fails() {
    let temp = tempdir().expect("tempdir should be creatable");
    let output = cli(temp.path())
        .env("GOLDFILE_CONFIG_PATH", temp.path().join("nope.toml"))
        .args(["path", "a.txt"])
        .output()
        .expect("cli should run");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("GOLDFILE_CONFIG_PATH"));
}

#[test]
fn log_dir_receives_json_log_file() {
    let temp = tempdir().expect("tempdir should be creatable");
    let log_dir = temp.path().join("logs");
    let status = cli(temp.path())
        .env("RUST_LOG", "info")
        .args(["path", "a.txt", "--log-dir"])
        .arg(&log_dir)
        .status()
        .expect("cli should run");
    assert!(status.success());

    let logs: Vec<_> = fs::read_dir(&log_dir)
        .expect("log dir should exist")
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with("goldfile-")
        })
        .collect();
    assert_eq!(logs.len(), 1);
}
