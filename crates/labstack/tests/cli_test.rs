use assert_cmd::Command;
use predicates::prelude::*;

/// Configuration with a concrete ami_id, so no image lookup is needed.
const TEST_CONFIG: &str = r#"
region: us-east-1
vpc_cidr: 10.0.0.0/16
roles:
  web:
    ami_id: ami-0123456789abcdef0
    ssh_user: ec2-user
subnets:
  - cidr: 10.0.1.0/24
    az: a
    servers:
      - role: web
        private_ip_suffixes: [1, 2]
"#;

fn labstack() -> Command {
    Command::cargo_bin("labstack").unwrap()
}

fn project_dir_with_config() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("labstack.yaml"), TEST_CONFIG).unwrap();
    dir
}

#[test]
fn test_cli_help() {
    labstack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mkenv"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("rmenv"))
        .stdout(predicate::str::contains("sample"));
}

#[test]
fn test_mkenv_help() {
    labstack()
        .arg("mkenv")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--plan"))
        .stdout(predicate::str::contains("--no-provision"));
}

#[test]
fn test_invalid_command() {
    labstack().arg("provision-all").assert().failure();
}

#[test]
fn test_sample_prints_starter_config() {
    labstack()
        .arg("sample")
        .assert()
        .success()
        .stdout(predicate::str::contains("region:"))
        .stdout(predicate::str::contains("subnets:"))
        .stdout(predicate::str::contains("private_ip_suffixes"));
}

#[test]
fn test_mkenv_without_config_file() {
    let dir = tempfile::tempdir().unwrap();
    labstack()
        .current_dir(dir.path())
        .args(["mkenv", "lab01", "--no-provision"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn test_mkenv_no_provision_generates_template() {
    let dir = project_dir_with_config();

    labstack()
        .current_dir(dir.path())
        .args(["mkenv", "lab01", "--no-provision"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cf.yaml"));

    let template = std::fs::read_to_string(dir.path().join("lab01/cf.yaml")).unwrap();
    assert!(template.contains("PrivateIpAddress: 10.0.1.1"));
    assert!(template.contains("PrivateIpAddress: 10.0.1.2"));
    assert!(template.contains("KeyName: lab01"));
    assert!(template.contains("InstanceA2Attributes"));

    // nothing was provisioned, so no key or inventory artifacts
    assert!(!dir.path().join("lab01/lab01.pem").exists());
    assert!(!dir.path().join("lab01/inventory.yaml").exists());
}

#[test]
fn test_mkenv_fails_when_directory_exists() {
    let dir = project_dir_with_config();
    std::fs::create_dir(dir.path().join("lab01")).unwrap();

    labstack()
        .current_dir(dir.path())
        .args(["mkenv", "lab01", "--no-provision"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_update_fails_when_directory_missing() {
    let dir = project_dir_with_config();

    labstack()
        .current_dir(dir.path())
        .args(["update", "lab01", "--no-provision"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_update_no_provision_rerenders_template() {
    let dir = project_dir_with_config();

    labstack()
        .current_dir(dir.path())
        .args(["mkenv", "lab01", "--no-provision"])
        .assert()
        .success();

    labstack()
        .current_dir(dir.path())
        .args(["update", "lab01", "--no-provision"])
        .assert()
        .success();

    assert!(dir.path().join("lab01/cf.yaml").exists());
}

#[test]
fn test_mkenv_unknown_plan() {
    let dir = project_dir_with_config();

    labstack()
        .current_dir(dir.path())
        .args(["mkenv", "lab01", "--plan", "no_such_plan", "--no-provision"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("plan not found"));
}

/// Teardown is tolerant: the remote stack being unreachable or already gone
/// must not stop the local directory from being removed.
#[test]
fn test_rmenv_removes_directory_without_remote_stack() {
    let dir = tempfile::tempdir().unwrap();
    // a region that resolves nowhere, so provider calls fail fast
    std::fs::write(
        dir.path().join("labstack.yaml"),
        TEST_CONFIG.replace("us-east-1", "us-nowhere-9"),
    )
    .unwrap();
    std::fs::create_dir(dir.path().join("labstack-itest-gone")).unwrap();

    labstack()
        .current_dir(dir.path())
        .args(["rmenv", "labstack-itest-gone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed environment"));

    assert!(!dir.path().join("labstack-itest-gone").exists());
}
