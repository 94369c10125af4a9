use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn billing(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("billing").unwrap();
    cmd.env("BILLING_DATA_DIR", dir.path());
    cmd
}

fn setup_recipient(dir: &TempDir) {
    billing(dir).arg("init").assert().success();
    billing(dir)
        .args(["config", "--provider-prefix", "PROV01"])
        .assert()
        .success();
    billing(dir)
        .args([
            "recipient",
            "add",
            "Doe",
            "Jane",
            "123456789012",
            "--work",
            "adf",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added recipient: Doe, Jane"));
}

#[test]
fn week_prints_five_dates() {
    let dir = TempDir::new().unwrap();
    billing(&dir)
        .args(["week", "060925"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday     06/09/25"))
        .stdout(predicate::str::contains("Friday     06/13/25"));
}

#[test]
fn week_rejects_tuesday() {
    let dir = TempDir::new().unwrap();
    billing(&dir)
        .args(["week", "06/10/25"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The date provided does not fall on Monday: 06/10/25",
        ));
}

#[test]
fn recipient_rejects_short_medicaid_id() {
    let dir = TempDir::new().unwrap();
    billing(&dir)
        .args(["recipient", "add", "Doe", "Jane", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn schedule_duplicate_and_ineligible() {
    let dir = TempDir::new().unwrap();
    setup_recipient(&dir);

    billing(&dir)
        .args(["schedule", "add", "123456789012", "monday", "work"])
        .assert()
        .success();

    billing(&dir)
        .args(["schedule", "add", "123456789012", "Monday", "WORK"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already scheduled"));

    billing(&dir)
        .args(["schedule", "add", "123456789012", "monday", "trip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not have a valid service code"));

    billing(&dir)
        .args(["schedule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday"))
        .stdout(predicate::str::contains("Doe, Jane"));
}

#[test]
fn bill_blocks_out_of_range_then_submits() {
    let dir = TempDir::new().unwrap();
    setup_recipient(&dir);

    billing(&dir)
        .args(["schedule", "add", "123456789012", "monday", "work"])
        .assert()
        .success();

    billing(&dir)
        .args(["bill", "060925", "--unit", "123456789012:monday:work=25"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Max 20 units"))
        .stderr(predicate::str::contains("Submission blocked"));

    billing(&dir)
        .args(["export", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No billing output yet."));

    billing(&dir)
        .args(["bill", "060925", "--unit", "123456789012:monday:work=20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Submitted 1 billing entry"));

    billing(&dir)
        .args(["export", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "PROV01              12345678901220250609ADF2000",
        ));
}

#[test]
fn bill_dry_run_submits_nothing() {
    let dir = TempDir::new().unwrap();
    setup_recipient(&dir);

    billing(&dir)
        .args(["schedule", "add", "123456789012", "wed", "work"])
        .assert()
        .success();

    billing(&dir)
        .args([
            "bill",
            "06/09/25",
            "--unit",
            "123456789012:wed:work=4",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wednesday 06/11/25"))
        .stdout(predicate::str::contains("Dry run"));

    billing(&dir)
        .args(["export", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No billing output yet."));
}

#[test]
fn export_save_and_clear() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    setup_recipient(&dir);

    billing(&dir)
        .args(["schedule", "add", "123456789012", "friday", "work"])
        .assert()
        .success();
    billing(&dir)
        .args(["bill", "060925", "--unit", "123456789012:fri:work=3"])
        .assert()
        .success();

    billing(&dir)
        .args(["export", "save", "--dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 75 bytes"));

    billing(&dir)
        .args(["export", "clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 exported line(s)"));
}

#[test]
fn recipient_delete_removes_schedule() {
    let dir = TempDir::new().unwrap();
    setup_recipient(&dir);

    billing(&dir)
        .args(["schedule", "add", "123456789012", "monday", "work"])
        .assert()
        .success();

    billing(&dir)
        .args(["recipient", "delete", "123456789012", "--force"])
        .assert()
        .success();

    billing(&dir)
        .args(["schedule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No schedules found."));
}
