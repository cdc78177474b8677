use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("minibank"));
    cmd.arg("tests/fixtures/accounts.csv")
        .arg("tests/fixtures/transfers.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("id,owner,balance"))
        // Origin debited
        .stdout(predicate::str::contains("1,alice,900"))
        // Destination credited
        .stdout(predicate::str::contains("2,bob,2100"))
        .stderr(predicate::str::contains("1 transfers completed"));

    Ok(())
}
