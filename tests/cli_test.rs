//! Integration tests for the interchange CLI.
//!
//! These tests run the actual binary against temporary source files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_classify_bailiff_file() {
    let input = write_temp(
        "13/05/2025,521636L,1168.94,NDR,1219226\n\
         14/05/2025,789012X,250.00,Council Tax,1219227\n",
    );

    let mut cmd = Command::cargo_bin("revenues-interchange").unwrap();
    cmd.arg("classify")
        .arg("bailiff")
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("521636L"))
        .stdout(predicate::str::contains("1168.94"))
        .stdout(predicate::str::contains("1219226 (Liability order number)"));
}

#[test]
fn test_classify_post_office_file() {
    let input = write_temp(
        "BANNER\n\
         Paid,Payment,13052025 103000,4711,1,CL1,L1,98265029000800950031019,55.25,0,,,,,Counter,,PSP1,Post Office,Cash\n\
         TOTALS,1\n\
         END\n",
    );

    let mut cmd = Command::cargo_bin("revenues-interchange").unwrap();
    cmd.arg("classify")
        .arg("post-office")
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("95003101A"))
        .stdout(predicate::str::contains("Post Office - Cash"));
}

#[test]
fn test_export_housing_rents() {
    let normalized = write_temp(
        "reference,internal_reference,psp_reference,office_code,entry_date,transaction_date,\
         account_reference,fund_code,mop_code,amount,vat_code,vat_rate,vat_amount,narrative\n\
         ,ABCDEFGH12345678,PYD-250516-1,S,2025-05-16T08:00:00,2025-05-13T00:00:00,\
         90000001E,8,51,1168.94,3,0,0.00,\n",
    );

    let mut cmd = Command::cargo_bin("revenues-interchange").unwrap();
    cmd.arg("export")
        .arg("housing-rents")
        .arg(normalized.path())
        .assert()
        .success()
        .stdout(predicate::eq("90000001013.05.2025SA  0090000001    116894\n"));
}

#[test]
fn test_export_filters_other_funds_out() {
    let normalized = write_temp(
        "reference,internal_reference,psp_reference,office_code,entry_date,transaction_date,\
         account_reference,fund_code,mop_code,amount,vat_code,vat_rate,vat_amount,narrative\n\
         ,ABCDEFGH12345678,PYD-250516-1,S,2025-05-16T08:00:00,2025-05-13T00:00:00,\
         90000001E,2,51,1168.94,3,0,0.00,\n",
    );

    let mut cmd = Command::cargo_bin("revenues-interchange").unwrap();
    cmd.arg("export")
        .arg("housing-rents")
        .arg(normalized.path())
        .assert()
        .success()
        .stdout(predicate::eq(""));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("revenues-interchange").unwrap();
    cmd.arg("classify")
        .arg("bailiff")
        .arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("revenues-interchange").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing arguments"));
}

#[test]
fn test_unknown_source_kind_error() {
    let input = write_temp("13/05/2025,X,1.00,NDR,1\n");

    let mut cmd = Command::cargo_bin("revenues-interchange").unwrap();
    cmd.arg("classify")
        .arg("pigeon-post")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown source kind"));
}
