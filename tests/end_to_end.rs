use filepow::{
    create_record, create_record_from_path, digest, digest_concat, leading_zero_bits,
    verify, verify_paths, CheckRun, Clock, Error, PowRecord, SearchConfigBuilder, SystemClock,
};
use std::fs;
use std::path::PathBuf;

const WALRUS: &str = "The time has come, the Walrus said, To talk of many things: Of shoes and ships and sealing-wax, Of cabbages and kings, And why the sea is boiling hot, And whether pigs have wings.";

struct FrozenClock;

impl Clock for FrozenClock {
    fn now_seconds(&self) -> f64 {
        0.0
    }
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("filepow-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn config(bits: u32, seed: u64) -> filepow::SearchConfig {
    SearchConfigBuilder::default()
        .target_bits(bits)
        .seed(seed)
        .build_validated()
        .expect("valid config")
}

#[test]
fn generate_then_verify_same_and_different_file() {
    let dir = scratch("e2e");
    let data_path = dir.join("walrus.txt");
    let header_path = dir.join("walrus.pow");
    let wrong_path = dir.join("wrong_file.txt");
    fs::write(&data_path, WALRUS).unwrap();
    fs::write(&wrong_path, "This is a different file content").unwrap();

    let record = create_record_from_path(&data_path, &config(10, 1), &SystemClock).unwrap();
    assert!(record.leading_zero_bits >= 10);
    fs::write(&header_path, record.to_header()).unwrap();

    let report = verify_paths(&header_path, &data_path).unwrap();
    assert!(report.passed());
    assert_eq!(report.lines().last().map(String::as_str), Some("pass"));

    let report = verify_paths(&header_path, &wrong_path).unwrap();
    assert!(!report.initial_hash.passed);
    assert!(report.hash.passed);
    assert!(report.leading_zero_bits.passed);
    assert_eq!(report.lines().last().map(String::as_str), Some("fail"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn search_property_over_small_targets() {
    let inputs: [&[u8]; 3] = [b"", b"a", WALRUS.as_bytes()];
    for (i, data) in inputs.iter().enumerate() {
        for target in [0u32, 1, 5, 9, 12] {
            let record =
                create_record(None, data, &config(target, i as u64), &FrozenClock).unwrap();
            assert!(record.leading_zero_bits >= i64::from(target));
            assert_eq!(record.initial_hash, digest(data));
            assert_eq!(
                record.hash,
                digest_concat(&digest(data), &record.proof_of_work)
            );
            assert_eq!(
                i64::from(leading_zero_bits(&record.hash).unwrap()),
                record.leading_zero_bits
            );
            assert_eq!(record.compute_time, Some(0.0));
        }
    }
}

#[test]
fn exhaustion_reports_target_and_cap() {
    let cfg = SearchConfigBuilder::default()
        .target_bits(200)
        .max_iterations(1000)
        .seed(3)
        .build_validated()
        .unwrap();
    let err = create_record(None, b"data", &cfg, &FrozenClock).expect_err("unreachable target");
    assert!(matches!(
        err,
        Error::Exhausted {
            target_bits: 200,
            max_iterations: 1000
        }
    ));
}

#[test]
fn header_text_round_trip_survives_verification() {
    let record = create_record(Some("walrus.txt"), WALRUS.as_bytes(), &config(8, 9), &FrozenClock)
        .unwrap();
    let parsed = PowRecord::parse(&record.to_header()).unwrap();
    assert_eq!(parsed, record);
    assert!(verify(&parsed, WALRUS.as_bytes()).passed());
}

#[test]
fn text_tamper_of_leading_bits_fails_third_check() {
    let record =
        create_record(None, WALRUS.as_bytes(), &config(10, 4), &FrozenClock).unwrap();
    let tampered = record
        .to_header()
        .replace("Leading-zero-bits: ", "Leading-zero-bits: 99");
    let parsed = PowRecord::parse(&tampered).unwrap();
    assert!(parsed.leading_zero_bits > record.leading_zero_bits);

    let report = verify(&parsed, WALRUS.as_bytes());
    assert!(report.initial_hash.passed);
    assert!(report.hash.passed);
    assert!(!report.leading_zero_bits.passed);
    assert!(!report.passed());
}

#[test]
fn missing_hash_stops_before_reading_data() {
    let dir = scratch("missing");
    let header_path = dir.join("broken.pow");
    let record =
        create_record(None, WALRUS.as_bytes(), &config(4, 5), &FrozenClock).unwrap();
    let text: String = record
        .to_header()
        .lines()
        .filter(|line| !line.starts_with("Hash:"))
        .map(|line| format!("{line}\n"))
        .collect();
    fs::write(&header_path, text).unwrap();

    // the data path does not exist; a missing field must be reported first
    let err = verify_paths(&header_path, &dir.join("absent.txt")).expect_err("Hash missing");
    assert!(matches!(err, Error::MissingField("Hash")));

    let run = CheckRun::from_result(verify_paths(&header_path, &dir.join("absent.txt")), false)
        .unwrap();
    assert_eq!(run.lines(), vec!["ERROR: missing Hash in header", "fail"]);
    assert_eq!(run.exit_code, 1);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_files_are_io_errors() {
    let dir = scratch("io");
    let err = verify_paths(&dir.join("nope.pow"), &dir.join("nope.txt")).expect_err("no header");
    assert!(matches!(err, Error::Io { .. }));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn out_of_range_bits_fail_only_third_check() {
    let record =
        create_record(None, WALRUS.as_bytes(), &config(10, 6), &FrozenClock).unwrap();
    let header = record.to_header();
    let declared_line = format!("Leading-zero-bits: {}", record.leading_zero_bits);
    for declared in ["-1", "5000000000"] {
        let tampered = header.replace(&declared_line, &format!("Leading-zero-bits: {declared}"));
        let parsed = PowRecord::parse(&tampered).expect("any integer parses");
        let report = verify(&parsed, WALRUS.as_bytes());
        assert!(report.initial_hash.passed);
        assert!(report.hash.passed);
        assert!(!report.leading_zero_bits.passed);

        let run = CheckRun::from_result(Ok(report), false).unwrap();
        assert_eq!(run.exit_code, 0);
        let lines = run.lines();
        assert!(lines.contains(&format!(
            "ERROR: Leading-zero-bits value: {declared}, but hash has {} leading zero bits",
            record.leading_zero_bits
        )));
        assert_eq!(lines.last().map(String::as_str), Some("fail"));
    }
}
