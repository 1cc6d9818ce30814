use heaan_circuit_bench::bench::targets::{ACCURACY, COMPILATION_TIME, EVALUATION_TIME};
use heaan_circuit_bench::bench::{BenchError, TargetOptions, find_target};
use heaan_circuit_bench::compiler::{CompilationConfiguration, CompilationError};
use std::io::Write;

#[test]
fn x_minus_24_target_is_fully_accurate() {
    let options = TargetOptions {
        seed: Some(7),
        configuration: CompilationConfiguration {
            seed: Some(7),
            ..CompilationConfiguration::benchmark()
        },
        ..TargetOptions::default()
    };
    let target = find_target("x_minus_24").unwrap();
    let report = (target.run)(&options).unwrap();

    assert_eq!(report.name, "Unit Target: x - 24");
    assert_eq!(report.metric(ACCURACY), Some(100.0));
    assert!(report.metric(COMPILATION_TIME).unwrap() >= 0.0);

    let evaluation = report
        .measurements
        .iter()
        .find(|m| m.name == EVALUATION_TIME)
        .unwrap();
    assert_eq!(evaluation.samples, 4);
    assert!(evaluation.min <= evaluation.max);

    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].metric, ACCURACY);
    assert_eq!(report.triggered_alerts().count(), 0);
}

#[test]
fn sample_count_is_configurable() {
    let options = TargetOptions {
        samples: 9,
        seed: Some(1),
        ..TargetOptions::default()
    };
    let report = (find_target("x_minus_24").unwrap().run)(&options).unwrap();
    let evaluation = report
        .measurements
        .iter()
        .find(|m| m.name == EVALUATION_TIME)
        .unwrap();
    assert_eq!(evaluation.samples, 9);
    assert_eq!(report.metric(ACCURACY), Some(100.0));
}

#[test]
fn report_serializes_to_json() {
    let options = TargetOptions {
        samples: 2,
        seed: Some(3),
        ..TargetOptions::default()
    };
    let report = (find_target("x_minus_24").unwrap().run)(&options).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["name"], "Unit Target: x - 24");
    assert_eq!(json["alerts"][0]["comparison"], "!=");
    assert_eq!(json["alerts"][0]["triggered"], false);
    let names: Vec<&str> = json["measurements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&COMPILATION_TIME));
    assert!(names.contains(&EVALUATION_TIME));
    assert!(names.contains(&ACCURACY));
}

#[test]
fn configuration_file_round_trip() {
    let configuration = CompilationConfiguration {
        hamming_weight: Some(4),
        seed: Some(11),
        ..CompilationConfiguration::benchmark()
    };
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(toml::to_string(&configuration).unwrap().as_bytes())
        .unwrap();

    let loaded = CompilationConfiguration::load(file.path()).unwrap();
    assert_eq!(loaded, configuration);

    let options = TargetOptions {
        seed: Some(11),
        configuration: loaded,
        ..TargetOptions::default()
    };
    let report = (find_target("x_minus_24").unwrap().run)(&options).unwrap();
    assert_eq!(report.metric(ACCURACY), Some(100.0));
}

#[test]
fn overly_tight_bit_width_fails_compilation() {
    let options = TargetOptions {
        seed: Some(5),
        configuration: CompilationConfiguration {
            max_bit_width: 5,
            ..CompilationConfiguration::benchmark()
        },
        ..TargetOptions::default()
    };
    let result = (find_target("x_minus_24").unwrap().run)(&options);
    assert!(matches!(
        result,
        Err(BenchError::Compilation(CompilationError::BitWidthExceeded { bits: 6, .. }))
    ));
}

#[test]
fn bundled_configuration_matches_benchmark_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/benchmark.toml");
    let loaded = CompilationConfiguration::load(path).unwrap();
    assert_eq!(loaded, CompilationConfiguration::benchmark());
}
