//! Registered benchmark targets.
use super::{BenchError, Benchmark, BenchmarkReport, Comparison};
use crate::compiler::{
    CompilationConfiguration, DType, ScalarValue, Tracer, compile_function,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::ops::Sub;
use tracing::debug;

pub const COMPILATION_TIME: &str = "Compilation Time (ms)";
pub const EVALUATION_TIME: &str = "Evaluation Time (ms)";
pub const ACCURACY: &str = "Accuracy (%)";

#[derive(Debug, Clone)]
pub struct TargetOptions {
    /// Number of encrypted evaluations.
    pub samples: usize,
    /// Seed for sample generation.
    pub seed: Option<u64>,
    pub configuration: CompilationConfiguration,
}

impl Default for TargetOptions {
    fn default() -> Self {
        Self {
            samples: 4,
            seed: None,
            configuration: CompilationConfiguration::benchmark(),
        }
    }
}

impl TargetOptions {
    fn rng(&self) -> ChaCha20Rng {
        match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_rng(&mut rand::rng()),
        }
    }
}

pub struct Target {
    pub name: &'static str,
    pub description: &'static str,
    pub run: fn(&TargetOptions) -> Result<BenchmarkReport, BenchError>,
}

static TARGETS: &[Target] = &[Target {
    name: "x_minus_24",
    description: "Unit Target: x - 24",
    run: x_minus_24,
}];

pub fn targets() -> &'static [Target] {
    TARGETS
}

pub fn find_target(name: &str) -> Option<&'static Target> {
    TARGETS.iter().find(|t| t.name == name)
}

fn function_to_compile<T: Sub<i64, Output = T>>(x: T) -> T {
    x - 24
}

/// Compiles `x - 24` for a 6-bit encrypted `x` and checks encrypted
/// results for random `x` in `[40, 47]`.
pub fn x_minus_24(options: &TargetOptions) -> Result<BenchmarkReport, BenchError> {
    if options.samples == 0 {
        return Err(BenchError::InvalidOptions(
            "at least one sample is required".into(),
        ));
    }
    let mut bench = Benchmark::new("Unit Target: x - 24");

    let x = ScalarValue::encrypted(DType::UnsignedInteger(6));
    let mut engine = bench.measure(COMPILATION_TIME, || {
        compile_function(
            function_to_compile::<Tracer>,
            &[("x", x)],
            24i64..(1 << 6),
            &options.configuration,
        )
    })?;

    let mut rng = options.rng();
    let mut inputs = Vec::with_capacity(options.samples);
    let mut labels = Vec::with_capacity(options.samples);
    for _ in 0..options.samples {
        let sample_x: i64 = rng.random_range(40..=40 + (1 << 3) - 1);
        inputs.push([sample_x]);
        labels.push(function_to_compile(sample_x));
    }

    let mut correct = 0usize;
    for (input, label) in inputs.iter().zip(&labels) {
        let result = bench.measure(EVALUATION_TIME, || engine.run(input))?;
        debug!(?input, result, label, "evaluated sample");
        if result == *label {
            correct += 1;
        }
    }

    bench.record(ACCURACY, correct as f64 / inputs.len() as f64 * 100.0);
    bench.alert(ACCURACY, Comparison::NotEqual, 100.0);
    bench.finish()
}
