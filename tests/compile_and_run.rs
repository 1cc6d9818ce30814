use heaan_circuit_bench::compiler::{
    CompilationConfiguration, CompilationError, CompiledCircuit, DType,
    RuntimeError, ScalarValue, Tracer, compile_function,
};
use std::cell::RefCell;
use std::ops::Sub;

fn x_minus_24<T: Sub<i64, Output = T>>(x: T) -> T {
    x - 24
}

fn uint(bits: u32) -> ScalarValue {
    ScalarValue::encrypted(DType::UnsignedInteger(bits))
}

fn seeded(seed: u64) -> CompilationConfiguration {
    CompilationConfiguration {
        seed: Some(seed),
        ..CompilationConfiguration::benchmark()
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[test]
fn x_minus_24_is_exact_on_every_benchmarked_input() {
    init_tracing();
    let mut circuit = compile_function(
        x_minus_24::<Tracer>,
        &[("x", uint(6))],
        24i64..64,
        &seeded(1),
    )
    .unwrap();

    for x in 40..=47 {
        assert_eq!(circuit.run(&[x]).unwrap(), x - 24);
    }
    assert_eq!(circuit.output_type(), uint(6));
    assert_eq!(circuit.output_bounds().min, 0);
    assert_eq!(circuit.output_bounds().max, 39);
}

#[test]
fn x_minus_24_is_exact_over_the_whole_declared_range() {
    let mut circuit = compile_function(
        x_minus_24::<Tracer>,
        &[("x", uint(6))],
        24i64..64,
        &seeded(2),
    )
    .unwrap();

    // Inputs below the inputset produce negative results, still exact.
    for x in 0..64 {
        assert_eq!(circuit.run(&[x]).unwrap(), x - 24);
    }
}

#[test]
fn linear_function_of_two_encrypted_inputs() {
    let mut circuit = compile_function(
        |x: Tracer, y: Tracer| (x * 3) - y + 5,
        &[("x", uint(4)), ("y", uint(4))],
        [(0i64, 0i64), (15, 0), (0, 15), (15, 15)],
        &seeded(3),
    )
    .unwrap();

    for (x, y) in [(0, 0), (1, 2), (7, 15), (15, 3)] {
        assert_eq!(circuit.run(&[x, y]).unwrap(), 3 * x - y + 5);
    }
    assert_eq!(circuit.output_type().dtype, DType::Integer(7));
}

#[test]
fn clear_parameter_can_multiply_encrypted_one() {
    let mut circuit = compile_function(
        |x: Tracer, k: Tracer| 10 - x * k,
        &[
            ("x", uint(3)),
            ("k", ScalarValue::clear(DType::UnsignedInteger(2))),
        ],
        [[0i64, 0], [7, 3], [3, 1]],
        &seeded(4),
    )
    .unwrap();

    assert_eq!(circuit.run(&[7, 3]).unwrap(), -11);
    assert_eq!(circuit.run(&[2, 0]).unwrap(), 10);
    assert_eq!(circuit.run(&[5, 2]).unwrap(), 0);
}

#[test]
fn dead_encrypted_product_is_ignored() {
    let mut circuit = compile_function(
        |x: Tracer| {
            let _unused = x.clone() * x.clone();
            -x
        },
        &[("x", uint(3))],
        0i64..8,
        &seeded(5),
    )
    .unwrap();
    assert_eq!(circuit.run(&[6]).unwrap(), -6);
}

#[test]
fn encrypted_by_encrypted_product_is_rejected() {
    let result = compile_function(
        |x: Tracer, y: Tracer| x * y,
        &[("x", uint(3)), ("y", uint(3))],
        [(1i64, 2i64)],
        &seeded(6),
    );
    assert!(matches!(
        result,
        Err(CompilationError::EncryptedMultiplication { node: 2 })
    ));
}

#[test]
fn arity_mismatch_is_rejected() {
    let result = compile_function(
        x_minus_24::<Tracer>,
        &[("x", uint(6)), ("y", uint(6))],
        [(30i64, 30i64)],
        &seeded(7),
    );
    assert!(matches!(
        result,
        Err(CompilationError::ArityMismatch {
            expected: 1,
            got: 2
        })
    ));
}

#[test]
fn empty_inputset_is_rejected() {
    let result = compile_function(
        x_minus_24::<Tracer>,
        &[("x", uint(6))],
        Vec::<i64>::new(),
        &seeded(8),
    );
    assert!(matches!(result, Err(CompilationError::EmptyInputset)));
}

#[test]
fn out_of_range_inputset_is_an_error_under_benchmark_settings() {
    let result = compile_function(
        x_minus_24::<Tracer>,
        &[("x", uint(6))],
        24i64..=64,
        &seeded(9),
    );
    assert!(matches!(
        result,
        Err(CompilationError::InputsetValueOutOfRange {
            index: 40,
            value: 64,
            ..
        })
    ));
}

#[test]
fn only_first_sample_is_checked_by_default() {
    let lenient = CompilationConfiguration {
        treat_warnings_as_errors: true,
        seed: Some(10),
        ..CompilationConfiguration::default()
    };
    // The out-of-range value is not the first sample, so it is not checked.
    assert!(
        compile_function(x_minus_24::<Tracer>, &[("x", uint(6))], [30i64, 64], &lenient)
            .is_ok()
    );

    let warn_only = CompilationConfiguration {
        check_every_input_in_inputset: true,
        seed: Some(10),
        ..CompilationConfiguration::default()
    };
    assert!(
        compile_function(x_minus_24::<Tracer>, &[("x", uint(6))], [30i64, 64], &warn_only)
            .is_ok()
    );
}

#[test]
fn clear_output_is_rejected() {
    let result = compile_function(
        |_x: Tracer, k: Tracer| k + 1,
        &[
            ("x", uint(3)),
            ("k", ScalarValue::clear(DType::UnsignedInteger(3))),
        ],
        [(1i64, 1i64)],
        &seeded(11),
    );
    assert!(matches!(result, Err(CompilationError::ClearOutput)));
}

#[test]
fn bit_width_limit_is_enforced() {
    let result = compile_function(
        |x: Tracer| x * 4,
        &[("x", uint(6))],
        0i64..64,
        &seeded(12),
    );
    assert!(matches!(
        result,
        Err(CompilationError::BitWidthExceeded {
            bits: 8,
            max: 7,
            ..
        })
    ));
}

#[test]
fn precision_budget_is_enforced() {
    let config = CompilationConfiguration {
        scale_bits: 56,
        max_bit_width: 16,
        ..seeded(13)
    };
    let result =
        compile_function(|x: Tracer| x + 1, &[("x", uint(8))], 0i64..256, &config);
    assert!(matches!(
        result,
        Err(CompilationError::PrecisionBudgetExceeded { max_abs: 256, .. })
    ));
}

#[test]
fn invalid_parameter_type_is_rejected() {
    let result = compile_function(
        x_minus_24::<Tracer>,
        &[("x", uint(0))],
        [0i64],
        &seeded(14),
    );
    assert!(matches!(
        result,
        Err(CompilationError::InvalidParameterType { .. })
    ));
}

#[test]
fn runtime_arguments_are_validated() {
    let mut circuit = compile_function(
        x_minus_24::<Tracer>,
        &[("x", uint(6))],
        24i64..64,
        &seeded(15),
    )
    .unwrap();

    assert!(matches!(
        circuit.run(&[64]),
        Err(RuntimeError::ArgumentOutOfRange { value: 64, .. })
    ));
    assert!(matches!(
        circuit.run(&[]),
        Err(RuntimeError::ArgumentCount {
            expected: 1,
            got: 0
        })
    ));
}

#[test]
fn larger_ring_degree() {
    let mut circuit = CompiledCircuit::<64>::compile(
        x_minus_24::<Tracer>,
        &[("x", uint(6))],
        24i64..64,
        &seeded(16),
    )
    .unwrap();
    assert_eq!(circuit.run(&[45]).unwrap(), 21);
}

#[test]
fn unseeded_compilation_still_decrypts() {
    let mut circuit = compile_function(
        x_minus_24::<Tracer>,
        &[("x", uint(6))],
        24i64..64,
        &CompilationConfiguration::benchmark(),
    )
    .unwrap();
    assert_eq!(circuit.run(&[40]).unwrap(), 16);
}

#[test]
fn scale_too_small_for_noise_is_rejected() {
    let config = CompilationConfiguration {
        scale_bits: 2,
        ..seeded(17)
    };
    let result = compile_function(x_minus_24::<Tracer>, &[("x", uint(6))], 24i64..64, &config);
    assert!(matches!(
        result,
        Err(CompilationError::ScaleBelowNoise { scale_bits: 2, .. })
    ));

    // The smallest scale that passes still decrypts exactly.
    let passing = (1..=30)
        .map(|scale_bits| CompilationConfiguration {
            scale_bits,
            ..seeded(17)
        })
        .find_map(|config| {
            compile_function(x_minus_24::<Tracer>, &[("x", uint(6))], 24i64..64, &config)
                .ok()
        });
    let mut circuit = passing.unwrap();
    for x in 40..=47 {
        assert_eq!(circuit.run(&[x]).unwrap(), x - 24);
    }
}

#[test]
fn tracer_from_an_earlier_compilation_is_rejected() {
    let stash: RefCell<Option<Tracer>> = RefCell::new(None);
    compile_function(
        |x: Tracer| {
            stash.replace(Some(x.clone()));
            x - 24
        },
        &[("x", uint(6))],
        24i64..64,
        &seeded(18),
    )
    .unwrap();
    let leaked = stash.borrow().clone().unwrap();

    let result = compile_function(
        move |x: Tracer| x + leaked.clone(),
        &[("x", uint(6))],
        24i64..64,
        &seeded(19),
    );
    assert!(matches!(result, Err(CompilationError::ForeignOutput)));
}
