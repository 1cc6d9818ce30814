use super::bounds::{Bounds, measure_bounds};
use super::config::CompilationConfiguration;
use super::errors::{CompilationError, RuntimeError};
use super::graph::{EvaluationError, NodeId, OpGraph, Operation};
use super::tracer::{CircuitFunction, trace};
use super::values::ScalarValue;
use super::Sample;
use crate::crypto::{Ciphertext, CkksEngine};
use crate::keys::{PublicKey, SecretKey};
use crate::rings::{BackendType, NaivePolyRing};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

type Poly<const DEGREE: usize> = NaivePolyRing<DEGREE>;
type Engine<const DEGREE: usize> = CkksEngine<Poly<DEGREE>, DEGREE>;

enum Value<const DEGREE: usize> {
    Clear(i64),
    Encrypted(Ciphertext<Poly<DEGREE>, DEGREE>),
}

/// A traced function bound to freshly generated keys.
pub struct CompiledCircuit<const DEGREE: usize> {
    graph: OpGraph,
    parameters: Vec<(String, ScalarValue)>,
    bounds: Vec<Bounds>,
    live: Vec<bool>,
    engine: Engine<DEGREE>,
    secret_key: SecretKey<Poly<DEGREE>, DEGREE>,
    public_key: PublicKey<Poly<DEGREE>, DEGREE>,
    rng: ChaCha20Rng,
}

impl<const DEGREE: usize> CompiledCircuit<DEGREE> {
    /// Traces `function`, checks it against the declared parameter types
    /// and the inputset, and generates keys.
    pub fn compile<F, Args, I, S>(
        function: F,
        parameters: &[(&str, ScalarValue)],
        inputset: I,
        configuration: &CompilationConfiguration,
    ) -> Result<Self, CompilationError>
    where
        F: CircuitFunction<Args>,
        I: IntoIterator<Item = S>,
        S: Into<Sample>,
    {
        if F::ARITY != parameters.len() {
            return Err(CompilationError::ArityMismatch {
                expected: F::ARITY,
                got: parameters.len(),
            });
        }
        for (name, value) in parameters {
            if !value.dtype.is_valid() {
                return Err(CompilationError::InvalidParameterType {
                    name: name.to_string(),
                    dtype: value.dtype,
                });
            }
        }

        let graph =
            trace(&function, parameters.len()).ok_or(CompilationError::ForeignOutput)?;
        debug!("traced graph:\n{graph}");

        let samples: Vec<Sample> = inputset.into_iter().map(Into::into).collect();
        if samples.is_empty() {
            return Err(CompilationError::EmptyInputset);
        }
        check_inputset(&samples, parameters, configuration)?;

        let encrypted_inputs: Vec<bool> =
            parameters.iter().map(|(_, v)| v.is_encrypted).collect();
        let encrypted = graph.tainted_by(&encrypted_inputs);
        let live = graph.live_nodes();
        if !encrypted[graph.output()] {
            return Err(CompilationError::ClearOutput);
        }
        for (node, op) in graph.nodes().iter().enumerate() {
            if let Operation::Mul(a, b) = *op {
                if live[node] && encrypted[a] && encrypted[b] {
                    return Err(CompilationError::EncryptedMultiplication { node });
                }
            }
        }

        let bounds = measure_bounds(&graph, samples.iter().map(|s| s.0.as_slice()))?
            .ok_or(CompilationError::EmptyInputset)?;

        let encrypted_live = (0..graph.nodes().len()).filter(|&n| live[n] && encrypted[n]);
        let mut max_abs = 0u64;
        for node in encrypted_live {
            let bits = bounds[node].dtype().bit_width();
            debug!(node, %bits, bounds = ?bounds[node], "measured bounds");
            if bits > configuration.max_bit_width {
                return Err(CompilationError::BitWidthExceeded {
                    node,
                    bits,
                    max: configuration.max_bit_width,
                });
            }
            max_abs = max_abs.max(bounds[node].max_abs());
        }
        check_precision_budget(max_abs, configuration)?;
        check_noise_budget::<DEGREE>(
            &graph,
            &live,
            &encrypted,
            &bounds,
            configuration,
        )?;

        let mut builder = Engine::<DEGREE>::builder()
            .backend(BackendType::Naive(configuration.modulus))
            .error_variance(configuration.error_variance)
            .scale_bits(configuration.scale_bits);
        if let Some(weight) = configuration.hamming_weight {
            builder = builder.hamming_weight(weight);
        }
        let engine = builder.build()?;

        let mut rng = match configuration.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_rng(&mut rand::rng()),
        };
        let secret_key = engine.generate_secret_key(&mut rng)?;
        let public_key = engine.generate_public_key(&secret_key, &mut rng)?;

        let circuit = Self {
            parameters: parameters
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
            graph,
            bounds,
            live,
            engine,
            secret_key,
            public_key,
            rng,
        };
        info!(
            degree = DEGREE,
            nodes = circuit.graph.nodes().len(),
            output = %circuit.output_type(),
            "compiled circuit"
        );
        Ok(circuit)
    }

    pub fn graph(&self) -> &OpGraph {
        &self.graph
    }

    pub fn parameters(&self) -> &[(String, ScalarValue)] {
        &self.parameters
    }

    /// Bounds of a node measured over the inputset.
    pub fn bounds(&self, node: NodeId) -> Option<Bounds> {
        self.bounds.get(node).copied()
    }

    pub fn output_bounds(&self) -> Bounds {
        self.bounds[self.graph.output()]
    }

    /// Encrypted output type derived from the inputset bounds.
    pub fn output_type(&self) -> ScalarValue {
        ScalarValue::encrypted(self.output_bounds().dtype())
    }

    /// Encrypts the encrypted arguments, evaluates the circuit
    /// homomorphically and returns the decrypted result.
    pub fn run(&mut self, args: &[i64]) -> Result<i64, RuntimeError> {
        if args.len() != self.parameters.len() {
            return Err(RuntimeError::ArgumentCount {
                expected: self.parameters.len(),
                got: args.len(),
            });
        }
        for ((name, value), &arg) in self.parameters.iter().zip(args) {
            if !value.dtype.can_represent(arg) {
                return Err(RuntimeError::ArgumentOutOfRange {
                    parameter: name.clone(),
                    value: arg,
                    dtype: value.dtype,
                });
            }
        }

        let mut values: Vec<Option<Value<DEGREE>>> =
            Vec::with_capacity(self.graph.nodes().len());
        for node in 0..self.graph.nodes().len() {
            if !self.live[node] {
                values.push(None);
                continue;
            }
            let op = self.graph.nodes()[node];
            let value = self.evaluate_node(node, op, args, &values)?;
            values.push(Some(value));
        }

        let result = match values.swap_remove(self.graph.output()) {
            Some(Value::Clear(value)) => value,
            Some(Value::Encrypted(ct)) => {
                let plaintext = Engine::<DEGREE>::decrypt(&ct, &self.secret_key);
                let decoded = self.engine.decode(&plaintext)?[0];
                if !decoded.is_finite() {
                    return Err(RuntimeError::NonFiniteResult(decoded));
                }
                decoded.round() as i64
            }
            None => unreachable!("output node is always live"),
        };
        debug!(?args, result, "evaluated circuit");
        Ok(result)
    }

    fn evaluate_node(
        &mut self,
        node: NodeId,
        op: Operation,
        args: &[i64],
        values: &[Option<Value<DEGREE>>],
    ) -> Result<Value<DEGREE>, RuntimeError> {
        use Value::{Clear, Encrypted};

        let get = |id: NodeId| values[id].as_ref().expect("operands precede users");
        let overflow = EvaluationError::Overflow { node };

        Ok(match op {
            Operation::Input { index } => {
                if self.parameters[index].1.is_encrypted {
                    let plaintext = self.engine.encode(&[args[index] as f64])?;
                    Encrypted(self.engine.encrypt(
                        &plaintext,
                        &self.public_key,
                        &mut self.rng,
                    )?)
                } else {
                    Clear(args[index])
                }
            }
            Operation::Constant(c) => Clear(c),
            Operation::Add(a, b) => match (get(a), get(b)) {
                (Clear(x), Clear(y)) => Clear(x.checked_add(*y).ok_or(overflow)?),
                (Encrypted(ct), Clear(c)) | (Clear(c), Encrypted(ct)) => {
                    Encrypted(Engine::<DEGREE>::add_plain(ct, &self.engine.encode(&[*c as f64])?)?)
                }
                (Encrypted(x), Encrypted(y)) => Encrypted(Engine::<DEGREE>::add(x, y)?),
            },
            Operation::Sub(a, b) => match (get(a), get(b)) {
                (Clear(x), Clear(y)) => Clear(x.checked_sub(*y).ok_or(overflow)?),
                (Encrypted(ct), Clear(c)) => {
                    Encrypted(Engine::<DEGREE>::sub_plain(ct, &self.engine.encode(&[*c as f64])?)?)
                }
                (Clear(c), Encrypted(ct)) => Encrypted(Engine::<DEGREE>::add_plain(
                    &Engine::<DEGREE>::neg(ct),
                    &self.engine.encode(&[*c as f64])?,
                )?),
                (Encrypted(x), Encrypted(y)) => Encrypted(Engine::<DEGREE>::sub(x, y)?),
            },
            Operation::Mul(a, b) => match (get(a), get(b)) {
                (Clear(x), Clear(y)) => Clear(x.checked_mul(*y).ok_or(overflow)?),
                (Encrypted(ct), Clear(c)) | (Clear(c), Encrypted(ct)) => {
                    Encrypted(Engine::<DEGREE>::mul_integer(ct, *c))
                }
                (Encrypted(_), Encrypted(_)) => {
                    unreachable!("encrypted products are rejected at compile time")
                }
            },
            Operation::Neg(a) => match get(a) {
                Clear(x) => Clear(x.checked_neg().ok_or(overflow)?),
                Encrypted(ct) => Encrypted(Engine::<DEGREE>::neg(ct)),
            },
        })
    }
}

fn check_inputset(
    samples: &[Sample],
    parameters: &[(&str, ScalarValue)],
    configuration: &CompilationConfiguration,
) -> Result<(), CompilationError> {
    for (index, sample) in samples.iter().enumerate() {
        if sample.0.len() != parameters.len() {
            return Err(CompilationError::InputsetArity {
                index,
                expected: parameters.len(),
                got: sample.0.len(),
            });
        }
    }

    let checked = if configuration.check_every_input_in_inputset {
        samples.len()
    } else {
        1
    };
    for (index, sample) in samples.iter().take(checked).enumerate() {
        for ((name, value), &x) in parameters.iter().zip(&sample.0) {
            if value.dtype.can_represent(x) {
                continue;
            }
            let error = CompilationError::InputsetValueOutOfRange {
                index,
                parameter: name.to_string(),
                value: x,
                dtype: value.dtype,
            };
            if configuration.treat_warnings_as_errors {
                return Err(error);
            }
            warn!("{error}");
        }
    }
    Ok(())
}

fn check_precision_budget(
    max_abs: u64,
    configuration: &CompilationConfiguration,
) -> Result<(), CompilationError> {
    let exceeded = || CompilationError::PrecisionBudgetExceeded {
        max_abs,
        scale_bits: configuration.scale_bits,
        modulus: configuration.modulus,
    };
    // Scaled values need two bits of headroom below q for sign and noise.
    let headroom = 1u128
        .checked_shl(configuration.scale_bits + 2)
        .ok_or_else(exceeded)?;
    let scaled = (max_abs as u128 + 1)
        .checked_mul(headroom)
        .ok_or_else(exceeded)?;
    if scaled >= configuration.modulus as u128 {
        return Err(exceeded());
    }
    Ok(())
}

/// Tail bound on the coefficients of `e * u + e0 + e1 * s` for a fresh
/// ciphertext, plus one unit of encoding rounding.
fn fresh_noise<const DEGREE: usize>(configuration: &CompilationConfiguration) -> f64 {
    let weight = configuration.hamming_weight.unwrap_or(DEGREE / 2) as f64;
    6.0 * configuration.error_variance.sqrt() * (2.0 * weight + 1.0) + 1.0
}

/// Propagates a coefficient noise bound through the live encrypted nodes.
fn output_noise<const DEGREE: usize>(
    graph: &OpGraph,
    live: &[bool],
    encrypted: &[bool],
    bounds: &[Bounds],
    configuration: &CompilationConfiguration,
) -> f64 {
    let fresh = fresh_noise::<DEGREE>(configuration);
    let mut noise = vec![0.0f64; graph.nodes().len()];
    for (node, op) in graph.nodes().iter().enumerate() {
        if !(live[node] && encrypted[node]) {
            continue;
        }
        noise[node] = match *op {
            Operation::Input { .. } => fresh,
            Operation::Constant(_) => 0.0,
            // a clear operand contributes the rounding of its encoding
            Operation::Add(a, b) | Operation::Sub(a, b) => {
                match (encrypted[a], encrypted[b]) {
                    (true, true) => noise[a] + noise[b],
                    _ => noise[a] + noise[b] + 0.5,
                }
            }
            Operation::Mul(a, b) => {
                if encrypted[a] {
                    noise[a] * bounds[b].max_abs() as f64
                } else {
                    noise[b] * bounds[a].max_abs() as f64
                }
            }
            Operation::Neg(a) => noise[a],
        };
    }
    noise[graph.output()]
}

fn check_noise_budget<const DEGREE: usize>(
    graph: &OpGraph,
    live: &[bool],
    encrypted: &[bool],
    bounds: &[Bounds],
    configuration: &CompilationConfiguration,
) -> Result<(), CompilationError> {
    let noise = output_noise::<DEGREE>(graph, live, encrypted, bounds, configuration);
    // Decoding sums DEGREE coefficients per slot; the slot error must stay
    // below half a unit after dividing by the scale.
    let slot_error = DEGREE as f64 * noise;
    let half_scale = 2f64.powi(configuration.scale_bits as i32 - 1);
    debug!(noise, slot_error, half_scale, "estimated decryption noise");
    if slot_error.is_finite() && slot_error >= half_scale {
        return Err(CompilationError::ScaleBelowNoise {
            scale_bits: configuration.scale_bits,
            noise: slot_error,
        });
    }
    Ok(())
}
