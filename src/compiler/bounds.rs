//! Value ranges measured by evaluating the graph over an inputset.
use super::graph::{EvaluationError, OpGraph};
use super::values::DType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    pub fn new(value: i64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn include(&mut self, value: i64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn dtype(&self) -> DType {
        DType::fitting(self.min, self.max)
    }

    pub fn max_abs(&self) -> u64 {
        self.min.unsigned_abs().max(self.max.unsigned_abs())
    }
}

/// Per-node bounds over every sample. Returns `Ok(None)` for an empty
/// inputset.
pub fn measure_bounds<'a, I>(
    graph: &OpGraph,
    samples: I,
) -> Result<Option<Vec<Bounds>>, EvaluationError>
where
    I: IntoIterator<Item = &'a [i64]>,
{
    let mut bounds: Option<Vec<Bounds>> = None;
    for sample in samples {
        let values = graph.evaluate(sample)?;
        match bounds.as_mut() {
            None => bounds = Some(values.into_iter().map(Bounds::new).collect()),
            Some(bounds) => {
                for (b, v) in bounds.iter_mut().zip(values) {
                    b.include(v);
                }
            }
        }
    }
    Ok(bounds)
}
