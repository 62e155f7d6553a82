//! Labelled training data.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// A desired value as written in a JSON data set.
#[derive(Deserialize)]
#[serde(untagged)]
enum Desired {
    Number(f64),
    Bool(bool),
}

impl From<Desired> for f64 {
    fn from(value: Desired) -> f64 {
        match value {
            Desired::Number(x) => x,
            Desired::Bool(true) => 1.0,
            Desired::Bool(false) => 0.0,
        }
    }
}

/// An ordered list of `(features, desired values)` pairs where every
/// feature vector has the same length, and so does every desired vector.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    samples: Vec<(Vec<f64>, Vec<f64>)>,
}

impl Dataset {
    pub fn new(samples: Vec<(Vec<f64>, Vec<f64>)>) -> Result<Self> {
        let (inputs, outputs) = match samples.first() {
            Some((features, desired)) => (features.len(), desired.len()),
            None => return Err(Error::EmptyDataset),
        };
        for (sample, (features, desired)) in samples.iter().enumerate() {
            if features.len() != inputs {
                return Err(Error::SampleInputs {
                    sample,
                    expected: inputs,
                    got: features.len(),
                });
            }
            if desired.len() != outputs {
                return Err(Error::SampleOutputs {
                    sample,
                    expected: outputs,
                    got: desired.len(),
                });
            }
        }
        Ok(Dataset { samples })
    }

    /// Parses `[[[features...], [desired...]], ...]`. Desired values may be
    /// numbers or booleans.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<(Vec<f64>, Vec<Desired>)> = serde_json::from_str(json)?;
        let samples = raw
            .into_iter()
            .map(|(features, desired)| (features, desired.into_iter().map(f64::from).collect()))
            .collect();
        Dataset::new(samples)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Dataset::from_json(&fs::read_to_string(path)?)
    }

    pub fn samples(&self) -> &[(Vec<f64>, Vec<f64>)] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<(Vec<f64>, Vec<f64>)> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the number of features of every sample.
    pub fn input_len(&self) -> usize {
        self.samples[0].0.len()
    }

    /// Returns the number of desired values of every sample.
    pub fn output_len(&self) -> usize {
        self.samples[0].1.len()
    }

    /// Returns true if every desired value is exactly 0 or 1.
    pub fn is_binary(&self) -> bool {
        self.samples
            .iter()
            .flat_map(|(_, desired)| desired)
            .all(|&y| y == 0.0 || y == 1.0)
    }
}
