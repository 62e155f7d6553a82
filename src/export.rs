//! Saving and restoring the parameters of a network.
//!
//! A saved network is a JSON object of the form
//!
//! ```json
//! {
//!   "layersData": {
//!     "layer0": { "unit0": { "weights": [0.1, 0.2], "bias": 0.3 }, ... },
//!     ...
//!   },
//!   "numberOfLayers": 2,
//!   "numberOfInputs": 2,
//!   "numberOfOutputs": 1
//! }
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::params::{UnitId, UnitParams};

/// The saved parameters of every unit, keyed by `layer<i>` then `unit<j>`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedModel {
    #[serde(alias = "layers_data")]
    pub layers_data: BTreeMap<String, BTreeMap<String, UnitParams>>,
    #[serde(default, alias = "number_of_layers")]
    pub number_of_layers: usize,
    #[serde(default, alias = "number_of_inputs")]
    pub number_of_inputs: usize,
    #[serde(default, alias = "number_of_outputs", alias = "amountOfEstimatives")]
    pub number_of_outputs: usize,
}

fn layer_key(layer: usize) -> String {
    format!("layer{}", layer)
}

fn unit_key(unit: usize) -> String {
    format!("unit{}", unit)
}

impl ExportedModel {
    /// Returns the saved parameters of a unit.
    pub fn unit(&self, id: UnitId) -> Result<&UnitParams> {
        let layer = self
            .layers_data
            .get(&layer_key(id.layer))
            .ok_or_else(|| Error::MissingSavedEntry(layer_key(id.layer)))?;
        layer.get(&unit_key(id.unit)).ok_or_else(|| {
            Error::MissingSavedEntry(format!("{}.{}", layer_key(id.layer), unit_key(id.unit)))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a saved network, rejecting documents without `layersData` or
    /// without a first layer.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let layers = value
            .get("layersData")
            .or_else(|| value.get("layers_data"))
            .ok_or(Error::MissingLayersData)?;
        if layers.get(layer_key(0)).is_none() {
            return Err(Error::MissingFirstLayer);
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl Network {
    /// Saves the weights and bias of every unit.
    pub fn export(&self) -> ExportedModel {
        let mut layers_data = BTreeMap::new();
        for (id, params) in self.params().iter() {
            layers_data
                .entry(layer_key(id.layer))
                .or_insert_with(BTreeMap::new)
                .insert(unit_key(id.unit), params.clone());
        }
        ExportedModel {
            layers_data,
            number_of_layers: self.layers().len(),
            number_of_inputs: self.input_len(),
            number_of_outputs: self.output_len(),
        }
    }

    /// Replaces the weights and bias of every unit with the saved ones.
    ///
    /// The whole model is checked against this network's shape first, so on
    /// error the network is left untouched.
    pub fn import(&mut self, saved: &ExportedModel) -> Result<()> {
        if !saved.layers_data.contains_key(&layer_key(0)) {
            return Err(Error::MissingFirstLayer);
        }
        for unit in self.units() {
            let params = saved.unit(unit.id())?;
            if params.weights.len() != unit.input_len() {
                return Err(Error::WeightCount {
                    layer: unit.id().layer,
                    unit: unit.id().unit,
                    expected: unit.input_len(),
                    got: params.weights.len(),
                });
            }
        }

        let ids: Vec<UnitId> = self.units().map(|unit| unit.id()).collect();
        for id in ids {
            let params = saved.unit(id)?;
            self.params_mut().set_weights(id, &params.weights)?;
            self.params_mut().set_bias(id, params.bias)?;
        }
        debug!("imported parameters of {} units", self.params().len());
        Ok(())
    }

    pub fn import_json(&mut self, json: &str) -> Result<()> {
        self.import(&ExportedModel::from_json(json)?)
    }
}
