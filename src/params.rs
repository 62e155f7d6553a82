//! The parameter store: the single table holding every weight and bias.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Position of a unit in a network.
///
/// Layers are counted without the input layer, so layer 0 is the first hidden
/// layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId {
    pub layer: usize,
    pub unit: usize,
}

impl UnitId {
    pub fn new(layer: usize, unit: usize) -> Self {
        UnitId { layer, unit }
    }
}

/// The weights and bias of a single unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl UnitParams {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        UnitParams { weights, bias }
    }
}

/// Maps each unit to its parameters.
///
/// Once a unit has been inserted, the number of its weights never changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterStore {
    units: BTreeMap<UnitId, UnitParams>,
}

impl ParameterStore {
    pub fn new() -> Self {
        ParameterStore::default()
    }

    /// Adds a unit to the store, replacing it if it was already present.
    pub(crate) fn insert(&mut self, id: UnitId, params: UnitParams) {
        self.units.insert(id, params);
    }

    pub fn get(&self, id: UnitId) -> Result<&UnitParams> {
        self.units.get(&id).ok_or(Error::MissingParameters {
            layer: id.layer,
            unit: id.unit,
        })
    }

    pub fn weights(&self, id: UnitId) -> Result<&[f64]> {
        self.get(id).map(|params| &params.weights[..])
    }

    pub fn bias(&self, id: UnitId) -> Result<f64> {
        self.get(id).map(|params| params.bias)
    }

    /// Replaces the weights of a unit. The number of weights must not change.
    pub fn set_weights(&mut self, id: UnitId, weights: &[f64]) -> Result<()> {
        let params = self.get_mut(id)?;
        if params.weights.len() != weights.len() {
            return Err(Error::WeightCount {
                layer: id.layer,
                unit: id.unit,
                expected: params.weights.len(),
                got: weights.len(),
            });
        }
        params.weights.copy_from_slice(weights);
        Ok(())
    }

    pub fn set_bias(&mut self, id: UnitId, bias: f64) -> Result<()> {
        self.get_mut(id)?.bias = bias;
        Ok(())
    }

    /// Gives mutable access to a unit's parameters. The weights are exposed
    /// as a slice so their number stays fixed.
    pub fn params_mut(&mut self, id: UnitId) -> Result<(&mut [f64], &mut f64)> {
        let params = self.get_mut(id)?;
        Ok((&mut params.weights[..], &mut params.bias))
    }

    /// Iterates over all units in (layer, unit) order.
    pub fn iter(&self) -> btree_map::Iter<UnitId, UnitParams> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn get_mut(&mut self, id: UnitId) -> Result<&mut UnitParams> {
        self.units.get_mut(&id).ok_or(Error::MissingParameters {
            layer: id.layer,
            unit: id.unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ParameterStore {
        let mut store = ParameterStore::new();
        store.insert(UnitId::new(0, 0), UnitParams::new(vec![0.1, 0.2], 0.3));
        store.insert(UnitId::new(0, 1), UnitParams::new(vec![0.4, 0.5], 0.6));
        store.insert(UnitId::new(1, 0), UnitParams::new(vec![0.7, 0.8], 0.9));
        store
    }

    #[test]
    fn indexed_access() {
        let store = store();
        assert_eq!(store.weights(UnitId::new(0, 1)).unwrap(), &[0.4, 0.5]);
        assert_eq!(store.bias(UnitId::new(1, 0)).unwrap(), 0.9);
        assert!(matches!(
            store.get(UnitId::new(1, 1)),
            Err(Error::MissingParameters { layer: 1, unit: 1 })
        ));
    }

    #[test]
    fn writes() {
        let mut store = store();
        let id = UnitId::new(0, 0);
        store.set_weights(id, &[1.0, 2.0]).unwrap();
        store.set_bias(id, -1.0).unwrap();
        assert_eq!(store.get(id).unwrap(), &UnitParams::new(vec![1.0, 2.0], -1.0));

        let (weights, bias) = store.params_mut(id).unwrap();
        weights[1] = 3.0;
        *bias = 4.0;
        assert_eq!(store.get(id).unwrap(), &UnitParams::new(vec![1.0, 3.0], 4.0));
    }

    #[test]
    fn weight_count_is_fixed() {
        let mut store = store();
        assert!(matches!(
            store.set_weights(UnitId::new(0, 0), &[1.0]),
            Err(Error::WeightCount {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn iterates_in_order() {
        let ids: Vec<_> = store().iter().map(|(id, _)| *id).collect();
        assert_eq!(
            ids,
            vec![UnitId::new(0, 0), UnitId::new(0, 1), UnitId::new(1, 0)]
        );
    }
}
