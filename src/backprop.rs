//! Backpropagation of the squared error through a `Network`.

use crate::error::{Error, Result};
use crate::feed_forward::{ForwardPass, Network};
use crate::gradient::GradientStore;
use crate::layer::Layer;

/// Computes the gradient of every unit for one sample.
///
/// `pass` must be the result of `network.evaluate` on the sample whose
/// desired outputs are `desired`; a pass recorded by a network of another
/// shape is rejected. The output layer is derived first, then
/// every hidden layer in decreasing order, since a hidden unit's derivative
/// is built from the derivatives of the layer it feeds.
pub fn backpropagate(
    network: &Network,
    pass: &ForwardPass,
    desired: &[f64],
) -> Result<GradientStore> {
    if desired.len() != network.output_len() {
        return Err(Error::BadOutputs {
            expected: network.output_len(),
            got: desired.len(),
        });
    }
    if pass.len() != network.layers().len() {
        return Err(Error::PassMismatch {
            expected: network.layers().len(),
            got: pass.len(),
        });
    }

    let mut gradients = GradientStore::for_sample();
    for layer in network.layers().iter().rev() {
        match network.next_layer(layer) {
            None => output_derivatives(layer, pass, desired, &mut gradients)?,
            Some(next) => {
                hidden_derivatives(network, layer, next, pass, &mut gradients)?
            }
        }
    }
    Ok(gradients)
}

/// `(estimated - desired) * g'(estimated)` for every output unit.
fn output_derivatives(
    layer: &Layer,
    pass: &ForwardPass,
    desired: &[f64],
    gradients: &mut GradientStore,
) -> Result<()> {
    let (inputs, outputs) = recorded(pass, layer)?;
    let targets = outputs.iter().zip(desired);
    for (unit, (&estimated, &expected)) in layer.units().iter().zip(targets) {
        let derivative =
            (estimated - expected) * layer.activator().fprime(estimated);
        gradients.store_gradient_of(unit.id(), derivative, inputs);
    }
    Ok(())
}

/// Sums the derivatives of `next` weighted by the connection to each unit of
/// `layer`, then scales by the unit's own activation derivative.
fn hidden_derivatives(
    network: &Network,
    layer: &Layer,
    next: &Layer,
    pass: &ForwardPass,
    gradients: &mut GradientStore,
) -> Result<()> {
    let params = network.params();
    let (inputs, outputs) = recorded(pass, layer)?;
    for (position, (unit, &output)) in
        layer.units().iter().zip(outputs).enumerate()
    {
        let mut accumulated = 0.0;
        for n in next.units() {
            accumulated += params.weights(n.id())?[position]
                * gradients.unit_derivative(n.id())?;
        }
        let derivative = accumulated * layer.activator().fprime(output);
        gradients.store_gradient_of(unit.id(), derivative, inputs);
    }
    Ok(())
}

/// Returns the inputs and outputs `pass` recorded for `layer`, checking
/// their widths against the layer.
fn recorded<'a>(
    pass: &'a ForwardPass,
    layer: &Layer,
) -> Result<(&'a [f64], &'a [f64])> {
    let index = layer.index();
    let mismatch = || Error::PassMismatch {
        expected: index + 1,
        got: pass.len(),
    };
    let inputs = pass.inputs_of_layer(index).ok_or_else(mismatch)?;
    let outputs = pass.outputs_of_layer(index).ok_or_else(mismatch)?;
    if inputs.len() != layer.input_len() {
        return Err(Error::BadInputs {
            expected: layer.input_len(),
            got: inputs.len(),
        });
    }
    if outputs.len() != layer.output_len() {
        return Err(Error::BadOutputs {
            expected: layer.output_len(),
            got: outputs.len(),
        });
    }
    Ok((inputs, outputs))
}
