use thiserror::Error;

use crate::config::Task;

pub type Result<T> = std::result::Result<T, Error>;

/// Every way building, running, training or restoring a network can fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("the model does not have any layers")]
    NoLayers,
    #[error("the first layer must be the input layer")]
    FirstLayerNotInput,
    #[error("the last layer must be the output layer")]
    LastLayerNotOutput,
    #[error("the model needs at least one layer besides the input layer")]
    NoComputingLayers,
    #[error("layer {0} must be a hidden layer")]
    MisplacedLayer(usize),
    #[error("the input layer does not need an activation function")]
    InputActivation,
    #[error("the input layer must have at least one input")]
    EmptyInput,
    #[error("layer {0} has no units")]
    EmptyLayer(usize),
    #[error("layer {0} does not declare an activation function")]
    MissingActivation(usize),
    #[error("unknown activation function `{0}`")]
    UnknownActivation(String),
    #[error(
        "layer {layer} has {got} inputs, but should have {expected} \
         because the previous layer has {expected} output units"
    )]
    LayerWidth {
        layer: usize,
        expected: usize,
        got: usize,
    },
    #[error("in {task}, `{activation}` cannot be used as output activation function")]
    TaskActivation { task: Task, activation: String },
    #[error("in binary classification the number of outputs must be 1, but is {0}")]
    BinaryOutputs(usize),
    #[error("hyperparameters.learningRate is not defined")]
    MissingLearningRate,
    #[error("the learning rate must be finite, got {0}")]
    InvalidLearningRate(f64),
    #[error("the number of epochs must be positive")]
    InvalidEpochs,
    #[error("the batch size must be positive")]
    ZeroBatchSize,
    #[error("batch size must be from 1 to {samples}, but got {batch_size}")]
    InvalidBatchSize { samples: usize, batch_size: usize },
    #[error("the training set is empty")]
    EmptyDataset,
    #[error("expected {expected} input(s), but got {got}")]
    BadInputs { expected: usize, got: usize },
    #[error("expected {expected} desired value(s), but got {got}")]
    BadOutputs { expected: usize, got: usize },
    #[error("the forward pass covers {got} layer(s), but the network has {expected}")]
    PassMismatch { expected: usize, got: usize },
    #[error("expected {expected} input(s), but sample {sample} has {got}")]
    SampleInputs {
        sample: usize,
        expected: usize,
        got: usize,
    },
    #[error("expected {expected} desired value(s), but sample {sample} has {got}")]
    SampleOutputs {
        sample: usize,
        expected: usize,
        got: usize,
    },
    #[error("in {task}, desired values must be 0 or 1, but sample {sample} has {value}")]
    NonBinaryTarget { task: Task, sample: usize, value: f64 },
    #[error("no parameters for unit {unit} of layer {layer}")]
    MissingParameters { layer: usize, unit: usize },
    #[error("no gradient for unit {unit} of layer {layer}")]
    MissingGradient { layer: usize, unit: usize },
    #[error("unit {unit} of layer {layer} has {expected} weights, but got {got}")]
    WeightCount {
        layer: usize,
        unit: usize,
        expected: usize,
        got: usize,
    },
    #[error("the saved model does not have a `layersData` property")]
    MissingLayersData,
    #[error("the saved model does not have any layers")]
    MissingFirstLayer,
    #[error("the saved model does not have `{0}`")]
    MissingSavedEntry(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
