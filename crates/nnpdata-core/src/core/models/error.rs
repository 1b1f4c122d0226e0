use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ModelError {
    #[error("Unexpected number of cell components: expected 9, found {found}")]
    MalformedCell { found: usize },

    #[error("Sample has no collective data attached")]
    MissingCollectiveData,

    #[error("Requested {requested} samples but the dataset only holds {available}")]
    SampleCountExceeded { requested: usize, available: usize },

    #[error("Sample index {index} is out of range for a dataset of {len} samples")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Dataset is empty")]
    EmptyDataSet,
}
