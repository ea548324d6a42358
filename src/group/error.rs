//! Group expansion errors

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum GroupError {
    /// Requested dimension is not one of `region`, `fuel`, `technology`
    #[error("Unknown grouping: {0}")]
    UnknownDimension(String),

    /// Dimension values containing the label separator made two
    /// combinations share a label
    #[error("Grouping label is not unique: {0}")]
    DuplicateLabel(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type GroupResult<T> = Result<T, GroupError>;
