//! Read operation errors

use thiserror::Error;

use crate::group::GroupError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Group(GroupError),
}

impl From<GroupError> for ReadError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::Store(e) => ReadError::Store(e),
            other => ReadError::Group(other),
        }
    }
}

impl ReadError {
    /// Caused by the request rather than a store
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReadError::Group(GroupError::UnknownDimension(_)))
    }
}

pub type ReadResult<T> = Result<T, ReadError>;
