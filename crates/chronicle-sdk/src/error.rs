use thiserror::Error;

use chronicle_diff::DiffError;
use chronicle_providers::ProviderError;
use chronicle_refs::RefError;
use chronicle_staging::StagingError;
use chronicle_store::StoreError;

/// Errors surfaced by the vault API.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ref(#[from] RefError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub type SdkResult<T> = Result<T, SdkError>;
