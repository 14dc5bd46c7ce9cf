pub mod budget_service;
pub mod category_service;
pub mod prediction_service;
pub mod record_service;
pub mod savings_service;
pub mod summary_service;

pub use budget_service::BudgetService;
pub use category_service::CategoryService;
pub use prediction_service::{FieldSide, PredictionService};
pub use record_service::RecordService;
pub use savings_service::SavingsService;
pub use summary_service::{ProjectionReport, SummaryService};

use crate::errors::FinanceError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error("{0}")]
    Invalid(String),
}

impl ServiceError {
    /// Surfaces input errors as rejections with their reason; everything else passes
    /// through unchanged.
    pub(crate) fn rejected(err: FinanceError) -> Self {
        match err {
            FinanceError::InvalidInput(reason) => ServiceError::Invalid(reason),
            other => ServiceError::Finance(other),
        }
    }
}
