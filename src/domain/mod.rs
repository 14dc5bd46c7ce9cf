pub mod amount;
pub mod budget;
pub mod category;
pub mod common;
pub mod prediction;
pub mod record;
pub mod savings;

pub use amount::{coerce_amount, coerce_planned, parse_amount, AmountInput};
pub use budget::BudgetSetting;
pub use category::{CategoryDefinition, CategoryKind};
pub use common::{
    days_in_month, Identifiable, Owned, OwnerId, Period,
};
pub use prediction::{FieldCatalog, FieldMap, PredictionRecord};
pub use record::{MonetaryRecord, RecordDraft, RecordKind, UNCATEGORIZED};
pub use savings::{SavingsSnapshot, SubBalance};
