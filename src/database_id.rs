//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a wallet.
pub type WalletId = DatabaseId;
/// The ID of a transaction.
pub type TransactionId = DatabaseId;
/// The ID of a category.
pub type CategoryId = DatabaseId;
/// The ID of a spending goal.
pub type GoalId = DatabaseId;
/// The ID of a savings objective.
pub type ObjectiveId = DatabaseId;
