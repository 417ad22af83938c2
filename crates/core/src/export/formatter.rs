//! CSV rendering of operation listings.

use chrono_tz::Tz;

use tally_shared::types::{AccountId, CategoryId, CustomFieldId};

use super::error::ExportError;
use crate::ledger::Account;
use crate::operation::{CustomFieldDef, Operation, OperationCategory};

/// One exportable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportColumn {
    /// Operation id, rendered under a `#` header.
    Id,
    /// Free-form description.
    Description,
    /// Account name.
    Account,
    /// Category name.
    Category,
    /// Amount magnitude, fixed to two decimals.
    Amount,
    /// Account currency tag.
    Currency,
    /// Operation instant in the viewer's timezone.
    OperationDate,
    /// Collapsed approval flag as `1`/`0`.
    Approved,
    /// A custom-field value.
    Custom(CustomFieldId),
}

/// Stateless CSV formatter.
///
/// Entity names are resolved through closures so the formatter stays free
/// of storage concerns; unresolvable references render as empty cells.
pub struct ExportService;

impl ExportService {
    /// The built-in column layout, id first.
    #[must_use]
    pub fn default_columns() -> Vec<ExportColumn> {
        vec![
            ExportColumn::Id,
            ExportColumn::OperationDate,
            ExportColumn::Account,
            ExportColumn::Category,
            ExportColumn::Amount,
            ExportColumn::Currency,
            ExportColumn::Approved,
            ExportColumn::Description,
        ]
    }

    /// Renders operations as CSV in the given column and row order.
    ///
    /// Multi-byte text passes through byte-exact; the output is UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if the underlying writer fails.
    pub fn to_csv<A, C, F>(
        operations: &[Operation],
        columns: &[ExportColumn],
        timezone: Tz,
        account_of: A,
        category_of: C,
        field_of: F,
    ) -> Result<String, ExportError>
    where
        A: Fn(AccountId) -> Option<Account>,
        C: Fn(CategoryId) -> Option<OperationCategory>,
        F: Fn(CustomFieldId) -> Option<CustomFieldDef>,
    {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

        let header: Vec<String> = columns
            .iter()
            .map(|column| Self::header_cell(*column, &field_of))
            .collect();
        writer.write_record(&header)?;

        for op in operations {
            let row: Vec<String> = columns
                .iter()
                .map(|column| Self::value_cell(*column, op, timezone, &account_of, &category_of))
                .collect();
            writer.write_record(&row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Buffer(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
    }

    fn header_cell<F>(column: ExportColumn, field_of: &F) -> String
    where
        F: Fn(CustomFieldId) -> Option<CustomFieldDef>,
    {
        match column {
            ExportColumn::Id => "#".to_string(),
            ExportColumn::Description => "Description".to_string(),
            ExportColumn::Account => "Account".to_string(),
            ExportColumn::Category => "Category".to_string(),
            ExportColumn::Amount => "Amount".to_string(),
            ExportColumn::Currency => "Currency".to_string(),
            ExportColumn::OperationDate => "Operation date".to_string(),
            ExportColumn::Approved => "Approved".to_string(),
            ExportColumn::Custom(id) => field_of(id).map(|d| d.name).unwrap_or_default(),
        }
    }

    fn value_cell<A, C>(
        column: ExportColumn,
        op: &Operation,
        timezone: Tz,
        account_of: &A,
        category_of: &C,
    ) -> String
    where
        A: Fn(AccountId) -> Option<Account>,
        C: Fn(CategoryId) -> Option<OperationCategory>,
    {
        match column {
            ExportColumn::Id => op.id.to_string(),
            ExportColumn::Description => op.description.clone(),
            ExportColumn::Account => account_of(op.account_id)
                .map(|a| a.name)
                .unwrap_or_default(),
            ExportColumn::Category => category_of(op.category_id)
                .map(|c| c.name)
                .unwrap_or_default(),
            ExportColumn::Amount => op.amount.to_string(),
            ExportColumn::Currency => account_of(op.account_id)
                .map(|a| a.currency.to_string())
                .unwrap_or_default(),
            ExportColumn::OperationDate => op
                .occurred_at
                .with_timezone(&timezone)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            ExportColumn::Approved => {
                if op.is_approved() { "1" } else { "0" }.to_string()
            }
            ExportColumn::Custom(id) => op
                .custom_values
                .get(&id)
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}
