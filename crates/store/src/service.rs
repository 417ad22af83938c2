//! Operation orchestration: temporal → approval → ledger → persist.

use std::collections::BTreeMap;
use std::sync::PoisonError;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use tally_core::export::{ExportColumn, ExportService};
use tally_core::ledger::{LedgerError, LedgerService, Posting, RepostPlan};
use tally_core::operation::{
    CreateOperationInput, Operation, UpdateOperationInput, normalize_amount,
};
use tally_core::query::{
    FilterSet, QueryEngine, SortSpec, TotalsKey, merge_filter_sets,
};
use tally_core::temporal::{TemporalNormalizer, resolve_timezone};
use tally_core::workflow::ApprovalService;
use tally_shared::AppConfig;
use tally_shared::types::{AccountId, Money, OperationId, SavedQueryId, UserId};

use crate::error::StoreError;
use crate::repositories::{
    AccountRepository, CategoryRepository, CustomFieldRepository, OperationRepository,
    SavedQueryRepository,
};

/// Per-request context: who is acting, in which timezone, and whether the
/// approval workflow applies to this call.
///
/// The workflow flag travels here rather than in service state, so the
/// same service instance serves calls made under different settings.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Acting user; recorded as the author of created operations.
    pub user_id: UserId,
    /// The user's timezone; governs date interpretation and rendering.
    pub timezone: Tz,
    /// Whether the approval workflow gates ledger effect for this call.
    pub workflow_enabled: bool,
    /// The current instant; injectable for deterministic tests.
    pub now: DateTime<Utc>,
}

impl RequestContext {
    /// Builds a context for the current instant.
    #[must_use]
    pub fn new(user_id: UserId, timezone: Tz, workflow_enabled: bool) -> Self {
        Self {
            user_id,
            timezone,
            workflow_enabled,
            now: Utc::now(),
        }
    }

    /// Builds a context from the process-wide configuration defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Temporal` if the configured fallback timezone
    /// does not resolve.
    pub fn from_config(user_id: UserId, config: &AppConfig) -> Result<Self, StoreError> {
        let timezone = resolve_timezone(&config.temporal.default_timezone)?;
        Ok(Self::new(
            user_id,
            timezone,
            config.workflow.approval_required,
        ))
    }

    /// Pins the context to a fixed instant.
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// A listing request: filters, an optional saved query to merge them
/// into, a sort spec, and whether to compute grouped totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryRequest {
    /// Explicit filters; override saved-query filters by field name.
    pub filters: FilterSet,
    /// Saved query whose filter set seeds this request.
    pub saved_query_id: Option<SavedQueryId>,
    /// Result ordering.
    pub sort: SortSpec,
    /// Whether to compute grouped totals alongside the listing.
    pub with_totals: bool,
}

/// A listing result.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// Matching operations in requested order.
    pub operations: Vec<Operation>,
    /// Amount sums per {category, kind, approval} group, when requested.
    pub totals: Option<BTreeMap<TotalsKey, Money>>,
}

/// The orchestration layer over the entity repositories.
///
/// Composes the pure core services and runs every balance-affecting
/// read-modify-write inside the per-account locks, so the balance
/// invariant holds after every mutation and under concurrent
/// interleavings.
#[derive(Debug, Default)]
pub struct OperationService {
    accounts: AccountRepository,
    operations: OperationRepository,
    categories: CategoryRepository,
    saved_queries: SavedQueryRepository,
    custom_fields: CustomFieldRepository,
}

impl OperationService {
    /// Creates a service over empty repositories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Account repository, for setup and direct reads.
    #[must_use]
    pub fn accounts(&self) -> &AccountRepository {
        &self.accounts
    }

    /// Operation repository, for direct reads.
    #[must_use]
    pub fn operations(&self) -> &OperationRepository {
        &self.operations
    }

    /// Category repository, for setup.
    #[must_use]
    pub fn categories(&self) -> &CategoryRepository {
        &self.categories
    }

    /// Saved-query repository, for setup.
    #[must_use]
    pub fn saved_queries(&self) -> &SavedQueryRepository {
        &self.saved_queries
    }

    /// Custom-field repository, for setup.
    #[must_use]
    pub fn custom_fields(&self) -> &CustomFieldRepository {
        &self.custom_fields
    }

    /// Creates an operation and posts it to its account.
    ///
    /// # Errors
    ///
    /// Fails without any stored change if the category or account is
    /// absent, the amount is zero, or the date does not parse.
    pub fn create(
        &self,
        ctx: &RequestContext,
        input: CreateOperationInput,
    ) -> Result<Operation, StoreError> {
        let category = self
            .categories
            .get(input.category_id)
            .ok_or_else(|| StoreError::NotFound(format!("category {}", input.category_id)))?;
        let (amount, kind) = normalize_amount(input.amount, category.kind)?;
        let occurred_at = TemporalNormalizer::normalize(
            &input.date,
            input.time.as_deref(),
            ctx.timezone,
            ctx.now,
        )?;
        let approval =
            ApprovalService::on_create(ctx.workflow_enabled, input.approved.unwrap_or(false));

        let operation = Operation {
            id: OperationId::new(),
            account_id: input.account_id,
            category_id: category.id,
            kind,
            amount,
            description: input.description,
            occurred_at,
            approval,
            author_id: ctx.user_id,
            custom_values: input.custom_values,
        };

        self.with_accounts_locked(&[operation.account_id], || {
            let plan = RepostPlan {
                postings: LedgerService::post_delta(
                    &operation.ledger_view(),
                    ctx.workflow_enabled,
                )
                .into_iter()
                .collect(),
            };
            self.apply_postings(&[operation.account_id], &plan)?;
            self.operations.insert(operation.clone());
            Ok(())
        })?;

        info!(
            operation = %operation.id,
            account = %operation.account_id,
            kind = %operation.kind,
            amount = %operation.amount,
            approval = %operation.approval,
            "operation created"
        );
        Ok(operation)
    }

    /// Fetches an operation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if it does not exist.
    pub fn get(&self, id: OperationId) -> Result<Operation, StoreError> {
        self.operations
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("operation {id}")))
    }

    /// Updates an operation and reposts its ledger effect atomically.
    ///
    /// Amount, account, and approval changes collapse into one repost
    /// plan; a cross-account move locks both accounts in canonical order
    /// and applies both-or-neither. The operation is re-read and
    /// re-stored inside the same critical section, so concurrent edits
    /// of one operation serialize instead of double-posting.
    ///
    /// # Errors
    ///
    /// Fails without any stored change on unknown references, a zero
    /// amount, or an unparsable date.
    pub fn update(
        &self,
        ctx: &RequestContext,
        id: OperationId,
        input: UpdateOperationInput,
    ) -> Result<Operation, StoreError> {
        loop {
            let old = self.get(id)?;
            let target_account = input.account_id.unwrap_or(old.account_id);

            let outcome = self.with_accounts_locked(&[old.account_id, target_account], || {
                let Some(current) = self.operations.get(id) else {
                    return Err(StoreError::NotFound(format!("operation {id}")));
                };
                // Raced with a move to another account; retry against the
                // fresh account set.
                if current.account_id != old.account_id {
                    return Ok(None);
                }

                let mut new = current.clone();
                if let Some(account_id) = input.account_id {
                    new.account_id = account_id;
                }
                let category = match input.category_id {
                    Some(category_id) => self
                        .categories
                        .get(category_id)
                        .ok_or_else(|| StoreError::NotFound(format!("category {category_id}")))?,
                    None => self.categories.get(current.category_id).ok_or_else(|| {
                        StoreError::NotFound(format!("category {}", current.category_id))
                    })?,
                };
                new.category_id = category.id;
                match input.amount {
                    Some(raw) => {
                        let (amount, kind) = normalize_amount(raw, category.kind)?;
                        new.amount = amount;
                        new.kind = kind;
                    }
                    None => {
                        // Category change without a new amount keeps the
                        // stored magnitude and takes the new category's kind.
                        if input.category_id.is_some() {
                            new.kind = category.kind;
                        }
                    }
                }
                if let Some(description) = &input.description {
                    new.description = description.clone();
                }
                if let Some(date) = &input.date {
                    new.occurred_at = TemporalNormalizer::normalize(
                        date,
                        input.time.as_deref(),
                        ctx.timezone,
                        ctx.now,
                    )?;
                }
                if let Some(approved) = input.approved
                    && ctx.workflow_enabled
                {
                    new.approval = ApprovalService::toggle(new.approval, approved);
                }
                if let Some(custom_values) = &input.custom_values {
                    new.custom_values = custom_values.clone();
                }

                let plan = LedgerService::repost_plan(
                    &current.ledger_view(),
                    &new.ledger_view(),
                    ctx.workflow_enabled,
                );
                self.apply_postings(&[current.account_id, new.account_id], &plan)?;
                self.operations.insert(new.clone());
                Ok(Some(new))
            })?;

            if let Some(new) = outcome {
                info!(operation = %new.id, account = %new.account_id, "operation updated");
                return Ok(new);
            }
        }
    }

    /// Deletes an operation, reversing its ledger effect first.
    ///
    /// Reversal and removal happen inside the account's critical section,
    /// so a concurrent edit cannot resurrect the operation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown operation; the
    /// reversal failing leaves the operation stored and balances intact.
    pub fn delete(&self, ctx: &RequestContext, id: OperationId) -> Result<(), StoreError> {
        loop {
            let old = self.get(id)?;

            let removed = self.with_accounts_locked(&[old.account_id], || {
                let Some(current) = self.operations.get(id) else {
                    return Err(StoreError::NotFound(format!("operation {id}")));
                };
                if current.account_id != old.account_id {
                    return Ok(false);
                }

                let plan = RepostPlan {
                    postings: LedgerService::reverse_delta(
                        &current.ledger_view(),
                        ctx.workflow_enabled,
                    )
                    .into_iter()
                    .collect(),
                };
                self.apply_postings(&[current.account_id], &plan)?;
                self.operations.remove(id);
                Ok(true)
            })?;

            if removed {
                info!(operation = %id, "operation deleted");
                return Ok(());
            }
        }
    }

    /// Toggles an operation's approval flag and reposts the difference.
    ///
    /// The flag is stored regardless of the workflow setting; the ledger
    /// effect of the transition is computed under the setting given in
    /// the context. Read, repost, and store run inside the account's
    /// critical section, so concurrent toggles of one operation post the
    /// transition exactly once.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown operation.
    pub fn set_approval(
        &self,
        ctx: &RequestContext,
        id: OperationId,
        approve: bool,
    ) -> Result<Operation, StoreError> {
        loop {
            let old = self.get(id)?;

            let outcome = self.with_accounts_locked(&[old.account_id], || {
                let Some(current) = self.operations.get(id) else {
                    return Err(StoreError::NotFound(format!("operation {id}")));
                };
                if current.account_id != old.account_id {
                    return Ok(None);
                }

                let mut new = current.clone();
                new.approval = ApprovalService::toggle(current.approval, approve);

                let plan = LedgerService::repost_plan(
                    &current.ledger_view(),
                    &new.ledger_view(),
                    ctx.workflow_enabled,
                );
                self.apply_postings(&[current.account_id], &plan)?;
                self.operations.insert(new.clone());
                Ok(Some(new))
            })?;

            if let Some(new) = outcome {
                info!(operation = %id, approval = %new.approval, "approval toggled");
                return Ok(new);
            }
        }
    }

    /// Applies an approval toggle to each id independently.
    ///
    /// # Errors
    ///
    /// If any id fails, returns `StoreError::PartialBatch` naming both
    /// the succeeded and the failed ids; succeeded transitions are kept.
    pub fn bulk_set_approval(
        &self,
        ctx: &RequestContext,
        ids: &[OperationId],
        approve: bool,
    ) -> Result<Vec<OperationId>, StoreError> {
        let mut succeeded = Vec::with_capacity(ids.len());
        let mut failed = Vec::new();

        for &id in ids {
            match self.set_approval(ctx, id, approve) {
                Ok(_) => succeeded.push(id),
                Err(err) => {
                    warn!(operation = %id, error = %err, "bulk approval entry failed");
                    failed.push(id);
                }
            }
        }

        if failed.is_empty() {
            Ok(succeeded)
        } else {
            Err(StoreError::PartialBatch { succeeded, failed })
        }
    }

    /// Runs a filtered, sorted listing with optional grouped totals.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Query` for an invalid filter set and
    /// `StoreError::NotFound` for an unknown saved query.
    pub fn query(&self, request: &QueryRequest) -> Result<QueryResult, StoreError> {
        let filters = match request.saved_query_id {
            Some(id) => {
                let saved = self
                    .saved_queries
                    .get(id)
                    .ok_or_else(|| StoreError::NotFound(format!("saved query {id}")))?;
                merge_filter_sets(&saved.filters, &request.filters)
            }
            None => request.filters.clone(),
        };

        let catalog = self.custom_fields.catalog();
        let compiled = QueryEngine::compile(&filters, &catalog)?;
        let account_of = |id: AccountId| self.accounts.get(id);

        let mut operations: Vec<Operation> = self
            .operations
            .list()
            .into_iter()
            .filter(|op| compiled.matches(op, &account_of))
            .collect();
        QueryEngine::sort(&mut operations, request.sort);

        let totals = request
            .with_totals
            .then(|| QueryEngine::totals(&operations));

        debug!(matched = operations.len(), "query evaluated");
        Ok(QueryResult { operations, totals })
    }

    /// Renders a listing as CSV in the context's timezone.
    ///
    /// # Errors
    ///
    /// Propagates query errors; export failures surface as
    /// `StoreError::Export`.
    pub fn export_csv(
        &self,
        ctx: &RequestContext,
        request: &QueryRequest,
        columns: &[ExportColumn],
    ) -> Result<String, StoreError> {
        let result = self.query(request)?;
        let csv = ExportService::to_csv(
            &result.operations,
            columns,
            ctx.timezone,
            |id| self.accounts.get(id),
            |id| self.categories.get(id),
            |id| self.custom_fields.get(id),
        )?;
        debug!(rows = result.operations.len(), "csv export rendered");
        Ok(csv)
    }

    /// Runs a critical section while holding the locks of the given
    /// accounts, acquired in canonical (ascending id) order.
    fn with_accounts_locked<T>(
        &self,
        touched: &[AccountId],
        critical: impl FnOnce() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let handles = self.accounts.lock_handles(touched);
        let _guards: Vec<_> = handles
            .iter()
            .map(|handle| handle.lock().unwrap_or_else(PoisonError::into_inner))
            .collect();
        critical()
    }

    /// Verifies every touched account exists, then applies the plan's
    /// postings. A mid-apply failure rolls back the postings already
    /// applied before returning.
    ///
    /// Must only be called inside a [`Self::with_accounts_locked`]
    /// section covering every touched account.
    fn apply_postings(&self, touched: &[AccountId], plan: &RepostPlan) -> Result<(), StoreError> {
        let mut ids = touched.to_vec();
        ids.extend(plan.account_ids());
        ids.sort_unstable();
        ids.dedup();

        for id in &ids {
            if !self.accounts.contains(*id) {
                return Err(StoreError::Ledger(LedgerError::AccountNotFound(*id)));
            }
        }

        let mut applied: Vec<Posting> = Vec::with_capacity(plan.postings.len());
        for posting in &plan.postings {
            match self.accounts.apply_delta(posting.account_id, posting.delta) {
                Ok(()) => applied.push(*posting),
                Err(err) => {
                    for done in applied.iter().rev() {
                        if let Err(rollback_err) =
                            self.accounts.apply_delta(done.account_id, -done.delta)
                        {
                            error!(
                                account = %done.account_id,
                                error = %rollback_err,
                                "rollback of an applied posting failed"
                            );
                        }
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}
