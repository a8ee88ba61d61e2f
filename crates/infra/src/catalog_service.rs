//! Catalog administration, pricing configuration and ordering.
//!
//! Shares the import service's write lock, so every mutation of the
//! persisted collections is serialised within the process. Each mutation is
//! committed against the revisions it read.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{info, warn};

use vintrade_catalog::{
    DiscontinuedEntry, Product, ProductPatch, RenameOutcome, RetentionPolicy, Withdrawal,
    prune_discontinued, rename_supplier, withdraw_product,
};
use vintrade_core::{CustomerId, DomainError, OrderId, ProductId, SupplierKey};
use vintrade_pricing::{FormulaError, FormulaParams, FormulaProfile, FormulaSet, PriceBreakdown, compute_price};
use vintrade_sales::{
    Order, OrderLine, OrderStatus, SpecialOrderList, SpecialOrderStatus, live_referenced_ids,
};

use crate::error::ServiceError;
use crate::repository::{Repository, Snapshot};

/// Inputs for a price quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub cost: f64,
    pub pack_size: Option<u32>,
    pub bottle_size_ml: Option<f64>,
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct CatalogService {
    repo: Repository,
    write_lock: Arc<Mutex<()>>,
    retention: RetentionPolicy,
}

impl CatalogService {
    pub fn new(repo: Repository, write_lock: Arc<Mutex<()>>, retention: RetentionPolicy) -> Self {
        Self {
            repo,
            write_lock,
            retention,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, ServiceError> {
        self.write_lock.lock().map_err(|_| ServiceError::Poisoned)
    }

    fn live_ids(&self) -> Result<HashSet<ProductId>, ServiceError> {
        let orders = self.repo.orders()?.value;
        let lists = self.repo.special_orders()?.value;
        Ok(live_referenced_ids(&orders, &lists))
    }

    /// Active catalog with every stale price recomputed and written back.
    /// Caller holds the write lock.
    fn fresh_active(&self, formulas: &FormulaSet) -> Result<Snapshot<Vec<Product>>, ServiceError> {
        let mut active = self.repo.active()?;
        let mut stale = 0usize;
        for p in active.value.iter_mut() {
            if p.ensure_priced(formulas) {
                stale += 1;
            }
        }
        if stale > 0 {
            let versions = self.repo.commit(vec![active.to_write()?])?;
            active.version = versions.first().copied();
            info!(repriced = stale, formula_version = formulas.version(), "repriced stale products");
        }
        Ok(active)
    }

    // ---- pricing -------------------------------------------------------

    pub fn formulas(&self) -> Result<FormulaSet, ServiceError> {
        Ok(self.repo.formulas()?.value)
    }

    pub fn quote(&self, request: &QuoteRequest) -> Result<PriceBreakdown, ServiceError> {
        if !request.cost.is_finite() || request.cost < 0.0 {
            return Err(DomainError::validation("cost must be a non-negative number").into());
        }
        let formulas = self.formulas()?;
        Ok(compute_price(
            request.cost,
            request.pack_size,
            request.bottle_size_ml,
            &request.category,
            &formulas,
        ))
    }

    /// Change one profile's parameters and reprice the whole catalog.
    pub fn update_profile(
        &self,
        profile: FormulaProfile,
        params: FormulaParams,
    ) -> Result<FormulaSet, ServiceError> {
        self.update_formulas(|current| current.with_params(profile, params))
    }

    /// Replace all three profiles and reprice the whole catalog.
    pub fn replace_formulas(
        &self,
        wine: FormulaParams,
        spirits: FormulaParams,
        non_alcoholic: FormulaParams,
    ) -> Result<FormulaSet, ServiceError> {
        self.update_formulas(|current| current.replaced(wine, spirits, non_alcoholic))
    }

    fn update_formulas(
        &self,
        change: impl FnOnce(&FormulaSet) -> Result<FormulaSet, FormulaError>,
    ) -> Result<FormulaSet, ServiceError> {
        let _guard = self.lock()?;
        let mut formulas = self.repo.formulas()?;
        let next = change(&formulas.value)?;

        let mut active = self.repo.active()?;
        for p in active.value.iter_mut() {
            p.reprice(&next);
        }
        formulas.value = next.clone();
        self.repo
            .commit(vec![formulas.to_write()?, active.to_write()?])?;

        info!(
            formula_version = next.version(),
            repriced = active.value.len(),
            "formulas updated"
        );
        Ok(next)
    }

    // ---- catalog -------------------------------------------------------

    pub fn catalog(&self, supplier: Option<&SupplierKey>) -> Result<Vec<Product>, ServiceError> {
        let _guard = self.lock()?;
        let formulas = self.repo.formulas()?.value;
        let active = self.fresh_active(&formulas)?;
        Ok(active
            .value
            .into_iter()
            .filter(|p| supplier.is_none_or(|s| &p.supplier == s))
            .collect())
    }

    pub fn product(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.catalog(None)?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")).into())
    }

    /// Manual edit; the product is repriced immediately.
    pub fn edit_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product, ServiceError> {
        let _guard = self.lock()?;
        let formulas = self.repo.formulas()?.value;
        let mut active = self.repo.active()?;

        let product = active
            .value
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))?;
        product.apply_patch(patch, &formulas)?;
        let edited = product.clone();

        self.repo.commit(vec![active.to_write()?])?;
        info!(product_id = %id, "product edited");
        Ok(edited)
    }

    /// Hard delete if unreferenced, otherwise move to the archive.
    pub fn withdraw_product(&self, id: ProductId) -> Result<Withdrawal, ServiceError> {
        let _guard = self.lock()?;
        let live = self.live_ids()?;
        let mut active = self.repo.active()?;
        let mut discontinued = self.repo.discontinued()?;

        let outcome = withdraw_product(
            &mut active.value,
            &mut discontinued.value,
            id,
            &live,
            Utc::now(),
        )?;
        self.repo
            .commit(vec![active.to_write()?, discontinued.to_write()?])?;
        info!(product_id = %id, outcome = ?outcome, "product withdrawn");
        Ok(outcome)
    }

    /// Archived products exactly as they were displaced. Prices stay as
    /// computed at discontinuation; formula changes do not touch them.
    pub fn discontinued(&self) -> Result<Vec<DiscontinuedEntry>, ServiceError> {
        Ok(self.repo.discontinued()?.value)
    }

    /// Apply `policy` (or the configured one) to the archive.
    pub fn prune_discontinued(
        &self,
        policy: Option<RetentionPolicy>,
    ) -> Result<Vec<ProductId>, ServiceError> {
        let policy = policy.unwrap_or(self.retention);
        let _guard = self.lock()?;
        let live = self.live_ids()?;
        let mut discontinued = self.repo.discontinued()?;

        let pruned = prune_discontinued(
            std::mem::take(&mut discontinued.value),
            &live,
            policy,
            Utc::now(),
        );
        discontinued.value = pruned.kept;
        if !pruned.pruned.is_empty() {
            self.repo.commit(vec![discontinued.to_write()?])?;
        }
        info!(policy = ?policy, pruned = pruned.pruned.len(), "discontinued archive pruned");
        Ok(pruned.pruned)
    }

    /// Re-key a supplier; renaming onto an existing supplier merges them.
    pub fn rename_supplier(&self, from: &str, to: &str) -> Result<RenameOutcome, ServiceError> {
        let from = SupplierKey::new(from)?;
        let to = SupplierKey::new(to)?;

        let _guard = self.lock()?;
        let mut active = self.repo.active()?;
        let mut discontinued = self.repo.discontinued()?;
        let mut templates = self.repo.templates()?;

        let outcome = rename_supplier(&mut active.value, &mut discontinued.value, &from, &to);
        if outcome.active_moved == 0
            && outcome.archive_retagged == 0
            && templates.value.get(&from).is_none()
        {
            return Err(DomainError::not_found(format!("supplier {from}")).into());
        }
        templates.value.rename(&from, &to);

        self.repo.commit(vec![
            active.to_write()?,
            discontinued.to_write()?,
            templates.to_write()?,
        ])?;
        if outcome.merged {
            warn!(from = %from, to = %to, "suppliers merged");
        }
        info!(from = %from, to = %to, moved = outcome.active_moved, "supplier renamed");
        Ok(outcome)
    }

    // ---- orders --------------------------------------------------------

    /// Place an order; every line snapshots the product's current price.
    pub fn place_order(
        &self,
        customer: CustomerId,
        items: &[(ProductId, u32)],
    ) -> Result<Order, ServiceError> {
        let _guard = self.lock()?;
        let formulas = self.repo.formulas()?.value;
        let active = self.fresh_active(&formulas)?;
        let mut orders = self.repo.orders()?;

        let mut seen = HashSet::new();
        let mut lines = Vec::with_capacity(items.len());
        for &(product_id, quantity) in items {
            if !seen.insert(product_id) {
                return Err(DomainError::validation(format!(
                    "product {product_id} appears twice in the order"
                ))
                .into());
            }
            let product = active
                .value
                .iter()
                .find(|p| p.id == product_id)
                .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;
            lines.push(OrderLine::snapshot(product, quantity));
        }

        let order = Order::place(OrderId::new(), customer, lines, Utc::now())?;
        orders.value.push(order.clone());
        self.repo.commit(vec![orders.to_write()?])?;
        info!(order_id = %order.id(), customer = %order.customer(), total = order.total(), "order placed");
        Ok(order)
    }

    pub fn orders(&self, customer: Option<&CustomerId>) -> Result<Vec<Order>, ServiceError> {
        Ok(self
            .repo
            .orders()?
            .value
            .into_iter()
            .filter(|o| customer.is_none_or(|c| o.customer() == c))
            .collect())
    }

    pub fn set_order_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, ServiceError> {
        let _guard = self.lock()?;
        let mut orders = self.repo.orders()?;
        let order = orders
            .value
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))?;
        order.transition(status)?;
        let updated = order.clone();

        self.repo.commit(vec![orders.to_write()?])?;
        info!(order_id = %id, status = ?status, "order status changed");
        Ok(updated)
    }

    // ---- special orders ------------------------------------------------

    pub fn special_orders(&self, customer: &CustomerId) -> Result<SpecialOrderList, ServiceError> {
        Ok(self
            .repo
            .special_orders()?
            .value
            .into_iter()
            .find(|l| l.customer() == customer)
            .unwrap_or_else(|| SpecialOrderList::new(customer.clone())))
    }

    /// Add or update a line. The product must be in the catalog or the
    /// archive.
    pub fn upsert_special_item(
        &self,
        customer: &CustomerId,
        product_id: ProductId,
        quantity: u32,
        status: SpecialOrderStatus,
        note: Option<String>,
    ) -> Result<SpecialOrderList, ServiceError> {
        let _guard = self.lock()?;
        let known = self.repo.active()?.value.iter().any(|p| p.id == product_id)
            || self
                .repo
                .discontinued()?
                .value
                .iter()
                .any(|d| d.id() == product_id);
        if !known {
            return Err(DomainError::not_found(format!("product {product_id}")).into());
        }

        let mut lists = self.repo.special_orders()?;
        let idx = match lists.value.iter().position(|l| l.customer() == customer) {
            Some(idx) => idx,
            None => {
                lists.value.push(SpecialOrderList::new(customer.clone()));
                lists.value.len() - 1
            }
        };
        lists.value[idx].upsert(product_id, quantity, status, note, Utc::now())?;
        let list = lists.value[idx].clone();

        self.repo.commit(vec![lists.to_write()?])?;
        info!(customer = %customer, product_id = %product_id, status = ?status, "special-order item saved");
        Ok(list)
    }

    /// Move an existing line to `status` without touching quantity or note.
    pub fn set_special_item_status(
        &self,
        customer: &CustomerId,
        product_id: ProductId,
        status: SpecialOrderStatus,
    ) -> Result<SpecialOrderList, ServiceError> {
        let _guard = self.lock()?;
        let mut lists = self.repo.special_orders()?;
        let list = lists
            .value
            .iter_mut()
            .find(|l| l.customer() == customer)
            .ok_or_else(|| DomainError::not_found(format!("special-order list for {customer}")))?;
        list.set_status(product_id, status, Utc::now())?;
        let list = list.clone();

        self.repo.commit(vec![lists.to_write()?])?;
        info!(customer = %customer, product_id = %product_id, status = ?status, "special-order status changed");
        Ok(list)
    }

    pub fn remove_special_item(
        &self,
        customer: &CustomerId,
        product_id: ProductId,
    ) -> Result<SpecialOrderList, ServiceError> {
        let _guard = self.lock()?;
        let mut lists = self.repo.special_orders()?;
        let idx = lists
            .value
            .iter()
            .position(|l| l.customer() == customer)
            .ok_or_else(|| DomainError::not_found(format!("special-order list for {customer}")))?;
        lists.value[idx].remove(product_id)?;
        let list = if lists.value[idx].is_empty() {
            lists.value.remove(idx)
        } else {
            lists.value[idx].clone()
        };

        self.repo.commit(vec![lists.to_write()?])?;
        info!(customer = %customer, product_id = %product_id, "special-order item removed");
        Ok(list)
    }
}
