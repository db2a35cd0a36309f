use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::investment::{Investment, InvestmentDraft};
use crate::models::portfolio::{Distribution, PortfolioRow, PortfolioTotals, PortfolioView};
use crate::storage::backend::KeyValueBackend;
use crate::storage::record_store::RecordStore;

/// Investment list mutations and the derived portfolio view.
///
/// Every mutation re-reads the store, applies the change and saves it back,
/// so an identifier or index always refers to what is persisted right now.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Append a new investment. Returns its identifier.
    pub fn add<B: KeyValueBackend>(
        &self,
        store: &mut RecordStore<B>,
        draft: InvestmentDraft,
    ) -> Result<Uuid, CoreError> {
        let mut investments = store.load_and_assign_ids()?;
        let investment = Investment::new(draft);
        let id = investment.id;
        investments.push(investment);
        store.save(&investments)?;
        Ok(id)
    }

    /// Replace the fields of an existing investment, keeping its identifier and position.
    pub fn update<B: KeyValueBackend>(
        &self,
        store: &mut RecordStore<B>,
        id: Uuid,
        draft: InvestmentDraft,
    ) -> Result<(), CoreError> {
        let mut investments = store.load_and_assign_ids()?;
        let idx = Self::position_of(&investments, id)?;
        investments[idx] = Investment::with_id(id, draft);
        store.save(&investments)
    }

    /// Remove an investment by identifier. Returns the removed record.
    pub fn remove<B: KeyValueBackend>(
        &self,
        store: &mut RecordStore<B>,
        id: Uuid,
    ) -> Result<Investment, CoreError> {
        let mut investments = store.load_and_assign_ids()?;
        let idx = Self::position_of(&investments, id)?;
        let removed = investments.remove(idx);
        store.save(&investments)?;
        Ok(removed)
    }

    /// Edit the record currently at `index`. Returns its identifier.
    pub fn update_at<B: KeyValueBackend>(
        &self,
        store: &mut RecordStore<B>,
        index: usize,
        draft: InvestmentDraft,
    ) -> Result<Uuid, CoreError> {
        let mut investments = store.load_and_assign_ids()?;
        let len = investments.len();
        let slot = investments
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })?;
        let id = slot.id;
        *slot = Investment::with_id(id, draft);
        store.save(&investments)?;
        Ok(id)
    }

    /// Remove the record currently at `index`.
    pub fn remove_at<B: KeyValueBackend>(
        &self,
        store: &mut RecordStore<B>,
        index: usize,
    ) -> Result<Investment, CoreError> {
        let mut investments = store.load_and_assign_ids()?;
        if index >= investments.len() {
            return Err(CoreError::IndexOutOfRange {
                index,
                len: investments.len(),
            });
        }
        let removed = investments.remove(index);
        store.save(&investments)?;
        Ok(removed)
    }

    /// Rows, totals and distribution for a list of investments.
    /// A pure fold: nothing is cached between calls.
    pub fn build_view(&self, investments: &[Investment]) -> PortfolioView {
        let mut totals = PortfolioTotals::default();
        let mut distribution = Distribution::new();
        let mut rows = Vec::with_capacity(investments.len());

        for inv in investments {
            let initial_value = inv.initial_value();
            let current_value = inv.current_value();
            totals.total_initial_value += initial_value;
            totals.total_current_value += current_value;
            distribution.add(&inv.asset, current_value);
            rows.push(PortfolioRow {
                investment: inv.clone(),
                initial_value,
                current_value,
            });
        }
        totals.investment_count = investments.len();

        PortfolioView {
            rows,
            totals,
            distribution,
        }
    }

    /// Current value grouped by asset category, in order of first appearance.
    pub fn distribution(&self, investments: &[Investment]) -> Distribution {
        investments
            .iter()
            .map(|inv| (inv.asset.as_str(), inv.current_value()))
            .collect()
    }

    fn position_of(investments: &[Investment], id: Uuid) -> Result<usize, CoreError> {
        investments
            .iter()
            .position(|inv| inv.id == id)
            .ok_or_else(|| CoreError::InvestmentNotFound(id.to_string()))
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
