pub mod errors;
pub mod models;
pub mod providers;
pub mod render;
pub mod services;
pub mod storage;

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use models::{
    chart::{LineChartLayout, PieLayout},
    investment::{Investment, InvestmentDraft},
    market::{FeedStatus, NewsItem, Quote},
    portfolio::{Distribution, PortfolioView},
    projection::{ProjectionParams, ProjectionSeries},
    settings::Settings,
};
use render::{line::draw_line_chart, pie::draw_pie_chart, surface::DrawingSurface, svg::SvgSurface};
use services::{
    chart_service::ChartService,
    display,
    market_service::{MarketService, MarketSnapshot},
    portfolio_service::PortfolioService,
    projection_service::ProjectionService,
};
#[cfg(not(target_arch = "wasm32"))]
use storage::{backend::FileBackend, sealed::SealedFileBackend};
use storage::{backend::KeyValueBackend, backend::MemoryBackend, record_store::RecordStore};
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the Investment Tracker core library.
/// Owns the record store and all services needed to operate on it.
///
/// Nothing derived from the investment list is cached: every view re-reads
/// the store, so totals and charts always reflect what is persisted.
#[must_use]
pub struct InvestmentTracker<B: KeyValueBackend> {
    settings: Settings,
    store: RecordStore<B>,
    portfolio_service: PortfolioService,
    projection_service: ProjectionService,
    chart_service: ChartService,
    market_service: MarketService,
}

impl<B: KeyValueBackend> std::fmt::Debug for InvestmentTracker<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestmentTracker")
            .field("storage_key", &self.store.key())
            .field("settings", &self.settings)
            .field("market", &self.market_service)
            .finish()
    }
}

impl InvestmentTracker<MemoryBackend> {
    /// Throwaway tracker with default settings; nothing survives the process.
    pub fn in_memory() -> Self {
        Self::build(MemoryBackend::new(), Settings::default())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl InvestmentTracker<FileBackend> {
    /// Tracker persisted in a plain JSON file (native only, not WASM).
    pub fn open_file(path: impl Into<PathBuf>, settings: Settings) -> Result<Self, CoreError> {
        Self::new(FileBackend::new(path), settings)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl InvestmentTracker<SealedFileBackend> {
    /// Tracker persisted in a password-encrypted file (native only, not WASM).
    pub fn open_sealed(
        path: impl Into<PathBuf>,
        password: impl Into<String>,
        settings: Settings,
    ) -> Result<Self, CoreError> {
        Self::new(SealedFileBackend::new(path, password), settings)
    }
}

impl<B: KeyValueBackend> InvestmentTracker<B> {
    /// Open a tracker over `backend`.
    ///
    /// Settings are validated first. Legacy records without an identifier
    /// get one now, so identifiers handed out later stay valid.
    pub fn new(backend: B, settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let mut tracker = Self::build(backend, settings);
        tracker.store.load_and_assign_ids()?;
        Ok(tracker)
    }

    /// Replace the market feeds (alternate relay, mock providers).
    pub fn with_market_service(mut self, market_service: MarketService) -> Self {
        self.market_service = market_service;
        self
    }

    // ── Investments ─────────────────────────────────────────────────

    /// All investments, in insertion order.
    pub fn list(&self) -> Result<Vec<Investment>, CoreError> {
        self.store.load()
    }

    pub fn get(&self, id: Uuid) -> Result<Investment, CoreError> {
        self.list()?
            .into_iter()
            .find(|inv| inv.id == id)
            .ok_or_else(|| CoreError::InvestmentNotFound(id.to_string()))
    }

    /// Record a new investment. Returns its identifier.
    pub fn add(&mut self, draft: InvestmentDraft) -> Result<Uuid, CoreError> {
        self.portfolio_service.add(&mut self.store, draft)
    }

    /// Record a new investment straight from form fields.
    /// A blank current price means "unchanged since purchase".
    pub fn add_from_form(
        &mut self,
        asset: &str,
        quantity: &str,
        purchase_price: &str,
        current_price: &str,
        purchase_date: &str,
    ) -> Result<Uuid, CoreError> {
        let draft =
            InvestmentDraft::from_form(asset, quantity, purchase_price, current_price, purchase_date)?;
        self.add(draft)
    }

    pub fn update(&mut self, id: Uuid, draft: InvestmentDraft) -> Result<(), CoreError> {
        self.portfolio_service.update(&mut self.store, id, draft)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Investment, CoreError> {
        self.portfolio_service.remove(&mut self.store, id)
    }

    /// Edit the record at `index` in the list as persisted right now.
    pub fn update_at(&mut self, index: usize, draft: InvestmentDraft) -> Result<Uuid, CoreError> {
        self.portfolio_service.update_at(&mut self.store, index, draft)
    }

    /// Remove the record at `index` in the list as persisted right now.
    pub fn remove_at(&mut self, index: usize) -> Result<Investment, CoreError> {
        self.portfolio_service.remove_at(&mut self.store, index)
    }

    /// Forget every investment.
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.store.clear()
    }

    // ── Portfolio view ──────────────────────────────────────────────

    /// Rows, totals and distribution, recomputed from the store.
    pub fn view(&self) -> Result<PortfolioView, CoreError> {
        Ok(self.portfolio_service.build_view(&self.list()?))
    }

    pub fn distribution(&self) -> Result<Distribution, CoreError> {
        Ok(self.portfolio_service.distribution(&self.list()?))
    }

    /// "Total initial value: …", "Total current value: …", "Number of investments: …"
    pub fn summary_lines(&self) -> Result<Vec<String>, CoreError> {
        Ok(display::summary_lines(&self.view()?))
    }

    /// The investment table as text.
    pub fn portfolio_table(&self) -> Result<String, CoreError> {
        Ok(display::portfolio_table(&self.view()?))
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Pie geometry at the configured size; `None` when there is no value to show.
    pub fn pie_layout(&self) -> Result<Option<PieLayout>, CoreError> {
        let distribution = self.distribution()?;
        Ok(self
            .chart_service
            .pie_layout(self.settings.pie_chart, &distribution))
    }

    /// Draw the distribution pie on `surface`. Returns `false` when there
    /// was no data, in which case the surface is left blank.
    pub fn render_pie<S: DrawingSurface>(&self, surface: &mut S) -> Result<bool, CoreError> {
        let layout = self.pie_layout()?;
        Ok(draw_pie_chart(surface, layout.as_ref()))
    }

    /// The distribution pie as a standalone SVG document (blank without data).
    pub fn pie_svg(&self) -> Result<String, CoreError> {
        let mut surface = SvgSurface::new(self.settings.pie_chart);
        self.render_pie(&mut surface)?;
        Ok(surface.to_svg())
    }

    // ── Projection ──────────────────────────────────────────────────

    /// Run the compound-interest simulator.
    pub fn simulate(&self, params: &ProjectionParams) -> Result<ProjectionSeries, CoreError> {
        self.projection_service.project(params)
    }

    /// Line chart geometry for a simulated series at the configured size.
    #[must_use]
    pub fn projection_layout(&self, series: &ProjectionSeries) -> LineChartLayout {
        self.chart_service.line_layout(
            self.settings.line_chart,
            &series.values(),
            series.params.duration_years,
        )
    }

    pub fn render_projection<S: DrawingSurface>(&self, series: &ProjectionSeries, surface: &mut S) {
        draw_line_chart(surface, &self.projection_layout(series));
    }

    #[must_use]
    pub fn projection_svg(&self, series: &ProjectionSeries) -> String {
        let mut surface = SvgSurface::new(self.settings.line_chart);
        self.render_projection(series, &mut surface);
        surface.to_svg()
    }

    /// "Estimated final value after {n} years: {amount}"
    #[must_use]
    pub fn projection_summary(&self, series: &ProjectionSeries) -> Option<String> {
        display::projection_summary(series)
    }

    // ── Market feeds ────────────────────────────────────────────────

    pub fn market(&self) -> &MarketService {
        &self.market_service
    }

    pub async fn fetch_quote(&self) -> FeedStatus<Quote> {
        self.market_service.fetch_quote().await
    }

    pub async fn fetch_news(&self) -> FeedStatus<Vec<NewsItem>> {
        self.market_service.fetch_news().await
    }

    /// Fetch the quote and the headlines concurrently (startup refresh).
    pub async fn refresh_market(&self) -> MarketSnapshot {
        self.market_service.refresh_all().await
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resize the charts. Other settings are fixed for the tracker's life.
    pub fn set_chart_sizes(
        &mut self,
        pie_chart: models::chart::ChartSize,
        line_chart: models::chart::ChartSize,
    ) -> Result<(), CoreError> {
        let mut updated = self.settings.clone();
        updated.pie_chart = pie_chart;
        updated.line_chart = line_chart;
        updated.validate()?;
        self.settings = updated;
        Ok(())
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all investments as a JSON array (the persisted layout).
    pub fn export_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.list()?)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize investments to JSON: {e}")))
    }

    /// Export all investments as CSV.
    /// Columns: id, asset, quantity, purchase_price, current_price, purchase_date
    pub fn export_to_csv(&self) -> Result<String, CoreError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "id",
            "asset",
            "quantity",
            "purchase_price",
            "current_price",
            "purchase_date",
        ])?;
        for inv in self.list()? {
            writer.write_record([
                inv.id.to_string(),
                inv.asset,
                inv.quantity.to_string(),
                inv.purchase_price.to_string(),
                inv.current_price.map(|p| p.to_string()).unwrap_or_default(),
                inv.purchase_date,
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| CoreError::Serialization(format!("Failed to flush CSV: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| CoreError::Serialization(format!("CSV export is not UTF-8: {e}")))
    }

    /// Append investments from a JSON array. Every record is validated
    /// before anything is written; records keep their identifier when they
    /// carry one that is not already in use.
    /// Returns the number of investments imported.
    pub fn import_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let incoming: Vec<Investment> = serde_json::from_str(json)?;
        let mut investments = self.store.load_and_assign_ids()?;
        let count = incoming.len();
        for inv in incoming {
            let draft = InvestmentDraft::new(
                inv.asset,
                inv.quantity,
                inv.purchase_price,
                inv.current_price,
                inv.purchase_date,
            )?;
            let id = if investments.iter().any(|existing| existing.id == inv.id) {
                Uuid::new_v4()
            } else {
                inv.id
            };
            investments.push(Investment::with_id(id, draft));
        }
        self.store.save(&investments)?;
        Ok(count)
    }

    // ── Storage ─────────────────────────────────────────────────────

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    /// Give the backend back, e.g. to inspect a memory store in tests.
    pub fn into_backend(self) -> B {
        self.store.into_backend()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(backend: B, settings: Settings) -> Self {
        let store = RecordStore::new(backend, settings.storage_key.clone());
        let market_service = MarketService::from_settings(&settings);

        Self {
            settings,
            store,
            portfolio_service: PortfolioService::new(),
            projection_service: ProjectionService::new(),
            chart_service: ChartService::new(),
            market_service,
        }
    }
}
