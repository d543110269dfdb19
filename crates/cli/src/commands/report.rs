use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use retailscope_core::alerts::Alert;
use retailscope_core::config::DashboardConfig;
use retailscope_core::domain::catalog::Category;
use retailscope_core::domain::ids::StoreId;
use retailscope_core::generator::output::MERGED_FILE;
use retailscope_core::selectors::{
    CampaignPerformance, CategorySales, CustomerSegment, DepartmentSnapshot, FinanceSummary,
    ProductMix, RegionalSales, StatusCounts, StorePerformance, TopProduct, WorkforceSummary,
};
use retailscope_core::{
    ApplicationError, DashboardState, DashboardStore, Dataset, FilterSpec, FilterUpdate,
    KpiSummary, Selectors,
};
use serde::Serialize;
use tracing::info;

use crate::commands::{load_config, CommandResult, ConfigArgs};

const COMMAND: &str = "report";
const LEADERBOARD_SIZE: usize = 5;
const CAMPAIGN_LIMIT: usize = 5;
const TOP_PERFORMERS: usize = 5;

#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Merged dataset to read (default: <generator.output_dir>/mockData.json)"
    )]
    pub dataset: Option<PathBuf>,
    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(1..=3650),
        help = "Window in days ending at dataset generation (default: dashboard.window_days)"
    )]
    pub days: Option<u32>,
    #[arg(long = "store", value_name = "ID", help = "Restrict to a store id; repeatable")]
    pub stores: Vec<String>,
    #[arg(
        long = "category",
        value_name = "NAME",
        value_parser = parse_category,
        help = "Restrict to a product category; repeatable"
    )]
    pub categories: Vec<Category>,
    #[arg(
        long,
        value_name = "NAME",
        value_parser = parse_category,
        help = "Add a department snapshot"
    )]
    pub department: Option<Category>,
}

/// Everything the report command needs once the dataset is loaded.
struct Session {
    store: DashboardStore,
    dashboard: DashboardConfig,
    department: Option<Category>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardReport<'v, 'a> {
    filters: &'v FilterSpec,
    kpis: KpiSummary,
    top_products: Vec<TopProduct<'a>>,
    sales_by_category: Vec<CategorySales<'a>>,
    top_stores: Vec<StorePerformance<'a>>,
    bottom_stores: Vec<StorePerformance<'a>>,
    regional_sales: Vec<RegionalSales<'a>>,
    low_stock_count: usize,
    alerts: Vec<Alert>,
    inventory_status: StatusCounts,
    product_mix: Vec<ProductMix>,
    customer_segments: Vec<CustomerSegment>,
    campaigns: Vec<CampaignPerformance<'a>>,
    finance: FinanceSummary<'a>,
    workforce: WorkforceSummary<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    department: Option<DepartmentSnapshot<'a>>,
}

impl<'v, 'a> DashboardReport<'v, 'a> {
    fn collect(
        view: &'v Selectors<'a>,
        dashboard: &DashboardConfig,
        department: Option<Category>,
        alerts: Vec<Alert>,
    ) -> Self {
        let leaderboard = view.store_leaderboard();
        let mut campaigns = view.marketing_roas();
        campaigns.truncate(CAMPAIGN_LIMIT);

        Self {
            filters: view.filters(),
            kpis: view.kpis(),
            top_products: view.top_products(dashboard.top_products_limit),
            sales_by_category: view.sales_by_category(),
            top_stores: leaderboard.top(LEADERBOARD_SIZE).to_vec(),
            bottom_stores: leaderboard.bottom(LEADERBOARD_SIZE).into_iter().cloned().collect(),
            regional_sales: view.regional_sales(),
            low_stock_count: view.low_stock_items().len(),
            alerts,
            inventory_status: view.inventory_overview().status_counts,
            product_mix: view.product_mix(),
            customer_segments: view.customer_segments(),
            campaigns,
            finance: view.finance_summary(),
            workforce: view.workforce_summary(TOP_PERFORMERS),
            department: department.map(|category| view.department_snapshot(category)),
        }
    }
}

pub fn run(config_args: &ConfigArgs, args: &ReportArgs) -> CommandResult {
    let session = match open(config_args, args) {
        Ok(session) => session,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let alerts = session.store.snapshot().alerts;
    session.store.selectors(|view| {
        let report =
            DashboardReport::collect(view, &session.dashboard, session.department, alerts);
        let message = format!(
            "{} transactions, revenue {} between {} and {}",
            report.kpis.transactions,
            report.kpis.revenue,
            report.filters.date_range.start.format("%Y-%m-%d"),
            report.filters.date_range.end.format("%Y-%m-%d"),
        );
        CommandResult::success(COMMAND, message, &report)
    })
}

fn open(config_args: &ConfigArgs, args: &ReportArgs) -> Result<Session, ApplicationError> {
    let config = load_config(config_args, config_args.overrides())?;
    let path =
        args.dataset.clone().unwrap_or_else(|| config.generator.output_dir.join(MERGED_FILE));
    let dataset = Arc::new(Dataset::load(&path)?);

    let mut dashboard = config.dashboard.clone();
    if let Some(days) = args.days {
        dashboard.window_days = days;
    }
    // The window ends when the dataset was generated, not at the wall clock.
    let raised_at = dataset.metadata.generated;
    let store = DashboardStore::new(DashboardState::from_config(&dashboard, raised_at));
    store.set_data(Arc::clone(&dataset));
    store.set_filters(FilterUpdate {
        store_ids: (!args.stores.is_empty())
            .then(|| args.stores.iter().map(|id| StoreId::from(id.as_str())).collect()),
        categories: (!args.categories.is_empty())
            .then(|| args.categories.iter().copied().collect()),
        ..FilterUpdate::default()
    });

    let alerts = store.selectors(|view| view.low_stock_alerts(dashboard.alert_limit, raised_at));
    // add_alert prepends, so push the most urgent last
    for alert in alerts.into_iter().rev() {
        store.add_alert(alert);
    }

    info!(
        event_name = "cli.report.opened",
        dataset = %path.display(),
        window_days = dashboard.window_days,
        revision = store.revision(),
        "dashboard report session ready"
    );
    Ok(Session { store, dashboard, department: args.department })
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse()
}
