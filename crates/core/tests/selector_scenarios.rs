use chrono::{NaiveDate, TimeZone, Utc};
use retailscope_core::domain::catalog::Category;
use retailscope_core::domain::inventory::InventoryStatus;
use retailscope_core::domain::people::LoyaltyTier;
use retailscope_core::domain::store::Region;
use retailscope_core::fixtures::{date, DatasetBuilder};
use retailscope_core::selectors::{DateRange, FilterSpec, FilterUpdate, KpiSummary, Selectors};
use retailscope_core::Dataset;

fn january() -> FilterSpec {
    FilterSpec::new(DateRange::from_days(date(2024, 1, 1), date(2024, 1, 31)))
}

fn with_filters(update: FilterUpdate) -> FilterSpec {
    let mut filters = january();
    filters.merge(update);
    filters
}

/// Two stores, a small catalog, and four January sales.
fn store_scenario() -> Dataset {
    DatasetBuilder::new()
        .supplier("SUP0001", "Summit Foods", &[Category::Dairy, Category::Electronics])
        .store("ST0001", "HyperRetail Chicago Plaza", Region::North)
        .store("ST0002", "HyperRetail Dallas Mall", Region::South)
        .product("PRD00001", "Whole Milk", Category::Dairy, 5.0)
        .product("PRD00002", "Headphones", Category::Electronics, 20.0)
        .sale_on("SL000001", "ST0001", "PRD00001", date(2024, 1, 5), 2, 10.0)
        .sale_on("SL000002", "ST0001", "PRD00002", date(2024, 1, 12), 1, 20.0)
        .sale_on("SL000003", "ST0001", "PRD00001", date(2024, 1, 31), 6, 30.0)
        .sale_on("SL000004", "ST0002", "PRD00002", date(2024, 1, 20), 5, 100.0)
        .sale_on("SL000005", "ST0001", "PRD00001", date(2024, 2, 1), 1, 5.0)
        .inventory("ST0001", "PRD00001", 100, 50)
        .inventory("ST0001", "PRD00002", 120, 50)
        .inventory("ST0002", "PRD00001", 10, 50)
        .build()
}

#[test]
fn store_filter_keeps_only_matching_sales_in_order() {
    let data = store_scenario();
    let filters = with_filters(FilterUpdate::stores(["ST0001"]));
    let view = Selectors::new(Some(&data), &filters);

    let ids: Vec<&str> = view.filtered_sales().iter().map(|sale| sale.id.as_str()).collect();
    assert_eq!(ids, ["SL000001", "SL000002", "SL000003"]);

    let kpis = view.kpis();
    assert_eq!(kpis.revenue, 60.0);
    assert_eq!(kpis.items_sold, 9);
    assert_eq!(kpis.transactions, 3);
    assert_eq!(kpis.avg_basket, 20.0);
    assert_eq!(kpis.stock_health, 67.0, "two of three rows are healthy, store filter ignored");
}

#[test]
fn category_filter_excludes_sales_with_unknown_products() {
    let data = DatasetBuilder::new()
        .store("ST0001", "HyperRetail Chicago Plaza", Region::North)
        .product("PRD00001", "Tablet", Category::Electronics, 300.0)
        .sale_on("SL000001", "ST0001", "PRD00001", date(2024, 1, 3), 1, 300.0)
        .sale_on("SL000002", "ST0001", "PRD99999", date(2024, 1, 4), 1, 80.0)
        .build();

    let electronics = with_filters(FilterUpdate::categories([Category::Electronics]));
    let view = Selectors::new(Some(&data), &electronics);
    let ids: Vec<&str> = view.filtered_sales().iter().map(|sale| sale.id.as_str()).collect();
    assert_eq!(ids, ["SL000001"]);

    let unrestricted = january();
    let view = Selectors::new(Some(&data), &unrestricted);
    assert_eq!(view.filtered_sales().len(), 2, "dangling sale is kept without a category filter");

    let categories = view.sales_by_category();
    assert_eq!(categories.len(), 2);
    assert_eq!((categories[0].category, categories[0].revenue), ("Electronics", 300.0));
    assert_eq!((categories[1].category, categories[1].revenue), ("Unknown", 80.0));

    let top = view.top_products(10);
    assert_eq!(top[1].name, "Unknown");
    assert_eq!(top[1].category, "Unknown");
}

#[test]
fn top_products_truncates_and_sorts_descending() {
    let mut builder =
        DatasetBuilder::new().store("ST0001", "HyperRetail Chicago Plaza", Region::West);
    for index in 1..=8 {
        let product = format!("PRD{index:05}");
        builder = builder.product(&product, &format!("Item {index}"), Category::Grocery, 1.0);
    }
    let revenues = [40.0, 10.0, 80.0, 20.0, 70.0, 30.0, 60.0, 50.0];
    for (index, revenue) in revenues.iter().enumerate() {
        let sale = format!("SL{:06}", index + 1);
        let product = format!("PRD{:05}", index + 1);
        builder = builder.sale_on(&sale, "ST0001", &product, date(2024, 1, 10), 1, *revenue);
    }
    // a second sale folds into PRD00002's group
    let data = builder.sale_on("SL000009", "ST0001", "PRD00002", date(2024, 1, 11), 3, 5.0).build();

    let filters = january();
    let view = Selectors::new(Some(&data), &filters);
    let top = view.top_products(5);

    assert_eq!(top.len(), 5);
    let revenue: Vec<f64> = top.iter().map(|row| row.revenue).collect();
    assert_eq!(revenue, [80.0, 70.0, 60.0, 50.0, 40.0]);
    assert!(top.windows(2).all(|pair| pair[0].revenue > pair[1].revenue));
    assert_eq!(top[0].name, "Item 3");

    let all = view.top_products(20);
    let folded = all.iter().find(|row| row.product_id.as_str() == "PRD00002").unwrap();
    assert_eq!((folded.quantity, folded.revenue), (4, 15.0));
}

#[test]
fn kpis_without_matching_sales_still_report_stock_health() {
    let data = store_scenario();
    let mut filters = january();
    filters.merge(FilterUpdate::date_range(DateRange::from_days(
        date(2023, 1, 1),
        date(2023, 1, 2),
    )));
    let view = Selectors::new(Some(&data), &filters);

    let kpis = view.kpis();
    assert_eq!(kpis.revenue, 0.0);
    assert_eq!(kpis.items_sold, 0);
    assert_eq!(kpis.avg_basket, 0.0);
    assert_eq!(kpis.stock_health, 67.0);
}

#[test]
fn every_view_is_empty_without_a_dataset() {
    let filters = january();
    let view = Selectors::new(None, &filters);

    assert_eq!(view.kpis(), KpiSummary::default());
    assert!(view.filtered_sales().is_empty());
    assert!(view.top_products(5).is_empty());
    assert!(view.low_stock_items().is_empty());
    assert!(view.sales_by_category().is_empty());
    assert!(view.customer_segments().is_empty());
    assert!(view.marketing_roas().is_empty());
    assert!(view.store_leaderboard().ranked.is_empty());
    assert!(view.regional_sales().is_empty());
    assert!(view.product_mix().is_empty());
    assert!(view.inventory_overview().rows.is_empty());
    assert_eq!(view.workforce_summary(8).headcount, 0);
    assert!(view.low_stock_alerts(3, Utc::now()).is_empty());

    let finance = view.finance_summary();
    assert_eq!((finance.revenue, finance.margin), (0.0, 0.0));
    assert!(finance.records.is_empty());
}

#[test]
fn repeated_calls_return_equal_views() {
    let data = store_scenario();
    let filters = january();
    let view = Selectors::new(Some(&data), &filters);

    assert_eq!(view.kpis(), view.kpis());
    assert_eq!(view.top_products(3), view.top_products(3));
    assert_eq!(view.sales_by_category(), view.sales_by_category());
    assert_eq!(view.store_leaderboard(), view.store_leaderboard());
}

#[test]
fn low_stock_respects_store_filter_but_not_dates() {
    let data = DatasetBuilder::new()
        .store("ST0001", "HyperRetail Chicago Plaza", Region::North)
        .store("ST0002", "HyperRetail Dallas Mall", Region::South)
        .product("PRD00001", "Bread", Category::Bakery, 3.0)
        .inventory("ST0001", "PRD00001", 30, 50)
        .inventory("ST0001", "PRD00001", 0, 40)
        .inventory("ST0001", "PRD00001", 300, 20)
        .inventory("ST0002", "PRD00001", 5, 20)
        .inventory("ST0003", "PRD00404", 1, 20)
        .build();

    let far_future = FilterSpec::new(DateRange::from_days(date(2030, 1, 1), date(2030, 1, 2)));
    let view = Selectors::new(Some(&data), &far_future);
    let rows = view.low_stock_items();
    let quantities: Vec<u32> = rows.iter().map(|row| row.item.quantity).collect();
    assert_eq!(quantities, [0, 1, 5, 30]);
    assert_eq!(rows[1].product_name, "Unknown");
    assert_eq!(rows[1].store_name, "Unknown");

    let mut only_first = far_future.clone();
    only_first.merge(FilterUpdate::stores(["ST0001"]));
    let view = Selectors::new(Some(&data), &only_first);
    let rows = view.low_stock_items();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].item.status, InventoryStatus::Critical);
    assert_eq!(rows[0].store_name, "HyperRetail Chicago Plaza");

    let alerts = view.low_stock_alerts(3, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].title, "Critical Stock Alert");
    assert_eq!(alerts[1].message, "Bread at HyperRetail Chicago Plaza has only 30 units remaining");
}

#[test]
fn customer_segments_group_every_customer_by_tier() {
    let data = DatasetBuilder::new()
        .store("ST0001", "HyperRetail Chicago Plaza", Region::North)
        .customer("CUS00001", LoyaltyTier::Gold, 1_000.0)
        .customer("CUS00002", LoyaltyTier::Bronze, 50.5)
        .customer("CUS00003", LoyaltyTier::Gold, 250.25)
        .customer("CUS00004", LoyaltyTier::Bronze, 20.0)
        .build();

    let filters = january();
    let segments = Selectors::new(Some(&data), &filters).customer_segments();
    let summary: Vec<(LoyaltyTier, usize, f64)> =
        segments.iter().map(|segment| (segment.tier, segment.count, segment.total_spend)).collect();
    assert_eq!(
        summary,
        [(LoyaltyTier::Bronze, 2, 70.5), (LoyaltyTier::Gold, 2, 1_250.25)]
    );
}

#[test]
fn marketing_roas_filters_by_start_date_and_guards_zero_denominators() {
    let data = DatasetBuilder::new()
        .campaign("MKT0001", date(2024, 1, 10), 1_000.0, 3_000.0, (10_000, 200, 10))
        .campaign("MKT0002", date(2024, 1, 31), 0.0, 500.0, (0, 0, 0))
        .campaign("MKT0003", date(2024, 1, 2), 2_000.0, 10_000.0, (50_000, 1_000, 50))
        .campaign("MKT0004", date(2024, 2, 1), 1_000.0, 90_000.0, (10_000, 100, 5))
        .build();

    let filters = january();
    let campaigns = Selectors::new(Some(&data), &filters).marketing_roas();
    let ids: Vec<&str> = campaigns.iter().map(|row| row.campaign.id.as_str()).collect();
    assert_eq!(ids, ["MKT0003", "MKT0001", "MKT0002"]);

    assert_eq!(campaigns[0].roas, 5.0);
    assert_eq!(campaigns[1].ctr, 0.02);
    assert_eq!(campaigns[1].conversion_rate, 0.05);
    assert_eq!(
        (campaigns[2].roas, campaigns[2].ctr, campaigns[2].conversion_rate),
        (0.0, 0.0, 0.0)
    );
}

#[test]
fn finance_summary_totals_range_and_sorts_newest_first() {
    let data = DatasetBuilder::new()
        .finance("FIN0001", date(2024, 1, 5), 100_000.0, 60_000.0, 20_000.0)
        .finance("FIN0002", date(2024, 1, 20), 200_000.0, 110_000.0, 40_000.0)
        .finance("FIN0003", date(2023, 12, 31), 500_000.0, 300_000.0, 100_000.0)
        .build();

    let filters = january();
    let summary = Selectors::new(Some(&data), &filters).finance_summary();
    assert_eq!(summary.revenue, 300_000.0);
    assert_eq!(summary.cogs, 170_000.0);
    assert_eq!(summary.opex, 60_000.0);
    assert_eq!(summary.profit, 70_000.0);
    assert_eq!(summary.margin, 23.33);
    let ids: Vec<&str> = summary.records.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, ["FIN0002", "FIN0001"]);
}

#[test]
fn leaderboard_includes_idle_stores_and_unknown_ones() {
    let data = DatasetBuilder::new()
        .store("ST0001", "HyperRetail Chicago Plaza", Region::North)
        .store("ST0002", "HyperRetail Dallas Mall", Region::South)
        .store("ST0003", "HyperRetail Phoenix Market", Region::West)
        .product("PRD00001", "Cheese", Category::Dairy, 4.0)
        .sale_on("SL000001", "ST0002", "PRD00001", date(2024, 1, 2), 2, 8.0)
        .sale_on("SL000002", "ST0002", "PRD00001", date(2024, 1, 3), 1, 4.0)
        .sale_on("SL000003", "ST0001", "PRD00001", date(2024, 1, 4), 1, 4.0)
        .sale_on("SL000004", "ST0099", "PRD00001", date(2024, 1, 5), 10, 40.0)
        .build();

    let filters = january();
    let view = Selectors::new(Some(&data), &filters);
    let board = view.store_leaderboard();

    let ranked: Vec<(&str, f64, usize)> =
        board.ranked.iter().map(|row| (row.store_id, row.revenue, row.transactions)).collect();
    assert_eq!(
        ranked,
        [("ST0099", 40.0, 1), ("ST0002", 12.0, 2), ("ST0001", 4.0, 1), ("ST0003", 0.0, 0)]
    );
    assert_eq!(board.ranked[0].name, "Unknown");
    assert_eq!(board.top(2).len(), 2);
    let bottom: Vec<&str> = board.bottom(2).iter().map(|row| row.store_id).collect();
    assert_eq!(bottom, ["ST0003", "ST0001"]);

    let regions: Vec<(&str, f64)> =
        view.regional_sales().iter().map(|row| (row.region, row.revenue)).collect();
    assert_eq!(regions, [("Unknown", 40.0), ("South", 12.0), ("North", 4.0)]);
}

#[test]
fn department_snapshot_replaces_the_category_filter() {
    let mut builder = DatasetBuilder::new()
        .store("ST0001", "HyperRetail Chicago Plaza", Region::North)
        .product_in("PRD00001", Category::Electronics, "Mobile")
        .product_in("PRD00002", Category::Electronics, "Audio")
        .product_in("PRD00003", Category::Bakery, "Bread");
    for day in 1..=16 {
        let id = format!("SL{day:06}");
        builder = builder.sale_on(&id, "ST0001", "PRD00001", date(2024, 1, day), 1, 10.0);
    }
    let data = builder
        .sale_on("SL000100", "ST0001", "PRD00002", date(2024, 1, 16), 3, 45.0)
        .sale_on("SL000101", "ST0001", "PRD00003", date(2024, 1, 16), 2, 6.0)
        .build();

    let filters = with_filters(FilterUpdate::categories([Category::Bakery]));
    let snapshot = Selectors::new(Some(&data), &filters).department_snapshot(Category::Electronics);

    assert_eq!(snapshot.revenue, 205.0);
    assert_eq!(snapshot.units, 19);
    assert_eq!(snapshot.transactions, 17);
    assert_eq!(snapshot.average_item_value, 10.79);

    assert_eq!(snapshot.daily_revenue.len(), 14);
    assert_eq!(snapshot.daily_revenue[0].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    assert_eq!(snapshot.daily_revenue[13].revenue, 55.0);

    let subs: Vec<(&str, f64, u64)> = snapshot
        .sub_categories
        .iter()
        .map(|row| (row.sub_category, row.revenue, row.units))
        .collect();
    assert_eq!(subs, [("Mobile", 160.0, 16), ("Audio", 45.0, 3)]);
}

#[test]
fn inventory_overview_joins_suppliers_with_sentinels() {
    let data = DatasetBuilder::new()
        .supplier("SUP0001", "Granite Trading", &[Category::Meat])
        .store("ST0001", "HyperRetail Chicago Plaza", Region::North)
        .product("PRD00001", "Bacon", Category::Meat, 7.0)
        .inventory("ST0001", "PRD00001", 100, 50)
        .inventory("ST0001", "PRD00001", 0, 50)
        .inventory("ST0001", "PRD00009", 400, 50)
        .build();

    let filters = january();
    let view = Selectors::new(Some(&data), &filters);
    let overview = view.inventory_overview();

    assert_eq!(overview.rows.len(), 3);
    assert_eq!(overview.rows[0].supplier_name, "Granite Trading");
    assert_eq!(overview.rows[0].lead_time, 5);
    assert_eq!(overview.rows[2].supplier_name, "Unknown");
    assert_eq!(overview.rows[2].lead_time, 0);
    assert_eq!(overview.status_counts.healthy, 1);
    assert_eq!(overview.status_counts.critical, 1);
    assert_eq!(overview.status_counts.overstock, 1);
    assert_eq!(overview.status_counts.total(), 3);

    let mix = view.product_mix();
    assert_eq!(mix.len(), 1);
    assert_eq!((mix[0].category, mix[0].products), (Category::Meat, 1));
}

#[test]
fn workforce_summary_ranks_departments_and_performers() {
    let data = DatasetBuilder::new()
        .store("ST0001", "HyperRetail Chicago Plaza", Region::North)
        .employee("EMP0001", "ST0001", "Bakery", 40_000, 4.0)
        .employee("EMP0002", "ST0001", "Security", 30_000, 3.0)
        .employee("EMP0003", "ST0001", "Bakery", 35_000, 5.0)
        .employee("EMP0004", "ST0404", "Dairy", 45_000, 4.5)
        .build();

    let filters = january();
    let summary = Selectors::new(Some(&data), &filters).workforce_summary(2);

    assert_eq!(summary.headcount, 4);
    assert_eq!(summary.avg_salary, 37_500.0);
    assert_eq!(summary.avg_performance, 4.13);
    assert_eq!(summary.departments[0].department, "Bakery");
    assert_eq!(summary.departments[0].count, 2);
    assert_eq!(summary.departments[0].avg_performance, 4.5);

    let top: Vec<&str> =
        summary.top_performers.iter().map(|row| row.employee.id.as_str()).collect();
    assert_eq!(top, ["EMP0003", "EMP0004"]);
    assert_eq!(summary.top_performers[1].store_name, "Unknown");
}

#[test]
fn views_serialize_with_dashboard_field_names() {
    let data = store_scenario();
    let filters = january();
    let view = Selectors::new(Some(&data), &filters);

    let kpis = serde_json::to_value(view.kpis()).unwrap();
    assert!(kpis.get("avgBasket").is_some() && kpis.get("stockHealth").is_some());

    let low = serde_json::to_value(view.low_stock_items()).unwrap();
    assert_eq!(low[0]["productName"], "Whole Milk");
    assert_eq!(low[0]["reorderLevel"], 50);
    assert_eq!(low[0]["status"], "low");
}
