use std::collections::HashSet;

use retailscope_core::config::{DatasetCounts, GeneratorConfig};
use retailscope_core::domain::dataset::COLLECTIONS;
use retailscope_core::domain::inventory::InventoryStatus;
use retailscope_core::domain::operations::FinanceRecord;
use retailscope_core::domain::sales::Sale;
use retailscope_core::{Dataset, DatasetGenerator, DatasetWriter, GenerationError};

fn small_plan(seed: u64) -> GeneratorConfig {
    GeneratorConfig {
        seed,
        counts: DatasetCounts {
            suppliers: 10,
            stores: 5,
            products: 40,
            customers: 30,
            employees: 20,
            sales: 200,
            returns: 20,
            footfall: 25,
            marketing: 10,
            finance: 15,
        },
        inventory_store_limit: 3,
        inventory_items_min: 5,
        inventory_items_max: 10,
        ..GeneratorConfig::default()
    }
}

fn generate(config: &GeneratorConfig) -> Dataset {
    DatasetGenerator::new(config).and_then(|mut generator| generator.generate()).unwrap()
}

#[test]
fn same_seed_and_clock_produce_identical_bytes() {
    let first = generate(&small_plan(7));
    let second = generate(&small_plan(7));
    assert_eq!(first, second);
    assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());

    let other = generate(&small_plan(8));
    assert_ne!(first.sales, other.sales);
}

#[test]
fn generated_dataset_passes_every_integrity_check() {
    let dataset = generate(&small_plan(42));
    let report = dataset.verify();
    assert!(report.all_passed(), "failed checks: {:?}", report.failed_checks());
}

#[test]
fn collections_follow_the_plan() {
    let config = small_plan(3);
    let dataset = generate(&config);

    assert_eq!(dataset.suppliers.len(), 10);
    assert_eq!(dataset.stores.len(), 5);
    assert_eq!(dataset.products.len(), 40);
    assert_eq!(dataset.sales.len(), 200);
    assert_eq!(dataset.returns.len(), 20);
    assert_eq!(dataset.finance.len(), 15);

    let stocked: HashSet<&str> =
        dataset.inventory.iter().map(|item| item.store_id.as_str()).collect();
    assert!(stocked.len() <= 3);
    assert!((15..=30).contains(&dataset.inventory.len()));

    assert_eq!(dataset.metadata.total_records, dataset.record_count());
    assert_eq!(dataset.metadata.generated, config.reference_time);
    assert_eq!(dataset.metadata.version, "1.0.0");
}

#[test]
fn derived_fields_are_consistent_with_their_inputs() {
    let dataset = generate(&small_plan(11));

    for sale in &dataset.sales {
        assert_eq!(sale.total, Sale::line_total(sale.unit_price, sale.quantity, sale.discount));
        assert!(sale.transaction_date <= dataset.metadata.generated);
    }
    for item in &dataset.inventory {
        assert_eq!(item.status, InventoryStatus::classify(item.quantity, item.reorder_level));
    }
    for record in &dataset.finance {
        let profit =
            FinanceRecord::profit_for(record.revenue, record.cogs, record.operating_expenses);
        assert_eq!(record.profit, profit);
        assert_eq!(record.margin, FinanceRecord::margin_for(profit, record.revenue));
    }
    for campaign in &dataset.marketing {
        assert!(campaign.end_date >= campaign.start_date);
        assert!(campaign.clicks <= campaign.impressions);
        assert!(campaign.conversions <= campaign.clicks);
    }
}

#[test]
fn sales_without_products_are_a_precondition_failure() {
    let mut config = small_plan(5);
    config.counts.products = 0;
    config.counts.suppliers = 0;
    config.counts.returns = 0;

    let error = DatasetGenerator::new(&config)
        .and_then(|mut generator| generator.generate())
        .expect_err("sales need products");
    assert!(matches!(error, GenerationError::Precondition(_)), "{error}");
}

#[test]
fn writer_emits_every_collection_and_a_loadable_merged_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_plan(21);
    let mut writer = DatasetWriter::new(dir.path());
    let dataset = DatasetGenerator::new(&config)
        .and_then(|mut generator| generator.generate_with_sink(&mut writer))
        .unwrap();

    assert_eq!(writer.written().len(), COLLECTIONS.len() + 1);
    for name in COLLECTIONS {
        let raw = std::fs::read_to_string(writer.collection_path(name)).unwrap();
        let records: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let expected = dataset
            .collection_counts()
            .iter()
            .find(|(collection, _)| *collection == name)
            .map(|(_, count)| *count)
            .unwrap();
        assert_eq!(records.as_array().map(Vec::len), Some(expected), "collection {name}");
    }

    let merged = writer.merged_path();
    assert_eq!(writer.written().last(), Some(&merged));
    let loaded = Dataset::load(&merged).unwrap();
    assert_eq!(loaded.collection_counts(), dataset.collection_counts());
    assert_eq!(loaded.sales.last().map(|sale| &sale.id), dataset.sales.last().map(|sale| &sale.id));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&merged).unwrap()).unwrap();
    assert_eq!(raw["metadata"]["totalRecords"], dataset.record_count());
    assert_eq!(raw["metadata"]["generated"], "2025-01-01T00:00:00.000Z");
}
