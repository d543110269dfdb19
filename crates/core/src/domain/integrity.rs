//! Post-hoc verification of a dataset: schema, uniqueness, and foreign keys.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::dataset::Dataset;
use crate::domain::schema::Schema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntegrityCheck {
    pub name: &'static str,
    pub passed: bool,
    pub failures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_failure: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub checks: Vec<IntegrityCheck>,
}

impl IntegrityReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }

    pub fn failed_checks(&self) -> Vec<&'static str> {
        self.checks.iter().filter_map(|check| (!check.passed).then_some(check.name)).collect()
    }

    fn record(&mut self, name: &'static str, failures: Vec<String>) {
        self.checks.push(IntegrityCheck {
            name,
            passed: failures.is_empty(),
            failures: failures.len(),
            first_failure: failures.into_iter().next(),
        });
    }
}

impl Dataset {
    /// Re-validates every record and foreign key; see [`verify`].
    pub fn verify(&self) -> IntegrityReport {
        verify(self)
    }
}

pub fn verify(dataset: &Dataset) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    let mut schema = Vec::new();
    collect_schema_failures(&dataset.suppliers, &mut schema);
    collect_schema_failures(&dataset.stores, &mut schema);
    collect_schema_failures(&dataset.products, &mut schema);
    collect_schema_failures(&dataset.customers, &mut schema);
    collect_schema_failures(&dataset.employees, &mut schema);
    collect_schema_failures(&dataset.sales, &mut schema);
    collect_schema_failures(&dataset.inventory, &mut schema);
    collect_schema_failures(&dataset.returns, &mut schema);
    collect_schema_failures(&dataset.footfall, &mut schema);
    collect_schema_failures(&dataset.marketing, &mut schema);
    collect_schema_failures(&dataset.finance, &mut schema);
    report.record("schema", schema);

    let mut duplicates = Vec::new();
    collect_duplicates(&dataset.suppliers, &mut duplicates);
    collect_duplicates(&dataset.stores, &mut duplicates);
    collect_duplicates(&dataset.products, &mut duplicates);
    collect_duplicates(&dataset.customers, &mut duplicates);
    collect_duplicates(&dataset.employees, &mut duplicates);
    collect_duplicates(&dataset.sales, &mut duplicates);
    collect_duplicates(&dataset.inventory, &mut duplicates);
    collect_duplicates(&dataset.returns, &mut duplicates);
    collect_duplicates(&dataset.footfall, &mut duplicates);
    collect_duplicates(&dataset.marketing, &mut duplicates);
    collect_duplicates(&dataset.finance, &mut duplicates);
    report.record("unique-ids", duplicates);

    let suppliers = id_set(&dataset.suppliers);
    let stores = id_set(&dataset.stores);
    let products = id_set(&dataset.products);
    let customers = id_set(&dataset.customers);
    let sales = id_set(&dataset.sales);

    report.record(
        "product-supplier",
        dangling(&dataset.products, &suppliers, |product| Some(product.supplier_id.as_str())),
    );
    report.record(
        "customer-store",
        dangling(&dataset.customers, &stores, |customer| Some(customer.preferred_store.as_str())),
    );
    report.record(
        "employee-store",
        dangling(&dataset.employees, &stores, |employee| Some(employee.store_id.as_str())),
    );
    report.record(
        "sale-store",
        dangling(&dataset.sales, &stores, |sale| Some(sale.store_id.as_str())),
    );
    report.record(
        "sale-product",
        dangling(&dataset.sales, &products, |sale| Some(sale.product_id.as_str())),
    );
    report.record(
        "sale-customer",
        dangling(&dataset.sales, &customers, |sale| {
            sale.customer_id.as_ref().map(|id| id.as_str())
        }),
    );
    report.record(
        "inventory-store",
        dangling(&dataset.inventory, &stores, |item| Some(item.store_id.as_str())),
    );
    report.record(
        "inventory-product",
        dangling(&dataset.inventory, &products, |item| Some(item.product_id.as_str())),
    );
    report.record(
        "return-sale",
        dangling(&dataset.returns, &sales, |entry| Some(entry.sale_id.as_str())),
    );
    report.record(
        "footfall-store",
        dangling(&dataset.footfall, &stores, |entry| Some(entry.store_id.as_str())),
    );

    let actual = dataset.record_count();
    let declared = dataset.metadata.total_records;
    let totals = if actual == declared {
        Vec::new()
    } else {
        vec![format!("metadata declares {declared} records, collections hold {actual}")]
    };
    report.record("total-records", totals);

    report
}

fn collect_schema_failures<T: Schema>(records: &[T], failures: &mut Vec<String>) {
    failures.extend(
        records
            .iter()
            .filter_map(|record| record.validate().err())
            .map(|violation| violation.to_string()),
    );
}

fn collect_duplicates<T: Schema>(records: &[T], failures: &mut Vec<String>) {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.record_id()) {
            failures.push(format!("{} `{}` appears more than once", T::ENTITY, record.record_id()));
        }
    }
}

fn id_set<T: Schema>(records: &[T]) -> HashSet<&str> {
    records.iter().map(Schema::record_id).collect()
}

fn dangling<'a, T, F>(records: &'a [T], targets: &HashSet<&str>, key: F) -> Vec<String>
where
    T: Schema,
    F: Fn(&'a T) -> Option<&'a str>,
{
    records
        .iter()
        .filter_map(|record| {
            let target = key(record)?;
            (!targets.contains(target)).then(|| {
                format!("{} `{}` references missing `{target}`", T::ENTITY, record.record_id())
            })
        })
        .collect()
}
