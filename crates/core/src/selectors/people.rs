//! Customer and staff views. Both read whole collections; the sales filters
//! do not apply.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::money::{ratio_or_zero, round2};
use crate::domain::people::{Employee, LoyaltyTier};
use crate::selectors::resolve::{rollup_label, OrderedGroups};
use crate::selectors::{descending, Selectors};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSegment {
    pub tier: LoyaltyTier,
    pub count: usize,
    pub total_spend: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRow<'a> {
    #[serde(flatten)]
    pub employee: &'a Employee,
    pub store_name: &'a str,
    pub city: &'a str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStaffing<'a> {
    pub department: &'a str,
    pub count: usize,
    pub avg_performance: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkforceSummary<'a> {
    pub headcount: usize,
    pub avg_salary: f64,
    pub avg_performance: f64,
    pub departments: Vec<DepartmentStaffing<'a>>,
    pub top_performers: Vec<StaffRow<'a>>,
}

impl<'a> Selectors<'a> {
    /// Customer count and spend per loyalty tier, bronze first. Tiers with no
    /// customers are omitted.
    pub fn customer_segments(&self) -> Vec<CustomerSegment> {
        let mut tiers: BTreeMap<LoyaltyTier, CustomerSegment> = BTreeMap::new();
        for customer in self.data.iter().flat_map(|data| data.customers.iter()) {
            let segment = tiers.entry(customer.loyalty_tier).or_insert(CustomerSegment {
                tier: customer.loyalty_tier,
                count: 0,
                total_spend: 0.0,
            });
            segment.count += 1;
            segment.total_spend += customer.total_spend;
        }
        tiers
            .into_values()
            .map(|segment| CustomerSegment { total_spend: round2(segment.total_spend), ..segment })
            .collect()
    }

    /// Headcount and averages, departments by size, and the `top_performers`
    /// highest-rated staff.
    pub fn workforce_summary(&self, top_performers: usize) -> WorkforceSummary<'a> {
        let Some(data) = self.data else {
            return WorkforceSummary::default();
        };
        let staff = &data.employees;
        let headcount = staff.len();

        let mut departments = OrderedGroups::new();
        for employee in staff {
            let entry = departments.entry(employee.department.as_str(), || {
                (employee.department.as_str(), 0_usize, 0.0_f64)
            });
            entry.1 += 1;
            entry.2 += employee.performance;
        }
        let mut departments: Vec<DepartmentStaffing<'a>> = departments
            .into_values()
            .into_iter()
            .map(|(department, count, performance)| DepartmentStaffing {
                department,
                count,
                avg_performance: round2(ratio_or_zero(performance, count as f64)),
            })
            .collect();
        departments.sort_by(|left, right| right.count.cmp(&left.count));

        let mut ranked: Vec<&'a Employee> = staff.iter().collect();
        ranked.sort_by(|left, right| descending(left.performance, right.performance));
        let top_performers = ranked
            .into_iter()
            .take(top_performers)
            .map(|employee| {
                let store = self.lookup.store(&employee.store_id);
                StaffRow {
                    employee,
                    store_name: rollup_label(store.map(|store| store.name.as_str())),
                    city: rollup_label(store.map(|store| store.city.as_str())),
                }
            })
            .collect();

        let salaries: f64 = staff.iter().map(|employee| f64::from(employee.salary)).sum();
        let performance: f64 = staff.iter().map(|employee| employee.performance).sum();
        WorkforceSummary {
            headcount,
            avg_salary: round2(ratio_or_zero(salaries, headcount as f64)),
            avg_performance: round2(ratio_or_zero(performance, headcount as f64)),
            departments,
            top_performers,
        }
    }
}
