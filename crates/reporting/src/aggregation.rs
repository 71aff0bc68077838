//! Per-family statistics over pre-fetched collections.
//!
//! Relationships are resolved by grouping child rows on their foreign id
//! (arena + index), never by walking object graphs. All functions are pure.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;
use serde::Serialize;

use northwind_core::{Entity, Money};
use northwind_parties::{Customer, CustomerId, Employee, EmployeeId, Supplier, SupplierId};
use northwind_products::{Category, CategoryId, Product};
use northwind_sales::Order;

/// Label used for a null grouping key.
pub const UNKNOWN_LABEL: &str = "Unknown";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Every entity sharing an extreme value, in id order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ties<T> {
    pub value: T,
    pub names: Vec<String>,
}

/// A labelled count, the unit every bar chart is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

impl LabelCount {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Chart input for a list of labelled counts, preserving order.
pub fn chart_data(entries: &[LabelCount]) -> Vec<(&str, u64)> {
    entries.iter().map(|e| (e.label.as_str(), e.count)).collect()
}

fn count_by<T, K, F>(items: &[T], key: F) -> HashMap<K, u64>
where
    K: Eq + Hash,
    F: Fn(&T) -> Option<K>,
{
    let mut counts = HashMap::new();
    for item in items {
        if let Some(k) = key(item) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts
}

/// Entities tied at the maximum (`want_max`) or minimum of `value`.
fn ties<'a, T, V, F, N>(items: &'a [T], value: F, name: N, want_max: bool) -> Option<Ties<V>>
where
    V: Ord + Copy,
    F: Fn(&'a T) -> Option<V>,
    N: Fn(&'a T) -> String,
{
    let values = items.iter().filter_map(|item| value(item));
    let extreme = if want_max { values.max()? } else { values.min()? };

    let names = items
        .iter()
        .filter(|item| value(*item) == Some(extreme))
        .map(name)
        .collect();
    Some(Ties {
        value: extreme,
        names,
    })
}

/// Sort by count descending, then label ascending.
fn sort_ranked(entries: &mut [LabelCount]) {
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
}

/// Mean of cent amounts, rounded to the nearest cent.
fn average_money(values: &[Money]) -> Option<Money> {
    if values.is_empty() {
        return None;
    }
    let total: u128 = values.iter().map(|m| u128::from(m.cents())).sum();
    let n = values.len() as u128;
    Some(Money::from_cents(((total + n / 2) / n) as u64))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductStats {
    pub total: usize,
    /// Mean over priced products; `None` when no product has a price.
    pub average_price: Option<Money>,
    pub discontinued: usize,
    pub most_expensive: Option<Ties<Money>>,
    pub least_expensive: Option<Ties<Money>>,
    /// Every category in id order, including empty ones.
    pub per_category: Vec<LabelCount>,
    /// Whole currency units of every product, unpriced ones as 0.
    pub price_distribution: Vec<i64>,
}

pub fn product_stats(categories: &[Category], products: &[Product]) -> ProductStats {
    let prices: Vec<Money> = products.iter().filter_map(Product::unit_price).collect();
    let per_category_counts: HashMap<CategoryId, u64> =
        count_by(products, |p| Some(p.category_id()));

    ProductStats {
        total: products.len(),
        average_price: average_money(&prices),
        discontinued: products.iter().filter(|p| p.is_discontinued()).count(),
        most_expensive: ties(products, Product::unit_price, |p| p.name().to_string(), true),
        least_expensive: ties(products, Product::unit_price, |p| p.name().to_string(), false),
        per_category: categories
            .iter()
            .map(|c| {
                let count = per_category_counts.get(&c.id()).copied().unwrap_or(0);
                LabelCount::new(c.name(), count)
            })
            .collect(),
        price_distribution: products
            .iter()
            .map(|p| p.unit_price().unwrap_or(Money::ZERO).whole_units())
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub total: usize,
    pub most_products: Option<Ties<u64>>,
    pub fewest_products: Option<Ties<u64>>,
}

pub fn category_stats(categories: &[Category], products: &[Product]) -> CategoryStats {
    let counts: HashMap<CategoryId, u64> = count_by(products, |p| Some(p.category_id()));
    let product_count = |c: &Category| Some(counts.get(&c.id()).copied().unwrap_or(0));
    let name = |c: &Category| c.name().to_string();

    CategoryStats {
        total: categories.len(),
        most_products: ties(categories, product_count, name, true),
        fewest_products: ties(categories, product_count, name, false),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStats {
    pub total: usize,
    /// Mean of per-order gross values (`Σ price × quantity`).
    pub average_value: Option<Money>,
    pub largest_value: Option<Money>,
    pub smallest_value: Option<Money>,
    pub total_gross: Money,
    pub total_net: Money,
    pub total_discount: Money,
    /// Orders per calendar month across all years; undated orders are skipped.
    pub per_month: Vec<LabelCount>,
    /// Whole currency units of every order's gross value.
    pub value_distribution: Vec<i64>,
}

pub fn order_stats(orders: &[Order]) -> OrderStats {
    let values: Vec<Money> = orders.iter().map(Order::gross_value).collect();
    let total_gross: Money = values.iter().sum();
    let total_net: Money = orders.iter().map(Order::net_value).sum();

    let mut months: Vec<(u32, u64)> = count_by(orders, Order::order_month).into_iter().collect();
    months.sort_unstable();

    OrderStats {
        total: orders.len(),
        average_value: average_money(&values),
        largest_value: values.iter().copied().max(),
        smallest_value: values.iter().copied().min(),
        total_gross,
        total_net,
        total_discount: total_gross.saturating_sub(total_net),
        per_month: months
            .into_iter()
            .filter_map(|(month, count)| {
                let label = MONTH_ABBREVIATIONS.get(month.checked_sub(1)? as usize)?;
                Some(LabelCount::new(*label, count))
            })
            .collect(),
        value_distribution: values.iter().map(|m| m.whole_units()).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryCount {
    /// `None` groups customers with no recorded country.
    pub country: Option<String>,
    pub count: u64,
}

impl CountryCount {
    pub fn label(&self) -> &str {
        self.country.as_deref().unwrap_or(UNKNOWN_LABEL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerStats {
    pub total: usize,
    /// Highest order counts first; ties broken by company name, then id.
    pub top_customers: Vec<LabelCount>,
    /// Largest groups first, then by country name; the null group sorts last
    /// among equals.
    pub by_country: Vec<CountryCount>,
    /// Customers with at least one order.
    pub orders_per_customer: Vec<LabelCount>,
}

pub fn customer_stats(customers: &[Customer], orders: &[Order], top_n: usize) -> CustomerStats {
    let order_counts: HashMap<CustomerId, u64> = count_by(orders, Order::customer_id);

    let mut ranked: Vec<(&Customer, u64)> = customers
        .iter()
        .map(|c| (c, order_counts.get(&c.id()).copied().unwrap_or(0)))
        .collect();
    ranked.sort_by(|(a, a_count), (b, b_count)| {
        b_count
            .cmp(a_count)
            .then_with(|| a.company_name().cmp(b.company_name()))
            .then_with(|| a.id().cmp(&b.id()))
    });

    let mut countries: HashMap<Option<&str>, u64> = HashMap::new();
    for customer in customers {
        *countries.entry(customer.country()).or_insert(0) += 1;
    }
    let mut by_country: Vec<CountryCount> = countries
        .into_iter()
        .map(|(country, count)| CountryCount {
            country: country.map(String::from),
            count,
        })
        .collect();
    by_country.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.country.is_none().cmp(&b.country.is_none()))
            .then_with(|| a.country.cmp(&b.country))
    });

    CustomerStats {
        total: customers.len(),
        top_customers: ranked
            .iter()
            .take(top_n)
            .map(|(c, count)| LabelCount::new(c.company_name(), *count))
            .collect(),
        by_country,
        orders_per_customer: ranked
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(c, count)| LabelCount::new(c.company_name(), *count))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeStats {
    pub total: usize,
    pub most_orders: Option<Ties<u64>>,
    /// Mean tenure in years over employees with a hire date.
    pub average_tenure_years: Option<f64>,
    /// Whole years of tenure, truncated.
    pub tenure_distribution: Vec<i64>,
}

pub fn employee_stats(employees: &[Employee], orders: &[Order], as_of: NaiveDate) -> EmployeeStats {
    let order_counts: HashMap<EmployeeId, u64> = count_by(orders, Order::employee_id);
    let tenures: Vec<f64> = employees
        .iter()
        .filter_map(|e| e.tenure_years(as_of))
        .collect();

    let average_tenure_years =
        (!tenures.is_empty()).then(|| tenures.iter().sum::<f64>() / tenures.len() as f64);

    EmployeeStats {
        total: employees.len(),
        most_orders: ties(
            employees,
            |e| Some(order_counts.get(&e.id()).copied().unwrap_or(0)),
            Employee::full_name,
            true,
        ),
        average_tenure_years,
        tenure_distribution: tenures.iter().map(|t| t.trunc() as i64).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierStats {
    pub total: usize,
    /// Largest catalogues first, then by company name.
    pub products_per_supplier: Vec<LabelCount>,
}

pub fn supplier_stats(suppliers: &[Supplier], products: &[Product]) -> SupplierStats {
    let counts: HashMap<SupplierId, u64> = count_by(products, |p| Some(p.supplier_id()));

    let mut products_per_supplier: Vec<LabelCount> = suppliers
        .iter()
        .map(|s| LabelCount::new(s.company_name(), counts.get(&s.id()).copied().unwrap_or(0)))
        .collect();
    sort_ranked(&mut products_per_supplier);

    SupplierStats {
        total: suppliers.len(),
        products_per_supplier,
    }
}

#[cfg(test)]
mod tests {
    use northwind_parties::SupplierId;
    use northwind_products::ProductId;
    use northwind_sales::{Discount, OrderDetail, OrderId};

    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category::new(CategoryId(id), name).unwrap()
    }

    fn product(id: i64, category: i64, supplier: i64, cents: Option<u64>) -> Product {
        Product::new(ProductId(id), format!("P{id}"), CategoryId(category), SupplierId(supplier))
            .unwrap()
            .with_unit_price(cents.map(Money::from_cents))
    }

    fn order(id: i64, customer: Option<i64>, lines: &[(u64, u16, f64)]) -> Order {
        let mut order = Order::new(OrderId(id)).with_customer(customer.map(CustomerId));
        for (cents, qty, discount) in lines {
            order.push_detail(
                OrderDetail::new(
                    ProductId(1),
                    Money::from_cents(*cents),
                    *qty,
                    Discount::new(*discount).unwrap(),
                )
                .unwrap(),
            );
        }
        order
    }

    #[test]
    fn average_price_excludes_missing_prices() {
        let categories = [category(1, "Beverages")];
        let products = [
            product(1, 1, 1, Some(1000)),
            product(2, 1, 1, None),
            product(3, 1, 1, Some(2001)),
        ];

        let stats = product_stats(&categories, &products);
        assert_eq!(stats.average_price, Some(Money::from_cents(1501)));
        assert_eq!(stats.price_distribution, vec![10, 0, 20]);
        assert_eq!(stats.price_distribution.len(), stats.total);
    }

    #[test]
    fn average_price_of_unpriced_catalog_is_none() {
        let products = [product(1, 1, 1, None), product(2, 1, 1, None)];
        let stats = product_stats(&[category(1, "Beverages")], &products);

        assert_eq!(stats.average_price, None);
        assert_eq!(stats.most_expensive, None);
        assert_eq!(stats.price_distribution, vec![0, 0]);
    }

    #[test]
    fn price_extremes_report_every_tie() {
        let products = [
            product(1, 1, 1, Some(500)),
            product(2, 1, 1, Some(900)),
            product(3, 1, 1, Some(900)),
            product(4, 1, 1, Some(500)),
        ];
        let stats = product_stats(&[], &products);

        let most = stats.most_expensive.unwrap();
        assert_eq!(most.value, Money::from_cents(900));
        assert_eq!(most.names, vec!["P2", "P3"]);
        assert_eq!(stats.least_expensive.unwrap().names, vec!["P1", "P4"]);
    }

    #[test]
    fn products_per_category_keeps_empty_categories() {
        let categories = [category(1, "Beverages"), category(2, "Produce")];
        let products = [product(1, 1, 1, None), product(2, 1, 1, None)];

        let stats = product_stats(&categories, &products);
        assert_eq!(
            stats.per_category,
            vec![LabelCount::new("Beverages", 2), LabelCount::new("Produce", 0)]
        );
    }

    #[test]
    fn category_with_most_products_returns_all_ties() {
        let categories = [category(1, "Beverages"), category(2, "Condiments"), category(3, "Produce")];
        let mut products = Vec::new();
        for id in 0..12 {
            products.push(product(id, 1, 1, None));
            products.push(product(100 + id, 2, 1, None));
        }
        products.push(product(500, 3, 1, None));

        let stats = category_stats(&categories, &products);
        let most = stats.most_products.unwrap();
        assert_eq!(most.value, 12);
        assert_eq!(most.names, vec!["Beverages", "Condiments"]);

        let fewest = stats.fewest_products.unwrap();
        assert_eq!(fewest.value, 1);
        assert_eq!(fewest.names, vec!["Produce"]);
    }

    #[test]
    fn no_categories_have_no_extremes() {
        let stats = category_stats(&[], &[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.most_products, None);
        assert_eq!(stats.fewest_products, None);
    }

    #[test]
    fn order_values_are_gross_with_net_reported_separately() {
        let orders = [
            order(1, Some(1), &[(1000, 2, 0.5)]),
            order(2, Some(1), &[(500, 1, 0.0), (250, 4, 0.0)]),
            order(3, None, &[]),
        ];

        let stats = order_stats(&orders);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.largest_value, Some(Money::from_cents(2000)));
        assert_eq!(stats.smallest_value, Some(Money::ZERO));
        assert_eq!(stats.average_value, Some(Money::from_cents(1167)));
        assert_eq!(stats.total_gross, Money::from_cents(3500));
        assert_eq!(stats.total_net, Money::from_cents(2500));
        assert_eq!(stats.total_discount, Money::from_cents(1000));
        assert_eq!(stats.value_distribution, vec![20, 15, 0]);
    }

    #[test]
    fn no_orders_have_no_value_extremes() {
        let stats = order_stats(&[]);
        assert_eq!(stats.average_value, None);
        assert_eq!(stats.largest_value, None);
        assert!(stats.per_month.is_empty());
    }

    #[test]
    fn orders_per_month_groups_across_years_in_month_order() {
        let dated = |id, y, m| {
            Order::new(OrderId(id)).with_order_date(NaiveDate::from_ymd_opt(y, m, 1))
        };
        let orders = [
            dated(1, 1996, 12),
            dated(2, 1997, 1),
            dated(3, 1996, 1),
            Order::new(OrderId(4)),
        ];

        let stats = order_stats(&orders);
        assert_eq!(
            stats.per_month,
            vec![LabelCount::new("Jan", 2), LabelCount::new("Dec", 1)]
        );
    }

    #[test]
    fn top_customers_break_ties_by_name() {
        let customers = [
            Customer::new(CustomerId(1), "Zeta").unwrap(),
            Customer::new(CustomerId(2), "Alpha").unwrap(),
            Customer::new(CustomerId(3), "Mid").unwrap(),
        ];
        let orders = [
            order(1, Some(1), &[]),
            order(2, Some(2), &[]),
            order(3, Some(3), &[]),
            order(4, Some(3), &[]),
        ];

        let stats = customer_stats(&customers, &orders, 2);
        assert_eq!(
            stats.top_customers,
            vec![LabelCount::new("Mid", 2), LabelCount::new("Alpha", 1)]
        );
        assert_eq!(stats.orders_per_customer.len(), 3);
    }

    #[test]
    fn customers_without_orders_are_left_out_of_orders_per_customer() {
        let customers = [
            Customer::new(CustomerId(1), "Busy").unwrap(),
            Customer::new(CustomerId(2), "Idle").unwrap(),
        ];
        let stats = customer_stats(&customers, &[order(1, Some(1), &[])], 5);

        assert_eq!(stats.top_customers.len(), 2);
        assert_eq!(stats.orders_per_customer, vec![LabelCount::new("Busy", 1)]);
    }

    #[test]
    fn missing_country_is_its_own_group() {
        let customers = [
            Customer::new(CustomerId(1), "A").unwrap().with_country(Some("UK".into())),
            Customer::new(CustomerId(2), "B").unwrap(),
            Customer::new(CustomerId(3), "C").unwrap().with_country(Some("UK".into())),
            Customer::new(CustomerId(4), "D").unwrap().with_country(Some("Mexico".into())),
        ];

        let stats = customer_stats(&customers, &[], 5);
        let labels: Vec<(&str, u64)> = stats.by_country.iter().map(|c| (c.label(), c.count)).collect();
        assert_eq!(labels, vec![("UK", 2), ("Mexico", 1), (UNKNOWN_LABEL, 1)]);
    }

    #[test]
    fn employee_tenure_skips_missing_hire_dates() {
        let as_of = NaiveDate::from_ymd_opt(2000, 6, 1).unwrap();
        let employees = [
            Employee::new(EmployeeId(1), "Nancy", "Davolio")
                .unwrap()
                .with_hire_date(NaiveDate::from_ymd_opt(1990, 1, 1)),
            Employee::new(EmployeeId(2), "Andrew", "Fuller")
                .unwrap()
                .with_hire_date(NaiveDate::from_ymd_opt(1995, 1, 1)),
            Employee::new(EmployeeId(3), "Margaret", "Peacock").unwrap(),
        ];
        let orders = [
            Order::new(OrderId(1)).with_employee(Some(EmployeeId(1))),
            Order::new(OrderId(2)).with_employee(Some(EmployeeId(2))),
        ];

        let stats = employee_stats(&employees, &orders, as_of);
        assert_eq!(stats.tenure_distribution, vec![10, 5]);
        let average = stats.average_tenure_years.unwrap();
        // 3804 and 1978 days of service.
        assert!((average - 7.915).abs() < 0.01, "average was {average}");

        let most = stats.most_orders.unwrap();
        assert_eq!(most.value, 1);
        assert_eq!(most.names, vec!["Nancy Davolio", "Andrew Fuller"]);
    }

    #[test]
    fn employees_without_hire_dates_have_no_average_tenure() {
        let as_of = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let employees = [Employee::new(EmployeeId(1), "Nancy", "Davolio").unwrap()];

        let stats = employee_stats(&employees, &[], as_of);
        assert_eq!(stats.average_tenure_years, None);
        assert!(stats.tenure_distribution.is_empty());
    }

    #[test]
    fn suppliers_rank_by_product_count_then_name() {
        let suppliers = [
            Supplier::new(SupplierId(1), "Exotic Liquids").unwrap(),
            Supplier::new(SupplierId(2), "Bigfoot Breweries").unwrap(),
            Supplier::new(SupplierId(3), "Cooperativa").unwrap(),
        ];
        let products = [product(1, 1, 3, None), product(2, 1, 1, None), product(3, 1, 2, None), product(4, 1, 3, None)];

        let stats = supplier_stats(&suppliers, &products);
        assert_eq!(
            stats.products_per_supplier,
            vec![
                LabelCount::new("Cooperativa", 2),
                LabelCount::new("Bigfoot Breweries", 1),
                LabelCount::new("Exotic Liquids", 1),
            ]
        );
    }
}
