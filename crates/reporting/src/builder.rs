use northwind_core::Money;
use northwind_infra::{DataStore, StoreResult};

use crate::aggregation::{
    self, CategoryStats, CustomerStats, EmployeeStats, OrderStats, ProductStats, SupplierStats,
    Ties, chart_data,
};
use crate::charts::{bar_chart, histogram};
use crate::report::{Report, ReportOptions, ReportSection, Section, Selection};

const NO_DATA: &str = "no data";

fn money_or_no_data(value: Option<Money>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |m| m.to_string())
}

/// Builds statistics sections from a [`DataStore`].
///
/// Every section opens its own store session, runs its queries one after the
/// other and releases the session before rendering. Store errors are returned
/// as they are; nothing is retried.
#[derive(Debug, Clone)]
pub struct StatisticsReport<S> {
    store: S,
    options: ReportOptions,
}

impl<S> StatisticsReport<S>
where
    S: DataStore,
{
    pub fn new(store: S, options: ReportOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub async fn section(&self, section: Section) -> StoreResult<ReportSection> {
        match section {
            Section::Product => self.product().await,
            Section::Category => self.category().await,
            Section::Order => self.order().await,
            Section::Customer => self.customer().await,
            Section::Employee => self.employee().await,
            Section::Supplier => self.supplier().await,
        }
    }

    /// Run the selected sections in order, stopping at the first failure.
    pub async fn run(&self, selection: Selection) -> StoreResult<Report> {
        let mut report = Report::default();
        for section in selection.sections() {
            report.sections.push(self.section(section).await?);
        }
        Ok(report)
    }

    /// Every section, in [`Section::ALL`] order.
    pub async fn all(&self) -> StoreResult<Report> {
        self.run(Selection::All).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn product(&self) -> StoreResult<ReportSection> {
        let stats = {
            let mut session = self.store.session().await?;
            let categories = session.categories().await?;
            let products = session.products().await?;
            aggregation::product_stats(&categories, &products)
        };
        tracing::info!(products = stats.total, "product statistics computed");
        Ok(render_product(&stats, &self.options))
    }

    #[tracing::instrument(skip(self))]
    pub async fn category(&self) -> StoreResult<ReportSection> {
        let stats = {
            let mut session = self.store.session().await?;
            let categories = session.categories().await?;
            let products = session.products().await?;
            aggregation::category_stats(&categories, &products)
        };
        tracing::info!(categories = stats.total, "category statistics computed");
        Ok(render_category(&stats))
    }

    #[tracing::instrument(skip(self))]
    pub async fn order(&self) -> StoreResult<ReportSection> {
        let stats = {
            let mut session = self.store.session().await?;
            let orders = session.orders().await?;
            aggregation::order_stats(&orders)
        };
        tracing::info!(orders = stats.total, "order statistics computed");
        Ok(render_order(&stats, &self.options))
    }

    #[tracing::instrument(skip(self))]
    pub async fn customer(&self) -> StoreResult<ReportSection> {
        let stats = {
            let mut session = self.store.session().await?;
            let customers = session.customers().await?;
            let orders = session.orders().await?;
            aggregation::customer_stats(&customers, &orders, self.options.top_customers)
        };
        tracing::info!(customers = stats.total, "customer statistics computed");
        Ok(render_customer(&stats, &self.options))
    }

    #[tracing::instrument(skip(self))]
    pub async fn employee(&self) -> StoreResult<ReportSection> {
        let stats = {
            let mut session = self.store.session().await?;
            let employees = session.employees().await?;
            let orders = session.orders().await?;
            aggregation::employee_stats(&employees, &orders, self.options.as_of)
        };
        tracing::info!(employees = stats.total, "employee statistics computed");
        Ok(render_employee(&stats, &self.options))
    }

    #[tracing::instrument(skip(self))]
    pub async fn supplier(&self) -> StoreResult<ReportSection> {
        let stats = {
            let mut session = self.store.session().await?;
            let suppliers = session.suppliers().await?;
            let products = session.products().await?;
            aggregation::supplier_stats(&suppliers, &products)
        };
        tracing::info!(suppliers = stats.total, "supplier statistics computed");
        Ok(render_supplier(&stats, &self.options))
    }
}

fn price_ties(section: &mut ReportSection, label: &str, ties: Option<&Ties<Money>>) {
    if let Some(ties) = ties {
        for name in &ties.names {
            section.text(format!("{label}: {name} ({})", ties.value));
        }
    }
}

fn count_ties(section: &mut ReportSection, label: &str, ties: Option<&Ties<u64>>) {
    match ties {
        Some(ties) => {
            section.text(format!("{label} ({}):", ties.value));
            for name in &ties.names {
                section.item(name);
            }
        }
        None => section.text(format!("{label}: {NO_DATA}")),
    }
}

pub(crate) fn render_product(stats: &ProductStats, options: &ReportOptions) -> ReportSection {
    let mut section = ReportSection::new(Section::Product);
    section.text(format!("Total products: {}", stats.total));
    section.text(format!(
        "Average price: {}",
        money_or_no_data(stats.average_price)
    ));

    let discontinued = format!("Discontinued products: {}", stats.discontinued);
    if stats.discontinued > 0 {
        section.warning(discontinued);
    } else {
        section.text(discontinued);
    }

    price_ties(&mut section, "Most expensive", stats.most_expensive.as_ref());
    price_ties(&mut section, "Least expensive", stats.least_expensive.as_ref());

    section.text("Products per category:");
    for entry in &stats.per_category {
        section.item(format_args!("{}: {}", entry.label, entry.count));
    }

    section.chart(
        "[Bar Chart] Products per Category:",
        bar_chart(&chart_data(&stats.per_category), options.max_bar_width),
    );
    section.chart(
        "[Histogram] Product Price Distribution:",
        histogram(
            &stats.price_distribution,
            options.bin_count,
            options.max_bar_width,
        ),
    );
    section
}

pub(crate) fn render_category(stats: &CategoryStats) -> ReportSection {
    let mut section = ReportSection::new(Section::Category);
    section.text(format!("Total categories: {}", stats.total));
    count_ties(
        &mut section,
        "Category with most products",
        stats.most_products.as_ref(),
    );
    count_ties(
        &mut section,
        "Category with fewest products",
        stats.fewest_products.as_ref(),
    );
    section
}

pub(crate) fn render_order(stats: &OrderStats, options: &ReportOptions) -> ReportSection {
    let mut section = ReportSection::new(Section::Order);
    section.text(format!("Total orders: {}", stats.total));
    section.text(format!(
        "Average order value: {}",
        money_or_no_data(stats.average_value)
    ));
    section.text(format!(
        "Largest order value: {}",
        money_or_no_data(stats.largest_value)
    ));
    section.text(format!(
        "Smallest order value: {}",
        money_or_no_data(stats.smallest_value)
    ));
    section.text(format!("Total order value: {}", stats.total_gross));
    section.text(format!("Total after discounts: {}", stats.total_net));
    section.text(format!("Discounts given: {}", stats.total_discount));

    section.chart(
        "[Histogram] Order Value Distribution:",
        histogram(
            &stats.value_distribution,
            options.bin_count,
            options.max_bar_width,
        ),
    );
    section.chart(
        "[Bar Chart] Orders per Month:",
        bar_chart(&chart_data(&stats.per_month), options.max_bar_width),
    );
    section
}

pub(crate) fn render_customer(stats: &CustomerStats, options: &ReportOptions) -> ReportSection {
    let mut section = ReportSection::new(Section::Customer);
    section.text(format!("Total customers: {}", stats.total));

    section.text(format!(
        "Top {} customers by order count:",
        options.top_customers
    ));
    for entry in &stats.top_customers {
        section.item(format_args!("{}: {} orders", entry.label, entry.count));
    }

    section.text("Customers by country:");
    for entry in &stats.by_country {
        section.item(format_args!("{}: {}", entry.label(), entry.count));
    }

    let by_country: Vec<(&str, u64)> = stats
        .by_country
        .iter()
        .map(|c| (c.label(), c.count))
        .collect();
    section.chart(
        "[Bar Chart] Customers by Country:",
        bar_chart(&by_country, options.max_bar_width),
    );
    section.chart(
        "[Bar Chart] Orders per Customer:",
        bar_chart(
            &chart_data(&stats.orders_per_customer),
            options.max_bar_width,
        ),
    );
    section
}

pub(crate) fn render_employee(stats: &EmployeeStats, options: &ReportOptions) -> ReportSection {
    let mut section = ReportSection::new(Section::Employee);
    section.text(format!("Total employees: {}", stats.total));

    if let Some(most) = &stats.most_orders {
        for name in &most.names {
            section.text(format!(
                "Employee with most orders: {name} ({} orders)",
                most.value
            ));
        }
    }

    section.text(match stats.average_tenure_years {
        Some(years) => format!("Average tenure: {years:.1} years"),
        None => format!("Average tenure: {NO_DATA}"),
    });

    section.chart(
        "[Histogram] Employee Tenure Distribution (years):",
        histogram(
            &stats.tenure_distribution,
            options.bin_count,
            options.max_bar_width,
        ),
    );
    section
}

pub(crate) fn render_supplier(stats: &SupplierStats, options: &ReportOptions) -> ReportSection {
    let mut section = ReportSection::new(Section::Supplier);
    section.text(format!("Total suppliers: {}", stats.total));

    section.text("Products per supplier:");
    for entry in &stats.products_per_supplier {
        section.item(format_args!("{}: {}", entry.label, entry.count));
    }

    section.chart(
        "[Bar Chart] Products per Supplier:",
        bar_chart(
            &chart_data(&stats.products_per_supplier),
            options.max_bar_width,
        ),
    );
    section
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use northwind_infra::{Dataset, InMemoryStore, StoreError};
    use northwind_parties::SupplierId;
    use northwind_products::{Category, CategoryId, Product, ProductId};

    use super::*;
    use crate::report::LineTag;

    fn options() -> ReportOptions {
        ReportOptions::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    fn texts(section: &ReportSection) -> Vec<&str> {
        section.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[tokio::test]
    async fn unpriced_catalog_reports_no_data() {
        let dataset = Dataset::new()
            .with_category(Category::new(CategoryId(1), "Beverages").unwrap())
            .with_product(Product::new(ProductId(1), "Chai", CategoryId(1), SupplierId(1)).unwrap());
        let report = StatisticsReport::new(InMemoryStore::new(dataset), options());

        let section = report.product().await.unwrap();
        let lines = texts(&section);
        assert!(lines.contains(&"Average price: no data"));
        assert!(!lines.iter().any(|l| l.starts_with("Most expensive")));
        assert!(lines.contains(&"[Bar Chart] Products per Category:"));

        // The unpriced product is binned at 0.
        let caption = lines
            .iter()
            .position(|l| *l == "[Histogram] Product Price Distribution:")
            .unwrap();
        assert!(lines[caption + 1].starts_with("    0-"));
        assert!(lines[caption + 1].ends_with(" 1"));
    }

    #[tokio::test]
    async fn empty_store_renders_headings_and_totals_only() {
        let report = StatisticsReport::new(InMemoryStore::new(Dataset::new()), options());

        let section = report.supplier().await.unwrap();
        assert_eq!(
            texts(&section),
            vec!["[Supplier Statistics]", "Total suppliers: 0", "Products per supplier:"]
        );

        let section = report.category().await.unwrap();
        assert_eq!(
            texts(&section),
            vec![
                "[Category Statistics]",
                "Total categories: 0",
                "Category with most products: no data",
                "Category with fewest products: no data",
            ]
        );
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_section() {
        let report = StatisticsReport::new(InMemoryStore::unavailable(), options());

        for section in Section::ALL {
            match report.section(section).await {
                Err(StoreError::Unavailable(_)) => {}
                other => panic!("{section}: expected Unavailable, got {other:?}"),
            }
        }
    }

    #[test]
    fn discontinued_products_are_flagged_as_warnings() {
        let stats = ProductStats {
            total: 2,
            average_price: None,
            discontinued: 1,
            most_expensive: None,
            least_expensive: None,
            per_category: Vec::new(),
            price_distribution: Vec::new(),
        };

        let section = render_product(&stats, &options());
        let warning = section
            .lines
            .iter()
            .find(|l| l.tag == LineTag::Warning)
            .unwrap();
        assert_eq!(warning.text, "Discontinued products: 1");
    }
}
