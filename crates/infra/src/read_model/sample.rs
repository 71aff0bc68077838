//! A small Northwind-shaped dataset for demos and tests.
//!
//! Deliberately includes the awkward rows: an unpriced product, a discontinued
//! product, a customer without a country, an employee without a hire date, an
//! undated order and an order without lines.

use chrono::NaiveDate;

use northwind_core::{DomainResult, Money};
use northwind_parties::{Customer, CustomerId, Employee, EmployeeId, Supplier, SupplierId};
use northwind_products::{Category, CategoryId, Product, ProductId};
use northwind_sales::{Discount, Order, OrderDetail, OrderId};

use super::in_memory::Dataset;

fn price(cents: u64) -> Option<Money> {
    Some(Money::from_cents(cents))
}

fn line(product: i64, cents: u64, quantity: u16, discount: f64) -> DomainResult<OrderDetail> {
    OrderDetail::new(
        ProductId(product),
        Money::from_cents(cents),
        quantity,
        Discount::new(discount)?,
    )
}

pub fn sample_dataset() -> DomainResult<Dataset> {
    let categories = [
        (1, "Beverages"),
        (2, "Condiments"),
        (3, "Confections"),
        (4, "Produce"),
    ];
    let suppliers = [
        (1, "Exotic Liquids", Some("UK")),
        (2, "New Orleans Cajun Delights", Some("USA")),
        (3, "Grandma Kelly's Homestead", Some("USA")),
    ];
    // (id, name, category, supplier, price, discontinued)
    let products = [
        (1, "Chai", 1, 1, price(1800), false),
        (2, "Chang", 1, 1, price(1900), false),
        (3, "Aniseed Syrup", 2, 1, price(1000), false),
        (4, "Chef Anton's Cajun Seasoning", 2, 2, price(2200), false),
        (5, "Chef Anton's Gumbo Mix", 2, 2, price(2135), true),
        (6, "Grandma's Boysenberry Spread", 2, 3, price(2500), false),
        (7, "Uncle Bob's Organic Dried Pears", 4, 3, price(3000), false),
        (8, "Northwoods Cranberry Sauce", 2, 3, None, false),
        (9, "Pavlova", 3, 2, price(1745), false),
        (10, "Teatime Chocolate Biscuits", 3, 1, price(920), false),
    ];
    let customers = [
        (1, "Alfreds Futterkiste", Some("Germany")),
        (2, "Ana Trujillo Emparedados y helados", Some("Mexico")),
        (3, "Antonio Moreno Taquería", Some("Mexico")),
        (4, "Around the Horn", Some("UK")),
        (5, "Berglunds snabbköp", Some("Sweden")),
        (6, "Blauer See Delikatessen", None),
    ];
    let employees = [
        (1, "Nancy", "Davolio", NaiveDate::from_ymd_opt(1992, 5, 1)),
        (2, "Andrew", "Fuller", NaiveDate::from_ymd_opt(1992, 8, 14)),
        (3, "Janet", "Leverling", NaiveDate::from_ymd_opt(1992, 4, 1)),
        (4, "Margaret", "Peacock", None),
    ];

    let mut dataset = Dataset::new();

    for (id, name) in categories {
        dataset = dataset.with_category(Category::new(CategoryId(id), name)?);
    }
    for (id, name, country) in suppliers {
        dataset = dataset
            .with_supplier(Supplier::new(SupplierId(id), name)?.with_country(country.map(String::from)));
    }
    for (id, name, category, supplier, unit_price, discontinued) in products {
        dataset = dataset.with_product(
            Product::new(ProductId(id), name, CategoryId(category), SupplierId(supplier))?
                .with_unit_price(unit_price)
                .with_discontinued(discontinued),
        );
    }
    for (id, name, country) in customers {
        dataset = dataset
            .with_customer(Customer::new(CustomerId(id), name)?.with_country(country.map(String::from)));
    }
    for (id, first, last, hired) in employees {
        dataset = dataset.with_employee(Employee::new(EmployeeId(id), first, last)?.with_hire_date(hired));
    }

    // (id, customer, employee, date, lines)
    let orders = [
        (10248, 4, 1, NaiveDate::from_ymd_opt(1996, 7, 4), vec![line(1, 1440, 12, 0.0)?, line(3, 800, 10, 0.0)?]),
        (10249, 1, 2, NaiveDate::from_ymd_opt(1996, 7, 5), vec![line(9, 1396, 9, 0.0)?, line(7, 2400, 40, 0.0)?]),
        (10250, 2, 1, NaiveDate::from_ymd_opt(1996, 8, 8), vec![line(2, 1520, 35, 0.15)?]),
        (10251, 4, 3, NaiveDate::from_ymd_opt(1996, 8, 8), vec![line(4, 1760, 6, 0.05)?, line(10, 736, 15, 0.05)?]),
        (10252, 3, 1, NaiveDate::from_ymd_opt(1996, 9, 9), vec![line(6, 2000, 40, 0.05)?]),
        (10253, 4, 2, NaiveDate::from_ymd_opt(1996, 10, 10), vec![line(1, 1440, 20, 0.0)?]),
        (10254, 5, 1, NaiveDate::from_ymd_opt(1997, 1, 11), vec![line(2, 1520, 15, 0.15)?, line(5, 1708, 21, 0.15)?]),
        (10255, 1, 3, NaiveDate::from_ymd_opt(1997, 7, 12), vec![line(3, 800, 20, 0.0)?]),
        (10256, 2, 2, None, vec![line(7, 2400, 15, 0.0)?]),
        (10257, 4, 3, NaiveDate::from_ymd_opt(1997, 12, 16), Vec::new()),
    ];

    for (id, customer, employee, date, lines) in orders {
        let mut order = Order::new(OrderId(id))
            .with_customer(Some(CustomerId(customer)))
            .with_employee(Some(EmployeeId(employee)))
            .with_order_date(date);
        for detail in lines {
            order.push_detail(detail);
        }
        dataset = dataset.with_order(order);
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_dataset_is_consistent() {
        let dataset = sample_dataset().unwrap();

        assert_eq!(dataset.categories.len(), 4);
        assert_eq!(dataset.products.len(), 10);
        assert_eq!(dataset.orders.len(), 10);

        // Every product points at an existing category and supplier.
        for product in &dataset.products {
            assert!(dataset
                .categories
                .iter()
                .any(|c| northwind_core::Entity::id(c) == product.category_id()));
            assert!(dataset
                .suppliers
                .iter()
                .any(|s| northwind_core::Entity::id(s) == product.supplier_id()));
        }
    }
}
