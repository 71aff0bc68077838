use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use northwind_core::{DomainError, DomainResult, Entity, Money, entity_id};
use northwind_parties::{CustomerId, EmployeeId};
use northwind_products::ProductId;

entity_id!(
    /// Order identifier (`Orders.OrderID`).
    OrderId,
    "OrderId"
);

/// Fractional discount applied to a line, always within `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Discount(f64);

impl Discount {
    pub const NONE: Discount = Discount(0.0);

    pub fn new(ratio: f64) -> DomainResult<Self> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(DomainError::validation(format!(
                "discount must be between 0 and 1 (got {ratio})"
            )));
        }
        Ok(Self(ratio))
    }

    pub fn ratio(self) -> f64 {
        self.0
    }
}

/// Order line: product, unit price, quantity, discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    product_id: ProductId,
    unit_price: Money,
    quantity: u16,
    discount: Discount,
}

impl OrderDetail {
    pub fn new(
        product_id: ProductId,
        unit_price: Money,
        quantity: u16,
        discount: Discount,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }

        Ok(Self {
            product_id,
            unit_price,
            quantity,
            discount,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u16 {
        self.quantity
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    /// `unit_price × quantity`, discount not applied.
    pub fn gross_value(&self) -> Money {
        self.unit_price.times(u32::from(self.quantity))
    }

    /// Gross value with the line discount applied, rounded to the cent.
    pub fn net_value(&self) -> Money {
        self.gross_value().scaled(1.0 - self.discount.ratio())
    }
}

/// Read model: Order with its detail lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: Option<CustomerId>,
    employee_id: Option<EmployeeId>,
    order_date: Option<NaiveDate>,
    details: Vec<OrderDetail>,
}

impl Order {
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            customer_id: None,
            employee_id: None,
            order_date: None,
            details: Vec::new(),
        }
    }

    pub fn with_customer(mut self, customer_id: Option<CustomerId>) -> Self {
        self.customer_id = customer_id;
        self
    }

    pub fn with_employee(mut self, employee_id: Option<EmployeeId>) -> Self {
        self.employee_id = employee_id;
        self
    }

    pub fn with_order_date(mut self, order_date: Option<NaiveDate>) -> Self {
        self.order_date = order_date;
        self
    }

    pub fn with_detail(mut self, detail: OrderDetail) -> Self {
        self.details.push(detail);
        self
    }

    pub fn push_detail(&mut self, detail: OrderDetail) {
        self.details.push(detail);
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    pub fn employee_id(&self) -> Option<EmployeeId> {
        self.employee_id
    }

    pub fn order_date(&self) -> Option<NaiveDate> {
        self.order_date
    }

    /// Calendar month (1-12) of the order date, if known.
    pub fn order_month(&self) -> Option<u32> {
        self.order_date.map(|d| d.month())
    }

    pub fn details(&self) -> &[OrderDetail] {
        &self.details
    }

    /// Sum of `unit_price × quantity` over all lines. An order without lines
    /// is worth zero.
    pub fn gross_value(&self) -> Money {
        self.details.iter().map(OrderDetail::gross_value).sum()
    }

    /// Sum of line values after discount.
    pub fn net_value(&self) -> Money {
        self.details.iter().map(OrderDetail::net_value).sum()
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
