//! SQLite-backed store over the Northwind table layout.
//!
//! Read-only apart from [`SqliteStore::ensure_schema`] and
//! [`SqliteStore::load_dataset`], which exist to prepare demo databases and
//! test fixtures.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};

use northwind_core::{Entity, Money};
use northwind_parties::{Customer, CustomerId, Employee, EmployeeId, Supplier, SupplierId};
use northwind_products::{Category, CategoryId, Product, ProductId};
use northwind_sales::{Discount, Order, OrderDetail, OrderId};

use super::in_memory::Dataset;
use super::store::{DataStore, StoreSession};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS Categories (
        CategoryID   INTEGER PRIMARY KEY,
        CategoryName TEXT NOT NULL,
        Description  TEXT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Suppliers (
        SupplierID  INTEGER PRIMARY KEY,
        CompanyName TEXT NOT NULL,
        Country     TEXT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Products (
        ProductID    INTEGER PRIMARY KEY,
        ProductName  TEXT NOT NULL,
        SupplierID   INTEGER NULL REFERENCES Suppliers (SupplierID),
        CategoryID   INTEGER NULL REFERENCES Categories (CategoryID),
        UnitPrice    NUMERIC NULL,
        Discontinued INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Customers (
        CustomerID  INTEGER PRIMARY KEY,
        CompanyName TEXT NOT NULL,
        Country     TEXT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Employees (
        EmployeeID INTEGER PRIMARY KEY,
        LastName   TEXT NOT NULL,
        FirstName  TEXT NOT NULL,
        Title      TEXT NULL,
        HireDate   TEXT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Orders (
        OrderID    INTEGER PRIMARY KEY,
        CustomerID INTEGER NULL REFERENCES Customers (CustomerID),
        EmployeeID INTEGER NULL REFERENCES Employees (EmployeeID),
        OrderDate  TEXT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS OrderDetails (
        OrderDetailsID INTEGER PRIMARY KEY,
        OrderID        INTEGER NOT NULL REFERENCES Orders (OrderID),
        ProductID      INTEGER NOT NULL REFERENCES Products (ProductID),
        UnitPrice      NUMERIC NOT NULL,
        Quantity       INTEGER NOT NULL CHECK (Quantity >= 1),
        Discount       REAL NOT NULL DEFAULT 0
    )
    "#,
];

/// SQLite store for the statistics engine.
///
/// Each session checks one connection out of the pool; dropping the session
/// hands it back.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a pool for `config.database_url`.
    ///
    /// The pool verifies connectivity up front, so a missing database file
    /// surfaces here as [`StoreError::Unavailable`].
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| StoreError::Config(format!("{}: {e}", config.database_url)))?
            .create_if_missing(config.create_if_missing);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::unavailable(format!("{}: {e}", config.database_url)))?;

        tracing::debug!(url = %config.database_url, "connected to sqlite store");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the Northwind tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert every row of `dataset` in one transaction.
    pub async fn load_dataset(&self, dataset: &Dataset) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for category in &dataset.categories {
            sqlx::query("INSERT INTO Categories (CategoryID, CategoryName, Description) VALUES (?1, ?2, ?3)")
                .bind(category.id().get())
                .bind(category.name())
                .bind(category.description())
                .execute(&mut *tx)
                .await?;
        }
        for supplier in &dataset.suppliers {
            sqlx::query("INSERT INTO Suppliers (SupplierID, CompanyName, Country) VALUES (?1, ?2, ?3)")
                .bind(supplier.id().get())
                .bind(supplier.company_name())
                .bind(supplier.country())
                .execute(&mut *tx)
                .await?;
        }
        for product in &dataset.products {
            sqlx::query(
                r#"
                INSERT INTO Products (ProductID, ProductName, SupplierID, CategoryID, UnitPrice, Discontinued)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(product.id().get())
            .bind(product.name())
            .bind(product.supplier_id().get())
            .bind(product.category_id().get())
            .bind(product.unit_price().map(Money::as_decimal))
            .bind(i64::from(product.is_discontinued()))
            .execute(&mut *tx)
            .await?;
        }
        for customer in &dataset.customers {
            sqlx::query("INSERT INTO Customers (CustomerID, CompanyName, Country) VALUES (?1, ?2, ?3)")
                .bind(customer.id().get())
                .bind(customer.company_name())
                .bind(customer.country())
                .execute(&mut *tx)
                .await?;
        }
        for employee in &dataset.employees {
            sqlx::query(
                "INSERT INTO Employees (EmployeeID, LastName, FirstName, Title, HireDate) VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(employee.id().get())
            .bind(employee.last_name())
            .bind(employee.first_name())
            .bind(employee.title())
            .bind(employee.hire_date().map(|d| d.format("%Y-%m-%d").to_string()))
            .execute(&mut *tx)
            .await?;
        }
        for order in &dataset.orders {
            sqlx::query("INSERT INTO Orders (OrderID, CustomerID, EmployeeID, OrderDate) VALUES (?1, ?2, ?3, ?4)")
                .bind(order.id().get())
                .bind(order.customer_id().map(CustomerId::get))
                .bind(order.employee_id().map(EmployeeId::get))
                .bind(order.order_date().map(|d| d.format("%Y-%m-%d").to_string()))
                .execute(&mut *tx)
                .await?;

            for detail in order.details() {
                sqlx::query(
                    r#"
                    INSERT INTO OrderDetails (OrderID, ProductID, UnitPrice, Quantity, Discount)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )
                .bind(order.id().get())
                .bind(detail.product_id().get())
                .bind(detail.unit_price().as_decimal())
                .bind(i64::from(detail.quantity()))
                .bind(detail.discount().ratio())
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        tracing::info!(
            products = dataset.products.len(),
            orders = dataset.orders.len(),
            "loaded dataset into sqlite store"
        );
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DataStore for SqliteStore {
    async fn session(&self) -> StoreResult<Box<dyn StoreSession>> {
        let conn = self.pool.acquire().await.map_err(|e| match e {
            sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
                StoreError::unavailable(e.to_string())
            }
            other => StoreError::Query(other),
        })?;
        Ok(Box::new(SqliteSession { conn }))
    }
}

struct SqliteSession {
    conn: PoolConnection<Sqlite>,
}

impl SqliteSession {
    async fn fetch(&mut self, table: &'static str, sql: &'static str) -> StoreResult<Vec<SqliteRow>> {
        let rows = sqlx::query(sql).fetch_all(&mut *self.conn).await?;
        tracing::debug!(table, rows = rows.len(), "fetched rows");
        Ok(rows)
    }
}

fn column<'r, T>(row: &'r SqliteRow, table: &'static str, name: &str) -> StoreResult<T>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get::<T, _>(name)
        .map_err(|e| StoreError::decode(table, format!("{name}: {e}")))
}

fn required_ref(table: &'static str, id: i64, name: &str, value: Option<i64>) -> StoreResult<i64> {
    value.ok_or_else(|| StoreError::decode(table, format!("row {id} has no {name}")))
}

fn optional_money(table: &'static str, value: Option<f64>) -> StoreResult<Option<Money>> {
    value
        .map(Money::from_decimal)
        .transpose()
        .map_err(|e| StoreError::decode(table, e.to_string()))
}

/// Accepts `YYYY-MM-DD` with or without a time part (space or `T`
/// separated), the shapes Northwind databases store dates in.
fn parse_date(table: &'static str, raw: Option<String>) -> StoreResult<Option<NaiveDate>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(datetime.date()));
        }
    }

    Err(StoreError::decode(table, format!("unrecognized date {raw:?}")))
}

#[async_trait]
impl StoreSession for SqliteSession {
    async fn categories(&mut self) -> StoreResult<Vec<Category>> {
        const TABLE: &str = "Categories";
        let rows = self
            .fetch(
                TABLE,
                "SELECT CategoryID, CategoryName, Description FROM Categories ORDER BY CategoryID",
            )
            .await?;

        rows.iter()
            .map(|row| {
                let category = Category::new(
                    CategoryId(column(row, TABLE, "CategoryID")?),
                    column::<String>(row, TABLE, "CategoryName")?,
                )?;
                Ok(category.with_description(column(row, TABLE, "Description")?))
            })
            .collect()
    }

    async fn products(&mut self) -> StoreResult<Vec<Product>> {
        const TABLE: &str = "Products";
        let rows = self
            .fetch(
                TABLE,
                r#"
                SELECT
                    ProductID,
                    ProductName,
                    SupplierID,
                    CategoryID,
                    CAST(UnitPrice AS REAL) AS UnitPrice,
                    CAST(Discontinued AS INTEGER) AS Discontinued
                FROM Products
                ORDER BY ProductID
                "#,
            )
            .await?;

        rows.iter()
            .map(|row| {
                let id: i64 = column(row, TABLE, "ProductID")?;
                let category = required_ref(TABLE, id, "CategoryID", column(row, TABLE, "CategoryID")?)?;
                let supplier = required_ref(TABLE, id, "SupplierID", column(row, TABLE, "SupplierID")?)?;
                let discontinued: Option<i64> = column(row, TABLE, "Discontinued")?;

                let product = Product::new(
                    ProductId(id),
                    column::<String>(row, TABLE, "ProductName")?,
                    CategoryId(category),
                    SupplierId(supplier),
                )?;
                Ok(product
                    .with_unit_price(optional_money(TABLE, column(row, TABLE, "UnitPrice")?)?)
                    .with_discontinued(discontinued.unwrap_or(0) != 0))
            })
            .collect()
    }

    async fn suppliers(&mut self) -> StoreResult<Vec<Supplier>> {
        const TABLE: &str = "Suppliers";
        let rows = self
            .fetch(
                TABLE,
                "SELECT SupplierID, CompanyName, Country FROM Suppliers ORDER BY SupplierID",
            )
            .await?;

        rows.iter()
            .map(|row| {
                let supplier = Supplier::new(
                    SupplierId(column(row, TABLE, "SupplierID")?),
                    column::<String>(row, TABLE, "CompanyName")?,
                )?;
                Ok(supplier.with_country(column(row, TABLE, "Country")?))
            })
            .collect()
    }

    async fn customers(&mut self) -> StoreResult<Vec<Customer>> {
        const TABLE: &str = "Customers";
        let rows = self
            .fetch(
                TABLE,
                "SELECT CustomerID, CompanyName, Country FROM Customers ORDER BY CustomerID",
            )
            .await?;

        rows.iter()
            .map(|row| {
                let customer = Customer::new(
                    CustomerId(column(row, TABLE, "CustomerID")?),
                    column::<String>(row, TABLE, "CompanyName")?,
                )?;
                Ok(customer.with_country(column(row, TABLE, "Country")?))
            })
            .collect()
    }

    async fn employees(&mut self) -> StoreResult<Vec<Employee>> {
        const TABLE: &str = "Employees";
        let rows = self
            .fetch(
                TABLE,
                r#"
                SELECT EmployeeID, FirstName, LastName, Title, CAST(HireDate AS TEXT) AS HireDate
                FROM Employees
                ORDER BY EmployeeID
                "#,
            )
            .await?;

        rows.iter()
            .map(|row| {
                let employee = Employee::new(
                    EmployeeId(column(row, TABLE, "EmployeeID")?),
                    column::<String>(row, TABLE, "FirstName")?,
                    column::<String>(row, TABLE, "LastName")?,
                )?;
                Ok(employee
                    .with_title(column(row, TABLE, "Title")?)
                    .with_hire_date(parse_date(TABLE, column(row, TABLE, "HireDate")?)?))
            })
            .collect()
    }

    async fn orders(&mut self) -> StoreResult<Vec<Order>> {
        const TABLE: &str = "Orders";
        const DETAILS: &str = "OrderDetails";

        let detail_rows = self
            .fetch(
                DETAILS,
                r#"
                SELECT
                    OrderID,
                    ProductID,
                    CAST(UnitPrice AS REAL) AS UnitPrice,
                    Quantity,
                    CAST(Discount AS REAL) AS Discount
                FROM OrderDetails
                ORDER BY OrderID, OrderDetailsID
                "#,
            )
            .await?;

        let mut details: HashMap<OrderId, Vec<OrderDetail>> = HashMap::new();
        for row in &detail_rows {
            let order_id = OrderId(column(row, DETAILS, "OrderID")?);
            let price: f64 = column(row, DETAILS, "UnitPrice")?;
            let quantity: i64 = column(row, DETAILS, "Quantity")?;
            let quantity = u16::try_from(quantity).map_err(|_| {
                StoreError::decode(DETAILS, format!("order {order_id}: quantity {quantity} out of range"))
            })?;
            let discount: Option<f64> = column(row, DETAILS, "Discount")?;

            let detail = OrderDetail::new(
                ProductId(column(row, DETAILS, "ProductID")?),
                Money::from_decimal(price)?,
                quantity,
                Discount::new(discount.unwrap_or(0.0))?,
            )?;
            details.entry(order_id).or_default().push(detail);
        }

        let rows = self
            .fetch(
                TABLE,
                r#"
                SELECT OrderID, CustomerID, EmployeeID, CAST(OrderDate AS TEXT) AS OrderDate
                FROM Orders
                ORDER BY OrderID
                "#,
            )
            .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = OrderId(column(row, TABLE, "OrderID")?);
            let customer: Option<i64> = column(row, TABLE, "CustomerID")?;
            let employee: Option<i64> = column(row, TABLE, "EmployeeID")?;

            let mut order = Order::new(id)
                .with_customer(customer.map(CustomerId))
                .with_employee(employee.map(EmployeeId))
                .with_order_date(parse_date(TABLE, column(row, TABLE, "OrderDate")?)?);
            for detail in details.remove(&id).unwrap_or_default() {
                order.push_detail(detail);
            }
            orders.push(order);
        }

        if !details.is_empty() {
            tracing::warn!(
                orphaned_orders = details.len(),
                "order details reference orders that do not exist; ignoring them"
            );
        }

        Ok(orders)
    }
}
