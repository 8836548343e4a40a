//! # SQLite Specific SQL
//!
//! This module centralizes SQL strings for the SQLite provider: catalog queries
//! used by introspection and the DDL/seed data for the demo business database.

/// Lists user tables in catalog order, with the DDL text used to recover foreign keys.
pub const LIST_TABLES: &str =
    "SELECT name, sql FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%';";

/// Returns the `PRAGMA` that describes a table's columns.
///
/// Result columns: cid, name, type, notnull, dflt_value, pk.
pub fn table_info(table_name: &str) -> String {
    format!("PRAGMA table_info({});", quote_identifier(table_name))
}

/// Wraps an identifier in double quotes, doubling any embedded quote.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub const CREATE_CUSTOMERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT,
        city TEXT,
        country TEXT,
        registration_date DATE NOT NULL,
        status TEXT DEFAULT 'active'
    )";

pub const CREATE_ORDERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY,
        customer_id INTEGER NOT NULL,
        product_name TEXT NOT NULL,
        category TEXT,
        quantity INTEGER NOT NULL,
        unit_price REAL NOT NULL,
        total_amount REAL NOT NULL,
        order_date DATE NOT NULL,
        status TEXT DEFAULT 'pending',
        FOREIGN KEY (customer_id) REFERENCES customers (id)
    )";

pub const CREATE_PRODUCTS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        price REAL NOT NULL,
        stock_quantity INTEGER NOT NULL,
        description TEXT,
        supplier TEXT,
        created_date DATE NOT NULL
    )";

pub const CREATE_EMPLOYEES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        department TEXT NOT NULL,
        position TEXT NOT NULL,
        salary REAL,
        hire_date DATE NOT NULL,
        manager_id INTEGER,
        status TEXT DEFAULT 'active',
        FOREIGN KEY (manager_id) REFERENCES employees (id)
    )";

/// All demo tables, in creation order.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    CREATE_CUSTOMERS_TABLE,
    CREATE_ORDERS_TABLE,
    CREATE_PRODUCTS_TABLE,
    CREATE_EMPLOYEES_TABLE,
];

pub const COUNT_CUSTOMERS: &str = "SELECT COUNT(*) FROM customers";

/// Demo rows. `total_amount` is stored precomputed as `quantity * unit_price`.
pub const SAMPLE_DATA_SQL: &[&str] = &[
    "INSERT INTO customers (name, email, phone, city, country, registration_date, status) VALUES ('John Smith', 'john.smith@techcorp.com', '+1-555-0101', 'New York', 'USA', '2023-01-15', 'active')",
    "INSERT INTO customers (name, email, phone, city, country, registration_date, status) VALUES ('Sarah Johnson', 'sarah.j@innovate.com', '+1-555-0102', 'Los Angeles', 'USA', '2023-02-20', 'active')",
    "INSERT INTO customers (name, email, phone, city, country, registration_date, status) VALUES ('Michael Brown', 'mike.brown@startup.io', '+1-555-0103', 'Chicago', 'USA', '2023-03-10', 'active')",
    "INSERT INTO customers (name, email, phone, city, country, registration_date, status) VALUES ('Emily Davis', 'emily.davis@enterprise.org', '+1-555-0104', 'Houston', 'USA', '2023-04-05', 'inactive')",
    "INSERT INTO customers (name, email, phone, city, country, registration_date, status) VALUES ('David Wilson', 'david.w@solutions.net', '+1-555-0105', 'Phoenix', 'USA', '2023-05-12', 'active')",
    "INSERT INTO customers (name, email, phone, city, country, registration_date, status) VALUES ('Lisa Anderson', 'lisa.a@global.com', '+1-555-0106', 'Philadelphia', 'USA', '2023-06-18', 'active')",
    "INSERT INTO customers (name, email, phone, city, country, registration_date, status) VALUES ('Robert Martinez', 'robert.m@tech.dev', '+1-555-0107', 'San Antonio', 'USA', '2023-07-22', 'active')",
    "INSERT INTO customers (name, email, phone, city, country, registration_date, status) VALUES ('Jennifer Garcia', 'jen.garcia@digital.biz', '+1-555-0108', 'San Diego', 'USA', '2023-08-14', 'suspended')",
    "INSERT INTO products (name, category, price, stock_quantity, description, supplier, created_date) VALUES ('MacBook Pro 16', 'Electronics', 2499.99, 45, 'High-performance laptop for professionals', 'Apple Inc.', '2024-01-01')",
    "INSERT INTO products (name, category, price, stock_quantity, description, supplier, created_date) VALUES ('Dell XPS 15', 'Electronics', 1899.99, 32, 'Premium Windows laptop', 'Dell Technologies', '2024-01-01')",
    "INSERT INTO products (name, category, price, stock_quantity, description, supplier, created_date) VALUES ('Wireless Mouse Pro', 'Electronics', 79.99, 150, 'Ergonomic wireless mouse with precision tracking', 'Logitech', '2024-01-01')",
    "INSERT INTO products (name, category, price, stock_quantity, description, supplier, created_date) VALUES ('Office Chair Executive', 'Furniture', 599.99, 28, 'Leather executive office chair', 'Herman Miller', '2024-01-01')",
    "INSERT INTO products (name, category, price, stock_quantity, description, supplier, created_date) VALUES ('iPhone 15 Pro', 'Electronics', 999.99, 85, 'Latest flagship smartphone', 'Apple Inc.', '2024-01-01')",
    "INSERT INTO products (name, category, price, stock_quantity, description, supplier, created_date) VALUES ('Samsung Galaxy S24', 'Electronics', 899.99, 67, 'Android flagship smartphone', 'Samsung', '2024-01-01')",
    "INSERT INTO products (name, category, price, stock_quantity, description, supplier, created_date) VALUES ('Coffee Machine Deluxe', 'Kitchen', 299.99, 42, 'Premium coffee brewing system', 'Breville', '2024-01-01')",
    "INSERT INTO products (name, category, price, stock_quantity, description, supplier, created_date) VALUES ('Monitor 4K 27', 'Electronics', 449.99, 38, 'Ultra HD 4K professional monitor', 'LG Electronics', '2024-01-01')",
    "INSERT INTO products (name, category, price, stock_quantity, description, supplier, created_date) VALUES ('Mechanical Keyboard', 'Electronics', 159.99, 95, 'RGB mechanical gaming keyboard', 'Corsair', '2024-01-01')",
    "INSERT INTO products (name, category, price, stock_quantity, description, supplier, created_date) VALUES ('Desk Lamp LED', 'Furniture', 89.99, 73, 'Adjustable LED desk lamp', 'Philips', '2024-01-01')",
    "INSERT INTO orders (customer_id, product_name, category, quantity, unit_price, total_amount, order_date, status) VALUES (1, 'MacBook Pro 16', 'Electronics', 1, 2499.99, 2499.99, '2024-06-01', 'delivered')",
    "INSERT INTO orders (customer_id, product_name, category, quantity, unit_price, total_amount, order_date, status) VALUES (2, 'Wireless Mouse Pro', 'Electronics', 2, 79.99, 159.98, '2024-06-02', 'delivered')",
    "INSERT INTO orders (customer_id, product_name, category, quantity, unit_price, total_amount, order_date, status) VALUES (1, 'Office Chair Executive', 'Furniture', 1, 599.99, 599.99, '2024-06-05', 'shipped')",
    "INSERT INTO orders (customer_id, product_name, category, quantity, unit_price, total_amount, order_date, status) VALUES (4, 'iPhone 15 Pro', 'Electronics', 1, 999.99, 999.99, '2024-06-08', 'processing')",
    "INSERT INTO orders (customer_id, product_name, category, quantity, unit_price, total_amount, order_date, status) VALUES (5, 'Coffee Machine Deluxe', 'Kitchen', 1, 299.99, 299.99, '2024-06-10', 'pending')",
    "INSERT INTO orders (customer_id, product_name, category, quantity, unit_price, total_amount, order_date, status) VALUES (3, 'Monitor 4K 27', 'Electronics', 2, 449.99, 899.98, '2024-06-12', 'delivered')",
    "INSERT INTO orders (customer_id, product_name, category, quantity, unit_price, total_amount, order_date, status) VALUES (6, 'Dell XPS 15', 'Electronics', 1, 1899.99, 1899.99, '2024-06-15', 'shipped')",
    "INSERT INTO orders (customer_id, product_name, category, quantity, unit_price, total_amount, order_date, status) VALUES (7, 'Mechanical Keyboard', 'Electronics', 1, 159.99, 159.99, '2024-06-18', 'delivered')",
    "INSERT INTO orders (customer_id, product_name, category, quantity, unit_price, total_amount, order_date, status) VALUES (2, 'Desk Lamp LED', 'Furniture', 3, 89.99, 269.97, '2024-06-20', 'processing')",
    "INSERT INTO orders (customer_id, product_name, category, quantity, unit_price, total_amount, order_date, status) VALUES (1, 'Samsung Galaxy S24', 'Electronics', 1, 899.99, 899.99, '2024-06-22', 'cancelled')",
    "INSERT INTO employees (name, email, department, position, salary, hire_date, manager_id, status) VALUES ('Alice Johnson', 'alice.j@company.com', 'Engineering', 'Senior Developer', 95000.00, '2022-01-15', NULL, 'active')",
    "INSERT INTO employees (name, email, department, position, salary, hire_date, manager_id, status) VALUES ('Bob Smith', 'bob.s@company.com', 'Engineering', 'Team Lead', 110000.00, '2021-03-10', 1, 'active')",
    "INSERT INTO employees (name, email, department, position, salary, hire_date, manager_id, status) VALUES ('Carol Davis', 'carol.d@company.com', 'Marketing', 'Marketing Manager', 75000.00, '2022-05-20', NULL, 'active')",
    "INSERT INTO employees (name, email, department, position, salary, hire_date, manager_id, status) VALUES ('David Brown', 'david.b@company.com', 'Sales', 'Sales Representative', 65000.00, '2023-02-14', NULL, 'active')",
    "INSERT INTO employees (name, email, department, position, salary, hire_date, manager_id, status) VALUES ('Eve Wilson', 'eve.w@company.com', 'HR', 'HR Specialist', 60000.00, '2023-07-08', NULL, 'inactive')",
    "INSERT INTO employees (name, email, department, position, salary, hire_date, manager_id, status) VALUES ('Frank Miller', 'frank.m@company.com', 'Engineering', 'Junior Developer', 70000.00, '2024-01-10', 2, 'active')",
];

/// Number of demo rows per table, for tests and startup logging.
pub const SAMPLE_CUSTOMER_COUNT: i64 = 8;
pub const SAMPLE_PRODUCT_COUNT: i64 = 10;
pub const SAMPLE_ORDER_COUNT: i64 = 10;
pub const SAMPLE_EMPLOYEE_COUNT: i64 = 6;
