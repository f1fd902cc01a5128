//! Fixed DDL for the fifteen-table e-commerce schema.
//!
//! Table and column names are the external contract that downstream analytic
//! queries depend on — changing them breaks callers, so they live here in one
//! place, in insertion order (parents before children).

/// One table's DDL, registered in insertion order.
pub struct TableDef {
    pub name: &'static str,
    pub ddl: &'static str,
}

/// The fifteen tables, ordered so every foreign key references an earlier
/// table (self-references excepted). Insertion follows this order.
pub const TABLES: [TableDef; 15] = [
    TableDef {
        name: "departments",
        ddl: "CREATE TABLE departments (\n    department_id INTEGER PRIMARY KEY,\n    department_name TEXT NOT NULL UNIQUE,\n    budget REAL NOT NULL\n)",
    },
    TableDef {
        name: "employees",
        ddl: "CREATE TABLE employees (\n    employee_id INTEGER PRIMARY KEY,\n    first_name TEXT NOT NULL,\n    last_name TEXT NOT NULL,\n    email TEXT NOT NULL UNIQUE,\n    phone TEXT NOT NULL,\n    hire_date TEXT NOT NULL,\n    department_id INTEGER NOT NULL REFERENCES departments(department_id),\n    position TEXT NOT NULL,\n    salary REAL NOT NULL,\n    manager_id INTEGER REFERENCES employees(employee_id),\n    is_active INTEGER NOT NULL\n)",
    },
    TableDef {
        name: "customers",
        ddl: "CREATE TABLE customers (\n    customer_id INTEGER PRIMARY KEY,\n    first_name TEXT NOT NULL,\n    last_name TEXT NOT NULL,\n    email TEXT NOT NULL UNIQUE,\n    phone TEXT NOT NULL,\n    address TEXT NOT NULL,\n    city TEXT NOT NULL,\n    state TEXT NOT NULL,\n    country TEXT NOT NULL,\n    postal_code TEXT NOT NULL,\n    registration_date TEXT NOT NULL,\n    last_login TEXT NOT NULL,\n    loyalty_points INTEGER NOT NULL,\n    is_active INTEGER NOT NULL\n)",
    },
    TableDef {
        name: "suppliers",
        ddl: "CREATE TABLE suppliers (\n    supplier_id INTEGER PRIMARY KEY,\n    supplier_name TEXT NOT NULL,\n    contact_name TEXT NOT NULL,\n    email TEXT NOT NULL,\n    phone TEXT NOT NULL,\n    address TEXT NOT NULL,\n    city TEXT NOT NULL,\n    country TEXT NOT NULL,\n    rating REAL NOT NULL\n)",
    },
    TableDef {
        name: "categories",
        ddl: "CREATE TABLE categories (\n    category_id INTEGER PRIMARY KEY,\n    category_name TEXT NOT NULL,\n    parent_category_id INTEGER REFERENCES categories(category_id),\n    description TEXT NOT NULL\n)",
    },
    TableDef {
        name: "products",
        ddl: "CREATE TABLE products (\n    product_id INTEGER PRIMARY KEY,\n    product_name TEXT NOT NULL,\n    sku TEXT NOT NULL UNIQUE,\n    category_id INTEGER NOT NULL REFERENCES categories(category_id),\n    supplier_id INTEGER NOT NULL REFERENCES suppliers(supplier_id),\n    description TEXT NOT NULL,\n    unit_price REAL NOT NULL,\n    cost_price REAL NOT NULL,\n    weight REAL NOT NULL,\n    is_active INTEGER NOT NULL\n)",
    },
    TableDef {
        name: "inventory",
        ddl: "CREATE TABLE inventory (\n    inventory_id INTEGER PRIMARY KEY,\n    product_id INTEGER NOT NULL UNIQUE REFERENCES products(product_id),\n    warehouse_location TEXT NOT NULL,\n    quantity_on_hand INTEGER NOT NULL CHECK (quantity_on_hand >= 0),\n    reorder_level INTEGER NOT NULL,\n    reorder_quantity INTEGER NOT NULL,\n    last_restock_date TEXT NOT NULL\n)",
    },
    TableDef {
        name: "orders",
        ddl: "CREATE TABLE orders (\n    order_id INTEGER PRIMARY KEY,\n    customer_id INTEGER NOT NULL REFERENCES customers(customer_id),\n    employee_id INTEGER REFERENCES employees(employee_id),\n    order_date TEXT NOT NULL,\n    required_date TEXT NOT NULL,\n    shipped_date TEXT,\n    ship_address TEXT NOT NULL,\n    ship_city TEXT NOT NULL,\n    ship_state TEXT NOT NULL,\n    ship_country TEXT NOT NULL,\n    ship_postal_code TEXT NOT NULL,\n    order_status TEXT NOT NULL,\n    payment_method TEXT NOT NULL,\n    total_amount REAL NOT NULL,\n    tax_amount REAL NOT NULL,\n    shipping_fee REAL NOT NULL,\n    discount_amount REAL NOT NULL\n)",
    },
    TableDef {
        name: "order_items",
        ddl: "CREATE TABLE order_items (\n    order_item_id INTEGER PRIMARY KEY,\n    order_id INTEGER NOT NULL REFERENCES orders(order_id),\n    product_id INTEGER NOT NULL REFERENCES products(product_id),\n    quantity INTEGER NOT NULL,\n    unit_price REAL NOT NULL,\n    discount REAL NOT NULL,\n    subtotal REAL NOT NULL,\n    UNIQUE (order_id, product_id)\n)",
    },
    TableDef {
        name: "payments",
        ddl: "CREATE TABLE payments (\n    payment_id INTEGER PRIMARY KEY,\n    order_id INTEGER NOT NULL REFERENCES orders(order_id),\n    payment_date TEXT NOT NULL,\n    payment_method TEXT NOT NULL,\n    amount REAL NOT NULL,\n    transaction_id TEXT NOT NULL UNIQUE,\n    payment_status TEXT NOT NULL\n)",
    },
    TableDef {
        name: "shipping",
        ddl: "CREATE TABLE shipping (\n    shipping_id INTEGER PRIMARY KEY,\n    order_id INTEGER NOT NULL REFERENCES orders(order_id),\n    carrier TEXT NOT NULL,\n    tracking_number TEXT NOT NULL UNIQUE,\n    shipping_date TEXT NOT NULL,\n    estimated_delivery TEXT NOT NULL,\n    actual_delivery TEXT,\n    shipping_status TEXT NOT NULL,\n    shipping_cost REAL NOT NULL\n)",
    },
    TableDef {
        name: "product_reviews",
        ddl: "CREATE TABLE product_reviews (\n    review_id INTEGER PRIMARY KEY,\n    product_id INTEGER NOT NULL REFERENCES products(product_id),\n    customer_id INTEGER NOT NULL REFERENCES customers(customer_id),\n    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),\n    review_title TEXT NOT NULL,\n    review_text TEXT NOT NULL,\n    is_verified_purchase INTEGER NOT NULL,\n    review_date TEXT NOT NULL,\n    helpful_count INTEGER NOT NULL\n)",
    },
    TableDef {
        name: "promotions",
        ddl: "CREATE TABLE promotions (\n    promotion_id INTEGER PRIMARY KEY,\n    promotion_name TEXT NOT NULL,\n    promotion_code TEXT NOT NULL UNIQUE,\n    discount_type TEXT NOT NULL,\n    discount_value REAL NOT NULL,\n    start_date TEXT NOT NULL,\n    end_date TEXT NOT NULL,\n    min_purchase_amount REAL NOT NULL,\n    max_discount_amount REAL,\n    usage_limit INTEGER NOT NULL,\n    times_used INTEGER NOT NULL,\n    is_active INTEGER NOT NULL\n)",
    },
    TableDef {
        name: "customer_addresses",
        ddl: "CREATE TABLE customer_addresses (\n    address_id INTEGER PRIMARY KEY,\n    customer_id INTEGER NOT NULL REFERENCES customers(customer_id),\n    address_type TEXT NOT NULL,\n    street_address TEXT NOT NULL,\n    city TEXT NOT NULL,\n    state TEXT NOT NULL,\n    country TEXT NOT NULL,\n    postal_code TEXT NOT NULL,\n    is_default INTEGER NOT NULL\n)",
    },
    TableDef {
        name: "returns",
        ddl: "CREATE TABLE returns (\n    return_id INTEGER PRIMARY KEY,\n    order_id INTEGER NOT NULL REFERENCES orders(order_id),\n    product_id INTEGER NOT NULL REFERENCES products(product_id),\n    quantity INTEGER NOT NULL,\n    reason TEXT NOT NULL,\n    return_date TEXT NOT NULL,\n    refund_amount REAL NOT NULL,\n    return_status TEXT NOT NULL\n)",
    },
];

/// Indexes expected by the downstream analytic workload. Not required for
/// correctness, only latency.
pub const INDEXES: [&str; 10] = [
    "CREATE INDEX idx_customers_email ON customers(email)",
    "CREATE INDEX idx_products_sku ON products(sku)",
    "CREATE INDEX idx_products_category ON products(category_id)",
    "CREATE INDEX idx_orders_customer ON orders(customer_id)",
    "CREATE INDEX idx_orders_date ON orders(order_date)",
    "CREATE INDEX idx_order_items_order ON order_items(order_id)",
    "CREATE INDEX idx_order_items_product ON order_items(product_id)",
    "CREATE INDEX idx_employees_department ON employees(department_id)",
    "CREATE INDEX idx_inventory_product ON inventory(product_id)",
    "CREATE INDEX idx_reviews_product ON product_reviews(product_id)",
];

/// DROP statements in reverse insertion order so children go before parents.
pub fn drop_statements() -> Vec<String> {
    TABLES
        .iter()
        .rev()
        .map(|t| format!("DROP TABLE IF EXISTS {}", t.name))
        .collect()
}

/// The full DDL script: drops, creates, and indexes.
pub fn create_script() -> String {
    let mut script = String::new();
    for stmt in drop_statements() {
        script.push_str(&stmt);
        script.push_str(";\n");
    }
    script.push('\n');
    for table in &TABLES {
        script.push_str(table.ddl);
        script.push_str(";\n\n");
    }
    for index in INDEXES {
        script.push_str(index);
        script.push_str(";\n");
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifteen_tables() {
        assert_eq!(TABLES.len(), 15);
    }

    #[test]
    fn test_ddl_names_match_registry() {
        for table in &TABLES {
            assert!(
                table.ddl.starts_with(&format!("CREATE TABLE {} ", table.name)),
                "DDL for {} does not declare that table",
                table.name
            );
        }
    }

    #[test]
    fn test_drop_order_is_reversed() {
        let drops = drop_statements();
        assert_eq!(drops.first().unwrap(), "DROP TABLE IF EXISTS returns");
        assert_eq!(drops.last().unwrap(), "DROP TABLE IF EXISTS departments");
    }

    #[test]
    fn test_create_script_contains_indexes() {
        let script = create_script();
        for index in INDEXES {
            assert!(script.contains(index));
        }
    }
}
