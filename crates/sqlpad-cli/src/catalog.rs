/// A ready-made query offered in the sidebar of the playground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredefinedQuery {
    pub id: &'static str,
    pub name: &'static str,
    pub sql: &'static str,
    pub description: &'static str,
}

pub const PREDEFINED_QUERIES: [PredefinedQuery; 5] = [
    PredefinedQuery {
        id: "products",
        name: "List All Products",
        sql: "SELECT * FROM products",
        description: "Display all products from the database",
    },
    PredefinedQuery {
        id: "orders",
        name: "List All Orders",
        sql: "SELECT * FROM orders",
        description: "Show all orders",
    },
    PredefinedQuery {
        id: "order_details",
        name: "Order Details",
        sql: "SELECT * FROM order_details",
        description: "Display detailed order information",
    },
    PredefinedQuery {
        id: "suppliers",
        name: "List Suppliers",
        sql: "SELECT * FROM suppliers",
        description: "Show all suppliers",
    },
    PredefinedQuery {
        id: "shippers",
        name: "List Shippers",
        sql: "SELECT * FROM shippers",
        description: "Display all shipping companies",
    },
];

/// Look a query up by 1-based position or by id.
pub fn find(key: &str) -> Option<&'static PredefinedQuery> {
    if let Ok(n) = key.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| PREDEFINED_QUERIES.get(i));
    }
    PREDEFINED_QUERIES.iter().find(|q| q.id == key)
}
