//! Read-only SQL guard.
//!
//! The analytical-query capability hands model-authored SQL to the store.
//! Before anything touches a connection, the statement must pass this guard:
//! it has to start with SELECT and must not contain any forbidden token.
//! Rejection is pure — no pool, no connection, no side effects — so a
//! rejected statement provably never reaches the database.

/// Tokens that reject a query outright, checked case-insensitively as
/// substrings of the normalized statement.
const FORBIDDEN_TOKENS: &[&str] = &[
    "INSERT",
    "UPDATE",
    "DELETE",
    "DROP",
    "ALTER",
    "CREATE",
    "TRUNCATE",
    "GRANT",
    "REVOKE",
    "RENAME",
    "ATTACH",
    "DETACH",
    "PRAGMA",
    "VACUUM",
    ";--",
    "--",
    "/*",
    "*/",
    "UNION ALL SELECT",
    "UNION SELECT",
    "OR 1=1",
    "OR '1'='1'",
];

/// Validate that a statement is an analytical SELECT free of forbidden
/// tokens. Returns the rejection message on failure.
pub fn validate(sql: &str) -> Result<(), String> {
    let normalized = sql.trim().to_uppercase();

    if !normalized.starts_with("SELECT") {
        let head: String = sql.chars().take(50).collect();
        return Err(format!(
            "SQL Validation Error: Only SELECT queries are allowed. Detected: '{head}...'"
        ));
    }

    for token in FORBIDDEN_TOKENS {
        if normalized.contains(token) {
            return Err(format!(
                "SQL Validation Error: Forbidden keyword '{token}' detected in query. \
                 Only analytical SELECT queries are permitted."
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_select() {
        assert!(validate("SELECT * FROM products").is_ok());
    }

    #[test]
    fn accepts_aggregation_with_joins() {
        let sql = "SELECT u.location, SUM(t.amount) AS total \
                   FROM transactions t JOIN users u ON u.user_id = t.user_id \
                   GROUP BY u.location ORDER BY total DESC";
        assert!(validate(sql).is_ok());
    }

    #[test]
    fn accepts_lowercase_select() {
        assert!(validate("select name, price from products where price < 500").is_ok());
    }

    #[test]
    fn rejects_non_select_statements() {
        let err = validate("EXPLAIN SELECT * FROM products").unwrap_err();
        assert!(err.contains("Only SELECT queries are allowed"));
    }

    #[test]
    fn rejects_drop_table() {
        let err = validate("SELECT 1; DROP TABLE users;").unwrap_err();
        assert!(err.contains("DROP"));
    }

    #[test]
    fn rejects_mutations_case_insensitively() {
        assert!(validate("select * from products; delete from products").is_err());
        assert!(validate("SELECT * FROM users WHERE name = 'x'; UpDaTe users SET name = 'y'").is_err());
    }

    #[test]
    fn rejects_comment_markers() {
        assert!(validate("SELECT * FROM users -- sneaky").is_err());
        assert!(validate("SELECT /* hidden */ * FROM users").is_err());
    }

    #[test]
    fn rejects_union_injection() {
        assert!(validate("SELECT name FROM products UNION SELECT email FROM users").is_err());
        assert!(validate("SELECT name FROM products UNION ALL SELECT email FROM users").is_err());
    }

    #[test]
    fn rejects_always_true_idioms() {
        assert!(validate("SELECT * FROM users WHERE name = '' OR 1=1").is_err());
        assert!(validate("SELECT * FROM users WHERE name = '' OR '1'='1'").is_err());
    }

    #[test]
    fn rejection_is_pure() {
        // No pool or connection exists here; rejection must not need one.
        for sql in ["DROP TABLE users;", "TRUNCATE transactions", "PRAGMA foo"] {
            assert!(validate(sql).is_err());
        }
    }
}
