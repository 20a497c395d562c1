//! Structured description of the insurance policy schema.
//!
//! The system instruction sent to the agent is not a string blob: it is
//! rendered at startup from these records, so the schema contract stays
//! testable independent of formatting.

use serde::{Deserialize, Serialize};

/// A foreign-key reference to another table's column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

/// One column of a described table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// Full SQL type, e.g. "DECIMAL(12,2)" or "ENUM('Auto', 'Home', 'Life', 'Health')"
    pub sql_type: String,
    pub primary_key: bool,
    pub unique: bool,
    pub not_null: bool,
    pub references: Option<ForeignKeyRef>,
    /// Sensitive columns must never appear in generated projections.
    pub sensitive: bool,
}

impl ColumnDef {
    /// Create a plain column with no constraints.
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            primary_key: false,
            unique: false,
            not_null: false,
            references: None,
            sensitive: false,
        }
    }

    /// Mark as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark as UNIQUE NOT NULL.
    pub fn unique_not_null(mut self) -> Self {
        self.unique = true;
        self.not_null = true;
        self
    }

    /// Mark as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Add a foreign-key reference.
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(ForeignKeyRef {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    /// Mark as sensitive (excluded from projections by instruction).
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    fn render(&self) -> String {
        let mut parts = vec![self.name.clone(), self.sql_type.clone()];
        if self.primary_key {
            parts.push("PRIMARY KEY".to_string());
        }
        if self.unique {
            parts.push("UNIQUE".to_string());
        }
        if self.not_null && !self.primary_key {
            parts.push("NOT NULL".to_string());
        }
        if let Some(fk) = &self.references {
            parts.push(format!("FOREIGN KEY REFERENCES {}({})", fk.table, fk.column));
        }
        parts.join(" ")
    }
}

/// One table of the described schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    fn render(&self, ordinal: usize) -> String {
        let cols: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("   {}", c.render()))
            .collect();
        format!("{}. {} (\n{}\n)", ordinal, self.name, cols.join(",\n"))
    }
}

/// A complete schema description plus the behavioral directives sent to the
/// agent alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDescription {
    pub title: String,
    pub tables: Vec<TableDef>,
    pub guidelines: Vec<String>,
    pub response_format: String,
}

impl SchemaDescription {
    /// Render the full system instruction text. Compliance is advisory: the
    /// pipeline never verifies that the agent honored these directives.
    pub fn render_instruction(&self) -> String {
        let tables: Vec<String> = self
            .tables
            .iter()
            .enumerate()
            .map(|(i, t)| t.render(i + 1))
            .collect();
        let guidelines: Vec<String> = self
            .guidelines
            .iter()
            .enumerate()
            .map(|(i, g)| format!("{}. {}", i + 1, g))
            .collect();

        format!(
            "You are an insurance database expert with complete knowledge of these tables:\n\
             === {} ===\n\
             {}\n\n\
             === QUERY GUIDELINES ===\n\
             {}\n\n\
             === RESPONSE FORMAT ===\n\
             {}",
            self.title,
            tables.join("\n\n"),
            guidelines.join("\n"),
            self.response_format
        )
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// The five-table insurance policy schema the assistant is an expert in.
pub fn insurance_schema() -> SchemaDescription {
    SchemaDescription {
        title: "INSURANCE POLICY SCHEMA".to_string(),
        tables: vec![
            TableDef::new(
                "policies",
                vec![
                    ColumnDef::new("policy_id", "INT").primary_key(),
                    ColumnDef::new("policy_number", "VARCHAR(50)").unique_not_null(),
                    ColumnDef::new("policy_type", "ENUM('Auto', 'Home', 'Life', 'Health')"),
                    ColumnDef::new("start_date", "DATE"),
                    ColumnDef::new("end_date", "DATE"),
                    ColumnDef::new("premium", "DECIMAL(12,2)"),
                    ColumnDef::new(
                        "status",
                        "ENUM('Active', 'Expired', 'Cancelled', 'Pending')",
                    ),
                    ColumnDef::new("created_at", "DATETIME"),
                ],
            ),
            TableDef::new(
                "customers",
                vec![
                    ColumnDef::new("customer_id", "INT").primary_key(),
                    ColumnDef::new("first_name", "VARCHAR(100)").not_null(),
                    ColumnDef::new("last_name", "VARCHAR(100)").not_null(),
                    ColumnDef::new("date_of_birth", "DATE"),
                    ColumnDef::new("ssn_encrypted", "VARCHAR(255)").sensitive(),
                    ColumnDef::new("email", "VARCHAR(255)"),
                    ColumnDef::new("phone", "VARCHAR(20)"),
                    ColumnDef::new("address", "TEXT"),
                ],
            ),
            TableDef::new(
                "policy_holders",
                vec![
                    ColumnDef::new("id", "INT").primary_key(),
                    ColumnDef::new("policy_id", "INT").references("policies", "policy_id"),
                    ColumnDef::new("customer_id", "INT").references("customers", "customer_id"),
                    ColumnDef::new("relationship", "ENUM('Primary', 'Secondary', 'Dependent')"),
                    ColumnDef::new("coverage_level", "VARCHAR(50)"),
                ],
            ),
            TableDef::new(
                "claims",
                vec![
                    ColumnDef::new("claim_id", "INT").primary_key(),
                    ColumnDef::new("policy_id", "INT").references("policies", "policy_id"),
                    ColumnDef::new("claim_date", "DATE"),
                    ColumnDef::new("claim_amount", "DECIMAL(12,2)"),
                    ColumnDef::new(
                        "claim_status",
                        "ENUM('Filed', 'In Review', 'Approved', 'Denied', 'Paid')",
                    ),
                    ColumnDef::new("description", "TEXT"),
                    ColumnDef::new("adjuster_id", "INT"),
                ],
            ),
            TableDef::new(
                "payments",
                vec![
                    ColumnDef::new("payment_id", "INT").primary_key(),
                    ColumnDef::new("policy_id", "INT").references("policies", "policy_id"),
                    ColumnDef::new("amount", "DECIMAL(12,2)"),
                    ColumnDef::new("payment_date", "DATE"),
                    ColumnDef::new(
                        "payment_method",
                        "ENUM('Credit Card', 'Bank Transfer', 'Check')",
                    ),
                    ColumnDef::new("transaction_reference", "VARCHAR(255)"),
                ],
            ),
        ],
        guidelines: vec![
            "Always maintain strict data privacy - never include sensitive fields like SSN in results".to_string(),
            "Use appropriate JOINs to connect related tables (policies → customers → claims)".to_string(),
            "Include relevant date filters when appropriate (active policies, recent claims)".to_string(),
            "For financial calculations, use proper decimal precision".to_string(),
            "For complex queries, use subqueries to break down the problem".to_string(),
        ],
        response_format: "Return ONLY the SQL query wrapped in ```sql code blocks and a brief explanation of what the query does.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_five_tables() {
        let schema = insurance_schema();
        assert_eq!(schema.tables.len(), 5);
        for name in ["policies", "customers", "policy_holders", "claims", "payments"] {
            assert!(schema.table(name).is_some(), "missing table {}", name);
        }
    }

    #[test]
    fn test_instruction_lists_every_table() {
        let text = insurance_schema().render_instruction();
        for name in ["policies", "customers", "policy_holders", "claims", "payments"] {
            assert!(text.contains(name));
        }
    }

    #[test]
    fn test_instruction_contains_directives() {
        let text = insurance_schema().render_instruction();
        assert!(text.contains("never include sensitive fields like SSN"));
        assert!(text.contains("JOINs"));
        assert!(text.contains("decimal precision"));
        assert!(text.contains("```sql"));
    }

    #[test]
    fn test_column_render_constraints() {
        let col = ColumnDef::new("policy_number", "VARCHAR(50)").unique_not_null();
        assert_eq!(col.render(), "policy_number VARCHAR(50) UNIQUE NOT NULL");

        let fk = ColumnDef::new("policy_id", "INT").references("policies", "policy_id");
        assert_eq!(
            fk.render(),
            "policy_id INT FOREIGN KEY REFERENCES policies(policy_id)"
        );
    }

    #[test]
    fn test_sensitive_column_marked() {
        let schema = insurance_schema();
        let customers = schema.table("customers").unwrap();
        let ssn = customers
            .columns
            .iter()
            .find(|c| c.name == "ssn_encrypted")
            .unwrap();
        assert!(ssn.sensitive);
    }

    #[test]
    fn test_table_render_shape() {
        let schema = insurance_schema();
        let rendered = schema.table("payments").unwrap().render(5);
        assert!(rendered.starts_with("5. payments (\n"));
        assert!(rendered.contains("   payment_id INT PRIMARY KEY,"));
        assert!(rendered.trim_end().ends_with(')'));
    }
}
