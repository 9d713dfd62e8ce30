use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use schemasketch_core::GeneratedSchema;

/// Relationship connector tokens accepted in an erDiagram line.
pub const CONNECTOR_TOKENS: &[&str] = &[
    "||--o{", "||--|{", "||--||", "||--o|", "}o--o{", "}o--||", "}|--||", "}|--|{",
];

static SQL_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```sql\s*\n(.*?)```").unwrap());
static MERMAID_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```mermaid\s*\n(.*?)```").unwrap());
static ANY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[a-zA-Z]*\s*\n(.*?)```").unwrap());
// An entity block opens with a bare name followed by a brace, either alone on
// the line or with an inline body. Relationship lines never match: their
// connector sits between the name and any brace.
static ENTITY_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[A-Za-z_][A-Za-z0-9_]*\s*\{").unwrap());

/// Why a generated reply was rejected. The Display form doubles as the
/// feedback appended to the corrective instruction on retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("the reply is missing a fenced ```{0}``` section")]
    MissingFence(&'static str),

    #[error("the SQL section has no CREATE TABLE statement")]
    NoCreateTable,

    #[error("the diagram section must start with the erDiagram keyword")]
    NotAnErDiagram,

    #[error("the diagram declares no brace-delimited entity block")]
    NoEntities,

    #[error("the diagram has no relationship line with a recognized connector")]
    NoRelationships,
}

/// Extract and check the fenced SQL and Mermaid sections of a generated
/// reply, returning the assembled schema or the reason it was rejected.
pub fn validate_reply(reply: &str) -> std::result::Result<GeneratedSchema, ValidationFailure> {
    let sql = extract_fence(&SQL_FENCE, reply).ok_or(ValidationFailure::MissingFence("sql"))?;
    if !sql.to_uppercase().contains("CREATE TABLE") {
        return Err(ValidationFailure::NoCreateTable);
    }

    let mermaid =
        extract_fence(&MERMAID_FENCE, reply).ok_or(ValidationFailure::MissingFence("mermaid"))?;
    if !mermaid.starts_with("erDiagram") {
        return Err(ValidationFailure::NotAnErDiagram);
    }
    if !ENTITY_BLOCK.is_match(&mermaid) {
        return Err(ValidationFailure::NoEntities);
    }
    if !has_relationship_line(&mermaid) {
        return Err(ValidationFailure::NoRelationships);
    }

    Ok(GeneratedSchema {
        sql_code: sql,
        mermaid_code: mermaid,
    })
}

/// Strip a surrounding code fence from a reply, if present. Used for the
/// suggestion operation, where models often fence the requested JSON.
pub fn strip_code_fence(reply: &str) -> String {
    if let Some(caps) = ANY_FENCE.captures(reply) {
        caps[1].trim().to_string()
    } else {
        reply.trim().to_string()
    }
}

fn extract_fence(fence: &Regex, reply: &str) -> Option<String> {
    fence
        .captures(reply)
        .map(|caps| caps[1].trim().to_string())
        .filter(|section| !section.is_empty())
}

fn has_relationship_line(mermaid: &str) -> bool {
    mermaid
        .lines()
        .any(|line| CONNECTOR_TOKENS.iter().any(|token| line.contains(token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_REPLY: &str = r#"Here is your design.

```sql
CREATE TABLE customers (
    customer_id INT PRIMARY KEY,
    name VARCHAR(255)
);

CREATE TABLE orders (
    order_id INT PRIMARY KEY,
    customer_id INT REFERENCES customers(customer_id)
);
```

```mermaid
erDiagram
    CUSTOMERS {
        int customer_id
        varchar name
    }
    ORDERS {
        int order_id
        int customer_id
    }
    CUSTOMERS ||--o{ ORDERS : places
```

Let me know if you need changes."#;

    #[test]
    fn accepts_well_formed_reply() {
        let schema = validate_reply(GOOD_REPLY).unwrap();
        assert!(schema.sql_code.starts_with("CREATE TABLE customers"));
        assert!(schema.mermaid_code.starts_with("erDiagram"));
        assert!(schema.mermaid_code.contains("||--o{"));
    }

    #[test]
    fn accepts_single_line_entity_blocks() {
        let reply = r#"```sql
CREATE TABLE customers (customer_id INT PRIMARY KEY);
```

```mermaid
erDiagram
    CUSTOMERS { int customer_id }
    ORDERS { int order_id }
    CUSTOMERS ||--o{ ORDERS : places
```"#;
        let schema = validate_reply(reply).unwrap();
        assert!(schema.mermaid_code.contains("CUSTOMERS { int customer_id }"));
    }

    #[test]
    fn rejects_missing_sql_fence() {
        let reply = GOOD_REPLY.replace("```sql", "```");
        assert_eq!(
            validate_reply(&reply),
            Err(ValidationFailure::MissingFence("sql"))
        );
    }

    #[test]
    fn rejects_missing_mermaid_fence() {
        let reply = GOOD_REPLY.replace("```mermaid", "```text");
        assert_eq!(
            validate_reply(&reply),
            Err(ValidationFailure::MissingFence("mermaid"))
        );
    }

    #[test]
    fn rejects_sql_without_create_table() {
        let reply = GOOD_REPLY.replace("CREATE TABLE", "SELECT * FROM");
        assert_eq!(validate_reply(&reply), Err(ValidationFailure::NoCreateTable));
    }

    #[test]
    fn rejects_diagram_without_keyword() {
        let reply = GOOD_REPLY.replace("erDiagram", "graph TD");
        assert_eq!(
            validate_reply(&reply),
            Err(ValidationFailure::NotAnErDiagram)
        );
    }

    #[test]
    fn rejects_diagram_without_entity_blocks() {
        let reply = r#"```sql
CREATE TABLE t (id INT);
```

```mermaid
erDiagram
    CUSTOMERS ||--o{ ORDERS : places
```"#;
        assert_eq!(validate_reply(reply), Err(ValidationFailure::NoEntities));
    }

    #[test]
    fn rejects_diagram_without_relationships() {
        let reply = r#"```sql
CREATE TABLE t (id INT);
```

```mermaid
erDiagram
    CUSTOMERS {
        int customer_id
    }
```"#;
        assert_eq!(
            validate_reply(reply),
            Err(ValidationFailure::NoRelationships)
        );
    }

    #[test]
    fn rejects_unknown_connector() {
        let reply = GOOD_REPLY.replace("||--o{", "-->");
        assert_eq!(
            validate_reply(&reply),
            Err(ValidationFailure::NoRelationships)
        );
    }

    #[test]
    fn relationship_lines_are_not_counted_as_entities() {
        // A relationship line ends with a label, not a bare brace, so the
        // entity check must not be satisfied by connectors alone.
        let reply = r#"```sql
CREATE TABLE t (id INT);
```

```mermaid
erDiagram
    CUSTOMERS }o--o{ ORDERS : shares
```"#;
        assert_eq!(validate_reply(reply), Err(ValidationFailure::NoEntities));
    }

    #[test]
    fn strip_code_fence_unwraps_json() {
        let fenced = "```json\n{\"people\": []}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"people\": []}");
        assert_eq!(strip_code_fence("  {\"people\": []} "), "{\"people\": []}");
    }
}
