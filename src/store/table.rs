// src/store/table.rs
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// PostgreSQL truncates identifiers longer than this.
const MAX_IDENT_LEN: usize = 63;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableNameError {
    #[error("table name is empty")]
    Empty,
    #[error("identifier `{0}` is longer than 63 bytes")]
    TooLong(String),
    #[error("identifier `{0}` must start with a letter or underscore and contain only letters, digits and underscores")]
    InvalidIdentifier(String),
    #[error("table name `{0}` has more than one schema qualifier")]
    TooManyParts(String),
}

/// A table name that is safe to splice into query text.
///
/// Accepts `table` or `schema.table`, each part a plain SQL identifier. The
/// name is rendered unquoted so PostgreSQL applies its usual case folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    schema: Option<String>,
    table: String,
}

impl TableName {
    pub fn parse(raw: &str) -> Result<Self, TableNameError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TableNameError::Empty);
        }

        let mut parts = raw.split('.');
        let first = parts.next().unwrap_or_default();
        let second = parts.next();
        if parts.next().is_some() {
            return Err(TableNameError::TooManyParts(raw.to_string()));
        }

        match second {
            Some(table) => Ok(Self {
                schema: Some(validate_ident(first)?),
                table: validate_ident(table)?,
            }),
            None => Ok(Self { schema: None, table: validate_ident(first)? }),
        }
    }

    #[cfg(test)]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[cfg(test)]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

fn validate_ident(ident: &str) -> Result<String, TableNameError> {
    if ident.len() > MAX_IDENT_LEN {
        return Err(TableNameError::TooLong(ident.to_string()));
    }

    let mut chars = ident.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(TableNameError::InvalidIdentifier(ident.to_string()));
    }

    Ok(ident.to_string())
}

impl FromStr for TableName {
    type Err = TableNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.table),
            None => f.write_str(&self.table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_qualified_names() {
        let plain: TableName = "products".parse().unwrap();
        assert_eq!(plain.to_string(), "products");
        assert_eq!(plain.schema(), None);

        let qualified = TableName::parse(" shop.Products_2 ").unwrap();
        assert_eq!(qualified.schema(), Some("shop"));
        assert_eq!(qualified.table(), "Products_2");
        assert_eq!(qualified.to_string(), "shop.Products_2");
    }

    #[test]
    fn rejects_anything_that_could_alter_the_query() {
        assert_eq!(TableName::parse(""), Err(TableNameError::Empty));
        assert!(matches!(
            TableName::parse("products; DROP TABLE products"),
            Err(TableNameError::InvalidIdentifier(_))
        ));
        assert!(matches!(TableName::parse("\"products\""), Err(TableNameError::InvalidIdentifier(_))));
        assert!(matches!(TableName::parse("1products"), Err(TableNameError::InvalidIdentifier(_))));
        assert!(matches!(TableName::parse("a.b.c"), Err(TableNameError::TooManyParts(_))));
        assert!(matches!(TableName::parse("shop."), Err(TableNameError::InvalidIdentifier(_))));
    }

    #[test]
    fn rejects_overlong_identifiers() {
        let long = "p".repeat(MAX_IDENT_LEN + 1);
        assert!(matches!(TableName::parse(&long), Err(TableNameError::TooLong(_))));
        assert!(TableName::parse(&"p".repeat(MAX_IDENT_LEN)).is_ok());
    }
}
