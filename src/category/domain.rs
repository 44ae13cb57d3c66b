//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Error, UserID,
    validation::{check_max_length, string_value},
};

/// The maximum number of characters in a category name.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 50;

/// Whether movements in a category count as money earned or money spent.
///
/// Movements do not carry a sign, their direction comes from their category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money earned, e.g. salary.
    Income,
    /// Money spent, e.g. rent.
    Expense,
}

impl CategoryType {
    /// The lowercase name used in requests, responses and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }

    /// Parse an optional filter value, ignoring anything unrecognised.
    pub(crate) fn parse_filter(value: Option<&str>) -> Option<Self> {
        value.and_then(|value| value.trim().parse().ok())
    }
}

impl FromStr for CategoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            other => Err(Error::validation(
                "type",
                format!("\"{other}\" is not a valid choice, use \"income\" or \"expense\"."),
            )),
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for CategoryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CategoryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A validated category name: trimmed, non-empty and at most
/// [MAX_CATEGORY_NAME_LENGTH] characters long.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed before validation.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::Validation] on the `name` field if
    /// `name` is blank or too long.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::validation("name", "This field may not be blank."));
        }

        check_max_length("name", name, MAX_CATEGORY_NAME_LENGTH)?;

        Ok(Self(name.to_string()))
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is trimmed and not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the invariant
    /// is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The key used to detect duplicate names: the trimmed name in lowercase.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A named, typed classification for movements (e.g., 'Salary', 'Rent').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The user that owns the category.
    pub owner: UserID,
    /// The display name of the category.
    pub name: CategoryName,
    /// Whether the category holds income or expenses.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

/// Request body for creating a category.
///
/// Fields are read as raw JSON values so that a value of the wrong type is
/// reported against its field.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryFormData {
    pub name: Option<Value>,
    #[serde(rename = "type")]
    pub category_type: Option<Value>,
}

/// Request body for a partial category update. Absent fields are unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<Value>,
    #[serde(rename = "type")]
    pub category_type: Option<Value>,
}

/// Read a category name from a JSON value.
pub(crate) fn name_value(value: Value) -> Result<CategoryName, Error> {
    string_value("name", value)?.parse()
}

/// Read a category type from a JSON value.
pub(crate) fn type_value(value: Value) -> Result<CategoryType, Error> {
    string_value("type", value)?.trim().parse()
}
