//! Request bodies for creating and updating movements.
//!
//! Fields are read as raw JSON values so that a value of the wrong type is
//! reported against its field instead of failing the whole body.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    Error,
    category::CategoryId,
    movement::{Amount, Movement, MovementBuilder},
    validation::{check_max_length, date_value, json_type, nullable, required, string_value},
};

/// The maximum number of characters in a movement description.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// Request body for creating a movement.
///
/// `amount` may be sent as a JSON number or a decimal string.
#[derive(Debug, Default, Deserialize)]
pub struct MovementFormData {
    pub category: Option<Value>,
    pub description: Option<Value>,
    pub date: Option<Value>,
    pub amount: Option<Value>,
}

impl MovementFormData {
    /// Validate the fields and turn them into a [MovementBuilder].
    ///
    /// # Errors
    /// Returns an [Error::Validation] naming the first invalid field.
    pub fn into_builder(self) -> Result<MovementBuilder, Error> {
        let amount = Amount::try_from(&required("amount", self.amount)?)?;
        let date = date_value("date", &required("date", self.date)?)?;
        let description = description_value(self.description)?;
        let category = match self.category {
            Some(category) => category_value(category)?,
            None => None,
        };

        Ok(Movement::build(amount, date, &description).category(category))
    }
}

/// Request body for a partial movement update.
///
/// Absent fields keep their current value. `category` can be set to `null`
/// to remove the movement from its category.
#[derive(Debug, Default, Deserialize)]
pub struct MovementPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<Value>>,
    pub description: Option<Value>,
    pub date: Option<Value>,
    pub amount: Option<Value>,
}

impl MovementPatch {
    /// Merge the supplied fields into `existing`.
    ///
    /// # Errors
    /// Returns an [Error::Validation] naming the first invalid field.
    pub fn apply_to(self, existing: Movement) -> Result<MovementBuilder, Error> {
        let amount = match self.amount {
            Some(amount) => Amount::try_from(&amount)?,
            None => existing.amount,
        };
        let date = match self.date {
            Some(date) => date_value("date", &date)?,
            None => existing.date,
        };
        let description = match self.description {
            Some(description) => description_value(Some(description))?,
            None => existing.description,
        };
        let category = match self.category {
            Some(Some(category)) => category_value(category)?,
            Some(None) => None,
            None => existing.category,
        };

        Ok(Movement::build(amount, date, &description).category(category))
    }
}

fn description_value(value: Option<Value>) -> Result<String, Error> {
    let description = match value {
        Some(value) => string_value("description", value)?,
        None => String::new(),
    };
    check_max_length("description", &description, MAX_DESCRIPTION_LENGTH)?;

    Ok(description)
}

fn category_value(value: Value) -> Result<Option<CategoryId>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number.as_i64().map(Some).ok_or_else(|| {
            Error::validation(
                "category",
                format!("Incorrect type. Expected pk value, received {number}."),
            )
        }),
        other => Err(Error::validation(
            "category",
            format!(
                "Incorrect type. Expected pk value, received {}.",
                json_type(&other)
            ),
        )),
    }
}
