//! Filtered, owner-scoped movement queries.
//!
//! Filters combine with AND. A filter that is not set does not restrict the
//! results. Movements are listed newest first, with the ID as a tiebreak so
//! pages are stable.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::Deserialize;
use time::Date;

use crate::{
    Error, UserID,
    category::{CategoryId, CategoryType},
    movement::{Movement, core::map_movement_row},
    pagination::PageRequest,
    summary::{EntryCategory, LedgerEntry},
    validation::{non_blank, parse_date},
};

/// The raw filter query parameters shared by the list and summary endpoints.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MovementQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Parsed movement filters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MovementFilter {
    /// Only movements filed under this category.
    pub category: Option<CategoryId>,
    /// Only movements whose category has this type.
    pub category_type: Option<CategoryType>,
    /// Only movements on or after this date.
    pub date_from: Option<Date>,
    /// Only movements on or before this date.
    pub date_to: Option<Date>,
}

impl TryFrom<MovementQuery> for MovementFilter {
    type Error = Error;

    /// Parse the query parameters. Blank parameters are treated as absent and
    /// an unrecognised `type` is ignored.
    fn try_from(query: MovementQuery) -> Result<Self, Self::Error> {
        let category = non_blank(query.category)
            .map(|value| {
                value
                    .trim()
                    .parse::<CategoryId>()
                    .map_err(|_| Error::validation("category", "Select a valid choice."))
            })
            .transpose()?;
        let category_type = CategoryType::parse_filter(non_blank(query.category_type).as_deref());
        let date_from = non_blank(query.date_from)
            .map(|value| parse_date("date_from", &value))
            .transpose()?;
        let date_to = non_blank(query.date_to)
            .map(|value| parse_date("date_to", &value))
            .transpose()?;

        Ok(Self {
            category,
            category_type,
            date_from,
            date_to,
        })
    }
}

const FROM_CLAUSE: &str = "FROM movement m LEFT JOIN category c ON c.id = m.category_id";

/// Build the WHERE clause and its parameters for `owner` and `filter`.
fn where_clause(owner: UserID, filter: &MovementFilter) -> (String, Vec<Value>) {
    let mut conditions = vec!["m.user_id = ?"];
    let mut params = vec![Value::Integer(owner.as_i64())];

    if let Some(category) = filter.category {
        conditions.push("m.category_id = ?");
        params.push(Value::Integer(category));
    }

    if let Some(category_type) = filter.category_type {
        conditions.push("c.type = ?");
        params.push(Value::Text(category_type.as_str().to_owned()));
    }

    if let Some(date_from) = filter.date_from {
        conditions.push("m.date >= ?");
        params.push(Value::Text(date_from.to_string()));
    }

    if let Some(date_to) = filter.date_to {
        conditions.push("m.date <= ?");
        params.push(Value::Text(date_to.to_string()));
    }

    (format!("WHERE {}", conditions.join(" AND ")), params)
}

/// Get `owner`'s movements matching `filter`, newest first.
///
/// If `page` is set only that page of movements is returned.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_movements(
    owner: UserID,
    filter: &MovementFilter,
    page: Option<PageRequest>,
    connection: &Connection,
) -> Result<Vec<Movement>, Error> {
    let (where_clause, mut params) = where_clause(owner, filter);

    let mut query = format!(
        "SELECT m.id, m.user_id, m.category_id, m.description, m.date, m.amount_cents \
         {FROM_CLAUSE} {where_clause} \
         ORDER BY m.date DESC, m.id DESC"
    );

    if let Some(page) = page {
        query.push_str(" LIMIT ? OFFSET ?");
        params.push(Value::Integer(i64::try_from(page.limit()).unwrap_or(i64::MAX)));
        params.push(Value::Integer(i64::try_from(page.offset()).unwrap_or(i64::MAX)));
    }

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_movement_row)?
        .collect::<Result<Vec<Movement>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Count `owner`'s movements matching `filter`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_movements(
    owner: UserID,
    filter: &MovementFilter,
    connection: &Connection,
) -> Result<usize, Error> {
    let (where_clause, params) = where_clause(owner, filter);

    connection
        .query_row(
            &format!("SELECT COUNT(m.id) {FROM_CLAUSE} {where_clause}"),
            params_from_iter(params),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Get the amount, date and category of `owner`'s movements matching `filter`
/// for aggregation.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_ledger_entries(
    owner: UserID,
    filter: &MovementFilter,
    connection: &Connection,
) -> Result<Vec<LedgerEntry>, Error> {
    let (where_clause, params) = where_clause(owner, filter);

    let query = format!(
        "SELECT m.amount_cents, m.date, c.id, c.name, c.type {FROM_CLAUSE} {where_clause}"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), |row| {
            let category_id: Option<CategoryId> = row.get(2)?;
            let category = match category_id {
                Some(id) => Some(EntryCategory {
                    id,
                    name: row.get(3)?,
                    category_type: row.get(4)?,
                }),
                None => None,
            };

            Ok(LedgerEntry {
                amount: row.get(0)?,
                date: row.get(1)?,
                category,
            })
        })?
        .collect::<Result<Vec<LedgerEntry>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

#[cfg(test)]
mod movement_filter_tests {
    use rust_decimal_macros::dec;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, UserID,
        category::{CategoryName, CategoryType, create_category},
        movement::{
            Amount, Movement, MovementId, create_movement,
            query::{
                MovementFilter, MovementQuery, count_movements, get_ledger_entries, get_movements,
            },
        },
        pagination::PageRequest,
        test_utils::get_test_connection_with_users,
    };

    struct Fixture {
        connection: Connection,
        alice: UserID,
        bob: UserID,
        salary_id: i64,
        income_id: MovementId,
        expense_id: MovementId,
    }

    /// Alice earns 2000.00 on 2025-05-17 and pays 500.00 rent on 2025-05-18.
    /// Bob has one uncategorized movement on 2025-05-17.
    fn fixture() -> Fixture {
        let (connection, alice, bob) = get_test_connection_with_users();
        let salary = create_category(
            alice,
            CategoryName::new_unchecked("Salary"),
            CategoryType::Income,
            &connection,
        )
        .unwrap();
        let rent = create_category(
            alice,
            CategoryName::new_unchecked("Rent"),
            CategoryType::Expense,
            &connection,
        )
        .unwrap();
        let income = create_movement(
            alice,
            Movement::build(Amount::new(dec!(2000)).unwrap(), date!(2025 - 05 - 17), "")
                .category(Some(salary.id)),
            &connection,
        )
        .unwrap();
        let expense = create_movement(
            alice,
            Movement::build(Amount::new(dec!(500)).unwrap(), date!(2025 - 05 - 18), "")
                .category(Some(rent.id)),
            &connection,
        )
        .unwrap();
        create_movement(
            bob,
            Movement::build(Amount::new(dec!(1)).unwrap(), date!(2025 - 05 - 17), ""),
            &connection,
        )
        .unwrap();

        Fixture {
            connection,
            alice,
            bob,
            salary_id: salary.id,
            income_id: income.id,
            expense_id: expense.id,
        }
    }

    fn ids(fixture: &Fixture, filter: MovementFilter) -> Vec<MovementId> {
        get_movements(fixture.alice, &filter, None, &fixture.connection)
            .unwrap()
            .into_iter()
            .map(|movement| movement.id)
            .collect()
    }

    #[test]
    fn lists_newest_first() {
        let fixture = fixture();

        let got = ids(&fixture, MovementFilter::default());

        assert_eq!(got, vec![fixture.expense_id, fixture.income_id]);
    }

    #[test]
    fn same_day_movements_are_ordered_by_id_descending() {
        let fixture = fixture();
        let later = create_movement(
            fixture.alice,
            Movement::build(Amount::new(dec!(3)).unwrap(), date!(2025 - 05 - 18), ""),
            &fixture.connection,
        )
        .unwrap();

        let got = ids(&fixture, MovementFilter::default());

        assert_eq!(got, vec![later.id, fixture.expense_id, fixture.income_id]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let fixture = fixture();

        let from = ids(
            &fixture,
            MovementFilter {
                date_from: Some(date!(2025 - 05 - 18)),
                ..Default::default()
            },
        );
        let to = ids(
            &fixture,
            MovementFilter {
                date_to: Some(date!(2025 - 05 - 17)),
                ..Default::default()
            },
        );
        let both = ids(
            &fixture,
            MovementFilter {
                date_from: Some(date!(2025 - 05 - 17)),
                date_to: Some(date!(2025 - 05 - 18)),
                ..Default::default()
            },
        );

        assert_eq!(from, vec![fixture.expense_id]);
        assert_eq!(to, vec![fixture.income_id]);
        assert_eq!(both, vec![fixture.expense_id, fixture.income_id]);
    }

    #[test]
    fn inverted_date_range_is_empty() {
        let fixture = fixture();

        let got = ids(
            &fixture,
            MovementFilter {
                date_from: Some(date!(2025 - 05 - 18)),
                date_to: Some(date!(2025 - 05 - 17)),
                ..Default::default()
            },
        );

        assert!(got.is_empty());
    }

    #[test]
    fn filters_by_category_and_type() {
        let fixture = fixture();

        let by_category = ids(
            &fixture,
            MovementFilter {
                category: Some(fixture.salary_id),
                ..Default::default()
            },
        );
        let by_type = ids(
            &fixture,
            MovementFilter {
                category_type: Some(CategoryType::Expense),
                ..Default::default()
            },
        );

        assert_eq!(by_category, vec![fixture.income_id]);
        assert_eq!(by_type, vec![fixture.expense_id]);
    }

    #[test]
    fn never_returns_other_users_movements() {
        let fixture = fixture();

        let bobs = get_movements(
            fixture.bob,
            &MovementFilter {
                category: Some(fixture.salary_id),
                ..Default::default()
            },
            None,
            &fixture.connection,
        )
        .unwrap();

        assert!(bobs.is_empty());
        assert_eq!(
            count_movements(fixture.bob, &MovementFilter::default(), &fixture.connection),
            Ok(1)
        );
    }

    #[test]
    fn pages_results() {
        let fixture = fixture();

        let page = get_movements(
            fixture.alice,
            &MovementFilter::default(),
            Some(PageRequest {
                page: 2,
                page_size: 1,
            }),
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, fixture.income_id);
    }

    #[test]
    fn ledger_entries_carry_category_details() {
        let fixture = fixture();

        let entries = get_ledger_entries(
            fixture.alice,
            &MovementFilter {
                category_type: Some(CategoryType::Income),
                ..Default::default()
            },
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        let category = entries[0].category.as_ref().unwrap();
        assert_eq!(category.id, fixture.salary_id);
        assert_eq!(category.name, "Salary");
        assert_eq!(entries[0].amount.to_string(), "2000.00");
    }

    #[test]
    fn parses_query_parameters() {
        let filter = MovementFilter::try_from(MovementQuery {
            category: Some("4".to_owned()),
            category_type: Some("gasto".to_owned()),
            date_from: Some("2025-05-01".to_owned()),
            date_to: Some("".to_owned()),
        })
        .unwrap();

        assert_eq!(
            filter,
            MovementFilter {
                category: Some(4),
                category_type: None,
                date_from: Some(date!(2025 - 05 - 01)),
                date_to: None,
            }
        );
    }

    #[test]
    fn rejects_malformed_parameters() {
        let bad_category = MovementFilter::try_from(MovementQuery {
            category: Some("rent".to_owned()),
            ..Default::default()
        });
        let bad_date = MovementFilter::try_from(MovementQuery {
            date_to: Some("May 17".to_owned()),
            ..Default::default()
        });

        assert!(matches!(
            bad_category,
            Err(Error::Validation {
                field: "category",
                ..
            })
        ));
        assert!(matches!(
            bad_date,
            Err(Error::Validation {
                field: "date_to",
                ..
            })
        ));
    }
}
