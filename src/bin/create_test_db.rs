use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use finance_ledger::{
    Amount, CategoryName, CategoryType, Movement, create_category, create_movement, create_token,
    create_user, initialize_db,
};

/// A utility for creating a test database for the REST API server of finance_ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");
    let user = create_user("demo", &conn)?;
    let token = create_token(user.id, &conn)?;

    println!("Creating categories and movements...");
    let salary = create_category(
        user.id,
        CategoryName::new("Salary")?,
        CategoryType::Income,
        &conn,
    )?;
    let rent = create_category(
        user.id,
        CategoryName::new("Rent")?,
        CategoryType::Expense,
        &conn,
    )?;

    create_movement(
        user.id,
        Movement::build("2000.00".parse::<Amount>()?, date!(2025 - 05 - 17), "May salary")
            .category(Some(salary.id)),
        &conn,
    )?;
    create_movement(
        user.id,
        Movement::build("500.00".parse::<Amount>()?, date!(2025 - 05 - 18), "May rent")
            .category(Some(rent.id)),
        &conn,
    )?;

    println!("Success! Use this header to authenticate as '{}':", user.username);
    println!("Authorization: Bearer {token}");

    Ok(())
}
