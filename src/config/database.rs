//! Database configuration module for the retainer ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to automatically generate SQL statements
//! from the entity models, so the database schema matches the Rust struct definitions
//! without manual SQL.

use crate::entities::{Agreement, Contract, Issue, LaborBudget, OverheadBudget, TimeEntry};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> Result<String> {
    Ok(std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/retainer_ledger.sqlite".to_string()))
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url()?;

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Creation order respects foreign keys: contracts before agreements, agreements
/// before issues and budgets, issues before time entries.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let contract_table = schema.create_table_from_entity(Contract);
    let agreement_table = schema.create_table_from_entity(Agreement);
    let issue_table = schema.create_table_from_entity(Issue);
    let time_entry_table = schema.create_table_from_entity(TimeEntry);
    let labor_budget_table = schema.create_table_from_entity(LaborBudget);
    let overhead_budget_table = schema.create_table_from_entity(OverheadBudget);

    db.execute(builder.build(&contract_table)).await?;
    db.execute(builder.build(&agreement_table)).await?;
    db.execute(builder.build(&issue_table)).await?;
    db.execute(builder.build(&time_entry_table)).await?;
    db.execute(builder.build(&labor_budget_table)).await?;
    db.execute(builder.build(&overhead_budget_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        AgreementModel, ContractModel, IssueModel, LaborBudgetModel, OverheadBudgetModel,
        TimeEntryModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_connection() -> Result<()> {
        // Use in-memory database for testing to avoid touching a real database file
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that we can execute a query to verify the connection is working
        let _: Vec<AgreementModel> = Agreement::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<ContractModel> = Contract::find().limit(1).all(&db).await?;
        let _: Vec<AgreementModel> = Agreement::find().limit(1).all(&db).await?;
        let _: Vec<IssueModel> = Issue::find().limit(1).all(&db).await?;
        let _: Vec<TimeEntryModel> = TimeEntry::find().limit(1).all(&db).await?;
        let _: Vec<LaborBudgetModel> = LaborBudget::find().limit(1).all(&db).await?;
        let _: Vec<OverheadBudgetModel> = OverheadBudget::find().limit(1).all(&db).await?;

        Ok(())
    }
}
