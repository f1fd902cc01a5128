use anyhow::Result;

use storegen_core::output::sqlite::connect;
use storegen_core::schema;
use storegen_core::StoregenError;

use crate::args::SchemaArgs;

pub async fn run(args: &SchemaArgs) -> Result<()> {
    if !args.apply {
        // create_script() already carries drops, tables, and indexes
        print!("{}", schema::create_script());
        return Ok(());
    }

    let db_url = args.db.clone().ok_or(StoregenError::NoDatabaseUrl)?;
    let pool = connect(&db_url).await?;
    for table in schema::TABLES {
        sqlx::query(table.ddl).execute(&pool).await?;
    }
    for index in schema::INDEXES {
        sqlx::query(index).execute(&pool).await?;
    }
    eprintln!(
        "✓ Applied schema ({} tables, {} indexes) to {}",
        schema::TABLES.len(),
        schema::INDEXES.len(),
        db_url
    );
    Ok(())
}
