use entity::{player_profiles, users};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};
use tracing::info;

/// Create `users` and `player_profiles` (with the FK and UNIQUE constraints
/// declared on the entities) if they do not exist yet.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, player_profiles::Entity).await?;
    Ok(())
}

async fn create_table<C: ConnectionTrait, E: EntityTrait>(db: &C, entity: E) -> Result<(), DbErr> {
    let table = entity.table_name().to_owned();
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    info!(%table, "table ready");
    Ok(())
}
