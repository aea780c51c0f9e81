use sea_orm_migration::prelude::*;

const ROLE_NAMES: [&str; 3] = ["SYSTEM_ADMIN", "LOCATION_ADMIN", "LOCATION_OPERATOR"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let mut insert = Query::insert()
            .into_table(Roles::Table)
            .columns([Roles::Name, Roles::CreatedAt, Roles::UpdatedAt])
            .to_owned();

        for name in ROLE_NAMES {
            insert.values_panic([name.into(), now.into(), now.into()]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Roles::Table)
                    .and_where(Expr::col(Roles::Name).is_in(ROLE_NAMES))
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Name,
    CreatedAt,
    UpdatedAt,
}
