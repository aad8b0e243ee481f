use sea_orm_migration::prelude::*;

const CATEGORY_FK: &str = "fk_posts_category_id";
const LISTING_INDEX: &str = "idx_posts_category_published";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Posts::Title).string().not_null())
                    .col(ColumnDef::new(Posts::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Posts::Excerpt).text().null())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::FeaturedImage).string().null())
                    .col(ColumnDef::new(Posts::MetaTitle).string().null())
                    .col(ColumnDef::new(Posts::MetaDescription).text().null())
                    .col(ColumnDef::new(Posts::FocusKeyword).string().null())
                    .col(ColumnDef::new(Posts::Keywords).json_binary().null())
                    .col(ColumnDef::new(Posts::OgImage).string().null())
                    .col(ColumnDef::new(Posts::CanonicalUrl).string().null())
                    .col(ColumnDef::new(Posts::SeoScore).small_integer().null())
                    .col(
                        ColumnDef::new(Posts::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Posts::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Posts::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Posts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(CATEGORY_FK)
                            .from(Posts::Table, Posts::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Public listings filter by category and publication state
        manager
            .create_index(
                Index::create()
                    .name(LISTING_INDEX)
                    .table(Posts::Table)
                    .col(Posts::CategoryId)
                    .col(Posts::IsPublished)
                    .col(Posts::PublishedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    CategoryId,
    Title,
    Slug,
    Excerpt,
    Content,
    FeaturedImage,
    MetaTitle,
    MetaDescription,
    FocusKeyword,
    Keywords,
    OgImage,
    CanonicalUrl,
    SeoScore,
    IsPublished,
    PublishedAt,
    ViewCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}
