//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub meta_description: Option<String>,
    pub focus_keyword: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub keywords: Option<Json>,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub seo_score: Option<i16>,
    pub is_published: bool,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub view_count: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for lekha_core::domain::Post {
    fn from(model: Model) -> Self {
        let keywords = model
            .keywords
            .and_then(|json| serde_json::from_value::<Vec<String>>(json).ok())
            .unwrap_or_default();

        Self {
            id: model.id,
            category_id: model.category_id,
            title: model.title,
            slug: model.slug,
            excerpt: model.excerpt,
            content: model.content,
            featured_image: model.featured_image,
            meta_title: model.meta_title,
            meta_description: model.meta_description,
            focus_keyword: model.focus_keyword,
            keywords,
            og_image: model.og_image,
            canonical_url: model.canonical_url,
            seo_score: model.seo_score.map(|s| s.clamp(0, 100) as u8),
            is_published: model.is_published,
            published_at: model.published_at.map(Into::into),
            view_count: model.view_count,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<lekha_core::domain::Post> for ActiveModel {
    fn from(post: lekha_core::domain::Post) -> Self {
        let keywords = (!post.keywords.is_empty()).then(|| Json::from(post.keywords));

        Self {
            id: Set(post.id),
            category_id: Set(post.category_id),
            title: Set(post.title),
            slug: Set(post.slug),
            excerpt: Set(post.excerpt),
            content: Set(post.content),
            featured_image: Set(post.featured_image),
            meta_title: Set(post.meta_title),
            meta_description: Set(post.meta_description),
            focus_keyword: Set(post.focus_keyword),
            keywords: Set(keywords),
            og_image: Set(post.og_image),
            canonical_url: Set(post.canonical_url),
            seo_score: Set(post.seo_score.map(i16::from)),
            is_published: Set(post.is_published),
            published_at: Set(post.published_at.map(Into::into)),
            view_count: Set(post.view_count),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
