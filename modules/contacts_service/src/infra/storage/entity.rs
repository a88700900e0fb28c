//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Contacts table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub first_name: String,

    pub last_name: String,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(unique)]
    pub phone_number: String,

    pub birth_date: Option<Date>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,

    /// Owner, cascades on user deletion
    pub user_id: i32,

    pub info: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Users table module
pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        #[sea_orm(unique)]
        pub username: String,

        #[sea_orm(unique)]
        pub email: String,

        pub hashed_password: String,

        pub created_at: DateTimeUtc,

        pub avatar: Option<String>,

        pub confirmed: bool,

        /// `user` or `admin`
        pub role: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::Entity")]
        Contacts,
    }

    impl Related<super::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Contacts.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
