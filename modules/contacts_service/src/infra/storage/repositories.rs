//! SeaORM repository implementations

use crate::contract::{Contact, ContactDraft, ContactFilter, NewUser, User};
use crate::domain::repository::{ContactRepository, UserRepository};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect,
};
use sea_orm::ActiveValue::Set;
use std::sync::Arc;

use super::{entity, mapper};

// ===== User Repository =====

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_one(&self, condition: Condition) -> Result<Option<entity::user::Model>> {
        Ok(entity::user::Entity::find()
            .filter(condition)
            .one(&*self.db)
            .await?)
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>> {
        let result = entity::user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let result = self
            .find_one(Condition::all().add(entity::user::Column::Username.eq(username)))
            .await?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = self
            .find_one(Condition::all().add(entity::user::Column::Email.eq(email)))
            .await?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let active: entity::user::ActiveModel = user.into();
        let model = active.insert(&*self.db).await?;

        Ok(model.into())
    }

    async fn confirm_email(&self, email: &str) -> Result<()> {
        entity::user::Entity::update_many()
            .col_expr(entity::user::Column::Confirmed, Expr::value(true))
            .filter(entity::user::Column::Email.eq(email))
            .exec(&*self.db)
            .await?;

        Ok(())
    }

    async fn update_avatar(&self, email: &str, url: &str) -> Result<Option<User>> {
        let Some(model) = self
            .find_one(Condition::all().add(entity::user::Column::Email.eq(email)))
            .await?
        else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        active.avatar = Set(Some(url.to_string()));
        let updated = active.update(&*self.db).await?;

        Ok(Some(updated.into()))
    }

    async fn update_password(&self, user_id: i32, hashed_password: &str) -> Result<Option<User>> {
        let Some(model) = entity::user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        active.hashed_password = Set(hashed_password.to_string());
        let updated = active.update(&*self.db).await?;

        Ok(Some(updated.into()))
    }
}

// ===== Contact Repository =====

pub struct SeaOrmContactRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmContactRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, contact_id: i32, owner_id: i32) -> Result<Option<entity::Model>> {
        Ok(entity::Entity::find_by_id(contact_id)
            .filter(entity::Column::UserId.eq(owner_id))
            .one(&*self.db)
            .await?)
    }
}

#[async_trait]
impl ContactRepository for SeaOrmContactRepository {
    async fn list(&self, filter: &ContactFilter, owner_id: i32) -> Result<Vec<Contact>> {
        let mut query = entity::Entity::find().filter(entity::Column::UserId.eq(owner_id));

        if !filter.first_name.is_empty() {
            query = query.filter(entity::Column::FirstName.contains(&filter.first_name));
        }
        if !filter.last_name.is_empty() {
            query = query.filter(entity::Column::LastName.contains(&filter.last_name));
        }
        if !filter.email.is_empty() {
            query = query.filter(entity::Column::Email.contains(&filter.email));
        }

        let results = query
            .order_by_asc(entity::Column::Id)
            .offset(filter.skip)
            .limit(filter.limit)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, contact_id: i32, owner_id: i32) -> Result<Option<Contact>> {
        Ok(self.find_model(contact_id, owner_id).await?.map(Into::into))
    }

    async fn create(&self, draft: &ContactDraft, owner_id: i32) -> Result<Contact> {
        let model = mapper::new_contact(draft, owner_id).insert(&*self.db).await?;

        Ok(model.into())
    }

    async fn update(
        &self,
        contact_id: i32,
        draft: &ContactDraft,
        owner_id: i32,
    ) -> Result<Option<Contact>> {
        let Some(model) = self.find_model(contact_id, owner_id).await? else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        mapper::apply_draft(&mut active, draft);
        let updated = active.update(&*self.db).await?;

        Ok(Some(updated.into()))
    }

    async fn remove(&self, contact_id: i32, owner_id: i32) -> Result<Option<Contact>> {
        let Some(model) = self.find_model(contact_id, owner_id).await? else {
            return Ok(None);
        };

        let removed: Contact = model.clone().into();
        model.delete(&*self.db).await?;

        Ok(Some(removed))
    }

    async fn exists_with_email_or_phone(&self, email: &str, phone_number: &str) -> Result<bool> {
        let found = entity::Entity::find()
            .filter(
                Condition::any()
                    .add(entity::Column::Email.eq(email))
                    .add(entity::Column::PhoneNumber.eq(phone_number)),
            )
            .one(&*self.db)
            .await?;

        Ok(found.is_some())
    }

    async fn list_with_birth_date(&self, owner_id: i32) -> Result<Vec<Contact>> {
        let results = entity::Entity::find()
            .filter(entity::Column::UserId.eq(owner_id))
            .filter(entity::Column::BirthDate.is_not_null())
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(Into::into).collect())
    }
}
