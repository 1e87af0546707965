#![allow(dead_code)]

use repobase::{RepositoryBase, Storage};
use sea_orm::{ActiveValue, ConnectionTrait, Schema};

pub mod customer {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "customers")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub email: Option<String>,
        pub city: Option<String>,
        pub zip: Option<String>,
        pub balance: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// In-memory database with the customers table created.
pub async fn setup() -> (Storage, RepositoryBase<customer::Entity>) {
    let storage = Storage::in_memory().await.expect("in-memory database");
    let backend = storage.backend();
    let schema = Schema::new(backend);
    storage
        .conn()
        .execute(backend.build(&schema.create_table_from_entity(customer::Entity)))
        .await
        .expect("create customers table");

    let repo = RepositoryBase::new(storage.shared());
    (storage, repo)
}

pub fn new_customer(name: &str, city: Option<&str>, balance: i32) -> customer::ActiveModel {
    customer::ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(name.to_string()),
        email: ActiveValue::Set(None),
        city: ActiveValue::Set(city.map(str::to_string)),
        zip: ActiveValue::Set(None),
        balance: ActiveValue::Set(balance),
    }
}
