use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{ChildRecord, Record};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ShoppingList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingListDraft {
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ShoppingListItem {
    pub id: Uuid,
    pub shopping_list_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub category: String,
    pub estimated_price: Option<f64>,
    pub is_purchased: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingListItemDraft {
    pub name: String,
    pub quantity: String,
    pub category: String,
    pub estimated_price: Option<f64>,
    pub is_purchased: bool,
}

impl Record for ShoppingList {
    const KIND: &'static str = "shopping list";
    type Draft = ShoppingListDraft;
    type Parent = ();

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for ShoppingListItem {
    const KIND: &'static str = "shopping list item";
    type Draft = ShoppingListItemDraft;
    type Parent = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl ChildRecord for ShoppingListItem {
    type ParentRecord = ShoppingList;
}
