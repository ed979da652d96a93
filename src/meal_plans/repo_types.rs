use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::store::{ChildRecord, Record};
use crate::wire::iso_date;

/// Meal plan owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealPlanDraft {
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Error)]
#[error("unknown meal type {0:?}")]
pub struct UnknownMealType(String);

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl TryFrom<String> for MealType {
    type Error = UnknownMealType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(UnknownMealType(value)),
        }
    }
}

/// One planned meal inside a plan.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MealPlanEntry {
    pub id: Uuid,
    pub meal_plan_id: Uuid,
    pub recipe_id: Option<Uuid>,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[sqlx(try_from = "String")]
    pub meal_type: MealType,
    pub servings: i32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealPlanEntryDraft {
    pub recipe_id: Option<Uuid>,
    pub date: Date,
    pub meal_type: MealType,
    pub servings: i32,
    pub notes: String,
}

impl Record for MealPlan {
    const KIND: &'static str = "meal plan";
    type Draft = MealPlanDraft;
    type Parent = ();

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for MealPlanEntry {
    const KIND: &'static str = "meal plan entry";
    type Draft = MealPlanEntryDraft;
    type Parent = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl ChildRecord for MealPlanEntry {
    type ParentRecord = MealPlan;
}
