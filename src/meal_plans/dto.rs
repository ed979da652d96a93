use uuid::Uuid;

use super::repo_types::{MealPlan, MealPlanDraft, MealPlanEntry, MealPlanEntryDraft, MealType};
use crate::errors::{AppError, ValidationErrors};
use crate::wire::{check_text, iso_date, optional, required, WireObject, WireRecord, WriteMode};

const NAME_MAX: usize = 200;
const NOTES_MAX: usize = 1000;
const SERVINGS_RANGE: std::ops::RangeInclusive<i32> = 1..=100;

impl WireRecord for MealPlan {
    const DETAIL_PATH: &'static str = "/meal-plans";

    fn to_draft(&self) -> MealPlanDraft {
        MealPlanDraft {
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    fn from_wire(
        body: &WireObject,
        prior: Option<&MealPlanDraft>,
        mode: WriteMode,
    ) -> Result<MealPlanDraft, AppError> {
        let mut errors = ValidationErrors::default();

        let name = body.take_text("name", &mut errors);
        let start_date = body.take_with("start_date", &mut errors, |v| iso_date::deserialize(v));
        let end_date = body.take_with("end_date", &mut errors, |v| iso_date::deserialize(v));

        let name = required("name", name, prior.map(|p| p.name.clone()), mode, &mut errors);
        let start_date = required("start_date", start_date, prior.map(|p| p.start_date), mode, &mut errors);
        let end_date = required("end_date", end_date, prior.map(|p| p.end_date), mode, &mut errors);

        if let Some(name) = &name {
            check_text("name", name, 1, NAME_MAX, &mut errors);
        }
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.add("end_date", "Must not be before start_date.");
            }
        }

        let (Some(name), Some(start_date), Some(end_date)) = (name, start_date, end_date) else {
            return Err(AppError::Validation(errors));
        };
        errors.into_result(MealPlanDraft {
            name,
            start_date,
            end_date,
        })
    }
}

impl WireRecord for MealPlanEntry {
    const DETAIL_PATH: &'static str = "/meal-plan-entries";

    fn to_draft(&self) -> MealPlanEntryDraft {
        MealPlanEntryDraft {
            recipe_id: self.recipe_id,
            date: self.date,
            meal_type: self.meal_type,
            servings: self.servings,
            notes: self.notes.clone(),
        }
    }

    fn from_wire(
        body: &WireObject,
        prior: Option<&MealPlanEntryDraft>,
        mode: WriteMode,
    ) -> Result<MealPlanEntryDraft, AppError> {
        let mut errors = ValidationErrors::default();

        let recipe_id = body.take::<Option<Uuid>>("recipe_id", &mut errors);
        let date = body.take_with("date", &mut errors, |v| iso_date::deserialize(v));
        let meal_type = body.take::<MealType>("meal_type", &mut errors);
        let servings = body.take::<i32>("servings", &mut errors);
        let notes = body.take::<String>("notes", &mut errors);

        let date = required("date", date, prior.map(|p| p.date), mode, &mut errors);
        let meal_type = required("meal_type", meal_type, prior.map(|p| p.meal_type), mode, &mut errors);
        let recipe_id = optional(recipe_id, prior.map(|p| p.recipe_id), mode, || None);
        let servings = optional(servings, prior.map(|p| p.servings), mode, || 1);
        let notes = optional(notes, prior.map(|p| p.notes.clone()), mode, String::new);

        if !SERVINGS_RANGE.contains(&servings) {
            errors.add(
                "servings",
                format!(
                    "Must be between {} and {}.",
                    SERVINGS_RANGE.start(),
                    SERVINGS_RANGE.end()
                ),
            );
        }
        check_text("notes", &notes, 0, NOTES_MAX, &mut errors);

        let (Some(date), Some(meal_type)) = (date, meal_type) else {
            return Err(AppError::Validation(errors));
        };
        errors.into_result(MealPlanEntryDraft {
            recipe_id,
            date,
            meal_type,
            servings,
            notes,
        })
    }
}
