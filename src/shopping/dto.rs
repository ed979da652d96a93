use super::repo_types::{ShoppingList, ShoppingListDraft, ShoppingListItem, ShoppingListItemDraft};
use crate::errors::{AppError, ValidationErrors};
use crate::wire::{check_text, optional, required, WireObject, WireRecord, WriteMode};

const NAME_MAX: usize = 200;
const LABEL_MAX: usize = 100;

impl WireRecord for ShoppingList {
    const DETAIL_PATH: &'static str = "/shopping-lists";

    fn to_draft(&self) -> ShoppingListDraft {
        ShoppingListDraft {
            name: self.name.clone(),
            is_active: self.is_active,
        }
    }

    fn from_wire(
        body: &WireObject,
        prior: Option<&ShoppingListDraft>,
        mode: WriteMode,
    ) -> Result<ShoppingListDraft, AppError> {
        let mut errors = ValidationErrors::default();

        let name = body.take_text("name", &mut errors);
        let is_active = body.take::<bool>("is_active", &mut errors);

        let name = required("name", name, prior.map(|p| p.name.clone()), mode, &mut errors);
        let is_active = optional(is_active, prior.map(|p| p.is_active), mode, || true);
        if let Some(name) = &name {
            check_text("name", name, 1, NAME_MAX, &mut errors);
        }

        let Some(name) = name else {
            return Err(AppError::Validation(errors));
        };
        errors.into_result(ShoppingListDraft { name, is_active })
    }
}

impl WireRecord for ShoppingListItem {
    const DETAIL_PATH: &'static str = "/shopping-list-items";

    fn to_draft(&self) -> ShoppingListItemDraft {
        ShoppingListItemDraft {
            name: self.name.clone(),
            quantity: self.quantity.clone(),
            category: self.category.clone(),
            estimated_price: self.estimated_price,
            is_purchased: self.is_purchased,
        }
    }

    fn from_wire(
        body: &WireObject,
        prior: Option<&ShoppingListItemDraft>,
        mode: WriteMode,
    ) -> Result<ShoppingListItemDraft, AppError> {
        let mut errors = ValidationErrors::default();

        let name = body.take_text("name", &mut errors);
        let quantity = body.take_text("quantity", &mut errors);
        let category = body.take_text("category", &mut errors);
        let estimated_price = body.take::<Option<f64>>("estimated_price", &mut errors);
        let is_purchased = body.take::<bool>("is_purchased", &mut errors);

        let name = required("name", name, prior.map(|p| p.name.clone()), mode, &mut errors);
        let quantity = optional(quantity, prior.map(|p| p.quantity.clone()), mode, String::new);
        let category = optional(category, prior.map(|p| p.category.clone()), mode, String::new);
        let estimated_price = optional(estimated_price, prior.map(|p| p.estimated_price), mode, || None);
        let is_purchased = optional(is_purchased, prior.map(|p| p.is_purchased), mode, || false);

        if let Some(name) = &name {
            check_text("name", name, 1, NAME_MAX, &mut errors);
        }
        check_text("quantity", &quantity, 0, LABEL_MAX, &mut errors);
        check_text("category", &category, 0, LABEL_MAX, &mut errors);
        if estimated_price.is_some_and(|p| !p.is_finite() || p < 0.0) {
            errors.add("estimated_price", "Ensure this value is greater than or equal to 0.");
        }

        let Some(name) = name else {
            return Err(AppError::Validation(errors));
        };
        errors.into_result(ShoppingListItemDraft {
            name,
            quantity,
            category,
            estimated_price,
            is_purchased,
        })
    }
}
