mod dto;
mod repo;
pub mod repo_types;

use axum::{routing::get, Router};

use crate::crud;
use crate::state::AppState;
use repo_types::{ShoppingList, ShoppingListItem};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/shopping-lists",
            get(crud::list::<ShoppingList>).post(crud::create::<ShoppingList>),
        )
        .route(
            "/shopping-lists/:id",
            get(crud::retrieve::<ShoppingList>)
                .put(crud::replace::<ShoppingList>)
                .patch(crud::patch::<ShoppingList>)
                .delete(crud::destroy::<ShoppingList>),
        )
        .route(
            "/shopping-lists/:id/items",
            get(crud::list_children::<ShoppingListItem>)
                .post(crud::create_child::<ShoppingListItem>),
        )
        .route(
            "/shopping-list-items/:id",
            get(crud::retrieve::<ShoppingListItem>)
                .put(crud::replace::<ShoppingListItem>)
                .patch(crud::patch::<ShoppingListItem>)
                .delete(crud::destroy::<ShoppingListItem>),
        )
}
