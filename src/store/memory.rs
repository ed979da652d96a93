use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NutritionCatalog, Repository, StoreResult};
use crate::meal_plans::repo_types::{MealPlan, MealPlanDraft, MealPlanEntry, MealPlanEntryDraft};
use crate::nutrition::repo_types::NutritionInfo;
use crate::shopping::repo_types::{
    ShoppingList, ShoppingListDraft, ShoppingListItem, ShoppingListItemDraft,
};

#[derive(Default)]
struct Tables {
    meal_plans: HashMap<Uuid, MealPlan>,
    entries: HashMap<Uuid, MealPlanEntry>,
    shopping_lists: HashMap<Uuid, ShoppingList>,
    items: HashMap<Uuid, ShoppingListItem>,
    nutrition: HashMap<Uuid, NutritionInfo>,
}

impl Tables {
    fn owns_plan(&self, owner: Uuid, plan_id: Uuid) -> bool {
        self.meal_plans.get(&plan_id).is_some_and(|p| p.user_id == owner)
    }

    fn owns_list(&self, owner: Uuid, list_id: Uuid) -> bool {
        self.shopping_lists.get(&list_id).is_some_and(|l| l.user_id == owner)
    }
}

/// Process-local store. All tables sit behind one lock, so a parent and its
/// children are removed in a single step.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with nutrition reference rows.
    pub fn with_nutrition(rows: impl IntoIterator<Item = NutritionInfo>) -> Self {
        let tables = Tables {
            nutrition: rows.into_iter().map(|n| (n.id, n)).collect(),
            ..Tables::default()
        };
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (OffsetDateTime, Uuid)) {
    rows.sort_by(|a, b| {
        let (ta, ia) = key(a);
        let (tb, ib) = key(b);
        tb.cmp(&ta).then(ia.cmp(&ib))
    });
}

#[async_trait]
impl Repository<MealPlan> for MemoryStore {
    async fn list(&self, owner: Uuid, _parent: ()) -> StoreResult<Vec<MealPlan>> {
        let t = self.tables.read().await;
        let mut rows: Vec<_> = t.meal_plans.values().filter(|p| p.user_id == owner).cloned().collect();
        newest_first(&mut rows, |p| (p.created_at, p.id));
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<MealPlan>> {
        let t = self.tables.read().await;
        Ok(t.meal_plans.get(&id).filter(|p| p.user_id == owner).cloned())
    }

    async fn insert(&self, owner: Uuid, _parent: (), draft: MealPlanDraft) -> StoreResult<Option<MealPlan>> {
        let now = OffsetDateTime::now_utc();
        let plan = MealPlan {
            id: Uuid::new_v4(),
            user_id: owner,
            name: draft.name,
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.meal_plans.insert(plan.id, plan.clone());
        Ok(Some(plan))
    }

    async fn update(&self, owner: Uuid, id: Uuid, draft: MealPlanDraft) -> StoreResult<Option<MealPlan>> {
        let mut t = self.tables.write().await;
        let Some(plan) = t.meal_plans.get_mut(&id).filter(|p| p.user_id == owner) else {
            return Ok(None);
        };
        plan.name = draft.name;
        plan.start_date = draft.start_date;
        plan.end_date = draft.end_date;
        plan.updated_at = OffsetDateTime::now_utc();
        Ok(Some(plan.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if !t.owns_plan(owner, id) {
            return Ok(false);
        }
        t.meal_plans.remove(&id);
        t.entries.retain(|_, e| e.meal_plan_id != id);
        Ok(true)
    }
}

#[async_trait]
impl Repository<MealPlanEntry> for MemoryStore {
    async fn list(&self, owner: Uuid, plan_id: Uuid) -> StoreResult<Vec<MealPlanEntry>> {
        let t = self.tables.read().await;
        if !t.owns_plan(owner, plan_id) {
            return Ok(Vec::new());
        }
        let mut rows: Vec<_> = t.entries.values().filter(|e| e.meal_plan_id == plan_id).cloned().collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<MealPlanEntry>> {
        let t = self.tables.read().await;
        Ok(t.entries
            .get(&id)
            .filter(|e| t.owns_plan(owner, e.meal_plan_id))
            .cloned())
    }

    async fn insert(
        &self,
        owner: Uuid,
        plan_id: Uuid,
        draft: MealPlanEntryDraft,
    ) -> StoreResult<Option<MealPlanEntry>> {
        let mut t = self.tables.write().await;
        if !t.owns_plan(owner, plan_id) {
            return Ok(None);
        }
        let entry = MealPlanEntry {
            id: Uuid::new_v4(),
            meal_plan_id: plan_id,
            recipe_id: draft.recipe_id,
            date: draft.date,
            meal_type: draft.meal_type,
            servings: draft.servings,
            notes: draft.notes,
        };
        t.entries.insert(entry.id, entry.clone());
        Ok(Some(entry))
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        draft: MealPlanEntryDraft,
    ) -> StoreResult<Option<MealPlanEntry>> {
        let mut t = self.tables.write().await;
        let visible = t.entries.get(&id).is_some_and(|e| t.owns_plan(owner, e.meal_plan_id));
        let Some(entry) = t.entries.get_mut(&id).filter(|_| visible) else {
            return Ok(None);
        };
        entry.recipe_id = draft.recipe_id;
        entry.date = draft.date;
        entry.meal_type = draft.meal_type;
        entry.servings = draft.servings;
        entry.notes = draft.notes;
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        let visible = t.entries.get(&id).is_some_and(|e| t.owns_plan(owner, e.meal_plan_id));
        Ok(visible && t.entries.remove(&id).is_some())
    }
}

#[async_trait]
impl Repository<ShoppingList> for MemoryStore {
    async fn list(&self, owner: Uuid, _parent: ()) -> StoreResult<Vec<ShoppingList>> {
        let t = self.tables.read().await;
        let mut rows: Vec<_> = t
            .shopping_lists
            .values()
            .filter(|l| l.user_id == owner)
            .cloned()
            .collect();
        newest_first(&mut rows, |l| (l.created_at, l.id));
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<ShoppingList>> {
        let t = self.tables.read().await;
        Ok(t.shopping_lists.get(&id).filter(|l| l.user_id == owner).cloned())
    }

    async fn insert(
        &self,
        owner: Uuid,
        _parent: (),
        draft: ShoppingListDraft,
    ) -> StoreResult<Option<ShoppingList>> {
        let now = OffsetDateTime::now_utc();
        let list = ShoppingList {
            id: Uuid::new_v4(),
            user_id: owner,
            name: draft.name,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.shopping_lists.insert(list.id, list.clone());
        Ok(Some(list))
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        draft: ShoppingListDraft,
    ) -> StoreResult<Option<ShoppingList>> {
        let mut t = self.tables.write().await;
        let Some(list) = t.shopping_lists.get_mut(&id).filter(|l| l.user_id == owner) else {
            return Ok(None);
        };
        list.name = draft.name;
        list.is_active = draft.is_active;
        list.updated_at = OffsetDateTime::now_utc();
        Ok(Some(list.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if !t.owns_list(owner, id) {
            return Ok(false);
        }
        t.shopping_lists.remove(&id);
        t.items.retain(|_, i| i.shopping_list_id != id);
        Ok(true)
    }
}

#[async_trait]
impl Repository<ShoppingListItem> for MemoryStore {
    async fn list(&self, owner: Uuid, list_id: Uuid) -> StoreResult<Vec<ShoppingListItem>> {
        let t = self.tables.read().await;
        if !t.owns_list(owner, list_id) {
            return Ok(Vec::new());
        }
        let mut rows: Vec<_> = t.items.values().filter(|i| i.shopping_list_id == list_id).cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<ShoppingListItem>> {
        let t = self.tables.read().await;
        Ok(t.items
            .get(&id)
            .filter(|i| t.owns_list(owner, i.shopping_list_id))
            .cloned())
    }

    async fn insert(
        &self,
        owner: Uuid,
        list_id: Uuid,
        draft: ShoppingListItemDraft,
    ) -> StoreResult<Option<ShoppingListItem>> {
        let mut t = self.tables.write().await;
        if !t.owns_list(owner, list_id) {
            return Ok(None);
        }
        let item = ShoppingListItem {
            id: Uuid::new_v4(),
            shopping_list_id: list_id,
            name: draft.name,
            quantity: draft.quantity,
            category: draft.category,
            estimated_price: draft.estimated_price,
            is_purchased: draft.is_purchased,
        };
        t.items.insert(item.id, item.clone());
        Ok(Some(item))
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        draft: ShoppingListItemDraft,
    ) -> StoreResult<Option<ShoppingListItem>> {
        let mut t = self.tables.write().await;
        let visible = t.items.get(&id).is_some_and(|i| t.owns_list(owner, i.shopping_list_id));
        let Some(item) = t.items.get_mut(&id).filter(|_| visible) else {
            return Ok(None);
        };
        item.name = draft.name;
        item.quantity = draft.quantity;
        item.category = draft.category;
        item.estimated_price = draft.estimated_price;
        item.is_purchased = draft.is_purchased;
        Ok(Some(item.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        let visible = t.items.get(&id).is_some_and(|i| t.owns_list(owner, i.shopping_list_id));
        Ok(visible && t.items.remove(&id).is_some())
    }
}

#[async_trait]
impl NutritionCatalog for MemoryStore {
    async fn list_nutrition(&self) -> StoreResult<Vec<NutritionInfo>> {
        let t = self.tables.read().await;
        let mut rows: Vec<_> = t.nutrition.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get_nutrition(&self, id: Uuid) -> StoreResult<Option<NutritionInfo>> {
        Ok(self.tables.read().await.nutrition.get(&id).cloned())
    }
}
