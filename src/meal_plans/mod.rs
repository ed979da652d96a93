mod dto;
mod repo;
pub mod repo_types;

use axum::{routing::get, Router};

use crate::crud;
use crate::state::AppState;
use repo_types::{MealPlan, MealPlanEntry};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/meal-plans",
            get(crud::list::<MealPlan>).post(crud::create::<MealPlan>),
        )
        .route(
            "/meal-plans/:id",
            get(crud::retrieve::<MealPlan>)
                .put(crud::replace::<MealPlan>)
                .patch(crud::patch::<MealPlan>)
                .delete(crud::destroy::<MealPlan>),
        )
        .route(
            "/meal-plans/:id/entries",
            get(crud::list_children::<MealPlanEntry>).post(crud::create_child::<MealPlanEntry>),
        )
        .route(
            "/meal-plan-entries/:id",
            get(crud::retrieve::<MealPlanEntry>)
                .put(crud::replace::<MealPlanEntry>)
                .patch(crud::patch::<MealPlanEntry>)
                .delete(crud::destroy::<MealPlanEntry>),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::test_support::TestApp;

    fn plan_body(name: &str) -> Value {
        json!({ "name": name, "start_date": "2024-09-02", "end_date": "2024-09-08" })
    }

    async fn create_plan(app: &TestApp, user: Uuid, name: &str) -> Value {
        let (k, v) = app.auth(user);
        let res = app
            .server
            .post("/api/v1/meal-plans")
            .add_header(k, v)
            .json(&plan_body(name))
            .await;
        res.assert_status(StatusCode::CREATED);
        res.json::<Value>()
    }

    async fn create_entry(app: &TestApp, user: Uuid, plan_id: &str) -> Value {
        let (k, v) = app.auth(user);
        let res = app
            .server
            .post(&format!("/api/v1/meal-plans/{plan_id}/entries"))
            .add_header(k, v)
            .json(&json!({ "date": "2024-09-03", "meal_type": "dinner", "servings": 3 }))
            .await;
        res.assert_status(StatusCode::CREATED);
        res.json::<Value>()
    }

    #[tokio::test]
    async fn requests_without_token_are_rejected() {
        let app = TestApp::new();
        let res = app.server.get("/api/v1/meal-plans").await;
        res.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(res.json::<Value>()["code"], "UNAUTHENTICATED");

        let res = app
            .server
            .post("/api/v1/meal-plans")
            .add_header(
                axum::http::header::AUTHORIZATION,
                axum::http::HeaderValue::from_static("Bearer not-a-token"),
            )
            .json(&plan_body("x"))
            .await;
        res.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_ids_are_not_found() {
        let app = TestApp::new();
        let (k, v) = app.auth(Uuid::new_v4());

        for path in [
            "/api/v1/meal-plans/not-a-uuid",
            "/api/v1/meal-plans/123/entries",
            "/api/v1/meal-plan-entries/xyz",
        ] {
            let res = app.server.get(path).add_header(k.clone(), v.clone()).await;
            res.assert_status(StatusCode::NOT_FOUND);
            assert_eq!(res.json::<Value>()["code"], "NOT_FOUND");
        }

        let res = app
            .server
            .post("/api/v1/meal-plans/123/entries")
            .add_header(k.clone(), v.clone())
            .json(&json!({ "date": "2024-09-04", "meal_type": "lunch" }))
            .await;
        res.assert_status(StatusCode::NOT_FOUND);

        // Authentication is still checked first.
        app.server
            .get("/api/v1/meal-plans/not-a-uuid")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_list_is_not_an_error() {
        let app = TestApp::new();
        let (k, v) = app.auth(Uuid::new_v4());
        let res = app.server.get("/api/v1/meal-plans").add_header(k, v).await;
        res.assert_status_ok();
        assert_eq!(res.json::<Value>(), json!([]));
    }

    #[tokio::test]
    async fn create_returns_location_and_injects_owner() {
        let app = TestApp::new();
        let user = Uuid::new_v4();
        let (k, v) = app.auth(user);
        let res = app
            .server
            .post("/api/v1/meal-plans")
            .add_header(k, v)
            .json(&json!({
                "name": "Harmattan week",
                "start_date": "2024-12-02",
                "end_date": "2024-12-08",
                "user_id": Uuid::new_v4(),
                "created_at": "2000-01-01T00:00:00Z",
                "updated_at": "2000-01-01T00:00:00Z",
            }))
            .await;
        res.assert_status(StatusCode::CREATED);
        let body = res.json::<Value>();
        assert_eq!(body["user_id"], json!(user));
        assert_ne!(body["created_at"], "2000-01-01T00:00:00Z");
        let location = res.header("location");
        assert_eq!(
            location.to_str().unwrap(),
            format!("/api/v1/meal-plans/{}", body["id"].as_str().unwrap())
        );
    }

    #[tokio::test]
    async fn validation_errors_are_keyed_by_field() {
        let app = TestApp::new();
        let (k, v) = app.auth(Uuid::new_v4());
        let res = app
            .server
            .post("/api/v1/meal-plans")
            .add_header(k, v)
            .json(&json!({ "start_date": "not-a-date", "end_date": "2024-01-01" }))
            .await;
        res.assert_status(StatusCode::BAD_REQUEST);
        let body = res.json::<Value>();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["fields"]["name"].is_array());
        assert!(body["fields"]["start_date"].is_array());
        assert!(body["fields"].get("end_date").is_none());
    }

    #[tokio::test]
    async fn other_users_plans_are_invisible() {
        let app = TestApp::new();
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let plan = create_plan(&app, u1, "P1").await;
        let path = format!("/api/v1/meal-plans/{}", plan["id"].as_str().unwrap());
        let missing = format!("/api/v1/meal-plans/{}", Uuid::new_v4());

        let (k2, v2) = app.auth(u2);
        let foreign = app.server.get(&path).add_header(k2.clone(), v2.clone()).await;
        let absent = app.server.get(&missing).add_header(k2.clone(), v2.clone()).await;
        foreign.assert_status(StatusCode::NOT_FOUND);
        absent.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(foreign.json::<Value>(), absent.json::<Value>());

        app.server
            .patch(&path)
            .add_header(k2.clone(), v2.clone())
            .json(&json!({ "name": "mine now" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        app.server
            .delete(&path)
            .add_header(k2.clone(), v2.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
        let listed = app.server.get("/api/v1/meal-plans").add_header(k2, v2).await;
        assert_eq!(listed.json::<Value>(), json!([]));

        let (k1, v1) = app.auth(u1);
        let own = app.server.get(&path).add_header(k1, v1).await;
        own.assert_status_ok();
        assert_eq!(own.json::<Value>()["name"], "P1");
    }

    #[tokio::test]
    async fn entries_are_scoped_through_their_plan() {
        let app = TestApp::new();
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let plan = create_plan(&app, u1, "P1").await;
        let plan_id = plan["id"].as_str().unwrap().to_string();
        let entry = create_entry(&app, u1, &plan_id).await;
        assert_eq!(entry["meal_plan_id"], plan["id"]);
        assert_eq!(entry["notes"], "");

        let entry_path = format!("/api/v1/meal-plan-entries/{}", entry["id"].as_str().unwrap());
        let (k2, v2) = app.auth(u2);
        app.server
            .get(&entry_path)
            .add_header(k2.clone(), v2.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
        app.server
            .get(&format!("/api/v1/meal-plans/{plan_id}/entries"))
            .add_header(k2.clone(), v2.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // Creating under someone else's plan never creates anything.
        app.server
            .post(&format!("/api/v1/meal-plans/{plan_id}/entries"))
            .add_header(k2, v2)
            .json(&json!({ "date": "2024-09-04", "meal_type": "lunch" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let (k1, v1) = app.auth(u1);
        let listed = app
            .server
            .get(&format!("/api/v1/meal-plans/{plan_id}/entries"))
            .add_header(k1, v1)
            .await;
        listed.assert_status_ok();
        assert_eq!(listed.json::<Value>().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn entry_under_unknown_plan_is_not_found() {
        let app = TestApp::new();
        let (k, v) = app.auth(Uuid::new_v4());
        app.server
            .post(&format!("/api/v1/meal-plans/{}/entries", Uuid::new_v4()))
            .add_header(k, v)
            .json(&json!({ "date": "2024-09-04", "meal_type": "lunch" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_merges_and_put_requires_required_fields() {
        let app = TestApp::new();
        let user = Uuid::new_v4();
        let plan = create_plan(&app, user, "Before").await;
        let path = format!("/api/v1/meal-plans/{}", plan["id"].as_str().unwrap());
        let (k, v) = app.auth(user);

        let patched = app
            .server
            .patch(&path)
            .add_header(k.clone(), v.clone())
            .json(&json!({ "name": "After", "user_id": Uuid::new_v4() }))
            .await;
        patched.assert_status_ok();
        let body = patched.json::<Value>();
        assert_eq!(body["name"], "After");
        assert_eq!(body["start_date"], plan["start_date"]);
        assert_eq!(body["user_id"], json!(user));
        assert_eq!(body["created_at"], plan["created_at"]);

        let put = app
            .server
            .put(&path)
            .add_header(k.clone(), v.clone())
            .json(&json!({ "name": "Only a name" }))
            .await;
        put.assert_status(StatusCode::BAD_REQUEST);

        let unchanged = app.server.get(&path).add_header(k, v).await;
        assert_eq!(unchanged.json::<Value>()["name"], "After");
    }

    #[tokio::test]
    async fn deleting_a_plan_cascades_to_entries() {
        let app = TestApp::new();
        let user = Uuid::new_v4();
        let plan = create_plan(&app, user, "Doomed").await;
        let plan_id = plan["id"].as_str().unwrap().to_string();
        let entry = create_entry(&app, user, &plan_id).await;
        let (k, v) = app.auth(user);

        app.server
            .delete(&format!("/api/v1/meal-plans/{plan_id}"))
            .add_header(k.clone(), v.clone())
            .await
            .assert_status(StatusCode::NO_CONTENT);
        app.server
            .delete(&format!("/api/v1/meal-plans/{plan_id}"))
            .add_header(k.clone(), v.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
        app.server
            .get(&format!("/api/v1/meal-plan-entries/{}", entry["id"].as_str().unwrap()))
            .add_header(k, v)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn entry_parent_cannot_be_reassigned() {
        let app = TestApp::new();
        let user = Uuid::new_v4();
        let first = create_plan(&app, user, "A").await;
        let second = create_plan(&app, user, "B").await;
        let entry = create_entry(&app, user, first["id"].as_str().unwrap()).await;
        let (k, v) = app.auth(user);

        let res = app
            .server
            .patch(&format!("/api/v1/meal-plan-entries/{}", entry["id"].as_str().unwrap()))
            .add_header(k, v)
            .json(&json!({ "meal_plan_id": second["id"], "servings": 6 }))
            .await;
        res.assert_status_ok();
        let body = res.json::<Value>();
        assert_eq!(body["meal_plan_id"], first["id"]);
        assert_eq!(body["servings"], 6);
    }
}
