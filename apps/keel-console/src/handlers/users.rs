use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::views::Route;
use crate::views::user_edit::{EditUserForm, UserEditTemplate, UsersTemplate};

#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    #[serde(default)]
    pub saved: Option<String>,
}

pub async fn get_users(State(state): State<AppState>, Query(query): Query<UsersQuery>) -> Response {
    match state.client.users().await {
        Ok(users) => UsersTemplate::new(&users, &state.catalog, query.saved.is_some()).into_response(),
        Err(e) => e.surface(&state.catalog, "admin.users.title").into_response(),
    }
}

pub async fn get_edit(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.client.user(&name).await {
        Ok(user) => UserEditTemplate::new(&user, &state.catalog).into_response(),
        Err(e) => e.surface(&state.catalog, "admin.users.editButton").into_response(),
    }
}

/// Saves the edit. The LDAP flag comes from the server, not from the form.
pub async fn post_edit(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Form(form): Form<EditUserForm>,
) -> Response {
    let result: crate::error::Result<()> = async {
        let user = state.client.user(&name).await?;
        let request = form.to_request(user.ldap_user)?;
        state.client.edit_user(&name, &request).await
    }
    .await;

    match result {
        Ok(()) => {
            info!("Saved user {}", name);
            Redirect::to(&format!("{}?saved=1", Route::AllUsers.path())).into_response()
        }
        Err(e) => e.surface(&state.catalog, "admin.users.editButton").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{app, body_text, get, location, post_form, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn users_list_links_to_edit() {
        let (app, _, _) = app(None).await;
        let response = send(&app, get("/users?saved=1", None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("/users/admin/edit"));
        assert!(html.contains("/users/dir/edit"));
        assert!(html.contains("User saved."));
    }

    #[tokio::test]
    async fn edit_page_for_missing_user_is_popup() {
        let (app, _, _) = app(None).await;
        let response = send(&app, get("/users/ghost/edit", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("User not found"));
    }

    #[tokio::test]
    async fn saving_sends_roles_and_returns_to_list() {
        let (app, _, seen) = app(None).await;
        let response = send(
            &app,
            post_form("/users/ops/edit", None, "user_name=ops&admin_rendered=1&admin=on"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/users?saved=1");
        assert_eq!(
            seen.lock().unwrap().last().unwrap(),
            r#"PUT /users/ops {"Users":{"roles":"admin,user"}}"#
        );
    }

    #[tokio::test]
    async fn reserved_characters_in_name_stay_in_one_segment() {
        let (app, _, seen) = app(None).await;
        let response = send(&app, get("/users/ops%3Fx%2F1/edit", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"action="/users/ops%3Fx%2F1/edit""#));

        let response = send(
            &app,
            post_form("/users/ops%3Fx%2F1/edit", None, "user_name=ops&admin_rendered=1"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            seen.lock().unwrap().last().unwrap(),
            r#"PUT /users/ops?x/1 {"Users":{"roles":"user"}}"#
        );
    }

    #[tokio::test]
    async fn mismatched_passwords_never_reach_server() {
        let (app, _, seen) = app(None).await;
        let response = send(
            &app,
            post_form(
                "/users/ops/edit",
                None,
                "user_name=ops&admin_rendered=1&old_password=a&new_password=b&new_password_retype=c",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Passwords do not match."));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_rejection_is_shown() {
        let (app, _, _) = app(None).await;
        let response = send(
            &app,
            post_form(
                "/users/ops/edit",
                None,
                "user_name=ops&admin_rendered=1&old_password=wrong&new_password=n&new_password_retype=n",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_text(response).await.contains("Old password is wrong"));
    }
}
