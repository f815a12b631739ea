//! Admin dashboard page shell.
//!
//! The dashboard itself is rendered client-side. The server only gates the
//! `/admin` paths behind a session and answers with a small descriptor.

use axum::{extract::Extension, http::Uri, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::AdminSession;

#[derive(Debug, Serialize)]
pub struct AdminPage {
    pub path: String,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

/// GET /admin, GET /admin/*path
pub async fn admin_page(uri: Uri, session: Option<Extension<AdminSession>>) -> Json<AdminPage> {
    let session = session.map(|Extension(session)| session);
    Json(AdminPage {
        path: uri.path().to_string(),
        authenticated: session.is_some(),
        user_id: session.map(|s| s.user_id),
    })
}
