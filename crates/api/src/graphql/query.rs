use async_graphql::{Context, ErrorExtensions, Object, Result};
use ticketdesk_db::repositories::AdminRepo;

use super::types::{AdminView, SessionPayload};
use super::{client_info, resolver_deps};
use crate::auth::flow::{self, SessionCheck, ValidSession};
use crate::error::{AppError, AppResult};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Check whether a session token is still usable.
    ///
    /// Never errors: every failure is reported through `valid = false`.
    async fn admin_validate_session(&self, ctx: &Context<'_>, token: String) -> SessionPayload {
        let result = async {
            let (pool, config) = resolver_deps(ctx)?;
            flow::validate_session(pool, &config.jwt, &token).await
        }
        .await;
        SessionPayload::from(result)
    }

    /// Look up an admin by username. Requires a valid bearer token.
    async fn get_admin_by_username(
        &self,
        ctx: &Context<'_>,
        username: String,
    ) -> Result<Option<AdminView>> {
        require_session(ctx).await.map_err(|e| e.extend())?;
        find_admin_view(ctx, &username).await.map_err(|e| e.extend())
    }

    /// The admin behind the bearer token.
    async fn me(&self, ctx: &Context<'_>) -> Result<AdminView> {
        let session = require_session(ctx).await.map_err(|e| e.extend())?;
        Ok(AdminView::new(session.admin, session.role))
    }
}

async fn find_admin_view(ctx: &Context<'_>, username: &str) -> AppResult<Option<AdminView>> {
    let (pool, _) = resolver_deps(ctx)?;
    let Some(admin) = AdminRepo::find_by_username(pool, username).await? else {
        return Ok(None);
    };
    let role = flow::load_role(pool, &admin).await?;
    Ok(Some(AdminView::new(admin, role)))
}

/// Resolve the bearer token on the request to a valid session.
async fn require_session(ctx: &Context<'_>) -> AppResult<ValidSession> {
    let (pool, config) = resolver_deps(ctx)?;
    let Some(token) = client_info(ctx).bearer_token else {
        return Err(AppError::unauthorized("Missing bearer token"));
    };

    match flow::validate_session(pool, &config.jwt, &token).await? {
        SessionCheck::Valid(session) => Ok(session),
        SessionCheck::Invalid(reason) => Err(AppError::unauthorized(reason)),
    }
}
