use async_graphql::{Context, Object};
use chrono::Utc;

use super::types::{AuthPayload, LogoutPayload};
use super::{client_info, resolver_deps};
use crate::auth::flow;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Authenticate with username and password.
    ///
    /// When the account has two-factor enabled, `requiresTwoFactor` is set and
    /// a `challengeToken` is returned instead of a session token.
    async fn admin_login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> AuthPayload {
        let client = client_info(ctx);
        let result = async {
            let (pool, config) = resolver_deps(ctx)?;
            flow::login(pool, &config.jwt, &username, &password, &client).await
        }
        .await;
        AuthPayload::from(result)
    }

    /// Exchange a two-factor challenge and a TOTP code for a session token.
    async fn admin_verify_two_factor(
        &self,
        ctx: &Context<'_>,
        challenge_token: String,
        code: String,
    ) -> AuthPayload {
        let client = client_info(ctx);
        let result = async {
            let (pool, config) = resolver_deps(ctx)?;
            let now = Utc::now().timestamp();
            flow::verify_two_factor(pool, &config.jwt, &challenge_token, &code, &client, now).await
        }
        .await;
        AuthPayload::from(result)
    }

    /// Invalidate a session token.
    async fn admin_logout(&self, ctx: &Context<'_>, token: String) -> LogoutPayload {
        let client = client_info(ctx);
        let result = async {
            let (pool, _) = resolver_deps(ctx)?;
            flow::logout(pool, &token, &client).await
        }
        .await;
        LogoutPayload::from(result)
    }
}
