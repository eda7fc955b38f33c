// Caller identity, forwarded by the upstream auth layer

use poem::Request;
use poem_openapi::{SecurityScheme, auth::ApiKey};
use uuid::Uuid;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// The authenticated user. Requests without a valid id are answered with 401.
#[derive(SecurityScheme)]
#[oai(
    ty = "api_key",
    key_name = "X-User-Id",
    key_in = "header",
    checker = "user_checker"
)]
pub struct UserAuth(pub Uuid);

async fn user_checker(_req: &Request, api_key: ApiKey) -> Option<Uuid> {
    Uuid::parse_str(api_key.key.trim()).ok()
}
