//! Current user profile resource.

use async_trait::async_trait;

use super::ResourceDefinition;
use crate::domains::resources::error::ResourceError;
use crate::spotify::SpotifyApi;

pub struct CurrentUserResource;

#[async_trait]
impl ResourceDefinition for CurrentUserResource {
    const URI: &'static str = "spotify://user/current";
    const NAME: &'static str = "Current User Profile";
    const DESCRIPTION: &'static str =
        "Current Spotify user's profile: display name, country, subscription and followers";

    async fn read(api: &dyn SpotifyApi) -> Result<serde_json::Value, ResourceError> {
        let user = api.current_user().await?;
        Ok(serde_json::json!({
            "id": user.id,
            "display_name": user.display_name,
            "email": user.email,
            "country": user.country,
            "product": user.product,
            "followers": user.followers.map(|f| f.total).unwrap_or(0),
            "images": user.images,
        }))
    }
}
