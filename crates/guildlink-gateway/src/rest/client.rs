//! HTTP client for the platform's REST API

use std::time::Duration;

use guildlink_core::{RemoteError, RemoteMember, RemoteMessage, RemoteResult, RemoteRole, RoleDelta, Snowflake};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("guildlink/", env!("CARGO_PKG_VERSION"));

/// Authenticated REST client scoped to one bot token
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl RestClient {
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(transport)?;
        let base_url = Url::parse(base_url).map_err(|e| RemoteError::Transport(format!("invalid api url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::Transport(format!("invalid api url: {base_url}")));
        }

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    /// Build an endpoint URL; segments are percent-encoded
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
    }

    // ========================================================================
    // Guilds
    // ========================================================================

    /// Cheap reachability probe used after connecting
    #[instrument(skip(self))]
    pub async fn guild_name(&self, guild_id: Snowflake) -> RemoteResult<String> {
        #[derive(serde::Deserialize)]
        struct Guild {
            name: String,
        }

        let guild = guild_id.to_string();
        let url = self.url(["guilds", guild.as_str()]);
        let guild: Guild = decode(self.request(Method::GET, url).send().await.map_err(transport)?).await?;
        Ok(guild.name)
    }

    #[instrument(skip(self))]
    pub async fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> RemoteResult<RemoteMember> {
        let (guild, user) = (guild_id.to_string(), user_id.to_string());
        let url = self.url(["guilds", guild.as_str(), "members", user.as_str()]);
        decode(self.request(Method::GET, url).send().await.map_err(transport)?).await
    }

    #[instrument(skip(self))]
    pub async fn roles(&self, guild_id: Snowflake) -> RemoteResult<Vec<RemoteRole>> {
        let guild = guild_id.to_string();
        let url = self.url(["guilds", guild.as_str(), "roles"]);
        decode(self.request(Method::GET, url).send().await.map_err(transport)?).await
    }

    /// Replace the member's role list with the delta applied, in one request
    #[instrument(skip(self, member), fields(user_id = %member.user.id))]
    pub async fn modify_member_roles(
        &self,
        guild_id: Snowflake,
        member: &RemoteMember,
        delta: &RoleDelta,
    ) -> RemoteResult<Vec<Snowflake>> {
        let roles = delta.apply(&member.roles);
        let (guild, user) = (guild_id.to_string(), member.user.id.to_string());
        let url = self.url(["guilds", guild.as_str(), "members", user.as_str()]);

        let response = self
            .request(Method::PATCH, url)
            .json(&json!({ "roles": roles }))
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NO_CONTENT {
            debug!("Member update returned no body");
            return Ok(roles);
        }
        let updated: RemoteMember = decode(response).await?;
        Ok(updated.roles)
    }

    // ========================================================================
    // Messages
    // ========================================================================

    #[instrument(skip(self, content))]
    pub async fn create_message(&self, channel_id: Snowflake, content: &str) -> RemoteResult<RemoteMessage> {
        let channel = channel_id.to_string();
        let url = self.url(["channels", channel.as_str(), "messages"]);
        let response = self
            .request(Method::POST, url)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    #[instrument(skip(self))]
    pub async fn create_reaction(&self, channel_id: Snowflake, message_id: Snowflake, emoji: &str) -> RemoteResult<()> {
        let (channel, message) = (channel_id.to_string(), message_id.to_string());
        let url = self.url([
            "channels",
            channel.as_str(),
            "messages",
            message.as_str(),
            "reactions",
            emoji,
            "@me",
        ]);
        expect_success(self.request(Method::PUT, url).send().await.map_err(transport)?).await
    }

    #[instrument(skip(self))]
    pub async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> RemoteResult<()> {
        let (channel, message) = (channel_id.to_string(), message_id.to_string());
        let url = self.url(["channels", channel.as_str(), "messages", message.as_str()]);
        expect_success(self.request(Method::DELETE, url).send().await.map_err(transport)?).await
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

fn transport(err: reqwest::Error) -> RemoteError {
    RemoteError::Transport(err.to_string())
}

async fn expect_success(response: Response) -> RemoteResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(http_error(status, response).await)
}

async fn decode<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(http_error(status, response).await);
    }
    response.json::<T>().await.map_err(|e| RemoteError::Decode(e.to_string()))
}

/// Pull the platform's `message` field out of an error body when present
async fn http_error(status: StatusCode, response: Response) -> RemoteError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);

    RemoteError::Http {
        status: status.as_u16(),
        message,
    }
}
