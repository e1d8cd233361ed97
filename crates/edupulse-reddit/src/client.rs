//! Reddit API client (client-credentials OAuth).

use std::time::Duration;

use serde::Deserialize;

use crate::error::RedditError;
use crate::types::{to_raw_post, Listing, RawPost};

const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

/// Reddit's hard cap on search listing pages.
const MAX_PAGE_SIZE: u32 = 100;

/// Upper bound on listing pages per query. Guards against cycling cursors;
/// with the default page size this is far above any realistic ceiling.
const MAX_PAGES: usize = 100;

/// API credentials, supplied externally; never logged.
#[derive(Debug, Clone)]
pub struct RedditAuth {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl RedditAuth {
    /// Build credentials from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error string listing any missing variables.
    pub fn from_env() -> Result<Self, String> {
        let mut missing = Vec::new();

        let client_id = std::env::var("REDDIT_CLIENT_ID").ok();
        let client_secret = std::env::var("REDDIT_CLIENT_SECRET").ok();
        let user_agent = std::env::var("REDDIT_USER_AGENT").ok();

        if client_id.is_none() {
            missing.push("REDDIT_CLIENT_ID");
        }
        if client_secret.is_none() {
            missing.push("REDDIT_CLIENT_SECRET");
        }
        if user_agent.is_none() {
            missing.push("REDDIT_USER_AGENT");
        }

        if !missing.is_empty() {
            return Err(format!("missing reddit env vars: {}", missing.join(", ")));
        }

        // All three are Some here; the missing check above guards the unwraps.
        Ok(Self {
            client_id: client_id.unwrap(),
            client_secret: client_secret.unwrap(),
            user_agent: user_agent.unwrap(),
        })
    }
}

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Reddit search client holding a valid access token.
///
/// One instance is scoped to a single run; it issues paginated searches for
/// one (collection, term) pair at a time and mutates no shared state. Rate
/// limiting (429) and other non-2xx responses surface as typed errors so the
/// caller can apply different back-off per class.
pub struct RedditClient {
    client: reqwest::Client,
    token: String,
    user_agent: String,
    api_base: String,
}

impl RedditClient {
    /// Create a client against the production endpoints by exchanging client
    /// credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Http`] on transport failure or
    /// [`RedditError::Unavailable`] if the token exchange is rejected.
    pub async fn new(auth: &RedditAuth, timeout_secs: u64) -> Result<Self, RedditError> {
        Self::with_base_urls(auth, timeout_secs, DEFAULT_TOKEN_URL, DEFAULT_API_BASE).await
    }

    /// Create a client against explicit token/API endpoints.
    ///
    /// Production callers use [`RedditClient::new`]; tests point this at a
    /// mock server.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`RedditClient::new`].
    pub async fn with_base_urls(
        auth: &RedditAuth,
        timeout_secs: u64,
        token_url: &str,
        api_base: &str,
    ) -> Result<Self, RedditError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&auth.user_agent)
            .build()?;

        let token = Self::fetch_token(&client, auth, token_url).await?;

        Ok(Self {
            client,
            token,
            user_agent: auth.user_agent.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_token(
        client: &reqwest::Client,
        auth: &RedditAuth,
        token_url: &str,
    ) -> Result<String, RedditError> {
        let response = client
            .post(token_url)
            .header(reqwest::header::USER_AGENT, &auth.user_agent)
            .basic_auth(&auth.client_id, Some(&auth.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedditError::Unavailable {
                reason: format!("token exchange failed with status {status}"),
            });
        }

        let body = response.text().await?;
        let token_resp: TokenResponse =
            serde_json::from_str(&body).map_err(|e| RedditError::Deserialize {
                context: "token response".to_string(),
                source: e,
            })?;

        Ok(token_resp.access_token)
    }

    /// Search one collection for posts matching `term`, newest first.
    ///
    /// Drives cursor pagination until the listing is exhausted or `ceiling`
    /// posts have been gathered. Children missing an id or title are dropped.
    ///
    /// # Errors
    ///
    /// - [`RedditError::RateLimited`] — HTTP 429; honors `Retry-After` when present.
    /// - [`RedditError::Unavailable`] — any other non-2xx status.
    /// - [`RedditError::Http`] — network or TLS failure.
    /// - [`RedditError::Deserialize`] — response body is not a listing.
    pub async fn search_new(
        &self,
        collection: &str,
        term: &str,
        page_size: u32,
        ceiling: usize,
    ) -> Result<Vec<RawPost>, RedditError> {
        let endpoint = format!("{}/r/{collection}/search", self.api_base);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let mut posts: Vec<RawPost> = Vec::new();
        let mut after: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut params: Vec<(&str, String)> = vec![
                ("q", term.to_string()),
                ("restrict_sr", "true".to_string()),
                ("sort", "new".to_string()),
                ("limit", page_size.to_string()),
                ("type", "link".to_string()),
            ];
            if let Some(cursor) = &after {
                params.push(("after", cursor.clone()));
            }

            let response = self
                .client
                .get(&endpoint)
                .header(
                    reqwest::header::AUTHORIZATION,
                    format!("Bearer {}", self.token),
                )
                .header(reqwest::header::USER_AGENT, &self.user_agent)
                .query(&params)
                .send()
                .await?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(RedditError::RateLimited { retry_after_secs });
            }

            if !status.is_success() {
                return Err(RedditError::Unavailable {
                    reason: format!("search of r/{collection} failed with status {status}"),
                });
            }

            let body = response.text().await?;
            let listing: Listing =
                serde_json::from_str(&body).map_err(|e| RedditError::Deserialize {
                    context: format!("search listing for r/{collection}"),
                    source: e,
                })?;

            posts.extend(
                listing
                    .data
                    .children
                    .iter()
                    .filter_map(|child| to_raw_post(child, collection)),
            );

            if posts.len() >= ceiling {
                posts.truncate(ceiling);
                break;
            }

            after = listing.data.after;
            if after.is_none() {
                break;
            }
        }

        tracing::debug!(
            collection,
            term,
            posts = posts.len(),
            "search pagination complete"
        );

        Ok(posts)
    }
}
