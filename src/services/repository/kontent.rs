//! Kontent.ai Management API client.
//!
//! Implements [`ContentRepository`] over the Management API v2:
//! - Items and language variants
//! - Workflow transitions (new version, publish, change step)
//! - Content types and snippets

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ContentRepository;
use crate::config::KontentConfig;
use crate::error::{Error, Result};
use crate::models::{
    ContentItem, ContentType, ContentTypeSnippet, FieldValue, LanguageVariant, Reference,
    WorkflowStep,
};
use crate::services::UsageTracker;

const CONTINUATION_HEADER: &str = "x-continuation";

/// Management API client for one project.
#[derive(Clone)]
pub struct KontentClient {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: String,
}

/// Body for item upserts. The external id travels in the URL.
#[derive(Debug, Serialize)]
struct UpsertItemBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    codename: Option<&'a str>,
    #[serde(rename = "type")]
    type_ref: &'a Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    collection: Option<&'a Reference>,
}

#[derive(Debug, Serialize)]
struct UpsertVariantBody<'a> {
    elements: &'a [FieldValue],
}

#[derive(Debug, Deserialize)]
struct TypeListingPage {
    types: Vec<ContentType>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    continuation_token: Option<String>,
}

impl KontentClient {
    /// Create a client from configuration.
    pub fn new(config: &KontentConfig) -> Result<Self> {
        if config.project_id.is_empty() {
            return Err(Error::Config("KONTENT_PROJECT_ID is not set".to_string()));
        }
        Self::with_base_url(
            &config.base_url,
            &config.project_id,
            &config.management_api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(
        base_url: &str,
        project_id: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Typeshift/1.0")
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/projects/{}/{}", self.base_url, self.project_id, path)
    }

    /// URL path segment addressing an entity by any kind of reference.
    fn segment(reference: &Reference) -> String {
        let encoded = urlencoding::encode(reference.value());
        match reference {
            Reference::Id(_) => encoded.into_owned(),
            Reference::Codename(_) => format!("codename/{}", encoded),
            Reference::ExternalId(_) => format!("external-id/{}", encoded),
        }
    }

    fn variant_path(item: &Reference, language: &Reference) -> String {
        format!(
            "items/{}/variants/{}",
            Self::segment(item),
            Self::segment(language)
        )
    }

    /// Send a request, counting it against the tracker first.
    async fn send(&self, ctx: &UsageTracker, request: RequestBuilder, what: &str) -> Result<Response> {
        ctx.record_call();
        debug!(call = ctx.calls(), "Management API: {}", what);

        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Error::RemoteCall(format!("{}: request failed: {}", what, e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if status.as_u16() == 404 {
            return Err(Error::NotFound(format!("{}: {}", what, text)));
        }
        Err(Error::RemoteCall(format!(
            "{}: Management API error {}: {}",
            what, status, text
        )))
    }

    async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| Error::RemoteCall(format!("{}: failed to parse response: {}", what, e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &UsageTracker,
        path: &str,
        what: &str,
    ) -> Result<T> {
        let response = self.send(ctx, self.client.get(self.url(path)), what).await?;
        Self::parse(response, what).await
    }

    async fn put_empty(&self, ctx: &UsageTracker, path: &str, what: &str) -> Result<()> {
        self.send(ctx, self.client.put(self.url(path)), what).await?;
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for KontentClient {
    async fn get_item(&self, ctx: &UsageTracker, item: &Reference) -> Result<ContentItem> {
        let path = format!("items/{}", Self::segment(item));
        self.get_json(ctx, &path, &format!("get item {}", item)).await
    }

    async fn get_variant(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
    ) -> Result<LanguageVariant> {
        let what = format!("get variant {} of item {}", language, item);
        self.get_json(ctx, &Self::variant_path(item, language), &what)
            .await
    }

    async fn list_variants(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
    ) -> Result<Vec<LanguageVariant>> {
        let path = format!("items/{}/variants", Self::segment(item));
        self.get_json(ctx, &path, &format!("list variants of item {}", item))
            .await
    }

    async fn upsert_item(&self, ctx: &UsageTracker, item: &ContentItem) -> Result<ContentItem> {
        let external_id = item.external_id.as_deref().ok_or_else(|| {
            Error::Internal("An item must carry an external id to be upserted".to_string())
        })?;
        let what = format!("upsert item external_id:{}", external_id);
        let path = format!(
            "items/{}",
            Self::segment(&Reference::external_id(external_id))
        );
        let body = UpsertItemBody {
            name: &item.name,
            codename: item.codename.as_deref(),
            type_ref: &item.type_ref,
            collection: item.collection.as_ref(),
        };

        let response = self
            .send(ctx, self.client.put(self.url(&path)).json(&body), &what)
            .await?;
        Self::parse(response, &what).await
    }

    async fn upsert_variant(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
        elements: &[FieldValue],
    ) -> Result<LanguageVariant> {
        let what = format!("upsert variant {} of item {}", language, item);
        let request = self
            .client
            .put(self.url(&Self::variant_path(item, language)))
            .json(&UpsertVariantBody { elements });

        let response = self.send(ctx, request, &what).await?;
        Self::parse(response, &what).await
    }

    async fn create_new_version(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
    ) -> Result<()> {
        let path = format!("{}/new-version", Self::variant_path(item, language));
        let what = format!("create new version of variant {} of item {}", language, item);
        self.put_empty(ctx, &path, &what).await
    }

    async fn publish(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
    ) -> Result<()> {
        let path = format!("{}/publish", Self::variant_path(item, language));
        let what = format!("publish variant {} of item {}", language, item);
        self.put_empty(ctx, &path, &what).await
    }

    async fn change_workflow_step(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
        step: &Reference,
    ) -> Result<()> {
        let path = format!(
            "{}/workflow/{}",
            Self::variant_path(item, language),
            Self::segment(step)
        );
        let what = format!(
            "change workflow step of variant {} of item {} to {}",
            language, item, step
        );
        self.put_empty(ctx, &path, &what).await
    }

    async fn list_workflow_steps(&self, ctx: &UsageTracker) -> Result<Vec<WorkflowStep>> {
        self.get_json(ctx, "workflow", "list workflow steps").await
    }

    async fn get_content_type(
        &self,
        ctx: &UsageTracker,
        content_type: &Reference,
    ) -> Result<ContentType> {
        let path = format!("types/{}", Self::segment(content_type));
        self.get_json(ctx, &path, &format!("get content type {}", content_type))
            .await
    }

    async fn list_content_types(&self, ctx: &UsageTracker) -> Result<Vec<ContentType>> {
        let mut types = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self.client.get(self.url("types"));
            if let Some(token) = &continuation {
                request = request.header(CONTINUATION_HEADER, token);
            }

            let response = self.send(ctx, request, "list content types").await?;
            let page: TypeListingPage = Self::parse(response, "list content types").await?;
            types.extend(page.types);

            continuation = page
                .pagination
                .and_then(|p| p.continuation_token)
                .filter(|token| !token.is_empty());
            if continuation.is_none() {
                break;
            }
        }

        Ok(types)
    }

    async fn get_snippet(
        &self,
        ctx: &UsageTracker,
        snippet: &Reference,
    ) -> Result<ContentTypeSnippet> {
        let path = format!("snippets/{}", Self::segment(snippet));
        self.get_json(ctx, &path, &format!("get snippet {}", snippet))
            .await
    }
}
