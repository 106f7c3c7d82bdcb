use std::sync::Arc;

use axum::Json;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::middleware::base_url::BaseUrl;

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Link {
    #[serde(rename = "rel")]
    pub relation: String,

    #[serde(rename = "href")]
    pub hypertext_reference: String,
}

/// A response body with `links` next to the (flattened) content, so clients
/// can navigate the api without building urls themselves.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub debug_info: Map<String, Value>,
    pub links: Vec<Link>,
}

impl<T> Response<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            debug_info: Map::new(),
            links: vec![],
        }
    }

    pub fn builder(content: T, base_url: Arc<BaseUrl>) -> ResponseBuilder<T> {
        ResponseBuilder {
            response: Self::new(content),
            base_url,
        }
    }

    pub fn json(self) -> Json<Self> {
        Json(self)
    }

    pub fn link(&self, relation: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.relation == relation)
            .map(|link| link.hypertext_reference.as_str())
    }
}

pub struct ResponseBuilder<T> {
    response: Response<T>,
    base_url: Arc<BaseUrl>,
}

impl<T> ResponseBuilder<T> {
    pub fn debug_info<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Serialize,
    {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.response.debug_info.insert(key, value);
            }
            Err(why) => log::warn!("dropping debug info '{}': {}", key, why),
        }
        self
    }

    /// Link to a path of this api, resolved against the base url the client
    /// used.
    pub fn link<R, H>(self, relation: R, path: H) -> Self
    where
        R: Into<String>,
        H: Into<String>,
    {
        let url = self.base_url.full_url(path);
        self.link_extern(relation, url)
    }

    /// Link to somewhere else entirely, e.g. a maps app.
    pub fn link_extern<R, H>(mut self, relation: R, url: H) -> Self
    where
        R: Into<String>,
        H: Into<String>,
    {
        self.response.links.push(Link {
            relation: relation.into(),
            hypertext_reference: url.into(),
        });
        self
    }

    pub fn build(self) -> Response<T> {
        self.response
    }
}
