use std::fmt::Debug;

use geo_point::{GeoPoint, Geotagged};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use serde_with;
use utility::id::{HasId, Id};

pub mod court;
pub mod game;
pub mod geo_point;

pub trait ExampleData {
    fn example_data() -> Self;
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithDistance<T> {
    pub distance_km: f64,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_km: f64, content: T) -> Self {
        Self {
            distance_km,
            content,
        }
    }

    /// Nearest first. Ties keep their relative order.
    ///
    /// Proximity filtering never reorders, callers opt into this explicitly.
    pub fn sort_by_distance(values: &mut [Self]) {
        values.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    }
}

impl<T: Geotagged> Geotagged for WithDistance<T> {
    fn location(&self) -> &GeoPoint {
        self.content.location()
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

impl<V> Geotagged for WithId<V>
where
    V: HasId + Geotagged,
    V::IdType: Serialize + Debug + Clone,
{
    fn location(&self) -> &GeoPoint {
        self.content.location()
    }
}
