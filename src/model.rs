//! Data models for the load-planning batch runner.
//!
//! This module defines the request-side records built per order:
//! - `ItemSpec`: one item of an order's item sequence
//! - `ContainerSpec`: the container derived from the order's target type
//! - `LoadPlanRequest`: one container plus the ordered items to plan into it
//! - `Placement`: an item with its position and orientation in the container
//!
//! Container construction is unvalidated: an unrecognized target type
//! produces a container with a 0 x 0 footprint, and the batch must keep
//! running with it.

use serde::Serialize;

use crate::types::{Dimensional, Dims, Pos, Weighted};

/// One item of an order's item sequence.
///
/// Serialization mirrors the benchmark data field names, so a placed item can
/// be echoed verbatim into the packing-plan document.
///
/// # Fields
/// * `article` - article description, used as the item's external id
/// * `id` / `product_group` - optional benchmark metadata, carried through
/// * `length`/`width`/`height` - extents in mm
/// * `weight` - weight in kg
/// * `sequence` - position within the order's item sequence (1-based)
#[derive(Clone, Debug, Serialize)]
pub struct ItemSpec {
    pub article: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_group: Option<String>,
    #[serde(rename = "length/mm")]
    pub length: i64,
    #[serde(rename = "width/mm")]
    pub width: i64,
    #[serde(rename = "height/mm")]
    pub height: i64,
    #[serde(rename = "weight/kg")]
    pub weight: f64,
    pub sequence: u64,
}

impl ItemSpec {
    /// Returns the item extents as [`Dims`].
    #[inline]
    pub const fn dims(&self) -> Dims {
        Dims::new(self.length, self.width, self.height)
    }
}

impl Dimensional for ItemSpec {
    fn dims(&self) -> Dims {
        ItemSpec::dims(self)
    }
}

impl Weighted for ItemSpec {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// The single container an order is planned into.
///
/// Footprint comes from the order's target type; height and maximum weight
/// are process-wide constants (see `request`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerSpec {
    pub length: i64,
    pub width: i64,
    pub height: i64,
    pub max_weight: f64,
}

impl ContainerSpec {
    /// Creates a new container description.
    #[inline]
    pub const fn new(length: i64, width: i64, height: i64, max_weight: f64) -> Self {
        Self {
            length,
            width,
            height,
            max_weight,
        }
    }

    /// Returns the container extents as [`Dims`].
    #[inline]
    pub const fn dims(&self) -> Dims {
        Dims::new(self.length, self.width, self.height)
    }

    /// Whether the container has an unusable footprint or height.
    ///
    /// The unknown-target path produces a 0 x 0 footprint; such a container
    /// is kept and submitted, it simply cannot accept any item.
    #[inline]
    pub const fn is_degenerate(&self) -> bool {
        !self.dims().is_valid()
    }
}

impl Dimensional for ContainerSpec {
    fn dims(&self) -> Dims {
        ContainerSpec::dims(self)
    }
}

/// Orientation of a placed item about the vertical axis.
///
/// The codes match the benchmark environment: 0 = as given, 1 = footprint
/// rotated by 90°.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    AsGiven,
    Rotated,
}

impl Orientation {
    /// Numeric code used in the packing-plan document.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Orientation::AsGiven => 0,
            Orientation::Rotated => 1,
        }
    }

    /// Applies the orientation to item extents.
    #[inline]
    pub const fn apply(self, dims: Dims) -> Dims {
        match self {
            Orientation::AsGiven => dims,
            Orientation::Rotated => dims.rotated(),
        }
    }
}

/// An item with its position in the container.
///
/// # Fields
/// * `item` - the original item
/// * `position` - front-left-bottom corner in the container, in mm
/// * `orientation` - how the footprint was oriented at placement time
#[derive(Clone, Debug)]
pub struct Placement {
    pub item: ItemSpec,
    pub position: Pos,
    pub orientation: Orientation,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(item: ItemSpec, position: Pos, orientation: Orientation) -> Self {
        Self {
            item,
            position,
            orientation,
        }
    }

    /// Extents of the item as placed (orientation applied).
    #[inline]
    pub const fn dims(&self) -> Dims {
        self.orientation.apply(self.item.dims())
    }

    /// Returns the top Z coordinate of the placed item.
    #[inline]
    pub const fn top_z(&self) -> i64 {
        self.position.z + self.dims().height
    }

    /// Returns the center of the placed footprint in mm.
    #[inline]
    pub fn center_xy(&self) -> (f64, f64) {
        let dims = self.dims();
        (
            self.position.x as f64 + dims.length as f64 / 2.0,
            self.position.y as f64 + dims.width as f64 / 2.0,
        )
    }
}

impl Dimensional for Placement {
    fn dims(&self) -> Dims {
        Placement::dims(self)
    }
}

impl Weighted for Placement {
    fn weight(&self) -> f64 {
        self.item.weight
    }
}

/// One container plus the ordered collection of items, built fresh per order.
#[derive(Clone, Debug)]
pub struct LoadPlanRequest {
    pub container: ContainerSpec,
    pub items: Vec<ItemSpec>,
}

impl LoadPlanRequest {
    /// Creates a new request.
    pub fn new(container: ContainerSpec, items: Vec<ItemSpec>) -> Self {
        Self { container, items }
    }
}

#[cfg(test)]
pub(crate) fn test_item(article: &str, length: i64, width: i64, height: i64, weight: f64) -> ItemSpec {
    ItemSpec {
        article: article.to_string(),
        id: None,
        product_group: None,
        length,
        width,
        height,
        weight,
        sequence: 1,
    }
}
