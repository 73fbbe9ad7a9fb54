// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon attributes and the declarative property vocabulary.
//!
//! [`PolygonOptions`] is the full visual/behavioral attribute set of one
//! polygon. Hosts describe changes to it with a [`PropertyDelta`]: an ordered
//! list of [`PropertyChange`] entries, each naming a [`Property`] through its
//! typed [`PropertyValue`].

use alloc::string::String;
use alloc::vec::Vec;

use crate::geo::Paths;

/// The full attribute set of a polygon.
///
/// [`Default`] matches a freshly created provider polygon: clickable and
/// visible, everything else off or unset.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PolygonOptions {
    /// Whether the polygon receives pointer events.
    pub clickable: bool,
    /// Whether the user can drag the whole polygon.
    pub draggable: bool,
    /// Whether the user can edit the polygon's vertices.
    pub editable: bool,
    /// Fill color, as a CSS color string.
    pub fill_color: Option<String>,
    /// Fill opacity in `0.0..=1.0`.
    pub fill_opacity: Option<f64>,
    /// Whether edges follow great circles instead of straight screen lines.
    pub geodesic: bool,
    /// Stroke color, as a CSS color string.
    pub stroke_color: Option<String>,
    /// Stroke opacity in `0.0..=1.0`.
    pub stroke_opacity: Option<f64>,
    /// Stroke width in pixels.
    pub stroke_weight: Option<f64>,
    /// Whether the polygon's label is shown.
    pub label_visible: bool,
    /// Lowest zoom level at which the label is shown.
    pub label_min_zoom: Option<u8>,
    /// Highest zoom level at which the label is shown.
    pub label_max_zoom: Option<u8>,
    /// Whether hovering shows the title as a tooltip.
    pub show_tooltip: bool,
    /// Title text.
    pub title: Option<String>,
    /// Whether the polygon is drawn at all.
    pub visible: bool,
    /// Stacking order relative to other overlays.
    pub z_index: Option<i32>,
}

impl Default for PolygonOptions {
    fn default() -> Self {
        Self {
            clickable: true,
            draggable: false,
            editable: false,
            fill_color: None,
            fill_opacity: None,
            geodesic: false,
            stroke_color: None,
            stroke_opacity: None,
            stroke_weight: None,
            label_visible: false,
            label_min_zoom: None,
            label_max_zoom: None,
            show_tooltip: false,
            title: None,
            visible: true,
            z_index: None,
        }
    }
}

impl PolygonOptions {
    /// Sets the fill color and opacity.
    #[must_use]
    pub fn with_fill(mut self, color: impl Into<String>, opacity: f64) -> Self {
        self.fill_color = Some(color.into());
        self.fill_opacity = Some(opacity);
        self
    }

    /// Sets the stroke color, opacity and weight.
    #[must_use]
    pub fn with_stroke(mut self, color: impl Into<String>, opacity: f64, weight: f64) -> Self {
        self.stroke_color = Some(color.into());
        self.stroke_opacity = Some(opacity);
        self.stroke_weight = Some(weight);
        self
    }

    /// Sets whether the vertices are editable.
    #[must_use]
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Sets the stacking order.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Stores `value` in the matching field.
    ///
    /// Returns `false` (and stores nothing) for [`PropertyValue::Paths`],
    /// which is not an option.
    pub fn apply(&mut self, value: PropertyValue) -> bool {
        match value {
            PropertyValue::Clickable(v) => self.clickable = v,
            PropertyValue::Draggable(v) => self.draggable = v,
            PropertyValue::Editable(v) => self.editable = v,
            PropertyValue::FillColor(v) => self.fill_color = v,
            PropertyValue::FillOpacity(v) => self.fill_opacity = v,
            PropertyValue::Geodesic(v) => self.geodesic = v,
            PropertyValue::StrokeColor(v) => self.stroke_color = v,
            PropertyValue::StrokeOpacity(v) => self.stroke_opacity = v,
            PropertyValue::StrokeWeight(v) => self.stroke_weight = v,
            PropertyValue::LabelVisible(v) => self.label_visible = v,
            PropertyValue::LabelMinZoom(v) => self.label_min_zoom = v,
            PropertyValue::LabelMaxZoom(v) => self.label_max_zoom = v,
            PropertyValue::ShowTooltip(v) => self.show_tooltip = v,
            PropertyValue::Title(v) => self.title = v,
            PropertyValue::Visible(v) => self.visible = v,
            PropertyValue::ZIndex(v) => self.z_index = v,
            PropertyValue::Paths(_) => return false,
        }
        true
    }
}

/// A declarative property of a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// [`PolygonOptions::clickable`].
    Clickable,
    /// [`PolygonOptions::draggable`].
    Draggable,
    /// [`PolygonOptions::editable`].
    Editable,
    /// [`PolygonOptions::fill_color`].
    FillColor,
    /// [`PolygonOptions::fill_opacity`].
    FillOpacity,
    /// [`PolygonOptions::geodesic`].
    Geodesic,
    /// [`PolygonOptions::stroke_color`].
    StrokeColor,
    /// [`PolygonOptions::stroke_opacity`].
    StrokeOpacity,
    /// [`PolygonOptions::stroke_weight`].
    StrokeWeight,
    /// [`PolygonOptions::label_visible`].
    LabelVisible,
    /// [`PolygonOptions::label_min_zoom`].
    LabelMinZoom,
    /// [`PolygonOptions::label_max_zoom`].
    LabelMaxZoom,
    /// [`PolygonOptions::show_tooltip`].
    ShowTooltip,
    /// [`PolygonOptions::title`].
    Title,
    /// [`PolygonOptions::visible`].
    Visible,
    /// [`PolygonOptions::z_index`].
    ZIndex,
    /// The polygon's geometry. Never part of an option patch.
    Paths,
}

impl Property {
    /// Every property, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::Clickable,
        Self::Draggable,
        Self::Editable,
        Self::FillColor,
        Self::FillOpacity,
        Self::Geodesic,
        Self::StrokeColor,
        Self::StrokeOpacity,
        Self::StrokeWeight,
        Self::LabelVisible,
        Self::LabelMinZoom,
        Self::LabelMaxZoom,
        Self::ShowTooltip,
        Self::Title,
        Self::Visible,
        Self::ZIndex,
        Self::Paths,
    ];

    /// Returns the declarative (camelCase) name of the property.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clickable => "clickable",
            Self::Draggable => "draggable",
            Self::Editable => "editable",
            Self::FillColor => "fillColor",
            Self::FillOpacity => "fillOpacity",
            Self::Geodesic => "geodesic",
            Self::StrokeColor => "strokeColor",
            Self::StrokeOpacity => "strokeOpacity",
            Self::StrokeWeight => "strokeWeight",
            Self::LabelVisible => "labelVisible",
            Self::LabelMinZoom => "labelMinZoom",
            Self::LabelMaxZoom => "labelMaxZoom",
            Self::ShowTooltip => "showTooltip",
            Self::Title => "title",
            Self::Visible => "visible",
            Self::ZIndex => "zIndex",
            Self::Paths => "paths",
        }
    }

    /// Parses a declarative name. Unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// A typed new value for one [`Property`].
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// New `clickable` value.
    Clickable(bool),
    /// New `draggable` value.
    Draggable(bool),
    /// New `editable` value.
    Editable(bool),
    /// New `fillColor` value.
    FillColor(Option<String>),
    /// New `fillOpacity` value.
    FillOpacity(Option<f64>),
    /// New `geodesic` value.
    Geodesic(bool),
    /// New `strokeColor` value.
    StrokeColor(Option<String>),
    /// New `strokeOpacity` value.
    StrokeOpacity(Option<f64>),
    /// New `strokeWeight` value.
    StrokeWeight(Option<f64>),
    /// New `labelVisible` value.
    LabelVisible(bool),
    /// New `labelMinZoom` value.
    LabelMinZoom(Option<u8>),
    /// New `labelMaxZoom` value.
    LabelMaxZoom(Option<u8>),
    /// New `showTooltip` value.
    ShowTooltip(bool),
    /// New `title` value.
    Title(Option<String>),
    /// New `visible` value.
    Visible(bool),
    /// New `zIndex` value.
    ZIndex(Option<i32>),
    /// Replacement geometry.
    Paths(Paths),
}

impl PropertyValue {
    /// Returns the property this value belongs to.
    #[must_use]
    pub const fn property(&self) -> Property {
        match self {
            Self::Clickable(_) => Property::Clickable,
            Self::Draggable(_) => Property::Draggable,
            Self::Editable(_) => Property::Editable,
            Self::FillColor(_) => Property::FillColor,
            Self::FillOpacity(_) => Property::FillOpacity,
            Self::Geodesic(_) => Property::Geodesic,
            Self::StrokeColor(_) => Property::StrokeColor,
            Self::StrokeOpacity(_) => Property::StrokeOpacity,
            Self::StrokeWeight(_) => Property::StrokeWeight,
            Self::LabelVisible(_) => Property::LabelVisible,
            Self::LabelMinZoom(_) => Property::LabelMinZoom,
            Self::LabelMaxZoom(_) => Property::LabelMaxZoom,
            Self::ShowTooltip(_) => Property::ShowTooltip,
            Self::Title(_) => Property::Title,
            Self::Visible(_) => Property::Visible,
            Self::ZIndex(_) => Property::ZIndex,
            Self::Paths(_) => Property::Paths,
        }
    }
}

/// One entry of a change notification.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyChange {
    /// The value before the change, if the host tracks it. A change whose
    /// previous value equals its current one is stored but never sent.
    pub previous: Option<PropertyValue>,
    /// The value after the change.
    pub current: PropertyValue,
    /// Whether this is the property's initial binding rather than a later
    /// mutation.
    pub first_change: bool,
}

impl PropertyChange {
    /// A later mutation to `current`.
    #[must_use]
    pub fn new(current: PropertyValue) -> Self {
        Self {
            previous: None,
            current,
            first_change: false,
        }
    }

    /// The initial binding of a property to `current`.
    #[must_use]
    pub fn initial(current: PropertyValue) -> Self {
        Self {
            previous: None,
            current,
            first_change: true,
        }
    }

    /// Records the previous value.
    #[must_use]
    pub fn from_previous(mut self, previous: PropertyValue) -> Self {
        self.previous = Some(previous);
        self
    }

    /// Returns the property that changed.
    #[must_use]
    pub const fn property(&self) -> Property {
        self.current.property()
    }

    /// Returns `true` if the host reported a previous value equal to the
    /// current one.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.previous.as_ref() == Some(&self.current)
    }
}

/// An ordered change notification covering one or more properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyDelta {
    changes: Vec<PropertyChange>,
}

impl PropertyDelta {
    /// Creates an empty notification.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Appends a change.
    #[must_use]
    pub fn with(mut self, change: PropertyChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Appends a change.
    pub fn push(&mut self, change: PropertyChange) {
        self.changes.push(change);
    }

    /// Returns the changes in delivery order.
    #[must_use]
    pub fn changes(&self) -> &[PropertyChange] {
        &self.changes
    }

    /// Returns whether the notification is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl From<PropertyChange> for PropertyDelta {
    fn from(change: PropertyChange) -> Self {
        Self {
            changes: alloc::vec![change],
        }
    }
}

impl FromIterator<PropertyChange> for PropertyDelta {
    fn from_iter<I: IntoIterator<Item = PropertyChange>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PropertyDelta {
    type Item = PropertyChange;
    type IntoIter = alloc::vec::IntoIter<PropertyChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}
