// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal option patches.
//!
//! [`build_patch`] is a pure function from the current option snapshot and a
//! [`ChangeRecord`] to an [`OptionPatch`] carrying only the attributes that
//! changed. Unchanged attributes are never resent.
//!
//! # Coupled attributes
//!
//! Providers take fill color and fill opacity as one setting, so a change to
//! either one emits both. Stroke color and stroke opacity are coupled the
//! same way. Every other attribute maps to exactly one patch field.
//!
//! # Geometry
//!
//! [`Property::Paths`] never contributes to a patch. Replacing geometry is a
//! separate operation on the service; [`ChangeRecord::needs_geometry_resync`]
//! reports whether one is due.

use alloc::string::String;

use crate::id::OverlayId;
use crate::options::{PolygonOptions, Property};

const PROPERTY_COUNT: usize = Property::ALL.len();

/// Which properties changed in one notification.
///
/// A fixed table keyed by [`Property`]; each slot remembers whether the
/// change was the property's first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeRecord {
    slots: [Option<bool>; PROPERTY_COUNT],
}

impl ChangeRecord {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [None; PROPERTY_COUNT],
        }
    }

    /// Marks `property` as changed.
    ///
    /// Marking the same property twice keeps it a first change only if both
    /// marks were first changes.
    pub fn mark(&mut self, property: Property, first_change: bool) {
        let slot = &mut self.slots[property as usize];
        *slot = Some(slot.map_or(first_change, |prev| prev && first_change));
    }

    /// Marks the property called `name`. Unknown names are ignored.
    ///
    /// Returns whether the name was recognized.
    pub fn mark_named(&mut self, name: &str, first_change: bool) -> bool {
        match Property::from_name(name) {
            Some(property) => {
                self.mark(property, first_change);
                true
            }
            None => false,
        }
    }

    /// Builder-style [`mark`](Self::mark).
    #[must_use]
    pub fn with(mut self, property: Property, first_change: bool) -> Self {
        self.mark(property, first_change);
        self
    }

    /// Returns whether `property` changed.
    #[must_use]
    pub const fn changed(&self, property: Property) -> bool {
        self.slots[property as usize].is_some()
    }

    /// Returns whether `property` changed for the first time.
    #[must_use]
    pub fn is_first_change(&self, property: Property) -> bool {
        self.slots[property as usize] == Some(true)
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Returns whether the geometry must be resent.
    ///
    /// The initial geometry travels with registration, so only later changes
    /// to [`Property::Paths`] count.
    #[must_use]
    pub fn needs_geometry_resync(&self) -> bool {
        self.slots[Property::Paths as usize] == Some(false)
    }

    /// Iterates the changed properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Property> + '_ {
        Property::ALL.into_iter().filter(|&p| self.changed(p))
    }
}

/// A partial option update for one overlay.
///
/// Unset fields (`None`) are not part of the update. For optional
/// attributes, `Some(None)` clears the attribute on the provider side.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OptionPatch {
    /// The overlay to update.
    pub id: OverlayId,
    /// New `clickable` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub clickable: Option<bool>,
    /// New `draggable` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub draggable: Option<bool>,
    /// New `editable` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub editable: Option<bool>,
    /// New `fillColor` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub fill_color: Option<Option<String>>,
    /// New `fillOpacity` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub fill_opacity: Option<Option<f64>>,
    /// New `geodesic` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub geodesic: Option<bool>,
    /// New `strokeColor` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub stroke_color: Option<Option<String>>,
    /// New `strokeOpacity` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub stroke_opacity: Option<Option<f64>>,
    /// New `strokeWeight` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub stroke_weight: Option<Option<f64>>,
    /// New `labelVisible` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub label_visible: Option<bool>,
    /// New `labelMinZoom` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub label_min_zoom: Option<Option<u8>>,
    /// New `labelMaxZoom` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub label_max_zoom: Option<Option<u8>>,
    /// New `showTooltip` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub show_tooltip: Option<bool>,
    /// New `title` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub title: Option<Option<String>>,
    /// New `visible` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub visible: Option<bool>,
    /// New `zIndex` value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub z_index: Option<Option<i32>>,
}

impl OptionPatch {
    /// Creates a patch for `id` with no fields set.
    #[must_use]
    pub const fn empty(id: OverlayId) -> Self {
        Self {
            id,
            clickable: None,
            draggable: None,
            editable: None,
            fill_color: None,
            fill_opacity: None,
            geodesic: None,
            stroke_color: None,
            stroke_opacity: None,
            stroke_weight: None,
            label_visible: None,
            label_min_zoom: None,
            label_max_zoom: None,
            show_tooltip: None,
            title: None,
            visible: None,
            z_index: None,
        }
    }

    /// Returns whether no attribute besides `id` is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Returns the number of attributes set.
    #[must_use]
    pub fn field_count(&self) -> usize {
        [
            self.clickable.is_some(),
            self.draggable.is_some(),
            self.editable.is_some(),
            self.fill_color.is_some(),
            self.fill_opacity.is_some(),
            self.geodesic.is_some(),
            self.stroke_color.is_some(),
            self.stroke_opacity.is_some(),
            self.stroke_weight.is_some(),
            self.label_visible.is_some(),
            self.label_min_zoom.is_some(),
            self.label_max_zoom.is_some(),
            self.show_tooltip.is_some(),
            self.title.is_some(),
            self.visible.is_some(),
            self.z_index.is_some(),
        ]
        .into_iter()
        .filter(|&set| set)
        .count()
    }
}

/// Builds the minimal patch for the properties in `record`, reading current
/// values from `snapshot`.
///
/// Returns `None` when no attribute changed; callers must not contact the
/// service in that case.
#[must_use]
pub fn build_patch(
    id: OverlayId,
    snapshot: &PolygonOptions,
    record: &ChangeRecord,
) -> Option<OptionPatch> {
    let mut patch = OptionPatch::empty(id);
    let changed = |p| record.changed(p);

    if changed(Property::Clickable) {
        patch.clickable = Some(snapshot.clickable);
    }
    if changed(Property::Draggable) {
        patch.draggable = Some(snapshot.draggable);
    }
    if changed(Property::Editable) {
        patch.editable = Some(snapshot.editable);
    }
    if changed(Property::FillColor) || changed(Property::FillOpacity) {
        patch.fill_color = Some(snapshot.fill_color.clone());
        patch.fill_opacity = Some(snapshot.fill_opacity);
    }
    if changed(Property::Geodesic) {
        patch.geodesic = Some(snapshot.geodesic);
    }
    if changed(Property::StrokeColor) || changed(Property::StrokeOpacity) {
        patch.stroke_color = Some(snapshot.stroke_color.clone());
        patch.stroke_opacity = Some(snapshot.stroke_opacity);
    }
    if changed(Property::StrokeWeight) {
        patch.stroke_weight = Some(snapshot.stroke_weight);
    }
    if changed(Property::LabelVisible) {
        patch.label_visible = Some(snapshot.label_visible);
    }
    if changed(Property::LabelMinZoom) {
        patch.label_min_zoom = Some(snapshot.label_min_zoom);
    }
    if changed(Property::LabelMaxZoom) {
        patch.label_max_zoom = Some(snapshot.label_max_zoom);
    }
    if changed(Property::ShowTooltip) {
        patch.show_tooltip = Some(snapshot.show_tooltip);
    }
    if changed(Property::Title) {
        patch.title = Some(snapshot.title.clone());
    }
    if changed(Property::Visible) {
        patch.visible = Some(snapshot.visible);
    }
    if changed(Property::ZIndex) {
        patch.z_index = Some(snapshot.z_index);
    }

    (!patch.is_empty()).then_some(patch)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    fn snapshot() -> PolygonOptions {
        PolygonOptions::default()
            .with_fill("#00ff00", 0.4)
            .with_stroke("#0000ff", 0.9, 2.0)
            .with_z_index(5)
    }

    fn single(property: Property) -> Option<OptionPatch> {
        let id = OverlayId::next();
        build_patch(id, &snapshot(), &ChangeRecord::new().with(property, false))
    }

    #[test]
    fn empty_record_yields_none() {
        let id = OverlayId::next();
        assert_eq!(build_patch(id, &snapshot(), &ChangeRecord::new()), None);
    }

    #[test]
    fn uncoupled_attributes_map_one_to_one() {
        let uncoupled = Property::ALL.into_iter().filter(|p| {
            !matches!(
                p,
                Property::Paths
                    | Property::FillColor
                    | Property::FillOpacity
                    | Property::StrokeColor
                    | Property::StrokeOpacity
            )
        });
        for p in uncoupled {
            let patch = single(p).expect("single attribute change yields a patch");
            assert_eq!(patch.field_count(), 1, "{p:?} should set exactly one field");
        }
    }

    #[test]
    fn stroke_weight_carries_current_value() {
        let patch = single(Property::StrokeWeight).expect("patch");
        let mut expected = OptionPatch::empty(patch.id);
        expected.stroke_weight = Some(Some(2.0));
        assert_eq!(patch, expected);
    }

    #[test]
    fn fill_color_pulls_in_opacity() {
        let patch = single(Property::FillColor).expect("patch");
        assert_eq!(patch.fill_color, Some(Some("#00ff00".to_string())));
        assert_eq!(patch.fill_opacity, Some(Some(0.4)));
        assert_eq!(patch.field_count(), 2);
    }

    #[test]
    fn fill_opacity_pulls_in_color() {
        let patch = single(Property::FillOpacity).expect("patch");
        assert_eq!(patch.fill_color, Some(Some("#00ff00".to_string())));
        assert_eq!(patch.fill_opacity, Some(Some(0.4)));
        assert_eq!(patch.field_count(), 2);
    }

    #[test]
    fn stroke_pair_is_coupled() {
        for p in [Property::StrokeColor, Property::StrokeOpacity] {
            let patch = single(p).expect("patch");
            assert_eq!(patch.stroke_color, Some(Some("#0000ff".to_string())));
            assert_eq!(patch.stroke_opacity, Some(Some(0.9)));
            assert_eq!(patch.stroke_weight, None, "weight is not coupled");
            assert_eq!(patch.field_count(), 2);
        }
    }

    #[test]
    fn paths_never_patch() {
        assert_eq!(single(Property::Paths), None);
    }

    #[test]
    fn cleared_attribute_is_sent_as_clear() {
        let mut options = snapshot();
        options.z_index = None;
        let id = OverlayId::next();
        let record = ChangeRecord::new().with(Property::ZIndex, false);
        let patch = build_patch(id, &options, &record).expect("clearing is a change");
        assert_eq!(patch.z_index, Some(None));
    }

    #[test]
    fn first_change_still_patches_attributes() {
        let id = OverlayId::next();
        let record = ChangeRecord::new().with(Property::Visible, true);
        let patch = build_patch(id, &snapshot(), &record).expect("patch");
        assert_eq!(patch.visible, Some(true));
    }

    #[test]
    fn resync_only_after_first_paths_change() {
        let first = ChangeRecord::new().with(Property::Paths, true);
        assert!(!first.needs_geometry_resync(), "initial geometry ships with registration");

        let later = ChangeRecord::new().with(Property::Paths, false);
        assert!(later.needs_geometry_resync(), "later paths change resyncs");

        let attrs_only = ChangeRecord::new().with(Property::Title, false);
        assert!(!attrs_only.needs_geometry_resync(), "no paths change");
    }

    #[test]
    fn repeated_mark_demotes_first_change() {
        let record = ChangeRecord::new()
            .with(Property::Paths, true)
            .with(Property::Paths, false);
        assert!(!record.is_first_change(Property::Paths), "any later mark wins");
        assert!(record.needs_geometry_resync(), "demoted change resyncs");
    }

    #[test]
    fn unknown_names_are_ignored() {
        let mut record = ChangeRecord::new();
        assert!(!record.mark_named("bogus", false), "unknown name");
        assert!(record.is_empty(), "unknown name leaves record untouched");
        assert!(record.mark_named("strokeWeight", false), "known name");
        assert_eq!(record.iter().collect::<alloc::vec::Vec<_>>(), [Property::StrokeWeight]);
    }
}
