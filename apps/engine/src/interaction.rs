//! Hover and selection handling shared by every host.
//!
//! Hosts translate their own pointer and keyboard events into
//! [`InteractionEvent`]s; the controller updates [`SelectionState`] and
//! answers with the [`Effect`]s the host should apply.

use std::fmt;

use serde::Serialize;

use crate::geometry::Point;
use crate::model::ItemIndex;
use crate::scene::Scene;

/// The only mutable UI state; reset on every load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub hovered: Option<ItemIndex>,
    pub selected: Option<ItemIndex>,
}

/// How hover and selection currently compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Hovering(ItemIndex),
    Selected(ItemIndex),
    HoveringWhileSelected {
        hovered: ItemIndex,
        selected: ItemIndex,
    },
}

impl SelectionState {
    pub const fn phase(&self) -> Phase {
        match (self.hovered, self.selected) {
            (None, None) => Phase::Idle,
            (Some(hovered), None) => Phase::Hovering(hovered),
            (None, Some(selected)) => Phase::Selected(selected),
            (Some(hovered), Some(selected)) => Phase::HoveringWhileSelected { hovered, selected },
        }
    }

    pub const fn tooltip_visible(&self) -> bool {
        self.hovered.is_some()
    }

    pub fn is_hovered(&self, index: ItemIndex) -> bool {
        self.hovered == Some(index)
    }

    pub fn is_selected(&self, index: ItemIndex) -> bool {
        self.selected == Some(index)
    }
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Marker(ItemIndex),
    /// Legend rows are addressed by their shared display number.
    LegendRow(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    PointerEnter { index: ItemIndex, pointer: Point },
    PointerLeave { index: ItemIndex },
    Click(ClickTarget),
}

impl fmt::Display for InteractionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointerEnter { index, .. } => write!(f, "PointerEnter({index})"),
            Self::PointerLeave { index } => write!(f, "PointerLeave({index})"),
            Self::Click(ClickTarget::Marker(index)) => write!(f, "Click(marker {index})"),
            Self::Click(ClickTarget::LegendRow(number)) => write!(f, "Click(legend row {number})"),
        }
    }
}

/// Transient hover label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub index: ItemIndex,
    pub title: String,
    pub subtitle: String,
    pub anchor: Point,
}

/// Instructions for the host after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    EnlargeMarker(ItemIndex),
    RestoreMarkerSize(ItemIndex),
    ShowTooltip(Tooltip),
    HideTooltip,
    RestoreStroke(ItemIndex),
    EmphasizeStroke(ItemIndex),
    ShowDetail(ItemIndex),
    ScrollDetailIntoView,
}

/// Hover/selection state machine.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: SelectionState,
    pointer: Option<Point>,
    tooltip_offset: (f64, f64),
}

impl InteractionController {
    pub const fn new(tooltip_offset: (f64, f64)) -> Self {
        Self {
            state: SelectionState {
                hovered: None,
                selected: None,
            },
            pointer: None,
            tooltip_offset,
        }
    }

    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Back to `none, none`, as on a fresh load.
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
        self.pointer = None;
    }

    /// Forgets the hovered item but keeps the selection, for when the
    /// markers under the pointer have been laid out again.
    pub fn clear_hover(&mut self) {
        self.state.hovered = None;
        self.pointer = None;
    }

    /// Applies one event. Events naming items the scene no longer has are
    /// ignored.
    pub fn handle(&mut self, scene: &Scene, event: InteractionEvent) -> Vec<Effect> {
        let effects = match event {
            InteractionEvent::PointerEnter { index, pointer } => {
                self.pointer_enter(scene, index, pointer)
            }
            InteractionEvent::PointerLeave { index } => self.pointer_leave(index),
            InteractionEvent::Click(target) => self.click(scene, target),
        };

        match &effects {
            Some(effects) => {
                tracing::debug!(%event, effects = effects.len(), state = ?self.state, "interaction");
                effects.clone()
            }
            None => {
                tracing::debug!(%event, "ignored interaction on stale or inactive target");
                Vec::new()
            }
        }
    }

    /// Turns a raw pointer position into enter/leave events via hit testing.
    pub fn pointer_moved(&mut self, scene: &Scene, pointer: Point, hit_radius: f64) -> Vec<Effect> {
        let hit = hit_test(scene, pointer, hit_radius);
        match (self.state.hovered, hit) {
            (Some(current), Some(index)) if current == index => {
                self.pointer = Some(pointer);
                self.tooltip(scene)
                    .map(Effect::ShowTooltip)
                    .into_iter()
                    .collect()
            }
            (_, Some(index)) => self.handle(scene, InteractionEvent::PointerEnter { index, pointer }),
            (Some(current), None) => self.handle(scene, InteractionEvent::PointerLeave { index: current }),
            (None, None) => Vec::new(),
        }
    }

    /// Tooltip for the hovered item; visible iff something is hovered.
    pub fn tooltip(&self, scene: &Scene) -> Option<Tooltip> {
        let index = self.state.hovered?;
        let marker = scene.marker(index)?;
        let pointer = self.pointer.unwrap_or(marker.position);
        let ring = scene.ring(marker.item.ring_id)?;

        Some(Tooltip {
            index,
            title: marker.item.name.clone(),
            subtitle: ring.name.clone(),
            anchor: Point {
                x: pointer.x + self.tooltip_offset.0,
                y: pointer.y - self.tooltip_offset.1,
            },
        })
    }

    fn pointer_enter(&mut self, scene: &Scene, index: ItemIndex, pointer: Point) -> Option<Vec<Effect>> {
        scene.marker(index)?;

        let mut effects = Vec::new();
        if let Some(previous) = self.state.hovered.filter(|&previous| previous != index) {
            effects.push(Effect::RestoreMarkerSize(previous));
            effects.push(Effect::HideTooltip);
        }

        self.state.hovered = Some(index);
        self.pointer = Some(pointer);

        effects.push(Effect::EnlargeMarker(index));
        effects.extend(self.tooltip(scene).map(Effect::ShowTooltip));
        Some(effects)
    }

    fn pointer_leave(&mut self, index: ItemIndex) -> Option<Vec<Effect>> {
        if self.state.hovered != Some(index) {
            return None;
        }

        self.state.hovered = None;
        self.pointer = None;
        Some(vec![Effect::RestoreMarkerSize(index), Effect::HideTooltip])
    }

    fn click(&mut self, scene: &Scene, target: ClickTarget) -> Option<Vec<Effect>> {
        let index = match target {
            ClickTarget::Marker(index) => scene.marker(index)?.index,
            ClickTarget::LegendRow(number) => scene.marker_by_number(number)?.index,
        };

        let mut effects = Vec::new();
        if let Some(previous) = self.state.selected {
            effects.push(Effect::RestoreStroke(previous));
        }

        self.state.selected = Some(index);

        effects.push(Effect::EmphasizeStroke(index));
        effects.push(Effect::ShowDetail(index));
        effects.push(Effect::ScrollDetailIntoView);
        Some(effects)
    }
}

/// Topmost marker within `hit_radius` of `pointer`.
///
/// Markers drawn later sit on top, so the search runs back to front.
pub fn hit_test(scene: &Scene, pointer: Point, hit_radius: f64) -> Option<ItemIndex> {
    scene
        .markers
        .iter()
        .rev()
        .find(|marker| marker.position.distance_to(pointer) <= hit_radius)
        .map(|marker| marker.index)
}
