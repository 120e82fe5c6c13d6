use foundation::PrimitiveHandle;
use foundation::math::{GeoPos, Vec2};

use crate::symbology::ResolvedStyle;

/// Renderer-native drawable shape backing one logical entity part.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveShape {
    Marker { position: GeoPos },
    Billboard { position: GeoPos, image: String },
    Polyline { vertices: Vec<GeoPos> },
    Polygon { rings: Vec<Vec<GeoPos>> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveLabel {
    pub text: String,
    pub size_px: f64,
    pub anchor: GeoPos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub id: String,
    pub shape: PrimitiveShape,
    pub style: ResolvedStyle,
    pub label: Option<PrimitiveLabel>,
}

/// The only surface the core needs from a rendering engine.
///
/// `pick_surface` must be synchronous and return `None` when the pixel
/// does not intersect the drawable surface, never panic.
pub trait RenderPort {
    fn create_primitive(&mut self, primitive: Primitive) -> PrimitiveHandle;

    /// Returns `false` for stale or unknown handles.
    fn update_primitive(&mut self, handle: PrimitiveHandle, primitive: Primitive) -> bool;

    /// Returns `false` for stale or unknown handles.
    fn remove_primitive(&mut self, handle: PrimitiveHandle) -> bool;

    /// Toggles visibility of the whole managed primitive group.
    fn set_group_visible(&mut self, visible: bool);

    fn pick_surface(&self, screen_px: Vec2) -> Option<GeoPos>;
}

/// Linear screen-to-geo mapping used by the in-memory port.
///
/// Pixel (0,0) is the north-west corner of the viewport; latitude
/// decreases as y grows. Pixels outside the viewport miss the surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlanarPick {
    pub viewport_px: Vec2,
    pub origin: GeoPos,
    pub deg_per_px: f64,
}

impl PlanarPick {
    pub fn project(&self, px: Vec2) -> Option<GeoPos> {
        if px.x < 0.0 || px.y < 0.0 || px.x > self.viewport_px.x || px.y > self.viewport_px.y {
            return None;
        }
        Some(GeoPos::new(
            self.origin.lon_deg + px.x * self.deg_per_px,
            self.origin.lat_deg - px.y * self.deg_per_px,
            0.0,
        ))
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    primitive: Option<Primitive>,
}

/// Arena-backed render port for tests and headless tooling.
///
/// Handles are generational: removing a primitive bumps the slot
/// generation, so stale handles fail `update`/`remove` instead of
/// touching a reused slot.
#[derive(Debug)]
pub struct MemoryRenderPort {
    slots: Vec<Slot>,
    free: Vec<u32>,
    visible: bool,
    pick: PlanarPick,
}

impl MemoryRenderPort {
    pub fn new(pick: PlanarPick) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            visible: true,
            pick,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.primitive.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn primitive(&self, handle: PrimitiveHandle) -> Option<&Primitive> {
        let slot = self.slots.get(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.primitive.as_ref()
    }

    /// Live primitives in slot order.
    pub fn live_primitives(&self) -> Vec<(PrimitiveHandle, &Primitive)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let prim = slot.primitive.as_ref()?;
                Some((PrimitiveHandle::new(idx as u32, slot.generation), prim))
            })
            .collect()
    }
}

impl RenderPort for MemoryRenderPort {
    fn create_primitive(&mut self, primitive: Primitive) -> PrimitiveHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.primitive = Some(primitive);
            return PrimitiveHandle::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            primitive: Some(primitive),
        });
        PrimitiveHandle::new(index, 0)
    }

    fn update_primitive(&mut self, handle: PrimitiveHandle, primitive: Primitive) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index() as usize) else {
            return false;
        };
        if slot.generation != handle.generation() || slot.primitive.is_none() {
            return false;
        }
        slot.primitive = Some(primitive);
        true
    }

    fn remove_primitive(&mut self, handle: PrimitiveHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index() as usize) else {
            return false;
        };
        if slot.generation != handle.generation() || slot.primitive.is_none() {
            return false;
        }
        slot.primitive = None;
        slot.generation += 1;
        self.free.push(handle.index());
        true
    }

    fn set_group_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn pick_surface(&self, screen_px: Vec2) -> Option<GeoPos> {
        self.pick.project(screen_px)
    }
}

#[cfg(test)]
pub(crate) fn test_pick() -> PlanarPick {
    PlanarPick {
        viewport_px: Vec2::new(800.0, 600.0),
        origin: GeoPos::new(-40.0, 30.0, 0.0),
        deg_per_px: 0.1,
    }
}
