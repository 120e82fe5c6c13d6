//! Entity reconciliation: diffs the logical annotation collection
//! against the renderer's primitives with minimal create/destroy churn.

use std::collections::BTreeMap;

use annotations::{AnnotationEntity, Geometry, geojson};
use foundation::PrimitiveHandle;
use foundation::math::GeoPos;
use serde_json::Value;
use tracing::{debug, warn};

use crate::anchor::label_anchor;
use crate::port::{Primitive, PrimitiveLabel, PrimitiveShape, RenderPort};
use crate::symbology;

/// Bookkeeping for one logical entity: the last applied snapshot plus
/// the ordered renderer handles backing it. Handles are non-owning
/// references into the renderer's arena.
#[derive(Debug, Clone)]
struct RenderedRecord {
    entity: AnnotationEntity,
    handles: Vec<PrimitiveHandle>,
}

#[derive(Debug, Default)]
pub struct EntityVisualizer {
    records: BTreeMap<String, RenderedRecord>,
}

impl EntityVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or updates primitives for each entity.
    ///
    /// For an already-known id the stored style is the merge base and
    /// incoming fields win. Multi-part geometries expand to children
    /// keyed `"<id>_<index>"`; surplus children are removed before any
    /// index is rewritten.
    pub fn add_or_update(&mut self, port: &mut dyn RenderPort, entities: &[AnnotationEntity]) {
        for entity in entities {
            self.apply_entity(port, entity);
        }
    }

    /// Replaces the whole collection.
    pub fn set_entities(&mut self, port: &mut dyn RenderPort, entities: &[AnnotationEntity]) {
        self.clear_entities(port);
        self.add_or_update(port, entities);
    }

    /// JSON-facing variant of `set_entities`.
    ///
    /// A `null` or non-array value is a no-op that succeeds without
    /// touching the current collection. Features that fail to parse are
    /// skipped with a diagnostic; the rest of the batch is applied.
    pub fn set_entities_json(&mut self, port: &mut dyn RenderPort, value: &Value) -> bool {
        let Some(features) = value.as_array() else {
            debug!("set_entities_json called without an entity array; ignoring");
            return true;
        };

        self.clear_entities(port);
        for (index, feature) in features.iter().enumerate() {
            match geojson::entity_from_feature(feature) {
                Ok(entity) => self.apply_entity(port, &entity),
                Err(reason) => {
                    warn!(index, %reason, "skipping entity");
                }
            }
        }
        true
    }

    /// Removes every managed primitive and empties the id map.
    pub fn clear_entities(&mut self, port: &mut dyn RenderPort) {
        for (_, record) in std::mem::take(&mut self.records) {
            for handle in record.handles {
                port.remove_primitive(handle);
            }
        }
    }

    /// Removing an unknown id is a no-op.
    pub fn remove_entity(&mut self, port: &mut dyn RenderPort, id: &str) {
        let Some(record) = self.records.remove(id) else {
            debug!(id, "remove_entity: unknown id");
            return;
        };
        for handle in record.handles {
            port.remove_primitive(handle);
        }
    }

    /// Logical snapshots only; renderer handles never escape.
    pub fn entities(&self) -> Vec<AnnotationEntity> {
        self.records.values().map(|r| r.entity.clone()).collect()
    }

    pub fn entity_by_id(&self, id: &str) -> Option<&AnnotationEntity> {
        self.records.get(id).map(|r| &r.entity)
    }

    /// Toggles the renderer group; the logical map is untouched.
    pub fn set_visibility(&self, port: &mut dyn RenderPort, visible: bool) {
        port.set_group_visible(visible);
    }

    fn apply_entity(&mut self, port: &mut dyn RenderPort, entity: &AnnotationEntity) {
        let previous = self.records.remove(&entity.id);

        let style = match &previous {
            Some(record) => record.entity.style.merged_with(&entity.style),
            None => entity.style.clone(),
        };
        let render_spec = match &style.per_entity {
            Some(overrides) => style.initial.overlaid_with(overrides),
            None => style.initial.clone(),
        };

        let shapes = primitive_shapes(entity);
        let mut handles = previous.map(|r| r.handles).unwrap_or_default();

        // Shrink first so stale children never outlive the update.
        if shapes.len() < handles.len() {
            for handle in handles.drain(shapes.len()..) {
                port.remove_primitive(handle);
            }
        }

        let label = entity
            .label
            .as_ref()
            .filter(|l| !l.text.is_empty())
            .and_then(|l| {
                let anchor = label_anchor(&entity.geometry)?;
                Some(PrimitiveLabel {
                    text: l.text.clone(),
                    size_px: l.size_px,
                    anchor,
                })
            });

        let multi = entity.geometry.is_multi_part();
        for (index, shape) in shapes.into_iter().enumerate() {
            let child_id = if multi {
                format!("{}_{}", entity.id, index)
            } else {
                entity.id.clone()
            };
            let primitive = Primitive {
                id: child_id,
                shape,
                style: symbology::resolve(&render_spec),
                // Labels ride on the first primitive only.
                label: if index == 0 { label.clone() } else { None },
            };

            if index < handles.len() {
                if !port.update_primitive(handles[index], primitive.clone()) {
                    handles[index] = port.create_primitive(primitive);
                }
            } else {
                handles.push(port.create_primitive(primitive));
            }
        }

        let mut snapshot = entity.clone();
        snapshot.style = style;
        self.records.insert(
            entity.id.clone(),
            RenderedRecord {
                entity: snapshot,
                handles,
            },
        );
    }
}

/// Explodes a geometry into renderer shapes, one per part.
///
/// The match is exhaustive: a new geometry kind cannot be added without
/// deciding how it renders.
fn primitive_shapes(entity: &AnnotationEntity) -> Vec<PrimitiveShape> {
    match &entity.geometry {
        Geometry::Point(position) => vec![point_shape(entity, *position)],
        Geometry::MultiPoint(positions) => positions
            .iter()
            .map(|p| point_shape(entity, *p))
            .collect(),
        Geometry::LineString(vertices) => vec![PrimitiveShape::Polyline {
            vertices: vertices.clone(),
        }],
        Geometry::MultiLineString(lines) => lines
            .iter()
            .map(|line| PrimitiveShape::Polyline {
                vertices: line.clone(),
            })
            .collect(),
        Geometry::Polygon(rings) => vec![PrimitiveShape::Polygon {
            rings: rings.clone(),
        }],
        Geometry::MultiPolygon(polys) => polys
            .iter()
            .map(|rings| PrimitiveShape::Polygon {
                rings: rings.clone(),
            })
            .collect(),
    }
}

fn point_shape(entity: &AnnotationEntity, position: GeoPos) -> PrimitiveShape {
    match &entity.icon {
        Some(icon) => PrimitiveShape::Billboard {
            position,
            image: icon.clone(),
        },
        None => PrimitiveShape::Marker { position },
    }
}
