//! The drawing state machine: Idle until `start_drawing`, Collecting
//! until a finalizing event, back to Idle atomically.

use annotations::{ALL_MODES, AnnotationMode, LayeredStyle, StyleSpec, is_drawing_mode_supported};
use foundation::math::Vec2;
use tracing::debug;
use visualizer::{Primitive, PrimitiveShape, RenderPort, symbology};

use crate::events::{PointerEvent, PointerKind};
use crate::finalize::{AnnotationFeature, finalize};
use crate::session::{DrawingSession, RectCorners, SessionAux};
use crate::tessellate::tessellate_ellipse;

const ANCHOR_PRIMITIVE_ID: &str = "draw_anchor";
const PREVIEW_PRIMITIVE_ID: &str = "draw_preview";

pub struct DrawTool {
    supported: Vec<AnnotationMode>,
    style: StyleSpec,
    session: Option<DrawingSession>,
}

impl Default for DrawTool {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTool {
    pub fn new() -> Self {
        Self::with_modes(&ALL_MODES)
    }

    /// A tool restricted to a subset of modes; `start_drawing` rejects
    /// the rest.
    pub fn with_modes(modes: &[AnnotationMode]) -> Self {
        Self {
            supported: modes.to_vec(),
            style: LayeredStyle::annotation_default().initial,
            session: None,
        }
    }

    pub fn is_mode_supported(&self, mode: AnnotationMode) -> bool {
        is_drawing_mode_supported(mode) && self.supported.contains(&mode)
    }

    /// Style snapshot applied to every feature this tool finalizes.
    pub fn set_style(&mut self, style: StyleSpec) {
        self.style = style;
    }

    pub fn style(&self) -> &StyleSpec {
        &self.style
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DrawingSession> {
        self.session.as_ref()
    }

    /// Returns `false` without touching state when the mode is not in
    /// this tool's supported set. Otherwise any prior session is torn
    /// down and a fresh one starts collecting.
    pub fn start_drawing(&mut self, port: &mut dyn RenderPort, mode: AnnotationMode) -> bool {
        if !self.is_mode_supported(mode) {
            debug!(mode = mode.as_str(), "drawing mode not supported");
            return false;
        }
        self.reset(port);
        debug!(mode = mode.as_str(), "drawing session started");
        self.session = Some(DrawingSession::new(mode));
        true
    }

    /// Unconditional teardown: temporary primitives removed, session
    /// state dropped wholesale.
    pub fn reset(&mut self, port: &mut dyn RenderPort) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(handle) = session.anchor_handle {
            port.remove_primitive(handle);
        }
        if let Some(handle) = session.preview_handle {
            port.remove_primitive(handle);
        }
        debug!(mode = session.mode.as_str(), "drawing session reset");
    }

    /// Feeds one pointer event through the state machine. Returns a
    /// finished feature exactly when the event completed the session;
    /// events outside a session are no-ops.
    pub fn handle_event(
        &mut self,
        port: &mut dyn RenderPort,
        event: &PointerEvent,
    ) -> Option<AnnotationFeature> {
        self.session.as_ref()?;
        match event.kind {
            PointerKind::Move => {
                self.on_move(port, event.screen_px);
                None
            }
            PointerKind::Click => self.on_press(port, event.screen_px, false),
            PointerKind::DoubleClick => self.on_press(port, event.screen_px, true),
        }
    }

    fn on_move(&mut self, port: &mut dyn RenderPort, px: Vec2) {
        let Some(geo) = port.pick_surface(px) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.preview = Some(geo);
        match &mut session.aux {
            SessionAux::Rect { anchor_px, corners } => {
                if let Some(quad) = rect_corners(&*port, *anchor_px, px) {
                    *corners = Some(quad);
                }
            }
            SessionAux::Circle {
                center_px,
                radius_px,
                ..
            } => {
                *radius_px = center_px.distance_to(px);
            }
            SessionAux::None => {}
        }
        self.sync_preview(port);
    }

    fn on_press(
        &mut self,
        port: &mut dyn RenderPort,
        px: Vec2,
        is_double: bool,
    ) -> Option<AnnotationFeature> {
        // Off-surface presses never advance the session.
        let geo = port.pick_surface(px)?;
        let mode = self.session.as_ref()?.mode;

        match mode {
            AnnotationMode::Point => {
                self.session.as_mut()?.committed.push(geo);
                self.finish(port)
            }
            AnnotationMode::LineString | AnnotationMode::Polygon | AnnotationMode::Arrow => {
                if is_double {
                    // Finalize from committed vertices only; with none
                    // committed this is a guarded no-op.
                    return self.finish(port);
                }
                self.session.as_mut()?.committed.push(geo);
                self.ensure_anchor(port);
                self.sync_preview(port);
                None
            }
            AnnotationMode::Rectangle => {
                let armed = matches!(self.session.as_ref()?.aux, SessionAux::Rect { .. });
                if !armed {
                    self.session.as_mut()?.aux = SessionAux::Rect {
                        anchor_px: px,
                        corners: None,
                    };
                    self.session.as_mut()?.committed.push(geo);
                    self.ensure_anchor(port);
                    return None;
                }
                if let SessionAux::Rect { anchor_px, corners } = &mut self.session.as_mut()?.aux {
                    if let Some(quad) = rect_corners(&*port, *anchor_px, px) {
                        *corners = Some(quad);
                    }
                }
                self.finish(port)
            }
            AnnotationMode::Circle => {
                let armed = matches!(self.session.as_ref()?.aux, SessionAux::Circle { .. });
                if !armed {
                    self.session.as_mut()?.aux = SessionAux::Circle {
                        center_px: px,
                        center_geo: geo,
                        radius_px: 0.0,
                    };
                    self.session.as_mut()?.committed.push(geo);
                    self.ensure_anchor(port);
                    return None;
                }
                if let SessionAux::Circle {
                    center_px,
                    radius_px,
                    ..
                } = &mut self.session.as_mut()?.aux
                {
                    *radius_px = center_px.distance_to(px);
                }
                self.finish(port)
            }
        }
    }

    /// Atomic Collecting → Idle transition. A `None` from the finalizer
    /// keeps the session alive so the user can keep adding vertices.
    fn finish(&mut self, port: &mut dyn RenderPort) -> Option<AnnotationFeature> {
        let feature = {
            let session = self.session.as_ref()?;
            finalize(
                &*port,
                session.mode,
                &session.committed,
                &session.aux,
                &self.style,
            )
        };
        if let Some(feature) = &feature {
            debug!(id = feature.id.as_str(), mode = feature.mode.as_str(), "annotation finalized");
            self.reset(port);
        }
        feature
    }

    /// Drops a marker on the first committed vertex so the user can see
    /// where the shape starts.
    fn ensure_anchor(&mut self, port: &mut dyn RenderPort) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.anchor_handle.is_some() {
            return;
        }
        let Some(position) = session.committed.first().copied() else {
            return;
        };
        let primitive = Primitive {
            id: ANCHOR_PRIMITIVE_ID.to_string(),
            shape: PrimitiveShape::Marker { position },
            style: symbology::resolve(&self.style),
            label: None,
        };
        session.anchor_handle = Some(port.create_primitive(primitive));
    }

    /// Keeps the single feedback primitive in sync with the committed
    /// vertices plus the live preview point.
    fn sync_preview(&mut self, port: &mut dyn RenderPort) {
        let shape = {
            let Some(session) = self.session.as_ref() else {
                return;
            };
            preview_shape(&*port, session)
        };
        let Some(shape) = shape else {
            return;
        };
        let primitive = Primitive {
            id: PREVIEW_PRIMITIVE_ID.to_string(),
            shape,
            style: symbology::resolve(&self.style),
            label: None,
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.preview_handle {
            Some(handle) => {
                if !port.update_primitive(handle, primitive.clone()) {
                    session.preview_handle = Some(port.create_primitive(primitive));
                }
            }
            None => {
                session.preview_handle = Some(port.create_primitive(primitive));
            }
        }
    }
}

fn preview_shape(port: &dyn RenderPort, session: &DrawingSession) -> Option<PrimitiveShape> {
    match session.mode {
        AnnotationMode::Point => None,
        AnnotationMode::LineString | AnnotationMode::Polygon | AnnotationMode::Arrow => {
            if session.committed.is_empty() {
                return None;
            }
            let mut vertices = session.committed.clone();
            if let Some(preview) = session.preview {
                vertices.push(preview);
            }
            if vertices.len() < 2 {
                return None;
            }
            Some(PrimitiveShape::Polyline { vertices })
        }
        AnnotationMode::Rectangle => match &session.aux {
            SessionAux::Rect {
                corners: Some(corners),
                ..
            } => Some(PrimitiveShape::Polygon {
                rings: vec![corners.ring()],
            }),
            _ => None,
        },
        AnnotationMode::Circle => match &session.aux {
            SessionAux::Circle {
                center_px,
                radius_px,
                ..
            } if *radius_px > 0.0 => {
                let ring = tessellate_ellipse(port, *center_px, *radius_px, *radius_px, 0.0);
                (ring.len() >= 3).then_some(PrimitiveShape::Polygon { rings: vec![ring] })
            }
            _ => None,
        },
    }
}

/// Axis-aligned screen rectangle between the fixed anchor and the live
/// pointer, projected corner by corner. All four corners must land on
/// the surface, otherwise the previous quad stands.
fn rect_corners(port: &dyn RenderPort, anchor_px: Vec2, cursor_px: Vec2) -> Option<RectCorners> {
    let min_x = anchor_px.x.min(cursor_px.x);
    let max_x = anchor_px.x.max(cursor_px.x);
    let min_y = anchor_px.y.min(cursor_px.y);
    let max_y = anchor_px.y.max(cursor_px.y);
    if min_x == max_x || min_y == max_y {
        return None;
    }
    Some(RectCorners {
        nw: port.pick_surface(Vec2::new(min_x, min_y))?,
        ne: port.pick_surface(Vec2::new(max_x, min_y))?,
        se: port.pick_surface(Vec2::new(max_x, max_y))?,
        sw: port.pick_surface(Vec2::new(min_x, max_y))?,
    })
}

#[cfg(test)]
mod tests {
    use super::DrawTool;
    use crate::events::PointerEvent;
    use annotations::{AnnotationMode, Geometry, StyleSpec};
    use foundation::math::{GeoPos, Vec2};
    use visualizer::{MemoryRenderPort, PlanarPick, RenderPort};

    fn port() -> MemoryRenderPort {
        MemoryRenderPort::new(PlanarPick {
            viewport_px: Vec2::new(800.0, 600.0),
            origin: GeoPos::new(-40.0, 30.0, 0.0),
            deg_per_px: 0.1,
        })
    }

    fn geo_at(port: &MemoryRenderPort, x: f64, y: f64) -> GeoPos {
        port.pick_surface(Vec2::new(x, y)).expect("on surface")
    }

    #[test]
    fn point_click_finalizes_and_resets() {
        let mut port = port();
        let mut tool = DrawTool::new();
        assert!(tool.start_drawing(&mut port, AnnotationMode::Point));

        let feature = tool
            .handle_event(&mut port, &PointerEvent::click(10.0, 20.0))
            .expect("feature");
        assert_eq!(feature.mode, AnnotationMode::Point);
        assert_eq!(feature.geometry, Geometry::Point(geo_at(&port, 10.0, 20.0)));

        assert!(!tool.is_drawing());
        assert!(port.is_empty(), "no temporaries may survive finalize");
    }

    #[test]
    fn off_surface_click_is_ignored() {
        let mut port = port();
        let mut tool = DrawTool::new();
        tool.start_drawing(&mut port, AnnotationMode::LineString);

        assert!(
            tool.handle_event(&mut port, &PointerEvent::click(-5.0, -5.0))
                .is_none()
        );
        assert_eq!(tool.session().expect("session").committed.len(), 0);

        tool.handle_event(&mut port, &PointerEvent::click(10.0, 10.0));
        assert_eq!(tool.session().expect("session").committed.len(), 1);
    }

    #[test]
    fn polygon_double_click_closes_on_first_vertex() {
        let mut port = port();
        let mut tool = DrawTool::new();
        tool.start_drawing(&mut port, AnnotationMode::Polygon);

        for (x, y) in [(100.0, 100.0), (200.0, 100.0), (200.0, 200.0)] {
            tool.handle_event(&mut port, &PointerEvent::click(x, y));
        }
        let feature = tool
            .handle_event(&mut port, &PointerEvent::double_click(200.0, 200.0))
            .expect("feature");

        let Geometry::Polygon(rings) = &feature.geometry else {
            panic!("expected polygon");
        };
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[0][0], geo_at(&port, 100.0, 100.0));
        assert_eq!(rings[0].first(), rings[0].last());
        assert!(port.is_empty());
    }

    #[test]
    fn stray_double_click_keeps_the_session() {
        let mut port = port();
        let mut tool = DrawTool::new();
        tool.start_drawing(&mut port, AnnotationMode::LineString);

        assert!(
            tool.handle_event(&mut port, &PointerEvent::double_click(10.0, 10.0))
                .is_none()
        );
        assert!(tool.is_drawing());
    }

    #[test]
    fn preview_point_is_excluded_from_the_geometry() {
        let mut port = port();
        let mut tool = DrawTool::new();
        tool.start_drawing(&mut port, AnnotationMode::LineString);

        tool.handle_event(&mut port, &PointerEvent::click(10.0, 10.0));
        tool.handle_event(&mut port, &PointerEvent::click(50.0, 10.0));
        tool.handle_event(&mut port, &PointerEvent::moved(90.0, 90.0));
        let feature = tool
            .handle_event(&mut port, &PointerEvent::double_click(90.0, 90.0))
            .expect("feature");

        let Geometry::LineString(vertices) = &feature.geometry else {
            panic!("expected line");
        };
        assert_eq!(vertices.len(), 2);
    }

    #[test]
    fn rectangle_corners_wind_nw_ne_se_sw() {
        let mut port = port();
        let mut tool = DrawTool::new();
        tool.start_drawing(&mut port, AnnotationMode::Rectangle);

        tool.handle_event(&mut port, &PointerEvent::click(100.0, 100.0));
        tool.handle_event(&mut port, &PointerEvent::moved(200.0, 200.0));
        let feature = tool
            .handle_event(&mut port, &PointerEvent::click(200.0, 200.0))
            .expect("feature");

        let Geometry::Polygon(rings) = &feature.geometry else {
            panic!("expected polygon");
        };
        let ring = &rings[0];
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], geo_at(&port, 100.0, 100.0)); // NW
        assert_eq!(ring[1], geo_at(&port, 200.0, 100.0)); // NE
        assert_eq!(ring[2], geo_at(&port, 200.0, 200.0)); // SE
        assert_eq!(ring[3], geo_at(&port, 100.0, 200.0)); // SW
        assert_eq!(ring[4], ring[0]);
        assert!(port.is_empty());
    }

    #[test]
    fn circle_radius_comes_from_pixel_distance() {
        let mut port = port();
        let mut tool = DrawTool::new();
        tool.start_drawing(&mut port, AnnotationMode::Circle);

        tool.handle_event(&mut port, &PointerEvent::click(400.0, 300.0));
        tool.handle_event(&mut port, &PointerEvent::moved(430.0, 340.0));
        let feature = tool
            .handle_event(&mut port, &PointerEvent::click(430.0, 340.0))
            .expect("feature");

        let Geometry::Polygon(rings) = &feature.geometry else {
            panic!("expected polygon");
        };
        let ring = &rings[0];
        assert!(ring.len() > 3);
        assert_eq!(ring.first(), ring.last());

        // Pixel radius 50 at 0.1 deg/px puts each vertex 5 degrees from
        // the center in the planar mapping.
        let center = geo_at(&port, 400.0, 300.0);
        for vertex in &ring[..ring.len() - 1] {
            let dx = vertex.lon_deg - center.lon_deg;
            let dy = vertex.lat_deg - center.lat_deg;
            assert!(((dx * dx + dy * dy).sqrt() - 5.0).abs() < 1e-9);
        }
        assert!(port.is_empty());
    }

    #[test]
    fn move_after_finalize_is_a_no_op() {
        let mut port = port();
        let mut tool = DrawTool::new();
        tool.start_drawing(&mut port, AnnotationMode::Point);
        tool.handle_event(&mut port, &PointerEvent::click(10.0, 20.0));

        assert!(
            tool.handle_event(&mut port, &PointerEvent::moved(30.0, 30.0))
                .is_none()
        );
        assert!(!tool.is_drawing());
    }

    #[test]
    fn unsupported_mode_is_rejected_without_state_change() {
        let mut port = port();
        let mut tool = DrawTool::with_modes(&[AnnotationMode::Point]);

        assert!(!tool.start_drawing(&mut port, AnnotationMode::LineString));
        assert!(!tool.is_drawing());
        assert!(tool.start_drawing(&mut port, AnnotationMode::Point));
    }

    #[test]
    fn starting_a_new_session_tears_down_temporaries() {
        let mut port = port();
        let mut tool = DrawTool::new();
        tool.start_drawing(&mut port, AnnotationMode::LineString);
        tool.handle_event(&mut port, &PointerEvent::click(10.0, 10.0));
        tool.handle_event(&mut port, &PointerEvent::moved(50.0, 50.0));
        assert!(port.len() > 0, "anchor and preview primitives expected");

        assert!(tool.start_drawing(&mut port, AnnotationMode::Point));
        assert!(port.is_empty());
        assert!(tool.session().expect("session").committed.is_empty());
    }

    #[test]
    fn arrow_feature_carries_widened_stroke() {
        let mut port = port();
        let mut tool = DrawTool::new();
        tool.set_style(StyleSpec {
            stroke_width: Some(1.0),
            ..StyleSpec::default()
        });
        tool.start_drawing(&mut port, AnnotationMode::Arrow);

        tool.handle_event(&mut port, &PointerEvent::click(10.0, 10.0));
        tool.handle_event(&mut port, &PointerEvent::click(60.0, 60.0));
        let feature = tool
            .handle_event(&mut port, &PointerEvent::double_click(60.0, 60.0))
            .expect("feature");
        assert_eq!(feature.style.stroke_width, Some(5.0));
        assert!(matches!(feature.geometry, Geometry::LineString(_)));
    }
}
