use std::env;
use std::fs;
use std::path::PathBuf;

use annotations::AnnotationMode;
use draw::{DrawTool, PointerEvent};
use foundation::math::{GeoPos, Vec2};
use tracing::info;
use tracing_subscriber::EnvFilter;
use visualizer::{EntityVisualizer, MemoryRenderPort, PlanarPick};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "demo" => cmd_demo(args),
        "ingest" => cmd_ingest(args),
        _ => Err(usage()),
    }
}

fn demo_port() -> MemoryRenderPort {
    MemoryRenderPort::new(PlanarPick {
        viewport_px: Vec2::new(1280.0, 720.0),
        origin: GeoPos::new(-64.0, 36.0, 0.0),
        deg_per_px: 0.1,
    })
}

/// Runs a scripted drawing session per mode and prints each finished
/// feature as a single-feature GeoJSON collection.
fn cmd_demo(args: Vec<String>) -> Result<(), String> {
    if !args.is_empty() {
        return Err(usage());
    }

    let mut port = demo_port();
    let mut tool = DrawTool::new();

    let scripts: &[(AnnotationMode, &[PointerEvent])] = &[
        (
            AnnotationMode::Point,
            &[PointerEvent::click(640.0, 360.0)],
        ),
        (
            AnnotationMode::LineString,
            &[
                PointerEvent::click(100.0, 100.0),
                PointerEvent::moved(250.0, 180.0),
                PointerEvent::click(250.0, 180.0),
                PointerEvent::click(400.0, 120.0),
                PointerEvent::double_click(400.0, 120.0),
            ],
        ),
        (
            AnnotationMode::Polygon,
            &[
                PointerEvent::click(500.0, 400.0),
                PointerEvent::click(700.0, 400.0),
                PointerEvent::click(700.0, 600.0),
                PointerEvent::click(500.0, 600.0),
                PointerEvent::double_click(500.0, 600.0),
            ],
        ),
        (
            AnnotationMode::Rectangle,
            &[
                PointerEvent::click(800.0, 100.0),
                PointerEvent::moved(1000.0, 250.0),
                PointerEvent::click(1000.0, 250.0),
            ],
        ),
        (
            AnnotationMode::Circle,
            &[
                PointerEvent::click(640.0, 360.0),
                PointerEvent::moved(700.0, 360.0),
                PointerEvent::click(700.0, 360.0),
            ],
        ),
        (
            AnnotationMode::Arrow,
            &[
                PointerEvent::click(200.0, 500.0),
                PointerEvent::click(350.0, 450.0),
                PointerEvent::double_click(350.0, 450.0),
            ],
        ),
    ];

    let mut viz = EntityVisualizer::new();

    for (mode, events) in scripts {
        if !tool.start_drawing(&mut port, *mode) {
            return Err(format!("mode {} not supported", mode.as_str()));
        }
        let mut finished = None;
        for event in events.iter() {
            if let Some(feature) = tool.handle_event(&mut port, event) {
                finished = Some(feature);
            }
        }
        let feature = finished.ok_or_else(|| format!("{} script did not finalize", mode.as_str()))?;
        info!(mode = mode.as_str(), id = feature.id.as_str(), "finalized");

        let doc = feature.to_feature_collection();
        println!(
            "{}",
            serde_json::to_string_pretty(&doc).map_err(|e| format!("json: {e}"))?
        );

        let entities = annotations::geojson::entities_from_geojson_value(&doc)
            .map_err(|e| format!("re-ingest: {e}"))?;
        viz.add_or_update(&mut port, &entities);
    }

    eprintln!(
        "reconciled {} entities into {} primitives",
        viz.entities().len(),
        port.len()
    );
    Ok(())
}

/// Loads a GeoJSON FeatureCollection, reconciles it into the in-memory
/// renderer, and echoes the logical collection back as GeoJSON.
fn cmd_ingest(args: Vec<String>) -> Result<(), String> {
    // annotate ingest <input.geojson> [--out FILE]
    if args.is_empty() {
        return Err(usage());
    }

    let input = PathBuf::from(&args[0]);
    let mut out: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--out" => {
                i += 1;
                if i >= args.len() {
                    return Err("--out requires a path".to_string());
                }
                out = Some(PathBuf::from(&args[i]));
            }
            other => {
                return Err(format!("unknown arg: {other}\n\n{}", usage()));
            }
        }
        i += 1;
    }

    let text = fs::read_to_string(&input).map_err(|e| format!("read {input:?}: {e}"))?;
    let entities =
        annotations::geojson::entities_from_geojson_str(&text).map_err(|e| format!("parse: {e}"))?;

    let mut port = demo_port();
    let mut viz = EntityVisualizer::new();
    viz.set_entities(&mut port, &entities);

    eprintln!(
        "ingested {} entities ({} primitives)",
        viz.entities().len(),
        port.len()
    );

    let doc = annotations::geojson::entities_to_geojson_value(&viz.entities());
    let payload = serde_json::to_string_pretty(&doc).map_err(|e| format!("json: {e}"))?;
    match out {
        Some(path) => {
            fs::write(&path, payload).map_err(|e| format!("write {path:?}: {e}"))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{payload}"),
    }
    Ok(())
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "annotate".to_string());
    format!(
        "Usage:\n  {exe} demo\n  {exe} ingest <input.geojson> [--out FILE]\n\nNotes:\n- `demo` drives a scripted pointer session through every drawing mode and prints each finished feature.\n- `ingest` round-trips a FeatureCollection through the reconciliation engine; malformed features are skipped with a warning.\n- Set RUST_LOG (e.g. RUST_LOG=debug) to see session transitions.\n"
    )
}
