use anyhow::{Context, Result};
use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;
use std::path::Path;
use trip_map_core::render::{hex, RouteOverlay, StopMarker};
use trip_map_core::{Scene, ViewportState};

/// Convert a geo LineString to GeoJSON Value
fn line_to_geojson(line: &LineString<f64>) -> Value {
    Value::LineString(line.0.iter().map(|c| vec![c.x, c.y]).collect())
}

fn point_to_geojson(point: Point<f64>) -> Value {
    Value::Point(vec![point.x(), point.y()])
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Create a GeoJSON Feature for one day's route line
fn overlay_to_feature(overlay: &RouteOverlay) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("feature_type".to_string(), json!("route"));
    properties.insert("day".to_string(), json!(overlay.day.get()));
    properties.insert("provenance".to_string(), json!(overlay.provenance.to_string()));
    properties.insert("active".to_string(), json!(overlay.active));
    properties.insert("color".to_string(), json!(hex(overlay.style.color)));
    properties.insert("weight".to_string(), json!(overlay.style.weight));
    properties.insert("opacity".to_string(), json!(overlay.style.opacity));
    properties.insert("arrow_repeat_px".to_string(), json!(overlay.arrows.repeat_px));

    feature(line_to_geojson(&overlay.path), properties)
}

/// Create a GeoJSON Feature for a numbered stop marker
fn marker_to_feature(marker: &StopMarker) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("feature_type".to_string(), json!("stop"));
    properties.insert("day".to_string(), json!(marker.popup.day.get()));
    properties.insert("number".to_string(), json!(marker.number));
    properties.insert("label".to_string(), json!(marker.popup.title));
    properties.insert("emphasized".to_string(), json!(marker.emphasized));
    properties.insert("color".to_string(), json!(hex(marker.style.fill)));
    properties.insert("popup_open".to_string(), json!(marker.popup_open));

    if let Some(place_id) = &marker.place_id {
        properties.insert("place_id".to_string(), json!(place_id.to_string()));
    }

    if let Some(summary) = &marker.popup.summary {
        properties.insert("summary".to_string(), json!(summary.to_string()));
        properties.insert("eta_minutes".to_string(), json!(summary.eta_minutes));
        properties.insert("distance_km".to_string(), json!(summary.distance_km));
    }

    feature(point_to_geojson(marker.position), properties)
}

fn camera_member(camera: &ViewportState) -> serde_json::Value {
    json!({
        "center": [camera.center.x(), camera.center.y()],
        "zoom": camera.zoom,
        "active_day": camera.active_day.map(|d| d.get()),
    })
}

/// Routes first so markers draw on top
pub fn scene_to_feature_collection(
    scene: &Scene,
    camera: Option<&ViewportState>,
) -> FeatureCollection {
    let features: Vec<Feature> = scene
        .overlays
        .iter()
        .map(overlay_to_feature)
        .chain(scene.markers.iter().map(marker_to_feature))
        .collect();

    let foreign_members = camera.map(|camera| {
        let mut members = JsonObject::new();
        members.insert("camera".to_string(), camera_member(camera));
        members
    });

    FeatureCollection {
        bbox: None,
        features,
        foreign_members,
    }
}

/// Write a rendered scene to a GeoJSON file
pub fn write_scene_geojson(
    scene: &Scene,
    camera: Option<&ViewportState>,
    output_path: &Path,
) -> Result<()> {
    log::info!(
        "Writing {} routes and {} stops to {}",
        scene.overlays.len(),
        scene.markers.len(),
        output_path.display()
    );

    let geojson = GeoJson::from(scene_to_feature_collection(scene, camera));
    let json_string = serde_json::to_string_pretty(&geojson)
        .context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(())
}
