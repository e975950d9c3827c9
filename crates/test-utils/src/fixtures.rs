//! Common test fixtures for heatmap tests.
//!
//! Configurations are kept as JSON text so tests exercise the same parsing
//! path a configuration file goes through.

/// Configuration fixtures.
pub mod config {
    /// 200x200 surface, radius 40, everything else default.
    pub const SCENARIO_200: &str = r#"{ "width": 200, "height": 200, "radius": 40 }"#;

    /// Small surface for fast tests.
    pub const SMALL_64: &str = r#"{ "width": 64, "height": 64, "radius": 8 }"#;

    /// Legend enabled and the maximum reset on clear.
    pub const WITH_LEGEND: &str = r#"{
        "width": 256,
        "height": 128,
        "radius": 20,
        "opacity": 80,
        "legend": { "title": "Clicks" },
        "max_on_clear": "reset"
    }"#;

    /// Two-stop custom gradient, hidden display.
    pub const CUSTOM_GRADIENT: &str = r##"{
        "width": 100,
        "height": 100,
        "radius": 15,
        "visible": false,
        "gradient": [
            { "stop": 0.2, "color": "#0000ff" },
            { "stop": 1.0, "color": "rgba(255, 0, 0, 1)" }
        ]
    }"##;

    /// Gradient stop outside `[0, 1]`.
    pub const BAD_GRADIENT: &str = r#"{
        "width": 100,
        "height": 100,
        "gradient": [{ "stop": 1.5, "color": "red" }]
    }"#;
}

/// Dataset fixtures in the persisted interchange format.
pub mod dataset {
    /// Three points, declared max equal to the largest count.
    pub const THREE_POINTS: &str = r#"{
        "max": 4,
        "data": [
            { "x": 20, "y": 30, "count": 4 },
            { "x": 60, "y": 30, "count": 1 },
            { "x": 40, "y": 70, "count": 2 }
        ]
    }"#;

    /// Declared max below the largest count.
    pub const UNDERSTATED_MAX: &str = r#"{
        "max": 2,
        "data": [{ "x": 10, "y": 10, "count": 9 }]
    }"#;

    /// No points at all.
    pub const EMPTY: &str = r#"{ "max": 1, "data": [] }"#;

    /// Negative count.
    pub const NEGATIVE_COUNT: &str = r#"{
        "max": 3,
        "data": [{ "x": 1, "y": 1, "count": -3 }]
    }"#;
}
