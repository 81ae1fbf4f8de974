//! Visualization utilities for neural_replanning
//!
//! Plots the XY projection of configuration paths and spherical obstacles
//! using gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{ConfigPath, Configuration, PlanningError, PlanningResult};
use crate::mapping::sphere_world::SphereObstacle;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const GRAY: &str = "#808080";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const PATH: &str = RED;
    pub const APPROXIMATE: &str = GRAY;
}

/// Segments used to draw an obstacle outline
const CIRCLE_SEGMENTS: usize = 48;

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    title: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            x_range: None,
            y_range: None,
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Plot the XY projection of a path with its waypoints
    pub fn plot_path(&mut self, path: &ConfigPath, style: &PathStyle) -> &mut Self {
        let x: Vec<f64> = path.states.iter().map(|s| s.position.x).collect();
        let y: Vec<f64> = path.states.iter().map(|s| s.position.y).collect();

        let axes = self.figure.axes2d();
        axes.lines(&x, &y, &[
            Caption(&style.caption),
            Color(&style.color),
            LineWidth(style.line_width),
        ]);
        axes.points(&x, &y, &[Color(&style.color), PointSymbol('O'), PointSize(0.6)]);
        self
    }

    /// Plot the XY cross-section of each obstacle through its center
    pub fn plot_spheres(&mut self, obstacles: &[SphereObstacle]) -> &mut Self {
        for (i, obs) in obstacles.iter().enumerate() {
            let (x, y) = circle_outline(obs.center[0], obs.center[1], obs.radius);
            let caption = if i == 0 { "Obstacles" } else { "" };
            self.figure.axes2d().lines(&x, &y, &[
                Caption(caption),
                Color(colors::OBSTACLE),
                LineWidth(1.0),
            ]);
        }
        self
    }

    fn plot_marker(&mut self, state: &Configuration, color: &str, caption: &str) -> &mut Self {
        self.figure.axes2d().points(&[state.position.x], &[state.position.y], &[
            Caption(caption),
            Color(color),
            PointSymbol('O'),
            PointSize(1.5),
        ]);
        self
    }

    pub fn plot_start(&mut self, state: &Configuration) -> &mut Self {
        self.plot_marker(state, colors::START, "Start")
    }

    pub fn plot_goal(&mut self, state: &Configuration) -> &mut Self {
        self.plot_marker(state, colors::GOAL, "Goal")
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> PlanningResult<()> {
        self.apply_settings();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| PlanningError::Visualization(e.to_string()))
    }

    /// Save plot to PNG file
    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> PlanningResult<()> {
        self.apply_settings();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| PlanningError::Visualization(e.to_string()))
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label("X", &[]);
        axes.set_y_label("Y", &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        axes.set_aspect_ratio(AutoOption::Fix(1.0));
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

fn circle_outline(cx: f64, cy: f64, radius: f64) -> (Vec<f64>, Vec<f64>) {
    (0..=CIRCLE_SEGMENTS)
        .map(|k| {
            let theta = 2.0 * std::f64::consts::PI * k as f64 / CIRCLE_SEGMENTS as f64;
            (cx + radius * theta.cos(), cy + radius * theta.sin())
        })
        .unzip()
}

/// Quick plot of a planned path over a sphere scene
pub fn quick_plot_path(
    path: &ConfigPath,
    obstacles: &[SphereObstacle],
    approximate: bool,
    title: &str,
) -> Visualizer {
    let mut vis = Visualizer::new();
    vis.set_title(title);
    vis.plot_spheres(obstacles);

    let style = if approximate {
        PathStyle::new(colors::APPROXIMATE, "Approximate path")
    } else {
        PathStyle::default()
    };
    vis.plot_path(path, &style);
    if let (Some(start), Some(goal)) = (path.first(), path.last()) {
        vis.plot_start(start);
        vis.plot_goal(goal);
    }
    vis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_style() {
        let style = PathStyle::new(colors::RED, "Test Path").with_line_width(3.0);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.color, colors::RED);
        assert_eq!(PathStyle::default().caption, "Path");
    }

    #[test]
    fn test_plot_ranges() {
        let mut vis = Visualizer::new();
        vis.set_x_range(-2.0, 3.0).set_y_range(-1.0, 4.0);
        assert_eq!(vis.x_range, Some((-2.0, 3.0)));
        assert_eq!(vis.y_range, Some((-1.0, 4.0)));
    }

    #[test]
    fn test_circle_outline_is_closed() {
        let (x, y) = circle_outline(1.0, -2.0, 0.5);
        assert_eq!(x.len(), CIRCLE_SEGMENTS + 1);
        assert!((x[0] - x[CIRCLE_SEGMENTS]).abs() < 1e-12);
        assert!((y[0] - y[CIRCLE_SEGMENTS]).abs() < 1e-12);
        assert!(x.iter().zip(y.iter()).all(|(a, b)| {
            (((a - 1.0).powi(2) + (b + 2.0).powi(2)).sqrt() - 0.5).abs() < 1e-12
        }));
    }
}
