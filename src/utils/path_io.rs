//! Text formats for obstacle encodings and planned paths
//!
//! Obstacle encodings are stored one value per line. Paths are stored as a
//! matrix with one configuration per row, `x y z qx qy qz qw`.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::common::{ConfigPath, Configuration, ObstacleEncoding, PlanningError, PlanningResult};

/// Parse an obstacle encoding, one value per line; blank lines are skipped
pub fn parse_obstacle_encoding(text: &str) -> PlanningResult<ObstacleEncoding> {
    let mut values = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = line
            .parse::<f64>()
            .map_err(|e| PlanningError::Parse(format!("line {}: {:?}: {}", line_no + 1, line, e)))?;
        values.push(value);
    }
    Ok(ObstacleEncoding::new(values))
}

pub fn load_obstacle_encoding<P: AsRef<Path>>(path: P) -> PlanningResult<ObstacleEncoding> {
    parse_obstacle_encoding(&fs::read_to_string(path)?)
}

/// Write `path` as a whitespace-separated matrix
pub fn write_path_matrix<W: Write>(writer: &mut W, path: &ConfigPath) -> PlanningResult<()> {
    for state in &path.states {
        let row: Vec<String> = state.to_array().iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", row.join(" "))?;
    }
    Ok(())
}

pub fn save_path_matrix<P: AsRef<Path>>(file: P, path: &ConfigPath) -> PlanningResult<()> {
    let mut out = fs::File::create(file)?;
    write_path_matrix(&mut out, path)
}

/// Parse a path matrix written by `write_path_matrix`
pub fn parse_path_matrix(text: &str) -> PlanningResult<ConfigPath> {
    let mut path = ConfigPath::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|v| v.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| PlanningError::Parse(format!("line {}: {}", line_no + 1, e)))?;
        path.push(Configuration::from_slice(&row)?);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_obstacle_encoding() {
        let enc = parse_obstacle_encoding("0.5\n-1.25\n\n3e-2\n").unwrap();
        assert_eq!(enc.as_slice(), &[0.5, -1.25, 0.03]);
    }

    #[test]
    fn test_parse_obstacle_encoding_reports_line() {
        let err = parse_obstacle_encoding("1.0\nabc\n").unwrap_err();
        match err {
            PlanningError::Parse(msg) => assert!(msg.starts_with("line 2")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_path_matrix_layout() {
        let path = ConfigPath::from_states(vec![
            Configuration::new(209.881, -84.3507, 49.0, 0.0, 0.0, 0.5425, 0.8401),
            Configuration::at_position(262.95, 75.05, 46.19),
        ]);
        let mut buffer = Vec::new();
        write_path_matrix(&mut buffer, &path).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().next(), Some("209.881 -84.3507 49 0 0 0.5425 0.8401"));
        assert_eq!(parse_path_matrix(&text).unwrap(), path);
    }

    #[test]
    fn test_parse_path_matrix_rejects_short_rows() {
        assert!(matches!(
            parse_path_matrix("1 2 3\n"),
            Err(PlanningError::DimensionMismatch { expected: 7, actual: 3 })
        ));
    }
}
