//! Levels command.
//!
//! Prints the CEFR threshold table and, when given an XP amount, where
//! that amount lands.

use serde::Serialize;

use crate::core::{level_for_xp, progress_toward_next, CefrLevel, LevelProgress};

/// Options for the levels command.
#[derive(Debug, Clone, Default)]
pub struct LevelsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// One row of the threshold table.
#[derive(Debug, Clone, Serialize)]
pub struct LevelRow {
    /// The CEFR level.
    pub level: CefrLevel,
    /// XP required to place at this level.
    pub xp_threshold: u64,
}

/// Output format for the levels command.
#[derive(Debug, Clone, Serialize)]
pub struct LevelsOutput {
    /// The full threshold table.
    pub thresholds: Vec<LevelRow>,
    /// Placement for the queried XP amount, if one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<LevelProgress>,
}

/// The levels command implementation.
#[derive(Debug, Default)]
pub struct LevelsCommand;

impl LevelsCommand {
    /// Create a new levels command.
    pub fn new() -> Self {
        Self
    }

    /// Build the threshold table, placing `xp` when given.
    pub fn run(&self, xp: Option<u64>, _options: &LevelsOptions) -> LevelsOutput {
        let thresholds = CefrLevel::ALL
            .iter()
            .map(|&level| LevelRow {
                level,
                xp_threshold: level.xp_threshold(),
            })
            .collect();

        let placement = xp.map(|xp| progress_toward_next(level_for_xp(xp), xp));

        LevelsOutput {
            thresholds,
            placement,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &LevelsOutput, options: &LevelsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &LevelsOutput) -> String {
        let mut text = String::from("Level thresholds:\n");
        for row in &output.thresholds {
            text.push_str(&format!("  {}: {} XP\n", row.level, row.xp_threshold));
        }
        if let Some(placement) = &output.placement {
            text.push_str(&format!("Placement: {}", placement.current));
            match placement.next {
                Some(next) => text.push_str(&format!(
                    " ({}% toward {}, {} XP to go)\n",
                    placement.percent, next, placement.xp_to_next
                )),
                None => text.push_str(" (top level)\n"),
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_all_levels() {
        let output = LevelsCommand::new().run(None, &LevelsOptions::default());
        assert_eq!(output.thresholds.len(), 6);
        assert_eq!(output.thresholds[0].level, CefrLevel::A1);
        assert_eq!(output.thresholds[0].xp_threshold, 0);
        assert_eq!(output.thresholds[5].level, CefrLevel::C2);
        assert_eq!(output.thresholds[5].xp_threshold, 1500);
        assert!(output.placement.is_none());
    }

    #[test]
    fn test_placement() {
        let output = LevelsCommand::new().run(Some(350), &LevelsOptions::default());
        let placement = output.placement.unwrap();
        assert_eq!(placement.current, CefrLevel::B1);
        assert_eq!(placement.next, Some(CefrLevel::B2));
    }

    #[test]
    fn test_placement_at_top() {
        let output = LevelsCommand::new().run(Some(9999), &LevelsOptions::default());
        let placement = output.placement.unwrap();
        assert_eq!(placement.current, CefrLevel::C2);
        assert!(placement.next.is_none());
    }

    #[test]
    fn test_format_human() {
        let cmd = LevelsCommand::new();
        let output = cmd.run(Some(350), &LevelsOptions::default());
        let formatted = cmd.format_output(&output, &LevelsOptions::default());

        assert!(formatted.contains("B1: 300 XP"));
        assert!(formatted.contains("Placement: B1"));
    }
}
