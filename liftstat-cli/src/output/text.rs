//! Text output formatting with colors.

use liftstat_core::{Counts, ResortDescriptor, StatsRecord};
use liftstat_fetch::{Resolution, ResolutionPlan};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Width of the resort name column.
const NAME_WIDTH: usize = 22;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats one resolved resort on a single line.
    pub fn format_resolution(&self, resort: &ResortDescriptor, resolution: &Resolution) -> String {
        let name = self.bold(&format!("{:<NAME_WIDTH$}", resort.display_name()));
        match &resolution.outcome {
            Some(resolved) => format!(
                "{name} {}  {}",
                self.format_record(&resolved.record),
                self.dim(&format!("({})", resolved.strategy_id))
            ),
            None => format!("{name} {}", self.red("unavailable")),
        }
    }

    /// Formats the numbers of a record.
    pub fn format_record(&self, record: &StatsRecord) -> String {
        let mut parts = vec![
            format!("lifts {}", self.counts(record.lifts)),
            format!("trails {}", self.counts(record.trails)),
            format!("groomed {:>3}", record.groomed),
            format!("base {:>3}\"", record.base_depth),
        ];
        if let Some(acres) = record.acres {
            parts.push(format!("acres {acres}"));
        }
        if let Some(parks) = record.parks {
            parts.push(format!("parks {parks}"));
        }
        parts.join("  ")
    }

    /// Formats every strategy attempt of a resolution, one per line.
    pub fn format_attempts(&self, resolution: &Resolution) -> Vec<String> {
        resolution
            .attempts
            .iter()
            .map(|a| {
                let mark = if a.success {
                    self.green("ok")
                } else {
                    self.red("no data")
                };
                format!(
                    "  {} [{}] {mark} in {}ms",
                    a.strategy_id,
                    a.tier,
                    a.duration.as_millis()
                )
            })
            .collect()
    }

    /// Formats a resort and the steps its resolution would take.
    pub fn format_plan(&self, resort: &ResortDescriptor, plan: &ResolutionPlan) -> String {
        let name = self.bold(&format!("{:<NAME_WIDTH$}", resort.display_name()));
        let steps = if plan.is_empty() {
            self.yellow("no strategy")
        } else {
            plan.steps
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ")
        };
        format!("{name} {} {steps}", self.dim(&format!("{:<24}", resort.id)))
    }

    /// Header for the resort listing.
    pub fn format_resorts_header(&self) -> String {
        self.bold(&format!("{:<NAME_WIDTH$} {:<24} Strategies", "Resort", "Id"))
    }

    /// Summary line after a stats run.
    pub fn format_summary(&self, available: usize, total: usize) -> String {
        let text = format!("{available}/{total} resorts reporting");
        if available == 0 && total > 0 {
            self.red(&text)
        } else {
            self.dim(&text)
        }
    }

    // ------------------------------------------------------------------------
    // Styling
    // ------------------------------------------------------------------------

    fn counts(&self, counts: Counts) -> String {
        let text = format!("{:>7}", counts.to_string());
        if counts.open == 0 {
            self.yellow(&text)
        } else {
            self.green(&text)
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}
