use console::style;

use crate::slides::ParseOutcome;
use crate::types::Slide;

/// Human-readable terminal output
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn detail(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<12} {}", style(label).dim(), value);
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    pub fn slide(&self, slide: &Slide) {
        self.section(&format!("{}. {}", slide.id, slide.title));
        println!("{}", style(&slide.core_idea).italic());
        for argument in &slide.arguments {
            println!("  • {}", argument);
        }
    }

    /// Slides followed by a short provenance summary
    pub fn outcome(&self, outcome: &ParseOutcome) {
        for slide in &outcome.slides {
            self.slide(slide);
        }
        println!();

        let meta = &outcome.metadata;
        if meta.used_ai {
            self.success(&outcome.message);
        } else {
            self.warning(&outcome.message);
        }
        self.detail("method", format!("{:?}", meta.parse_method));
        self.detail("quality", format!("{:?}", meta.quality));
        self.detail("call", &meta.api_call_time);
        self.detail("elapsed", format!("{}ms", meta.elapsed_ms));
        if let Some(reason) = meta.fallback_reason {
            self.detail("fallback", reason);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
