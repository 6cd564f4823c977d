//! Counters collected over one run.

use crate::image::Conversion;
use crate::log;
use crate::utils::plural_count;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Images that went through the steps, successfully or not.
    pub images: usize,
    /// Targets dropped by the path filter.
    pub ignored: usize,
    /// Originals replaced by a smaller re-encoding.
    pub replaced: usize,
    /// Files written to the generated tree.
    pub written: usize,
    /// Files that already existed.
    pub cached: usize,
    /// Images with at least one failed step, or missing altogether.
    pub failed: usize,
}

impl RunReport {
    pub fn record(&mut self, conversion: &Conversion) {
        if conversion.is_converted() {
            self.written += 1;
        } else {
            self.cached += 1;
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![
            plural_count(self.images, "image"),
            format!("{} written", plural_count(self.written, "file")),
            format!("{} cached", self.cached),
        ];
        if self.replaced > 0 {
            parts.push(format!("{} replaced", self.replaced));
        }
        if self.ignored > 0 {
            parts.push(format!("{} ignored", self.ignored));
        }
        parts.join(", ")
    }

    pub fn print(&self) {
        log!("done"; "{}", self.summary());
        if self.has_failures() {
            log!("failed"; "{}", plural_count(self.failed, "image"));
        }
    }
}
