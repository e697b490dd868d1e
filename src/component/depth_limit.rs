use super::ComponentType;

/// Per-tree-family depth at which a crawl stops.
///
/// `LEAVES` is the depth of leaf components. Formulas that recompute from
/// leaves use `LEAVES.is_deeper_than(type)` to emit only above the leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlerDepthLimit {
    report: ComponentType,
    views: ComponentType,
}

impl CrawlerDepthLimit {
    pub const LEAVES: CrawlerDepthLimit = CrawlerDepthLimit {
        report: ComponentType::File,
        views: ComponentType::ProjectView,
    };

    fn limit_for(&self, component_type: ComponentType) -> ComponentType {
        if component_type.is_report_type() {
            self.report
        } else {
            self.views
        }
    }

    pub fn is_deeper_than(&self, component_type: ComponentType) -> bool {
        self.limit_for(component_type).is_deeper_than(component_type)
    }
}
