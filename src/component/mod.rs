//! Component tree consumed by the formula executor.
//!
//! The tree is built by the caller and is read-only here. Report trees go
//! PROJECT → MODULE → DIRECTORY → FILE; portfolio trees go VIEW → SUBVIEW →
//! PROJECT_VIEW. FILE and PROJECT_VIEW are the leaves.

mod depth_limit;

pub use depth_limit::CrawlerDepthLimit;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    Project,
    Module,
    Directory,
    File,
    View,
    Subview,
    ProjectView,
}

impl ComponentType {
    pub fn is_report_type(self) -> bool {
        matches!(
            self,
            Self::Project | Self::Module | Self::Directory | Self::File
        )
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, Self::File | Self::ProjectView)
    }

    fn depth(self) -> u8 {
        match self {
            Self::Project | Self::View => 0,
            Self::Module | Self::Subview => 1,
            Self::Directory | Self::ProjectView => 2,
            Self::File => 3,
        }
    }

    /// True when both types belong to the same tree family and `self` sits
    /// strictly below `other`.
    pub fn is_deeper_than(self, other: ComponentType) -> bool {
        self.is_report_type() == other.is_report_type() && self.depth() > other.depth()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Project => "PROJECT",
            Self::Module => "MODULE",
            Self::Directory => "DIRECTORY",
            Self::File => "FILE",
            Self::View => "VIEW",
            Self::Subview => "SUBVIEW",
            Self::ProjectView => "PROJECT_VIEW",
        };
        f.write_str(name)
    }
}

/// Attributes only FILE components carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttributes {
    #[serde(default)]
    pub unit_test: bool,
    #[serde(default)]
    pub language_key: Option<String>,
    /// Number of lines in the file
    #[serde(default)]
    pub lines: u32,
}

impl FileAttributes {
    pub fn new(unit_test: bool, language_key: Option<String>, lines: u32) -> Self {
        Self {
            unit_test,
            language_key,
            lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    key: String,
    uuid: String,
    #[serde(rename = "type")]
    component_type: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_attributes: Option<FileAttributes>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Component>,
}

impl Component {
    pub fn builder(component_type: ComponentType, key: impl Into<String>) -> ComponentBuilder {
        ComponentBuilder::new(component_type, key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn file_attributes(&self) -> Option<&FileAttributes> {
        self.file_attributes.as_ref()
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.component_type.is_leaf()
    }

    /// True only for FILE components flagged as unit test code.
    pub fn is_unit_test(&self) -> bool {
        self.component_type == ComponentType::File
            && self.file_attributes.as_ref().is_some_and(|a| a.unit_test)
    }
}

pub struct ComponentBuilder {
    key: String,
    uuid: Option<String>,
    component_type: ComponentType,
    file_attributes: Option<FileAttributes>,
    children: Vec<Component>,
}

impl ComponentBuilder {
    fn new(component_type: ComponentType, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            uuid: None,
            component_type,
            file_attributes: None,
            children: Vec::new(),
        }
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn file_attributes(mut self, attributes: FileAttributes) -> Self {
        self.file_attributes = Some(attributes);
        self
    }

    pub fn unit_test(self, unit_test: bool) -> Self {
        let lines = self.file_attributes.as_ref().map_or(0, |a| a.lines);
        self.file_attributes(FileAttributes::new(unit_test, None, lines))
    }

    pub fn child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Component>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn build(self) -> Component {
        Component {
            uuid: self.uuid.unwrap_or_else(|| format!("uuid_{}", self.key)),
            key: self.key,
            component_type: self.component_type,
            file_attributes: self.file_attributes,
            children: self.children,
        }
    }
}
