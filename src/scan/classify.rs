//! Icon classification heuristics.
//!
//! A node is "icon-like" when any of these holds, checked in order:
//!
//! 1. its name follows an icon naming convention (size and type ignored),
//! 2. it is a small, squarish component, component set or instance,
//! 3. it is a small, squarish instance of a remote library component,
//! 4. it is a small, squarish frame or group holding 1 to 20 children that
//!    are all vector-like.

use regex::{RegexSet, RegexSetBuilder};

use crate::error::Result;
use crate::model::{Node, NodeType};

use super::options::{ClassifierRules, ScanOptions, SizeGate};
use super::source::ComponentSource;

/// Built-in icon naming conventions, matched case-insensitively.
pub const ICON_NAME_PATTERNS: &[&str] = &["icon", "ico-", "-icon", "^ic_", "^icon_", r"\.icon"];

/// Largest child count of a vector-only icon container.
pub const MAX_VECTOR_CHILDREN: usize = 20;

/// Which rule classified a node as an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchReason {
    /// Name follows an icon naming convention
    NamePattern,
    /// Small component, component set or instance
    SmallComponent,
    /// Small instance of a remote library component
    RemoteInstance,
    /// Small frame/group of vector-like children
    VectorContainer,
}

impl MatchReason {
    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MatchReason::NamePattern => "name",
            MatchReason::SmallComponent => "component",
            MatchReason::RemoteInstance => "remote instance",
            MatchReason::VectorContainer => "vector group",
        }
    }
}

/// Decides whether a single node is an icon. Holds no traversal state.
#[derive(Debug, Clone)]
pub struct IconClassifier {
    patterns: RegexSet,
    rules: ClassifierRules,
    gate: SizeGate,
}

impl IconClassifier {
    /// Build a classifier from scan options.
    ///
    /// Fails if one of the extra name patterns is not a valid regex.
    pub fn new(options: &ScanOptions) -> Result<Self> {
        let patterns = ICON_NAME_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(options.extra_name_patterns.iter().cloned());
        let patterns = RegexSetBuilder::new(patterns)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            patterns,
            rules: options.rules,
            gate: options.size_gate,
        })
    }

    /// Check a name against the icon naming conventions.
    pub fn matches_name(&self, name: &str) -> bool {
        self.patterns.is_match(name)
    }

    /// Check the size/aspect-ratio gate for a node.
    pub fn is_small_and_squarish(&self, node: &Node) -> bool {
        self.gate.admits(node.width, node.height)
    }

    /// Check whether the node is an icon.
    pub fn classify<S>(&self, node: &Node, source: &S) -> bool
    where
        S: ComponentSource + ?Sized,
    {
        self.decide(node, source).is_some()
    }

    /// Classify a node and report the first rule that matched.
    pub fn decide<S>(&self, node: &Node, source: &S) -> Option<MatchReason>
    where
        S: ComponentSource + ?Sized,
    {
        if self.rules.name_patterns && self.matches_name(&node.name) {
            return Some(MatchReason::NamePattern);
        }

        let small = self.is_small_and_squarish(node);

        if self.rules.small_components && small && node.node_type.is_component_like() {
            return Some(MatchReason::SmallComponent);
        }

        // Only small instances can pass, so skip the lookup otherwise.
        if self.rules.remote_instances
            && small
            && node.node_type == NodeType::Instance
            && self.is_remote_instance(node, source)
        {
            return Some(MatchReason::RemoteInstance);
        }

        if self.rules.vector_containers
            && small
            && node.node_type.is_container()
            && is_vector_only(&node.children)
        {
            return Some(MatchReason::VectorContainer);
        }

        None
    }

    fn is_remote_instance<S>(&self, node: &Node, source: &S) -> bool
    where
        S: ComponentSource + ?Sized,
    {
        match source.main_component(node) {
            Ok(main) => main.is_some_and(|m| m.remote),
            Err(e) => {
                log::debug!("Remote check skipped for {}: {}", node.id, e);
                false
            }
        }
    }
}

fn is_vector_only(children: &[Node]) -> bool {
    (1..=MAX_VECTOR_CHILDREN).contains(&children.len())
        && children.iter().all(|c| c.node_type.is_vector_like())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::MainComponent;

    /// Source that knows nothing; instances have no main component.
    struct EmptySource;

    impl ComponentSource for EmptySource {
        fn main_component(&self, _instance: &Node) -> Result<Option<MainComponent>> {
            Ok(None)
        }
    }

    struct RemoteSource;

    impl ComponentSource for RemoteSource {
        fn main_component(&self, _instance: &Node) -> Result<Option<MainComponent>> {
            Ok(Some(MainComponent::remote("9:9", "home", "k-home")))
        }
    }

    struct BrokenSource;

    impl ComponentSource for BrokenSource {
        fn main_component(&self, _instance: &Node) -> Result<Option<MainComponent>> {
            Err(Error::Lookup("offline".into()))
        }
    }

    fn classifier() -> IconClassifier {
        IconClassifier::new(&ScanOptions::default()).unwrap()
    }

    fn vector(id: &str) -> Node {
        Node::new(id, "Vector", NodeType::Vector, 10.0, 10.0)
    }

    #[test]
    fn test_name_patterns() {
        let c = classifier();
        for name in [
            "icon-home",
            "HomeIcon",
            "ico-arrow",
            "arrow-icon",
            "ic_close",
            "IC_Close",
            "icon_menu",
            "assets.icon.star",
        ] {
            assert!(c.matches_name(name), "{} should match", name);
        }
        for name in ["Button", "Card / Header", "ic", "logo_ic_mark"] {
            assert!(!c.matches_name(name), "{} should not match", name);
        }
    }

    #[test]
    fn test_name_wins_over_size() {
        let c = classifier();
        let node = Node::new("1:1", "icon-home", NodeType::Frame, 500.0, 500.0);
        assert_eq!(c.decide(&node, &EmptySource), Some(MatchReason::NamePattern));
    }

    #[test]
    fn test_small_component_boundaries() {
        let c = classifier();
        let ok = Node::new("1:1", "Chevron", NodeType::Component, 200.0, 100.0);
        assert_eq!(c.decide(&ok, &EmptySource), Some(MatchReason::SmallComponent));

        let too_wide = Node::new("1:2", "Chevron", NodeType::Component, 201.0, 150.0);
        assert!(!c.classify(&too_wide, &EmptySource));

        let too_flat = Node::new("1:3", "Chevron", NodeType::Component, 100.5, 50.0);
        assert!(!c.classify(&too_flat, &EmptySource));

        let set = Node::new("1:4", "Arrows", NodeType::ComponentSet, 48.0, 24.0);
        assert!(c.classify(&set, &EmptySource));
    }

    #[test]
    fn test_zero_height_does_not_panic() {
        let c = classifier();
        let node = Node::new("1:1", "Divider", NodeType::Component, 24.0, 0.0);
        assert!(!c.classify(&node, &EmptySource));
    }

    #[test]
    fn test_remote_instance_rule() {
        let c = IconClassifier::new(&ScanOptions::default().with_rules(ClassifierRules {
            small_components: false,
            ..ClassifierRules::all()
        }))
        .unwrap();
        let node = Node::new("1:1", "home", NodeType::Instance, 24.0, 24.0);

        assert_eq!(c.decide(&node, &RemoteSource), Some(MatchReason::RemoteInstance));
        assert!(!c.classify(&node, &EmptySource));
        // lookup failure is absorbed
        assert!(!c.classify(&node, &BrokenSource));
    }

    #[test]
    fn test_vector_container() {
        let c = classifier();
        let frame = Node::new("1:1", "Container", NodeType::Frame, 40.0, 40.0)
            .with_child(vector("1:2"))
            .with_child(vector("1:3"))
            .with_child(vector("1:4"));
        assert_eq!(c.decide(&frame, &EmptySource), Some(MatchReason::VectorContainer));

        let empty = Node::new("2:1", "Container", NodeType::Group, 40.0, 40.0);
        assert!(!c.classify(&empty, &EmptySource));

        let with_text = Node::new("3:1", "Container", NodeType::Frame, 40.0, 40.0)
            .with_child(vector("3:2"))
            .with_child(Node::new("3:3", "Label", NodeType::Text, 20.0, 10.0));
        assert!(!c.classify(&with_text, &EmptySource));

        let mut crowded = Node::new("4:1", "Container", NodeType::Frame, 40.0, 40.0);
        for i in 0..21 {
            crowded.children.push(vector(&format!("4:{}", i + 2)));
        }
        assert!(!c.classify(&crowded, &EmptySource));
        crowded.children.pop();
        assert!(c.classify(&crowded, &EmptySource));
    }

    #[test]
    fn test_large_frame_is_not_icon() {
        let c = classifier();
        let frame = Node::new("1:1", "Hero", NodeType::Frame, 1440.0, 900.0).with_child(vector("1:2"));
        assert!(!c.classify(&frame, &EmptySource));
    }

    #[test]
    fn test_extra_patterns_and_invalid_pattern() {
        let c = IconClassifier::new(&ScanOptions::default().with_name_pattern("^glyph")).unwrap();
        assert!(c.matches_name("Glyph/Add"));

        let err = IconClassifier::new(&ScanOptions::default().with_name_pattern("(")).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }

    #[test]
    fn test_rules_can_be_disabled() {
        let c = IconClassifier::new(&ScanOptions::default().with_rules(ClassifierRules::names_only()))
            .unwrap();
        let node = Node::new("1:1", "Chevron", NodeType::Component, 24.0, 24.0);
        assert!(!c.classify(&node, &EmptySource));
    }
}
