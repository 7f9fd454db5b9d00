//! Layer resolution: maps source paths and included headers to layers.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// One of the architectural tiers a source file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Drivers, repositories and the hardware port.
    Infrastructure,
    /// Entities, value objects, domain events.
    Domain,
    /// Commands, queries and their services.
    Application,
    /// Composition root.
    Entry,
    /// Shared utilities every layer may use.
    Common,
    /// Path matched no layer; excluded from all rules.
    Unclassified,
}

impl Layer {
    /// Lowercase name used in messages and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::Domain => "domain",
            Self::Application => "application",
            Self::Entry => "entry",
            Self::Common => "common",
            Self::Unclassified => "unclassified",
        }
    }

    /// Layers this layer may include headers from, besides itself.
    #[must_use]
    pub const fn allowed_dependencies(self) -> &'static [Layer] {
        match self {
            Self::Infrastructure => &[Self::Domain, Self::Common],
            Self::Domain => &[Self::Common],
            Self::Application => &[Self::Domain, Self::Common],
            Self::Entry => &[Self::Application, Self::Domain, Self::Common],
            Self::Common | Self::Unclassified => &[],
        }
    }

    /// Whether a file of this layer may include a header of `other`.
    #[must_use]
    pub fn can_depend_on(self, other: Layer) -> bool {
        self == other || self.allowed_dependencies().contains(&other)
    }

    /// Returns false for [`Layer::Unclassified`].
    #[must_use]
    pub const fn is_classified(self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Path fragments per layer. Each fragment matches whole path segments.
const PATH_FRAGMENTS: &[(&str, Layer)] = &[
    ("include/infrastructure", Layer::Infrastructure),
    ("src/infrastructure", Layer::Infrastructure),
    ("include/hal", Layer::Infrastructure),
    ("src/hal", Layer::Infrastructure),
    ("port", Layer::Infrastructure),
    ("include/domain", Layer::Domain),
    ("src/domain", Layer::Domain),
    ("include/application", Layer::Application),
    ("src/application", Layer::Application),
    ("include/entry", Layer::Entry),
    ("src/entry", Layer::Entry),
    ("include/common", Layer::Common),
    ("src/common", Layer::Common),
];

/// Header file-name prefixes (or exact names) per layer.
const HEADER_NAMES: &[(&str, Layer)] = &[
    ("infrastructure_", Layer::Infrastructure),
    ("hal_", Layer::Infrastructure),
    ("domain_", Layer::Domain),
    ("app_", Layer::Application),
    ("entry_", Layer::Entry),
    ("types.h", Layer::Common),
    ("error_codes.h", Layer::Common),
    ("critical.h", Layer::Common),
    ("mem_pool.h", Layer::Common),
    ("ring_buffer.h", Layer::Common),
    ("trace.h", Layer::Common),
    ("isr_safety.h", Layer::Common),
];

/// Segment name of the hardware port directory.
pub const PORT_SEGMENT: &str = "port";

/// Resolves file paths to layers.
///
/// Resolution picks the most specific fragment (the one spanning the most
/// path segments), so overlapping fragments resolve deterministically.
pub struct LayerResolver {
    /// (fragment segments, layer) sorted by segment count descending.
    map: Vec<(Vec<&'static str>, Layer)>,
}

impl Default for LayerResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerResolver {
    /// Builds the resolver from the built-in fragment table.
    #[must_use]
    pub fn new() -> Self {
        let mut map: Vec<(Vec<&'static str>, Layer)> = PATH_FRAGMENTS
            .iter()
            .map(|(fragment, layer)| (fragment.split('/').collect(), *layer))
            .collect();
        // Stable: equal-length fragments keep table order.
        map.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { map }
    }

    /// Which layer does this (root-relative) path belong to?
    #[must_use]
    pub fn classify(&self, path: &Path) -> Layer {
        let segments = path_segments(path);

        if is_port_critical(&segments) {
            return Layer::Common;
        }

        self.map
            .iter()
            .find(|(fragment, _)| contains_run(&segments, fragment))
            .map_or(Layer::Unclassified, |(_, layer)| *layer)
    }
}

/// Classifies a path with the built-in fragment table.
#[must_use]
pub fn classify(path: &Path) -> Layer {
    LayerResolver::new().classify(path)
}

/// Infers the layer of an included header from its file name.
///
/// Returns `None` for headers the table does not know (e.g. the standard
/// library); such includes are never penalized.
#[must_use]
pub fn header_layer(include: &str) -> Option<Layer> {
    let file_name = include.rsplit(['/', '\\']).next().unwrap_or(include);
    HEADER_NAMES
        .iter()
        .find(|(prefix, _)| file_name.starts_with(prefix))
        .map(|(_, layer)| *layer)
}

/// Returns true if any segment of `path` equals `segment`.
#[must_use]
pub fn has_segment(path: &Path, segment: &str) -> bool {
    path_segments(path).iter().any(|s| s == segment)
}

fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// A `critical` source under the port directory implements the common
/// critical-section interface.
fn is_port_critical(segments: &[String]) -> bool {
    let Some((file_name, dirs)) = segments.split_last() else {
        return false;
    };
    dirs.iter().any(|s| s == PORT_SEGMENT) && file_name.to_ascii_lowercase().contains("critical")
}

fn contains_run(segments: &[String], fragment: &[&str]) -> bool {
    if fragment.is_empty() || fragment.len() > segments.len() {
        return false;
    }
    segments
        .windows(fragment.len())
        .any(|window| window.iter().zip(fragment).all(|(s, f)| s == f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_layer_directories() {
        assert_eq!(
            classify(Path::new("framework/src/domain/domain_event.c")),
            Layer::Domain
        );
        assert_eq!(
            classify(Path::new("include/application/app_query.h")),
            Layer::Application
        );
        assert_eq!(
            classify(Path::new("application/src/entry/entry_init.c")),
            Layer::Entry
        );
        assert_eq!(
            classify(Path::new("framework/include/common/types.h")),
            Layer::Common
        );
        assert_eq!(
            classify(Path::new("src/infrastructure/infrastructure_repository_inmem.c")),
            Layer::Infrastructure
        );
    }

    #[test]
    fn port_directory_is_infrastructure() {
        assert_eq!(
            classify(Path::new("port/stm32f030/port_hal_gpio.c")),
            Layer::Infrastructure
        );
    }

    #[test]
    fn critical_file_under_port_is_common() {
        assert_eq!(
            classify(Path::new("framework/port/x86_sim/port_critical.c")),
            Layer::Common
        );
        // Outside the port directory the name alone does not matter.
        assert_eq!(
            classify(Path::new("src/domain/critical_alarm.c")),
            Layer::Domain
        );
    }

    #[test]
    fn fragments_match_whole_segments_only() {
        assert_eq!(classify(Path::new("report/summary.c")), Layer::Unclassified);
        assert_eq!(classify(Path::new("support/port.c")), Layer::Unclassified);
        assert_eq!(
            classify(Path::new("src/domains/foo.c")),
            Layer::Unclassified
        );
    }

    #[test]
    fn most_specific_fragment_wins() {
        // Both `port` and `src/domain` match; the two-segment fragment wins.
        assert_eq!(
            classify(Path::new("port/src/domain/shim.c")),
            Layer::Domain
        );
    }

    #[test]
    fn unmatched_paths_are_unclassified() {
        assert_eq!(
            classify(Path::new("examples/minimal_app/main.c")),
            Layer::Unclassified
        );
        assert!(!Layer::Unclassified.is_classified());
    }

    #[test]
    fn classification_is_deterministic() {
        let resolver = LayerResolver::new();
        let path = Path::new("framework/include/domain/domain_entity.h");
        let first = resolver.classify(path);
        for _ in 0..10 {
            assert_eq!(resolver.classify(path), first);
        }
        assert_eq!(classify(path), first);
    }

    #[test]
    fn header_layers_from_prefix_or_name() {
        assert_eq!(header_layer("domain_foo.h"), Some(Layer::Domain));
        assert_eq!(header_layer("app_bar.h"), Some(Layer::Application));
        assert_eq!(header_layer("hal_gpio.h"), Some(Layer::Infrastructure));
        assert_eq!(header_layer("entry_init.h"), Some(Layer::Entry));
        assert_eq!(header_layer("error_codes.h"), Some(Layer::Common));
        assert_eq!(header_layer("domain/domain_entity.h"), Some(Layer::Domain));
        assert_eq!(header_layer("stdint.h"), None);
        assert_eq!(header_layer("framework_config.h"), None);
    }

    #[test]
    fn dependency_graph() {
        assert!(Layer::Infrastructure.can_depend_on(Layer::Domain));
        assert!(!Layer::Infrastructure.can_depend_on(Layer::Application));
        assert!(!Layer::Domain.can_depend_on(Layer::Infrastructure));
        assert!(Layer::Entry.can_depend_on(Layer::Application));
        assert!(!Layer::Entry.can_depend_on(Layer::Infrastructure));
        assert!(!Layer::Common.can_depend_on(Layer::Domain));
        assert!(Layer::Common.can_depend_on(Layer::Common));
    }
}
