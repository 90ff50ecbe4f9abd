//! Builders for map and package text used by unit, behaviour and property
//! tests.
//!
//! The builders emit the whitespace-separated formats read by
//! [`crate::format::parse_map`] and [`crate::format::parse_packages`], so
//! tests can describe inputs structurally instead of as raw strings.

use crate::package::Package;

/// Map text under construction.
///
/// The header counts are taken from the names and edges added, unless
/// overridden with [`MapText::declared`].
///
/// # Examples
///
/// ```
/// use courier_core::test_support::MapText;
///
/// let text = MapText::new(["A", "B"]).edge(1, 2, 10.0).render();
/// assert_eq!(text, "2 1\nA B\n1 2 10\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapText {
    names: Vec<String>,
    edges: Vec<(i64, i64, f64)>,
    declared: Option<(i64, i64)>,
}

impl MapText {
    /// Start a map with the given node names in index order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Append an edge between one-based node indices.
    #[must_use]
    pub fn edge(mut self, from: i64, to: i64, weight: f64) -> Self {
        self.edges.push((from, to, weight));
        self
    }

    /// Override the header counts.
    #[must_use]
    pub const fn declared(mut self, nodes: i64, edges: i64) -> Self {
        self.declared = Some((nodes, edges));
        self
    }

    /// Render the map as text.
    pub fn render(&self) -> String {
        let (nodes, edges) = self
            .declared
            .unwrap_or((count(self.names.len()), count(self.edges.len())));
        let mut out = format!("{nodes} {edges}\n{}\n", self.names.join(" "));
        for (from, to, weight) in &self.edges {
            out.push_str(&format!("{from} {to} {weight}\n"));
        }
        out
    }
}

/// Render packages as one record per line.
///
/// # Examples
///
/// ```
/// use courier_core::Package;
/// use courier_core::test_support::packages_text;
///
/// let text = packages_text(&[Package::new("P1", 5.0, "B", 0, 3)]);
/// assert_eq!(text, "P1 5 B 0 3\n");
/// ```
pub fn packages_text(packages: &[Package]) -> String {
    packages
        .iter()
        .map(|package| {
            format!(
                "{} {} {} {} {}\n",
                package.id,
                package.weight,
                package.destination,
                package.arrival_time,
                package.deadline
            )
        })
        .collect()
}

/// The two-node map `A - B` with a single edge of weight 10.
pub fn two_node_map() -> MapText {
    MapText::new(["A", "B"]).edge(1, 2, 10.0)
}

fn count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
