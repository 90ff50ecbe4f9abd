//! Delivery requests and the ordered set they are loaded into.

use std::slice;

/// A single delivery request.
///
/// The destination names a network node but is not checked against the map
/// when the package is loaded.
///
/// # Examples
///
/// ```
/// use courier_core::Package;
///
/// let package = Package::new("P1", 5.0, "B", 0, 3);
/// assert_eq!(package.destination, "B");
/// assert_eq!(package.deadline, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    /// Package identifier; not required to be unique.
    pub id: String,
    /// Package weight.
    pub weight: f64,
    /// Name of the destination node.
    pub destination: String,
    /// Time the package arrived at the depot.
    pub arrival_time: i64,
    /// Latest acceptable delivery time.
    pub deadline: i64,
}

impl Package {
    /// Construct a package from its five fields.
    pub fn new(
        id: impl Into<String>,
        weight: f64,
        destination: impl Into<String>,
        arrival_time: i64,
        deadline: i64,
    ) -> Self {
        Self {
            id: id.into(),
            weight,
            destination: destination.into(),
            arrival_time,
            deadline,
        }
    }
}

/// Packages in load order. Duplicate identifiers are kept.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PackageSet {
    packages: Vec<Package>,
}

impl PackageSet {
    /// Construct an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a package.
    pub fn push(&mut self, package: Package) {
        self.packages.push(package);
    }

    /// Number of packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the set holds no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate in load order.
    pub fn iter(&self) -> slice::Iter<'_, Package> {
        self.packages.iter()
    }

    /// Borrow the packages as a slice.
    pub fn as_slice(&self) -> &[Package] {
        &self.packages
    }
}

impl FromIterator<Package> for PackageSet {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        Self {
            packages: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PackageSet {
    type Item = &'a Package;
    type IntoIter = slice::Iter<'a, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_load_order_and_duplicates() {
        let mut set: PackageSet = [
            Package::new("P1", 1.0, "B", 0, 5),
            Package::new("P2", 2.0, "C", 1, 6),
        ]
        .into_iter()
        .collect();
        set.push(Package::new("P1", 3.0, "B", 2, 7));

        let ids: Vec<_> = set.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["P1", "P2", "P1"]);
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
    }

    #[test]
    fn empty_set_is_empty() {
        let set = PackageSet::new();
        assert!(set.is_empty());
        assert!(set.as_slice().is_empty());
    }
}
