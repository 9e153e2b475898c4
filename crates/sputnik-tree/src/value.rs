//! Document model for Sputnik files.
//!
//! All text in the model is desanitized: escape tokens are decoded by the
//! parser before anything is stored, so names, keys, and values hold the
//! original literal characters.

use sputnik_parse::{ROOT, split_on};

/// A key/value entry in a section or object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The key.
    pub key: String,
    /// The value.
    pub value: String,
}

/// A key/value map with unique keys, preserving first-insertion order.
///
/// Later assignment to an existing key overwrites the earlier value
/// (last-write-wins). Both named sections and anonymous objects are
/// `Section`s; only the bookkeeping around them differs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    entries: Vec<Entry>,
}

impl Section {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Insert or overwrite an entry (last-write-wins).
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.value = value.into();
        } else {
            self.entries.push(Entry {
                key,
                value: value.into(),
            });
        }
    }

    /// Check if a key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries as (key, value) pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.key.as_str(), e.value.as_str()))
    }
}

/// One object instance: its name, the order it appeared in the file, and
/// its own key/value map.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ObjectRecord {
    name: String,
    /// Document-wide creation order, so cross-sector enumeration can
    /// restore file order.
    seq: usize,
    map: Section,
}

/// An independent namespace within a document.
///
/// Holds uniquely-named sections plus an ordered multimap of objects;
/// several objects may share a name, each keeping its own map. Every
/// sector carries a `"root"` section for keys declared before any section
/// header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sector {
    sections: Vec<(String, Section)>,
    objects: Vec<ObjectRecord>,
}

impl Sector {
    /// Create a sector with an empty `"root"` section.
    pub fn new() -> Self {
        Self {
            sections: vec![(ROOT.to_string(), Section::new())],
            objects: Vec::new(),
        }
    }

    /// Get a section by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Iterate over sections as (name, section), in creation order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Iterate over all objects as (name, map), in file order.
    pub fn objects(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.objects.iter().map(|o| (o.name.as_str(), &o.map))
    }

    /// Iterate over the objects registered under `name`, in file order.
    /// Empty when none exist.
    pub fn objects_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Section> + 'a {
        self.objects
            .iter()
            .filter(move |o| o.name == name)
            .map(|o| &o.map)
    }

    /// Look up a value in a named section of this sector.
    ///
    /// Missing section or key yields the empty string; absence and an
    /// empty stored value are indistinguishable by design.
    pub fn value(&self, key: &str, section: &str) -> &str {
        self.section(section)
            .and_then(|s| s.get(key))
            .unwrap_or("")
    }

    /// Look up a value and split it on `;` into array elements.
    ///
    /// An empty value yields an empty vector, not a single empty element.
    pub fn value_as_array(&self, key: &str, section: &str) -> Vec<&str> {
        split_on(self.value(key, section), ';')
    }

    /// Resolve a section index by name, creating the section if absent.
    ///
    /// Returns an index rather than a reference: later insertions into the
    /// table must not invalidate the caller's handle.
    pub(crate) fn section_index(&mut self, name: &str) -> usize {
        if let Some(index) = self.sections.iter().position(|(n, _)| n == name) {
            return index;
        }
        self.sections.push((name.to_string(), Section::new()));
        self.sections.len() - 1
    }

    /// Append a brand-new object map under `name`, returning its index.
    /// Never merges with an existing object of the same name.
    pub(crate) fn push_object(&mut self, name: String, seq: usize) -> usize {
        self.objects.push(ObjectRecord {
            name,
            seq,
            map: Section::new(),
        });
        self.objects.len() - 1
    }

    pub(crate) fn section_at_mut(&mut self, index: usize) -> &mut Section {
        &mut self.sections[index].1
    }

    pub(crate) fn object_at_mut(&mut self, index: usize) -> &mut Section {
        &mut self.objects[index].map
    }

    fn objects_with_seq(&self) -> impl Iterator<Item = (usize, &str, &Section)> {
        self.objects.iter().map(|o| (o.seq, o.name.as_str(), &o.map))
    }
}

impl Default for Sector {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a lookup resolves when not the default root/root.
///
/// Stands in for the original's defaulted `value(key, section, sector)`
/// parameters; `Lookup::default()` names the `root` section of the `root`
/// sector.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    /// Section to look in.
    pub section: &'a str,
    /// Sector to look in.
    pub sector: &'a str,
}

impl Default for Lookup<'_> {
    fn default() -> Self {
        Self {
            section: ROOT,
            sector: ROOT,
        }
    }
}

/// A parsed Sputnik file: a map of sectors, always containing `"root"`.
///
/// Created empty, populated by exactly one parse call, then read through
/// the query API. Reparsing replaces the prior contents wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sectors: Vec<(String, Sector)>,
}

impl Document {
    /// Create a document holding only an empty `"root"` sector.
    pub fn new() -> Self {
        Self {
            sectors: vec![(ROOT.to_string(), Sector::new())],
        }
    }

    /// Reset to the empty state, dropping all parsed content.
    pub fn clear(&mut self) {
        self.sectors.clear();
        self.sectors.push((ROOT.to_string(), Sector::new()));
    }

    /// Get a sector by name.
    pub fn sector(&self, name: &str) -> Option<&Sector> {
        self.sectors.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// The default sector. Always present.
    pub fn root(&self) -> &Sector {
        // The root sector is created first and never removed.
        &self.sectors[0].1
    }

    /// Iterate over sectors as (name, sector), in creation order.
    pub fn sectors(&self) -> impl Iterator<Item = (&str, &Sector)> {
        self.sectors.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Look up a value in the root sector's root section.
    pub fn value(&self, key: &str) -> &str {
        self.value_at(key, Lookup::default())
    }

    /// Look up a value at an explicit section/sector location.
    ///
    /// A missing sector, section, or key yields the empty string; no
    /// distinction is made between absence and an empty stored value.
    pub fn value_at(&self, key: &str, at: Lookup<'_>) -> &str {
        self.sector(at.sector)
            .map(|s| s.value(key, at.section))
            .unwrap_or("")
    }

    /// Look up a value in the root sector's root section and split it on
    /// `;` into array elements.
    pub fn value_as_array(&self, key: &str) -> Vec<&str> {
        self.value_as_array_at(key, Lookup::default())
    }

    /// Look up a value at an explicit location and split it on `;`.
    /// An empty value yields an empty vector.
    pub fn value_as_array_at(&self, key: &str, at: Lookup<'_>) -> Vec<&str> {
        split_on(self.value_at(key, at), ';')
    }

    /// All object maps registered under `name` across every sector, in
    /// file order. Empty when none exist.
    pub fn objects_named(&self, name: &str) -> Vec<&Section> {
        let mut found: Vec<(usize, &Section)> = self
            .sectors
            .iter()
            .flat_map(|(_, sector)| sector.objects_with_seq())
            .filter(|(_, object_name, _)| *object_name == name)
            .map(|(seq, _, map)| (seq, map))
            .collect();
        found.sort_by_key(|(seq, _)| *seq);
        found.into_iter().map(|(_, map)| map).collect()
    }

    /// Resolve a sector index by name, creating the sector if absent.
    pub(crate) fn sector_index(&mut self, name: &str) -> usize {
        if let Some(index) = self.sectors.iter().position(|(n, _)| n == name) {
            return index;
        }
        self.sectors.push((name.to_string(), Sector::new()));
        self.sectors.len() - 1
    }

    pub(crate) fn sector_at_mut(&mut self, index: usize) -> &mut Sector {
        &mut self.sectors[index].1
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
