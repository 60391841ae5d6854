use std::collections::BTreeMap;

pub const OPTION_TYPE: &str = "type";

/// Value of a section option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Flag(bool),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Text(_) => OptionKind::Text,
            OptionValue::Flag(_) => OptionKind::Flag,
        }
    }

    /// Empty text counts as unset; a flag is always set
    pub fn is_empty(&self) -> bool {
        match self {
            OptionValue::Text(s) => s.trim().is_empty(),
            OptionValue::Flag(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            OptionValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            OptionValue::Flag(b) => Some(*b),
            OptionValue::Text(_) => None,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Flag(b)
    }
}

/// Semantic type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Text,
    Flag,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionKind::Text => write!(f, "str"),
            OptionKind::Flag => write!(f, "bool"),
        }
    }
}

/// One required option of a section type
pub type SchemaField = (&'static str, OptionKind);

const FLOATING_IP_SCHEMA: &[SchemaField] = &[
    ("resource", OptionKind::Text),
    ("source", OptionKind::Text),
    ("destination", OptionKind::Text),
    ("metrics", OptionKind::Flag),
];

const PRIMARY_IP_SCHEMA: &[SchemaField] = &[
    ("resource", OptionKind::Text),
    ("source", OptionKind::Text),
    ("destination", OptionKind::Text),
];

const ROUTE_SCHEMA: &[SchemaField] = &[
    ("resource", OptionKind::Text),
    ("route", OptionKind::Text),
    ("source", OptionKind::Text),
    ("destination", OptionKind::Text),
];

/// Resource types a section can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    FloatingIp,
    PrimaryIp,
    Route,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [
        ResourceType::FloatingIp,
        ResourceType::PrimaryIp,
        ResourceType::Route,
    ];

    /// Discriminator used in the `type` option
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::FloatingIp => "ip_floating",
            ResourceType::PrimaryIp => "ip_public",
            ResourceType::Route => "route",
        }
    }

    pub fn from_type(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s.trim())
    }

    /// Options every section of this type must define
    pub fn schema(&self) -> &'static [SchemaField] {
        match self {
            ResourceType::FloatingIp => FLOATING_IP_SCHEMA,
            ResourceType::PrimaryIp => PRIMARY_IP_SCHEMA,
            ResourceType::Route => ROUTE_SCHEMA,
        }
    }

    /// Declared kind of an option, if the schema names it
    pub fn option_kind(&self, name: &str) -> Option<OptionKind> {
        self.schema()
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, kind)| *kind)
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed configuration record describing one resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSection {
    options: BTreeMap<String, OptionValue>,
}

impl ResourceSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.options.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.options.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(OptionValue::as_text)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(OptionValue::as_flag)
    }

    /// Raw `type` discriminator, `None` when unset or empty
    pub fn section_type(&self) -> Option<&str> {
        self.text(OPTION_TYPE)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.options.iter()
    }
}

/// Resource sections of a configuration, ordered by name
#[derive(Debug, Clone, Default)]
pub struct ResourceSections {
    sections: BTreeMap<String, ResourceSection>,
}

impl ResourceSections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, section: ResourceSection) {
        self.sections.insert(name.into(), section);
    }

    /// Look up a section; falls back to a case-insensitive match
    pub fn get(&self, name: &str) -> Option<&ResourceSection> {
        self.sections.get(name).or_else(|| {
            self.sections
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, section)| section)
        })
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ResourceSection> {
        let key = self
            .sections
            .keys()
            .find(|key| key.as_str() == name || key.eq_ignore_ascii_case(name))?
            .clone();
        self.sections.get_mut(&key)
    }

    pub fn names(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResourceSection)> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl FromIterator<(String, ResourceSection)> for ResourceSections {
    fn from_iter<I: IntoIterator<Item = (String, ResourceSection)>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}
