/// Categories a transaction may carry. Seeded with the defaults below;
/// bulk-loaded files may introduce new names, which extend the set.
#[derive(Debug, Clone)]
pub struct CategorySet {
    names: Vec<String>,
}

pub const DEFAULT_CATEGORIES: [&str; 5] =
    ["Income", "Expenses", "Transfer", "Investment", "Other"];

impl Default for CategorySet {
    fn default() -> Self {
        Self {
            names: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CategorySet {
    /// Resolve a name (case-insensitive) to its canonical spelling.
    pub fn canonical(&self, name: &str) -> Option<String> {
        let lower = name.trim().to_lowercase();
        self.names
            .iter()
            .find(|n| n.to_lowercase() == lower)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.canonical(name).is_some()
    }

    /// Add a name if it is not already present (case-insensitive).
    pub fn add(&mut self, name: &str) {
        let trimmed = name.trim();
        if !trimmed.is_empty() && !self.contains(trimmed) {
            self.names.push(trimmed.to_string());
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }
}
