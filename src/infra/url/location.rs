use crate::usecase::ports::query_store::{QueryStore, StoreError, WriteMode};

/// In-memory stand-in for an address bar: the current query plus history.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    entries: Vec<String>,
    cursor: usize,
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("")
    }
}

impl MemoryLocation {
    pub fn new(initial_query: &str) -> Self {
        Self {
            entries: vec![normalize(initial_query)],
            cursor: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// Typing a URL or following a link: drops forward history.
    pub fn navigate(&mut self, query: &str) {
        self.push(query);
    }

    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    fn push(&mut self, query: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(normalize(query));
        self.cursor = self.entries.len() - 1;
    }
}

impl QueryStore for MemoryLocation {
    fn read_query(&self) -> Result<String, StoreError> {
        Ok(self.query().to_string())
    }

    fn write_query(&mut self, query: &str, mode: WriteMode) -> Result<(), StoreError> {
        match mode {
            WriteMode::Replace => self.entries[self.cursor] = normalize(query),
            WriteMode::Push => self.push(query),
        }
        Ok(())
    }
}

fn normalize(query: &str) -> String {
    query.strip_prefix('?').unwrap_or(query).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_keeps_history_length() {
        let mut location = MemoryLocation::new("page=1");

        location
            .write_query("page=2", WriteMode::Replace)
            .expect("memory writes never fail");

        assert_eq!(location.query(), "page=2");
        assert_eq!(location.history_len(), 1);
    }

    #[test]
    fn push_then_back_and_forward() {
        let mut location = MemoryLocation::new("?page=1");
        location
            .write_query("page=2", WriteMode::Push)
            .expect("memory writes never fail");

        assert!(location.back());
        assert_eq!(location.query(), "page=1");
        assert!(!location.back());
        assert!(location.forward());
        assert_eq!(location.query(), "page=2");
        assert!(!location.forward());
    }

    #[test]
    fn navigate_drops_forward_entries() {
        let mut location = MemoryLocation::new("a=1");
        location.navigate("a=2");
        location.navigate("a=3");
        location.back();
        location.back();

        location.navigate("a=9");

        assert_eq!(location.history_len(), 2);
        assert!(!location.forward());
    }
}
