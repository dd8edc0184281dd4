use regex::Regex;
use std::collections::BTreeSet;

/// Length of a manifest object identifier in hex characters.
pub const IDENTIFIER_LEN: usize = 24;

/// Draw a fresh 24-character uppercase hex identifier.
///
/// Uniqueness is not checked here; use [`IdAllocator`] when writing into a
/// document.
pub fn generate_identifier() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    hex[..IDENTIFIER_LEN].to_ascii_uppercase()
}

/// True when `value` is exactly 24 uppercase hex characters.
pub fn is_identifier(value: &str) -> bool {
    value.len() == IDENTIFIER_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

/// Hands out identifiers that collide neither with the document nor with
/// each other.
#[derive(Debug, Default)]
pub struct IdAllocator {
    taken: BTreeSet<String>,
}

impl IdAllocator {
    /// Seed the allocator with every identifier-shaped token in `content`.
    pub fn from_document(content: &str) -> Self {
        let token = Regex::new(r"\b[0-9A-F]{24}\b").expect("regex for object identifiers");
        let taken = token
            .find_iter(content)
            .map(|m| m.as_str().to_string())
            .collect();
        Self { taken }
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    /// Reserve and return an identifier not seen before.
    pub fn allocate(&mut self) -> String {
        self.allocate_with(generate_identifier)
    }

    fn allocate_with<F>(&mut self, mut draw: F) -> String
    where
        F: FnMut() -> String,
    {
        loop {
            let candidate = draw();
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            tracing::debug!(id = %candidate, "identifier collision; redrawing");
        }
    }
}
