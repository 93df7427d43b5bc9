/// Renders a display value as text
pub trait NumberFormatter {
    fn format(&self, value: u64) -> String;
}

/// Decimal formatter inserting a separator between digit groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingFormatter {
    separator: String,
    group_size: usize,
}

impl GroupingFormatter {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            group_size: 3,
        }
    }

    /// Group size in digits; zero disables grouping
    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size;
        self
    }
}

impl Default for GroupingFormatter {
    fn default() -> Self {
        Self::new(",")
    }
}

impl NumberFormatter for GroupingFormatter {
    fn format(&self, value: u64) -> String {
        let digits = value.to_string();
        if self.group_size == 0 || self.separator.is_empty() || digits.len() <= self.group_size {
            return digits;
        }

        let mut out = String::with_capacity(digits.len() + digits.len() / self.group_size);
        let lead = digits.len() % self.group_size;
        for (i, ch) in digits.chars().enumerate() {
            if i != 0 && (i + self.group_size - lead) % self.group_size == 0 {
                out.push_str(&self.separator);
            }
            out.push(ch);
        }
        out
    }
}
