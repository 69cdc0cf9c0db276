/// Recursive character splitter. Splits on the coarsest separator that
/// produces fragments within the size budget, then merges fragments into
/// chunks that carry a trailing overlap into their successor so clause
/// boundaries are not lost at chunk edges.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<&'static str>,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            // Overlap must leave room for fresh content in every chunk.
            chunk_overlap: chunk_overlap.min(chunk_size / 2),
            separators: vec!["\n\n", "\n", " ", ""],
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        if text.chars().count() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let fragments = self.recursive_split(text, 0);
        self.merge_with_overlap(fragments)
    }

    fn recursive_split(&self, text: &str, separator_index: usize) -> Vec<String> {
        if text.chars().count() <= self.chunk_size {
            return vec![text.to_string()];
        }

        if separator_index >= self.separators.len() {
            return self.split_by_length(text);
        }

        let separator = self.separators[separator_index];
        if separator.is_empty() {
            return self.split_by_length(text);
        }

        let parts: Vec<&str> = text
            .split(separator)
            .filter(|part| !part.trim().is_empty())
            .collect();

        if parts.len() <= 1 {
            return self.recursive_split(text, separator_index + 1);
        }

        let mut fragments = Vec::new();
        for part in parts {
            if part.chars().count() <= self.chunk_size {
                fragments.push(part.to_string());
            } else {
                fragments.extend(self.recursive_split(part, separator_index + 1));
            }
        }

        fragments
    }

    fn split_by_length(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            start = end;
        }

        chunks
    }

    fn merge_with_overlap(&self, fragments: Vec<String>) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();

        for fragment in fragments {
            let fragment_len = fragment.chars().count();

            if !current.is_empty()
                && current.chars().count() + 1 + fragment_len > self.chunk_size
            {
                chunks.push(std::mem::take(&mut current));
                current = Self::tail_chars(chunks.last().map(|c| c.as_str()).unwrap_or(""), self.chunk_overlap);
            }

            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&fragment);
        }

        if !current.trim().is_empty() {
            chunks.push(current);
        }

        chunks
    }

    fn tail_chars(text: &str, count: usize) -> String {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= count {
            return text.to_string();
        }
        chars[chars.len() - count..].iter().collect()
    }
}
