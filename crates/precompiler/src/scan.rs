//! Character accumulators used by the scanner.
//!
//! `WordBuilder` collects one identifier-like token at a time. `SectionBuilder`
//! collects the raw text of an open section, dropping line breaks and tabs so a
//! multi-line block becomes one flowing string. Both grow on demand.

/// Characters that never make it into captured section text.
const SECTION_FILTERED: [char; 3] = ['\r', '\n', '\t'];

#[derive(Debug, Default)]
pub(crate) struct WordBuilder {
    buffer: String,
}

impl WordBuilder {
    pub(crate) fn append(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Hands out the accumulated word and resets the buffer.
    pub(crate) fn build(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

#[derive(Debug, Default)]
pub(crate) struct SectionBuilder {
    buffer: String,
}

impl SectionBuilder {
    pub(crate) fn append(&mut self, c: char) {
        if !SECTION_FILTERED.contains(&c) {
            self.buffer.push(c);
        }
    }

    /// Drops up to `amount` trailing characters.
    pub(crate) fn back(&mut self, amount: usize) {
        for _ in 0..amount {
            if self.buffer.pop().is_none() {
                break;
            }
        }
    }

    pub(crate) fn build(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_builder_resets_after_build() {
        let mut word = WordBuilder::default();
        assert!(word.is_empty());
        "vec3".chars().for_each(|c| word.append(c));
        assert!(!word.is_empty());
        assert_eq!(word.build(), "vec3");
        assert!(word.is_empty());
        assert_eq!(word.build(), "");
    }

    #[test]
    fn section_builder_filters_line_breaks_and_tabs() {
        let mut section = SectionBuilder::default();
        "\tin vec3 a;\r\nout vec4 b;\n"
            .chars()
            .for_each(|c| section.append(c));
        assert_eq!(section.build(), "in vec3 a;out vec4 b;");
    }

    #[test]
    fn section_builder_back_saturates() {
        let mut section = SectionBuilder::default();
        "ab}".chars().for_each(|c| section.append(c));
        section.back(1);
        assert_eq!(section.build(), "ab");

        "x".chars().for_each(|c| section.append(c));
        section.back(5);
        assert_eq!(section.build(), "");
    }
}
