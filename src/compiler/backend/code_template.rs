/// Piece of a code template: literal text or a slot filled with one entry of the
/// fixed binding vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TemplatePart {
    Text(String),
    Slot(usize)
}

/// Code text with holes for the instructions chosen during rule expansion.
/// Built once per rule, instantiated once per expansion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct CodeTemplate {
    parts: Vec<TemplatePart>
}

impl CodeTemplate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends literal text, merging with a preceding text part.
    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(TemplatePart::Text(last)) = self.parts.last_mut() {
            last.push_str(text);
        } else {
            self.parts.push(TemplatePart::Text(String::from(text)));
        }
    }

    pub(crate) fn push_slot(&mut self, slot: usize) {
        self.parts.push(TemplatePart::Slot(slot));
    }

    /// Highest slot index used plus one.
    pub(crate) fn slot_count(&self) -> usize {
        self.parts.iter()
            .filter_map(|part| match part {
                TemplatePart::Slot(slot) => Some(slot + 1),
                TemplatePart::Text(_) => None
            })
            .max()
            .unwrap_or(0)
    }

    /// Fills every slot with the value at its index.
    /// @values: One value per slot, in slot order
    /// @return: Instantiated text
    pub(crate) fn instantiate<S: AsRef<str>>(&self, values: &[S]) -> String {
        let mut output = String::new();
        for part in &self.parts {
            match part {
                TemplatePart::Text(text) => output.push_str(text),
                TemplatePart::Slot(slot) => {
                    if let Some(value) = values.get(*slot) {
                        output.push_str(value.as_ref());
                    }
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::{CodeTemplate, TemplatePart};

    #[test]
    fn test_instantiate_fills_slots_in_place() {
        let mut template = CodeTemplate::new();
        template.push_text("is_");
        template.push_slot(1);
        template.push_text("(c) && is_");
        template.push_slot(0);
        template.push_text("(d)");

        assert_eq!(2, template.slot_count());
        assert_eq!("is_isub(c) && is_iload(d)", template.instantiate(&["iload", "isub"]));
        assert_eq!("is_iadd(c) && is_aload(d)", template.instantiate(&["aload".to_string(), "iadd".to_string()]));
    }

    #[test]
    fn test_adjacent_text_is_merged() {
        let mut template = CodeTemplate::new();
        template.push_text("a");
        template.push_text("b");

        assert_eq!(vec![TemplatePart::Text(String::from("ab"))], template.parts);
        assert_eq!(0, template.slot_count());
    }
}
