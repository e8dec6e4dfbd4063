/// Names of the functions generated for one pattern file, in generation order.
/// Downstream optimizers try patterns in registration order, so the order here is part
/// of the output contract.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionRegistry {
    names: Vec<String>
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: String) {
        self.names.push(name);
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }

    /// Emits the function registering every generated function with the optimizer.
    /// @function_name: Name of the registration function, e.g. init_patterns_arith
    /// @registration_macro: Macro or function called once per generated function
    /// @return: C source of the registration function
    pub fn emit_init_function(&self, function_name: &str, registration_macro: &str) -> String {
        let mut output = format!("int {}(void)\n{{\n", function_name);
        for name in &self.names {
            output.push_str(&format!("    {}({});\n", registration_macro, name));
        }
        output.push_str("    return 1;\n}\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::FunctionRegistry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_init_function_keeps_registration_order() {
        let mut registry = FunctionRegistry::new();
        registry.register(String::from("fold_isub"));
        registry.register(String::from("fold_iadd"));

        let expected = "int init_patterns_arith(void)
{
    ADD_PATTERN(fold_isub);
    ADD_PATTERN(fold_iadd);
    return 1;
}
";
        assert_eq!(expected, registry.emit_init_function("init_patterns_arith", "ADD_PATTERN"));
    }

    #[test]
    fn test_empty_registry_still_succeeds() {
        let registry = FunctionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!("int init_patterns_none(void)\n{\n    return 1;\n}\n",
                   registry.emit_init_function("init_patterns_none", "ADD_PATTERN"));
    }
}
