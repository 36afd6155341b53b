//! Code generation

use crate::value_objects::generate_link_code;

/// Source of fresh link codes
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, length: usize) -> String;
}

/// Uniform random codes over `A-Z0-9`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> String {
        generate_link_code(length)
    }
}
