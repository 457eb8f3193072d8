//! Instruction set
//!
//! Eighteen stack-machine instructions plus the `None` no-op, encoded by the
//! hue/lightness step between two consecutive color blocks (see
//! [`transition`](super::transition)).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Instructions of the stack machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instruction {
    // ═══════════════════════════════════════════════════════════════
    // STACK
    // ═══════════════════════════════════════════════════════════════
    /// No operation
    None,
    /// Push the size of the departed block
    Push,
    /// Discard the top value
    Pop,
    /// Copy the top value
    Duplicate,
    /// Rotate the top of the stack
    Roll,

    // ═══════════════════════════════════════════════════════════════
    // ARITHMETIC & LOGIC
    // ═══════════════════════════════════════════════════════════════
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Not,
    Greater,

    // ═══════════════════════════════════════════════════════════════
    // FLOW
    // ═══════════════════════════════════════════════════════════════
    /// Rotate the direction pointer
    Pointer,
    /// Toggle the codel chooser
    Switch,

    // ═══════════════════════════════════════════════════════════════
    // I/O
    // ═══════════════════════════════════════════════════════════════
    InputNumber,
    InputCharacter,
    OutputNumber,
    OutputCharacter,
}

impl Instruction {
    /// All instructions, `None` first
    pub const ALL: [Instruction; 18] = [
        Instruction::None,
        Instruction::Push,
        Instruction::Pop,
        Instruction::Duplicate,
        Instruction::Roll,
        Instruction::Add,
        Instruction::Subtract,
        Instruction::Multiply,
        Instruction::Divide,
        Instruction::Modulo,
        Instruction::Not,
        Instruction::Greater,
        Instruction::Pointer,
        Instruction::Switch,
        Instruction::InputNumber,
        Instruction::InputCharacter,
        Instruction::OutputNumber,
        Instruction::OutputCharacter,
    ];

    /// Operands that must be on the stack before execution
    ///
    /// `Pop` reports 0: popping an empty stack is a no-op.
    pub const fn required_operands(self) -> usize {
        use Instruction::*;
        match self {
            None | Push | Pop | InputNumber | InputCharacter => 0,
            Not | Pointer | Switch | Duplicate | OutputNumber | OutputCharacter => 1,
            Add | Subtract | Multiply | Divide | Modulo | Greater | Roll => 2,
        }
    }

    /// Suspends the controller until a value is supplied
    #[inline]
    pub const fn is_input(self) -> bool {
        matches!(self, Instruction::InputNumber | Instruction::InputCharacter)
    }

    pub const fn name(self) -> &'static str {
        use Instruction::*;
        match self {
            None => "none",
            Push => "push",
            Pop => "pop",
            Duplicate => "duplicate",
            Roll => "roll",
            Add => "add",
            Subtract => "subtract",
            Multiply => "multiply",
            Divide => "divide",
            Modulo => "modulo",
            Not => "not",
            Greater => "greater",
            Pointer => "pointer",
            Switch => "switch",
            InputNumber => "input_number",
            InputCharacter => "input_character",
            OutputNumber => "output_number",
            OutputCharacter => "output_character",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_requirements() {
        assert_eq!(Instruction::None.required_operands(), 0);
        assert_eq!(Instruction::Pop.required_operands(), 0);
        assert_eq!(Instruction::Not.required_operands(), 1);
        assert_eq!(Instruction::Roll.required_operands(), 2);
        assert_eq!(Instruction::Greater.required_operands(), 2);
    }

    #[test]
    fn test_names_are_unique() {
        let names: std::collections::HashSet<_> =
            Instruction::ALL.iter().map(|i| i.name()).collect();
        assert_eq!(names.len(), Instruction::ALL.len());
    }

    #[test]
    fn test_only_two_inputs() {
        let inputs: Vec<_> = Instruction::ALL.iter().filter(|i| i.is_input()).collect();
        assert_eq!(inputs, [&Instruction::InputNumber, &Instruction::InputCharacter]);
    }

    #[test]
    fn test_serde_name_matches_display() {
        for instruction in Instruction::ALL {
            let json = serde_json::to_string(&instruction).unwrap();
            assert_eq!(json, format!("\"{}\"", instruction));
        }
    }
}
