//! Stack machine
//!
//! Owns the operand stack and executes one instruction at a time. The only
//! state it touches outside the stack is the `(dp, cc)` pair, lent by the
//! controller for `Pointer` and `Switch`.
//!
//! Operand checks happen before anything is popped, so an underflow leaves
//! the stack as it was. Errors detected after popping (division by zero, bad
//! roll depth, invalid character) keep the operands popped.

use tracing::trace;

use super::error::{VmError, VmResult};
use super::instruction::Instruction;
use super::io::{ExecutionRecord, IoContext};
use super::pointer::PointerState;
use super::state::InputKind;

/// LIFO stack of signed integers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperandStack {
    /// bottom → top
    values: Vec<i64>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn push(&mut self, value: i64) {
        self.values.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<i64> {
        self.values.pop()
    }

    #[inline]
    pub fn peek(&self) -> Option<i64> {
        self.values.last().copied()
    }

    /// Values bottom → top
    #[inline]
    pub fn as_slice(&self) -> &[i64] {
        &self.values
    }

    /// Values top → bottom
    pub fn top_down(&self) -> impl Iterator<Item = i64> + '_ {
        self.values.iter().rev().copied()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Fail with an underflow unless `instruction` has its operands
    fn require(&self, instruction: Instruction) -> VmResult<()> {
        let required = instruction.required_operands();
        if self.values.len() < required {
            return Err(VmError::InsufficientOperands {
                instruction,
                required,
                available: self.values.len(),
            });
        }
        Ok(())
    }

    /// Pop after [`require`](Self::require) succeeded
    fn take(&mut self) -> i64 {
        self.values.pop().unwrap_or_default()
    }

    /// Pop `b` (top) then `a`
    fn take_pair(&mut self) -> (i64, i64) {
        let b = self.take();
        let a = self.take();
        (a, b)
    }

    /// Rotate the top `window` values `turns` positions towards the top
    fn rotate_top(&mut self, window: usize, turns: usize) {
        if window == 0 {
            return;
        }
        let start = self.values.len() - window;
        self.values[start..].rotate_right(turns % window);
    }
}

impl From<Vec<i64>> for OperandStack {
    /// `values` listed bottom → top
    fn from(values: Vec<i64>) -> Self {
        Self { values }
    }
}

/// What the controller does after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Keep stepping
    Continue,
    /// Suspend until the host supplies a value
    AwaitInput(InputKind),
}

/// Execution counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MachineStats {
    pub instructions: u64,
    pub inputs_requested: u64,
    pub outputs: u64,
}

/// Executes instructions against an [`OperandStack`]
#[derive(Debug, Clone, Default)]
pub struct StackMachine {
    stack: OperandStack,
    last: Option<ExecutionRecord>,
    stats: MachineStats,
}

impl StackMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Machine starting from an existing stack
    pub fn with_stack(stack: OperandStack) -> Self {
        Self {
            stack,
            ..Self::default()
        }
    }

    #[inline]
    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    /// Push a value supplied by the host after an input request
    pub fn push_input(&mut self, value: i64) {
        self.stack.push(value);
    }

    /// Record of the most recently executed instruction
    #[inline]
    pub fn last_record(&self) -> Option<&ExecutionRecord> {
        self.last.as_ref()
    }

    #[inline]
    pub fn stats(&self) -> &MachineStats {
        &self.stats
    }

    /// Empty the stack and forget past executions
    pub fn reset(&mut self) {
        self.stack.clear();
        self.last = None;
        self.stats = MachineStats::default();
    }

    /// Execute one instruction
    ///
    /// `block_size` is the codel count of the block being left (`Push`).
    pub fn execute(
        &mut self,
        instruction: Instruction,
        block_size: usize,
        pointer: &mut PointerState,
        io: &mut dyn IoContext,
    ) -> VmResult<Effect> {
        self.stack.require(instruction)?;

        let mut effect = Effect::Continue;
        let record = match instruction {
            Instruction::None => ExecutionRecord::new(instruction),
            Instruction::Push => self.op_push(block_size)?,
            Instruction::Pop => self.op_pop(),
            Instruction::Duplicate => self.op_duplicate(),
            Instruction::Roll => self.op_roll()?,
            Instruction::Add => self.op_checked(instruction, i64::checked_add)?,
            Instruction::Subtract => self.op_checked(instruction, i64::checked_sub)?,
            Instruction::Multiply => self.op_checked(instruction, i64::checked_mul)?,
            Instruction::Divide => self.op_divide()?,
            Instruction::Modulo => self.op_modulo()?,
            Instruction::Not => self.op_not(),
            Instruction::Greater => self.op_greater(),
            Instruction::Pointer => {
                let n = self.stack.take();
                pointer.dp = pointer.dp.rotate_by(n);
                ExecutionRecord::new(instruction).with_operand(n)
            }
            Instruction::Switch => {
                let n = self.stack.take();
                pointer.cc = pointer.cc.switch_by(n);
                ExecutionRecord::new(instruction).with_operand(n)
            }
            Instruction::InputNumber => {
                io.request_integer();
                self.stats.inputs_requested += 1;
                effect = Effect::AwaitInput(InputKind::Integer);
                ExecutionRecord::new(instruction)
            }
            Instruction::InputCharacter => {
                io.request_character();
                self.stats.inputs_requested += 1;
                effect = Effect::AwaitInput(InputKind::Character);
                ExecutionRecord::new(instruction)
            }
            Instruction::OutputNumber => {
                let value = self.stack.take();
                io.emit_integer(value);
                self.stats.outputs += 1;
                ExecutionRecord::new(instruction).with_operand(value)
            }
            Instruction::OutputCharacter => {
                let value = self.stack.take();
                let c = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(VmError::InvalidCharacter { value })?;
                io.emit_character(c);
                self.stats.outputs += 1;
                ExecutionRecord::new(instruction).with_operand(value)
            }
        };

        trace!(%record, depth = self.stack.len(), "executed");
        self.stats.instructions += 1;
        io.record(&record);
        io.stack_changed(self.stack.as_slice());
        self.last = Some(record);
        Ok(effect)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // HANDLERS
    // ═══════════════════════════════════════════════════════════════════════

    fn op_push(&mut self, block_size: usize) -> VmResult<ExecutionRecord> {
        let value = i64::try_from(block_size).map_err(|_| VmError::Overflow {
            instruction: Instruction::Push,
        })?;
        self.stack.push(value);
        Ok(ExecutionRecord::new(Instruction::Push).with_result(value))
    }

    fn op_pop(&mut self) -> ExecutionRecord {
        let record = ExecutionRecord::new(Instruction::Pop);
        match self.stack.pop() {
            Some(value) => record.with_operand(value),
            None => record,
        }
    }

    fn op_duplicate(&mut self) -> ExecutionRecord {
        let value = self.stack.peek().unwrap_or_default();
        self.stack.push(value);
        ExecutionRecord::new(Instruction::Duplicate)
            .with_operand(value)
            .with_result(value)
    }

    fn op_checked(
        &mut self,
        instruction: Instruction,
        op: fn(i64, i64) -> Option<i64>,
    ) -> VmResult<ExecutionRecord> {
        let (a, b) = self.stack.take_pair();
        let result = op(a, b).ok_or(VmError::Overflow { instruction })?;
        self.stack.push(result);
        Ok(ExecutionRecord::new(instruction)
            .with_operands(a, b)
            .with_result(result))
    }

    /// Truncating division
    fn op_divide(&mut self) -> VmResult<ExecutionRecord> {
        let instruction = Instruction::Divide;
        let (a, b) = self.stack.take_pair();
        if b == 0 {
            return Err(VmError::DivisionByZero { instruction });
        }
        let result = a.checked_div(b).ok_or(VmError::Overflow { instruction })?;
        self.stack.push(result);
        Ok(ExecutionRecord::new(instruction)
            .with_operands(a, b)
            .with_result(result))
    }

    /// Floored modulo: the result takes the sign of the divisor
    fn op_modulo(&mut self) -> VmResult<ExecutionRecord> {
        let instruction = Instruction::Modulo;
        let (a, b) = self.stack.take_pair();
        if b == 0 {
            return Err(VmError::DivisionByZero { instruction });
        }
        let mut result = a.wrapping_rem(b);
        if result != 0 && (result < 0) != (b < 0) {
            result += b;
        }
        self.stack.push(result);
        Ok(ExecutionRecord::new(instruction)
            .with_operands(a, b)
            .with_result(result))
    }

    fn op_not(&mut self) -> ExecutionRecord {
        let value = self.stack.take();
        let result = i64::from(value == 0);
        self.stack.push(result);
        ExecutionRecord::new(Instruction::Not)
            .with_operand(value)
            .with_result(result)
    }

    fn op_greater(&mut self) -> ExecutionRecord {
        let (a, b) = self.stack.take_pair();
        let result = i64::from(a > b);
        self.stack.push(result);
        ExecutionRecord::new(Instruction::Greater)
            .with_operands(a, b)
            .with_result(result)
    }

    /// Pop `rolls` then `depth`, rotate the top `depth + 1` values
    ///
    /// The window is clamped to the stack, so `depth` equal to the stack size
    /// rolls the whole stack. Negative roll counts rotate by their magnitude.
    fn op_roll(&mut self) -> VmResult<ExecutionRecord> {
        let rolls = self.stack.take();
        let depth = self.stack.take();
        let available = self.stack.len();

        let window = usize::try_from(depth)
            .ok()
            .filter(|&d| d <= available)
            .ok_or(VmError::InvalidRollDepth { depth, available })?;
        let window = (window + 1).min(available);

        let turns = usize::try_from(rolls.unsigned_abs()).unwrap_or(usize::MAX);
        self.stack.rotate_top(window, turns);

        Ok(ExecutionRecord::new(Instruction::Roll).with_operands(depth, rolls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::io::{BufferedIo, IoEvent};
    use crate::vm::pointer::{Chooser, Direction};

    /// Machine with `values` pushed in order (last one on top)
    fn machine(values: &[i64]) -> StackMachine {
        StackMachine::with_stack(OperandStack::from(values.to_vec()))
    }

    fn exec(machine: &mut StackMachine, instruction: Instruction) -> VmResult<Effect> {
        let mut pointer = PointerState::default();
        let mut io = BufferedIo::new();
        machine.execute(instruction, 1, &mut pointer, &mut io)
    }

    fn top_down(machine: &StackMachine) -> Vec<i64> {
        machine.stack().top_down().collect()
    }

    #[test]
    fn test_push_block_size() {
        let mut m = StackMachine::new();
        let mut pointer = PointerState::default();
        let mut io = BufferedIo::new();
        m.execute(Instruction::Push, 7, &mut pointer, &mut io).unwrap();
        assert_eq!(m.stack().as_slice(), &[7]);
    }

    #[test]
    fn test_none_is_idempotent() {
        let mut m = machine(&[3, 1, 4]);
        for _ in 0..5 {
            assert_eq!(exec(&mut m, Instruction::None), Ok(Effect::Continue));
        }
        assert_eq!(m.stack().as_slice(), &[3, 1, 4]);

        let mut empty = StackMachine::new();
        exec(&mut empty, Instruction::None).unwrap();
        assert!(empty.stack().is_empty());
    }

    #[test]
    fn test_add_and_subtract() {
        let mut m = machine(&[1, 2]);
        exec(&mut m, Instruction::Add).unwrap();
        assert_eq!(m.stack().as_slice(), &[3]);

        let mut m = machine(&[5, 2]);
        exec(&mut m, Instruction::Subtract).unwrap();
        assert_eq!(m.stack().as_slice(), &[3]);

        let mut m = machine(&[6, 7]);
        exec(&mut m, Instruction::Multiply).unwrap();
        assert_eq!(m.stack().as_slice(), &[42]);
    }

    #[test]
    fn test_divide_truncates() {
        let mut m = machine(&[-7, 2]);
        exec(&mut m, Instruction::Divide).unwrap();
        assert_eq!(m.stack().as_slice(), &[-3]);
    }

    #[test]
    fn test_division_by_zero() {
        let mut m = machine(&[12, 0]);
        assert_eq!(
            exec(&mut m, Instruction::Divide),
            Err(VmError::DivisionByZero {
                instruction: Instruction::Divide
            })
        );
        // operands stay popped
        assert!(m.stack().is_empty());

        let mut m = machine(&[12, 0]);
        assert!(exec(&mut m, Instruction::Modulo).is_err());
    }

    #[test]
    fn test_modulo_is_floored() {
        let cases = [(7, 3, 1), (-7, 3, 2), (7, -3, -2), (-7, -3, -1), (6, 3, 0), (-6, 3, 0)];
        for (a, b, expected) in cases {
            let mut m = machine(&[a, b]);
            exec(&mut m, Instruction::Modulo).unwrap();
            assert_eq!(m.stack().as_slice(), &[expected], "{a} mod {b}");
        }

        let mut m = machine(&[i64::MIN, -1]);
        exec(&mut m, Instruction::Modulo).unwrap();
        assert_eq!(m.stack().as_slice(), &[0]);
    }

    #[test]
    fn test_overflow_is_fatal() {
        let mut m = machine(&[i64::MAX, 1]);
        assert_eq!(
            exec(&mut m, Instruction::Add),
            Err(VmError::Overflow {
                instruction: Instruction::Add
            })
        );

        let mut m = machine(&[i64::MIN, -1]);
        assert!(matches!(exec(&mut m, Instruction::Divide), Err(VmError::Overflow { .. })));
    }

    #[test]
    fn test_not_and_greater() {
        let mut m = machine(&[0]);
        exec(&mut m, Instruction::Not).unwrap();
        assert_eq!(m.stack().as_slice(), &[1]);
        exec(&mut m, Instruction::Not).unwrap();
        assert_eq!(m.stack().as_slice(), &[0]);

        let mut m = machine(&[5, 3]);
        exec(&mut m, Instruction::Greater).unwrap();
        assert_eq!(m.stack().as_slice(), &[1]);

        let mut m = machine(&[3, 3]);
        exec(&mut m, Instruction::Greater).unwrap();
        assert_eq!(m.stack().as_slice(), &[0]);
    }

    #[test]
    fn test_pop_on_empty_stack_is_noop() {
        let mut m = StackMachine::new();
        assert_eq!(exec(&mut m, Instruction::Pop), Ok(Effect::Continue));
        assert!(m.stack().is_empty());

        let mut m = machine(&[1, 2]);
        exec(&mut m, Instruction::Pop).unwrap();
        assert_eq!(m.stack().as_slice(), &[1]);
    }

    #[test]
    fn test_underflow_leaves_stack_untouched() {
        let mut m = machine(&[9]);
        assert_eq!(
            exec(&mut m, Instruction::Add),
            Err(VmError::InsufficientOperands {
                instruction: Instruction::Add,
                required: 2,
                available: 1,
            })
        );
        assert_eq!(m.stack().as_slice(), &[9]);

        let mut m = StackMachine::new();
        for instruction in [Instruction::Duplicate, Instruction::OutputNumber, Instruction::Pointer] {
            assert!(matches!(
                exec(&mut m, instruction),
                Err(VmError::InsufficientOperands { .. })
            ));
        }
    }

    #[test]
    fn test_duplicate() {
        let mut m = machine(&[4]);
        exec(&mut m, Instruction::Duplicate).unwrap();
        assert_eq!(m.stack().as_slice(), &[4, 4]);
    }

    #[test]
    fn test_roll_vectors() {
        // top → bottom [5, 4, 3, 2, 1], then depth 3 and rolls on top
        let mut m = machine(&[1, 2, 3, 4, 5, 3, 1]);
        exec(&mut m, Instruction::Roll).unwrap();
        assert_eq!(top_down(&m), vec![4, 3, 2, 5, 1]);

        let mut m = machine(&[1, 2, 3, 4, 5, 3, 2]);
        exec(&mut m, Instruction::Roll).unwrap();
        assert_eq!(top_down(&m), vec![3, 2, 5, 4, 1]);
    }

    #[test]
    fn test_roll_edges() {
        // depth 0 is a no-op
        let mut m = machine(&[1, 2, 3, 0, 5]);
        exec(&mut m, Instruction::Roll).unwrap();
        assert_eq!(m.stack().as_slice(), &[1, 2, 3]);

        // depth equal to the stack size rolls everything
        let mut m = machine(&[1, 2, 3, 3, 1]);
        exec(&mut m, Instruction::Roll).unwrap();
        assert_eq!(m.stack().as_slice(), &[3, 1, 2]);

        // negative rolls rotate by magnitude
        let mut m = machine(&[1, 2, 3, 4, 5, 3, -1]);
        exec(&mut m, Instruction::Roll).unwrap();
        assert_eq!(top_down(&m), vec![4, 3, 2, 5, 1]);
    }

    #[test]
    fn test_roll_invalid_depth() {
        let mut m = machine(&[1, 2, 3, 1]);
        assert_eq!(
            exec(&mut m, Instruction::Roll),
            Err(VmError::InvalidRollDepth { depth: 3, available: 2 })
        );

        let mut m = machine(&[1, -1, 1]);
        assert!(matches!(
            exec(&mut m, Instruction::Roll),
            Err(VmError::InvalidRollDepth { depth: -1, .. })
        ));
    }

    #[test]
    fn test_pointer_and_switch() {
        let mut m = machine(&[-1, 3, 1]);
        let mut pointer = PointerState::default();
        let mut io = BufferedIo::new();

        m.execute(Instruction::Switch, 1, &mut pointer, &mut io).unwrap();
        assert_eq!(pointer.cc, Chooser::Right);

        m.execute(Instruction::Pointer, 1, &mut pointer, &mut io).unwrap();
        assert_eq!(pointer.dp, Direction::Up);

        m.execute(Instruction::Pointer, 1, &mut pointer, &mut io).unwrap();
        assert_eq!(pointer.dp, Direction::Left);
        assert!(m.stack().is_empty());
    }

    #[test]
    fn test_output_and_input() {
        let mut m = machine(&[72, 105, 33, 7]);
        let mut pointer = PointerState::default();
        let mut io = BufferedIo::with_diagnostics();

        m.execute(Instruction::OutputNumber, 1, &mut pointer, &mut io).unwrap();
        m.execute(Instruction::OutputCharacter, 1, &mut pointer, &mut io).unwrap();
        assert_eq!(io.output_text(), "7!");

        let effect = m.execute(Instruction::InputNumber, 1, &mut pointer, &mut io).unwrap();
        assert_eq!(effect, Effect::AwaitInput(InputKind::Integer));
        assert_eq!(m.stack().as_slice(), &[72, 105]);
        assert!(io.events().contains(&IoEvent::IntegerRequested));

        assert_eq!(io.records().count(), 3);
        assert_eq!(m.stats().outputs, 2);
        assert_eq!(m.stats().inputs_requested, 1);
    }

    #[test]
    fn test_invalid_character() {
        let mut m = machine(&[-5]);
        assert_eq!(
            exec(&mut m, Instruction::OutputCharacter),
            Err(VmError::InvalidCharacter { value: -5 })
        );

        let mut m = machine(&[0xD800]);
        assert!(exec(&mut m, Instruction::OutputCharacter).is_err());
    }

    #[test]
    fn test_stack_snapshot_after_each_instruction() {
        let mut m = machine(&[2, 3]);
        let mut pointer = PointerState::default();
        let mut io = BufferedIo::with_diagnostics();
        m.execute(Instruction::Multiply, 1, &mut pointer, &mut io).unwrap();

        assert_eq!(
            io.events().last(),
            Some(&IoEvent::StackChanged { stack: vec![6] })
        );
        assert_eq!(m.last_record().and_then(|r| r.result), Some(6));
    }
}
