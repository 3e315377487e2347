// Execution engine for the machine

use crate::config::{EofPolicy, MachineConfig, WritePolicy};
use crate::interpreter::errors::ExecError;
use crate::memory::buffer::ByteBuffer;
use crate::memory::stack::LoopStack;
use crate::memory::tape::Tape;
use crate::memory::{CapacityError, Region};

/// A decoded program byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Increment,
    Decrement,
    Right,
    Left,
    Output,
    Input,
    LoopOpen,
    LoopClose,
    /// Any byte that is not one of the eight commands
    Nop,
}

impl Op {
    pub fn decode(byte: u8) -> Self {
        match byte {
            b'+' => Op::Increment,
            b'-' => Op::Decrement,
            b'>' => Op::Right,
            b'<' => Op::Left,
            b'.' => Op::Output,
            b',' => Op::Input,
            b'[' => Op::LoopOpen,
            b']' => Op::LoopClose,
            _ => Op::Nop,
        }
    }
}

/// How a run ended when no error stopped it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The program pointer reached the end of the program
    Completed,
    /// The operations budget hit zero first
    BudgetExhausted,
}

/// Positions the engine tracks during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursors {
    pub code_pos: usize,
    pub input_pos: usize,
    pub output_pos: usize,
    pub cell_ptr: usize,
    pub ops_remaining: usize,
}

/// The machine: program, input and output buffers, the tape, the loop stack
/// and the cursors into all of them
#[derive(Debug, Clone)]
pub struct Machine {
    pub(crate) program: ByteBuffer,
    pub(crate) input: ByteBuffer,
    pub(crate) output: ByteBuffer,
    pub(crate) tape: Tape,
    pub(crate) loops: LoopStack,
    pub(crate) cursors: Cursors,

    /// Budget assigned to the current (or last) run
    budget: usize,

    eof: EofPolicy,
}

impl Machine {
    /// Create a machine with empty buffers sized from `config`.
    ///
    /// `config` is expected to have passed [`MachineConfig::validate`].
    pub fn new(config: &MachineConfig) -> Self {
        Machine {
            program: ByteBuffer::new(Region::Program, config.code_capacity),
            input: ByteBuffer::new(Region::Input, config.input_capacity),
            output: ByteBuffer::new(Region::Output, config.output_capacity),
            tape: Tape::new(config.tape_size),
            loops: LoopStack::new(config.loop_depth),
            cursors: Cursors::default(),
            budget: 0,
            eof: config.eof,
        }
    }

    /// Replace the program and rewind the program pointer
    pub fn load_program(
        &mut self,
        bytes: &[u8],
        policy: WritePolicy,
    ) -> Result<usize, CapacityError> {
        let stored = self.program.replace(bytes, policy)?;
        self.cursors.code_pos = 0;
        Ok(stored)
    }

    /// Replace the input and rewind the input cursor
    pub fn load_input(
        &mut self,
        bytes: &[u8],
        policy: WritePolicy,
    ) -> Result<usize, CapacityError> {
        let stored = self.input.replace(bytes, policy)?;
        self.cursors.input_pos = 0;
        Ok(stored)
    }

    /// Clear the tape, output, loop stack and every cursor.
    ///
    /// Program and input contents are kept.
    pub fn reset(&mut self) {
        self.tape.reset();
        self.output.clear();
        self.loops.clear();
        self.cursors = Cursors::default();
        self.budget = 0;
    }

    /// Run from the current program position for at most `budget` instructions.
    ///
    /// Every instruction costs one operation, including bytes that are not
    /// commands. The budget is checked before each fetch, so a program of
    /// exactly `budget` instructions completes.
    pub fn run(&mut self, budget: usize) -> Result<RunStatus, ExecError> {
        self.budget = budget;
        self.cursors.ops_remaining = budget;
        let end = self.program_text().len();

        while self.cursors.code_pos < end {
            if self.cursors.ops_remaining == 0 {
                return Ok(RunStatus::BudgetExhausted);
            }
            self.cursors.ops_remaining -= 1;

            let op = Op::decode(self.program.as_slice()[self.cursors.code_pos]);
            self.execute(op)?;

            // Jumps leave code_pos on their target bracket
            self.cursors.code_pos += 1;
        }

        Ok(RunStatus::Completed)
    }

    /// Execute one decoded instruction at the current program position
    fn execute(&mut self, op: Op) -> Result<(), ExecError> {
        match op {
            Op::Increment => self.tape.increment(),
            Op::Decrement => self.tape.decrement(),
            Op::Right => self.tape.advance(),
            Op::Left => self.tape.retreat(),
            Op::Output => self.output.push(self.tape.current())?,
            Op::Input => self.read_input_byte(),
            Op::LoopOpen => self.execute_loop_open()?,
            Op::LoopClose => self.execute_loop_close()?,
            Op::Nop => {}
        }
        Ok(())
    }

    fn read_input_byte(&mut self) {
        match self.input.get(self.cursors.input_pos) {
            Some(byte) => {
                self.tape.set_current(byte);
                self.cursors.input_pos += 1;
            }
            None => {
                if self.eof == EofPolicy::Zero {
                    self.tape.set_current(0);
                }
            }
        }
    }

    /// Program bytes up to the logical end (the first NUL, if any)
    pub(crate) fn program_text(&self) -> &[u8] {
        let bytes = self.program.as_slice();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        &bytes[..end]
    }

    pub fn program(&self) -> &[u8] {
        self.program.as_slice()
    }

    pub fn input(&self) -> &[u8] {
        self.input.as_slice()
    }

    pub fn output(&self) -> &[u8] {
        self.output.as_slice()
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Mutable tape access, for presetting cells before a run
    pub fn tape_mut(&mut self) -> &mut Tape {
        &mut self.tape
    }

    pub fn loops(&self) -> &LoopStack {
        &self.loops
    }

    /// Current value of every cursor
    pub fn cursors(&self) -> Cursors {
        Cursors {
            output_pos: self.output.len(),
            cell_ptr: self.tape.ptr(),
            ..self.cursors
        }
    }

    /// Operations consumed by the current (or last) run
    pub fn ops_used(&self) -> usize {
        self.budget - self.cursors.ops_remaining
    }

    pub fn eof_policy(&self) -> EofPolicy {
        self.eof
    }
}
