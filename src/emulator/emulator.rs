//! The CHIP-8 emulator as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::display::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use super::error::{Error, Result};
use super::input::{EmulatorInput, Keypad};
use super::instruction::*;
use super::key_wait::{KeyPoll, KeyWait};
use super::memory::{Memory, GLYPH_SIZE, MEM_SIZE, PROGRAM_START};
use super::output::EmulatorOutput;
use super::registers::Registers;
use super::trace::TraceLine;

/// Deepest allowed subroutine nesting.
pub const STACK_SIZE: usize = 256;

const PC_START: u16 = PROGRAM_START as u16;

pub struct Emulator<I: EmulatorInput, O: EmulatorOutput> {
    // Standard fields
    memory: Memory,
    registers: Registers,
    delay_timer: u8,
    sound_timer: u8,
    i: u16,
    program_counter: u16,
    stack: Vec<u16>,
    frame_buffer: FrameBuffer,

    keypad: Keypad,
    key_wait: KeyWait,
    stop_requested: bool,
    rng: Box<dyn RngCore + Send>,
    trace: Option<Vec<TraceLine>>,

    input: Option<I>,
    output: Option<O>,
}

impl<I: EmulatorInput, O: EmulatorOutput> Emulator<I, O> {

    /// Create a new emulator without input and output.
    /// Both have to be attached before the first [`step`](Emulator::step).
    pub fn new() -> Emulator<I, O> {
        Emulator {
            memory: Memory::new(),
            registers: Registers::new(),
            delay_timer: 0,
            sound_timer: 0,
            i: 0,
            program_counter: PC_START,
            stack: Vec::new(),
            frame_buffer: FrameBuffer::new(),

            keypad: Keypad::empty(),
            key_wait: KeyWait::Idle,
            stop_requested: false,
            rng: Box::new(StdRng::from_entropy()),
            trace: None,

            input: None,
            output: None,
        }
    }

    /// Create a new emulator with input and output
    pub fn with_io(input: I, output: O) -> Emulator<I, O> {
        let mut emulator = Emulator::new();
        emulator.attach_input(input);
        emulator.attach_display(output);
        emulator
    }

    /// Replace the random source used by `CXNN`.
    pub fn with_rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Emulator<I, O> {
        self.rng = Box::new(rng);
        self
    }

    /// Make `CXNN` deterministic.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = Box::new(StdRng::seed_from_u64(seed));
    }

    pub fn attach_input(&mut self, input: I) {
        self.input = Some(input);
    }

    pub fn attach_display(&mut self, output: O) {
        self.output = Some(output);
    }

    /// Reset the machine and copy a program into memory at 0x200.
    ///
    /// An oversized program is rejected before anything is reset.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        let memory = Memory::with_program(program)?;

        self.memory = memory;
        self.registers = Registers::new();
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.i = 0;
        self.program_counter = PC_START;
        self.stack.clear();
        self.frame_buffer.clear();
        self.keypad = Keypad::empty();
        self.key_wait = KeyWait::Idle;
        self.stop_requested = false;
        if let Some(trace) = self.trace.as_mut() {
            trace.clear();
        }

        log::debug!("Loaded program of {} bytes", program.len());
        Ok(())
    }

    /// Ask the emulator to stop. Seen by the next call to [`step`](Emulator::step).
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Start collecting a [`TraceLine`] for every executed instruction.
    pub fn enable_trace(&mut self) {
        self.trace.get_or_insert_with(Vec::new);
    }

    /// Take the trace lines collected since the last drain.
    pub fn drain_trace(&mut self) -> Vec<TraceLine> {
        self.trace.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Perform a single step, which will update timers and poll the input,
    /// then load an instruction and execute it.
    ///
    /// While `FX0A` is waiting for a key no instruction is fetched.
    /// Returns whether the driver should keep stepping.
    pub fn step(&mut self) -> Result<bool> {
        if self.input.is_none() {
            return Err(Error::InputUnavailable);
        }
        self.require_display()?;
        if let Some(input) = self.input.as_mut() {
            self.keypad = input.read();
        }

        // Update timers
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);

        match self.key_wait.poll(self.keypad) {
            KeyPoll::Idle => {}
            KeyPoll::Waiting => return Ok(!self.stop_requested),
            KeyPoll::Resolved { target, key } => {
                log::debug!("Key {:X} pressed, stored in {}", key, target);
                self.registers[target] = key;
                return Ok(!self.stop_requested);
            }
        }

        let pc = self.program_counter;
        let opcode = self.read_opcode()?;
        let instruction = Instruction::decode(opcode)?;

        let line = TraceLine { pc, opcode, instruction };
        log::trace!("{}", line);
        if let Some(trace) = self.trace.as_mut() {
            trace.push(line);
        }

        self.execute(instruction)?;

        Ok(self.is_running())
    }

    /// Read the two bytes at the program counter as one big-endian opcode.
    pub fn read_opcode(&mut self) -> Result<u16> {
        let opcode = self.memory.read_word(self.program_counter as usize)?;
        self.program_counter = self.program_counter.wrapping_add(2);
        Ok(opcode)
    }

    pub fn is_running(&self) -> bool {
        !self.stop_requested && (self.program_counter as usize) < MEM_SIZE
    }

    /// Execute many instructions sequentially
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<()> {
        for &instruction in instructions {
            self.execute(instruction)?;
        }
        Ok(())
    }

    /// Execute a single instruction, as if it had just been fetched.
    pub fn execute(&mut self, instruction: Instruction) -> Result<()> {
        match instruction {

            // Clear the screen
            Instruction::ClearScreen => {
                self.require_display()?;
                self.frame_buffer.clear();
                self.refresh()?;
            }

            // Return to the previous call site via the stack.
            Instruction::Return => {
                self.program_counter = self.stack.pop().ok_or(Error::StackUnderflow)?;
            }

            Instruction::Exec(Addr(addr)) => {
                self.program_counter = addr;
            }

            // A jump to itself is how programs for this interpreter halt
            Instruction::Goto(Addr(addr)) => {
                let current = self.program_counter.wrapping_sub(2);
                self.program_counter = addr;
                if addr == current {
                    log::info!("Jump to self at {:#05x}, stopping", addr);
                    self.stop_requested = true;
                }
            }

            // Store the current address on the stack, then jump to the specified address
            Instruction::Call(Addr(addr)) => {
                if self.stack.len() >= STACK_SIZE {
                    return Err(Error::StackOverflow(STACK_SIZE));
                }
                self.stack.push(self.program_counter);
                self.program_counter = addr;
            }

            Instruction::SkipIfRegEqConst(x, Const(n)) => {
                self.skip_if(self.registers[x] == n);
            }

            Instruction::SkipIfRegNeqConst(x, Const(n)) => {
                self.skip_if(self.registers[x] != n);
            }

            Instruction::SkipIfRegEqReg(x, y) => {
                self.skip_if(self.registers[x] == self.registers[y]);
            }

            Instruction::SetRegToConst(x, Const(n)) => {
                self.registers[x] = n;
            }

            // Wraps, VF is left alone
            Instruction::IncRegByConst(x, Const(n)) => {
                self.registers[x] = self.registers[x].wrapping_add(n);
            }

            Instruction::SetRegToReg(x, y) => {
                self.registers[x] = self.registers[y];
            }

            Instruction::BitwiseOr(x, y) => {
                self.registers[x] |= self.registers[y];
            }

            Instruction::BitwiseAnd(x, y) => {
                self.registers[x] &= self.registers[y];
            }

            Instruction::BitwiseXor(x, y) => {
                self.registers[x] ^= self.registers[y];
            }

            // The flag is written before Vx, so with VF as Vx the result wins
            Instruction::IncRegByReg(x, y) => {
                let carry = u16::from(self.registers[x]) + u16::from(self.registers[y]) > 0xFF;
                self.registers.set_flag(carry);
                self.registers[x] = self.registers[x].wrapping_add(self.registers[y]);
            }

            // VF is 0 on borrow
            Instruction::DecRegByReg(x, y) => {
                let no_borrow = self.registers[x] >= self.registers[y];
                self.registers.set_flag(no_borrow);
                self.registers[x] = self.registers[x].wrapping_sub(self.registers[y]);
            }

            // Shifts work on Vx in place, Vy is never read
            Instruction::BitshiftRight(x) => {
                let lost = self.registers[x] & 0x01 != 0;
                self.registers.set_flag(lost);
                self.registers[x] >>= 1;
            }

            Instruction::SetVxVyMinusVx(x, y) => {
                self.registers[x] = self.registers[y].wrapping_sub(self.registers[x]);
            }

            Instruction::BitshiftLeft(x) => {
                let lost = self.registers[x] & 0x80 != 0;
                self.registers.set_flag(lost);
                self.registers[x] <<= 1;
            }

            Instruction::SkipIfRegNeqReg(x, y) => {
                self.skip_if(self.registers[x] != self.registers[y]);
            }

            Instruction::SetI(Addr(addr)) => {
                self.i = addr;
            }

            Instruction::SetPcToV0PlusAddr(Addr(addr)) => {
                self.program_counter = u16::from(self.registers[Reg::V0]) + addr;
            }

            Instruction::SetVxRand(x, Const(n)) => {
                self.registers[x] = self.rng.gen::<u8>() & n;
            }

            Instruction::Draw(x, y, Const(sprite_height)) => {
                self.require_display()?;

                // Get coordinates
                let x_coord = self.registers[x] as usize % SCREEN_WIDTH;
                let y_coord = self.registers[y] as usize % SCREEN_HEIGHT;

                // Each row of the sprite is one byte. Rows past the end of memory are skipped.
                let sprite = self.memory.sprite(self.i as usize, sprite_height as usize);
                let collision = self.frame_buffer.draw_sprite(x_coord, y_coord, sprite);

                // Set VF collision flag
                self.registers.set_flag(collision);
                self.refresh()?;
            }

            Instruction::SkipIfKeyPressed(x) => {
                self.skip_if(self.keypad.is_pressed(self.registers[x]));
            }

            Instruction::SkipIfKeyNotPressed(x) => {
                self.skip_if(!self.keypad.is_pressed(self.registers[x]));
            }

            Instruction::SetRegToDelayTimer(x) => {
                self.registers[x] = self.delay_timer;
            }

            // Resolved by later steps, see `step`
            Instruction::WaitForKey(x) => {
                log::debug!("Waiting for a key press into {}", x);
                self.key_wait.begin(x);
            }

            Instruction::SetDelayTimerToReg(x) => {
                self.delay_timer = self.registers[x];
            }

            Instruction::SetSoundTimerToReg(x) => {
                self.sound_timer = self.registers[x];
            }

            Instruction::AddRegToI(x) => {
                self.i = self.i.wrapping_add(u16::from(self.registers[x]));
            }

            // Set i to character address. Each font element is 5 bytes wide.
            Instruction::SetIToSpriteAddrVx(x) => {
                self.i = u16::from(self.registers[x]) * GLYPH_SIZE as u16;
            }

            Instruction::SetIToBcdOfReg(x) => {
                let value = self.registers[x];
                let digits = [value / 100, value / 10 % 10, value % 10];
                self.memory.write_slice(self.i as usize, &digits)?;
            }

            // Dump register values up to Vx, I stays where it is
            Instruction::RegDump(x) => {
                let values = &self.registers.as_slice()[..=x.index()];
                self.memory.write_slice(self.i as usize, values)?;
            }

            // Load register values up to Vx, I stays where it is
            Instruction::RegLoad(x) => {
                let values = self.memory.read_slice(self.i as usize, x.index() + 1)?;
                self.registers.as_mut_slice()[..=x.index()].copy_from_slice(values);
            }

            Instruction::Ignored(opcode) => {
                log::warn!("Ignoring opcode {:#06x}", opcode);
            }
        };

        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter = self.program_counter.wrapping_add(2);
        }
    }

    /// Screen instructions fail before touching any state when there is nowhere to show them.
    fn require_display(&self) -> Result<()> {
        match self.output {
            Some(_) => Ok(()),
            None => Err(Error::DisplayUnavailable),
        }
    }

    /// Hand the frame buffer to the attached display.
    fn refresh(&mut self) -> Result<()> {
        let output = self.output.as_mut().ok_or(Error::DisplayUnavailable)?;
        output.draw(self.frame_buffer.rows());
        Ok(())
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn index_register(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// Sound is not produced, but a frontend can use this to beep.
    pub fn is_sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// The key snapshot taken by the last step.
    pub fn keypad(&self) -> Keypad {
        self.keypad
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.key_wait.is_waiting()
    }

    pub fn input_mut(&mut self) -> Option<&mut I> {
        self.input.as_mut()
    }

    pub fn output(&self) -> Option<&O> {
        self.output.as_ref()
    }
}

impl<I: EmulatorInput, O: EmulatorOutput> Default for Emulator<I, O> {
    fn default() -> Self {
        Self::new()
    }
}
