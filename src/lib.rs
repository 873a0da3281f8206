/*!

A CHIP-8 style interpreter with 4 KiB of memory, sixteen 8-bit registers,
a 64x32 monochrome screen and a sixteen key pad.

# Crossterm Frontend

If you want to try the interpreter on some programs, there is a ready-to-use implementation
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
The keypad is mapped onto `1234`, `qwer`, `asdf` and `zxcv`. Press escape to quit.

There is also `no_frontend`, which runs a program headless and prints the final screen.

# Library

The emulator never loops on its own. Load a program, then call `step` as often as you like.
Each call runs one instruction and tells you whether to keep going.

```rust
use fake_chip_8::emulator::{Emulator, input::DummyInput, output::DummyOutput};
use fake_chip_8::emulator::instruction::Reg;

let mut emulator = Emulator::with_io(DummyInput, DummyOutput);

// Load a program at address 0x200.
emulator.load(&[0x6A, 0x02, 0x7A, 0x05, 0x12, 0x04])?;
while emulator.step()? {}

assert_eq!(emulator.registers()[Reg::new(0xA)?], 0x07);
# Ok::<(), fake_chip_8::emulator::Error>(())
```

Alternatively, you can experiment by executing instructions manually.

```rust
use fake_chip_8::emulator::{Emulator, input::DummyInput, output::DummyOutput};
use fake_chip_8::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut emulator = Emulator::with_io(DummyInput, DummyOutput);

// Execute instructions manually
emulator.execute(Instruction::ClearScreen)?;

// Or many sequentially
emulator.execute_many(&[
    Instruction::Goto(Addr(0x250)),
    Instruction::SetRegToConst(Reg::new(0xA)?, Const(35)),
    Instruction::SetRegToReg(Reg::new(0xB)?, Reg::new(0xA)?)
])?;
assert_eq!(emulator.program_counter(), 0x250);
# Ok::<(), fake_chip_8::emulator::Error>(())
```

## Custom input and output

To get keypresses and show the screen, you implement `EmulatorInput` and `EmulatorOutput`.
The first hands the emulator a snapshot of the held keys once per step,
the second receives the whole frame every time it changes.
Take a look at `src/emulator/input.rs` and `src/emulator/output.rs` to see how to implement this, then do the following.

```ignore
use fake_chip_8::emulator::Emulator;

let mut emulator = Emulator::with_io(MyInput::new(), MyOutput::new());
```

You can then implement the emulator using your own custom frontend, as done with crossterm in crossterm_frontend.
*/

pub mod emulator;
pub mod util;
