use super::display::Frame;

/// Represents a screen the frame buffer can be shown on.
///
/// `draw` is called on the emulator's thread every time the frame changes
/// and should return quickly. Implementations that render on another thread
/// are responsible for their own synchronisation.
pub trait EmulatorOutput {
    fn draw(&mut self, frame: &Frame);
}

/// An output device that discards every frame.
pub struct DummyOutput;

impl EmulatorOutput for DummyOutput {
    fn draw(&mut self, _: &Frame) {}
}

impl<T: EmulatorOutput + ?Sized> EmulatorOutput for Box<T> {
    fn draw(&mut self, frame: &Frame) {
        (**self).draw(frame)
    }
}
