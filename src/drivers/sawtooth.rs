/// Endless sawtooth byte sequence: `start, start + step, ...` wrapping mod 256.
#[derive(Clone, Debug)]
pub struct Sawtooth {
    next: u8,
    step: u8,
}
impl Sawtooth {
    pub fn new(start: u8, step: u8) -> Self {
        Self { next: start, step }
    }
}
impl Default for Sawtooth {
    fn default() -> Self {
        Self::new(0, 5)
    }
}
impl Iterator for Sawtooth {
    type Item = u8;
    fn next(&mut self) -> Option<u8> {
        let value = self.next;
        self.next = self.next.wrapping_add(self.step);
        Some(value)
    }
}
