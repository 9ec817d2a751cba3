use crate::DELAY_LINE_FRAMES;

/// Stereo ring buffer with a read cursor trailing the write cursor.
///
/// The buffer is allocated once in [`StereoDelayLine::new`]; everything else
/// is allocation-free. The loop delay is the distance from the read cursor to
/// the write cursor, so reading a frame and then writing one per tick yields a
/// delay of exactly that many frames.
pub struct StereoDelayLine {
    buffer: Box<[[f32; 2]]>,
    read_pos: usize,
    write_pos: usize,
}

impl Default for StereoDelayLine {
    fn default() -> Self {
        Self::new()
    }
}

impl StereoDelayLine {
    pub fn new() -> Self {
        Self {
            buffer: vec![[0.0; 2]; DELAY_LINE_FRAMES].into_boxed_slice(),
            read_pos: 0,
            write_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Place the write cursor `frames` ahead of the read cursor.
    pub fn set_length(&mut self, frames: usize) {
        let frames = frames.min(self.capacity() - 1);
        self.write_pos = (self.read_pos + frames) % self.capacity();
    }

    #[inline]
    pub fn read(&self) -> [f32; 2] {
        self.buffer[self.read_pos]
    }

    #[inline]
    pub fn write(&mut self, frame: [f32; 2]) {
        self.buffer[self.write_pos] = frame;
    }

    /// Move both cursors one frame forward, wrapping at capacity.
    #[inline]
    pub fn advance(&mut self) {
        self.read_pos += 1;
        if self.read_pos >= self.buffer.len() {
            self.read_pos = 0;
        }
        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Zero the contents; cursors stay where they are.
    pub fn clear(&mut self) {
        self.buffer.fill([0.0; 2]);
    }

    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    pub fn is_silent(&self) -> bool {
        self.buffer.iter().all(|frame| *frame == [0.0; 2])
    }
}
